use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A change to the typed buffer, as a text box would apply it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    Insert(char),
    Backspace,
    DeleteWord,
    Clear,
}

/// True for a plain Ctrl chord. Windows reports AltGr characters as
/// CONTROL|ALT, and those are typed text rather than shortcuts.
pub fn is_ctrl_chord(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && !key.modifiers.contains(KeyModifiers::ALT)
}

/// Translate a key press into a buffer edit. Keys with other meanings
/// (navigation, shortcuts) return None.
pub fn edit_for_key(key: &KeyEvent) -> Option<Edit> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let chord = is_ctrl_chord(key);

    match key.code {
        KeyCode::Backspace if ctrl || alt => Some(Edit::DeleteWord),
        KeyCode::Backspace => Some(Edit::Backspace),
        KeyCode::Char('w') if chord => Some(Edit::DeleteWord),
        KeyCode::Char('h') if chord => Some(Edit::Backspace),
        KeyCode::Char('u') if chord => Some(Edit::Clear),
        KeyCode::Char(c) if ctrl && alt => Some(Edit::Insert(c)),
        KeyCode::Char(_) if ctrl || alt => None,
        KeyCode::Char(c) => Some(Edit::Insert(c)),
        _ => None,
    }
}

/// Buffer contents after `edit`
pub fn apply_edit(typed: &str, edit: Edit) -> String {
    match edit {
        Edit::Insert(c) => {
            let mut next = String::with_capacity(typed.len() + c.len_utf8());
            next.push_str(typed);
            next.push(c);
            next
        }
        Edit::Backspace => {
            let mut next = typed.to_string();
            next.pop();
            next
        }
        Edit::DeleteWord => {
            // trailing whitespace goes with the word before it
            let trimmed = typed.trim_end();
            match trimmed.rfind(char::is_whitespace) {
                Some(idx) => {
                    let ws_len = trimmed[idx..].chars().next().map_or(1, char::len_utf8);
                    trimmed[..idx + ws_len].to_string()
                }
                None => String::new(),
            }
        }
        Edit::Clear => String::new(),
    }
}
