use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, AppState},
    clock::Clock,
    metrics::CharState,
    session::Session,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn display_char(c: char, state: CharState) -> char {
    match (c, state) {
        (' ', CharState::Incorrect) => '·',
        (c, _) => c,
    }
}

/// Colored spans for the target text, cursor underlined
pub fn target_spans(session: &Session) -> Vec<Span<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let green = bold.fg(Color::Green);
    let red = bold.fg(Color::Red).add_modifier(Modifier::CROSSED_OUT);
    let dim = bold.add_modifier(Modifier::DIM);
    let cursor_style = dim.add_modifier(Modifier::UNDERLINED);

    let chars = session.target().chars().collect::<Vec<_>>();
    let states = session.classification();
    let cursor = session.typed_len().min(chars.len());

    let mut spans = states[..cursor]
        .iter()
        .zip(&chars[..cursor])
        .chunk_by(|(state, _)| **state)
        .into_iter()
        .map(|(state, run)| {
            let text = run
                .map(|(s, c)| display_char(*c, *s))
                .collect::<String>();
            let style = if state == CharState::Correct { green } else { red };
            Span::styled(text, style)
        })
        .collect::<Vec<_>>();

    if cursor < chars.len() {
        spans.push(Span::styled(chars[cursor].to_string(), cursor_style));
        let rest = chars[cursor + 1..].iter().collect::<String>();
        if !rest.is_empty() {
            spans.push(Span::styled(rest, dim));
        }
    }

    // anything typed past the end of the target
    let extra = session.typed().chars().skip(chars.len()).collect::<String>();
    if !extra.is_empty() {
        spans.push(Span::styled(extra, red));
    }

    spans
}

pub fn stats_line(session: &Session, show_wrong_percent: bool) -> String {
    let mut line = format!("{} wpm   {}% acc", session.wpm(), session.accuracy());
    if show_wrong_percent {
        line.push_str(&format!("   {}% wrong", session.wrong_percent()));
    }
    line.push_str(&format!("   {} chars", session.typed_len()));
    line
}

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.session();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let over_typed = session
            .typed_len()
            .saturating_sub(session.target().chars().count());
        let prompt_width = session.target().width() + over_typed;
        let prompt_lines = if prompt_width <= max_chars_per_line as usize {
            1
        } else {
            ((prompt_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
        };
        let results_lines = if self.state == AppState::Results { 5 } else { 0 };
        let padding = area
            .height
            .saturating_sub(prompt_lines + results_lines + 4)
            / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(prompt_lines),
                Constraint::Length(1), // padding
                Constraint::Length(1), // live stats
                Constraint::Length(results_lines),
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Line::from(target_spans(session)))
            .alignment(if prompt_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            stats_line(session, self.show_wrong_percent),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        let legend = match self.state {
            AppState::Typing => "(tab) new / (ctrl+r) restart / (ctrl+f) finish / (esc) quit",
            AppState::Results => {
                let secs = session.elapsed_ms(self.now()) as f64 / 1000.0;
                let summary = format!(
                    "Final WPM: {}\nFinal Accuracy: {}%\nTime: {:.1}s",
                    session.wpm(),
                    session.accuracy(),
                    secs
                );
                Paragraph::new(summary)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title("Test Complete")
                            .border_style(Style::default().fg(Color::Green)),
                    )
                    .style(Style::default().fg(Color::Green))
                    .alignment(Alignment::Center)
                    .render(chunks[4], buf);

                "(r)etry / (n)ew / (esc)ape"
            }
        };

        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }
}

/// Vertical margin around the whole screen
pub fn screen_area(area: Rect) -> Rect {
    let v = VERTICAL_MARGIN.min(area.height / 4);
    Rect {
        y: area.y + v,
        height: area.height.saturating_sub(v * 2),
        ..area
    }
}
