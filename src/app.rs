use crate::clock::Clock;
use crate::config::Config;
use crate::sample::{sample_or_placeholder, SampleSource};
use crate::session::{Session, SessionTracker};
use crate::typing_policy::{apply_edit, edit_for_key, is_ctrl_chord};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
}

/// What the loop should do after handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Glue between terminal events, the sample source and the tracker
pub struct App<C: Clock> {
    pub tracker: SessionTracker<C>,
    pub state: AppState,
    pub show_wrong_percent: bool,
    source: Box<dyn SampleSource>,
}

impl<C: Clock> App<C> {
    pub fn new(config: &Config, mut source: Box<dyn SampleSource>, clock: C) -> Self {
        let target = sample_or_placeholder(source.as_mut());
        Self {
            tracker: SessionTracker::with_clock(target, clock),
            state: AppState::Typing,
            show_wrong_percent: config.show_wrong_percent,
            source,
        }
    }

    pub fn session(&self) -> &Session {
        self.tracker.session()
    }

    pub fn now(&self) -> crate::clock::Millis {
        self.tracker.clock().now()
    }

    /// Ticks only matter while someone is typing
    pub fn wants_tick(&self) -> bool {
        let s = self.session();
        s.has_started() && !s.is_finished()
    }

    pub fn on_tick(&mut self) {
        if self.wants_tick() {
            let now = self.now();
            self.tracker.tick(now);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = is_ctrl_chord(&key);

        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Tab => {
                self.new_test();
                return Action::Continue;
            }
            KeyCode::Char('r') if ctrl => {
                self.restart();
                return Action::Continue;
            }
            KeyCode::Char('f') if ctrl => {
                self.finish();
                return Action::Continue;
            }
            _ => {}
        }

        match self.state {
            AppState::Typing => {
                if let Some(edit) = edit_for_key(&key) {
                    let next = apply_edit(self.session().typed(), edit);
                    self.tracker.submit_input(next);
                    self.sync_state();
                }
            }
            AppState::Results => match key.code {
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('n') => self.new_test(),
                _ => {}
            },
        }

        Action::Continue
    }

    /// Stop early and show results for what has been typed
    pub fn finish(&mut self) {
        let now = self.now();
        self.tracker.force_finish(now);
        self.sync_state();
    }

    /// Same text again
    pub fn restart(&mut self) {
        let target = self.session().target().to_string();
        self.tracker.reset(target);
        self.state = AppState::Typing;
    }

    /// Fresh text from the sample source
    pub fn new_test(&mut self) {
        let target = sample_or_placeholder(self.source.as_mut());
        debug!(target_len = target.len(), "new test");
        self.tracker.reset(target);
        self.state = AppState::Typing;
    }

    fn sync_state(&mut self) {
        self.state = if self.session().is_finished() {
            AppState::Results
        } else {
            AppState::Typing
        };
    }
}
