use crate::clock::{Clock, Millis, SystemClock};
use crate::metrics::{self, CharState, Metrics};
use tracing::{debug, info};

/// One attempt at typing a target text
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: u64,
    target: String,
    typed: String,
    started_at: Option<Millis>,
    finished_at: Option<Millis>,
    finished: bool,
    metrics: Metrics,
}

impl Session {
    fn new(id: u64, target: String) -> Self {
        Self {
            id,
            target,
            typed: String::new(),
            started_at: None,
            finished_at: None,
            finished: false,
            metrics: Metrics::default(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn started_at(&self) -> Option<Millis> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Millis> {
        self.finished_at
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn wpm(&self) -> u32 {
        self.metrics.wpm
    }

    pub fn accuracy(&self) -> u8 {
        self.metrics.accuracy
    }

    pub fn wrong_percent(&self) -> u8 {
        self.metrics.wrong_percent
    }

    pub fn typed_len(&self) -> usize {
        self.typed.chars().count()
    }

    /// Milliseconds between the first keystroke and `now`, or the
    /// completion instant once finished.
    pub fn elapsed_ms(&self, now: Millis) -> Millis {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.saturating_sub(start).max(0),
            (Some(start), None) => now.saturating_sub(start).max(0),
            (None, _) => 0,
        }
    }

    pub fn classification(&self) -> Vec<CharState> {
        metrics::classify(&self.target, &self.typed)
    }

    fn recompute(&mut self, now: Millis) {
        self.metrics = metrics::compute(&self.target, &self.typed, self.started_at, now);
    }
}

/// Owns the current session and is the only thing that mutates it
#[derive(Debug)]
pub struct SessionTracker<C: Clock = SystemClock> {
    clock: C,
    session: Session,
}

impl SessionTracker<SystemClock> {
    pub fn start(target: impl Into<String>) -> Self {
        Self::with_clock(target, SystemClock)
    }
}

impl<C: Clock> SessionTracker<C> {
    pub fn with_clock(target: impl Into<String>, clock: C) -> Self {
        let session = Session::new(0, target.into());
        debug!(id = session.id, target_len = session.target.len(), "session started");
        Self { clock, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Replace the typed text. Ignored once the session has finished.
    pub fn submit_input(&mut self, new_typed: impl Into<String>) -> &Session {
        if self.session.finished {
            return &self.session;
        }

        let new_typed = new_typed.into();
        let now = self.clock.now();

        if self.session.started_at.is_none() && !new_typed.is_empty() {
            self.session.started_at = Some(now);
            debug!(id = self.session.id, at = now, "timing started");
        }

        self.session.typed = new_typed;
        self.session.recompute(now);

        if !self.session.target.is_empty() && self.session.typed == self.session.target {
            self.finish_at(now);
        }

        &self.session
    }

    /// Refresh metrics for the passage of time alone
    pub fn tick(&mut self, now: Millis) -> &Session {
        if self.session.has_started() && !self.session.finished {
            self.session.recompute(now);
        }
        &self.session
    }

    /// `tick` for a tick captured while session `id` was current; stale
    /// ticks from before a reset are dropped.
    pub fn tick_session(&mut self, id: u64, now: Millis) -> &Session {
        if id != self.session.id {
            debug!(stale = id, current = self.session.id, "dropping stale tick");
            return &self.session;
        }
        self.tick(now)
    }

    /// Stop the test early, whatever has been typed
    pub fn force_finish(&mut self, now: Millis) -> &Session {
        if !self.session.finished {
            self.finish_at(now);
        }
        &self.session
    }

    pub fn reset(&mut self, target: impl Into<String>) -> &Session {
        let id = self.session.id.wrapping_add(1);
        self.session = Session::new(id, target.into());
        debug!(id, target_len = self.session.target.len(), "session reset");
        &self.session
    }

    pub fn classification(&self) -> Vec<CharState> {
        self.session.classification()
    }

    fn finish_at(&mut self, now: Millis) {
        self.session.finished = true;
        self.session.finished_at = Some(now);
        self.session.recompute(now);
        info!(
            id = self.session.id,
            wpm = self.session.metrics.wpm,
            accuracy = self.session.metrics.accuracy,
            elapsed_ms = self.session.elapsed_ms(now),
            "session finished"
        );
    }
}
