// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod sample;
pub mod session;
pub mod typing_policy;
pub mod ui;

pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use metrics::{CharState, Metrics};
pub use session::{Session, SessionTracker};
