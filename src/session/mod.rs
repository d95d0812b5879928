pub mod controller;
pub mod state;

pub use controller::{CaptureSession, ErrorCallback, ResultCallback};
pub use state::{SessionSnapshot, SessionState, SessionStatus};
