pub mod log;
pub mod types;

pub use log::{LogSender, Transcript, Waker, DEFAULT_TRANSCRIPT_CAPACITY};
pub use types::{LogEntry, Speaker};
