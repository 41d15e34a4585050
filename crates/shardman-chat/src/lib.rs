//! Chat integration: game chat log reading and the console message bridge.

pub mod log_reader;
pub mod transport;

pub use log_reader::recent_chat_lines;
pub use transport::{ChatTransport, ConsoleFifoTransport};
