pub mod message;
pub mod terminal;

pub use message::ChatMessage;
