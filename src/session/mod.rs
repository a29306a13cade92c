//! Assistant chat session: transcript, in-flight tracking, unread badge and
//! suggestion chips.

pub mod controller;
pub mod message;
pub mod suggestions;

pub use controller::{AssistantSession, SessionEvent};
pub use message::{ChatMessage, MessageKind, Role};
pub use suggestions::{MAX_SUGGESTIONS, suggestions};
