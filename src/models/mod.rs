pub mod contact;
pub mod status;

pub use contact::{ContactMessage, MessageStatus};
pub use status::StatusCheck;
