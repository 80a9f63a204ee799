pub mod contact;
pub mod health;
pub mod status;

pub use contact::{list_contact_messages, submit_contact_message};
pub use health::{health_check, root};
pub use status::{create_status_check, list_status_checks};
