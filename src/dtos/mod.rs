pub mod contact;
pub mod status;

pub use contact::{ContactMessageCreate, ContactMessageResponse, SubmitContactResponse};
pub use status::{StatusCheckCreate, StatusCheckResponse};
