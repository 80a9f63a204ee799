pub mod database;
pub mod mailer;
pub mod memory;

pub use database::{MongoStore, Store};
pub use mailer::{Mailer, MockMailer, NotifyOutcome, SmtpMailer};
pub use memory::InMemoryStore;
