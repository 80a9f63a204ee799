use crate::dtos::{ContactMessageCreate, StatusCheckCreate};
use crate::error::AppError;
use crate::models::{ContactMessage, StatusCheck};
use crate::services::Store;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Store backed by process memory. Carries the same observable contract as
/// [`MongoStore`](crate::services::MongoStore); used by the test harness.
#[derive(Default)]
pub struct InMemoryStore {
    contact_messages: RwLock<Vec<ContactMessage>>,
    status_checks: RwLock<Vec<StatusCheck>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_contact_message(
        &self,
        submission: ContactMessageCreate,
    ) -> Result<ContactMessage, AppError> {
        let message =
            ContactMessage::new(submission.name, submission.email, submission.message);
        self.contact_messages.write().await.push(message.clone());
        Ok(message)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        // Insertion order doubles as created_at order for a single writer.
        let messages = self.contact_messages.read().await;
        Ok(messages.iter().rev().cloned().collect())
    }

    async fn create_status_check(
        &self,
        input: StatusCheckCreate,
    ) -> Result<StatusCheck, AppError> {
        let check = StatusCheck::new(input.client_name);
        self.status_checks.write().await.push(check.clone());
        Ok(check)
    }

    async fn list_status_checks(&self) -> Result<Vec<StatusCheck>, AppError> {
        Ok(self.status_checks.read().await.clone())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
