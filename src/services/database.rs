use crate::dtos::{ContactMessageCreate, StatusCheckCreate};
use crate::error::AppError;
use crate::models::{ContactMessage, StatusCheck};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{ClientOptions, FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use std::time::Duration;

const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable repository backing contact messages and status checks. Any store
/// with create/list semantics satisfies the contract; the service ships a
/// MongoDB implementation and an in-memory one for tests.
#[async_trait]
pub trait Store: Send + Sync {
    /// Generates the id and creation timestamp, persists the record with
    /// status `new`, and returns the stored entity.
    async fn create_contact_message(
        &self,
        submission: ContactMessageCreate,
    ) -> Result<ContactMessage, AppError>;

    /// All stored messages, newest first. Empty when nothing was submitted.
    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError>;

    async fn create_status_check(&self, input: StatusCheckCreate)
        -> Result<StatusCheck, AppError>;

    async fn list_status_checks(&self) -> Result<Vec<StatusCheck>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB URI: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes");

        // Descending created_at index backs the newest-first listing.
        let created_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_idx".to_string())
                    .build(),
            )
            .build();

        self.contact_messages()
            .create_index(created_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create created_at index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        let timestamp_index = IndexModel::builder()
            .keys(doc! { "timestamp": -1 })
            .options(
                IndexOptions::builder()
                    .name("timestamp_idx".to_string())
                    .build(),
            )
            .build();

        self.status_checks()
            .create_index(timestamp_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create timestamp index: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    fn contact_messages(&self) -> Collection<ContactMessage> {
        self.db.collection("contact_messages")
    }

    fn status_checks(&self) -> Collection<StatusCheck> {
        self.db.collection("status_checks")
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn create_contact_message(
        &self,
        submission: ContactMessageCreate,
    ) -> Result<ContactMessage, AppError> {
        let message =
            ContactMessage::new(submission.name, submission.email, submission.message);

        self.contact_messages()
            .insert_one(&message, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert contact message: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(message)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .contact_messages()
            .find(doc! {}, find_options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list contact messages: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        let messages: Vec<ContactMessage> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect contact messages: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        Ok(messages)
    }

    async fn create_status_check(
        &self,
        input: StatusCheckCreate,
    ) -> Result<StatusCheck, AppError> {
        let check = StatusCheck::new(input.client_name);

        self.status_checks()
            .insert_one(&check, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert status check: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(check)
    }

    async fn list_status_checks(&self) -> Result<Vec<StatusCheck>, AppError> {
        let cursor = self.status_checks().find(doc! {}, None).await.map_err(|e| {
            tracing::error!("Failed to list status checks: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        let checks: Vec<StatusCheck> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect status checks: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;

        Ok(checks)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }
}
