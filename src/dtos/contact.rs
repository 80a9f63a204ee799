use crate::models::{ContactMessage, MessageStatus};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct ContactMessageCreate {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(
        email(message = "Invalid email address"),
        custom(function = "validate_email_domain", message = "Email domain must contain a dot")
    )]
    pub email: String,
    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,
}

// The stock email rule accepts bare hostnames ("user@localhost"); submissions
// must carry a fully qualified domain.
fn validate_email_domain(email: &str) -> Result<(), ValidationError> {
    let domain_has_dot = email
        .rsplit_once('@')
        .map(|(_, domain)| domain.contains('.'))
        .unwrap_or(false);

    if domain_has_dot {
        Ok(())
    } else {
        Err(ValidationError::new("email_domain"))
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitContactResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactMessageResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: MessageStatus,
    pub created_at: String,
}

impl From<ContactMessage> for ContactMessageResponse {
    fn from(message: ContactMessage) -> Self {
        Self {
            id: message.id,
            name: message.name,
            email: message.email,
            message: message.message,
            status: message.status,
            created_at: message.created_at.to_rfc3339(),
        }
    }
}
