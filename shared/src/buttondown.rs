//! Wire types for the Buttondown email API.

use serde::{Deserialize, Serialize};

pub const EMAILS_ENDPOINT: &str = "https://api.buttondown.email/v1/emails";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Draft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEmail {
    pub subject: String,
    pub body: String,
    pub status: EmailStatus,
}

impl DraftEmail {
    pub fn new(subject: String, body: String) -> Self {
        Self {
            subject,
            body,
            status: EmailStatus::Draft,
        }
    }
}
