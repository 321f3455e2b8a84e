use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,

    pub category: String,

    pub message: String,

    pub created: DateTime<Utc>,

    #[serde(default)]
    pub read: bool,
}

impl Notification {
    pub fn new(category: &str, message: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.to_string(),
            message,
            created: now,
            read: false,
        }
    }
}
