//! Service DTOs

use serde::{Deserialize, Serialize};

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            status: "ok".to_string(),
            service: "Neko Server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
