//! Wire types of the share service, shared by server and client.

use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/share`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShareResponse {
    pub id: String,
}

/// Body of `GET /api/share`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareStats {
    pub count: usize,
    pub max: usize,
}

/// API error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

pub const CODE_NOT_FOUND: &str = "NOT_FOUND";
pub const CODE_CAPACITY_EXCEEDED: &str = "CAPACITY_EXCEEDED";
pub const CODE_BAD_REQUEST: &str = "BAD_REQUEST";
