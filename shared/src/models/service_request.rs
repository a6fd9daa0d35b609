//! Service Request Model

use serde::{Deserialize, Serialize};

/// Request workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    New,
    InProgress,
    Converted,
    Closed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::New,
        RequestStatus::InProgress,
        RequestStatus::Converted,
        RequestStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Converted => "converted",
            Self::Closed => "closed",
        }
    }
}

/// What the request is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Quote,
    Support,
    Consultation,
}

impl RequestType {
    pub const ALL: [RequestType; 3] = [
        RequestType::Quote,
        RequestType::Support,
        RequestType::Consultation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Support => "support",
            Self::Consultation => "consultation",
        }
    }
}

/// Inbound service request (lead)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: i64,
    pub title: String,
    pub contact_name: String,
    pub contact_email: Option<String>,
    pub status: RequestStatus,
    pub request_type: Option<RequestType>,
    /// Set once the request has been converted into a customer
    pub customer_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ServiceRequest {
    pub fn is_converted(&self) -> bool {
        self.customer_id.is_some()
    }
}
