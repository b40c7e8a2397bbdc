use serde::{Deserialize, Serialize};

/// One order-status summary as served by the status endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusSnapshot {
    #[serde(rename = "output_realizowane")]
    pub realized: String,
    #[serde(rename = "output_oczekuje")]
    pub pending: String,
    #[serde(rename = "output_nie_dodane")]
    pub not_added: String,
    #[serde(rename = "output_combined")]
    pub combined: String,
    #[serde(
        rename = "output_wykonane",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Body returned by the status endpoint when it has nothing to serve.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecomputeOutcome {
    Success,
    Error,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RecomputeAck {
    pub status: RecomputeOutcome,
    #[serde(default)]
    pub message: Option<String>,
}

impl RecomputeAck {
    pub fn accepted() -> Self {
        Self {
            status: RecomputeOutcome::Success,
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RecomputeOutcome::Success
    }
}
