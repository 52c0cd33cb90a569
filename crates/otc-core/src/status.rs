//! Lifecycle status of remote resources
//!
//! Every resource kind reports status with its own vocabulary (`OK` for a
//! VPC, `ACTIVE` for a subnet, `SHUTOFF` for a server). [`ResourceStatus`]
//! folds those strings into one lifecycle so waits can be written once.

use serde::{Deserialize, Serialize};

/// Status of a remote resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    /// Resource is being created or is transitioning
    Pending,
    /// Resource is usable; for instances this means running
    Active,
    /// Instance is powered off
    Stopped,
    /// Resource is in error state
    Error,
    /// Resource has been deleted but is still listed
    Deleted,
    /// Resource is no longer known to the service
    NotFound,
    /// Status string not recognised
    Unknown,
}

impl ResourceStatus {
    /// Map a status string as reported by the service
    pub fn from_remote(status: &str) -> Self {
        match status.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" | "OK" => ResourceStatus::Active,
            "SHUTOFF" | "STOPPED" => ResourceStatus::Stopped,
            "BUILD" | "CREATING" | "REBOOT" | "HARD_REBOOT" | "PENDING_CREATE"
            | "PENDING_UPDATE" | "DOWN" | "UNKNOWN" => ResourceStatus::Pending,
            "ERROR" | "BIND_ERROR" => ResourceStatus::Error,
            "DELETED" => ResourceStatus::Deleted,
            _ => ResourceStatus::Unknown,
        }
    }

    /// Whether the resource can no longer be used
    pub fn is_gone(&self) -> bool {
        matches!(self, ResourceStatus::Deleted | ResourceStatus::NotFound)
    }
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceStatus::Pending => write!(f, "pending"),
            ResourceStatus::Active => write!(f, "active"),
            ResourceStatus::Stopped => write!(f, "stopped"),
            ResourceStatus::Error => write!(f, "error"),
            ResourceStatus::Deleted => write!(f, "deleted"),
            ResourceStatus::NotFound => write!(f, "not_found"),
            ResourceStatus::Unknown => write!(f, "unknown"),
        }
    }
}
