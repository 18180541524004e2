//! Current user record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Snapshot of the authenticated principal.
///
/// Identity and role flags are typed; any other field the server sends is
/// kept in `extra` so the record round-trips unchanged through persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Staff or superuser.
    pub fn is_admin(&self) -> bool {
        self.is_staff.unwrap_or(false) || self.is_superuser.unwrap_or(false)
    }

    /// Human-readable label for display.
    pub fn display_name(&self) -> String {
        match (&self.username, self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("#{id}"),
            (None, None) => "(desconocido)".to_string(),
        }
    }
}
