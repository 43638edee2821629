//! Holding tank models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A holding tank in the facility
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tank {
    pub id: Uuid,
    /// Number painted on the tank, used for display ordering
    pub number: u32,
    pub name: String,
    /// Inactive tanks are left out of facility reports
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
