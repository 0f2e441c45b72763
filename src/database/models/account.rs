use serde::{Deserialize, Serialize};

/// Platform user. Provisioned by the identity system, never written through the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub role_id: Option<i64>,
}
