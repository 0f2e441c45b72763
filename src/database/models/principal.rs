use serde::{Deserialize, Serialize};

use super::{required, ModelError, Patch};

/// Mining company that owns contractors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PrincipalPatch {
    pub name: Option<String>,
}

impl Patch for PrincipalPatch {
    type Target = Principal;

    fn into_new(self) -> Result<Principal, ModelError> {
        Ok(Principal { name: required(self.name, "name")? })
    }

    fn apply(self, current: Principal) -> Principal {
        Principal { name: self.name.unwrap_or(current.name) }
    }
}
