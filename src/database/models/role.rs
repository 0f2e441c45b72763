use serde::{Deserialize, Serialize};

use super::{required, ModelError, Patch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RolePatch {
    pub name: Option<String>,
}

impl Patch for RolePatch {
    type Target = Role;

    fn into_new(self) -> Result<Role, ModelError> {
        Ok(Role { name: required(self.name, "name")? })
    }

    fn apply(self, current: Role) -> Role {
        Role { name: self.name.unwrap_or(current.name) }
    }
}
