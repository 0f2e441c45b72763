use serde::{Deserialize, Serialize};

use super::{required, ModelError, Patch, Setting};

/// Labor union
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Union {
    pub name: String,
    pub federation: Option<String>,
    pub union_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UnionPatch {
    pub name: Option<String>,
    pub federation: Setting<String>,
    pub union_type: Setting<String>,
}

impl Patch for UnionPatch {
    type Target = Union;

    fn into_new(self) -> Result<Union, ModelError> {
        Ok(Union {
            name: required(self.name, "name")?,
            federation: self.federation.into_option(),
            union_type: self.union_type.into_option(),
        })
    }

    fn apply(self, current: Union) -> Union {
        Union {
            name: self.name.unwrap_or(current.name),
            federation: self.federation.apply(current.federation),
            union_type: self.union_type.apply(current.union_type),
        }
    }
}
