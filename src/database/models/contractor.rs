use serde::{Deserialize, Serialize};

use super::{required, ModelError, Patch};

/// Contractor company working for a principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contractor {
    pub principal_id: i64,
    pub name: String,
    pub tax_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContractorPatch {
    pub principal_id: Option<i64>,
    pub name: Option<String>,
    pub tax_id: Option<String>,
}

impl Patch for ContractorPatch {
    type Target = Contractor;

    fn into_new(self) -> Result<Contractor, ModelError> {
        Ok(Contractor {
            principal_id: required(self.principal_id, "principal_id")?,
            name: required(self.name, "name")?,
            tax_id: required(self.tax_id, "tax_id")?,
        })
    }

    fn apply(self, current: Contractor) -> Contractor {
        Contractor {
            principal_id: self.principal_id.unwrap_or(current.principal_id),
            name: self.name.unwrap_or(current.name),
            tax_id: self.tax_id.unwrap_or(current.tax_id),
        }
    }
}
