use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{required, ModelError, Patch, Setting};

/// Collective bargaining process between a contractor and a union
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Negotiation {
    pub contractor_id: i64,
    pub union_id: i64,
    pub contract_label: String,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub commercial_contract_expiry: Option<NaiveDate>,
    pub total_headcount: Option<i64>,
    pub unionized_headcount: Option<i64>,
    pub unionized_percentage: Option<Decimal>,
}

impl Negotiation {
    pub fn is_closed(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("closed"))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NegotiationPatch {
    pub contractor_id: Option<i64>,
    pub union_id: Option<i64>,
    pub contract_label: Option<String>,
    pub status: Setting<String>,
    pub start_date: Setting<NaiveDate>,
    pub end_date: Setting<NaiveDate>,
    pub commercial_contract_expiry: Setting<NaiveDate>,
    pub total_headcount: Setting<i64>,
    pub unionized_headcount: Setting<i64>,
    pub unionized_percentage: Setting<Decimal>,
}

impl Patch for NegotiationPatch {
    type Target = Negotiation;

    fn into_new(self) -> Result<Negotiation, ModelError> {
        Ok(Negotiation {
            contractor_id: required(self.contractor_id, "contractor_id")?,
            union_id: required(self.union_id, "union_id")?,
            contract_label: required(self.contract_label, "contract_label")?,
            status: self.status.into_option(),
            start_date: self.start_date.into_option(),
            end_date: self.end_date.into_option(),
            commercial_contract_expiry: self.commercial_contract_expiry.into_option(),
            total_headcount: self.total_headcount.into_option(),
            unionized_headcount: self.unionized_headcount.into_option(),
            unionized_percentage: self.unionized_percentage.into_option(),
        })
    }

    fn apply(self, current: Negotiation) -> Negotiation {
        Negotiation {
            contractor_id: self.contractor_id.unwrap_or(current.contractor_id),
            union_id: self.union_id.unwrap_or(current.union_id),
            contract_label: self.contract_label.unwrap_or(current.contract_label),
            status: self.status.apply(current.status),
            start_date: self.start_date.apply(current.start_date),
            end_date: self.end_date.apply(current.end_date),
            commercial_contract_expiry: self.commercial_contract_expiry.apply(current.commercial_contract_expiry),
            total_headcount: self.total_headcount.apply(current.total_headcount),
            unionized_headcount: self.unionized_headcount.apply(current.unionized_headcount),
            unionized_percentage: self.unionized_percentage.apply(current.unionized_percentage),
        }
    }
}
