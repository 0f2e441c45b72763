use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{required, ModelError, Patch, Setting};

/// Periodic follow-up attached to a negotiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringRecord {
    pub negotiation_id: i64,
    /// Falls back to the negotiation's start date when absent
    pub start_date: Option<NaiveDate>,
    pub comments: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MonitoringPatch {
    pub negotiation_id: Option<i64>,
    pub start_date: Setting<NaiveDate>,
    pub comments: Setting<String>,
}

impl Patch for MonitoringPatch {
    type Target = MonitoringRecord;

    fn into_new(self) -> Result<MonitoringRecord, ModelError> {
        Ok(MonitoringRecord {
            negotiation_id: required(self.negotiation_id, "negotiation_id")?,
            start_date: self.start_date.into_option(),
            comments: self.comments.into_option(),
        })
    }

    fn apply(self, current: MonitoringRecord) -> MonitoringRecord {
        MonitoringRecord {
            negotiation_id: self.negotiation_id.unwrap_or(current.negotiation_id),
            start_date: self.start_date.apply(current.start_date),
            comments: self.comments.apply(current.comments),
        }
    }
}
