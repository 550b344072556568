use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use farmgate_core::{ActivityId, DomainError, DomainResult, FarmId};
use farmgate_supplies::UsageLine;

/// A scheduled farm task (fumigation, pruning, fence repair, ...) that may
/// consume supplies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub farm_id: FarmId,
    /// Free-form category (the original kept a lookup table of kinds).
    pub kind: String,
    pub description: Option<String>,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub usage_lines: Vec<UsageLine>,
}

/// Validated input for creating or replacing an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub farm_id: FarmId,
    pub kind: String,
    pub description: Option<String>,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub usage_lines: Vec<UsageLine>,
}

impl NewActivity {
    pub fn new(
        farm_id: FarmId,
        kind: String,
        description: Option<String>,
        starts_on: NaiveDate,
        ends_on: Option<NaiveDate>,
        usage_lines: Vec<UsageLine>,
    ) -> DomainResult<Self> {
        if kind.trim().is_empty() {
            return Err(DomainError::validation("activity kind cannot be empty"));
        }
        if let Some(end) = ends_on {
            if end < starts_on {
                return Err(DomainError::validation(
                    "activity cannot end before it starts",
                ));
            }
        }
        Ok(Self {
            farm_id,
            kind,
            description,
            starts_on,
            ends_on,
            usage_lines,
        })
    }

    pub fn into_activity(self, id: ActivityId) -> Activity {
        Activity {
            id,
            farm_id: self.farm_id,
            kind: self.kind,
            description: self.description,
            starts_on: self.starts_on,
            ends_on: self.ends_on,
            usage_lines: self.usage_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[test]
    fn rejects_end_before_start() {
        let err = NewActivity::new(
            FarmId::new(),
            "fumigation".into(),
            None,
            date(10),
            Some(date(9)),
            Vec::new(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_blank_kind() {
        let err = NewActivity::new(FarmId::new(), " ".into(), None, date(10), None, Vec::new());
        assert!(err.is_err());
    }
}
