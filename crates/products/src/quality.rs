use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use farmgate_core::{DomainError, DomainResult, ProductionId};

/// Quality grade assigned to a harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityGrade {
    Premium,
    Standard,
    Substandard,
    Rejected,
}

impl QualityGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityGrade::Premium => "premium",
            QualityGrade::Standard => "standard",
            QualityGrade::Substandard => "substandard",
            QualityGrade::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "premium" => Ok(QualityGrade::Premium),
            "standard" => Ok(QualityGrade::Standard),
            "substandard" => Ok(QualityGrade::Substandard),
            "rejected" => Ok(QualityGrade::Rejected),
            other => Err(DomainError::validation(format!(
                "unknown quality grade '{other}'"
            ))),
        }
    }
}

/// A quality assessment of one production cycle's harvest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub id: Uuid,
    pub production_id: ProductionId,
    pub grade: QualityGrade,
    pub notes: Option<String>,
    pub assessed_on: NaiveDate,
}

/// Validated input for recording an assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQualityAssessment {
    pub production_id: ProductionId,
    pub grade: QualityGrade,
    pub notes: Option<String>,
    pub assessed_on: NaiveDate,
}
