use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farmgate_core::{DomainError, DomainResult, PartyId};

/// Party kind: which persona role this record plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Client,
    Employee,
    Supplier,
}

impl PartyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyKind::Client => "client",
            PartyKind::Employee => "employee",
            PartyKind::Supplier => "supplier",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "client" => Ok(PartyKind::Client),
            "employee" => Ok(PartyKind::Employee),
            "supplier" => Ok(PartyKind::Supplier),
            other => Err(DomainError::validation(format!(
                "kind must be one of client, employee, supplier (got '{other}')"
            ))),
        }
    }
}

/// Contact information shared by all personas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A persona: client, employee or supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub kind: PartyKind,
    pub full_name: String,
    /// National document id (cedula / NIT).
    pub document_id: String,
    pub contact: ContactInfo,
    /// Employees: position on the farm.
    pub position: Option<String>,
    /// Suppliers: company they represent.
    pub company: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or replacing a party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParty {
    pub kind: PartyKind,
    pub full_name: String,
    pub document_id: String,
    pub contact: ContactInfo,
    pub position: Option<String>,
    pub company: Option<String>,
}

impl NewParty {
    pub fn new(
        kind: PartyKind,
        full_name: String,
        document_id: String,
        contact: ContactInfo,
        position: Option<String>,
        company: Option<String>,
    ) -> DomainResult<Self> {
        if full_name.trim().is_empty() {
            return Err(DomainError::validation("full name cannot be empty"));
        }
        if document_id.trim().is_empty() {
            return Err(DomainError::validation("document id cannot be empty"));
        }
        if position.is_some() && kind != PartyKind::Employee {
            return Err(DomainError::validation(
                "position is only valid for employees",
            ));
        }
        if company.is_some() && kind != PartyKind::Supplier {
            return Err(DomainError::validation(
                "company is only valid for suppliers",
            ));
        }
        Ok(Self {
            kind,
            full_name,
            document_id,
            contact,
            position,
            company,
        })
    }

    pub fn into_party(self, id: PartyId, created_at: DateTime<Utc>) -> Party {
        Party {
            id,
            kind: self.kind,
            full_name: self.full_name,
            document_id: self.document_id,
            contact: self.contact,
            position: self.position,
            company: self.company,
            active: true,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [PartyKind::Client, PartyKind::Employee, PartyKind::Supplier] {
            assert_eq!(PartyKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(PartyKind::parse("owner").is_err());
    }

    #[test]
    fn position_requires_employee_kind() {
        let err = NewParty::new(
            PartyKind::Client,
            "Ana Ruiz".into(),
            "1002003004".into(),
            ContactInfo::default(),
            Some("picker".into()),
            None,
        );
        assert!(err.is_err());
    }

    #[test]
    fn builds_active_party() {
        let party = NewParty::new(
            PartyKind::Supplier,
            "Agroinsumos SA".into(),
            "900123456".into(),
            ContactInfo::default(),
            None,
            Some("Agroinsumos".into()),
        )
        .unwrap()
        .into_party(PartyId::new(), Utc::now());
        assert!(party.active);
    }
}
