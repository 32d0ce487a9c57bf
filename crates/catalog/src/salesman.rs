use serde::{Deserialize, Serialize};

use stockhub_core::{DomainError, DomainResult, Entity, SalesmanId};

/// Contact information for a salesman.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Supplier-side salesman a purchase can be attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salesman {
    pub id: SalesmanId,
    pub name: String,
    #[serde(flatten)]
    pub contact: ContactInfo,
}

impl Salesman {
    pub fn new(id: SalesmanId, name: impl Into<String>, contact: ContactInfo) -> DomainResult<Self> {
        let salesman = Self {
            id,
            name: name.into(),
            contact,
        };
        salesman.check()?;
        Ok(salesman)
    }

    /// Check invariants on a record that came from elsewhere (e.g. JSON).
    pub fn check(&self) -> DomainResult<()> {
        if !self.id.is_set() {
            return Err(DomainError::invalid_id("salesman id cannot be zero"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("salesman name cannot be empty"));
        }
        if self.contact.email.as_deref().is_some_and(|e| !e.contains('@')) {
            return Err(DomainError::validation("salesman email is malformed"));
        }
        Ok(())
    }
}

impl Entity for Salesman {
    type Id = SalesmanId;

    fn id(&self) -> SalesmanId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_fields_are_flattened_on_the_wire() {
        let s: Salesman =
            serde_json::from_str(r#"{"id": 2, "name": "Budi", "phone": "0812"}"#).unwrap();
        assert_eq!(s.contact.phone.as_deref(), Some("0812"));
        assert_eq!(s.contact.email, None);
    }

    #[test]
    fn malformed_email_is_rejected() {
        let contact = ContactInfo {
            email: Some("nope".into()),
            ..ContactInfo::default()
        };
        assert!(Salesman::new(SalesmanId::new(1), "Sari", contact).is_err());
    }

    #[test]
    fn decoded_records_are_checked() {
        let s: Salesman =
            serde_json::from_str(r#"{"id": 2, "name": "Budi", "email": "budi.example"}"#).unwrap();
        assert!(matches!(s.check(), Err(DomainError::Validation(_))));
        let s: Salesman = serde_json::from_str(r#"{"id": 0, "name": "Budi"}"#).unwrap();
        assert!(matches!(s.check(), Err(DomainError::InvalidId(_))));
    }
}
