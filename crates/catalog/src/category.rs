use serde::{Deserialize, Serialize};

use stockhub_core::{CategoryId, DomainError, DomainResult, Entity};

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Category {
    pub fn new(
        id: CategoryId,
        name: impl Into<String>,
        description: Option<String>,
    ) -> DomainResult<Self> {
        let category = Self {
            id,
            name: name.into(),
            description: description.filter(|d| !d.trim().is_empty()),
        };
        category.check()?;
        Ok(category)
    }

    /// Check invariants on a record that came from elsewhere (e.g. JSON).
    pub fn check(&self) -> DomainResult<()> {
        if !self.id.is_set() {
            return Err(DomainError::invalid_id("category id cannot be zero"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        Ok(())
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}
