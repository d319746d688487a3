//! Category aggregate: the one-side of the book relationship.

use std::fmt;

use super::entity::{Entity, EntityId};

/// Maximum length of a category name, matching the `categories.name` column.
pub const CATEGORY_NAME_MAX: usize = 150;

/// Validation errors returned by [`CategoryDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    /// Name is empty once trimmed.
    EmptyName,
    /// Name exceeds the column length.
    NameTooLong { max: usize },
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "category name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "category name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

/// Unsaved category contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    /// Display name.
    pub name: String,
}

impl CategoryDraft {
    /// Check the draft against the column constraints.
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if trimmed.chars().count() > CATEGORY_NAME_MAX {
            return Err(CategoryValidationError::NameTooLong {
                max: CATEGORY_NAME_MAX,
            });
        }
        Ok(())
    }
}

/// Persisted category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: EntityId,
    name: String,
}

impl Category {
    /// Validate `draft` and attach the store-assigned identity.
    pub fn new(id: EntityId, draft: CategoryDraft) -> Result<Self, CategoryValidationError> {
        draft.validate()?;
        Ok(Self {
            id,
            name: draft.name,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Category {
    const KIND: &'static str = "category";

    fn id(&self) -> EntityId {
        self.id
    }
}
