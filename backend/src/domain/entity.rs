//! Identity shared by every persisted entity.
//!
//! Entities do not inherit from a common base; each one carries its own
//! [`EntityId`] and implements [`Entity`] so persistence and HTTP code can
//! treat identities generically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned integer primary key.
///
/// Only the store hands out identifiers; unsaved values are represented by
/// draft types that carry no identity at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i32);

impl EntityId {
    /// Wrap a raw key read from the store or a request path.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw key for queries.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for EntityId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability implemented by every persisted domain object.
pub trait Entity {
    /// Singular, human-readable kind used in messages (`"book"`).
    const KIND: &'static str;

    /// Store-assigned identity.
    fn id(&self) -> EntityId;
}

/// Message used when an entity of kind `E` cannot be found.
///
/// # Examples
/// ```
/// use bookstore::domain::{Book, EntityId, not_found_message};
///
/// assert_eq!(not_found_message::<Book>(EntityId::new(4)), "book 4 not found");
/// ```
#[must_use]
pub fn not_found_message<E: Entity>(id: EntityId) -> String {
    format!("{} {id} not found", E::KIND)
}
