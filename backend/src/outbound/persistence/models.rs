//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::{Book, BookDraft, Category, CategoryDraft, EntityId};

use super::schema::{books, categories};

/// Row struct for reading from the categories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i32,
    pub name: String,
}

/// Insertable and changeset struct for category writes.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = categories)]
pub(crate) struct CategoryChanges<'a> {
    pub name: &'a str,
}

impl<'a> From<&'a CategoryDraft> for CategoryChanges<'a> {
    fn from(draft: &'a CategoryDraft) -> Self {
        Self {
            name: draft.name.trim(),
        }
    }
}

impl TryFrom<CategoryRow> for Category {
    type Error = crate::domain::CategoryValidationError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Category::new(EntityId::new(row.id), CategoryDraft { name: row.name })
    }
}

/// Row struct for reading from the books table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub description: String,
    pub value: f64,
    pub publish_date: NaiveDateTime,
    pub category_id: i32,
}

/// Insertable and changeset struct for book writes.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = books)]
pub(crate) struct BookChanges<'a> {
    pub name: &'a str,
    pub author: &'a str,
    pub description: &'a str,
    pub value: f64,
    pub publish_date: NaiveDateTime,
    pub category_id: i32,
}

impl<'a> From<&'a BookDraft> for BookChanges<'a> {
    fn from(draft: &'a BookDraft) -> Self {
        Self {
            name: draft.name.trim(),
            author: draft.author.trim(),
            description: draft.description.trim(),
            value: draft.value,
            publish_date: draft.publish_date,
            category_id: draft.category_id.get(),
        }
    }
}

impl TryFrom<BookRow> for Book {
    type Error = crate::domain::BookValidationError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let BookRow {
            id,
            name,
            author,
            description,
            value,
            publish_date,
            category_id,
        } = row;
        Book::new(
            EntityId::new(id),
            BookDraft {
                name,
                author,
                description,
                value,
                publish_date,
                category_id: EntityId::new(category_id),
            },
        )
    }
}
