//! Book aggregate.
//!
//! A book always belongs to exactly one category. The reference is only a key
//! here; the store's foreign key decides whether it points at a real row.

use std::fmt;

use chrono::NaiveDateTime;

use super::entity::{Entity, EntityId};

/// Maximum length of a book name.
pub const BOOK_NAME_MAX: usize = 150;
/// Maximum length of an author name.
pub const BOOK_AUTHOR_MAX: usize = 150;
/// Maximum length of a description.
pub const BOOK_DESCRIPTION_MAX: usize = 350;

/// Validation errors returned by [`BookDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    /// Name is empty once trimmed.
    EmptyName,
    /// Name exceeds the column length.
    NameTooLong { max: usize },
    /// Author is empty once trimmed.
    EmptyAuthor,
    /// Author exceeds the column length.
    AuthorTooLong { max: usize },
    /// Description exceeds the column length.
    DescriptionTooLong { max: usize },
    /// Value is negative, infinite or NaN.
    InvalidValue,
}

impl fmt::Display for BookValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "book name must not be empty"),
            Self::NameTooLong { max } => write!(f, "book name must be at most {max} characters"),
            Self::EmptyAuthor => write!(f, "author must not be empty"),
            Self::AuthorTooLong { max } => write!(f, "author must be at most {max} characters"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
            Self::InvalidValue => write!(f, "value must be a finite, non-negative number"),
        }
    }
}

impl std::error::Error for BookValidationError {}

/// Unsaved book contents.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub name: String,
    pub author: String,
    pub description: String,
    pub value: f64,
    pub publish_date: NaiveDateTime,
    pub category_id: EntityId,
}

fn check_text(
    value: &str,
    max: usize,
    empty: Option<BookValidationError>,
    too_long: BookValidationError,
) -> Result<(), BookValidationError> {
    let trimmed = value.trim();
    if let Some(empty) = empty
        && trimmed.is_empty()
    {
        return Err(empty);
    }
    if trimmed.chars().count() > max {
        return Err(too_long);
    }
    Ok(())
}

impl BookDraft {
    /// Check the draft against the column constraints.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        check_text(
            &self.name,
            BOOK_NAME_MAX,
            Some(BookValidationError::EmptyName),
            BookValidationError::NameTooLong { max: BOOK_NAME_MAX },
        )?;
        check_text(
            &self.author,
            BOOK_AUTHOR_MAX,
            Some(BookValidationError::EmptyAuthor),
            BookValidationError::AuthorTooLong {
                max: BOOK_AUTHOR_MAX,
            },
        )?;
        check_text(
            &self.description,
            BOOK_DESCRIPTION_MAX,
            None,
            BookValidationError::DescriptionTooLong {
                max: BOOK_DESCRIPTION_MAX,
            },
        )?;
        if !self.value.is_finite() || self.value.is_sign_negative() {
            return Err(BookValidationError::InvalidValue);
        }
        Ok(())
    }
}

/// Persisted book.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    id: EntityId,
    draft: BookDraft,
}

impl Book {
    /// Validate `draft` and attach the store-assigned identity.
    pub fn new(id: EntityId, draft: BookDraft) -> Result<Self, BookValidationError> {
        draft.validate()?;
        Ok(Self { id, draft })
    }

    /// Title.
    pub fn name(&self) -> &str {
        &self.draft.name
    }

    /// Author name.
    pub fn author(&self) -> &str {
        &self.draft.author
    }

    /// Free-text description; may be empty.
    pub fn description(&self) -> &str {
        &self.draft.description
    }

    /// Price.
    pub fn value(&self) -> f64 {
        self.draft.value
    }

    /// Publication timestamp, without a time zone.
    pub fn publish_date(&self) -> NaiveDateTime {
        self.draft.publish_date
    }

    /// Key of the owning category.
    pub fn category_id(&self) -> EntityId {
        self.draft.category_id
    }
}

impl Entity for Book {
    const KIND: &'static str = "book";

    fn id(&self) -> EntityId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> BookDraft {
        BookDraft {
            name: "The Hobbit".to_owned(),
            author: "J. R. R. Tolkien".to_owned(),
            description: String::new(),
            value: 12.5,
            publish_date: NaiveDate::from_ymd_opt(1937, 9, 21)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .expect("valid date"),
            category_id: EntityId::new(1),
        }
    }

    #[rstest]
    fn accepts_empty_description(draft: BookDraft) {
        assert_eq!(draft.validate(), Ok(()));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(-0.01)]
    fn rejects_invalid_values(mut draft: BookDraft, #[case] value: f64) {
        draft.value = value;
        assert_eq!(draft.validate(), Err(BookValidationError::InvalidValue));
    }

    #[rstest]
    fn rejects_blank_author(mut draft: BookDraft) {
        draft.author = " ".to_owned();
        assert_eq!(draft.validate(), Err(BookValidationError::EmptyAuthor));
    }

    #[rstest]
    fn rejects_long_description(mut draft: BookDraft) {
        draft.description = "d".repeat(BOOK_DESCRIPTION_MAX + 1);
        assert_eq!(
            draft.validate(),
            Err(BookValidationError::DescriptionTooLong {
                max: BOOK_DESCRIPTION_MAX
            })
        );
    }

    #[rstest]
    fn new_exposes_fields(draft: BookDraft) {
        let book = Book::new(EntityId::new(9), draft.clone()).expect("valid book");
        assert_eq!(book.id(), EntityId::new(9));
        assert_eq!(book.name(), draft.name);
        assert_eq!(book.category_id(), EntityId::new(1));
    }
}
