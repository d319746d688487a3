//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. When a migration
//! changes the schema, regenerate with `diesel print-schema` or update by hand.

diesel::table! {
    /// Book categories. Referenced by `books.category_id`.
    categories (id) {
        /// Primary key assigned by the `SERIAL` sequence.
        id -> Int4,
        #[max_length = 150]
        name -> Varchar,
    }
}

diesel::table! {
    /// Books. Each row belongs to exactly one category.
    books (id) {
        /// Primary key assigned by the `SERIAL` sequence.
        id -> Int4,
        #[max_length = 150]
        name -> Varchar,
        #[max_length = 150]
        author -> Varchar,
        #[max_length = 350]
        description -> Varchar,
        /// Price.
        value -> Float8,
        publish_date -> Timestamp,
        /// Foreign key to `categories.id` (`ON DELETE RESTRICT`).
        category_id -> Int4,
    }
}

diesel::joinable!(books -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(books, categories);
