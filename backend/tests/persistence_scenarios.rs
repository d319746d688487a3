//! Database scenarios against an embedded PostgreSQL cluster.
//! Use `cargo test -- --ignored` with `RUN_PG_EMBEDDED=1` to run them.

#[path = "support/cluster_skip.rs"]
mod cluster_skip;
#[path = "support/pg_embed.rs"]
mod pg_embed;

use bookstore::domain::ports::{
    BookRepository, BookRepositoryError, CategoryRepository, CategoryRepositoryError,
};
use bookstore::domain::{BookDraft, CategoryDraft, Entity, EntityId};
use bookstore::outbound::persistence::{BookStoreContext, ConnectionConfig};
use chrono::NaiveDate;
use tokio::runtime::Runtime;

fn draft(category_id: EntityId) -> BookDraft {
    BookDraft {
        name: "The Name of the Rose".to_owned(),
        author: "Umberto Eco".to_owned(),
        description: "A murder mystery in a medieval abbey.".to_owned(),
        value: 14.99,
        publish_date: NaiveDate::from_ymd_opt(1980, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid date"),
        category_id,
    }
}

#[test]
#[ignore = "requires embedded Postgres binaries; opt-in via RUN_PG_EMBEDDED=1"]
fn empty_database_migrates_and_enforces_category_key() {
    if !cluster_skip::embedded_cluster_enabled() {
        eprintln!("SKIP-TEST-CLUSTER: set RUN_PG_EMBEDDED=1 to run");
        return;
    }

    let cluster = pg_embed::test_cluster().expect("embedded Postgres should start");
    let url = pg_embed::create_empty_database(&cluster).expect("create database");
    let runtime = Runtime::new().expect("Tokio runtime");

    runtime.block_on(async {
        let config = ConnectionConfig::parse(&url).expect("cluster URL is valid");
        let context = BookStoreContext::new(config);

        let pending = context.pending_migrations().await.expect("list pending");
        assert_eq!(pending.len(), 2);
        let applied = context.migrate().await.expect("apply migrations");
        assert_eq!(applied, pending, "applied in ascending order");
        assert!(
            context.migrate().await.expect("re-run").is_empty(),
            "current schema is a no-op"
        );

        let books = context.books();
        let categories = context.categories();
        assert!(books.list().await.expect("list books").is_empty());

        let fiction = categories
            .insert(&CategoryDraft {
                name: "Fiction".to_owned(),
            })
            .await
            .expect("insert category");
        let book = books
            .insert(&draft(fiction.id()))
            .await
            .expect("insert book");
        assert_eq!(book.category_id(), fiction.id());
        assert_eq!(
            books
                .list_by_category(fiction.id())
                .await
                .expect("list by category")
                .len(),
            1
        );

        let orphan = books.insert(&draft(EntityId::new(9_999))).await;
        assert_eq!(
            orphan.expect_err("foreign key rejects unknown category"),
            BookRepositoryError::unknown_category(9_999)
        );

        let in_use = categories.delete(fiction.id()).await;
        assert_eq!(
            in_use.expect_err("category still owns a book"),
            CategoryRepositoryError::in_use(fiction.id().get())
        );
    });
}
