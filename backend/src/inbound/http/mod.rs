//! HTTP inbound adapter exposing REST endpoints.

pub mod books;
pub mod categories;
pub mod error;
pub mod health;
mod resource;
pub mod schemas;
pub mod state;

use actix_web::web;

pub use error::ApiResult;

/// Register the entity endpoints and extractor error handlers.
///
/// Mount under `/api`:
///
/// ```
/// use actix_web::{App, web};
/// use bookstore::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(categories::list_categories)
        .service(categories::get_category)
        .service(categories::create_category)
        .service(categories::update_category)
        .service(categories::delete_category)
        .service(books::list_books)
        .service(books::list_books_by_category)
        .service(books::get_book)
        .service(books::create_book)
        .service(books::update_book)
        .service(books::delete_book);
}
