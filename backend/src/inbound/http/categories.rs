//! Category endpoints.
//!
//! ```text
//! GET    /api/categories
//! GET    /api/categories/{id}
//! POST   /api/categories
//! PUT    /api/categories/{id}
//! DELETE /api/categories/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Category, CategoryDraft, Entity, EntityId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::resource::{created, ensure_matching_id, missing};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const COLLECTION: &str = "/api/categories";

/// Category as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Fantasy")]
    pub name: String,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id().get(),
            name: category.name().to_owned(),
        }
    }
}

/// Category create/update payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    /// Ignored on create; must match the path on update when present.
    #[serde(default)]
    pub id: Option<i32>,
    #[schema(example = "Fantasy", max_length = 150)]
    pub name: String,
}

impl CategoryRequest {
    fn into_draft(self) -> Result<CategoryDraft, Error> {
        let draft = CategoryDraft { name: self.name };
        draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(draft)
    }
}

fn to_responses(categories: &[Category]) -> Vec<CategoryResponse> {
    categories.iter().map(CategoryResponse::from).collect()
}

/// List all categories.
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories", body = [CategoryResponse]),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "listCategories"
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CategoryResponse>>> {
    let categories = state.categories.list().await?;
    Ok(web::Json(to_responses(&categories)))
}

/// Fetch one category.
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "No such category", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "getCategory"
)]
#[get("/categories/{id}")]
pub async fn get_category(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<CategoryResponse>> {
    let id = EntityId::new(path.into_inner());
    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| missing::<Category>(id))?;
    Ok(web::Json(CategoryResponse::from(&category)))
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryRequest,
    responses(
        (
            status = 201,
            description = "Category created",
            headers(("Location" = String, description = "URL of the new category")),
            body = CategoryResponse
        ),
        (status = 400, description = "Invalid payload", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "createCategory"
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let category = state.categories.insert(&draft).await?;
    Ok(created(COLLECTION, &category, CategoryResponse::from(&category)))
}

/// Rename a category.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid payload or id mismatch", body = ErrorSchema),
        (status = 404, description = "No such category", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "updateCategory"
)]
#[put("/categories/{id}")]
pub async fn update_category(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<web::Json<CategoryResponse>> {
    let id = EntityId::new(path.into_inner());
    let payload = payload.into_inner();
    ensure_matching_id(id, payload.id)?;
    let draft = payload.into_draft()?;
    let category = state
        .categories
        .update(id, &draft)
        .await?
        .ok_or_else(|| missing::<Category>(id))?;
    Ok(web::Json(CategoryResponse::from(&category)))
}

/// Delete a category that owns no books.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "No such category", body = ErrorSchema),
        (status = 409, description = "Category still has books", body = ErrorSchema)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory"
)]
#[delete("/categories/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = EntityId::new(path.into_inner());
    if state.categories.delete(id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(missing::<Category>(id))
    }
}
