//! Helpers shared by the entity endpoints.

use actix_web::{HttpResponse, http::header};
use serde::Serialize;

use crate::domain::{Entity, EntityId, Error, not_found_message};

/// `201 Created` with a `Location` pointing at the new entity.
pub(crate) fn created<E, T>(collection: &str, entity: &E, body: T) -> HttpResponse
where
    E: Entity,
    T: Serialize,
{
    HttpResponse::Created()
        .insert_header((header::LOCATION, format!("{collection}/{}", entity.id())))
        .json(body)
}

/// Reject a body whose id disagrees with the path.
///
/// A body without an id is taken to mean the path id.
pub(crate) fn ensure_matching_id(path_id: EntityId, body_id: Option<i32>) -> Result<(), Error> {
    match body_id {
        Some(body_id) if body_id != path_id.get() => Err(Error::invalid_request(format!(
            "body id {body_id} does not match path id {path_id}"
        ))
        .with_details(serde_json::json!({ "field": "id" }))),
        _ => Ok(()),
    }
}

/// `not_found` error for entity kind `E`.
pub(crate) fn missing<E: Entity>(id: EntityId) -> Error {
    Error::not_found(not_found_message::<E>(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Book, ErrorCode};
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(7))]
    fn accepts_absent_or_equal_body_id(#[case] body_id: Option<i32>) {
        assert!(ensure_matching_id(EntityId::new(7), body_id).is_ok());
    }

    #[rstest]
    fn rejects_mismatched_body_id() {
        let err = ensure_matching_id(EntityId::new(7), Some(8)).expect_err("ids differ");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "body id 8 does not match path id 7");
    }

    #[rstest]
    fn missing_names_the_entity_kind() {
        let err = missing::<Book>(EntityId::new(2));
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "book 2 not found");
    }
}
