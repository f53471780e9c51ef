//! Catalogue API handlers.
//!
//! ```text
//! GET /api/knife-types   Active catalogue entries in display order
//! ```

use actix_web::{get, web};

use crate::domain::ports::CatalogueRepositoryError;
use crate::domain::{Error, KnifeType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, ok};
use crate::inbound::http::state::HttpState;

pub(crate) fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => Error::service_unavailable(message),
        CatalogueRepositoryError::Query { message } => Error::internal(message),
    }
}

/// List active catalogue entries.
#[utoipa::path(
    get,
    path = "/api/knife-types",
    responses(
        (status = 200, description = "Active catalogue entries", body = [KnifeType]),
        (status = 503, description = "Catalogue unreachable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listKnifeTypes",
    security([])
)]
#[get("/knife-types")]
pub async fn list_knife_types(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Envelope<Vec<KnifeType>>>> {
    let entries = state
        .catalogue
        .list_active()
        .await
        .map_err(map_catalogue_error)?;
    Ok(ok(entries))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::Utc;
    use serde_json::Value;
    use std::sync::Arc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::MockCatalogueRepository;
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{TestApp, default_ports};

    fn entry(name: &str, order: i32) -> KnifeType {
        KnifeType {
            id: Uuid::new_v4(),
            name: name.into(),
            market_price: 10_000,
            discount_price: 5_000,
            image_url: None,
            is_active: true,
            display_order: order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn lists_active_entries_without_authentication() {
        let mut catalogue = MockCatalogueRepository::new();
        catalogue
            .expect_list_active()
            .returning(|| Ok(vec![entry("Chef knife", 0), entry("Paring knife", 1)]));
        let ports = HttpStatePorts {
            catalogue: Arc::new(catalogue),
            ..default_ports()
        };
        let app = TestApp::with_ports(ports).await;

        let res = app.get("/api/knife-types").await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body.get("success"), Some(&Value::Bool(true)));
        assert_eq!(
            body.pointer("/data/0/name"),
            Some(&Value::String("Chef knife".into()))
        );
    }

    #[actix_web::test]
    async fn unreachable_catalogue_maps_to_service_unavailable() {
        let mut catalogue = MockCatalogueRepository::new();
        catalogue
            .expect_list_active()
            .returning(|| Err(CatalogueRepositoryError::connection("refused")));
        let ports = HttpStatePorts {
            catalogue: Arc::new(catalogue),
            ..default_ports()
        };
        let app = TestApp::with_ports(ports).await;

        let res = app.get("/api/knife-types").await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
