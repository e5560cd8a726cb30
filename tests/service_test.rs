mod common;

use axum::body::to_bytes;
use axum::extract::{Json, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use std::sync::Arc;
use tessprep::configs::ConvertConfig;
use tessprep::service::{
    handle_convert, handle_health, handle_prepare, router, AppState, ConvertRequest, ServiceError,
};
use tessprep::types::StructureStrategy;
use tessprep::LabelOverrides;

fn state() -> Arc<AppState> {
    Arc::new(AppState::new(ConvertConfig::default()))
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_prepare_returns_suggestions() {
    let raw = common::load_fixture("propertius_elegies.xml");
    let Json(response) = handle_prepare(State(state()), raw).await.unwrap();

    assert_eq!(response.author, "prop.");
    assert_eq!(response.title, "eleg.");
    assert_eq!(response.structure, "book.poem.line");
    assert_eq!(response.strategy, StructureStrategy::Exact);
    assert_eq!(response.filename, "prop.eleg.tess");
}

#[tokio::test]
async fn test_convert_returns_attachment() {
    let request = ConvertRequest {
        document: common::load_fixture("ausonius_eclogae.xml"),
        overrides: LabelOverrides {
            author: Some("aus.".to_string()),
            title: Some("ecl.".to_string()),
            structure: None,
        },
    };
    let response = handle_convert(State(state()), Json(request)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename*=UTF-8''aus.ecl.tess"
    );
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        body_text(response).await,
        "<aus. ecl. 1.13>\t\u{201C}Pacatum haut dubie, poeta, dicis?\u{201D}"
    );
}

#[tokio::test]
async fn test_filename_with_spaces_is_percent_encoded() {
    let request = ConvertRequest {
        document: common::load_fixture("curtius_historiae.xml"),
        overrides: LabelOverrides::default(),
    };
    let response = handle_convert(State(state()), Json(request)).await.unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename*=UTF-8''curtius%20rufus%2C%20quintus.historiae%20alexandri%20magni.tess"
    );
}

#[test]
fn test_convert_request_flattens_overrides() {
    let request: ConvertRequest = serde_json::from_value(json!({
        "document": "<TEI/>",
        "author": "curt.",
        "structure": "book.chapter"
    }))
    .unwrap();
    assert_eq!(request.document, "<TEI/>");
    assert_eq!(request.overrides.author.as_deref(), Some("curt."));
    assert_eq!(request.overrides.title, None);
    assert_eq!(request.overrides.structure.as_deref(), Some("book.chapter"));
}

#[tokio::test]
async fn test_lookup_failure_is_unprocessable() {
    let raw = common::load_fixture("catullus_carmina.xml");
    let err = handle_prepare(State(state()), raw).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(body["error"].as_str().unwrap().contains("citation structure"));
}

#[tokio::test]
async fn test_malformed_document_is_a_bad_request() {
    let request = ConvertRequest {
        document: "<TEI><text></TEI>".to_string(),
        overrides: LabelOverrides::default(),
    };
    let err = handle_convert(State(state()), Json(request)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_timeout_maps_to_gateway_timeout() {
    assert_eq!(ServiceError::Timeout(30).status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(
        ServiceError::Internal("boom".to_string()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_health_and_router() {
    assert_eq!(handle_health().await, "ok");
    let _app = router(state());
}
