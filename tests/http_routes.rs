mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use cafe_api::app::build_app;
use tower::ServiceExt;

async fn get(app: &common::TestApp, path: &str) -> anyhow::Result<(StatusCode, serde_json::Value)> {
    let response = build_app(app.state.clone())
        .oneshot(Request::builder().uri(path).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn public_routes_are_served_at_the_root() -> anyhow::Result<()> {
    let app = common::setup().await?;
    app.category("bebidas").await?;
    app.product("Cortado", 1.9, "bebidas").await?;

    let (status, body) = get(&app, "/products").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Cortado");

    for path in ["/specials", "/categories", "/news", "/carousel"] {
        let (status, _) = get(&app, path).await?;
        assert_eq!(status, StatusCode::OK, "{path}");
    }

    let (status, _) = get(&app, &format!("/reservations/availability/{}", common::day(1))).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, "/api/products").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_a_bad_request_envelope() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let size = 9 * 1024 * 1024;
    let request = Request::builder()
        .method("POST")
        .uri("/admin/upload-image")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=cafe")
        .header(header::CONTENT_LENGTH, size)
        .body(Body::from(vec![0u8; size]))?;

    let response = build_app(app.state.clone()).oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    let detail = body["data"]["detail"].as_str().unwrap_or_default();
    assert!(detail.contains("exceeds"), "{detail}");
    Ok(())
}
