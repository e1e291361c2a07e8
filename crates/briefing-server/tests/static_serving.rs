use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use briefing_db::{create_pool, DbRuntimeSettings};
use briefing_server::{app, AppState};
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot

/// Builds an app whose frontend directory lives inside `dir`.
fn test_app(dir: &TempDir) -> Router {
    let db_path = dir.path().join("briefing.db");
    let pool = create_pool(db_path.to_str().unwrap(), DbRuntimeSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        briefing_db::run_migrations(&conn).unwrap();
    }

    let upload_dir = dir.path().join("uploads");
    std::fs::create_dir_all(&upload_dir).unwrap();

    let state = AppState {
        pool,
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        frontend_dir: dir.path().join("frontend").to_string_lossy().into_owned(),
    };
    app(state)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn serves_index_at_root() {
    let dir = tempfile::tempdir().unwrap();
    let frontend = dir.path().join("frontend");
    std::fs::create_dir_all(&frontend).unwrap();
    std::fs::write(
        frontend.join("index.html"),
        "<!DOCTYPE html><h1>Briefing de Projetos</h1>",
    )
    .unwrap();

    let app = test_app(&dir);

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8(body.to_vec())
        .unwrap()
        .contains("Briefing de Projetos"));
}

#[tokio::test]
async fn serves_static_assets() {
    let dir = tempfile::tempdir().unwrap();
    let static_dir = dir.path().join("frontend").join("static");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("app.js"), "console.log('oi');").unwrap();

    let app = test_app(&dir);

    let (status, body) = get(&app, "/static/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log('oi');");
}

#[tokio::test]
async fn missing_static_asset_is_404() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("frontend").join("static")).unwrap();

    let app = test_app(&dir);

    let (status, _) = get(&app, "/static/nope.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_index_is_404() {
    let dir = tempfile::tempdir().unwrap();
    // No frontend directory at all.
    let app = test_app(&dir);

    let (status, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
