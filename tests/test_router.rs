use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use harbor::http::request::{Method, RequestBuilder};
use harbor::http::response::StatusCode;
use harbor::router::{Handler, Router};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

fn served_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "harbor-router-{}-{}",
        std::process::id(),
        NEXT_DIR.fetch_add(1, Ordering::SeqCst)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_route_table_order() {
    let router = Router::new("/tmp");
    let handlers: Vec<Handler> = router.routes().iter().map(|r| r.handler).collect();

    assert_eq!(
        handlers,
        vec![
            Handler::Root,
            Handler::Echo,
            Handler::UserAgent,
            Handler::ReadFile,
            Handler::CreateFile,
        ]
    );
}

#[tokio::test]
async fn test_root_ok_without_body() {
    let router = Router::new(served_dir());
    let req = RequestBuilder::new().method(Method::GET).path("/").build().unwrap();

    let response = router.dispatch(&req).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_echo_plain() {
    let router = Router::new(served_dir());
    let req = RequestBuilder::new().method(Method::GET).path("/echo/abc").build().unwrap();

    let response = router.dispatch(&req).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"abc".to_vec());
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    assert_eq!(response.header("Content-Encoding"), None);
}

#[tokio::test]
async fn test_echo_gzip_content_length_matches_compressed_body() {
    let router = Router::new(served_dir());
    let req = RequestBuilder::new()
        .method(Method::GET)
        .path("/echo/abc")
        .header("Accept-Encoding", "gzip")
        .build()
        .unwrap();

    let response = router.dispatch(&req).await;

    assert_eq!(response.header("Content-Encoding"), Some("gzip"));
    assert_eq!(
        response.header("Content-Length"),
        Some(response.body.len().to_string().as_str())
    );
}

#[tokio::test]
async fn test_user_agent_missing_is_bad_request() {
    let router = Router::new(served_dir());
    let req = RequestBuilder::new().method(Method::GET).path("/user-agent").build().unwrap();

    let response = router.dispatch(&req).await;

    assert_eq!(response.status, StatusCode::BadRequest);
}

#[tokio::test]
async fn test_file_roundtrip_and_conflict() {
    let dir = served_dir();
    let router = Router::new(&dir);

    let post = RequestBuilder::new()
        .method(Method::POST)
        .path("/files/note.txt")
        .body(b"hello".to_vec())
        .build()
        .unwrap();
    let created = router.dispatch(&post).await;
    assert_eq!(created.status, StatusCode::Created);
    assert_eq!(created.body, b"File created".to_vec());

    let again = RequestBuilder::new()
        .method(Method::POST)
        .path("/files/note.txt")
        .body(b"other".to_vec())
        .build()
        .unwrap();
    assert_eq!(router.dispatch(&again).await.status, StatusCode::Conflict);
    assert_eq!(std::fs::read(dir.join("note.txt")).unwrap(), b"hello".to_vec());

    let get = RequestBuilder::new().method(Method::GET).path("/files/note.txt").build().unwrap();
    let fetched = router.dispatch(&get).await;
    assert_eq!(fetched.status, StatusCode::Ok);
    assert_eq!(fetched.header("Content-Type"), Some("application/octet-stream"));
    assert_eq!(fetched.body, b"hello".to_vec());
}

#[tokio::test]
async fn test_get_missing_file() {
    let router = Router::new(served_dir());
    let req = RequestBuilder::new().method(Method::GET).path("/files/missing.txt").build().unwrap();

    assert_eq!(router.dispatch(&req).await.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_get_directory_is_not_found() {
    let dir = served_dir();
    std::fs::create_dir_all(dir.join("sub")).unwrap();
    let router = Router::new(&dir);
    let req = RequestBuilder::new().method(Method::GET).path("/files/sub").build().unwrap();

    assert_eq!(router.dispatch(&req).await.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let router = Router::new(served_dir());
    let req = RequestBuilder::new()
        .method(Method::GET)
        .path("/files/../secret")
        .build()
        .unwrap();

    assert_eq!(router.dispatch(&req).await.status, StatusCode::BadRequest);
}

#[tokio::test]
async fn test_missing_served_directory_is_internal_error_on_post() {
    let dir = served_dir().join("does-not-exist");
    let router = Router::new(&dir);
    let req = RequestBuilder::new()
        .method(Method::POST)
        .path("/files/a.txt")
        .body(b"x".to_vec())
        .build()
        .unwrap();

    assert_eq!(router.dispatch(&req).await.status, StatusCode::InternalServerError);
}

#[tokio::test]
async fn test_concurrent_posts_single_winner() {
    let dir = served_dir();
    let router = std::sync::Arc::new(Router::new(&dir));

    let mut tasks = Vec::new();
    for i in 0..8 {
        let router = router.clone();
        tasks.push(tokio::spawn(async move {
            let req = RequestBuilder::new()
                .method(Method::POST)
                .path("/files/race.txt")
                .body(format!("writer-{}", i))
                .build()
                .unwrap();
            router.dispatch(&req).await.status
        }));
    }

    let mut created = 0;
    for task in tasks {
        if task.await.unwrap() == StatusCode::Created {
            created += 1;
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
async fn test_unknown_route_and_method() {
    let router = Router::new(served_dir());

    let unknown = RequestBuilder::new().method(Method::GET).path("/unknown/path").build().unwrap();
    assert_eq!(router.dispatch(&unknown).await.status, StatusCode::NotFound);

    let put = RequestBuilder::new().method(Method::PUT).path("/files/a").build().unwrap();
    assert_eq!(router.dispatch(&put).await.status, StatusCode::NotFound);
}
