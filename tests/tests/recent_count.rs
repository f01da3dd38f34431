//! End-to-end tests for recent comments and batched counts.

use axum_test::TestServer;
use comment_core::CommentStatus;
use integration_tests::{
    fixtures::{comment, comment_with_status},
    setup::{test_config, TestContext},
};

async fn seeded_context() -> TestContext {
    let mut config = test_config();
    config.comment_count = 5;
    let ctx = TestContext::with_config(config);

    let mut seeds = Vec::new();
    for i in 1..=8 {
        seeds.push(comment(&format!("a{i}"), "/a/", "", i * 10));
    }
    seeds.push(comment("reply", "/a/", "a1", 1));
    seeds.push(comment_with_status("hidden", "/a/", 2, CommentStatus::Waiting));
    seeds.push(comment("c1", "/c/", "", 50));
    ctx.seed(seeds).await;
    ctx
}

#[tokio::test]
async fn recent_returns_newest_accepted_first_with_cap() {
    let ctx = seeded_context().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/comment/recent").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let comments = body.as_array().unwrap();

    assert_eq!(comments.len(), 5, "capped at the configured page size");
    assert_eq!(comments[0]["id"], "reply", "newest overall leads");
    assert!(comments.iter().all(|c| c["id"] != "hidden"));
}

#[tokio::test]
async fn recent_can_exclude_replies() {
    let ctx = seeded_context().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .get("/comment/recent")
        .add_query_param("reply", "false")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let comments = body.as_array().unwrap();

    assert!(comments.iter().all(|c| c["pid"] == ""));
    assert_eq!(comments[0]["id"], "a1");
}

#[tokio::test]
async fn counts_mirror_input_order_and_length() {
    let ctx = seeded_context().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/comment/count")
        .json(&serde_json::json!({
            "paths": ["/b/", "/a/index.html", "/c/"]
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let counts = body.as_array().unwrap();

    assert_eq!(counts.len(), 3);
    assert_eq!(counts[0]["path"], "/b/");
    assert_eq!(counts[0]["count"], 0);
    // 8 top-level + 1 reply, the waiting comment does not count.
    assert_eq!(counts[1]["path"], "/a/");
    assert_eq!(counts[1]["count"], 9);
    assert_eq!(counts[2]["path"], "/c/");
    assert_eq!(counts[2]["count"], 1);
}

#[tokio::test]
async fn counts_can_exclude_replies() {
    let ctx = seeded_context().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/comment/count")
        .json(&serde_json::json!({
            "paths": ["/a/"],
            "reply": false
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body[0]["count"], 8);
}
