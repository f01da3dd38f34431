//! End-to-end tests for the submission pipeline happy paths.

use std::time::{Duration, Instant};

use axum_test::TestServer;
use comment_core::{CommentStatus, MailSettings};
use integration_tests::{
    fixtures::{self, submit_body},
    setup::{test_config, TestContext},
};

#[tokio::test]
async fn anonymous_submission_is_stored_and_echoed() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/comment")
        .add_header("x-real-ip", "198.51.100.9")
        .json(&submit_body("/post/index.html"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "accept");
    assert_eq!(body["nick"], "visitor");
    assert!(!body["id"].as_str().unwrap().is_empty());

    // The stored record carries the normalized path and the client ip.
    let stored = ctx.store.dump();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].path, "/post/");
    assert_eq!(stored[0].ip, "198.51.100.9");
    assert_eq!(stored[0].status, CommentStatus::Accept);

    // The classifier saw a top-level submission.
    let seen = ctx.classifier.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].r#type, "comment");
    assert_eq!(seen[0].ip, "198.51.100.9");
}

#[tokio::test]
async fn response_never_carries_transient_or_private_fields() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/comment")
        .add_header("x-real-ip", "198.51.100.9")
        .json(&submit_body("/post/"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let obj = body.as_object().unwrap();

    for hidden in ["token", "type", "mail", "ip", "ua", "created"] {
        assert!(!obj.contains_key(hidden), "response leaked `{hidden}`");
    }
}

#[tokio::test]
async fn classifier_verdict_decides_status() {
    let ctx = TestContext::new();
    ctx.classifier.set_verdict(CommentStatus::Waiting);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/comment")
        .add_header("x-real-ip", "198.51.100.9")
        .json(&submit_body("/post/"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "waiting");
    assert_eq!(ctx.store.dump()[0].status, CommentStatus::Waiting);
}

#[tokio::test]
async fn privileged_token_skips_classifier_and_accepts() {
    let ctx = TestContext::new();
    ctx.classifier.set_verdict(CommentStatus::Spam);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let mut body = submit_body("/post/");
    body["token"] = fixtures::signed_token().into();

    let response = server
        .post("/comment")
        .add_header("x-real-ip", "198.51.100.9")
        .json(&body)
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "accept");
    assert_eq!(ctx.classifier.call_count(), 0);
}

#[tokio::test]
async fn classifier_failure_falls_back_without_rejecting() {
    let ctx = TestContext::new();
    ctx.classifier.set_should_fail(true);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/comment")
        .add_header("x-real-ip", "198.51.100.9")
        .json(&submit_body("/post/"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    // Default fallback admits the comment.
    assert_eq!(body["status"], "accept");
}

#[tokio::test]
async fn reply_submission_normalizes_thread_refs() {
    let ctx = TestContext::new();
    ctx.seed(vec![fixtures::comment("parent", "/post/", "", 60)])
        .await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let mut body = submit_body("/post/");
    body["rid"] = "parent".into();

    let response = server
        .post("/comment")
        .add_header("x-real-ip", "198.51.100.9")
        .json(&body)
        .await;
    response.assert_status_ok();

    let stored = ctx.store.dump();
    let reply = stored.iter().find(|c| c.rid == "parent").unwrap();
    assert_eq!(reply.pid, "parent", "pid defaults to rid");
    assert_eq!(ctx.classifier.seen()[0].r#type, "reply");
}

fn push_config() -> comment_core::CommentConfig {
    let mut config = test_config();
    config.push_url = Some("https://push.example.com/notify".into());
    config.mail = MailSettings {
        host: Some("smtp.example.com".into()),
        port: Some(465),
        from: Some("noreply@example.com".into()),
        accept: Some("owner@example.com".into()),
        master_subject: Some("New comment".into()),
        reply_subject: Some("New reply".into()),
    };
    config
}

#[tokio::test]
async fn notification_carries_credential_and_marker() {
    let ctx = TestContext::with_config(push_config());
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/comment")
        .add_header("x-real-ip", "198.51.100.9")
        .json(&submit_body("/post/"))
        .await;
    response.assert_status_ok();

    let events = ctx.notifier.captured();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].r#type, "PUSH_MAIL");
    assert_eq!(events[0].token.len(), 64);
    assert_eq!(events[0].comment.path, "/post/");
}

#[tokio::test]
async fn slow_notifier_never_blocks_the_submission() {
    let ctx = TestContext::with_config(push_config());
    ctx.notifier.set_delay(Duration::from_secs(3));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let start = Instant::now();
    let response = server
        .post("/comment")
        .add_header("x-real-ip", "198.51.100.9")
        .json(&submit_body("/post/"))
        .await;
    response.assert_status_ok();

    assert!(
        start.elapsed() < Duration::from_secs(2),
        "submission waited past the notification bound"
    );
    // The comment is durable even though the push never completed in time.
    assert_eq!(ctx.store.dump().len(), 1);
}

#[tokio::test]
async fn failed_notification_never_affects_the_result() {
    let ctx = TestContext::with_config(push_config());
    ctx.notifier.set_should_fail(true);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/comment")
        .add_header("x-real-ip", "198.51.100.9")
        .json(&submit_body("/post/"))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "accept");
    assert_eq!(ctx.store.dump().len(), 1);
}
