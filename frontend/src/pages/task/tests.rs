use serde_json::json;

use super::*;
use crate::shell::ViewId;
use crate::testing::*;

fn seed_task(h: &Harness) {
    h.client.ok("GET", "/tasks/42", to_json(&task(42, 1, "Сумма")));
    h.client.ok("GET", "/topics/1", to_json(&topic(1, "Основы")));
}

fn shown_task(h: &Harness) -> TaskPage {
    match h.shell.page(ViewId::Task) {
        Some(Page::Task(page)) => page,
        other => panic!("unexpected page: {other:?}"),
    }
}

#[test]
fn test_access_resolution() {
    let failed = attempt(1, 42, false);
    let passed = attempt(2, 42, true);

    assert_eq!(TaskAccess::resolve(false, &[passed.clone()]), TaskAccess::Guest);
    assert_eq!(TaskAccess::resolve(true, &[]), TaskAccess::Open);
    assert_eq!(TaskAccess::resolve(true, &[failed.clone()]), TaskAccess::Open);
    // 通过之后又有失败提交，仍然视为已完成
    assert_eq!(
        TaskAccess::resolve(true, &[passed, failed.clone(), failed]),
        TaskAccess::Passed
    );
}

#[tokio::test]
async fn test_guest_sees_login_prompt_without_attempt_fetch() {
    let h = Harness::new();
    seed_task(&h);

    h.render("#/task/42").await;

    let page = shown_task(&h);
    assert_eq!(page.access, TaskAccess::Guest);
    assert_eq!(page.topic_title, "Основы");
    assert!(!page.admin_controls);
    assert_eq!(h.client.count("GET", "/attempts/my/task/42"), 0);
}

#[tokio::test]
async fn test_passed_task_suppresses_form() {
    let h = Harness::new();
    seed_task(&h);
    h.login_as(user("ivan")).await;
    h.client.ok(
        "GET",
        "/attempts/my/task/42",
        to_json(&vec![attempt(3, 42, false), attempt(2, 42, true), attempt(1, 42, false)]),
    );

    h.render("#/task/42").await;

    let page = shown_task(&h);
    assert_eq!(page.access, TaskAccess::Passed);
    assert_eq!(page.attempts.len(), 3);
}

#[tokio::test]
async fn test_best_effort_fetches_do_not_abort() {
    let h = Harness::new();
    h.login_as(user("ivan")).await;
    h.client.ok("GET", "/tasks/42", to_json(&task(42, 1, "Сумма")));
    h.client.fail("GET", "/topics/1", 500, "boom");
    h.client.network_error("GET", "/attempts/my/task/42");

    h.render("#/task/42").await;

    let page = shown_task(&h);
    assert_eq!(page.topic_title, "");
    assert_eq!(page.access, TaskAccess::Open);
    assert!(page.attempts.is_empty());
}

#[tokio::test]
async fn test_test_panel_is_admin_only() {
    let h = Harness::new();
    seed_task(&h);
    h.client.ok("GET", "/attempts/my/task/42", json!([]));

    h.login_as(user("ivan")).await;
    h.render("#/task/42").await;
    assert!(!shown_task(&h).admin_controls);

    h.login_as(admin("root")).await;
    h.render("#/task/42").await;
    assert!(shown_task(&h).admin_controls);
}

#[tokio::test]
async fn test_empty_code_never_hits_network() {
    let h = Harness::new();
    seed_task(&h);
    h.login_as(user("ivan")).await;
    let before = h.client.requests().len();

    let err = submit_solution(&h.orchestrator, "42", "  \n ")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), EMPTY_CODE);
    assert_eq!(h.client.requests().len(), before);
}

#[tokio::test]
async fn test_submit_posts_once_and_rerenders_with_verdict() {
    let h = Harness::new();
    seed_task(&h);
    h.login_as(user("ivan")).await;
    h.client.ok("GET", "/attempts/my/task/42", json!([]));
    h.client.ok(
        "POST",
        "/tasks/42/submit",
        json!({ "passed": false, "passedTests": 2, "totalTests": 4, "message": "wrong output" }),
    );

    h.render("#/task/42").await;
    let result = submit_solution(&h.orchestrator, "42", "Сообщить(1);")
        .await
        .unwrap();

    assert!(!result.passed);
    assert_eq!(h.client.count("POST", "/tasks/42/submit"), 1);
    assert_eq!(h.client.count("GET", "/tasks/42"), 2);

    let submitted = h
        .client
        .requests()
        .into_iter()
        .find(|r| r.url.ends_with("/submit"))
        .unwrap();
    assert_eq!(
        submitted.body,
        Some(crate::web::HttpBody::Json(
            r#"{"taskId":42,"code":"Сообщить(1);"}"#.to_string()
        ))
    );

    let verdict = shown_task(&h).verdict.unwrap();
    assert_eq!(verdict.class(), "result-box error");
    assert!(verdict.text.contains("2/4"));
    assert!(verdict.text.contains("wrong output"));

    // 结果只显示一次
    h.orchestrator.rerender().await;
    assert!(shown_task(&h).verdict.is_none());
}

#[tokio::test]
async fn test_verdict_dropped_after_leaving_task() {
    let h = Harness::new();
    seed_task(&h);
    h.login_as(user("ivan")).await;
    h.client.ok("GET", "/attempts/my/task/42", json!([]));
    h.client.ok("GET", "/topics", json!([]));
    h.client.ok(
        "POST",
        "/tasks/42/submit",
        json!({ "passed": true, "passedTests": 4, "totalTests": 4 }),
    );
    h.client.slow("POST", "/tasks/42/submit");

    h.render("#/task/42").await;
    let (result, ()) = futures::join!(
        submit_solution(&h.orchestrator, "42", "Сообщить(1);"),
        h.render("#/"),
    );
    assert!(result.unwrap().passed);
    assert_eq!(h.shell.visible(), vec![ViewId::Main]);

    h.render("#/task/42").await;
    assert!(shown_task(&h).verdict.is_none());
}

#[tokio::test]
async fn test_submit_failure_is_returned_without_rerender() {
    let h = Harness::new();
    seed_task(&h);
    h.login_as(user("ivan")).await;
    h.client.ok("GET", "/attempts/my/task/42", json!([]));
    h.client.fail("POST", "/tasks/42/submit", 400, "Задача уже сдана");

    h.render("#/task/42").await;
    let err = submit_solution(&h.orchestrator, "42", "x")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Задача уже сдана");
    assert_eq!(h.client.count("GET", "/tasks/42"), 1);
}

#[tokio::test]
async fn test_add_test_requires_expected_output() {
    let h = Harness::new();

    let err = add_test(&h.ctx, "42", "1 2", "   ").await.unwrap_err();

    assert_eq!(err.to_string(), EMPTY_EXPECTED_OUTPUT);
    assert!(h.client.requests().is_empty());
}

#[tokio::test]
async fn test_add_test_posts_case() {
    let h = Harness::new();
    h.login_as(admin("root")).await;
    h.client.ok("POST", "/admin/tasks/42/tests", json!({ "message": "ok" }));

    add_test(&h.ctx, "42", "1 2", "3").await.unwrap();

    let sent = h.client.last().unwrap();
    assert_eq!(
        sent.body,
        Some(crate::web::HttpBody::Json(
            r#"{"input":"1 2","expectedOutput":"3"}"#.to_string()
        ))
    );
}

#[tokio::test]
async fn test_view_attempt_code_opens_window() {
    let h = Harness::new();
    h.login_as(user("ivan")).await;
    let mut stored = attempt(7, 42, true);
    stored.code = Some("Сообщить(\"<b>\");".to_string());
    h.client.ok("GET", "/attempts/7", to_json(&stored));

    view_attempt_code(&h.ctx, 7).await;
    view_attempt_code(&h.ctx, 8).await;

    assert_eq!(h.shell.code_windows(), vec!["Сообщить(\"<b>\");".to_string()]);
}
