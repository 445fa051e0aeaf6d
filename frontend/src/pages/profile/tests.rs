use serde_json::json;

use super::*;
use crate::shell::ViewId;
use crate::testing::*;
use crate::web::FilePart;

fn shown_profile(h: &Harness) -> ProfilePage {
    match h.shell.page(ViewId::Profile) {
        Some(Page::Profile(page)) => page,
        other => panic!("unexpected page: {other:?}"),
    }
}

#[tokio::test]
async fn test_no_target_for_guest() {
    let h = Harness::new();

    h.render("#/profile").await;

    assert!(matches!(shown_profile(&h), ProfilePage::NoTarget));
    assert!(h.client.requests().is_empty());
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let h = Harness::new();
    h.client.fail("GET", "/profile/user/ghost", 404, "User not found");

    h.render("#/profile/ghost").await;

    assert_eq!(h.shell.visible(), vec![ViewId::Profile]);
    assert!(matches!(shown_profile(&h), ProfilePage::NotFound));
}

#[tokio::test]
async fn test_own_profile_shows_attempts() {
    let h = Harness::new();
    h.login_as(user("ivan")).await;
    h.client.ok("GET", "/profile/user/ivan", to_json(&user("ivan")));
    h.client.ok("GET", "/attempts/my", to_json(&vec![attempt(1, 42, true)]));

    h.render("#/profile").await;

    match shown_profile(&h) {
        ProfilePage::Found {
            user,
            is_me,
            attempts: AttemptsSection::Loaded(list),
        } => {
            assert_eq!(user.username, "ivan");
            assert!(is_me);
            assert_eq!(list.len(), 1);
        }
        other => panic!("unexpected profile: {other:?}"),
    }
}

#[tokio::test]
async fn test_other_profile_hides_attempts() {
    let h = Harness::new();
    h.login_as(user("ivan")).await;
    h.client.ok("GET", "/profile/user/anna", to_json(&user("anna")));

    h.render("#/profile/anna").await;

    match shown_profile(&h) {
        ProfilePage::Found {
            is_me, attempts, ..
        } => {
            assert!(!is_me);
            assert!(matches!(attempts, AttemptsSection::Hidden));
        }
        other => panic!("unexpected profile: {other:?}"),
    }
    assert_eq!(h.client.count("GET", "/attempts/my"), 0);
}

#[tokio::test]
async fn test_admin_sees_own_attempts_on_other_profile() {
    let h = Harness::new();
    h.login_as(admin("root")).await;
    h.client.ok("GET", "/profile/user/anna", to_json(&user("anna")));
    h.client.fail("GET", "/attempts/my", 500, "boom");

    h.render("#/profile/anna").await;

    match shown_profile(&h) {
        ProfilePage::Found {
            is_me, attempts, ..
        } => {
            assert!(!is_me);
            assert!(matches!(attempts, AttemptsSection::Failed));
        }
        other => panic!("unexpected profile: {other:?}"),
    }
    assert_eq!(h.client.count("GET", "/attempts/my"), 1);
}

#[tokio::test]
async fn test_update_profile_sends_only_changed_fields() {
    let h = Harness::new();
    h.login_as(user("ivan")).await;
    h.client.ok("GET", "/profile/user/ivan", to_json(&user("ivan")));
    h.client.ok("GET", "/attempts/my", json!([]));
    h.client.ok("PUT", "/profile/me", to_json(&user("ivan")));
    h.render("#/profile").await;

    update_profile(&h.orchestrator, "", "new-secret")
        .await
        .unwrap();

    let put = h
        .client
        .requests()
        .into_iter()
        .find(|r| r.method.as_str() == "PUT")
        .unwrap();
    assert_eq!(
        put.body,
        Some(crate::web::HttpBody::Json(
            r#"{"newPassword":"new-secret"}"#.to_string()
        ))
    );
    assert_eq!(h.shell.notices().len(), 1);
    assert_eq!(h.client.count("GET", "/profile/user/ivan"), 2);
}

#[tokio::test]
async fn test_update_profile_with_no_changes_is_rejected() {
    let h = Harness::new();
    h.login_as(user("ivan")).await;

    let err = update_profile(&h.orchestrator, " ", "").await.unwrap_err();

    assert_eq!(err.to_string(), NOTHING_TO_CHANGE);
    assert_eq!(h.client.count("PUT", "/profile/me"), 0);
}

fn avatar() -> FilePart {
    FilePart {
        name: "me.png".into(),
        mime: "image/png".into(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

#[tokio::test]
async fn test_upload_avatar_reloads_user() {
    let h = Harness::new();
    h.login_as(user("ivan")).await;
    h.client.ok("GET", "/profile/user/ivan", to_json(&user("ivan")));
    h.client.ok("GET", "/attempts/my", json!([]));
    h.render("#/profile").await;

    let mut updated = user("ivan");
    updated.avatar_path = Some("/uploads/ivan.png".into());
    h.client.ok("GET", "/profile/me", to_json(&updated));
    h.client.ok(
        "POST",
        "/profile/me/avatar",
        json!({ "avatarPath": "/uploads/ivan.png" }),
    );

    upload_avatar(&h.orchestrator, avatar()).await.unwrap();

    assert_eq!(
        h.ctx.session.current_user().unwrap().avatar_path.as_deref(),
        Some("/uploads/ivan.png")
    );
    assert_eq!(h.client.count("GET", "/profile/user/ivan"), 2);
}

#[tokio::test]
async fn test_upload_avatar_failure_message() {
    let h = Harness::new();
    h.login_as(user("ivan")).await;
    h.client.respond("POST", "/profile/me/avatar", 413, json!({}));

    let err = upload_avatar(&h.orchestrator, avatar()).await.unwrap_err();

    assert_eq!(err.to_string(), "Ошибка загрузки");
    assert_eq!(err.status(), Some(413));
}
