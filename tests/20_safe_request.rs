mod common;

use bambino_admin::app::LoginAffordance;
use bambino_admin::error::ApiError;
use bambino_admin::session::ModalState;
use common::{wait_until, Harness};
use httpmock::prelude::*;
use serde_json::json;
use std::cell::RefCell;

const CONTEXT: &str = "Tu sesión ha expirado";

#[tokio::test]
async fn expired_session_reports_once_and_reopens_login_modal() {
    let h = Harness::logged_in().await;
    h.server.mock(|when, then| {
        when.method(GET).path("/profiles/3");
        then.status(401);
    });

    let reported = RefCell::new(Vec::new());
    let result = h
        .app
        .guard
        .safe_request(|| h.app.profiles.get(3), |msg| reported.borrow_mut().push(msg.to_string()), CONTEXT)
        .await;

    assert_eq!(result, Ok(None));
    assert_eq!(reported.into_inner(), vec![CONTEXT.to_string()]);
    // not immediately
    assert_eq!(h.app.session.modal(), ModalState::None);

    h.app.guard.settle().await;
    assert_eq!(h.app.session.modal(), ModalState::Login);
    assert!(h.navigator.routes().is_empty());
}

#[tokio::test]
async fn expired_session_without_modal_redirects_to_login() {
    let h = Harness::start(LoginAffordance::Redirect, true).await;
    h.server.mock(|when, then| {
        when.method(GET).path("/user-relationships/9");
        then.status(401);
    });

    let result = h
        .app
        .guard
        .safe_request(|| h.app.relationships.get(9), |_| {}, CONTEXT)
        .await;
    assert_eq!(result, Ok(None));

    let navigator = h.navigator.clone();
    assert!(wait_until(move || navigator.routes() == vec!["/login".to_string()]).await);
    assert_eq!(h.app.session.modal(), ModalState::None);
}

#[tokio::test]
async fn burst_of_expirations_schedules_one_recovery() {
    let h = Harness::start(LoginAffordance::Redirect, true).await;
    h.server.mock(|when, then| {
        when.method(GET).path_matches(r"^/users/\d+$");
        then.status(401);
    });

    for id in 1..=3 {
        let result = h.app.guard.safe_request(|| h.app.users.get(id), |_| {}, CONTEXT).await;
        assert_eq!(result, Ok(None));
    }
    h.app.guard.settle().await;

    assert_eq!(h.navigator.routes().len(), 1);
}

#[tokio::test]
async fn other_failures_are_returned_to_the_caller() {
    let h = Harness::logged_in().await;
    h.server.mock(|when, then| {
        when.method(GET).path("/profiles/3");
        then.status(403).json_body(json!({"detail": "Not enough permissions"}));
    });

    let reported = RefCell::new(0);
    let result = h
        .app
        .guard
        .safe_request(|| h.app.profiles.get(3), |_| *reported.borrow_mut() += 1, CONTEXT)
        .await;

    assert_eq!(result, Err(ApiError::Forbidden("Not enough permissions".to_string())));
    assert_eq!(*reported.borrow(), 0);
    assert!(!h.app.guard.has_pending_recovery());
    assert!(h.app.session.is_authenticated());
}

#[tokio::test]
async fn validation_details_become_field_errors() {
    let h = Harness::logged_in().await;
    h.server.mock(|when, then| {
        when.method(PATCH).path("/profiles/3");
        then.status(422).json_body(json!({
            "detail": [{"loc": ["body", "mobile_phone"], "msg": "invalid phone", "type": "value_error"}]
        }));
    });

    let update = bambino_admin::models::ProfileUpdate {
        mobile_phone: Some("abc".to_string()),
        ..Default::default()
    };
    let err = h
        .app
        .guard
        .safe_request(|| h.app.profiles.update(3, &update), |_| {}, CONTEXT)
        .await
        .expect_err("validation error");

    assert!(matches!(err, ApiError::Validation { .. }));
    let fields = err.field_errors().expect("field errors");
    assert_eq!(fields.get("mobile_phone").map(String::as_str), Some("invalid phone"));
}

#[tokio::test]
async fn immediate_shutdown_drops_pending_recovery() {
    let h = Harness::start(LoginAffordance::Redirect, true).await;
    h.server.mock(|when, then| {
        when.method(GET).path("/users/2");
        then.status(401);
    });

    let result = h.app.guard.safe_request(|| h.app.users.get(2), |_| {}, CONTEXT).await;
    assert_eq!(result, Ok(None));
    assert!(h.app.guard.has_pending_recovery());

    h.app.shutdown_now();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    assert!(!h.app.guard.has_pending_recovery());
    assert!(h.navigator.routes().is_empty());
}
