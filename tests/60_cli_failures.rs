mod common;

use bambino_admin::cli::utils::{delete_via_screen, guarded, print_list_page};
use bambino_admin::cli::OutputFormat;
use bambino_admin::error::ApiError;
use common::Harness;
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn missing_record_fails_the_command() {
    let h = Harness::logged_in().await;
    h.server.mock(|when, then| {
        when.method(GET).path("/profiles/99");
        then.status(404).json_body(json!({"detail": "Profile not found"}));
    });

    let result = guarded(&h.app, &OutputFormat::Json, "ctx", || h.app.profiles.get(99)).await;

    let err = result.expect_err("404 must fail the command");
    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::NotFound(_))));
}

#[tokio::test]
async fn expired_session_fails_the_command() {
    let h = Harness::logged_in().await;
    h.server.mock(|when, then| {
        when.method(GET).path("/users/4");
        then.status(401);
    });

    let result = guarded(&h.app, &OutputFormat::Text, "Sesión expirada", || h.app.users.get(4)).await;

    assert_eq!(result.expect_err("expired").to_string(), "Sesión expirada");
}

#[tokio::test]
async fn forbidden_delete_fails_the_command() {
    let h = Harness::logged_in().await;
    h.server.mock(|when, then| {
        when.method(DELETE).path("/profiles/10");
        then.status(403).json_body(json!({"detail": "Not enough permissions"}));
    });

    let screen = h.app.profiles_screen();
    let result = delete_via_screen(&screen, 10, &OutputFormat::Text, "Profile").await;

    assert_eq!(
        result.expect_err("403 must fail the command").to_string(),
        "No tienes permisos para eliminar este perfil"
    );
}

#[tokio::test]
async fn successful_delete_succeeds() {
    let h = Harness::logged_in().await;
    h.server.mock(|when, then| {
        when.method(DELETE).path("/profiles/10");
        then.status(204);
    });

    let screen = h.app.profiles_screen();
    assert!(delete_via_screen(&screen, 10, &OutputFormat::Json, "Profile").await.is_ok());
}

#[tokio::test]
async fn failed_list_load_fails_the_command() {
    let h = Harness::logged_in().await;
    h.server.mock(|when, then| {
        when.method(GET).path("/profiles");
        then.status(500);
    });

    let screen = h.app.profiles_screen();
    let result = print_list_page(&screen, &OutputFormat::Text, "profiles", "No profiles found", |_| {}).await;

    assert_eq!(
        result.expect_err("500 must fail the command").to_string(),
        "Error del servidor al cargar los perfiles. Inténtalo más tarde"
    );
}

#[tokio::test]
async fn rejected_login_fails_the_command() {
    let h = Harness::start(bambino_admin::app::LoginAffordance::Redirect, false).await;
    h.server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(401);
    });

    let cmd = bambino_admin::cli::commands::auth::AuthCommands::Login {
        email: "maria@bambino.edu".to_string(),
        password: Some("wrong-pass".to_string()),
    };
    let result = bambino_admin::cli::commands::auth::handle(cmd, &h.app, OutputFormat::Text).await;

    assert_eq!(
        result.expect_err("login failure must fail the command").to_string(),
        "Correo o contraseña incorrectos"
    );
}
