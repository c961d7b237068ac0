mod common;

use bambino_admin::listing::{DeleteOutcome, LoadOutcome};
use common::Harness;
use httpmock::prelude::*;
use serde_json::json;

async fn loaded_profiles(h: &Harness) -> bambino_admin::listing::ListScreen<bambino_admin::listing::ProfilesResource> {
    let screen = h.app.profiles_screen();
    assert_eq!(screen.load().await, LoadOutcome::Loaded { rows: 2 });
    screen
}

fn mock_page(h: &Harness) -> httpmock::Mock<'_> {
    h.server.mock(|when, then| {
        when.method(GET).path("/profiles");
        then.status(200).json_body(json!([
            {"id": 10, "user_id": null, "first_name": "Ana", "last_name": "Li"},
            {"id": 11, "user_id": null, "first_name": "Luis", "last_name": "Paz"}
        ]));
    })
}

fn mock_users(h: &Harness) {
    h.server.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200).json_body(json!([]));
    });
}

#[tokio::test]
async fn successful_delete_drops_the_row_without_reloading() {
    let h = Harness::logged_in().await;
    let page = mock_page(&h);
    mock_users(&h);
    let delete = h.server.mock(|when, then| {
        when.method(DELETE).path("/profiles/10");
        then.status(204);
    });

    let screen = loaded_profiles(&h).await;
    assert_eq!(screen.delete(10).await, DeleteOutcome::Removed);

    delete.assert();
    assert_eq!(page.hits(), 1);
    let ids: Vec<_> = screen.rows().iter().map(|r| r.profile.id).collect();
    assert_eq!(ids, vec![11]);
    assert_eq!(screen.delete_error(), None);
}

#[tokio::test]
async fn deleting_a_vanished_row_reloads_the_list() {
    let h = Harness::logged_in().await;
    let mut page = mock_page(&h);
    mock_users(&h);
    h.server.mock(|when, then| {
        when.method(DELETE).path("/profiles/10");
        then.status(404).json_body(json!({"detail": "Profile not found"}));
    });

    let screen = loaded_profiles(&h).await;

    // someone else already removed 10
    page.delete();
    let reload = h.server.mock(|when, then| {
        when.method(GET).path("/profiles");
        then.status(200).json_body(json!([
            {"id": 11, "user_id": null, "first_name": "Luis", "last_name": "Paz"}
        ]));
    });

    assert_eq!(screen.delete(10).await, DeleteOutcome::Resynced);

    reload.assert();
    let row_ids: Vec<_> = screen.rows().iter().map(|r| r.profile.id).collect();
    let item_ids: Vec<_> = screen.items().iter().map(|p| p.id).collect();
    assert_eq!(row_ids, vec![11]);
    assert_eq!(item_ids, vec![11]);
    assert_eq!(screen.delete_error(), None);
}

#[tokio::test]
async fn forbidden_delete_keeps_the_row_and_reports_separately() {
    let h = Harness::logged_in().await;
    mock_page(&h);
    mock_users(&h);
    h.server.mock(|when, then| {
        when.method(DELETE).path("/profiles/10");
        then.status(403).json_body(json!({"detail": "Not enough permissions"}));
    });

    let screen = loaded_profiles(&h).await;
    assert_eq!(screen.delete(10).await, DeleteOutcome::Failed);

    assert_eq!(
        screen.delete_error().as_deref(),
        Some("No tienes permisos para eliminar este perfil")
    );
    assert_eq!(screen.error(), None);
    assert_eq!(screen.rows().len(), 2);

    screen.dismiss_delete_error();
    assert_eq!(screen.delete_error(), None);
}

#[tokio::test]
async fn expired_session_on_delete_reports_and_keeps_rows() {
    let h = Harness::logged_in().await;
    mock_page(&h);
    mock_users(&h);
    h.server.mock(|when, then| {
        when.method(DELETE).path("/profiles/11");
        then.status(401);
    });

    let screen = loaded_profiles(&h).await;
    assert_eq!(screen.delete(11).await, DeleteOutcome::SessionExpired);

    assert_eq!(
        screen.delete_error().as_deref(),
        Some("Tu sesión ha expirado. Inicia sesión de nuevo para ver los perfiles")
    );
    assert_eq!(screen.rows().len(), 2);
}
