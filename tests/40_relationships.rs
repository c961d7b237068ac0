mod common;

use bambino_admin::app::LoginAffordance;
use bambino_admin::error::ApiError;
use bambino_admin::listing::{LoadOutcome, LOAD_FAILED};
use bambino_admin::models::relationship::SELF_RELATIONSHIP_MESSAGE;
use bambino_admin::models::NewRelationship;
use common::Harness;
use httpmock::prelude::*;
use serde_json::json;

fn relationship(id: i64, user_id: i64, related_user_id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": user_id,
        "related_user_id": related_user_id,
        "relationship_type": "madre"
    })
}

#[tokio::test]
async fn both_sides_of_a_relationship_are_resolved() {
    let h = Harness::logged_in().await;
    h.server.mock(|when, then| {
        when.method(GET).path("/user-relationships");
        then.status(200)
            .json_body(json!({"relationships": [relationship(1, 1, 2)]}));
    });
    h.server.mock(|when, then| {
        when.method(GET).path("/users").query_param("limit", "1000");
        then.status(200).json_body(json!([
            {"id": 1, "email": "madre@x.com"},
            {"id": 2, "email": "alumno@x.com"}
        ]));
    });

    let screen = h.app.relationships_screen();
    assert_eq!(screen.load().await, LoadOutcome::Loaded { rows: 1 });

    let row = &screen.rows()[0];
    assert_eq!(row.user_name, "madre@x.com");
    assert_eq!(row.related_user_name, "alumno@x.com");
    assert_eq!(row.relationship.relationship_type, "madre");
}

#[tokio::test]
async fn expired_session_mid_enrichment_stops_further_lookups() {
    let h = Harness::start_with(LoginAffordance::Modal, true, |config| {
        config.listing.lookup_concurrency = 1;
    })
    .await;
    h.server.mock(|when, then| {
        when.method(GET).path("/user-relationships");
        then.status(200)
            .json_body(json!([relationship(1, 1, 2), relationship(2, 3, 1)]));
    });
    h.server.mock(|when, then| {
        when.method(GET).path("/users").query_param("limit", "1000");
        then.status(200).json_body(json!([{"id": 1, "email": "a@x.com"}]));
    });
    let lookup_two = h.server.mock(|when, then| {
        when.method(GET).path("/users/2");
        then.status(401);
    });
    let lookup_three = h.server.mock(|when, then| {
        when.method(GET).path("/users/3");
        then.status(200).json_body(json!({"id": 3, "email": "c@x.com"}));
    });

    let screen = h.app.relationships_screen();
    assert_eq!(screen.load().await, LoadOutcome::Loaded { rows: 2 });

    assert_eq!(lookup_two.hits(), 1);
    assert_eq!(lookup_three.hits(), 0);

    let rows = screen.rows();
    assert_eq!(rows[0].user_name, "a@x.com");
    assert_eq!(rows[0].related_user_name, LOAD_FAILED);
    assert_eq!(rows[1].user_name, LOAD_FAILED);
    assert_eq!(rows[1].related_user_name, "a@x.com");
    assert_eq!(
        screen.error().as_deref(),
        Some("Tu sesión ha expirado. Inicia sesión de nuevo para ver las relaciones")
    );
    assert_eq!(h.stored_token(), None);
}

#[tokio::test]
async fn self_relationship_is_rejected_without_a_request() {
    let h = Harness::logged_in().await;
    let create = h.server.mock(|when, then| {
        when.method(POST).path("/user-relationships");
        then.status(201).json_body(relationship(5, 4, 4));
    });

    let new = NewRelationship {
        user_id: 4,
        related_user_id: 4,
        relationship_type: "tutor".to_string(),
        description: None,
    };
    let err = h.app.relationships.create(&new).await.expect_err("rejected");

    assert_eq!(create.hits(), 0);
    assert!(matches!(err, ApiError::Validation { .. }));
    assert_eq!(
        err.field_errors().and_then(|f| f.get("related_user_id")).map(String::as_str),
        Some(SELF_RELATIONSHIP_MESSAGE)
    );
}

#[tokio::test]
async fn unknown_relationship_type_is_rejected() {
    let h = Harness::logged_in().await;
    let create = h.server.mock(|when, then| {
        when.method(POST).path("/user-relationships");
        then.status(201);
    });

    let new = NewRelationship {
        user_id: 1,
        related_user_id: 2,
        relationship_type: "vecino".to_string(),
        description: None,
    };
    assert!(h.app.relationships.create(&new).await.is_err());
    assert_eq!(create.hits(), 0);
}

#[tokio::test]
async fn valid_relationship_is_created() {
    let h = Harness::logged_in().await;
    let create = h.server.mock(|when, then| {
        when.method(POST).path("/user-relationships").json_body(json!({
            "user_id": 1,
            "related_user_id": 2,
            "relationship_type": "madre"
        }));
        then.status(201).json_body(relationship(9, 1, 2));
    });

    let new = NewRelationship {
        user_id: 1,
        related_user_id: 2,
        relationship_type: "madre".to_string(),
        description: None,
    };
    let created = h.app.relationships.create(&new).await.expect("created");

    create.assert();
    assert_eq!(created.id, 9);
}
