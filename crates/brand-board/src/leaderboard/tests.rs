use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{leaderboard_router, LeaderboardState};
use crate::accounts::Role;
use crate::brands::BrandId;
use crate::lists::{ListRepository, NewBrandList};
use crate::store::MemoryStore;
use crate::test_support::*;

fn router_for(store: Arc<MemoryStore>) -> Router {
    with_authority(leaderboard_router(LeaderboardState::new(store)), authority())
}

fn scores(value: i64) -> Value {
    json!({
        "potency_rating": value,
        "flavor_rating": value,
        "effects_rating": value,
        "value_rating": value,
        "overall_rating": value,
    })
}

async fn rate(router: &Router, brand_id: BrandId, voter: &str, body: Value) -> (StatusCode, Value) {
    let mut request = json_request(
        "POST",
        &format!("/api/leaderboard/brands/{brand_id}/rate"),
        None,
        Some(body),
    );
    request
        .headers_mut()
        .insert("x-forwarded-for", voter.parse().expect("header value"));
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    let status = response.status();
    (status, read_json_body(response).await)
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(json_request("GET", uri, None, None))
        .await
        .expect("route executes");
    let status = response.status();
    (status, read_json_body(response).await)
}

#[tokio::test]
async fn same_voter_rating_twice_keeps_the_latest() {
    let store = Arc::new(MemoryStore::new());
    let brand = seed_brand(&store, "North", 1, &[]);
    let router = router_for(store);

    let (status, first) = rate(&router, brand.id, "203.0.113.7", scores(4)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["action"], "inserted");

    let (status, second) = rate(&router, brand.id, "203.0.113.7, 10.0.0.1", scores(9)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["action"], "updated");
    assert_eq!(second["id"], first["id"]);

    let (_, rows) = get_json(&router, "/api/leaderboard").await;
    assert_eq!(rows[0]["total_ratings"], 1);
    assert_eq!(rows[0]["avg_overall"], 9.0);
}

#[tokio::test]
async fn out_of_range_scores_are_rejected() {
    let store = Arc::new(MemoryStore::new());
    let brand = seed_brand(&store, "North", 1, &[]);
    let router = router_for(store.clone());

    for bad in [0, 11] {
        let mut body = scores(5);
        body["flavor_rating"] = json!(bad);
        let (status, payload) = rate(&router, brand.id, "198.51.100.1", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"]
            .as_str()
            .expect("message")
            .contains("flavor_rating"));
    }

    let (_, ratings) = get_json(&router, &format!("/api/leaderboard/brands/{}/ratings", brand.id)).await;
    assert_eq!(ratings, json!([]));
}

#[tokio::test]
async fn rating_an_unknown_brand_is_not_found() {
    let router = router_for(Arc::new(MemoryStore::new()));
    let (status, _) = rate(&router, BrandId(77), "198.51.100.1", scores(5)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn leaderboard_averages_and_orders_brands() {
    let store = Arc::new(MemoryStore::new());
    let quiet = seed_brand(&store, "Quiet", 1, &[]);
    let loud = seed_brand(&store, "Loud", 2, &[]);
    let router = router_for(store);

    rate(&router, loud.id, "192.0.2.1", scores(8)).await;
    let mut mixed = scores(6);
    mixed["potency_rating"] = json!("10");
    rate(&router, loud.id, "192.0.2.2", mixed).await;

    let (status, rows) = get_json(&router, "/api/leaderboard").await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["brand_id"], loud.id.0);
    assert_eq!(rows[0]["avg_overall"], 7.0);
    assert_eq!(rows[0]["avg_potency"], 9.0);
    assert_eq!(rows[0]["total_ratings"], 2);

    assert_eq!(rows[1]["brand_id"], quiet.id.0);
    assert_eq!(rows[1]["avg_overall"], 0.0);
    assert_eq!(rows[1]["total_ratings"], 0);
}

#[tokio::test]
async fn display_view_returns_normalized_cards() {
    let store = Arc::new(MemoryStore::new());
    let brand = seed_brand(&store, "North", 1, &["Flower", "featured"]);
    let router = router_for(store);
    rate(&router, brand.id, "192.0.2.1", scores(7)).await;

    let (status, cards) = get_json(&router, "/api/leaderboard?view=display").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cards[0]["id"], brand.id.to_string());
    assert_eq!(cards[0]["featured"], true);
    assert_eq!(cards[0]["scores"]["overall"], 7.0);
    assert_eq!(cards[0]["total_ratings"], 1);

    let (status, _) = get_json(&router, "/api/leaderboard?view=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pulse_votes_accumulate_without_dedup() {
    let store = Arc::new(MemoryStore::new());
    let brand = seed_brand(&store, "North", 1, &[]);
    let list = store
        .insert_list(NewBrandList {
            title: "Staff picks".into(),
            description: None,
            is_active: true,
        })
        .expect("list");
    let item = store
        .insert_list_item(list.id, brand.id, None)
        .expect("item");
    let router = router_for(store);
    let uri = format!(
        "/api/leaderboard/lists/{}/items/{}/vote",
        list.id.0, item.id.0
    );

    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(json_request("POST", &uri, None, Some(json!({ "vote": "up" }))))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let (_, lists) = get_json(&router, "/api/leaderboard/lists").await;
    let entry = &lists[0]["items"][0];
    assert_eq!(entry["upvotes"], 2);
    assert_eq!(entry["downvotes"], 0);
    assert_eq!(entry["brand"]["name"], "North");

    let sideways = router
        .clone()
        .oneshot(json_request("POST", &uri, None, Some(json!({ "vote": "sideways" }))))
        .await
        .expect("route executes");
    assert_eq!(sideways.status(), StatusCode::BAD_REQUEST);

    let missing = router
        .oneshot(json_request(
            "POST",
            &format!("/api/leaderboard/lists/{}/items/999/vote", list.id.0),
            None,
            Some(json!({ "vote": "down" })),
        ))
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_administration_requires_staff() {
    let store = Arc::new(MemoryStore::new());
    let brand = seed_brand(&store, "North", 1, &[]);
    let authority = authority();
    let token = bearer(&authority, &user(3, Role::Editor));
    let router = with_authority(
        leaderboard_router(LeaderboardState::new(store)),
        authority,
    );

    let anonymous = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/leaderboard/lists",
            None,
            Some(json!({ "title": "Top 10" })),
        ))
        .await
        .expect("route executes");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let created = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/leaderboard/lists",
            Some(&token),
            Some(json!({ "title": "Top 10", "description": "Staff favourites" })),
        ))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let list = read_json_body(created).await;

    let items_uri = format!("/api/leaderboard/lists/{}/items", list["id"]);
    let added = router
        .clone()
        .oneshot(json_request(
            "POST",
            &items_uri,
            Some(&token),
            Some(json!({ "brandId": brand.id.0 })),
        ))
        .await
        .expect("route executes");
    assert_eq!(added.status(), StatusCode::CREATED);

    let duplicate = router
        .oneshot(json_request(
            "POST",
            &items_uri,
            Some(&token),
            Some(json!({ "brandId": brand.id.0 })),
        ))
        .await
        .expect("route executes");
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
}
