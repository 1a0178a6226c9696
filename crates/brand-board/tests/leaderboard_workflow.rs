//! End-to-end scenarios for the directory, ratings, leaderboard, and list voting
//! driven through the composed HTTP routers against one shared store.

mod common {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::{Extension, Router};
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use brand_board::accounts::{
        account_router, AccountService, PasswordHasher, TokenAuthority,
    };
    use brand_board::brands::{brand_router, BrandService};
    use brand_board::leaderboard::{leaderboard_router, LeaderboardState};
    use brand_board::store::{MemoryImageStore, MemoryStore};

    pub(super) const BOUNDARY: &str = "workflow-boundary";

    pub(super) struct Harness {
        pub(super) router: Router,
        pub(super) store: Arc<MemoryStore>,
        pub(super) images: Arc<MemoryImageStore>,
    }

    pub(super) fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let images = Arc::new(MemoryImageStore::new("/media"));
        let authority = Arc::new(TokenAuthority::new("workflow-secret", Duration::hours(1)));
        let accounts = Arc::new(AccountService::new(
            store.clone(),
            authority.clone(),
            PasswordHasher::new(4),
        ));
        let brands = Arc::new(BrandService::new(store.clone(), images.clone()));

        let router = Router::new()
            .merge(account_router(accounts))
            .merge(brand_router(brands))
            .merge(leaderboard_router(LeaderboardState::new(store.clone())))
            .layer(Extension(authority));

        Harness {
            router,
            store,
            images,
        }
    }

    pub(super) async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        let payload = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json payload")
        };
        (status, payload)
    }

    pub(super) fn json_request(
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
            None => builder.body(Body::empty()).expect("request builds"),
        }
    }

    pub(super) fn rating_request(brand_id: &Value, voter: &str, overall: i64) -> Request<Body> {
        let mut request = json_request(
            "POST",
            &format!("/api/leaderboard/brands/{brand_id}/rate"),
            None,
            Some(json!({
                "potency_rating": 8,
                "flavor_rating": 7,
                "effects_rating": 6,
                "value_rating": 5,
                "overall_rating": overall,
                "comment": "solid"
            })),
        );
        request
            .headers_mut()
            .insert("x-real-ip", voter.parse().expect("header value"));
        request
    }

    pub(super) fn brand_upload(token: &str, name: &str, extra: &[(&str, &str)]) -> Request<Body> {
        let mut body = Vec::new();
        let mut fields = vec![("name", name), ("description", "Craft cannabis")];
        fields.extend_from_slice(extra);
        for (field, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"logo\"; filename=\"{name}.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[0x89, b'P', b'N', b'G']);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/brands")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request builds")
    }

    /// Register the first (admin) account and return its token.
    pub(super) async fn admin_token(router: &Router) -> String {
        let (status, grant) = send(
            router,
            json_request(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({ "email": "owner@example.com", "password": "correct-horse" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(grant["user"]["role"], "admin");
        grant["token"].as_str().expect("token").to_string()
    }
}

use axum::http::StatusCode;
use serde_json::json;

use brand_board::lists::{ListRepository, NewBrandList};
use brand_board::normalizer::normalize;
use common::*;

#[tokio::test]
async fn brands_created_over_http_appear_on_the_leaderboard() {
    let harness = harness();
    let token = admin_token(&harness.router).await;

    let (status, first) = send(&harness.router, brand_upload(&token, "Aurora", &[])).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, second) = send(
        &harness.router,
        brand_upload(&token, "Borealis", &[("featured", "yes")]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["rank"], 2);
    assert_eq!(harness.images.len(), 2);

    send(&harness.router, rating_request(&first["id"], "10.1.1.1", 6)).await;
    send(&harness.router, rating_request(&second["id"], "10.1.1.1", 9)).await;
    send(&harness.router, rating_request(&second["id"], "10.1.1.2", 8)).await;

    let (status, rows) = send(
        &harness.router,
        json_request("GET", "/api/leaderboard", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows[0]["name"], "Borealis");
    assert_eq!(rows[0]["avg_overall"], 8.5);
    assert_eq!(rows[0]["total_ratings"], 2);
    assert_eq!(rows[1]["name"], "Aurora");
    assert_eq!(rows[1]["avg_overall"], 6.0);

    let (_, featured) = send(
        &harness.router,
        json_request("GET", "/api/brands/featured", None, None),
    )
    .await;
    assert_eq!(featured.as_array().map(Vec::len), Some(1));
    assert_eq!(featured[0]["name"], "Borealis");
}

#[tokio::test]
async fn deleting_a_brand_removes_its_ratings_and_list_entries() {
    let harness = harness();
    let token = admin_token(&harness.router).await;

    let (_, doomed) = send(&harness.router, brand_upload(&token, "Doomed", &[])).await;
    let (_, kept) = send(&harness.router, brand_upload(&token, "Kept", &[])).await;
    send(&harness.router, rating_request(&doomed["id"], "10.2.2.2", 10)).await;

    let (status, list) = send(
        &harness.router,
        json_request(
            "POST",
            "/api/leaderboard/lists",
            Some(&token),
            Some(json!({ "title": "Weekly pulse" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    for brand in [&doomed, &kept] {
        let (status, _) = send(
            &harness.router,
            json_request(
                "POST",
                &format!("/api/leaderboard/lists/{}/items", list["id"]),
                Some(&token),
                Some(json!({ "brand_id": brand["id"] })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(
        &harness.router,
        json_request(
            "DELETE",
            &format!("/api/brands/{}", doomed["id"]),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, brands) = send(&harness.router, json_request("GET", "/api/brands", None, None)).await;
    assert_eq!(brands.as_array().map(Vec::len), Some(1));
    assert_eq!(brands[0]["name"], "Kept");

    let (status, _) = send(
        &harness.router,
        json_request(
            "GET",
            &format!("/api/leaderboard/brands/{}/ratings", doomed["id"]),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, rows) = send(
        &harness.router,
        json_request("GET", "/api/leaderboard", None, None),
    )
    .await;
    assert_eq!(rows.as_array().map(Vec::len), Some(1));

    let (_, lists) = send(
        &harness.router,
        json_request("GET", "/api/leaderboard/lists", None, None),
    )
    .await;
    let items = lists[0]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["brand"]["name"], "Kept");
}

#[tokio::test]
async fn inactive_lists_are_hidden_from_the_public_feed() {
    let harness = harness();
    harness
        .store
        .insert_list(NewBrandList {
            title: "Archived".into(),
            description: None,
            is_active: false,
        })
        .expect("list");

    let (status, lists) = send(
        &harness.router,
        json_request("GET", "/api/leaderboard/lists", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(lists, json!([]));
}

#[test]
fn flat_and_averaged_rows_normalize_identically() {
    let flat = json!({
        "id": 12,
        "name": "Aurora",
        "logo_url": "/media/aurora.png",
        "potency": 7.5,
        "flavor": 6,
        "effects": 8,
        "value": 5,
        "overall": 7,
        "total_ratings": 4
    });
    let averaged = json!({
        "brand_id": 12,
        "name": "Aurora",
        "logo_url": "/media/aurora.png",
        "avg_potency": 7.5,
        "avg_flavor": 6,
        "avg_effects": 8,
        "avg_value": 5,
        "avg_overall": 7,
        "total_ratings": 4
    });

    let left = normalize(&flat).expect("flat row");
    let right = normalize(&averaged).expect("averaged row");

    assert_eq!(left, right);
    assert_eq!(left.scores.potency, 7.5);
    assert_eq!(left.total_ratings, 4);
}
