//! Fixtures shared by the in-crate router and service tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::{Extension, Router};
use chrono::{Duration, Utc};
use serde_json::Value;

use crate::accounts::{Role, SessionDirectory, TokenAuthority, User, UserId};
use crate::brands::{Brand, BrandRepository, NewBrand};
use crate::media::ImageUpload;
use crate::store::MemoryStore;

pub(crate) const BOUNDARY: &str = "brand-board-boundary";

pub(crate) fn authority() -> Arc<TokenAuthority> {
    Arc::new(TokenAuthority::new("test-secret", Duration::hours(1)))
}

pub(crate) fn user(id: i64, role: Role) -> User {
    User {
        id: UserId(id),
        email: format!("{}{id}@example.com", role.label()),
        name: format!("{} {id}", role.label()),
        password_hash: String::new(),
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub(crate) fn bearer(authority: &TokenAuthority, user: &User) -> String {
    let issued = authority.issue(user).expect("token issues");
    format!("Bearer {}", issued.token)
}

/// Wrap a feature router the way the server does so `AuthSession` resolves.
pub(crate) fn with_authority(router: Router, authority: Arc<TokenAuthority>) -> Router {
    router.layer(Extension(authority))
}

/// Like `with_authority`, but roles are re-read from `store` on every request.
pub(crate) fn with_sessions(
    router: Router,
    authority: Arc<TokenAuthority>,
    store: Arc<MemoryStore>,
) -> Router {
    let directory: Arc<dyn SessionDirectory> = store;
    with_authority(router, authority).layer(Extension(directory))
}

pub(crate) fn png(name: &str) -> ImageUpload {
    ImageUpload {
        file_name: name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

pub(crate) fn seed_brand(store: &MemoryStore, name: &str, rank: i32, categories: &[&str]) -> Brand {
    store
        .insert_brand(NewBrand {
            name: name.to_string(),
            description: format!("{name} makes things"),
            logo_url: format!("/media/{}.png", name.to_ascii_lowercase()),
            logo_key: None,
            website_url: Some(format!("https://{}.example.com", name.to_ascii_lowercase())),
            categories: categories.iter().map(|tag| tag.to_string()).collect(),
            rank,
            is_active: true,
        })
        .expect("brand inserts")
}

pub(crate) fn multipart_body(fields: &[(&str, &str)], image: Option<&ImageUpload>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(image) = image {
        let content_type = image.content_type.as_deref().unwrap_or("application/octet-stream");
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {content_type}\r\n\r\n",
                image.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(&image.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(crate) fn multipart_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Vec<u8>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::from(body)).expect("request builds")
}

pub(crate) fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("json encodes")))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    }
}

pub(crate) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
