//! HTTP tests for the media library endpoints, run against the in-memory
//! stores.

use actix_web::{test, web, App};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use scheduler_service::db::{MemoryContentStore, StoreHandle};
use scheduler_service::handlers;
use scheduler_service::middleware::{Claims, JwtAuthMiddleware};
use scheduler_service::storage::{MediaStorageHandle, MemoryMediaStorage};
use std::sync::Arc;
use uuid::Uuid;

const SECRET: &str = "test-secret";
const BOUNDARY: &str = "test-boundary";

fn token_for(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode token")
}

fn memory_backends() -> (StoreHandle, MediaStorageHandle) {
    (
        Arc::new(MemoryContentStore::new()),
        Arc::new(MemoryMediaStorage::new()),
    )
}

macro_rules! test_app {
    ($store:expr, $media:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($store.clone()))
                .app_data(web::Data::new($media.clone()))
                .service(
                    web::scope("/api/v1")
                        .wrap(JwtAuthMiddleware::new(SECRET))
                        .configure(handlers::configure),
                ),
        )
        .await
    };
}

fn multipart_file(file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            BOUNDARY, file_name, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[actix_web::test]
async fn upload_stores_the_object_and_records_the_row() {
    let (store, media) = memory_backends();
    let app = test_app!(store, media);
    let token = token_for(Uuid::new_v4());

    let payload = multipart_file("photo.png", "image/png", b"not really a png");
    let req = test::TestRequest::post()
        .uri("/api/v1/media")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["media"]["file_name"], "photo.png");
    assert_eq!(body["media"]["file_type"], "image/png");
    // Images reuse their own URL as the thumbnail.
    assert_eq!(body["media"]["thumbnail_url"], body["media"]["url"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/media")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let items: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn video_uploads_get_a_placeholder_thumbnail() {
    let (store, media) = memory_backends();
    let app = test_app!(store, media);
    let token = token_for(Uuid::new_v4());

    let payload = multipart_file("clip.mp4", "video/mp4", b"not really a video");
    let req = test::TestRequest::post()
        .uri("/api/v1/media")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(payload)
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["media"]["thumbnail_url"],
        "/placeholder.svg?height=400&width=400"
    );
}

#[actix_web::test]
async fn delete_removes_the_item_and_missing_ids_are_404() {
    let (store, media) = memory_backends();
    let app = test_app!(store, media);
    let token = token_for(Uuid::new_v4());

    let payload = multipart_file("photo.png", "image/png", b"bytes");
    let req = test::TestRequest::post()
        .uri("/api/v1/media")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(payload)
        .to_request();
    let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let media_id = created["media"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/media/{}", media_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    // A second delete finds nothing.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/media/{}", media_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get()
        .uri("/api/v1/media")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let items: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(items.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn media_is_scoped_to_its_owner() {
    let (store, media) = memory_backends();
    let app = test_app!(store, media);
    let alice = token_for(Uuid::new_v4());
    let bob = token_for(Uuid::new_v4());

    let payload = multipart_file("photo.png", "image/png", b"bytes");
    let req = test::TestRequest::post()
        .uri("/api/v1/media")
        .insert_header(("Authorization", format!("Bearer {}", alice)))
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(payload)
        .to_request();
    let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let media_id = created["media"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/media/{}", media_id))
        .insert_header(("Authorization", format!("Bearer {}", bob)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::get()
        .uri("/api/v1/media")
        .insert_header(("Authorization", format!("Bearer {}", alice)))
        .to_request();
    let items: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
}
