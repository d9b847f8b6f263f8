//! Integration tests for `BackendClient` using wiremock HTTP mocks.

use std::time::Duration;

use washbook::api::{ApiError, BackendClient};
use washbook::model::{RegisterRequest, ReservationRequest, UserProfile};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> BackendClient {
    BackendClient::new(base_url, Duration::from_secs(5))
        .expect("client construction should not fail")
}

#[tokio::test]
async fn vehicle_types_parse_as_plain_strings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services/vehicle-types"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!(["Αυτοκίνητο", "VAN", "SUV", "Moto"])),
        )
        .mount(&server)
        .await;

    let types = test_client(&server.uri())
        .vehicle_types()
        .await
        .expect("should parse vehicle types");
    assert_eq!(types, vec!["Αυτοκίνητο", "VAN", "SUV", "Moto"]);
}

#[tokio::test]
async fn services_by_vehicle_hits_the_encoded_path() {
    let server = MockServer::start().await;
    let body = serde_json::json!([
        {
            "_id": "svc1",
            "car_wash_id": "cw1",
            "name": "Εξωτερικό πλύσιμο",
            "description": "Exterior wash",
            "price": 8.0
        }
    ]);
    Mock::given(method("GET"))
        .and(path("/api/services/by-vehicle/SUV"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let services = test_client(&server.uri())
        .services_by_vehicle("SUV")
        .await
        .expect("should parse services");
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].id, "svc1");
    assert_eq!(services[0].name, "Εξωτερικό πλύσιμο");
    assert_eq!(services[0].price, 8.0);
}

#[tokio::test]
async fn car_washes_query_carries_service_name_and_vehicle_type() {
    let server = MockServer::start().await;
    let body = serde_json::json!([
        {
            "_id": "cw1",
            "name": "Sparkle Wash",
            "address": "Main St 1, Athens",
            "city": "Athens",
            "state": "Attica",
            "zip_code": "11111",
            "phone": "2101234567"
        }
    ]);
    Mock::given(method("GET"))
        .and(path("/api/carwashes"))
        .and(query_param("service_name", "Εξωτερικό πλύσιμο"))
        .and(query_param("vehicle_type", "SUV"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let washes = test_client(&server.uri())
        .car_washes("Εξωτερικό πλύσιμο", "SUV")
        .await
        .expect("should parse car washes");
    assert_eq!(washes.len(), 1);
    assert_eq!(washes[0].id, "cw1");
    assert_eq!(washes[0].address, "Main St 1, Athens");
}

#[tokio::test]
async fn empty_available_times_is_a_valid_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/carwashes/cw1/available-times"))
        .and(query_param("date", "2025-06-01"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "available_times": [] })),
        )
        .mount(&server)
        .await;

    let times = test_client(&server.uri())
        .available_times("cw1", "2025-06-01")
        .await
        .expect("empty list is not an error");
    assert!(times.is_empty());
}

#[tokio::test]
async fn login_returns_the_user_envelope() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "user": { "first_name": "Maria", "last_name": "P.", "email": "maria@example.gr" }
    });
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(serde_json::json!({
            "email": "maria@example.gr",
            "password": "s3cret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let user = test_client(&server.uri())
        .login("maria@example.gr", "s3cret")
        .await
        .expect("should parse user");
    assert_eq!(user.first_name, "Maria");
    assert_eq!(user.email, "maria@example.gr");
}

#[tokio::test]
async fn login_failure_surfaces_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "message": "Invalid credentials." })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .login("maria@example.gr", "wrong")
        .await
        .expect_err("401 must be an error");
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(message, "Invalid credentials.");
        }
        other => panic!("expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_success_without_message_falls_back_to_the_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services/vehicle-types"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .vehicle_types()
        .await
        .expect_err("500 must be an error");
    match err {
        ApiError::Server { status, .. } => assert_eq!(status.as_u16(), 500),
        other => panic!("expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn register_passes_through_the_dev_verification_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({ "verification_code": "424242" })),
        )
        .mount(&server)
        .await;

    let request = RegisterRequest {
        email: "maria@example.gr".into(),
        password: "s3cret".into(),
        first_name: "Maria".into(),
        last_name: "P.".into(),
        phone_number: "2101234567".into(),
        address: "Main St 1".into(),
        city: "Athens".into(),
        state: "Attica".into(),
        zip_code: "11111".into(),
    };
    let code = test_client(&server.uri())
        .register(&request)
        .await
        .expect("should parse register response");
    assert_eq!(code.as_deref(), Some("424242"));
}

#[tokio::test]
async fn verify_email_logs_the_user_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify"))
        .and(body_json(serde_json::json!({
            "email": "maria@example.gr",
            "verification_code": "424242"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": { "first_name": "Maria", "last_name": "P.", "email": "maria@example.gr" }
        })))
        .mount(&server)
        .await;

    let user = test_client(&server.uri())
        .verify_email("maria@example.gr", "424242")
        .await
        .expect("should parse user");
    assert_eq!(user.email, "maria@example.gr");
}

#[tokio::test]
async fn history_parses_nested_service_fields() {
    let server = MockServer::start().await;
    let body = serde_json::json!([
        {
            "reservation_id": "r1",
            "reserved_at": "2025-06-01T14:30:00",
            "vehicle_type": "SUV",
            "car_wash_name": "Sparkle Wash",
            "service": { "name": "Εξωτερικό πλύσιμο", "price": 8.0 }
        }
    ]);
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .and(query_param("email", "maria@example.gr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let reservations = test_client(&server.uri())
        .history("maria@example.gr")
        .await
        .expect("should parse history");
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0].service.name, "Εξωτερικό πλύσιμο");
    assert_eq!(reservations[0].service.price, 8.0);
}

#[tokio::test]
async fn save_reservation_posts_the_full_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/history"))
        .and(body_json(serde_json::json!({
            "user_email": "maria@example.gr",
            "vehicle_type": "SUV",
            "service_id": "svc1",
            "car_wash_id": "cw1",
            "reserved_at": "2025-06-01T14:30:00"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let request = ReservationRequest {
        user_email: "maria@example.gr".into(),
        vehicle_type: "SUV".into(),
        service_id: "svc1".into(),
        car_wash_id: "cw1".into(),
        reserved_at: "2025-06-01T14:30:00".into(),
    };
    test_client(&server.uri())
        .save_reservation(&request)
        .await
        .expect("2xx should succeed");
}

#[tokio::test]
async fn profile_round_trip_uses_get_then_put() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .and(query_param("email", "maria@example.gr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "email": "maria@example.gr",
            "first_name": "Maria",
            "last_name": "P.",
            "phone_number": "2101234567",
            "address": "Main St 1",
            "city": "Athens",
            "state": "Attica",
            "zip_code": "11111"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "saved"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let mut profile: UserProfile = client
        .fetch_profile("maria@example.gr")
        .await
        .expect("should parse profile");
    assert_eq!(profile.city, "Athens");

    profile.city = "Patras".into();
    client
        .update_profile(&profile)
        .await
        .expect("PUT should succeed");
}
