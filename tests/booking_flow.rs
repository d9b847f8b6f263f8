//! End-to-end wizard session tests against a wiremock backend.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use washbook::api::BackendClient;
use washbook::geocode::{GeocodeError, Geocoder};
use washbook::model::{
    AuthSession, Coordinate, FetchState, SelectedService, WizardCommand, WizardEvent,
};
use washbook::orchestrator::{spawn_session, SessionHandle};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn permission_granted(&self) -> bool {
        true
    }

    async fn locate(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        if address.contains("Main St") {
            Ok(Some(Coordinate {
                latitude: 37.98,
                longitude: 23.72,
            }))
        } else {
            Ok(None)
        }
    }
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/services/vehicle-types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["SUV", "Moto"])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/services/by-vehicle/SUV"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "_id": "svc1",
                "car_wash_id": "cw1",
                "name": "Εξωτερικό πλύσιμο",
                "description": "Exterior wash",
                "price": 8.0
            }
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/carwashes"))
        .and(query_param("service_name", "Εξωτερικό πλύσιμο"))
        .and(query_param("vehicle_type", "SUV"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "_id": "cw1",
                "name": "Sparkle Wash",
                "address": "Main St 1, Athens"
            },
            {
                "_id": "cw2",
                "name": "Harbor Wash",
                "address": "Unknown Alley 9"
            }
        ])))
        .mount(server)
        .await;
}

fn session(server: &MockServer, auth: AuthSession) -> SessionHandle {
    let api = BackendClient::new(&server.uri(), Duration::from_secs(5))
        .expect("client construction should not fail");
    spawn_session(api, StubGeocoder, auth)
}

/// Wait for the next event matched by `pick`, skipping everything else.
async fn wait_for<T>(
    handle: &mut SessionHandle,
    mut pick: impl FnMut(&WizardEvent) -> Option<T>,
) -> T {
    timeout(Duration::from_secs(5), async {
        loop {
            let event = handle
                .events
                .recv()
                .await
                .expect("session ended while waiting for an event");
            if let Some(out) = pick(&event) {
                return out;
            }
        }
    })
    .await
    .expect("timed out waiting for an event")
}

#[tokio::test]
async fn full_booking_flow_saves_the_reservation() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/carwashes/cw1/available-times"))
        .and(query_param("date", "2025-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "available_times": ["14:30", "15:00"]
        })))
        .mount(&server)
        .await;
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

    let auth = AuthSession::logged_in(washbook::model::User {
        first_name: "Maria".into(),
        last_name: "P.".into(),
        email: "maria@example.gr".into(),
    });
    let mut handle = session(&server, auth);

    let types = wait_for(&mut handle, |e| match e {
        WizardEvent::VehicleTypes(FetchState::Ready(t)) => Some(t.clone()),
        _ => None,
    })
    .await;
    assert_eq!(types, vec!["SUV", "Moto"]);
    let _ = handle
        .commands
        .send(WizardCommand::SelectVehicle("SUV".into()));

    let services = wait_for(&mut handle, |e| match e {
        WizardEvent::Services(FetchState::Ready(s)) => Some(s.clone()),
        _ => None,
    })
    .await;
    assert_eq!(services[0].name, "Εξωτερικό πλύσιμο");
    let _ = handle.commands.send(WizardCommand::SelectService(
        SelectedService::from_option(&services[0]),
    ));

    wait_for(&mut handle, |e| match e {
        WizardEvent::StepChanged { step: 2 } => Some(()),
        _ => None,
    })
    .await;

    let washes = wait_for(&mut handle, |e| match e {
        WizardEvent::CarWashes(FetchState::Ready(w)) => Some(w.clone()),
        _ => None,
    })
    .await;
    assert_eq!(washes.len(), 2);

    // The geocode batch keeps unlocated addresses as markers without a
    // coordinate.
    let markers = wait_for(&mut handle, |e| match e {
        WizardEvent::Markers(m) if !m.is_empty() => Some(m.clone()),
        _ => None,
    })
    .await;
    assert_eq!(markers.len(), 2);
    assert!(markers[0].coordinate.is_some());
    assert!(markers[1].coordinate.is_none());

    let _ = handle
        .commands
        .send(WizardCommand::SelectCarWash(washes[0].clone()));
    let _ = handle
        .commands
        .send(WizardCommand::SetDate(Some("2025-06-01".into())));
    let _ = handle
        .commands
        .send(WizardCommand::SetTime(Some("14:30".into())));

    let times = wait_for(&mut handle, |e| match e {
        WizardEvent::AvailableTimes(FetchState::Ready(t)) => Some(t.clone()),
        _ => None,
    })
    .await;
    assert_eq!(times, vec!["14:30", "15:00"]);

    let _ = handle.commands.send(WizardCommand::ConfirmSchedule);
    let summary = wait_for(&mut handle, |e| match e {
        WizardEvent::SummaryReady(s) => Some((**s).clone()),
        _ => None,
    })
    .await;
    assert_eq!(summary.vehicle_type, "SUV");
    assert_eq!(summary.car_wash, "Sparkle Wash");
    assert_eq!(summary.date, "2025-06-01");
    assert_eq!(summary.time, "14:30");

    let _ = handle.commands.send(WizardCommand::ConfirmBooking);
    wait_for(&mut handle, |e| match e {
        WizardEvent::BookingSaved => Some(()),
        _ => None,
    })
    .await;

    handle.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn empty_available_times_surface_as_ready_not_failed() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/carwashes/cw1/available-times"))
        .and(query_param("date", "2025-06-01"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "available_times": [] })),
        )
        .mount(&server)
        .await;

    let mut handle = session(&server, AuthSession::default());

    let types = wait_for(&mut handle, |e| match e {
        WizardEvent::VehicleTypes(FetchState::Ready(t)) => Some(t.clone()),
        _ => None,
    })
    .await;
    let _ = handle
        .commands
        .send(WizardCommand::SelectVehicle(types[0].clone()));
    let services = wait_for(&mut handle, |e| match e {
        WizardEvent::Services(FetchState::Ready(s)) => Some(s.clone()),
        _ => None,
    })
    .await;
    let _ = handle.commands.send(WizardCommand::SelectService(
        SelectedService::from_option(&services[0]),
    ));
    let washes = wait_for(&mut handle, |e| match e {
        WizardEvent::CarWashes(FetchState::Ready(w)) => Some(w.clone()),
        _ => None,
    })
    .await;
    let _ = handle
        .commands
        .send(WizardCommand::SelectCarWash(washes[0].clone()));
    let _ = handle
        .commands
        .send(WizardCommand::SetDate(Some("2025-06-01".into())));

    let times = wait_for(&mut handle, |e| match e {
        WizardEvent::AvailableTimes(FetchState::Ready(t)) => Some(t.clone()),
        _ => None,
    })
    .await;
    assert!(times.is_empty(), "empty list must arrive as Ready");

    handle.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn changing_the_date_refetches_available_times() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/carwashes/cw1/available-times"))
        .and(query_param("date", "2025-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "available_times": ["14:30"]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/carwashes/cw1/available-times"))
        .and(query_param("date", "2025-06-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "available_times": ["09:00"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut handle = session(&server, AuthSession::default());

    let types = wait_for(&mut handle, |e| match e {
        WizardEvent::VehicleTypes(FetchState::Ready(t)) => Some(t.clone()),
        _ => None,
    })
    .await;
    let _ = handle
        .commands
        .send(WizardCommand::SelectVehicle(types[0].clone()));
    let services = wait_for(&mut handle, |e| match e {
        WizardEvent::Services(FetchState::Ready(s)) => Some(s.clone()),
        _ => None,
    })
    .await;
    let _ = handle.commands.send(WizardCommand::SelectService(
        SelectedService::from_option(&services[0]),
    ));
    let washes = wait_for(&mut handle, |e| match e {
        WizardEvent::CarWashes(FetchState::Ready(w)) => Some(w.clone()),
        _ => None,
    })
    .await;
    let _ = handle
        .commands
        .send(WizardCommand::SelectCarWash(washes[0].clone()));

    let _ = handle
        .commands
        .send(WizardCommand::SetDate(Some("2025-06-01".into())));
    let first = wait_for(&mut handle, |e| match e {
        WizardEvent::AvailableTimes(FetchState::Ready(t)) => Some(t.clone()),
        _ => None,
    })
    .await;
    assert_eq!(first, vec!["14:30"]);

    let _ = handle
        .commands
        .send(WizardCommand::SetDate(Some("2025-06-02".into())));
    let second = wait_for(&mut handle, |e| match e {
        WizardEvent::AvailableTimes(FetchState::Ready(t)) => Some(t.clone()),
        _ => None,
    })
    .await;
    assert_eq!(second, vec!["09:00"]);

    // Mock expectations assert exactly one fetch per distinct date.
    handle.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn login_over_the_wire_updates_the_session() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": { "first_name": "Maria", "last_name": "P.", "email": "maria@example.gr" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .and(query_param("email", "maria@example.gr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let mut handle = session(&server, AuthSession::default());

    let _ = handle.commands.send(WizardCommand::LogIn {
        email: "maria@example.gr".into(),
        password: "s3cret".into(),
    });
    let user = wait_for(&mut handle, |e| match e {
        WizardEvent::LoggedIn(u) => Some(u.clone()),
        _ => None,
    })
    .await;
    assert_eq!(user.email, "maria@example.gr");

    let _ = handle.commands.send(WizardCommand::RefreshHistory);
    let history = wait_for(&mut handle, |e| match e {
        WizardEvent::History(FetchState::Ready(h)) => Some(h.clone()),
        _ => None,
    })
    .await;
    assert!(history.is_empty());

    handle.shutdown().await.expect("clean shutdown");
}
