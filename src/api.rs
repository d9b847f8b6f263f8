//! HTTP client for the wash-booking REST backend.
//!
//! Wraps `reqwest` with typed response deserialization and uniform error
//! handling. The backend reports failures either as a rejected connection
//! or as a non-2xx status with a JSON `{"message": ...}` body; both surface
//! as [`ApiError`] variants so callers can show a dismissible message and
//! keep going.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{
    CarWashOption, DistinctService, RegisterRequest, Reservation, ReservationRequest,
    ServiceOption, User, UserProfile,
};

/// Errors returned by the booking backend client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status. Carries the server's
    /// `message` field when one was sent, otherwise the status line.
    #[error("server error ({status}): {message}")]
    Server { status: StatusCode, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct AvailableTimesResponse {
    #[serde(default)]
    available_times: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    verification_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the booking backend.
///
/// Holds the HTTP client and base URL. Construct with [`BackendClient::new`]
/// against a real server or a wiremock URI in tests.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    /// Creates a client for the backend at `base_url` (scheme + host + port).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::Server`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("washbook/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Ensure exactly one trailing slash so join() appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::Server {
            status: StatusCode::BAD_REQUEST,
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self { client, base_url })
    }

    /// `GET /api/services/vehicle-types`
    pub async fn vehicle_types(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["api", "services", "vehicle-types"]);
        self.get_json(url, "vehicle-types").await
    }

    /// `GET /api/services/by-vehicle/{vehicle_type}`
    pub async fn services_by_vehicle(
        &self,
        vehicle_type: &str,
    ) -> Result<Vec<ServiceOption>, ApiError> {
        let url = self.endpoint(&["api", "services", "by-vehicle", vehicle_type]);
        self.get_json(url, "services-by-vehicle").await
    }

    /// `GET /api/services/distinct`
    pub async fn distinct_services(&self) -> Result<Vec<DistinctService>, ApiError> {
        let url = self.endpoint(&["api", "services", "distinct"]);
        self.get_json(url, "distinct-services").await
    }

    /// `GET /api/carwashes?service_name=&vehicle_type=`
    ///
    /// The backend keys this lookup on the service's display name and the
    /// vehicle-type label, not on stable ids. Values are percent-encoded
    /// here, but a title mismatch on the server side returns an empty list.
    pub async fn car_washes(
        &self,
        service_name: &str,
        vehicle_type: &str,
    ) -> Result<Vec<CarWashOption>, ApiError> {
        let url = self.car_wash_query_url(service_name, vehicle_type);
        self.get_json(url, "carwashes").await
    }

    /// `GET /api/carwashes/{id}/available-times?date=YYYY-MM-DD`
    pub async fn available_times(
        &self,
        car_wash_id: &str,
        date: &str,
    ) -> Result<Vec<String>, ApiError> {
        let mut url = self.endpoint(&["api", "carwashes", car_wash_id, "available-times"]);
        url.query_pairs_mut().append_pair("date", date);
        let resp: AvailableTimesResponse = self.get_json(url, "available-times").await?;
        Ok(resp.available_times)
    }

    /// `POST /api/auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let url = self.endpoint(&["api", "auth", "login"]);
        let body = serde_json::json!({ "email": email, "password": password });
        let resp: UserEnvelope = self.post_json(url, &body, "login").await?;
        Ok(resp.user)
    }

    /// `POST /api/auth/register`
    ///
    /// Dev backends echo the verification code in the response; it is passed
    /// through so the caller can show it.
    pub async fn register(&self, req: &RegisterRequest) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(&["api", "auth", "register"]);
        let resp: RegisterResponse = self.post_json(url, req, "register").await?;
        Ok(resp.verification_code)
    }

    /// `POST /api/auth/verify`
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<User, ApiError> {
        let url = self.endpoint(&["api", "auth", "verify"]);
        let body = serde_json::json!({ "email": email, "verification_code": code });
        let resp: UserEnvelope = self.post_json(url, &body, "verify").await?;
        Ok(resp.user)
    }

    /// `GET /api/user/profile?email=`
    pub async fn fetch_profile(&self, email: &str) -> Result<UserProfile, ApiError> {
        let mut url = self.endpoint(&["api", "user", "profile"]);
        url.query_pairs_mut().append_pair("email", email);
        self.get_json(url, "profile").await
    }

    /// `PUT /api/user/profile`
    pub async fn update_profile(&self, profile: &UserProfile) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "user", "profile"]);
        let response = self.client.put(url).json(profile).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// `GET /api/history?email=`
    pub async fn history(&self, email: &str) -> Result<Vec<Reservation>, ApiError> {
        let mut url = self.endpoint(&["api", "history"]);
        url.query_pairs_mut().append_pair("email", email);
        self.get_json(url, "history").await
    }

    /// `POST /api/history`
    pub async fn save_reservation(&self, req: &ReservationRequest) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "history"]);
        let response = self.client.post(url).json(req).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Joins path segments onto the base URL with percent-encoding applied
    /// per segment (vehicle-type labels contain spaces and non-ASCII).
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // http URLs always have a path, so segments_mut cannot fail here.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for seg in segments {
                path.push(seg);
            }
        }
        url
    }

    fn car_wash_query_url(&self, service_name: &str, vehicle_type: &str) -> Url {
        let mut url = self.endpoint(&["api", "carwashes"]);
        url.query_pairs_mut()
            .append_pair("service_name", service_name)
            .append_pair("vehicle_type", vehicle_type);
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await?;
        let body = Self::check_status(response).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = self.client.post(url).json(body).send().await?;
        let text = Self::check_status(response).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    /// Returns the response body on 2xx; otherwise extracts the backend's
    /// `message` field (or falls back to the status line) as
    /// [`ApiError::Server`].
    async fn check_status(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_success() {
            return Ok(body);
        }
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| status.to_string());
        Err(ApiError::Server { status, message })
    }
}
