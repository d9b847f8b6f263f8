use serde::{Deserialize, Serialize};

/// A priced offering tied to a car wash and a vehicle type, as served by
/// `GET /api/services/by-vehicle/{vehicle_type}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOption {
    #[serde(rename = "_id")]
    pub id: String,
    pub car_wash_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub vehicle_type: Option<String>,
}

/// A physical wash location, as served by `GET /api/carwashes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarWashOption {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A distinct offering for the browse view, independent of vehicle type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistinctService {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub available_locations: Option<u32>,
}

/// The service picked in step 1, reduced to what later steps need.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedService {
    pub service_id: String,
    pub car_wash_id: String,
    pub title: String,
    pub price: f64,
}

impl SelectedService {
    pub fn from_option(svc: &ServiceOption) -> Self {
        Self {
            service_id: svc.id.clone(),
            car_wash_id: svc.car_wash_id.clone(),
            title: svc.name.clone(),
            price: svc.price,
        }
    }
}

/// Date and time picked in step 3. Both must be set before step 4 opens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `HH:MM`
    pub time: Option<String>,
}

impl Schedule {
    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.time.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// One address handed to the geocoding adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressEntry {
    pub id: usize,
    pub title: String,
    pub description: String,
    pub address: String,
}

/// A map annotation derived from a geocoded address. `coordinate` is `None`
/// when the lookup found nothing; such markers stay in list views but are
/// excluded from map rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressMarker {
    pub id: usize,
    pub title: String,
    pub description: String,
    pub coordinate: Option<Coordinate>,
}

/// Tri-state result of a dependent fetch. `Ready` with an empty list is a
/// valid terminal state ("nothing available") and is distinct from both
/// `Loading` and `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Dependencies not met yet; nothing requested.
    Idle,
    Loading,
    Ready(Vec<T>),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn items(&self) -> Option<&[T]> {
        match self {
            FetchState::Ready(items) => Some(items),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// In-memory auth session, passed down explicitly rather than read from a
/// global. Lost on exit; the backend has no session protocol.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    user: Option<User>,
}

impl AuthSession {
    pub fn logged_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn log_in(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn log_out(&mut self) {
        self.user = None;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

/// Body for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Body for `POST /api/history`.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationRequest {
    pub user_email: String,
    pub vehicle_type: String,
    pub service_id: String,
    pub car_wash_id: String,
    /// `{date}T{time}:00`
    pub reserved_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservedService {
    pub name: String,
    pub price: f64,
}

/// A past booking, as served by `GET /api/history?email=`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub reservation_id: String,
    pub reserved_at: String,
    pub vehicle_type: String,
    pub car_wash_name: String,
    pub service: ReservedService,
}

/// Everything the step-4 summary shows, plus whether the reservation made
/// it into the backend history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    pub vehicle_type: String,
    pub service: String,
    pub price: f64,
    pub car_wash: String,
    pub address: String,
    pub date: String,
    pub time: String,
    pub saved_to_history: bool,
}

/// Commands sent from presentation layers into the wizard session.
#[derive(Debug, Clone)]
pub enum WizardCommand {
    SelectVehicle(String),
    SelectService(SelectedService),
    SelectCarWash(CarWashOption),
    SetDate(Option<String>),
    SetTime(Option<String>),
    /// Explicit 3→4 advance; ignored unless both date and time are set.
    ConfirmSchedule,
    GoBack,
    JumpToStep(u8),
    /// Submit the completed booking to the backend history.
    ConfirmBooking,
    /// Reset the wizard for another booking, keeping auth state.
    NewBooking,
    LogIn { email: String, password: String },
    LogOut,
    RefreshHistory,
    Quit,
}

/// Events emitted by the wizard session and consumed by UI/CLI layers.
#[derive(Debug, Clone)]
pub enum WizardEvent {
    StepChanged {
        step: u8,
    },
    VehicleTypes(FetchState<String>),
    Services(FetchState<ServiceOption>),
    CarWashes(FetchState<CarWashOption>),
    AvailableTimes(FetchState<String>),
    /// Full replacement marker list from a completed geocode batch.
    Markers(Vec<AddressMarker>),
    ScheduleChanged {
        date: Option<String>,
        time: Option<String>,
    },
    /// Entering step 4 with a complete selection.
    // Box to keep WizardEvent size small.
    SummaryReady(Box<BookingSummary>),
    LoggedIn(User),
    LoginFailed(String),
    LoggedOut,
    History(FetchState<Reservation>),
    BookingSaved,
    /// The booking completed locally but the history write failed.
    BookingSaveFailed(String),
    Info(String),
}
