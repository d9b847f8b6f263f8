//! Booking wizard session.
//!
//! One task owns all wizard state: the step-flow controller, the four
//! dependent fetch slots, the geocoded markers, and the auth session.
//! Presentation layers drive it over a command channel and observe it over
//! an event channel; fetches and geocode batches run as spawned sub-tasks
//! whose completions come back through an internal channel tagged with the
//! generation current when they were spawned. A completion whose generation
//! is stale for its slot is discarded.

pub mod fetch;
pub mod state;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::BackendClient;
use crate::geocode::{geocode_addresses, Geocoder};
use crate::model::{
    AddressEntry, AddressMarker, AuthSession, BookingSummary, CarWashOption, FetchState,
    Reservation, ReservationRequest, ServiceOption, User, WizardCommand, WizardEvent,
};
use fetch::FetchSlot;
use state::{Step, WizardState};

/// Completions of spawned sub-tasks, routed back into the session loop.
#[derive(Debug)]
enum TaskDone {
    VehicleTypes {
        generation: u64,
        result: Result<Vec<String>, String>,
    },
    Services {
        generation: u64,
        result: Result<Vec<ServiceOption>, String>,
    },
    CarWashes {
        generation: u64,
        result: Result<Vec<CarWashOption>, String>,
    },
    AvailableTimes {
        generation: u64,
        result: Result<Vec<String>, String>,
    },
    /// `None` means the location permission was denied; the batch is
    /// dropped silently.
    Markers {
        generation: u64,
        markers: Option<Vec<AddressMarker>>,
    },
    History {
        generation: u64,
        result: Result<Vec<Reservation>, String>,
    },
    LoggedIn {
        result: Result<User, String>,
    },
    BookingSaved {
        result: Result<(), String>,
    },
}

pub struct WizardSession<G> {
    api: BackendClient,
    geocoder: Arc<G>,
    auth: AuthSession,
    state: WizardState,
    vehicle_types: FetchSlot<String>,
    services: FetchSlot<ServiceOption>,
    car_washes: FetchSlot<CarWashOption>,
    times: FetchSlot<String>,
    history: FetchSlot<Reservation>,
    markers: Vec<AddressMarker>,
    marker_generation: u64,
    event_tx: UnboundedSender<WizardEvent>,
    done_tx: UnboundedSender<TaskDone>,
    done_rx: Option<UnboundedReceiver<TaskDone>>,
}

impl<G: Geocoder + 'static> WizardSession<G> {
    pub fn new(
        api: BackendClient,
        geocoder: G,
        auth: AuthSession,
        event_tx: UnboundedSender<WizardEvent>,
    ) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            api,
            geocoder: Arc::new(geocoder),
            auth,
            state: WizardState::new(),
            vehicle_types: FetchSlot::new(),
            services: FetchSlot::new(),
            car_washes: FetchSlot::new(),
            times: FetchSlot::new(),
            history: FetchSlot::new(),
            markers: Vec::new(),
            marker_generation: 0,
            event_tx,
            done_tx,
            done_rx: Some(done_rx),
        }
    }

    /// Run the session until `Quit` or the command channel closes.
    pub async fn run(mut self, mut cmd_rx: UnboundedReceiver<WizardCommand>) -> Result<()> {
        let Some(mut done_rx) = self.done_rx.take() else {
            anyhow::bail!("wizard session already ran");
        };

        self.start_vehicle_types_fetch();

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(WizardCommand::Quit) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                Some(done) = done_rx.recv() => self.handle_done(done),
            }
        }
        Ok(())
    }

    fn emit(&self, event: WizardEvent) {
        let _ = self.event_tx.send(event);
    }

    fn emit_step(&self) {
        self.emit(WizardEvent::StepChanged {
            step: self.state.step().number(),
        });
    }

    fn emit_schedule(&self) {
        let schedule = self.state.schedule();
        self.emit(WizardEvent::ScheduleChanged {
            date: schedule.date.clone(),
            time: schedule.time.clone(),
        });
    }

    fn handle_command(&mut self, cmd: WizardCommand) {
        match cmd {
            WizardCommand::SelectVehicle(vehicle_type) => {
                self.state.select_vehicle(vehicle_type);
                self.emit_step();
                self.emit_schedule();
                self.sync_effects();
            }
            WizardCommand::SelectService(service) => {
                if self.state.vehicle_type().is_none() {
                    self.emit(WizardEvent::Info("Select a vehicle type first.".into()));
                    return;
                }
                self.state.select_service(service);
                self.emit_step();
                self.sync_effects();
            }
            WizardCommand::SelectCarWash(car_wash) => {
                if self.state.step() != Step::CarWash {
                    return;
                }
                self.state.select_car_wash(car_wash);
                self.emit_step();
                self.sync_effects();
            }
            WizardCommand::SetDate(date) => {
                if let Some(d) = date.as_deref() {
                    if !valid_date(d) {
                        self.emit(WizardEvent::Info(format!(
                            "'{d}' is not a valid date (expected YYYY-MM-DD)."
                        )));
                        return;
                    }
                }
                self.state.set_date(date);
                self.emit_schedule();
                self.sync_effects();
            }
            WizardCommand::SetTime(time) => {
                if let Some(t) = time.as_deref() {
                    if !valid_time(t) {
                        self.emit(WizardEvent::Info(format!(
                            "'{t}' is not a valid time (expected HH:MM)."
                        )));
                        return;
                    }
                }
                self.state.set_time(time);
                self.emit_schedule();
            }
            WizardCommand::ConfirmSchedule => {
                if self.state.confirm_schedule() {
                    self.emit_step();
                    if let Some(summary) = self.build_summary() {
                        self.emit(WizardEvent::SummaryReady(Box::new(summary)));
                    }
                } else {
                    self.emit(WizardEvent::Info(
                        "Pick both a date and a time to continue.".into(),
                    ));
                }
            }
            WizardCommand::GoBack => {
                let before = self.state.step();
                self.state.go_back();
                if self.state.step() != before {
                    self.emit_step();
                    if before == Step::Summary {
                        self.emit_schedule();
                    }
                    self.sync_effects();
                }
            }
            WizardCommand::JumpToStep(n) => {
                let Some(target) = Step::from_number(n) else {
                    return;
                };
                let before = self.state.step();
                // Forward jumps are rejected inside the state machine.
                if self.state.jump_to_step(target) && self.state.step() != before {
                    self.emit_step();
                    self.emit_schedule();
                    self.sync_effects();
                }
            }
            WizardCommand::ConfirmBooking => self.confirm_booking(),
            WizardCommand::NewBooking => {
                self.state = WizardState::new();
                self.services.reset();
                self.car_washes.reset();
                self.times.reset();
                self.reset_markers();
                self.emit_step();
                self.emit_schedule();
                self.emit(WizardEvent::Services(FetchState::Idle));
                self.emit(WizardEvent::CarWashes(FetchState::Idle));
                self.emit(WizardEvent::AvailableTimes(FetchState::Idle));
                // Vehicle types stay loaded; a new booking is not a remount.
                self.emit(WizardEvent::VehicleTypes(self.vehicle_types.state().clone()));
            }
            WizardCommand::LogIn { email, password } => {
                let api = self.api.clone();
                let done = self.done_tx.clone();
                tokio::spawn(async move {
                    let result = api
                        .login(&email, &password)
                        .await
                        .map_err(|e| e.to_string());
                    let _ = done.send(TaskDone::LoggedIn { result });
                });
            }
            WizardCommand::LogOut => {
                self.auth.log_out();
                self.history.reset();
                self.emit(WizardEvent::LoggedOut);
                self.emit(WizardEvent::History(FetchState::Idle));
            }
            WizardCommand::RefreshHistory => self.refresh_history(),
            WizardCommand::Quit => {}
        }
    }

    /// Compare each slot's dependency key against the current state and
    /// start or drop fetches accordingly. Called after every state change.
    fn sync_effects(&mut self) {
        // Services depend on the vehicle type.
        let vehicle = self.state.vehicle_type().map(str::to_string);
        match vehicle.as_deref() {
            Some(vehicle) => {
                if let Some(generation) = self.services.begin(vehicle) {
                    self.spawn_services_fetch(generation, vehicle.to_string());
                    self.emit(WizardEvent::Services(FetchState::Loading));
                }
            }
            None => {
                if !matches!(self.services.state(), FetchState::Idle) {
                    self.services.reset();
                    self.emit(WizardEvent::Services(FetchState::Idle));
                }
            }
        }

        // Car washes depend on the selected service and the vehicle type.
        let wash_deps = match (self.state.service(), vehicle.as_deref()) {
            (Some(svc), Some(vehicle)) => Some((svc.title.clone(), vehicle.to_string())),
            _ => None,
        };
        match wash_deps {
            Some((service_name, vehicle_type)) => {
                let key = format!("{service_name}|{vehicle_type}");
                if let Some(generation) = self.car_washes.begin(&key) {
                    self.spawn_car_washes_fetch(generation, service_name, vehicle_type);
                    self.emit(WizardEvent::CarWashes(FetchState::Loading));
                }
            }
            None => {
                if !matches!(self.car_washes.state(), FetchState::Idle) {
                    self.car_washes.reset();
                    self.reset_markers();
                    self.emit(WizardEvent::CarWashes(FetchState::Idle));
                }
            }
        }

        // Available times depend on the car wash and the date; they must
        // never fire while either is unset.
        let time_deps = match (self.state.car_wash(), self.state.schedule().date.as_deref()) {
            (Some(cw), Some(date)) => Some((cw.id.clone(), date.to_string())),
            _ => None,
        };
        match time_deps {
            Some((car_wash_id, date)) => {
                let key = format!("{car_wash_id}|{date}");
                if let Some(generation) = self.times.begin(&key) {
                    self.spawn_times_fetch(generation, car_wash_id, date);
                    self.emit(WizardEvent::AvailableTimes(FetchState::Loading));
                }
            }
            None => {
                if !matches!(self.times.state(), FetchState::Idle) {
                    self.times.reset();
                    self.emit(WizardEvent::AvailableTimes(FetchState::Idle));
                }
            }
        }
    }

    fn start_vehicle_types_fetch(&mut self) {
        if let Some(generation) = self.vehicle_types.begin("all") {
            let api = self.api.clone();
            let done = self.done_tx.clone();
            tokio::spawn(async move {
                let result = api.vehicle_types().await.map_err(|e| e.to_string());
                let _ = done.send(TaskDone::VehicleTypes { generation, result });
            });
            self.emit(WizardEvent::VehicleTypes(FetchState::Loading));
        }
    }

    fn spawn_services_fetch(&self, generation: u64, vehicle_type: String) {
        let api = self.api.clone();
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let result = api
                .services_by_vehicle(&vehicle_type)
                .await
                .map_err(|e| e.to_string());
            let _ = done.send(TaskDone::Services { generation, result });
        });
    }

    fn spawn_car_washes_fetch(&self, generation: u64, service_name: String, vehicle_type: String) {
        let api = self.api.clone();
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let result = api
                .car_washes(&service_name, &vehicle_type)
                .await
                .map_err(|e| e.to_string());
            let _ = done.send(TaskDone::CarWashes { generation, result });
        });
    }

    fn spawn_times_fetch(&self, generation: u64, car_wash_id: String, date: String) {
        let api = self.api.clone();
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let result = api
                .available_times(&car_wash_id, &date)
                .await
                .map_err(|e| e.to_string());
            let _ = done.send(TaskDone::AvailableTimes { generation, result });
        });
    }

    /// Kick off a geocode batch for the given car washes. The current
    /// markers stay on screen until the replacement list lands; a batch
    /// superseded by a newer one is discarded on arrival.
    fn start_marker_batch(&mut self, washes: &[CarWashOption]) {
        self.marker_generation += 1;
        let generation = self.marker_generation;
        let entries: Vec<AddressEntry> = washes
            .iter()
            .enumerate()
            .map(|(idx, cw)| AddressEntry {
                id: idx,
                title: cw.name.clone(),
                description: cw.address.clone(),
                address: cw.address.clone(),
            })
            .collect();
        let geocoder = Arc::clone(&self.geocoder);
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let markers = geocode_addresses(geocoder.as_ref(), &entries).await;
            let _ = done.send(TaskDone::Markers { generation, markers });
        });
    }

    fn reset_markers(&mut self) {
        self.marker_generation += 1;
        if !self.markers.is_empty() {
            self.markers.clear();
            self.emit(WizardEvent::Markers(Vec::new()));
        }
    }

    fn refresh_history(&mut self) {
        let Some(email) = self.auth.user().map(|u| u.email.clone()) else {
            self.emit(WizardEvent::Info(
                "Log in to see your booking history.".into(),
            ));
            return;
        };
        if let Some(generation) = self.history.begin(&email) {
            let api = self.api.clone();
            let done = self.done_tx.clone();
            tokio::spawn(async move {
                let result = api.history(&email).await.map_err(|e| e.to_string());
                let _ = done.send(TaskDone::History { generation, result });
            });
            self.emit(WizardEvent::History(FetchState::Loading));
        }
    }

    fn confirm_booking(&mut self) {
        if self.state.step() != Step::Summary || !self.state.is_complete() {
            self.emit(WizardEvent::Info("The booking is not complete yet.".into()));
            return;
        }
        let Some(user) = self.auth.user() else {
            self.emit(WizardEvent::Info(
                "Log in to save the booking to your history.".into(),
            ));
            return;
        };
        // is_complete() held above, so the selections are all present.
        let (Some(vehicle_type), Some(service), Some(car_wash)) = (
            self.state.vehicle_type(),
            self.state.service(),
            self.state.car_wash(),
        ) else {
            return;
        };
        let schedule = self.state.schedule();
        let (Some(date), Some(time)) = (schedule.date.as_deref(), schedule.time.as_deref()) else {
            return;
        };
        let request = ReservationRequest {
            user_email: user.email.clone(),
            vehicle_type: vehicle_type.to_string(),
            service_id: service.service_id.clone(),
            car_wash_id: car_wash.id.clone(),
            reserved_at: format!("{date}T{time}:00"),
        };
        let api = self.api.clone();
        let done = self.done_tx.clone();
        tokio::spawn(async move {
            let result = api
                .save_reservation(&request)
                .await
                .map_err(|e| e.to_string());
            let _ = done.send(TaskDone::BookingSaved { result });
        });
    }

    fn build_summary(&self) -> Option<BookingSummary> {
        let schedule = self.state.schedule();
        Some(BookingSummary {
            vehicle_type: self.state.vehicle_type()?.to_string(),
            service: self.state.service()?.title.clone(),
            price: self.state.service()?.price,
            car_wash: self.state.car_wash()?.name.clone(),
            address: self.state.address()?.to_string(),
            date: schedule.date.clone()?,
            time: schedule.time.clone()?,
            saved_to_history: false,
        })
    }

    fn handle_done(&mut self, done: TaskDone) {
        match done {
            TaskDone::VehicleTypes { generation, result } => {
                if self.vehicle_types.resolve(generation, result) {
                    self.emit(WizardEvent::VehicleTypes(self.vehicle_types.state().clone()));
                }
            }
            TaskDone::Services { generation, result } => {
                if self.services.resolve(generation, result) {
                    self.emit(WizardEvent::Services(self.services.state().clone()));
                }
            }
            TaskDone::CarWashes { generation, result } => {
                if self.car_washes.resolve(generation, result) {
                    if let Some(washes) = self.car_washes.state().items() {
                        let washes = washes.to_vec();
                        self.start_marker_batch(&washes);
                    }
                    self.emit(WizardEvent::CarWashes(self.car_washes.state().clone()));
                }
            }
            TaskDone::AvailableTimes { generation, result } => {
                if self.times.resolve(generation, result) {
                    self.emit(WizardEvent::AvailableTimes(self.times.state().clone()));
                }
            }
            TaskDone::Markers { generation, markers } => {
                if generation != self.marker_generation {
                    return;
                }
                // None means permission denied: no markers are emitted and
                // the UI keeps treating the adapter as "no markers yet".
                if let Some(markers) = markers {
                    self.markers = markers;
                    self.emit(WizardEvent::Markers(self.markers.clone()));
                }
            }
            TaskDone::History { generation, result } => {
                if self.history.resolve(generation, result) {
                    self.emit(WizardEvent::History(self.history.state().clone()));
                }
            }
            TaskDone::LoggedIn { result } => match result {
                Ok(user) => {
                    self.auth.log_in(user.clone());
                    self.emit(WizardEvent::LoggedIn(user));
                }
                Err(message) => self.emit(WizardEvent::LoginFailed(message)),
            },
            TaskDone::BookingSaved { result } => match result {
                Ok(()) => self.emit(WizardEvent::BookingSaved),
                Err(message) => self.emit(WizardEvent::BookingSaveFailed(message)),
            },
        }
    }
}

pub(crate) fn valid_date(s: &str) -> bool {
    time::Date::parse(s, time::macros::format_description!("[year]-[month]-[day]")).is_ok()
}

pub(crate) fn valid_time(s: &str) -> bool {
    time::Time::parse(s, time::macros::format_description!("[hour]:[minute]")).is_ok()
}
