use crate::model::{
    AddressMarker, BookingSummary, CarWashOption, FetchState, Reservation, ServiceOption, User,
    WizardEvent,
};

/// Which list has keyboard focus on the combined vehicle/service step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFocus {
    Vehicles,
    Services,
}

/// Login modal contents.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus_password: bool,
}

pub struct UiState {
    pub tab: usize,
    pub show_help: bool,
    pub info: String,
    pub user: Option<User>,

    // Mirrors of the wizard session, updated only through apply_event.
    pub step: u8,
    pub vehicle_types: FetchState<String>,
    pub services: FetchState<ServiceOption>,
    pub car_washes: FetchState<CarWashOption>,
    pub times: FetchState<String>,
    pub markers: Vec<AddressMarker>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub summary: Option<BookingSummary>,
    pub history: FetchState<Reservation>,

    // Local input state.
    pub focus: BookingFocus,
    pub selected_vehicle: Option<String>,
    pub vehicle_cursor: usize,
    pub service_cursor: usize,
    pub wash_cursor: usize,
    pub time_cursor: usize,
    pub history_cursor: usize,
    pub date_input: String,
    pub date_editing: bool,
    pub login: Option<LoginForm>,
}

impl UiState {
    pub fn new(user: Option<User>) -> Self {
        Self {
            tab: 0,
            show_help: false,
            info: String::new(),
            user,
            step: 1,
            vehicle_types: FetchState::Loading,
            services: FetchState::Idle,
            car_washes: FetchState::Idle,
            times: FetchState::Idle,
            markers: Vec::new(),
            date: None,
            time: None,
            summary: None,
            history: FetchState::Idle,
            focus: BookingFocus::Vehicles,
            selected_vehicle: None,
            vehicle_cursor: 0,
            service_cursor: 0,
            wash_cursor: 0,
            time_cursor: 0,
            history_cursor: 0,
            date_input: String::new(),
            date_editing: false,
            login: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Fold a wizard event into the mirrored state.
    pub fn apply_event(&mut self, event: WizardEvent) {
        match event {
            WizardEvent::StepChanged { step } => {
                self.step = step;
                if step < 4 {
                    self.summary = None;
                }
                if step == 1 {
                    self.wash_cursor = 0;
                    self.time_cursor = 0;
                }
            }
            WizardEvent::VehicleTypes(fs) => {
                clamp_cursor(&mut self.vehicle_cursor, &fs);
                self.vehicle_types = fs;
            }
            WizardEvent::Services(fs) => {
                clamp_cursor(&mut self.service_cursor, &fs);
                self.services = fs;
            }
            WizardEvent::CarWashes(fs) => {
                clamp_cursor(&mut self.wash_cursor, &fs);
                self.car_washes = fs;
            }
            WizardEvent::AvailableTimes(fs) => {
                clamp_cursor(&mut self.time_cursor, &fs);
                self.times = fs;
            }
            WizardEvent::Markers(markers) => self.markers = markers,
            WizardEvent::ScheduleChanged { date, time } => {
                if date.is_none() {
                    self.date_input.clear();
                }
                self.date = date;
                self.time = time;
            }
            WizardEvent::SummaryReady(summary) => self.summary = Some(*summary),
            WizardEvent::LoggedIn(user) => {
                self.info = format!("Logged in as {}", user.email);
                self.user = Some(user);
                self.login = None;
            }
            WizardEvent::LoginFailed(msg) => self.info = format!("Login failed: {msg}"),
            WizardEvent::LoggedOut => {
                self.user = None;
                self.info = "Logged out.".into();
            }
            WizardEvent::History(fs) => {
                if let FetchState::Ready(items) = &fs {
                    self.history_cursor = self.history_cursor.min(items.len().saturating_sub(1));
                }
                self.history = fs;
            }
            WizardEvent::BookingSaved => {
                if let Some(summary) = self.summary.as_mut() {
                    summary.saved_to_history = true;
                }
                self.info = "Reservation saved to your booking history.".into();
            }
            WizardEvent::BookingSaveFailed(msg) => {
                self.info =
                    format!("Booking completed locally, but saving it to history failed: {msg}");
            }
            WizardEvent::Info(msg) => self.info = msg,
        }
    }

    /// The marker matching a car-wash list index, if the batch has landed.
    pub fn marker_for(&self, index: usize) -> Option<&AddressMarker> {
        self.markers.iter().find(|m| m.id == index)
    }
}

fn clamp_cursor<T>(cursor: &mut usize, fs: &FetchState<T>) {
    if let FetchState::Ready(items) = fs {
        *cursor = (*cursor).min(items.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    #[test]
    fn leaving_the_summary_step_drops_the_summary() {
        let mut state = UiState::new(None);
        state.summary = Some(BookingSummary {
            vehicle_type: "SUV".into(),
            service: "wash".into(),
            price: 8.0,
            car_wash: "Sparkle".into(),
            address: "Main St 1".into(),
            date: "2025-06-01".into(),
            time: "14:30".into(),
            saved_to_history: false,
        });
        state.apply_event(WizardEvent::StepChanged { step: 3 });
        assert!(state.summary.is_none());
    }

    #[test]
    fn cursor_is_clamped_when_a_shorter_list_arrives() {
        let mut state = UiState::new(None);
        state.service_cursor = 5;
        state.apply_event(WizardEvent::Services(FetchState::Ready(vec![])));
        assert_eq!(state.service_cursor, 0);
    }

    #[test]
    fn login_event_closes_the_modal() {
        let mut state = UiState::new(None);
        state.login = Some(LoginForm::default());
        state.apply_event(WizardEvent::LoggedIn(User {
            first_name: "Maria".into(),
            last_name: "P.".into(),
            email: "maria@example.gr".into(),
        }));
        assert!(state.login.is_none());
        assert!(state.is_logged_in());
    }

    #[test]
    fn booking_saved_marks_the_summary() {
        let mut state = UiState::new(None);
        state.apply_event(WizardEvent::SummaryReady(Box::new(BookingSummary {
            vehicle_type: "SUV".into(),
            service: "wash".into(),
            price: 8.0,
            car_wash: "Sparkle".into(),
            address: "Main St 1".into(),
            date: "2025-06-01".into(),
            time: "14:30".into(),
            saved_to_history: false,
        })));
        state.apply_event(WizardEvent::BookingSaved);
        assert!(state.summary.as_ref().is_some_and(|s| s.saved_to_history));
    }

    #[test]
    fn markers_are_looked_up_by_list_index() {
        let mut state = UiState::new(None);
        state.apply_event(WizardEvent::Markers(vec![AddressMarker {
            id: 1,
            title: "Sparkle".into(),
            description: "Main St 1".into(),
            coordinate: Some(Coordinate {
                latitude: 37.98,
                longitude: 23.72,
            }),
        }]));
        assert!(state.marker_for(1).is_some());
        assert!(state.marker_for(0).is_none());
    }
}
