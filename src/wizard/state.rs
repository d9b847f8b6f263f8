//! Step-flow controller for the booking wizard.
//!
//! Pure state machine, no I/O. Owns the current step and every selection
//! accumulated so far; the session loop in [`crate::wizard`] turns state
//! changes into fetch effects. Invariant: a field belonging to a step past
//! the current one is never populated; navigating backward clears the
//! state introduced by each step being left.

use crate::model::{CarWashOption, Schedule, SelectedService};

/// The four wizard steps, in booking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    /// Vehicle type + service selection (one screen, two lists).
    Service = 1,
    CarWash = 2,
    Schedule = 3,
    Summary = 4,
}

impl Step {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Step::Service),
            2 => Some(Step::CarWash),
            3 => Some(Step::Schedule),
            4 => Some(Step::Summary),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Service => "Service",
            Step::CarWash => "Car wash",
            Step::Schedule => "Schedule",
            Step::Summary => "Booking",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WizardState {
    step: Step,
    vehicle_type: Option<String>,
    service: Option<SelectedService>,
    car_wash: Option<CarWashOption>,
    address: Option<String>,
    schedule: Schedule,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: Step::Service,
            vehicle_type: None,
            service: None,
            car_wash: None,
            address: None,
            schedule: Schedule::default(),
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn vehicle_type(&self) -> Option<&str> {
        self.vehicle_type.as_deref()
    }

    pub fn service(&self) -> Option<&SelectedService> {
        self.service.as_ref()
    }

    pub fn car_wash(&self) -> Option<&CarWashOption> {
        self.car_wash.as_ref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// All four steps have their selections in place.
    pub fn is_complete(&self) -> bool {
        self.vehicle_type.is_some()
            && self.service.is_some()
            && self.car_wash.is_some()
            && self.schedule.is_complete()
    }

    /// Picking a vehicle restarts the flow: every later selection is
    /// dropped and the wizard returns to step 1, where the service list for
    /// the new vehicle appears. No auto-advance.
    pub fn select_vehicle(&mut self, vehicle_type: String) {
        self.vehicle_type = Some(vehicle_type);
        self.service = None;
        self.car_wash = None;
        self.address = None;
        self.schedule = Schedule::default();
        self.step = Step::Service;
    }

    /// Picking a service advances to the car-wash step.
    pub fn select_service(&mut self, service: SelectedService) {
        self.service = Some(service);
        self.step = Step::CarWash;
    }

    /// Picking a car wash records it (and its address) and advances to the
    /// schedule step.
    pub fn select_car_wash(&mut self, car_wash: CarWashOption) {
        self.address = Some(car_wash.address.clone());
        self.car_wash = Some(car_wash);
        self.step = Step::Schedule;
    }

    /// Updates the schedule in place. Never advances; moving 3→4 is the
    /// explicit [`WizardState::confirm_schedule`].
    pub fn set_date(&mut self, date: Option<String>) {
        self.schedule.date = date;
    }

    pub fn set_time(&mut self, time: Option<String>) {
        self.schedule.time = time;
    }

    /// Advances to the summary iff both date and time are set. Returns
    /// whether the advance happened.
    pub fn confirm_schedule(&mut self) -> bool {
        if self.step == Step::Schedule && self.schedule.is_complete() {
            self.step = Step::Summary;
            true
        } else {
            false
        }
    }

    /// Steps back once, clearing the state introduced by the step being
    /// left. No-op on step 1.
    pub fn go_back(&mut self) {
        match self.step {
            Step::Service => {}
            Step::CarWash => {
                self.service = None;
                self.step = Step::Service;
            }
            Step::Schedule => {
                self.car_wash = None;
                self.address = None;
                self.step = Step::CarWash;
            }
            Step::Summary => {
                self.schedule = Schedule::default();
                self.step = Step::Schedule;
            }
        }
    }

    /// Jumps to an earlier (or the current) step; forward jumps are no-ops.
    /// Implemented as repeated single-step backs so each step's state is
    /// cleared on the way past it. Returns whether the jump happened.
    pub fn jump_to_step(&mut self, target: Step) -> bool {
        if target > self.step {
            return false;
        }
        while self.step > target {
            self.go_back();
        }
        true
    }
}
