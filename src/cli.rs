use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;

use crate::api::BackendClient;
use crate::config::{self, ServerConfig};
use crate::geocode::NominatimGeocoder;
use crate::model::{
    AuthSession, FetchState, RegisterRequest, SelectedService, UserProfile, WizardCommand,
    WizardEvent,
};
use crate::orchestrator;
use crate::summary::build_booking_summary;

/// Output line routing for the stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "washbook",
    version,
    about = "Book vehicle wash appointments from the terminal"
)]
pub struct Cli {
    /// Backend host; overrides the config file
    #[arg(long)]
    pub host: Option<String>,

    /// Backend port; overrides the config file
    #[arg(long)]
    pub port: Option<u16>,

    /// HTTP request timeout
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,

    /// Account email, used for login and history lookups
    #[arg(long)]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "WASHBOOK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Withhold the location permission: no geocoding, no map markers
    #[arg(long)]
    pub no_geocode: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a scripted booking without the TUI
    Book(BookArgs),
    /// List the distinct services offered across car washes
    Services {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show your booking history
    History {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Register a new account
    Register(RegisterArgs),
    /// Verify a registered email with the code you received
    Verify {
        /// The verification code
        code: String,
    },
    /// Show or update your account profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Debug, Args, Clone)]
pub struct BookArgs {
    /// Vehicle type label, e.g. "SUV"
    #[arg(long)]
    pub vehicle: String,

    /// Service name, e.g. "Εξωτερικό πλύσιμο"
    #[arg(long)]
    pub service: String,

    /// Car wash name; may be omitted when exactly one offers the service
    #[arg(long)]
    pub car_wash: Option<String>,

    /// Appointment date, YYYY-MM-DD
    #[arg(long)]
    pub date: String,

    /// Appointment time, HH:MM
    #[arg(long)]
    pub time: String,

    /// Submit the reservation to your booking history (requires login)
    #[arg(long)]
    pub book: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub zip_code: String,
}

#[derive(Debug, Subcommand, Clone)]
pub enum ProfileAction {
    /// Print the stored profile
    Show,
    /// Update one or more profile fields
    Update(ProfileUpdateArgs),
}

#[derive(Debug, Args, Clone, Default)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub zip_code: Option<String>,
}

/// Apply CLI overrides on top of the config file.
pub fn build_config(args: &Cli) -> Result<ServerConfig> {
    let mut cfg = config::load()?;
    if let Some(host) = &args.host {
        cfg.host = host.clone();
    }
    if let Some(port) = args.port {
        cfg.port = port;
    }
    if let Some(timeout) = args.timeout {
        cfg.request_timeout = timeout.into();
    }
    Ok(cfg)
}

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args)?;
    let api = BackendClient::new(&cfg.base_url(), cfg.request_timeout)
        .context("construct backend client")?;

    match args.command.clone() {
        Some(Command::Book(book)) => run_booking_script(&args, api, book).await,
        Some(Command::Services { json }) => list_services(api, json).await,
        Some(Command::History { json }) => show_history(&args, api, json).await,
        Some(Command::Register(register)) => run_register(&args, api, register).await,
        Some(Command::Verify { code }) => run_verify(&args, api, &code).await,
        Some(Command::Profile { action }) => run_profile(&args, api, action).await,
        None => {
            #[cfg(feature = "tui")]
            {
                let auth = maybe_log_in(&args, &api).await?;
                let geocoder = NominatimGeocoder::new(!args.no_geocode)
                    .context("construct geocoder")?;
                crate::tui::run(api, geocoder, auth).await
            }
            #[cfg(not(feature = "tui"))]
            {
                bail!("this build has no TUI; use a subcommand such as 'washbook book'")
            }
        }
    }
}

fn required_email(args: &Cli) -> Result<String> {
    args.email
        .clone()
        .context("pass --email (the backend keys accounts on it)")
}

/// Log in when both credentials are present; otherwise stay anonymous.
async fn maybe_log_in(args: &Cli, api: &BackendClient) -> Result<AuthSession> {
    match (&args.email, &args.password) {
        (Some(email), Some(password)) => {
            let user = api
                .login(email, password)
                .await
                .context("login failed")?;
            log::info!("logged in as {}", user.email);
            Ok(AuthSession::logged_in(user))
        }
        _ => Ok(AuthSession::default()),
    }
}

async fn require_log_in(args: &Cli, api: &BackendClient) -> Result<AuthSession> {
    let email = required_email(args)?;
    let password = args
        .password
        .clone()
        .context("pass --password or set WASHBOOK_PASSWORD")?;
    let user = api.login(&email, &password).await.context("login failed")?;
    Ok(AuthSession::logged_in(user))
}

/// Drive the wizard session through all four steps from command-line
/// selections, then print the summary.
async fn run_booking_script(args: &Cli, api: BackendClient, book: BookArgs) -> Result<()> {
    // Fail fast; a malformed date or time would otherwise stall the run
    // waiting on a fetch that never fires.
    if !crate::wizard::valid_date(&book.date) {
        bail!("'{}' is not a valid date (expected YYYY-MM-DD)", book.date);
    }
    if !crate::wizard::valid_time(&book.time) {
        bail!("'{}' is not a valid time (expected HH:MM)", book.time);
    }

    let auth = if book.book {
        require_log_in(args, &api).await?
    } else {
        maybe_log_in(args, &api).await?
    };

    let geocoder = NominatimGeocoder::new(!args.no_geocode).context("construct geocoder")?;
    let handle = orchestrator::spawn_session(api, geocoder, auth);
    let orchestrator::SessionHandle {
        commands,
        mut events,
        task,
    } = handle;

    let (out_tx, out_handle) = spawn_output_writer();
    let mut summary = None;

    while let Some(event) = events.recv().await {
        match event {
            WizardEvent::VehicleTypes(FetchState::Ready(types)) => {
                let Some(vehicle) = types.iter().find(|t| t.as_str() == book.vehicle) else {
                    bail!(
                        "vehicle type '{}' not offered (available: {})",
                        book.vehicle,
                        types.join(", ")
                    );
                };
                let _ = commands.send(WizardCommand::SelectVehicle(vehicle.clone()));
            }
            WizardEvent::VehicleTypes(FetchState::Failed(msg)) => {
                bail!("could not load vehicle types: {msg}")
            }
            WizardEvent::Services(FetchState::Ready(services)) => {
                let Some(service) = services.iter().find(|s| s.name == book.service) else {
                    let names: Vec<_> = services.iter().map(|s| s.name.as_str()).collect();
                    bail!(
                        "service '{}' not offered for {} (available: {})",
                        book.service,
                        book.vehicle,
                        names.join(", ")
                    );
                };
                let _ = commands.send(WizardCommand::SelectService(SelectedService::from_option(
                    service,
                )));
            }
            WizardEvent::Services(FetchState::Failed(msg)) => {
                bail!("could not load services: {msg}")
            }
            WizardEvent::CarWashes(FetchState::Ready(washes)) => {
                if washes.is_empty() {
                    bail!("no car wash offers '{}' for {}", book.service, book.vehicle);
                }
                let wash = match &book.car_wash {
                    Some(name) => washes.iter().find(|w| &w.name == name).with_context(|| {
                        let names: Vec<_> = washes.iter().map(|w| w.name.as_str()).collect();
                        format!("car wash '{name}' not found (available: {})", names.join(", "))
                    })?,
                    None if washes.len() == 1 => &washes[0],
                    None => {
                        let names: Vec<_> = washes.iter().map(|w| w.name.as_str()).collect();
                        bail!(
                            "several car washes offer this service, pass --car-wash (available: {})",
                            names.join(", ")
                        );
                    }
                };
                let _ = commands.send(WizardCommand::SelectCarWash(wash.clone()));
                let _ = commands.send(WizardCommand::SetDate(Some(book.date.clone())));
                let _ = commands.send(WizardCommand::SetTime(Some(book.time.clone())));
            }
            WizardEvent::CarWashes(FetchState::Failed(msg)) => {
                bail!("could not load car washes: {msg}")
            }
            WizardEvent::AvailableTimes(FetchState::Ready(times)) => {
                if times.is_empty() {
                    let _ = out_tx.send(OutputLine::Stdout(format!(
                        "No available times at this car wash on {}.",
                        book.date
                    )));
                    break;
                }
                if !times.iter().any(|t| t == &book.time) {
                    bail!(
                        "{} is not available on {} (available: {})",
                        book.time,
                        book.date,
                        times.join(", ")
                    );
                }
                let _ = commands.send(WizardCommand::ConfirmSchedule);
            }
            WizardEvent::AvailableTimes(FetchState::Failed(msg)) => {
                bail!("could not load available times: {msg}")
            }
            WizardEvent::Markers(markers) => {
                let located = markers.iter().filter(|m| m.coordinate.is_some()).count();
                if !markers.is_empty() {
                    let _ = out_tx.send(OutputLine::Stderr(format!(
                        "Located {located} of {} car wash addresses",
                        markers.len()
                    )));
                }
            }
            WizardEvent::SummaryReady(s) => {
                if book.book {
                    let _ = commands.send(WizardCommand::ConfirmBooking);
                    summary = Some(*s);
                } else {
                    summary = Some(*s);
                    break;
                }
            }
            WizardEvent::BookingSaved => {
                if let Some(s) = summary.as_mut() {
                    s.saved_to_history = true;
                }
                break;
            }
            WizardEvent::BookingSaveFailed(msg) => {
                let _ = out_tx.send(OutputLine::Stderr(format!(
                    "Booking completed locally, but saving it to history failed: {msg}"
                )));
                break;
            }
            WizardEvent::Info(msg) => {
                let _ = out_tx.send(OutputLine::Stderr(msg));
            }
            // Progress events the scripted run does not need.
            WizardEvent::StepChanged { .. }
            | WizardEvent::ScheduleChanged { .. }
            | WizardEvent::VehicleTypes(_)
            | WizardEvent::Services(_)
            | WizardEvent::CarWashes(_)
            | WizardEvent::AvailableTimes(_)
            | WizardEvent::LoggedIn(_)
            | WizardEvent::LoginFailed(_)
            | WizardEvent::LoggedOut
            | WizardEvent::History(_) => {}
        }
    }

    let _ = commands.send(WizardCommand::Quit);
    task.await
        .context("wizard session task panicked")?
        .context("wizard session failed")?;

    if let Some(summary) = summary {
        if book.json {
            let _ = out_tx.send(OutputLine::Stdout(serde_json::to_string_pretty(&summary)?));
        } else {
            for line in build_booking_summary(&summary).lines {
                let _ = out_tx.send(OutputLine::Stdout(line));
            }
        }
    }

    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

async fn list_services(api: BackendClient, json: bool) -> Result<()> {
    let services = api
        .distinct_services()
        .await
        .context("could not load services")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&services)?);
        return Ok(());
    }
    if services.is_empty() {
        println!("No services available.");
        return Ok(());
    }
    for svc in services {
        let price = svc
            .price
            .map(|p| format!("{p:.2} €"))
            .unwrap_or_else(|| "price varies".to_string());
        println!("{}  ({price})", svc.name);
        if !svc.description.is_empty() {
            println!("    {}", svc.description);
        }
        if let Some(n) = svc.available_locations {
            println!("    available at {n} car washes");
        }
    }
    Ok(())
}

async fn show_history(args: &Cli, api: BackendClient, json: bool) -> Result<()> {
    let email = required_email(args)?;
    let reservations = api
        .history(&email)
        .await
        .context("could not load booking history")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&reservations)?);
        return Ok(());
    }
    if reservations.is_empty() {
        println!("No previous bookings.");
        return Ok(());
    }
    for r in reservations {
        println!("{}  {}", r.reserved_at, r.car_wash_name);
        println!(
            "    {} - {} ({:.2} €)",
            r.vehicle_type, r.service.name, r.service.price
        );
    }
    Ok(())
}

async fn run_register(args: &Cli, api: BackendClient, register: RegisterArgs) -> Result<()> {
    let email = required_email(args)?;
    let password = args
        .password
        .clone()
        .context("pass --password or set WASHBOOK_PASSWORD")?;
    let request = RegisterRequest {
        email: email.clone(),
        password,
        first_name: register.first_name,
        last_name: register.last_name,
        phone_number: register.phone,
        address: register.address,
        city: register.city,
        state: register.state,
        zip_code: register.zip_code,
    };
    let code = api.register(&request).await.context("registration failed")?;
    println!("Registered {email}. Check your inbox for the verification code.");
    if let Some(code) = code {
        // Dev backends echo the code instead of sending mail.
        println!("Verification code: {code}");
    }
    println!("Then run: washbook --email {email} verify <code>");
    Ok(())
}

async fn run_verify(args: &Cli, api: BackendClient, code: &str) -> Result<()> {
    let email = required_email(args)?;
    let user = api
        .verify_email(&email, code)
        .await
        .context("verification failed")?;
    println!("Email verified. Welcome, {} {}!", user.first_name, user.last_name);
    Ok(())
}

async fn run_profile(args: &Cli, api: BackendClient, action: ProfileAction) -> Result<()> {
    let email = required_email(args)?;
    match action {
        ProfileAction::Show => {
            let profile = api
                .fetch_profile(&email)
                .await
                .context("could not load profile")?;
            print_profile(&profile);
        }
        ProfileAction::Update(update) => {
            let mut profile = api
                .fetch_profile(&email)
                .await
                .context("could not load profile")?;
            apply_profile_update(&mut profile, update);
            api.update_profile(&profile)
                .await
                .context("could not save profile")?;
            println!("Profile saved.");
            print_profile(&profile);
        }
    }
    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!("{} {} <{}>", profile.first_name, profile.last_name, profile.email);
    println!("  phone:   {}", profile.phone_number);
    println!("  address: {}", profile.address);
    println!(
        "  city:    {} {} {}",
        profile.city, profile.state, profile.zip_code
    );
}

fn apply_profile_update(profile: &mut UserProfile, update: ProfileUpdateArgs) {
    if let Some(v) = update.first_name {
        profile.first_name = v;
    }
    if let Some(v) = update.last_name {
        profile.last_name = v;
    }
    if let Some(v) = update.phone {
        profile.phone_number = v;
    }
    if let Some(v) = update.address {
        profile.address = v;
    }
    if let Some(v) = update.city {
        profile.city = v;
    }
    if let Some(v) = update.state {
        profile.state = v;
    }
    if let Some(v) = update.zip_code {
        profile.zip_code = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_update_overlays_only_set_fields() {
        let mut profile = UserProfile {
            email: "a@b.gr".into(),
            first_name: "Maria".into(),
            last_name: "P.".into(),
            phone_number: "123".into(),
            address: "Old St 1".into(),
            city: "Athens".into(),
            state: "Attica".into(),
            zip_code: "11111".into(),
        };
        apply_profile_update(
            &mut profile,
            ProfileUpdateArgs {
                phone: Some("456".into()),
                city: Some("Patras".into()),
                ..Default::default()
            },
        );
        assert_eq!(profile.phone_number, "456");
        assert_eq!(profile.city, "Patras");
        assert_eq!(profile.first_name, "Maria");
        assert_eq!(profile.address, "Old St 1");
    }
}
