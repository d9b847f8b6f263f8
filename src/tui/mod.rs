mod export;
mod help;
mod map;
mod state;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::api::BackendClient;
use crate::geocode::Geocoder;
use crate::model::{
    AuthSession, FetchState, SelectedService, User, WizardCommand, WizardEvent,
};
use crate::orchestrator::{self, SessionHandle};
use crate::summary::build_booking_summary;
use state::{BookingFocus, LoginForm, UiState};

const ACCENT: Color = Color::Cyan;
const DONE: Color = Color::Green;

pub async fn run<G: Geocoder + 'static>(
    api: BackendClient,
    geocoder: G,
    auth: AuthSession,
) -> Result<()> {
    let user = auth.user().cloned();
    let SessionHandle {
        commands,
        mut events,
        task,
    } = orchestrator::spawn_session(api, geocoder, auth);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &commands, &mut events, user).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let _ = commands.send(WizardCommand::Quit);
    let _ = task.await;

    res
}

enum Action {
    Continue,
    Quit,
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    commands: &UnboundedSender<WizardCommand>,
    events: &mut UnboundedReceiver<WizardEvent>,
    user: Option<User>,
) -> Result<()> {
    let mut state = UiState::new(user);
    let mut term_events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(100));

    loop {
        terminal.draw(|f| draw(f, &state))?;

        tokio::select! {
            maybe_event = term_events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Action::Quit = handle_key(key, &mut state, commands) {
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {} // resize and the like: redrawn next pass
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(event) = events.recv() => state.apply_event(event),
            _ = tick.tick() => {}
        }
    }
}

fn handle_key(
    key: KeyEvent,
    state: &mut UiState,
    commands: &UnboundedSender<WizardCommand>,
) -> Action {
    // Modal and text-entry layers swallow keys first.
    if state.login.is_some() {
        handle_login_key(key, state, commands);
        return Action::Continue;
    }
    if state.date_editing {
        handle_date_key(key, state, commands);
        return Action::Continue;
    }
    if state.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            state.show_help = false;
        }
        return Action::Continue;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Action::Quit
        }
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('?') => state.show_help = true,
        KeyCode::Tab => {
            state.tab = (state.tab + 1) % 2;
            if state.tab == 1 {
                let _ = commands.send(WizardCommand::RefreshHistory);
            }
        }
        KeyCode::Char('l') if !state.is_logged_in() => {
            state.login = Some(LoginForm::default());
        }
        KeyCode::Char('x') if state.is_logged_in() => {
            let _ = commands.send(WizardCommand::LogOut);
        }
        _ if state.tab == 0 => handle_booking_key(key, state, commands),
        _ => handle_history_key(key, state, commands),
    }
    Action::Continue
}

fn handle_login_key(key: KeyEvent, state: &mut UiState, commands: &UnboundedSender<WizardCommand>) {
    let Some(form) = state.login.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => state.login = None,
        KeyCode::Tab | KeyCode::Down | KeyCode::Up => form.focus_password = !form.focus_password,
        KeyCode::Enter => {
            if form.email.is_empty() || form.password.is_empty() {
                state.info = "Enter both email and password.".into();
                return;
            }
            let _ = commands.send(WizardCommand::LogIn {
                email: form.email.clone(),
                password: form.password.clone(),
            });
            state.info = "Logging in…".into();
        }
        KeyCode::Backspace => {
            if form.focus_password {
                form.password.pop();
            } else {
                form.email.pop();
            }
        }
        KeyCode::Char(c) => {
            if form.focus_password {
                form.password.push(c);
            } else {
                form.email.push(c);
            }
        }
        _ => {}
    }
}

fn handle_date_key(key: KeyEvent, state: &mut UiState, commands: &UnboundedSender<WizardCommand>) {
    match key.code {
        KeyCode::Esc => state.date_editing = false,
        KeyCode::Enter => {
            state.date_editing = false;
            let input = state.date_input.trim().to_string();
            if !input.is_empty() {
                // The session validates the format and answers with Info on
                // rejection.
                let _ = commands.send(WizardCommand::SetDate(Some(input)));
            }
        }
        KeyCode::Backspace => {
            state.date_input.pop();
        }
        KeyCode::Char(c) => state.date_input.push(c),
        _ => {}
    }
}

fn handle_booking_key(
    key: KeyEvent,
    state: &mut UiState,
    commands: &UnboundedSender<WizardCommand>,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('b') => {
            let _ = commands.send(WizardCommand::GoBack);
        }
        KeyCode::Char('n') => {
            let _ = commands.send(WizardCommand::NewBooking);
            state.selected_vehicle = None;
            state.focus = BookingFocus::Vehicles;
            state.date_input.clear();
            state.vehicle_cursor = 0;
            state.service_cursor = 0;
        }
        KeyCode::Char(c @ '1'..='4') => {
            // Forward jumps are ignored by the session.
            let _ = commands.send(WizardCommand::JumpToStep(c as u8 - b'0'));
        }
        _ => match state.step {
            1 => handle_step_service(key, state, commands),
            2 => handle_step_car_wash(key, state, commands),
            3 => handle_step_schedule(key, state, commands),
            _ => handle_step_summary(key, state, commands),
        },
    }
}

fn handle_step_service(
    key: KeyEvent,
    state: &mut UiState,
    commands: &UnboundedSender<WizardCommand>,
) {
    match key.code {
        KeyCode::Char('v') => state.focus = BookingFocus::Vehicles,
        KeyCode::Up | KeyCode::Down => {
            let len = match state.focus {
                BookingFocus::Vehicles => state.vehicle_types.items().map_or(0, <[_]>::len),
                BookingFocus::Services => state.services.items().map_or(0, <[_]>::len),
            };
            let cursor = match state.focus {
                BookingFocus::Vehicles => &mut state.vehicle_cursor,
                BookingFocus::Services => &mut state.service_cursor,
            };
            move_cursor(cursor, len, key.code == KeyCode::Down);
        }
        KeyCode::Enter => match state.focus {
            BookingFocus::Vehicles => {
                if let Some(types) = state.vehicle_types.items() {
                    if let Some(vehicle) = types.get(state.vehicle_cursor) {
                        state.selected_vehicle = Some(vehicle.clone());
                        state.service_cursor = 0;
                        state.focus = BookingFocus::Services;
                        let _ = commands.send(WizardCommand::SelectVehicle(vehicle.clone()));
                    }
                }
            }
            BookingFocus::Services => {
                if let Some(services) = state.services.items() {
                    if let Some(service) = services.get(state.service_cursor) {
                        let _ = commands.send(WizardCommand::SelectService(
                            SelectedService::from_option(service),
                        ));
                    }
                }
            }
        },
        _ => {}
    }
}

fn handle_step_car_wash(
    key: KeyEvent,
    state: &mut UiState,
    commands: &UnboundedSender<WizardCommand>,
) {
    match key.code {
        KeyCode::Up | KeyCode::Down => {
            let len = state.car_washes.items().map_or(0, <[_]>::len);
            move_cursor(&mut state.wash_cursor, len, key.code == KeyCode::Down);
        }
        KeyCode::Enter => {
            if let Some(washes) = state.car_washes.items() {
                if let Some(wash) = washes.get(state.wash_cursor) {
                    let _ = commands.send(WizardCommand::SelectCarWash(wash.clone()));
                }
            }
        }
        _ => {}
    }
}

fn handle_step_schedule(
    key: KeyEvent,
    state: &mut UiState,
    commands: &UnboundedSender<WizardCommand>,
) {
    match key.code {
        KeyCode::Char('d') => {
            state.date_editing = true;
            if state.date_input.is_empty() {
                if let Some(date) = &state.date {
                    state.date_input = date.clone();
                }
            }
        }
        KeyCode::Up | KeyCode::Down => {
            let len = state.times.items().map_or(0, <[_]>::len);
            move_cursor(&mut state.time_cursor, len, key.code == KeyCode::Down);
        }
        KeyCode::Enter => {
            if let Some(times) = state.times.items() {
                if let Some(slot) = times.get(state.time_cursor) {
                    let _ = commands.send(WizardCommand::SetTime(Some(slot.clone())));
                }
            }
        }
        KeyCode::Char('c') => {
            let _ = commands.send(WizardCommand::ConfirmSchedule);
        }
        _ => {}
    }
}

fn handle_step_summary(
    key: KeyEvent,
    state: &mut UiState,
    commands: &UnboundedSender<WizardCommand>,
) {
    match key.code {
        KeyCode::Char('y') => {
            let _ = commands.send(WizardCommand::ConfirmBooking);
        }
        KeyCode::Char('s') => {
            if let Some(summary) = &state.summary {
                state.info = match export::copy_summary_json(summary) {
                    Ok(()) => "Summary copied to clipboard.".into(),
                    Err(e) => format!("Copy failed: {e:#}"),
                };
            }
        }
        _ => {}
    }
}

fn handle_history_key(
    key: KeyEvent,
    state: &mut UiState,
    commands: &UnboundedSender<WizardCommand>,
) {
    match key.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
            let len = state.history.items().map_or(0, <[_]>::len);
            let down = matches!(key.code, KeyCode::Down | KeyCode::Char('j'));
            move_cursor(&mut state.history_cursor, len, down);
        }
        KeyCode::Char('r') => {
            let _ = commands.send(WizardCommand::RefreshHistory);
        }
        _ => {}
    }
}

fn move_cursor(cursor: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *cursor = 0;
        return;
    }
    if down {
        *cursor = (*cursor + 1).min(len - 1);
    } else {
        *cursor = cursor.saturating_sub(1);
    }
}

fn draw(f: &mut Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let tabs = Tabs::new(vec!["Booking", "History"])
        .select(state.tab)
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, rows[0]);

    if state.show_help {
        help::draw_help(rows[1], f);
    } else if state.tab == 0 {
        draw_booking(f, rows[1], state);
    } else {
        draw_history(f, rows[1], state);
    }

    draw_status(f, rows[2], state);

    if state.login.is_some() {
        draw_login_modal(f, state);
    }
}

fn draw_status(f: &mut Frame, area: Rect, state: &UiState) {
    let account = match &state.user {
        Some(user) => format!("{} <{}>", user.first_name, user.email),
        None => "not logged in (press l)".to_string(),
    };
    let status = Line::from(vec![
        Span::styled(state.info.clone(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(account, Style::default().fg(ACCENT)),
    ]);
    f.render_widget(Paragraph::new(status), area);
}

fn step_indicator(current: u8) -> Line<'static> {
    let labels = ["Service", "Car wash", "Schedule", "Booking"];
    let mut spans = Vec::new();
    for (idx, label) in labels.iter().enumerate() {
        let number = idx as u8 + 1;
        let style = if number < current {
            Style::default().fg(DONE)
        } else if number == current {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {number} {label} "), style));
        if idx < labels.len() - 1 {
            spans.push(Span::styled("──", Style::default().fg(Color::DarkGray)));
        }
    }
    Line::from(spans)
}

fn draw_booking(f: &mut Frame, area: Rect, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    f.render_widget(Paragraph::new(step_indicator(state.step)), rows[0]);

    match state.step {
        1 => draw_step_service(f, rows[1], state),
        2 => draw_step_car_wash(f, rows[1], state),
        3 => draw_step_schedule(f, rows[1], state),
        _ => draw_step_summary(f, rows[1], state),
    }
}

fn draw_step_service(f: &mut Frame, area: Rect, state: &UiState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let vehicle_block = titled_block("Vehicle type", state.focus == BookingFocus::Vehicles);
    match &state.vehicle_types {
        FetchState::Idle | FetchState::Loading => {
            f.render_widget(
                Paragraph::new("Loading vehicle types…").block(vehicle_block),
                cols[0],
            );
        }
        FetchState::Failed(msg) => draw_failure(f, cols[0], vehicle_block, msg),
        FetchState::Ready(types) if types.is_empty() => {
            f.render_widget(
                Paragraph::new("No vehicle types available.").block(vehicle_block),
                cols[0],
            );
        }
        FetchState::Ready(types) => {
            let items: Vec<ListItem> = types
                .iter()
                .map(|t| {
                    let marker = if state.selected_vehicle.as_deref() == Some(t.as_str()) {
                        "● "
                    } else {
                        "  "
                    };
                    ListItem::new(format!("{marker}{t}"))
                })
                .collect();
            draw_list(f, cols[0], vehicle_block, items, state.vehicle_cursor);
        }
    }

    let service_block = titled_block("Services", state.focus == BookingFocus::Services);
    if state.selected_vehicle.is_none() {
        f.render_widget(
            Paragraph::new("Pick a vehicle type to see its services.").block(service_block),
            cols[1],
        );
        return;
    }
    match &state.services {
        FetchState::Idle | FetchState::Loading => {
            f.render_widget(Paragraph::new("Loading services…").block(service_block), cols[1]);
        }
        FetchState::Failed(msg) => draw_failure(f, cols[1], service_block, msg),
        FetchState::Ready(services) if services.is_empty() => {
            f.render_widget(
                Paragraph::new("No services for this vehicle type.").block(service_block),
                cols[1],
            );
        }
        FetchState::Ready(services) => {
            let items: Vec<ListItem> = services
                .iter()
                .map(|s| {
                    let mut lines = vec![Line::from(vec![
                        Span::styled(
                            format!("{:.2} € ", s.price),
                            Style::default().fg(ACCENT),
                        ),
                        Span::styled(s.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    ])];
                    if !s.description.is_empty() {
                        lines.push(Line::styled(
                            format!("       {}", s.description),
                            Style::default().fg(Color::Gray),
                        ));
                    }
                    ListItem::new(lines)
                })
                .collect();
            draw_list(f, cols[1], service_block, items, state.service_cursor);
        }
    }
}

fn draw_step_car_wash(f: &mut Frame, area: Rect, state: &UiState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let block = titled_block("Car washes", true);
    match &state.car_washes {
        FetchState::Idle | FetchState::Loading => {
            f.render_widget(Paragraph::new("Loading car washes…").block(block), cols[0]);
        }
        FetchState::Failed(msg) => draw_failure(f, cols[0], block, msg),
        FetchState::Ready(washes) if washes.is_empty() => {
            f.render_widget(
                Paragraph::new("No car wash offers this service.").block(block),
                cols[0],
            );
        }
        FetchState::Ready(washes) => {
            let items: Vec<ListItem> = washes
                .iter()
                .enumerate()
                .map(|(idx, w)| {
                    // Unlocated addresses stay in the list; only the map
                    // skips them.
                    let unlocated = state
                        .marker_for(idx)
                        .is_some_and(|m| m.coordinate.is_none());
                    let mut name = Line::styled(
                        w.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    );
                    if unlocated {
                        name.push_span(Span::styled(
                            "  (address not located)",
                            Style::default().fg(Color::Yellow),
                        ));
                    }
                    ListItem::new(vec![
                        name,
                        Line::styled(
                            format!("  {}", w.address),
                            Style::default().fg(Color::Gray),
                        ),
                    ])
                })
                .collect();
            draw_list(f, cols[0], block, items, state.wash_cursor);
        }
    }

    map::draw_map(f, cols[1], &state.markers);
}

fn draw_step_schedule(f: &mut Frame, area: Rect, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let date_text = if state.date_editing {
        format!("{}_", state.date_input)
    } else {
        state
            .date
            .clone()
            .unwrap_or_else(|| "press d to enter a date (YYYY-MM-DD)".to_string())
    };
    let date_style = if state.date_editing {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(Span::styled(date_text, date_style))
            .block(titled_block("Date", state.date_editing)),
        rows[0],
    );

    let block = titled_block("Available times", !state.date_editing);
    match &state.times {
        FetchState::Idle => {
            f.render_widget(
                Paragraph::new("Pick a date to see available times.").block(block),
                rows[1],
            );
        }
        FetchState::Loading => {
            f.render_widget(Paragraph::new("Loading available times…").block(block), rows[1]);
        }
        FetchState::Failed(msg) => draw_failure(f, rows[1], block, msg),
        FetchState::Ready(times) if times.is_empty() => {
            // Valid, just empty: distinct from loading and from failure.
            f.render_widget(
                Paragraph::new("No available times for this date.").block(block),
                rows[1],
            );
        }
        FetchState::Ready(times) => {
            let items: Vec<ListItem> = times
                .iter()
                .map(|t| {
                    let marker = if state.time.as_deref() == Some(t.as_str()) {
                        "● "
                    } else {
                        "  "
                    };
                    ListItem::new(format!("{marker}{t}"))
                })
                .collect();
            draw_list(f, rows[1], block, items, state.time_cursor);
        }
    }

    let ready = state.date.is_some() && state.time.is_some();
    let hint = if ready {
        Span::styled("Press c to continue to the summary.", Style::default().fg(DONE))
    } else {
        Span::styled(
            "Pick both a date and a time.",
            Style::default().fg(Color::Gray),
        )
    };
    f.render_widget(Paragraph::new(hint), rows[2]);
}

fn draw_step_summary(f: &mut Frame, area: Rect, state: &UiState) {
    let block = titled_block("Summary", true);
    let Some(summary) = &state.summary else {
        f.render_widget(Paragraph::new("No completed booking yet.").block(block), area);
        return;
    };

    let mut lines: Vec<Line> = build_booking_summary(summary)
        .lines
        .into_iter()
        .map(Line::from)
        .collect();
    lines.push(Line::from(""));
    if summary.saved_to_history {
        lines.push(Line::styled(
            "  ✔ Your booking is complete. Press n for a new booking.",
            Style::default().fg(DONE).add_modifier(Modifier::BOLD),
        ));
    } else if state.is_logged_in() {
        lines.push(Line::styled(
            "  Press y to confirm the booking.",
            Style::default().fg(ACCENT),
        ));
    } else {
        lines.push(Line::styled(
            "  Log in (l) to complete the booking.",
            Style::default().fg(Color::Yellow),
        ));
    }
    lines.push(Line::styled(
        "  Press s to copy the summary as JSON.",
        Style::default().fg(Color::Gray),
    ));
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn draw_history(f: &mut Frame, area: Rect, state: &UiState) {
    let block = titled_block("Booking history", true);
    if !state.is_logged_in() {
        f.render_widget(
            Paragraph::new("Log in (l) to see your booking history.").block(block),
            area,
        );
        return;
    }
    match &state.history {
        FetchState::Idle => {
            f.render_widget(
                Paragraph::new("Press r to load your booking history.").block(block),
                area,
            );
        }
        FetchState::Loading => {
            f.render_widget(Paragraph::new("Loading booking history…").block(block), area);
        }
        FetchState::Failed(msg) => draw_failure(f, area, block, msg),
        FetchState::Ready(reservations) if reservations.is_empty() => {
            f.render_widget(Paragraph::new("No previous bookings.").block(block), area);
        }
        FetchState::Ready(reservations) => {
            let items: Vec<ListItem> = reservations
                .iter()
                .map(|r| {
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::styled(
                                r.reserved_at.clone(),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::raw("  "),
                            Span::raw(r.car_wash_name.clone()),
                        ]),
                        Line::styled(
                            format!(
                                "  {} - {} ({:.2} €)",
                                r.vehicle_type, r.service.name, r.service.price
                            ),
                            Style::default().fg(Color::Gray),
                        ),
                    ])
                })
                .collect();
            draw_list(f, area, block, items, state.history_cursor);
        }
    }
}

fn draw_login_modal(f: &mut Frame, state: &UiState) {
    let Some(form) = &state.login else {
        return;
    };
    let area = centered_rect(50, 8, f.area());
    f.render_widget(Clear, area);

    let field = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(format!("  {label}: ")),
            Span::styled(format!("{value}{}", if focused { "_" } else { "" }), style),
        ])
    };
    let masked: String = "*".repeat(form.password.chars().count());
    let p = Paragraph::new(vec![
        field("Email   ", &form.email, !form.focus_password),
        field("Password", &masked, form.focus_password),
        Line::from(""),
        Line::styled(
            "  enter: log in   tab: switch field   esc: cancel",
            Style::default().fg(Color::Gray),
        ),
    ])
    .block(Block::default().borders(Borders::ALL).title("Log in"));
    f.render_widget(p, area);
}

fn titled_block(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title.to_string())
}

fn draw_failure(f: &mut Frame, area: Rect, block: Block<'static>, message: &str) {
    f.render_widget(
        Paragraph::new(Line::styled(
            format!("Request failed: {message}"),
            Style::default().fg(Color::Red),
        ))
        .block(block)
        .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_list(f: &mut Frame, area: Rect, block: Block<'static>, items: Vec<ListItem>, cursor: usize) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
