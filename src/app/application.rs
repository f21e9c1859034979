//! Application - Command Runners
//!
//! `run_watch` keeps the hub running and redraws the dashboard as events
//! arrive; the other runners fetch once, print and return.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use crate::constants::{BANNER_TICK_SECS, INGEST_BATCH_SIZE, INGEST_INTERVAL_MS};
use crate::domain::config::AppConfig;
use crate::domain::{DeviceDraft, DeviceStatus, MaintenanceDraft, RuleDraft};
use crate::error::Result;
use crate::i18n::{Locale, t};
use crate::listing::{ListQuery, Listable};
use crate::services::{
    BannerLevel, DayWiseMaintenance, Gateway, HttpGateway, Operations, Section, ServiceEvent,
    ServiceHub,
};
use crate::state::{BannerState, DashboardInputs, DashboardState};
use crate::views::lists::{
    device_table, maintenance_table, notification_table, render_page, rule_table, safety_table,
    user_table,
};
use crate::views::{Table, dashboard};

/// Clear screen and home the cursor
const CLEAR: &str = "\x1b[2J\x1b[H";

fn http_gateway(config: &AppConfig) -> Result<Arc<dyn Gateway>> {
    Ok(Arc::new(HttpGateway::new(&config.gateway)?))
}

// ==================== Watch ====================

/// Poll every section and redraw until Ctrl-C or `q`
pub async fn run_watch(config: &AppConfig) -> Result<()> {
    let locale = config.display.locale();
    let mut hub = ServiceHub::spawn(http_gateway(config)?, &config.polling, locale);
    let events = hub.events();
    let keys = spawn_input_reader();
    let mut state = DashboardState::new(config.display.upcoming_limit);

    let mut ingest = tokio::time::interval(Duration::from_millis(INGEST_INTERVAL_MS));
    let mut banner_tick = tokio::time::interval(Duration::from_secs(BANNER_TICK_SECS));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut today = Local::now().date_naive();
    draw(&mut state, today, locale)?;
    info!("Watching; press Ctrl-C to quit");

    'watch: loop {
        let dirty = tokio::select! {
            _ = &mut ctrl_c => break,
            _ = ingest.tick() => {
                let mut dirty = false;
                for input in keys.try_iter() {
                    match input {
                        WatchInput::Quit => break 'watch,
                        WatchInput::Refresh => hub.refresh_all(),
                        WatchInput::Dismiss(target) => {
                            dirty |= dismiss(state.banners_mut(), target);
                        }
                    }
                }
                let batch: Vec<ServiceEvent> = events.try_iter().take(INGEST_BATCH_SIZE).collect();
                if !batch.is_empty() {
                    dirty |= state.apply_batch(batch, Local::now());
                }
                dirty
            }
            _ = banner_tick.tick() => {
                let now = Local::now();
                let rolled_over = now.date_naive() != today;
                today = now.date_naive();
                state.tick(now) || rolled_over
            }
        };

        if dirty {
            state.set_inputs(hub.snapshot());
            draw(&mut state, today, locale)?;
        }
    }

    info!("Shutting down");
    hub.shutdown().await;
    Ok(())
}

fn draw(state: &mut DashboardState, today: NaiveDate, locale: Locale) -> Result<()> {
    let view = state.view(today);
    let errors = state.inputs().errors();
    let text = dashboard::render(&view, state.banners(), &errors, locale);

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(CLEAR.as_bytes())?;
    stdout.write_all(text.as_bytes())?;
    writeln!(stdout, "\n{}", t(locale, "watch-help"))?;
    stdout.flush()?;
    Ok(())
}

/// Keyboard commands typed while watching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchInput {
    /// A banner id, or the latest banner
    Dismiss(Option<u64>),
    Refresh,
    Quit,
}

fn parse_input(line: &str) -> Option<WatchInput> {
    let mut parts = line.split_whitespace();
    let input = match parts.next()? {
        "d" | "dismiss" => match parts.next() {
            Some(id) => WatchInput::Dismiss(Some(id.trim_start_matches('#').parse().ok()?)),
            None => WatchInput::Dismiss(None),
        },
        "r" | "refresh" => WatchInput::Refresh,
        "q" | "quit" => WatchInput::Quit,
        _ => return None,
    };
    parts.next().is_none().then_some(input)
}

/// Read stdin lines on a detached thread; a blocking read must not hold
/// up runtime shutdown
fn spawn_input_reader() -> Receiver<WatchInput> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let spawned = std::thread::Builder::new()
        .name("watch-input".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match parse_input(&line) {
                    Some(input) => {
                        if tx.send(input).is_err() {
                            break;
                        }
                    }
                    None => debug!(%line, "Ignoring unknown input"),
                }
            }
        });
    if let Err(e) = spawned {
        warn!(error = %e, "Keyboard input unavailable");
    }
    rx
}

/// Returns whether a visible banner went away
fn dismiss(banners: &mut BannerState, target: Option<u64>) -> bool {
    match target {
        Some(id) => banners.dismiss(id),
        None => banners.dismiss_latest().is_some(),
    }
}

// ==================== Snapshot ====================

/// One fetch of every section, rendered as text or JSON
pub async fn run_snapshot(config: &AppConfig, json: bool) -> Result<String> {
    let locale = config.display.locale();
    let gateway = http_gateway(config)?;
    let inputs = ServiceHub::fetch_once(gateway.as_ref(), locale).await;
    snapshot_text(inputs, config.display.upcoming_limit, locale, json)
}

fn snapshot_text(
    inputs: DashboardInputs,
    upcoming_limit: usize,
    locale: Locale,
    json: bool,
) -> Result<String> {
    let today = Local::now().date_naive();
    let mut state = DashboardState::new(upcoming_limit);
    state.set_inputs(inputs);
    let view = state.view(today);

    if json {
        return Ok(serde_json::to_string_pretty(view.as_ref())?);
    }
    let errors = state.inputs().errors();
    Ok(dashboard::render(&view, state.banners(), &errors, locale))
}

// ==================== Lists ====================

/// Which maintenance endpoint a list reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaintenanceView {
    #[default]
    All,
    Upcoming,
    Today,
    DayWise,
}

/// Filtered, sorted, paged list request
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    pub query: ListQuery,
    pub page: usize,
    pub maintenance_view: MaintenanceView,
    /// Only precautions for this device
    pub device_id: Option<String>,
}

/// Fetch one section and render the requested page
pub async fn run_list(
    config: &AppConfig,
    section: Section,
    request: &ListRequest,
) -> Result<String> {
    let gateway = http_gateway(config)?;
    list_text(gateway.as_ref(), config, section, request).await
}

async fn list_text(
    gateway: &dyn Gateway,
    config: &AppConfig,
    section: Section,
    request: &ListRequest,
) -> Result<String> {
    let locale = config.display.locale();
    let size = config.display.page_size;

    let text = match section {
        Section::Devices => {
            let devices = gateway.list_devices().await?;
            page_of(devices, device_table(locale), request, size, locale)
        }
        Section::Rules => {
            let rules = gateway.list_rules().await?;
            page_of(rules, rule_table(locale), request, size, locale)
        }
        Section::Notifications => {
            let notifications = gateway.list_notifications().await?;
            page_of(notifications, notification_table(locale), request, size, locale)
        }
        Section::Users => {
            let users = gateway.list_users().await?;
            page_of(users, user_table(locale), request, size, locale)
        }
        Section::Safety => {
            let precautions = match request.device_id.as_deref() {
                Some(device_id) => gateway.device_safety_precautions(device_id).await?,
                None => gateway.list_safety_precautions().await?,
            };
            page_of(precautions, safety_table(locale), request, size, locale)
        }
        Section::Maintenance => match request.maintenance_view {
            MaintenanceView::All => {
                let tasks = gateway.list_maintenance().await?;
                page_of(tasks, maintenance_table(locale), request, size, locale)
            }
            MaintenanceView::Today => {
                let tasks = gateway.today_maintenance().await?;
                page_of(tasks, maintenance_table(locale), request, size, locale)
            }
            MaintenanceView::Upcoming => {
                let upcoming = gateway.upcoming_maintenance().await?;
                let mut out =
                    page_of(upcoming.tasks, maintenance_table(locale), request, size, locale);
                out.push_str(&format!(
                    "{}: {}\n",
                    t(locale, "dashboard-upcoming"),
                    upcoming.total_count
                ));
                out
            }
            MaintenanceView::DayWise => {
                let day_wise = gateway.day_wise_maintenance().await?;
                day_wise_text(day_wise, &request.query, locale)
            }
        },
    };
    Ok(text)
}

fn page_of<T: Listable>(
    records: Vec<T>,
    table: Table<T>,
    request: &ListRequest,
    size: usize,
    locale: Locale,
) -> String {
    let page = request.query.page(&records, request.page.max(1), size);
    render_page(&table, &page, locale)
}

/// The gateway's own buckets, each filtered by the query
fn day_wise_text(day_wise: DayWiseMaintenance, query: &ListQuery, locale: Locale) -> String {
    let table = maintenance_table(locale);
    let buckets = [
        ("bucket-overdue", &day_wise.overdue),
        ("bucket-today", &day_wise.today),
        ("bucket-tomorrow", &day_wise.tomorrow),
        ("bucket-next-7-days", &day_wise.next_7_days),
        ("bucket-next-30-days", &day_wise.next_30_days),
        ("bucket-recent-completed", &day_wise.recent_completed),
    ];

    let mut out = String::new();
    for (key, tasks) in buckets {
        let rows = query.apply(tasks);
        out.push_str(&format!("\n{} ({})\n", t(locale, key), rows.len()));
        out.push_str(&table.render(&rows));
    }
    out
}

// ==================== Actions ====================

/// A single mutation requested from the command line
#[derive(Debug, Clone)]
pub enum Action {
    CreateDevice(DeviceDraft),
    DeleteDevice(String),
    SetDeviceStatus { id: String, status: DeviceStatus },
    CreateRule(RuleDraft),
    UpdateRule { id: String, draft: RuleDraft },
    DeleteRule(String),
    ToggleRule(String),
    CreateMaintenance(MaintenanceDraft),
    UpdateMaintenance { id: String, draft: MaintenanceDraft },
    DeleteMaintenance(String),
    CompleteMaintenance(String),
    AssignMaintenance { id: String, assignee_id: String },
    MarkNotificationRead(String),
    MarkAllNotificationsRead,
}

/// Apply one mutation; returns the banner text
///
/// Goes straight to the gateway: nothing is polled for a single action.
pub async fn run_action(config: &AppConfig, action: Action) -> Result<String> {
    action_text(http_gateway(config)?, config.display.locale(), action).await
}

async fn action_text(gateway: Arc<dyn Gateway>, locale: Locale, action: Action) -> Result<String> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let ops = Operations::new(gateway, locale, tx);
    apply_action(&ops, action).await?;
    Ok(banner_lines(&rx))
}

async fn apply_action(ops: &Operations, action: Action) -> Result<()> {
    match action {
        Action::CreateDevice(draft) => ops.create_device(&draft).await.map(drop),
        Action::DeleteDevice(id) => ops.delete_device(&id).await,
        Action::SetDeviceStatus { id, status } => ops.set_device_status(&id, &status).await,
        Action::CreateRule(draft) => ops.create_rule(&draft).await.map(drop),
        Action::UpdateRule { id, draft } => ops.update_rule(&id, &draft).await.map(drop),
        Action::DeleteRule(id) => ops.delete_rule(&id).await,
        Action::ToggleRule(id) => ops.toggle_rule(&id).await,
        Action::CreateMaintenance(draft) => ops.create_maintenance(&draft).await.map(drop),
        Action::UpdateMaintenance { id, draft } => {
            ops.update_maintenance(&id, &draft).await.map(drop)
        }
        Action::DeleteMaintenance(id) => ops.delete_maintenance(&id).await,
        Action::CompleteMaintenance(id) => ops.complete_maintenance(&id).await.map(drop),
        Action::AssignMaintenance { id, assignee_id } => {
            ops.assign_maintenance(&id, &assignee_id).await
        }
        Action::MarkNotificationRead(id) => ops.mark_notification_read(&id).await,
        Action::MarkAllNotificationsRead => ops.mark_all_notifications_read().await,
    }
}

fn banner_lines(events: &Receiver<ServiceEvent>) -> String {
    events
        .try_iter()
        .filter_map(|event| match event {
            ServiceEvent::Banner(BannerLevel::Success | BannerLevel::Info, message) => {
                Some(message + "\n")
            }
            _ => None,
        })
        .collect()
}
