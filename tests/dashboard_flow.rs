//! End-to-end pass over the public API: gateway-shaped JSON in, dashboard
//! view and filtered list pages out.

use chrono::{Local, NaiveDate};

use iot_console::analytics::{Bucket, Metric};
use iot_console::domain::{Device, MaintenanceTask, Notification, Rule};
use iot_console::i18n::Locale;
use iot_console::listing::{FacetKind, FacetValue, ListQuery, SortKey, SortSpec};
use iot_console::services::{BannerLevel, ServiceEvent};
use iot_console::state::{DashboardInputs, DashboardState};
use iot_console::views::{dashboard, lists};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn devices() -> Vec<Device> {
    serde_json::from_str(
        r#"[
            {"id": "d-1", "name": "Boiler sensor", "type": "SENSOR", "status": "ONLINE", "location": "Plant A"},
            {"id": "d-2", "name": "Chiller", "type": "ACTUATOR", "status": "offline", "location": "Plant A"},
            {"id": "d-3", "name": "Gateway 7", "type": "GATEWAY", "status": "REBOOTING", "location": "Warehouse"},
            {"id": "d-4", "name": "Pump", "type": "ACTUATOR", "status": "WARNING"}
        ]"#,
    )
    .expect("device payload")
}

fn maintenance() -> Vec<MaintenanceTask> {
    serde_json::from_str(
        r#"[
            {"id": "m-1", "taskName": "Replace filter", "nextMaintenance": "2025-03-13", "status": "PENDING", "priority": "HIGH"},
            {"id": "m-2", "taskName": "Grease bearings", "nextMaintenance": "2025-03-14T23:59:59", "status": "ACTIVE", "priority": "MEDIUM"},
            {"id": "m-3", "taskName": "Calibrate probe", "nextMaintenance": "2025-03-15", "status": "PENDING", "priority": "LOW"},
            {"id": "m-4", "taskName": "Inspect valve", "nextMaintenance": "not a date", "status": "PENDING", "priority": "HIGH"},
            {"id": "m-5", "taskName": "Flush lines", "nextMaintenance": "2025-03-10", "lastMaintenance": "2025-03-12", "status": "COMPLETED", "priority": "LOW"}
        ]"#,
    )
    .expect("maintenance payload")
}

fn inputs() -> DashboardInputs {
    let now = Local::now();
    let mut inputs = DashboardInputs::default();
    inputs.devices.apply_data(devices(), now);
    inputs.rules.apply_data(
        vec![
            Rule {
                name: "Overheat".to_string(),
                ..Default::default()
            },
            Rule {
                name: "Low battery".to_string(),
                active: false,
                ..Default::default()
            },
        ],
        now,
    );
    inputs.maintenance.apply_data(maintenance(), now);
    inputs.notifications.apply_data(
        vec![
            Notification {
                title: "Overheat".to_string(),
                read: false,
                ..Default::default()
            },
            Notification {
                title: "Back online".to_string(),
                read: true,
                ..Default::default()
            },
        ],
        now,
    );
    inputs.users.apply_error("connection refused", now);
    inputs.safety.apply_data(Vec::new(), now);
    inputs
}

#[test]
fn test_dashboard_view_from_gateway_payloads() {
    let today = day(2025, 3, 14);
    let mut state = DashboardState::new(5);
    state.set_inputs(inputs());
    let view = state.view(today);

    let counts = &view.counts;
    assert_eq!(counts.total_devices, 4);
    assert_eq!(counts.online_devices, 1);
    assert_eq!(counts.offline_devices, 1);
    assert_eq!(counts.warning_devices, 1);
    assert_eq!(counts.error_devices, 0);
    assert_eq!(counts.active_rules, 1);
    assert_eq!(counts.unread_notifications, 1);
    assert_eq!(counts.total_users, 0);

    let ids = |bucket: Bucket| -> Vec<String> {
        view.buckets.bucket(bucket).iter().map(|t| t.id.clone()).collect()
    };
    assert_eq!(ids(Bucket::Overdue), vec!["m-1"]);
    assert_eq!(ids(Bucket::Today), vec!["m-2"]);
    assert_eq!(ids(Bucket::Tomorrow), vec!["m-3"]);
    assert_eq!(ids(Bucket::RecentCompleted), vec!["m-5"]);
    assert_eq!(view.buckets.undated, 1);

    let upcoming: Vec<&str> = view.upcoming.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(upcoming, vec!["m-2", "m-3"]);

    assert_eq!(view.insights.rule_activation_rate, Metric::Percent(50.0));
    assert_eq!(view.insights.rule_success_rate, Metric::Unavailable);
}

#[test]
fn test_rendered_dashboard_carries_banners_and_errors() {
    let today = day(2025, 3, 14);
    let now = Local::now();
    let mut state = DashboardState::new(5);
    state.set_inputs(inputs());

    let dirty = state.apply_batch(
        [ServiceEvent::Banner(
            BannerLevel::Success,
            "Rules: Saved".to_string(),
        )],
        now,
    );
    assert!(dirty);

    let view = state.view(today);
    let errors = state.inputs().errors();
    let text = dashboard::render(&view, state.banners(), &errors, Locale::EnUS);

    assert!(text.contains("[ok] Rules: Saved"));
    assert!(text.contains("connection refused"));
    assert!(text.contains("2025-03-14"));
}

#[test]
fn test_device_list_filter_sort_and_page() {
    let devices = devices();
    let query = ListQuery::new()
        .search("plant")
        .facet(FacetKind::Status, FacetValue::All)
        .sort(SortSpec::descending(SortKey::Name));

    let page = query.page(&devices, 1, 1);
    assert_eq!(page.total_items, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items[0].name, "Chiller");
    assert!(page.has_next());

    let text = lists::render_page(&lists::device_table(Locale::EnUS), &page, Locale::EnUS);
    assert!(text.contains("Chiller"));
    assert!(!text.contains("Boiler sensor"));

    let unknown = ListQuery::new().facet(FacetKind::Status, FacetValue::parse("online"));
    let online: Vec<&str> = unknown.apply(&devices).iter().map(|d| d.id.as_str()).collect();
    assert_eq!(online, vec!["d-1"]);
}
