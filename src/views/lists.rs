//! Lists - Column Sets for Every Entity

use crate::domain::{Device, MaintenanceTask, Notification, Rule, SafetyPrecaution, User};
use crate::i18n::{Locale, t};
use crate::listing::Page;
use crate::utils::format::{format_date, format_opt_datetime};
use crate::views::{Column, Table};

pub fn device_table(locale: Locale) -> Table<Device> {
    Table::new(vec![
        Column::new(t(locale, "col-id"), |d: &Device| d.id.clone()).flex_width(4, 12),
        Column::new(t(locale, "col-name"), |d: &Device| d.name.clone()).flex_width(8, 28),
        Column::new(t(locale, "col-status"), |d: &Device| d.status.label().to_string())
            .flex_width(6, 12),
        Column::new(t(locale, "col-type"), |d: &Device| d.device_type.token().to_string())
            .flex_width(6, 12),
        Column::new(t(locale, "col-location"), |d: &Device| {
            d.location.clone().unwrap_or_else(|| "-".to_string())
        })
        .flex_width(8, 20),
        Column::new(t(locale, "col-last-seen"), |d: &Device| {
            format_opt_datetime(d.last_seen.as_ref())
        })
        .fixed_width(16),
    ])
    .empty_text(t(locale, "table-no-data"))
}

pub fn rule_table(locale: Locale) -> Table<Rule> {
    Table::new(vec![
        Column::new(t(locale, "col-id"), |r: &Rule| r.id.clone()).flex_width(4, 12),
        Column::new(t(locale, "col-name"), |r: &Rule| r.name.clone()).flex_width(8, 28),
        Column::new(t(locale, "col-status"), |r: &Rule| {
            (if r.is_active() { "ACTIVE" } else { "INACTIVE" }).to_string()
        })
        .fixed_width(8),
        Column::new(t(locale, "col-conditions"), |r: &Rule| r.condition_summary())
            .flex_width(10, 40),
        Column::new(t(locale, "col-last-triggered"), |r: &Rule| {
            format_opt_datetime(r.last_triggered.as_ref())
        })
        .fixed_width(16),
    ])
    .empty_text(t(locale, "table-no-data"))
}

pub fn maintenance_table(locale: Locale) -> Table<MaintenanceTask> {
    Table::new(vec![
        Column::new(t(locale, "col-id"), |m: &MaintenanceTask| m.id.clone()).flex_width(4, 12),
        Column::new(t(locale, "col-task"), |m: &MaintenanceTask| m.task_name.clone())
            .flex_width(8, 28),
        Column::new(t(locale, "col-device"), |m: &MaintenanceTask| {
            m.device_label().to_string()
        })
        .flex_width(6, 20),
        Column::new(t(locale, "col-due"), |m: &MaintenanceTask| {
            m.next_due()
                .map_or_else(|| "-".to_string(), |d| format_date(&d))
        })
        .fixed_width(10),
        Column::new(t(locale, "col-priority"), |m: &MaintenanceTask| {
            m.priority.token().to_string()
        })
        .fixed_width(8),
        Column::new(t(locale, "col-status"), |m: &MaintenanceTask| {
            m.status.token().to_string()
        })
        .flex_width(6, 12),
        Column::new(t(locale, "col-assignee"), |m: &MaintenanceTask| {
            m.assigned_to.clone().unwrap_or_else(|| "-".to_string())
        })
        .flex_width(6, 16),
    ])
    .empty_text(t(locale, "table-no-data"))
}

pub fn notification_table(locale: Locale) -> Table<Notification> {
    Table::new(vec![
        Column::new(t(locale, "col-id"), |n: &Notification| n.id.clone()).flex_width(4, 12),
        Column::new(t(locale, "col-read"), |n: &Notification| {
            (if n.read { " " } else { "*" }).to_string()
        })
        .fixed_width(4),
        Column::new(t(locale, "col-type"), |n: &Notification| n.kind.token().to_string())
            .fixed_width(7),
        Column::new(t(locale, "col-title"), |n: &Notification| n.title.clone())
            .flex_width(8, 30),
        Column::new(t(locale, "col-created"), |n: &Notification| {
            format_opt_datetime(n.created_at.as_ref())
        })
        .fixed_width(16),
    ])
    .empty_text(t(locale, "table-no-data"))
}

pub fn user_table(locale: Locale) -> Table<User> {
    Table::new(vec![
        Column::new(t(locale, "col-id"), |u: &User| u.id.clone()).flex_width(4, 12),
        Column::new(t(locale, "col-name"), |u: &User| u.display_name()).flex_width(8, 24),
        Column::new(t(locale, "col-email"), |u: &User| u.email.clone()).flex_width(8, 30),
        Column::new(t(locale, "col-role"), |u: &User| u.role.token().to_string())
            .fixed_width(5),
    ])
    .empty_text(t(locale, "table-no-data"))
}

pub fn safety_table(locale: Locale) -> Table<SafetyPrecaution> {
    Table::new(vec![
        Column::new(t(locale, "col-id"), |s: &SafetyPrecaution| s.id.clone()).flex_width(4, 12),
        Column::new(t(locale, "col-title"), |s: &SafetyPrecaution| s.title.clone())
            .flex_width(8, 30),
        Column::new(t(locale, "col-severity"), |s: &SafetyPrecaution| {
            s.severity.token().to_string()
        })
        .fixed_width(8),
        Column::new(t(locale, "col-device"), |s: &SafetyPrecaution| {
            s.device_id.clone().unwrap_or_else(|| "-".to_string())
        })
        .flex_width(6, 12),
    ])
    .empty_text(t(locale, "table-no-data"))
}

/// Table plus a "Page x/y, n items" footer
pub fn render_page<R>(table: &Table<R>, page: &Page<'_, R>, locale: Locale) -> String {
    let mut out = table.render(&page.items);
    out.push_str(&format!(
        "{} {}/{}, {} {}\n",
        t(locale, "table-page"),
        page.page,
        page.total_pages,
        page.total_items,
        t(locale, "table-items"),
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeviceStatus;
    use crate::listing::ListQuery;

    #[test]
    fn test_device_page_render() {
        let devices = vec![
            Device {
                id: "d-1".to_string(),
                name: "Boiler sensor".to_string(),
                status: DeviceStatus::Online,
                ..Default::default()
            },
            Device {
                id: "d-2".to_string(),
                name: "Chiller".to_string(),
                status: DeviceStatus::Other("REBOOTING".to_string()),
                ..Default::default()
            },
        ];
        let page = ListQuery::new().page(&devices, 1, 20);
        let text = render_page(&device_table(Locale::EnUS), &page, Locale::EnUS);

        assert!(text.starts_with("ID"));
        assert!(text.contains("Boiler sensor"));
        assert!(text.contains("REBOOTING"));
        assert!(text.ends_with("Page 1/1, 2 items\n"));
    }

    #[test]
    fn test_empty_list_uses_localized_placeholder() {
        let rules: Vec<Rule> = Vec::new();
        let page = ListQuery::new().page(&rules, 1, 20);
        let text = render_page(&rule_table(Locale::ZhCN), &page, Locale::ZhCN);
        assert!(text.contains("无数据"));
    }
}
