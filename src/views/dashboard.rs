//! Dashboard - Plain-Text Summary
//!
//! Counts, the maintenance schedule, the upcoming list, insights, section
//! errors and banners, in that order.

use std::fmt::Write;

use crate::analytics::{Bucket, DashboardView, Share};
use crate::i18n::{Locale, t};
use crate::services::{BannerLevel, Section};
use crate::state::BannerState;
use crate::utils::format::{format_date, truncate};

/// Render the whole dashboard
pub fn render(
    view: &DashboardView,
    banners: &BannerState,
    errors: &[(Section, &str)],
    locale: Locale,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", t(locale, "app-title"), format_date(&view.today));

    render_banners(&mut out, banners);
    render_counts(&mut out, view, locale);
    render_schedule(&mut out, view, locale);
    render_upcoming(&mut out, view, locale);
    render_insights(&mut out, view, locale);

    if !errors.is_empty() {
        heading(&mut out, t(locale, "dashboard-errors"));
        for (section, message) in errors {
            let _ = writeln!(out, "  {}: {message}", t(locale, section.label_key()));
        }
    }

    out
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count().max(8)));
}

fn render_banners(out: &mut String, banners: &BannerState) {
    for banner in banners.iter() {
        let marker = match banner.level {
            BannerLevel::Success => "[ok]",
            BannerLevel::Info => "[i]",
            BannerLevel::Error => "[!]",
        };
        let _ = writeln!(out, "{marker} {} (#{})", banner.message, banner.id);
    }
}

fn render_counts(out: &mut String, view: &DashboardView, locale: Locale) {
    let c = &view.counts;
    heading(out, t(locale, "section-devices"));
    let _ = writeln!(
        out,
        "  {}: {}  {}: {}  {}: {}  {}: {}  {}: {}",
        t(locale, "count-devices"),
        c.total_devices,
        t(locale, "count-online"),
        c.online_devices,
        t(locale, "count-offline"),
        c.offline_devices,
        t(locale, "count-warning"),
        c.warning_devices,
        t(locale, "count-error"),
        c.error_devices,
    );
    let _ = writeln!(
        out,
        "  {}: {}  {}: {}  {}: {}  {}: {}",
        t(locale, "count-rules"),
        c.total_rules,
        t(locale, "count-active"),
        c.active_rules,
        t(locale, "count-triggered-today"),
        c.rules_triggered_today,
        t(locale, "count-triggered-week"),
        c.rules_triggered_week,
    );
    let _ = writeln!(
        out,
        "  {}: {}  {}: {}  {}: {}",
        t(locale, "count-maintenance"),
        c.total_maintenance,
        t(locale, "count-pending"),
        c.pending_maintenance,
        t(locale, "count-overdue"),
        c.overdue_maintenance,
    );
    let _ = writeln!(
        out,
        "  {}: {}  {}: {} ({}: {})  {}: {} ({}: {})",
        t(locale, "count-unread"),
        c.unread_notifications,
        t(locale, "count-users"),
        c.total_users,
        t(locale, "count-enabled"),
        c.enabled_users,
        t(locale, "count-precautions"),
        c.active_precautions,
        t(locale, "count-critical"),
        c.critical_precautions,
    );
}

fn render_schedule(out: &mut String, view: &DashboardView, locale: Locale) {
    heading(out, t(locale, "dashboard-schedule"));
    for bucket in Bucket::ALL {
        let tasks = view.buckets.bucket(bucket);
        let _ = writeln!(out, "  {:<24} {}", t(locale, bucket.label_key()), tasks.len());
    }
    if view.buckets.undated > 0 {
        let _ = writeln!(
            out,
            "  {:<24} {}",
            t(locale, "dashboard-undated"),
            view.buckets.undated
        );
    }
}

fn render_upcoming(out: &mut String, view: &DashboardView, locale: Locale) {
    heading(out, t(locale, "dashboard-upcoming"));
    if view.upcoming.is_empty() {
        let _ = writeln!(out, "  {}", t(locale, "dashboard-none"));
        return;
    }
    for task in &view.upcoming {
        let due = task
            .next_due()
            .map_or_else(|| "-".to_string(), |d| format_date(&d));
        let _ = writeln!(
            out,
            "  {due}  {:<8} {}  ({})",
            task.priority.token(),
            truncate(&task.task_name, 40),
            task.device_label()
        );
    }
}

fn render_insights(out: &mut String, view: &DashboardView, locale: Locale) {
    let insights = &view.insights;
    heading(out, t(locale, "dashboard-insights"));

    let rate = |metric: &crate::analytics::Metric| match metric.value() {
        Some(_) => metric.to_string(),
        None => t(locale, "metric-unavailable").to_string(),
    };
    let _ = writeln!(
        out,
        "  {}: {}",
        t(locale, "insight-rule-activation"),
        rate(&insights.rule_activation_rate)
    );
    let _ = writeln!(
        out,
        "  {}: {}",
        t(locale, "insight-rule-success"),
        rate(&insights.rule_success_rate)
    );
    let _ = writeln!(
        out,
        "  {}: {}",
        t(locale, "insight-maintenance-completion"),
        rate(&insights.maintenance_completion_rate)
    );

    shares(out, t(locale, "insight-device-status"), &insights.device_status);
    shares(out, t(locale, "insight-device-types"), &insights.device_types);
    shares(out, t(locale, "insight-locations"), &insights.locations);
    shares(out, t(locale, "insight-open-by-priority"), &insights.open_by_priority);
}

fn shares(out: &mut String, title: &str, shares: &[Share]) {
    if shares.is_empty() {
        return;
    }
    let parts: Vec<String> = shares
        .iter()
        .map(|s| format!("{} {} ({})", s.label, s.count, s.percent))
        .collect();
    let _ = writeln!(out, "  {title}: {}", parts.join(", "));
}
