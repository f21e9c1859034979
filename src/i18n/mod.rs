//! i18n - Internationalization Module
//!
//! Provides simple translation functions using HashMap-based lookups.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Error, ErrorKind};

/// Supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// English (US)
    #[default]
    EnUS,
    /// Chinese (Simplified)
    ZhCN,
}

impl Locale {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::EnUS => "English",
            Locale::ZhCN => "中文",
        }
    }

    /// Map a language code (`en`, `zh`, `zh-CN`, ...) to a locale, English otherwise
    pub fn from_code(code: &str) -> Self {
        let lang = code.trim().to_ascii_lowercase();
        if lang.starts_with("zh") {
            Locale::ZhCN
        } else {
            Locale::EnUS
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::EnUS => "en",
            Locale::ZhCN => "zh",
        }
    }
}

/// Translation resources
static TRANSLATIONS: OnceLock<HashMap<&'static str, (&'static str, &'static str)>> =
    OnceLock::new();

/// Initialize translations (key -> (en, zh))
fn init_translations() -> HashMap<&'static str, (&'static str, &'static str)> {
    let mut map = HashMap::new();

    // App
    map.insert("app-title", ("IoT Console", "物联网控制台"));

    // Sections
    map.insert("section-devices", ("Devices", "设备"));
    map.insert("section-rules", ("Rules", "规则"));
    map.insert("section-maintenance", ("Maintenance", "维护"));
    map.insert("section-notifications", ("Notifications", "通知"));
    map.insert("section-users", ("Users", "用户"));
    map.insert("section-safety", ("Safety Precautions", "安全注意事项"));

    // Counts
    map.insert("count-devices", ("Devices", "设备"));
    map.insert("count-online", ("Online", "在线"));
    map.insert("count-offline", ("Offline", "离线"));
    map.insert("count-warning", ("Warning", "警告"));
    map.insert("count-error", ("Error", "故障"));
    map.insert("count-rules", ("Rules", "规则"));
    map.insert("count-active", ("Active", "启用"));
    map.insert("count-triggered-today", ("Triggered today", "今日触发"));
    map.insert("count-triggered-week", ("Triggered (7 days)", "近 7 天触发"));
    map.insert("count-maintenance", ("Maintenance tasks", "维护任务"));
    map.insert("count-pending", ("Pending", "待处理"));
    map.insert("count-overdue", ("Overdue", "逾期"));
    map.insert("count-unread", ("Unread notifications", "未读通知"));
    map.insert("count-users", ("Users", "用户"));
    map.insert("count-enabled", ("Enabled", "已启用"));
    map.insert("count-precautions", ("Active precautions", "有效注意事项"));
    map.insert("count-critical", ("Critical", "严重"));

    // Buckets
    map.insert("bucket-overdue", ("Overdue", "逾期"));
    map.insert("bucket-today", ("Today", "今天"));
    map.insert("bucket-tomorrow", ("Tomorrow", "明天"));
    map.insert("bucket-next-7-days", ("Next 7 days", "未来 7 天"));
    map.insert("bucket-next-30-days", ("Next 30 days", "未来 30 天"));
    map.insert("bucket-later", ("Later", "更晚"));
    map.insert("bucket-recent-completed", ("Recently completed", "最近完成"));
    map.insert("bucket-archived", ("Archived", "已归档"));

    // Dashboard blocks
    map.insert("dashboard-upcoming", ("Upcoming maintenance", "即将进行的维护"));
    map.insert("dashboard-insights", ("Insights", "分析"));
    map.insert("dashboard-schedule", ("Maintenance schedule", "维护计划"));
    map.insert("dashboard-undated", ("Without a valid due date", "无有效到期日"));
    map.insert("dashboard-errors", ("Unavailable sections", "不可用的模块"));
    map.insert("dashboard-banners", ("Messages", "消息"));
    map.insert("dashboard-none", ("Nothing scheduled", "暂无安排"));
    map.insert(
        "watch-help",
        ("d [id] dismiss  r refresh  q quit", "d [编号] 关闭消息  r 刷新  q 退出"),
    );
    map.insert("insight-device-status", ("Device status", "设备状态分布"));
    map.insert("insight-device-types", ("Device types", "设备类型"));
    map.insert("insight-locations", ("Locations", "位置"));
    map.insert("insight-rule-activation", ("Rule activation rate", "规则启用率"));
    map.insert("insight-rule-success", ("Rule success rate", "规则成功率"));
    map.insert("insight-maintenance-completion", ("Maintenance completion rate", "维护完成率"));
    map.insert("insight-open-by-priority", ("Open tasks by priority", "按优先级的待办任务"));
    map.insert("metric-unavailable", ("n/a", "暂无"));

    // Table columns
    map.insert("col-id", ("ID", "编号"));
    map.insert("col-name", ("Name", "名称"));
    map.insert("col-title", ("Title", "标题"));
    map.insert("col-status", ("Status", "状态"));
    map.insert("col-type", ("Type", "类型"));
    map.insert("col-location", ("Location", "位置"));
    map.insert("col-last-seen", ("Last Seen", "最后在线"));
    map.insert("col-conditions", ("Conditions", "条件"));
    map.insert("col-last-triggered", ("Last Triggered", "最后触发"));
    map.insert("col-task", ("Task", "任务"));
    map.insert("col-device", ("Device", "设备"));
    map.insert("col-due", ("Due", "到期"));
    map.insert("col-priority", ("Priority", "优先级"));
    map.insert("col-assignee", ("Assignee", "负责人"));
    map.insert("col-read", ("Read", "已读"));
    map.insert("col-created", ("Created", "创建时间"));
    map.insert("col-severity", ("Severity", "严重程度"));
    map.insert("col-email", ("Email", "邮箱"));
    map.insert("col-role", ("Role", "角色"));

    // Table
    map.insert("table-no-data", ("No data", "无数据"));
    map.insert("table-loading", ("Loading...", "加载中..."));
    map.insert("table-page", ("Page", "页"));
    map.insert("table-items", ("items", "条"));

    // Errors
    map.insert("error-network", ("Gateway unreachable", "无法连接网关"));
    map.insert("error-auth", ("Session expired, sign in again", "会话已过期，请重新登录"));
    map.insert("error-not-found", ("Not found", "未找到"));
    map.insert("error-permission", ("Permission denied", "没有权限"));
    map.insert("error-server", ("Server error", "服务器错误"));
    map.insert("error-validation", ("Invalid input", "输入无效"));
    map.insert("error-internal", ("Internal error", "内部错误"));

    // Banners
    map.insert("banner-created", ("Created", "已创建"));
    map.insert("banner-updated", ("Updated", "已更新"));
    map.insert("banner-deleted", ("Deleted", "已删除"));
    map.insert("banner-completed", ("Marked as completed", "已标记为完成"));
    map.insert("banner-assigned", ("Assigned", "已分配"));
    map.insert("banner-toggled", ("Rule toggled", "规则已切换"));
    map.insert("banner-read", ("Marked as read", "已标记为已读"));
    map.insert("banner-failed", ("Failed", "失败"));

    map
}

/// Get translations
fn translations() -> &'static HashMap<&'static str, (&'static str, &'static str)> {
    TRANSLATIONS.get_or_init(init_translations)
}

/// Translate a key, falling back to the key itself
pub fn t(locale: Locale, key: &'static str) -> &'static str {
    if let Some(&(en, zh)) = translations().get(key) {
        match locale {
            Locale::EnUS => en,
            Locale::ZhCN => zh,
        }
    } else {
        key
    }
}

/// Headline for an error kind
pub fn error_kind_label(locale: Locale, kind: ErrorKind) -> &'static str {
    let key = match kind {
        ErrorKind::Network => "error-network",
        ErrorKind::Auth => "error-auth",
        ErrorKind::NotFound => "error-not-found",
        ErrorKind::Permission => "error-permission",
        ErrorKind::Server => "error-server",
        ErrorKind::Validation => "error-validation",
        ErrorKind::Internal => "error-internal",
    };
    t(locale, key)
}

/// User-facing message for an error: localized headline plus detail.
///
/// Never empty, so it can stand in for a section's error state.
pub fn error_message(locale: Locale, err: &Error) -> String {
    format!("{} ({err})", error_kind_label(locale, err.kind()))
}
