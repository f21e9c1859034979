//! Maintenance schedule buckets and the upcoming list
//!
//! Day granularity throughout: timestamps are truncated to their calendar
//! day before comparison, so a task due at 23:59 today is still "today".

use chrono::NaiveDate;
use serde::Serialize;

use crate::constants::{NEXT_MONTH_DAYS, NEXT_WEEK_DAYS, RECENT_COMPLETED_DAYS};
use crate::domain::{MaintenanceStatus, MaintenanceTask};

/// Named time window a task falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Overdue,
    Today,
    Tomorrow,
    /// Due in 2..=7 days
    Next7Days,
    /// Due in 8..=30 days
    Next30Days,
    /// Due more than 30 days out
    Later,
    /// Completed within the last 7 days
    RecentCompleted,
    /// Completed earlier than that, or cancelled
    Archived,
}

impl Bucket {
    pub const ALL: [Bucket; 8] = [
        Bucket::Overdue,
        Bucket::Today,
        Bucket::Tomorrow,
        Bucket::Next7Days,
        Bucket::Next30Days,
        Bucket::Later,
        Bucket::RecentCompleted,
        Bucket::Archived,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            Bucket::Overdue => "bucket-overdue",
            Bucket::Today => "bucket-today",
            Bucket::Tomorrow => "bucket-tomorrow",
            Bucket::Next7Days => "bucket-next-7-days",
            Bucket::Next30Days => "bucket-next-30-days",
            Bucket::Later => "bucket-later",
            Bucket::RecentCompleted => "bucket-recent-completed",
            Bucket::Archived => "bucket-archived",
        }
    }
}

/// Classify one task; `None` when it has no parseable due date
pub fn classify(task: &MaintenanceTask, today: NaiveDate) -> Option<Bucket> {
    let due = task.next_due()?;

    match task.status {
        MaintenanceStatus::Completed => {
            let done = task.last_done().unwrap_or(due);
            if (today - done).num_days() <= RECENT_COMPLETED_DAYS {
                Some(Bucket::RecentCompleted)
            } else {
                Some(Bucket::Archived)
            }
        }
        MaintenanceStatus::Cancelled => Some(Bucket::Archived),
        _ if task.is_overdue(today) => Some(Bucket::Overdue),
        _ => Some(match (due - today).num_days() {
            0 => Bucket::Today,
            1 => Bucket::Tomorrow,
            d if d <= NEXT_WEEK_DAYS => Bucket::Next7Days,
            d if d <= NEXT_MONTH_DAYS => Bucket::Next30Days,
            _ => Bucket::Later,
        }),
    }
}

/// Every task with a valid due date, in exactly one bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceBuckets {
    pub overdue: Vec<MaintenanceTask>,
    pub today: Vec<MaintenanceTask>,
    pub tomorrow: Vec<MaintenanceTask>,
    pub next_7_days: Vec<MaintenanceTask>,
    pub next_30_days: Vec<MaintenanceTask>,
    pub later: Vec<MaintenanceTask>,
    pub recent_completed: Vec<MaintenanceTask>,
    pub archived: Vec<MaintenanceTask>,
    /// Tasks left out because their due date is missing or unreadable
    pub undated: usize,
}

impl MaintenanceBuckets {
    pub fn compute(tasks: &[MaintenanceTask], today: NaiveDate) -> Self {
        let mut buckets = Self::default();

        for task in tasks {
            match classify(task, today) {
                Some(bucket) => buckets.bucket_mut(bucket).push(task.clone()),
                None => buckets.undated += 1,
            }
        }

        // Stable sorts: equal keys keep collection order
        for bucket in [
            Bucket::Overdue,
            Bucket::Today,
            Bucket::Tomorrow,
            Bucket::Next7Days,
            Bucket::Next30Days,
            Bucket::Later,
        ] {
            buckets.bucket_mut(bucket).sort_by_key(|t| t.next_due());
        }
        buckets
            .recent_completed
            .sort_by_key(|t| std::cmp::Reverse(t.last_done().or(t.next_due())));

        buckets
    }

    pub fn bucket(&self, bucket: Bucket) -> &[MaintenanceTask] {
        match bucket {
            Bucket::Overdue => &self.overdue,
            Bucket::Today => &self.today,
            Bucket::Tomorrow => &self.tomorrow,
            Bucket::Next7Days => &self.next_7_days,
            Bucket::Next30Days => &self.next_30_days,
            Bucket::Later => &self.later,
            Bucket::RecentCompleted => &self.recent_completed,
            Bucket::Archived => &self.archived,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<MaintenanceTask> {
        match bucket {
            Bucket::Overdue => &mut self.overdue,
            Bucket::Today => &mut self.today,
            Bucket::Tomorrow => &mut self.tomorrow,
            Bucket::Next7Days => &mut self.next_7_days,
            Bucket::Next30Days => &mut self.next_30_days,
            Bucket::Later => &mut self.later,
            Bucket::RecentCompleted => &mut self.recent_completed,
            Bucket::Archived => &mut self.archived,
        }
    }

    /// Number of bucketed tasks
    pub fn total(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.bucket(*b).len()).sum()
    }
}

/// Open tasks due today or later, soonest first, at most `limit`
pub fn upcoming(tasks: &[MaintenanceTask], today: NaiveDate, limit: usize) -> Vec<MaintenanceTask> {
    let mut due: Vec<(NaiveDate, &MaintenanceTask)> = tasks
        .iter()
        .filter(|t| !t.is_completed() && !t.is_cancelled())
        .filter_map(|t| t.next_due().map(|d| (d, t)))
        .filter(|(d, _)| *d >= today)
        .collect();

    due.sort_by_key(|(d, _)| *d);
    due.into_iter().take(limit).map(|(_, t)| t.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn task(id: &str, due: &str, status: MaintenanceStatus) -> MaintenanceTask {
        MaintenanceTask {
            id: id.to_string(),
            next_maintenance: Some(due.to_string()),
            status,
            ..Default::default()
        }
    }

    fn ids(tasks: &[MaintenanceTask]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_day_boundaries() {
        let today = day(2025, 3, 14);
        let cases = [
            ("2025-03-13T23:59:59", Bucket::Overdue),
            ("2025-03-14T00:00:00", Bucket::Today),
            ("2025-03-14T23:59:59", Bucket::Today),
            ("2025-03-15", Bucket::Tomorrow),
            ("2025-03-16", Bucket::Next7Days),
            ("2025-03-21", Bucket::Next7Days),
            ("2025-03-22", Bucket::Next30Days),
            ("2025-04-13", Bucket::Next30Days),
            ("2025-04-14", Bucket::Later),
        ];
        for (due, expected) in cases {
            let t = task("t", due, MaintenanceStatus::Pending);
            assert_eq!(classify(&t, today), Some(expected), "due {due}");
        }
    }

    #[test]
    fn test_invalid_date_excluded_everywhere() {
        let today = day(2025, 3, 14);
        let tasks = vec![
            task("bad", "invalid-date", MaintenanceStatus::Pending),
            task("ok", "2025-03-14", MaintenanceStatus::Pending),
        ];
        let buckets = MaintenanceBuckets::compute(&tasks, today);
        assert_eq!(buckets.total(), 1);
        assert_eq!(buckets.undated, 1);
        assert!(Bucket::ALL.iter().all(|b| !ids(buckets.bucket(*b)).contains(&"bad")));
        assert!(upcoming(&tasks, today, 5).iter().all(|t| t.id != "bad"));
    }

    #[test]
    fn test_each_dated_task_in_exactly_one_bucket() {
        let today = day(2025, 3, 14);
        let statuses = [
            MaintenanceStatus::Active,
            MaintenanceStatus::Pending,
            MaintenanceStatus::InProgress,
            MaintenanceStatus::Completed,
            MaintenanceStatus::Cancelled,
            MaintenanceStatus::Overdue,
            MaintenanceStatus::Other("ON_HOLD".to_string()),
        ];
        let mut tasks = Vec::new();
        for offset in -40i64..=40 {
            for status in &statuses {
                let due = today + chrono::TimeDelta::days(offset);
                tasks.push(task(
                    &format!("{offset}-{status}"),
                    &due.format("%Y-%m-%d").to_string(),
                    status.clone(),
                ));
            }
        }

        let buckets = MaintenanceBuckets::compute(&tasks, today);
        assert_eq!(buckets.total(), tasks.len());
        for t in &tasks {
            let hits = Bucket::ALL
                .iter()
                .filter(|b| buckets.bucket(**b).iter().any(|x| x.id == t.id))
                .count();
            assert_eq!(hits, 1, "task {}", t.id);
        }
    }

    #[test]
    fn test_overdue_status_wins_over_future_date() {
        let today = day(2025, 3, 14);
        let t = task("o", "2025-03-20", MaintenanceStatus::Overdue);
        assert_eq!(classify(&t, today), Some(Bucket::Overdue));
    }

    #[test]
    fn test_recent_completed_uses_last_maintenance() {
        let today = day(2025, 3, 14);
        let mut recent = task("recent", "2025-01-01", MaintenanceStatus::Completed);
        recent.last_maintenance = Some("2025-03-10".to_string());
        let mut older = task("older", "2025-03-13", MaintenanceStatus::Completed);
        older.last_maintenance = Some("2025-02-01".to_string());
        let fallback = task("fallback", "2025-03-12", MaintenanceStatus::Completed);

        let buckets = MaintenanceBuckets::compute(&[recent, older, fallback], today);
        assert_eq!(ids(&buckets.recent_completed), vec!["fallback", "recent"]);
        assert_eq!(ids(&buckets.archived), vec!["older"]);
    }

    #[test]
    fn test_upcoming_sorted_stable_and_truncated() {
        let today = day(2025, 3, 14);
        let tasks = vec![
            task("c", "2025-03-20", MaintenanceStatus::Pending),
            task("a", "2025-03-15", MaintenanceStatus::Pending),
            task("done", "2025-03-15", MaintenanceStatus::Completed),
            task("b", "2025-03-15", MaintenanceStatus::Active),
            task("past", "2025-03-01", MaintenanceStatus::Pending),
            task("d", "2025-03-14", MaintenanceStatus::InProgress),
        ];
        assert_eq!(ids(&upcoming(&tasks, today, 3)), vec!["d", "a", "b"]);
        assert_eq!(upcoming(&tasks, today, 10).len(), 4);
    }

    #[test]
    fn test_pure_for_fixed_inputs() {
        let today = day(2025, 3, 14);
        let tasks = vec![
            task("a", "2025-03-15", MaintenanceStatus::Pending),
            task("b", "2025-03-01", MaintenanceStatus::Pending),
        ];
        assert_eq!(
            MaintenanceBuckets::compute(&tasks, today),
            MaintenanceBuckets::compute(&tasks, today)
        );
    }
}
