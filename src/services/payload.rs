//! Payload - Gateway Response Parsing
//!
//! The gateway is inconsistent about envelopes: a collection may arrive as a
//! bare array, as an object with a named array field, or as `null`. This
//! module is the only place that knows about those shapes; everything past it
//! works with plain `Vec<T>`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::domain::MaintenanceTask;
use crate::error::{Error, Result};

/// Generic envelope fields tried after the endpoint's own field names
const FALLBACK_FIELDS: [&str; 2] = ["data", "content"];

/// Parse a collection response.
///
/// `fields` are the envelope names this endpoint is known to use, e.g.
/// `["upcomingMaintenance"]`. A missing or `null` field is an empty
/// collection. Records that fail to deserialize are skipped.
pub fn parse_collection<T: DeserializeOwned>(
    endpoint: &str,
    body: Value,
    fields: &[&str],
) -> Result<Vec<T>> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(parse_items(endpoint, items)),
        Value::Object(mut map) => {
            let field = fields
                .iter()
                .chain(FALLBACK_FIELDS.iter())
                .find(|name| map.contains_key(**name));

            match field.and_then(|name| map.remove(*name)) {
                Some(Value::Array(items)) => Ok(parse_items(endpoint, items)),
                Some(Value::Null) | None => Ok(Vec::new()),
                Some(other) => Err(Error::Decode {
                    endpoint: endpoint.to_string(),
                    message: format!("expected an array, found {}", value_kind(&other)),
                }),
            }
        }
        other => Err(Error::Decode {
            endpoint: endpoint.to_string(),
            message: format!("expected an array or object, found {}", value_kind(&other)),
        }),
    }
}

fn parse_items<T: DeserializeOwned>(endpoint: &str, items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(endpoint, index, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect();

    if parsed.len() < total {
        warn!(
            endpoint,
            kept = parsed.len(),
            total,
            "Some records could not be parsed"
        );
    }
    parsed
}

/// Parse a single-entity response (mutations). An empty body or an envelope
/// without the entity yields `None`.
pub fn parse_entity<T: DeserializeOwned>(body: Value, fields: &[&str]) -> Option<T> {
    match body {
        Value::Null => None,
        Value::Object(mut map) => {
            let nested = fields
                .iter()
                .chain(FALLBACK_FIELDS.iter())
                .find_map(|name| map.remove(*name).filter(Value::is_object));
            match nested {
                Some(inner) => serde_json::from_value(inner).ok(),
                None => serde_json::from_value(Value::Object(map)).ok(),
            }
        }
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `GET /maintenance/upcoming`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpcomingMaintenance {
    pub tasks: Vec<MaintenanceTask>,
    /// Server-side total; the task count when not reported
    pub total_count: usize,
}

impl UpcomingMaintenance {
    pub fn parse(endpoint: &str, body: Value) -> Result<Self> {
        let reported = body
            .get("totalCount")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok());
        let tasks: Vec<MaintenanceTask> =
            parse_collection(endpoint, body, &["upcomingMaintenance", "maintenance"])?;
        let total_count = reported.unwrap_or(tasks.len());
        Ok(Self { tasks, total_count })
    }
}

/// `GET /maintenance/day-wise`: the server's own bucketing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWiseMaintenance {
    pub today: Vec<MaintenanceTask>,
    pub tomorrow: Vec<MaintenanceTask>,
    pub next_7_days: Vec<MaintenanceTask>,
    pub next_30_days: Vec<MaintenanceTask>,
    pub overdue: Vec<MaintenanceTask>,
    pub recent_completed: Vec<MaintenanceTask>,
}

impl DayWiseMaintenance {
    pub fn parse(endpoint: &str, body: Value) -> Result<Self> {
        let mut map = match body {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::default()),
            other => {
                return Err(Error::Decode {
                    endpoint: endpoint.to_string(),
                    message: format!("expected an object, found {}", value_kind(&other)),
                });
            }
        };

        let mut bucket = |key: &str| -> Result<Vec<MaintenanceTask>> {
            let value = map.remove(key).unwrap_or(Value::Null);
            parse_collection(endpoint, value, &[])
        };

        Ok(Self {
            today: bucket("today")?,
            tomorrow: bucket("tomorrow")?,
            next_7_days: bucket("next7Days")?,
            next_30_days: bucket("next30Days")?,
            overdue: bucket("overdue")?,
            recent_completed: bucket("recentCompleted")?,
        })
    }

    pub fn total(&self) -> usize {
        self.today.len()
            + self.tomorrow.len()
            + self.next_7_days.len()
            + self.next_30_days.len()
            + self.overdue.len()
            + self.recent_completed.len()
    }
}
