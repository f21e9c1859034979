//! Rule - Automation Rules

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::dates::lenient_timestamp;
use super::null_as_default;
use crate::error::{Error, Result};

/// One condition of a rule; conditions are evaluated in order and joined by
/// the `logic_operator` of the following condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleCondition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// DEVICE_STATUS, TELEMETRY_THRESHOLD or TIME_BASED
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub condition_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub metric: String,
    /// GREATER_THAN, LESS_THAN, EQUALS, ...
    #[serde(deserialize_with = "null_as_default")]
    pub operator: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    /// AND / OR
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logic_operator: Option<String>,
}

/// One action fired when a rule matches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// NOTIFICATION, DEVICE_CONTROL, WEBHOOK, LOG
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub action_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub config: HashMap<String, String>,
}

/// Automation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rule {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub description: Option<String>,
    pub device_id: Option<String>,
    pub metric: Option<String>,
    pub threshold: Option<String>,
    pub active: bool,
    /// Some endpoints report `"ACTIVE"`/`"INACTIVE"` instead of the flag
    pub status: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub conditions: Vec<RuleCondition>,
    #[serde(deserialize_with = "null_as_default")]
    pub actions: Vec<RuleAction>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_triggered: Option<NaiveDateTime>,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: None,
            device_id: None,
            metric: None,
            threshold: None,
            active: true,
            status: None,
            conditions: Vec::new(),
            actions: Vec::new(),
            created_at: None,
            updated_at: None,
            last_triggered: None,
        }
    }
}

impl Rule {
    /// Whether the rule is enabled, honoring an explicit status string
    pub fn is_active(&self) -> bool {
        match self.status.as_deref().map(super::normalize_token) {
            Some(status) if status == "INACTIVE" || status == "DISABLED" => false,
            Some(status) if status == "ACTIVE" || status == "ENABLED" => true,
            _ => self.active,
        }
    }

    /// Short "metric op value AND ..." summary of the conditions
    pub fn condition_summary(&self) -> String {
        self.conditions
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let clause = format!("{} {} {}", c.metric, operator_symbol(&c.operator), c.value);
                match (i, c.logic_operator.as_deref()) {
                    (0, _) => clause,
                    (_, Some(logic)) => format!("{} {}", logic.to_uppercase(), clause),
                    (_, None) => format!("AND {clause}"),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn operator_symbol(operator: &str) -> &str {
    match super::normalize_token(operator).as_str() {
        "GREATER_THAN" => ">",
        "LESS_THAN" => "<",
        "EQUALS" => "=",
        "GREATER_THAN_OR_EQUAL" => ">=",
        "LESS_THAN_OR_EQUAL" => "<=",
        _ => operator,
    }
}

/// Payload for creating or updating a rule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    pub conditions: Vec<RuleCondition>,
    pub actions: Vec<RuleAction>,
}

impl RuleDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "rule name is required"));
        }
        if self.conditions.is_empty() {
            return Err(Error::validation("conditions", "at least one condition is required"));
        }
        for (i, condition) in self.conditions.iter().enumerate() {
            if condition.metric.trim().is_empty() {
                return Err(Error::validation(
                    format!("conditions[{i}].metric"),
                    "metric is required",
                ));
            }
            if condition.operator.trim().is_empty() {
                return Err(Error::validation(
                    format!("conditions[{i}].operator"),
                    "operator is required",
                ));
            }
            if condition.value.trim().is_empty() {
                return Err(Error::validation(
                    format!("conditions[{i}].value"),
                    "value is required",
                ));
            }
        }
        if self.actions.is_empty() {
            return Err(Error::validation("actions", "at least one action is required"));
        }
        if let Some(i) = self.actions.iter().position(|a| a.action_type.trim().is_empty()) {
            return Err(Error::validation(
                format!("actions[{i}].type"),
                "action type is required",
            ));
        }
        Ok(())
    }
}
