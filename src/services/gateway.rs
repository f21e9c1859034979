//! Gateway Client
//!
//! REST client for the platform backend. Every call is raced against the
//! configured deadline and is never retried here; the next poll tick is the
//! retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{Value, json};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::domain::config::GatewayConfig;
use crate::domain::{
    Device, DeviceDraft, DeviceStatus, MaintenanceDraft, MaintenanceTask, Notification, Rule,
    RuleDraft, SafetyPrecaution, User,
};
use crate::error::{Error, Result};
use crate::services::payload::{
    DayWiseMaintenance, UpcomingMaintenance, parse_collection, parse_entity,
};

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Remote data gateway
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    // ==================== Devices ====================

    async fn list_devices(&self) -> Result<Vec<Device>>;

    async fn create_device(&self, draft: &DeviceDraft) -> Result<Option<Device>>;

    async fn delete_device(&self, id: &str) -> Result<()>;

    async fn update_device_status(&self, id: &str, status: &DeviceStatus) -> Result<()>;

    // ==================== Rules ====================

    async fn list_rules(&self) -> Result<Vec<Rule>>;

    async fn create_rule(&self, draft: &RuleDraft) -> Result<Option<Rule>>;

    async fn update_rule(&self, id: &str, draft: &RuleDraft) -> Result<Option<Rule>>;

    async fn delete_rule(&self, id: &str) -> Result<()>;

    async fn toggle_rule(&self, id: &str) -> Result<()>;

    // ==================== Maintenance ====================

    async fn list_maintenance(&self) -> Result<Vec<MaintenanceTask>>;

    async fn upcoming_maintenance(&self) -> Result<UpcomingMaintenance>;

    async fn today_maintenance(&self) -> Result<Vec<MaintenanceTask>>;

    async fn day_wise_maintenance(&self) -> Result<DayWiseMaintenance>;

    async fn create_maintenance(
        &self,
        draft: &MaintenanceDraft,
    ) -> Result<Option<MaintenanceTask>>;

    async fn update_maintenance(
        &self,
        id: &str,
        draft: &MaintenanceDraft,
    ) -> Result<Option<MaintenanceTask>>;

    async fn delete_maintenance(&self, id: &str) -> Result<()>;

    async fn complete_maintenance(&self, id: &str) -> Result<Option<MaintenanceTask>>;

    async fn assign_maintenance(&self, id: &str, assignee_id: &str) -> Result<()>;

    // ==================== Notifications ====================

    async fn list_notifications(&self) -> Result<Vec<Notification>>;

    async fn mark_notification_read(&self, id: &str) -> Result<()>;

    async fn mark_all_notifications_read(&self) -> Result<()>;

    // ==================== Users / Safety ====================

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn list_safety_precautions(&self) -> Result<Vec<SafetyPrecaution>>;

    async fn device_safety_precautions(&self, device_id: &str) -> Result<Vec<SafetyPrecaution>>;
}

/// reqwest-backed gateway
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Invalid {
                message: format!("Gateway URL must start with http:// or https://: {base_url}"),
            });
        }

        let client = Client::builder()
            .user_agent(concat!("iot-console/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
            timeout: config.timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and return the JSON body (`Null` when empty)
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let request_id = Uuid::new_v4();
        let span = info_span!("gateway", method = method.as_str(), path, %request_id);

        let mut request = self
            .client
            .request(method.clone(), self.url(path))
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let exchange = async move {
            debug!("Sending request");
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            debug!(status = status.as_u16(), bytes = text.len(), "Received response");

            if !status.is_success() {
                return Err(Error::from_status(status.as_u16(), &text));
            }
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&text).map_err(|e| Error::Decode {
                endpoint: path.to_string(),
                message: e.to_string(),
            })
        };

        match tokio::time::timeout(self.timeout, exchange.instrument(span)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                message: format!("{method} {path} exceeded {}s", self.timeout.as_secs()),
            }),
        }
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.send(Method::GET, path, None).await
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list_devices(&self) -> Result<Vec<Device>> {
        parse_collection("/devices", self.get("/devices").await?, &["devices"])
    }

    async fn create_device(&self, draft: &DeviceDraft) -> Result<Option<Device>> {
        let body = self
            .send(Method::POST, "/devices", Some(serde_json::to_value(draft)?))
            .await?;
        Ok(parse_entity(body, &["device"]))
    }

    async fn delete_device(&self, id: &str) -> Result<()> {
        self.send(Method::DELETE, &format!("/devices/{id}"), None)
            .await
            .map(drop)
    }

    async fn update_device_status(&self, id: &str, status: &DeviceStatus) -> Result<()> {
        let body = serde_json::to_value(status)?;
        self.send(Method::PATCH, &format!("/devices/{id}/status"), Some(body))
            .await
            .map(drop)
    }

    async fn list_rules(&self) -> Result<Vec<Rule>> {
        parse_collection("/rules", self.get("/rules").await?, &["rules"])
    }

    async fn create_rule(&self, draft: &RuleDraft) -> Result<Option<Rule>> {
        let body = self
            .send(Method::POST, "/rules", Some(serde_json::to_value(draft)?))
            .await?;
        Ok(parse_entity(body, &["rule"]))
    }

    async fn update_rule(&self, id: &str, draft: &RuleDraft) -> Result<Option<Rule>> {
        let body = self
            .send(
                Method::PUT,
                &format!("/rules/{id}"),
                Some(serde_json::to_value(draft)?),
            )
            .await?;
        Ok(parse_entity(body, &["rule"]))
    }

    async fn delete_rule(&self, id: &str) -> Result<()> {
        self.send(Method::DELETE, &format!("/rules/{id}"), None)
            .await
            .map(drop)
    }

    async fn toggle_rule(&self, id: &str) -> Result<()> {
        self.send(Method::PATCH, &format!("/rules/{id}/toggle"), None)
            .await
            .map(drop)
    }

    async fn list_maintenance(&self) -> Result<Vec<MaintenanceTask>> {
        parse_collection(
            "/maintenance",
            self.get("/maintenance").await?,
            &["maintenance", "maintenanceTasks"],
        )
    }

    async fn upcoming_maintenance(&self) -> Result<UpcomingMaintenance> {
        let path = "/maintenance/upcoming";
        UpcomingMaintenance::parse(path, self.get(path).await?)
    }

    async fn today_maintenance(&self) -> Result<Vec<MaintenanceTask>> {
        let path = "/maintenance/today";
        parse_collection(path, self.get(path).await?, &["todayMaintenance", "maintenance"])
    }

    async fn day_wise_maintenance(&self) -> Result<DayWiseMaintenance> {
        let path = "/maintenance/day-wise";
        DayWiseMaintenance::parse(path, self.get(path).await?)
    }

    async fn create_maintenance(
        &self,
        draft: &MaintenanceDraft,
    ) -> Result<Option<MaintenanceTask>> {
        let body = self
            .send(Method::POST, "/maintenance", Some(serde_json::to_value(draft)?))
            .await?;
        Ok(parse_entity(body, &["maintenanceTask"]))
    }

    async fn update_maintenance(
        &self,
        id: &str,
        draft: &MaintenanceDraft,
    ) -> Result<Option<MaintenanceTask>> {
        let body = self
            .send(
                Method::PUT,
                &format!("/maintenance/{id}"),
                Some(serde_json::to_value(draft)?),
            )
            .await?;
        Ok(parse_entity(body, &["maintenanceTask"]))
    }

    async fn delete_maintenance(&self, id: &str) -> Result<()> {
        self.send(Method::DELETE, &format!("/maintenance/{id}"), None)
            .await
            .map(drop)
    }

    async fn complete_maintenance(&self, id: &str) -> Result<Option<MaintenanceTask>> {
        let body = self
            .send(Method::POST, &format!("/maintenance/{id}/complete"), None)
            .await?;
        Ok(parse_entity(body, &["maintenanceTask"]))
    }

    async fn assign_maintenance(&self, id: &str, assignee_id: &str) -> Result<()> {
        let body = json!({ "assigneeId": assignee_id });
        self.send(Method::PATCH, &format!("/maintenance/{id}/assign"), Some(body))
            .await
            .map(drop)
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        let path = "/notifications";
        parse_collection(path, self.get(path).await?, &["notifications"])
    }

    async fn mark_notification_read(&self, id: &str) -> Result<()> {
        self.send(Method::PATCH, &format!("/notifications/{id}/read"), None)
            .await
            .map(drop)
    }

    async fn mark_all_notifications_read(&self) -> Result<()> {
        self.send(Method::PATCH, "/notifications/read-all", None)
            .await
            .map(drop)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        parse_collection("/users", self.get("/users").await?, &["users"])
    }

    async fn list_safety_precautions(&self) -> Result<Vec<SafetyPrecaution>> {
        let path = "/device-safety-precautions";
        parse_collection(path, self.get(path).await?, &["precautions", "safetyPrecautions"])
    }

    async fn device_safety_precautions(&self, device_id: &str) -> Result<Vec<SafetyPrecaution>> {
        let path = format!("/device-safety-precautions/device/{device_id}");
        parse_collection(&path, self.get(&path).await?, &["precautions", "safetyPrecautions"])
    }
}
