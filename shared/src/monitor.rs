//! 实时监控消息
//!
//! WebSocket 推送两种消息，每条都整体覆盖之前的状态，不做增量合并。

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveVehicle {
    pub license_plate: String,
    pub entry_time: String,
    #[serde(default)]
    pub exit_time: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub status: String,
}

impl LiveVehicle {
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SystemStatus {
    #[serde(alias = "is_active")]
    pub is_monitoring: bool,
    pub camera_status: bool,
    pub camera_message: String,
    pub active_vehicles: u32,
    pub connected_clients: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorMessage {
    VehicleUpdate { vehicles: Vec<LiveVehicle> },
    StatusUpdate { status: SystemStatus },
}

impl MonitorMessage {
    /// 解析一帧文本
    ///
    /// 未知的 `type` 返回 `Ok(None)`。没有 `type` 但带 `vehicles` 的广播帧按车辆更新处理。
    pub fn parse(frame: &str) -> Result<Option<Self>, serde_json::Error> {
        let mut value: Value = serde_json::from_str(frame)?;
        match value.get("type").and_then(Value::as_str) {
            Some("vehicle_update" | "status_update") => {}
            Some(_) => return Ok(None),
            None if value.get("vehicles").is_some() => {
                if let Some(obj) = value.as_object_mut() {
                    obj.insert("type".to_string(), Value::from("vehicle_update"));
                }
            }
            None => return Ok(None),
        }
        serde_json::from_value(value).map(Some)
    }
}

/// 监控视图的状态
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonitorState {
    pub vehicles: Vec<LiveVehicle>,
    pub status: Option<SystemStatus>,
}

impl MonitorState {
    pub fn apply(&mut self, msg: MonitorMessage) {
        match msg {
            MonitorMessage::VehicleUpdate { vehicles } => self.vehicles = vehicles,
            MonitorMessage::StatusUpdate { status } => self.status = Some(status),
        }
    }

    /// 应用一帧原始文本，返回状态是否变化
    pub fn apply_frame(&mut self, frame: &str) -> bool {
        match MonitorMessage::parse(frame) {
            Ok(Some(msg)) => {
                self.apply(msg);
                true
            }
            Ok(None) => {
                log::debug!("ignoring monitor frame with unknown type");
                false
            }
            Err(e) => {
                log::warn!("malformed monitor frame: {e}");
                false
            }
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.is_monitoring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VEHICLES: &str = r#"{"type":"vehicle_update","vehicles":[
        {"license_plate":"AA-11-BB","entry_time":"2024-05-01T08:00:00","confidence":0.934,"status":"parked"}
    ]}"#;

    #[test]
    fn test_vehicle_update_replaces_list() {
        let mut state = MonitorState {
            vehicles: vec![
                LiveVehicle {
                    license_plate: "OLD-1".into(),
                    entry_time: "x".into(),
                    exit_time: None,
                    confidence: 0.5,
                    status: "parked".into(),
                };
                3
            ],
            status: None,
        };

        assert!(state.apply_frame(VEHICLES));
        assert_eq!(state.vehicles.len(), 1);
        assert_eq!(state.vehicles[0].license_plate, "AA-11-BB");
        assert_eq!(state.vehicles[0].confidence_percent(), "93.40%");
    }

    #[test]
    fn test_status_update_accepts_is_active_alias() {
        let mut state = MonitorState::default();
        let frame = r#"{"type":"status_update","status":{"is_active":true,"camera_status":false,"active_vehicles":4}}"#;

        assert!(state.apply_frame(frame));
        assert!(state.is_monitoring());
        let status = state.status.unwrap();
        assert_eq!(status.active_vehicles, 4);
        assert_eq!(status.connected_clients, 0);
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let mut state = MonitorState::default();
        assert!(!state.apply_frame(r#"{"type":"heartbeat"}"#));
        assert_eq!(state, MonitorState::default());
    }

    #[test]
    fn test_malformed_frame_leaves_state_untouched() {
        let mut state = MonitorState::default();
        state.apply_frame(VEHICLES);
        let before = state.clone();

        assert!(!state.apply_frame("{not json"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_untyped_broadcast_is_vehicle_update() {
        let frame = r#"{"timestamp":"2024-05-01T08:00:01","vehicles":[]}"#;
        assert_eq!(
            MonitorMessage::parse(frame).unwrap(),
            Some(MonitorMessage::VehicleUpdate { vehicles: vec![] })
        );
    }
}
