//! Wire types shared by both APIs.

use serde::{Deserialize, Serialize};

use crate::registry::DeviceRecord;

/// `{"msg": "..."}`, used for device self-reports, client sends, and the
/// forward to the device alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub msg: String,
}

impl MessagePayload {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// One entry of `GET /api/devices`.
///
/// The address goes out under the untagged key `Ip`, the shape existing
/// clients already parse. It is omitted when `client_api.expose_address` is off.
#[derive(Debug, Serialize)]
pub struct DeviceView {
    pub id: String,
    pub name: String,
    pub comment: String,
    pub msg: String,
    #[serde(rename = "Ip", skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl DeviceView {
    pub fn from_record(record: DeviceRecord, expose_address: bool) -> Self {
        Self {
            id: record.id,
            name: record.name,
            comment: record.comment,
            msg: record.last_message,
            ip: expose_address.then_some(record.address),
        }
    }
}

/// Body of `GET /api/devices`.
#[derive(Debug, Serialize)]
pub struct DeviceList {
    pub devices: Vec<DeviceView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> DeviceRecord {
        DeviceRecord {
            id: "smartscreen-1".into(),
            name: "UDLAP DEVICE".into(),
            comment: "demo device used in lesson".into(),
            address: "192.168.80.103".into(),
            last_message: String::new(),
        }
    }

    #[test]
    fn test_device_view_keeps_legacy_ip_key() {
        let v = serde_json::to_value(DeviceView::from_record(record(), true)).unwrap();
        assert_eq!(
            v,
            json!({
                "id": "smartscreen-1",
                "name": "UDLAP DEVICE",
                "comment": "demo device used in lesson",
                "msg": "",
                "Ip": "192.168.80.103",
            })
        );
    }

    #[test]
    fn test_device_view_hides_address() {
        let v = serde_json::to_value(DeviceView::from_record(record(), false)).unwrap();
        assert!(v.get("Ip").is_none());
        assert_eq!(v["msg"], "");
    }

    #[test]
    fn test_payload_rejects_missing_msg() {
        assert!(serde_json::from_str::<MessagePayload>("{}").is_err());
        assert!(serde_json::from_str::<MessagePayload>(r#"{"msg": 5}"#).is_err());
        let p: MessagePayload = serde_json::from_str(r#"{"msg":"hi","extra":1}"#).unwrap();
        assert_eq!(p, MessagePayload::new("hi"));
    }
}
