use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Routing hint the mobile client expects on every notification tap.
pub const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";
pub const CHAT_CHANNEL: &str = "chat_channel";
pub const GENERAL_CHANNEL: &str = "general_channel";

const MAX_BODY_CHARS: usize = 100;
const ELLIPSIS: &str = "...";

/// One unit of work submitted to the messaging gateway. Serializes to the
/// FCM HTTP v1 message schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    pub token: String,
    pub notification: Notification,
    pub data: BTreeMap<String, String>,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AndroidConfig {
    pub priority: String,
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidNotification {
    pub channel_id: String,
    pub sound: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApnsConfig {
    pub headers: BTreeMap<String, String>,
    pub payload: ApnsPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aps {
    pub sound: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
}

impl AndroidConfig {
    /// High-priority delivery on the named channel with the default sound.
    pub fn high_priority(channel_id: &str) -> Self {
        Self {
            priority: "high".to_string(),
            notification: AndroidNotification {
                channel_id: channel_id.to_string(),
                sound: "default".to_string(),
                priority: None,
            },
        }
    }

    pub fn notification_priority(mut self, priority: &str) -> Self {
        self.notification.priority = Some(priority.to_string());
        self
    }
}

impl ApnsConfig {
    /// apns-priority 10 (deliver immediately) with the default sound.
    pub fn immediate() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("apns-priority".to_string(), "10".to_string());
        Self {
            headers,
            payload: ApnsPayload {
                aps: Aps {
                    sound: "default".to_string(),
                    badge: None,
                },
            },
        }
    }

    pub fn badge(mut self, badge: u32) -> Self {
        self.payload.aps.badge = Some(badge);
        self
    }
}

/// Notification bodies are capped at 100 characters; longer text is cut and
/// marked with an ellipsis. Counts characters, not bytes.
pub fn truncate_body(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(MAX_BODY_CHARS).collect();
    if chars.next().is_some() {
        format!("{}{}", head, ELLIPSIS)
    } else {
        head
    }
}
