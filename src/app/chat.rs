use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::app::{DispatchOutcome, SkipReason};
use crate::domain::document::Document;
use crate::domain::push::{self, AndroidConfig, ApnsConfig, Notification, PushMessage};
use crate::infra::push::PushGateway;
use crate::infra::store::UserStore;

/// Display-name resolution chain; first non-empty field wins.
const NAME_FIELDS: [&str; 3] = ["fullName", "displayName", "firstName"];
const FALLBACK_SENDER_NAME: &str = "Someone";
/// A message without text is assumed to carry an attachment.
const ATTACHMENT_BODY: &str = "Image";

pub struct ChatDispatcher {
    users: Arc<dyn UserStore>,
    push: Arc<dyn PushGateway>,
}

impl ChatDispatcher {
    pub fn new(users: Arc<dyn UserStore>, push: Arc<dyn PushGateway>) -> Self {
        Self { users, push }
    }

    /// Turns one newly created message document into at most one push send.
    pub async fn dispatch(
        &self,
        chat_id: &str,
        message_id: &str,
        message: &Document,
    ) -> Result<DispatchOutcome> {
        let sender_id = message.text_or("senderId", "");
        let text = message.text_or("text", ATTACHMENT_BODY);

        let receiver_id = match message.text("receiverId") {
            Some(id) => id,
            None => return Ok(DispatchOutcome::Skipped(SkipReason::MissingReceiver)),
        };
        if receiver_id == sender_id {
            return Ok(DispatchOutcome::Skipped(SkipReason::SelfMessage));
        }

        let sender = self.users.fetch_user(sender_id).await?;
        let sender_name = sender
            .as_ref()
            .and_then(|doc| doc.first_text(&NAME_FIELDS))
            .unwrap_or(FALLBACK_SENDER_NAME);

        let receiver = self.users.fetch_user(receiver_id).await?;
        let token = match receiver.as_ref().and_then(|doc| doc.text("fcmToken")) {
            Some(token) => token,
            None => {
                info!(user_id = %receiver_id, "no device token registered, skipping push");
                return Ok(DispatchOutcome::Skipped(SkipReason::MissingDeviceToken));
            }
        };

        let mut data = BTreeMap::new();
        data.insert("type".to_string(), "chat".to_string());
        data.insert("chatId".to_string(), chat_id.to_string());
        data.insert("messageId".to_string(), message_id.to_string());
        data.insert("senderId".to_string(), sender_id.to_string());
        data.insert("receiverId".to_string(), receiver_id.to_string());
        data.insert("click_action".to_string(), push::CLICK_ACTION.to_string());

        let payload = PushMessage {
            token: token.to_string(),
            notification: Notification {
                title: sender_name.to_string(),
                body: push::truncate_body(text),
            },
            data,
            android: AndroidConfig::high_priority(push::CHAT_CHANNEL).notification_priority("high"),
            apns: ApnsConfig::immediate().badge(1),
        };

        let receipt_id = self.push.send(&payload).await?;
        Ok(DispatchOutcome::Sent { receipt_id })
    }
}
