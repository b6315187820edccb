use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::app::{DispatchOutcome, SkipReason};
use crate::domain::document::{coerce_text, Document};
use crate::domain::push::{self, AndroidConfig, ApnsConfig, Notification, PushMessage};
use crate::infra::push::PushGateway;
use crate::infra::store::UserStore;

const FALLBACK_JOB_TITLE: &str = "a job";

pub struct ApplicationStatusDispatcher {
    users: Arc<dyn UserStore>,
    push: Arc<dyn PushGateway>,
}

impl ApplicationStatusDispatcher {
    pub fn new(users: Arc<dyn UserStore>, push: Arc<dyn PushGateway>) -> Self {
        Self { users, push }
    }

    /// Turns one application update into at most one push send. Only fires
    /// when the status field actually changed between the two snapshots.
    pub async fn dispatch(
        &self,
        application_id: &str,
        before: &Document,
        after: &Document,
    ) -> Result<DispatchOutcome> {
        let status = match after.get("status") {
            Some(value) if Some(value) != before.get("status") => coerce_text(value),
            _ => return Ok(DispatchOutcome::Skipped(SkipReason::UnchangedStatus)),
        };

        let applicant_id = after.text_or("applicantId", "");
        let job_title = after.text_or("jobTitle", FALLBACK_JOB_TITLE);

        let applicant = self.users.fetch_user(applicant_id).await?;
        let token = match applicant.as_ref().and_then(|doc| doc.text("fcmToken")) {
            Some(token) => token,
            None => {
                info!(user_id = %applicant_id, "no device token registered, skipping push");
                return Ok(DispatchOutcome::Skipped(SkipReason::MissingDeviceToken));
            }
        };

        let (title, body) = match status.as_str() {
            "accepted" => (
                "🎉 Application Accepted!".to_string(),
                format!(
                    "Congratulations! Your application for \"{}\" has been accepted!",
                    job_title
                ),
            ),
            "rejected" => (
                "Application Update".to_string(),
                format!(
                    "Your application for \"{}\" was not selected at this time.",
                    job_title
                ),
            ),
            _ => (
                "Application Status Updated".to_string(),
                format!("Your application for \"{}\" is now {}", job_title, status),
            ),
        };

        let mut data = BTreeMap::new();
        data.insert("type".to_string(), "application_status".to_string());
        data.insert("applicationId".to_string(), application_id.to_string());
        data.insert("status".to_string(), status.clone());
        data.insert("jobTitle".to_string(), job_title.to_string());
        data.insert("click_action".to_string(), push::CLICK_ACTION.to_string());

        let payload = PushMessage {
            token: token.to_string(),
            notification: Notification { title, body },
            data,
            android: AndroidConfig::high_priority(push::GENERAL_CHANNEL),
            apns: ApnsConfig::immediate(),
        };

        let receipt_id = self.push.send(&payload).await?;
        Ok(DispatchOutcome::Sent { receipt_id })
    }
}
