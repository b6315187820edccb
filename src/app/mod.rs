pub mod applications;
pub mod chat;

use std::fmt;

/// Result of one dispatcher invocation: at most one gateway send happened.
#[derive(Debug)]
pub enum DispatchOutcome {
    Sent { receipt_id: String },
    Skipped(SkipReason),
}

/// Expected no-ops. None of these is an error; the invocation still
/// resolves successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingReceiver,
    SelfMessage,
    UnchangedStatus,
    MissingDeviceToken,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::MissingReceiver => "no receiver designated",
            SkipReason::SelfMessage => "self-directed message",
            SkipReason::UnchangedStatus => "status unchanged",
            SkipReason::MissingDeviceToken => "no device token registered",
        };
        f.write_str(reason)
    }
}
