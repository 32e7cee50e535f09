//! Mail delivery collaborator.
//!
//! Transport is out of scope: the mediator renders a template and hands the
//! result to a [`Mailer`]. [`LogMailer`] is the default when no transport is
//! wired in; [`RecordingMailer`] captures outbound mail for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use foyer_types::EmailAddress;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
#[error("mail transport failed: {0}")]
pub struct DeliveryError(pub String);

/// A fully rendered outbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: EmailAddress,
    /// Template key the body was rendered from, for transport-side routing.
    pub template: String,
    pub subject: String,
    pub body: String,
}

/// Sends rendered messages. Implementations must not retry; the caller owns
/// retry policy (which, in this service, is "none").
pub trait Mailer: Send + Sync {
    fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError>;
}

/// Logs outbound mail instead of delivering it.
#[derive(Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        info!(
            to = %email.to,
            template = %email.template,
            subject = %email.subject,
            "outbound email (log transport)"
        );
        Ok(())
    }
}

/// Captures outbound mail; can be switched into a failing mode to exercise
/// delivery-failure paths.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    failing: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of everything sent so far.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("recording mailer poisoned").clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError("transport unavailable".to_string()));
        }
        self.sent
            .lock()
            .expect("recording mailer poisoned")
            .push(email.clone());
        Ok(())
    }
}
