use std::sync::Mutex;

use futures::future::BoxFuture;

use bizflow_core::email::{EmailReceipt, InvitationEmail, InvoiceEmail};
use bizflow_core::error::{BizflowError, Result};
use bizflow_core::traits::EmailSender;

/// Email sender that records every payload instead of delivering it.
#[derive(Default)]
pub struct RecordingEmailSender {
    invoices: Mutex<Vec<InvoiceEmail>>,
    invitations: Mutex<Vec<InvitationEmail>>,
    fail_with: Option<String>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails with `message`. Payloads are still recorded.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn invoices(&self) -> Vec<InvoiceEmail> {
        self.invoices.lock().unwrap().clone()
    }

    pub fn invitations(&self) -> Vec<InvitationEmail> {
        self.invitations.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.invoices.lock().unwrap().len() + self.invitations.lock().unwrap().len()
    }

    fn receipt(&self) -> Result<EmailReceipt> {
        match &self.fail_with {
            Some(message) => Err(BizflowError::Email(message.clone())),
            None => Ok(EmailReceipt {
                id: Some(format!("msg-{}", self.sent_count())),
            }),
        }
    }
}

impl EmailSender for RecordingEmailSender {
    fn name(&self) -> &str {
        "recording"
    }

    fn send_invoice_email(&self, email: InvoiceEmail) -> BoxFuture<'_, Result<EmailReceipt>> {
        Box::pin(async move {
            self.invoices.lock().unwrap().push(email);
            self.receipt()
        })
    }

    fn send_invitation_email(
        &self,
        email: InvitationEmail,
    ) -> BoxFuture<'_, Result<EmailReceipt>> {
        Box::pin(async move {
            self.invitations.lock().unwrap().push(email);
            self.receipt()
        })
    }
}
