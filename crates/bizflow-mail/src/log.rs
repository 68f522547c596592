use futures::future::BoxFuture;
use tracing::info;

use bizflow_core::email::{EmailReceipt, InvitationEmail, InvoiceEmail};
use bizflow_core::error::Result;
use bizflow_core::traits::EmailSender;

/// Writes emails to the log instead of delivering them.
#[derive(Debug, Default)]
pub struct LogEmailSender;

impl LogEmailSender {
    pub fn new() -> Self {
        Self
    }
}

impl EmailSender for LogEmailSender {
    fn name(&self) -> &str {
        "log"
    }

    fn send_invoice_email(&self, email: InvoiceEmail) -> BoxFuture<'_, Result<EmailReceipt>> {
        Box::pin(async move {
            info!(
                to = %email.to,
                invoice_number = email.invoice_number.as_deref().unwrap_or(""),
                amount = email.amount.unwrap_or_default(),
                currency = email.currency.as_deref().unwrap_or(""),
                "Invoice email (not sent)"
            );
            Ok(EmailReceipt::default())
        })
    }

    fn send_invitation_email(
        &self,
        email: InvitationEmail,
    ) -> BoxFuture<'_, Result<EmailReceipt>> {
        Box::pin(async move {
            info!(
                to = %email.to,
                kind = %email.kind,
                subject = email.subject.as_deref().unwrap_or(""),
                "Email (not sent)"
            );
            Ok(EmailReceipt::default())
        })
    }
}
