use serde_json::{Map, Value};

use bizflow_core::email::{InvitationEmail, InvoiceEmail};
use bizflow_core::resolve::Layers;
use bizflow_core::traits::EmailSender;
use bizflow_core::workflow::NodeOutput;

use super::layers;

const MISSING_RECIPIENT: &str = "Recipient email is required";

/// `send_email`: an invoice email when any source marks `type: "invoice"`,
/// otherwise an invitation/notification email.
pub async fn send_email(sender: &dyn EmailSender, config: &Map<String, Value>, input: &Value) -> NodeOutput {
    let fields = layers(config, input, "emailData");
    let Some(to) = fields.string_any(&["to", "email"]) else {
        return NodeOutput::failed(MISSING_RECIPIENT);
    };

    if fields.any_equals("type", "invoice") {
        let email = invoice_email(&fields, to.clone());
        match sender.send_invoice_email(email).await {
            Ok(receipt) => sent("invoice", &to, receipt.id),
            Err(e) => NodeOutput::failed(e.to_string()),
        }
    } else {
        let email = invitation_email(&fields, to.clone());
        let kind = email.kind.clone();
        match sender.send_invitation_email(email).await {
            Ok(receipt) => sent(&kind, &to, receipt.id),
            Err(e) => NodeOutput::failed(e.to_string()),
        }
    }
}

fn invoice_email(fields: &Layers<'_>, to: String) -> InvoiceEmail {
    InvoiceEmail {
        to,
        invoice_number: fields.string("invoiceNumber"),
        client_name: fields.string("clientName"),
        amount: fields.number("amount"),
        currency: fields.string("currency"),
        due_date: fields.string("dueDate"),
        invoice_url: fields.string("invoiceUrl"),
        company_name: fields.string("companyName"),
        message: fields.string("message"),
    }
}

fn invitation_email(fields: &Layers<'_>, to: String) -> InvitationEmail {
    InvitationEmail {
        to,
        kind: fields.string_or("type", "notification"),
        subject: fields.string("subject"),
        message: fields.string("message"),
        inviter_name: fields.string("inviterName"),
        space_name: fields.string("spaceName"),
        invite_url: fields.string("inviteUrl"),
    }
}

fn sent(kind: &str, to: &str, message_id: Option<String>) -> NodeOutput {
    let output = NodeOutput::ok().with("emailType", kind).with("to", to);
    match message_id {
        Some(id) => output.with("messageId", id),
        None => output,
    }
}
