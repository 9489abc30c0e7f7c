//! Graph wire model and message body builder
//!
//! Builds the JSON request structures for the `sendMail` and draft
//! endpoints from a [`Message`] and its delivery [`Envelope`], and
//! decides which attachments travel inline and which need an upload
//! session.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use super::LARGE_ATTACHMENT;
use crate::{
    address::Envelope,
    message::{Attachment, Mailbox, Message},
};

/// Filename used when an attachment does not carry one
const FALLBACK_FILENAME: &str = "attachment";

/// Body of `POST /users/{username}/sendMail`
#[derive(Debug, Serialize)]
pub(super) struct SendMailRequest {
    pub(super) message: GraphMessage,
}

/// A Graph message resource, also used as the draft creation body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GraphMessage {
    subject: String,
    body: ItemBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<Recipient>,
    to_recipients: Vec<Recipient>,
    cc_recipients: Vec<Recipient>,
    bcc_recipients: Vec<Recipient>,
    reply_to: Vec<Recipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_attachments: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<FileAttachment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemBody {
    content_type: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Recipient {
    email_address: EmailAddress,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileAttachment {
    #[serde(rename = "@odata.type")]
    odata_type: &'static str,
    name: String,
    content_type: String,
    content_bytes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_id: Option<String>,
}

/// Body of `POST .../attachments/createUploadSession`
#[derive(Debug, Serialize)]
pub(super) struct CreateUploadSessionRequest {
    #[serde(rename = "AttachmentItem")]
    attachment_item: AttachmentItem,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentItem {
    attachment_type: &'static str,
    name: String,
    size: u64,
}

impl CreateUploadSessionRequest {
    pub(super) fn new(name: String, size: u64) -> Self {
        CreateUploadSessionRequest {
            attachment_item: AttachmentItem {
                attachment_type: "file",
                name,
                size,
            },
        }
    }
}

/// Response of `createUploadSession`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UploadSession {
    pub(super) upload_url: Option<String>,
}

/// Maps a mailbox to a Graph recipient
///
/// The name field is omitted entirely when there is none: the provider
/// distinguishes "no name" from an empty-string name.
pub(super) fn map_mailbox(mailbox: &Mailbox) -> Recipient {
    Recipient {
        email_address: EmailAddress {
            address: mailbox.email.to_string(),
            name: mailbox.name.clone().filter(|name| !name.is_empty()),
        },
    }
}

/// Filename for serializing an attachment, degrading to a fixed fallback
pub(super) fn attachment_filename(attachment: &Attachment) -> String {
    attachment
        .filename
        .clone()
        .unwrap_or_else(|| FALLBACK_FILENAME.into())
}

/// Builds the `sendMail` request body for a message and envelope
///
/// Returns the request and whether at least one attachment is too large
/// to be embedded and has to go through an upload session instead.
pub(super) fn build_send_mail_request(
    message: &Message,
    envelope: &Envelope,
) -> (SendMailRequest, bool) {
    let mut to = Vec::new();
    let mut cc = Vec::new();
    let mut bcc = Vec::new();
    let mut reply_to = Vec::new();

    // The envelope is authoritative for who gets the email; the header
    // lists only assign each envelope recipient its role. Recipients
    // matching no header list are dropped from the request.
    for mailbox in envelope.to() {
        if message.to().contains(mailbox) {
            to.push(map_mailbox(mailbox));
        }
        if message.cc().contains(mailbox) {
            cc.push(map_mailbox(mailbox));
        }
        if message.bcc().contains(mailbox) {
            bcc.push(map_mailbox(mailbox));
        }
        if message.reply_to().contains(mailbox) {
            reply_to.push(map_mailbox(mailbox));
        }
    }

    let mut has_large_attachments = false;
    let mut attachments = Vec::new();

    for attachment in message.attachments() {
        if attachment.content.len() >= LARGE_ATTACHMENT {
            has_large_attachments = true;
            continue;
        }

        attachments.push(FileAttachment {
            odata_type: "#microsoft.graph.fileAttachment",
            name: attachment_filename(attachment),
            content_type: attachment.content_type.to_string(),
            content_bytes: BASE64.encode(&attachment.content),
            content_id: attachment.content_id.clone(),
        });
    }

    let graph_message = GraphMessage {
        subject: message.subject().to_owned(),
        body: ItemBody {
            content_type: "html",
            content: message.html_body().to_owned(),
        },
        from: message.from().map(map_mailbox),
        to_recipients: to,
        cc_recipients: cc,
        bcc_recipients: bcc,
        reply_to,
        has_attachments: (!attachments.is_empty()).then_some(true),
        attachments,
    };

    (
        SendMailRequest {
            message: graph_message,
        },
        has_large_attachments,
    )
}
