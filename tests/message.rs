use microsoft365_transport::{message::Attachment, Envelope, Error, Mailbox, Message};
use pretty_assertions::assert_eq;

#[test]
fn build_a_complete_message() {
    let message = Message::builder()
        .from("John From Doe <from@example.com>".parse().unwrap())
        .to("John To Doe <to@example.com>".parse().unwrap())
        .cc("cc@example.com".parse().unwrap())
        .reply_to("reply@example.com".parse().unwrap())
        .subject("Microsoft 365 Test 1 - Plain Message")
        .attachment(
            Attachment::new(b"Hello world!".to_vec())
                .filename("hello.txt")
                .content_type(mime::TEXT_PLAIN),
        )
        .html_body("<p>Hello.</p>")
        .unwrap();

    assert_eq!(message.subject(), "Microsoft 365 Test 1 - Plain Message");
    assert_eq!(message.html_body(), "<p>Hello.</p>");
    assert_eq!(message.from().unwrap().name.as_deref(), Some("John From Doe"));
    assert_eq!(message.to().len(), 1);
    assert_eq!(message.cc().len(), 1);
    assert_eq!(message.reply_to().len(), 1);
    assert_eq!(message.attachments().len(), 1);

    // reply-to mailboxes are not delivery recipients
    let recipients: Vec<String> = message
        .envelope()
        .to()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(recipients, ["John To Doe <to@example.com>", "cc@example.com"]);
}

#[test]
fn custom_envelope_overrides_the_headers() {
    let envelope = Envelope::new(
        Some("from@example.com".parse().unwrap()),
        vec!["always@example.com".parse().unwrap()],
    )
    .unwrap();

    let message = Message::builder()
        .from("from@example.com".parse::<Mailbox>().unwrap())
        .to("to@example.com".parse().unwrap())
        .subject("Redirected")
        .envelope(envelope)
        .html_body("Hello.")
        .unwrap();

    assert_eq!(message.envelope().to().len(), 1);
    assert_eq!(
        message.envelope().to()[0].email.to_string(),
        "always@example.com"
    );
}

#[test]
fn recipientless_message_is_rejected() {
    let result = Message::builder()
        .from("from@example.com".parse::<Mailbox>().unwrap())
        .subject("Nobody to send to")
        .html_body("Hello.");

    assert!(matches!(result, Err(Error::MissingTo)));
}
