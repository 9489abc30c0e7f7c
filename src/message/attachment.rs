use mime::Mime;

/// An email attachment
///
/// Holds the raw content together with the metadata needed to serialize
/// it for a provider: filename, content type and an optional content-id
/// for inline references.
///
/// # Examples
///
/// ```
/// use microsoft365_transport::message::Attachment;
///
/// let attachment = Attachment::new(b"Hello world!".to_vec())
///     .filename("hello.txt")
///     .content_type(mime::TEXT_PLAIN);
/// ```
#[derive(Clone)]
pub struct Attachment {
    pub(crate) content: Vec<u8>,
    pub(crate) filename: Option<String>,
    pub(crate) content_type: Mime,
    pub(crate) content_id: Option<String>,
}

impl Attachment {
    /// Creates a new attachment from raw content
    ///
    /// The content type defaults to `application/octet-stream`.
    pub fn new(content: Vec<u8>) -> Self {
        Attachment {
            content,
            filename: None,
            content_type: mime::APPLICATION_OCTET_STREAM,
            content_id: None,
        }
    }

    /// Set the filename
    pub fn filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the content type
    pub fn content_type(mut self, content_type: Mime) -> Self {
        self.content_type = content_type;
        self
    }

    /// Set the content-id, for use in inline attachments
    pub fn content_id<S: Into<String>>(mut self, content_id: S) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// Gets the raw content
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("len", &self.content.len())
            .field("filename", &self.filename)
            .field("content_type", &self.content_type.as_ref())
            .field("content_id", &self.content_id)
            .finish()
    }
}
