//! Chunked upload of large attachments through a Graph upload session
//!
//! Attachments of 3 MiB and more cannot be embedded into the message
//! body. For each of them the transport asks the draft message for an
//! upload session and streams the content to the returned upload URL in
//! sequential `Content-Range` addressed PUTs of at most 4 MiB.

use std::fmt;

use tracing::debug;

use super::{
    client::GraphApi,
    error::{self, Error},
    request::{self, CreateUploadSessionRequest},
    LARGE_ATTACHMENT,
};
use crate::message::Attachment;

/// Fragment size for upload session PUTs
const CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// The byte range of one chunk, as sent in the `Content-Range` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ContentRange {
    pub(super) start: u64,
    pub(super) end: u64,
    pub(super) total: u64,
}

impl ContentRange {
    /// Number of bytes covered by the range, for `Content-Length`
    pub(super) fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

/// Uploads one large attachment to a draft message
///
/// Attachments below the large threshold are already part of the message
/// body and are skipped here.
pub(super) fn upload_attachment(
    api: &dyn GraphApi,
    username: &str,
    message_id: &str,
    attachment: &Attachment,
) -> Result<(), Error> {
    let content = attachment.content();
    if content.len() < LARGE_ATTACHMENT {
        return Ok(());
    }

    let name = request::attachment_filename(attachment);
    debug!(name = %name, size = content.len(), "creating upload session");

    let session = api.create_upload_session(
        username,
        message_id,
        &CreateUploadSessionRequest::new(name, content.len() as u64),
    )?;

    let upload_url = session
        .upload_url
        .ok_or_else(|| error::send(0, "the upload session did not return an upload URL"))?;

    upload_chunks(api, &upload_url, content)
}

/// Uploads the content in strictly increasing 4 MiB chunks
///
/// Chunks never overlap and never gap: each starts where the previous
/// one ended and the final chunk ends at `total - 1`. A failed PUT
/// aborts the remaining fragments.
fn upload_chunks(api: &dyn GraphApi, upload_url: &str, content: &[u8]) -> Result<(), Error> {
    let total = content.len() as u64;
    let mut bytes_remaining = total;

    for (i, chunk) in content.chunks(CHUNK_SIZE).enumerate() {
        let start = (i * CHUNK_SIZE) as u64;
        let range = ContentRange {
            start,
            end: start + chunk.len() as u64 - 1,
            total,
        };
        debug!(range = %range, remaining = bytes_remaining, "uploading chunk");

        api.upload_chunk(upload_url, &range, chunk)?;

        bytes_remaining -= chunk.len() as u64;
    }

    debug_assert_eq!(bytes_remaining, 0);
    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{upload_attachment, ContentRange, CHUNK_SIZE};
    use crate::{
        message::Attachment,
        transport::microsoft365::{
            mock::{Call, MockGraph},
            LARGE_ATTACHMENT,
        },
    };

    fn uploaded_ranges(mock: &MockGraph) -> Vec<ContentRange> {
        mock.calls()
            .iter()
            .filter_map(|call| match call {
                Call::UploadChunk { range, .. } => Some(*range),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn small_attachment_is_a_no_op() {
        let mock = MockGraph::new();
        let attachment = Attachment::new(vec![0u8; LARGE_ATTACHMENT - 1]);
        upload_attachment(&mock, "info@example.com", "draft-1", &attachment).unwrap();
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn exact_multiple_of_chunk_size() {
        let mock = MockGraph::new();
        let attachment = Attachment::new(vec![0u8; 2 * CHUNK_SIZE]);
        upload_attachment(&mock, "info@example.com", "draft-1", &attachment).unwrap();

        let ranges = uploaded_ranges(&mock);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].to_string(), "bytes 0-4194303/8388608");
        assert_eq!(ranges[1].to_string(), "bytes 4194304-8388607/8388608");
    }

    #[test]
    fn chunk_invariants_for_partial_final_fragment() {
        // 9 MiB + 1: three full chunks would cover 12 MiB, so the count
        // is ceil(size / chunk) = 3 with a one-byte-past-2-chunks tail.
        let size = 9 * 1024 * 1024 + 1;
        let mock = MockGraph::new();
        let attachment = Attachment::new(vec![0u8; size]);
        upload_attachment(&mock, "info@example.com", "draft-1", &attachment).unwrap();

        let ranges = uploaded_ranges(&mock);
        assert_eq!(ranges.len(), size.div_ceil(CHUNK_SIZE));
        assert_eq!(ranges.last().unwrap().end, size as u64 - 1);
        assert_eq!(
            ranges.iter().map(ContentRange::len).sum::<u64>(),
            size as u64
        );
        // no overlap, no gap
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end + 1, pair[1].start);
        }
    }

    #[test]
    fn missing_upload_url_fails_before_any_put() {
        let mock = MockGraph::new().without_upload_url();
        let attachment = Attachment::new(vec![0u8; LARGE_ATTACHMENT]);
        let error =
            upload_attachment(&mock, "info@example.com", "draft-1", &attachment).unwrap_err();

        assert!(error.is_send());
        assert!(uploaded_ranges(&mock).is_empty());
    }
}
