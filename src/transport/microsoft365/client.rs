//! Low-level HTTP client for the Graph endpoints used by the transport
//!
//! [`GraphApi`] is the seam between the send orchestration and the wire:
//! one method per Graph call the transport performs. [`GraphClient`] is
//! the reqwest-backed implementation; tests substitute a recording mock.

use std::{error::Error as StdError, fmt, time::Duration};

use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    auth::{ClientCredentials, TokenSource},
    error::{self, Error},
    request::{CreateUploadSessionRequest, GraphMessage, SendMailRequest, UploadSession},
    upload::ContentRange,
};

pub(super) const GRAPH_ENDPOINT: &str = "https://graph.microsoft.com/v1.0";

/// Default timeout for regular Graph calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Extended timeout for chunk uploads, which may carry several MiB
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(1000);

/// The Graph calls performed by the transport
pub(super) trait GraphApi: Send + Sync {
    /// `POST /users/{username}/sendMail`: direct send, no response body
    fn send_mail(&self, username: &str, request: &SendMailRequest) -> Result<(), ApiFailure>;

    /// `POST /users/{username}/messages`: create a draft message
    fn create_draft(&self, username: &str, message: &GraphMessage)
        -> Result<CreatedDraft, ApiFailure>;

    /// `POST /users/{username}/messages/{id}/attachments/createUploadSession`
    fn create_upload_session(
        &self,
        username: &str,
        message_id: &str,
        request: &CreateUploadSessionRequest,
    ) -> Result<UploadSession, ApiFailure>;

    /// `PUT <uploadUrl>`: one range-addressed chunk of attachment content
    fn upload_chunk(
        &self,
        upload_url: &str,
        range: &ContentRange,
        chunk: &[u8],
    ) -> Result<(), ApiFailure>;

    /// `POST /users/{username}/messages/{id}/send`: send the draft, no body
    fn send_draft(&self, username: &str, message_id: &str) -> Result<(), ApiFailure>;
}

/// Result of a draft creation call
pub(super) struct CreatedDraft {
    /// The draft's message id, if the provider supplied one
    pub(super) id: Option<String>,
    /// The raw response body, kept for diagnostics when `id` is absent
    pub(super) body: String,
}

/// Low-level failure talking to the Graph API
///
/// Tagged union normalized into the transport [`Error`] taxonomy at the
/// orchestrator boundary via the `From` impl below.
#[derive(Debug)]
pub(super) enum ApiFailure {
    /// The server could not be reached (connect, timeout, i/o)
    Network(reqwest::Error),
    /// The provider answered with a structured OData error payload
    Api(GraphError),
    /// Any other failure shape (unparseable error body, bad JSON, ...)
    Unexpected { status: u16, body: String },
}

impl From<ApiFailure> for Error {
    fn from(failure: ApiFailure) -> Error {
        match failure {
            ApiFailure::Network(e) => error::network(e),
            ApiFailure::Api(e) => {
                let status = e.status;
                error::rejected(Some(status), e)
            }
            ApiFailure::Unexpected { status, body } => error::send(status, body),
        }
    }
}

/// A structured error returned by the Graph API
#[derive(Debug)]
pub(super) struct GraphError {
    pub(super) status: u16,
    pub(super) code: String,
    pub(super) message: String,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unable to send an email: {} ({})", self.message, self.code)
    }
}

impl StdError for GraphError {}

#[derive(Deserialize)]
struct GraphErrorPayload {
    error: GraphErrorBody,
}

#[derive(Deserialize)]
struct GraphErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Classify an HTTP error response into an [`ApiFailure`]
pub(super) fn parse_failure(status: u16, body: String) -> ApiFailure {
    match serde_json::from_str::<GraphErrorPayload>(&body) {
        Ok(payload) => ApiFailure::Api(GraphError {
            status,
            code: payload.error.code,
            message: payload.error.message,
        }),
        Err(_) => ApiFailure::Unexpected { status, body },
    }
}

/// reqwest-backed [`GraphApi`] implementation
pub(super) struct GraphClient {
    http: reqwest::blocking::Client,
    token: TokenSource,
    endpoint: String,
}

impl GraphClient {
    pub(super) fn new(credentials: ClientCredentials) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(error::configuration)?;

        Ok(GraphClient {
            http,
            token: TokenSource::new(credentials),
            endpoint: GRAPH_ENDPOINT.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    /// POST a JSON body and return the response status and text
    fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(u16, String), ApiFailure> {
        let url = self.url(path);
        let token = self.token.bearer_token(&self.http)?;
        debug!(%url, "POST");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .map_err(ApiFailure::Network)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(ApiFailure::Network)?;
        debug!(status, body_len = body.len(), "response");

        if status >= 400 {
            return Err(parse_failure(status, body));
        }

        Ok((status, body))
    }
}

impl GraphApi for GraphClient {
    fn send_mail(&self, username: &str, request: &SendMailRequest) -> Result<(), ApiFailure> {
        self.post_json(&format!("/users/{username}/sendMail"), request)?;
        Ok(())
    }

    fn create_draft(
        &self,
        username: &str,
        message: &GraphMessage,
    ) -> Result<CreatedDraft, ApiFailure> {
        let (_, body) = self.post_json(&format!("/users/{username}/messages"), message)?;

        #[derive(Deserialize)]
        struct DraftResponse {
            id: Option<String>,
        }

        let id = serde_json::from_str::<DraftResponse>(&body)
            .ok()
            .and_then(|draft| draft.id);
        Ok(CreatedDraft { id, body })
    }

    fn create_upload_session(
        &self,
        username: &str,
        message_id: &str,
        request: &CreateUploadSessionRequest,
    ) -> Result<UploadSession, ApiFailure> {
        let (status, body) = self.post_json(
            &format!("/users/{username}/messages/{message_id}/attachments/createUploadSession"),
            request,
        )?;

        serde_json::from_str(&body).map_err(|_| ApiFailure::Unexpected { status, body })
    }

    fn upload_chunk(
        &self,
        upload_url: &str,
        range: &ContentRange,
        chunk: &[u8],
    ) -> Result<(), ApiFailure> {
        debug!(%upload_url, range = %range, "PUT chunk");

        let response = self
            .http
            .put(upload_url)
            .timeout(UPLOAD_TIMEOUT)
            .header(CONTENT_LENGTH, range.len())
            .header(CONTENT_RANGE, range.to_string())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(chunk.to_vec())
            .send()
            .map_err(ApiFailure::Network)?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().map_err(ApiFailure::Network)?;
            return Err(parse_failure(status, body));
        }

        Ok(())
    }

    fn send_draft(&self, username: &str, message_id: &str) -> Result<(), ApiFailure> {
        let url = self.url(&format!("/users/{username}/messages/{message_id}/send"));
        let token = self.token.bearer_token(&self.http)?;
        debug!(%url, "POST (no body)");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(CONTENT_LENGTH, 0)
            .send()
            .map_err(ApiFailure::Network)?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().map_err(ApiFailure::Network)?;
            return Err(parse_failure(status, body));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{parse_failure, ApiFailure};
    use crate::transport::microsoft365::Error;

    #[test]
    fn structured_error_is_a_rejection() {
        let failure = parse_failure(
            400,
            r#"{"error":{"code":"ErrorInvalidRecipients","message":"At least one recipient is not valid."}}"#
                .into(),
        );
        let error = Error::from(failure);
        assert!(error.is_rejected());
        assert_eq!(error.status(), Some(400));
        let source = std::error::Error::source(&error).unwrap().to_string();
        assert_eq!(
            source,
            "Unable to send an email: At least one recipient is not valid. (ErrorInvalidRecipients)"
        );
    }

    #[test]
    fn unstructured_error_is_a_send_failure() {
        let failure = parse_failure(502, "Bad Gateway".into());
        assert!(matches!(failure, ApiFailure::Unexpected { status: 502, .. }));
        let error = Error::from(failure);
        assert!(error.is_send());
        assert_eq!(error.status(), Some(502));
    }
}
