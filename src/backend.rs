use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;

/// Explicit request context, passed to every backend call instead of being
/// read from ambient session storage.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub base_url: String,
    pub token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("directory unreachable: {0}")]
    Network(String),
    #[error("directory response unusable: {0}")]
    BadResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("backend unreachable: {0}")]
    Network(String),
    #[error("backend rejected the class (status {status})")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
}

/// Everything the Submission Client sends: the original file bytes plus the
/// confirmed teacher address.
#[derive(Clone, Debug)]
pub struct ClassSubmission {
    pub file_name: String,
    pub file_bytes: Vec<u8>,
    pub email: String,
}

/// The two REST collaborators the daemon talks to. Handlers depend on this
/// trait so tests can swap in a fake.
pub trait Backend: Send {
    /// Look up a teacher's directory email by display name. `Ok(None)`
    /// means the directory has no address on file.
    fn teacher_email_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<Option<String>, LookupError>;

    /// Create a class from an uploaded roster file. On 2xx returns the
    /// server's optional human-readable message.
    fn create_class(
        &self,
        ctx: &RequestContext,
        submission: ClassSubmission,
    ) -> Result<Option<String>, SubmitError>;
}

lazy_static! {
    static ref NAME_WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Directory lookups key on a whitespace-normalized name.
pub fn normalize_lookup_name(name: &str) -> String {
    NAME_WHITESPACE_RE.replace_all(name.trim(), " ").to_string()
}

pub struct HttpBackend {
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("build http client");
        HttpBackend { client }
    }

    fn authorize(
        &self,
        req: reqwest::blocking::RequestBuilder,
        ctx: &RequestContext,
    ) -> reqwest::blocking::RequestBuilder {
        match &ctx.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

impl Backend for HttpBackend {
    fn teacher_email_by_name(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<Option<String>, LookupError> {
        let url = format!("{}/teachers", ctx.base_url.trim_end_matches('/'));
        let req = self
            .client
            .get(url)
            .query(&[("name", normalize_lookup_name(name))]);
        let resp = self
            .authorize(req, ctx)
            .send()
            .map_err(|e| LookupError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LookupError::BadResponse(format!(
                "status {}",
                resp.status().as_u16()
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .map_err(|e| LookupError::BadResponse(e.to_string()))?;
        let email = body
            .get("email")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(email)
    }

    fn create_class(
        &self,
        ctx: &RequestContext,
        submission: ClassSubmission,
    ) -> Result<Option<String>, SubmitError> {
        let url = format!("{}/classes/create", ctx.base_url.trim_end_matches('/'));

        let part = reqwest::blocking::multipart::Part::bytes(submission.file_bytes)
            .file_name(submission.file_name)
            .mime_str("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
            .map_err(|e| SubmitError::Network(e.to_string()))?;
        let form = reqwest::blocking::multipart::Form::new()
            .part("file", part)
            .text("email", submission.email);

        let req = self.client.post(url).multipart(form);
        let resp = self
            .authorize(req, ctx)
            .send()
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body: Option<serde_json::Value> = resp.json().ok();
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        if (200..300).contains(&status) {
            Ok(message)
        } else {
            Err(SubmitError::Rejected { status, message })
        }
    }
}
