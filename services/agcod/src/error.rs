use serde::Serialize;
use serde_json::Value;

use crate::{RequestLog, Status};

/// The kind of failure behind an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The outbound request could not be built.
    TransportInit,
    /// The request could not be delivered or the reply not read.
    Transport,
    /// AGCOD answered with a non-2xx status.
    Rejected,
    /// AGCOD throttled the request.
    RateExceeded,
    /// A body could not be decoded.
    JsonDecode,
    /// A body could not be encoded.
    JsonEncode,
    /// No credential could be loaded.
    CredentialMissing,
    /// The client configuration is incomplete or invalid.
    ConfigInvalid,
    /// An operation argument is invalid.
    InvalidArgument,
}

/// The error returned by every AGCOD operation.
///
/// It serializes to the payload
/// `{"status","code","type","message","log_id","log"}`.
#[derive(Debug, thiserror::Error, Serialize)]
#[error("{status} {code} {error_type}: {message}")]
pub struct Error {
    #[serde(skip)]
    kind: ErrorKind,
    status: Status,
    code: String,
    #[serde(rename = "type")]
    error_type: String,
    message: String,
    #[serde(skip)]
    transport_code: i32,
    #[serde(skip)]
    http_status: Option<u16>,
    log_id: Option<String>,
    log: Vec<Value>,
    #[serde(skip)]
    #[source]
    source: Option<anyhow::Error>,
}

impl Error {
    fn new(
        kind: ErrorKind,
        status: Status,
        code: impl Into<String>,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            status,
            code: code.into(),
            error_type: error_type.into(),
            message: message.into(),
            transport_code: 0,
            http_status: None,
            log_id: None,
            log: Vec::new(),
            source: None,
        }
    }

    fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the debug entries of the failed request.
    pub(crate) fn with_log(mut self, log: &RequestLog) -> Self {
        self.log_id = log.id().map(str::to_string);
        self.log = log.entries().to_vec();
        self
    }

    /// The request to `url` could not be built.
    pub fn transport_init(url: &str, err: agcod_core::Error) -> Self {
        Self::new(
            ErrorKind::TransportInit,
            Status::Failure,
            "C001",
            "TransportInitError",
            format!("Failed to init request with url: {url}"),
        )
        .with_source(err)
    }

    /// The request to `url` failed in transport.
    ///
    /// Requests the transport refused to build are reported as
    /// [`ErrorKind::TransportInit`] instead.
    pub fn transport(url: &str, err: agcod_core::Error) -> Self {
        use agcod_core::ErrorKind as CoreKind;

        let message = match err.kind() {
            CoreKind::RequestInvalid => return Self::transport_init(url, err),
            CoreKind::ConnectionFailed => format!(
                "Could not connect to AWS ({url}). Please check your internet connection and try again. [{}]",
                err.message()
            ),
            CoreKind::CertificateInvalid => format!(
                "Could not verify AWS SSL certificate. Please make sure that your network is not intercepting certificates. (Try going to {url}in your browser.) [{}]",
                err.message()
            ),
            _ => format!("Unexpected error communicating with AWS: {}", err.message()),
        };

        let mut error = Self::new(
            ErrorKind::Transport,
            Status::Failure,
            "C002",
            "TransportError",
            message,
        );
        error.transport_code = err.os_error_code().unwrap_or(0);
        error.with_source(err)
    }

    /// AGCOD answered `http_status` with `body`.
    pub fn rejected(http_status: u16, body: &[u8]) -> Self {
        let json: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let field = |pointer| str_at(&json, pointer);

        let mut error = if field("/message") == Some("Rate exceeded") {
            Self::new(
                ErrorKind::RateExceeded,
                Status::Resend,
                "T001",
                "RateExceeded",
                "Rate exceeded",
            )
        } else {
            let status = match field("/agcodResponse/status").map(Status::from) {
                Some(Status::Resend) => Status::Resend,
                _ => Status::Failure,
            };
            Self::new(
                ErrorKind::Rejected,
                status,
                field("/errorCode").unwrap_or("E999"),
                field("/errorType").unwrap_or("OtherUnknownError"),
                field("/message").unwrap_or("Unknown error occured"),
            )
        };
        error.http_status = Some(http_status);
        error
    }

    /// A body failed to decode.
    ///
    /// The code is `J-4` for malformed or truncated JSON and `J-0` for valid
    /// JSON of the wrong shape.
    pub fn json_decode(err: serde_json::Error) -> Self {
        let code = match err.classify() {
            serde_json::error::Category::Syntax | serde_json::error::Category::Eof => "J-4",
            _ => "J-0",
        };
        Self::new(
            ErrorKind::JsonDecode,
            Status::Failure,
            code,
            "JsonDecodeError",
            "Failed to decode json data",
        )
        .with_source(err)
    }

    /// Valid JSON that isn't an object.
    pub(crate) fn json_not_object() -> Self {
        Self::new(
            ErrorKind::JsonDecode,
            Status::Failure,
            "J-0",
            "JsonDecodeError",
            "Failed to decode json data",
        )
    }

    /// A request body failed to encode.
    pub fn json_encode(err: serde_json::Error) -> Self {
        Self::new(
            ErrorKind::JsonEncode,
            Status::Failure,
            "J-0",
            "JsonEncodeError",
            "Failed to encode json data",
        )
        .with_source(err)
    }

    /// No credential could be loaded.
    pub fn credential_missing() -> Self {
        Self::new(
            ErrorKind::CredentialMissing,
            Status::Failure,
            "A001",
            "CredentialMissing",
            "No AGCOD credential found: access key, secret key and partner id are all required",
        )
    }

    /// A credential provider failed.
    pub(crate) fn credential_failed(err: agcod_core::Error) -> Self {
        Self::credential_missing().with_source(err)
    }

    /// The client configuration is incomplete or invalid.
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::ConfigInvalid,
            Status::Failure,
            "A002",
            "ConfigInvalid",
            message,
        )
    }

    /// An operation argument is invalid.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::InvalidArgument,
            Status::Failure,
            "A003",
            "InvalidArgument",
            message,
        )
    }
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// `FAILURE` or `RESEND`.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Error code, AGCOD's own code for rejected requests.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Error type, AGCOD's own type for rejected requests.
    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// OS error number of a transport failure, `0` otherwise.
    pub fn transport_code(&self) -> i32 {
        self.transport_code
    }

    /// HTTP status of a rejected request.
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// Id of the request log, when debug is enabled.
    pub fn log_id(&self) -> Option<&str> {
        self.log_id.as_deref()
    }

    /// Debug entries of the failed request, empty unless debug is enabled.
    pub fn log(&self) -> &[Value] {
        &self.log
    }

    /// Whether AGCOD asked for the request to be sent again.
    ///
    /// Resend with the same creation request id to stay idempotent.
    pub fn is_retryable(&self) -> bool {
        self.status == Status::Resend
    }

    /// The error payload as JSON.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "status": self.status,
            "code": self.code,
            "type": self.error_type,
            "message": self.message,
            "log_id": self.log_id,
            "log": self.log,
        })
    }
}

fn str_at<'a>(json: &'a Value, pointer: &str) -> Option<&'a str> {
    json.pointer(pointer).and_then(Value::as_str)
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;
