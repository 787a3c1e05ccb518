// talk-cli/src/output.rs
use serde::Serialize;
use std::fmt;

/// Standard JSON response envelope
#[derive(Debug, Serialize)]
pub struct Response<T> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorResponse>,
}

impl<T> Response<T> {
    pub fn ok(result: T) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(error: ErrorResponse) -> Response<()> {
        Response::<()> {
            ok: false,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    type_: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    retryable: bool,
}

impl ErrorResponse {
    pub fn not_found(message: String) -> Self {
        Self {
            type_: "not_found",
            message,
            status: None,
            retryable: false,
        }
    }

    pub fn validation_failed(message: String) -> Self {
        Self {
            type_: "validation_failed",
            message,
            status: None,
            retryable: false,
        }
    }

    pub fn server_error(message: String, status: Option<u16>) -> Self {
        // 5xx and connection failures are worth retrying
        let retryable = status.is_none_or(|s| s >= 500);
        Self {
            type_: "server_error",
            message,
            status,
            retryable,
        }
    }

    pub fn invalid_response(message: String) -> Self {
        Self {
            type_: "invalid_response",
            message,
            status: None,
            retryable: false,
        }
    }

    /// Classify an error into a response body and an exit code
    pub fn classify(err: &anyhow::Error) -> (Self, ExitCode) {
        use talk_api::Error;

        let Some(api_err) = err.downcast_ref::<Error>() else {
            return (
                Self::validation_failed(format!("{:#}", err)),
                ExitCode::PermanentError,
            );
        };

        match api_err {
            Error::NoSession(_) | Error::AccountNotFound(_) => (
                Self::not_found(api_err.to_string()),
                ExitCode::PermanentError,
            ),
            Error::InvalidToken(_) | Error::InvalidUrl(_) => (
                Self::validation_failed(api_err.to_string()),
                ExitCode::PermanentError,
            ),
            Error::Http(_) | Error::Ocs { .. } => {
                let resp = Self::server_error(api_err.to_string(), api_err.status());
                let code = if resp.retryable {
                    ExitCode::TransientError
                } else {
                    ExitCode::PermanentError
                };
                (resp, code)
            }
            Error::Json(_) | Error::Decode { .. } | Error::MissingData => (
                Self::invalid_response(api_err.to_string()),
                ExitCode::PermanentError,
            ),
        }
    }
}

/// Exit codes for scripted callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    TransientError = 1,
    PermanentError = 2,
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::TransientError => write!(f, "transient_error"),
            Self::PermanentError => write!(f, "permanent_error"),
        }
    }
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

// Print response to stdout
pub fn print_response<T: Serialize>(resp: &Response<T>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(resp)?);
    Ok(())
}

/// Print a styled success message
pub fn print_success(message: &str) {
    let term = console::Term::stderr();
    let _ = term.write_str(&format!("{} {}\n", console::style("✓").green(), message));
}

/// Print a styled error message
pub fn print_error(message: &str) {
    let term = console::Term::stderr();
    let _ = term.write_str(&format!("{} {}\n", console::style("Error:").red(), message));
}
