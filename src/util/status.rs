use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    NotFound,
    ConnectionError,
    ConfigurationMismatch,
    RemoteFailure,
    InvalidArgument,
    Incomplete,
    IOError,
}

#[derive(Debug, Clone)]
pub struct Status {
    code: Code,
    message: Option<String>,
}

impl Status {
    pub fn new(code: Code, msg: impl Into<String>) -> Self {
        Status {
            code,
            message: Some(msg.into()),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Status::new(Code::NotFound, msg)
    }

    pub fn connection_error(msg: impl Into<String>) -> Self {
        Status::new(Code::ConnectionError, msg)
    }

    pub fn configuration_mismatch(msg: impl Into<String>) -> Self {
        Status::new(Code::ConfigurationMismatch, msg)
    }

    pub fn remote_failure(msg: impl Into<String>) -> Self {
        Status::new(Code::RemoteFailure, msg)
    }

    /// Malformed address chain or write value, rejected before any remote
    /// call is issued.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Status::new(Code::InvalidArgument, msg)
    }

    pub fn incomplete(msg: impl Into<String>) -> Self {
        Status::new(Code::Incomplete, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Status::new(Code::IOError, msg)
    }

    /// Prefix the message with the operation that failed, keeping the code.
    pub fn context(self, what: impl fmt::Display) -> Self {
        let message = match self.message {
            Some(msg) => format!("{what}: {msg}"),
            None => what.to_string(),
        };
        Status {
            code: self.code,
            message: Some(message),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Code::NotFound
    }

    pub fn is_connection_error(&self) -> bool {
        self.code == Code::ConnectionError
    }

    pub fn is_configuration_mismatch(&self) -> bool {
        self.code == Code::ConfigurationMismatch
    }

    pub fn is_remote_failure(&self) -> bool {
        self.code == Code::RemoteFailure
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.code == Code::InvalidArgument
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{:?}: {}", self.code, msg),
            None => write!(f, "{:?}", self.code),
        }
    }
}

impl std::error::Error for Status {}

impl From<std::io::Error> for Status {
    fn from(err: std::io::Error) -> Self {
        Status::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for Status {
    fn from(err: serde_json::Error) -> Self {
        Status::invalid_argument(format!("malformed configuration: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Status>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_not_found() {
        let status = Status::not_found("keyspace 'app'");
        assert!(status.is_not_found());
        assert_eq!(status.message(), Some("keyspace 'app'"));
    }

    #[test]
    fn test_status_display() {
        let status = Status::remote_failure("timed out");
        assert_eq!(status.to_string(), "RemoteFailure: timed out");
    }

    #[test]
    fn test_status_context_keeps_code() {
        let status = Status::connection_error("reset by peer").context("read_slice on 'users'");
        assert!(status.is_connection_error());
        assert_eq!(
            status.message(),
            Some("read_slice on 'users': reset by peer")
        );
    }

    #[test]
    fn test_status_from_serde() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let status = Status::from(err);
        assert!(status.is_invalid_argument());
    }
}
