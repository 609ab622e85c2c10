use reqwest::StatusCode;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    RateLimited,
    Server,
    Connectivity,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum TransportError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("{url} -> {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("JSON parse failed: {0}")]
    Decode(#[source] serde_json::Error),
}

impl TransportError {
    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            TransportError::Request(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                ErrorKind::Connectivity
            }
            TransportError::Request(_) => ErrorKind::Unknown,
            TransportError::Status { status, .. } => kind_for_status(*status),
            TransportError::Decode(_) => ErrorKind::Unknown,
        }
    }
}

pub(crate) fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED => ErrorKind::Unauthorized,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimited,
        s if s.is_server_error() => ErrorKind::Server,
        _ => ErrorKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_kinds() {
        assert_eq!(kind_for_status(StatusCode::UNAUTHORIZED), ErrorKind::Unauthorized);
        assert_eq!(kind_for_status(StatusCode::NOT_FOUND), ErrorKind::NotFound);
        assert_eq!(
            kind_for_status(StatusCode::TOO_MANY_REQUESTS),
            ErrorKind::RateLimited
        );
        assert_eq!(kind_for_status(StatusCode::BAD_GATEWAY), ErrorKind::Server);
        assert_eq!(kind_for_status(StatusCode::BAD_REQUEST), ErrorKind::Unknown);
    }

    #[test]
    fn api_error_displays_its_message() {
        let err = ApiError::new(ErrorKind::NotFound, "Movie not found");
        assert_eq!(err.to_string(), "Movie not found");
    }
}
