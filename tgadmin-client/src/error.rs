//! Client error types.

use thiserror::Error;

// ============================================================================
// API Error
// ============================================================================

/// Error type for backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the session (HTTP 401).
    ///
    /// By the time the caller sees this, the session has already been cleared
    /// and the navigator sent to the login route.
    #[error("Not authorized: {}", detail_or(.detail, "session expired"))]
    Unauthorized {
        /// Server-provided detail.
        detail: Option<String>,
    },

    /// Any other non-2xx response.
    #[error("HTTP {status}: {}", detail_or(.detail, "request failed"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided detail.
        detail: Option<String>,
    },

    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Base URL or path could not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Session storage failure.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

fn detail_or<'a>(detail: &'a Option<String>, fallback: &'a str) -> &'a str {
    detail.as_deref().unwrap_or(fallback)
}

/// Error classes, as surfaced to views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 401: session cleared, login required.
    Authorization,
    /// Other 4xx: validation or business rule refusal.
    Rejected,
    /// 5xx, network failure, or undecodable response.
    Transport,
}

impl ApiError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::Status { status, .. } if (400..500).contains(status) => ErrorKind::Rejected,
            _ => ErrorKind::Transport,
        }
    }

    /// Returns the HTTP status, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns the server-provided detail text.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Returns true for HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns true for HTTP 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Text for a transient failure notice: the server detail when present.
    pub fn notice_text(&self) -> String {
        self.detail()
            .map_or_else(|| self.to_string(), ToString::to_string)
    }
}

// ============================================================================
// Session Error
// ============================================================================

/// Error type for session token storage.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Keychain access failed.
    #[error("Keychain error: {0}")]
    Keychain(String),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Backend(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<keyring::Error> for SessionError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoStorageAccess(_) => {
                SessionError::Keychain("Access denied to keychain".to_string())
            }
            keyring::Error::PlatformFailure(e) => SessionError::Keychain(e.to_string()),
            _ => SessionError::Keychain(err.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let unauthorized = ApiError::Unauthorized { detail: None };
        let rejected = ApiError::Status {
            status: 422,
            detail: Some("bad".into()),
        };
        let server = ApiError::Status {
            status: 502,
            detail: None,
        };

        assert_eq!(unauthorized.kind(), ErrorKind::Authorization);
        assert_eq!(rejected.kind(), ErrorKind::Rejected);
        assert_eq!(server.kind(), ErrorKind::Transport);
        assert_eq!(
            ApiError::InvalidResponse("x".into()).kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn test_display_uses_detail() {
        let err = ApiError::Status {
            status: 403,
            detail: Some("Admin access not granted".into()),
        };
        assert_eq!(err.to_string(), "HTTP 403: Admin access not granted");
        assert_eq!(err.notice_text(), "Admin access not granted");

        let err = ApiError::Unauthorized { detail: None };
        assert_eq!(err.to_string(), "Not authorized: session expired");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::Status {
            status: 404,
            detail: Some("Bot not found".into()),
        };
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
    }
}
