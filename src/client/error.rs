// ABOUTME: Errors returned by database cluster clients.
// ABOUTME: Includes the "no leader elected" sentinel and not-found detection.

/// ArangoDB error number reported while a resilient single server has no
/// elected leader.
pub const ERROR_CLUSTER_NOT_LEADER: i64 = 1496;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// No leader is currently elected (resilient single topology).
    #[error("no leader elected")]
    NoLeader,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("server responded {status}: {message} (errorNum {error_num})")]
    Response {
        status: u16,
        error_num: i64,
        message: String,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl ClientError {
    pub fn is_no_leader(&self) -> bool {
        matches!(self, ClientError::NoLeader)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// Map an ArangoDB error response to a client error.
    pub fn from_response(status: u16, error_num: i64, message: String) -> Self {
        match (status, error_num) {
            (503, ERROR_CLUSTER_NOT_LEADER) => ClientError::NoLeader,
            (404, _) => ClientError::NotFound(message),
            _ => ClientError::Response {
                status,
                error_num,
                message,
            },
        }
    }
}
