/// Broker-originated error with everything needed to produce an Open Service Broker error body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceBrokerError {
    /// The platform did not send `accepts_incomplete=true` for an asynchronous operation.
    #[error("This service plan requires client support for asynchronous service operations.")]
    AsyncRequired,

    /// The request referenced an unknown catalog entry or carried unusable parameters.
    #[error("{detail}")]
    BadRequest { detail: String },

    #[error("instance does not exist")]
    InstanceDoesNotExist,

    #[error("{operation} method not implemented")]
    NotImplemented { operation: String },

    /// The backing Aiven API failed. `detail` carries its message verbatim.
    #[error("{detail}")]
    Upstream { detail: String },

    #[error("{detail}")]
    Timeout { detail: String },
}

impl ServiceBrokerError {
    /// Machine-readable error code placed in the `error` field of the response body.
    ///
    /// Only the codes defined by the Open Service Broker API are returned; other
    /// failures carry a description alone.
    #[must_use]
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::AsyncRequired => Some("AsyncRequired"),
            Self::BadRequest { .. }
            | Self::InstanceDoesNotExist
            | Self::NotImplemented { .. }
            | Self::Upstream { .. }
            | Self::Timeout { .. } => None,
        }
    }
}
