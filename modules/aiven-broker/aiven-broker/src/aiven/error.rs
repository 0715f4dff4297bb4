/// Failure of a single Aiven API call.
///
/// `operation` names the call in human terms (e.g. `creating service`) so the
/// rendered message can be shown to platform operators unchanged.
#[derive(Debug, thiserror::Error)]
pub enum AivenClientError {
    #[error("Error {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error {operation}: {status} status code returned from Aiven: '{body}'")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Error {operation}: service does not exist")]
    NotFound { operation: &'static str },

    #[error("Error {operation}: no {field} found in response JSON")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("Error {operation}: invalid response JSON: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl AivenClientError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
