use serde::Serialize;

/// Body of API calls that have nothing else to return.
#[derive(Debug, Serialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

impl Response {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}
