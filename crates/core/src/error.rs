#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Rule registration failed: {0}")]
    Registration(String),

    #[error("Unknown page type: '{0}'")]
    UnknownPageType(String),

    #[error("Invalid request: {0}")]
    Request(String),
}
