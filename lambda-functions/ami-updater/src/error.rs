use thiserror::Error;

pub type Result<T> = std::result::Result<T, AmiUpdaterError>;

#[derive(Error, Debug)]
pub enum AmiUpdaterError {
    /// Envelope or message is missing something we need
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A matching AMI set has no entry for the region we run in
    #[error("No AMI for region {region} in {os_name} {release_version}")]
    MissingRegion {
        region: String,
        os_name: String,
        release_version: String,
    },

    #[error("Parameter store error: {0}")]
    ParameterStore(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
