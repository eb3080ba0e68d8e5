use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("response schema mismatch at {endpoint}: {source}")]
    Schema {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("bad input: {0}")]
    BadInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
