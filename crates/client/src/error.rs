use thiserror::Error;

pub type AuthorityResult<T> = Result<T, AuthorityError>;

/// Failure talking to the remote booking/ad-space authority.
#[derive(Error, Debug)]
pub enum AuthorityError {
    /// Non-2xx response, already resolved to a human-readable message:
    /// the server's own JSON `message` when it sent a parseable one,
    /// the endpoint's fallback otherwise.
    #[error("{0}")]
    Remote(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}
