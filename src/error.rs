use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
    #[error("ref name is not valid UTF-8: {0}")]
    Ref(String),
}

pub type Result<T> = std::result::Result<T, Error>;
