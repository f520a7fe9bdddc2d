use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScopeError>;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("Git error: {0}")]
    Git(#[from] Box<gix::open::Error>),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid workspace path: {0}")]
    Workspace(String),
    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Worker pool error: {0}")]
    Pool(String),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::open::Error> for ScopeError {
    fn from(err: gix::open::Error) -> Self {
        ScopeError::Git(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for ScopeError {
    fn from(err: gix::object::commit::Error) -> Self {
        ScopeError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for ScopeError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        ScopeError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for ScopeError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        ScopeError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for ScopeError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        ScopeError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for ScopeError {
    fn from(err: gix::objs::decode::Error) -> Self {
        ScopeError::ObjectDecode(Box::new(err))
    }
}
