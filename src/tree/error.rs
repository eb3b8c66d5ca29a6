use crate::route::RouteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("no routes were supplied")]
    NoRoutes,
    #[error("duplicate route path '{path}'")]
    DuplicatePath { path: String },
    #[error("route '{path}' has no resolvable ancestor chain")]
    UnresolvableAncestor { path: String },
    #[error("flat page '{path}' has no ancestor application view")]
    NoAncestorApplication { path: String },
    #[error(transparent)]
    Route(#[from] RouteError),
}

pub type TreeResult<T> = Result<T, TreeError>;
