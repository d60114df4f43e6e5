use model::{EngineError, GraphError};
use stack_config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Resource graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Apply engine error: {0}")]
    Engine(#[from] EngineError),
}

pub type StackResult<T> = Result<T, StackError>;
