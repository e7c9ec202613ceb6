/// Errors raised by a registry store or while resolving a service id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Service {0} not found")]
    NotFound(i64),

    #[error("Invalid service id: {0}")]
    InvalidInput(String),

    #[error("Service id out of range: {0}")]
    OutOfRange(String),

    #[error("Service {0} protects the management application and cannot be deleted")]
    ProtectedService(i64),

    #[error("Storage failure: {0}")]
    Storage(String),
}
