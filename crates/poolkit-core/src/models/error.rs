use crate::models::Capability;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CoreErrorKind {
    ContractViolation,
    DuplicateRegistration,
    UnknownTask,
    UnknownModule,
    MalformedBatchResult,
    InvalidConfig,
    InvalidInput,
    Internal,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct CoreError {
    pub task_id: Option<String>,
    pub operation: Option<Capability>,
    pub kind: CoreErrorKind,
    pub message: String,
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn new(kind: CoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            task_id: None,
            operation: None,
            kind,
            message: message.into(),
        }
    }

    pub fn contract_violation(operation: Capability, message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::ContractViolation, message).with_operation(operation)
    }

    pub fn malformed_batch(operation: Capability, message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::MalformedBatchResult, message).with_operation(operation)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::InvalidInput, message)
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(CoreErrorKind::InvalidConfig, message)
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_operation(mut self, operation: Capability) -> Self {
        self.operation = Some(operation);
        self
    }
}
