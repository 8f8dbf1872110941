use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use lazy_static::lazy_static;

use crate::models::{CoreError, CoreErrorKind, CoreResult, TaskRecord};

lazy_static! {
    static ref GLOBAL_REGISTRY: TaskRegistry = TaskRegistry::new();
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum RegistrationMode {
    #[default]
    RejectDuplicate,
    Override,
}

/// Mapping from task id to the record describing how to build it.
///
/// Writes are expected during start-up only; `resolve` and `list_tasks` may run concurrently.
#[derive(Default)]
pub struct TaskRegistry {
    records: RwLock<HashMap<String, TaskRecord>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, record: TaskRecord) -> CoreResult<()> {
        self.register_with(record, RegistrationMode::RejectDuplicate)
    }

    pub fn register_with(&self, record: TaskRecord, mode: RegistrationMode) -> CoreResult<()> {
        if record.task_id.trim().is_empty() {
            return Err(CoreError::invalid_input("task id must not be empty"));
        }

        let mut records = self.write_records()?;
        if records.contains_key(&record.task_id) {
            if mode == RegistrationMode::RejectDuplicate {
                return Err(CoreError::new(
                    CoreErrorKind::DuplicateRegistration,
                    format!("task '{}' is already registered", record.task_id),
                )
                .with_task(record.task_id));
            }
            tracing::info!(
                task_id = %record.task_id,
                import_path = %record.import_path,
                "overriding task registration"
            );
        } else {
            tracing::debug!(
                task_id = %record.task_id,
                import_path = %record.import_path,
                "registered task"
            );
        }

        records.insert(record.task_id.clone(), record);
        Ok(())
    }

    pub fn resolve(&self, task_id: &str) -> CoreResult<TaskRecord> {
        let records = self.read_records()?;
        records.get(task_id).cloned().ok_or_else(|| {
            CoreError::new(
                CoreErrorKind::UnknownTask,
                format!("task '{task_id}' is not registered"),
            )
            .with_task(task_id)
        })
    }

    pub fn contains(&self, task_id: &str) -> CoreResult<bool> {
        Ok(self.read_records()?.contains_key(task_id))
    }

    pub fn list_tasks(&self) -> CoreResult<BTreeSet<String>> {
        Ok(self.read_records()?.keys().cloned().collect())
    }

    pub fn len(&self) -> CoreResult<usize> {
        Ok(self.read_records()?.len())
    }

    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.read_records()?.is_empty())
    }

    fn read_records(&self) -> CoreResult<RwLockReadGuard<'_, HashMap<String, TaskRecord>>> {
        self.records.read().map_err(|_| poisoned())
    }

    fn write_records(&self) -> CoreResult<RwLockWriteGuard<'_, HashMap<String, TaskRecord>>> {
        self.records.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> CoreError {
    CoreError::new(CoreErrorKind::Internal, "task registry lock poisoned")
}

/// The process-wide registry used by [`crate::make`] and [`crate::registration::init`].
pub fn global() -> &'static TaskRegistry {
    &GLOBAL_REGISTRY
}

pub fn register(record: TaskRecord) -> CoreResult<()> {
    global().register(record)
}

pub fn register_with(record: TaskRecord, mode: RegistrationMode) -> CoreResult<()> {
    global().register_with(record, mode)
}

pub fn resolve(task_id: &str) -> CoreResult<TaskRecord> {
    global().resolve(task_id)
}

pub fn list_tasks() -> CoreResult<BTreeSet<String>> {
    global().list_tasks()
}
