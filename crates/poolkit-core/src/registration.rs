use lazy_static::lazy_static;

use crate::engines::dummy::{DUMMY_IMPORT_PATH, DUMMY_TYPE_PREFIX, DummyPool, dummy_export_names};
use crate::models::{CoreResult, TaskRecord};
use crate::module::{self, EngineModule, ModuleCatalog};
use crate::registry::{self, TaskRegistry};

lazy_static! {
    static ref BUILTINS: CoreResult<()> =
        install_builtins(registry::global(), module::global_catalog());
}

/// Installs the built-in engine modules and tasks into the process-wide registry.
///
/// Safe to call any number of times; only the first call does any work and every call
/// reports its outcome.
pub fn init() -> CoreResult<()> {
    (*BUILTINS).clone()
}

pub fn builtin_tasks() -> Vec<TaskRecord> {
    vec![
        TaskRecord::builder("Dummy-v0", DUMMY_IMPORT_PATH)
            .type_prefix(DUMMY_TYPE_PREFIX)
            .build(),
        TaskRecord::builder("DummyLong-v0", DUMMY_IMPORT_PATH)
            .type_prefix(DUMMY_TYPE_PREFIX)
            .default_option("max_episode_steps", 1000)
            .default_option("episode_length", 500)
            .build(),
    ]
}

pub fn install_builtins(registry: &TaskRegistry, catalog: &ModuleCatalog) -> CoreResult<()> {
    catalog.install(EngineModule::new::<DummyPool>(
        DUMMY_IMPORT_PATH,
        dummy_export_names(),
    ))?;
    for record in builtin_tasks() {
        registry.register(record)?;
    }

    let tasks = registry.len()?;
    tracing::info!(tasks, "installed built-in environment tasks");
    Ok(())
}
