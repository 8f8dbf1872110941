//! Construction of specs and protocol wrappers from a registered task id.

use crate::adapters::{AdapterSet, DmEnvPool, GymEnvPool, GymnasiumEnvPool};
use crate::contract::PoolExecution;
use crate::models::{ConfigOptions, CoreError, CoreErrorKind, CoreResult, TaskRecord};
use crate::module::{self, ExportKind, ModuleCatalog};
use crate::registry::{self, TaskRegistry};

pub struct Maker<'a> {
    registry: &'a TaskRegistry,
    catalog: &'a ModuleCatalog,
}

impl Maker<'static> {
    pub fn global() -> Self {
        Self::new(registry::global(), module::global_catalog())
    }
}

impl<'a> Maker<'a> {
    pub fn new(registry: &'a TaskRegistry, catalog: &'a ModuleCatalog) -> Self {
        Self { registry, catalog }
    }

    /// Builds the spec from the task's default options overlaid with `options`.
    pub fn spec<P: PoolExecution>(
        &self,
        task_id: &str,
        options: &ConfigOptions,
    ) -> CoreResult<P::Spec> {
        let (_, spec) = self.prepare::<P>(task_id, ExportKind::Spec, options)?;
        Ok(spec)
    }

    pub fn dm<P: PoolExecution>(
        &self,
        task_id: &str,
        options: &ConfigOptions,
    ) -> CoreResult<DmEnvPool<P>> {
        let (adapters, spec) = self.prepare::<P>(task_id, ExportKind::Dm, options)?;
        adapters.dm(spec).map_err(|error| error.with_task(task_id))
    }

    pub fn gym<P: PoolExecution>(
        &self,
        task_id: &str,
        options: &ConfigOptions,
    ) -> CoreResult<GymEnvPool<P>> {
        let (adapters, spec) = self.prepare::<P>(task_id, ExportKind::Gym, options)?;
        adapters.gym(spec).map_err(|error| error.with_task(task_id))
    }

    pub fn gymnasium<P: PoolExecution>(
        &self,
        task_id: &str,
        options: &ConfigOptions,
    ) -> CoreResult<GymnasiumEnvPool<P>> {
        let (adapters, spec) = self.prepare::<P>(task_id, ExportKind::Gymnasium, options)?;
        adapters.gymnasium(spec).map_err(|error| error.with_task(task_id))
    }

    fn prepare<P: PoolExecution>(
        &self,
        task_id: &str,
        kind: ExportKind,
        options: &ConfigOptions,
    ) -> CoreResult<(AdapterSet<P>, P::Spec)> {
        let record = self.registry.resolve(task_id)?;
        let module = self
            .catalog
            .load(&record.import_path)
            .map_err(|error| error.with_task(task_id))?;

        let required_exports = [
            (ExportKind::Spec, &record.spec_type_name),
            export(&record, kind),
        ];
        for (required, type_name) in required_exports {
            if module.export(type_name) != Some(required) {
                return Err(CoreError::new(
                    CoreErrorKind::ContractViolation,
                    format!(
                        "module '{}' does not export {:?} type '{}'",
                        record.import_path, required, type_name
                    ),
                )
                .with_task(task_id));
            }
        }

        let adapters = module
            .adapters::<P>()
            .map_err(|error| error.with_task(task_id))?;
        let merged = record.default_options.merged_with(options);
        let spec = adapters
            .spec(&merged)
            .map_err(|error| error.with_task(task_id))?;

        tracing::info!(
            task_id,
            import_path = %record.import_path,
            export = ?kind,
            "making pool from registered task"
        );
        Ok((adapters, spec))
    }
}

fn export(record: &TaskRecord, kind: ExportKind) -> (ExportKind, &String) {
    let type_name = match kind {
        ExportKind::Spec => &record.spec_type_name,
        ExportKind::Dm => &record.dm_type_name,
        ExportKind::Gym => &record.gym_type_name,
        ExportKind::Gymnasium => &record.gymnasium_type_name,
    };
    (kind, type_name)
}

pub fn make_spec<P: PoolExecution>(task_id: &str, options: &ConfigOptions) -> CoreResult<P::Spec> {
    Maker::global().spec::<P>(task_id, options)
}

pub fn make_dm<P: PoolExecution>(
    task_id: &str,
    options: &ConfigOptions,
) -> CoreResult<DmEnvPool<P>> {
    Maker::global().dm::<P>(task_id, options)
}

pub fn make_gym<P: PoolExecution>(
    task_id: &str,
    options: &ConfigOptions,
) -> CoreResult<GymEnvPool<P>> {
    Maker::global().gym::<P>(task_id, options)
}

pub fn make_gymnasium<P: PoolExecution>(
    task_id: &str,
    options: &ConfigOptions,
) -> CoreResult<GymnasiumEnvPool<P>> {
    Maker::global().gymnasium::<P>(task_id, options)
}
