use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;

use crate::adapters::{AdapterSet, make_adapters};
use crate::contract::PoolExecution;
use crate::models::{CoreError, CoreErrorKind, CoreResult};
use crate::registry::RegistrationMode;

lazy_static! {
    static ref GLOBAL_CATALOG: ModuleCatalog = ModuleCatalog::new();
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ExportKind {
    Spec,
    Dm,
    Gym,
    Gymnasium,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExportNames {
    pub spec: String,
    pub dm: String,
    pub gym: String,
    pub gymnasium: String,
}

impl ExportNames {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            spec: format!("{prefix}EnvSpec"),
            dm: format!("{prefix}DMEnvPool"),
            gym: format!("{prefix}GymEnvPool"),
            gymnasium: format!("{prefix}GymnasiumEnvPool"),
        }
    }
}

/// A loadable location exporting the spec and wrapper types of one engine.
pub struct EngineModule {
    import_path: String,
    exports: HashMap<String, ExportKind>,
    pool_type: &'static str,
    adapters: Box<dyn Any + Send + Sync>,
}

impl EngineModule {
    pub fn new<P: PoolExecution>(import_path: impl Into<String>, names: ExportNames) -> Self {
        let exports = HashMap::from([
            (names.spec, ExportKind::Spec),
            (names.dm, ExportKind::Dm),
            (names.gym, ExportKind::Gym),
            (names.gymnasium, ExportKind::Gymnasium),
        ]);
        Self {
            import_path: import_path.into(),
            exports,
            pool_type: std::any::type_name::<P>(),
            adapters: Box::new(make_adapters::<P>()),
        }
    }

    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    pub fn export(&self, name: &str) -> Option<ExportKind> {
        self.exports.get(name).copied()
    }

    pub fn export_names(&self) -> BTreeSet<&str> {
        self.exports.keys().map(String::as_str).collect()
    }

    /// Fails when the module was built for a different pool execution type.
    pub fn adapters<P: PoolExecution>(&self) -> CoreResult<AdapterSet<P>> {
        self.adapters
            .downcast_ref::<AdapterSet<P>>()
            .copied()
            .ok_or_else(|| {
                CoreError::new(
                    CoreErrorKind::ContractViolation,
                    format!(
                        "module '{}' binds '{}', not '{}'",
                        self.import_path,
                        self.pool_type,
                        std::any::type_name::<P>()
                    ),
                )
            })
    }
}

/// Import path to module mapping; the stand-in for importing a location by name.
#[derive(Default)]
pub struct ModuleCatalog {
    modules: RwLock<HashMap<String, Arc<EngineModule>>>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, module: EngineModule) -> CoreResult<()> {
        self.install_with(module, RegistrationMode::RejectDuplicate)
    }

    pub fn install_with(&self, module: EngineModule, mode: RegistrationMode) -> CoreResult<()> {
        let mut modules = self.modules.write().map_err(|_| poisoned())?;
        if mode == RegistrationMode::RejectDuplicate && modules.contains_key(&module.import_path) {
            return Err(CoreError::new(
                CoreErrorKind::DuplicateRegistration,
                format!("module '{}' is already installed", module.import_path),
            ));
        }

        tracing::debug!(
            import_path = %module.import_path,
            pool_type = module.pool_type,
            "installed engine module"
        );
        modules.insert(module.import_path.clone(), Arc::new(module));
        Ok(())
    }

    pub fn load(&self, import_path: &str) -> CoreResult<Arc<EngineModule>> {
        let modules = self.modules.read().map_err(|_| poisoned())?;
        modules.get(import_path).cloned().ok_or_else(|| {
            CoreError::new(
                CoreErrorKind::UnknownModule,
                format!("no engine module is installed at '{import_path}'"),
            )
        })
    }

    pub fn import_paths(&self) -> CoreResult<BTreeSet<String>> {
        let modules = self.modules.read().map_err(|_| poisoned())?;
        Ok(modules.keys().cloned().collect())
    }
}

fn poisoned() -> CoreError {
    CoreError::new(CoreErrorKind::Internal, "module catalog lock poisoned")
}

pub fn global_catalog() -> &'static ModuleCatalog {
    &GLOBAL_CATALOG
}
