use serde::{Deserialize, Serialize};

use crate::models::ConfigOptions;

/// Binding of a task id to the module and exported type names that implement it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub import_path: String,
    pub spec_type_name: String,
    pub dm_type_name: String,
    pub gym_type_name: String,
    pub gymnasium_type_name: String,
    #[serde(default)]
    pub default_options: ConfigOptions,
}

impl TaskRecord {
    pub fn new(
        task_id: impl Into<String>,
        import_path: impl Into<String>,
        spec_type_name: impl Into<String>,
        dm_type_name: impl Into<String>,
        gym_type_name: impl Into<String>,
        gymnasium_type_name: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            import_path: import_path.into(),
            spec_type_name: spec_type_name.into(),
            dm_type_name: dm_type_name.into(),
            gym_type_name: gym_type_name.into(),
            gymnasium_type_name: gymnasium_type_name.into(),
            default_options: ConfigOptions::new(),
        }
    }

    pub fn builder(
        task_id: impl Into<String>,
        import_path: impl Into<String>,
    ) -> TaskRecordBuilder {
        TaskRecordBuilder {
            task_id: task_id.into(),
            import_path: import_path.into(),
            spec_type_name: None,
            dm_type_name: None,
            gym_type_name: None,
            gymnasium_type_name: None,
            type_prefix: None,
            default_options: ConfigOptions::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TaskRecordBuilder {
    task_id: String,
    import_path: String,
    spec_type_name: Option<String>,
    dm_type_name: Option<String>,
    gym_type_name: Option<String>,
    gymnasium_type_name: Option<String>,
    type_prefix: Option<String>,
    default_options: ConfigOptions,
}

impl TaskRecordBuilder {
    /// `"Dummy"` yields `DummyEnvSpec`, `DummyDMEnvPool`, `DummyGymEnvPool` and
    /// `DummyGymnasiumEnvPool` for any name not set explicitly.
    pub fn type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.type_prefix = Some(prefix.into());
        self
    }

    pub fn spec_type(mut self, name: impl Into<String>) -> Self {
        self.spec_type_name = Some(name.into());
        self
    }

    pub fn dm_type(mut self, name: impl Into<String>) -> Self {
        self.dm_type_name = Some(name.into());
        self
    }

    pub fn gym_type(mut self, name: impl Into<String>) -> Self {
        self.gym_type_name = Some(name.into());
        self
    }

    pub fn gymnasium_type(mut self, name: impl Into<String>) -> Self {
        self.gymnasium_type_name = Some(name.into());
        self
    }

    pub fn default_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.default_options.insert(key, value);
        self
    }

    pub fn build(self) -> TaskRecord {
        let prefix = self.type_prefix.unwrap_or_default();
        TaskRecord {
            task_id: self.task_id,
            import_path: self.import_path,
            spec_type_name: self
                .spec_type_name
                .unwrap_or_else(|| format!("{prefix}EnvSpec")),
            dm_type_name: self
                .dm_type_name
                .unwrap_or_else(|| format!("{prefix}DMEnvPool")),
            gym_type_name: self
                .gym_type_name
                .unwrap_or_else(|| format!("{prefix}GymEnvPool")),
            gymnasium_type_name: self
                .gymnasium_type_name
                .unwrap_or_else(|| format!("{prefix}GymnasiumEnvPool")),
            default_options: self.default_options,
        }
    }
}
