pub mod dummy;

pub use dummy::{
    DUMMY_IMPORT_PATH, DUMMY_TYPE_PREFIX, DummyEnvSpec, DummyOptions, DummyPool,
    dummy_export_names,
};
