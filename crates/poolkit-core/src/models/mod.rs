pub mod batch;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod task;

pub use batch::{BatchInfo, BatchReset, BatchStep};
pub use config::{ConfigOptions, PoolConfig};
pub use descriptor::{Capability, PoolDescriptor, Space};
pub use error::{CoreError, CoreErrorKind, CoreResult};
pub use task::{TaskRecord, TaskRecordBuilder};
