pub mod dm;
pub mod factory;
pub mod gym;
pub mod gymnasium;
pub mod handle;

pub use dm::{DmEnvPool, StepType, TimeStep};
pub use factory::{AdapterSet, DmOf, EnvFamily, GymOf, GymnasiumOf, SpecOf, make_adapters};
pub use gym::{GymEnvPool, GymInfo, GymStep};
pub use gymnasium::{GymnasiumEnvPool, GymnasiumInfo, GymnasiumStep, ResetInfo};
pub use handle::CheckedPool;
