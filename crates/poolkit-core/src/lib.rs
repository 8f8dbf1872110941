pub mod adapters;
pub mod contract;
pub mod engines;
pub mod make;
pub mod models;
pub mod module;
pub mod registration;
pub mod registry;
pub mod telemetry;

pub use make::{Maker, make_dm, make_gym, make_gymnasium, make_spec};
pub use registration::init;
