//! Capability contract between a configuration type and a pool execution type.
//!
//! Every engine exposes one [`PoolSpec`] and one [`PoolExecution`]. The protocol wrappers in
//! [`crate::adapters`] only ever talk to an engine through these traits.

use crate::models::{
    BatchReset, BatchStep, Capability, ConfigOptions, CoreError, CoreResult, PoolConfig,
    PoolDescriptor,
};

/// Immutable, validated construction parameters of a pool.
pub trait PoolSpec: Clone + Send + Sync + 'static {
    fn from_options(options: &ConfigOptions) -> CoreResult<Self>;

    fn config(&self) -> &PoolConfig;
}

/// Owner of a fixed batch of simulation instances.
///
/// `env_ids` handed to `reset`/`step` are unique and within `[0, num_envs)`; the returned
/// columns must follow the order of `env_ids`.
pub trait PoolExecution: Send + Sized + 'static {
    type Spec: PoolSpec;
    type Observation: Clone + Send;
    type Action: Clone + Send + Sync;

    fn new(spec: &Self::Spec) -> CoreResult<Self>;

    fn descriptor(&self) -> PoolDescriptor;

    fn reset(&mut self, env_ids: &[usize]) -> CoreResult<BatchReset<Self::Observation>>;

    fn step(
        &mut self,
        env_ids: &[usize],
        actions: &[Self::Action],
    ) -> CoreResult<BatchStep<Self::Observation>>;
}

/// Optional extension for engines that step a subset of instances and hand back whichever
/// `batch_size` instances finish first.
pub trait AsyncPoolExecution: PoolExecution {
    fn send(&mut self, env_ids: &[usize], actions: &[Self::Action]) -> CoreResult<()>;

    fn recv(&mut self) -> CoreResult<BatchStep<Self::Observation>>;
}

pub fn ensure_capability(descriptor: &PoolDescriptor, capability: Capability) -> CoreResult<()> {
    if descriptor.supports(capability) {
        return Ok(());
    }
    Err(CoreError::contract_violation(
        capability,
        format!(
            "pool '{}' does not provide required operation '{}'",
            descriptor.name,
            capability.as_str()
        ),
    ))
}

/// Checks that a handle built from `config` satisfies everything the wrappers rely on.
pub fn ensure_contract(config: &PoolConfig, descriptor: &PoolDescriptor) -> CoreResult<()> {
    for capability in Capability::REQUIRED {
        ensure_capability(descriptor, capability)?;
    }

    if descriptor.observation_space.is_none() {
        return Err(CoreError::contract_violation(
            Capability::ObservationSpace,
            format!("pool '{}' reports no observation space", descriptor.name),
        ));
    }
    if descriptor.action_space.is_none() {
        return Err(CoreError::contract_violation(
            Capability::ActionSpace,
            format!("pool '{}' reports no action space", descriptor.name),
        ));
    }

    if descriptor.num_envs == 0 || descriptor.num_envs != config.num_envs {
        return Err(CoreError::contract_violation(
            Capability::Reset,
            format!(
                "pool '{}' owns {} instances but its spec asks for {}",
                descriptor.name, descriptor.num_envs, config.num_envs
            ),
        ));
    }
    if descriptor.batch_size == 0 || descriptor.batch_size > descriptor.num_envs {
        return Err(CoreError::contract_violation(
            Capability::Step,
            format!(
                "pool '{}' reports batch size {} for {} instances",
                descriptor.name, descriptor.batch_size, descriptor.num_envs
            ),
        ));
    }

    Ok(())
}
