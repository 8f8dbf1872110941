use crate::contract::{
    AsyncPoolExecution, PoolExecution, PoolSpec, ensure_capability, ensure_contract,
};
use crate::models::{
    BatchInfo, BatchReset, BatchStep, Capability, CoreError, CoreResult, PoolDescriptor, Space,
};

/// The single handle every protocol wrapper delegates through.
///
/// Requests are checked before they reach the engine and results are checked before they
/// reach the caller; nothing is reordered or truncated.
pub struct CheckedPool<P: PoolExecution> {
    spec: P::Spec,
    pool: P,
    descriptor: PoolDescriptor,
    all_env_ids: Vec<usize>,
}

impl<P: PoolExecution> CheckedPool<P> {
    pub fn new(spec: P::Spec) -> CoreResult<Self> {
        let pool = P::new(&spec)?;
        Self::from_parts(spec, pool)
    }

    pub fn from_parts(spec: P::Spec, pool: P) -> CoreResult<Self> {
        let descriptor = pool.descriptor();
        if let Err(error) = ensure_contract(spec.config(), &descriptor) {
            tracing::warn!(
                pool = descriptor.name,
                operation = ?error.operation,
                message = %error.message,
                "pool does not satisfy the capability contract"
            );
            return Err(error);
        }

        tracing::debug!(
            pool = descriptor.name,
            num_envs = descriptor.num_envs,
            batch_size = descriptor.batch_size,
            "constructed checked pool handle"
        );

        let all_env_ids = (0..descriptor.num_envs).collect();
        Ok(Self {
            spec,
            pool,
            descriptor,
            all_env_ids,
        })
    }

    pub fn spec(&self) -> &P::Spec {
        &self.spec
    }

    pub fn descriptor(&self) -> &PoolDescriptor {
        &self.descriptor
    }

    pub fn num_envs(&self) -> usize {
        self.descriptor.num_envs
    }

    pub fn observation_space(&self) -> Option<&Space> {
        self.descriptor.observation_space.as_ref()
    }

    pub fn action_space(&self) -> Option<&Space> {
        self.descriptor.action_space.as_ref()
    }

    /// `None` resets every instance.
    pub fn reset(&mut self, env_ids: Option<&[usize]>) -> CoreResult<BatchReset<P::Observation>> {
        let env_ids = env_ids.unwrap_or(self.all_env_ids.as_slice());
        validate_env_ids(env_ids, self.descriptor.num_envs)?;

        let batch = self.pool.reset(env_ids)?;
        check_column(
            Capability::Reset,
            "observations",
            batch.observations.len(),
            env_ids.len(),
        )?;
        check_info(Capability::Reset, &batch.info, env_ids)?;
        Ok(batch)
    }

    /// `None` steps every instance; `actions` follow the order of `env_ids`.
    pub fn step(
        &mut self,
        actions: &[P::Action],
        env_ids: Option<&[usize]>,
    ) -> CoreResult<BatchStep<P::Observation>> {
        let env_ids = env_ids.unwrap_or(self.all_env_ids.as_slice());
        validate_env_ids(env_ids, self.descriptor.num_envs)?;
        validate_action_count(actions.len(), env_ids.len())?;

        let batch = self.pool.step(env_ids, actions)?;
        check_step(Capability::Step, &batch, env_ids.len())?;
        check_info(Capability::Step, &batch.info, env_ids)?;
        Ok(batch)
    }
}

impl<P: AsyncPoolExecution> CheckedPool<P> {
    pub fn send(&mut self, actions: &[P::Action], env_ids: &[usize]) -> CoreResult<()> {
        ensure_capability(&self.descriptor, Capability::AsyncStep)?;
        validate_env_ids(env_ids, self.descriptor.num_envs)?;
        validate_action_count(actions.len(), env_ids.len())?;
        self.pool.send(env_ids, actions)
    }

    /// Results arrive in completion order, so only the size and id range are checked.
    pub fn recv(&mut self) -> CoreResult<BatchStep<P::Observation>> {
        ensure_capability(&self.descriptor, Capability::AsyncStep)?;

        let batch = self.pool.recv()?;
        check_step(Capability::AsyncStep, &batch, self.descriptor.batch_size)?;
        check_column(
            Capability::AsyncStep,
            "info.env_id",
            batch.info.env_id.len(),
            self.descriptor.batch_size,
        )?;
        check_column(
            Capability::AsyncStep,
            "info.elapsed_step",
            batch.info.elapsed_step.len(),
            self.descriptor.batch_size,
        )?;
        if let Err(error) = validate_env_ids(&batch.info.env_id, self.descriptor.num_envs) {
            return Err(reject(CoreError::malformed_batch(
                Capability::AsyncStep,
                format!("received ids are not a valid subset: {}", error.message),
            )));
        }
        Ok(batch)
    }
}

pub(crate) fn validate_env_ids(env_ids: &[usize], num_envs: usize) -> CoreResult<()> {
    let mut seen = vec![false; num_envs];
    for &env_id in env_ids {
        if env_id >= num_envs {
            return Err(CoreError::invalid_input(format!(
                "env id {env_id} is out of range for {num_envs} instances"
            )));
        }
        if seen[env_id] {
            return Err(CoreError::invalid_input(format!(
                "env id {env_id} appears more than once"
            )));
        }
        seen[env_id] = true;
    }
    Ok(())
}

fn validate_action_count(actions: usize, env_ids: usize) -> CoreResult<()> {
    if actions != env_ids {
        return Err(CoreError::invalid_input(format!(
            "got {actions} actions for {env_ids} env ids"
        )));
    }
    Ok(())
}

fn check_step<O>(operation: Capability, batch: &BatchStep<O>, expected: usize) -> CoreResult<()> {
    check_column(operation, "observations", batch.observations.len(), expected)?;
    check_column(operation, "rewards", batch.rewards.len(), expected)?;
    check_column(operation, "terminated", batch.terminated.len(), expected)?;
    check_column(operation, "truncated", batch.truncated.len(), expected)
}

fn check_info(operation: Capability, info: &BatchInfo, env_ids: &[usize]) -> CoreResult<()> {
    check_column(operation, "info.elapsed_step", info.elapsed_step.len(), env_ids.len())?;
    if info.env_id != env_ids {
        return Err(reject(CoreError::malformed_batch(
            operation,
            format!(
                "pool answered for env ids {:?} but {:?} were requested",
                info.env_id, env_ids
            ),
        )));
    }
    Ok(())
}

fn check_column(
    operation: Capability,
    column: &str,
    actual: usize,
    expected: usize,
) -> CoreResult<()> {
    if actual == expected {
        return Ok(());
    }
    Err(reject(CoreError::malformed_batch(
        operation,
        format!("column '{column}' has {actual} rows, expected {expected}"),
    )))
}

fn reject(error: CoreError) -> CoreError {
    tracing::error!(
        operation = ?error.operation,
        message = %error.message,
        "rejected malformed batch result"
    );
    error
}

#[cfg(test)]
mod tests {
    use super::validate_env_ids;
    use crate::models::CoreErrorKind;

    #[test]
    fn accepts_unique_in_range_ids_in_any_order() {
        assert!(validate_env_ids(&[3, 0, 2], 4).is_ok());
        assert!(validate_env_ids(&[], 4).is_ok());
    }

    #[test]
    fn rejects_duplicate_and_out_of_range_ids() {
        let duplicate = validate_env_ids(&[1, 1], 4).unwrap_err();
        assert_eq!(duplicate.kind, CoreErrorKind::InvalidInput);

        let out_of_range = validate_env_ids(&[4], 4).unwrap_err();
        assert_eq!(out_of_range.kind, CoreErrorKind::InvalidInput);
    }
}
