use crate::adapters::handle::CheckedPool;
use crate::contract::{AsyncPoolExecution, PoolExecution};
use crate::models::{BatchStep, CoreResult, PoolDescriptor, Space};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StepType {
    First,
    Mid,
    Last,
}

/// Episodic view of one batch: one entry per requested instance.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeStep<O> {
    pub step_type: Vec<StepType>,
    /// `None` on reset.
    pub reward: Option<Vec<f32>>,
    /// `None` on reset; otherwise `0.0` for terminated instances and `1.0` for the rest.
    pub discount: Option<Vec<f32>>,
    pub observation: Vec<O>,
    pub env_id: Vec<usize>,
}

impl<O> TimeStep<O> {
    pub fn is_first(&self) -> bool {
        self.step_type.iter().all(|step_type| *step_type == StepType::First)
    }

    pub fn is_last(&self) -> bool {
        self.step_type.iter().all(|step_type| *step_type == StepType::Last)
    }

    /// `needs_reset` is indexed by env id; rows ending an episode set their flag and rows
    /// starting one clear it.
    fn from_step(batch: BatchStep<O>, needs_reset: &mut [bool]) -> Self {
        let step_type = batch
            .info
            .env_id
            .iter()
            .zip(batch.terminated.iter().zip(&batch.truncated))
            .zip(&batch.info.elapsed_step)
            .map(|((env_id, (terminated, truncated)), elapsed_step)| {
                let pending = &mut needs_reset[*env_id];
                if *terminated || *truncated {
                    *pending = true;
                    StepType::Last
                } else if *pending || *elapsed_step == 0 {
                    *pending = false;
                    StepType::First
                } else {
                    StepType::Mid
                }
            })
            .collect();
        let discount = batch
            .terminated
            .iter()
            .map(|terminated| if *terminated { 0.0 } else { 1.0 })
            .collect();

        Self {
            step_type,
            reward: Some(batch.rewards),
            discount: Some(discount),
            observation: batch.observations,
            env_id: batch.info.env_id,
        }
    }
}

/// Protocol wrapper returning [`TimeStep`] records.
///
/// Every instance starts out needing a reset, so the first row reported for it is `First`
/// even when the engine does not restart episodes by itself.
pub struct DmEnvPool<P: PoolExecution> {
    handle: CheckedPool<P>,
    needs_reset: Vec<bool>,
}

impl<P: PoolExecution> DmEnvPool<P> {
    pub fn new(spec: P::Spec) -> CoreResult<Self> {
        Ok(Self::with_handle(CheckedPool::new(spec)?))
    }

    pub fn from_pool(spec: P::Spec, pool: P) -> CoreResult<Self> {
        Ok(Self::with_handle(CheckedPool::from_parts(spec, pool)?))
    }

    fn with_handle(handle: CheckedPool<P>) -> Self {
        let needs_reset = vec![true; handle.num_envs()];
        Self {
            handle,
            needs_reset,
        }
    }

    pub fn handle(&self) -> &CheckedPool<P> {
        &self.handle
    }

    pub fn spec(&self) -> &P::Spec {
        self.handle.spec()
    }

    pub fn num_envs(&self) -> usize {
        self.handle.num_envs()
    }

    pub fn descriptor(&self) -> &PoolDescriptor {
        self.handle.descriptor()
    }

    pub fn observation_space(&self) -> Option<&Space> {
        self.handle.observation_space()
    }

    pub fn action_space(&self) -> Option<&Space> {
        self.handle.action_space()
    }

    pub fn reset(&mut self) -> CoreResult<TimeStep<P::Observation>> {
        self.reset_with(None)
    }

    pub fn reset_indexed(&mut self, env_ids: &[usize]) -> CoreResult<TimeStep<P::Observation>> {
        self.reset_with(Some(env_ids))
    }

    pub fn step(&mut self, actions: &[P::Action]) -> CoreResult<TimeStep<P::Observation>> {
        let batch = self.handle.step(actions, None)?;
        Ok(TimeStep::from_step(batch, &mut self.needs_reset))
    }

    pub fn step_indexed(
        &mut self,
        actions: &[P::Action],
        env_ids: &[usize],
    ) -> CoreResult<TimeStep<P::Observation>> {
        let batch = self.handle.step(actions, Some(env_ids))?;
        Ok(TimeStep::from_step(batch, &mut self.needs_reset))
    }

    fn reset_with(&mut self, env_ids: Option<&[usize]>) -> CoreResult<TimeStep<P::Observation>> {
        let batch = self.handle.reset(env_ids)?;
        for env_id in &batch.info.env_id {
            self.needs_reset[*env_id] = false;
        }
        Ok(TimeStep {
            step_type: vec![StepType::First; batch.observations.len()],
            reward: None,
            discount: None,
            observation: batch.observations,
            env_id: batch.info.env_id,
        })
    }
}

impl<P: AsyncPoolExecution> DmEnvPool<P> {
    pub fn send(&mut self, actions: &[P::Action], env_ids: &[usize]) -> CoreResult<()> {
        self.handle.send(actions, env_ids)
    }

    pub fn recv(&mut self) -> CoreResult<TimeStep<P::Observation>> {
        let batch = self.handle.recv()?;
        Ok(TimeStep::from_step(batch, &mut self.needs_reset))
    }
}
