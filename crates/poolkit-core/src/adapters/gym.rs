use serde::{Deserialize, Serialize};

use crate::adapters::handle::CheckedPool;
use crate::contract::{AsyncPoolExecution, PoolExecution};
use crate::models::{BatchStep, CoreResult, PoolDescriptor, Space};

/// Auxiliary columns of a legacy step; keeps the two termination causes apart.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GymInfo {
    pub env_id: Vec<usize>,
    pub elapsed_step: Vec<u32>,
    pub terminated: Vec<bool>,
    pub truncated: Vec<bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GymStep<O> {
    pub observations: Vec<O>,
    pub rewards: Vec<f32>,
    pub dones: Vec<bool>,
    pub info: GymInfo,
}

impl<O> GymStep<O> {
    pub fn into_tuple(self) -> (Vec<O>, Vec<f32>, Vec<bool>, GymInfo) {
        (self.observations, self.rewards, self.dones, self.info)
    }

    fn from_step(batch: BatchStep<O>) -> Self {
        let dones = batch.dones();
        Self {
            observations: batch.observations,
            rewards: batch.rewards,
            dones,
            info: GymInfo {
                env_id: batch.info.env_id,
                elapsed_step: batch.info.elapsed_step,
                terminated: batch.terminated,
                truncated: batch.truncated,
            },
        }
    }
}

/// Protocol wrapper with the legacy `reset -> obs`, `step -> (obs, reward, done, info)` shape.
pub struct GymEnvPool<P: PoolExecution> {
    handle: CheckedPool<P>,
}

impl<P: PoolExecution> GymEnvPool<P> {
    pub fn new(spec: P::Spec) -> CoreResult<Self> {
        Ok(Self {
            handle: CheckedPool::new(spec)?,
        })
    }

    pub fn from_pool(spec: P::Spec, pool: P) -> CoreResult<Self> {
        Ok(Self {
            handle: CheckedPool::from_parts(spec, pool)?,
        })
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

    pub fn reset(&mut self) -> CoreResult<Vec<P::Observation>> {
        Ok(self.handle.reset(None)?.observations)
    }

    pub fn reset_indexed(&mut self, env_ids: &[usize]) -> CoreResult<Vec<P::Observation>> {
        Ok(self.handle.reset(Some(env_ids))?.observations)
    }

    pub fn step(&mut self, actions: &[P::Action]) -> CoreResult<GymStep<P::Observation>> {
        let batch = self.handle.step(actions, None)?;
        Ok(GymStep::from_step(batch))
    }

    pub fn step_indexed(
        &mut self,
        actions: &[P::Action],
        env_ids: &[usize],
    ) -> CoreResult<GymStep<P::Observation>> {
        let batch = self.handle.step(actions, Some(env_ids))?;
        Ok(GymStep::from_step(batch))
    }
}

impl<P: AsyncPoolExecution> GymEnvPool<P> {
    pub fn send(&mut self, actions: &[P::Action], env_ids: &[usize]) -> CoreResult<()> {
        self.handle.send(actions, env_ids)
    }

    pub fn recv(&mut self) -> CoreResult<GymStep<P::Observation>> {
        let batch = self.handle.recv()?;
        Ok(GymStep::from_step(batch))
    }
}
