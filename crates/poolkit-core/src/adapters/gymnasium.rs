use serde::{Deserialize, Serialize};

use crate::adapters::handle::CheckedPool;
use crate::contract::{AsyncPoolExecution, PoolExecution};
use crate::models::{BatchInfo, BatchStep, CoreResult, PoolDescriptor, Space};

pub type ResetInfo = BatchInfo;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GymnasiumInfo {
    pub env_id: Vec<usize>,
    pub elapsed_step: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GymnasiumStep<O> {
    pub observations: Vec<O>,
    pub rewards: Vec<f32>,
    pub terminated: Vec<bool>,
    pub truncated: Vec<bool>,
    pub info: GymnasiumInfo,
}

impl<O> GymnasiumStep<O> {
    pub fn into_tuple(self) -> (Vec<O>, Vec<f32>, Vec<bool>, Vec<bool>, GymnasiumInfo) {
        (
            self.observations,
            self.rewards,
            self.terminated,
            self.truncated,
            self.info,
        )
    }

    fn from_step(batch: BatchStep<O>) -> Self {
        Self {
            observations: batch.observations,
            rewards: batch.rewards,
            terminated: batch.terminated,
            truncated: batch.truncated,
            info: GymnasiumInfo {
                env_id: batch.info.env_id,
                elapsed_step: batch.info.elapsed_step,
            },
        }
    }
}

/// Protocol wrapper with the `reset -> (obs, info)` and five-column step shape.
pub struct GymnasiumEnvPool<P: PoolExecution> {
    handle: CheckedPool<P>,
}

impl<P: PoolExecution> GymnasiumEnvPool<P> {
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

    pub fn reset(&mut self) -> CoreResult<(Vec<P::Observation>, ResetInfo)> {
        let batch = self.handle.reset(None)?;
        Ok((batch.observations, batch.info))
    }

    pub fn reset_indexed(
        &mut self,
        env_ids: &[usize],
    ) -> CoreResult<(Vec<P::Observation>, ResetInfo)> {
        let batch = self.handle.reset(Some(env_ids))?;
        Ok((batch.observations, batch.info))
    }

    pub fn step(&mut self, actions: &[P::Action]) -> CoreResult<GymnasiumStep<P::Observation>> {
        let batch = self.handle.step(actions, None)?;
        Ok(GymnasiumStep::from_step(batch))
    }

    pub fn step_indexed(
        &mut self,
        actions: &[P::Action],
        env_ids: &[usize],
    ) -> CoreResult<GymnasiumStep<P::Observation>> {
        let batch = self.handle.step(actions, Some(env_ids))?;
        Ok(GymnasiumStep::from_step(batch))
    }
}

impl<P: AsyncPoolExecution> GymnasiumEnvPool<P> {
    pub fn send(&mut self, actions: &[P::Action], env_ids: &[usize]) -> CoreResult<()> {
        self.handle.send(actions, env_ids)
    }

    pub fn recv(&mut self) -> CoreResult<GymnasiumStep<P::Observation>> {
        let batch = self.handle.recv()?;
        Ok(GymnasiumStep::from_step(batch))
    }
}
