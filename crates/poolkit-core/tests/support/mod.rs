#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use poolkit_core::contract::{AsyncPoolExecution, PoolExecution, PoolSpec};
use poolkit_core::models::{
    BatchInfo, BatchReset, BatchStep, Capability, ConfigOptions, CoreError, CoreResult,
    PoolConfig, PoolDescriptor, Space,
};

#[derive(Clone, Debug, PartialEq)]
pub struct MockSpec {
    config: PoolConfig,
}

impl MockSpec {
    pub fn with_envs(num_envs: usize) -> Self {
        Self::from_options(&ConfigOptions::new().with("num_envs", num_envs as u64)).unwrap()
    }
}

impl PoolSpec for MockSpec {
    fn from_options(options: &ConfigOptions) -> CoreResult<Self> {
        let (config, domain) = PoolConfig::split(options)?;
        if let Some(key) = domain.keys().next() {
            return Err(CoreError::invalid_config(format!("unknown option '{key}'")));
        }
        Ok(Self { config })
    }

    fn config(&self) -> &PoolConfig {
        &self.config
    }
}

#[derive(Default)]
pub struct CallCounts {
    pub reset: AtomicUsize,
    pub step: AtomicUsize,
}

impl CallCounts {
    pub fn resets(&self) -> usize {
        self.reset.load(Ordering::SeqCst)
    }

    pub fn steps(&self) -> usize {
        self.step.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Fault {
    None,
    DropLastRow,
    ReverseOrder,
    MissingStep,
    MissingObservationSpace,
    WrongEnvCount,
}

/// Observation is the instance index, reward is always `1.0`, instance 3 terminates on every
/// step and `truncate_env` (if any) truncates on every step.
///
/// `send`/`recv` are implemented but only advertised when `async_step` is set.
pub struct MockPool {
    num_envs: usize,
    elapsed: Vec<u32>,
    pending: Vec<usize>,
    pub calls: Arc<CallCounts>,
    pub fault: Fault,
    pub truncate_env: Option<usize>,
    pub async_step: bool,
}

impl MockPool {
    pub fn with_calls(spec: &MockSpec, calls: Arc<CallCounts>) -> Self {
        let num_envs = spec.config().num_envs;
        Self {
            num_envs,
            elapsed: vec![0; num_envs],
            pending: Vec::new(),
            calls,
            fault: Fault::None,
            truncate_env: None,
            async_step: false,
        }
    }

    pub fn faulty(spec: &MockSpec, fault: Fault) -> Self {
        let mut pool = Self::with_calls(spec, Arc::new(CallCounts::default()));
        pool.fault = fault;
        pool
    }

    fn advance(&mut self, env_ids: &[usize]) -> BatchStep<i64> {
        for &env_id in env_ids {
            self.elapsed[env_id] += 1;
        }
        BatchStep {
            observations: self.shape(env_ids.iter().map(|env_id| *env_id as i64).collect()),
            rewards: vec![1.0; env_ids.len()],
            terminated: env_ids.iter().map(|env_id| *env_id == 3).collect(),
            truncated: env_ids
                .iter()
                .map(|env_id| Some(*env_id) == self.truncate_env)
                .collect(),
            info: BatchInfo {
                env_id: self.shape(env_ids.to_vec()),
                elapsed_step: env_ids.iter().map(|env_id| self.elapsed[*env_id]).collect(),
            },
        }
    }

    fn shape<T>(&self, mut column: Vec<T>) -> Vec<T> {
        match self.fault {
            Fault::DropLastRow => {
                column.pop();
                column
            }
            Fault::ReverseOrder => {
                column.reverse();
                column
            }
            _ => column,
        }
    }
}

impl PoolExecution for MockPool {
    type Spec = MockSpec;
    type Observation = i64;
    type Action = i64;

    fn new(spec: &MockSpec) -> CoreResult<Self> {
        Ok(Self::with_calls(spec, Arc::new(CallCounts::default())))
    }

    fn descriptor(&self) -> PoolDescriptor {
        let mut capabilities = vec![
            Capability::Reset,
            Capability::Step,
            Capability::ObservationSpace,
            Capability::ActionSpace,
        ];
        if self.async_step {
            capabilities.push(Capability::AsyncStep);
        }
        if self.fault == Fault::MissingStep {
            capabilities.retain(|capability| *capability != Capability::Step);
        }

        PoolDescriptor {
            name: "mock",
            num_envs: if self.fault == Fault::WrongEnvCount {
                self.num_envs + 1
            } else {
                self.num_envs
            },
            batch_size: self.num_envs,
            observation_space: (self.fault != Fault::MissingObservationSpace)
                .then_some(Space::Discrete { n: self.num_envs }),
            action_space: Some(Space::Discrete { n: 2 }),
            capabilities,
        }
    }

    fn reset(&mut self, env_ids: &[usize]) -> CoreResult<BatchReset<i64>> {
        self.calls.reset.fetch_add(1, Ordering::SeqCst);
        for &env_id in env_ids {
            self.elapsed[env_id] = 0;
        }
        Ok(BatchReset {
            observations: self.shape(env_ids.iter().map(|env_id| *env_id as i64).collect()),
            info: BatchInfo {
                env_id: self.shape(env_ids.to_vec()),
                elapsed_step: vec![0; env_ids.len()],
            },
        })
    }

    fn step(&mut self, env_ids: &[usize], _actions: &[i64]) -> CoreResult<BatchStep<i64>> {
        self.calls.step.fetch_add(1, Ordering::SeqCst);
        Ok(self.advance(env_ids))
    }
}

impl AsyncPoolExecution for MockPool {
    fn send(&mut self, env_ids: &[usize], _actions: &[i64]) -> CoreResult<()> {
        self.pending.extend_from_slice(env_ids);
        Ok(())
    }

    fn recv(&mut self) -> CoreResult<BatchStep<i64>> {
        if self.pending.len() < self.num_envs {
            return Err(CoreError::invalid_input("not enough pending env ids"));
        }
        let env_ids: Vec<usize> = self.pending.drain(..self.num_envs).collect();
        Ok(self.advance(&env_ids))
    }
}
