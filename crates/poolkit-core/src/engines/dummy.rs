//! Deterministic reference engine.
//!
//! Instance `i` runs for `episode_length + i` steps, observes `[i, elapsed_step]` and earns a
//! reward of `1.0` per step. A finished instance is reset by its next step, which reports
//! `elapsed_step == 0` and no reward. Instances are stepped in parallel on a dedicated
//! rayon pool.

use std::collections::VecDeque;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::contract::{AsyncPoolExecution, PoolExecution, PoolSpec};
use crate::models::{
    BatchInfo, BatchReset, BatchStep, Capability, ConfigOptions, CoreError, CoreErrorKind,
    CoreResult, PoolConfig, PoolDescriptor, Space,
};
use crate::module::ExportNames;

pub const DUMMY_IMPORT_PATH: &str = "poolkit.dummy";
pub const DUMMY_TYPE_PREFIX: &str = "Dummy";
const DUMMY_NUM_ACTIONS: usize = 2;

pub fn dummy_export_names() -> ExportNames {
    ExportNames::with_prefix(DUMMY_TYPE_PREFIX)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DummyOptions {
    pub episode_length: u32,
}

impl Default for DummyOptions {
    fn default() -> Self {
        Self { episode_length: 5 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DummyEnvSpec {
    config: PoolConfig,
    options: DummyOptions,
}

impl DummyEnvSpec {
    pub fn options(&self) -> &DummyOptions {
        &self.options
    }
}

impl PoolSpec for DummyEnvSpec {
    fn from_options(options: &ConfigOptions) -> CoreResult<Self> {
        let (config, domain) = PoolConfig::split(options)?;
        let options: DummyOptions = domain.deserialize()?;
        if options.episode_length == 0 {
            return Err(CoreError::invalid_config("episode_length must be at least 1"));
        }
        episode_length(options.episode_length, config.num_envs.saturating_sub(1))?;
        Ok(Self { config, options })
    }

    fn config(&self) -> &PoolConfig {
        &self.config
    }
}

#[derive(Clone, Debug)]
struct DummyEnv {
    env_id: usize,
    episode_length: u32,
    max_episode_steps: u32,
    elapsed_step: u32,
    done: bool,
}

#[derive(Clone, Debug)]
struct Transition {
    observation: Vec<f32>,
    reward: f32,
    terminated: bool,
    truncated: bool,
    elapsed_step: u32,
}

impl DummyEnv {
    fn observation(&self) -> Vec<f32> {
        vec![self.env_id as f32, self.elapsed_step as f32]
    }

    fn reset(&mut self) -> Vec<f32> {
        self.elapsed_step = 0;
        self.done = false;
        self.observation()
    }

    fn step(&mut self) -> Transition {
        if self.done {
            let observation = self.reset();
            return Transition {
                observation,
                reward: 0.0,
                terminated: false,
                truncated: false,
                elapsed_step: 0,
            };
        }

        self.elapsed_step += 1;
        let terminated = self.elapsed_step >= self.episode_length;
        let truncated = !terminated && self.elapsed_step >= self.max_episode_steps;
        self.done = terminated || truncated;

        Transition {
            observation: self.observation(),
            reward: 1.0,
            terminated,
            truncated,
            elapsed_step: self.elapsed_step,
        }
    }
}

pub struct DummyPool {
    config: PoolConfig,
    envs: Vec<DummyEnv>,
    threads: ThreadPool,
    pending: VecDeque<(usize, i64)>,
}

impl DummyPool {
    fn run(&mut self, env_ids: &[usize], actions: Option<&[i64]>) -> CoreResult<Vec<Transition>> {
        if let Some(actions) = actions {
            validate_actions(actions)?;
        }

        let mut selected = vec![false; self.envs.len()];
        for &env_id in env_ids {
            match selected.get_mut(env_id) {
                Some(slot) => *slot = true,
                None => {
                    return Err(CoreError::invalid_input(format!(
                        "env id {env_id} is out of range"
                    )));
                }
            }
        }

        let reset_only = actions.is_none();
        let envs = &mut self.envs;
        let mut transitions: Vec<Option<Transition>> = self.threads.install(|| {
            envs.par_iter_mut()
                .zip(selected.par_iter())
                .map(|(env, selected)| {
                    if !*selected {
                        return None;
                    }
                    if reset_only {
                        let observation = env.reset();
                        return Some(Transition {
                            observation,
                            reward: 0.0,
                            terminated: false,
                            truncated: false,
                            elapsed_step: 0,
                        });
                    }
                    Some(env.step())
                })
                .collect()
        });

        env_ids
            .iter()
            .map(|env_id| {
                transitions[*env_id].take().ok_or_else(|| {
                    CoreError::invalid_input(format!("env id {env_id} appears more than once"))
                })
            })
            .collect()
    }
}

/// Episode length of instance `env_id`.
fn episode_length(base: u32, env_id: usize) -> CoreResult<u32> {
    u32::try_from(env_id)
        .ok()
        .and_then(|offset| base.checked_add(offset))
        .ok_or_else(|| {
            CoreError::invalid_config(format!(
                "episode_length {base} is too large for instance {env_id}"
            ))
        })
}

fn validate_actions(actions: &[i64]) -> CoreResult<()> {
    for action in actions {
        if *action < 0 || *action >= DUMMY_NUM_ACTIONS as i64 {
            return Err(CoreError::invalid_input(format!(
                "action {action} is outside [0, {DUMMY_NUM_ACTIONS})"
            )));
        }
    }
    Ok(())
}

fn into_step(env_ids: &[usize], transitions: Vec<Transition>) -> BatchStep<Vec<f32>> {
    let mut batch = BatchStep {
        observations: Vec::with_capacity(transitions.len()),
        rewards: Vec::with_capacity(transitions.len()),
        terminated: Vec::with_capacity(transitions.len()),
        truncated: Vec::with_capacity(transitions.len()),
        info: BatchInfo {
            env_id: env_ids.to_vec(),
            elapsed_step: Vec::with_capacity(transitions.len()),
        },
    };
    for transition in transitions {
        batch.observations.push(transition.observation);
        batch.rewards.push(transition.reward);
        batch.terminated.push(transition.terminated);
        batch.truncated.push(transition.truncated);
        batch.info.elapsed_step.push(transition.elapsed_step);
    }
    batch
}

impl PoolExecution for DummyPool {
    type Spec = DummyEnvSpec;
    type Observation = Vec<f32>;
    type Action = i64;

    fn new(spec: &DummyEnvSpec) -> CoreResult<Self> {
        let config = spec.config().clone();
        let threads = ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build()
            .map_err(|error| {
                CoreError::new(
                    CoreErrorKind::Internal,
                    format!("failed to start dummy pool threads: {error}"),
                )
            })?;

        let envs = (0..config.num_envs)
            .map(|env_id| -> CoreResult<DummyEnv> {
                Ok(DummyEnv {
                    env_id,
                    episode_length: episode_length(spec.options.episode_length, env_id)?,
                    max_episode_steps: config.max_episode_steps,
                    elapsed_step: 0,
                    done: true,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self {
            config,
            envs,
            threads,
            pending: VecDeque::new(),
        })
    }

    fn descriptor(&self) -> PoolDescriptor {
        PoolDescriptor {
            name: "dummy",
            num_envs: self.config.num_envs,
            batch_size: self.config.batch_size,
            observation_space: Some(Space::Box {
                shape: vec![2],
                low: 0.0,
                high: self
                    .config
                    .num_envs
                    .saturating_sub(1)
                    .max(self.config.max_episode_steps as usize) as f32,
            }),
            action_space: Some(Space::Discrete {
                n: DUMMY_NUM_ACTIONS,
            }),
            capabilities: vec![
                Capability::Reset,
                Capability::Step,
                Capability::ObservationSpace,
                Capability::ActionSpace,
                Capability::AsyncStep,
            ],
        }
    }

    fn reset(&mut self, env_ids: &[usize]) -> CoreResult<BatchReset<Vec<f32>>> {
        let transitions = self.run(env_ids, None)?;
        let step = into_step(env_ids, transitions);
        Ok(BatchReset {
            observations: step.observations,
            info: step.info,
        })
    }

    fn step(&mut self, env_ids: &[usize], actions: &[i64]) -> CoreResult<BatchStep<Vec<f32>>> {
        let transitions = self.run(env_ids, Some(actions))?;
        Ok(into_step(env_ids, transitions))
    }
}

impl AsyncPoolExecution for DummyPool {
    fn send(&mut self, env_ids: &[usize], actions: &[i64]) -> CoreResult<()> {
        validate_actions(actions)?;
        for env_id in env_ids {
            if self.pending.iter().any(|(pending, _)| pending == env_id) {
                return Err(CoreError::invalid_input(format!(
                    "env id {env_id} already has an action in flight"
                )));
            }
        }
        self.pending
            .extend(env_ids.iter().copied().zip(actions.iter().copied()));
        Ok(())
    }

    fn recv(&mut self) -> CoreResult<BatchStep<Vec<f32>>> {
        let batch_size = self.config.batch_size;
        if self.pending.len() < batch_size {
            return Err(CoreError::invalid_input(format!(
                "recv needs {batch_size} pending env ids, only {} were sent",
                self.pending.len()
            )));
        }

        let (env_ids, actions): (Vec<usize>, Vec<i64>) =
            self.pending.drain(..batch_size).unzip();
        let transitions = self.run(&env_ids, Some(actions.as_slice()))?;
        Ok(into_step(&env_ids, transitions))
    }
}
