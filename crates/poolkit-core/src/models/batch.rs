use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInfo {
    pub env_id: Vec<usize>,
    pub elapsed_step: Vec<u32>,
}

/// Rows of a reset, in the order of the requested ids.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReset<O> {
    pub observations: Vec<O>,
    pub info: BatchInfo,
}

/// Columns of a step, in the order of the requested ids.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchStep<O> {
    pub observations: Vec<O>,
    pub rewards: Vec<f32>,
    pub terminated: Vec<bool>,
    pub truncated: Vec<bool>,
    pub info: BatchInfo,
}

impl<O> BatchStep<O> {
    pub fn dones(&self) -> Vec<bool> {
        self.terminated
            .iter()
            .zip(&self.truncated)
            .map(|(terminated, truncated)| *terminated || *truncated)
            .collect()
    }
}
