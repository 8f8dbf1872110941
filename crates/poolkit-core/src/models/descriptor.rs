use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Reset,
    Step,
    ObservationSpace,
    ActionSpace,
    AsyncStep,
}

impl Capability {
    pub const REQUIRED: [Capability; 4] = [
        Capability::Reset,
        Capability::Step,
        Capability::ObservationSpace,
        Capability::ActionSpace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Step => "step",
            Self::ObservationSpace => "observation_space",
            Self::ActionSpace => "action_space",
            Self::AsyncStep => "async_step",
        }
    }
}

/// Observation or action space metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Space {
    Discrete { n: usize },
    Box { shape: Vec<usize>, low: f32, high: f32 },
    MultiDiscrete { nvec: Vec<usize> },
}

impl Space {
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Discrete { .. } => Vec::new(),
            Self::Box { shape, .. } => shape.clone(),
            Self::MultiDiscrete { nvec } => vec![nvec.len()],
        }
    }
}

/// Static introspection data a pool execution handle reports about itself.
#[derive(Clone, Debug, PartialEq)]
pub struct PoolDescriptor {
    pub name: &'static str,
    pub num_envs: usize,
    pub batch_size: usize,
    pub observation_space: Option<Space>,
    pub action_space: Option<Space>,
    pub capabilities: Vec<Capability>,
}

impl PoolDescriptor {
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
