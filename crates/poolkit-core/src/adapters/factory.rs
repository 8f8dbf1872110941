use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use crate::adapters::{DmEnvPool, GymEnvPool, GymnasiumEnvPool};
use crate::contract::{PoolExecution, PoolSpec};
use crate::models::{ConfigOptions, CoreResult};

/// The four types one engine is usable through.
pub trait EnvFamily {
    type Spec: PoolSpec;
    type Dm;
    type Gym;
    type Gymnasium;
}

pub type SpecOf<F> = <F as EnvFamily>::Spec;
pub type DmOf<F> = <F as EnvFamily>::Dm;
pub type GymOf<F> = <F as EnvFamily>::Gym;
pub type GymnasiumOf<F> = <F as EnvFamily>::Gymnasium;

/// Binding of one pool execution type to its spec and protocol wrappers.
///
/// Holds no state; constructing a wrapper builds a fresh pool every time.
pub struct AdapterSet<P: PoolExecution> {
    _pool: PhantomData<fn() -> P>,
}

pub fn make_adapters<P: PoolExecution>() -> AdapterSet<P> {
    AdapterSet { _pool: PhantomData }
}

impl<P: PoolExecution> EnvFamily for AdapterSet<P> {
    type Spec = P::Spec;
    type Dm = DmEnvPool<P>;
    type Gym = GymEnvPool<P>;
    type Gymnasium = GymnasiumEnvPool<P>;
}

impl<P: PoolExecution> AdapterSet<P> {
    pub fn spec(&self, options: &ConfigOptions) -> CoreResult<P::Spec> {
        P::Spec::from_options(options)
    }

    pub fn dm(&self, spec: P::Spec) -> CoreResult<DmEnvPool<P>> {
        DmEnvPool::new(spec)
    }

    pub fn gym(&self, spec: P::Spec) -> CoreResult<GymEnvPool<P>> {
        GymEnvPool::new(spec)
    }

    pub fn gymnasium(&self, spec: P::Spec) -> CoreResult<GymnasiumEnvPool<P>> {
        GymnasiumEnvPool::new(spec)
    }
}

impl<P: PoolExecution> Clone for AdapterSet<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: PoolExecution> Copy for AdapterSet<P> {}

impl<P: PoolExecution> Debug for AdapterSet<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AdapterSet<{}>", std::any::type_name::<P>())
    }
}
