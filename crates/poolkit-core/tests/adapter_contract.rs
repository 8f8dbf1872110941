mod support;

use std::any::TypeId;
use std::sync::Arc;

use poolkit_core::adapters::{
    AdapterSet, DmEnvPool, DmOf, EnvFamily, GymEnvPool, GymOf, GymnasiumEnvPool, GymnasiumOf,
    SpecOf, make_adapters,
};
use poolkit_core::models::{Capability, ConfigOptions, CoreErrorKind};

use support::{CallCounts, Fault, MockPool, MockSpec};

#[test]
fn factory_passes_the_spec_type_through_unchanged() {
    type Family = AdapterSet<MockPool>;

    assert_eq!(TypeId::of::<SpecOf<Family>>(), TypeId::of::<MockSpec>());
    assert_eq!(TypeId::of::<DmOf<Family>>(), TypeId::of::<DmEnvPool<MockPool>>());
    assert_eq!(TypeId::of::<GymOf<Family>>(), TypeId::of::<GymEnvPool<MockPool>>());
    assert_eq!(
        TypeId::of::<GymnasiumOf<Family>>(),
        TypeId::of::<GymnasiumEnvPool<MockPool>>()
    );
    assert_eq!(
        TypeId::of::<<Family as EnvFamily>::Spec>(),
        TypeId::of::<MockSpec>()
    );
}

#[test]
fn factory_builds_every_wrapper_from_options() {
    let adapters = make_adapters::<MockPool>();
    let spec = adapters
        .spec(&ConfigOptions::new().with("num_envs", 3))
        .unwrap();

    assert_eq!(adapters.dm(spec.clone()).unwrap().num_envs(), 3);
    assert_eq!(adapters.gym(spec.clone()).unwrap().num_envs(), 3);
    assert_eq!(adapters.gymnasium(spec).unwrap().num_envs(), 3);
}

#[test]
fn spec_rejects_unknown_options() {
    let error = make_adapters::<MockPool>()
        .spec(&ConfigOptions::new().with("frame_skip", 4))
        .unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::InvalidConfig);
}

#[test]
fn missing_step_operation_is_a_contract_violation() {
    let spec = MockSpec::with_envs(4);
    let pool = MockPool::faulty(&spec, Fault::MissingStep);

    let error = GymEnvPool::from_pool(spec, pool).err().unwrap();
    assert_eq!(error.kind, CoreErrorKind::ContractViolation);
    assert_eq!(error.operation, Some(Capability::Step));
    assert!(error.message.contains("step"));
}

#[test]
fn missing_observation_space_is_a_contract_violation() {
    let spec = MockSpec::with_envs(4);
    let pool = MockPool::faulty(&spec, Fault::MissingObservationSpace);

    let error = DmEnvPool::from_pool(spec, pool).err().unwrap();
    assert_eq!(error.kind, CoreErrorKind::ContractViolation);
    assert_eq!(error.operation, Some(Capability::ObservationSpace));
}

#[test]
fn pool_size_disagreeing_with_spec_is_a_contract_violation() {
    let spec = MockSpec::with_envs(4);
    let pool = MockPool::faulty(&spec, Fault::WrongEnvCount);

    let error = GymnasiumEnvPool::from_pool(spec, pool).err().unwrap();
    assert_eq!(error.kind, CoreErrorKind::ContractViolation);
}

#[test]
fn short_batch_is_rejected_rather_than_truncated() {
    let spec = MockSpec::with_envs(4);
    let pool = MockPool::faulty(&spec, Fault::DropLastRow);
    let mut gym = GymEnvPool::from_pool(spec, pool).unwrap();

    let error = gym.step(&[0; 4]).unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::MalformedBatchResult);
    assert_eq!(error.operation, Some(Capability::Step));
}

#[test]
fn reordered_batch_is_rejected() {
    let spec = MockSpec::with_envs(4);
    let pool = MockPool::faulty(&spec, Fault::ReverseOrder);
    let mut gymnasium = GymnasiumEnvPool::from_pool(spec, pool).unwrap();

    let error = gymnasium.step(&[0; 4]).unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::MalformedBatchResult);
}

#[test]
fn invalid_requests_never_reach_the_pool() {
    let spec = MockSpec::with_envs(4);
    let calls = Arc::new(CallCounts::default());
    let pool = MockPool::with_calls(&spec, calls.clone());
    let mut dm = DmEnvPool::from_pool(spec, pool).unwrap();

    let wrong_count = dm.step(&[0, 0]).unwrap_err();
    assert_eq!(wrong_count.kind, CoreErrorKind::InvalidInput);

    let duplicate = dm.reset_indexed(&[1, 1]).unwrap_err();
    assert_eq!(duplicate.kind, CoreErrorKind::InvalidInput);

    let out_of_range = dm.step_indexed(&[0], &[4]).unwrap_err();
    assert_eq!(out_of_range.kind, CoreErrorKind::InvalidInput);

    assert_eq!((calls.resets(), calls.steps()), (0, 0));
}

#[test]
fn short_or_reordered_reset_batch_is_rejected() {
    let spec = MockSpec::with_envs(4);
    let pool = MockPool::faulty(&spec, Fault::DropLastRow);
    let mut dm = DmEnvPool::from_pool(spec, pool).unwrap();

    let short = dm.reset().unwrap_err();
    assert_eq!(short.kind, CoreErrorKind::MalformedBatchResult);
    assert_eq!(short.operation, Some(Capability::Reset));

    let spec = MockSpec::with_envs(4);
    let pool = MockPool::faulty(&spec, Fault::ReverseOrder);
    let mut gymnasium = GymnasiumEnvPool::from_pool(spec, pool).unwrap();

    let reordered = gymnasium.reset_indexed(&[0, 2]).unwrap_err();
    assert_eq!(reordered.kind, CoreErrorKind::MalformedBatchResult);
    assert_eq!(reordered.operation, Some(Capability::Reset));
}

#[test]
fn async_calls_without_the_capability_are_contract_violations() {
    let spec = MockSpec::with_envs(4);
    let pool = MockPool::with_calls(&spec, Arc::new(CallCounts::default()));
    let mut gym = GymEnvPool::from_pool(spec, pool).unwrap();

    let send = gym.send(&[0; 4], &[0, 1, 2, 3]).unwrap_err();
    assert_eq!(send.kind, CoreErrorKind::ContractViolation);
    assert_eq!(send.operation, Some(Capability::AsyncStep));

    let recv = gym.recv().unwrap_err();
    assert_eq!(recv.kind, CoreErrorKind::ContractViolation);
    assert_eq!(recv.operation, Some(Capability::AsyncStep));
}

#[test]
fn short_recv_batch_is_rejected() {
    let spec = MockSpec::with_envs(4);
    let mut pool = MockPool::faulty(&spec, Fault::DropLastRow);
    pool.async_step = true;
    let mut gymnasium = GymnasiumEnvPool::from_pool(spec, pool).unwrap();

    gymnasium.send(&[0; 4], &[3, 2, 1, 0]).unwrap();
    let error = gymnasium.recv().unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::MalformedBatchResult);
    assert_eq!(error.operation, Some(Capability::AsyncStep));
}

#[test]
fn recv_accepts_completion_order() {
    let spec = MockSpec::with_envs(4);
    let mut pool = MockPool::with_calls(&spec, Arc::new(CallCounts::default()));
    pool.async_step = true;
    let mut gym = GymEnvPool::from_pool(spec, pool).unwrap();

    gym.send(&[0; 4], &[3, 2, 1, 0]).unwrap();
    let step = gym.recv().unwrap();
    assert_eq!(step.info.env_id, vec![3, 2, 1, 0]);
    assert_eq!(step.dones, vec![true, false, false, false]);
}
