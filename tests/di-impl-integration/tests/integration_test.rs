//! 服务定位器的跨 crate 集成测试：字段注入、静态注入与诊断快照

use anyhow::{anyhow, Result};
use di_abstractions::{InjectionTarget, Injector, ServiceMarker, SkipReason};
use di_impl::{
    BindingState, DependencyError, Locator, MarkerList, Service, ServiceDescriptor, StaticField,
    StaticSlot,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait Logger: Send + Sync {
    fn lines(&self) -> usize;
    fn log(&self, message: &str);
}

#[derive(Default)]
struct ConsoleLogger {
    lines: AtomicUsize,
    awakened: AtomicUsize,
}

impl Logger for ConsoleLogger {
    fn lines(&self) -> usize {
        self.lines.load(Ordering::SeqCst)
    }

    fn log(&self, _message: &str) {
        self.lines.fetch_add(1, Ordering::SeqCst);
    }
}

impl Service for ConsoleLogger {
    fn awake(&self) {
        self.awakened.fetch_add(1, Ordering::SeqCst);
    }
}

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Default)]
struct FrameClock;

impl Clock for FrameClock {
    fn now(&self) -> u64 {
        16
    }
}

trait Pathfinder: Send + Sync {}

/// 手写的注入目标
#[derive(Default)]
struct Player {
    logger: Option<Arc<dyn Logger>>,
    clock: Option<Arc<dyn Clock>>,
    pathfinder: Option<Arc<dyn Pathfinder>>,
}

impl InjectionTarget for Player {
    fn inject_fields(&mut self, injector: &mut Injector<'_>) -> Result<(), DependencyError> {
        injector.field(&mut self.logger)?;
        injector.field(&mut self.clock)?;
        injector.field(&mut self.pathfinder)?;
        Ok(())
    }
}

fn logger_descriptor(logger: Arc<ConsoleLogger>) -> ServiceDescriptor {
    ServiceDescriptor::instance::<dyn Logger, ConsoleLogger>(logger, |c| c)
        .with_lifecycle()
        .build()
}

#[test]
fn test_inject_assigns_bound_contracts() -> Result<()> {
    let mut locator = Locator::new();
    locator.register_singleton_as::<dyn Logger, ConsoleLogger>(|c| c);
    locator.register_transient_as::<dyn Clock, FrameClock>(|c| c);

    let mut player = Player::default();
    let assigned = locator.inject(&mut player, false)?;

    assert_eq!(assigned, 2);
    let logger = player.logger.ok_or_else(|| anyhow!("logger 未注入"))?;
    logger.log("spawned");
    assert_eq!(logger.lines(), 1);
    assert_eq!(player.clock.map(|clock| clock.now()), Some(16));
    assert!(player.pathfinder.is_none());
    Ok(())
}

#[test]
fn test_inject_only_existing_skips_unrealized() -> Result<()> {
    let mut locator = Locator::new();
    locator.register_singleton_as::<dyn Logger, ConsoleLogger>(|c| c);
    locator.register_transient_as::<dyn Clock, FrameClock>(|c| c);

    let mut early = Player::default();
    assert_eq!(locator.inject(&mut early, true)?, 0);
    assert!(!locator.is_realized::<dyn Logger>());

    locator.resolve::<dyn Logger>()?;
    let mut late = Player::default();
    assert_eq!(locator.inject(&mut late, true)?, 1);
    assert!(late.logger.is_some());
    assert!(late.clock.is_none());
    Ok(())
}

#[test]
fn test_static_injection_fires_awake_once_per_instance() -> Result<()> {
    static PRIMARY: StaticSlot<dyn Logger> = StaticSlot::new();
    static SECONDARY: StaticSlot<dyn Logger> = StaticSlot::new();
    static CLOCK: StaticSlot<dyn Clock> = StaticSlot::new();
    static PATHS: StaticSlot<dyn Pathfinder> = StaticSlot::new();

    let logger = Arc::new(ConsoleLogger::default());
    let mut locator = Locator::new();
    locator.register_singleton(logger_descriptor(logger.clone()));
    locator.register_transient_as::<dyn Clock, FrameClock>(|c| c);

    let fields: [&dyn StaticField; 4] = [&PRIMARY, &SECONDARY, &CLOCK, &PATHS];
    assert_eq!(locator.inject_static(&fields)?, 3);

    assert_eq!(logger.awakened.load(Ordering::SeqCst), 1);
    let primary = PRIMARY.get().ok_or_else(|| anyhow!("PRIMARY 未注入"))?;
    let secondary = SECONDARY.get().ok_or_else(|| anyhow!("SECONDARY 未注入"))?;
    assert!(Arc::ptr_eq(&primary, &secondary));
    assert!(CLOCK.is_set());
    assert!(!PATHS.is_set());
    assert_eq!(locator.state::<dyn Logger>(), BindingState::Awake);
    Ok(())
}

#[test]
fn test_execute_services_realizes_every_singleton() -> Result<()> {
    let logger = Arc::new(ConsoleLogger::default());
    let mut locator = Locator::new();
    locator.register_singleton(logger_descriptor(logger.clone()));
    locator.register_singleton_as::<dyn Clock, FrameClock>(|c| c);

    assert_eq!(locator.execute_services()?, 2);
    assert_eq!(locator.execute_services()?, 0);
    assert_eq!(locator.realized_instances().count(), 2);
    assert_eq!(logger.awakened.load(Ordering::SeqCst), 1);
    Ok(())
}

fn describe_logger() -> ServiceDescriptor {
    ServiceDescriptor::bind::<dyn Logger, ConsoleLogger>(|c| c).build()
}

fn describe_transient_clock() -> ServiceDescriptor {
    ServiceDescriptor::bind::<dyn Clock, FrameClock>(|c| c).transient().build()
}

fn marker(contract: &'static str, concrete: &'static str, describe: fn() -> ServiceDescriptor) -> ServiceMarker {
    ServiceMarker {
        concrete,
        contract,
        module_path: module_path!(),
        describe,
    }
}

#[test]
fn test_metadata_scan_reports_bad_markers() {
    let logger = marker(
        std::any::type_name::<dyn Logger>(),
        std::any::type_name::<ConsoleLogger>(),
        describe_logger,
    );
    let scanner = MarkerList::new(vec![
        logger,
        logger,
        marker(
            std::any::type_name::<dyn Clock>(),
            std::any::type_name::<FrameClock>(),
            describe_transient_clock,
        ),
        marker(
            std::any::type_name::<dyn Pathfinder>(),
            std::any::type_name::<FrameClock>(),
            describe_logger,
        ),
    ]);

    let mut locator = Locator::new();
    let report = locator.register_singletons_from_metadata(&scanner);

    assert_eq!(report.registered.len(), 1);
    let reasons: Vec<SkipReason> = report.skipped.iter().map(|skipped| skipped.reason).collect();
    assert_eq!(
        reasons,
        vec![SkipReason::Duplicate, SkipReason::NotSingleton, SkipReason::ContractMismatch]
    );
    assert!(locator.is_singleton_registered::<dyn Logger>());
    assert!(!locator.is_singleton_registered::<dyn Clock>());
}

#[test]
fn test_snapshot_reflects_lifecycle_states() -> Result<()> {
    let mut locator = Locator::new();
    locator.register_singleton(logger_descriptor(Arc::new(ConsoleLogger::default())));
    locator.register_singleton_as::<dyn Clock, FrameClock>(|c| c);
    locator.resolve::<dyn Logger>()?;

    let snapshot = locator.snapshot();
    let states: Vec<BindingState> = snapshot.singletons.iter().map(|view| view.state).collect();
    assert_eq!(states.len(), 2);
    assert!(states.contains(&BindingState::Awake));
    assert!(states.contains(&BindingState::Bound));

    let json: serde_json::Value = serde_json::from_str(&snapshot.to_json()?)?;
    assert_eq!(json["factory"], "plain");
    assert_eq!(json["singletons"].as_array().map(Vec::len), Some(2));
    Ok(())
}
