//! 服务注册宏集成测试

use component_macros::{inject_static, register_singleton, Inject};
use di_impl::{
    AttributeScanner, BindingState, CatalogScanner, DependencyError, InjectionTarget, Injector,
    Locator, Service, StaticSlot,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub trait Logger: Send + Sync {
    fn prefix(&self) -> &'static str;
}

/// 控制台日志服务
#[derive(Debug, Default)]
#[register_singleton(dyn Logger, lifecycle)]
pub struct ConsoleLogger {
    awakened: AtomicUsize,
}

impl Logger for ConsoleLogger {
    fn prefix(&self) -> &'static str {
        "[console]"
    }
}

impl Service for ConsoleLogger {
    fn awake(&self) {
        self.awakened.fetch_add(1, Ordering::SeqCst);
    }
}

static LEVEL_DESTROYED: AtomicUsize = AtomicUsize::new(0);

/// 关卡状态，场景切换后重建
#[derive(Debug, Default)]
#[register_singleton(context)]
pub struct LevelState;

impl Service for LevelState {
    fn destroy(&self) {
        LEVEL_DESTROYED.fetch_add(1, Ordering::SeqCst);
    }
}

/// 不声明能力的单例
#[derive(Debug, Default)]
#[register_singleton]
pub struct Scoreboard;

#[derive(Default, Inject)]
struct Player {
    #[inject]
    logger: Option<Arc<dyn Logger>>,
    #[inject]
    score: Option<Arc<Scoreboard>>,
    #[allow(dead_code)]
    health: u32,
}

#[derive(Default, Inject)]
struct Spectator(#[inject] Option<Arc<Scoreboard>>);

#[inject_static]
static GLOBAL_LOGGER: StaticSlot<dyn Logger> = StaticSlot::new();

fn scanned_locator() -> Locator {
    let mut locator = Locator::new();
    let report = locator.register_singletons_from_metadata(&CatalogScanner::with_modules([module_path!()]));
    assert!(report.is_clean());
    locator
}

#[test]
fn test_markers_are_submitted_at_startup() {
    let scanner = CatalogScanner::with_modules([module_path!()]);
    let markers = scanner.scan();
    assert_eq!(markers.len(), 3);
    assert!(markers.iter().all(|marker| marker.module_path == module_path!()));

    let logger = markers
        .iter()
        .find(|marker| marker.concrete.ends_with("ConsoleLogger"))
        .unwrap();
    let descriptor = (logger.describe)();
    assert_eq!(descriptor.contract().short_name(), "Logger");
    assert!(descriptor.capabilities().lifecycle);
    assert!(!descriptor.capabilities().context_scoped);
}

#[test]
fn test_scanned_singletons_resolve() {
    let mut locator = scanned_locator();
    assert!(locator.is_singleton_registered::<dyn Logger>());
    assert!(locator.is_singleton_registered::<LevelState>());
    assert!(locator.is_singleton_registered::<Scoreboard>());

    let logger = locator.resolve::<dyn Logger>().unwrap().unwrap();
    assert_eq!(logger.prefix(), "[console]");
    assert_eq!(locator.state::<dyn Logger>(), BindingState::Awake);
    assert_eq!(locator.resolve::<Scoreboard>().unwrap().map(|_| ()), Some(()));
    assert_eq!(locator.state::<Scoreboard>(), BindingState::Realized);
}

#[test]
fn test_context_marker_is_evicted_on_reset() {
    let mut locator = scanned_locator();
    let before = locator.resolve::<LevelState>().unwrap().unwrap();

    let report = locator.reset();
    assert_eq!(report.evicted.len(), 1);
    assert_eq!(LEVEL_DESTROYED.load(Ordering::SeqCst), 1);

    let after = locator.resolve::<LevelState>().unwrap().unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn test_derive_inject_fills_marked_fields() {
    let mut locator = scanned_locator();

    let mut player = Player::default();
    assert_eq!(locator.inject(&mut player, false).unwrap(), 2);
    assert!(player.logger.is_some());
    assert!(player.score.is_some());

    let mut spectator = Spectator::default();
    assert_eq!(locator.inject(&mut spectator, true).unwrap(), 1);
    assert!(Arc::ptr_eq(
        spectator.0.as_ref().unwrap(),
        player.score.as_ref().unwrap()
    ));
}

#[test]
fn test_derived_target_can_be_driven_manually() {
    struct Nothing;

    impl di_impl::ErasedResolver for Nothing {
        fn resolve_erased(
            &mut self,
            _contract: &di_impl::TypeInfo,
            _options: di_impl::ResolveOptions,
        ) -> Result<Option<di_impl::Resolution>, DependencyError> {
            Ok(None)
        }
    }

    let mut resolver = Nothing;
    let mut injector = Injector::new(&mut resolver, di_impl::ResolveOptions::default());
    let mut player = Player::default();
    player.inject_fields(&mut injector).unwrap();
    assert_eq!(injector.assigned(), 0);
    assert!(player.logger.is_none());
}

#[test]
fn test_inject_static_slot_is_catalogued() {
    let scanner = CatalogScanner::with_modules([module_path!()]);
    let entries = scanner.static_fields();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "GLOBAL_LOGGER");

    let mut locator = scanned_locator();
    assert_eq!(locator.inject_static_from_catalog(&scanner).unwrap(), 1);
    assert_eq!(GLOBAL_LOGGER.get().unwrap().prefix(), "[console]");
}
