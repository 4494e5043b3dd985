//! 定位器构建器集成测试

use crate::builder::{LocatorBuilder, LoggingConfig};
use crate::config_sources::ConfigSources;
use di_abstractions::{ServiceDescriptor, ServiceMarker, SkipReason};
use di_impl::{HostObjectFactory, InMemoryHost, StaticSlot};
use infrastructure_common::{BindingState, InfrastructureError, LocatorConfig, LoggingSection, Service};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use tempfile::NamedTempFile;

const AUDIO_MODULE: &str = "composition_builder_test::audio";
const UI_MODULE: &str = "composition_builder_test::ui";

static REGISTER_MARKERS: Once = Once::new();
static MIXER_AWAKES: AtomicUsize = AtomicUsize::new(0);
static MIXER_SLOT: StaticSlot<dyn Mixer> = StaticSlot::new();

trait Mixer: Send + Sync {
    fn channels(&self) -> u32;
}

#[derive(Default)]
struct StereoMixer;

impl Mixer for StereoMixer {
    fn channels(&self) -> u32 {
        2
    }
}

impl Service for StereoMixer {
    fn awake(&self) {
        MIXER_AWAKES.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct HudOverlay;

fn describe_mixer() -> ServiceDescriptor {
    ServiceDescriptor::bind::<dyn Mixer, StereoMixer>(|c| c)
        .with_lifecycle()
        .build()
}

fn describe_hud() -> ServiceDescriptor {
    ServiceDescriptor::of::<HudOverlay>().host_component().build()
}

/// 向全局目录提交测试标记（只提交一次）
fn register_markers() {
    REGISTER_MARKERS.call_once(|| {
        di_impl::__private::submit(ServiceMarker {
            concrete: std::any::type_name::<StereoMixer>(),
            contract: std::any::type_name::<dyn Mixer>(),
            module_path: AUDIO_MODULE,
            describe: describe_mixer,
        });
        di_impl::__private::submit(ServiceMarker {
            concrete: std::any::type_name::<HudOverlay>(),
            contract: std::any::type_name::<HudOverlay>(),
            module_path: UI_MODULE,
            describe: describe_hud,
        });
        di_impl::__private::submit_static_field(&MIXER_SLOT, "MIXER_SLOT", AUDIO_MODULE);
    });
}

fn scoped_config(modules: &[&str]) -> LocatorConfig {
    let mut config = LocatorConfig::default();
    config.scan.modules = modules.iter().map(|m| m.to_string()).collect();
    config
}

#[test]
fn test_builder_scans_configured_modules_only() {
    register_markers();

    let (locator, report) = LocatorBuilder::new()
        .with_config(scoped_config(&[AUDIO_MODULE]))
        .build()
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.scan.registered.len(), 1);
    assert!(locator.is_singleton_registered::<dyn Mixer>());
    assert!(!locator.is_singleton_registered::<HudOverlay>());
    assert_eq!(locator.state::<dyn Mixer>(), BindingState::Bound);
}

#[test]
fn test_builder_from_config_file_runs_lifecycle_steps() {
    register_markers();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[scan]
modules = ["{AUDIO_MODULE}"]

[lifecycle]
execute_on_start = true
inject_static_on_start = true
"#
    )
    .unwrap();

    let (mut locator, report) = LocatorBuilder::new()
        .with_config_file(file.path())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(report.static_fields, 1);
    let mixer = MIXER_SLOT.get().unwrap();
    assert_eq!(mixer.channels(), 2);

    let resolved = locator.resolve::<dyn Mixer>().unwrap().unwrap();
    assert!(Arc::ptr_eq(&mixer, &resolved));
    assert_eq!(locator.state::<dyn Mixer>(), BindingState::Awake);
    assert!(MIXER_AWAKES.load(Ordering::SeqCst) >= 1);
}

#[test]
fn test_builder_reports_unknown_bindings() {
    register_markers();

    let sources = ConfigSources::new().add_inline_toml(
        r#"
[scan]
enabled = false

[[bindings]]
contract = "Mixer"
concrete = "StereoMixer"
lifetime = "transient"

[[bindings]]
contract = "Mixer"
concrete = "SurroundMixer"
"#,
    );

    let (locator, report) = LocatorBuilder::new()
        .with_config_sources(&sources)
        .unwrap()
        .build()
        .unwrap();

    assert!(report.scan.registered.is_empty());
    assert_eq!(report.bindings.registered.len(), 1);
    assert!(!report.is_clean());
    let skipped: Vec<_> = report.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].concrete, "SurroundMixer");
    assert_eq!(skipped[0].reason, SkipReason::UnknownMarker);
    assert!(locator.is_transient_registered::<dyn Mixer>());
}

#[test]
fn test_builder_with_host_factory() {
    register_markers();

    let mut config = scoped_config(&[UI_MODULE]);
    config.lifecycle.execute_on_start = true;

    let (mut locator, report) = LocatorBuilder::new()
        .with_config(config)
        .with_factory(HostObjectFactory::new(InMemoryHost::new()))
        .build()
        .unwrap();

    assert_eq!(report.executed, 1);
    let host = locator.factory().host();
    let (_, container) = host.containers().next().unwrap();
    assert_eq!(container.name, "HudOverlay [Singleton]");

    locator.destroy();
    assert_eq!(locator.factory().host().live_count(), 0);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let mut config = LocatorConfig::default();
    config.logging.level = "verbose".to_string();

    let err = LocatorBuilder::new().with_config(config).build().unwrap_err();
    assert!(matches!(err, InfrastructureError::ConfigError { .. }));
}

#[test]
fn test_logging_config_from_section() {
    let section = LoggingSection {
        level: "warn".to_string(),
        json: true,
        show_target: false,
        show_location: true,
    };

    let config = LoggingConfig::from_section(&section);
    assert_eq!(config.level, tracing::Level::WARN);
    assert!(config.json_format);
    assert!(config.show_file && config.show_line_number);
    assert_eq!(LoggingConfig::production().level, tracing::Level::INFO);
    assert!(LoggingConfig::development().show_thread_ids);
}
