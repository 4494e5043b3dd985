//! 场景切换示例
//!
//! 演示标记注册、配置绑定、宿主组件、字段注入和场景切换时的上下文服务重建

use component_macros::{inject_static, Inject};
use di_impl::{HostEventQueue, HostObjectFactory, InMemoryHost, StaticSlot};
use game::{AudioMixer, GameLog, LevelScore};
use infrastructure_composition::{ConfigSources, LocatorBuilder, LoggingConfig};
use std::sync::Arc;
use tracing::info;

/// 参与扫描的玩法服务
mod game {
    use component_macros::register_singleton;
    use di_impl::Service;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tracing::info;

    /// 日志服务
    pub trait GameLog: Send + Sync {
        fn write(&self, line: &str);
    }

    #[derive(Default)]
    #[register_singleton(dyn GameLog, lifecycle)]
    pub struct ConsoleLog;

    impl GameLog for ConsoleLog {
        fn write(&self, line: &str) {
            println!("[game] {line}");
        }
    }

    impl Service for ConsoleLog {
        fn awake(&self) {
            info!("ConsoleLog 已就绪");
        }
    }

    /// 音频混音器，挂在宿主容器上
    pub trait AudioMixer: Send + Sync {
        fn play(&self, clip: &str) -> u32;
    }

    #[derive(Default)]
    #[register_singleton(dyn AudioMixer, lifecycle, host_component)]
    pub struct HostMixer {
        played: AtomicU32,
    }

    impl AudioMixer for HostMixer {
        fn play(&self, clip: &str) -> u32 {
            info!("播放音效: {}", clip);
            self.played.fetch_add(1, Ordering::SeqCst) + 1
        }
    }

    impl Service for HostMixer {
        fn destroy(&self) {
            info!("HostMixer 销毁, 共播放 {} 次", self.played.load(Ordering::SeqCst));
        }
    }

    /// 关卡计分，每个场景重新开始
    #[derive(Default)]
    #[register_singleton(context)]
    pub struct LevelScore {
        points: AtomicU32,
    }

    impl LevelScore {
        pub fn add(&self, points: u32) -> u32 {
            self.points.fetch_add(points, Ordering::SeqCst) + points
        }
    }

    impl Service for LevelScore {
        fn reset(&self) {
            info!("LevelScore 收到场景切换通知");
        }

        fn destroy(&self) {
            info!("LevelScore 结算: {} 分", self.points.load(Ordering::SeqCst));
        }
    }
}

mod tools {
    use component_macros::register_singleton;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// 不在扫描范围内，由配置文件按名称绑定为瞬时服务
    #[derive(Default)]
    #[register_singleton]
    pub struct FrameCounter {
        frames: AtomicU32,
    }

    impl FrameCounter {
        pub fn tick(&self) -> u32 {
            self.frames.fetch_add(1, Ordering::SeqCst) + 1
        }
    }
}

#[derive(Default, Inject)]
struct Player {
    #[inject]
    log: Option<Arc<dyn GameLog>>,
    #[inject]
    mixer: Option<Arc<dyn AudioMixer>>,
    #[inject]
    score: Option<Arc<LevelScore>>,
}

impl Player {
    fn collect_coin(&self) -> Result<(), Box<dyn std::error::Error>> {
        let (Some(log), Some(mixer), Some(score)) = (&self.log, &self.mixer, &self.score) else {
            return Err("Player 的依赖尚未注入".into());
        };
        mixer.play("coin.wav");
        log.write(&format!("金币 +10, 当前 {} 分", score.add(10)));
        Ok(())
    }
}

#[inject_static]
static LOG: StaticSlot<dyn GameLog> = StaticSlot::new();

const DEMO_CONFIG: &str = r#"
[logging]
level = "debug"

[scan]
modules = ["scene_demo::game"]

[lifecycle]
execute_on_start = true
inject_static_on_start = true

[[bindings]]
contract = "FrameCounter"
concrete = "scene_demo::tools::FrameCounter"
lifetime = "transient"
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sources = ConfigSources::new()
        .add_inline_toml(DEMO_CONFIG)
        .add_env_vars("SCENE_DEMO");

    let (mut locator, report) = LocatorBuilder::new()
        .with_config_sources(&sources)?
        .with_logging(LoggingConfig::development())
        .with_factory(HostObjectFactory::new(InMemoryHost::new()))
        .build()?;

    info!(
        "启动完成: {} 个单例, {} 个静态槽位, {} 个实例已创建",
        report.scan.registered.len(),
        report.static_fields,
        report.executed
    );
    for skipped in report.skipped() {
        info!("跳过标记 {} -> {}: {}", skipped.contract, skipped.concrete, skipped.reason);
    }

    if let Some(log) = LOG.get() {
        log.write("静态日志槽位已注入");
    }

    let mut player = Player::default();
    locator.inject(&mut player, false)?;
    player.collect_coin()?;
    player.collect_coin()?;

    // 瞬时服务每次解析都是新实例
    let first = locator.resolve_required::<tools::FrameCounter>()?;
    let second = locator.resolve_required::<tools::FrameCounter>()?;
    info!("帧计数器: {} / {}", first.tick(), second.tick());

    // 宿主加载新场景，上下文服务被销毁，下次解析时重建
    let mut events = HostEventQueue::new();
    events.scene_loaded("level-2");
    locator.pump(&mut events);

    let mut player = Player::default();
    locator.inject(&mut player, false)?;
    player.collect_coin()?;

    for (id, container) in locator.factory().host().containers() {
        info!("宿主容器 {}: {:?}", id, container);
    }
    println!("{}", locator.snapshot().to_json()?);

    events.application_quit();
    locator.pump(&mut events);
    info!(
        "宿主容器剩余 {} 个, 已销毁 {:?}",
        locator.factory().host().live_count(),
        locator.factory().host().destroyed()
    );
    Ok(())
}
