use component_macros::{inject_static, register_singleton, Inject};
use di_impl::{Locator, Service, StaticSlot};
use std::sync::Arc;

pub trait Audio: Send + Sync {
    fn volume(&self) -> u8;
}

#[derive(Default)]
#[register_singleton(dyn Audio, lifecycle, host_component)]
pub struct Mixer;

impl Audio for Mixer {
    fn volume(&self) -> u8 {
        7
    }
}

impl Service for Mixer {}

#[derive(Default, Inject)]
struct Speaker {
    #[inject]
    audio: Option<Arc<dyn Audio>>,
}

#[inject_static]
static AUDIO: StaticSlot<dyn Audio> = StaticSlot::new();

fn main() {
    let mut locator = Locator::new();
    let mut speaker = Speaker::default();
    // 普通工厂无法构造宿主组件，未注册时字段保持为空
    assert_eq!(locator.inject(&mut speaker, false).unwrap(), 0);
    assert!(speaker.audio.is_none());
    assert!(AUDIO.get().is_none());
}
