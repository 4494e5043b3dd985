//! 宿主生命周期事件

use serde::Serialize;
use std::collections::VecDeque;

/// 宿主发出的生命周期事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HostEvent {
    /// 新场景加载完成
    SceneLoaded {
        /// 场景名称
        scene: String,
    },
    /// 应用退出
    ApplicationQuit,
}

/// 生命周期通知器 trait
///
/// 宿主事件按发生顺序逐个取出，定位器在主线程上处理。
pub trait LifecycleNotifier {
    /// 取出下一个待处理事件
    fn poll_event(&mut self) -> Option<HostEvent>;
}

/// 简单的宿主事件队列
#[derive(Debug, Default)]
pub struct HostEventQueue {
    pending: VecDeque<HostEvent>,
}

impl HostEventQueue {
    /// 创建空队列
    pub fn new() -> Self {
        Self::default()
    }

    /// 宿主侧：推入场景加载事件
    pub fn scene_loaded(&mut self, scene: impl Into<String>) {
        self.pending.push_back(HostEvent::SceneLoaded {
            scene: scene.into(),
        });
    }

    /// 宿主侧：推入应用退出事件
    pub fn application_quit(&mut self) {
        self.pending.push_back(HostEvent::ApplicationQuit);
    }

    /// 待处理事件数量
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// 队列是否为空
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl LifecycleNotifier for HostEventQueue {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.pending.pop_front()
    }
}
