//! 服务生命周期管理

use serde::{Deserialize, Serialize};
use std::fmt;

/// 服务生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// 单例模式 - 在重置或销毁之前只创建一个实例
    Singleton,
    /// 瞬时模式 - 每次请求都创建新实例
    Transient,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::Singleton
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Singleton => f.write_str("Singleton"),
            Lifetime::Transient => f.write_str("Transient"),
        }
    }
}

/// 服务生命周期能力
///
/// 所有钩子都有空的默认实现，服务只需覆盖关心的钩子。
/// 钩子以 `&self` 调用，需要修改状态的服务自行使用内部可变性。
pub trait Service: Send + Sync + 'static {
    /// 实例首次被解析时调用，每个实例最多一次
    fn awake(&self) {}

    /// 场景切换时调用
    fn reset(&self) {}

    /// 实例被销毁时调用（应用退出，或场景切换时的上下文服务）
    fn destroy(&self) {}
}

/// 注册时声明的服务能力集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    /// 是否接收 awake / reset / destroy 钩子
    pub lifecycle: bool,
    /// 是否为上下文服务：场景切换时销毁并移除实例，但保留绑定
    pub context_scoped: bool,
}

impl Capabilities {
    /// 不具备任何能力
    pub const NONE: Self = Self {
        lifecycle: false,
        context_scoped: false,
    };

    /// 只具备生命周期能力
    pub const LIFECYCLE: Self = Self {
        lifecycle: true,
        context_scoped: false,
    };

    /// 上下文服务，隐含生命周期能力
    pub const CONTEXT: Self = Self {
        lifecycle: true,
        context_scoped: true,
    };
}

/// 具体类型所属的构造家族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ConcreteFamily {
    /// 普通对象，直接调用构造函数
    #[default]
    Plain,
    /// 宿主引擎管理的组件，需要先创建宿主容器对象再挂载
    HostComponent,
}

/// 单例绑定的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BindingState {
    /// 未注册
    Unbound,
    /// 已注册，尚无实例
    Bound,
    /// 已有实例，awake 尚未触发
    Realized,
    /// 已有实例，awake 已触发
    Awake,
}
