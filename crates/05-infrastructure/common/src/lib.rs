//! # Infrastructure Common
//!
//! 这个 crate 提供了服务定位器各层共用的类型和工具。
//!
//! ## 核心内容
//!
//! - [`Service`] - 服务生命周期能力（awake / reset / destroy）
//! - [`Capabilities`] - 注册时声明的能力集合
//! - [`Lifetime`] - 单例与瞬时生命周期
//! - [`TypeInfo`] - 契约与具体类型的元数据
//! - [`LocatorConfig`] - 启动配置
//!
//! ## 设计原则
//!
//! - 能力在注册时显式声明，不做运行时类型转换
//! - 单线程、同步的生命周期模型
//! - 错误使用 `thiserror` 定义的枚举传播

pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
