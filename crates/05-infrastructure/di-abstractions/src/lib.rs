//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义服务注册、对象创建、标记扫描和字段注入的核心接口。
//!
//! ## 核心接口
//!
//! - [`ServiceDescriptor`] - 类型擦除的服务描述符
//! - [`ObjectFactory`] - 对象工厂接口
//! - [`HostEnvironment`] - 宿主环境接口
//! - [`AttributeScanner`] - 注册标记扫描器接口
//! - [`InjectionTarget`] - 字段注入目标接口
//! - [`LifecycleNotifier`] - 宿主生命周期事件接口

pub mod events;
pub mod factory;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use events::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
