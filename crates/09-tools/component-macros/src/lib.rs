//! # Component Macros
//!
//! 这个 crate 提供了用于声明式服务注册和字段注入的过程宏。
//!
//! ## 核心宏
//!
//! - [`register_singleton`] - 单例注册标记
//! - [`Inject`] - 实例字段注入
//! - [`inject_static`] - 静态槽位注入
//!
//! 生成的代码引用 `di_impl` 与 `ctor`，使用方需要同时依赖这两个 crate。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{inject_static, register_singleton, Inject};
//! use di_impl::{Service, StaticSlot};
//! use std::sync::Arc;
//!
//! pub trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! #[derive(Default)]
//! #[register_singleton(dyn Logger, lifecycle)]
//! pub struct ConsoleLogger;
//!
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) {
//!         println!("{message}");
//!     }
//! }
//!
//! impl Service for ConsoleLogger {}
//!
//! #[derive(Default, Inject)]
//! pub struct Player {
//!     #[inject]
//!     logger: Option<Arc<dyn Logger>>,
//! }
//!
//! #[inject_static]
//! static LOGGER: StaticSlot<dyn Logger> = StaticSlot::new();
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod inject;
mod register;
mod utils;

/// 单例注册宏
///
/// 为结构体生成描述符函数，并在程序启动时把注册标记提交到全局目录。
/// 结构体需要实现 `Default`。
///
/// # 参数
///
/// - 第一个参数可以是契约类型（例如 `dyn Logger`），缺省时注册为自身
/// - `lifecycle` - 接收 awake / reset / destroy 钩子，需要实现 `Service`
/// - `context` - 上下文服务，场景切换时销毁重建，隐含 `lifecycle`
/// - `host_component` - 宿主组件，需要宿主对象工厂
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Default)]
/// #[register_singleton(dyn Logger, lifecycle)]
/// pub struct ConsoleLogger;
/// ```
#[proc_macro_attribute]
pub fn register_singleton(args: TokenStream, input: TokenStream) -> TokenStream {
    register::register_singleton_impl(args, input)
}

/// 字段注入派生宏
///
/// 为标记了 `#[inject]` 的 `Option<Arc<T>>` 字段生成 `InjectionTarget` 实现。
#[proc_macro_derive(Inject, attributes(inject))]
pub fn derive_inject(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    inject::derive_inject_impl(input)
}

/// 静态槽位注入宏
///
/// 用于 `static NAME: StaticSlot<T> = StaticSlot::new();`，在程序启动时登记槽位。
#[proc_macro_attribute]
pub fn inject_static(args: TokenStream, input: TokenStream) -> TokenStream {
    inject::inject_static_impl(args, input)
}
