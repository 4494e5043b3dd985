//! # 服务定位器实现
//!
//! 提供具体的服务定位器、对象工厂、全局标记目录和静态注入槽位。
//!
//! ## 快速开始
//!
//! ```rust
//! use di_impl::{Locator, ServiceDescriptor};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! #[derive(Default)]
//! struct ConsoleLogger;
//!
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) {
//!         println!("{message}");
//!     }
//! }
//!
//! let mut locator = Locator::new();
//! locator.register_singleton(ServiceDescriptor::bind::<dyn Logger, ConsoleLogger>(|c| c));
//!
//! let first = locator.resolve::<dyn Logger>().unwrap().unwrap();
//! let second = locator.resolve::<dyn Logger>().unwrap().unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

pub mod catalog;
pub mod factory;
pub mod locator;
pub mod slot;

pub use catalog::{CatalogScanner, MarkerList, StaticFieldEntry};
pub use factory::{HostContainer, HostObjectFactory, InMemoryHost, PlainObjectFactory};
pub use locator::{BindingView, Locator, LocatorSnapshot, ResetReport};
pub use slot::StaticSlot;

// 宏生成的代码只依赖本 crate
pub use di_abstractions::*;
pub use infrastructure_common::{
    BindingState, Capabilities, ConcreteFamily, DependencyError, Lifetime, Service, TypeInfo,
};

#[doc(hidden)]
pub mod __private {
    pub use crate::catalog::{submit, submit_static_field};
}
