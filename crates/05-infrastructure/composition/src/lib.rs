//! # 启动组合层
//!
//! 负责把配置、日志、标记扫描和服务定位器组合成可运行的启动流程。
//!
//! ## 主要功能
//!
//! - **定位器构建器**: 使用构建者模式组装服务定位器
//! - **配置源管理**: 合并 TOML 文件与环境变量
//! - **启动流程**: 扫描标记、应用配置绑定、注入静态槽位、启动单例
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{LocatorBuilder, LoggingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (mut locator, report) = LocatorBuilder::new()
//!         .with_config_file("config/locator.toml")?
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!
//!     println!("注册了 {} 个单例", report.scan.registered.len());
//!
//!     // 应用退出
//!     locator.destroy();
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod builder;
pub mod config_sources;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use bootstrapper::{apply_bindings, BootstrapReport, Bootstrapper};
pub use builder::{initialize_logging, LocatorBuilder, LoggingConfig};
pub use config_sources::{load_config_file, ConfigSourceType, ConfigSources, DEFAULT_ENV_PREFIX};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
