//! 定位器构建器

use crate::bootstrapper::{BootstrapReport, Bootstrapper};
use crate::config_sources::ConfigSources;
use di_abstractions::{AttributeScanner, ObjectFactory};
use di_impl::{Locator, PlainObjectFactory};
use infrastructure_common::{InfrastructureError, LocatorConfig, LoggingSection};
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 定位器构建器
///
/// 使用建造者模式完成启动流程：初始化日志、扫描标记、应用配置绑定、
/// 注入静态槽位、按需启动全部单例。
pub struct LocatorBuilder<F: ObjectFactory = PlainObjectFactory> {
    /// 定位器配置
    config: LocatorConfig,
    /// 额外的标记扫描器
    scanners: Vec<Box<dyn AttributeScanner>>,
    /// 对象工厂
    factory: F,
    /// 日志配置，`None` 时不初始化日志
    logging: Option<LoggingConfig>,
}

impl LocatorBuilder<PlainObjectFactory> {
    /// 创建新的定位器构建器
    pub fn new() -> Self {
        Self {
            config: LocatorConfig::default(),
            scanners: Vec::new(),
            factory: PlainObjectFactory,
            logging: None,
        }
    }
}

impl Default for LocatorBuilder<PlainObjectFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ObjectFactory> LocatorBuilder<F> {
    /// 使用已加载的配置
    pub fn with_config(mut self, config: LocatorConfig) -> Self {
        self.config = config;
        self
    }

    /// 从 TOML 文件加载配置，环境变量可覆盖文件中的值
    pub fn with_config_file<P: AsRef<Path>>(self, path: P) -> Result<Self, InfrastructureError> {
        info!("加载配置文件: {}", path.as_ref().display());
        let config = crate::config_sources::load_config_file(path)?;
        Ok(self.with_config(config))
    }

    /// 从配置源集合加载配置
    pub fn with_config_sources(self, sources: &ConfigSources) -> Result<Self, InfrastructureError> {
        let config = sources.load()?;
        Ok(self.with_config(config))
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// 按配置文件中的 `logging` 节初始化日志
    pub fn with_configured_logging(mut self) -> Self {
        self.logging = Some(LoggingConfig::from_section(&self.config.logging));
        self
    }

    /// 添加标记扫描器，在全局目录之后执行
    pub fn with_scanner<S: AttributeScanner + 'static>(mut self, scanner: S) -> Self {
        debug!("添加标记扫描器: {}", scanner.name());
        self.scanners.push(Box::new(scanner));
        self
    }

    /// 替换对象工厂
    pub fn with_factory<G: ObjectFactory>(self, factory: G) -> LocatorBuilder<G> {
        debug!("使用对象工厂: {}", factory.name());
        LocatorBuilder {
            config: self.config,
            scanners: self.scanners,
            factory,
            logging: self.logging,
        }
    }

    /// 当前配置
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// 构建定位器
    pub fn build(self) -> Result<(Locator<F>, BootstrapReport), InfrastructureError> {
        // 未配置日志时不初始化 subscriber
        if let Some(logging) = &self.logging {
            initialize_logging(logging)?;
        }

        info!("开始构建服务定位器");
        self.config.validate()?;

        let mut locator = Locator::with_factory(self.factory);
        let report = Bootstrapper::new(&self.config, &self.scanners).run(&mut locator)?;

        info!("服务定位器构建完成");
        Ok((locator, report))
    }
}

/// 初始化日志系统
///
/// `RUST_LOG` 存在时优先于配置中的级别。
pub fn initialize_logging(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 从配置节转换，无法识别的级别按 INFO 处理
    pub fn from_section(section: &LoggingSection) -> Self {
        Self {
            level: section.level.parse().unwrap_or(tracing::Level::INFO),
            show_target: section.show_target,
            show_thread_ids: false,
            show_file: section.show_location,
            show_line_number: section.show_location,
            json_format: section.json,
        }
    }
}
