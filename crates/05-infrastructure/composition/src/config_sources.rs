//! 配置源管理
//!
//! 使用 `config` crate 按顺序合并 TOML 文件与环境变量，后加入的源优先级更高。

use infrastructure_common::{ConfigError, LocatorConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 默认的环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "LOCATOR";

/// 配置源类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSourceType {
    /// TOML 文件
    Toml {
        /// 文件路径
        path: PathBuf,
        /// 文件不存在时是否报错
        required: bool,
    },
    /// 环境变量，嵌套键使用 `__` 分隔，例如 `LOCATOR__LOGGING__LEVEL`
    Environment {
        /// 变量前缀
        prefix: String,
    },
    /// 内联 TOML 文本
    Inline {
        /// 配置内容
        content: String,
    },
}

/// 定位器配置源集合
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    sources: Vec<ConfigSourceType>,
}

impl ConfigSources {
    /// 创建空的配置源集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加必需的 TOML 文件
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        debug!("添加 TOML 配置源: {}", path.as_ref().display());
        self.sources.push(ConfigSourceType::Toml {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// 添加可选的 TOML 文件
    pub fn add_optional_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        debug!("添加可选 TOML 配置源: {}", path.as_ref().display());
        self.sources.push(ConfigSourceType::Toml {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    /// 添加内联 TOML 文本
    pub fn add_inline_toml<S: Into<String>>(mut self, content: S) -> Self {
        self.sources.push(ConfigSourceType::Inline {
            content: content.into(),
        });
        self
    }

    /// 添加环境变量配置源
    pub fn add_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        debug!("添加环境变量配置源，前缀: {}", prefix);
        self.sources.push(ConfigSourceType::Environment { prefix });
        self
    }

    /// 已添加的配置源
    pub fn sources(&self) -> &[ConfigSourceType] {
        &self.sources
    }

    /// 合并全部配置源并验证
    pub fn load(&self) -> Result<LocatorConfig, ConfigError> {
        let mut builder = config::Config::builder();

        for source in &self.sources {
            builder = match source {
                ConfigSourceType::Toml { path, required } => {
                    if *required && !path.exists() {
                        return Err(ConfigError::FileNotFound {
                            path: path.display().to_string(),
                        });
                    }
                    builder.add_source(
                        config::File::from(path.as_path())
                            .format(config::FileFormat::Toml)
                            .required(*required),
                    )
                }
                ConfigSourceType::Environment { prefix } => builder.add_source(
                    config::Environment::with_prefix(prefix)
                        .separator("__")
                        .try_parsing(true),
                ),
                ConfigSourceType::Inline { content } => builder.add_source(config::File::from_str(
                    content,
                    config::FileFormat::Toml,
                )),
            };
        }

        let settings = builder.build().map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;
        let config: LocatorConfig = settings.try_deserialize().map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;

        config.validate()?;
        info!(
            "配置加载完成: {} 个配置源, {} 条绑定",
            self.sources.len(),
            config.bindings.len()
        );
        Ok(config)
    }
}

/// 从单个 TOML 文件加载配置，并叠加默认前缀的环境变量
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<LocatorConfig, ConfigError> {
    ConfigSources::new()
        .add_toml_file(path)
        .add_env_vars(DEFAULT_ENV_PREFIX)
        .load()
}
