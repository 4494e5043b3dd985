//! 定位器配置定义

use crate::errors::ConfigError;
use crate::lifecycle::Lifetime;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 定位器启动配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// 日志配置
    pub logging: LoggingSection,
    /// 标记扫描配置
    pub scan: ScanSection,
    /// 启动阶段的生命周期行为
    pub lifecycle: LifecycleSection,
    /// 通过配置声明的额外绑定
    pub bindings: Vec<BindingConfig>,
}

impl LocatorConfig {
    /// 验证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !matches!(
            self.logging.level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            errors.push(format!("logging.level 无效: {}", self.logging.level));
        }

        for (index, binding) in self.bindings.iter().enumerate() {
            if binding.contract.trim().is_empty() {
                errors.push(format!("bindings[{index}].contract 不能为空"));
            }
            if binding.concrete.trim().is_empty() {
                errors.push(format!("bindings[{index}].concrete 不能为空"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            warn!("配置验证发现 {} 个问题", errors.len());
            Err(ConfigError::ValidationError {
                message: errors.join("; "),
            })
        }
    }
}

/// 日志配置节
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// 日志级别
    pub level: String,
    /// 是否使用 JSON 格式
    pub json: bool,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示文件名和行号
    pub show_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            show_target: true,
            show_location: false,
        }
    }
}

/// 标记扫描配置节
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// 只扫描这些模块路径前缀下的标记，为空时扫描全部
    pub modules: Vec<String>,
    /// 是否在启动时扫描单例标记
    pub enabled: Option<bool>,
}

impl ScanSection {
    /// 是否启用扫描，默认启用
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// 生命周期配置节
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleSection {
    /// 启动时立即实例化所有单例
    pub execute_on_start: bool,
    /// 启动时注入所有已登记的静态槽位
    pub inject_static_on_start: bool,
}

/// 配置中的单条绑定
///
/// `contract` 与 `concrete` 按类型简短名称（或完整路径）匹配目录中的标记。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// 契约类型名称
    pub contract: String,
    /// 具体类型名称
    pub concrete: String,
    /// 绑定生命周期
    #[serde(default)]
    pub lifetime: Lifetime,
}
