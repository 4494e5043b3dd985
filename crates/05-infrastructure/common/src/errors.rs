//! 错误类型定义

use thiserror::Error;

/// 构造失败时由具体类型返回的错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed { type_name: String, source: BoxError },

    #[error("组件类型不匹配: 期望 {expected}")]
    TypeMismatch { expected: String },

    #[error("宿主环境不可用, 无法创建宿主组件: {type_name}")]
    HostUnavailable { type_name: String },

    #[error("宿主操作失败: {operation}, 原因: {message}")]
    HostOperationFailed { operation: String, message: String },
}

impl DependencyError {
    /// 创建组件创建失败错误
    pub fn creation_failed(type_name: impl Into<String>, source: BoxError) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source,
        }
    }

    /// 创建宿主操作失败错误
    pub fn host_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HostOperationFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}
