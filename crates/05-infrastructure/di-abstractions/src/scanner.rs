//! 标记扫描器抽象接口
//!
//! 声明式注册标记在程序启动时登记到目录中，扫描器负责把它们交给定位器。

use crate::registry::ServiceDescriptor;
use infrastructure_common::TypeInfo;
use serde::Serialize;
use std::fmt;

/// 单例注册标记
///
/// 由 `#[register_singleton]` 生成，也可以手工提交。
#[derive(Clone, Copy)]
pub struct ServiceMarker {
    /// 具体类型完整路径
    pub concrete: &'static str,
    /// 契约类型完整路径
    pub contract: &'static str,
    /// 标记所在模块
    pub module_path: &'static str,
    /// 构建描述符
    pub describe: fn() -> ServiceDescriptor,
}

impl fmt::Debug for ServiceMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceMarker")
            .field("concrete", &self.concrete)
            .field("contract", &self.contract)
            .field("module_path", &self.module_path)
            .finish()
    }
}

impl ServiceMarker {
    /// 标记是否位于指定模块前缀之下
    pub fn in_module(&self, prefix: &str) -> bool {
        module_in_scope(self.module_path, prefix)
    }
}

/// 模块路径是否位于前缀之下，按 `::` 分段比较
pub fn module_in_scope(module_path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches("::");
    module_path == prefix
        || module_path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// 标记扫描器 trait
pub trait AttributeScanner {
    /// 扫描标记
    fn scan(&self) -> Vec<ServiceMarker>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}

/// 标记被跳过的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// 同一契约与具体类型的标记重复出现
    Duplicate,
    /// 描述符不是单例
    NotSingleton,
    /// 标记声明的类型与描述符不一致
    ContractMismatch,
    /// 找不到配置引用的标记
    UnknownMarker,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::Duplicate => "重复标记",
            SkipReason::NotSingleton => "非单例描述符",
            SkipReason::ContractMismatch => "标记与描述符类型不一致",
            SkipReason::UnknownMarker => "未知标记",
        };
        f.write_str(text)
    }
}

/// 被跳过的标记
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedMarker {
    /// 契约类型名称
    pub contract: String,
    /// 具体类型名称
    pub concrete: String,
    /// 跳过原因
    pub reason: SkipReason,
}

/// 扫描报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// 成功注册的契约类型
    pub registered: Vec<TypeInfo>,
    /// 被跳过的标记
    pub skipped: Vec<SkippedMarker>,
}

impl ScanReport {
    /// 是否没有跳过任何标记
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// 合并另一份报告
    pub fn merge(&mut self, other: ScanReport) {
        self.registered.extend(other.registered);
        self.skipped.extend(other.skipped);
    }
}
