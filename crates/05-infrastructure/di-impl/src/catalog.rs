//! 全局标记目录
//!
//! `#[register_singleton]` 与 `#[inject_static]` 生成的构造器在程序启动时
//! 把标记提交到这里，扫描器再按模块范围取出。

use crate::slot::StaticSlot;
use di_abstractions::{module_in_scope, AttributeScanner, ServiceMarker, StaticField};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;

/// 登记的静态注入槽位
#[derive(Clone, Copy)]
pub struct StaticFieldEntry {
    /// 槽位
    pub field: &'static dyn StaticField,
    /// 槽位名称
    pub name: &'static str,
    /// 槽位所在模块
    pub module_path: &'static str,
}

impl fmt::Debug for StaticFieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticFieldEntry")
            .field("name", &self.name)
            .field("module_path", &self.module_path)
            .field("contract", &self.field.contract().module_path)
            .finish()
    }
}

#[derive(Default)]
struct Catalog {
    markers: Vec<ServiceMarker>,
    static_fields: Vec<StaticFieldEntry>,
}

/// 全局标记目录
static GLOBAL_MARKER_CATALOG: Lazy<RwLock<Catalog>> = Lazy::new(|| RwLock::new(Catalog::default()));

/// 提交单例注册标记
pub fn submit(marker: ServiceMarker) {
    GLOBAL_MARKER_CATALOG.write().markers.push(marker);
}

/// 提交静态注入槽位
pub fn submit_static_field<A>(field: &'static StaticSlot<A>, name: &'static str, module_path: &'static str)
where
    A: ?Sized + Send + Sync + 'static,
{
    GLOBAL_MARKER_CATALOG.write().static_fields.push(StaticFieldEntry {
        field,
        name,
        module_path,
    });
}

/// 已提交的全部标记
pub fn markers() -> Vec<ServiceMarker> {
    GLOBAL_MARKER_CATALOG.read().markers.clone()
}

/// 已提交的全部静态槽位
pub fn static_fields() -> Vec<StaticFieldEntry> {
    GLOBAL_MARKER_CATALOG.read().static_fields.clone()
}

fn in_scope(modules: &[String], module_path: &str) -> bool {
    modules.is_empty() || modules.iter().any(|prefix| module_in_scope(module_path, prefix))
}

/// 基于全局目录的扫描器
///
/// 模块列表为空时扫描整个程序，否则只取列表中模块（及其子模块）内的标记。
#[derive(Debug, Clone, Default)]
pub struct CatalogScanner {
    modules: Vec<String>,
}

impl CatalogScanner {
    /// 扫描整个程序
    pub fn new() -> Self {
        Self::default()
    }

    /// 限定扫描的模块
    pub fn with_modules<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: modules.into_iter().map(Into::into).collect(),
        }
    }

    /// 扫描范围
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// 范围内的静态槽位
    pub fn static_fields(&self) -> Vec<StaticFieldEntry> {
        static_fields()
            .into_iter()
            .filter(|entry| in_scope(&self.modules, entry.module_path))
            .collect()
    }
}

impl AttributeScanner for CatalogScanner {
    fn scan(&self) -> Vec<ServiceMarker> {
        markers()
            .into_iter()
            .filter(|marker| in_scope(&self.modules, marker.module_path))
            .collect()
    }

    fn name(&self) -> &str {
        "catalog"
    }
}

/// 显式给出标记列表的扫描器
#[derive(Debug, Clone, Default)]
pub struct MarkerList {
    markers: Vec<ServiceMarker>,
}

impl MarkerList {
    /// 创建扫描器
    pub fn new(markers: Vec<ServiceMarker>) -> Self {
        Self { markers }
    }
}

impl AttributeScanner for MarkerList {
    fn scan(&self) -> Vec<ServiceMarker> {
        self.markers.clone()
    }

    fn name(&self) -> &str {
        "list"
    }
}
