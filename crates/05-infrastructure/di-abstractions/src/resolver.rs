//! 依赖解析与字段注入抽象
//!
//! 注入目标不依赖反射：`#[derive(Inject)]` 为标记了 `#[inject]` 的字段
//! 生成 [`InjectionTarget`] 实现，逐个把字段交给 [`Injector`]。

use crate::registry::ResolvedHandle;
use infrastructure_common::{DependencyError, TypeInfo};
use std::sync::Arc;

/// 解析选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// 只返回已存在的实例，不构造
    pub only_existing: bool,
    /// 是否触发一次性的 awake 通知
    pub notify_awake: bool,
}

impl ResolveOptions {
    /// 按需构造并触发 awake
    pub const fn create() -> Self {
        Self {
            only_existing: false,
            notify_awake: true,
        }
    }

    /// 只取已存在的实例
    pub const fn existing() -> Self {
        Self {
            only_existing: true,
            notify_awake: true,
        }
    }

    /// 按需构造，但把 awake 推迟给调用方统一触发
    pub const fn deferred_awake() -> Self {
        Self {
            only_existing: false,
            notify_awake: false,
        }
    }

    /// 从 `only_existing` 标志创建
    pub const fn from_only_existing(only_existing: bool) -> Self {
        Self {
            only_existing,
            notify_awake: true,
        }
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::create()
    }
}

/// 一次类型擦除解析的结果
#[derive(Debug)]
pub struct Resolution {
    /// 契约类型的句柄
    pub handle: ResolvedHandle,
    /// 是否来自单例绑定
    pub singleton: bool,
}

/// 类型擦除的解析器
///
/// 泛型的 `resolve::<A>()` 无法作为 trait object 使用，注入流程通过这个接口按 `TypeId` 解析。
pub trait ErasedResolver {
    /// 按契约类型解析
    fn resolve_erased(
        &mut self,
        contract: &TypeInfo,
        options: ResolveOptions,
    ) -> Result<Option<Resolution>, DependencyError>;
}

/// 字段注入器
pub struct Injector<'a> {
    resolver: &'a mut dyn ErasedResolver,
    options: ResolveOptions,
    assigned: usize,
}

impl<'a> Injector<'a> {
    /// 创建注入器
    pub fn new(resolver: &'a mut dyn ErasedResolver, options: ResolveOptions) -> Self {
        Self {
            resolver,
            options,
            assigned: 0,
        }
    }

    /// 注入一个字段
    ///
    /// 契约已绑定时赋值并返回 `true`；未绑定时保持字段原样。
    pub fn field<A>(&mut self, slot: &mut Option<Arc<A>>) -> Result<bool, DependencyError>
    where
        A: ?Sized + Send + Sync + 'static,
    {
        let contract = TypeInfo::of::<A>();
        let Some(resolution) = self.resolver.resolve_erased(&contract, self.options)? else {
            return Ok(false);
        };

        let value = resolution
            .handle
            .downcast::<A>()
            .map_err(|_| DependencyError::TypeMismatch {
                expected: contract.module_path.clone(),
            })?;

        *slot = Some(value);
        self.assigned += 1;
        Ok(true)
    }

    /// 已赋值的字段数量
    pub fn assigned(&self) -> usize {
        self.assigned
    }
}

/// 可注入字段的目标
pub trait InjectionTarget {
    /// 把所有 `#[inject]` 字段交给注入器
    fn inject_fields(&mut self, injector: &mut Injector<'_>) -> Result<(), DependencyError>;
}

/// 进程级的静态注入槽位
pub trait StaticField: Send + Sync {
    /// 槽位的契约类型
    fn contract(&self) -> TypeInfo;

    /// 写入解析结果，类型不符时返回 `false`
    fn assign(&self, handle: ResolvedHandle) -> bool;
}
