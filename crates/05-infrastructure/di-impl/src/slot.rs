//! 静态注入槽位

use di_abstractions::{ResolvedHandle, StaticField};
use infrastructure_common::TypeInfo;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// 进程级的服务槽位
///
/// 声明为 `static`，由 `#[inject_static]` 登记到全局目录，
/// 调用 `Locator::inject_static_from_catalog` 时写入。
///
/// ```rust
/// use di_impl::StaticSlot;
///
/// trait Clock: Send + Sync {}
///
/// static CLOCK: StaticSlot<dyn Clock> = StaticSlot::new();
/// assert!(CLOCK.get().is_none());
/// ```
pub struct StaticSlot<A: ?Sized + 'static> {
    value: RwLock<Option<Arc<A>>>,
}

impl<A: ?Sized + Send + Sync + 'static> StaticSlot<A> {
    /// 创建空槽位
    pub const fn new() -> Self {
        Self {
            value: parking_lot::const_rwlock(None),
        }
    }

    /// 当前值
    pub fn get(&self) -> Option<Arc<A>> {
        self.value.read().clone()
    }

    /// 是否已写入
    pub fn is_set(&self) -> bool {
        self.value.read().is_some()
    }

    /// 手动写入
    pub fn set(&self, value: Arc<A>) {
        *self.value.write() = Some(value);
    }

    /// 清空槽位
    pub fn clear(&self) {
        self.value.write().take();
    }
}

impl<A: ?Sized + Send + Sync + 'static> Default for StaticSlot<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized + Send + Sync + 'static> StaticField for StaticSlot<A> {
    fn contract(&self) -> TypeInfo {
        TypeInfo::of::<A>()
    }

    fn assign(&self, handle: ResolvedHandle) -> bool {
        match handle.downcast::<A>() {
            Ok(value) => {
                self.set(value);
                true
            }
            Err(_) => false,
        }
    }
}

impl<A: ?Sized + 'static> fmt::Debug for StaticSlot<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSlot")
            .field("contract", &std::any::type_name::<A>())
            .field("set", &self.value.read().is_some())
            .finish()
    }
}
