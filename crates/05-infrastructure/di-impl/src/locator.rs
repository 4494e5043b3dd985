//! 服务定位器
//!
//! 定位器维护三张表：单例绑定、瞬时绑定和已实例化的单例。
//! 单例在首次解析时构造并缓存，瞬时绑定每次解析都构造新对象。
//!
//! 所有操作都在宿主主线程上执行，因此采用 `&mut self` 而不是内部锁。

use crate::catalog::CatalogScanner;
use crate::factory::PlainObjectFactory;
use di_abstractions::{
    AttributeScanner, ErasedResolver, HostEvent, HostObjectId, InjectionTarget, Injector,
    LifecycleNotifier, ObjectFactory, Resolution, ResolveOptions, ScanReport, ServiceDescriptor,
    ServiceInstance, SkipReason, SkippedMarker, StaticField,
};
use infrastructure_common::{
    BindingState, Capabilities, ConcreteFamily, ConfigError, DependencyError, Lifetime, TypeInfo,
};
use serde::Serialize;
use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 已实例化的单例
struct RealizedInstance {
    instance: ServiceInstance,
    capabilities: Capabilities,
    awake: bool,
}

/// 场景切换的处理结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResetReport {
    /// 收到 reset 通知的实例数量
    pub notified: usize,
    /// 被销毁并移除的上下文服务
    pub evicted: Vec<TypeInfo>,
    /// 被清空的瞬时绑定数量
    pub transient_bindings_dropped: usize,
    /// 被销毁的瞬时宿主容器数量
    pub transient_containers_released: usize,
}

/// 单条绑定的视图
#[derive(Debug, Clone, Serialize)]
pub struct BindingView {
    /// 契约类型
    pub contract: TypeInfo,
    /// 具体类型
    pub concrete: TypeInfo,
    /// 能力集合
    pub capabilities: Capabilities,
    /// 构造家族
    pub family: ConcreteFamily,
    /// 绑定状态
    pub state: BindingState,
    /// 挂载的宿主容器
    pub host_object: Option<HostObjectId>,
}

/// 定位器快照，用于诊断输出
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocatorSnapshot {
    /// 工厂名称
    pub factory: String,
    /// 单例绑定，按契约路径排序
    pub singletons: Vec<BindingView>,
    /// 瞬时绑定，按契约路径排序
    pub transients: Vec<BindingView>,
}

impl LocatorSnapshot {
    /// 已实例化的单例数量
    pub fn realized_count(&self) -> usize {
        self.singletons
            .iter()
            .filter(|view| matches!(view.state, BindingState::Realized | BindingState::Awake))
            .count()
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 服务定位器
pub struct Locator<F: ObjectFactory = PlainObjectFactory> {
    singletons: HashMap<TypeId, ServiceDescriptor>,
    transients: HashMap<TypeId, ServiceDescriptor>,
    instances: HashMap<TypeId, RealizedInstance>,
    transient_containers: Vec<HostObjectId>,
    factory: F,
}

impl Locator<PlainObjectFactory> {
    /// 创建使用普通对象工厂的定位器
    pub fn new() -> Self {
        Self::with_factory(PlainObjectFactory)
    }
}

impl Default for Locator<PlainObjectFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ObjectFactory> fmt::Debug for Locator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("factory", &self.factory.name())
            .field("singletons", &self.singletons.len())
            .field("transients", &self.transients.len())
            .field("instances", &self.instances.len())
            .field("transient_containers", &self.transient_containers.len())
            .finish()
    }
}

impl<F: ObjectFactory> Locator<F> {
    /// 使用指定对象工厂创建定位器
    pub fn with_factory(factory: F) -> Self {
        Self {
            singletons: HashMap::new(),
            transients: HashMap::new(),
            instances: HashMap::new(),
            transient_containers: Vec::new(),
            factory,
        }
    }

    /// 对象工厂
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// 可变对象工厂
    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    // ---- 注册 ----

    /// 按描述符声明的生命周期注册
    pub fn register(&mut self, descriptor: impl Into<ServiceDescriptor>) {
        let descriptor: ServiceDescriptor = descriptor.into();
        match descriptor.lifetime() {
            Lifetime::Singleton => self.register_singleton(descriptor),
            Lifetime::Transient => self.register_transient(descriptor),
        }
    }

    /// 注册单例绑定
    ///
    /// 重复注册会替换旧绑定；旧绑定已有实例时先把它销毁。
    pub fn register_singleton(&mut self, descriptor: impl Into<ServiceDescriptor>) {
        let descriptor: ServiceDescriptor = descriptor.into();
        let descriptor = descriptor.with_lifetime(Lifetime::Singleton);
        let key = descriptor.contract().id;

        if self.transients.contains_key(&key) {
            warn!(
                "契约同时存在瞬时绑定, 单例绑定优先: {}",
                descriptor.contract().module_path
            );
        }
        if self.evict(key, true) {
            warn!("单例绑定被替换, 旧实例已销毁: {}", descriptor.contract().module_path);
        }

        info!(
            "注册单例: {} -> {}",
            descriptor.contract().short_name(),
            descriptor.concrete().short_name()
        );
        self.singletons.insert(key, descriptor);
    }

    /// 以默认构造的具体类型 `C` 注册契约 `A` 的单例
    pub fn register_singleton_as<A, C>(&mut self, upcast: impl Fn(Arc<C>) -> Arc<A> + Send + Sync + 'static)
    where
        A: ?Sized + Send + Sync + 'static,
        C: Default + Send + Sync + 'static,
    {
        self.register_singleton(ServiceDescriptor::bind::<A, C>(upcast));
    }

    /// 把具体类型 `C` 注册为它自己的单例
    pub fn register_singleton_self<C>(&mut self)
    where
        C: Default + Send + Sync + 'static,
    {
        self.register_singleton(ServiceDescriptor::of::<C>());
    }

    /// 注册已经构造好的单例实例
    ///
    /// 解析时总是返回这个实例。需要生命周期钩子时改用 `ServiceDescriptor::instance`。
    pub fn register_instance<A>(&mut self, instance: Arc<A>)
    where
        A: ?Sized + Send + Sync + 'static,
    {
        self.register_singleton(ServiceDescriptor::shared(instance));
    }

    /// 注册瞬时绑定
    pub fn register_transient(&mut self, descriptor: impl Into<ServiceDescriptor>) {
        let descriptor: ServiceDescriptor = descriptor.into();
        let descriptor = descriptor.with_lifetime(Lifetime::Transient);
        let key = descriptor.contract().id;

        if self.singletons.contains_key(&key) {
            warn!(
                "契约已存在单例绑定, 瞬时绑定不会生效: {}",
                descriptor.contract().module_path
            );
        }

        info!(
            "注册瞬时: {} -> {}",
            descriptor.contract().short_name(),
            descriptor.concrete().short_name()
        );
        self.transients.insert(key, descriptor);
    }

    /// 以默认构造的具体类型 `C` 注册契约 `A` 的瞬时绑定
    pub fn register_transient_as<A, C>(&mut self, upcast: impl Fn(Arc<C>) -> Arc<A> + Send + Sync + 'static)
    where
        A: ?Sized + Send + Sync + 'static,
        C: Default + Send + Sync + 'static,
    {
        self.register_transient(ServiceDescriptor::bind::<A, C>(upcast));
    }

    /// 从注册标记批量注册单例
    pub fn register_singletons_from_metadata(&mut self, scanner: &dyn AttributeScanner) -> ScanReport {
        let markers = scanner.scan();
        info!("扫描器 {} 发现 {} 个注册标记", scanner.name(), markers.len());

        let mut report = ScanReport::default();
        let mut seen = HashSet::new();

        for marker in markers {
            let skip = |reason: SkipReason| SkippedMarker {
                contract: marker.contract.to_string(),
                concrete: marker.concrete.to_string(),
                reason,
            };

            if !seen.insert((marker.contract, marker.concrete)) {
                warn!("跳过重复标记: {} -> {}", marker.contract, marker.concrete);
                report.skipped.push(skip(SkipReason::Duplicate));
                continue;
            }

            let descriptor = (marker.describe)();
            if descriptor.contract().module_path != marker.contract
                || descriptor.concrete().module_path != marker.concrete
            {
                warn!("标记与描述符类型不一致: {} -> {}", marker.contract, marker.concrete);
                report.skipped.push(skip(SkipReason::ContractMismatch));
                continue;
            }
            if descriptor.lifetime() != Lifetime::Singleton {
                warn!("标记描述的不是单例: {}", marker.concrete);
                report.skipped.push(skip(SkipReason::NotSingleton));
                continue;
            }

            report.registered.push(descriptor.contract().clone());
            self.register_singleton(descriptor);
        }

        report
    }

    /// 移除单例绑定，已有实例会被销毁
    pub fn unregister_singleton<A: ?Sized + 'static>(&mut self) -> bool {
        let key = TypeId::of::<A>();
        self.evict(key, true);
        let removed = self.singletons.remove(&key).is_some();
        if removed {
            info!("移除单例绑定: {}", std::any::type_name::<A>());
        }
        removed
    }

    /// 移除瞬时绑定
    pub fn unregister_transient<A: ?Sized + 'static>(&mut self) -> bool {
        let removed = self.transients.remove(&TypeId::of::<A>()).is_some();
        if removed {
            info!("移除瞬时绑定: {}", std::any::type_name::<A>());
        }
        removed
    }

    // ---- 查询 ----

    /// 契约是否有单例绑定
    pub fn is_singleton_registered<A: ?Sized + 'static>(&self) -> bool {
        self.singletons.contains_key(&TypeId::of::<A>())
    }

    /// 契约是否有瞬时绑定
    pub fn is_transient_registered<A: ?Sized + 'static>(&self) -> bool {
        self.transients.contains_key(&TypeId::of::<A>())
    }

    /// 契约是否已有单例实例
    pub fn is_realized<A: ?Sized + 'static>(&self) -> bool {
        self.instances.contains_key(&TypeId::of::<A>())
    }

    /// 单例绑定的状态
    pub fn state<A: ?Sized + 'static>(&self) -> BindingState {
        self.state_of(TypeId::of::<A>())
    }

    fn state_of(&self, key: TypeId) -> BindingState {
        match (self.singletons.contains_key(&key), self.instances.get(&key)) {
            (false, _) => BindingState::Unbound,
            (true, None) => BindingState::Bound,
            (true, Some(realized)) if realized.awake => BindingState::Awake,
            (true, Some(_)) => BindingState::Realized,
        }
    }

    /// 全部单例绑定
    pub fn singleton_bindings(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.singletons.values()
    }

    /// 全部瞬时绑定
    pub fn transient_bindings(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.transients.values()
    }

    /// 已实例化的单例契约
    pub fn realized_instances(&self) -> impl Iterator<Item = &TypeInfo> {
        self.instances
            .keys()
            .filter_map(|key| self.singletons.get(key).map(ServiceDescriptor::contract))
    }

    /// 生成快照
    pub fn snapshot(&self) -> LocatorSnapshot {
        let view = |key: &TypeId, descriptor: &ServiceDescriptor, singleton: bool| BindingView {
            contract: descriptor.contract().clone(),
            concrete: descriptor.concrete().clone(),
            capabilities: descriptor.capabilities(),
            family: descriptor.family(),
            state: if singleton {
                self.state_of(*key)
            } else {
                BindingState::Bound
            },
            host_object: if singleton {
                self.instances
                    .get(key)
                    .and_then(|realized| realized.instance.host_object())
            } else {
                None
            },
        };

        let mut singletons: Vec<_> = self
            .singletons
            .iter()
            .map(|(key, descriptor)| view(key, descriptor, true))
            .collect();
        let mut transients: Vec<_> = self
            .transients
            .iter()
            .map(|(key, descriptor)| view(key, descriptor, false))
            .collect();
        singletons.sort_by(|a, b| a.contract.module_path.cmp(&b.contract.module_path));
        transients.sort_by(|a, b| a.contract.module_path.cmp(&b.contract.module_path));

        LocatorSnapshot {
            factory: self.factory.name().to_string(),
            singletons,
            transients,
        }
    }

    // ---- 解析 ----

    /// 解析契约，按需构造
    ///
    /// 未绑定时返回 `Ok(None)`，构造失败时返回错误。
    pub fn resolve<A>(&mut self) -> Result<Option<Arc<A>>, DependencyError>
    where
        A: ?Sized + Send + Sync + 'static,
    {
        self.resolve_with::<A>(ResolveOptions::create())
    }

    /// 只取已存在的单例实例，从不构造
    pub fn resolve_existing<A>(&mut self) -> Option<Arc<A>>
    where
        A: ?Sized + Send + Sync + 'static,
    {
        // 只读路径不会调用工厂，不可能失败
        self.resolve_with::<A>(ResolveOptions::existing()).ok().flatten()
    }

    /// 解析契约，未绑定视为错误
    pub fn resolve_required<A>(&mut self) -> Result<Arc<A>, DependencyError>
    where
        A: ?Sized + Send + Sync + 'static,
    {
        self.resolve::<A>()?
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                type_name: std::any::type_name::<A>().to_string(),
            })
    }

    /// 按选项解析契约
    pub fn resolve_with<A>(&mut self, options: ResolveOptions) -> Result<Option<Arc<A>>, DependencyError>
    where
        A: ?Sized + Send + Sync + 'static,
    {
        let Some(resolution) = self.resolve_key(TypeId::of::<A>(), options)? else {
            return Ok(None);
        };
        resolution
            .handle
            .downcast::<A>()
            .map(Some)
            .map_err(|_| DependencyError::TypeMismatch {
                expected: std::any::type_name::<A>().to_string(),
            })
    }

    fn resolve_key(
        &mut self,
        key: TypeId,
        options: ResolveOptions,
    ) -> Result<Option<Resolution>, DependencyError> {
        if let Some(descriptor) = self.singletons.get(&key) {
            let realized = match self.instances.entry(key) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    if options.only_existing {
                        return Ok(None);
                    }
                    let instance = self.factory.create(descriptor)?;
                    debug!("构造单例: {}", descriptor.concrete().module_path);
                    entry.insert(RealizedInstance {
                        instance,
                        capabilities: descriptor.capabilities(),
                        awake: false,
                    })
                }
            };

            if options.notify_awake {
                fire_awake(realized);
            }

            let handle = realized
                .instance
                .share()
                .ok_or_else(|| DependencyError::TypeMismatch {
                    expected: descriptor.contract().module_path.clone(),
                })?;
            return Ok(Some(Resolution {
                handle,
                singleton: true,
            }));
        }

        if let Some(descriptor) = self.transients.get(&key) {
            if options.only_existing {
                return Ok(None);
            }
            // 瞬时实例不缓存，也不会收到任何生命周期通知；宿主容器留到 reset 或 destroy 时释放
            let instance = self.factory.create(descriptor)?;
            debug!("构造瞬时实例: {}", descriptor.concrete().module_path);
            let (handle, container) = instance.into_parts();
            self.transient_containers.extend(container);
            return Ok(Some(Resolution {
                handle,
                singleton: false,
            }));
        }

        Ok(None)
    }

    fn notify_awake(&mut self, key: TypeId) {
        if let Some(realized) = self.instances.get_mut(&key) {
            fire_awake(realized);
        }
    }

    /// 实例化全部单例
    ///
    /// 返回本次新构造的实例数量。
    pub fn execute_services(&mut self) -> Result<usize, DependencyError> {
        let pending: Vec<TypeId> = self
            .singletons
            .keys()
            .filter(|key| !self.instances.contains_key(key))
            .copied()
            .collect();

        let mut realized = 0;
        for key in self.singletons.keys().copied().collect::<Vec<_>>() {
            if self.resolve_key(key, ResolveOptions::create())?.is_some() && pending.contains(&key) {
                realized += 1;
            }
        }

        info!("启动全部单例服务: 新建 {} 个", realized);
        Ok(realized)
    }

    // ---- 注入 ----

    /// 为目标的 `#[inject]` 字段注入服务
    ///
    /// 返回被赋值的字段数量。未绑定的契约保持字段原值。
    pub fn inject(&mut self, target: &mut dyn InjectionTarget, only_existing: bool) -> Result<usize, DependencyError> {
        let mut injector = Injector::new(self, ResolveOptions::from_only_existing(only_existing));
        target.inject_fields(&mut injector)?;
        let assigned = injector.assigned();
        debug!("字段注入完成: {} 个字段", assigned);
        Ok(assigned)
    }

    /// 注入静态槽位
    ///
    /// 先为全部槽位解析并赋值，再统一触发本次涉及单例的 awake，
    /// 保证 awake 钩子里读取其他静态槽位时它们已经就绪。
    pub fn inject_static(&mut self, fields: &[&dyn StaticField]) -> Result<usize, DependencyError> {
        let mut assigned = 0;
        let mut touched: Vec<TypeId> = Vec::new();

        for field in fields {
            let contract = field.contract();
            let Some(resolution) = self.resolve_key(contract.id, ResolveOptions::deferred_awake())? else {
                debug!("静态槽位未绑定, 跳过: {}", contract.module_path);
                continue;
            };

            if resolution.singleton && !touched.contains(&contract.id) {
                touched.push(contract.id);
            }
            if !field.assign(resolution.handle) {
                return Err(DependencyError::TypeMismatch {
                    expected: contract.module_path,
                });
            }
            assigned += 1;
        }

        for key in touched {
            self.notify_awake(key);
        }

        info!("静态注入完成: {} 个槽位", assigned);
        Ok(assigned)
    }

    /// 注入全局目录中扫描范围内的静态槽位
    pub fn inject_static_from_catalog(&mut self, scanner: &CatalogScanner) -> Result<usize, DependencyError> {
        let entries = scanner.static_fields();
        let fields: Vec<&dyn StaticField> = entries.iter().map(|entry| entry.field).collect();
        self.inject_static(&fields)
    }

    // ---- 生命周期 ----

    /// 场景切换
    ///
    /// 所有具备生命周期能力的实例收到 reset；上下文服务随后收到 destroy 并被移除，
    /// 下次解析时重新构造。瞬时绑定全部清空。
    pub fn reset(&mut self) -> ResetReport {
        let mut report = ResetReport::default();
        let mut context_keys = Vec::new();

        for (key, realized) in &self.instances {
            let Some(hooks) = realized.instance.hooks() else {
                continue;
            };
            hooks.reset();
            report.notified += 1;
            if realized.capabilities.context_scoped {
                context_keys.push(*key);
            }
        }

        for key in context_keys {
            if let Some(contract) = self.singletons.get(&key).map(|d| d.contract().clone()) {
                report.evicted.push(contract);
            }
            self.evict(key, true);
        }

        report.transient_bindings_dropped = self.transients.len();
        self.transients.clear();
        report.transient_containers_released = self.release_transient_containers();

        info!(
            "场景重置: 通知 {} 个服务, 移除 {} 个上下文服务, 清空 {} 个瞬时绑定",
            report.notified,
            report.evicted.len(),
            report.transient_bindings_dropped
        );
        report
    }

    /// 应用退出
    ///
    /// 所有具备生命周期能力的实例收到 destroy，随后清空全部表。
    pub fn destroy(&mut self) {
        let instances = std::mem::take(&mut self.instances);
        let count = instances.len();

        for realized in instances.values() {
            if let Some(hooks) = realized.instance.hooks() {
                hooks.destroy();
            }
        }
        for realized in instances.into_values() {
            self.release(&realized.instance);
        }

        self.release_transient_containers();
        self.singletons.clear();
        self.transients.clear();
        info!("定位器已销毁: 释放 {} 个实例", count);
    }

    /// 处理宿主事件
    pub fn handle_event(&mut self, event: &HostEvent) {
        match event {
            HostEvent::SceneLoaded { scene } => {
                info!("场景加载: {}", scene);
                self.reset();
            }
            HostEvent::ApplicationQuit => {
                info!("应用退出");
                self.destroy();
            }
        }
    }

    /// 处理通知器中全部待处理事件，返回处理数量
    pub fn pump(&mut self, notifier: &mut dyn LifecycleNotifier) -> usize {
        let mut handled = 0;
        while let Some(event) = notifier.poll_event() {
            self.handle_event(&event);
            handled += 1;
        }
        handled
    }

    /// 移除单例实例；`destroy` 为真时先调用 destroy 钩子
    fn evict(&mut self, key: TypeId, destroy: bool) -> bool {
        let Some(realized) = self.instances.remove(&key) else {
            return false;
        };
        if destroy {
            if let Some(hooks) = realized.instance.hooks() {
                hooks.destroy();
            }
        }
        self.release(&realized.instance);
        true
    }

    fn release_transient_containers(&mut self) -> usize {
        let containers = std::mem::take(&mut self.transient_containers);
        for container in &containers {
            if let Err(e) = self.factory.release_container(*container) {
                warn!("释放瞬时宿主容器失败: {}", e);
            }
        }
        containers.len()
    }

    fn release(&mut self, instance: &ServiceInstance) {
        if let Err(e) = self.factory.release(instance) {
            warn!("释放宿主资源失败: {}", e);
        }
    }
}

fn fire_awake(realized: &mut RealizedInstance) {
    if realized.awake {
        return;
    }
    if let Some(hooks) = realized.instance.hooks() {
        realized.awake = true;
        hooks.awake();
    }
}

impl<F: ObjectFactory> ErasedResolver for Locator<F> {
    fn resolve_erased(
        &mut self,
        contract: &TypeInfo,
        options: ResolveOptions,
    ) -> Result<Option<Resolution>, DependencyError> {
        self.resolve_key(contract.id, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{HostObjectFactory, InMemoryHost};
    use infrastructure_common::Service;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Logger: Send + Sync {
        fn log(&self, message: &str) -> String;
        fn awake_count(&self) -> usize;
    }

    #[derive(Default)]
    struct ConsoleLogger {
        awakened: AtomicUsize,
    }

    impl Logger for ConsoleLogger {
        fn log(&self, message: &str) -> String {
            format!("[console] {message}")
        }

        fn awake_count(&self) -> usize {
            self.awakened.load(Ordering::SeqCst)
        }
    }

    impl Service for ConsoleLogger {
        fn awake(&self) {
            self.awakened.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct RequestHandler;

    #[test]
    fn test_singleton_is_memoized() {
        let mut locator = Locator::new();
        locator.register_singleton(ServiceDescriptor::bind::<dyn Logger, ConsoleLogger>(|c| c));
        assert_eq!(locator.state::<dyn Logger>(), BindingState::Bound);

        let first = locator.resolve::<dyn Logger>().unwrap().unwrap();
        let second = locator.resolve::<dyn Logger>().unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.log("hi"), "[console] hi");
        // 没有声明生命周期能力
        assert_eq!(locator.state::<dyn Logger>(), BindingState::Realized);
    }

    #[test]
    fn test_awake_fires_once() {
        let logger = Arc::new(ConsoleLogger::default());
        let mut locator = Locator::new();
        locator.register_singleton(
            ServiceDescriptor::instance::<dyn Logger, ConsoleLogger>(logger.clone(), |c| c).with_lifecycle(),
        );

        locator.resolve::<dyn Logger>().unwrap();
        locator.resolve::<dyn Logger>().unwrap();
        locator.resolve_existing::<dyn Logger>();
        assert_eq!(logger.awakened.load(Ordering::SeqCst), 1);
        assert_eq!(locator.state::<dyn Logger>(), BindingState::Awake);
    }

    #[test]
    fn test_lazy_lifecycle_singleton_awakes_once() {
        let mut locator = Locator::new();
        locator.register_singleton(ServiceDescriptor::bind::<dyn Logger, ConsoleLogger>(|c| c).with_lifecycle());
        assert!(!locator.is_realized::<dyn Logger>());

        let first = locator.resolve::<dyn Logger>().unwrap().unwrap();
        let second = locator.resolve::<dyn Logger>().unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(locator.state::<dyn Logger>(), BindingState::Awake);

        locator.destroy();
        assert_eq!(first.awake_count(), 1);
    }

    #[test]
    fn test_transients_are_fresh_and_unregistered_is_none() {
        let mut locator = Locator::new();
        locator.register_transient(ServiceDescriptor::of::<RequestHandler>());

        let a = locator.resolve::<RequestHandler>().unwrap().unwrap();
        let b = locator.resolve::<RequestHandler>().unwrap().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(!locator.is_realized::<RequestHandler>());
        assert!(locator.resolve_existing::<RequestHandler>().is_none());

        assert!(locator.resolve::<dyn Logger>().unwrap().is_none());
        assert!(matches!(
            locator.resolve_required::<dyn Logger>(),
            Err(DependencyError::ComponentNotRegistered { .. })
        ));
    }

    #[test]
    fn test_resolve_existing_never_constructs() {
        let mut locator = Locator::new();
        locator.register_singleton_as::<dyn Logger, ConsoleLogger>(|c| c);

        assert!(locator.resolve_existing::<dyn Logger>().is_none());
        assert!(!locator.is_realized::<dyn Logger>());

        locator.resolve::<dyn Logger>().unwrap();
        assert!(locator.resolve_existing::<dyn Logger>().is_some());
    }

    #[test]
    fn test_singleton_shadows_transient() {
        let mut locator = Locator::new();
        locator.register_transient_as::<dyn Logger, ConsoleLogger>(|c| c);
        locator.register_singleton_as::<dyn Logger, ConsoleLogger>(|c| c);

        let a = locator.resolve::<dyn Logger>().unwrap().unwrap();
        let b = locator.resolve::<dyn Logger>().unwrap().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(locator.is_transient_registered::<dyn Logger>());
    }

    #[test]
    fn test_register_instance_and_unregister() {
        let mut locator = Locator::new();
        let name = Arc::new("main-scene".to_string());
        locator.register_instance(name.clone());

        let resolved = locator.resolve::<String>().unwrap().unwrap();
        assert!(Arc::ptr_eq(&resolved, &name));

        assert!(locator.unregister_singleton::<String>());
        assert!(!locator.unregister_singleton::<String>());
        assert!(locator.resolve::<String>().unwrap().is_none());
    }

    #[test]
    fn test_construction_failure_is_not_cached() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let mut locator = Locator::new();
        locator.register_singleton(ServiceDescriptor::bind_with::<dyn Logger, ConsoleLogger>(
            |c| c,
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Err("日志目录不可写".into())
            },
        ));

        assert!(locator.resolve::<dyn Logger>().is_err());
        assert!(locator.resolve::<dyn Logger>().is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(locator.state::<dyn Logger>(), BindingState::Bound);
    }

    #[test]
    fn test_host_components_release_containers() {
        let mut locator = Locator::with_factory(HostObjectFactory::new(InMemoryHost::new()));
        locator.register_singleton(ServiceDescriptor::of::<RequestHandler>().host_component());

        locator.resolve::<RequestHandler>().unwrap();
        let snapshot = locator.snapshot();
        assert_eq!(snapshot.factory, "host");
        assert!(snapshot.singletons[0].host_object.is_some());
        assert_eq!(locator.factory().host().live_count(), 1);

        locator.destroy();
        assert_eq!(locator.factory().host().live_count(), 0);
        assert_eq!(
            locator.factory().host().destroyed(),
            ["RequestHandler [Singleton]".to_string()]
        );
    }

    #[test]
    fn test_transient_host_containers_released_on_reset_and_destroy() {
        let mut locator = Locator::with_factory(HostObjectFactory::new(InMemoryHost::new()));
        locator.register_transient(ServiceDescriptor::of::<RequestHandler>().host_component());

        for _ in 0..3 {
            locator.resolve::<RequestHandler>().unwrap();
        }
        assert_eq!(locator.factory().host().live_count(), 3);

        let report = locator.reset();
        assert_eq!(report.transient_containers_released, 3);
        assert_eq!(locator.factory().host().live_count(), 0);
        assert_eq!(locator.factory().host().destroyed().len(), 3);

        locator.register_transient(ServiceDescriptor::of::<RequestHandler>().host_component());
        locator.resolve::<RequestHandler>().unwrap();
        assert_eq!(locator.factory().host().live_count(), 1);
        locator.destroy();
        assert_eq!(locator.factory().host().live_count(), 0);
    }

    #[test]
    fn test_plain_locator_rejects_host_component() {
        let mut locator = Locator::new();
        locator.register_singleton(ServiceDescriptor::of::<RequestHandler>().host_component());
        assert!(matches!(
            locator.resolve::<RequestHandler>(),
            Err(DependencyError::HostUnavailable { .. })
        ));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut locator = Locator::new();
        locator.register_singleton_as::<dyn Logger, ConsoleLogger>(|c| c);
        locator.register_transient(ServiceDescriptor::of::<RequestHandler>());
        locator.execute_services().unwrap();

        let snapshot = locator.snapshot();
        assert_eq!(snapshot.realized_count(), 1);
        assert_eq!(snapshot.transients.len(), 1);

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"factory\": \"plain\""));
        assert!(json.contains("Realized"));
    }
}
