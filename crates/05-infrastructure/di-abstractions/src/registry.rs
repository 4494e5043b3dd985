//! 服务注册描述抽象
//!
//! [`ServiceDescriptor`] 是注册表中每条绑定背后的类型擦除记录，
//! 由类型化的 [`DescriptorBuilder`] 构建。能力集合在这里显式声明。

use crate::factory::HostObjectId;
use infrastructure_common::{
    BoxError, Capabilities, ConcreteFamily, DependencyError, Lifetime, Service, TypeInfo,
};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// 类型擦除后的构造函数
pub type Constructor = Arc<dyn Fn() -> Result<ServiceInstance, BoxError> + Send + Sync>;

/// 已构造的服务实例
///
/// 内部保存契约类型的 `Arc<A>`，以及按能力集合取得的生命周期钩子。
pub struct ServiceInstance {
    handle: Box<dyn Any + Send + Sync>,
    share: fn(&(dyn Any + Send + Sync)) -> Option<ResolvedHandle>,
    hooks: Option<Arc<dyn Service>>,
    host_object: Option<HostObjectId>,
}

impl ServiceInstance {
    /// 以契约类型句柄创建实例
    pub fn new<A>(handle: Arc<A>) -> Self
    where
        A: ?Sized + Send + Sync + 'static,
    {
        Self {
            handle: Box::new(handle),
            share: share_arc::<A>,
            hooks: None,
            host_object: None,
        }
    }

    /// 附加生命周期钩子
    pub fn with_hooks(mut self, hooks: Arc<dyn Service>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// 记录实例挂载的宿主容器
    pub fn attach_to(&mut self, container: HostObjectId) {
        self.host_object = Some(container);
    }

    /// 生命周期钩子
    pub fn hooks(&self) -> Option<&Arc<dyn Service>> {
        self.hooks.as_ref()
    }

    /// 实例挂载的宿主容器
    pub fn host_object(&self) -> Option<HostObjectId> {
        self.host_object
    }

    /// 以契约类型取得实例
    pub fn handle<A>(&self) -> Option<Arc<A>>
    where
        A: ?Sized + Send + Sync + 'static,
    {
        self.handle.downcast_ref::<Arc<A>>().cloned()
    }

    /// 共享一份类型擦除的句柄
    pub fn share(&self) -> Option<ResolvedHandle> {
        (self.share)(self.handle.as_ref())
    }

    /// 交出句柄（瞬时实例不会被缓存）
    pub fn into_handle(self) -> ResolvedHandle {
        ResolvedHandle(self.handle)
    }

    /// 交出句柄，同时保留宿主容器标识供之后释放
    pub fn into_parts(self) -> (ResolvedHandle, Option<HostObjectId>) {
        (ResolvedHandle(self.handle), self.host_object)
    }
}

impl fmt::Debug for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceInstance")
            .field("has_hooks", &self.hooks.is_some())
            .field("host_object", &self.host_object)
            .finish()
    }
}

fn share_arc<A>(handle: &(dyn Any + Send + Sync)) -> Option<ResolvedHandle>
where
    A: ?Sized + Send + Sync + 'static,
{
    handle
        .downcast_ref::<Arc<A>>()
        .map(|arc| ResolvedHandle(Box::new(Arc::clone(arc))))
}

fn service_hooks<C: Service>(concrete: &Arc<C>) -> Arc<dyn Service> {
    concrete.clone()
}

/// 类型擦除的解析结果，内部是某个契约类型的 `Arc<A>`
pub struct ResolvedHandle(Box<dyn Any + Send + Sync>);

impl ResolvedHandle {
    /// 还原为契约类型
    pub fn downcast<A>(self) -> Result<Arc<A>, Self>
    where
        A: ?Sized + Send + Sync + 'static,
    {
        self.0
            .downcast::<Arc<A>>()
            .map(|arc| *arc)
            .map_err(ResolvedHandle)
    }
}

impl fmt::Debug for ResolvedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResolvedHandle(..)")
    }
}

/// 服务描述符
#[derive(Clone)]
pub struct ServiceDescriptor {
    contract: TypeInfo,
    concrete: TypeInfo,
    lifetime: Lifetime,
    capabilities: Capabilities,
    family: ConcreteFamily,
    prebuilt: bool,
    constructor: Constructor,
}

impl ServiceDescriptor {
    /// 绑定契约 `A` 到可默认构造的具体类型 `C`
    ///
    /// `upcast` 负责把具体类型转换成契约类型，通常写作 `|c| c`。
    pub fn bind<A, C>(
        upcast: impl Fn(Arc<C>) -> Arc<A> + Send + Sync + 'static,
    ) -> DescriptorBuilder<A, C>
    where
        A: ?Sized + Send + Sync + 'static,
        C: Default + Send + Sync + 'static,
    {
        DescriptorBuilder::new(
            Arc::new(|| Ok::<_, BoxError>(Arc::new(C::default()))),
            Arc::new(upcast),
            false,
        )
    }

    /// 绑定契约 `A` 到使用自定义构造函数的具体类型 `C`
    pub fn bind_with<A, C>(
        upcast: impl Fn(Arc<C>) -> Arc<A> + Send + Sync + 'static,
        factory: impl Fn() -> Result<C, BoxError> + Send + Sync + 'static,
    ) -> DescriptorBuilder<A, C>
    where
        A: ?Sized + Send + Sync + 'static,
        C: Send + Sync + 'static,
    {
        DescriptorBuilder::new(
            Arc::new(move || factory().map(Arc::new)),
            Arc::new(upcast),
            false,
        )
    }

    /// 把具体类型注册为它自己
    pub fn of<C>() -> DescriptorBuilder<C, C>
    where
        C: Default + Send + Sync + 'static,
    {
        Self::bind::<C, C>(|concrete| concrete)
    }

    /// 绑定契约 `A` 到已经构造好的实例
    pub fn instance<A, C>(
        instance: Arc<C>,
        upcast: impl Fn(Arc<C>) -> Arc<A> + Send + Sync + 'static,
    ) -> DescriptorBuilder<A, C>
    where
        A: ?Sized + Send + Sync + 'static,
        C: Send + Sync + 'static,
    {
        DescriptorBuilder::new(
            Arc::new(move || Ok::<_, BoxError>(Arc::clone(&instance))),
            Arc::new(upcast),
            true,
        )
    }

    /// 绑定契约 `A` 到已有的契约句柄，具体类型不可知
    pub fn shared<A>(instance: Arc<A>) -> ServiceDescriptor
    where
        A: ?Sized + Send + Sync + 'static,
    {
        let constructor: Constructor =
            Arc::new(move || Ok(ServiceInstance::new::<A>(Arc::clone(&instance))));
        ServiceDescriptor {
            contract: TypeInfo::of::<A>(),
            concrete: TypeInfo::of::<A>(),
            lifetime: Lifetime::Singleton,
            capabilities: Capabilities::NONE,
            family: ConcreteFamily::Plain,
            prebuilt: true,
            constructor,
        }
    }

    /// 契约类型
    pub fn contract(&self) -> &TypeInfo {
        &self.contract
    }

    /// 具体类型
    pub fn concrete(&self) -> &TypeInfo {
        &self.concrete
    }

    /// 生命周期
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// 能力集合
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// 构造家族
    pub fn family(&self) -> ConcreteFamily {
        self.family
    }

    /// 是否绑定到预先构造的实例
    pub fn is_prebuilt(&self) -> bool {
        self.prebuilt
    }

    /// 替换生命周期
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// 宿主容器名称：具体类型名 + 绑定类型
    pub fn container_name(&self) -> String {
        format!("{} [{}]", self.concrete.short_name(), self.lifetime)
    }

    /// 调用构造函数，构造失败原样包装后传播
    pub fn construct(&self) -> Result<ServiceInstance, DependencyError> {
        (self.constructor)()
            .map_err(|source| DependencyError::creation_failed(&self.concrete.module_path, source))
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("contract", &self.contract.module_path)
            .field("concrete", &self.concrete.module_path)
            .field("lifetime", &self.lifetime)
            .field("capabilities", &self.capabilities)
            .field("family", &self.family)
            .field("prebuilt", &self.prebuilt)
            .field("constructor", &"<function>")
            .finish()
    }
}

/// 类型化的描述符构建器
pub struct DescriptorBuilder<A: ?Sized, C> {
    lifetime: Lifetime,
    family: ConcreteFamily,
    capabilities: Capabilities,
    prebuilt: bool,
    make: Arc<dyn Fn() -> Result<Arc<C>, BoxError> + Send + Sync>,
    upcast: Arc<dyn Fn(Arc<C>) -> Arc<A> + Send + Sync>,
    hooks: Option<fn(&Arc<C>) -> Arc<dyn Service>>,
}

impl<A, C> DescriptorBuilder<A, C>
where
    A: ?Sized + Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    fn new(
        make: Arc<dyn Fn() -> Result<Arc<C>, BoxError> + Send + Sync>,
        upcast: Arc<dyn Fn(Arc<C>) -> Arc<A> + Send + Sync>,
        prebuilt: bool,
    ) -> Self {
        Self {
            lifetime: Lifetime::Singleton,
            family: ConcreteFamily::Plain,
            capabilities: Capabilities::NONE,
            prebuilt,
            make,
            upcast,
            hooks: None,
        }
    }

    /// 单例绑定（默认）
    pub fn singleton(mut self) -> Self {
        self.lifetime = Lifetime::Singleton;
        self
    }

    /// 瞬时绑定
    pub fn transient(mut self) -> Self {
        self.lifetime = Lifetime::Transient;
        self
    }

    /// 具体类型属于宿主组件家族
    pub fn host_component(mut self) -> Self {
        self.family = ConcreteFamily::HostComponent;
        self
    }

    /// 声明生命周期能力
    pub fn with_lifecycle(mut self) -> Self
    where
        C: Service,
    {
        self.capabilities.lifecycle = true;
        self.hooks = Some(service_hooks::<C>);
        self
    }

    /// 声明为上下文服务，隐含生命周期能力
    pub fn context_scoped(mut self) -> Self
    where
        C: Service,
    {
        self.capabilities.context_scoped = true;
        self.with_lifecycle()
    }

    /// 完成构建
    pub fn build(self) -> ServiceDescriptor {
        let contract = TypeInfo::of::<A>();
        let concrete = TypeInfo::of::<C>();

        let mut capabilities = self.capabilities;
        if capabilities.context_scoped && self.prebuilt {
            warn!(
                "预构造实例无法在场景切换后重建，忽略上下文能力: {}",
                concrete.module_path
            );
            capabilities.context_scoped = false;
        }

        let make = self.make;
        let upcast = self.upcast;
        let hooks = if capabilities.lifecycle { self.hooks } else { None };
        let constructor: Constructor = Arc::new(move || {
            let concrete = make()?;
            let hooks = hooks.map(|hooks| hooks(&concrete));
            let instance = ServiceInstance::new::<A>(upcast(concrete));
            Ok(match hooks {
                Some(hooks) => instance.with_hooks(hooks),
                None => instance,
            })
        });

        ServiceDescriptor {
            contract,
            concrete,
            lifetime: self.lifetime,
            capabilities,
            family: self.family,
            prebuilt: self.prebuilt,
            constructor,
        }
    }
}

impl<A, C> From<DescriptorBuilder<A, C>> for ServiceDescriptor
where
    A: ?Sized + Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    fn from(builder: DescriptorBuilder<A, C>) -> Self {
        builder.build()
    }
}
