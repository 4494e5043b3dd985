//! 对象工厂实现

use di_abstractions::{HostEnvironment, HostObjectId, ObjectFactory, ServiceDescriptor, ServiceInstance};
use infrastructure_common::{ConcreteFamily, DependencyError, TypeInfo};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// 普通对象工厂
///
/// 只支持普通家族，没有宿主环境时宿主组件无法构造。
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainObjectFactory;

impl ObjectFactory for PlainObjectFactory {
    fn create(&mut self, descriptor: &ServiceDescriptor) -> Result<ServiceInstance, DependencyError> {
        match descriptor.family() {
            ConcreteFamily::Plain => descriptor.construct(),
            ConcreteFamily::HostComponent => Err(DependencyError::HostUnavailable {
                type_name: descriptor.concrete().module_path.clone(),
            }),
        }
    }

    fn name(&self) -> &str {
        "plain"
    }
}

/// 支持宿主组件的对象工厂
#[derive(Debug, Default)]
pub struct HostObjectFactory<H: HostEnvironment> {
    host: H,
}

impl<H: HostEnvironment> HostObjectFactory<H> {
    /// 创建工厂
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// 宿主环境
    pub fn host(&self) -> &H {
        &self.host
    }

    /// 可变宿主环境
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn discard(&mut self, container: HostObjectId) {
        if let Err(e) = self.host.destroy_container(container) {
            warn!("清理宿主容器失败: {} - {}", container, e);
        }
    }
}

impl<H: HostEnvironment> ObjectFactory for HostObjectFactory<H> {
    fn create(&mut self, descriptor: &ServiceDescriptor) -> Result<ServiceInstance, DependencyError> {
        if descriptor.family() == ConcreteFamily::Plain {
            return descriptor.construct();
        }

        let name = descriptor.container_name();
        let container = self.host.create_container(&name)?;
        debug!("创建宿主容器: {} {}", name, container);

        let mut instance = match descriptor.construct() {
            Ok(instance) => instance,
            Err(e) => {
                self.discard(container);
                return Err(e);
            }
        };

        if let Err(e) = self.host.attach(container, descriptor.concrete()) {
            self.discard(container);
            return Err(e);
        }

        instance.attach_to(container);
        Ok(instance)
    }

    fn release_container(&mut self, container: HostObjectId) -> Result<(), DependencyError> {
        debug!("销毁宿主容器: {}", container);
        self.host.destroy_container(container)
    }

    fn name(&self) -> &str {
        "host"
    }
}

/// 内存中的宿主容器
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostContainer {
    /// 容器名称
    pub name: String,
    /// 已挂载的组件
    pub components: Vec<String>,
}

/// 内存宿主环境，用于无引擎运行和测试
#[derive(Debug, Default)]
pub struct InMemoryHost {
    next_id: u64,
    containers: BTreeMap<HostObjectId, HostContainer>,
    destroyed: Vec<String>,
}

impl InMemoryHost {
    /// 创建空的宿主环境
    pub fn new() -> Self {
        Self::default()
    }

    /// 存活的容器
    pub fn containers(&self) -> impl Iterator<Item = (&HostObjectId, &HostContainer)> {
        self.containers.iter()
    }

    /// 按标识查找容器
    pub fn container(&self, id: HostObjectId) -> Option<&HostContainer> {
        self.containers.get(&id)
    }

    /// 存活容器数量
    pub fn live_count(&self) -> usize {
        self.containers.len()
    }

    /// 已销毁容器的名称，按销毁顺序
    pub fn destroyed(&self) -> &[String] {
        &self.destroyed
    }
}

impl HostEnvironment for InMemoryHost {
    fn create_container(&mut self, name: &str) -> Result<HostObjectId, DependencyError> {
        self.next_id += 1;
        let id = HostObjectId(self.next_id);
        self.containers.insert(
            id,
            HostContainer {
                name: name.to_string(),
                components: Vec::new(),
            },
        );
        Ok(id)
    }

    fn attach(&mut self, container: HostObjectId, component: &TypeInfo) -> Result<(), DependencyError> {
        let target = self
            .containers
            .get_mut(&container)
            .ok_or_else(|| DependencyError::host_failed("attach", format!("容器不存在: {container}")))?;
        target.components.push(component.name.clone());
        Ok(())
    }

    fn destroy_container(&mut self, container: HostObjectId) -> Result<(), DependencyError> {
        let removed = self
            .containers
            .remove(&container)
            .ok_or_else(|| DependencyError::host_failed("destroy", format!("容器不存在: {container}")))?;
        self.destroyed.push(removed.name);
        Ok(())
    }
}
