//! 对象工厂抽象接口
//!
//! 定位器只需要"创建某个具体类型的对象"这一能力，宿主组件家族额外需要
//! 宿主环境创建容器对象并把实例挂载上去。

use crate::registry::{ServiceDescriptor, ServiceInstance};
use infrastructure_common::{DependencyError, TypeInfo};
use serde::Serialize;
use std::fmt;

/// 宿主环境中的对象标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HostObjectId(pub u64);

impl fmt::Display for HostObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 对象工厂 trait
///
/// 负责按描述符创建服务实例，并在实例被移除时释放宿主资源。
pub trait ObjectFactory {
    /// 创建服务实例
    fn create(&mut self, descriptor: &ServiceDescriptor) -> Result<ServiceInstance, DependencyError>;

    /// 释放实例占用的宿主资源
    fn release(&mut self, instance: &ServiceInstance) -> Result<(), DependencyError> {
        match instance.host_object() {
            Some(container) => self.release_container(container),
            None => Ok(()),
        }
    }

    /// 销毁宿主容器，实例句柄已经交出时使用
    fn release_container(&mut self, container: HostObjectId) -> Result<(), DependencyError> {
        let _ = container;
        Ok(())
    }

    /// 获取工厂名称
    fn name(&self) -> &str;
}

/// 宿主环境 trait
///
/// 对应宿主引擎的场景对象模型：创建容器对象、挂载组件、销毁容器。
pub trait HostEnvironment {
    /// 创建一个具名的容器对象
    fn create_container(&mut self, name: &str) -> Result<HostObjectId, DependencyError>;

    /// 把组件挂载到容器对象上
    fn attach(&mut self, container: HostObjectId, component: &TypeInfo) -> Result<(), DependencyError>;

    /// 销毁容器对象
    fn destroy_container(&mut self, container: HostObjectId) -> Result<(), DependencyError>;
}

impl<H: HostEnvironment + ?Sized> HostEnvironment for Box<H> {
    fn create_container(&mut self, name: &str) -> Result<HostObjectId, DependencyError> {
        (**self).create_container(name)
    }

    fn attach(&mut self, container: HostObjectId, component: &TypeInfo) -> Result<(), DependencyError> {
        (**self).attach(container, component)
    }

    fn destroy_container(&mut self, container: HostObjectId) -> Result<(), DependencyError> {
        (**self).destroy_container(container)
    }
}
