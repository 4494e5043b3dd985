//! 元数据定义
//!
//! 提供服务契约与具体类型的类型信息

use serde::Serialize;
use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 简短类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息，支持 `dyn Trait` 等非 Sized 类型
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full = std::any::type_name::<T>();
        Self {
            name: short_type_name(full).to_string(),
            id: TypeId::of::<T>(),
            module_path: full.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// 判断名称是否指向该类型，可以是简短名称或完整路径
    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.trim();
        name == self.name
            || name == self.module_path
            || (short_type_name(name) == self.name && self.module_path.ends_with(name))
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for TypeInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.module_path)
    }
}

/// 去掉 `dyn ` 前缀、泛型参数和模块路径
pub fn short_type_name(full: &str) -> &str {
    let trimmed = full.trim();
    let trimmed = trimmed.strip_prefix("dyn ").unwrap_or(trimmed);
    let base = trimmed.split('<').next().unwrap_or(trimmed);
    base.rsplit("::").next().unwrap_or(base).trim()
}
