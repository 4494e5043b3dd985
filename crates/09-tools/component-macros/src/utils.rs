//! 宏工具函数

use proc_macro2::Span;
use syn::{GenericArgument, Ident, PathArguments, Type};

/// 生成带前缀的内部函数名，例如 `__register_singleton_console_logger`
pub fn hidden_fn_name(prefix: &str, ident: &Ident) -> Ident {
    Ident::new(
        &format!("__{}_{}", prefix, to_snake_case(&ident.to_string())),
        Span::call_site(),
    )
}

/// 驼峰或大写名称转为蛇形
pub fn to_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;

    for ch in name.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
            result.push(ch);
        }
    }

    result
}

/// 从类型中提取第一个泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner)) => Some(inner),
            _ => None,
        },
        _ => None,
    }
}

/// 检查类型的最后一段是否为指定名称
pub fn is_type_named(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == name)
            .unwrap_or(false),
        _ => false,
    }
}
