//! 单例注册宏实现

use crate::utils::hidden_fn_name;
use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Ident, ItemStruct,
    Result, Token, Type,
};

/// 可用的能力标志
const FLAGS: &[&str] = &["lifecycle", "context", "host_component"];

/// 单个宏参数：契约类型或能力标志
enum RegisterArg {
    Flag(Ident),
    Contract(Box<Type>),
}

impl Parse for RegisterArg {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let fork = input.fork();
        if let Ok(ident) = fork.parse::<Ident>() {
            let ends_here = fork.is_empty() || fork.peek(Token![,]);
            if ends_here && FLAGS.contains(&ident.to_string().as_str()) {
                input.parse::<Ident>()?;
                return Ok(RegisterArg::Flag(ident));
            }
        }
        input.parse().map(|ty| RegisterArg::Contract(Box::new(ty)))
    }
}

/// 注册参数
#[derive(Default)]
pub struct RegisterArgs {
    /// 契约类型，缺省为结构体自身
    pub contract: Option<Type>,
    /// 接收生命周期钩子
    pub lifecycle: bool,
    /// 上下文服务
    pub context: bool,
    /// 宿主组件
    pub host_component: bool,
}

impl Parse for RegisterArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = RegisterArgs::default();
        let parsed = Punctuated::<RegisterArg, Token![,]>::parse_terminated(input)?;

        for arg in parsed {
            match arg {
                RegisterArg::Contract(ty) => {
                    if args.contract.is_some() {
                        return Err(syn::Error::new_spanned(ty, "只能指定一个契约类型"));
                    }
                    args.contract = Some(*ty);
                }
                RegisterArg::Flag(flag) => match flag.to_string().as_str() {
                    "lifecycle" => args.lifecycle = true,
                    "context" => args.context = true,
                    _ => args.host_component = true,
                },
            }
        }

        Ok(args)
    }
}

/// 实现 #[register_singleton] 宏
pub fn register_singleton_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let register_args = if args.is_empty() {
        RegisterArgs::default()
    } else {
        match syn::parse::<RegisterArgs>(args) {
            Ok(args) => args,
            Err(e) => return e.to_compile_error().into(),
        }
    };

    let input_struct = parse_macro_input!(input as ItemStruct);
    if !input_struct.generics.params.is_empty() {
        return syn::Error::new_spanned(&input_struct.generics, "单例注册不支持泛型结构体")
            .to_compile_error()
            .into();
    }

    let expanded = generate_registration(&input_struct, &register_args);
    TokenStream::from(quote! {
        #input_struct

        #expanded
    })
}

/// 生成描述符函数与启动时注册代码
fn generate_registration(item: &ItemStruct, args: &RegisterArgs) -> proc_macro2::TokenStream {
    let struct_name = &item.ident;
    let contract = match &args.contract {
        Some(ty) => quote! { #ty },
        None => quote! { #struct_name },
    };

    let mut capabilities = Vec::new();
    if args.context {
        capabilities.push(quote! { .context_scoped() });
    } else if args.lifecycle {
        capabilities.push(quote! { .with_lifecycle() });
    }
    if args.host_component {
        capabilities.push(quote! { .host_component() });
    }

    let describe_fn = hidden_fn_name("describe", struct_name);
    let register_fn = hidden_fn_name("register_singleton", struct_name);

    quote! {
        #[doc(hidden)]
        fn #describe_fn() -> ::di_impl::ServiceDescriptor {
            ::di_impl::ServiceDescriptor::bind::<#contract, #struct_name>(|concrete| concrete)
                #(#capabilities)*
                .singleton()
                .build()
        }

        // 使用 ctor 在程序启动时提交注册标记
        #[::ctor::ctor]
        fn #register_fn() {
            ::di_impl::__private::submit(::di_impl::ServiceMarker {
                concrete: ::std::any::type_name::<#struct_name>(),
                contract: ::std::any::type_name::<#contract>(),
                module_path: ::std::module_path!(),
                describe: #describe_fn,
            });
        }
    }
}
