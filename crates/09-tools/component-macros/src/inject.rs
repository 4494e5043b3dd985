//! 注入宏实现

use crate::utils::{extract_generic_type, hidden_fn_name, is_type_named};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, ItemStatic, Member, StaticMutability};

/// 实现 #[derive(Inject)] 宏
pub fn derive_inject_impl(input: DeriveInput) -> TokenStream {
    match expand_inject(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_inject(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "Inject 只能用于结构体"));
    };

    let mut assignments = Vec::new();
    let fields: Vec<_> = match &data.fields {
        Fields::Named(named) => named.named.iter().collect(),
        Fields::Unnamed(unnamed) => unnamed.unnamed.iter().collect(),
        Fields::Unit => Vec::new(),
    };

    for (index, field) in fields.into_iter().enumerate() {
        if !field.attrs.iter().any(|attr| attr.path().is_ident("inject")) {
            continue;
        }

        let is_option_arc = is_type_named(&field.ty, "Option")
            && extract_generic_type(&field.ty).is_some_and(|inner| is_type_named(inner, "Arc"));
        if !is_option_arc {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "#[inject] 字段的类型必须是 Option<Arc<T>>",
            ));
        }

        let member = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(index.into()),
        };
        assignments.push(quote! {
            injector.field(&mut self.#member)?;
        });
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::di_impl::InjectionTarget for #name #ty_generics #where_clause {
            fn inject_fields(
                &mut self,
                injector: &mut ::di_impl::Injector<'_>,
            ) -> ::std::result::Result<(), ::di_impl::DependencyError> {
                #(#assignments)*
                let _ = injector;
                Ok(())
            }
        }
    })
}

/// 实现 #[inject_static] 宏
pub fn inject_static_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(proc_macro2::Span::call_site(), "#[inject_static] 不接受参数")
            .to_compile_error()
            .into();
    }

    let item = parse_macro_input!(input as ItemStatic);
    if !matches!(item.mutability, StaticMutability::None) {
        return syn::Error::new_spanned(&item.ident, "#[inject_static] 不能用于 static mut")
            .to_compile_error()
            .into();
    }
    if !is_type_named(&item.ty, "StaticSlot") {
        return syn::Error::new_spanned(&item.ty, "#[inject_static] 的类型必须是 StaticSlot<T>")
            .to_compile_error()
            .into();
    }

    let ident = &item.ident;
    let slot_name = ident.to_string();
    let register_fn = hidden_fn_name("inject_static", ident);

    TokenStream::from(quote! {
        #item

        // 使用 ctor 在程序启动时登记静态槽位
        #[::ctor::ctor]
        fn #register_fn() {
            ::di_impl::__private::submit_static_field(&#ident, #slot_name, ::std::module_path!());
        }
    })
}
