use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

/// Traits every module configuration structure carries. The kernel builds a
/// fresh value through `Default` for each load and tests compare loads with
/// `PartialEq`.
const REQUIRED_DERIVES: [&str; 4] = ["Debug", "Default", "Clone", "PartialEq"];

pub fn expand(input: ItemStruct) -> TokenStream {
    if let syn::Fields::Unnamed(fields) = &input.fields {
        return syn::Error::new_spanned(
            fields,
            "module_conf requires named fields; directives address fields by name",
        )
        .to_compile_error();
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut present = FxHashSet::default();
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(last) = meta.path.segments.last() {
                present.insert(last.ident.to_string());
            }
            Ok(())
        });
    }
    let missing = REQUIRED_DERIVES
        .iter()
        .filter(|name| !present.contains(**name))
        .map(|name| syn::Ident::new(name, proc_macro2::Span::call_site()))
        .collect::<Vec<_>>();
    let derive_attr = if missing.is_empty() { quote! {} } else { quote! { #[derive(#(#missing),*)] } };

    quote! {
        #derive_attr
        #input

        #[automatically_derived]
        impl #impl_generics ::cradle_kernel::domain::registry::ModuleConf for #ident #ty_generics #where_clause {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    }
}
