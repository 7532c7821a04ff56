use quote::{format_ident, quote};
use proc_macro::TokenStream;
use syn::DeriveInput;

pub fn impl_component(ast: &DeriveInput) -> TokenStream {
    let name = &ast.ident;

    let name_str = name.to_string().to_uppercase();
    let id_name = format_ident!("__COMPONENT_TYPE_ID_OF_{}", name_str);

    let mut auto_reset = false;
    for attr in &ast.attrs {
        if attr.path().is_ident("component") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("auto_reset") {
                    auto_reset = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown component attribute"))
                }
            })
            .unwrap();
        }
    }

    let reset_hook = if auto_reset {
        quote! {
            fn reset_hook() -> Option<fn(&mut Self)> {
                Some(<Self as flint_ecs::components::AutoReset>::auto_reset)
            }
        }
    } else {
        quote! {}
    };

    let gen = quote! {
        flint_ecs::lazy_static! {
            static ref #id_name: flint_ecs::components::ComponentTypeId =
                flint_ecs::components::component_id::next_component_type_id();
        }

        impl flint_ecs::components::Component for #name {
            #[inline(always)]
            fn component_type_id() -> flint_ecs::components::ComponentTypeId {
                *#id_name
            }

            #reset_hook
        }
    };
    gen.into()
}
