mod component;

use proc_macro::TokenStream;

#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let ast = syn::parse(input).unwrap();
    component::impl_component(&ast)
}
