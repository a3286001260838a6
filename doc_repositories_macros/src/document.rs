use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr};

pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let name = match extract_name(&input) {
        Ok(name) => name,
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #impl_generics doc_repositories::Document for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
        }
    };

    TokenStream::from(expanded)
}

fn extract_name(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("document") {
            continue;
        }

        let mut name = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().trim().is_empty() {
                    return Err(meta.error("document name must not be blank"));
                }
                name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported document attribute, expected `name`"))
            }
        })?;

        if let Some(name) = name {
            return Ok(name);
        }
    }

    Ok(input.ident.to_string())
}
