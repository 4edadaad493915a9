use super::derived_trait_names;
use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{Attribute, Data, DeriveInput, Lit, LitStr, Meta, MetaNameValue};

#[derive(Default)]
struct ModelArgs {
    namespace: Option<LitStr>,
    name: Option<LitStr>,
    wrapper: Option<LitStr>,
    prefix: Option<LitStr>,
}

/// Expands the `#[model_type]` attribute macro.
pub fn expand_model_type(args: TokenStream, input: DeriveInput) -> TokenStream {
    match expand(args, &input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(args: TokenStream, input: &DeriveInput) -> syn::Result<TokenStream> {
    if matches!(input.data, Data::Union(_)) {
        return Err(syn::Error::new_spanned(&input.ident, "model_type does not support unions"));
    }

    let args = parse_args(args)?;
    let Some(namespace) = args.namespace else {
        return Err(syn::Error::new_spanned(&input.ident, "model_type requires `namespace = \"...\"`"));
    };
    if let Some(name) = args.name.as_ref().filter(|n| n.value().is_empty()) {
        return Err(syn::Error::new_spanned(name, "`name` cannot be empty"));
    }
    if let Some(wrapper) = args.wrapper.as_ref().filter(|w| w.value().is_empty()) {
        return Err(syn::Error::new_spanned(wrapper, "`wrapper` cannot be empty"));
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let name = optional_str(args.name.as_ref());
    let wrapper = optional_str(args.wrapper.as_ref());
    let prefix = optional_str(args.prefix.as_ref());

    let derives = missing_derives(&input.attrs);
    let rename = if has_serde_rename_all(&input.attrs)? {
        quote! {}
    } else {
        quote! { #[serde(rename_all = "camelCase")] }
    };

    Ok(quote! {
        #derives
        #rename
        #input

        #[automatically_derived]
        impl #impl_generics ::gedx_domain::ModelType for #ident #ty_generics #where_clause {
            const NAMESPACE: &'static str = #namespace;
            const NAME: Option<&'static str> = #name;
            const WRAPPER: Option<&'static str> = #wrapper;
            const PREFIX: Option<&'static str> = #prefix;
        }
    })
}

fn parse_args(args: TokenStream) -> syn::Result<ModelArgs> {
    let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
    let mut parsed = ModelArgs::default();

    for meta in parser.parse2(args)? {
        let Meta::NameValue(name_value) = meta else {
            return Err(syn::Error::new_spanned(meta, "Expected arguments like `namespace = \"...\"`"));
        };

        let slot = if name_value.path.is_ident("namespace") {
            &mut parsed.namespace
        } else if name_value.path.is_ident("name") {
            &mut parsed.name
        } else if name_value.path.is_ident("wrapper") {
            &mut parsed.wrapper
        } else if name_value.path.is_ident("prefix") {
            &mut parsed.prefix
        } else {
            return Err(syn::Error::new_spanned(
                name_value.path,
                "Unsupported argument; expected namespace, name, wrapper or prefix",
            ));
        };

        if slot.is_some() {
            return Err(syn::Error::new_spanned(&name_value, "Duplicate argument"));
        }
        *slot = Some(string_literal(&name_value)?);
    }

    Ok(parsed)
}

fn string_literal(name_value: &MetaNameValue) -> syn::Result<LitStr> {
    match &name_value.value {
        syn::Expr::Lit(syn::ExprLit { lit: Lit::Str(lit), .. }) => Ok(lit.clone()),
        other => Err(syn::Error::new_spanned(other, "Expected a string literal")),
    }
}

fn optional_str(lit: Option<&LitStr>) -> TokenStream {
    lit.map_or_else(|| quote! { None }, |lit| quote! { Some(#lit) })
}

fn missing_derives(attrs: &[Attribute]) -> TokenStream {
    let present = derived_trait_names(attrs);
    let mut tokens = Vec::new();
    if !present.contains("Debug") {
        tokens.push(quote! { Debug });
    }
    if !present.contains("Serialize") {
        tokens.push(quote! { ::serde::Serialize });
    }
    if !present.contains("Deserialize") {
        tokens.push(quote! { ::serde::Deserialize });
    }
    if tokens.is_empty() { quote! {} } else { quote! { #[derive(#(#tokens),*)] } }
}

fn has_serde_rename_all(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut found = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                found = true;
            }
            if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let _content;
                syn::parenthesized!(_content in meta.input);
            }
            Ok(())
        })?;
    }
    Ok(found)
}
