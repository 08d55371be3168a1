//! Derive macros for autowire
//!
//! This crate provides `#[derive(Autowire)]`, use it through the `autowire` crate.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, Fields, GenericArgument, GenericParam,
    PathArguments, Type,
};

/// Generates an `Autowire` implementation for a struct
///
/// - fields of type `Arc<D>` are resolved from the container as `D`
/// - every other field receives `Default::default()`
///
/// `Arc<dyn Trait>` fields are rejected, the container only hands out sized types.
#[proc_macro_derive(Autowire)]
pub fn derive_autowire(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span,
                "Autowire can only be derived for structs",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "Autowire can only be derived for structs",
            ))
        }
    };

    // Anything handed out by the container must be Send + Sync + 'static
    let mut generics = input.generics.clone();
    let type_params: Vec<_> = generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(param) => Some(param.ident.clone()),
            _ => None,
        })
        .collect();
    let where_clause = generics.make_where_clause();
    for ident in type_params {
        where_clause
            .predicates
            .push(parse_quote!(#ident: ::core::marker::Send + ::core::marker::Sync + 'static));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut parameters = Vec::new();
    let mut values = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let parameter_name = match &field.ident {
            Some(ident) => ident.to_string(),
            None => index.to_string(),
        };

        match injected_type(&field.ty)? {
            Some(dependency) => {
                parameters.push(quote! {
                    ::autowire::Parameter::typed::<#dependency>(#parameter_name)
                });
                values.push(quote! { args.arg::<#dependency>()? });
            }
            None => {
                parameters.push(quote! {
                    ::autowire::Parameter::untyped(#parameter_name)
                });
                values.push(quote! {
                    {
                        args.skip()?;
                        ::core::default::Default::default()
                    }
                });
            }
        }
    }

    let body = match fields {
        Fields::Named(named) => {
            let idents = named.named.iter().map(|field| &field.ident);
            quote! { Self { #(#idents: #values),* } }
        }
        Fields::Unnamed(_) => quote! { Self( #(#values),* ) },
        Fields::Unit => quote! { Self },
    };

    Ok(quote! {
        impl #impl_generics ::autowire::Autowire for #name #ty_generics #where_clause {
            fn parameters() -> ::std::vec::Vec<::autowire::Parameter> {
                ::std::vec![#(#parameters),*]
            }

            #[allow(unused_variables)]
            fn construct(
                args: &mut ::autowire::Arguments,
            ) -> ::core::result::Result<Self, ::autowire::ResolveError> {
                ::core::result::Result::Ok(#body)
            }
        }
    })
}

/// Returns `D` for a field of type `Arc<D>`
fn injected_type(ty: &Type) -> syn::Result<Option<&Type>> {
    let Type::Path(path) = ty else {
        return Ok(None);
    };
    if path.qself.is_some() {
        return Ok(None);
    }

    let Some(segment) = path.path.segments.last() else {
        return Ok(None);
    };
    if segment.ident != "Arc" {
        return Ok(None);
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return Ok(None);
    };
    match arguments.args.first() {
        Some(GenericArgument::Type(Type::TraitObject(object))) => Err(syn::Error::new_spanned(
            object,
            "Autowire cannot inject trait objects, depend on a concrete type \
             or wrap the trait object in a struct and register that",
        )),
        Some(GenericArgument::Type(inner)) if arguments.args.len() == 1 => Ok(Some(inner)),
        _ => Ok(None),
    }
}
