//! Mimica Derive Macros: Generated Mock Types
//!
//! `#[mockable]` turns a trait into a mock type that implements it by
//! forwarding every call to a [`mimica::Mock`].
//!
//! # Example
//!
//! ```ignore
//! use mimica::prelude::*;
//!
//! #[mockable]
//! pub trait Store {
//!     fn get(&self, key: &str) -> Option<String>;
//!     fn put(&self, key: &str, value: String);
//! }
//!
//! // Generates `MockStore`, which implements `Store` and derefs to `Mock`:
//! let store = MockStore::new(MockBehavior::Strict);
//! store
//!     .setup("get")
//!     .with(It::eq("user".to_string()))
//!     .returns(Some("ada".to_string()));
//!
//! assert_eq!(store.get("user"), Some("ada".to_string()));
//! ```
//!
//! Reference arguments are recorded as their owned form (`&str` as
//! `String`, `&[u8]` as `Vec<u8>`), so matchers are written against the
//! owned type. Return types must implement `Default`, which is what a loose
//! mock answers unconfigured calls with.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote, quote_spanned};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, Expr, ExprLit, FnArg, Ident, ItemTrait, Lit, MetaNameValue, ReturnType,
    TraitItem, TraitItemFn, Type,
};

/// Attribute macro generating a mock type for a trait.
///
/// The trait is emitted unchanged, followed by `Mock<Trait>` (or the name
/// given with `#[mockable(name = "FakeStore")]`), which:
///
/// - implements the trait, each method dispatching `(args...)` under its name
/// - implements `mimica::Mockable`, so repositories can create it
/// - dereferences to `mimica::Mock` for setup and verification
///
/// Calls that fail (strict miss, `fails_with`, type mismatch) panic at the
/// call site with the mock error as message.
///
/// # Supported traits
///
/// Methods taking `&self` or `&mut self` with owned or reference arguments.
/// Generic traits and methods, `async fn`, other receivers, reference return
/// types, `impl Trait` types and associated types or consts are rejected at
/// compile time.
///
/// Return types must implement `Default`, the answer of a loose mock to an
/// unconfigured call. A method returning e.g. `Result<T, E>` fails to compile
/// with an error pointing at its return type; return `Option<Result<T, E>>`
/// or a type with a `Default` impl instead.
#[proc_macro_attribute]
pub fn mockable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemTrait);
    parse_mock_name(attr.into())
        .and_then(|name| expand(&input, name))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

// ============================================================================
// Expansion
// ============================================================================

fn expand(item: &ItemTrait, name: Option<Ident>) -> syn::Result<TokenStream2> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[mockable] does not support generic traits",
        ));
    }

    let trait_ident = &item.ident;
    let vis = &item.vis;
    let mock_ident = name.unwrap_or_else(|| format_ident!("Mock{}", trait_ident));
    let target = trait_ident.unraw().to_string();
    let doc = format!("Mock implementation of [`{target}`].");

    let methods = item
        .items
        .iter()
        .map(expand_item)
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        #item

        #[doc = #doc]
        #[derive(Debug, Clone)]
        #vis struct #mock_ident {
            mock: ::mimica::Mock,
        }

        impl #mock_ident {
            /// Create a mock with the given behavior
            #[must_use]
            #vis fn new(behavior: ::mimica::MockBehavior) -> Self {
                <Self as ::mimica::Mockable>::from_mock(::mimica::Mock::named(#target, behavior))
            }
        }

        impl ::std::default::Default for #mock_ident {
            fn default() -> Self {
                Self::new(::mimica::MockBehavior::default())
            }
        }

        impl ::mimica::Mockable for #mock_ident {
            const TARGET: &'static str = #target;

            fn from_mock(mock: ::mimica::Mock) -> Self {
                Self { mock }
            }

            fn mock(&self) -> &::mimica::Mock {
                &self.mock
            }
        }

        impl ::std::ops::Deref for #mock_ident {
            type Target = ::mimica::Mock;

            fn deref(&self) -> &Self::Target {
                &self.mock
            }
        }

        impl #trait_ident for #mock_ident {
            #(#methods)*
        }
    })
}

fn expand_item(item: &TraitItem) -> syn::Result<TokenStream2> {
    match item {
        TraitItem::Fn(method) => expand_method(method),
        TraitItem::Type(ty) => Err(syn::Error::new_spanned(
            ty,
            "#[mockable] does not support associated types",
        )),
        TraitItem::Const(c) => Err(syn::Error::new_spanned(
            c,
            "#[mockable] does not support associated consts",
        )),
        other => Err(syn::Error::new_spanned(
            other,
            "#[mockable] does not support this trait item",
        )),
    }
}

fn expand_method(method: &TraitItemFn) -> syn::Result<TokenStream2> {
    let mut sig = method.sig.clone();

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "#[mockable] does not support async methods",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[mockable] does not support generic methods",
        ));
    }

    let method_name = sig.ident.unraw().to_string();
    let mut arg_types = Vec::new();
    let mut arg_values = Vec::new();
    let mut has_receiver = false;

    for (index, input) in sig.inputs.iter_mut().enumerate() {
        match input {
            FnArg::Receiver(receiver) => {
                if receiver.reference.is_none() {
                    return Err(syn::Error::new_spanned(
                        receiver,
                        "#[mockable] methods must take `&self` or `&mut self`",
                    ));
                }
                has_receiver = true;
            }
            FnArg::Typed(arg) => {
                let binding = format_ident!("__arg{}", index);
                let (ty, value) = recorded_argument(&arg.ty, &binding)?;
                arg_types.push(ty);
                arg_values.push(value);
                arg.pat = Box::new(syn::parse_quote!(#binding));
            }
        }
    }

    if !has_receiver {
        return Err(syn::Error::new_spanned(
            &method.sig,
            "#[mockable] does not support associated functions without `self`",
        ));
    }

    let ret = return_type(&sig.output)?;
    let default_check = match &sig.output {
        ReturnType::Default => quote!(),
        ReturnType::Type(_, ty) => quote_spanned! {ty.span()=>
            let _: fn() -> #ty = <#ty as ::std::default::Default>::default;
        },
    };

    Ok(quote! {
        #sig {
            #default_check
            ::mimica::Mock::invoke::<(#(#arg_types,)*), #ret>(
                &self.mock,
                #method_name,
                (#(#arg_values,)*),
            )
            .unwrap_or_else(|e| panic!("{}", e))
        }
    })
}

/// Type and value under which an argument is recorded
fn recorded_argument(ty: &Type, binding: &Ident) -> syn::Result<(TokenStream2, TokenStream2)> {
    match ty {
        Type::Reference(reference) => {
            let elem = &reference.elem;
            Ok((
                quote!(<#elem as ::std::borrow::ToOwned>::Owned),
                quote!(::std::borrow::ToOwned::to_owned(&*#binding)),
            ))
        }
        Type::ImplTrait(_) => Err(syn::Error::new_spanned(
            ty,
            "#[mockable] does not support `impl Trait` arguments",
        )),
        _ => Ok((quote!(#ty), quote!(#binding))),
    }
}

fn return_type(output: &ReturnType) -> syn::Result<TokenStream2> {
    match output {
        ReturnType::Default => Ok(quote!(())),
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Reference(_) => Err(syn::Error::new_spanned(
                ty,
                "#[mockable] does not support reference return types",
            )),
            Type::ImplTrait(_) => Err(syn::Error::new_spanned(
                ty,
                "#[mockable] does not support `impl Trait` return types",
            )),
            _ => Ok(quote!(#ty)),
        },
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse `name = "FakeStore"` from the attribute arguments
fn parse_mock_name(attr: TokenStream2) -> syn::Result<Option<Ident>> {
    if attr.is_empty() {
        return Ok(None);
    }
    let nv: MetaNameValue = syn::parse2(attr)?;
    if !nv.path.is_ident("name") {
        return Err(syn::Error::new_spanned(
            &nv.path,
            "expected `name = \"MockTypeName\"`",
        ));
    }
    match &nv.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(Some(s.parse::<Ident>()?)),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}
