//! # Accessor Derive
//!
//! This crate provides a derive macro for generating read-only accessors for
//! structs whose fields are private, such as frozen boot-time snapshots.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, LitBool, parse_macro_input, spanned::Spanned};

/// Derive to generate `const fn <field>(&self) -> &Ty` for each **named** field.
///
/// - Return by value instead of by reference: `#[getters(copy)]` (the field
///   type must be `Copy`)
/// - Skipping a field: `#[getters(skip)]`
/// - Renaming the accessor: `#[getters(rename = "other")]`
///
/// No setters are generated; the owning type stays immutable from the outside.
///
/// # Example
///
/// ```
/// use utils_accessors_derive::Getters;
///
/// #[derive(Getters)]
/// struct Foo {
///     #[getters(copy)]
///     a: u32,
///     b: [u8; 2],
///     #[getters(skip)]
///     _secret: u8,
///     #[getters(copy, rename = "count")]
///     n: usize,
/// }
///
/// let f = Foo { a: 1, b: [2, 3], _secret: 4, n: 5 };
/// assert_eq!(f.a(), 1);
/// assert_eq!(f.b(), &[2, 3]);
/// assert_eq!(f.count(), 5);
/// ```
#[proc_macro_derive(Getters, attributes(getters))]
pub fn derive_generate_getters(input: TokenStream) -> TokenStream {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = parse_macro_input!(input as DeriveInput);

    let fields = match data {
        Data::Struct(s) => match s.fields {
            Fields::Named(n) => n.named,
            Fields::Unnamed(u) => {
                return syn::Error::new(u.span(), "Getters only supports named fields")
                    .to_compile_error()
                    .into();
            }
            Fields::Unit => {
                return syn::Error::new(ident.span(), "Getters does not apply to unit structs")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new(ident.span(), "Getters can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut methods = Vec::new();

    for field in fields {
        let Some(fname) = &field.ident else { continue };
        let options = match parse_options(&field.attrs) {
            Ok(options) => options,
            Err(e) => return e.to_compile_error().into(),
        };
        if options.skip {
            continue;
        }

        let ty = &field.ty;
        let getter = options
            .rename
            .map_or_else(|| format_ident!("{}", fname), |name| format_ident!("{}", name));

        // Carry the field's doc comment over to the accessor.
        let docs = field
            .attrs
            .iter()
            .filter(|a| a.path().is_ident("doc"))
            .collect::<Vec<_>>();

        if options.copy {
            methods.push(quote! {
                #(#docs)*
                #[inline]
                #[must_use]
                pub const fn #getter(&self) -> #ty {
                    self.#fname
                }
            });
        } else {
            methods.push(quote! {
                #(#docs)*
                #[inline]
                #[must_use]
                pub const fn #getter(&self) -> &#ty {
                    &self.#fname
                }
            });
        }
    }

    let expanded = quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            #(#methods)*
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct Options {
    skip: bool,
    copy: bool,
    rename: Option<String>,
}

fn parse_options(attrs: &[syn::Attribute]) -> syn::Result<Options> {
    let mut options = Options::default();
    for attr in attrs {
        if !attr.path().is_ident("getters") {
            continue;
        }

        // Accept #[getters(skip)], #[getters(skip = true)], #[getters(copy)]
        // and #[getters(rename = "name")]
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = parse_flag(&meta)?;
            } else if meta.path.is_ident("copy") {
                options.copy = parse_flag(&meta)?;
            } else if meta.path.is_ident("rename") {
                let name: syn::LitStr = meta.value()?.parse()?;
                options.rename = Some(name.value());
            } else {
                return Err(meta.error("unsupported getters option"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

fn parse_flag(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<bool> {
    if meta.input.is_empty() || meta.input.peek(syn::Token![,]) {
        return Ok(true);
    }
    let v: LitBool = meta.value()?.parse()?;
    Ok(v.value)
}
