use proc_macro::TokenStream;
use proc_macro2::{Ident, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Column storage for per-year and per-date statistics rows.
///
/// Deriving `Columnar` on a struct of `f64` fields (for instance the three
/// tercile probabilities of one year, or the ensemble mean/min/max of one
/// date) generates `{Name}Series`, holding one `Vec<f64>` per field. The
/// series is filled row by row with `push` and read back column by column
/// with `columns()`, which pairs every column with its field name so the
/// Python layer can turn it into a dict of arrays without naming fields.
///
/// `#[columnar(series_name = "Custom")]` renames the generated struct.
#[proc_macro_derive(Columnar, attributes(columnar))]
pub fn derive_columnar(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let row = &input.ident;
    let series = series_name(input)?.unwrap_or_else(|| format_ident!("{}Series", row));
    let fields = f64_fields(input)?;
    let names: Vec<String> = fields.iter().map(Ident::to_string).collect();
    let first = &fields[0];
    let doc = format!("Rows of [`{row}`] stored column by column.");

    Ok(quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct #series {
            #(pub #fields: Vec<f64>,)*
        }

        impl #series {
            pub fn with_capacity(n: usize) -> Self {
                Self {
                    #(#fields: Vec::with_capacity(n),)*
                }
            }

            pub fn push(&mut self, row: &#row) {
                #(self.#fields.push(row.#fields);)*
            }

            pub fn len(&self) -> usize {
                self.#first.len()
            }

            pub fn is_empty(&self) -> bool {
                self.#first.is_empty()
            }

            /// `(field name, column)` pairs in declaration order.
            pub fn columns(&self) -> Vec<(&'static str, &[f64])> {
                vec![#((#names, self.#fields.as_slice())),*]
            }
        }

        impl #row {
            /// Names of the columns, in declaration order.
            pub fn field_names() -> &'static [&'static str] {
                &[#(#names),*]
            }
        }
    })
}

/// Named fields of the struct; every one must be `f64` and there must be at least one.
fn f64_fields(input: &DeriveInput) -> syn::Result<Vec<Ident>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Columnar can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Columnar needs named fields",
        ));
    };
    let mut idents = Vec::with_capacity(named.named.len());
    for field in &named.named {
        if !is_f64(&field.ty) {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "Columnar fields must all be f64",
            ));
        }
        idents.extend(field.ident.clone());
    }
    if idents.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Columnar struct must have at least one field",
        ));
    }
    Ok(idents)
}

fn series_name(input: &DeriveInput) -> syn::Result<Option<Ident>> {
    let mut name = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("columnar")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("series_name") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(format_ident!("{}", lit.value()));
                Ok(())
            } else {
                Err(meta.error("expected `series_name = \"...\"`"))
            }
        })?;
    }
    Ok(name)
}

fn is_f64(ty: &syn::Type) -> bool {
    matches!(ty, syn::Type::Path(p) if p.qself.is_none() && p.path.is_ident("f64"))
}
