mod document;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Document)] derive macro
// ============================================================================

/// Derive macro for the `Document` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Document)]
/// struct Vehicle {
///     pub id: String,
///     pub name: String,
/// }
///
/// #[derive(Clone, Serialize, Deserialize, Document)]
/// #[document(name = "RollingStock")]
/// struct Train {
///     pub id: String,
/// }
/// ```
///
/// - `NAME` defaults to the struct identifier.
/// - `#[document(name = "...")]` overrides it. The name shows up in
///   `CollectionNotFound` errors and is the key used by `CollectionNames`.
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}
