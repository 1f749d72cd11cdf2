mod document;

use proc_macro::TokenStream;

/// Derive macro for the `Document` trait.
///
/// The identifier field is store-assigned and never part of the stored body,
/// so it should also carry `#[serde(skip)]`.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Document)]
/// #[document(collection = "exercises")]
/// pub struct ExerciseRecord {
///     #[serde(skip)]
///     #[document(id)]
///     pub id: String,
///     pub name: String,
/// }
/// ```
///
/// Without `collection`, the collection name is the snake_case struct name
/// plus `s`. Without `#[document(id)]`, a field named `id` is used.
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}
