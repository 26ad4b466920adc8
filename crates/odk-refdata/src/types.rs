use serde::{Deserialize, Serialize};

/// An id/name pair as stored in the option-list files (manufacturers,
/// ship-to destinations, authorizers, product families, shipping methods,
/// payment terms).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub id: String,
    pub name: String,
}

/// Catalog product description, keyed by product family. Carries no price;
/// pricing is per manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub id: String,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub barcode: String,
}

/// A product available for a given manufacturer, with its resolved price.
///
/// Price is integer cents; the f64 from the reference file is converted at
/// the load boundary and never used in arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub barcode: String,
    pub price_cents: i64,
}

/// A row of the externally maintained purchase-order list, used only to
/// derive the next document number. Older rows carry `doc_id` instead of
/// `po_number`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoRecord {
    #[serde(default)]
    pub po_number: Option<String>,
    #[serde(default)]
    pub doc_id: Option<String>,
}
