use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Parties
// ---------------------------------------------------------------------------

/// The issuing company block (`company` in the document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub phone: String,
}

/// A contact block, used for both `to_manufacturer` and `ship_to`.
///
/// `title` and `email` are optional in the source data and default to the
/// empty string on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub company_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub tel: String,
    #[serde(default)]
    pub email: String,
}

// ---------------------------------------------------------------------------
// Order body
// ---------------------------------------------------------------------------

/// Header-level order info (`general_po_info`). Dates are ISO `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralPoInfo {
    pub product_name: String,
    pub shipped_via: String,
    pub est_delivery_date: String,
    pub payment_terms: String,
}

/// One ordered line. `total` must equal `quantity × unit_price`; the
/// validator checks this in integer cents, never by f64 equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_number: String,
    pub quantity: u32,
    pub description: String,
    #[serde(default)]
    pub barcode: String,
    pub unit_price: f64,
    pub total: f64,
}

/// Computed totals block. `shipping`, `other_fees` and `deposit` default to
/// zero; `grand_total` must equal `subtotal + shipping + other_fees`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub total_bottles: u32,
    pub subtotal: f64,
    #[serde(default)]
    pub shipping: f64,
    #[serde(default)]
    pub other_fees: f64,
    pub grand_total: f64,
    #[serde(default)]
    pub deposit: f64,
}

/// A packaging requirement: machine key (`bottle`, `bottle_top`, or a
/// normalized custom label) plus free-text instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagingInstruction {
    pub component: String,
    pub instructions: String,
}

/// A user-supplied custom label/value pair carried for information only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnexedItem {
    pub title: String,
    #[serde(default = "AnnexedItem::default_type")]
    pub r#type: String,
    pub content: String,
}

impl AnnexedItem {
    fn default_type() -> String {
        "document".to_string()
    }
}

/// Authorization block: who signed off and when (ISO `YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthDetails {
    pub date_of_signature: String,
    pub authority: String,
}

// ---------------------------------------------------------------------------
// PurchaseOrder
// ---------------------------------------------------------------------------

/// The canonical purchase-order document.
///
/// Created once per submission attempt by the transformation pipeline and
/// never mutated after validation. This system does not persist it; the
/// audit artifact and the outbound POST carry the exact same serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub po_number: String,
    pub po_date: String,
    pub company: CompanyInfo,
    pub to_manufacturer: ContactInfo,
    pub ship_to: ContactInfo,
    pub general_po_info: GeneralPoInfo,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub remarks: String,
    pub summary_totals: SummaryTotals,
    pub packaging_instructions: Vec<PackagingInstruction>,
    pub auth_details: AuthDetails,
    pub annex_items: Vec<AnnexedItem>,
}
