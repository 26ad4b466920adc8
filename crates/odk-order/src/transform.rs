use std::fmt;

use chrono::NaiveDate;

use odk_refdata::{CatalogEntry, RefdataError, RefdataStore};
use odk_schemas::{
    cents_to_amount, validate, AnnexedItem, AuthDetails, GeneralPoInfo, LineItem,
    PackagingInstruction, PurchaseOrder, SummaryTotals, ValidationError,
};
use odk_wizard::WizardState;

// ---------------------------------------------------------------------------
// TransformError
// ---------------------------------------------------------------------------

/// Why the pipeline refused to produce a document. All variants abort the
/// submission attempt before anything reaches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// An ordered product id resolves to neither a catalog entry for a
    /// selected family nor a manufacturer-specific other item.
    MissingProduct { id: String },
    /// A manufacturer or ship-to contact lookup failed.
    Refdata(RefdataError),
    /// The assembled document violated a schema invariant.
    Validation(ValidationError),
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::MissingProduct { id } => {
                write!(f, "ordered product {id:?} not found in catalog or other items")
            }
            TransformError::Refdata(inner) => inner.fmt(f),
            TransformError::Validation(inner) => {
                write!(f, "assembled document failed validation: {inner}")
            }
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransformError::MissingProduct { .. } => None,
            TransformError::Refdata(inner) => Some(inner),
            TransformError::Validation(inner) => Some(inner),
        }
    }
}

impl From<RefdataError> for TransformError {
    fn from(err: RefdataError) -> Self {
        TransformError::Refdata(err)
    }
}

// ---------------------------------------------------------------------------
// build_purchase_order
// ---------------------------------------------------------------------------

const ISO_DATE: &str = "%Y-%m-%d";

/// Assemble and validate a purchase-order document.
///
/// Pure function of its inputs: identical `(state, refdata, po_number,
/// today)` yield a structurally identical document, so a retry after an
/// upstream failure resubmits exactly what the first attempt sent.
///
/// Contacts are resolved first: an unresolvable manufacturer or ship-to id
/// fails with an error naming the id rather than assembling a document with
/// empty contact blocks for the validator to reject later.
pub fn build_purchase_order(
    state: &WizardState,
    refdata: &RefdataStore,
    po_number: &str,
    today: NaiveDate,
) -> Result<PurchaseOrder, TransformError> {
    let manufacturer = refdata.manufacturer_contact(&state.manufacturer)?;
    let ship_to = refdata.ship_to_contact(&state.ship_to)?;

    let catalog = refdata.catalog_for(&state.manufacturer, &state.product_families);
    let other_items = refdata.other_items_for(&state.manufacturer);

    // The state only stores positive quantities, but filter anyway so a
    // hand-built state cannot smuggle a zero-quantity line past us.
    let mut items = Vec::new();
    let mut subtotal_cents: i64 = 0;
    let mut total_bottles: u32 = 0;
    for (product_id, &quantity) in state.products.iter().filter(|(_, &q)| q > 0) {
        let entry = resolve_product(product_id, &catalog, other_items).ok_or_else(|| {
            TransformError::MissingProduct {
                id: product_id.clone(),
            }
        })?;

        let line_total_cents = entry.price_cents * i64::from(quantity);
        items.push(LineItem {
            item_number: entry.sku.clone(),
            quantity,
            description: entry.name.clone(),
            barcode: entry.barcode.clone(),
            unit_price: cents_to_amount(entry.price_cents),
            total: cents_to_amount(line_total_cents),
        });
        subtotal_cents += line_total_cents;
        total_bottles += quantity;
    }

    let today_iso = today.format(ISO_DATE).to_string();
    let est_delivery = state
        .estimated_delivery
        .map(|date| date.format(ISO_DATE).to_string())
        .unwrap_or_else(|| today_iso.clone());

    let subtotal = cents_to_amount(subtotal_cents);
    let po = PurchaseOrder {
        po_number: po_number.to_string(),
        po_date: today_iso.clone(),
        company: refdata.company().clone(),
        to_manufacturer: manufacturer.clone(),
        ship_to: ship_to.clone(),
        general_po_info: GeneralPoInfo {
            product_name: state.product_families.join(", "),
            shipped_via: state.shipped_via.clone(),
            est_delivery_date: est_delivery,
            payment_terms: state.terms.clone(),
        },
        items,
        remarks: state.remarks.clone(),
        summary_totals: SummaryTotals {
            total_bottles,
            subtotal,
            shipping: 0.0,
            other_fees: 0.0,
            grand_total: subtotal,
            deposit: 0.0,
        },
        packaging_instructions: packaging_instructions(state),
        auth_details: AuthDetails {
            date_of_signature: today_iso,
            authority: state.authorized_by.clone(),
        },
        annex_items: annex_items(state),
    };

    validate(&po).map_err(TransformError::Validation)?;
    Ok(po)
}

/// Catalog entries take precedence; other items are the fallback.
fn resolve_product<'a>(
    product_id: &str,
    catalog: &'a [CatalogEntry],
    other_items: &'a [CatalogEntry],
) -> Option<&'a CatalogEntry> {
    catalog
        .iter()
        .find(|entry| entry.id == product_id)
        .or_else(|| other_items.iter().find(|entry| entry.id == product_id))
}

/// Fixed components first (skipping empty values), then the custom pairs.
/// A custom pair needs both a label and a value to be carried.
fn packaging_instructions(state: &WizardState) -> Vec<PackagingInstruction> {
    let pkg = &state.package_instructions;
    let mut instructions = Vec::new();
    if !pkg.bottle.trim().is_empty() {
        instructions.push(PackagingInstruction {
            component: "bottle".to_string(),
            instructions: pkg.bottle.clone(),
        });
    }
    if !pkg.bottle_top.trim().is_empty() {
        instructions.push(PackagingInstruction {
            component: "bottle_top".to_string(),
            instructions: pkg.bottle_top.clone(),
        });
    }
    for field in &pkg.custom_fields {
        if field.label.trim().is_empty() || field.value.trim().is_empty() {
            continue;
        }
        instructions.push(PackagingInstruction {
            component: component_key(&field.label),
            instructions: field.value.clone(),
        });
    }
    instructions
}

/// Machine key for a custom packaging label: lower-cased, whitespace runs
/// collapsed to a single underscore.
fn component_key(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Extra fields become annex items with the fixed `custom_field` type.
/// Unlabeled rows (left behind by the form's add-row button) are dropped.
fn annex_items(state: &WizardState) -> Vec<AnnexedItem> {
    state
        .extra_fields
        .iter()
        .filter(|field| !field.label.trim().is_empty())
        .map(|field| AnnexedItem {
            title: field.label.clone(),
            r#type: "custom_field".to_string(),
            content: field.value.clone(),
        })
        .collect()
}
