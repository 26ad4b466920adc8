use std::collections::BTreeMap;

use odk_schemas::{CompanyInfo, ContactInfo};

use crate::error::RefdataError;
use crate::types::{CatalogEntry, NamedEntry, PoRecord, ProductInfo};

// ---------------------------------------------------------------------------
// RefdataStore
// ---------------------------------------------------------------------------

/// Immutable snapshot of all reference data, loaded once at boot.
///
/// Handlers share it behind an `Arc`; nothing mutates it after load.
#[derive(Debug, Clone)]
pub struct RefdataStore {
    pub(crate) manufacturers: Vec<NamedEntry>,
    pub(crate) ship_to: Vec<NamedEntry>,
    pub(crate) authorized_by: Vec<NamedEntry>,
    pub(crate) product_families: Vec<NamedEntry>,
    pub(crate) shipping_methods: Vec<NamedEntry>,
    pub(crate) terms: Vec<NamedEntry>,
    /// family id → products in that family.
    pub(crate) products: BTreeMap<String, Vec<ProductInfo>>,
    /// manufacturer id → family id → product id → price in cents.
    pub(crate) prices: BTreeMap<String, BTreeMap<String, BTreeMap<String, i64>>>,
    /// manufacturer id → manufacturer-specific extra items (already priced).
    pub(crate) other_items: BTreeMap<String, Vec<CatalogEntry>>,
    pub(crate) company: CompanyInfo,
    pub(crate) manufacturer_contacts: BTreeMap<String, ContactInfo>,
    pub(crate) ship_to_contacts: BTreeMap<String, ContactInfo>,
    pub(crate) existing_pos: Vec<PoRecord>,
}

impl RefdataStore {
    pub fn manufacturers(&self) -> &[NamedEntry] {
        &self.manufacturers
    }

    pub fn ship_to_options(&self) -> &[NamedEntry] {
        &self.ship_to
    }

    pub fn authorized_by_options(&self) -> &[NamedEntry] {
        &self.authorized_by
    }

    pub fn product_families(&self) -> &[NamedEntry] {
        &self.product_families
    }

    /// Product families that actually have pricing for the given
    /// manufacturer, in the order of the master family list.
    pub fn families_for_manufacturer(&self, manufacturer_id: &str) -> Vec<NamedEntry> {
        let Some(priced) = self.prices.get(manufacturer_id) else {
            return Vec::new();
        };
        self.product_families
            .iter()
            .filter(|family| priced.contains_key(&family.id))
            .cloned()
            .collect()
    }

    pub fn shipping_methods(&self) -> &[NamedEntry] {
        &self.shipping_methods
    }

    pub fn terms(&self) -> &[NamedEntry] {
        &self.terms
    }

    pub fn company(&self) -> &CompanyInfo {
        &self.company
    }

    pub fn manufacturer_contact(&self, id: &str) -> Result<&ContactInfo, RefdataError> {
        self.manufacturer_contacts
            .get(id)
            .ok_or_else(|| RefdataError::MissingManufacturerContact { id: id.to_string() })
    }

    pub fn ship_to_contact(&self, id: &str) -> Result<&ContactInfo, RefdataError> {
        self.ship_to_contacts
            .get(id)
            .ok_or_else(|| RefdataError::MissingShipToContact { id: id.to_string() })
    }

    /// Assemble the priced catalog for a manufacturer over the selected
    /// families: family products joined with the manufacturer's price table.
    /// Products the manufacturer does not price are excluded. Unknown
    /// manufacturer or family ids contribute nothing; whether that matters
    /// is decided downstream (an ordered id that resolves nowhere is a
    /// transformation error, an unselected family is not).
    pub fn catalog_for(&self, manufacturer_id: &str, family_ids: &[String]) -> Vec<CatalogEntry> {
        let Some(price_families) = self.prices.get(manufacturer_id) else {
            return Vec::new();
        };
        let mut entries = Vec::new();
        for family_id in family_ids {
            let Some(products) = self.products.get(family_id) else {
                continue;
            };
            let Some(price_table) = price_families.get(family_id) else {
                continue;
            };
            for product in products {
                if let Some(&price_cents) = price_table.get(&product.id) {
                    entries.push(CatalogEntry {
                        id: product.id.clone(),
                        name: product.name.clone(),
                        sku: product.sku.clone(),
                        barcode: product.barcode.clone(),
                        price_cents,
                    });
                }
            }
        }
        entries
    }

    /// Manufacturer-specific extra items, already priced. Empty for an
    /// unknown manufacturer.
    pub fn other_items_for(&self, manufacturer_id: &str) -> &[CatalogEntry] {
        self.other_items
            .get(manufacturer_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The externally maintained list of existing purchase orders, read only
    /// for document numbering.
    pub fn existing_pos(&self) -> &[PoRecord] {
        &self.existing_pos
    }
}

// ---------------------------------------------------------------------------
// RefdataBuilder
// ---------------------------------------------------------------------------

/// In-memory construction of a [`RefdataStore`], used by the loader and by
/// tests that don't want fixture files on disk.
#[derive(Debug, Default)]
pub struct RefdataBuilder {
    manufacturers: Vec<NamedEntry>,
    ship_to: Vec<NamedEntry>,
    authorized_by: Vec<NamedEntry>,
    product_families: Vec<NamedEntry>,
    shipping_methods: Vec<NamedEntry>,
    terms: Vec<NamedEntry>,
    products: BTreeMap<String, Vec<ProductInfo>>,
    prices: BTreeMap<String, BTreeMap<String, BTreeMap<String, i64>>>,
    other_items: BTreeMap<String, Vec<CatalogEntry>>,
    company: Option<CompanyInfo>,
    manufacturer_contacts: BTreeMap<String, ContactInfo>,
    ship_to_contacts: BTreeMap<String, ContactInfo>,
    existing_pos: Vec<PoRecord>,
}

impl RefdataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manufacturers(mut self, entries: Vec<NamedEntry>) -> Self {
        self.manufacturers = entries;
        self
    }

    pub fn ship_to(mut self, entries: Vec<NamedEntry>) -> Self {
        self.ship_to = entries;
        self
    }

    pub fn authorized_by(mut self, entries: Vec<NamedEntry>) -> Self {
        self.authorized_by = entries;
        self
    }

    pub fn product_families(mut self, entries: Vec<NamedEntry>) -> Self {
        self.product_families = entries;
        self
    }

    pub fn shipping_methods(mut self, entries: Vec<NamedEntry>) -> Self {
        self.shipping_methods = entries;
        self
    }

    pub fn terms(mut self, entries: Vec<NamedEntry>) -> Self {
        self.terms = entries;
        self
    }

    pub fn family_product(mut self, family_id: &str, product: ProductInfo) -> Self {
        self.products
            .entry(family_id.to_string())
            .or_default()
            .push(product);
        self
    }

    pub fn price(
        mut self,
        manufacturer_id: &str,
        family_id: &str,
        product_id: &str,
        price_cents: i64,
    ) -> Self {
        self.prices
            .entry(manufacturer_id.to_string())
            .or_default()
            .entry(family_id.to_string())
            .or_default()
            .insert(product_id.to_string(), price_cents);
        self
    }

    pub fn other_item(mut self, manufacturer_id: &str, entry: CatalogEntry) -> Self {
        self.other_items
            .entry(manufacturer_id.to_string())
            .or_default()
            .push(entry);
        self
    }

    pub fn company(mut self, company: CompanyInfo) -> Self {
        self.company = Some(company);
        self
    }

    pub fn manufacturer_contact(mut self, id: &str, contact: ContactInfo) -> Self {
        self.manufacturer_contacts.insert(id.to_string(), contact);
        self
    }

    pub fn ship_to_contact(mut self, id: &str, contact: ContactInfo) -> Self {
        self.ship_to_contacts.insert(id.to_string(), contact);
        self
    }

    pub fn existing_po(mut self, record: PoRecord) -> Self {
        self.existing_pos.push(record);
        self
    }

    pub fn build(self) -> RefdataStore {
        RefdataStore {
            manufacturers: self.manufacturers,
            ship_to: self.ship_to,
            authorized_by: self.authorized_by,
            product_families: self.product_families,
            shipping_methods: self.shipping_methods,
            terms: self.terms,
            products: self.products,
            prices: self.prices,
            other_items: self.other_items,
            company: self.company.unwrap_or(CompanyInfo {
                name: String::new(),
                address_line1: String::new(),
                address_line2: String::new(),
                phone: String::new(),
            }),
            manufacturer_contacts: self.manufacturer_contacts,
            ship_to_contacts: self.ship_to_contacts,
            existing_pos: self.existing_pos,
        }
    }
}
