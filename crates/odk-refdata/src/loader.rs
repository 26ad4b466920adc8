//! Filesystem loader for the reference-data directory.
//!
//! Every file is read once at boot. Prices arrive as decimal JSON numbers
//! and are converted to integer cents here, at the load boundary.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use odk_schemas::{cents_from_amount, CompanyInfo, ContactInfo};

use crate::store::RefdataStore;
use crate::types::{CatalogEntry, NamedEntry, PoRecord, ProductInfo};

// ---------------------------------------------------------------------------
// Raw file rows
// ---------------------------------------------------------------------------

/// `manufacturer_products.json` price row. The legacy `manufacturer_id`
/// field some files carry is ignored by serde.
#[derive(Debug, Deserialize)]
struct PriceRow {
    id: String,
    price: f64,
}

/// `other_items.json` row: a fully described, already priced item.
#[derive(Debug, Deserialize)]
struct OtherItemRow {
    id: String,
    name: String,
    sku: String,
    price: f64,
    #[serde(default)]
    barcode: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl RefdataStore {
    /// Load every reference file from `dir`.
    ///
    /// All files are required except `pos.json`; a missing PO list means no
    /// orders exist yet and numbering starts at 1.
    pub fn load_dir(dir: &Path) -> Result<RefdataStore> {
        let manufacturers: Vec<NamedEntry> = read_json(dir, "manufacturers.json")?;
        let ship_to: Vec<NamedEntry> = read_json(dir, "ship_to.json")?;
        let authorized_by: Vec<NamedEntry> = read_json(dir, "authorized_by.json")?;
        let product_families: Vec<NamedEntry> = read_json(dir, "product_families.json")?;
        let shipping_methods: Vec<NamedEntry> = read_json(dir, "shipping_methods.json")?;
        let terms: Vec<NamedEntry> = read_json(dir, "terms.json")?;

        let products: BTreeMap<String, Vec<ProductInfo>> = read_json(dir, "products.json")?;

        let raw_prices: BTreeMap<String, BTreeMap<String, Vec<PriceRow>>> =
            read_json(dir, "manufacturer_products.json")?;
        let mut prices: BTreeMap<String, BTreeMap<String, BTreeMap<String, i64>>> =
            BTreeMap::new();
        for (manufacturer_id, families) in raw_prices {
            let family_tables = prices.entry(manufacturer_id).or_default();
            for (family_id, rows) in families {
                let table = family_tables.entry(family_id).or_default();
                for row in rows {
                    table.insert(row.id, cents_from_amount(row.price));
                }
            }
        }

        let raw_other: BTreeMap<String, Vec<OtherItemRow>> = read_json(dir, "other_items.json")?;
        let mut other_items: BTreeMap<String, Vec<CatalogEntry>> = BTreeMap::new();
        for (manufacturer_id, rows) in raw_other {
            let entries = other_items.entry(manufacturer_id).or_default();
            for row in rows {
                entries.push(CatalogEntry {
                    id: row.id,
                    name: row.name,
                    sku: row.sku,
                    barcode: row.barcode,
                    price_cents: cents_from_amount(row.price),
                });
            }
        }

        let company: CompanyInfo = read_json(dir, "company_info.json")?;
        let manufacturer_contacts: BTreeMap<String, ContactInfo> =
            read_json(dir, "manufacturer_contacts.json")?;
        let ship_to_contacts: BTreeMap<String, ContactInfo> =
            read_json(dir, "ship_to_contacts.json")?;

        let existing_pos: Vec<PoRecord> = if dir.join("pos.json").exists() {
            read_json(dir, "pos.json")?
        } else {
            Vec::new()
        };

        Ok(RefdataStore {
            manufacturers,
            ship_to,
            authorized_by,
            product_families,
            shipping_methods,
            terms,
            products,
            prices,
            other_items,
            company,
            manufacturer_contacts,
            ship_to_contacts,
            existing_pos,
        })
    }
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let path = dir.join(file);
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read reference file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid JSON in reference file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, file: &str, contents: &str) {
        fs::write(dir.join(file), contents).unwrap();
    }

    fn write_fixture_dir(dir: &Path) {
        write(dir, "manufacturers.json", r#"[{"id":"acme","name":"Acme"}]"#);
        write(dir, "ship_to.json", r#"[{"id":"wh1","name":"Main warehouse"}]"#);
        write(dir, "authorized_by.json", r#"[{"id":"jdoe","name":"J. Doe"}]"#);
        write(dir, "product_families.json", r#"[{"id":"gin","name":"Gin"}]"#);
        write(dir, "shipping_methods.json", r#"[{"id":"sea","name":"Sea freight"}]"#);
        write(dir, "terms.json", r#"[{"id":"net30","name":"Net 30"}]"#);
        write(
            dir,
            "products.json",
            r#"{"gin":[{"id":"p1","name":"Gin 750ml","sku":"SKU-1","barcode":"111"}]}"#,
        );
        write(
            dir,
            "manufacturer_products.json",
            r#"{"acme":{"gin":[{"id":"p1","manufacturer_id":"acme","price":10.0}]}}"#,
        );
        write(
            dir,
            "other_items.json",
            r#"{"acme":[{"id":"crate","name":"Crate","sku":"SKU-C","price":5.5}]}"#,
        );
        write(
            dir,
            "company_info.json",
            r#"{"name":"Orderdesk Co","address_line1":"2 High St","address_line2":"Metropolis","phone":"555-0101"}"#,
        );
        write(
            dir,
            "manufacturer_contacts.json",
            r#"{"acme":{"name":"Acme Sales","company_name":"Acme Inc","address_line1":"1 Main St","address_line2":"Springfield","tel":"555-0100"}}"#,
        );
        write(
            dir,
            "ship_to_contacts.json",
            r#"{"wh1":{"name":"Receiving","company_name":"Orderdesk Co","address_line1":"2 High St","address_line2":"Metropolis","tel":"555-0101"}}"#,
        );
        write(dir, "pos.json", r#"[{"po_number":"7"},{"doc_id":"9"}]"#);
    }

    #[test]
    fn loads_full_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dir(dir.path());

        let store = RefdataStore::load_dir(dir.path()).unwrap();
        assert_eq!(store.manufacturers().len(), 1);
        assert_eq!(store.company().name, "Orderdesk Co");
        assert_eq!(store.existing_pos().len(), 2);

        // Decimal prices arrive as cents.
        let catalog = store.catalog_for("acme", &["gin".to_string()]);
        assert_eq!(catalog[0].price_cents, 1_000);
        assert_eq!(store.other_items_for("acme")[0].price_cents, 550);

        store.manufacturer_contact("acme").unwrap();
        store.ship_to_contact("wh1").unwrap();
    }

    #[test]
    fn missing_pos_file_defaults_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dir(dir.path());
        fs::remove_file(dir.path().join("pos.json")).unwrap();

        let store = RefdataStore::load_dir(dir.path()).unwrap();
        assert!(store.existing_pos().is_empty());
    }

    #[test]
    fn missing_required_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dir(dir.path());
        fs::remove_file(dir.path().join("terms.json")).unwrap();

        let err = RefdataStore::load_dir(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("terms.json"));
    }

    #[test]
    fn invalid_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_dir(dir.path());
        write(dir.path(), "products.json", "{not json");

        let err = RefdataStore::load_dir(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("products.json"));
    }
}
