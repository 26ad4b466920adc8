use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WizardState
// ---------------------------------------------------------------------------

/// A user-supplied label/value pair (packaging custom fields, extra fields).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabeledField {
    pub label: String,
    pub value: String,
}

/// Packaging requirements collected on the remarks step: two fixed
/// components plus open-ended custom pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackageInstructions {
    pub bottle: String,
    pub bottle_top: String,
    pub custom_fields: Vec<LabeledField>,
}

/// Everything the six steps accumulate. Created empty, mutated only through
/// [`StepUpdate`] messages, consumed once at submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WizardState {
    pub manufacturer: String,
    pub ship_to: String,
    pub authorized_by: String,
    /// Multi-select: zero or more family ids, in selection order.
    pub product_families: Vec<String>,
    pub shipped_via: String,
    pub terms: String,
    pub estimated_delivery: Option<NaiveDate>,
    /// product id → quantity. Quantity 0 removes the entry, so every stored
    /// quantity is positive.
    pub products: BTreeMap<String, u32>,
    pub remarks: String,
    pub package_instructions: PackageInstructions,
    pub extra_fields: Vec<LabeledField>,
    pub email: String,
}

// ---------------------------------------------------------------------------
// StepUpdate — intent messages
// ---------------------------------------------------------------------------

/// One mutation request emitted by a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepUpdate {
    // Step 1 — Manufacturing
    SetManufacturer { id: String },
    SetShipTo { id: String },
    SetAuthorizedBy { id: String },

    // Step 2 — Product and Conditions
    ToggleProductFamily { id: String, selected: bool },
    SetShippedVia { id: String },
    SetEstimatedDelivery { date: Option<NaiveDate> },
    SetTerms { id: String },

    // Step 3 — Order Details
    SetQuantity { product_id: String, quantity: u32 },

    // Step 4 — Remarks and packaging
    SetRemarks { text: String },
    SetBottleInstructions { text: String },
    SetBottleTopInstructions { text: String },
    AddPackageField,
    UpdatePackageField { index: usize, label: String, value: String },
    RemovePackageField { index: usize },

    // Step 5 — Extra fields
    AddExtraField,
    UpdateExtraField { index: usize, label: String, value: String },
    RemoveExtraField { index: usize },

    // Step 6 — Confirmation
    SetEmail { email: String },
}

/// An update referenced a custom-field index that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOutOfRange {
    pub list: &'static str,
    pub index: usize,
}

impl std::fmt::Display for IndexOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no {} entry at index {}", self.list, self.index)
    }
}

impl std::error::Error for IndexOutOfRange {}

impl WizardState {
    /// Apply one intent message. The only fallible updates are the ones
    /// addressing a custom-field list by index.
    pub fn apply(&mut self, update: StepUpdate) -> Result<(), IndexOutOfRange> {
        match update {
            StepUpdate::SetManufacturer { id } => self.manufacturer = id,
            StepUpdate::SetShipTo { id } => self.ship_to = id,
            StepUpdate::SetAuthorizedBy { id } => self.authorized_by = id,

            StepUpdate::ToggleProductFamily { id, selected } => {
                if selected {
                    if !self.product_families.contains(&id) {
                        self.product_families.push(id);
                    }
                } else {
                    self.product_families.retain(|f| f != &id);
                }
            }
            StepUpdate::SetShippedVia { id } => self.shipped_via = id,
            StepUpdate::SetEstimatedDelivery { date } => self.estimated_delivery = date,
            StepUpdate::SetTerms { id } => self.terms = id,

            StepUpdate::SetQuantity {
                product_id,
                quantity,
            } => {
                if quantity > 0 {
                    self.products.insert(product_id, quantity);
                } else {
                    self.products.remove(&product_id);
                }
            }

            StepUpdate::SetRemarks { text } => self.remarks = text,
            StepUpdate::SetBottleInstructions { text } => self.package_instructions.bottle = text,
            StepUpdate::SetBottleTopInstructions { text } => {
                self.package_instructions.bottle_top = text
            }
            StepUpdate::AddPackageField => self
                .package_instructions
                .custom_fields
                .push(LabeledField::default()),
            StepUpdate::UpdatePackageField { index, label, value } => {
                let field = self
                    .package_instructions
                    .custom_fields
                    .get_mut(index)
                    .ok_or(IndexOutOfRange {
                        list: "package custom field",
                        index,
                    })?;
                field.label = label;
                field.value = value;
            }
            StepUpdate::RemovePackageField { index } => {
                if index >= self.package_instructions.custom_fields.len() {
                    return Err(IndexOutOfRange {
                        list: "package custom field",
                        index,
                    });
                }
                self.package_instructions.custom_fields.remove(index);
            }

            StepUpdate::AddExtraField => self.extra_fields.push(LabeledField::default()),
            StepUpdate::UpdateExtraField { index, label, value } => {
                let field = self.extra_fields.get_mut(index).ok_or(IndexOutOfRange {
                    list: "extra field",
                    index,
                })?;
                field.label = label;
                field.value = value;
            }
            StepUpdate::RemoveExtraField { index } => {
                if index >= self.extra_fields.len() {
                    return Err(IndexOutOfRange {
                        list: "extra field",
                        index,
                    });
                }
                self.extra_fields.remove(index);
            }

            StepUpdate::SetEmail { email } => self.email = email,
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Email check
// ---------------------------------------------------------------------------

/// Minimal recipient-email shape check: one `@`, a non-empty local part and
/// a dotted domain, no whitespace. This mirrors what the form enforced; real
/// address verification is out of scope.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_zero_removes_the_product() {
        let mut state = WizardState::default();
        state
            .apply(StepUpdate::SetQuantity {
                product_id: "p1".to_string(),
                quantity: 3,
            })
            .unwrap();
        assert_eq!(state.products.get("p1"), Some(&3));

        state
            .apply(StepUpdate::SetQuantity {
                product_id: "p1".to_string(),
                quantity: 0,
            })
            .unwrap();
        assert!(state.products.is_empty());
    }

    #[test]
    fn family_toggle_is_idempotent() {
        let mut state = WizardState::default();
        for _ in 0..2 {
            state
                .apply(StepUpdate::ToggleProductFamily {
                    id: "gin".to_string(),
                    selected: true,
                })
                .unwrap();
        }
        assert_eq!(state.product_families, vec!["gin".to_string()]);

        state
            .apply(StepUpdate::ToggleProductFamily {
                id: "gin".to_string(),
                selected: false,
            })
            .unwrap();
        assert!(state.product_families.is_empty());
    }

    #[test]
    fn custom_field_lifecycle() {
        let mut state = WizardState::default();
        state.apply(StepUpdate::AddPackageField).unwrap();
        state
            .apply(StepUpdate::UpdatePackageField {
                index: 0,
                label: "Label color".to_string(),
                value: "gold".to_string(),
            })
            .unwrap();
        assert_eq!(
            state.package_instructions.custom_fields[0].value,
            "gold"
        );

        state
            .apply(StepUpdate::RemovePackageField { index: 0 })
            .unwrap();
        assert!(state.package_instructions.custom_fields.is_empty());
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let mut state = WizardState::default();
        let err = state
            .apply(StepUpdate::UpdateExtraField {
                index: 0,
                label: String::new(),
                value: String::new(),
            })
            .unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.list, "extra field");
    }

    #[test]
    fn updates_deserialize_from_tagged_json() {
        let update: StepUpdate = serde_json::from_str(
            r#"{"type":"set_quantity","product_id":"p1","quantity":2}"#,
        )
        .unwrap();
        assert_eq!(
            update,
            StepUpdate::SetQuantity {
                product_id: "p1".to_string(),
                quantity: 2
            }
        );

        let update: StepUpdate =
            serde_json::from_str(r#"{"type":"set_estimated_delivery","date":null}"#).unwrap();
        assert_eq!(update, StepUpdate::SetEstimatedDelivery { date: None });
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("buyer@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at.example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user @example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
    }
}
