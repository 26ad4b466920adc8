use std::fmt;

/// A reference-data lookup that must resolve did not.
///
/// These are raised at the lookup boundary so an unresolved contact fails
/// before document assembly begins, not after a later validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefdataError {
    /// No contact block exists for this manufacturer id.
    MissingManufacturerContact { id: String },
    /// No contact block exists for this ship-to id.
    MissingShipToContact { id: String },
}

impl fmt::Display for RefdataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefdataError::MissingManufacturerContact { id } => {
                write!(f, "no manufacturer contact for id {id:?}")
            }
            RefdataError::MissingShipToContact { id } => {
                write!(f, "no ship-to contact for id {id:?}")
            }
        }
    }
}

impl std::error::Error for RefdataError {}
