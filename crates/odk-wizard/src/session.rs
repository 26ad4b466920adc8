use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{IndexOutOfRange, StepUpdate, WizardState};

// ---------------------------------------------------------------------------
// WizardStep
// ---------------------------------------------------------------------------

/// The fixed six-step order. There is no skip logic; navigation is a plain
/// increment/decrement clamped at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Manufacturing,
    ProductConditions,
    OrderDetails,
    Remarks,
    ExtraFields,
    Confirmation,
}

impl WizardStep {
    pub const COUNT: u8 = 6;

    /// 1-based position, as shown to the user ("Step 3 of 6").
    pub fn index(self) -> u8 {
        match self {
            WizardStep::Manufacturing => 1,
            WizardStep::ProductConditions => 2,
            WizardStep::OrderDetails => 3,
            WizardStep::Remarks => 4,
            WizardStep::ExtraFields => 5,
            WizardStep::Confirmation => 6,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Manufacturing => "Manufacturing",
            WizardStep::ProductConditions => "Product and Conditions",
            WizardStep::OrderDetails => "Order Details",
            WizardStep::Remarks => "Remarks",
            WizardStep::ExtraFields => "Extra Fields",
            WizardStep::Confirmation => "Confirmation",
        }
    }

    /// The following step; `Confirmation` is its own successor (clamped).
    pub fn next(self) -> WizardStep {
        match self {
            WizardStep::Manufacturing => WizardStep::ProductConditions,
            WizardStep::ProductConditions => WizardStep::OrderDetails,
            WizardStep::OrderDetails => WizardStep::Remarks,
            WizardStep::Remarks => WizardStep::ExtraFields,
            WizardStep::ExtraFields => WizardStep::Confirmation,
            WizardStep::Confirmation => WizardStep::Confirmation,
        }
    }

    /// The preceding step; `Manufacturing` is its own predecessor (clamped).
    pub fn prev(self) -> WizardStep {
        match self {
            WizardStep::Manufacturing => WizardStep::Manufacturing,
            WizardStep::ProductConditions => WizardStep::Manufacturing,
            WizardStep::OrderDetails => WizardStep::ProductConditions,
            WizardStep::Remarks => WizardStep::OrderDetails,
            WizardStep::ExtraFields => WizardStep::Remarks,
            WizardStep::Confirmation => WizardStep::ExtraFields,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Why a session operation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session reached its terminal state; no further edits or backward
    /// navigation are possible.
    AlreadySubmitted,
    /// An update addressed a custom-field index that does not exist.
    BadIndex(IndexOutOfRange),
    /// Submission was requested away from the confirmation step.
    NotOnConfirmationStep { current: WizardStep },
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::AlreadySubmitted => {
                write!(f, "session is already submitted")
            }
            SessionError::BadIndex(inner) => inner.fmt(f),
            SessionError::NotOnConfirmationStep { current } => {
                write!(
                    f,
                    "submission is only allowed on the confirmation step (currently on {:?})",
                    current
                )
            }
        }
    }
}

impl std::error::Error for SessionError {}

// ---------------------------------------------------------------------------
// WizardSession
// ---------------------------------------------------------------------------

/// Owns one wizard's state and its position in the step sequence.
///
/// All mutation goes through [`WizardSession::apply`]; navigation clamps at
/// the bounds; `submitted` is terminal and blocks both edits and backward
/// navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardSession {
    pub id: Uuid,
    pub state: WizardState,
    pub step: WizardStep,
    pub submitted: bool,
}

impl WizardSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            state: WizardState::default(),
            step: WizardStep::Manufacturing,
            submitted: false,
        }
    }

    /// Apply one step intent to the owned state.
    pub fn apply(&mut self, update: StepUpdate) -> Result<(), SessionError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        self.state.apply(update).map_err(SessionError::BadIndex)
    }

    /// Advance one step, clamped at the confirmation step.
    pub fn next(&mut self) -> WizardStep {
        self.step = self.step.next();
        self.step
    }

    /// Go back one step, clamped at the first step. Refused once submitted.
    pub fn back(&mut self) -> Result<WizardStep, SessionError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        self.step = self.step.prev();
        Ok(self.step)
    }

    /// Check that a submission attempt is allowed right now: on the
    /// confirmation step and not yet submitted. The session is only marked
    /// submitted after the gateway reports success, so a failed attempt
    /// leaves it resubmittable.
    pub fn ensure_submittable(&self) -> Result<(), SessionError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        if self.step != WizardStep::Confirmation {
            return Err(SessionError::NotOnConfirmationStep { current: self.step });
        }
        Ok(())
    }

    /// Enter the terminal state.
    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }
}
