//! Classifier: map a free-form user message to a `(QueryIntent, TaskType)`
//! pair (spec §4.4, C4).
//!
//! Deterministic and side-effect free: an ordered sequence of
//! keyword/phrase predicates, checked in an order that matters —
//! internet-search phrases beat EOL phrases beat inventory phrases, per
//! spec §4.4's explicit ordering note.

use serde::{Deserialize, Serialize};

/// The finite intent space a user message is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    DirectEol,
    InternetEol,
    OsInventory,
    SoftwareInventory,
    OsEolGrounded,
    SoftwareEolGrounded,
    GeneralEolGrounded,
    UpdatePlanning,
}

/// What kind of work the orchestrator must perform for a given intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    EolOnly,
    InternetEol,
    InventoryOnly,
    MixedInventoryEol,
    UpdatePlanning,
}

impl QueryIntent {
    /// The fixed intent→task mapping from spec §4.4.
    #[must_use]
    pub const fn task_type(self) -> TaskType {
        match self {
            Self::InternetEol => TaskType::InternetEol,
            Self::DirectEol => TaskType::EolOnly,
            Self::OsInventory | Self::SoftwareInventory => TaskType::InventoryOnly,
            Self::OsEolGrounded | Self::SoftwareEolGrounded | Self::GeneralEolGrounded => {
                TaskType::MixedInventoryEol
            }
            Self::UpdatePlanning => TaskType::UpdatePlanning,
        }
    }
}

/// The classifier's full decision, ready to hand to the
/// [`crate::router::Router`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: QueryIntent,
    pub task: TaskType,
}

const INTERNET_PHRASES: &[&str] = &["search the web", "search online", "look it up online", "google"];
const UPDATE_PLANNING_PHRASES: &[&str] = &["upgrade", "migration", "migrate", "update plan", "plan to move"];
const OS_KEYWORDS: &[&str] = &["os", "operating system", "operating systems"];
const SOFTWARE_KEYWORDS: &[&str] = &["software", "application", "applications", "apps"];
const INVENTORY_PHRASES: &[&str] = &["what do i have", "what os", "what software", "inventory", "list of", "which os", "which software"];
const EOL_PHRASES: &[&str] = &["end of life", "eol", "end of support", "support end", "still supported", "deprecated"];
const GROUNDED_PHRASES: &[&str] = &["my inventory", "our inventory", "my environment", "our environment", "in our estate", "across my"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Classify a user message. Order matters: internet-search phrasing is
/// checked first, then update-planning, then EOL-grounded-against-inventory
/// phrasing, then bare inventory phrasing, then a plain EOL question,
/// finally falling back to a general grounded review.
#[must_use]
pub fn classify(message: &str) -> Classification {
    let lower = message.to_lowercase();

    if contains_any(&lower, INTERNET_PHRASES) {
        return finish(QueryIntent::InternetEol);
    }

    if contains_any(&lower, UPDATE_PLANNING_PHRASES) {
        return finish(QueryIntent::UpdatePlanning);
    }

    let mentions_eol = contains_any(&lower, EOL_PHRASES);
    let mentions_grounded = contains_any(&lower, GROUNDED_PHRASES) || contains_any(&lower, INVENTORY_PHRASES);
    let mentions_os = contains_any(&lower, OS_KEYWORDS);
    let mentions_software = contains_any(&lower, SOFTWARE_KEYWORDS);

    if mentions_eol && mentions_grounded {
        return finish(if mentions_os && !mentions_software {
            QueryIntent::OsEolGrounded
        } else if mentions_software && !mentions_os {
            QueryIntent::SoftwareEolGrounded
        } else {
            QueryIntent::GeneralEolGrounded
        });
    }

    if contains_any(&lower, INVENTORY_PHRASES) {
        return finish(if mentions_software && !mentions_os {
            QueryIntent::SoftwareInventory
        } else {
            QueryIntent::OsInventory
        });
    }

    if mentions_eol {
        return finish(QueryIntent::DirectEol);
    }

    finish(QueryIntent::GeneralEolGrounded)
}

fn finish(intent: QueryIntent) -> Classification {
    Classification {
        intent,
        task: intent.task_type(),
    }
}
