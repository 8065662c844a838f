//! Variants Data

use serde::Serialize;
use stockroom::variants::generator::GenerationOutcome;

use crate::domain::variants::records::VariantRecord;

/// Variants created by one generation call, and the combinations skipped.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub created: Vec<VariantRecord>,
    pub duplicates: Vec<String>,
}

impl GenerationReport {
    #[must_use]
    pub fn outcome(&self) -> GenerationOutcome {
        match (self.created.is_empty(), self.duplicates.is_empty()) {
            (true, _) => GenerationOutcome::NoChange,
            (false, true) => GenerationOutcome::Created,
            (false, false) => GenerationOutcome::Partial,
        }
    }
}
