//! Variant Combination Generator

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::variants::{
    FREE_SIZE, VariantDraft, VariantStatus, combination_key,
    combinations::{Combination, cartesian_product},
    sku,
};

/// Opening stock for generated variants.
pub const INITIAL_STOCK: u64 = 1;

/// Maximum number of attributes that define a variant (colour, size).
pub const MAX_ATTRIBUTES: usize = 2;

/// Values chosen for one variant-defining attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSelection {
    /// Attribute name, e.g. `Color`.
    pub name: String,

    /// Chosen values, in selection order.
    pub values: Vec<String>,
}

impl AttributeSelection {
    /// Create a selection from any string-like values.
    pub fn new<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn non_blank_values(&self) -> Vec<&str> {
        self.values
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .collect()
    }
}

/// Errors reported before any combination is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Every attribute list was empty.
    #[error("no values selected")]
    NoValuesSelected,

    /// More attributes carry values than a variant can be identified by.
    #[error("at most {MAX_ATTRIBUTES} attributes can define a variant, {0} were selected")]
    TooManyAttributes(usize),
}

/// How a generation call turned out, for callers that report the three cases differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// Every combination was new.
    Created,

    /// Some combinations were new, some already existed.
    Partial,

    /// Every combination already existed.
    NoChange,
}

/// Result of a generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Generation {
    /// New variants, in combination order.
    pub accepted: Vec<VariantDraft>,

    /// `color/size` labels of combinations that already existed.
    pub duplicates: Vec<String>,
}

impl Generation {
    /// Classify the result.
    #[must_use]
    pub fn outcome(&self) -> GenerationOutcome {
        match (self.accepted.is_empty(), self.duplicates.is_empty()) {
            (true, _) => GenerationOutcome::NoChange,
            (false, true) => GenerationOutcome::Created,
            (false, false) => GenerationOutcome::Partial,
        }
    }
}

/// Produces new variants for one product from selected attribute values.
#[derive(Debug, Clone)]
pub struct VariantGenerator<'a> {
    product_code: &'a str,
    thumbnail: Option<&'a str>,
    existing: FxHashSet<String>,
    existing_count: usize,
}

impl<'a> VariantGenerator<'a> {
    /// Create a generator for `product_code`, given every `(color, size)` pair the
    /// product already has (archived variants included).
    pub fn new<I, C, S>(product_code: &'a str, existing: I) -> Self
    where
        I: IntoIterator<Item = (C, S)>,
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let mut existing_count = 0;

        let existing = existing
            .into_iter()
            .inspect(|_| existing_count += 1)
            .map(|(color, size)| combination_key(color.as_ref(), size.as_ref()))
            .collect();

        Self {
            product_code,
            thumbnail: None,
            existing,
            existing_count,
        }
    }

    /// Image URL copied onto every generated variant.
    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: Option<&'a str>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    /// Generate the new combinations of `selections`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NoValuesSelected`] when no attribute carries a
    /// value and [`GenerationError::TooManyAttributes`] when more than
    /// [`MAX_ATTRIBUTES`] do.
    pub fn generate(&self, selections: &[AttributeSelection]) -> Result<Generation, GenerationError> {
        let lists: Vec<Vec<&str>> = selections
            .iter()
            .map(AttributeSelection::non_blank_values)
            .filter(|values| !values.is_empty())
            .collect();

        if lists.is_empty() {
            return Err(GenerationError::NoValuesSelected);
        }

        if lists.len() > MAX_ATTRIBUTES {
            return Err(GenerationError::TooManyAttributes(lists.len()));
        }

        let mut seen = self.existing.clone();
        let mut generation = Generation::default();

        for combination in cartesian_product(&lists) {
            let (color, size) = split_combination(&combination);
            let label = format!("{color}/{size}");

            if !seen.insert(combination_key(color, size)) {
                generation.duplicates.push(label);
                continue;
            }

            let sequence = self.existing_count + generation.accepted.len() + 1;

            generation.accepted.push(VariantDraft {
                sku: sku::sku(self.product_code, color, size, sequence),
                color: color.to_string(),
                size: size.to_string(),
                stock_quantity: INITIAL_STOCK,
                price_adjustment: 0,
                image_url: self.thumbnail.map(str::to_string),
                status: VariantStatus::Active,
            });
        }

        Ok(generation)
    }
}

fn split_combination<'v>(combination: &Combination<'_, &'v str>) -> (&'v str, &'v str) {
    let color = combination.first().map_or("", |value| **value);
    let size = combination.get(1).map_or(FREE_SIZE, |value| **value);

    (color, size)
}
