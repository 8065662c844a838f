//! Integration tests for the variant combination generator.

use testresult::TestResult;

use stockroom::variants::{
    VariantDraft,
    generator::{AttributeSelection, GenerationOutcome, VariantGenerator},
};

fn colors_and_sizes() -> [AttributeSelection; 2] {
    [
        AttributeSelection::new("Color", ["Red", "Blue"]),
        AttributeSelection::new("Size", ["40", "41"]),
    ]
}

#[test]
fn existing_combination_is_skipped_and_reported() -> TestResult {
    let generator = VariantGenerator::new("SH01", [("Red", "40")]);

    let generation = generator.generate(&colors_and_sizes())?;

    let labels: Vec<String> = generation.accepted.iter().map(VariantDraft::label).collect();

    assert_eq!(labels, vec!["Red/41", "Blue/40", "Blue/41"]);
    assert_eq!(generation.duplicates, vec!["Red/40"]);
    assert_eq!(generation.outcome(), GenerationOutcome::Partial);

    Ok(())
}

#[test]
fn skus_continue_after_existing_variants() -> TestResult {
    let generator = VariantGenerator::new("SH01", [("Red", "40")]);

    let generation = generator.generate(&colors_and_sizes())?;

    let skus: Vec<&str> = generation.accepted.iter().map(|v| v.sku.as_str()).collect();

    assert_eq!(skus, vec!["SH01-RED-41-002", "SH01-BLUE-40-003", "SH01-BLUE-41-004"]);

    Ok(())
}

#[test]
fn existing_variants_match_case_insensitively() -> TestResult {
    let generator = VariantGenerator::new("SH01", [("RED", "40"), ("blue", "41")]);

    let generation = generator.generate(&colors_and_sizes())?;

    assert_eq!(generation.duplicates, vec!["Red/40", "Blue/41"]);
    assert_eq!(generation.accepted.len(), 2);

    Ok(())
}

#[test]
fn generating_twice_yields_nothing_new() -> TestResult {
    let first = VariantGenerator::new("SH01", Vec::<(String, String)>::new()).generate(&colors_and_sizes())?;

    assert_eq!(first.outcome(), GenerationOutcome::Created);
    assert_eq!(first.accepted.len(), 4);

    let existing: Vec<(String, String)> = first
        .accepted
        .iter()
        .map(|draft| (draft.color.clone(), draft.size.clone()))
        .collect();

    let second = VariantGenerator::new("SH01", existing).generate(&colors_and_sizes())?;

    assert!(second.accepted.is_empty());
    assert_eq!(second.duplicates.len(), 4);
    assert_eq!(second.outcome(), GenerationOutcome::NoChange);

    Ok(())
}

#[test]
fn skus_are_unique_across_generation_calls() -> TestResult {
    let first = VariantGenerator::new("SH01", Vec::<(String, String)>::new())
        .generate(&[AttributeSelection::new("Color", ["Red"])])?;

    let existing: Vec<(String, String)> = first
        .accepted
        .iter()
        .map(|draft| (draft.color.clone(), draft.size.clone()))
        .collect();

    let second =
        VariantGenerator::new("SH01", existing).generate(&[AttributeSelection::new("Color", ["Rose"])])?;

    let first_sku = first.accepted.first().map(|v| v.sku.clone());
    let second_sku = second.accepted.first().map(|v| v.sku.clone());

    assert_eq!(first_sku.as_deref(), Some("SH01-RED-FREE-001"));
    assert_eq!(second_sku.as_deref(), Some("SH01-ROSE-FREE-002"));

    Ok(())
}
