//! Integration tests for stocktake drafts and completion.

use jiff::Timestamp;
use testresult::TestResult;
use uuid::Uuid;

use stockroom::stocktakes::{
    Stocktake, StocktakeDraft, StocktakeLine, StocktakeScope, StocktakeStatus,
};

fn snapshot(stocks: &[u64]) -> Vec<StocktakeLine> {
    stocks
        .iter()
        .enumerate()
        .map(|(index, stock)| {
            StocktakeLine::snapshot(
                Uuid::now_v7(),
                "Runner",
                format!("Black/{}", 38 + index),
                format!("RUN-BLACK-{}-{:03}", 38 + index, index + 1),
                *stock,
            )
        })
        .collect()
}

#[test]
fn shortage_is_recorded_as_negative_discrepancy() -> TestResult {
    let lines = snapshot(&[20]);
    let variant = lines.first().map(StocktakeLine::variant).ok_or("expected a line")?;

    let mut draft = StocktakeDraft::start("Linh", StocktakeScope::All, Timestamp::now(), lines)?;

    draft.edit_line(variant, 17)?;

    let line = draft.lines().first().ok_or("expected the edited line")?;

    assert_eq!(line.system_stock(), 20);
    assert_eq!(line.actual_stock(), 17);
    assert_eq!(line.discrepancy(), -3);

    Ok(())
}

#[test]
fn discrepancy_always_matches_counts() -> TestResult {
    let lines = snapshot(&[0, 3, 10, 25, 7]);
    let variants: Vec<Uuid> = lines.iter().map(StocktakeLine::variant).collect();

    let mut draft = StocktakeDraft::start("Linh", StocktakeScope::All, Timestamp::now(), lines)?;

    for (round, variant) in variants.iter().cycle().take(20).enumerate() {
        let count = u64::try_from((round * 7) % 13)?;
        draft.edit_line(*variant, count)?;

        for line in draft.lines() {
            let expected = i64::try_from(line.actual_stock())? - i64::try_from(line.system_stock())?;
            assert_eq!(line.discrepancy(), expected, "line {}", line.sku());
        }
    }

    let expected_total: i64 = draft.lines().iter().map(StocktakeLine::discrepancy).sum();

    assert_eq!(draft.total_discrepancy(), expected_total);

    Ok(())
}

#[test]
fn completing_freezes_the_stocktake() -> TestResult {
    let lines = snapshot(&[4, 6]);
    let variant = lines.first().map(StocktakeLine::variant).ok_or("expected a line")?;

    let mut draft = StocktakeDraft::start("Linh", StocktakeScope::All, Timestamp::now(), lines)?;
    draft.apply_counts([("RUN-BLACK-38-001", 5), ("RUN-BLACK-39-002", 2)])?;

    let mut stocktake = Stocktake::from(draft);

    assert_eq!(stocktake.status(), StocktakeStatus::Draft);
    assert_eq!(stocktake.total_discrepancy(), -3);

    let Stocktake::Draft(draft) = stocktake else {
        return Err("expected a draft".into());
    };

    stocktake = Stocktake::from(draft.complete(
        "ST-20260101-00000A".to_string(),
        "Minh".to_string(),
        Timestamp::now(),
    ));

    assert_eq!(stocktake.status(), StocktakeStatus::Completed);
    assert_eq!(stocktake.total_discrepancy(), -3);
    assert!(stocktake.edit_line(variant, 4).is_err());
    assert_eq!(stocktake.lines().first().map(StocktakeLine::actual_stock), Some(5));

    Ok(())
}
