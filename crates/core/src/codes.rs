//! Document Codes

use jiff::Timestamp;
use uuid::Uuid;

/// Human-facing document code: `{prefix}-{YYYYMMDD}-{XXXXXX}`.
///
/// The suffix is the low 24 bits of `id` in upper-case hex, so codes issued on the
/// same day stay distinct as long as the ids do.
#[must_use]
pub fn document_code(prefix: &str, at: Timestamp, id: Uuid) -> String {
    format!(
        "{prefix}-{}-{:06X}",
        at.strftime("%Y%m%d"),
        id.as_u128() & 0x00FF_FFFF
    )
}
