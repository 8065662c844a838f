//! SKU Synthesis

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Maximum number of characters taken from the colour.
pub const COLOR_CODE_LEN: usize = 5;

/// Colour segment of a SKU: diacritics and whitespace stripped, uppercased,
/// truncated to [`COLOR_CODE_LEN`] characters.
#[must_use]
pub fn color_code(color: &str) -> String {
    color
        .nfd()
        .filter(|c| !is_combining_mark(*c) && !c.is_whitespace())
        .map(fold_stroke)
        .flat_map(char::to_uppercase)
        .take(COLOR_CODE_LEN)
        .collect()
}

/// Size segment of a SKU: uppercased with whitespace removed.
#[must_use]
pub fn size_code(size: &str) -> String {
    size.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Full SKU: `{product}-{color}-{size}-{sequence:03}`.
#[must_use]
pub fn sku(product_code: &str, color: &str, size: &str, sequence: usize) -> String {
    format!(
        "{product_code}-{}-{}-{sequence:03}",
        color_code(color),
        size_code(size)
    )
}

// Stroked letters have no canonical decomposition.
fn fold_stroke(c: char) -> char {
    match c {
        'đ' => 'd',
        'Đ' => 'D',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_code_strips_diacritics_and_truncates() {
        assert_eq!(color_code("Xanh dương"), "XANHD");
        assert_eq!(color_code("Đỏ"), "DO");
        assert_eq!(color_code("Crème"), "CREME");
    }

    #[test]
    fn color_code_keeps_short_colours_whole() {
        assert_eq!(color_code("red"), "RED");
    }

    #[test]
    fn size_code_removes_whitespace() {
        assert_eq!(size_code("x l"), "XL");
        assert_eq!(size_code(" 40 "), "40");
    }

    #[test]
    fn sku_pads_sequence_to_three_digits() {
        assert_eq!(sku("SH01", "Blue", "41", 7), "SH01-BLUE-41-007");
        assert_eq!(sku("SH01", "Blue", "41", 1234), "SH01-BLUE-41-1234");
    }
}
