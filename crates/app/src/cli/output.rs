use serde::Serialize;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Style, Theme},
};

/// Render rows as a rounded table with a rule under the header.
pub(crate) fn table<const N: usize, I>(header: [&str; N], rows: I) -> String
where
    I: IntoIterator<Item = [String; N]>,
{
    let mut builder = Builder::default();

    builder.push_record(header);

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')));

    table.with(theme);

    table.to_string()
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| format!("failed to encode output: {error}"))?;

    println!("{json}");

    Ok(())
}

pub(crate) fn optional(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
