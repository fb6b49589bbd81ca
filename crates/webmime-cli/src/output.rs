//! Rendering of the staged override table.

use webmime_core::{Column, StagingModel};

/// Two aligned columns with a header row.
pub fn render_table(model: &StagingModel) -> String {
    if model.row_count() == 0 {
        return "No overrides configured.\n".to_string();
    }

    let cell = |row, column| model.data(row, column).unwrap_or_default();
    let width = (0..model.row_count())
        .map(|row| cell(row, Column::Extension).chars().count())
        .chain(std::iter::once(Column::Extension.header().chars().count()))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:<width$}  {}\n",
        model.header(Column::Extension),
        model.header(Column::ContentType)
    );
    for row in 0..model.row_count() {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            cell(row, Column::Extension),
            cell(row, Column::ContentType)
        ));
    }
    out
}

pub fn render_json(model: &StagingModel) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(model.entries())?;
    out.push('\n');
    Ok(out)
}
