use crate::model::{Alignment, Table, TableCell};
use crate::output::{CellBlock, StyledRun, TableBlock};

use super::format::{parse_hex_color, styled_spans};

/// Cell background from explicit shading. Fallback chain: direct color
/// attribute, then the shading fill; "auto" counts as absent in both.
fn cell_background(cell: &TableCell) -> Option<[u8; 3]> {
    cell.shading_color
        .as_deref()
        .and_then(parse_hex_color)
        .or_else(|| cell.shading_fill.as_deref().and_then(parse_hex_color))
}

/// Numeric-looking cell text: currency, percentage, or plain digit values
/// like "1.234,50 €". Must contain at least one digit and nothing outside
/// the digit/separator/currency set.
fn looks_numeric(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | ' ' | '€' | '$' | '%' | '+' | '-'))
}

fn cell_text(spans: &[StyledRun]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

fn render_cell(cell: &TableCell, is_header_row: bool, default_font_size: f32) -> CellBlock {
    let mut spans: Vec<StyledRun> = cell
        .paragraphs
        .iter()
        .flat_map(|p| styled_spans(p, default_font_size))
        .collect();

    let background = cell_background(cell);

    if is_header_row {
        // Header rows are conventionally shaded dark: force bold unless the
        // first paragraph styles it, and fall back to white text when no
        // explicit non-auto color is set.
        let first_para_runs = cell.paragraphs.first().map(|p| p.runs.as_slice());
        let has_bold = first_para_runs.is_some_and(|runs| runs.iter().any(|r| r.bold));
        let has_color = first_para_runs.is_some_and(|runs| {
            runs.iter()
                .any(|r| r.color.as_deref().is_some_and(|c| parse_hex_color(c).is_some()))
        });
        for span in &mut spans {
            if !has_bold {
                span.bold = true;
            }
            if !has_color {
                span.color = Some([255, 255, 255]);
            }
        }
    }

    let declared = cell
        .paragraphs
        .first()
        .and_then(|p| p.alignment)
        .unwrap_or(Alignment::Left);

    // Spreadsheet-style data reads better right-aligned; this deliberately
    // overrides the declared alignment for numeric-looking values.
    let alignment = if looks_numeric(&cell_text(&spans)) {
        Alignment::Right
    } else {
        declared
    };

    CellBlock {
        spans,
        background,
        alignment,
    }
}

/// Map a source table onto an output table block. The column count comes
/// from the first row and is authoritative; ragged rows keep however many
/// cells they actually have; no padding is invented.
pub fn render(table: &Table, default_font_size: f32) -> TableBlock {
    let columns = table.rows.first().map_or(0, |r| r.cells.len());

    let rows = table
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            row.cells
                .iter()
                .map(|cell| render_cell(cell, row_idx == 0, default_font_size))
                .collect()
        })
        .collect();

    TableBlock { columns, rows }
}
