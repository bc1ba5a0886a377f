use crate::model::{Paragraph, Run};
use crate::output::StyledRun;

/// Parse a source color value into RGB. Accepts 6-digit hex and 3-digit
/// shorthand (each nibble expanded). "auto" means inherit/unset and maps to
/// `None`; it must never be treated as black. Any other length or non-hex
/// content also yields `None` rather than an error.
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("auto") {
        return None;
    }
    if !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match value.len() {
        6 => {
            let r = u8::from_str_radix(&value[0..2], 16).ok()?;
            let g = u8::from_str_radix(&value[2..4], 16).ok()?;
            let b = u8::from_str_radix(&value[4..6], 16).ok()?;
            Some([r, g, b])
        }
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in value.chars().enumerate() {
                let nibble = c.to_digit(16)? as u8;
                rgb[i] = nibble << 4 | nibble;
            }
            Some(rgb)
        }
        _ => None,
    }
}

/// Merge one run's attributes into an output span. Explicit font sizes are
/// honored only when positive; everything else falls back to the format
/// default.
pub fn style_run(run: &Run, default_font_size: f32) -> StyledRun {
    let font_size = match run.font_size {
        Some(size) if size > 0.0 => size,
        _ => default_font_size,
    };
    let color = run.color.as_deref().and_then(parse_hex_color);
    StyledRun {
        text: run.text.clone(),
        font_size,
        bold: run.bold,
        italic: run.italic,
        underline: run.underline,
        color,
    }
}

/// Spans for a whole paragraph. Paragraphs without any runs occur
/// legitimately (field results, odd producers); they fall back to the raw
/// paragraph text at the default size with no styling.
pub fn styled_spans(para: &Paragraph, default_font_size: f32) -> Vec<StyledRun> {
    if para.runs.is_empty() {
        let text = para.raw_text.clone();
        if text.trim().is_empty() {
            return Vec::new();
        }
        return vec![StyledRun {
            text,
            font_size: default_font_size,
            bold: false,
            italic: false,
            underline: false,
            color: None,
        }];
    }
    para.runs
        .iter()
        .filter(|r| !r.text.is_empty())
        .map(|r| style_run(r, default_font_size))
        .collect()
}
