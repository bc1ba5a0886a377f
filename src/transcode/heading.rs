use crate::model::Paragraph;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Classification {
    Body,
    /// Heading level 1..=3.
    Heading(u8),
}

impl Classification {
    pub fn is_heading(self) -> bool {
        matches!(self, Classification::Heading(_))
    }
}

/// True when the text starts with one or more digits followed by a period
/// (numbered chapter, e.g. "1. Tabellenbeispiele").
pub fn starts_numbered_chapter(text: &str) -> bool {
    let trimmed = text.trim_start();
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && trimmed[digits..].starts_with('.')
}

/// Heading detection, computed once per paragraph by the transcoder.
/// A paragraph is a heading when its style name contains "heading" or,
/// failing that, when its first run is bold. The level is then refined
/// from the text: numbered chapters and document-structure titles are
/// level 1, known section titles level 2, everything else level 3.
pub fn classify(para: &Paragraph) -> Classification {
    let styled_heading = para
        .style_name
        .as_deref()
        .is_some_and(|s| s.to_lowercase().contains("heading"));
    let bold_lead = para.runs.first().is_some_and(|r| r.bold);

    if !styled_heading && !bold_lead {
        return Classification::Body;
    }

    let text = para.text().to_lowercase();
    let text = text.trim();
    if starts_numbered_chapter(text) || text.contains("dokumentstruktur") {
        Classification::Heading(1)
    } else if text.contains("tabellen") || text.contains("bilder") || text.contains("zusätzlich") {
        Classification::Heading(2)
    } else {
        Classification::Heading(3)
    }
}

/// Page-break policy: break before a heading that opens a numbered chapter
/// or one of the known section titles, but never before the first body
/// element.
pub fn page_break_before(
    para: &Paragraph,
    classification: Classification,
    is_first_element: bool,
) -> bool {
    if is_first_element || !classification.is_heading() {
        return false;
    }
    let text = para.text().trim().to_lowercase();
    if text.is_empty() {
        return false;
    }
    starts_numbered_chapter(&text)
        || text.contains("komplexes")
        || text.contains("bilder und grafiken")
        || text.contains("zusätzlicher inhalt")
}
