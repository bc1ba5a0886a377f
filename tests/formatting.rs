mod common;

use common::{para, run};
use docflow_pdf::model::Run;
use docflow_pdf::transcode::format::{parse_hex_color, style_run, styled_spans};

#[test]
fn six_digit_hex_color() {
    assert_eq!(parse_hex_color("4472C4"), Some([0x44, 0x72, 0xC4]));
    assert_eq!(parse_hex_color("FF0000"), Some([255, 0, 0]));
    assert_eq!(parse_hex_color("000000"), Some([0, 0, 0]));
}

#[test]
fn three_digit_shorthand_expands_nibbles() {
    assert_eq!(parse_hex_color("0F0"), Some([0x00, 0xFF, 0x00]));
    assert_eq!(parse_hex_color("ABC"), Some([0xAA, 0xBB, 0xCC]));
}

#[test]
fn auto_is_absent_not_black() {
    assert_eq!(parse_hex_color("auto"), None);
    assert_eq!(parse_hex_color("AUTO"), None);
    assert_eq!(parse_hex_color(""), None);
}

#[test]
fn malformed_colors_yield_none() {
    assert_eq!(parse_hex_color("GGGGGG"), None);
    assert_eq!(parse_hex_color("12345"), None);
    assert_eq!(parse_hex_color("1234567"), None);
    assert_eq!(parse_hex_color("xyz"), None);
}

#[test]
fn non_ascii_colors_yield_none() {
    // multibyte values whose byte length happens to match a valid form
    assert_eq!(parse_hex_color("€€"), None);
    assert_eq!(parse_hex_color("ä"), None);
    assert_eq!(parse_hex_color("ééé"), None);
}

#[test]
fn whitespace_is_trimmed() {
    assert_eq!(parse_hex_color(" 4472C4 "), Some([0x44, 0x72, 0xC4]));
}

#[test]
fn explicit_font_size_is_honored() {
    let r = Run {
        text: "x".into(),
        font_size: Some(14.0),
        ..Run::default()
    };
    assert_eq!(style_run(&r, 11.0).font_size, 14.0);
}

#[test]
fn missing_or_invalid_size_falls_back_to_default() {
    let missing = Run {
        text: "x".into(),
        ..Run::default()
    };
    assert_eq!(style_run(&missing, 11.0).font_size, 11.0);

    let zero = Run {
        text: "x".into(),
        font_size: Some(0.0),
        ..Run::default()
    };
    assert_eq!(style_run(&zero, 11.0).font_size, 11.0);

    let negative = Run {
        text: "x".into(),
        font_size: Some(-3.0),
        ..Run::default()
    };
    assert_eq!(style_run(&negative, 11.0).font_size, 11.0);
}

#[test]
fn style_flags_carry_through() {
    let r = Run {
        text: "styled".into(),
        bold: true,
        italic: true,
        underline: true,
        color: Some("FF0000".into()),
        ..Run::default()
    };
    let span = style_run(&r, 11.0);
    assert!(span.bold && span.italic && span.underline);
    assert_eq!(span.color, Some([255, 0, 0]));
}

#[test]
fn runless_paragraph_falls_back_to_raw_text() {
    let mut p = para(vec![]);
    p.raw_text = "plain fallback".into();
    let spans = styled_spans(&p, 11.0);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "plain fallback");
    assert_eq!(spans[0].font_size, 11.0);
    assert!(!spans[0].bold);
}

#[test]
fn blank_runless_paragraph_yields_no_spans() {
    let mut p = para(vec![]);
    p.raw_text = "   ".into();
    assert!(styled_spans(&p, 11.0).is_empty());
}

#[test]
fn empty_text_runs_are_dropped() {
    let p = para(vec![run(""), run("kept"), run("")]);
    let spans = styled_spans(&p, 11.0);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "kept");
}
