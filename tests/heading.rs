mod common;

use common::{bold_run, para, run, styled_para};
use docflow_pdf::transcode::heading::{
    classify, page_break_before, starts_numbered_chapter, Classification,
};

#[test]
fn plain_paragraph_is_body() {
    let p = para(vec![run("Ein normaler Absatz ohne Auszeichnung.")]);
    assert_eq!(classify(&p), Classification::Body);
}

#[test]
fn style_name_marks_heading() {
    let p = styled_para(vec![run("Beliebiger Titel")], "Heading1");
    assert!(classify(&p).is_heading());

    let lower = styled_para(vec![run("Beliebiger Titel")], "myheading");
    assert!(classify(&lower).is_heading());
}

#[test]
fn bold_first_run_marks_heading() {
    let p = para(vec![bold_run("Fetter Titel")]);
    assert!(classify(&p).is_heading());
}

#[test]
fn numbered_chapter_is_level_one() {
    let p = para(vec![bold_run("1. Tabellenbeispiele")]);
    assert_eq!(classify(&p), Classification::Heading(1));

    let multi = para(vec![bold_run("12. Anhang")]);
    assert_eq!(classify(&multi), Classification::Heading(1));
}

#[test]
fn document_structure_title_is_level_one() {
    let p = para(vec![bold_run("Dokumentstruktur und Inhalt")]);
    assert_eq!(classify(&p), Classification::Heading(1));
}

#[test]
fn known_section_titles_are_level_two() {
    for title in ["Tabellen im Detail", "Bilder", "Zusätzliche Hinweise"] {
        let p = para(vec![bold_run(title)]);
        assert_eq!(classify(&p), Classification::Heading(2), "{title}");
    }
}

#[test]
fn other_bold_text_is_level_three() {
    let p = para(vec![bold_run("Sonstiges")]);
    assert_eq!(classify(&p), Classification::Heading(3));
}

#[test]
fn numbered_chapter_detection() {
    assert!(starts_numbered_chapter("1. Einleitung"));
    assert!(starts_numbered_chapter("  42. Anhang"));
    assert!(!starts_numbered_chapter("Einleitung 1."));
    assert!(!starts_numbered_chapter("1,5 Liter"));
    assert!(!starts_numbered_chapter(""));
}

#[test]
fn break_before_numbered_chapter() {
    let p = para(vec![bold_run("2. Komplexes Kapitel")]);
    let c = classify(&p);
    assert!(page_break_before(&p, c, false));
}

#[test]
fn break_before_known_keywords() {
    for title in [
        "Komplexes Layout",
        "Bilder und Grafiken",
        "Zusätzlicher Inhalt",
    ] {
        let p = para(vec![bold_run(title)]);
        let c = classify(&p);
        assert!(page_break_before(&p, c, false), "{title}");
    }
}

#[test]
fn no_break_before_first_element() {
    let p = para(vec![bold_run("1. Einleitung")]);
    let c = classify(&p);
    assert!(!page_break_before(&p, c, true));
}

#[test]
fn no_break_before_body_or_plain_headings() {
    let body = para(vec![run("1. Januar war ein Montag")]);
    assert!(!page_break_before(&body, classify(&body), false));

    let heading = para(vec![bold_run("Dokumentstruktur")]);
    let c = classify(&heading);
    assert!(c.is_heading());
    assert!(!page_break_before(&heading, c, false));
}
