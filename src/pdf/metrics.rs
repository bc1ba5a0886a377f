//! Width metrics for the base-14 Helvetica family and WinAnsi encoding.
//! The oblique faces share metrics with their upright counterparts.

/// Helvetica advance widths at 1000 units/em, WinAnsi codes 32..=127.
const HELVETICA: [u16; 96] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32..47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 48..57 digits
    278, 278, 584, 584, 584, 556, 1015, // 58..64
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, // A..P
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // Q..Z
    278, 278, 278, 469, 556, 333, // 91..96
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, // a..p
    556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // q..z
    334, 260, 334, 584, 0, // 123..127
];

/// Helvetica-Bold advance widths at 1000 units/em, WinAnsi codes 32..=127.
const HELVETICA_BOLD: [u16; 96] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32..47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 48..57 digits
    333, 333, 584, 584, 584, 611, 975, // 58..64
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, // A..P
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // Q..Z
    333, 278, 333, 584, 556, 333, // 91..96
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, // a..p
    611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // q..z
    389, 280, 389, 584, 0, // 123..127
];

/// Map a Unicode char to its WinAnsi byte, if representable.
pub fn char_to_winansi(c: char) -> Option<u8> {
    match c as u32 {
        0x0000..=0x007F => Some(c as u8),
        0x00A0..=0x00FF => Some(c as u8), // Latin-1 supplement maps directly
        0x20AC => Some(0x80),
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85),
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // bullet
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

pub fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars().filter_map(char_to_winansi).collect()
}

/// Advance width of one char at 1000 units/em. Chars outside the ASCII
/// table (umlauts, euro sign, Windows punctuation) use a nominal letter
/// width; accented Helvetica glyphs carry their base letter's advance.
pub fn char_width_1000(c: char, bold: bool) -> f32 {
    let Some(byte) = char_to_winansi(c) else {
        return 0.0;
    };
    if (32..=127).contains(&byte) {
        let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
        table[(byte - 32) as usize] as f32
    } else {
        556.0
    }
}

/// Width of a text fragment in points.
pub fn text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    text.chars()
        .map(|c| char_width_1000(c, bold) * font_size / 1000.0)
        .sum()
}

pub fn space_width(font_size: f32, bold: bool) -> f32 {
    char_width_1000(' ', bold) * font_size / 1000.0
}
