use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

use crate::error::Error;
use crate::model::{
    Alignment, BlockElement, DocumentTree, EmbeddedImage, ImageFormat, Paragraph, Run, Table,
    TableCell, TableRow,
};

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WML_NS))
}

fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

/// WML boolean toggle (w:b, w:i, w:u): present with no val or a val other
/// than "0"/"false" means on.
fn wml_bool(parent: roxmltree::Node, name: &str) -> Option<bool> {
    wml(parent, name).map(|n| {
        n.attribute((WML_NS, "val"))
            .is_none_or(|v| v != "0" && v != "false")
    })
}

fn read_zip_text<R: Read + Seek>(zip: &mut zip::ZipArchive<R>, name: &str) -> Option<String> {
    let mut content = String::new();
    zip.by_name(name).ok()?.read_to_string(&mut content).ok()?;
    Some(content)
}

fn read_zip_bytes<R: Read + Seek>(zip: &mut zip::ZipArchive<R>, name: &str) -> Option<Vec<u8>> {
    let mut data = Vec::new();
    zip.by_name(name).ok()?.read_to_end(&mut data).ok()?;
    Some(data)
}

/// Relationship id to target path for one part, e.g.
/// word/_rels/document.xml.rels or word/_rels/header1.xml.rels.
fn parse_relationships<R: Read + Seek>(
    zip: &mut zip::ZipArchive<R>,
    rels_path: &str,
) -> HashMap<String, String> {
    let mut rels = HashMap::new();
    let Some(xml_content) = read_zip_text(zip, rels_path) else {
        return rels;
    };
    let Ok(xml) = roxmltree::Document::parse(&xml_content) else {
        return rels;
    };
    for node in xml.root_element().children() {
        if node.tag_name().name() == "Relationship"
            && let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target"))
        {
            rels.insert(id.to_string(), target.to_string());
        }
    }
    rels
}

fn parse_alignment(val: &str) -> Option<Alignment> {
    match val {
        "center" => Some(Alignment::Center),
        "right" | "end" => Some(Alignment::Right),
        "left" | "start" | "both" => Some(Alignment::Left),
        _ => None,
    }
}

fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 24 || &data[1..4] != b"PNG" {
        return None;
    }
    let w = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let h = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Some((w, h))
}

fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }
    let mut i = 2;
    while i + 4 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        if marker == 0xD9 {
            break;
        }
        let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if (marker == 0xC0 || marker == 0xC1 || marker == 0xC2) && i + 9 < data.len() {
            let h = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let w = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Some((w, h));
        }
        i += 2 + len;
    }
    None
}

/// Resolve a w:drawing to its media bytes via a:blip r:embed and the part
/// relationships. Unsupported media (anything but PNG/JPEG) is skipped with
/// a warning.
fn parse_drawing<R: Read + Seek>(
    drawing: roxmltree::Node,
    rels: &HashMap<String, String>,
    zip: &mut zip::ZipArchive<R>,
) -> Option<EmbeddedImage> {
    let blip = drawing
        .descendants()
        .find(|n| n.tag_name().name() == "blip" && n.tag_name().namespace() == Some(DML_NS))?;
    let rel_id = blip.attribute((REL_NS, "embed"))?;
    let target = rels.get(rel_id)?;
    let zip_path = target
        .strip_prefix('/')
        .map(String::from)
        .unwrap_or_else(|| format!("word/{target}"));

    let file_name = zip_path
        .rsplit('/')
        .next()
        .unwrap_or(zip_path.as_str())
        .to_string();

    let format = if file_name.to_lowercase().ends_with(".png") {
        ImageFormat::Png
    } else if file_name.to_lowercase().ends_with(".jpg") || file_name.to_lowercase().ends_with(".jpeg")
    {
        ImageFormat::Jpeg
    } else {
        log::warn!("skipping unsupported embedded media: {file_name}");
        return None;
    };

    let data = match read_zip_bytes(zip, &zip_path) {
        Some(d) => d,
        None => {
            log::warn!("missing media part referenced by document: {zip_path}");
            return None;
        }
    };

    let (pixel_width, pixel_height) = match format {
        ImageFormat::Png => png_dimensions(&data),
        ImageFormat::Jpeg => jpeg_dimensions(&data),
    }
    .unwrap_or_else(|| {
        // Fall back to the declared extent (EMU, 9525 per pixel at 96 dpi).
        drawing
            .descendants()
            .find(|n| n.tag_name().name() == "extent")
            .and_then(|e| {
                let cx = e.attribute("cx")?.parse::<u64>().ok()?;
                let cy = e.attribute("cy")?.parse::<u64>().ok()?;
                Some(((cx / 9525) as u32, (cy / 9525) as u32))
            })
            .unwrap_or((0, 0))
    });

    Some(EmbeddedImage {
        data,
        format,
        file_name: Some(file_name),
        pixel_width,
        pixel_height,
    })
}

fn parse_paragraph<R: Read + Seek>(
    para_node: roxmltree::Node,
    rels: &HashMap<String, String>,
    zip: &mut zip::ZipArchive<R>,
) -> Paragraph {
    let ppr = wml(para_node, "pPr");
    let style_name = ppr.and_then(|p| wml_attr(p, "pStyle")).map(String::from);
    let alignment = ppr
        .and_then(|p| wml_attr(p, "jc"))
        .and_then(parse_alignment);

    let mut runs = Vec::new();
    for run_node in para_node
        .children()
        .filter(|n| n.tag_name().name() == "r" && n.tag_name().namespace() == Some(WML_NS))
    {
        let rpr = wml(run_node, "rPr");
        let bold = rpr.and_then(|n| wml_bool(n, "b")).unwrap_or(false);
        let italic = rpr.and_then(|n| wml_bool(n, "i")).unwrap_or(false);
        let underline = rpr
            .and_then(|n| wml(n, "u"))
            .and_then(|u| u.attribute((WML_NS, "val")))
            .map(|v| v != "none")
            .unwrap_or(false);
        // w:sz is in half-points.
        let font_size = rpr
            .and_then(|n| wml_attr(n, "sz"))
            .and_then(|v| v.parse::<f32>().ok())
            .map(|hp| hp / 2.0);
        let color = rpr.and_then(|n| wml_attr(n, "color")).map(String::from);

        let mut text = String::new();
        let mut image: Option<EmbeddedImage> = None;
        for child in run_node.children() {
            if child.tag_name().namespace() != Some(WML_NS) {
                continue;
            }
            match child.tag_name().name() {
                "t" => {
                    if let Some(t) = child.text() {
                        text.push_str(t);
                    }
                }
                "drawing" => {
                    if image.is_none() {
                        image = parse_drawing(child, rels, zip);
                    }
                }
                _ => {}
            }
        }

        if text.is_empty() && image.is_none() {
            continue;
        }
        runs.push(Run {
            text,
            bold,
            italic,
            underline,
            font_size,
            color,
            image,
        });
    }

    let raw_text = runs
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("");

    Paragraph {
        runs,
        alignment,
        style_name,
        raw_text,
    }
}

fn parse_table<R: Read + Seek>(
    tbl_node: roxmltree::Node,
    rels: &HashMap<String, String>,
    zip: &mut zip::ZipArchive<R>,
) -> Table {
    let mut rows = Vec::new();
    for tr in tbl_node
        .children()
        .filter(|n| n.tag_name().name() == "tr" && n.tag_name().namespace() == Some(WML_NS))
    {
        let mut cells = Vec::new();
        for tc in tr
            .children()
            .filter(|n| n.tag_name().name() == "tc" && n.tag_name().namespace() == Some(WML_NS))
        {
            let shd = wml(tc, "tcPr").and_then(|pr| wml(pr, "shd"));
            let shading_color = shd
                .and_then(|n| n.attribute((WML_NS, "color")))
                .map(String::from);
            let shading_fill = shd
                .and_then(|n| n.attribute((WML_NS, "fill")))
                .map(String::from);

            let paragraphs = tc
                .children()
                .filter(|n| n.tag_name().name() == "p" && n.tag_name().namespace() == Some(WML_NS))
                .map(|p| parse_paragraph(p, rels, zip))
                .collect();

            cells.push(TableCell {
                paragraphs,
                shading_color,
                shading_fill,
            });
        }
        rows.push(TableRow { cells });
    }
    Table { rows }
}

fn parse_part_paragraphs<R: Read + Seek>(
    xml_content: &str,
    rels: &HashMap<String, String>,
    zip: &mut zip::ZipArchive<R>,
) -> Vec<Paragraph> {
    let Ok(xml) = roxmltree::Document::parse(xml_content) else {
        return Vec::new();
    };
    xml.root_element()
        .children()
        .filter(|n| n.tag_name().name() == "p" && n.tag_name().namespace() == Some(WML_NS))
        .map(|p| parse_paragraph(p, rels, zip))
        .filter(|p| !p.text().trim().is_empty())
        .collect()
}

/// Collect all header or footer parts in archive order. Parts are matched
/// by path prefix rather than by section references so that every part in
/// the package contributes.
fn collect_hf_parts<R: Read + Seek>(
    zip: &mut zip::ZipArchive<R>,
    prefix: &str,
) -> Vec<Paragraph> {
    let mut names: Vec<String> = (0..zip.len())
        .filter_map(|i| zip.by_index(i).ok().map(|f| f.name().to_string()))
        .filter(|n| n.starts_with(prefix) && n.ends_with(".xml"))
        .collect();
    names.sort();

    let mut paragraphs = Vec::new();
    for name in names {
        // Images in a header or footer resolve through that part's own
        // relationships, not the document's.
        let rels = parse_relationships(zip, &part_rels_path(&name));
        if let Some(text) = read_zip_text(zip, &name) {
            paragraphs.extend(parse_part_paragraphs(&text, &rels, zip));
        }
    }
    paragraphs
}

/// word/header1.xml -> word/_rels/header1.xml.rels
fn part_rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

pub fn parse(path: &Path) -> Result<DocumentTree, Error> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    parse_reader(file)
}

pub fn parse_bytes(data: &[u8]) -> Result<DocumentTree, Error> {
    parse_reader(std::io::Cursor::new(data))
}

fn parse_reader<R: Read + Seek>(reader: R) -> Result<DocumentTree, Error> {
    let mut zip = zip::ZipArchive::new(reader)
        .map_err(|_| Error::Parse("file is not a ZIP archive".into()))?;

    let rels = parse_relationships(&mut zip, "word/_rels/document.xml.rels");

    let mut xml_content = String::new();
    zip.by_name("word/document.xml")
        .map_err(|_| Error::Parse("missing word/document.xml (is this a DOCX file?)".into()))?
        .read_to_string(&mut xml_content)?;

    let xml = roxmltree::Document::parse(&xml_content)?;
    let root = xml.root_element();
    let body = wml(root, "body").ok_or_else(|| Error::Parse("missing w:body".into()))?;

    let mut blocks = Vec::new();
    for node in body.children() {
        if node.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match node.tag_name().name() {
            "p" => blocks.push(BlockElement::Paragraph(parse_paragraph(
                node, &rels, &mut zip,
            ))),
            "tbl" => blocks.push(BlockElement::Table(parse_table(node, &rels, &mut zip))),
            _ => {}
        }
    }

    let headers = collect_hf_parts(&mut zip, "word/header");
    let footers = collect_hf_parts(&mut zip, "word/footer");

    log::debug!(
        "parsed document: {} blocks, {} header paragraphs, {} footer paragraphs",
        blocks.len(),
        headers.len(),
        footers.len()
    );

    Ok(DocumentTree {
        blocks,
        headers,
        footers,
    })
}
