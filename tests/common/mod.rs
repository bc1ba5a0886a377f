#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use docflow_pdf::model::{Paragraph, Run};
use docflow_pdf::output::OutputBlock;
use docflow_pdf::sink::PageSink;
use docflow_pdf::Error;

pub fn run(text: &str) -> Run {
    Run {
        text: text.to_string(),
        ..Run::default()
    }
}

pub fn bold_run(text: &str) -> Run {
    Run {
        text: text.to_string(),
        bold: true,
        ..Run::default()
    }
}

pub fn para(runs: Vec<Run>) -> Paragraph {
    let raw_text = runs.iter().map(|r| r.text.as_str()).collect();
    Paragraph {
        runs,
        alignment: None,
        style_name: None,
        raw_text,
    }
}

pub fn styled_para(runs: Vec<Run>, style: &str) -> Paragraph {
    let mut p = para(runs);
    p.style_name = Some(style.to_string());
    p
}

/// Unique scratch path so parallel test binaries never collide.
pub fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!("docflow-{}-{nanos}-{}", std::process::id(), name))
}

/// Page sink double that packs a fixed number of blocks per page, records
/// the footer text it was handed for every page of every pass, and writes
/// a small marker file where the artifact would go.
pub struct RecordingSink {
    pub blocks_per_page: usize,
    /// One entry per render call: (artifact path, footers per page).
    pub passes: Vec<(PathBuf, Vec<String>)>,
}

impl RecordingSink {
    pub fn new(blocks_per_page: usize) -> Self {
        Self {
            blocks_per_page,
            passes: Vec::new(),
        }
    }

    fn page_count(&self, flow: &[OutputBlock]) -> usize {
        flow.len().div_ceil(self.blocks_per_page).max(1)
    }
}

impl PageSink for RecordingSink {
    fn render(
        &mut self,
        flow: &[OutputBlock],
        footer: &dyn Fn(usize) -> String,
        path: &Path,
    ) -> Result<usize, Error> {
        let pages = self.page_count(flow);
        let footers = (1..=pages).map(|p| footer(p)).collect();
        let mut file = std::fs::File::create(path).map_err(Error::Io)?;
        file.write_all(b"%SINK").map_err(Error::Io)?;
        self.passes.push((path.to_path_buf(), footers));
        Ok(pages)
    }
}

/// Sink double whose n-th render call fails after leaving a partial file
/// behind. Used to check that the resolver cleans up.
pub struct FailingSink {
    pub fail_on_call: usize,
    calls: usize,
    inner: RecordingSink,
}

impl FailingSink {
    pub fn new(fail_on_call: usize) -> Self {
        Self {
            fail_on_call,
            calls: 0,
            inner: RecordingSink::new(1),
        }
    }
}

impl PageSink for FailingSink {
    fn render(
        &mut self,
        flow: &[OutputBlock],
        footer: &dyn Fn(usize) -> String,
        path: &Path,
    ) -> Result<usize, Error> {
        self.calls += 1;
        if self.calls == self.fail_on_call {
            std::fs::write(path, b"partial").map_err(Error::Io)?;
            return Err(Error::Sink("simulated sink failure".into()));
        }
        self.inner.render(flow, footer, path)
    }
}

/// Assemble a minimal DOCX package in memory: just the parts the parser
/// reads. `extra_parts` lets a test add media or header parts.
pub fn build_docx(document_xml: &str, extra_parts: &[(&str, &[u8])]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default();

        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();

        for (name, data) in extra_parts {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

/// Zip archive with arbitrary parts and no document.xml.
pub fn build_docx_raw(parts: &[(&str, &[u8])]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default();
        for (name, data) in parts {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

pub fn wrap_body(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    )
}
