pub mod docx;
mod error;
pub mod formats;
pub mod model;
pub mod output;
pub mod paginate;
pub mod pdf;
pub mod sink;
pub mod transcode;

pub use error::Error;
pub use formats::{lookup, supported_extensions, Format};
pub use model::{
    Alignment, BlockElement, DocumentTree, EmbeddedImage, ImageFormat, Paragraph, Run, Table,
    TableCell, TableRow,
};
pub use output::{
    CellBlock, ImageBlock, OutputBlock, OutputPage, PlacedImage, RenderedDocument, StyledRun,
    TableBlock, TextBlock,
};
pub use paginate::{footer_text, resolve};
pub use pdf::{paginate_flow, PdfSink};
pub use sink::PageSink;
pub use transcode::{transcode, FormatConfig};

use std::path::Path;
use std::time::Instant;

/// Convert a document file to a paginated PDF. Returns the page count.
pub fn convert(input: &Path, output: &Path) -> Result<usize, Error> {
    let t0 = Instant::now();

    let format = formats::lookup(input)?;
    let doc = (format.parse)(input)?;
    let t_parse = t0.elapsed();

    let flow = transcode::transcode(&doc, &format.config);
    let t_transcode = t0.elapsed();

    let mut sink = PdfSink::new(&format.config);
    let pages = paginate::resolve(&mut sink, &flow, output)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, transcode={:.1}ms, render={:.1}ms, total={:.1}ms ({} pages)",
        t_parse.as_secs_f64() * 1000.0,
        (t_transcode - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_transcode).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages,
    );

    Ok(pages)
}

/// Convert an in-memory DOCX payload to a paginated PDF.
pub fn convert_docx_bytes(input: &[u8], output: &Path) -> Result<usize, Error> {
    let t0 = Instant::now();

    let doc = docx::parse_bytes(input)?;
    let t_parse = t0.elapsed();

    let config = formats::lookup(Path::new("input.docx"))?.config;
    let flow = transcode::transcode(&doc, &config);
    let t_transcode = t0.elapsed();

    let mut sink = PdfSink::new(&config);
    let pages = paginate::resolve(&mut sink, &flow, output)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, transcode={:.1}ms, render={:.1}ms, total={:.1}ms ({} pages)",
        t_parse.as_secs_f64() * 1000.0,
        (t_transcode - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_transcode).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages,
    );

    Ok(pages)
}
