use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "docflow-pdf",
    about = "Convert word-processing documents to paginated PDF",
    version
)]
struct Args {
    /// Input document (supported: docx)
    input: PathBuf,

    /// Output PDF path; defaults to the input path with a .pdf extension
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("pdf"));

    match docflow_pdf::convert(&args.input, &output) {
        Ok(pages) => {
            log::info!("wrote {} ({pages} pages)", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
