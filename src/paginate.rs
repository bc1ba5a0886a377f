use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::output::OutputBlock;
use crate::sink::PageSink;

/// Footer text for page `page` of `total`.
pub fn footer_text(page: usize, total: usize) -> String {
    format!("page {page} of {total}")
}

fn shadow_path(output: &Path) -> PathBuf {
    let mut os = output.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Resolve the "page k of N" problem with two full renders through the
/// page sink: a shadow pass with no footer to measure N, then the final
/// pass with the footer callback bound to N. Only the final artifact is
/// kept. Failure in either pass fails the whole conversion; there is no
/// partial-pagination fallback.
pub fn resolve(
    sink: &mut dyn PageSink,
    flow: &[OutputBlock],
    output: &Path,
) -> Result<usize, Error> {
    let shadow = shadow_path(output);

    let total = match sink.render(flow, &|_| String::new(), &shadow) {
        Ok(n) => n,
        Err(e) => {
            let _ = std::fs::remove_file(&shadow);
            return Err(e);
        }
    };
    log::debug!("shadow pass measured {total} pages");

    if let Err(e) = std::fs::remove_file(&shadow) {
        log::warn!("could not remove shadow artifact {}: {e}", shadow.display());
    }

    let final_total = match sink.render(flow, &|page| footer_text(page, total), output) {
        Ok(n) => n,
        Err(e) => {
            // No partial output is left behind on a final-pass failure.
            let _ = std::fs::remove_file(output);
            return Err(e);
        }
    };

    if final_total != total {
        // Both passes must lay out identically, otherwise the footer totals
        // are wrong. The built-in sink is deterministic; a custom sink that
        // trips this has a fidelity bug.
        log::warn!("final pass produced {final_total} pages but shadow measured {total}; footers are stale");
    }

    Ok(final_total)
}
