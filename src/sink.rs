use std::path::Path;

use crate::error::Error;
use crate::output::OutputBlock;

/// External page-sink boundary: lays an output-block flow out into pages,
/// writes the artifact at `path`, and reports the total page count.
///
/// `footer` maps a 1-based page index to that page's footer text; an empty
/// string means "no footer" (used by the shadow pass).
pub trait PageSink {
    fn render(
        &mut self,
        flow: &[OutputBlock],
        footer: &dyn Fn(usize) -> String,
        path: &Path,
    ) -> Result<usize, Error>;
}
