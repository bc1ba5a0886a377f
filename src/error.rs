use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// Input file missing or unreadable.
    Io(std::io::Error),
    /// The dispatcher has no registered format for this extension.
    UnsupportedFormat {
        extension: String,
        supported: Vec<&'static str>,
    },
    /// The document model provider could not build a tree.
    Parse(String),
    /// The page sink failed to write an artifact.
    Sink(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::UnsupportedFormat {
                extension,
                supported,
            } => write!(
                f,
                "unsupported input format '.{extension}' (supported: {})",
                supported.join(", ")
            ),
            Error::Parse(msg) => write!(f, "failed to parse document: {msg}"),
            Error::Sink(msg) => write!(f, "failed to write output: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Parse(format!("invalid XML: {e}"))
    }
}
