//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{message} (line {line})")]
    Parse { message: String, line: usize },
}

impl Error {
    /// Attach the line number where parsing failed.
    pub fn config(source: &str, err: toml::de::Error) -> Self {
        let line = err
            .span()
            .map(|span| {
                let end = span.start.min(source.len());
                source[..end].matches('\n').count() + 1
            })
            .unwrap_or(0);

        Self::Parse {
            message: err.message().to_string(),
            line,
        }
    }
}
