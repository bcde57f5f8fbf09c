use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Maximum nesting of `Include` directives (same limit as OpenSSH).
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// Error type for loading SSH config files.
///
/// Every variant is fatal: a host list built from a config that failed to
/// load would be silently incomplete.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Home directory not found.
    #[error("could not determine home directory")]
    NoHomeDir,

    /// The file could not be opened or read.
    #[error("could not open ssh config file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed config syntax.
    #[error("could not decode ssh config file {} (line {line}): {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A file includes itself, directly or through other files.
    #[error("include cycle detected at {}", path.display())]
    IncludeCycle { path: PathBuf },

    /// Includes are nested deeper than `MAX_INCLUDE_DEPTH`.
    #[error("includes nested deeper than {} levels at {}", MAX_INCLUDE_DEPTH, path.display())]
    IncludeDepth { path: PathBuf },

    /// Failure inside an included file. `path` is the including file.
    #[error("failed to load file included from {}", path.display())]
    Include {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        ConfigError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// The innermost error, following include wrappers.
    #[cfg(test)]
    pub(crate) fn root(&self) -> &ConfigError {
        match self {
            ConfigError::Include { source, .. } => source.root(),
            other => other,
        }
    }
}
