pub mod model;
pub mod parser;
pub mod source;

use std::path::Path;

use crate::error::ConfigError;
use model::HostBlock;

/// Load every path in order and concatenate their host blocks.
/// Wildcard blocks are dropped after their includes have been spliced in.
pub fn load_blocks(paths: &[String], home: &Path) -> Result<Vec<HostBlock>, ConfigError> {
    let mut blocks = Vec::new();
    for path in paths {
        let mut loader = parser::Loader::new(home);
        let loaded = loader.load(path)?;
        tracing::info!(path = %path, blocks = loaded.len(), "loaded ssh config");
        blocks.extend(loaded);
    }
    Ok(blocks)
}
