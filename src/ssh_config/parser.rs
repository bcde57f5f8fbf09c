use std::path::{Path, PathBuf};

use crate::error::{ConfigError, MAX_INCLUDE_DEPTH};

use super::model::{BlockKind, Directive, HostBlock};
use super::source;

/// Parse SSH config text into blocks, without resolving includes.
/// `path` is only used for error messages and `HostBlock::source`.
pub fn parse_content(content: &str, path: &Path) -> Result<Vec<HostBlock>, ConfigError> {
    let mut blocks = Vec::new();
    let mut current = HostBlock {
        kind: BlockKind::Global,
        patterns: Vec::new(),
        directives: Vec::new(),
        source: path.to_path_buf(),
        line: 0,
    };

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (key, value) =
            split_key_value(trimmed).map_err(|msg| ConfigError::parse(path, line_no, msg))?;

        // "hostname" splits as key="hostname" which fails both checks
        let kind = if key.eq_ignore_ascii_case("host") {
            Some(BlockKind::Host)
        } else if key.eq_ignore_ascii_case("match") {
            Some(BlockKind::Match)
        } else {
            None
        };

        if let Some(kind) = kind {
            let patterns = if kind == BlockKind::Host {
                split_args(value).map_err(|msg| ConfigError::parse(path, line_no, msg))?
            } else {
                value.split_whitespace().map(str::to_string).collect()
            };
            let finished = std::mem::replace(
                &mut current,
                HostBlock {
                    kind,
                    patterns,
                    directives: Vec::new(),
                    source: path.to_path_buf(),
                    line: line_no,
                },
            );
            blocks.push(finished);
            continue;
        }

        if value.is_empty() {
            return Err(ConfigError::parse(
                path,
                line_no,
                format!("no value for key {}", key),
            ));
        }
        let value = strip_inline_comment(value);
        // Include takes a quoted argument list, split later
        let value = if key.eq_ignore_ascii_case("include") {
            value
        } else {
            unquote(value)
        };
        current.directives.push(Directive {
            key: key.to_string(),
            value: value.to_string(),
            line: line_no,
        });
    }
    blocks.push(current);

    // An empty global section carries nothing
    blocks.retain(|b| b.kind != BlockKind::Global || !b.directives.is_empty());
    Ok(blocks)
}

/// Split a trimmed line into keyword and value.
/// SSH accepts `Key Value`, `Key=Value` and `Key = Value`.
fn split_key_value(trimmed: &str) -> Result<(&str, &str), String> {
    let end = trimmed
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(trimmed.len());
    let key = &trimmed[..end];
    if key.is_empty() {
        return Err("missing keyword".to_string());
    }
    let rest = trimmed[end..].trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest).trim();
    Ok((key, rest))
}

/// Strip an inline comment: a `#` preceded by whitespace and outside
/// double quotes.
fn strip_inline_comment(value: &str) -> &str {
    let mut in_quotes = false;
    let mut prev_space = false;
    for (pos, c) in value.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '#' if prev_space && !in_quotes => return value[..pos].trim_end(),
            _ => {}
        }
        prev_space = c.is_whitespace();
    }
    value
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Split a value into whitespace-separated arguments, honouring double quotes.
pub(crate) fn split_args(value: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut in_quotes = false;

    for c in value.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_arg = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            '#' if !in_quotes && !in_arg => break,
            c => {
                current.push(c);
                in_arg = true;
            }
        }
    }
    if in_quotes {
        return Err("unterminated quote".to_string());
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

/// Loads config files and splices included files into the block sequence.
///
/// Keeps a stack of the files currently being loaded so an include cycle is
/// reported instead of recursing forever.
pub struct Loader<'a> {
    home: &'a Path,
    stack: Vec<PathBuf>,
}

impl<'a> Loader<'a> {
    pub fn new(home: &'a Path) -> Self {
        Self {
            home,
            stack: Vec::new(),
        }
    }

    /// Load a top-level config path. Returns every non-wildcard `Host` block,
    /// with included blocks in place of the wildcard blocks that included them.
    pub fn load(&mut self, original: &str) -> Result<Vec<HostBlock>, ConfigError> {
        let resolved = source::expand_home(original, self.home);
        self.load_file(original, &resolved)
    }

    fn load_file(&mut self, original: &str, path: &Path) -> Result<Vec<HostBlock>, ConfigError> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.stack.contains(&key) {
            return Err(ConfigError::IncludeCycle {
                path: path.to_path_buf(),
            });
        }
        if self.stack.len() > MAX_INCLUDE_DEPTH {
            return Err(ConfigError::IncludeDepth {
                path: path.to_path_buf(),
            });
        }

        let Some(content) = source::read_config(original, path)? else {
            return Ok(Vec::new());
        };
        tracing::debug!(path = %path.display(), depth = self.stack.len(), "parsing ssh config");
        let blocks = parse_content(&content, path)?;

        self.stack.push(key);
        let result = self.expand(blocks, path);
        self.stack.pop();
        result
    }

    fn expand(&mut self, blocks: Vec<HostBlock>, path: &Path) -> Result<Vec<HostBlock>, ConfigError> {
        let mut out = Vec::new();
        for block in blocks {
            if block.kind == BlockKind::Match {
                continue;
            }
            if block.is_wildcard() {
                for directive in block.get_all("include") {
                    let args = split_args(&directive.value)
                        .map_err(|msg| ConfigError::parse(path, directive.line, msg))?;
                    for arg in args {
                        for target in self.include_targets(&arg, path, directive.line)? {
                            let target_str = target.to_string_lossy().to_string();
                            tracing::debug!(
                                from = %path.display(),
                                include = %target.display(),
                                "following include"
                            );
                            let included = self.load_file(&target_str, &target).map_err(|e| {
                                ConfigError::Include {
                                    path: path.to_path_buf(),
                                    source: Box::new(e),
                                }
                            })?;
                            out.extend(included);
                        }
                    }
                }
                continue;
            }
            // A bare "Host" line names nothing
            if block.patterns.is_empty() {
                tracing::debug!(path = %path.display(), line = block.line, "skipping Host line without patterns");
                continue;
            }
            out.push(block);
        }
        Ok(out)
    }

    /// Files named by one Include argument. Relative paths resolve against the
    /// including file's directory. Globs expand to sorted regular files and may
    /// match nothing.
    fn include_targets(
        &self,
        arg: &str,
        including: &Path,
        line: usize,
    ) -> Result<Vec<PathBuf>, ConfigError> {
        let expanded = source::expand_home(arg, self.home);
        let target = if expanded.is_absolute() {
            expanded
        } else {
            including
                .parent()
                .map(|dir| dir.join(&expanded))
                .unwrap_or(expanded)
        };

        if !arg.contains(['*', '?', '[']) {
            return Ok(vec![target]);
        }

        let pattern = target.to_string_lossy();
        let paths = glob::glob(&pattern).map_err(|e| {
            ConfigError::parse(including, line, format!("bad Include pattern {}: {}", arg, e))
        })?;
        let mut matched: Vec<PathBuf> = paths.filter_map(|p| p.ok()).filter(|p| p.is_file()).collect();
        matched.sort();
        Ok(matched)
    }
}
