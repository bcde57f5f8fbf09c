use std::path::PathBuf;

/// The universal match pattern.
pub const WILDCARD: &str = "*";

/// What started a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Lines before the first `Host` or `Match` line. Behaves like `Host *`.
    Global,
    /// A `Host <patterns>` section.
    Host,
    /// A `Match <criteria>` section. Never selectable, never scanned for includes.
    Match,
}

/// A parsed section of an SSH config file: its patterns plus every
/// directive line up to the next section.
#[derive(Debug, Clone)]
pub struct HostBlock {
    pub kind: BlockKind,
    /// Match patterns in declaration order. Empty for a bare `Host` line.
    pub patterns: Vec<String>,
    /// Directives in declaration order. Duplicate keys are kept.
    pub directives: Vec<Directive>,
    /// File the block was read from.
    pub source: PathBuf,
    /// 1-based line of the `Host` line (0 for the global section).
    pub line: usize,
}

/// A `Key Value` line inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// The directive key as written (e.g. "HostName").
    pub key: String,
    /// The value, with inline comments and surrounding quotes removed.
    pub value: String,
    /// 1-based line number.
    pub line: usize,
}

impl HostBlock {
    /// True when the first pattern is `*`, or for the implicit global section.
    pub fn is_wildcard(&self) -> bool {
        match self.kind {
            BlockKind::Global => true,
            BlockKind::Host => self.patterns.first().is_some_and(|p| p == WILDCARD),
            BlockKind::Match => false,
        }
    }

    /// Value of the first directive whose key matches case-insensitively.
    /// Later duplicates are ignored.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.directives
            .iter()
            .find(|d| d.key.eq_ignore_ascii_case(key))
            .map(|d| d.value.as_str())
    }

    /// All directives with the given key, in declaration order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Directive> + 'a {
        self.directives
            .iter()
            .filter(move |d| d.key.eq_ignore_ascii_case(key))
    }
}
