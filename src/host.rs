use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::ConfigError;
use crate::ssh_config::{self, model::HostBlock};

/// A selectable remote target, after duplicates have been merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Host {
    /// First pattern of the owning block.
    pub name: String,
    /// Other names for the same target, rendered as `(a, b)`. Empty if none.
    pub aliases: String,
    pub user: String,
    /// Never empty: falls back to `name`.
    pub hostname: String,
    pub port: String,
    pub proxy_command: String,
    /// Index of the owning block in `HostSet::blocks`.
    #[serde(skip)]
    block: usize,
    /// Alias items in display order; `aliases` is rendered from these.
    #[serde(skip)]
    alias_names: Vec<String>,
}

impl Host {
    /// Build a provisional host from a block. Returns `None` for blocks that
    /// cannot be selected (wildcard, or no patterns at all).
    pub fn from_block(block: &HostBlock, index: usize) -> Option<Self> {
        if block.is_wildcard() {
            return None;
        }
        let (name, others) = block.patterns.split_first()?;
        let lookup = |key: &str| block.get(key).unwrap_or("").to_string();

        let mut hostname = lookup("hostname");
        if hostname.is_empty() {
            hostname = name.clone();
        }

        Some(Host {
            name: name.clone(),
            aliases: format_aliases(others),
            user: lookup("user"),
            hostname,
            port: lookup("port"),
            proxy_command: lookup("proxycommand"),
            block: index,
            alias_names: others.to_vec(),
        })
    }

    /// Table columns, in display order.
    pub fn columns(&self) -> [&str; 5] {
        [
            self.name.as_str(),
            self.aliases.as_str(),
            self.user.as_str(),
            self.hostname.as_str(),
            self.port.as_str(),
        ]
    }

    /// Space-joined columns, used as the fuzzy match target.
    pub fn search_text(&self) -> String {
        self.columns().join(" ")
    }
}

/// Render alias names as `(a, b, c)`, or an empty string for none.
pub fn format_aliases<S: AsRef<str>>(names: &[S]) -> String {
    if names.is_empty() {
        return String::new();
    }
    let joined = names
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(", ");
    format!("({})", joined)
}

/// Collapse hosts sharing a hostname into their first-discovered member.
///
/// Groups keep first-discovery order. In each group of two or more, the
/// primary's aliases are replaced by its own previous aliases, then each
/// other member's name followed by that member's aliases.
pub fn group_by_hostname(hosts: Vec<Host>) -> Vec<Host> {
    let mut groups: Vec<Vec<Host>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for host in hosts {
        match index.get(&host.hostname) {
            Some(&i) => groups[i].push(host),
            None => {
                index.insert(host.hostname.clone(), groups.len());
                groups.push(vec![host]);
            }
        }
    }

    groups.into_iter().filter_map(merge_group).collect()
}

fn merge_group(group: Vec<Host>) -> Option<Host> {
    let mut members = group.into_iter();
    let mut primary = members.next()?;
    let rest: Vec<Host> = members.collect();
    if rest.is_empty() {
        return Some(primary);
    }

    for other in rest.iter() {
        primary.alias_names.push(other.name.clone());
        primary.alias_names.extend(other.alias_names.iter().cloned());
    }
    tracing::debug!(
        primary = %primary.name,
        hostname = %primary.hostname,
        merged = rest.len(),
        "merged hosts sharing a hostname"
    );
    primary.aliases = format_aliases(primary.alias_names.as_slice());
    Some(primary)
}

/// The canonical host list plus the blocks it was built from.
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct HostSet {
    hosts: Vec<Host>,
    blocks: Vec<HostBlock>,
}

impl HostSet {
    /// Load and merge hosts from `paths` in order. `home` expands `~/` in
    /// the paths and in every `Include`.
    pub fn load(paths: &[String], home: &Path) -> Result<Self, ConfigError> {
        let blocks = ssh_config::load_blocks(paths, home)?;
        Ok(Self::from_blocks(blocks))
    }

    pub fn from_blocks(blocks: Vec<HostBlock>) -> Self {
        let provisional: Vec<Host> = blocks
            .iter()
            .enumerate()
            .filter_map(|(i, b)| Host::from_block(b, i))
            .collect();
        let hosts = group_by_hostname(provisional);
        Self { hosts, blocks }
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// The block a host was built from.
    pub fn block(&self, host: &Host) -> Option<&HostBlock> {
        self.blocks.get(host.block)
    }

    /// Any directive of the host's original block (first match, empty if absent).
    pub fn directive(&self, host: &Host, key: &str) -> &str {
        self.block(host).and_then(|b| b.get(key)).unwrap_or("")
    }

    /// First host with the given name.
    #[cfg(test)]
    pub(crate) fn find(&self, name: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.name == name)
    }
}
