use crate::filter::HostFilter;
use crate::host::Host;

/// Rows moved by PageUp/PageDown.
pub const PAGE_SIZE: usize = 10;

/// Where the selection is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Query is empty, every host is listed.
    Browsing,
    /// Query is non-empty.
    Filtering,
    /// A host was chosen. Terminal.
    Committed(Host),
    /// The user left without choosing. Terminal.
    Cancelled,
}

/// Input to the controller, already decoded from key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    Backspace,
    ClearQuery,
    /// Esc: clears a non-empty query, otherwise cancels.
    Cancel,
    /// Ctrl+C: cancels from any state.
    Quit,
    Confirm,
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Resize(u16, u16),
}

/// Selection state: the full host list, the query and the filtered view.
#[derive(Debug)]
pub struct App<'a> {
    hosts: &'a [Host],
    filter: HostFilter,
    pub query: String,
    /// Indices into `hosts`, best match first.
    pub filtered: Vec<usize>,
    /// Position in `filtered`.
    pub cursor: usize,
    pub phase: Phase,
}

impl<'a> App<'a> {
    pub fn new(hosts: &'a [Host]) -> Self {
        let filter = HostFilter::default();
        let filtered = filter.apply(hosts, "");
        Self {
            hosts,
            filter,
            query: String::new(),
            filtered,
            cursor: 0,
            phase: Phase::Browsing,
        }
    }

    /// Start with a query already typed.
    pub fn with_query(hosts: &'a [Host], query: &str) -> Self {
        let mut app = Self::new(hosts);
        app.query = query.to_string();
        app.refilter();
        app
    }

    /// Apply one action and return the next state. Actions after a terminal
    /// phase are ignored.
    pub fn update(mut self, action: Action) -> Self {
        if self.is_finished() {
            return self;
        }

        match action {
            Action::Insert(c) => {
                self.query.push(c);
                self.refilter();
            }
            Action::Backspace => {
                if self.query.pop().is_some() {
                    self.refilter();
                }
            }
            Action::ClearQuery => {
                if !self.query.is_empty() {
                    self.query.clear();
                    self.refilter();
                }
            }
            Action::Cancel => {
                if self.query.is_empty() {
                    self.phase = Phase::Cancelled;
                } else {
                    self.query.clear();
                    self.refilter();
                }
            }
            Action::Quit => self.phase = Phase::Cancelled,
            Action::Confirm => {
                if let Some(host) = self.resolve_selected_row() {
                    self.phase = Phase::Committed(host.clone());
                }
            }
            Action::Up => self.select_prev(),
            Action::Down => self.select_next(),
            Action::PageUp => self.cursor = self.cursor.saturating_sub(PAGE_SIZE),
            Action::PageDown => {
                self.cursor = (self.cursor + PAGE_SIZE).min(self.last_row());
            }
            Action::Top => self.cursor = 0,
            Action::Bottom => self.cursor = self.last_row(),
            Action::Resize(..) => {}
        }
        self
    }

    /// Recompute the filtered view from scratch and reset the cursor.
    fn refilter(&mut self) {
        self.filtered = self.filter.apply(self.hosts, &self.query);
        self.cursor = 0;
        self.phase = if self.query.is_empty() {
            Phase::Browsing
        } else {
            Phase::Filtering
        };
    }

    /// The row under the cursor, resolved back to a host by name among the
    /// filtered hosts.
    fn resolve_selected_row(&self) -> Option<&'a Host> {
        let rows = self.rows();
        let row = rows.get(self.cursor)?;
        self.filtered_hosts().find(|h| h.name == row[0])
    }

    fn last_row(&self) -> usize {
        self.filtered.len().saturating_sub(1)
    }

    /// Move selection up, wrapping to the bottom.
    pub fn select_prev(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = if self.cursor == 0 {
            self.filtered.len() - 1
        } else {
            self.cursor - 1
        };
    }

    /// Move selection down, wrapping to the top.
    pub fn select_next(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = if self.cursor >= self.filtered.len() - 1 {
            0
        } else {
            self.cursor + 1
        };
    }

    pub fn hosts(&self) -> &'a [Host] {
        self.hosts
    }

    pub fn filtered_hosts(&self) -> impl Iterator<Item = &'a Host> + '_ {
        let hosts = self.hosts;
        self.filtered.iter().map(move |&i| &hosts[i])
    }

    /// Table rows for the filtered view.
    pub fn rows(&self) -> Vec<[&'a str; 5]> {
        self.filtered_hosts().map(Host::columns).collect()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Committed(_) | Phase::Cancelled)
    }

    /// The chosen host once committed.
    #[cfg(test)]
    pub(crate) fn selection(&self) -> Option<&Host> {
        match &self.phase {
            Phase::Committed(host) => Some(host),
            _ => None,
        }
    }

    pub fn into_selection(self) -> Option<Host> {
        match self.phase {
            Phase::Committed(host) => Some(host),
            _ => None,
        }
    }
}
