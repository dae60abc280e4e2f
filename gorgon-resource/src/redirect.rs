//! Alias redirects installed by link resolution

use crate::guid::Guid;

/// A single `source → target` redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub source: Guid,
    pub target: Guid,
}

/// Append-only table of identifier redirects
///
/// Every lookup through a [`ResourceFile`](crate::ResourceFile) passes
/// through this table first. Entries are installed in tree order, one per
/// link alias, and live as long as the loaded container.
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    entries: Vec<Redirect>,
}

impl RedirectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: Guid, target: Guid) {
        self.entries.push(Redirect { source, target });
    }

    /// Follow a single redirect hop. Later entries for the same source win.
    pub fn resolve(&self, guid: Guid) -> Guid {
        self.entries
            .iter()
            .rev()
            .find(|r| r.source == guid)
            .map(|r| r.target)
            .unwrap_or(guid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Redirect> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_idempotent() {
        let alias = Guid::from_u64(1);
        let real = Guid::from_u64(2);
        let mut table = RedirectTable::new();
        table.add(alias, real);

        assert_eq!(table.resolve(alias), real);
        assert_eq!(table.resolve(alias), real);
        // One hop only: the target is not itself redirected
        assert_eq!(table.resolve(real), real);
    }

    #[test]
    fn test_unknown_passes_through() {
        let table = RedirectTable::new();
        let guid = Guid::from_u64(42);
        assert_eq!(table.resolve(guid), guid);
        assert!(table.is_empty());
    }

    #[test]
    fn test_latest_entry_wins() {
        let alias = Guid::from_u64(1);
        let mut table = RedirectTable::new();
        table.add(alias, Guid::from_u64(2));
        table.add(alias, Guid::from_u64(3));
        assert_eq!(table.resolve(alias), Guid::from_u64(3));
        assert_eq!(table.len(), 2);
    }
}
