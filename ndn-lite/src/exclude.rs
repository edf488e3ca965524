use crate::error::{Error, Result};
use crate::name::NameComponentLite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExcludeEntryLite<'a> {
    /// Open range between the neighbouring components.
    #[default]
    Any,
    Component(NameComponentLite<'a>),
}

/// Exclude entries held in caller-supplied storage, in the order given.
#[derive(Debug)]
pub struct ExcludeLite<'a, 's> {
    entries: &'s mut [ExcludeEntryLite<'a>],
    n_entries: usize,
}

impl<'a, 's> ExcludeLite<'a, 's> {
    pub fn new(storage: &'s mut [ExcludeEntryLite<'a>]) -> Self {
        Self {
            entries: storage,
            n_entries: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.n_entries
    }

    pub fn is_empty(&self) -> bool {
        self.n_entries == 0
    }

    pub fn get(&self, index: usize) -> Option<&ExcludeEntryLite<'a>> {
        self.entries().get(index)
    }

    pub fn entries(&self) -> &[ExcludeEntryLite<'a>] {
        &self.entries[..self.n_entries]
    }

    pub fn clear(&mut self) {
        self.n_entries = 0;
    }

    pub fn append_any(&mut self) -> Result<()> {
        self.append(ExcludeEntryLite::Any)
    }

    pub fn append_component(&mut self, component: NameComponentLite<'a>) -> Result<()> {
        self.append(ExcludeEntryLite::Component(component))
    }

    pub fn append(&mut self, entry: ExcludeEntryLite<'a>) -> Result<()> {
        let capacity = self.entries.len();
        let slot = self
            .entries
            .get_mut(self.n_entries)
            .ok_or(Error::CapacityExceeded { capacity })?;
        *slot = entry;
        self.n_entries += 1;
        Ok(())
    }

    pub fn set_entries(&mut self, entries: &[ExcludeEntryLite<'a>]) -> Result<()> {
        if entries.len() > self.entries.len() {
            return Err(Error::CapacityExceeded {
                capacity: self.entries.len(),
            });
        }
        self.entries[..entries.len()].copy_from_slice(entries);
        self.n_entries = entries.len();
        Ok(())
    }

    pub fn set(&mut self, other: &ExcludeLite<'a, '_>) -> Result<()> {
        self.set_entries(other.entries())
    }
}
