use std::fmt;

use ndn_lite::{ExcludeEntryLite, ExcludeLite};

use crate::blob::Blob;
use crate::change_counter::{next_change_count, ChangeCount};
use crate::error::Result;
use crate::name::NameComponent;
use crate::wire_format::{default_wire_format, WireFormat};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExcludeEntry {
    /// Open range between the neighbouring components.
    Any,
    Component(NameComponent),
}

/// The Exclude selector. Entries stay in the order they were appended and
/// are never sorted or merged.
#[derive(Debug, Clone, Default)]
pub struct Exclude {
    entries: Vec<ExcludeEntry>,
    change_count: u64,
}

impl Exclude {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ExcludeEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[ExcludeEntry] {
        &self.entries
    }

    pub fn append_any(&mut self) -> &mut Self {
        self.append(ExcludeEntry::Any)
    }

    pub fn append_component(&mut self, component: impl Into<NameComponent>) -> &mut Self {
        self.append(ExcludeEntry::Component(component.into()))
    }

    pub fn append(&mut self, entry: ExcludeEntry) -> &mut Self {
        self.entries.push(entry);
        self.set_changed();
        self
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.set_changed();
    }

    /// Whether `component` is excluded. A component entry excludes itself;
    /// an `Any` excludes everything strictly between the component before
    /// it and the next component after it, unbounded where either is
    /// missing.
    pub fn matches(&self, component: &NameComponent) -> bool {
        for (i, entry) in self.entries.iter().enumerate() {
            match entry {
                ExcludeEntry::Component(excluded) => {
                    if excluded == component {
                        return true;
                    }
                }
                ExcludeEntry::Any => {
                    let lower = match i.checked_sub(1).map(|j| &self.entries[j]) {
                        Some(ExcludeEntry::Component(lower)) => Some(lower),
                        _ => None,
                    };
                    let upper = self.entries[i + 1..].iter().find_map(|entry| match entry {
                        ExcludeEntry::Component(upper) => Some(upper),
                        ExcludeEntry::Any => None,
                    });
                    let above_lower = lower.map_or(true, |lower| component > lower);
                    let below_upper = upper.map_or(true, |upper| component < upper);
                    if above_lower && below_upper {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Comma-separated entries with `*` for `Any`, such as `abc,*`.
    pub fn to_uri(&self) -> String {
        self.to_string()
    }

    pub fn change_count(&self) -> u64 {
        self.change_count
    }

    pub fn wire_encode(&self) -> Result<Blob> {
        self.wire_encode_with(default_wire_format())
    }

    pub fn wire_encode_with(&self, wire_format: &dyn WireFormat) -> Result<Blob> {
        wire_format.encode_exclude(self)
    }

    pub fn wire_decode(&mut self, input: &[u8]) -> Result<()> {
        self.wire_decode_with(input, default_wire_format())
    }

    pub fn wire_decode_with(&mut self, input: &[u8], wire_format: &dyn WireFormat) -> Result<()> {
        wire_format.decode_exclude(self, input).map(|_| ())
    }

    pub(crate) fn copy_to_lite<'a>(&'a self, lite: &mut ExcludeLite<'a, '_>) -> ndn_lite::Result<()> {
        lite.clear();
        for entry in &self.entries {
            match entry {
                ExcludeEntry::Any => lite.append_any()?,
                ExcludeEntry::Component(component) => lite.append_component(component.to_lite()?)?,
            }
        }
        Ok(())
    }

    pub(crate) fn from_lite(lite: &ExcludeLite<'_, '_>) -> Self {
        let entries = lite
            .entries()
            .iter()
            .map(|entry| match entry {
                ExcludeEntryLite::Any => ExcludeEntry::Any,
                ExcludeEntryLite::Component(component) => {
                    ExcludeEntry::Component(NameComponent::from_lite(component))
                }
            })
            .collect();
        Self {
            entries,
            change_count: next_change_count(),
        }
    }

    fn set_changed(&mut self) {
        self.change_count = next_change_count();
    }
}

impl ChangeCount for Exclude {
    fn change_count(&self) -> u64 {
        self.change_count
    }
}

impl PartialEq for Exclude {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Exclude {}

impl fmt::Display for Exclude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match entry {
                ExcludeEntry::Any => f.write_str("*")?,
                ExcludeEntry::Component(component) => write!(f, "{}", component)?,
            }
        }
        Ok(())
    }
}
