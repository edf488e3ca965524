use std::time::Duration;

use chrono::{DateTime, Utc};
use ndn_lite::{ContentType, MetaInfoLite};

use crate::blob::Blob;
use crate::change_counter::{next_change_count, ChangeCount};
use crate::error::{Error, Result};
use crate::name::NameComponent;
use crate::wire_format::{default_wire_format, WireFormat};

/// MetaInfo of a Data packet.
#[derive(Debug, Clone, Default)]
pub struct MetaInfo {
    timestamp: Option<DateTime<Utc>>,
    content_type: ContentType,
    freshness_period: Option<Duration>,
    final_block_id: Option<NameComponent>,
    change_count: u64,
}

impl MetaInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local bookkeeping only; no wire revision carries the timestamp.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: Option<DateTime<Utc>>) -> &mut Self {
        self.timestamp = timestamp;
        self.set_changed();
        self
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn set_content_type(&mut self, content_type: ContentType) -> &mut Self {
        self.content_type = content_type;
        self.set_changed();
        self
    }

    pub fn freshness_period(&self) -> Option<Duration> {
        self.freshness_period
    }

    /// Carried on the wire in whole milliseconds.
    pub fn set_freshness_period(&mut self, freshness_period: Option<Duration>) -> &mut Self {
        self.freshness_period = freshness_period;
        self.set_changed();
        self
    }

    pub fn final_block_id(&self) -> Option<&NameComponent> {
        self.final_block_id.as_ref()
    }

    pub fn set_final_block_id(&mut self, final_block_id: Option<NameComponent>) -> &mut Self {
        self.final_block_id = final_block_id;
        self.set_changed();
        self
    }

    pub fn clear(&mut self) {
        *self = Self {
            change_count: next_change_count(),
            ..Self::default()
        };
    }

    pub fn change_count(&self) -> u64 {
        self.change_count
    }

    pub fn wire_encode(&self) -> Result<Blob> {
        self.wire_encode_with(default_wire_format())
    }

    pub fn wire_encode_with(&self, wire_format: &dyn WireFormat) -> Result<Blob> {
        wire_format.encode_meta_info(self)
    }

    pub fn wire_decode(&mut self, input: &[u8]) -> Result<()> {
        self.wire_decode_with(input, default_wire_format())
    }

    pub fn wire_decode_with(&mut self, input: &[u8], wire_format: &dyn WireFormat) -> Result<()> {
        wire_format.decode_meta_info(self, input).map(|_| ())
    }

    pub(crate) fn copy_to_lite<'a>(&'a self, lite: &mut MetaInfoLite<'a>) -> ndn_lite::Result<()> {
        let final_block_id = self
            .final_block_id
            .as_ref()
            .map(NameComponent::to_lite)
            .transpose()?;
        lite.set_timestamp(self.timestamp.map(|timestamp| timestamp.timestamp_millis()))
            .set_content_type(self.content_type)
            .set_freshness_period_ms(self.freshness_period.map(duration_to_millis))
            .set_final_block_id(final_block_id);
        Ok(())
    }

    pub(crate) fn from_lite(lite: &MetaInfoLite<'_>) -> Result<Self> {
        let timestamp = lite
            .timestamp()
            .map(|millis| {
                DateTime::from_timestamp_millis(millis)
                    .ok_or(Error::from(ndn_lite::Error::InvalidTimestamp))
            })
            .transpose()?;
        Ok(Self {
            timestamp,
            content_type: lite.content_type(),
            freshness_period: lite.freshness_period_ms().map(Duration::from_millis),
            final_block_id: lite.final_block_id().as_ref().map(NameComponent::from_lite),
            change_count: next_change_count(),
        })
    }

    fn set_changed(&mut self) {
        self.change_count = next_change_count();
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl ChangeCount for MetaInfo {
    fn change_count(&self) -> u64 {
        self.change_count
    }
}

impl PartialEq for MetaInfo {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
            && self.content_type == other.content_type
            && self.freshness_period == other.freshness_period
            && self.final_block_id == other.final_block_id
    }
}

impl Eq for MetaInfo {}
