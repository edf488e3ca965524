use crate::name::NameComponentLite;

/// The ContentType carried in a Data packet's MetaInfo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    #[default]
    Blob,
    Link,
    Key,
    Nack,
    /// A code this library has no name for, kept as-is.
    Other(u64),
}

impl ContentType {
    pub const fn code(self) -> u64 {
        match self {
            ContentType::Blob => 0,
            ContentType::Link => 1,
            ContentType::Key => 2,
            ContentType::Nack => 3,
            ContentType::Other(code) => code,
        }
    }

    pub const fn from_code(code: u64) -> Self {
        match code {
            0 => ContentType::Blob,
            1 => ContentType::Link,
            2 => ContentType::Key,
            3 => ContentType::Nack,
            code => ContentType::Other(code),
        }
    }
}

/// MetaInfo fields of a Data packet. The final block id borrows its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetaInfoLite<'a> {
    timestamp: Option<i64>,
    content_type: ContentType,
    freshness_period_ms: Option<u64>,
    final_block_id: Option<NameComponentLite<'a>>,
}

impl<'a> MetaInfoLite<'a> {
    pub const fn new() -> Self {
        Self {
            timestamp: None,
            content_type: ContentType::Blob,
            freshness_period_ms: None,
            final_block_id: None,
        }
    }

    /// Milliseconds since 1970. Not carried on the wire.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: Option<i64>) -> &mut Self {
        self.timestamp = timestamp;
        self
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn set_content_type(&mut self, content_type: ContentType) -> &mut Self {
        self.content_type = content_type;
        self
    }

    pub fn freshness_period_ms(&self) -> Option<u64> {
        self.freshness_period_ms
    }

    pub fn set_freshness_period_ms(&mut self, freshness_period_ms: Option<u64>) -> &mut Self {
        self.freshness_period_ms = freshness_period_ms;
        self
    }

    pub fn final_block_id(&self) -> Option<NameComponentLite<'a>> {
        self.final_block_id
    }

    pub fn set_final_block_id(&mut self, final_block_id: Option<NameComponentLite<'a>>) -> &mut Self {
        self.final_block_id = final_block_id;
        self
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_codes() {
        assert_eq!(ContentType::from_code(0), ContentType::Blob);
        assert_eq!(ContentType::from_code(2), ContentType::Key);
        assert_eq!(ContentType::from_code(42), ContentType::Other(42));
        assert_eq!(ContentType::Other(42).code(), 42);
        assert_eq!(ContentType::Nack.code(), 3);
    }

    #[test]
    fn test_setters_chain() {
        let mut meta_info = MetaInfoLite::new();
        meta_info
            .set_content_type(ContentType::Link)
            .set_freshness_period_ms(Some(5000))
            .set_final_block_id(Some(NameComponentLite::new(&[0x00, 0x09])));

        assert_eq!(meta_info.content_type(), ContentType::Link);
        assert_eq!(meta_info.freshness_period_ms(), Some(5000));
        assert_eq!(meta_info.final_block_id().unwrap().value(), &[0x00, 0x09]);

        meta_info.clear();
        assert_eq!(meta_info, MetaInfoLite::default());
    }
}
