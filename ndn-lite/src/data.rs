use crate::error::{check_capacity, Result};
use crate::meta_info::MetaInfoLite;
use crate::name::{NameComponentLite, NameLite};
use crate::signature::SignatureLite;

/// A Data packet whose name and key name live in caller-supplied storage.
#[derive(Debug)]
pub struct DataLite<'a, 's> {
    name: NameLite<'a, 's>,
    meta_info: MetaInfoLite<'a>,
    content: &'a [u8],
    signature: SignatureLite<'a, 's>,
}

impl<'a, 's> DataLite<'a, 's> {
    pub fn new(
        name_storage: &'s mut [NameComponentLite<'a>],
        key_name_storage: &'s mut [NameComponentLite<'a>],
    ) -> Self {
        Self {
            name: NameLite::new(name_storage),
            meta_info: MetaInfoLite::new(),
            content: &[],
            signature: SignatureLite::new(key_name_storage),
        }
    }

    pub fn name(&self) -> &NameLite<'a, 's> {
        &self.name
    }

    pub fn name_mut(&mut self) -> &mut NameLite<'a, 's> {
        &mut self.name
    }

    pub fn meta_info(&self) -> &MetaInfoLite<'a> {
        &self.meta_info
    }

    pub fn meta_info_mut(&mut self) -> &mut MetaInfoLite<'a> {
        &mut self.meta_info
    }

    pub fn content(&self) -> &'a [u8] {
        self.content
    }

    pub fn set_content(&mut self, content: &'a [u8]) -> &mut Self {
        self.content = content;
        self
    }

    pub fn signature(&self) -> &SignatureLite<'a, 's> {
        &self.signature
    }

    pub fn signature_mut(&mut self) -> &mut SignatureLite<'a, 's> {
        &mut self.signature
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.meta_info.clear();
        self.content = &[];
        self.signature.clear();
    }

    /// Copy `other` into this Data packet's own storage. On a capacity error
    /// nothing is copied.
    pub fn set(&mut self, other: &DataLite<'a, '_>) -> Result<()> {
        check_capacity(other.name.len(), self.name.capacity())?;
        self.signature
            .key_locator()
            .check_fits(other.signature.key_locator())?;

        self.name.set(&other.name)?;
        self.signature.set(&other.signature)?;
        self.meta_info = other.meta_info;
        self.content = other.content;
        Ok(())
    }
}
