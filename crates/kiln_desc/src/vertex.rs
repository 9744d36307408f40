//! Vertex input layout descriptors.

use std::hash::{Hash, Hasher};

use crate::bits::{self, bitfields};
use crate::codes::{
    DEFAULT_ATTRIBS_BINDING_INDEX, MAX_VERTEX_ATTRIBS, VertexFormat, VertexStepFunction,
};

const OFFSET_SHIFT: u32 = 6;
const OFFSET_BITS: u32 = 8;
const BUFFER_INDEX_SHIFT: u32 = 14;
const BUFFER_INDEX_BITS: u32 = 5;

/// One vertex attribute: 6-bit format, 8-bit byte offset, 5-bit buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VertexAttributeDesc {
    bits: u32,
}

impl VertexAttributeDesc {
    bitfields! {
        bits: u32 {
            format: VertexFormat @ 0,
        }
    }

    /// Panics if `offset` exceeds 255 or `buffer_index` exceeds 31.
    #[must_use]
    pub fn new(format: VertexFormat, offset: u32, buffer_index: u32) -> Self {
        let mut desc = Self::default();
        desc.set_format(format);
        desc.set_offset(offset);
        desc.set_buffer_index(buffer_index);
        desc
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> u32 {
        bits::extract(self.bits, OFFSET_SHIFT, OFFSET_BITS)
    }

    #[inline]
    pub fn set_offset(&mut self, offset: u32) {
        let offset = bits::checked_width(offset, OFFSET_BITS, "attribute offset");
        self.bits = bits::insert(self.bits, OFFSET_SHIFT, OFFSET_BITS, offset);
    }

    #[inline]
    #[must_use]
    pub fn buffer_index(&self) -> u32 {
        bits::extract(self.bits, BUFFER_INDEX_SHIFT, BUFFER_INDEX_BITS)
    }

    #[inline]
    pub fn set_buffer_index(&mut self, buffer_index: u32) {
        let buffer_index =
            bits::checked_width(buffer_index, BUFFER_INDEX_BITS, "attribute buffer index");
        self.bits = bits::insert(self.bits, BUFFER_INDEX_SHIFT, BUFFER_INDEX_BITS, buffer_index);
    }
}

/// How one vertex buffer slot is stepped and strided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VertexBufferLayoutDesc {
    pub step_rate: u32,
    pub stride: u32,
    pub step_function: VertexStepFunction,
}

/// Complete vertex input layout.
///
/// Only the first `num_attribs` attributes and `num_buffer_layouts` layouts are
/// live; entries past the counts are ignored by equality and hashing, so stale
/// data left in unused slots never splits a cache key.
#[derive(Debug, Clone, Copy)]
pub struct VertexDesc {
    pub attributes: [VertexAttributeDesc; MAX_VERTEX_ATTRIBS],
    pub layouts: [VertexBufferLayoutDesc; MAX_VERTEX_ATTRIBS],
    pub num_attribs: u8,
    pub num_buffer_layouts: u8,
}

impl VertexDesc {
    #[inline]
    #[must_use]
    pub fn live_attributes(&self) -> &[VertexAttributeDesc] {
        &self.attributes[..usize::from(self.num_attribs).min(MAX_VERTEX_ATTRIBS)]
    }

    #[inline]
    #[must_use]
    pub fn live_layouts(&self) -> &[VertexBufferLayoutDesc] {
        &self.layouts[..usize::from(self.num_buffer_layouts).min(MAX_VERTEX_ATTRIBS)]
    }

    /// Appends an attribute. Panics when all slots are in use.
    pub fn push_attribute(&mut self, attribute: VertexAttributeDesc) {
        let index = usize::from(self.num_attribs);
        assert!(index < MAX_VERTEX_ATTRIBS, "too many vertex attributes");
        self.attributes[index] = attribute;
        self.num_attribs += 1;
    }

    /// Appends a buffer layout. Panics when all slots are in use.
    pub fn push_layout(&mut self, layout: VertexBufferLayoutDesc) {
        let index = usize::from(self.num_buffer_layouts);
        assert!(index < MAX_VERTEX_ATTRIBS, "too many vertex buffer layouts");
        self.layouts[index] = layout;
        self.num_buffer_layouts += 1;
    }

    /// Whether any live attribute reads from the emulated default-attribute
    /// buffer slot.
    #[must_use]
    pub fn uses_default_attribs(&self) -> bool {
        self.live_attributes()
            .iter()
            .any(|attrib| attrib.buffer_index() == DEFAULT_ATTRIBS_BINDING_INDEX)
    }
}

impl Default for VertexDesc {
    fn default() -> Self {
        Self {
            attributes: [VertexAttributeDesc::default(); MAX_VERTEX_ATTRIBS],
            layouts: [VertexBufferLayoutDesc::default(); MAX_VERTEX_ATTRIBS],
            num_attribs: 0,
            num_buffer_layouts: 0,
        }
    }
}

impl PartialEq for VertexDesc {
    fn eq(&self, other: &Self) -> bool {
        self.live_attributes() == other.live_attributes()
            && self.live_layouts() == other.live_layouts()
    }
}

impl Eq for VertexDesc {}

impl Hash for VertexDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Slice hashing includes the length, so the counts are covered.
        self.live_attributes().hash(state);
        self.live_layouts().hash(state);
    }
}
