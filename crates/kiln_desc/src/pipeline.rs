//! Render and compute pipeline descriptors.

use std::hash::{Hash, Hasher};

use crate::bits::bitfields;
use crate::blend::RenderPipelineColorAttachmentDesc;
use crate::codes::{
    ColorWriteMask, MAX_RENDER_TARGETS, PixelFormat, PrimitiveTopologyClass,
    RenderPipelineRasterization,
};
use crate::gl::{DrawElementsType, PrimitiveMode};
use crate::hash::fx_hash_key;
use crate::vertex::VertexDesc;

/// Set of enabled draw buffers, one bit per color target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawBufferMask(pub u8);

impl DrawBufferMask {
    pub const ALL: Self = Self(u8::MAX);

    #[inline]
    #[must_use]
    pub fn test(self, index: usize) -> bool {
        index < MAX_RENDER_TARGETS && self.0 & (1 << index) != 0
    }

    #[inline]
    pub fn set(&mut self, index: usize, enabled: bool) {
        assert!(index < MAX_RENDER_TARGETS, "draw buffer {index} out of range");
        if enabled {
            self.0 |= 1 << index;
        } else {
            self.0 &= !(1 << index);
        }
    }
}

/// Attachment formats and blending a render pipeline writes to.
///
/// Only the first `num_color_attachments` color attachments are live.
#[derive(Debug, Clone, Copy)]
pub struct RenderPipelineOutputDesc {
    pub color_attachments: [RenderPipelineColorAttachmentDesc; MAX_RENDER_TARGETS],
    pub depth_attachment_pixel_format: PixelFormat,
    pub stencil_attachment_pixel_format: PixelFormat,
    pub num_color_attachments: u8,
    pub sample_count: u8,
}

impl RenderPipelineOutputDesc {
    #[inline]
    #[must_use]
    pub fn live_color_attachments(&self) -> &[RenderPipelineColorAttachmentDesc] {
        &self.color_attachments[..usize::from(self.num_color_attachments).min(MAX_RENDER_TARGETS)]
    }

    /// Masks out all writes to draw buffers that are not enabled.
    pub fn update_enabled_draw_buffers(&mut self, enabled: DrawBufferMask) {
        for (index, attachment) in self.color_attachments.iter_mut().enumerate() {
            if !enabled.test(index) {
                attachment.blend.set_write_mask(ColorWriteMask::empty());
            }
        }
    }
}

impl Default for RenderPipelineOutputDesc {
    fn default() -> Self {
        Self {
            color_attachments: [RenderPipelineColorAttachmentDesc::default(); MAX_RENDER_TARGETS],
            depth_attachment_pixel_format: PixelFormat::INVALID,
            stencil_attachment_pixel_format: PixelFormat::INVALID,
            num_color_attachments: 0,
            sample_count: 1,
        }
    }
}

impl PartialEq for RenderPipelineOutputDesc {
    fn eq(&self, other: &Self) -> bool {
        self.live_color_attachments() == other.live_color_attachments()
            && self.depth_attachment_pixel_format == other.depth_attachment_pixel_format
            && self.stencil_attachment_pixel_format == other.stencil_attachment_pixel_format
            && self.sample_count == other.sample_count
    }
}

impl Eq for RenderPipelineOutputDesc {}

impl Hash for RenderPipelineOutputDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.live_color_attachments().hash(state);
        self.depth_attachment_pixel_format.hash(state);
        self.stencil_attachment_pixel_format.hash(state);
        self.sample_count.hash(state);
    }
}

/// Everything a render pipeline state object is compiled from, apart from
/// the shaders themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPipelineDesc {
    pub vertex_descriptor: VertexDesc,
    pub output_descriptor: RenderPipelineOutputDesc,
    flags: u8,
}

impl RenderPipelineDesc {
    bitfields! {
        flags: u8 {
            input_primitive_topology: PrimitiveTopologyClass @ 0,
            alpha_to_coverage_enabled: bool @ 2,
            /// Emulation tag read by shader specialization; it has no native
            /// pipeline counterpart but still splits cache keys.
            rasterization_type: RenderPipelineRasterization @ 3,
        }
    }

    #[inline]
    #[must_use]
    pub fn rasterization_enabled(&self) -> bool {
        self.rasterization_type() != RenderPipelineRasterization::Disabled
    }

    /// Whether the pipeline reads emulated default attributes.
    #[inline]
    #[must_use]
    pub fn has_default_attribs(&self) -> bool {
        self.vertex_descriptor.uses_default_attribs()
    }

    #[must_use]
    pub fn hash_value(&self) -> u64 {
        fx_hash_key(self)
    }
}

impl Default for RenderPipelineDesc {
    fn default() -> Self {
        let mut desc = Self {
            vertex_descriptor: VertexDesc::default(),
            output_descriptor: RenderPipelineOutputDesc::default(),
            flags: 0,
        };
        desc.set_input_primitive_topology(PrimitiveTopologyClass::Unspecified);
        desc.set_alpha_to_coverage_enabled(false);
        desc.set_rasterization_type(RenderPipelineRasterization::Enabled);
        desc
    }
}

/// Variant key of the compute pass that rewrites index buffers so the
/// provoking vertex matches GL's last-vertex convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProvokingVertexComputePipelineDesc {
    pub primitive_mode: PrimitiveMode,
    pub element_type: DrawElementsType,
    pub primitive_restart_enabled: bool,
    pub generate_indices: bool,
}

impl ProvokingVertexComputePipelineDesc {
    #[must_use]
    pub fn hash_value(&self) -> u64 {
        fx_hash_key(self)
    }
}
