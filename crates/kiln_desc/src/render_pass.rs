//! Render pass attachment descriptors.
//!
//! A [`RenderPassDesc`] records which textures a pass renders into and how
//! each attachment is loaded and stored. It is not a cache key itself; its job
//! is to derive the [`RenderPipelineOutputDesc`] every pipeline used inside
//! the pass must match.

use std::fmt::Debug;
use std::sync::Arc;

use bitflags::bitflags;

use crate::bits;
use crate::blend::{BlendDesc, BlendDescArray, RenderPipelineColorAttachmentDesc, WriteMaskArray};
use crate::codes::{ColorWriteMask, MAX_RENDER_TARGETS, PixelFormat};
use crate::pipeline::RenderPipelineOutputDesc;

/// A texture that can be bound as a render pass attachment.
pub trait AttachmentTexture: Debug {
    fn pixel_format(&self) -> PixelFormat;

    /// Channels the texture can actually hold. Formats emulated with a wider
    /// native format (RGB stored as RGBA) mask out the padding channel.
    fn color_writable_mask(&self) -> ColorWriteMask {
        ColorWriteMask::ALL
    }
}

/// Shared texture reference. Attachments compare textures by identity.
pub type TextureRef = Arc<dyn AttachmentTexture>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadAction {
    DontCare,
    #[default]
    Load,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreAction {
    DontCare,
    #[default]
    Store,
    MultisampleResolve,
    StoreAndMultisampleResolve,
    Unknown,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct StoreActionOptions: u8 {
        const CUSTOM_SAMPLE_POSITIONS = 1 << 0;
    }
}

fn same_texture(a: Option<&TextureRef>, b: Option<&TextureRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Attachment binding shared by the color, depth and stencil attachments.
#[derive(Debug, Clone, Default)]
pub struct RenderPassAttachmentDesc {
    pub texture: Option<TextureRef>,
    /// Multisample texture rendered into and discarded at the end of the pass,
    /// resolved into `texture`.
    pub implicit_ms_texture: Option<TextureRef>,
    pub level: u32,
    pub slice_or_depth: u32,
    pub blendable: bool,
    pub load_action: LoadAction,
    pub store_action: StoreAction,
    pub store_action_options: StoreActionOptions,
}

impl RenderPassAttachmentDesc {
    /// No texture, level 0, load and store.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    #[must_use]
    pub fn has_implicit_ms_texture(&self) -> bool {
        self.implicit_ms_texture.is_some()
    }

    /// Same binding, regardless of load and store actions.
    #[must_use]
    pub fn equal_ignore_load_store_options(&self, other: &Self) -> bool {
        same_texture(self.texture.as_ref(), other.texture.as_ref())
            && same_texture(
                self.implicit_ms_texture.as_ref(),
                other.implicit_ms_texture.as_ref(),
            )
            && self.level == other.level
            && self.slice_or_depth == other.slice_or_depth
            && self.blendable == other.blendable
    }
}

impl PartialEq for RenderPassAttachmentDesc {
    fn eq(&self, other: &Self) -> bool {
        self.equal_ignore_load_store_options(other)
            && self.load_action == other.load_action
            && self.store_action == other.store_action
            && self.store_action_options == other.store_action_options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClearColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPassColorAttachmentDesc {
    pub attachment: RenderPassAttachmentDesc,
    pub clear_color: ClearColor,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPassDepthAttachmentDesc {
    pub attachment: RenderPassAttachmentDesc,
    pub clear_depth: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPassStencilAttachmentDesc {
    pub attachment: RenderPassAttachmentDesc,
    pub clear_stencil: u32,
}

/// Attachments and dimensions of one render pass.
#[derive(Debug, Clone)]
pub struct RenderPassDesc {
    pub color_attachments: [RenderPassColorAttachmentDesc; MAX_RENDER_TARGETS],
    pub depth_attachment: RenderPassDepthAttachmentDesc,
    pub stencil_attachment: RenderPassStencilAttachmentDesc,
    pub num_color_attachments: u32,
    pub sample_count: u32,
    pub default_width: u32,
    pub default_height: u32,
}

impl Default for RenderPassDesc {
    fn default() -> Self {
        Self {
            color_attachments: Default::default(),
            depth_attachment: RenderPassDepthAttachmentDesc::default(),
            stencil_attachment: RenderPassStencilAttachmentDesc::default(),
            num_color_attachments: 0,
            sample_count: 1,
            default_width: 0,
            default_height: 0,
        }
    }
}

impl RenderPassDesc {
    #[inline]
    #[must_use]
    pub fn live_color_attachments(&self) -> &[RenderPassColorAttachmentDesc] {
        let count = (self.num_color_attachments as usize).min(MAX_RENDER_TARGETS);
        &self.color_attachments[..count]
    }

    /// Output layout for non-blending pipelines writing every channel.
    #[must_use]
    pub fn render_pipeline_output_desc(&self) -> RenderPipelineOutputDesc {
        self.render_pipeline_output_desc_with_write_masks(&[ColorWriteMask::ALL; MAX_RENDER_TARGETS])
    }

    /// Output layout for non-blending pipelines with per-target write masks.
    #[must_use]
    pub fn render_pipeline_output_desc_with_write_masks(
        &self,
        write_masks: &WriteMaskArray,
    ) -> RenderPipelineOutputDesc {
        let blends: BlendDescArray = std::array::from_fn(|index| {
            let mut blend = BlendDesc::default();
            blend.reset_with_write_mask(write_masks[index]);
            blend
        });
        self.render_pipeline_output_desc_with_blend(&blends)
    }

    /// Output layout with per-target blend state.
    ///
    /// Blending is kept only on blendable attachments that write at least one
    /// channel, and each write mask is narrowed to what the texture can hold.
    #[must_use]
    pub fn render_pipeline_output_desc_with_blend(
        &self,
        blends: &BlendDescArray,
    ) -> RenderPipelineOutputDesc {
        let live = self.live_color_attachments();
        let mut output = RenderPipelineOutputDesc {
            num_color_attachments: live.len() as u8,
            sample_count: bits::checked_width(self.sample_count, 8, "sample_count") as u8,
            ..RenderPipelineOutputDesc::default()
        };

        for (index, color) in live.iter().enumerate() {
            let blend = &blends[index];
            let target = &mut output.color_attachments[index];
            let Some(texture) = color.attachment.texture.as_ref() else {
                target.reset();
                target.blend.set_blending_enabled(false);
                continue;
            };

            *target = if color.attachment.blendable && !blend.write_mask().is_empty() {
                RenderPipelineColorAttachmentDesc::with_blend(texture.pixel_format(), *blend)
            } else {
                RenderPipelineColorAttachmentDesc::with_write_mask(
                    texture.pixel_format(),
                    blend.write_mask(),
                )
            };
            let writable = target.blend.write_mask() & texture.color_writable_mask();
            target.blend.set_write_mask(writable);
        }

        output.depth_attachment_pixel_format = attachment_format(&self.depth_attachment.attachment);
        output.stencil_attachment_pixel_format =
            attachment_format(&self.stencil_attachment.attachment);
        output
    }

    /// Same attachments bound, regardless of load/store actions and clear
    /// values.
    #[must_use]
    pub fn equal_ignore_load_store_options(&self, other: &Self) -> bool {
        self.num_color_attachments == other.num_color_attachments
            && self.sample_count == other.sample_count
            && self
                .live_color_attachments()
                .iter()
                .zip(other.live_color_attachments())
                .all(|(a, b)| a.attachment.equal_ignore_load_store_options(&b.attachment))
            && self
                .depth_attachment
                .attachment
                .equal_ignore_load_store_options(&other.depth_attachment.attachment)
            && self
                .stencil_attachment
                .attachment
                .equal_ignore_load_store_options(&other.stencil_attachment.attachment)
    }
}

impl PartialEq for RenderPassDesc {
    fn eq(&self, other: &Self) -> bool {
        self.num_color_attachments == other.num_color_attachments
            && self.sample_count == other.sample_count
            && self.default_width == other.default_width
            && self.default_height == other.default_height
            && self.live_color_attachments() == other.live_color_attachments()
            && self.depth_attachment == other.depth_attachment
            && self.stencil_attachment == other.stencil_attachment
    }
}

fn attachment_format(attachment: &RenderPassAttachmentDesc) -> PixelFormat {
    attachment
        .texture
        .as_ref()
        .map_or(PixelFormat::INVALID, |texture| texture.pixel_format())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestTexture {
        format: PixelFormat,
        writable: ColorWriteMask,
    }

    fn texture(format: PixelFormat) -> TextureRef {
        Arc::new(TestTexture {
            format,
            writable: ColorWriteMask::ALL,
        })
    }

    impl AttachmentTexture for TestTexture {
        fn pixel_format(&self) -> PixelFormat {
            self.format
        }

        fn color_writable_mask(&self) -> ColorWriteMask {
            self.writable
        }
    }

    fn color(texture: Option<TextureRef>, blendable: bool) -> RenderPassColorAttachmentDesc {
        RenderPassColorAttachmentDesc {
            attachment: RenderPassAttachmentDesc {
                texture,
                blendable,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn attachments_compare_textures_by_identity() {
        let a = texture(PixelFormat::RGBA8_UNORM);
        let b = texture(PixelFormat::RGBA8_UNORM);

        let first = color(Some(a.clone()), true);
        let same = color(Some(a), true);
        let other = color(Some(b), true);

        assert_eq!(first, same);
        assert_ne!(first, other);
    }

    #[test]
    fn load_store_options_only_affect_strict_equality() {
        let tex = texture(PixelFormat::BGRA8_UNORM);
        let mut a = RenderPassDesc {
            num_color_attachments: 1,
            ..Default::default()
        };
        a.color_attachments[0] = color(Some(tex), false);
        let mut b = a.clone();
        b.color_attachments[0].attachment.load_action = LoadAction::Clear;
        b.color_attachments[0].attachment.store_action = StoreAction::DontCare;
        b.color_attachments[0].clear_color.red = 1.0;

        assert!(a.equal_ignore_load_store_options(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn output_desc_keeps_blend_only_on_blendable_targets() {
        let mut pass = RenderPassDesc {
            num_color_attachments: 3,
            sample_count: 4,
            ..Default::default()
        };
        pass.color_attachments[0] = color(Some(texture(PixelFormat::RGBA8_UNORM)), true);
        pass.color_attachments[1] = color(Some(texture(PixelFormat::R32_UINT)), false);
        pass.color_attachments[2] = color(None, true);
        pass.depth_attachment.attachment.texture = Some(texture(PixelFormat::DEPTH32_FLOAT));

        let mut enabled = BlendDesc::default();
        enabled.set_blending_enabled(true);
        let output = pass.render_pipeline_output_desc_with_blend(&[enabled; MAX_RENDER_TARGETS]);

        assert_eq!(output.num_color_attachments, 3);
        assert_eq!(output.sample_count, 4);
        assert!(output.color_attachments[0].blend.blending_enabled());
        assert!(!output.color_attachments[1].blend.blending_enabled());
        assert_eq!(output.color_attachments[1].pixel_format, PixelFormat::R32_UINT);
        assert_eq!(output.color_attachments[2].pixel_format, PixelFormat::INVALID);
        assert!(!output.color_attachments[2].blend.blending_enabled());
        assert_eq!(output.depth_attachment_pixel_format, PixelFormat::DEPTH32_FLOAT);
        assert_eq!(output.stencil_attachment_pixel_format, PixelFormat::INVALID);
    }

    #[test]
    fn write_mask_is_narrowed_to_texture_channels() {
        let rgb: TextureRef = Arc::new(TestTexture {
            format: PixelFormat::RGBA8_UNORM,
            writable: ColorWriteMask::RED | ColorWriteMask::GREEN | ColorWriteMask::BLUE,
        });
        let mut pass = RenderPassDesc {
            num_color_attachments: 1,
            ..Default::default()
        };
        pass.color_attachments[0] = color(Some(rgb), true);

        let output = pass.render_pipeline_output_desc();
        assert_eq!(
            output.color_attachments[0].blend.write_mask(),
            ColorWriteMask::RED | ColorWriteMask::GREEN | ColorWriteMask::BLUE
        );
    }

    #[test]
    fn empty_write_mask_disables_blending() {
        let mut pass = RenderPassDesc {
            num_color_attachments: 1,
            ..Default::default()
        };
        pass.color_attachments[0] = color(Some(texture(PixelFormat::RGBA16_FLOAT)), true);

        let mut masks = [ColorWriteMask::ALL; MAX_RENDER_TARGETS];
        masks[0] = ColorWriteMask::empty();
        let output = pass.render_pipeline_output_desc_with_write_masks(&masks);

        assert!(output.color_attachments[0].blend.write_mask().is_empty());
        assert!(!output.color_attachments[0].blend.blending_enabled());
    }

    #[test]
    fn identical_passes_derive_identical_output_descs() {
        let tex = texture(PixelFormat::RGBA8_UNORM);
        let mut a = RenderPassDesc {
            num_color_attachments: 1,
            ..Default::default()
        };
        a.color_attachments[0] = color(Some(tex.clone()), true);
        let mut b = a.clone();
        b.color_attachments[5] = color(Some(tex), true);

        assert_eq!(a.render_pipeline_output_desc(), b.render_pipeline_output_desc());
    }

    #[test]
    #[should_panic(expected = "sample_count = 256 does not fit in 8 bits")]
    fn oversized_sample_count_is_fatal() {
        let pass = RenderPassDesc {
            sample_count: 256,
            ..Default::default()
        };
        let _ = pass.render_pipeline_output_desc();
    }
}
