//! Per-render-target blend descriptors.

use crate::bits::bitfields;
use crate::codes::{BlendFactor, BlendOperation, ColorWriteMask, MAX_RENDER_TARGETS, PixelFormat};
use crate::gl;

/// Blend equation, factors and write mask of one color target, packed into a
/// single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendDesc {
    bits: u32,
}

pub type BlendDescArray = [BlendDesc; MAX_RENDER_TARGETS];
pub type WriteMaskArray = [ColorWriteMask; MAX_RENDER_TARGETS];

impl BlendDesc {
    bitfields! {
        bits: u32 {
            write_mask: ColorWriteMask @ 0,
            alpha_blend_operation: BlendOperation @ 4,
            rgb_blend_operation: BlendOperation @ 7,
            destination_alpha_blend_factor: BlendFactor @ 10,
            destination_rgb_blend_factor: BlendFactor @ 15,
            source_alpha_blend_factor: BlendFactor @ 20,
            source_rgb_blend_factor: BlendFactor @ 25,
            blending_enabled: bool @ 30,
        }
    }

    /// Blending off, `src * 1 + dst * 0`, all channels written.
    pub fn reset(&mut self) {
        self.reset_with_write_mask(ColorWriteMask::ALL);
    }

    pub fn reset_with_write_mask(&mut self, write_mask: ColorWriteMask) {
        self.bits = 0;
        self.set_write_mask(write_mask);
        self.set_alpha_blend_operation(BlendOperation::Add);
        self.set_rgb_blend_operation(BlendOperation::Add);
        self.set_source_alpha_blend_factor(BlendFactor::One);
        self.set_source_rgb_blend_factor(BlendFactor::One);
        self.set_destination_alpha_blend_factor(BlendFactor::Zero);
        self.set_destination_rgb_blend_factor(BlendFactor::Zero);
        self.set_blending_enabled(false);
    }

    /// Takes a GL color mask (R=1, G=2, B=4, A=8).
    pub fn update_write_mask(&mut self, rgba: u8) {
        self.set_write_mask(gl::color_write_mask(rgba));
    }

    pub fn update_blend_enabled(&mut self, state: &gl::BlendState) {
        self.set_blending_enabled(state.blend);
    }

    pub fn update_blend_factors(&mut self, state: &gl::BlendState) {
        self.set_source_rgb_blend_factor(gl::blend_factor(state.source_blend_rgb));
        self.set_source_alpha_blend_factor(gl::blend_factor(state.source_blend_alpha));
        self.set_destination_rgb_blend_factor(gl::blend_factor(state.dest_blend_rgb));
        self.set_destination_alpha_blend_factor(gl::blend_factor(state.dest_blend_alpha));
    }

    pub fn update_blend_ops(&mut self, state: &gl::BlendState) {
        self.set_rgb_blend_operation(gl::blend_operation(state.blend_equation_rgb));
        self.set_alpha_blend_operation(gl::blend_operation(state.blend_equation_alpha));
    }
}

impl Default for BlendDesc {
    fn default() -> Self {
        let mut desc = Self { bits: 0 };
        desc.reset();
        desc
    }
}

impl From<&gl::BlendState> for BlendDesc {
    fn from(state: &gl::BlendState) -> Self {
        let mut desc = Self::default();
        desc.update_write_mask(state.color_mask());
        desc.update_blend_enabled(state);
        desc.update_blend_factors(state);
        desc.update_blend_ops(state);
        desc
    }
}

/// Output format and blending of one pipeline color attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderPipelineColorAttachmentDesc {
    pub blend: BlendDesc,
    pub pixel_format: PixelFormat,
}

impl RenderPipelineColorAttachmentDesc {
    #[must_use]
    pub fn new(pixel_format: PixelFormat) -> Self {
        Self {
            blend: BlendDesc::default(),
            pixel_format,
        }
    }

    /// Non-blending attachment writing only the channels in `write_mask`.
    #[must_use]
    pub fn with_write_mask(pixel_format: PixelFormat, write_mask: ColorWriteMask) -> Self {
        let mut blend = BlendDesc::default();
        blend.reset_with_write_mask(write_mask);
        Self {
            blend,
            pixel_format,
        }
    }

    #[must_use]
    pub fn with_blend(pixel_format: PixelFormat, blend: BlendDesc) -> Self {
        Self {
            blend,
            pixel_format,
        }
    }

    /// Invalid format, default blend.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replaces the blend state, keeping the pixel format.
    pub fn update(&mut self, blend: &BlendDesc) {
        self.blend = *blend;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_is_opaque_replace() {
        let desc = BlendDesc::default();
        assert!(!desc.blending_enabled());
        assert_eq!(desc.write_mask(), ColorWriteMask::ALL);
        assert_eq!(desc.source_rgb_blend_factor(), BlendFactor::One);
        assert_eq!(desc.destination_alpha_blend_factor(), BlendFactor::Zero);
        assert_eq!(desc.rgb_blend_operation(), BlendOperation::Add);
    }

    #[test]
    fn gl_blend_state_is_compacted() {
        let state = gl::BlendState {
            blend: true,
            source_blend_rgb: gl::SRC_ALPHA,
            dest_blend_rgb: gl::ONE_MINUS_SRC_ALPHA,
            source_blend_alpha: gl::ONE_MINUS_SRC1_ALPHA,
            dest_blend_alpha: gl::CONSTANT_ALPHA,
            blend_equation_rgb: gl::FUNC_REVERSE_SUBTRACT,
            blend_equation_alpha: gl::MAX,
            color_mask_alpha: false,
            ..Default::default()
        };
        let desc = BlendDesc::from(&state);

        assert!(desc.blending_enabled());
        assert_eq!(desc.source_rgb_blend_factor(), BlendFactor::SourceAlpha);
        assert_eq!(desc.destination_rgb_blend_factor(), BlendFactor::OneMinusSourceAlpha);
        assert_eq!(desc.source_alpha_blend_factor(), BlendFactor::OneMinusSource1Alpha);
        assert_eq!(desc.destination_alpha_blend_factor(), BlendFactor::BlendAlpha);
        assert_eq!(desc.rgb_blend_operation(), BlendOperation::ReverseSubtract);
        assert_eq!(desc.alpha_blend_operation(), BlendOperation::Max);
        assert_eq!(
            desc.write_mask(),
            ColorWriteMask::RED | ColorWriteMask::GREEN | ColorWriteMask::BLUE
        );
    }

    #[test]
    fn write_mask_reset_keeps_blending_off() {
        let attachment = RenderPipelineColorAttachmentDesc::with_write_mask(
            PixelFormat::RGBA8_UNORM,
            ColorWriteMask::RED,
        );
        assert_eq!(attachment.blend.write_mask(), ColorWriteMask::RED);
        assert!(!attachment.blend.blending_enabled());
        assert_ne!(attachment, RenderPipelineColorAttachmentDesc::new(PixelFormat::RGBA8_UNORM));
    }

    #[test]
    fn update_keeps_pixel_format() {
        let mut attachment = RenderPipelineColorAttachmentDesc::new(PixelFormat::BGRA8_UNORM);
        let mut blend = BlendDesc::default();
        blend.set_blending_enabled(true);
        attachment.update(&blend);
        assert_eq!(attachment.pixel_format, PixelFormat::BGRA8_UNORM);
        assert!(attachment.blend.blending_enabled());

        attachment.reset();
        assert_eq!(attachment.pixel_format, PixelFormat::INVALID);
    }
}
