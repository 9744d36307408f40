//! GL-style upstream state and its translation into compact codes.
//!
//! The renderer front end hands over state already reduced to GL enums and
//! booleans. The `update_*` helpers on the descriptor types read these structs
//! and translate through the functions below. A GL value outside the supported
//! set is a contract violation and panics.

use crate::codes::{
    BlendFactor, BlendOperation, ColorWriteMask, CompareFunction, PrimitiveTopologyClass,
    SamplerAddressMode, SamplerMinMagFilter, SamplerMipFilter, StencilOperation,
};

pub type GLenum = u32;

pub const NONE: GLenum = 0;
pub const ZERO: GLenum = 0;
pub const ONE: GLenum = 1;

// Comparison functions
pub const NEVER: GLenum = 0x0200;
pub const LESS: GLenum = 0x0201;
pub const EQUAL: GLenum = 0x0202;
pub const LEQUAL: GLenum = 0x0203;
pub const GREATER: GLenum = 0x0204;
pub const NOTEQUAL: GLenum = 0x0205;
pub const GEQUAL: GLenum = 0x0206;
pub const ALWAYS: GLenum = 0x0207;

// Stencil operations
pub const KEEP: GLenum = 0x1E00;
pub const REPLACE: GLenum = 0x1E01;
pub const INCR: GLenum = 0x1E02;
pub const DECR: GLenum = 0x1E03;
pub const INVERT: GLenum = 0x150A;
pub const INCR_WRAP: GLenum = 0x8507;
pub const DECR_WRAP: GLenum = 0x8508;

// Texture filters
pub const NEAREST: GLenum = 0x2600;
pub const LINEAR: GLenum = 0x2601;
pub const NEAREST_MIPMAP_NEAREST: GLenum = 0x2700;
pub const LINEAR_MIPMAP_NEAREST: GLenum = 0x2701;
pub const NEAREST_MIPMAP_LINEAR: GLenum = 0x2702;
pub const LINEAR_MIPMAP_LINEAR: GLenum = 0x2703;

// Texture wrap modes
pub const REPEAT: GLenum = 0x2901;
pub const CLAMP_TO_BORDER: GLenum = 0x812D;
pub const CLAMP_TO_EDGE: GLenum = 0x812F;
pub const MIRRORED_REPEAT: GLenum = 0x8370;
pub const MIRROR_CLAMP_TO_EDGE: GLenum = 0x8743;

// Texture compare modes
pub const COMPARE_REF_TO_TEXTURE: GLenum = 0x884E;

// Blend factors
pub const SRC_COLOR: GLenum = 0x0300;
pub const ONE_MINUS_SRC_COLOR: GLenum = 0x0301;
pub const SRC_ALPHA: GLenum = 0x0302;
pub const ONE_MINUS_SRC_ALPHA: GLenum = 0x0303;
pub const DST_ALPHA: GLenum = 0x0304;
pub const ONE_MINUS_DST_ALPHA: GLenum = 0x0305;
pub const DST_COLOR: GLenum = 0x0306;
pub const ONE_MINUS_DST_COLOR: GLenum = 0x0307;
pub const SRC_ALPHA_SATURATE: GLenum = 0x0308;
pub const CONSTANT_COLOR: GLenum = 0x8001;
pub const ONE_MINUS_CONSTANT_COLOR: GLenum = 0x8002;
pub const CONSTANT_ALPHA: GLenum = 0x8003;
pub const ONE_MINUS_CONSTANT_ALPHA: GLenum = 0x8004;
pub const SRC1_ALPHA: GLenum = 0x8589;
pub const SRC1_COLOR: GLenum = 0x88F9;
pub const ONE_MINUS_SRC1_COLOR: GLenum = 0x88FA;
pub const ONE_MINUS_SRC1_ALPHA: GLenum = 0x88FB;

// Blend equations
pub const FUNC_ADD: GLenum = 0x8006;
pub const MIN: GLenum = 0x8007;
pub const MAX: GLenum = 0x8008;
pub const FUNC_SUBTRACT: GLenum = 0x800A;
pub const FUNC_REVERSE_SUBTRACT: GLenum = 0x800B;

// ─── Upstream State ──────────────────────────────────────────────────────────

/// Depth and stencil test state as tracked by the GL front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilState {
    pub depth_test: bool,
    pub depth_func: GLenum,
    pub depth_mask: bool,

    pub stencil_test: bool,
    pub stencil_func: GLenum,
    pub stencil_mask: u32,
    pub stencil_fail: GLenum,
    pub stencil_pass_depth_fail: GLenum,
    pub stencil_pass_depth_pass: GLenum,
    pub stencil_writemask: u32,

    pub stencil_back_func: GLenum,
    pub stencil_back_mask: u32,
    pub stencil_back_fail: GLenum,
    pub stencil_back_pass_depth_fail: GLenum,
    pub stencil_back_pass_depth_pass: GLenum,
    pub stencil_back_writemask: u32,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_test: false,
            depth_func: LESS,
            depth_mask: true,
            stencil_test: false,
            stencil_func: ALWAYS,
            stencil_mask: u32::MAX,
            stencil_fail: KEEP,
            stencil_pass_depth_fail: KEEP,
            stencil_pass_depth_pass: KEEP,
            stencil_writemask: u32::MAX,
            stencil_back_func: ALWAYS,
            stencil_back_mask: u32::MAX,
            stencil_back_fail: KEEP,
            stencil_back_pass_depth_fail: KEEP,
            stencil_back_pass_depth_pass: KEEP,
            stencil_back_writemask: u32::MAX,
        }
    }
}

/// Sampler parameters as tracked by the GL front end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerState {
    pub min_filter: GLenum,
    pub mag_filter: GLenum,
    pub wrap_s: GLenum,
    pub wrap_t: GLenum,
    pub wrap_r: GLenum,
    pub max_anisotropy: f32,
    pub compare_mode: GLenum,
    pub compare_func: GLenum,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            min_filter: NEAREST_MIPMAP_LINEAR,
            mag_filter: LINEAR,
            wrap_s: REPEAT,
            wrap_t: REPEAT,
            wrap_r: REPEAT,
            max_anisotropy: 1.0,
            compare_mode: NONE,
            compare_func: LEQUAL,
        }
    }
}

/// Blend state of one draw buffer as tracked by the GL front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendState {
    pub blend: bool,
    pub source_blend_rgb: GLenum,
    pub dest_blend_rgb: GLenum,
    pub source_blend_alpha: GLenum,
    pub dest_blend_alpha: GLenum,
    pub blend_equation_rgb: GLenum,
    pub blend_equation_alpha: GLenum,
    pub color_mask_red: bool,
    pub color_mask_green: bool,
    pub color_mask_blue: bool,
    pub color_mask_alpha: bool,
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            blend: false,
            source_blend_rgb: ONE,
            dest_blend_rgb: ZERO,
            source_blend_alpha: ONE,
            dest_blend_alpha: ZERO,
            blend_equation_rgb: FUNC_ADD,
            blend_equation_alpha: FUNC_ADD,
            color_mask_red: true,
            color_mask_green: true,
            color_mask_blue: true,
            color_mask_alpha: true,
        }
    }
}

impl BlendState {
    /// Color mask packed as R=1, G=2, B=4, A=8.
    #[must_use]
    pub fn color_mask(&self) -> u8 {
        u8::from(self.color_mask_red)
            | (u8::from(self.color_mask_green) << 1)
            | (u8::from(self.color_mask_blue) << 2)
            | (u8::from(self.color_mask_alpha) << 3)
    }
}

/// GL primitive modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
    LinesAdjacency,
    LineStripAdjacency,
    TrianglesAdjacency,
    TriangleStripAdjacency,
    Patches,
}

impl PrimitiveMode {
    #[must_use]
    pub fn topology_class(self) -> PrimitiveTopologyClass {
        match self {
            Self::Points => PrimitiveTopologyClass::Point,
            Self::Lines
            | Self::LineLoop
            | Self::LineStrip
            | Self::LinesAdjacency
            | Self::LineStripAdjacency => PrimitiveTopologyClass::Line,
            Self::Triangles
            | Self::TriangleStrip
            | Self::TriangleFan
            | Self::TrianglesAdjacency
            | Self::TriangleStripAdjacency => PrimitiveTopologyClass::Triangle,
            Self::Patches => PrimitiveTopologyClass::Unspecified,
        }
    }
}

/// Index element types accepted by indexed draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DrawElementsType {
    UnsignedByte = 0,
    #[default]
    UnsignedShort = 1,
    UnsignedInt = 2,
}

// ─── Translation ─────────────────────────────────────────────────────────────

#[must_use]
pub fn compare_function(func: GLenum) -> CompareFunction {
    match func {
        NEVER => CompareFunction::Never,
        LESS => CompareFunction::Less,
        EQUAL => CompareFunction::Equal,
        LEQUAL => CompareFunction::LessEqual,
        GREATER => CompareFunction::Greater,
        NOTEQUAL => CompareFunction::NotEqual,
        GEQUAL => CompareFunction::GreaterEqual,
        ALWAYS => CompareFunction::Always,
        _ => panic!("unsupported compare function {func:#06x}"),
    }
}

#[must_use]
pub fn stencil_operation(op: GLenum) -> StencilOperation {
    match op {
        KEEP => StencilOperation::Keep,
        ZERO => StencilOperation::Zero,
        REPLACE => StencilOperation::Replace,
        INCR => StencilOperation::IncrementClamp,
        DECR => StencilOperation::DecrementClamp,
        INCR_WRAP => StencilOperation::IncrementWrap,
        DECR_WRAP => StencilOperation::DecrementWrap,
        INVERT => StencilOperation::Invert,
        _ => panic!("unsupported stencil operation {op:#06x}"),
    }
}

#[must_use]
pub fn address_mode(wrap: GLenum) -> SamplerAddressMode {
    match wrap {
        CLAMP_TO_EDGE => SamplerAddressMode::ClampToEdge,
        REPEAT => SamplerAddressMode::Repeat,
        MIRRORED_REPEAT => SamplerAddressMode::MirrorRepeat,
        CLAMP_TO_BORDER => SamplerAddressMode::ClampToBorderColor,
        MIRROR_CLAMP_TO_EDGE => SamplerAddressMode::MirrorClampToEdge,
        _ => panic!("unsupported wrap mode {wrap:#06x}"),
    }
}

/// Min/mag component of a GL filter. Mipmapped min filters contribute their
/// first (texel) half.
#[must_use]
pub fn min_mag_filter(filter: GLenum) -> SamplerMinMagFilter {
    match filter {
        NEAREST | NEAREST_MIPMAP_NEAREST | NEAREST_MIPMAP_LINEAR => SamplerMinMagFilter::Nearest,
        LINEAR | LINEAR_MIPMAP_NEAREST | LINEAR_MIPMAP_LINEAR => SamplerMinMagFilter::Linear,
        _ => panic!("unsupported texture filter {filter:#06x}"),
    }
}

/// Mip component of a GL min filter.
#[must_use]
pub fn mip_filter(filter: GLenum) -> SamplerMipFilter {
    match filter {
        NEAREST | LINEAR => SamplerMipFilter::NotMipmapped,
        NEAREST_MIPMAP_NEAREST | LINEAR_MIPMAP_NEAREST => SamplerMipFilter::Nearest,
        NEAREST_MIPMAP_LINEAR | LINEAR_MIPMAP_LINEAR => SamplerMipFilter::Linear,
        _ => panic!("unsupported texture filter {filter:#06x}"),
    }
}

#[must_use]
pub fn blend_factor(factor: GLenum) -> BlendFactor {
    match factor {
        ZERO => BlendFactor::Zero,
        ONE => BlendFactor::One,
        SRC_COLOR => BlendFactor::SourceColor,
        ONE_MINUS_SRC_COLOR => BlendFactor::OneMinusSourceColor,
        SRC_ALPHA => BlendFactor::SourceAlpha,
        ONE_MINUS_SRC_ALPHA => BlendFactor::OneMinusSourceAlpha,
        DST_COLOR => BlendFactor::DestinationColor,
        ONE_MINUS_DST_COLOR => BlendFactor::OneMinusDestinationColor,
        DST_ALPHA => BlendFactor::DestinationAlpha,
        ONE_MINUS_DST_ALPHA => BlendFactor::OneMinusDestinationAlpha,
        SRC_ALPHA_SATURATE => BlendFactor::SourceAlphaSaturated,
        CONSTANT_COLOR => BlendFactor::BlendColor,
        ONE_MINUS_CONSTANT_COLOR => BlendFactor::OneMinusBlendColor,
        CONSTANT_ALPHA => BlendFactor::BlendAlpha,
        ONE_MINUS_CONSTANT_ALPHA => BlendFactor::OneMinusBlendAlpha,
        SRC1_COLOR => BlendFactor::Source1Color,
        ONE_MINUS_SRC1_COLOR => BlendFactor::OneMinusSource1Color,
        SRC1_ALPHA => BlendFactor::Source1Alpha,
        ONE_MINUS_SRC1_ALPHA => BlendFactor::OneMinusSource1Alpha,
        _ => panic!("unsupported blend factor {factor:#06x}"),
    }
}

#[must_use]
pub fn blend_operation(equation: GLenum) -> BlendOperation {
    match equation {
        FUNC_ADD => BlendOperation::Add,
        FUNC_SUBTRACT => BlendOperation::Subtract,
        FUNC_REVERSE_SUBTRACT => BlendOperation::ReverseSubtract,
        MIN => BlendOperation::Min,
        MAX => BlendOperation::Max,
        _ => panic!("unsupported blend equation {equation:#06x}"),
    }
}

/// Converts an R=1, G=2, B=4, A=8 mask into native write-mask order.
#[must_use]
pub fn color_write_mask(rgba: u8) -> ColorWriteMask {
    assert!(rgba <= 0xF, "color mask {rgba:#x} has bits beyond RGBA");
    let mut mask = ColorWriteMask::empty();
    mask.set(ColorWriteMask::RED, rgba & 0b0001 != 0);
    mask.set(ColorWriteMask::GREEN, rgba & 0b0010 != 0);
    mask.set(ColorWriteMask::BLUE, rgba & 0b0100 != 0);
    mask.set(ColorWriteMask::ALPHA, rgba & 0b1000 != 0);
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mipmapped_min_filter_splits_into_two_codes() {
        assert_eq!(min_mag_filter(LINEAR_MIPMAP_NEAREST), SamplerMinMagFilter::Linear);
        assert_eq!(mip_filter(LINEAR_MIPMAP_NEAREST), SamplerMipFilter::Nearest);
        assert_eq!(mip_filter(LINEAR), SamplerMipFilter::NotMipmapped);
    }

    #[test]
    fn color_mask_reverses_channel_order() {
        assert_eq!(color_write_mask(0b0001), ColorWriteMask::RED);
        assert_eq!(color_write_mask(0b1000), ColorWriteMask::ALPHA);
        assert_eq!(color_write_mask(0xF), ColorWriteMask::ALL);
        assert_eq!(color_write_mask(0), ColorWriteMask::empty());
    }

    #[test]
    fn blend_state_color_mask_packs_rgba() {
        let state = BlendState {
            color_mask_green: false,
            ..Default::default()
        };
        assert_eq!(state.color_mask(), 0b1101);
    }

    #[test]
    fn primitive_modes_collapse_to_topology_classes() {
        assert_eq!(PrimitiveMode::LineLoop.topology_class(), PrimitiveTopologyClass::Line);
        assert_eq!(PrimitiveMode::TriangleFan.topology_class(), PrimitiveTopologyClass::Triangle);
        assert_eq!(PrimitiveMode::Points.topology_class(), PrimitiveTopologyClass::Point);
    }

    #[test]
    #[should_panic(expected = "unsupported compare function")]
    fn unknown_compare_function_panics() {
        let _ = compare_function(0x1234);
    }
}
