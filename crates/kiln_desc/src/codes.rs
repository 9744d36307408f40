//! Compact hardware state codes.
//!
//! Each enum mirrors one native state enumeration, restricted to the variants a
//! packed descriptor field can hold. Discriminants are the native codes.

use bitflags::bitflags;

use crate::bits::{PackedCode, packed_enum};

/// Number of vertex attributes (and regular vertex buffer slots) a
/// [`VertexDesc`](crate::VertexDesc) can describe.
pub const MAX_VERTEX_ATTRIBS: usize = 16;

/// Number of color attachments a pipeline or render pass can describe.
pub const MAX_RENDER_TARGETS: usize = 8;

/// Vertex buffer slot reserved for emulated default (constant) attributes.
pub const DEFAULT_ATTRIBS_BINDING_INDEX: u32 = MAX_VERTEX_ATTRIBS as u32;

/// Size in bytes of one default attribute value (`vec4<f32>`).
pub const DEFAULT_ATTRIBUTE_SIZE: u32 = 4 * 4;

/// Full 8-bit stencil mask.
pub const STENCIL_MASK_ALL: u8 = 0xFF;

packed_enum! {
    pub enum CompareFunction: 3 {
        Never = 0,
        Less = 1,
        Equal = 2,
        LessEqual = 3,
        Greater = 4,
        NotEqual = 5,
        GreaterEqual = 6,
        Always = 7,
    }
}

packed_enum! {
    pub enum StencilOperation: 3 {
        Keep = 0,
        Zero = 1,
        Replace = 2,
        IncrementClamp = 3,
        DecrementClamp = 4,
        Invert = 5,
        IncrementWrap = 6,
        DecrementWrap = 7,
    }
}

packed_enum! {
    pub enum SamplerAddressMode: 3 {
        ClampToEdge = 0,
        MirrorClampToEdge = 1,
        Repeat = 2,
        MirrorRepeat = 3,
        ClampToZero = 4,
        ClampToBorderColor = 5,
    }
}

packed_enum! {
    pub enum SamplerMinMagFilter: 1 {
        Nearest = 0,
        Linear = 1,
    }
}

packed_enum! {
    pub enum SamplerMipFilter: 2 {
        NotMipmapped = 0,
        Nearest = 1,
        Linear = 2,
    }
}

packed_enum! {
    pub enum BlendOperation: 3 {
        Add = 0,
        Subtract = 1,
        ReverseSubtract = 2,
        Min = 3,
        Max = 4,
    }
}

packed_enum! {
    pub enum BlendFactor: 5 {
        Zero = 0,
        One = 1,
        SourceColor = 2,
        OneMinusSourceColor = 3,
        SourceAlpha = 4,
        OneMinusSourceAlpha = 5,
        DestinationColor = 6,
        OneMinusDestinationColor = 7,
        DestinationAlpha = 8,
        OneMinusDestinationAlpha = 9,
        SourceAlphaSaturated = 10,
        BlendColor = 11,
        OneMinusBlendColor = 12,
        BlendAlpha = 13,
        OneMinusBlendAlpha = 14,
        Source1Color = 15,
        OneMinusSource1Color = 16,
        Source1Alpha = 17,
        OneMinusSource1Alpha = 18,
    }
}

packed_enum! {
    /// Vertex attribute formats. `Invalid` marks an unused attribute.
    pub enum VertexFormat: 6 {
        Invalid = 0,
        UChar2 = 1,
        UChar3 = 2,
        UChar4 = 3,
        Char2 = 4,
        Char3 = 5,
        Char4 = 6,
        UChar2Normalized = 7,
        UChar3Normalized = 8,
        UChar4Normalized = 9,
        Char2Normalized = 10,
        Char3Normalized = 11,
        Char4Normalized = 12,
        UShort2 = 13,
        UShort3 = 14,
        UShort4 = 15,
        Short2 = 16,
        Short3 = 17,
        Short4 = 18,
        UShort2Normalized = 19,
        UShort3Normalized = 20,
        UShort4Normalized = 21,
        Short2Normalized = 22,
        Short3Normalized = 23,
        Short4Normalized = 24,
        Half2 = 25,
        Half3 = 26,
        Half4 = 27,
        Float = 28,
        Float2 = 29,
        Float3 = 30,
        Float4 = 31,
        Int = 32,
        Int2 = 33,
        Int3 = 34,
        Int4 = 35,
        UInt = 36,
        UInt2 = 37,
        UInt3 = 38,
        UInt4 = 39,
        Int1010102Normalized = 40,
        UInt1010102Normalized = 41,
        UChar4NormalizedBgra = 42,
        UChar = 45,
        Char = 46,
        UCharNormalized = 47,
        CharNormalized = 48,
        UShort = 49,
        Short = 50,
        UShortNormalized = 51,
        ShortNormalized = 52,
        Half = 53,
    }
}

packed_enum! {
    /// Primitive class a render pipeline is built for.
    pub enum PrimitiveTopologyClass: 2 {
        Unspecified = 0,
        Point = 1,
        Line = 2,
        Triangle = 3,
    }
}

packed_enum! {
    /// How the fragment stage of a render pipeline is used.
    pub enum RenderPipelineRasterization: 2 {
        /// The vertex stage writes no visible output (e.g. transform feedback
        /// only); the fragment stage is turned off.
        Disabled = 0,
        /// Normal rasterization with a fragment stage.
        Enabled = 1,
        /// Rasterizer discard emulated by moving every vertex outside the
        /// visible clip volume, for vertex shaders that still write stage
        /// output and therefore cannot run with the fragment stage off.
        EmulatedDiscard = 2,
    }
}

/// How a vertex buffer advances between vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum VertexStepFunction {
    /// Every vertex reads the same element (used for default attributes).
    Constant = 0,
    #[default]
    PerVertex = 1,
    PerInstance = 2,
}

bitflags! {
    /// Per-target color write mask, in native bit order.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ColorWriteMask: u8 {
        const ALPHA = 1 << 0;
        const BLUE  = 1 << 1;
        const GREEN = 1 << 2;
        const RED   = 1 << 3;
        const ALL   = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

impl PackedCode for ColorWriteMask {
    const BITS: u32 = 4;

    #[inline]
    fn to_code(self) -> u32 {
        u32::from(self.bits())
    }

    #[inline]
    fn from_code(code: u32) -> Self {
        Self::from_bits_truncate(code as u8)
    }
}

/// 16-bit native pixel format tag.
///
/// Only the tag value matters to descriptor identity; the named constants
/// cover the formats render targets are commonly created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PixelFormat(pub u16);

impl PixelFormat {
    pub const INVALID: Self = Self(0);

    pub const A8_UNORM: Self = Self(1);
    pub const R8_UNORM: Self = Self(10);
    pub const R8_SNORM: Self = Self(12);
    pub const R8_UINT: Self = Self(13);
    pub const R8_SINT: Self = Self(14);
    pub const R16_UNORM: Self = Self(20);
    pub const R16_SNORM: Self = Self(22);
    pub const R16_UINT: Self = Self(23);
    pub const R16_SINT: Self = Self(24);
    pub const R16_FLOAT: Self = Self(25);
    pub const RG8_UNORM: Self = Self(30);
    pub const RG8_SNORM: Self = Self(32);
    pub const RG8_UINT: Self = Self(33);
    pub const RG8_SINT: Self = Self(34);
    pub const R32_UINT: Self = Self(53);
    pub const R32_SINT: Self = Self(54);
    pub const R32_FLOAT: Self = Self(55);
    pub const RG16_UNORM: Self = Self(60);
    pub const RG16_SNORM: Self = Self(62);
    pub const RG16_UINT: Self = Self(63);
    pub const RG16_SINT: Self = Self(64);
    pub const RG16_FLOAT: Self = Self(65);
    pub const RGBA8_UNORM: Self = Self(70);
    pub const RGBA8_UNORM_SRGB: Self = Self(71);
    pub const RGBA8_SNORM: Self = Self(72);
    pub const RGBA8_UINT: Self = Self(73);
    pub const RGBA8_SINT: Self = Self(74);
    pub const BGRA8_UNORM: Self = Self(80);
    pub const BGRA8_UNORM_SRGB: Self = Self(81);
    pub const RGB10A2_UNORM: Self = Self(90);
    pub const RGB10A2_UINT: Self = Self(91);
    pub const RG11B10_FLOAT: Self = Self(92);
    pub const RGB9E5_FLOAT: Self = Self(93);
    pub const RG32_UINT: Self = Self(103);
    pub const RG32_SINT: Self = Self(104);
    pub const RG32_FLOAT: Self = Self(105);
    pub const RGBA16_UNORM: Self = Self(110);
    pub const RGBA16_SNORM: Self = Self(112);
    pub const RGBA16_UINT: Self = Self(113);
    pub const RGBA16_SINT: Self = Self(114);
    pub const RGBA16_FLOAT: Self = Self(115);
    pub const RGBA32_UINT: Self = Self(123);
    pub const RGBA32_SINT: Self = Self(124);
    pub const RGBA32_FLOAT: Self = Self(125);
    pub const DEPTH16_UNORM: Self = Self(250);
    pub const DEPTH32_FLOAT: Self = Self(252);
    pub const STENCIL8: Self = Self(253);
    pub const DEPTH24_UNORM_STENCIL8: Self = Self(255);
    pub const DEPTH32_FLOAT_STENCIL8: Self = Self(260);

    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }

    #[inline]
    #[must_use]
    pub const fn has_depth(self) -> bool {
        matches!(self.0, 250 | 252 | 255 | 260)
    }

    #[inline]
    #[must_use]
    pub const fn has_stencil(self) -> bool {
        matches!(self.0, 253 | 255 | 260)
    }
}
