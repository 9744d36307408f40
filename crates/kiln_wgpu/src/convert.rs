//! Compact code → wgpu conversion tables.
//!
//! Codes with a direct wgpu counterpart convert infallibly. Codes wgpu cannot
//! express return [`KilnError::Unsupported`] so the caller fails the lookup
//! instead of hitting a validation panic inside wgpu.

use kiln_cache::{KilnError, Result};
use kiln_desc::{
    BlendDesc, BlendFactor, BlendOperation, ColorWriteMask, CompareFunction, DepthStencilDesc,
    PixelFormat, PrimitiveTopologyClass, SamplerAddressMode, SamplerDesc, SamplerMinMagFilter,
    SamplerMipFilter, StencilDesc, StencilOperation, VertexFormat, VertexStepFunction,
};

#[must_use]
pub fn compare_function(func: CompareFunction) -> wgpu::CompareFunction {
    match func {
        CompareFunction::Never => wgpu::CompareFunction::Never,
        CompareFunction::Less => wgpu::CompareFunction::Less,
        CompareFunction::Equal => wgpu::CompareFunction::Equal,
        CompareFunction::LessEqual => wgpu::CompareFunction::LessEqual,
        CompareFunction::Greater => wgpu::CompareFunction::Greater,
        CompareFunction::NotEqual => wgpu::CompareFunction::NotEqual,
        CompareFunction::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
        CompareFunction::Always => wgpu::CompareFunction::Always,
    }
}

#[must_use]
pub fn stencil_operation(op: StencilOperation) -> wgpu::StencilOperation {
    match op {
        StencilOperation::Keep => wgpu::StencilOperation::Keep,
        StencilOperation::Zero => wgpu::StencilOperation::Zero,
        StencilOperation::Replace => wgpu::StencilOperation::Replace,
        StencilOperation::IncrementClamp => wgpu::StencilOperation::IncrementClamp,
        StencilOperation::DecrementClamp => wgpu::StencilOperation::DecrementClamp,
        StencilOperation::Invert => wgpu::StencilOperation::Invert,
        StencilOperation::IncrementWrap => wgpu::StencilOperation::IncrementWrap,
        StencilOperation::DecrementWrap => wgpu::StencilOperation::DecrementWrap,
    }
}

#[must_use]
pub fn stencil_face(face: &StencilDesc) -> wgpu::StencilFaceState {
    wgpu::StencilFaceState {
        compare: compare_function(face.stencil_compare_function()),
        fail_op: stencil_operation(face.stencil_failure_operation()),
        depth_fail_op: stencil_operation(face.depth_failure_operation()),
        pass_op: stencil_operation(face.depth_stencil_pass_operation()),
    }
}

/// wgpu has a single mask pair shared by both faces; faces with different
/// masks are rejected.
pub fn stencil_state(desc: &DepthStencilDesc) -> Result<wgpu::StencilState> {
    let front = &desc.front_face_stencil;
    let back = &desc.back_face_stencil;
    if front.read_mask != back.read_mask || front.write_mask != back.write_mask {
        return Err(KilnError::Unsupported(format!(
            "per-face stencil masks (front {:#04x}/{:#04x}, back {:#04x}/{:#04x})",
            front.read_mask, front.write_mask, back.read_mask, back.write_mask
        )));
    }
    Ok(wgpu::StencilState {
        front: stencil_face(front),
        back: stencil_face(back),
        read_mask: u32::from(front.read_mask),
        write_mask: u32::from(front.write_mask),
    })
}

// ─── Sampling ────────────────────────────────────────────────────────────────

pub fn address_mode(mode: SamplerAddressMode) -> Result<wgpu::AddressMode> {
    match mode {
        SamplerAddressMode::ClampToEdge => Ok(wgpu::AddressMode::ClampToEdge),
        SamplerAddressMode::Repeat => Ok(wgpu::AddressMode::Repeat),
        SamplerAddressMode::MirrorRepeat => Ok(wgpu::AddressMode::MirrorRepeat),
        SamplerAddressMode::ClampToZero | SamplerAddressMode::ClampToBorderColor => {
            Ok(wgpu::AddressMode::ClampToBorder)
        }
        SamplerAddressMode::MirrorClampToEdge => Err(KilnError::Unsupported(format!(
            "sampler address mode {mode:?}"
        ))),
    }
}

/// Border color implied by the clamp-to-border address modes, if any.
#[must_use]
pub fn border_color(desc: &SamplerDesc) -> Option<wgpu::SamplerBorderColor> {
    let modes = [
        desc.s_address_mode(),
        desc.t_address_mode(),
        desc.r_address_mode(),
    ];
    if modes.contains(&SamplerAddressMode::ClampToZero) {
        Some(wgpu::SamplerBorderColor::Zero)
    } else if modes.contains(&SamplerAddressMode::ClampToBorderColor) {
        Some(wgpu::SamplerBorderColor::TransparentBlack)
    } else {
        None
    }
}

#[must_use]
pub fn filter_mode(filter: SamplerMinMagFilter) -> wgpu::FilterMode {
    match filter {
        SamplerMinMagFilter::Nearest => wgpu::FilterMode::Nearest,
        SamplerMinMagFilter::Linear => wgpu::FilterMode::Linear,
    }
}

/// Mipmap filter and the LOD clamp that goes with it. Unmipmapped sampling
/// pins the LOD to the base level.
#[must_use]
pub fn mipmap_filter(filter: SamplerMipFilter) -> (wgpu::MipmapFilterMode, f32) {
    match filter {
        SamplerMipFilter::NotMipmapped => (wgpu::MipmapFilterMode::Nearest, 0.0),
        SamplerMipFilter::Nearest => (wgpu::MipmapFilterMode::Nearest, 32.0),
        SamplerMipFilter::Linear => (wgpu::MipmapFilterMode::Linear, 32.0),
    }
}

/// wgpu only accepts anisotropy above 1 when every filter is linear.
#[must_use]
pub fn anisotropy_clamp(desc: &SamplerDesc) -> u16 {
    let all_linear = desc.min_filter() == SamplerMinMagFilter::Linear
        && desc.mag_filter() == SamplerMinMagFilter::Linear
        && desc.mip_filter() == SamplerMipFilter::Linear;
    if all_linear {
        u16::from(desc.max_anisotropy().max(1))
    } else {
        1
    }
}

/// `Never` marks a regular, non-comparison sampler.
#[must_use]
pub fn sampler_compare(func: CompareFunction) -> Option<wgpu::CompareFunction> {
    (func != CompareFunction::Never).then(|| compare_function(func))
}

// ─── Blending ────────────────────────────────────────────────────────────────

pub fn blend_factor(factor: BlendFactor) -> Result<wgpu::BlendFactor> {
    Ok(match factor {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SourceColor => wgpu::BlendFactor::Src,
        BlendFactor::OneMinusSourceColor => wgpu::BlendFactor::OneMinusSrc,
        BlendFactor::SourceAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSourceAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
        BlendFactor::DestinationColor => wgpu::BlendFactor::Dst,
        BlendFactor::OneMinusDestinationColor => wgpu::BlendFactor::OneMinusDst,
        BlendFactor::DestinationAlpha => wgpu::BlendFactor::DstAlpha,
        BlendFactor::OneMinusDestinationAlpha => wgpu::BlendFactor::OneMinusDstAlpha,
        BlendFactor::SourceAlphaSaturated => wgpu::BlendFactor::SrcAlphaSaturated,
        BlendFactor::BlendColor => wgpu::BlendFactor::Constant,
        BlendFactor::OneMinusBlendColor => wgpu::BlendFactor::OneMinusConstant,
        BlendFactor::Source1Color => wgpu::BlendFactor::Src1,
        BlendFactor::OneMinusSource1Color => wgpu::BlendFactor::OneMinusSrc1,
        BlendFactor::Source1Alpha => wgpu::BlendFactor::Src1Alpha,
        BlendFactor::OneMinusSource1Alpha => wgpu::BlendFactor::OneMinusSrc1Alpha,
        BlendFactor::BlendAlpha | BlendFactor::OneMinusBlendAlpha => {
            return Err(KilnError::Unsupported(format!("blend factor {factor:?}")));
        }
    })
}

#[must_use]
pub fn blend_operation(op: BlendOperation) -> wgpu::BlendOperation {
    match op {
        BlendOperation::Add => wgpu::BlendOperation::Add,
        BlendOperation::Subtract => wgpu::BlendOperation::Subtract,
        BlendOperation::ReverseSubtract => wgpu::BlendOperation::ReverseSubtract,
        BlendOperation::Min => wgpu::BlendOperation::Min,
        BlendOperation::Max => wgpu::BlendOperation::Max,
    }
}

/// `None` when blending is disabled.
pub fn blend_state(desc: &BlendDesc) -> Result<Option<wgpu::BlendState>> {
    if !desc.blending_enabled() {
        return Ok(None);
    }
    Ok(Some(wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: blend_factor(desc.source_rgb_blend_factor())?,
            dst_factor: blend_factor(desc.destination_rgb_blend_factor())?,
            operation: blend_operation(desc.rgb_blend_operation()),
        },
        alpha: wgpu::BlendComponent {
            src_factor: blend_factor(desc.source_alpha_blend_factor())?,
            dst_factor: blend_factor(desc.destination_alpha_blend_factor())?,
            operation: blend_operation(desc.alpha_blend_operation()),
        },
    }))
}

#[must_use]
pub fn color_writes(mask: ColorWriteMask) -> wgpu::ColorWrites {
    let mut writes = wgpu::ColorWrites::empty();
    writes.set(wgpu::ColorWrites::RED, mask.contains(ColorWriteMask::RED));
    writes.set(wgpu::ColorWrites::GREEN, mask.contains(ColorWriteMask::GREEN));
    writes.set(wgpu::ColorWrites::BLUE, mask.contains(ColorWriteMask::BLUE));
    writes.set(wgpu::ColorWrites::ALPHA, mask.contains(ColorWriteMask::ALPHA));
    writes
}

// ─── Vertex Input ────────────────────────────────────────────────────────────

/// wgpu has no 3-component 8- or 16-bit formats; those and the
/// single-component small formats are rejected.
pub fn vertex_format(format: VertexFormat) -> Result<wgpu::VertexFormat> {
    Ok(match format {
        VertexFormat::UChar2 => wgpu::VertexFormat::Uint8x2,
        VertexFormat::UChar4 => wgpu::VertexFormat::Uint8x4,
        VertexFormat::Char2 => wgpu::VertexFormat::Sint8x2,
        VertexFormat::Char4 => wgpu::VertexFormat::Sint8x4,
        VertexFormat::UChar2Normalized => wgpu::VertexFormat::Unorm8x2,
        VertexFormat::UChar4Normalized => wgpu::VertexFormat::Unorm8x4,
        VertexFormat::Char2Normalized => wgpu::VertexFormat::Snorm8x2,
        VertexFormat::Char4Normalized => wgpu::VertexFormat::Snorm8x4,
        VertexFormat::UShort2 => wgpu::VertexFormat::Uint16x2,
        VertexFormat::UShort4 => wgpu::VertexFormat::Uint16x4,
        VertexFormat::Short2 => wgpu::VertexFormat::Sint16x2,
        VertexFormat::Short4 => wgpu::VertexFormat::Sint16x4,
        VertexFormat::UShort2Normalized => wgpu::VertexFormat::Unorm16x2,
        VertexFormat::UShort4Normalized => wgpu::VertexFormat::Unorm16x4,
        VertexFormat::Short2Normalized => wgpu::VertexFormat::Snorm16x2,
        VertexFormat::Short4Normalized => wgpu::VertexFormat::Snorm16x4,
        VertexFormat::Half2 => wgpu::VertexFormat::Float16x2,
        VertexFormat::Half4 => wgpu::VertexFormat::Float16x4,
        VertexFormat::Float => wgpu::VertexFormat::Float32,
        VertexFormat::Float2 => wgpu::VertexFormat::Float32x2,
        VertexFormat::Float3 => wgpu::VertexFormat::Float32x3,
        VertexFormat::Float4 => wgpu::VertexFormat::Float32x4,
        VertexFormat::Int => wgpu::VertexFormat::Sint32,
        VertexFormat::Int2 => wgpu::VertexFormat::Sint32x2,
        VertexFormat::Int3 => wgpu::VertexFormat::Sint32x3,
        VertexFormat::Int4 => wgpu::VertexFormat::Sint32x4,
        VertexFormat::UInt => wgpu::VertexFormat::Uint32,
        VertexFormat::UInt2 => wgpu::VertexFormat::Uint32x2,
        VertexFormat::UInt3 => wgpu::VertexFormat::Uint32x3,
        VertexFormat::UInt4 => wgpu::VertexFormat::Uint32x4,
        VertexFormat::UInt1010102Normalized => wgpu::VertexFormat::Unorm10_10_10_2,
        other => {
            return Err(KilnError::Unsupported(format!("vertex format {other:?}")));
        }
    })
}

/// Constant buffers become instance-stepped buffers with a zero stride.
/// wgpu cannot advance an instance buffer less often than every instance.
pub fn step_mode(function: VertexStepFunction, step_rate: u32) -> Result<wgpu::VertexStepMode> {
    match function {
        VertexStepFunction::PerVertex => Ok(wgpu::VertexStepMode::Vertex),
        VertexStepFunction::Constant => Ok(wgpu::VertexStepMode::Instance),
        VertexStepFunction::PerInstance if step_rate <= 1 => Ok(wgpu::VertexStepMode::Instance),
        VertexStepFunction::PerInstance => Err(KilnError::Unsupported(format!(
            "instance step rate {step_rate}"
        ))),
    }
}

#[must_use]
pub fn primitive_topology(class: PrimitiveTopologyClass) -> wgpu::PrimitiveTopology {
    match class {
        PrimitiveTopologyClass::Point => wgpu::PrimitiveTopology::PointList,
        PrimitiveTopologyClass::Line => wgpu::PrimitiveTopology::LineList,
        PrimitiveTopologyClass::Triangle | PrimitiveTopologyClass::Unspecified => {
            wgpu::PrimitiveTopology::TriangleList
        }
    }
}

// ─── Pixel Formats ───────────────────────────────────────────────────────────

pub fn texture_format(format: PixelFormat) -> Result<wgpu::TextureFormat> {
    use wgpu::TextureFormat as T;

    Ok(match format {
        PixelFormat::R8_UNORM => T::R8Unorm,
        PixelFormat::R8_SNORM => T::R8Snorm,
        PixelFormat::R8_UINT => T::R8Uint,
        PixelFormat::R8_SINT => T::R8Sint,
        PixelFormat::R16_UNORM => T::R16Unorm,
        PixelFormat::R16_SNORM => T::R16Snorm,
        PixelFormat::R16_UINT => T::R16Uint,
        PixelFormat::R16_SINT => T::R16Sint,
        PixelFormat::R16_FLOAT => T::R16Float,
        PixelFormat::RG8_UNORM => T::Rg8Unorm,
        PixelFormat::RG8_SNORM => T::Rg8Snorm,
        PixelFormat::RG8_UINT => T::Rg8Uint,
        PixelFormat::RG8_SINT => T::Rg8Sint,
        PixelFormat::R32_UINT => T::R32Uint,
        PixelFormat::R32_SINT => T::R32Sint,
        PixelFormat::R32_FLOAT => T::R32Float,
        PixelFormat::RG16_UNORM => T::Rg16Unorm,
        PixelFormat::RG16_SNORM => T::Rg16Snorm,
        PixelFormat::RG16_UINT => T::Rg16Uint,
        PixelFormat::RG16_SINT => T::Rg16Sint,
        PixelFormat::RG16_FLOAT => T::Rg16Float,
        PixelFormat::RGBA8_UNORM => T::Rgba8Unorm,
        PixelFormat::RGBA8_UNORM_SRGB => T::Rgba8UnormSrgb,
        PixelFormat::RGBA8_SNORM => T::Rgba8Snorm,
        PixelFormat::RGBA8_UINT => T::Rgba8Uint,
        PixelFormat::RGBA8_SINT => T::Rgba8Sint,
        PixelFormat::BGRA8_UNORM => T::Bgra8Unorm,
        PixelFormat::BGRA8_UNORM_SRGB => T::Bgra8UnormSrgb,
        PixelFormat::RGB10A2_UNORM => T::Rgb10a2Unorm,
        PixelFormat::RGB10A2_UINT => T::Rgb10a2Uint,
        PixelFormat::RG11B10_FLOAT => T::Rg11b10Ufloat,
        PixelFormat::RGB9E5_FLOAT => T::Rgb9e5Ufloat,
        PixelFormat::RG32_UINT => T::Rg32Uint,
        PixelFormat::RG32_SINT => T::Rg32Sint,
        PixelFormat::RG32_FLOAT => T::Rg32Float,
        PixelFormat::RGBA16_UNORM => T::Rgba16Unorm,
        PixelFormat::RGBA16_SNORM => T::Rgba16Snorm,
        PixelFormat::RGBA16_UINT => T::Rgba16Uint,
        PixelFormat::RGBA16_SINT => T::Rgba16Sint,
        PixelFormat::RGBA16_FLOAT => T::Rgba16Float,
        PixelFormat::RGBA32_UINT => T::Rgba32Uint,
        PixelFormat::RGBA32_SINT => T::Rgba32Sint,
        PixelFormat::RGBA32_FLOAT => T::Rgba32Float,
        PixelFormat::DEPTH16_UNORM => T::Depth16Unorm,
        PixelFormat::DEPTH32_FLOAT => T::Depth32Float,
        PixelFormat::STENCIL8 => T::Stencil8,
        PixelFormat::DEPTH24_UNORM_STENCIL8 => T::Depth24PlusStencil8,
        PixelFormat::DEPTH32_FLOAT_STENCIL8 => T::Depth32FloatStencil8,
        other => {
            return Err(KilnError::Unsupported(format!("pixel format {}", other.0)));
        }
    })
}
