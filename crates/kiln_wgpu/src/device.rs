//! [`StateDevice`] and [`PipelineDevice`] on top of `wgpu::Device`.
//!
//! wgpu bakes the depth/stencil test into render pipelines. A compiled
//! [`WgpuRenderPipeline`] holds everything else, validated and converted up
//! front, and builds one `wgpu::RenderPipeline` per depth/stencil state it is
//! drawn with.

use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use kiln_cache::{DefaultAttribLayout, KilnError, PipelineDevice, Result, StateDevice};
use kiln_desc::{
    DEFAULT_ATTRIBS_BINDING_INDEX, DepthStencilDesc, ProvokingVertexComputePipelineDesc,
    RenderPipelineDesc, SamplerDesc, VertexFormat, VertexStepFunction,
};

use crate::convert;

/// A shader module plus the entry point a pipeline stage runs.
#[derive(Debug, Clone)]
pub struct WgpuShaderFunction {
    pub module: wgpu::ShaderModule,
    pub entry_point: String,
}

impl WgpuShaderFunction {
    #[must_use]
    pub fn new(module: wgpu::ShaderModule, entry_point: impl Into<String>) -> Self {
        Self {
            module,
            entry_point: entry_point.into(),
        }
    }
}

/// Depth/stencil test state, converted from the descriptor it was compiled
/// from. Render pipelines are specialized per descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WgpuDepthStencilState {
    desc: DepthStencilDesc,
    depth_write_enabled: bool,
    depth_compare: wgpu::CompareFunction,
    stencil: wgpu::StencilState,
}

impl WgpuDepthStencilState {
    /// Everything passes, nothing is written.
    #[must_use]
    pub fn pass_through() -> Self {
        Self {
            desc: DepthStencilDesc::null(),
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn desc(&self) -> &DepthStencilDesc {
        &self.desc
    }

    #[inline]
    #[must_use]
    pub fn depth_write_enabled(&self) -> bool {
        self.depth_write_enabled
    }

    #[inline]
    #[must_use]
    pub fn depth_compare(&self) -> wgpu::CompareFunction {
        self.depth_compare
    }

    #[inline]
    #[must_use]
    pub fn stencil(&self) -> &wgpu::StencilState {
        &self.stencil
    }

    #[must_use]
    pub fn to_wgpu(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: Some(self.depth_write_enabled),
            depth_compare: Some(self.depth_compare),
            stencil: self.stencil.clone(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

impl TryFrom<&DepthStencilDesc> for WgpuDepthStencilState {
    type Error = KilnError;

    fn try_from(desc: &DepthStencilDesc) -> Result<Self> {
        Ok(Self {
            desc: *desc,
            depth_write_enabled: desc.depth_write_enabled(),
            depth_compare: convert::compare_function(desc.depth_compare_function()),
            stencil: convert::stencil_state(desc)?,
        })
    }
}

/// Compiles Kiln descriptors with a wgpu device.
///
/// Descriptor values wgpu cannot express are rejected with
/// [`KilnError::Unsupported`] before any wgpu call is made.
#[derive(Debug, Clone)]
pub struct WgpuDevice {
    device: wgpu::Device,
}

impl WgpuDevice {
    #[must_use]
    pub fn new(device: wgpu::Device) -> Self {
        Self { device }
    }

    #[inline]
    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }
}

impl StateDevice for WgpuDevice {
    type DepthStencilState = WgpuDepthStencilState;
    type SamplerState = wgpu::Sampler;

    fn compile_depth_stencil_state(&self, desc: &DepthStencilDesc) -> Result<WgpuDepthStencilState> {
        WgpuDepthStencilState::try_from(desc)
    }

    fn compile_sampler_state(&self, desc: &SamplerDesc) -> Result<wgpu::Sampler> {
        let (mipmap_filter, lod_max_clamp) = convert::mipmap_filter(desc.mip_filter());
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Kiln Sampler"),
            address_mode_u: convert::address_mode(desc.s_address_mode())?,
            address_mode_v: convert::address_mode(desc.t_address_mode())?,
            address_mode_w: convert::address_mode(desc.r_address_mode())?,
            mag_filter: convert::filter_mode(desc.mag_filter()),
            min_filter: convert::filter_mode(desc.min_filter()),
            mipmap_filter,
            lod_min_clamp: 0.0,
            lod_max_clamp,
            compare: convert::sampler_compare(desc.compare_function()),
            anisotropy_clamp: convert::anisotropy_clamp(desc),
            border_color: convert::border_color(desc),
        });
        Ok(sampler)
    }
}

type AttributeList = SmallVec<[wgpu::VertexAttribute; 4]>;

/// One vertex buffer slot, already converted.
#[derive(Debug)]
struct VertexSlot {
    array_stride: u64,
    step_mode: wgpu::VertexStepMode,
    attributes: AttributeList,
}

/// Owned pieces of a vertex input state, borrowed by
/// [`wgpu::VertexBufferLayout`] when a pipeline is created.
#[derive(Debug)]
struct VertexBuffers {
    slots: SmallVec<[VertexSlot; 4]>,
}

impl VertexBuffers {
    /// The default-attribute slot lands right after the regular slots,
    /// since wgpu numbers vertex buffers densely from zero.
    fn new(desc: &RenderPipelineDesc, default_attribs: Option<&DefaultAttribLayout>) -> Result<Self> {
        let vertex = &desc.vertex_descriptor;
        let regular_slots = vertex.live_layouts().len();
        let mut slots = SmallVec::<[VertexSlot; 4]>::new();
        for layout in vertex.live_layouts().iter().chain(default_attribs.map(|d| &d.layout)) {
            // Constant slots feed every vertex the same element.
            let array_stride = match layout.step_function {
                VertexStepFunction::Constant => 0,
                _ => u64::from(layout.stride),
            };
            slots.push(VertexSlot {
                array_stride,
                step_mode: convert::step_mode(layout.step_function, layout.step_rate)?,
                attributes: AttributeList::new(),
            });
        }
        let default_slot = default_attribs.map(|_| regular_slots);

        for (location, attrib) in vertex.live_attributes().iter().enumerate() {
            if attrib.format() == VertexFormat::Invalid {
                continue;
            }
            let slot = if attrib.buffer_index() == DEFAULT_ATTRIBS_BINDING_INDEX {
                default_slot.ok_or_else(|| {
                    KilnError::Unsupported("default attribute without its buffer layout".into())
                })?
            } else {
                Some(attrib.buffer_index() as usize)
                    .filter(|&index| index < regular_slots)
                    .ok_or_else(|| {
                        KilnError::Unsupported(format!(
                            "attribute {location} reads undeclared buffer {}",
                            attrib.buffer_index()
                        ))
                    })?
            };
            let target = &mut slots[slot];
            target.attributes.push(wgpu::VertexAttribute {
                format: convert::vertex_format(attrib.format())?,
                offset: u64::from(attrib.offset()),
                shader_location: location as u32,
            });
        }

        Ok(Self { slots })
    }

    fn layouts(&self) -> SmallVec<[wgpu::VertexBufferLayout<'_>; 4]> {
        self.slots
            .iter()
            .map(|slot| wgpu::VertexBufferLayout {
                array_stride: slot.array_stride,
                step_mode: slot.step_mode,
                attributes: &slot.attributes,
            })
            .collect()
    }
}

type ColorTargets = SmallVec<[Option<wgpu::ColorTargetState>; 8]>;

fn color_targets(desc: &RenderPipelineDesc) -> Result<ColorTargets> {
    desc.output_descriptor
        .live_color_attachments()
        .iter()
        .map(|attachment| {
            if !attachment.pixel_format.is_valid() {
                return Ok(None);
            }
            Ok(Some(wgpu::ColorTargetState {
                format: convert::texture_format(attachment.pixel_format)?,
                blend: convert::blend_state(&attachment.blend)?,
                write_mask: convert::color_writes(attachment.blend.write_mask()),
            }))
        })
        .collect()
}

/// Format of the depth/stencil attachment, if the pipeline has one.
fn depth_stencil_format(desc: &RenderPipelineDesc) -> Result<Option<wgpu::TextureFormat>> {
    let output = &desc.output_descriptor;
    let format = if output.depth_attachment_pixel_format.is_valid() {
        output.depth_attachment_pixel_format
    } else {
        output.stencil_attachment_pixel_format
    };
    if !format.is_valid() {
        return Ok(None);
    }
    convert::texture_format(format).map(Some)
}

/// Depth/stencil state baked into a pipeline variant. Without an explicit
/// state the test passes everything.
fn depth_stencil_target(
    format: Option<wgpu::TextureFormat>,
    state: Option<&WgpuDepthStencilState>,
) -> Option<wgpu::DepthStencilState> {
    let format = format?;
    Some(match state {
        Some(state) => state.to_wgpu(format),
        None => WgpuDepthStencilState::pass_through().to_wgpu(format),
    })
}

#[derive(Debug)]
struct PipelineTemplate {
    device: wgpu::Device,
    vertex: WgpuShaderFunction,
    fragment: Option<WgpuShaderFunction>,
    buffers: VertexBuffers,
    targets: ColorTargets,
    depth_stencil_format: Option<wgpu::TextureFormat>,
    primitive: wgpu::PrimitiveState,
    multisample: wgpu::MultisampleState,
    /// Keyed by the depth/stencil descriptor; `None` for pipelines without a
    /// depth/stencil attachment.
    variants: Mutex<FxHashMap<Option<DepthStencilDesc>, wgpu::RenderPipeline>>,
}

/// Render pipeline state: a validated pipeline template plus the
/// `wgpu::RenderPipeline` built for each depth/stencil state used with it.
///
/// Clones share the template and its variants.
#[derive(Debug, Clone)]
pub struct WgpuRenderPipeline {
    template: Arc<PipelineTemplate>,
}

impl WgpuRenderPipeline {
    /// The wgpu pipeline testing with `depth_stencil`, built on first use.
    /// `None` passes every fragment; pipelines without a depth/stencil
    /// attachment ignore the state.
    #[must_use]
    pub fn pipeline(&self, depth_stencil: Option<&WgpuDepthStencilState>) -> wgpu::RenderPipeline {
        let template = &self.template;
        let state = template.depth_stencil_format.and(depth_stencil);
        let key = template
            .depth_stencil_format
            .map(|_| state.map_or_else(DepthStencilDesc::null, |state| *state.desc()));

        let mut variants = template.variants.lock();
        if let Some(pipeline) = variants.get(&key) {
            return pipeline.clone();
        }

        let pipeline = template.build(state);
        variants.insert(key, pipeline.clone());
        pipeline
    }

    /// Number of wgpu pipelines built so far.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.template.variants.lock().len()
    }
}

impl PipelineTemplate {
    fn build(&self, depth_stencil: Option<&WgpuDepthStencilState>) -> wgpu::RenderPipeline {
        let vertex_buffers = self.buffers.layouts();
        debug!(
            "Creating wgpu render pipeline: {} buffers, {} targets, vs={}",
            vertex_buffers.len(),
            self.targets.len(),
            self.vertex.entry_point
        );

        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Kiln Render Pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &self.vertex.module,
                entry_point: Some(self.vertex.entry_point.as_str()),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: self.fragment.as_ref().map(|fragment| wgpu::FragmentState {
                module: &fragment.module,
                entry_point: Some(fragment.entry_point.as_str()),
                targets: &self.targets,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: self.primitive,
            depth_stencil: depth_stencil_target(self.depth_stencil_format, depth_stencil),
            multisample: self.multisample,
            multiview_mask: None,
            cache: None,
        })
    }
}

impl PipelineDevice for WgpuDevice {
    type ShaderFunction = WgpuShaderFunction;
    type RenderPipelineState = WgpuRenderPipeline;
    type ComputePipelineState = wgpu::ComputePipeline;

    fn compile_render_pipeline_state(
        &self,
        vertex: &WgpuShaderFunction,
        fragment: Option<&WgpuShaderFunction>,
        desc: &RenderPipelineDesc,
        default_attribs: Option<&DefaultAttribLayout>,
    ) -> Result<WgpuRenderPipeline> {
        let template = PipelineTemplate {
            device: self.device.clone(),
            vertex: vertex.clone(),
            fragment: fragment.cloned(),
            buffers: VertexBuffers::new(desc, default_attribs)?,
            targets: color_targets(desc)?,
            depth_stencil_format: depth_stencil_format(desc)?,
            primitive: wgpu::PrimitiveState {
                topology: convert::primitive_topology(desc.input_primitive_topology()),
                ..Default::default()
            },
            multisample: wgpu::MultisampleState {
                count: u32::from(desc.output_descriptor.sample_count.max(1)),
                mask: !0,
                alpha_to_coverage_enabled: desc.alpha_to_coverage_enabled(),
            },
            variants: Mutex::new(FxHashMap::default()),
        };
        Ok(WgpuRenderPipeline {
            template: Arc::new(template),
        })
    }

    fn compile_compute_pipeline_state(
        &self,
        function: &WgpuShaderFunction,
        desc: &ProvokingVertexComputePipelineDesc,
    ) -> Result<wgpu::ComputePipeline> {
        debug!("Creating wgpu compute pipeline for {desc:?}");
        let pipeline = self.device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Kiln Provoking Vertex Pipeline"),
            layout: None,
            module: &function.module,
            entry_point: Some(function.entry_point.as_str()),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });
        Ok(pipeline)
    }
}
