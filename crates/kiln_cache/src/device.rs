//! Device capabilities the caches compile through.
//!
//! A device turns one descriptor into one driver-owned state object. The
//! caches never inspect the returned handles; they only clone them out, so a
//! handle is typically a reference-counted wrapper around the driver object.

use kiln_desc::{
    DEFAULT_ATTRIBS_BINDING_INDEX, DEFAULT_ATTRIBUTE_SIZE, DepthStencilDesc,
    ProvokingVertexComputePipelineDesc, RenderPipelineDesc, SamplerDesc, VertexBufferLayoutDesc,
    VertexStepFunction,
};

use crate::errors::Result;

/// Compiles fixed-function state objects.
pub trait StateDevice {
    type DepthStencilState: Clone;
    type SamplerState: Clone;

    fn compile_depth_stencil_state(
        &self,
        desc: &DepthStencilDesc,
    ) -> Result<Self::DepthStencilState>;

    fn compile_sampler_state(&self, desc: &SamplerDesc) -> Result<Self::SamplerState>;
}

/// Compiles render and compute pipeline state objects.
pub trait PipelineDevice {
    type ShaderFunction: Clone;
    type RenderPipelineState: Clone;
    type ComputePipelineState: Clone;

    /// `fragment` is `None` when the pipeline does not rasterize.
    /// `default_attribs` is set when the vertex layout reads emulated default
    /// attributes and the extra buffer slot must be declared.
    fn compile_render_pipeline_state(
        &self,
        vertex: &Self::ShaderFunction,
        fragment: Option<&Self::ShaderFunction>,
        desc: &RenderPipelineDesc,
        default_attribs: Option<&DefaultAttribLayout>,
    ) -> Result<Self::RenderPipelineState>;

    fn compile_compute_pipeline_state(
        &self,
        function: &Self::ShaderFunction,
        desc: &ProvokingVertexComputePipelineDesc,
    ) -> Result<Self::ComputePipelineState>;
}

/// Buffer layout of the emulated default-attribute slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultAttribLayout {
    pub binding_index: u32,
    pub layout: VertexBufferLayoutDesc,
}

impl Default for DefaultAttribLayout {
    /// Every vertex reads the same `vec4<f32>`.
    fn default() -> Self {
        Self {
            binding_index: DEFAULT_ATTRIBS_BINDING_INDEX,
            layout: VertexBufferLayoutDesc {
                step_rate: 0,
                stride: DEFAULT_ATTRIBUTE_SIZE,
                step_function: VertexStepFunction::Constant,
            },
        }
    }
}
