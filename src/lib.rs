//! Kiln: value-typed GPU state descriptors and at-most-once state object
//! caches.
//!
//! - [`desc`]: packed, hashable descriptors and the GL-style state they are
//!   built from.
//! - [`cache`]: the depth/stencil, sampler, render pipeline and compute
//!   pipeline caches, generic over a compiling device.
//! - `wgpu` (feature `wgpu`): a device implementation on top of wgpu.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use kiln_cache as cache;
pub use kiln_desc as desc;
#[cfg(feature = "wgpu")]
pub use kiln_wgpu as wgpu;

pub use kiln_cache::{
    KilnError, PipelineDevice, ProvokingVertexComputePipelineCache, RenderPipelineCache, Result,
    ShaderStage, SpecializeShaderFactory, StateCache, StateCacheSettings, StateDevice,
};
pub use kiln_desc::{
    BlendDesc, DepthStencilDesc, ProvokingVertexComputePipelineDesc, RenderPassDesc,
    RenderPipelineDesc, RenderPipelineOutputDesc, SamplerDesc, VertexDesc,
};
