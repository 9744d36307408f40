//! Shader specialization hook.
//!
//! Pipeline caches can be given a factory that swaps the generic shader for a
//! variant specialized on the pipeline descriptor (for example a vertex shader
//! that pushes every vertex outside the clip volume to emulate rasterizer
//! discard). The factory is only consulted when a state object is compiled,
//! never on a cache hit.

use crate::device::PipelineDevice;
use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

/// Produces shader variants specialized for a descriptor of type `K`.
pub trait SpecializeShaderFactory<D: PipelineDevice, K> {
    /// Whether `key` needs a specialized variant for `stage`. When this
    /// returns `false` the cache falls back to its generic shader.
    fn has_specialized_shader(&self, stage: ShaderStage, key: &K) -> bool;

    fn get_specialized_shader(
        &mut self,
        device: &D,
        stage: ShaderStage,
        key: &K,
    ) -> Result<D::ShaderFunction>;
}
