//! Compute pipelines for provoking-vertex index rewriting.
//!
//! Every variant of the rewrite pass (primitive mode, index type, restart,
//! index generation) is a specialization of one compute shader. The factory
//! decides per descriptor whether a specialized function replaces the
//! generic one.

use log::{debug, warn};
use rustc_hash::FxHashMap;

use kiln_desc::ProvokingVertexComputePipelineDesc;

use crate::device::PipelineDevice;
use crate::errors::{KilnError, Result};
use crate::specialize::{ShaderStage, SpecializeShaderFactory};

type ComputeFactory<D> = Box<dyn SpecializeShaderFactory<D, ProvokingVertexComputePipelineDesc>>;

pub struct ProvokingVertexComputePipelineCache<D: PipelineDevice> {
    compute_shader: Option<D::ShaderFunction>,
    specialized_shader_factory: Option<ComputeFactory<D>>,
    pipelines: FxHashMap<ProvokingVertexComputePipelineDesc, D::ComputePipelineState>,
}

impl<D: PipelineDevice> Default for ProvokingVertexComputePipelineCache<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: PipelineDevice> ProvokingVertexComputePipelineCache<D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            compute_shader: None,
            specialized_shader_factory: None,
            pipelines: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_specialized_shader_factory(mut self, factory: ComputeFactory<D>) -> Self {
        self.specialized_shader_factory = Some(factory);
        self
    }

    #[inline]
    #[must_use]
    pub fn compute_shader(&self) -> Option<&D::ShaderFunction> {
        self.compute_shader.as_ref()
    }

    /// Binds the generic compute shader. `None` drops every cached pipeline;
    /// otherwise all known descriptors are recompiled right away.
    pub fn set_compute_shader(&mut self, device: &D, shader: Option<D::ShaderFunction>) {
        let unbound = shader.is_none();
        self.compute_shader = shader;
        if unbound {
            debug!("Compute shader unbound, dropping {} pipelines", self.pipelines.len());
            self.pipelines.clear();
            return;
        }

        debug!("Compute shader changed, recompiling {} pipelines", self.pipelines.len());
        let stale = std::mem::take(&mut self.pipelines);
        for desc in stale.into_keys() {
            match self.create_compute_pipeline_state(device, &desc) {
                Ok(state) => {
                    self.pipelines.insert(desc, state);
                }
                Err(err) => warn!(
                    "Dropping compute pipeline {:#018x} after shader change: {err}",
                    desc.hash_value()
                ),
            }
        }
    }

    pub fn get_compute_pipeline_state(
        &mut self,
        device: &D,
        desc: &ProvokingVertexComputePipelineDesc,
    ) -> Result<D::ComputePipelineState> {
        if let Some(state) = self.pipelines.get(desc) {
            return Ok(state.clone());
        }

        let state = self.create_compute_pipeline_state(device, desc)?;
        debug!("Compiled compute pipeline {desc:?}");
        self.pipelines.insert(*desc, state.clone());
        Ok(state)
    }

    /// Drops every cached pipeline and unbinds the compute shader.
    pub fn clear(&mut self) {
        self.compute_shader = None;
        self.pipelines.clear();
    }

    #[inline]
    #[must_use]
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    fn create_compute_pipeline_state(
        &mut self,
        device: &D,
        desc: &ProvokingVertexComputePipelineDesc,
    ) -> Result<D::ComputePipelineState> {
        let specialized = match self.specialized_shader_factory.as_mut() {
            Some(factory) if factory.has_specialized_shader(ShaderStage::Compute, desc) => {
                Some(factory.get_specialized_shader(device, ShaderStage::Compute, desc)?)
            }
            _ => None,
        };

        let function = specialized
            .or_else(|| self.compute_shader.clone())
            .ok_or(KilnError::MissingComputeShader)?;
        device.compile_compute_pipeline_state(&function, desc)
    }
}
