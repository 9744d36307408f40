//! Render pipeline state cache for one vertex/fragment shader pair.
//!
//! Pipelines whose vertex layout reads emulated default attributes need an
//! extra buffer slot declared at compile time, so they live in their own
//! table. Replacing either shader recompiles every known descriptor against
//! the new pair; descriptors that no longer compile are dropped.

use log::{debug, warn};
use rustc_hash::FxHashMap;

use kiln_desc::RenderPipelineDesc;

use crate::device::{DefaultAttribLayout, PipelineDevice};
use crate::errors::{KilnError, Result};
use crate::specialize::{ShaderStage, SpecializeShaderFactory};

type PipelineTable<D> = FxHashMap<RenderPipelineDesc, <D as PipelineDevice>::RenderPipelineState>;

pub struct RenderPipelineCache<D: PipelineDevice> {
    vertex_shader: Option<D::ShaderFunction>,
    fragment_shader: Option<D::ShaderFunction>,

    specialized_shader_factory: Option<Box<dyn SpecializeShaderFactory<D, RenderPipelineDesc>>>,

    pipelines: PipelineTable<D>,
    default_attrib_pipelines: PipelineTable<D>,
}

impl<D: PipelineDevice> Default for RenderPipelineCache<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: PipelineDevice> RenderPipelineCache<D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertex_shader: None,
            fragment_shader: None,
            specialized_shader_factory: None,
            pipelines: FxHashMap::default(),
            default_attrib_pipelines: FxHashMap::default(),
        }
    }

    /// Lets `factory` substitute specialized vertex and fragment shaders.
    #[must_use]
    pub fn with_specialized_shader_factory(
        mut self,
        factory: Box<dyn SpecializeShaderFactory<D, RenderPipelineDesc>>,
    ) -> Self {
        self.specialized_shader_factory = Some(factory);
        self
    }

    #[inline]
    #[must_use]
    pub fn vertex_shader(&self) -> Option<&D::ShaderFunction> {
        self.vertex_shader.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn fragment_shader(&self) -> Option<&D::ShaderFunction> {
        self.fragment_shader.as_ref()
    }

    /// Binds a new vertex shader. `None` drops every cached pipeline;
    /// otherwise all known descriptors are recompiled right away.
    pub fn set_vertex_shader(&mut self, device: &D, shader: Option<D::ShaderFunction>) {
        let unbound = shader.is_none();
        self.vertex_shader = shader;
        self.on_shader_changed(device, unbound);
    }

    /// Binds a new fragment shader, with the same invalidation as
    /// [`Self::set_vertex_shader`].
    pub fn set_fragment_shader(&mut self, device: &D, shader: Option<D::ShaderFunction>) {
        let unbound = shader.is_none();
        self.fragment_shader = shader;
        self.on_shader_changed(device, unbound);
    }

    pub fn get_render_pipeline_state(
        &mut self,
        device: &D,
        desc: &RenderPipelineDesc,
    ) -> Result<D::RenderPipelineState> {
        let default_attribs = desc.has_default_attribs();
        if let Some(state) = self.table(default_attribs).get(desc) {
            return Ok(state.clone());
        }

        let state = self.create_render_pipeline_state(device, desc, default_attribs)?;
        debug!(
            "Compiled render pipeline {:#018x} (default attribs: {default_attribs})",
            desc.hash_value()
        );
        self.table_mut(default_attribs).insert(*desc, state.clone());
        Ok(state)
    }

    /// Drops every cached pipeline and unbinds both shaders.
    pub fn clear(&mut self) {
        self.vertex_shader = None;
        self.fragment_shader = None;
        self.clear_pipeline_states();
    }

    #[must_use]
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len() + self.default_attrib_pipelines.len()
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn table(&self, default_attribs: bool) -> &PipelineTable<D> {
        if default_attribs {
            &self.default_attrib_pipelines
        } else {
            &self.pipelines
        }
    }

    fn table_mut(&mut self, default_attribs: bool) -> &mut PipelineTable<D> {
        if default_attribs {
            &mut self.default_attrib_pipelines
        } else {
            &mut self.pipelines
        }
    }

    fn clear_pipeline_states(&mut self) {
        self.pipelines.clear();
        self.default_attrib_pipelines.clear();
    }

    fn on_shader_changed(&mut self, device: &D, unbound: bool) {
        if unbound {
            debug!("Shader unbound, dropping {} render pipelines", self.pipeline_count());
            self.clear_pipeline_states();
        } else {
            self.recreate_pipeline_states(device);
        }
    }

    fn recreate_pipeline_states(&mut self, device: &D) {
        debug!("Shader changed, recompiling {} render pipelines", self.pipeline_count());
        for default_attribs in [false, true] {
            let stale = std::mem::take(self.table_mut(default_attribs));
            for desc in stale.into_keys() {
                match self.create_render_pipeline_state(device, &desc, default_attribs) {
                    Ok(state) => {
                        self.table_mut(default_attribs).insert(desc, state);
                    }
                    Err(err) => {
                        warn!(
                            "Dropping render pipeline {:#018x} after shader change: {err}",
                            desc.hash_value()
                        );
                    }
                }
            }
        }
    }

    fn create_render_pipeline_state(
        &mut self,
        device: &D,
        desc: &RenderPipelineDesc,
        default_attribs: bool,
    ) -> Result<D::RenderPipelineState> {
        let mut desc = *desc;
        if desc.output_descriptor.sample_count == 1 {
            desc.set_alpha_to_coverage_enabled(false);
        }

        let vertex = self
            .select_shader(device, ShaderStage::Vertex, &desc)?
            .ok_or(KilnError::MissingVertexShader)?;
        let fragment = if desc.rasterization_enabled() {
            self.select_shader(device, ShaderStage::Fragment, &desc)?
        } else {
            None
        };
        let default_attrib_layout = default_attribs.then(DefaultAttribLayout::default);

        device.compile_render_pipeline_state(
            &vertex,
            fragment.as_ref(),
            &desc,
            default_attrib_layout.as_ref(),
        )
    }

    fn select_shader(
        &mut self,
        device: &D,
        stage: ShaderStage,
        desc: &RenderPipelineDesc,
    ) -> Result<Option<D::ShaderFunction>> {
        if let Some(factory) = self.specialized_shader_factory.as_mut()
            && factory.has_specialized_shader(stage, desc)
        {
            return factory.get_specialized_shader(device, stage, desc).map(Some);
        }

        Ok(match stage {
            ShaderStage::Vertex => self.vertex_shader.clone(),
            ShaderStage::Fragment => self.fragment_shader.clone(),
            ShaderStage::Compute => None,
        })
    }
}
