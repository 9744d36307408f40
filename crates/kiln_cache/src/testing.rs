//! Counting device used by the unit tests.

use std::cell::Cell;

use kiln_desc::{DepthStencilDesc, ProvokingVertexComputePipelineDesc, RenderPipelineDesc, SamplerDesc};

use crate::device::{DefaultAttribLayout, PipelineDevice, StateDevice};
use crate::errors::{KilnError, Result, StateKind};

/// Snapshot of what a render pipeline was compiled from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PipelineHandle {
    pub serial: usize,
    pub vertex: &'static str,
    pub fragment: Option<&'static str>,
    pub alpha_to_coverage: bool,
    pub default_attribs: Option<DefaultAttribLayout>,
}

/// Hands out a fresh serial for every compilation. Compilation fails for
/// `rejected_shader` and, while `reject_states` is set, for every
/// depth/stencil and sampler state.
#[derive(Default)]
pub(crate) struct CountingDevice {
    pub compiles: Cell<usize>,
    pub rejected_shader: Cell<Option<&'static str>>,
    pub reject_states: Cell<bool>,
}

impl CountingDevice {
    fn next_serial(&self) -> usize {
        let serial = self.compiles.get() + 1;
        self.compiles.set(serial);
        serial
    }

    fn check_state(&self, kind: StateKind) -> Result<()> {
        if self.reject_states.get() {
            return Err(KilnError::compile_failed(kind, "rejected"));
        }
        Ok(())
    }

    fn check_shader(&self, shader: &'static str, kind: StateKind) -> Result<()> {
        if self.rejected_shader.get() == Some(shader) {
            return Err(KilnError::compile_failed(kind, format!("{shader} rejected")));
        }
        Ok(())
    }
}

impl StateDevice for CountingDevice {
    type DepthStencilState = usize;
    type SamplerState = usize;

    fn compile_depth_stencil_state(&self, _desc: &DepthStencilDesc) -> Result<usize> {
        self.check_state(StateKind::DepthStencil)?;
        Ok(self.next_serial())
    }

    fn compile_sampler_state(&self, _desc: &SamplerDesc) -> Result<usize> {
        self.check_state(StateKind::Sampler)?;
        Ok(self.next_serial())
    }
}

impl PipelineDevice for CountingDevice {
    type ShaderFunction = &'static str;
    type RenderPipelineState = PipelineHandle;
    type ComputePipelineState = (usize, &'static str);

    fn compile_render_pipeline_state(
        &self,
        vertex: &&'static str,
        fragment: Option<&&'static str>,
        desc: &RenderPipelineDesc,
        default_attribs: Option<&DefaultAttribLayout>,
    ) -> Result<PipelineHandle> {
        self.check_shader(*vertex, StateKind::RenderPipeline)?;
        if let Some(&fragment) = fragment {
            self.check_shader(fragment, StateKind::RenderPipeline)?;
        }
        Ok(PipelineHandle {
            serial: self.next_serial(),
            vertex: *vertex,
            fragment: fragment.copied(),
            alpha_to_coverage: desc.alpha_to_coverage_enabled(),
            default_attribs: default_attribs.copied(),
        })
    }

    fn compile_compute_pipeline_state(
        &self,
        function: &&'static str,
        _desc: &ProvokingVertexComputePipelineDesc,
    ) -> Result<(usize, &'static str)> {
        self.check_shader(*function, StateKind::ComputePipeline)?;
        Ok((self.next_serial(), *function))
    }
}

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
