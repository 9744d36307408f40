//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use kiln::cache::{DefaultAttribLayout, KilnError, PipelineDevice, Result, StateDevice, StateKind};
use kiln::desc::{
    AttachmentTexture, ColorWriteMask, DepthStencilDesc, PixelFormat,
    ProvokingVertexComputePipelineDesc, RenderPassColorAttachmentDesc, RenderPassAttachmentDesc,
    RenderPipelineDesc, SamplerDesc, TextureRef,
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Compiled object handed out by [`RecordingDevice`]. Handles are compared by
/// identity, like driver objects.
#[derive(Debug)]
pub struct Compiled {
    pub serial: usize,
    pub shaders: Vec<&'static str>,
}

pub type Handle = Arc<Compiled>;

pub fn same(a: &Handle, b: &Handle) -> bool {
    Arc::ptr_eq(a, b)
}

/// Device stand-in that records every compilation.
#[derive(Default)]
pub struct RecordingDevice {
    pub compiles: Cell<usize>,
    pub render_pipeline_descs: RefCell<Vec<RenderPipelineDesc>>,
    pub default_attrib_layouts: RefCell<Vec<Option<DefaultAttribLayout>>>,
    pub failing_shader: Cell<Option<&'static str>>,
}

impl RecordingDevice {
    fn compiled(&self, shaders: Vec<&'static str>) -> Handle {
        let serial = self.compiles.get() + 1;
        self.compiles.set(serial);
        Arc::new(Compiled { serial, shaders })
    }

    fn check(&self, shader: &'static str, kind: StateKind) -> Result<()> {
        if self.failing_shader.get() == Some(shader) {
            return Err(KilnError::compile_failed(kind, format!("{shader} does not link")));
        }
        Ok(())
    }
}

impl StateDevice for RecordingDevice {
    type DepthStencilState = Handle;
    type SamplerState = Handle;

    fn compile_depth_stencil_state(&self, _desc: &DepthStencilDesc) -> Result<Handle> {
        Ok(self.compiled(Vec::new()))
    }

    fn compile_sampler_state(&self, _desc: &SamplerDesc) -> Result<Handle> {
        Ok(self.compiled(Vec::new()))
    }
}

impl PipelineDevice for RecordingDevice {
    type ShaderFunction = &'static str;
    type RenderPipelineState = Handle;
    type ComputePipelineState = Handle;

    fn compile_render_pipeline_state(
        &self,
        vertex: &&'static str,
        fragment: Option<&&'static str>,
        desc: &RenderPipelineDesc,
        default_attribs: Option<&DefaultAttribLayout>,
    ) -> Result<Handle> {
        let mut shaders = vec![*vertex];
        shaders.extend(fragment.copied());
        for &shader in &shaders {
            self.check(shader, StateKind::RenderPipeline)?;
        }
        self.render_pipeline_descs.borrow_mut().push(*desc);
        self.default_attrib_layouts.borrow_mut().push(default_attribs.copied());
        Ok(self.compiled(shaders))
    }

    fn compile_compute_pipeline_state(
        &self,
        function: &&'static str,
        _desc: &ProvokingVertexComputePipelineDesc,
    ) -> Result<Handle> {
        self.check(function, StateKind::ComputePipeline)?;
        Ok(self.compiled(vec![*function]))
    }
}

#[derive(Debug)]
pub struct Texture {
    pub format: PixelFormat,
    pub writable: ColorWriteMask,
}

impl AttachmentTexture for Texture {
    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn color_writable_mask(&self) -> ColorWriteMask {
        self.writable
    }
}

pub fn texture(format: PixelFormat) -> TextureRef {
    Arc::new(Texture {
        format,
        writable: ColorWriteMask::ALL,
    })
}

pub fn color_attachment(texture: TextureRef, blendable: bool) -> RenderPassColorAttachmentDesc {
    RenderPassColorAttachmentDesc {
        attachment: RenderPassAttachmentDesc {
            texture: Some(texture),
            blendable,
            ..Default::default()
        },
        ..Default::default()
    }
}
