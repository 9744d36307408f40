//! RenderPipelineCache Tests
//!
//! Tests for:
//! - Pipelines derived from a render pass layout: one compile per descriptor
//! - Shader replacement: eager recompilation, dropping what no longer links
//! - Default-attribute pipelines: separate table, extra buffer slot
//! - Device-facing fixups: alpha-to-coverage, fragment stage, specialization

mod common;

use std::cell::Cell;
use std::rc::Rc;

use kiln::cache::{DefaultAttribLayout, Result, ShaderStage, SpecializeShaderFactory};
use kiln::desc::{
    DEFAULT_ATTRIBS_BINDING_INDEX, DEFAULT_ATTRIBUTE_SIZE, PixelFormat, PrimitiveTopologyClass,
    RenderPassDesc, RenderPipelineDesc, RenderPipelineRasterization, VertexAttributeDesc,
    VertexBufferLayoutDesc, VertexFormat, VertexStepFunction,
};
use kiln::{KilnError, RenderPipelineCache};

use common::{RecordingDevice, color_attachment, init_logger, same, texture};

fn single_target_pipeline() -> RenderPipelineDesc {
    let mut pass = RenderPassDesc {
        num_color_attachments: 1,
        ..Default::default()
    };
    pass.color_attachments[0] = color_attachment(texture(PixelFormat::BGRA8_UNORM), true);

    let mut desc = RenderPipelineDesc::default();
    desc.output_descriptor = pass.render_pipeline_output_desc();
    desc.set_input_primitive_topology(PrimitiveTopologyClass::Triangle);
    desc
}

fn with_constant_color(mut desc: RenderPipelineDesc) -> RenderPipelineDesc {
    let vertex = &mut desc.vertex_descriptor;
    vertex.push_attribute(VertexAttributeDesc::new(VertexFormat::Float3, 0, 0));
    vertex.push_attribute(VertexAttributeDesc::new(
        VertexFormat::Float4,
        0,
        DEFAULT_ATTRIBS_BINDING_INDEX,
    ));
    vertex.push_layout(VertexBufferLayoutDesc {
        step_rate: 1,
        stride: 12,
        step_function: VertexStepFunction::PerVertex,
    });
    desc
}

fn bound_cache(device: &RecordingDevice) -> RenderPipelineCache<RecordingDevice> {
    let mut cache = RenderPipelineCache::new();
    cache.set_vertex_shader(device, Some("vs_main"));
    cache.set_fragment_shader(device, Some("fs_main"));
    cache
}

// ============================================================================
// Lookup Tests
// ============================================================================

#[test]
fn pass_derived_pipeline_compiles_once() {
    init_logger();
    let device = RecordingDevice::default();
    let mut cache = bound_cache(&device);
    let desc = single_target_pipeline();

    let first = cache.get_render_pipeline_state(&device, &desc).unwrap();
    let second = cache.get_render_pipeline_state(&device, &desc).unwrap();

    assert!(same(&first, &second));
    assert_eq!(first.shaders, ["vs_main", "fs_main"]);
    assert_eq!(device.compiles.get(), 1);
    assert_eq!(cache.pipeline_count(), 1);

    let compiled = device.render_pipeline_descs.borrow();
    assert_eq!(
        compiled[0].output_descriptor.color_attachments[0].pixel_format,
        PixelFormat::BGRA8_UNORM
    );
}

#[test]
fn missing_vertex_shader_is_reported() {
    let device = RecordingDevice::default();
    let mut cache = RenderPipelineCache::new();
    cache.set_fragment_shader(&device, Some("fs_main"));

    let err = cache
        .get_render_pipeline_state(&device, &single_target_pipeline())
        .unwrap_err();
    assert!(matches!(err, KilnError::MissingVertexShader));
    assert_eq!(cache.pipeline_count(), 0);
}

// ============================================================================
// Shader Replacement Tests
// ============================================================================

#[test]
fn fragment_swap_recompiles_known_pipelines_eagerly() {
    let device = RecordingDevice::default();
    let mut cache = bound_cache(&device);
    let plain = single_target_pipeline();
    let colored = with_constant_color(plain);

    let before = cache.get_render_pipeline_state(&device, &plain).unwrap();
    cache.get_render_pipeline_state(&device, &colored).unwrap();
    assert_eq!(device.compiles.get(), 2);

    cache.set_fragment_shader(&device, Some("fs_tonemap"));
    assert_eq!(device.compiles.get(), 4);
    assert_eq!(cache.pipeline_count(), 2);

    let after = cache.get_render_pipeline_state(&device, &plain).unwrap();
    assert!(!same(&before, &after));
    assert_eq!(after.shaders, ["vs_main", "fs_tonemap"]);
    assert_eq!(device.compiles.get(), 4);
}

#[test]
fn pipelines_that_no_longer_link_are_dropped() {
    init_logger();
    let device = RecordingDevice::default();
    let mut cache = bound_cache(&device);
    let desc = single_target_pipeline();
    cache.get_render_pipeline_state(&device, &desc).unwrap();

    device.failing_shader.set(Some("vs_broken"));
    cache.set_vertex_shader(&device, Some("vs_broken"));
    assert_eq!(cache.pipeline_count(), 0);

    let err = cache.get_render_pipeline_state(&device, &desc).unwrap_err();
    assert!(matches!(err, KilnError::CompileFailed { .. }));
    assert_eq!(cache.pipeline_count(), 0);
}

#[test]
fn unbinding_a_shader_drops_everything() {
    let device = RecordingDevice::default();
    let mut cache = bound_cache(&device);
    cache.get_render_pipeline_state(&device, &single_target_pipeline()).unwrap();
    cache
        .get_render_pipeline_state(&device, &with_constant_color(single_target_pipeline()))
        .unwrap();

    cache.set_vertex_shader(&device, None);
    assert_eq!(cache.pipeline_count(), 0);
    assert!(cache.vertex_shader().is_none());
    assert_eq!(cache.fragment_shader(), Some(&"fs_main"));
    assert_eq!(device.compiles.get(), 2);
}

#[test]
fn clear_unbinds_shaders() {
    let device = RecordingDevice::default();
    let mut cache = bound_cache(&device);
    cache.get_render_pipeline_state(&device, &single_target_pipeline()).unwrap();

    cache.clear();
    assert_eq!(cache.pipeline_count(), 0);
    assert!(cache.vertex_shader().is_none());
    assert!(cache.fragment_shader().is_none());
}

#[test]
fn clear_forces_fresh_compilation() {
    let device = RecordingDevice::default();
    let mut cache = bound_cache(&device);
    let before = cache.get_render_pipeline_state(&device, &single_target_pipeline()).unwrap();
    assert_eq!(device.compiles.get(), 1);

    cache.clear();
    cache.set_vertex_shader(&device, Some("vs_main"));
    cache.set_fragment_shader(&device, Some("fs_main"));
    assert_eq!(device.compiles.get(), 1);

    let after = cache.get_render_pipeline_state(&device, &single_target_pipeline()).unwrap();
    assert_eq!(device.compiles.get(), 2);
    assert!(!same(&before, &after));
    assert_eq!(cache.pipeline_count(), 1);
}

// ============================================================================
// Default Attribute Tests
// ============================================================================

#[test]
fn default_attribute_pipelines_get_the_constant_slot() {
    let device = RecordingDevice::default();
    let mut cache = bound_cache(&device);

    cache.get_render_pipeline_state(&device, &single_target_pipeline()).unwrap();
    cache
        .get_render_pipeline_state(&device, &with_constant_color(single_target_pipeline()))
        .unwrap();

    let layouts = device.default_attrib_layouts.borrow();
    assert_eq!(layouts[0], None);
    let layout = layouts[1].expect("default attribute slot");
    assert_eq!(layout, DefaultAttribLayout::default());
    assert_eq!(layout.binding_index, DEFAULT_ATTRIBS_BINDING_INDEX);
    assert_eq!(layout.layout.stride, DEFAULT_ATTRIBUTE_SIZE);
    assert_eq!(layout.layout.step_function, VertexStepFunction::Constant);
    assert_eq!(cache.pipeline_count(), 2);
}

// ============================================================================
// Device Fixup Tests
// ============================================================================

#[test]
fn alpha_to_coverage_needs_multisampling() {
    let device = RecordingDevice::default();
    let mut cache = bound_cache(&device);

    let mut single = single_target_pipeline();
    single.set_alpha_to_coverage_enabled(true);
    let mut multi = single;
    multi.output_descriptor.sample_count = 4;

    cache.get_render_pipeline_state(&device, &single).unwrap();
    cache.get_render_pipeline_state(&device, &multi).unwrap();

    let compiled = device.render_pipeline_descs.borrow();
    assert!(!compiled[0].alpha_to_coverage_enabled());
    assert!(compiled[1].alpha_to_coverage_enabled());

    drop(compiled);
    let again = cache.get_render_pipeline_state(&device, &single).unwrap();
    assert_eq!(again.serial, 1);
}

#[test]
fn disabled_rasterization_skips_the_fragment_stage() {
    let device = RecordingDevice::default();
    let mut cache = bound_cache(&device);

    let mut feedback_only = single_target_pipeline();
    feedback_only.set_rasterization_type(RenderPipelineRasterization::Disabled);

    let state = cache.get_render_pipeline_state(&device, &feedback_only).unwrap();
    assert_eq!(state.shaders, ["vs_main"]);
}

/// Swaps in a discard vertex shader for emulated rasterizer discard.
struct DiscardFactory {
    requests: Rc<Cell<usize>>,
}

impl SpecializeShaderFactory<RecordingDevice, RenderPipelineDesc> for DiscardFactory {
    fn has_specialized_shader(&self, stage: ShaderStage, key: &RenderPipelineDesc) -> bool {
        stage == ShaderStage::Vertex
            && key.rasterization_type() == RenderPipelineRasterization::EmulatedDiscard
    }

    fn get_specialized_shader(
        &mut self,
        _device: &RecordingDevice,
        _stage: ShaderStage,
        _key: &RenderPipelineDesc,
    ) -> Result<&'static str> {
        self.requests.set(self.requests.get() + 1);
        Ok("vs_discard")
    }
}

#[test]
fn specialized_vertex_shader_replaces_the_bound_one() {
    let device = RecordingDevice::default();
    let requests = Rc::new(Cell::new(0));
    let mut cache = RenderPipelineCache::<RecordingDevice>::new().with_specialized_shader_factory(
        Box::new(DiscardFactory {
            requests: requests.clone(),
        }),
    );
    cache.set_vertex_shader(&device, Some("vs_main"));
    cache.set_fragment_shader(&device, Some("fs_main"));

    let mut discard = single_target_pipeline();
    discard.set_rasterization_type(RenderPipelineRasterization::EmulatedDiscard);

    let emulated = cache.get_render_pipeline_state(&device, &discard).unwrap();
    let normal = cache
        .get_render_pipeline_state(&device, &single_target_pipeline())
        .unwrap();
    cache.get_render_pipeline_state(&device, &discard).unwrap();

    assert_eq!(emulated.shaders, ["vs_discard", "fs_main"]);
    assert_eq!(normal.shaders, ["vs_main", "fs_main"]);
    assert_eq!(requests.get(), 1);
}
