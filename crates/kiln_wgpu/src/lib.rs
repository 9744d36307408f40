//! wgpu backend for the Kiln caches.
//!
//! [`WgpuDevice`] implements both device traits, so one value drives a
//! [`StateCache`](kiln_cache::StateCache) and the pipeline caches:
//!
//! ```rust,ignore
//! use kiln_cache::{RenderPipelineCache, StateCache};
//! use kiln_wgpu::{WgpuDevice, WgpuShaderFunction};
//!
//! let device = WgpuDevice::new(wgpu_device);
//! let mut pipelines = RenderPipelineCache::new();
//! pipelines.set_vertex_shader(&device, Some(WgpuShaderFunction::new(module.clone(), "vs_main")));
//! pipelines.set_fragment_shader(&device, Some(WgpuShaderFunction::new(module, "fs_main")));
//! let pipeline = pipelines.get_render_pipeline_state(&device, &desc)?;
//!
//! let mut states = StateCache::new();
//! let depth = states.get_depth_stencil_state(&device, &depth_desc)?;
//! render_pass.set_pipeline(&pipeline.pipeline(Some(&depth)));
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]

pub mod convert;
pub mod device;

pub use device::{WgpuDepthStencilState, WgpuDevice, WgpuRenderPipeline, WgpuShaderFunction};
