//! At-most-once caches of compiled GPU state objects.
//!
//! Each cache maps a [`kiln_desc`] descriptor to the driver object compiled
//! from it through a [`StateDevice`] or [`PipelineDevice`]. Lookups either
//! return the stored handle or compile, store and return a new one; failed
//! compilations are reported and never stored.
//!
//! ```rust,ignore
//! use kiln_cache::{RenderPipelineCache, StateCache};
//!
//! let mut states = StateCache::new();
//! let sampler = states.get_sampler_state(&device, &sampler_desc)?;
//!
//! let mut pipelines = RenderPipelineCache::new();
//! pipelines.set_vertex_shader(&device, Some(vertex));
//! pipelines.set_fragment_shader(&device, Some(fragment));
//! let pipeline = pipelines.get_render_pipeline_state(&device, &pipeline_desc)?;
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod compute_pipeline_cache;
pub mod device;
pub mod errors;
pub mod render_pipeline_cache;
pub mod settings;
pub mod specialize;
pub mod state_cache;

#[cfg(test)]
mod testing;

pub use compute_pipeline_cache::ProvokingVertexComputePipelineCache;
pub use device::{DefaultAttribLayout, PipelineDevice, StateDevice};
pub use errors::{KilnError, Result, StateKind};
pub use render_pipeline_cache::RenderPipelineCache;
pub use settings::StateCacheSettings;
pub use specialize::{ShaderStage, SpecializeShaderFactory};
pub use state_cache::StateCache;
