//! Packed, hashable descriptors of GPU state.
//!
//! Every descriptor is a small `Copy` value whose equality and hash cover
//! exactly the fields that affect the compiled state object, which makes it
//! usable directly as a cache key.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]

mod bits;
pub mod blend;
pub mod codes;
pub mod depth_stencil;
pub mod gl;
mod hash;
pub mod pipeline;
pub mod render_pass;
pub mod sampler;
pub mod vertex;

pub use bits::PackedCode;
pub use blend::{BlendDesc, BlendDescArray, RenderPipelineColorAttachmentDesc, WriteMaskArray};
pub use codes::*;
pub use depth_stencil::{DepthStencilDesc, StencilDesc};
pub use hash::fx_hash_key;
pub use pipeline::{
    DrawBufferMask, ProvokingVertexComputePipelineDesc, RenderPipelineDesc,
    RenderPipelineOutputDesc,
};
pub use render_pass::{
    AttachmentTexture, ClearColor, LoadAction, RenderPassAttachmentDesc,
    RenderPassColorAttachmentDesc, RenderPassDepthAttachmentDesc, RenderPassDesc,
    RenderPassStencilAttachmentDesc, StoreAction, StoreActionOptions, TextureRef,
};
pub use sampler::SamplerDesc;
pub use vertex::{VertexAttributeDesc, VertexBufferLayoutDesc, VertexDesc};
