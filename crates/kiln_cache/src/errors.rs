//! Error Types
//!
//! All fallible cache operations return [`Result<T>`], an alias for
//! `std::result::Result<T, KilnError>`.
//!
//! Failures never poison a cache: nothing is recorded for a descriptor whose
//! compilation failed, so the next lookup with the same descriptor retries.

use std::fmt;

use thiserror::Error;

use crate::specialize::ShaderStage;

/// Which kind of state object a compilation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    DepthStencil,
    Sampler,
    RenderPipeline,
    ComputePipeline,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DepthStencil => "depth/stencil state",
            Self::Sampler => "sampler state",
            Self::RenderPipeline => "render pipeline",
            Self::ComputePipeline => "compute pipeline",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum KilnError {
    // ========================================================================
    // Device Errors
    // ========================================================================
    /// The device rejected a descriptor.
    #[error("Failed to compile {kind}: {reason}")]
    CompileFailed {
        kind: StateKind,
        reason: String,
    },

    /// The device cannot express a descriptor value.
    #[error("Unsupported by device: {0}")]
    Unsupported(String),

    // ========================================================================
    // Shader Errors
    // ========================================================================
    /// A render pipeline was requested before a vertex shader was set.
    #[error("No vertex shader bound to the render pipeline cache")]
    MissingVertexShader,

    /// A compute pipeline was requested before a compute shader was set and no
    /// specialized variant applies.
    #[error("No compute shader bound to the compute pipeline cache")]
    MissingComputeShader,

    /// The specialization factory failed to produce a shader variant.
    #[error("Failed to specialize {stage:?} shader: {reason}")]
    SpecializationFailed {
        stage: ShaderStage,
        reason: String,
    },
}

impl KilnError {
    /// Shorthand for [`KilnError::CompileFailed`].
    #[must_use]
    pub fn compile_failed(kind: StateKind, reason: impl Into<String>) -> Self {
        Self::CompileFailed {
            kind,
            reason: reason.into(),
        }
    }
}

/// Alias for `Result<T, KilnError>`.
pub type Result<T> = std::result::Result<T, KilnError>;
