//! State Cache Settings
//!
//! Device capabilities that change how descriptors are normalized before
//! they are used as cache keys.
//!
//! ```rust,ignore
//! use kiln_cache::{StateCache, StateCacheSettings};
//!
//! // Depth comparison emulated in shader code: samplers never compare.
//! let cache = StateCache::with_settings(StateCacheSettings {
//!     allow_runtime_sampler_compare_mode: false,
//! });
//! ```

/// Settings for [`StateCache`](crate::StateCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCacheSettings {
    /// Whether sampler objects may carry a compare function.
    ///
    /// When `false`, every sampler is created with compare function `Never`
    /// and depth comparison is left to the shader. Descriptors differing only
    /// in their compare function then share one sampler object.
    ///
    /// Default: `true`
    pub allow_runtime_sampler_compare_mode: bool,
}

impl Default for StateCacheSettings {
    fn default() -> Self {
        Self {
            allow_runtime_sampler_compare_mode: true,
        }
    }
}
