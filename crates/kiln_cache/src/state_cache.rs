//! Depth/stencil and sampler state object cache.
//!
//! Holds at most one driver object per distinct descriptor. The null states
//! (nothing tested, nothing written / default sampling) are requested on
//! almost every draw, so their handles are remembered outside the maps.

use log::debug;
use rustc_hash::FxHashMap;

use kiln_desc::{CompareFunction, DepthStencilDesc, SamplerDesc};

use crate::device::StateDevice;
use crate::errors::Result;
use crate::settings::StateCacheSettings;

pub struct StateCache<D: StateDevice> {
    settings: StateCacheSettings,

    null_depth_stencil_state: Option<D::DepthStencilState>,
    null_sampler_state: Option<D::SamplerState>,

    depth_stencil_states: FxHashMap<DepthStencilDesc, D::DepthStencilState>,
    sampler_states: FxHashMap<SamplerDesc, D::SamplerState>,
}

impl<D: StateDevice> Default for StateCache<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: StateDevice> StateCache<D> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(StateCacheSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: StateCacheSettings) -> Self {
        Self {
            settings,
            null_depth_stencil_state: None,
            null_sampler_state: None,
            depth_stencil_states: FxHashMap::default(),
            sampler_states: FxHashMap::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &StateCacheSettings {
        &self.settings
    }

    /// State that disables depth/stencil reads and writes.
    pub fn get_null_depth_stencil_state(&mut self, device: &D) -> Result<D::DepthStencilState> {
        if let Some(state) = &self.null_depth_stencil_state {
            return Ok(state.clone());
        }
        let state = self.get_depth_stencil_state(device, &DepthStencilDesc::null())?;
        self.null_depth_stencil_state = Some(state.clone());
        Ok(state)
    }

    pub fn get_depth_stencil_state(
        &mut self,
        device: &D,
        desc: &DepthStencilDesc,
    ) -> Result<D::DepthStencilState> {
        if let Some(state) = self.depth_stencil_states.get(desc) {
            return Ok(state.clone());
        }

        let state = device.compile_depth_stencil_state(desc)?;
        debug!(
            "Compiled depth/stencil state {:#018x} ({} cached)",
            desc.hash_value(),
            self.depth_stencil_states.len() + 1
        );
        self.depth_stencil_states.insert(*desc, state.clone());
        Ok(state)
    }

    /// Sampler with [`SamplerDesc`]'s reset values.
    pub fn get_null_sampler_state(&mut self, device: &D) -> Result<D::SamplerState> {
        if let Some(state) = &self.null_sampler_state {
            return Ok(state.clone());
        }
        let state = self.get_sampler_state(device, &SamplerDesc::default())?;
        self.null_sampler_state = Some(state.clone());
        Ok(state)
    }

    pub fn get_sampler_state(&mut self, device: &D, desc: &SamplerDesc) -> Result<D::SamplerState> {
        let mut desc = *desc;
        if !self.settings.allow_runtime_sampler_compare_mode {
            desc.set_compare_function(CompareFunction::Never);
        }

        if let Some(state) = self.sampler_states.get(&desc) {
            return Ok(state.clone());
        }

        let state = device.compile_sampler_state(&desc)?;
        debug!(
            "Compiled sampler state {:#018x} ({} cached)",
            desc.hash_value(),
            self.sampler_states.len() + 1
        );
        self.sampler_states.insert(desc, state.clone());
        Ok(state)
    }

    /// Drops every cached state object, including the null states.
    pub fn clear(&mut self) {
        self.null_depth_stencil_state = None;
        self.null_sampler_state = None;
        self.depth_stencil_states.clear();
        self.sampler_states.clear();
    }

    #[inline]
    #[must_use]
    pub fn depth_stencil_state_count(&self) -> usize {
        self.depth_stencil_states.len()
    }

    #[inline]
    #[must_use]
    pub fn sampler_state_count(&self) -> usize {
        self.sampler_states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingDevice, init_logger};
    use kiln_desc::{SamplerAddressMode, gl};

    fn depth_test_less() -> DepthStencilDesc {
        DepthStencilDesc::from(&gl::DepthStencilState {
            depth_test: true,
            depth_func: gl::LESS,
            ..Default::default()
        })
    }

    #[test]
    fn equal_descriptors_share_one_object() {
        init_logger();
        let device = CountingDevice::default();
        let mut cache = StateCache::new();

        let first = cache.get_depth_stencil_state(&device, &depth_test_less()).unwrap();
        let second = cache.get_depth_stencil_state(&device, &depth_test_less()).unwrap();

        assert_eq!(first, second);
        assert_eq!(device.compiles.get(), 1);
        assert_eq!(cache.depth_stencil_state_count(), 1);
    }

    #[test]
    fn null_depth_stencil_state_is_the_disabled_desc() {
        let device = CountingDevice::default();
        let mut cache = StateCache::new();

        let null = cache.get_null_depth_stencil_state(&device).unwrap();
        let looked_up = cache
            .get_depth_stencil_state(&device, &DepthStencilDesc::null())
            .unwrap();
        assert_eq!(null, looked_up);
        assert_eq!(cache.get_null_depth_stencil_state(&device).unwrap(), null);
        assert_eq!(device.compiles.get(), 1);
    }

    #[test]
    fn failed_compilation_is_not_cached() {
        let device = CountingDevice::default();
        let mut cache = StateCache::new();

        device.reject_states.set(true);
        assert!(cache.get_sampler_state(&device, &SamplerDesc::default()).is_err());
        assert!(cache.get_null_sampler_state(&device).is_err());
        assert_eq!(cache.sampler_state_count(), 0);

        device.reject_states.set(false);
        assert!(cache.get_null_sampler_state(&device).is_ok());
        assert_eq!(cache.sampler_state_count(), 1);
    }

    #[test]
    fn clear_recreates_null_states_lazily() {
        let device = CountingDevice::default();
        let mut cache = StateCache::new();

        let before = cache.get_null_sampler_state(&device).unwrap();
        cache.clear();
        assert_eq!(cache.sampler_state_count(), 0);

        let after = cache.get_null_sampler_state(&device).unwrap();
        assert_ne!(before, after);
        assert_eq!(device.compiles.get(), 2);
    }

    #[test]
    fn compare_mode_folds_away_when_unsupported() {
        let device = CountingDevice::default();
        let mut cache = StateCache::with_settings(StateCacheSettings {
            allow_runtime_sampler_compare_mode: false,
        });

        let mut comparing = SamplerDesc::default();
        comparing.set_compare_function(CompareFunction::LessEqual);
        let plain = SamplerDesc::default();

        let a = cache.get_sampler_state(&device, &comparing).unwrap();
        let b = cache.get_sampler_state(&device, &plain).unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.sampler_state_count(), 1);
    }

    #[test]
    fn compare_mode_splits_samplers_when_supported() {
        let device = CountingDevice::default();
        let mut cache = StateCache::new();

        let mut comparing = SamplerDesc::default();
        comparing.set_compare_function(CompareFunction::LessEqual);
        let mut repeating = SamplerDesc::default();
        repeating.set_s_address_mode(SamplerAddressMode::Repeat);

        let a = cache.get_sampler_state(&device, &comparing).unwrap();
        let b = cache.get_sampler_state(&device, &SamplerDesc::default()).unwrap();
        let c = cache.get_sampler_state(&device, &repeating).unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(cache.sampler_state_count(), 3);
    }
}
