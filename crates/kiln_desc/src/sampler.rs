//! Texture sampler descriptor.

use crate::bits::{self, bitfields};
use crate::codes::{CompareFunction, SamplerAddressMode, SamplerMinMagFilter, SamplerMipFilter};
use crate::gl;
use crate::hash::fx_hash_key;

const MAX_ANISOTROPY_SHIFT: u32 = 13;
const MAX_ANISOTROPY_BITS: u32 = 5;

/// Packed sampler state: 3-bit address modes, 1-bit min/mag filters, 2-bit
/// mip filter, 5-bit max anisotropy and 3-bit compare function in one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerDesc {
    bits: u32,
}

impl SamplerDesc {
    bitfields! {
        bits: u32 {
            r_address_mode: SamplerAddressMode @ 0,
            s_address_mode: SamplerAddressMode @ 3,
            t_address_mode: SamplerAddressMode @ 6,
            min_filter: SamplerMinMagFilter @ 9,
            mag_filter: SamplerMinMagFilter @ 10,
            mip_filter: SamplerMipFilter @ 11,
            compare_function: CompareFunction @ 18,
        }
    }

    #[inline]
    #[must_use]
    pub fn max_anisotropy(&self) -> u8 {
        bits::extract(self.bits, MAX_ANISOTROPY_SHIFT, MAX_ANISOTROPY_BITS) as u8
    }

    /// Panics if `value` needs more than 5 bits.
    #[inline]
    pub fn set_max_anisotropy(&mut self, value: u8) {
        let value = bits::checked_width(u32::from(value), MAX_ANISOTROPY_BITS, "max_anisotropy");
        self.bits = bits::insert(self.bits, MAX_ANISOTROPY_SHIFT, MAX_ANISOTROPY_BITS, value);
    }

    /// Nearest filtering without mipmaps, clamp-to-edge addressing, no
    /// anisotropy, compare never.
    pub fn reset(&mut self) {
        self.bits = 0;
        self.set_r_address_mode(SamplerAddressMode::ClampToEdge);
        self.set_s_address_mode(SamplerAddressMode::ClampToEdge);
        self.set_t_address_mode(SamplerAddressMode::ClampToEdge);
        self.set_min_filter(SamplerMinMagFilter::Nearest);
        self.set_mag_filter(SamplerMinMagFilter::Nearest);
        self.set_mip_filter(SamplerMipFilter::NotMipmapped);
        self.set_max_anisotropy(1);
        self.set_compare_function(CompareFunction::Never);
    }

    #[must_use]
    pub fn hash_value(&self) -> u64 {
        fx_hash_key(self)
    }
}

impl Default for SamplerDesc {
    fn default() -> Self {
        let mut desc = Self { bits: 0 };
        desc.reset();
        desc
    }
}

impl From<&gl::SamplerState> for SamplerDesc {
    /// Lossy for the GL state as a whole (the compare mode folds into the
    /// compare function) but injective over every representable sampler.
    fn from(state: &gl::SamplerState) -> Self {
        let mut desc = Self { bits: 0 };
        desc.set_r_address_mode(gl::address_mode(state.wrap_r));
        desc.set_s_address_mode(gl::address_mode(state.wrap_s));
        desc.set_t_address_mode(gl::address_mode(state.wrap_t));

        desc.set_min_filter(gl::min_mag_filter(state.min_filter));
        desc.set_mag_filter(gl::min_mag_filter(state.mag_filter));
        desc.set_mip_filter(gl::mip_filter(state.min_filter));

        assert!(
            state.max_anisotropy >= 1.0,
            "max anisotropy {} below 1",
            state.max_anisotropy
        );
        let anisotropy = state.max_anisotropy as u32;
        desc.set_max_anisotropy(bits::checked_width(
            anisotropy,
            MAX_ANISOTROPY_BITS,
            "max_anisotropy",
        ) as u8);

        let compare = if state.compare_mode == gl::COMPARE_REF_TO_TEXTURE {
            gl::compare_function(state.compare_func)
        } else {
            CompareFunction::Never
        };
        desc.set_compare_function(compare);
        desc
    }
}
