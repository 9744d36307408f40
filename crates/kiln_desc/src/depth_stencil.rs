//! Depth/stencil state descriptors.

use crate::bits::bitfields;
use crate::codes::{CompareFunction, STENCIL_MASK_ALL, StencilOperation};
use crate::gl;
use crate::hash::fx_hash_key;

/// One face of the stencil test.
///
/// The three operations and the compare function share a 12-bit word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilDesc {
    ops: u16,
    pub read_mask: u8,
    pub write_mask: u8,
}

impl StencilDesc {
    bitfields! {
        ops: u16 {
            stencil_failure_operation: StencilOperation @ 0,
            depth_failure_operation: StencilOperation @ 3,
            depth_stencil_pass_operation: StencilOperation @ 6,
            stencil_compare_function: CompareFunction @ 9,
        }
    }

    /// Keep on every outcome, compare always, full masks.
    pub fn reset(&mut self) {
        self.ops = 0;
        self.set_stencil_failure_operation(StencilOperation::Keep);
        self.set_depth_failure_operation(StencilOperation::Keep);
        self.set_depth_stencil_pass_operation(StencilOperation::Keep);
        self.set_stencil_compare_function(CompareFunction::Always);
        self.read_mask = STENCIL_MASK_ALL;
        self.write_mask = STENCIL_MASK_ALL;
    }

    fn disable(&mut self) {
        self.set_stencil_failure_operation(StencilOperation::Keep);
        self.set_depth_failure_operation(StencilOperation::Keep);
        self.set_depth_stencil_pass_operation(StencilOperation::Keep);
        self.set_stencil_compare_function(CompareFunction::Always);
        self.write_mask = 0;
    }
}

impl Default for StencilDesc {
    fn default() -> Self {
        let mut desc = Self {
            ops: 0,
            read_mask: 0,
            write_mask: 0,
        };
        desc.reset();
        desc
    }
}

/// Complete depth/stencil test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilDesc {
    pub back_face_stencil: StencilDesc,
    pub front_face_stencil: StencilDesc,
    depth: u8,
}

impl DepthStencilDesc {
    bitfields! {
        depth: u8 {
            depth_compare_function: CompareFunction @ 0,
            depth_write_enabled: bool @ 3,
        }
    }

    /// Depth/stencil test disabled, depth write enabled.
    pub fn reset(&mut self) {
        self.front_face_stencil.reset();
        self.back_face_stencil.reset();
        self.depth = 0;
        self.set_depth_compare_function(CompareFunction::Always);
        self.set_depth_write_enabled(true);
    }

    /// The state used when no depth/stencil test is bound: everything passes
    /// and nothing is written.
    #[must_use]
    pub fn null() -> Self {
        let mut desc = Self::default();
        desc.set_depth_write_enabled(false);
        desc
    }

    #[must_use]
    pub fn hash_value(&self) -> u64 {
        fx_hash_key(self)
    }

    pub fn update_depth_test_enabled(&mut self, state: &gl::DepthStencilState) {
        if state.depth_test {
            self.update_depth_compare_func(state);
            self.update_depth_write_enabled(state);
        } else {
            self.set_depth_compare_function(CompareFunction::Always);
            self.set_depth_write_enabled(false);
        }
    }

    pub fn update_depth_write_enabled(&mut self, state: &gl::DepthStencilState) {
        self.set_depth_write_enabled(state.depth_test && state.depth_mask);
    }

    pub fn update_depth_compare_func(&mut self, state: &gl::DepthStencilState) {
        if !state.depth_test {
            return;
        }
        self.set_depth_compare_function(gl::compare_function(state.depth_func));
    }

    pub fn update_stencil_test_enabled(&mut self, state: &gl::DepthStencilState) {
        if state.stencil_test {
            self.update_stencil_front_funcs(state);
            self.update_stencil_front_ops(state);
            self.update_stencil_front_write_mask(state);
            self.update_stencil_back_funcs(state);
            self.update_stencil_back_ops(state);
            self.update_stencil_back_write_mask(state);
        } else {
            self.front_face_stencil.disable();
            self.back_face_stencil.disable();
        }
    }

    pub fn update_stencil_front_ops(&mut self, state: &gl::DepthStencilState) {
        if !state.stencil_test {
            return;
        }
        let face = &mut self.front_face_stencil;
        face.set_stencil_failure_operation(gl::stencil_operation(state.stencil_fail));
        face.set_depth_failure_operation(gl::stencil_operation(state.stencil_pass_depth_fail));
        face.set_depth_stencil_pass_operation(gl::stencil_operation(state.stencil_pass_depth_pass));
    }

    pub fn update_stencil_back_ops(&mut self, state: &gl::DepthStencilState) {
        if !state.stencil_test {
            return;
        }
        let face = &mut self.back_face_stencil;
        face.set_stencil_failure_operation(gl::stencil_operation(state.stencil_back_fail));
        face.set_depth_failure_operation(gl::stencil_operation(
            state.stencil_back_pass_depth_fail,
        ));
        face.set_depth_stencil_pass_operation(gl::stencil_operation(
            state.stencil_back_pass_depth_pass,
        ));
    }

    pub fn update_stencil_front_funcs(&mut self, state: &gl::DepthStencilState) {
        if !state.stencil_test {
            return;
        }
        let face = &mut self.front_face_stencil;
        face.set_stencil_compare_function(gl::compare_function(state.stencil_func));
        face.read_mask = stencil_mask(state.stencil_mask);
    }

    pub fn update_stencil_back_funcs(&mut self, state: &gl::DepthStencilState) {
        if !state.stencil_test {
            return;
        }
        let face = &mut self.back_face_stencil;
        face.set_stencil_compare_function(gl::compare_function(state.stencil_back_func));
        face.read_mask = stencil_mask(state.stencil_back_mask);
    }

    pub fn update_stencil_front_write_mask(&mut self, state: &gl::DepthStencilState) {
        if !state.stencil_test {
            return;
        }
        self.front_face_stencil.write_mask = stencil_mask(state.stencil_writemask);
    }

    pub fn update_stencil_back_write_mask(&mut self, state: &gl::DepthStencilState) {
        if !state.stencil_test {
            return;
        }
        self.back_face_stencil.write_mask = stencil_mask(state.stencil_back_writemask);
    }
}

impl Default for DepthStencilDesc {
    fn default() -> Self {
        let mut desc = Self {
            back_face_stencil: StencilDesc::default(),
            front_face_stencil: StencilDesc::default(),
            depth: 0,
        };
        desc.reset();
        desc
    }
}

impl From<&gl::DepthStencilState> for DepthStencilDesc {
    fn from(state: &gl::DepthStencilState) -> Self {
        let mut desc = Self::default();
        desc.update_depth_test_enabled(state);
        desc.update_stencil_test_enabled(state);
        desc
    }
}

/// Stencil buffers are 8 bits deep; wider GL masks keep their low byte.
#[inline]
fn stencil_mask(mask: u32) -> u8 {
    (mask & u32::from(STENCIL_MASK_ALL)) as u8
}
