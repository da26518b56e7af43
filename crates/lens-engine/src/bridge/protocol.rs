//! Per-frame record handed to JS as a flat `[f32; 4]` snapshot.
//! Readers check `LensMount.protocolVersion()` before decoding.
//!
//! Layout (all values f32):
//! ```text
//! [x, y, phase, active]
//! ```
//! `phase` is 0 = idle, 1 = sweep, 2 = tracking. `active` is 0 or 1.

use bytemuck::{Pod, Zeroable};
use crate::api::types::EngineState;

/// Protocol version; bump when the layout changes.
pub const PROTOCOL_VERSION: f32 = 1.0;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct FrameRecord {
    pub x: f32,
    pub y: f32,
    pub phase: f32,
    pub active: f32,
}

impl FrameRecord {
    /// Floats per record (wire format, fixed).
    pub const FLOATS: usize = 4;

    pub fn from_state(state: &EngineState) -> Self {
        Self {
            x: state.current.x(),
            y: state.current.y(),
            phase: state.phase.as_f32(),
            active: if state.active { 1.0 } else { 0.0 },
        }
    }

    pub fn as_floats(&self) -> &[f32; Self::FLOATS] {
        bytemuck::cast_ref(self)
    }
}
