pub mod api;
pub mod core;
pub mod input;
pub mod bridge;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::{FollowConfig, ConfigError, VISOR_WIDTH_PX};
pub use api::sink::PositionSink;
pub use api::types::{Position, Phase, EngineState};
pub use crate::core::handle::{start, FollowHandle};
pub use crate::core::scheduler::{FrameScheduler, FrameCallback, FrameId, ManualScheduler};
pub use crate::core::time::FrameClock;
pub use input::pointer::{Bounds, PointerEvent, PointerSample};
pub use bridge::protocol::{FrameRecord, PROTOCOL_VERSION};

// Extensions: sweep paths, easing, backdrop drift
pub use extensions::{
    Easing, CubicBezier, lerp, ease,
    SweepConfig, SweepPath,
    BackdropDrift, DriftConfig,
};
