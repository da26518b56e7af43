// extensions/mod.rs
//
// Optional pieces layered on the follow engine: easing curves, scripted
// sweep paths and backdrop drift. None of them know about scheduling.

pub mod backdrop;
pub mod easing;
pub mod sweep;

pub use backdrop::{BackdropDrift, DriftConfig};
pub use easing::{Easing, CubicBezier, lerp, ease};
pub use sweep::{SweepConfig, SweepPath};
