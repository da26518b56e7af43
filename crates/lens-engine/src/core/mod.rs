pub mod engine;
pub mod handle;
pub mod scheduler;
pub mod time;
