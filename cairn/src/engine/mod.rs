//! Lifecycle of the throwaway bootstrap container engine.
//!
//! ## Architecture
//!
//! - **EngineController**: Spawning operations (creates EngineHandle)
//! - **EngineHandle**: The running instance. Owns the stop handshake with a
//!   supervising task and the engine's system-state directory.
//! - **EngineGuard**: Scoped acquisition. Runs bootstrap work and always
//!   stops the engine afterwards.
//!
//! ```text
//! start ──► supervisor waits ──stop──► SIGTERM ─► wait(pid) ──done──► remove home
//! ```

mod controller;
mod guard;
mod handle;
mod spawn;

pub use controller::{EngineController, ProcessEngineController};
pub use guard::EngineGuard;
pub use handle::EngineHandle;
pub use spawn::LaunchOptions;
