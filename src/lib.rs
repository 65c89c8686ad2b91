//! Named sound-effect playback.
//!
//! Clips are loaded, played, stopped, re-volumed and released by a caller-chosen name. A
//! [`SoundSystem`] owns the audio output on its own thread; callers talk to it through a
//! cloneable [`SoundSystemHandle`]. None of the five operations fail loudly: a name that cannot
//! be loaded stays unloaded, and `play` reports through its completion whether playback started.

pub mod backend;
mod command;
mod completion;
mod config;
mod error;
mod handle;
mod system;

#[cfg(test)]
#[path = "../tests/common/wav.rs"]
mod test_support;

pub use backend::{Backend, ClipBackend, DefaultBackend, OutputTarget, PooledBackend};
pub use completion::{Completion, PlayReceipt};
pub use config::{ConfigError, SoundConfig};
pub use error::SoundSystemError;
pub use handle::SoundSystemHandle;
pub use system::{SoundRegistry, SoundState, SoundStatus, SoundSystem, DEFAULT_VOLUME};
