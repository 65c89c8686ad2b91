//! Platform side of the sound system: decoding clips and driving their transports.
//!
//! Two backends ship with the crate:
//!
//! - [`PooledBackend`] keeps every decoded clip in one pool and caps how many of them may play at
//!   the same time.
//! - [`ClipBackend`] turns every clip into its own self-contained player object.
//!
//! Which one [`DefaultBackend`] refers to is decided by the `pooled` / `per-clip` cargo features.

use rodio::{OutputStreamHandle, PlayError, Sink};

use crate::config::SoundConfig;
use crate::SoundSystemError;

mod clip;
mod pooled;
mod resolve;
pub(crate) mod sound;

pub use clip::{ClipBackend, ClipPlayer};
pub use pooled::{PooledBackend, PooledSound};
pub use resolve::ResourceResolver;

#[cfg(feature = "per-clip")]
pub type DefaultBackend = ClipBackend;
#[cfg(not(feature = "per-clip"))]
pub type DefaultBackend = PooledBackend;

/// The primitives the registry needs from the platform audio layer.
///
/// All methods are called from the sound system thread only. None of them report errors to the
/// caller beyond the `bool` of [`start`](Backend::start); failures are logged and swallowed.
pub trait Backend: Sized {
    /// Decoded, playable unit. Owned by exactly one registry entry.
    type Handle;

    fn open(config: &SoundConfig, output: OutputTarget) -> Result<Self, SoundSystemError>;

    /// Resolves `name` to a resource and decodes it. Blocks for the duration of the decode.
    fn prepare(&mut self, name: &str) -> Result<Self::Handle, SoundSystemError>;

    /// Starts playback from the beginning, stopping any transport the handle already has.
    /// Returns whether a transport was obtained.
    fn start(&mut self, handle: &mut Self::Handle) -> bool;

    fn stop_transport(&mut self, handle: &mut Self::Handle);

    fn apply_volume(&mut self, handle: &mut Self::Handle, level: f32);

    fn unload(&mut self, handle: Self::Handle);

    /// Returns `true` exactly once after a transport ran to its end without being stopped.
    fn poll_finished(&mut self, handle: &mut Self::Handle) -> bool;
}

/// Where transports send their samples.
#[derive(Clone)]
pub enum OutputTarget {
    Device(OutputStreamHandle),
    /// Sinks are created but nothing pulls samples from them.
    Detached,
}

impl OutputTarget {
    pub(crate) fn new_sink(&self) -> Result<Sink, PlayError> {
        match self {
            OutputTarget::Device(handle) => Sink::try_new(handle),
            OutputTarget::Detached => Ok(Sink::new_idle().0),
        }
    }
}
