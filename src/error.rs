use std::io;
use std::path::PathBuf;

use rodio::decoder::DecoderError;
use rodio::{PlayError, StreamError};
use thiserror::Error;

use crate::config::ConfigError;

/// Everything that can go wrong inside the sound system. Only initialization failures ever reach
/// the caller; the registry swallows the rest and turns them into no-ops or a `false` completion.
#[derive(Debug, Error)]
pub enum SoundSystemError {
    #[error("failed to open audio output: {0}")]
    StreamErr(#[from] StreamError),
    #[error("failed to open playback transport: {0}")]
    PlayErr(#[from] PlayError),
    #[error("sound resource `{0}` not found")]
    ResourceNotFound(String),
    #[error("{}: {source}", .path.display())]
    SoundFileErr {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", .path.display())]
    DecodeErr {
        path: PathBuf,
        #[source]
        source: DecoderError,
    },
    #[error("{} contains no audio samples", .0.display())]
    EmptyClip(PathBuf),
    #[error("failed to spawn sound system thread: {0}")]
    ThreadErr(#[source] io::Error),
    #[error("sound system thread exited during startup")]
    Startup,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
