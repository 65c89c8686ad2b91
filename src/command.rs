use std::sync::mpsc::Sender;

use crate::completion::Completion;
use crate::system::SoundStatus;

/// Messages sent from a [`SoundSystemHandle`](crate::SoundSystemHandle) to the event loop.
#[derive(Debug)]
pub enum SoundCommand {
    Load(String),
    Play { name: String, completion: Completion },
    Stop(String),
    SetVolume { name: String, level: f32 },
    Release(String),
    Status {
        name: String,
        reply: Sender<Option<SoundStatus>>,
    },
    Shutdown,
}
