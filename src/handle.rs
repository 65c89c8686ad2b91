use std::sync::mpsc::{self, Sender};
use std::thread::{self, ThreadId};

use crate::command::SoundCommand;
use crate::completion::{Completion, PlayReceipt};
use crate::system::{SoundState, SoundStatus};

/// Cloneable front door to a running [`SoundSystem`](crate::SoundSystem).
///
/// Every call is fire-and-forget: nothing here returns an error. If the sound system is gone the
/// command is dropped, which for `play` means the completion reports `false`.
#[derive(Clone)]
pub struct SoundSystemHandle {
    pub(crate) command_sender: Sender<SoundCommand>,
    pub(crate) event_loop: ThreadId,
}

impl SoundSystemHandle {
    /// Decode `name` so it can be played. Blocks the sound system thread, not the caller.
    pub fn load(&self, name: impl Into<String>) {
        self.send(SoundCommand::Load(name.into()));
    }

    /// Start `name`. `on_complete` runs once on the sound system thread with `true` if playback
    /// started.
    pub fn play<F>(&self, name: impl Into<String>, on_complete: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        self.send(SoundCommand::Play {
            name: name.into(),
            completion: Completion::new(on_complete),
        });
    }

    /// Start `name` and get a receipt to wait on instead of a callback.
    pub fn play_receipt(&self, name: impl Into<String>) -> PlayReceipt {
        let (completion, receipt) = Completion::channel();
        self.send(SoundCommand::Play {
            name: name.into(),
            completion,
        });
        receipt
    }

    pub fn stop(&self, name: impl Into<String>) {
        self.send(SoundCommand::Stop(name.into()));
    }

    pub fn set_volume(&self, name: impl Into<String>, level: f32) {
        self.send(SoundCommand::SetVolume {
            name: name.into(),
            level,
        });
    }

    pub fn release(&self, name: impl Into<String>) {
        self.send(SoundCommand::Release(name.into()));
    }

    /// State and volume of `name`, or `None` if it is not loaded. Waits for all previously sent
    /// commands to be handled.
    ///
    /// Called from the sound system thread itself (inside a `play` callback) there is nobody to
    /// answer, so it returns `None` right away.
    pub fn status(&self, name: impl Into<String>) -> Option<SoundStatus> {
        if thread::current().id() == self.event_loop {
            log::warn!("status queried from the sound system thread, no answer possible");
            return None;
        }
        let (reply, answer) = mpsc::channel();
        self.send(SoundCommand::Status {
            name: name.into(),
            reply,
        });
        answer.recv().ok().flatten()
    }

    pub fn state(&self, name: impl Into<String>) -> SoundState {
        self.status(name)
            .map_or(SoundState::Unloaded, |status| status.state)
    }

    /// Stop the event loop and release every loaded sound.
    pub fn shutdown(&self) {
        self.send(SoundCommand::Shutdown);
    }

    fn send(&self, command: SoundCommand) {
        if self.command_sender.send(command).is_err() {
            log::warn!("sound system is not running, command dropped");
        }
    }
}
