use std::collections::HashMap;

use crate::backend::Backend;
use crate::completion::Completion;

/// Volume every freshly loaded sound starts with.
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Lifecycle state of a named sound. A released or never loaded name is `Unloaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundState {
    Unloaded,
    Loaded,
    Playing,
}

/// Snapshot of a loaded sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundStatus {
    pub state: SoundState,
    pub volume: f32,
}

struct SoundEntry<H> {
    handle: H,
    state: SoundState,
    volume: f32,
}

/// Maps sound names to their backend handles and enforces the load/play/stop/release lifecycle.
///
/// A name has an entry iff it is `Loaded` or `Playing`. None of the operations fail: problems are
/// logged and the call degrades to a no-op, or to a `false` completion for [`play`](Self::play).
pub struct SoundRegistry<B: Backend> {
    backend: B,
    entries: HashMap<String, SoundEntry<B::Handle>>,
    clamp_volume: bool,
}

impl<B: Backend> SoundRegistry<B> {
    pub fn new(backend: B, clamp_volume: bool) -> Self {
        Self {
            backend,
            entries: HashMap::new(),
            clamp_volume,
        }
    }

    /// Decodes `name` unless it is already loaded. A name that cannot be resolved or decoded
    /// simply stays unloaded.
    pub fn load(&mut self, name: &str) {
        if self.entries.contains_key(name) {
            log::trace!("`{}` already loaded", name);
            return;
        }
        match self.backend.prepare(name) {
            Ok(handle) => {
                log::debug!("loaded `{}`", name);
                self.entries.insert(
                    name.to_string(),
                    SoundEntry {
                        handle,
                        state: SoundState::Loaded,
                        volume: DEFAULT_VOLUME,
                    },
                );
            }
            Err(err) => log::warn!("failed to load `{}`: {}", name, err),
        }
    }

    /// Starts `name` and reports through `completion` whether a transport was obtained. Playing an
    /// already playing sound restarts it.
    pub fn play(&mut self, name: &str, completion: Completion) {
        let Some(entry) = self.entries.get_mut(name) else {
            log::debug!("cannot play `{}`: not loaded", name);
            completion.complete(false);
            return;
        };

        let started = self.backend.start(&mut entry.handle);
        if started {
            entry.state = SoundState::Playing;
        } else {
            log::debug!("no transport available for `{}`", name);
            entry.state = SoundState::Loaded;
        }
        completion.complete(started);
    }

    pub fn stop(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            self.backend.stop_transport(&mut entry.handle);
            entry.state = SoundState::Loaded;
        }
    }

    /// Levels are forwarded untouched unless the registry was built to clamp them.
    pub fn set_volume(&mut self, name: &str, level: f32) {
        let level = if self.clamp_volume {
            level.clamp(0.0, 1.0)
        } else {
            level
        };
        if let Some(entry) = self.entries.get_mut(name) {
            entry.volume = level;
            self.backend.apply_volume(&mut entry.handle, level);
        }
    }

    pub fn release(&mut self, name: &str) {
        if let Some(entry) = self.entries.remove(name) {
            log::debug!("released `{}`", name);
            self.backend.unload(entry.handle);
        }
    }

    pub fn release_all(&mut self) {
        for (_, entry) in self.entries.drain() {
            self.backend.unload(entry.handle);
        }
    }

    /// Moves sounds whose transport ran out on its own back to `Loaded`.
    pub fn reconcile(&mut self) {
        for (name, entry) in self.entries.iter_mut() {
            if entry.state == SoundState::Playing && self.backend.poll_finished(&mut entry.handle)
            {
                log::trace!("`{}` finished", name);
                entry.state = SoundState::Loaded;
            }
        }
    }

    pub fn state(&self, name: &str) -> SoundState {
        self.entries
            .get(name)
            .map_or(SoundState::Unloaded, |entry| entry.state)
    }

    pub fn status(&self, name: &str) -> Option<SoundStatus> {
        self.entries.get(name).map(|entry| SoundStatus {
            state: entry.state,
            volume: entry.volume,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
