use std::collections::HashMap;

use rodio::Sink;

use crate::backend::resolve::ResourceResolver;
use crate::backend::sound::DecodedClip;
use crate::backend::{Backend, OutputTarget};
use crate::config::SoundConfig;
use crate::SoundSystemError;

/// Backend that keeps all decoded clips in a single pool and allows at most `max_streams` of them
/// to play at once.
pub struct PooledBackend {
    output: OutputTarget,
    resolver: ResourceResolver,
    max_streams: usize,
    next_id: u32,
    clips: HashMap<u32, PooledClip>,
}

/// Ticket for a clip held by a [`PooledBackend`].
#[derive(Debug, PartialEq, Eq)]
pub struct PooledSound {
    id: u32,
}

struct PooledClip {
    clip: DecodedClip,
    volume: f32,
    stream: Option<Sink>,
}

impl PooledClip {
    fn is_streaming(&self) -> bool {
        self.stream.as_ref().map_or(false, |sink| !sink.empty())
    }

    fn halt(&mut self) {
        if let Some(sink) = self.stream.take() {
            sink.stop();
        }
    }
}

impl PooledBackend {
    pub fn active_streams(&self) -> usize {
        self.clips.values().filter(|clip| clip.is_streaming()).count()
    }

    pub fn pooled_count(&self) -> usize {
        self.clips.len()
    }
}

impl Backend for PooledBackend {
    type Handle = PooledSound;

    fn open(config: &SoundConfig, output: OutputTarget) -> Result<Self, SoundSystemError> {
        config.validate()?;
        Ok(Self {
            output,
            resolver: ResourceResolver::new(&config.asset_dir, config.extensions.clone()),
            max_streams: config.max_streams,
            next_id: 1,
            clips: HashMap::new(),
        })
    }

    fn prepare(&mut self, name: &str) -> Result<PooledSound, SoundSystemError> {
        let path = self
            .resolver
            .resolve(name)
            .ok_or_else(|| SoundSystemError::ResourceNotFound(name.to_string()))?;
        let clip = DecodedClip::decode(&path)?;
        log::debug!(
            "pooled {} ({:?}) as #{}",
            path.display(),
            clip.duration(),
            self.next_id
        );

        let id = self.next_id;
        self.next_id += 1;
        self.clips.insert(
            id,
            PooledClip {
                clip,
                volume: 1.0,
                stream: None,
            },
        );
        Ok(PooledSound { id })
    }

    fn start(&mut self, handle: &mut PooledSound) -> bool {
        match self.clips.get_mut(&handle.id) {
            Some(pooled) => pooled.halt(),
            None => return false,
        }
        let active = self.active_streams();
        if active >= self.max_streams {
            log::debug!("stream limit of {} reached", self.max_streams);
            return false;
        }

        let sink = match self.output.new_sink() {
            Ok(sink) => sink,
            Err(err) => {
                log::warn!("failed to open transport: {}", err);
                return false;
            }
        };
        let Some(pooled) = self.clips.get_mut(&handle.id) else {
            return false;
        };
        sink.set_volume(pooled.volume);
        sink.append(pooled.clip.source(None));
        pooled.stream = Some(sink);
        true
    }

    fn stop_transport(&mut self, handle: &mut PooledSound) {
        if let Some(pooled) = self.clips.get_mut(&handle.id) {
            pooled.halt();
        }
    }

    fn apply_volume(&mut self, handle: &mut PooledSound, level: f32) {
        if let Some(pooled) = self.clips.get_mut(&handle.id) {
            pooled.volume = level;
            if let Some(sink) = pooled.stream.as_ref() {
                sink.set_volume(level);
            }
        }
    }

    fn unload(&mut self, handle: PooledSound) {
        if let Some(mut pooled) = self.clips.remove(&handle.id) {
            pooled.halt();
        }
    }

    fn poll_finished(&mut self, handle: &mut PooledSound) -> bool {
        match self.clips.get_mut(&handle.id) {
            Some(pooled) if pooled.stream.is_some() && !pooled.is_streaming() => {
                pooled.stream = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::*;
    use crate::test_support::write_wav;

    fn backend(dir: &Path, max_streams: usize) -> PooledBackend {
        let config = SoundConfig {
            asset_dir: dir.to_path_buf(),
            max_streams,
            ..SoundConfig::default()
        };
        PooledBackend::open(&config, OutputTarget::Detached).unwrap()
    }

    #[test]
    fn open_rejects_invalid_config() {
        let config = SoundConfig {
            max_streams: 0,
            ..SoundConfig::default()
        };
        assert!(PooledBackend::open(&config, OutputTarget::Detached).is_err());
    }

    #[test]
    fn prepare_assigns_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(dir.path(), "a.wav", &[1, 2]);
        write_wav(dir.path(), "b.wav", &[3, 4]);
        let mut backend = backend(dir.path(), 5);
        let a = backend.prepare("a").unwrap();
        let b = backend.prepare("b.wav").unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.pooled_count(), 2);
    }

    #[test]
    fn prepare_missing_resource() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend(dir.path(), 5);
        let err = backend.prepare("ghost").unwrap_err();
        assert!(matches!(err, SoundSystemError::ResourceNotFound(_)));
        assert_eq!(backend.pooled_count(), 0);
    }

    #[test]
    fn start_and_stop() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(dir.path(), "ding.wav", &[1, 2, 3]);
        let mut backend = backend(dir.path(), 5);
        let mut ding = backend.prepare("ding").unwrap();

        assert!(backend.start(&mut ding));
        assert_eq!(backend.active_streams(), 1);
        // restarting keeps a single transport
        assert!(backend.start(&mut ding));
        assert_eq!(backend.active_streams(), 1);

        backend.stop_transport(&mut ding);
        assert_eq!(backend.active_streams(), 0);
        assert!(!backend.poll_finished(&mut ding));
    }

    #[test]
    fn stream_limit() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(dir.path(), "a.wav", &[1, 2]);
        write_wav(dir.path(), "b.wav", &[3, 4]);
        let mut backend = backend(dir.path(), 1);
        let mut a = backend.prepare("a").unwrap();
        let mut b = backend.prepare("b").unwrap();

        assert!(backend.start(&mut a));
        assert!(!backend.start(&mut b));
        backend.stop_transport(&mut a);
        assert!(backend.start(&mut b));
    }

    #[test]
    fn volume_applies_to_running_and_future_streams() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(dir.path(), "ding.wav", &[1, 2, 3]);
        let mut backend = backend(dir.path(), 5);
        let mut ding = backend.prepare("ding").unwrap();

        assert!(backend.start(&mut ding));
        backend.apply_volume(&mut ding, 0.5);
        let stream_volume = |backend: &PooledBackend| {
            backend.clips[&1].stream.as_ref().map(|sink| sink.volume())
        };
        assert_eq!(stream_volume(&backend), Some(0.5));

        backend.stop_transport(&mut ding);
        assert!(backend.start(&mut ding));
        assert_eq!(stream_volume(&backend), Some(0.5));
    }

    #[test]
    fn drained_stream_is_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(dir.path(), "ding.wav", &[1, 2, 3]);
        let mut backend = backend(dir.path(), 1);
        let mut ding = backend.prepare("ding").unwrap();
        assert!(backend.start(&mut ding));
        assert!(!backend.poll_finished(&mut ding));

        // Swap in an idle sink whose output we keep, and pull it past the clip's end the way the
        // mixer would
        let (sink, mut output) = Sink::new_idle();
        let pooled = backend.clips.get_mut(&ding.id).unwrap();
        sink.append(pooled.clip.source(None));
        pooled.stream = Some(sink);
        assert_eq!(backend.active_streams(), 1);
        output.by_ref().take(1000).for_each(drop);

        assert_eq!(backend.active_streams(), 0);
        assert!(backend.poll_finished(&mut ding));
        assert!(!backend.poll_finished(&mut ding));
        // the freed slot can be used again
        assert!(backend.start(&mut ding));
    }

    #[test]
    fn unload_frees_clip() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(dir.path(), "ding.wav", &[1, 2, 3]);
        let mut backend = backend(dir.path(), 5);
        let mut ding = backend.prepare("ding").unwrap();
        assert!(backend.start(&mut ding));

        backend.unload(ding);
        assert_eq!(backend.pooled_count(), 0);
        assert_eq!(backend.active_streams(), 0);
    }
}
