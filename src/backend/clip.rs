use rodio::Sink;
use rtrb::{Consumer, RingBuffer};

use crate::backend::resolve::ResourceResolver;
use crate::backend::sound::DecodedClip;
use crate::backend::{Backend, OutputTarget};
use crate::config::SoundConfig;
use crate::SoundSystemError;

/// Backend where every loaded clip is its own player object. Nothing is shared between clips
/// apart from the output they play to.
pub struct ClipBackend {
    output: OutputTarget,
    resolver: ResourceResolver,
}

/// A decoded clip together with its transport.
pub struct ClipPlayer {
    clip: DecodedClip,
    volume: f32,
    transport: Option<Transport>,
}

struct Transport {
    sink: Sink,
    // Receives `()` from the audio thread when the source ran dry
    finished: Consumer<()>,
}

impl ClipPlayer {
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_some()
    }

    fn halt(&mut self) {
        if let Some(transport) = self.transport.take() {
            transport.sink.stop();
        }
    }
}

impl Backend for ClipBackend {
    type Handle = ClipPlayer;

    fn open(config: &SoundConfig, output: OutputTarget) -> Result<Self, SoundSystemError> {
        config.validate()?;
        Ok(Self {
            output,
            resolver: ResourceResolver::new(&config.asset_dir, config.extensions.clone()),
        })
    }

    fn prepare(&mut self, name: &str) -> Result<ClipPlayer, SoundSystemError> {
        let path = self
            .resolver
            .resolve(name)
            .ok_or_else(|| SoundSystemError::ResourceNotFound(name.to_string()))?;
        let clip = DecodedClip::decode(&path)?;
        log::debug!("prepared {} ({:?})", path.display(), clip.duration());
        Ok(ClipPlayer {
            clip,
            volume: 1.0,
            transport: None,
        })
    }

    fn start(&mut self, player: &mut ClipPlayer) -> bool {
        player.halt();
        let sink = match self.output.new_sink() {
            Ok(sink) => sink,
            Err(err) => {
                log::warn!("failed to open transport: {}", err);
                return false;
            }
        };
        let (producer, consumer) = RingBuffer::new(1);
        sink.set_volume(player.volume);
        sink.append(player.clip.source(Some(producer)));
        player.transport = Some(Transport {
            sink,
            finished: consumer,
        });
        true
    }

    fn stop_transport(&mut self, player: &mut ClipPlayer) {
        player.halt();
    }

    fn apply_volume(&mut self, player: &mut ClipPlayer, level: f32) {
        player.volume = level;
        if let Some(transport) = player.transport.as_ref() {
            transport.sink.set_volume(level);
        }
    }

    fn unload(&mut self, mut player: ClipPlayer) {
        player.halt();
    }

    fn poll_finished(&mut self, player: &mut ClipPlayer) -> bool {
        let finished = match player.transport.as_mut() {
            Some(transport) => transport.finished.pop().is_ok(),
            None => false,
        };
        if finished {
            player.transport = None;
        }
        finished
    }
}
