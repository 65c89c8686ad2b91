use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use rodio::OutputStream;

use crate::backend::{Backend, DefaultBackend, OutputTarget};
use crate::command::SoundCommand;
use crate::config::SoundConfig;
use crate::handle::SoundSystemHandle;
use crate::SoundSystemError;

pub use registry::{SoundRegistry, SoundState, SoundStatus, DEFAULT_VOLUME};

mod registry;

/// The sound system. It runs an event loop on its own thread, owns the audio output and the
/// registry of loaded sounds, and executes the commands sent by [`SoundSystemHandle`]s in the
/// order they arrive.
pub struct SoundSystem<B: Backend = DefaultBackend> {
    command_receiver: Receiver<SoundCommand>,
    registry: SoundRegistry<B>,
    poll_interval: Duration,
    _output_stream: Option<OutputStream>,
}

impl SoundSystem<DefaultBackend> {
    /// Initialize and run the sound system with the backend selected at build time. Spawns a
    /// thread and runs the event loop on it. Returns either [`SoundSystemHandle`] or some sort of
    /// initialization error.
    pub fn run(config: SoundConfig) -> Result<SoundSystemHandle, SoundSystemError> {
        Self::spawn(config)
    }
}

impl<B: Backend + 'static> SoundSystem<B> {
    /// Like [`SoundSystem::run`], for an explicitly chosen backend.
    pub fn spawn(config: SoundConfig) -> Result<SoundSystemHandle, SoundSystemError> {
        config.validate()?;
        let (command_sender, command_receiver) = mpsc::channel::<SoundCommand>();
        let (init_sender, init_receiver) = mpsc::channel::<Result<(), SoundSystemError>>();

        let event_loop = thread::Builder::new()
            .name("sound-system".to_string())
            .spawn(move || match Self::init(config, command_receiver) {
                Ok(system) => {
                    let _ = init_sender.send(Ok(()));
                    system.run_event_loop();
                }
                Err(e) => {
                    let _ = init_sender.send(Err(e));
                }
            })
            .map_err(SoundSystemError::ThreadErr)?
            .thread()
            .id();

        init_receiver
            .recv()
            .map_err(|_| SoundSystemError::Startup)??;
        Ok(SoundSystemHandle {
            command_sender,
            event_loop,
        })
    }

    /// Open the output and the backend.
    fn init(
        config: SoundConfig,
        command_receiver: Receiver<SoundCommand>,
    ) -> Result<Self, SoundSystemError> {
        // OutputStream must be created on the event loop thread and stay there
        let (output_stream, output) = if config.headless {
            (None, OutputTarget::Detached)
        } else {
            let (stream, stream_handle) = OutputStream::try_default()?;
            (Some(stream), OutputTarget::Device(stream_handle))
        };
        let backend = B::open(&config, output)?;
        log::info!(
            "sound system started (assets: {}, headless: {})",
            config.asset_dir.display(),
            config.headless
        );

        Ok(Self {
            command_receiver,
            registry: SoundRegistry::new(backend, config.clamp_volume),
            poll_interval: config.poll_interval(),
            _output_stream: output_stream,
        })
    }

    /// Main event loop. Responsible for:
    ///
    /// - Processing incoming commands
    /// - Moving sounds that finished on their own back to `Loaded`
    /// - Releasing everything still loaded once the system shuts down
    fn run_event_loop(mut self) {
        loop {
            let shutdown = self.process_incoming_commands();
            if shutdown {
                break;
            }
            self.registry.reconcile();
        }
        log::info!("sound system stopping, releasing {} sounds", self.registry.len());
        self.registry.release_all();
    }

    /// Waits up to one poll interval for commands and executes everything that arrived. Returns
    /// true if system should shut down, false otherwise.
    fn process_incoming_commands(&mut self) -> bool {
        let mut next = self.command_receiver.recv_timeout(self.poll_interval);
        loop {
            match next {
                Ok(command) => {
                    if self.execute(command) {
                        return true;
                    }
                }
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return true,
            }
            next = self.command_receiver.try_recv().map_err(|err| match err {
                TryRecvError::Empty => RecvTimeoutError::Timeout,
                TryRecvError::Disconnected => RecvTimeoutError::Disconnected,
            });
        }
    }

    /// Returns true for [`SoundCommand::Shutdown`].
    fn execute(&mut self, command: SoundCommand) -> bool {
        match command {
            SoundCommand::Load(name) => self.registry.load(&name),
            SoundCommand::Play { name, completion } => self.registry.play(&name, completion),
            SoundCommand::Stop(name) => self.registry.stop(&name),
            SoundCommand::SetVolume { name, level } => self.registry.set_volume(&name, level),
            SoundCommand::Release(name) => self.registry.release(&name),
            SoundCommand::Status { name, reply } => {
                let _ = reply.send(self.registry.status(&name));
            }
            SoundCommand::Shutdown => return true,
        }
        false
    }
}
