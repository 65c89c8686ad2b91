use named_sound::{SoundConfig, SoundSystem, SoundSystemHandle};
use tempfile::TempDir;

mod wav;

pub use wav::write_wav;

/// Headless config pointing at a fresh asset directory holding `ding.wav` and `pop.wav`.
pub fn headless_config() -> (SoundConfig, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    write_wav(dir.path(), "ding.wav", &[0, 1000, -1000, 500]);
    write_wav(dir.path(), "pop.wav", &[0, 200]);
    let config = SoundConfig {
        asset_dir: dir.path().to_path_buf(),
        headless: true,
        ..SoundConfig::default()
    };
    (config, dir)
}

pub fn headless_system() -> (SoundSystemHandle, TempDir) {
    let (config, dir) = headless_config();
    (SoundSystem::run(config).unwrap(), dir)
}
