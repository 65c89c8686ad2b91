use std::env;
use std::thread;
use std::time::Duration;

use named_sound::{SoundConfig, SoundSystem};

fn main() {
    env_logger::init();

    // optional path to a TOML config, otherwise sounds are looked up in ./sounds
    let config = match env::args().nth(1) {
        Some(path) => SoundConfig::load(path).unwrap(),
        None => SoundConfig::default(),
    };
    // try initialize sound system with default device
    let sound_system_handle = SoundSystem::run(config).unwrap();

    sound_system_handle.load("test.wav");
    sound_system_handle.play("test.wav", |started| {
        println!("playback started: {}", started);
    });
    thread::sleep(Duration::from_millis(500));
    // turn it down mid-playback
    sound_system_handle.set_volume("test.wav", 0.5);
    thread::sleep(Duration::from_millis(500));
    sound_system_handle.stop("test.wav");
    println!("after stop: {:?}", sound_system_handle.status("test.wav"));

    // replays keep the volume set above
    let started = sound_system_handle.play_receipt("test.wav").wait();
    println!("replay started: {}", started);
    thread::sleep(Duration::from_secs(3));

    sound_system_handle.release("test.wav");
    sound_system_handle.shutdown();
}
