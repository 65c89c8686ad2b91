use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, Source};
use rtrb::Producer;

use crate::SoundSystemError;

/// A clip decoded completely into memory. Cloning shares the samples.
#[derive(Clone, Debug)]
pub(crate) struct DecodedClip {
    samples: Arc<[i16]>,
    channels: u16,
    sample_rate: u32,
}

impl DecodedClip {
    pub fn decode(path: &Path) -> Result<Self, SoundSystemError> {
        let file = File::open(path).map_err(|e| SoundSystemError::SoundFileErr {
            path: path.to_path_buf(),
            source: e,
        })?;
        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|e| SoundSystemError::DecodeErr {
                path: path.to_path_buf(),
                source: e,
            })?;
        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<i16> = decoder.collect();
        if samples.is_empty() || channels == 0 || sample_rate == 0 {
            return Err(SoundSystemError::EmptyClip(path.to_path_buf()));
        }

        Ok(Self {
            samples: samples.into(),
            channels,
            sample_rate,
        })
    }

    /// Source playing the clip from its start. `finished` receives a single `()` once the last
    /// sample was handed to the mixer.
    pub fn source(&self, finished: Option<Producer<()>>) -> ClipSource {
        ClipSource {
            samples: Arc::clone(&self.samples),
            position: 0,
            channels: self.channels,
            sample_rate: self.sample_rate,
            finished,
        }
    }

    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() as u64 / u64::from(self.channels);
        Duration::from_micros(frames * 1_000_000 / u64::from(self.sample_rate))
    }
}

pub(crate) struct ClipSource {
    samples: Arc<[i16]>,
    position: usize,
    channels: u16,
    sample_rate: u32,
    finished: Option<Producer<()>>,
}

impl Iterator for ClipSource {
    type Item = i16;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(&sample) = self.samples.get(self.position) {
            self.position += 1;
            return Some(sample);
        }
        if let Some(mut finished) = self.finished.take() {
            // Capacity is one and nothing else pushes, so this cannot fail
            let _ = finished.push(());
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl Source for ClipSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.samples.len() - self.position)
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let frames = self.samples.len() as u64 / u64::from(self.channels);
        Some(Duration::from_micros(
            frames * 1_000_000 / u64::from(self.sample_rate),
        ))
    }
}
