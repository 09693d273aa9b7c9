//! Loading recordings from 16-bit PCM WAV files.
//!
//! Only uncompressed integer WAV with 16 bits per sample is accepted. Anything
//! else (compressed formats, other containers) must be converted beforehand,
//! for example with `ffmpeg -i in.m4a -c:a pcm_s16le out.wav`.

use std::path::Path;

use tracing::debug;

use crate::{ClockRecording, EscapementError, EscapementResult};

impl From<hound::Error> for EscapementError {
    fn from(err: hound::Error) -> Self {
        EscapementError::Wav(err.to_string())
    }
}

/// Read one channel of a 16-bit PCM WAV file.
///
/// Channel numbers start at 0. Returns a parameter error for a channel the
/// file does not have, and [`EscapementError::Wav`] for unreadable files or
/// unsupported sample formats.
pub fn read_wav_channel(path: impl AsRef<Path>, channel: usize) -> EscapementResult<ClockRecording> {
    let path = path.as_ref();
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(EscapementError::Wav(format!(
            "unsupported sample format in '{}': {:?} {}-bit, only 16-bit integer PCM is supported",
            path.display(),
            spec.sample_format,
            spec.bits_per_sample
        )));
    }

    let interleaved = reader
        .samples::<i16>()
        .collect::<Result<Vec<i16>, _>>()?;
    debug!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        frames = interleaved.len() / usize::from(spec.channels.max(1)),
        "read wav file"
    );

    ClockRecording::from_interleaved(
        &interleaved,
        usize::from(spec.channels),
        channel,
        spec.sample_rate,
    )
}
