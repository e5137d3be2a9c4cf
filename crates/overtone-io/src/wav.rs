//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.len()) / u64::from(spec.channels.max(1));

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs: num_frames as f64 / f64::from(spec.sample_rate),
        format: match spec.sample_format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        },
    })
}

/// WAV file specification.
///
/// 32-bit files are written as IEEE float, every other depth as integer PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// A stereo buffer held as two planar channels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Create new stereo samples from left and right channels.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        debug_assert_eq!(left.len(), right.len(), "Channels must have same length");
        Self { left, right }
    }

    /// Create stereo samples from mono by duplicating to both channels.
    pub fn from_mono(mono: Vec<f32>) -> Self {
        Self {
            left: mono.clone(),
            right: mono,
        }
    }

    /// Get the number of samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Check if the buffers are empty.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Convert to interleaved format (L, R, L, R, ...).
    pub fn to_interleaved(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(&self.right)
            .flat_map(|(&l, &r)| [l, r])
            .collect()
    }

    /// Split frames of `channels` interleaved samples into left/right.
    ///
    /// Mono is duplicated; beyond two channels only the first two are kept.
    pub fn from_interleaved(interleaved: &[f32], channels: usize) -> Self {
        match channels {
            0 => Self::default(),
            1 => Self::from_mono(interleaved.to_vec()),
            _ => {
                let (left, right) = interleaved
                    .chunks_exact(channels)
                    .map(|frame| (frame[0], frame[1]))
                    .unzip();
                Self { left, right }
            }
        }
    }

    /// Peak absolute sample value across both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(&self.right)
            .fold(0.0f32, |peak, s| peak.max(s.abs()))
    }
}

/// Read a WAV file as stereo along with its spec.
///
/// Mono files are expanded to stereo by duplicating to both channels.
/// Files with more than 2 channels use only the first two channels.
/// Integer samples are scaled to [-1, 1).
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);

    let interleaved: Vec<f32> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            if !(8..=32).contains(&spec.bits_per_sample) {
                return Err(Error::UnsupportedFormat(format!(
                    "{}-bit integer PCM",
                    spec.bits_per_sample
                )));
            }
            let scale = int_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let samples = StereoSamples::from_interleaved(&interleaved, usize::from(spec.channels));
    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        frames = samples.len(),
        "read wav"
    );
    Ok((samples, spec))
}

/// Write stereo samples to a WAV file.
///
/// The channel count in `spec` is ignored; the file is always stereo.
/// Integer formats clip to full scale.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    spec: WavSpec,
) -> Result<()> {
    let spec = WavSpec { channels: 2, ..spec };
    if spec.bits_per_sample != 32 && !matches!(spec.bits_per_sample, 16 | 24) {
        return Err(Error::UnsupportedFormat(format!(
            "{}-bit output",
            spec.bits_per_sample
        )));
    }

    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    if spec.bits_per_sample == 32 {
        for (l, r) in samples.left.iter().zip(&samples.right) {
            writer.write_sample(*l)?;
            writer.write_sample(*r)?;
        }
    } else {
        let scale = int_scale(spec.bits_per_sample);
        for (l, r) in samples.left.iter().zip(&samples.right) {
            writer.write_sample(to_int(*l, scale))?;
            writer.write_sample(to_int(*r, scale))?;
        }
    }

    writer.finalize()?;
    Ok(())
}

fn int_scale(bits: u16) -> f32 {
    (1i64 << (bits - 1)) as f32
}

fn to_int(sample: f32, scale: f32) -> i32 {
    (sample * scale).round().clamp(-scale, scale - 1.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn test_signal() -> StereoSamples {
        let left: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin() * 0.9).collect();
        let right: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).cos() * 0.9).collect();
        StereoSamples::new(left, right)
    }

    #[test]
    fn test_stereo_roundtrip_f32() {
        let samples = test_signal();
        let spec = WavSpec::default();

        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, spec).unwrap();

        let (loaded, loaded_spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(loaded_spec, spec);
        assert_eq!(loaded, samples);
    }

    #[test]
    fn test_stereo_roundtrip_i16_and_i24() {
        let samples = test_signal();
        for (bits, tolerance) in [(16, 1e-4), (24, 1e-6)] {
            let spec = WavSpec {
                channels: 2,
                sample_rate: 44100,
                bits_per_sample: bits,
            };
            let file = NamedTempFile::new().unwrap();
            write_wav_stereo(file.path(), &samples, spec).unwrap();

            let (loaded, loaded_spec) = read_wav_stereo(file.path()).unwrap();
            assert_eq!(loaded_spec.bits_per_sample, bits);
            assert_eq!(loaded.len(), samples.len());
            for (a, b) in samples.left.iter().zip(&loaded.left) {
                assert!((a - b).abs() < tolerance, "{bits}-bit: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_full_scale_clips_in_integer_formats() {
        let samples = StereoSamples::new(vec![1.0, -1.0, 2.0], vec![0.0; 3]);
        let spec = WavSpec {
            bits_per_sample: 16,
            ..WavSpec::default()
        };
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, spec).unwrap();

        let (loaded, _) = read_wav_stereo(file.path()).unwrap();
        assert!((loaded.left[0] - 32767.0 / 32768.0).abs() < 1e-6);
        assert_eq!(loaded.left[1], -1.0);
        assert!(loaded.left[2] < 1.0);
    }

    #[test]
    fn test_mono_file_reads_as_stereo() {
        let file = NamedTempFile::new().unwrap();
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(file.path(), spec).unwrap();
        for i in 0..100 {
            writer.write_sample(i as f32 / 100.0).unwrap();
        }
        writer.finalize().unwrap();

        let (stereo, loaded_spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(loaded_spec.channels, 1);
        assert_eq!(stereo.left, stereo.right);
        assert_eq!(stereo.len(), 100);

        let info = read_wav_info(file.path()).unwrap();
        assert_eq!(info.num_frames, 100);
        assert_eq!(info.format, WavFormat::IeeeFloat);
    }

    #[test]
    fn test_interleave_helpers() {
        let stereo = StereoSamples::new(vec![1.0, 3.0], vec![2.0, 4.0]);
        assert_eq!(stereo.to_interleaved(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(StereoSamples::from_interleaved(&[1.0, 2.0, 3.0, 4.0], 2), stereo);

        let quad = StereoSamples::from_interleaved(&[1.0, 2.0, 9.0, 9.0, 3.0, 4.0, 9.0, 9.0], 4);
        assert_eq!(quad, stereo);
        assert_eq!(stereo.peak(), 4.0);
    }

    #[test]
    fn test_unsupported_output_depth() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            bits_per_sample: 12,
            ..WavSpec::default()
        };
        assert!(matches!(
            write_wav_stereo(file.path(), &test_signal(), spec),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
