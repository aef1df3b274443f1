//! Waveform capture export
//!
//! Renders a stretch of the synthesized output through the engine and
//! writes it to disk for offline inspection: a 16-bit mono WAV at the
//! tick rate, or a CSV of raw tick/code pairs for plotting.

use crate::dac::DacCode;
use crate::synth::frequency::TICK_RATE_HZ;
use crate::synth::Dco;
use crate::{FuncgenError, Result};
use std::path::Path;

/// Render `ticks` samples and write them as a WAV file
///
/// The file is mono, 16-bit, with the sample rate set to the engine's
/// tick rate so one tick maps to one audio frame.
pub fn export_wav<P: AsRef<Path>>(dco: &mut Dco, ticks: usize, path: P) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: TICK_RATE_HZ,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path.as_ref(), spec)
        .map_err(|e| FuncgenError::ExportError(format!("Failed to create WAV file: {e}")))?;

    for _ in 0..ticks {
        dco.clock();
        let sample = dco.last_code().to_sample();
        let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| FuncgenError::ExportError(format!("Failed to write sample: {e}")))?;
    }

    writer
        .finalize()
        .map_err(|e| FuncgenError::ExportError(format!("Failed to finalize WAV file: {e}")))?;

    Ok(())
}

/// Render `ticks` samples and write them as CSV rows
///
/// Columns: tick index, raw 12-bit DAC code, normalized sample.
pub fn export_csv<P: AsRef<Path>>(dco: &mut Dco, ticks: usize, path: P) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())
        .map_err(|e| FuncgenError::ExportError(format!("Failed to create CSV file: {e}")))?;

    writer
        .write_record(["tick", "code", "sample"])
        .map_err(|e| FuncgenError::ExportError(format!("Failed to write CSV header: {e}")))?;

    for tick in 0..ticks {
        dco.clock();
        let code: DacCode = dco.last_code();
        writer
            .write_record([
                tick.to_string(),
                code.get().to_string(),
                format!("{:.6}", code.to_sample()),
            ])
            .map_err(|e| FuncgenError::ExportError(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| FuncgenError::ExportError(format!("Failed to flush CSV file: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::params::SharedParams;

    #[test]
    fn test_wav_export_writes_expected_frame_count() {
        let mut dco = Dco::new(SharedParams::default());
        let dir = std::env::temp_dir();
        let path = dir.join("funcgen_test_capture.wav");

        export_wav(&mut dco, 270, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, TICK_RATE_HZ);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 270);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_csv_export_has_header_and_rows() {
        let mut dco = Dco::new(SharedParams::default());
        let dir = std::env::temp_dir();
        let path = dir.join("funcgen_test_capture.csv");

        export_csv(&mut dco, 10, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("tick,code,sample"));
        assert_eq!(lines.count(), 10);
        std::fs::remove_file(&path).ok();
    }
}
