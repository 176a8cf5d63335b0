use std::{
    fs::File,
    io::{
        BufWriter,
        Seek,
        Write,
    },
    path::Path,
};

use crate::synth::Pcm;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("wav sink error")]
    Hound(#[from] hound::Error),
    #[error("no samples to write")]
    Empty,
}

/// Mono 16-bit linear PCM.
#[inline]
pub fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Writes `pcm` as a WAV file to `writer`.
pub fn write_wav_to<W>(writer: W, pcm: &Pcm) -> Result<(), Error>
where
    W: Write + Seek,
{
    if pcm.is_empty() {
        tracing::error!("no samples to write");
        return Err(Error::Empty);
    }
    hound::WavWriter::new(writer, wav_spec(pcm.sample_rate()))
        .map_err(Error::from)
        .and_then(|writer| write_samples(writer, pcm))
        .inspect_err(|error| tracing::error!(?error, "could not write wav"))
}

/// Writes `pcm` as a WAV file to `path`.
pub fn write_wav(path: impl AsRef<Path>, pcm: &Pcm) -> Result<(), Error> {
    let path = path.as_ref();
    if pcm.is_empty() {
        tracing::error!(path = %path.display(), "no samples to write");
        return Err(Error::Empty);
    }
    hound::WavWriter::<BufWriter<File>>::create(path, wav_spec(pcm.sample_rate()))
        .map_err(Error::from)
        .and_then(|writer| write_samples(writer, pcm))
        .inspect_err(|error| {
            tracing::error!(path = %path.display(), ?error, "could not write wav");
        })?;
    tracing::info!(path = %path.display(), num_samples = pcm.len(), "wrote wav file");
    Ok(())
}

fn write_samples<W>(mut writer: hound::WavWriter<W>, pcm: &Pcm) -> Result<(), Error>
where
    W: Write + Seek,
{
    for sample in pcm.samples() {
        writer.write_sample(*sample)?;
    }
    // patches the riff and data chunk sizes
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::{
        sink::file::{
            Error,
            write_wav,
            write_wav_to,
        },
        symbol::{
            AudioSymbol,
            SymbolSequence,
        },
        synth::{
            Pcm,
            render,
        },
    };

    fn pcm() -> Pcm {
        let symbols = [
            AudioSymbol::silence(0.001).unwrap(),
            AudioSymbol::tone(0.01, 1900.0, 1.0, 0.0).unwrap(),
        ]
        .into_iter()
        .collect::<SymbolSequence>();
        render(&symbols, 96000).unwrap()
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn it_writes_a_44_byte_pcm_header() {
        let pcm = pcm();
        let num_samples = pcm.len();
        assert_eq!(num_samples, 96 + 960);

        let mut cursor = Cursor::new(Vec::new());
        write_wav_to(&mut cursor, &pcm).unwrap();
        let bytes = cursor.into_inner();

        assert_eq!(bytes.len(), 44 + 2 * num_samples);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32_at(&bytes, 4) as usize, 36 + 2 * num_samples);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32_at(&bytes, 16), 16);
        // linear pcm, mono
        assert_eq!(u16_at(&bytes, 20), 1);
        assert_eq!(u16_at(&bytes, 22), 1);
        assert_eq!(u32_at(&bytes, 24), 96000);
        assert_eq!(u32_at(&bytes, 28), 96000 * 2);
        assert_eq!(u16_at(&bytes, 32), 2);
        assert_eq!(u16_at(&bytes, 34), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32_at(&bytes, 40) as usize, 2 * num_samples);

        let data = bytes[44..]
            .chunks_exact(2)
            .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
            .collect::<Vec<_>>();
        assert_eq!(data, pcm.samples());
    }

    #[test]
    fn written_file_reads_back() {
        let pcm = pcm();
        let mut cursor = Cursor::new(Vec::new());
        write_wav_to(&mut cursor, &pcm).unwrap();
        cursor.set_position(0);

        let mut reader = hound::WavReader::new(cursor).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 96000);
        assert_eq!(spec.bits_per_sample, 16);

        let samples = reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(samples, pcm.samples());
    }

    #[test]
    fn unwritable_path_is_reported() {
        assert!(matches!(
            write_wav("does-not-exist/output.wav", &pcm()),
            Err(Error::Hound(_))
        ));
    }

    #[test]
    fn empty_pcm_is_rejected() {
        let pcm = Pcm::new(vec![], 96000);
        let mut cursor = Cursor::new(Vec::new());
        assert!(matches!(write_wav_to(&mut cursor, &pcm), Err(Error::Empty)));
        assert!(cursor.into_inner().is_empty());
    }
}
