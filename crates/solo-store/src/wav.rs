//! Minimal RIFF/WAVE codec for 16-bit PCM.
//!
//! The parser walks the chunk list, skipping unknown chunks by their
//! declared size, and stops at the `data` chunk. Only what the instrument
//! can play is accepted: PCM, 16-bit, one or two channels. The writer emits
//! the canonical 44-byte header.

use thiserror::Error;

use crate::blockstore::StoreFile;
use crate::error::StoreError;

/// Size of the canonical header the writer produces.
pub const WAV_HEADER_BYTES: u64 = 44;

#[derive(Error, Debug)]
pub enum WavError {
    #[error("not a RIFF/WAVE file")]
    BadMagic,

    #[error("unsupported audio format tag {0}")]
    UnsupportedFormat(u16),

    #[error("unsupported bit depth {0}")]
    UnsupportedBitDepth(u16),

    #[error("unsupported channel count {0}")]
    UnsupportedChannels(u16),

    #[error("no fmt chunk before data")]
    MissingFmt,

    #[error("no data chunk")]
    MissingData,

    #[error("file ends mid-chunk")]
    Truncated,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = core::result::Result<T, WavError>;

/// Everything playback needs to know about a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Byte offset of the first audio frame.
    pub data_offset: u64,
    /// Declared length of the data chunk in bytes.
    pub data_len: u32,
}

impl WavInfo {
    #[inline]
    pub fn block_align(&self) -> u32 {
        u32::from(self.channels) * 2
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        (self.data_len / self.block_align()) as usize
    }
}

enum Fill {
    Full,
    Eof,
    Short,
}

fn fill<F: StoreFile>(file: &mut F, buf: &mut [u8], cursor: &mut u64) -> Result<Fill> {
    let mut got = 0;
    while got < buf.len() {
        let n = file.read(&mut buf[got..])?;
        if n == 0 {
            break;
        }
        got += n;
    }
    *cursor += got as u64;
    Ok(if got == buf.len() {
        Fill::Full
    } else if got == 0 {
        Fill::Eof
    } else {
        Fill::Short
    })
}

/// Reads the header chunks up to and including the `data` chunk header.
/// Leaves the file positioned at the first audio byte.
pub fn parse_header<F: StoreFile>(file: &mut F) -> Result<WavInfo> {
    let mut cursor = 0u64;

    let mut riff = [0u8; 12];
    match fill(file, &mut riff, &mut cursor)? {
        Fill::Full => {}
        _ => return Err(WavError::Truncated),
    }
    if &riff[0..4] != b"RIFF" || &riff[8..12] != b"WAVE" {
        return Err(WavError::BadMagic);
    }

    let mut fmt: Option<(u16, u32)> = None;
    loop {
        let mut header = [0u8; 8];
        match fill(file, &mut header, &mut cursor)? {
            Fill::Full => {}
            Fill::Eof => {
                // Clean end at a chunk boundary: the file simply lacks the
                // chunk we were still looking for.
                return Err(if fmt.is_none() {
                    WavError::MissingFmt
                } else {
                    WavError::MissingData
                });
            }
            Fill::Short => return Err(WavError::Truncated),
        }
        let id = [header[0], header[1], header[2], header[3]];
        let size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        match &id {
            b"fmt " => {
                if size < 16 {
                    return Err(WavError::Truncated);
                }
                let mut body = [0u8; 16];
                match fill(file, &mut body, &mut cursor)? {
                    Fill::Full => {}
                    _ => return Err(WavError::Truncated),
                }
                let format = u16::from_le_bytes([body[0], body[1]]);
                if format != 1 {
                    return Err(WavError::UnsupportedFormat(format));
                }
                let channels = u16::from_le_bytes([body[2], body[3]]);
                if !(1..=2).contains(&channels) {
                    return Err(WavError::UnsupportedChannels(channels));
                }
                let sample_rate = u32::from_le_bytes([body[4], body[5], body[6], body[7]]);
                let bits = u16::from_le_bytes([body[14], body[15]]);
                if bits != 16 {
                    return Err(WavError::UnsupportedBitDepth(bits));
                }
                // Oversized fmt chunks carry an extension; skip the tail.
                cursor += u64::from(size - 16);
                file.seek(cursor)?;
                fmt = Some((channels, sample_rate));
            }
            b"data" => {
                let (channels, sample_rate) = fmt.ok_or(WavError::MissingFmt)?;
                return Ok(WavInfo {
                    channels,
                    sample_rate,
                    bits_per_sample: 16,
                    data_offset: cursor,
                    data_len: size,
                });
            }
            _ => {
                // Unknown chunk: trust the declared size. No pad byte.
                cursor += u64::from(size);
                file.seek(cursor)?;
            }
        }
    }
}

/// Writes the canonical 44-byte PCM header at the current position.
pub fn write_header<F: StoreFile>(
    file: &mut F,
    channels: u16,
    sample_rate: u32,
    data_bytes: u32,
) -> Result<()> {
    let block_align = channels * 2;
    let byte_rate = sample_rate * u32::from(block_align);

    let mut h = [0u8; WAV_HEADER_BYTES as usize];
    h[0..4].copy_from_slice(b"RIFF");
    h[4..8].copy_from_slice(&(36 + data_bytes).to_le_bytes());
    h[8..12].copy_from_slice(b"WAVE");
    h[12..16].copy_from_slice(b"fmt ");
    h[16..20].copy_from_slice(&16u32.to_le_bytes());
    h[20..22].copy_from_slice(&1u16.to_le_bytes());
    h[22..24].copy_from_slice(&channels.to_le_bytes());
    h[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    h[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    h[32..34].copy_from_slice(&block_align.to_le_bytes());
    h[34..36].copy_from_slice(&16u16.to_le_bytes());
    h[36..40].copy_from_slice(b"data");
    h[40..44].copy_from_slice(&data_bytes.to_le_bytes());
    file.write_all(&h)?;
    Ok(())
}
