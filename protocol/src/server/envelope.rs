use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::DecodeError;

/// Distance from the offset field's value to the first compressed byte.
pub const ENVELOPE_BASE: usize = 10;

const OFFSET_FIELD: std::ops::Range<usize> = 4..6;

/// Inflate the compressed block of a data frame.
///
/// The big-endian `u16` at byte 4 of the frame, plus [`ENVELOPE_BASE`], is
/// where the zlib stream starts; it runs to the end of the frame. The
/// inflated bytes are returned untouched, sub-header included.
pub fn decompress(frame: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let offset = frame
        .get(OFFSET_FIELD)
        .map(|field| u16::from_be_bytes([field[0], field[1]]))
        .ok_or(DecodeError::TooShort {
            len: frame.len(),
            needed: OFFSET_FIELD.end,
        })?;

    let start = offset as usize + ENVELOPE_BASE;
    if start > frame.len() {
        return Err(DecodeError::OffsetOutOfBounds {
            start,
            len: frame.len(),
        });
    }

    let mut inflated = Vec::new();
    ZlibDecoder::new(&frame[start..]).read_to_end(&mut inflated)?;
    Ok(inflated)
}
