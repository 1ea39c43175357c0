//! Fixed binary frame layout shared by both directions:
//! `[2 reserved bytes][2 byte opcode][2 byte payload length][payload]`,
//! all integers big-endian.

use crate::DecodeError;

/// Reserved leading bytes carried by every outbound frame.
pub const MARKER: [u8; 2] = [0x00, 0x06];

/// Bytes needed to read the opcode.
pub const OPCODE_LEN: usize = 4;

/// Marker, opcode and payload length.
pub const HEADER_LEN: usize = 6;

/// Pre-encoded heartbeat frame. It carries no length field.
pub const HEARTBEAT: [u8; 4] = [0x00, 0x06, 0x00, 0x00];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Heartbeat,
    Login,
    Data,
    Other(u16),
}

impl Opcode {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::Heartbeat,
            2 => Self::Login,
            3 => Self::Data,
            other => Self::Other(other),
        }
    }

    pub fn as_u16(self) -> u16 {
        match self {
            Self::Heartbeat => 0,
            Self::Login => 2,
            Self::Data => 3,
            Self::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub opcode: Opcode,
    /// Length as declared on the wire. Not checked against the bytes present.
    pub declared_len: u16,
}

/// Read the opcode and declared payload length from the start of a frame.
///
/// Decoding is tolerant: a frame that ends before the length field reports a
/// declared length of zero.
pub fn decode_header(bytes: &[u8]) -> Result<FrameHeader, DecodeError> {
    if bytes.len() < OPCODE_LEN {
        return Err(DecodeError::TooShort {
            len: bytes.len(),
            needed: OPCODE_LEN,
        });
    }

    let opcode = Opcode::from_u16(u16::from_be_bytes([bytes[2], bytes[3]]));
    let declared_len = match bytes.get(4..HEADER_LEN) {
        Some(len) => u16::from_be_bytes([len[0], len[1]]),
        None => 0,
    };

    Ok(FrameHeader {
        opcode,
        declared_len,
    })
}

/// Build a frame from an opcode and payload.
///
/// The length field is 16 bits wide, so `payload` must be at most
/// `u16::MAX` bytes. Release builds truncate the declared length of a longer
/// payload.
pub fn encode(opcode: Opcode, payload: &[u8]) -> Vec<u8> {
    debug_assert!(
        payload.len() <= u16::MAX as usize,
        "payload too long for a frame: {} bytes",
        payload.len()
    );

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&MARKER);
    frame.extend_from_slice(&opcode.as_u16().to_be_bytes());
    frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}
