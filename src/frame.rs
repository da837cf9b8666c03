//! CRC trailers on byte frames.
//!
//! A sealed frame is the payload followed by its 2-byte checksum. Models
//! with `reflect_out` set (MODBUS, X25, ...) put the low byte first on the
//! wire, the others (XMODEM, CCITT-FALSE) put the high byte first.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use thiserror::Error;

use crate::engine::Crc16;
use crate::model::CrcModel;

pub const TRAILER_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame of {len} bytes is too short to carry a CRC trailer")]
    TooShort { len: usize },

    #[error("CRC mismatch: trailer says {expected:#06x}, payload gives {actual:#06x}")]
    Mismatch { expected: u16, actual: u16 },
}

fn write_trailer(model: &CrcModel, buf: &mut [u8], crc: u16) {
    if model.reflect_out {
        LittleEndian::write_u16(buf, crc);
    } else {
        BigEndian::write_u16(buf, crc);
    }
}

fn read_trailer(model: &CrcModel, buf: &[u8]) -> u16 {
    if model.reflect_out {
        LittleEndian::read_u16(buf)
    } else {
        BigEndian::read_u16(buf)
    }
}

/// Returns `payload` with its checksum appended.
pub fn seal(model: CrcModel, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + TRAILER_LEN);
    frame.extend_from_slice(payload);
    frame.resize(payload.len() + TRAILER_LEN, 0);

    let crc = Crc16::checksum(model, payload);
    write_trailer(&model, &mut frame[payload.len()..], crc);
    frame
}

/// Checks the trailer of `frame` and returns the payload in front of it.
pub fn open(model: CrcModel, frame: &[u8]) -> Result<&[u8], FrameError> {
    if frame.len() < TRAILER_LEN {
        return Err(FrameError::TooShort { len: frame.len() });
    }

    let (payload, trailer) = frame.split_at(frame.len() - TRAILER_LEN);
    let expected = read_trailer(&model, trailer);
    let actual = Crc16::checksum(model, payload);

    if expected != actual {
        return Err(FrameError::Mismatch { expected, actual });
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CHECK_INPUT, MODBUS, XMODEM};

    #[test]
    fn modbus_trailer_is_low_byte_first() {
        let frame = seal(MODBUS, CHECK_INPUT);
        assert_eq!(&frame[..9], CHECK_INPUT);
        assert_eq!(&frame[9..], &[0x37, 0x4B]);
    }

    #[test]
    fn xmodem_trailer_is_high_byte_first() {
        let frame = seal(XMODEM, CHECK_INPUT);
        assert_eq!(&frame[9..], &[0x31, 0xC3]);
    }

    #[test]
    fn open_returns_payload() {
        // Read holding registers request, slave 1, address 0, count 10.
        let request = [0x01, 0x03, 0x00, 0x00, 0x00, 0x0A, 0xC5, 0xCD];
        assert_eq!(open(MODBUS, &request), Ok(&request[..6]));

        let frame = seal(XMODEM, b"");
        assert_eq!(open(XMODEM, &frame), Ok(&b""[..]));
    }

    #[test]
    fn corrupted_frame_is_rejected() {
        let mut frame = seal(XMODEM, CHECK_INPUT);
        frame[0] ^= 0x01;
        match open(XMODEM, &frame) {
            Err(FrameError::Mismatch { expected, actual }) => {
                assert_eq!(expected, 0x31C3);
                assert_ne!(actual, expected);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn short_frame_is_rejected() {
        assert_eq!(open(MODBUS, &[0x01]), Err(FrameError::TooShort { len: 1 }));
        assert_eq!(
            FrameError::TooShort { len: 1 }.to_string(),
            "frame of 1 bytes is too short to carry a CRC trailer"
        );
    }
}
