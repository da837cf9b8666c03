//! Configurable CRC-16 checksums.
//!
//! [`Crc16`] computes any CRC-16 described by a [`CrcModel`] (polynomial,
//! initial value, final XOR, input and output reflection) over a byte
//! stream fed in pieces. Nine common parameter sets ship as constants and
//! through [`Preset`].
//!
//! Engines run in one of two [`Mode`]s. `Fast` keeps a 256-entry table per
//! engine and processes a byte per lookup. `Raw` shifts bit by bit and
//! allocates nothing. Both give identical results for every model.
//!
//! ```
//! use crc16_engine::{Crc16, Preset};
//!
//! assert_eq!(Crc16::checksum(Preset::Xmodem.model(), b"123456789"), 0x31C3);
//! ```

pub mod engine;
pub mod frame;
pub mod model;
pub mod reflect;
pub mod table;

pub use engine::Crc16;
pub use frame::FrameError;
pub use model::{
    CrcModel, ParsePresetError, Preset, CCITT, CCITT_FALSE, DNP, IBM, MAXIM, MODBUS, USB, X25,
    XMODEM,
};
pub use reflect::Mode;
