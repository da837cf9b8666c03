//! Bit reversal for 8- and 16-bit values.
//!
//! Reflected CRC variants (IBM, MODBUS, X25, ...) consume each byte
//! least-significant bit first. The engine always runs the MSB-first
//! recurrence, so reflected models mirror every input byte on the way in
//! and the register on the way out.
//!
//! Two strategies are provided. The raw functions are plain shift loops
//! with no state. The fast functions index a 256-entry table that is built
//! once per process, on first use, and shared read-only by every engine.

use std::sync::OnceLock;
use tracing::trace;

static REFLECTION_TABLE: OnceLock<[u8; 256]> = OnceLock::new();

/// Update strategy of an engine.
///
/// `Fast` uses the per-engine CRC table and the shared reflection table,
/// `Raw` shifts one bit at a time and keeps no tables at all.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Fast,
    Raw,
}

impl Mode {
    pub fn reflect8(self, data: u8) -> u8 {
        match self {
            Mode::Fast => reflect8_fast(data),
            Mode::Raw => reflect8_raw(data),
        }
    }

    pub fn reflect16(self, data: u16) -> u16 {
        match self {
            Mode::Fast => reflect16_fast(data),
            Mode::Raw => reflect16_raw(data),
        }
    }
}

pub fn reflect8_raw(mut data: u8) -> u8 {
    let mut reflection = 0u8;
    for _ in 0..8 {
        reflection = (reflection << 1) | (data & 0x01);
        data >>= 1;
    }
    reflection
}

pub fn reflect16_raw(mut data: u16) -> u16 {
    let mut reflection = 0u16;
    for _ in 0..16 {
        reflection = (reflection << 1) | (data & 0x0001);
        data >>= 1;
    }
    reflection
}

/// Returns the shared byte reversal table, building it on first call.
///
/// Concurrent first calls are fine: `OnceLock` runs the initializer once
/// and every caller sees the same table afterwards.
pub fn reflection_table() -> &'static [u8; 256] {
    REFLECTION_TABLE.get_or_init(|| {
        trace!("building shared reflection table");
        let mut table = [0u8; 256];
        for (byte, slot) in table.iter_mut().enumerate() {
            *slot = reverse_byte(byte as u64);
        }
        table
    })
}

// Interleaves eight copies of the byte, masks one mirrored bit out of each
// and folds them back together with the modulus.
fn reverse_byte(byte: u64) -> u8 {
    (((byte * 0x0202020202) & 0x010884422010) % 1023) as u8
}

pub fn reflect8_fast(data: u8) -> u8 {
    reflection_table()[data as usize]
}

pub fn reflect16_fast(data: u16) -> u16 {
    let table = reflection_table();
    let [high, low] = data.to_be_bytes();
    (u16::from(table[low as usize]) << 8) | u16::from(table[high as usize])
}
