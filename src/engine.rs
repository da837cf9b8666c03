//! Incremental CRC-16 engine.

use std::io;
use tracing::debug;

use crate::model::CrcModel;
use crate::reflect::{self, Mode};
use crate::table::{build_table, shift_byte};

// The table lives inside the Fast variant so a Fast engine can never run
// without one.
#[derive(Clone)]
enum Kernel {
    Table(Box<[u16; 256]>),
    Bitwise,
}

impl Kernel {
    fn new(model: &CrcModel, mode: Mode) -> Self {
        match mode {
            Mode::Fast => {
                reflect::reflection_table();
                debug!("building CRC table for polynomial {:#06x}", model.polynomial);
                Kernel::Table(Box::new(build_table(model.polynomial)))
            }
            Mode::Raw => Kernel::Bitwise,
        }
    }

    fn mode(&self) -> Mode {
        match self {
            Kernel::Table(_) => Mode::Fast,
            Kernel::Bitwise => Mode::Raw,
        }
    }
}

/// A running CRC-16 computation over one model.
///
/// The register holds the accumulated state starting from the model's
/// `xor_in`; output reflection and `xor_out` are only applied by
/// [`Crc16::result`].
///
/// ```
/// use crc16_engine::{Crc16, Mode, MODBUS};
///
/// let mut crc = Crc16::new(MODBUS, Mode::Fast);
/// crc.update(b"1234");
/// crc.update(b"56789");
/// assert_eq!(crc.result(), 0x4B37);
/// ```
#[derive(Clone)]
pub struct Crc16 {
    model: CrcModel,
    register: u16,
    kernel: Kernel,
}

impl Crc16 {
    pub fn new(model: CrcModel, mode: Mode) -> Self {
        Self {
            kernel: Kernel::new(&model, mode),
            register: model.xor_in,
            model,
        }
    }

    /// Builds an engine from loose parameters instead of a [`CrcModel`].
    pub fn with_params(
        reflect_in: bool,
        reflect_out: bool,
        polynomial: u16,
        xor_in: u16,
        xor_out: u16,
        mode: Mode,
    ) -> Self {
        let model = CrcModel {
            polynomial,
            xor_in,
            xor_out,
            reflect_in,
            reflect_out,
        };
        Self::new(model, mode)
    }

    /// Computes the checksum of `data` in one go with a Fast engine.
    pub fn checksum(model: CrcModel, data: &[u8]) -> u16 {
        let mut crc = Self::new(model, Mode::Fast);
        crc.update(data);
        crc.result()
    }

    pub fn model(&self) -> &CrcModel {
        &self.model
    }

    pub fn mode(&self) -> Mode {
        self.kernel.mode()
    }

    /// Raw register contents, before output reflection and `xor_out`.
    pub fn register(&self) -> u16 {
        self.register
    }

    /// Switches to `model`, rebuilding the table in Fast mode.
    ///
    /// The register is left as is. Call [`Crc16::clear`] afterwards to
    /// start a fresh run under the new model.
    pub fn reconfigure(&mut self, model: CrcModel) {
        self.kernel = Kernel::new(&model, self.mode());
        self.model = model;
    }

    pub fn clear(&mut self) {
        self.register = self.model.xor_in;
    }

    pub fn update_byte(&mut self, byte: u8) {
        let byte = if self.model.reflect_in {
            self.mode().reflect8(byte)
        } else {
            byte
        };

        match &self.kernel {
            Kernel::Table(table) => {
                let index = ((self.register >> 8) as u8 ^ byte) as usize;
                self.register = (self.register << 8) ^ table[index];
            }
            Kernel::Bitwise => {
                self.register =
                    shift_byte(self.model.polynomial, self.register ^ (u16::from(byte) << 8));
            }
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.update_byte(byte);
        }
    }

    /// Checksum of everything consumed so far. Does not touch the register.
    pub fn result(&self) -> u16 {
        let register = if self.model.reflect_out {
            self.mode().reflect16(self.register)
        } else {
            self.register
        };
        register ^ self.model.xor_out
    }
}

impl From<CrcModel> for Crc16 {
    fn from(model: CrcModel) -> Self {
        Self::new(model, Mode::Fast)
    }
}

impl std::fmt::Debug for Crc16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crc16")
            .field("model", &self.model)
            .field("register", &format_args!("{:#06x}", self.register))
            .field("mode", &self.mode())
            .finish()
    }
}

impl io::Write for Crc16 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Preset, CHECK_INPUT, CCITT_FALSE, DNP, MODBUS, XMODEM};

    #[test]
    fn check_values_in_both_modes() {
        for mode in [Mode::Fast, Mode::Raw] {
            for preset in Preset::ALL {
                let mut crc = Crc16::new(preset.model(), mode);
                crc.update(CHECK_INPUT);
                assert_eq!(crc.result(), preset.check(), "{preset} in {mode:?} mode");
            }
        }
    }

    #[test]
    fn loose_params_match_preset() {
        let mut crc = Crc16::with_params(true, true, 0x8005, 0xFFFF, 0x0000, Mode::Raw);
        assert_eq!(crc.model(), &MODBUS);
        crc.update(CHECK_INPUT);
        assert_eq!(crc.result(), 0x4B37);
    }

    #[test]
    fn empty_input_yields_finalized_xor_in() {
        assert_eq!(Crc16::checksum(CCITT_FALSE, &[]), 0xFFFF);
        assert_eq!(Crc16::checksum(DNP, &[]), 0xFFFF);
        assert_eq!(Crc16::checksum(XMODEM, &[]), 0x0000);
    }

    #[test]
    fn clear_resets_to_xor_in() {
        let mut crc = Crc16::from(MODBUS);
        crc.update(b"some frame bytes");
        crc.clear();
        assert_eq!(crc.register(), 0xFFFF);
        assert_eq!(crc.result(), Crc16::from(MODBUS).result());

        crc.update(CHECK_INPUT);
        assert_eq!(crc.result(), 0x4B37);
    }

    #[test]
    fn result_does_not_consume_state() {
        let mut crc = Crc16::from(XMODEM);
        crc.update(b"1234");
        let partial = crc.result();
        assert_eq!(crc.result(), partial);
        crc.update(b"56789");
        assert_eq!(crc.result(), 0x31C3);
    }

    #[test]
    fn reconfigure_keeps_register() {
        for mode in [Mode::Fast, Mode::Raw] {
            let mut crc = Crc16::new(XMODEM, mode);
            crc.update(b"abc");
            let register = crc.register();
            crc.reconfigure(DNP);
            assert_eq!(crc.register(), register);
            assert_eq!(crc.model(), &DNP);
            assert_eq!(crc.mode(), mode);
        }
    }

    #[test]
    fn reconfigure_rebuilds_table() {
        let mut crc = Crc16::new(XMODEM, Mode::Fast);
        crc.update(b"stale");
        crc.reconfigure(DNP);
        crc.clear();
        crc.update(CHECK_INPUT);
        assert_eq!(crc.result(), 0xEA82);

        let mut raw = Crc16::new(DNP, Mode::Raw);
        raw.update(CHECK_INPUT);
        assert_eq!(raw.result(), crc.result());
    }

    #[test]
    fn order_matters() {
        let mut ab = Crc16::from(XMODEM);
        ab.update(&[0x01, 0x02]);
        let mut ba = Crc16::from(XMODEM);
        ba.update(&[0x02, 0x01]);
        assert_ne!(ab.register(), ba.register());
    }

    #[test]
    fn write_feeds_the_engine() {
        let mut crc = Crc16::from(Preset::X25.model());
        let copied = io::copy(&mut &CHECK_INPUT[..], &mut crc).unwrap();
        assert_eq!(copied, 9);
        assert_eq!(crc.result(), 0x906E);
    }

    #[test]
    fn debug_shows_register_in_hex() {
        let crc = Crc16::new(MODBUS, Mode::Raw);
        let rendered = format!("{crc:?}");
        assert!(rendered.contains("register: 0xffff"), "{rendered}");
        assert!(rendered.contains("mode: Raw"), "{rendered}");
    }
}
