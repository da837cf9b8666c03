//! CRC lookup table construction.

/// Runs one byte's worth of MSB-first polynomial division on `acc`.
///
/// The byte to divide must already sit in the high half of `acc`. Both the
/// table builder and the raw update path go through here, which is what
/// keeps the two modes bit-identical.
pub fn shift_byte(polynomial: u16, mut acc: u16) -> u16 {
    for _ in 0..8 {
        if (acc & 0x8000) != 0 {
            acc = (acc << 1) ^ polynomial;
        } else {
            acc <<= 1;
        }
    }
    acc
}

/// Builds the 256-entry table for `polynomial`.
///
/// Entry `b` is the register contribution of leading byte `b`, so one
/// lookup replaces eight shift rounds. A table is only valid for the
/// polynomial it was built from.
pub fn build_table(polynomial: u16) -> [u16; 256] {
    let mut table = [0u16; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = shift_byte(polynomial, (i as u16) << 8);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_entries_for_ccitt() {
        let table = build_table(0x1021);
        assert_eq!(&table[..4], &[0x0000, 0x1021, 0x2042, 0x3063]);
        assert_eq!(table[255], 0x1EF0);
    }

    #[test]
    fn first_entries_for_ibm() {
        let table = build_table(0x8005);
        assert_eq!(&table[..4], &[0x0000, 0x8005, 0x800F, 0x000A]);
    }

    #[test]
    fn entry_one_is_the_polynomial() {
        for poly in [0x1021, 0x8005, 0x3D65, 0xFFFF] {
            assert_eq!(build_table(poly)[1], poly);
        }
    }

    #[test]
    fn zero_polynomial_only_shifts() {
        assert!(build_table(0).iter().all(|&e| e == 0));
    }
}
