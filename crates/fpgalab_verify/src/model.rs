//! Behavioral reference models used as the oracle.
//!
//! Nothing here calls into `fpgalab_sim`'s datapath. The opcode table, the
//! function-select table and every operation are written out again from
//! the lab handouts so that a bug in the design cannot hide in shared code.

/// The oracle's answer for one ALU evaluation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Expected {
    /// The documented result.
    Value(u32),
    /// The opcode has no documented behavior; nothing is asserted.
    Unspecified,
}

/// Reference result for a raw 4-bit ALU control code.
pub fn reference_alu(a: u32, b: u32, code: u8) -> Expected {
    let shamt = b % 32;
    let value = match code & 0xF {
        0b0000 => a & b,
        0b0001 => a | b,
        0b0010 => ((a as u64 + b as u64) & 0xFFFF_FFFF) as u32,
        0b0110 => ((a as u64 + (!b) as u64 + 1) & 0xFFFF_FFFF) as u32,
        0b0111 => {
            // Flipping the sign bit turns a signed order into an unsigned one.
            ((a ^ 0x8000_0000) < (b ^ 0x8000_0000)) as u32
        }
        0b1000 => a.checked_shr(shamt).unwrap_or(0),
        0b1001 => ((a as u64) << shamt) as u32,
        0b1010 => {
            if a & 0x8000_0000 == 0 {
                a >> shamt
            } else {
                !((!a) >> shamt)
            }
        }
        0b1101 => a ^ b,
        _ => return Expected::Unspecified,
    };
    Expected::Value(value)
}

/// ALU control code the calculator feeds for each 3-bit function select.
const SELECT_TO_CODE: [u8; 8] = [
    0b0010, // add
    0b0110, // sub
    0b0000, // and
    0b0001, // or
    0b1101, // xor
    0b0111, // less than
    0b1001, // shift left logical
    0b1010, // shift right arithmetic
];

/// Sign-extends the low `width` bits of `value` to 32 bits.
fn sign_extend(value: u64, width: u32) -> u32 {
    let value = value & mask(width);
    if width < 32 && (value >> (width - 1)) & 1 == 1 {
        (value | !mask(width)) as u32
    } else {
        value as u32
    }
}

fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Harness-owned replica of the calculator accumulator.
///
/// `None` means the accumulator has not been initialized by a reset yet,
/// the only window in which an unknown DUT value is tolerated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ScoreboardModel {
    width: u32,
    acc: Option<u64>,
}

impl ScoreboardModel {
    /// Creates a model of a `width`-bit accumulator, not yet initialized.
    pub fn new(width: u32) -> Self {
        Self { width, acc: None }
    }

    /// Expected accumulator value, if defined.
    pub fn expected(&self) -> Option<u64> {
        self.acc
    }

    /// Applies a reset.
    pub fn reset(&mut self) {
        self.acc = Some(0);
    }

    /// Applies one committed operation and returns the new expected value.
    ///
    /// Committing before the first reset leaves the model undefined.
    pub fn commit(&mut self, select: u8, operand: u64) -> Option<u64> {
        let code = SELECT_TO_CODE[(select & 0b111) as usize];
        self.acc = self.acc.and_then(|acc| {
            let a = sign_extend(acc, self.width);
            let b = sign_extend(operand, self.width);
            match reference_alu(a, b, code) {
                Expected::Value(v) => Some(v as u64 & mask(self.width)),
                Expected::Unspecified => None,
            }
        });
        self.acc
    }
}

/// Reference count for the up/down counter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CounterModel {
    width: u32,
    count: Option<u64>,
}

impl CounterModel {
    /// Creates an uninitialized model.
    pub fn new(width: u32) -> Self {
        Self { width, count: None }
    }

    /// Expected count, if defined.
    pub fn expected(&self) -> Option<u64> {
        self.count
    }

    /// Applies a clear.
    pub fn clear(&mut self) {
        self.count = Some(0);
    }

    /// Applies one press of the up and/or down buttons.
    pub fn press(&mut self, up: bool, down: bool) {
        let m = mask(self.width);
        self.count = self.count.map(|c| match (up, down) {
            (true, _) => (c + 1) & m,
            (false, true) => c.wrapping_sub(1) & m,
            (false, false) => c,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alu_reference_values() {
        assert_eq!(reference_alu(7, 5, 0b0110), Expected::Value(2));
        assert_eq!(reference_alu(0, 1, 0b0110), Expected::Value(u32::MAX));
        assert_eq!(reference_alu(0xFFFF_0000, 1, 0b1010), Expected::Value(0xFFFF_8000));
        assert_eq!(reference_alu(0x8000_0000, 31, 0b1000), Expected::Value(1));
        assert_eq!(reference_alu(1, 31, 0b1001), Expected::Value(0x8000_0000));
        assert_eq!(reference_alu(u32::MAX, 0, 0b0111), Expected::Value(1));
        assert_eq!(reference_alu(0, u32::MAX, 0b0111), Expected::Value(0));
    }

    #[test]
    fn undefined_codes_unspecified() {
        for code in [3u8, 4, 5, 11, 12, 14, 15] {
            assert_eq!(reference_alu(1, 2, code), Expected::Unspecified);
        }
    }

    #[test]
    fn sign_extension() {
        assert_eq!(sign_extend(0xFFF3, 16), 0xFFFF_FFF3);
        assert_eq!(sign_extend(0x7FFF, 16), 0x0000_7FFF);
        assert_eq!(sign_extend(0xDEAD_BEEF, 32), 0xDEAD_BEEF);
    }

    #[test]
    fn model_follows_documented_sequence() {
        let mut m = ScoreboardModel::new(16);
        assert_eq!(m.expected(), None);
        m.reset();
        assert_eq!(m.commit(0, 0xFFF3), Some(0xFFF3));
        assert_eq!(m.commit(1, 0xFFF0), Some(0x0003));
        assert_eq!(m.commit(5, 0x0000), Some(0x0000));
        assert_eq!(m.commit(2, 0x00FF), Some(0x0000));
    }

    #[test]
    fn commit_before_reset_stays_undefined() {
        let mut m = ScoreboardModel::new(16);
        assert_eq!(m.commit(0, 1), None);
    }

    #[test]
    fn counter_model_wraps() {
        let mut c = CounterModel::new(16);
        c.press(true, false);
        assert_eq!(c.expected(), None);
        c.clear();
        c.press(false, true);
        assert_eq!(c.expected(), Some(0xFFFF));
        c.press(true, true);
        assert_eq!(c.expected(), Some(0));
    }
}
