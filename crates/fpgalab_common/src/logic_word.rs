//! Fixed-width bit vectors with a per-bit known mask.

use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// Widest vector a [`LogicWord`] can hold.
pub const MAX_WIDTH: u32 = 64;

/// A fixed-width signal value of up to 64 bits, any of which may be unknown.
///
/// The value is stored as two machine words: `value` holds the bit levels and
/// `known` has a one for every bit that is actually driven. Bits outside the
/// width and unknown bits always read as zero in `value`, so two words
/// compare equal exactly when they have the same width, the same known mask,
/// and the same known levels.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicWord {
    width: u32,
    value: u64,
    known: u64,
}

impl LogicWord {
    /// Creates a word of the given width with every bit unknown.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or larger than [`MAX_WIDTH`].
    pub fn unknown(width: u32) -> Self {
        check_width(width);
        Self {
            width,
            value: 0,
            known: 0,
        }
    }

    /// Creates a fully known word holding `value`, truncated to `width` bits.
    pub fn from_u64(value: u64, width: u32) -> Self {
        check_width(width);
        let mask = width_mask(width);
        Self {
            width,
            value: value & mask,
            known: mask,
        }
    }

    /// Creates a fully known word of zeros.
    pub fn zero(width: u32) -> Self {
        Self::from_u64(0, width)
    }

    /// Creates a single known bit.
    pub fn from_bool(value: bool) -> Self {
        Self::from_u64(value as u64, 1)
    }

    /// Returns the number of bits in this word.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Logic {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        if (self.known >> index) & 1 == 0 {
            Logic::X
        } else if (self.value >> index) & 1 == 1 {
            Logic::One
        } else {
            Logic::Zero
        }
    }

    /// Sets the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, bit: Logic) {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let mask = 1u64 << index;
        match bit {
            Logic::Zero => {
                self.value &= !mask;
                self.known |= mask;
            }
            Logic::One => {
                self.value |= mask;
                self.known |= mask;
            }
            Logic::X => {
                self.value &= !mask;
                self.known &= !mask;
            }
        }
    }

    /// Returns the value if every bit is known.
    pub fn to_u64(&self) -> Option<u64> {
        self.is_known().then_some(self.value)
    }

    /// Returns `true` if no bit is unknown.
    pub fn is_known(&self) -> bool {
        self.known == width_mask(self.width)
    }

    /// Returns `true` if every bit is unknown.
    pub fn is_all_unknown(&self) -> bool {
        self.known == 0
    }

    /// Returns the most significant bit.
    pub fn msb(&self) -> Logic {
        self.get(self.width - 1)
    }

    /// Widens the word by replicating its most significant bit.
    ///
    /// An unknown sign bit yields unknown upper bits.
    ///
    /// # Panics
    ///
    /// Panics if `new_width` is narrower than the current width.
    pub fn sign_extend(&self, new_width: u32) -> Self {
        check_width(new_width);
        assert!(
            new_width >= self.width,
            "cannot sign-extend {} bits to {new_width}",
            self.width
        );
        let mut out = Self {
            width: new_width,
            value: self.value,
            known: self.known,
        };
        let sign = self.msb();
        for i in self.width..new_width {
            out.set(i, sign);
        }
        out
    }

    /// Keeps only the low `new_width` bits.
    pub fn truncate(&self, new_width: u32) -> Self {
        check_width(new_width);
        let mask = width_mask(new_width.min(self.width));
        Self {
            width: new_width.min(self.width),
            value: self.value & mask,
            known: self.known & mask,
        }
    }

    /// Formats the word as `0x`-prefixed hex, printing `X` for any nibble
    /// that contains an unknown bit.
    pub fn to_hex_string(&self) -> String {
        let nibbles = self.width.div_ceil(4);
        let mut s = String::with_capacity(nibbles as usize + 2);
        s.push_str("0x");
        for n in (0..nibbles).rev() {
            let shift = n * 4;
            let lane = width_mask(self.width) >> shift & 0xF;
            if (self.known >> shift) & lane != lane {
                s.push('X');
            } else {
                let digit = ((self.value >> shift) & 0xF) as u32;
                s.push(char::from_digit(digit, 16).map_or('?', |c| c.to_ascii_uppercase()));
            }
        }
        s
    }

    /// Parses a binary string such as `"10X1"`, most significant bit first.
    pub fn from_binary_str(s: &str) -> Option<Self> {
        let width = s.len() as u32;
        if width == 0 || width > MAX_WIDTH {
            return None;
        }
        let mut word = Self::unknown(width);
        for (i, c) in s.chars().rev().enumerate() {
            word.set(i as u32, Logic::from_char(c)?);
        }
        Some(word)
    }
}

fn check_width(width: u32) {
    assert!(
        (1..=MAX_WIDTH).contains(&width),
        "width {width} outside 1..={MAX_WIDTH}"
    );
}

fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

impl fmt::Display for LogicWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            write!(f, "{}", self.get(i))?;
        }
        Ok(())
    }
}

impl fmt::Debug for LogicWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicWord({}'{})", self.width, self.to_hex_string())
    }
}

impl BitAnd for &LogicWord {
    type Output = LogicWord;

    fn bitand(self, rhs: Self) -> LogicWord {
        assert_eq!(self.width, rhs.width, "LogicWord width mismatch in AND");
        let known_zero = (self.known & !self.value) | (rhs.known & !rhs.value);
        let known = (self.known & rhs.known) | known_zero;
        LogicWord {
            width: self.width,
            value: self.value & rhs.value & known,
            known,
        }
    }
}

impl BitOr for &LogicWord {
    type Output = LogicWord;

    fn bitor(self, rhs: Self) -> LogicWord {
        assert_eq!(self.width, rhs.width, "LogicWord width mismatch in OR");
        let known_one = (self.known & self.value) | (rhs.known & rhs.value);
        let known = (self.known & rhs.known) | known_one;
        LogicWord {
            width: self.width,
            value: (self.value | rhs.value) & known,
            known,
        }
    }
}

impl BitXor for &LogicWord {
    type Output = LogicWord;

    fn bitxor(self, rhs: Self) -> LogicWord {
        assert_eq!(self.width, rhs.width, "LogicWord width mismatch in XOR");
        let known = self.known & rhs.known;
        LogicWord {
            width: self.width,
            value: (self.value ^ rhs.value) & known,
            known,
        }
    }
}

impl Not for &LogicWord {
    type Output = LogicWord;

    fn not(self) -> LogicWord {
        LogicWord {
            width: self.width,
            value: !self.value & self.known,
            known: self.known,
        }
    }
}
