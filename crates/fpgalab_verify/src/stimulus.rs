//! Stimulus generation for the calculator testbench.

use fpgalab_sim::{AluOp, FUNCTION_TABLE};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One operation to drive: the function to select and the switch value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TestVector {
    /// Function chosen on the select buttons.
    pub op: AluOp,
    /// Value on the switches.
    pub operand: u16,
}

impl TestVector {
    /// Creates a vector.
    pub const fn new(op: AluOp, operand: u16) -> Self {
        Self { op, operand }
    }
}

/// Hand-picked vectors, applied in order right after a reset.
///
/// The sequence walks the accumulator through sign boundaries, shift
/// amounts of 0, 15, 16 and 31, carries out of bit 15 and both outcomes of
/// every signed comparison. It opens with the reference sequence from the
/// lab handout (`0xFFF3`, `0x0003`, `0`, `0`).
pub fn directed_vectors() -> Vec<TestVector> {
    use AluOp::*;
    vec![
        TestVector::new(Add, 0xFFF3),
        TestVector::new(Sub, 0xFFF0),
        TestVector::new(Slt, 0x0000),
        TestVector::new(And, 0x00FF),
        TestVector::new(Or, 0x8000),
        TestVector::new(Sra, 0x0004),
        TestVector::new(Slt, 0x0001),
        TestVector::new(Sll, 0x000F),
        TestVector::new(Sra, 0x000F),
        TestVector::new(Xor, 0x5555),
        TestVector::new(Add, 0x5556),
        TestVector::new(Sub, 0x0001),
        TestVector::new(Sll, 0x0010),
        TestVector::new(Or, 0x7FFF),
        TestVector::new(Slt, 0x8000),
        TestVector::new(Add, 0x0001),
        TestVector::new(Sra, 0x001F),
        TestVector::new(Sll, 0x0000),
        TestVector::new(Xor, 0xFFFF),
        TestVector::new(Slt, 0x7FFF),
        TestVector::new(And, 0x0000),
        TestVector::new(Sub, 0x8000),
        TestVector::new(Sra, 0x0001),
    ]
}

/// `per_op` random operands for every reachable function, shuffled.
pub fn random_vectors<R: Rng>(rng: &mut R, per_op: u32) -> Vec<TestVector> {
    let mut vectors: Vec<TestVector> = FUNCTION_TABLE
        .iter()
        .flat_map(|&op| (0..per_op).map(move |_| op))
        .map(|op| TestVector::new(op, rng.gen()))
        .collect();
    vectors.shuffle(rng);
    vectors
}

/// Switch and select changes with the commit button left alone.
pub fn idle_vectors<R: Rng>(rng: &mut R, count: u32) -> Vec<TestVector> {
    (0..count)
        .map(|_| {
            let op = FUNCTION_TABLE[rng.gen_range(0..FUNCTION_TABLE.len())];
            TestVector::new(op, rng.gen())
        })
        .collect()
}

/// Tick counts for one button press.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PressTiming {
    /// Ticks with operand and select stable before the press.
    pub setup: u64,
    /// Ticks with the commit button held.
    pub hold: u64,
    /// Ticks after release before the result is checked.
    pub release: u64,
}

impl PressTiming {
    /// Pads the press so it commits exactly once.
    ///
    /// The button is held at least one tick and released at least one tick,
    /// so the one-shot re-arms before the next press, and hold plus release
    /// covers `latency` so the next vector's switches are not sampled by this
    /// press's pulse. Returns the padded timing and whether padding was needed.
    pub fn padded(self, latency: u64) -> (Self, bool) {
        let hold = self.hold.max(1);
        let release = self.release.max(1).max(latency.saturating_sub(hold));
        let padded = Self {
            hold,
            release,
            ..self
        };
        (padded, padded != self)
    }

    /// Total ticks spent on one press.
    pub fn total(&self) -> u64 {
        self.setup + self.hold + self.release
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn directed_starts_with_reference_sequence() {
        let v = directed_vectors();
        assert_eq!(v[0], TestVector::new(AluOp::Add, 0xFFF3));
        assert_eq!(v[1], TestVector::new(AluOp::Sub, 0xFFF0));
        assert_eq!(v[2], TestVector::new(AluOp::Slt, 0x0000));
        assert_eq!(v[3], TestVector::new(AluOp::And, 0x00FF));
    }

    #[test]
    fn directed_covers_every_reachable_function() {
        let v = directed_vectors();
        for op in FUNCTION_TABLE {
            assert!(v.iter().any(|t| t.op == op), "{op} missing");
        }
        assert!(v.iter().all(|t| t.op != AluOp::Srl));
    }

    #[test]
    fn random_counts_per_op() {
        let mut rng = StdRng::seed_from_u64(7);
        let v = random_vectors(&mut rng, 10);
        assert_eq!(v.len(), 80);
        for op in FUNCTION_TABLE {
            assert_eq!(v.iter().filter(|t| t.op == op).count(), 10);
        }
    }

    #[test]
    fn same_seed_same_vectors() {
        let a = random_vectors(&mut StdRng::seed_from_u64(323), 5);
        let b = random_vectors(&mut StdRng::seed_from_u64(323), 5);
        let c = random_vectors(&mut StdRng::seed_from_u64(324), 5);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn idle_count() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(idle_vectors(&mut rng, 20).len(), 20);
        assert!(idle_vectors(&mut rng, 0).is_empty());
    }

    #[test]
    fn padding() {
        let t = PressTiming {
            setup: 2,
            hold: 1,
            release: 1,
        };
        let (padded, warned) = t.padded(3);
        assert!(warned);
        assert_eq!(padded.release, 2);
        assert_eq!(padded.total(), 5);

        let ok = PressTiming {
            setup: 0,
            hold: 4,
            release: 4,
        };
        assert_eq!(ok.padded(3), (ok, false));
    }

    #[test]
    fn padding_releases_long_press() {
        let t = PressTiming {
            setup: 2,
            hold: 4,
            release: 0,
        };
        let (padded, warned) = t.padded(3);
        assert!(warned);
        assert_eq!((padded.hold, padded.release), (4, 1));
    }

    #[test]
    fn padding_presses_at_least_once() {
        let t = PressTiming {
            setup: 0,
            hold: 0,
            release: 5,
        };
        let (padded, warned) = t.padded(3);
        assert!(warned);
        assert_eq!((padded.hold, padded.release), (1, 5));
    }
}
