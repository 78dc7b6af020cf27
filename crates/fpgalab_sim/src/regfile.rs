//! Register-file contract and its behavioral model.
//!
//! The calculator does not use a register file; this is the collaborator
//! interface from the register-file lab, modeled so the same tick-based
//! harness can exercise it.

use crate::error::SimError;

/// Number of registers.
pub const REG_COUNT: usize = 32;

/// Input pins of a register file for one tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RegFileInputs {
    /// Read port 1 address.
    pub read_addr1: u8,
    /// Read port 2 address.
    pub read_addr2: u8,
    /// Write enable.
    pub write: bool,
    /// Write address.
    pub write_addr: u8,
    /// Write data.
    pub write_data: u32,
}

/// A two-read, one-write register file.
///
/// Reads are asynchronous: [`read_ports`](Self::read_ports) reflects the
/// inputs presented this tick. A write is committed by
/// [`advance`](Self::advance) and visible from the next tick, except that a
/// read of the address being written returns the write data in the same
/// tick. Register 0 always reads zero.
pub trait RegisterFile {
    /// The two read-port values for this tick's inputs.
    fn read_ports(&self, inputs: &RegFileInputs) -> Result<[u32; 2], SimError>;

    /// Clocks the write port.
    fn advance(&mut self, inputs: &RegFileInputs) -> Result<(), SimError>;
}

/// Behavioral register file with zero-initialized registers.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RegFile {
    regs: [u32; REG_COUNT],
}

impl RegFile {
    /// Creates a register file with every register at zero.
    pub fn new() -> Self {
        Self {
            regs: [0; REG_COUNT],
        }
    }

    fn index(addr: u8) -> Result<usize, SimError> {
        let idx = addr as usize;
        if idx >= REG_COUNT {
            return Err(SimError::AddressOutOfRange {
                addr,
                depth: REG_COUNT,
            });
        }
        Ok(idx)
    }

    fn read(&self, addr: u8, inputs: &RegFileInputs) -> Result<u32, SimError> {
        let idx = Self::index(addr)?;
        if idx == 0 {
            return Ok(0);
        }
        if inputs.write && inputs.write_addr == addr {
            return Ok(inputs.write_data);
        }
        Ok(self.regs[idx])
    }
}

impl Default for RegFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile for RegFile {
    fn read_ports(&self, inputs: &RegFileInputs) -> Result<[u32; 2], SimError> {
        Ok([
            self.read(inputs.read_addr1, inputs)?,
            self.read(inputs.read_addr2, inputs)?,
        ])
    }

    fn advance(&mut self, inputs: &RegFileInputs) -> Result<(), SimError> {
        if inputs.write {
            let idx = Self::index(inputs.write_addr)?;
            if idx != 0 {
                self.regs[idx] = inputs.write_data;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(addr: u8, data: u32) -> RegFileInputs {
        RegFileInputs {
            read_addr1: addr,
            read_addr2: addr,
            write: true,
            write_addr: addr,
            write_data: data,
        }
    }

    #[test]
    fn write_then_read_next_tick() {
        let mut rf = RegFile::new();
        rf.advance(&write(5, 0xDEAD_BEEF)).unwrap();
        let read = RegFileInputs {
            read_addr1: 5,
            ..Default::default()
        };
        assert_eq!(rf.read_ports(&read).unwrap()[0], 0xDEAD_BEEF);
    }

    #[test]
    fn same_tick_forwarding() {
        let rf = RegFile::new();
        assert_eq!(rf.read_ports(&write(9, 77)).unwrap(), [77, 77]);
    }

    #[test]
    fn forwarding_only_on_matching_address() {
        let mut rf = RegFile::new();
        rf.advance(&write(3, 1)).unwrap();
        let inputs = RegFileInputs {
            read_addr1: 3,
            read_addr2: 4,
            write: true,
            write_addr: 4,
            write_data: 2,
        };
        assert_eq!(rf.read_ports(&inputs).unwrap(), [1, 2]);
    }

    #[test]
    fn write_disabled_is_ignored() {
        let mut rf = RegFile::new();
        let mut inputs = write(6, 123);
        inputs.write = false;
        assert_eq!(rf.read_ports(&inputs).unwrap(), [0, 0]);
        rf.advance(&inputs).unwrap();
        assert_eq!(rf.read_ports(&inputs).unwrap(), [0, 0]);
    }

    #[test]
    fn register_zero_reads_zero() {
        let mut rf = RegFile::new();
        assert_eq!(rf.read_ports(&write(0, 0xFFFF_FFFF)).unwrap(), [0, 0]);
        rf.advance(&write(0, 0xFFFF_FFFF)).unwrap();
        let read = RegFileInputs::default();
        assert_eq!(rf.read_ports(&read).unwrap(), [0, 0]);
    }

    #[test]
    fn out_of_range_address() {
        let rf = RegFile::new();
        let inputs = RegFileInputs {
            read_addr2: 32,
            ..Default::default()
        };
        assert!(matches!(
            rf.read_ports(&inputs),
            Err(SimError::AddressOutOfRange { addr: 32, .. })
        ));
    }
}
