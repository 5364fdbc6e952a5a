//! Readable memory holding driver tables.

use thiserror::Error;

/// Failure to read a driver table field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("null pointer in field {0}")]
    NullPointer(&'static str),
    #[error("{len} bytes at {address:#x} are outside readable table memory")]
    OutOfRange { address: u64, len: usize },
}

/// Source of driver table bytes.
pub trait TableMemory {
    fn read_into(&self, address: u64, buf: &mut [u8]) -> Result<(), TableError>;

    fn read_u8(&self, address: u64) -> Result<u8, TableError> {
        let mut buf = [0u8; 1];
        self.read_into(address, &mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&self, address: u64) -> Result<u16, TableError> {
        let mut buf = [0u8; 2];
        self.read_into(address, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_u32(&self, address: u64) -> Result<u32, TableError> {
        let mut buf = [0u8; 4];
        self.read_into(address, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u64(&self, address: u64) -> Result<u64, TableError> {
        let mut buf = [0u8; 8];
        self.read_into(address, &mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }
}

/// The current process's address space.
///
/// Reads trust that the address came from a loaded keyboard driver whose
/// library is still mapped. The layout manager guarantees this by keeping the
/// library alive for as long as its tables are referenced.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessMemory;

impl TableMemory for ProcessMemory {
    fn read_into(&self, address: u64, buf: &mut [u8]) -> Result<(), TableError> {
        if address == 0 {
            return Err(TableError::NullPointer("address"));
        }
        let Ok(start) = usize::try_from(address) else {
            return Err(TableError::OutOfRange {
                address,
                len: buf.len(),
            });
        };
        if start.checked_add(buf.len()).is_none() {
            return Err(TableError::OutOfRange {
                address,
                len: buf.len(),
            });
        }
        unsafe {
            std::ptr::copy_nonoverlapping(start as *const u8, buf.as_mut_ptr(), buf.len());
        }
        Ok(())
    }
}

/// Owned byte regions placed at fixed addresses.
#[derive(Debug, Default, Clone)]
pub struct MemoryArena {
    regions: Vec<(u64, Vec<u8>)>,
}

impl MemoryArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `bytes` at `base`. Regions must not overlap.
    pub fn add_region(&mut self, base: u64, bytes: Vec<u8>) {
        debug_assert!(
            self.regions
                .iter()
                .all(|(b, r)| base >= b + r.len() as u64 || base + bytes.len() as u64 <= *b),
            "overlapping region at {base:#x}"
        );
        self.regions.push((base, bytes));
    }
}

impl TableMemory for MemoryArena {
    fn read_into(&self, address: u64, buf: &mut [u8]) -> Result<(), TableError> {
        let len = buf.len();
        for (base, bytes) in &self.regions {
            if address < *base {
                continue;
            }
            let offset = (address - base) as usize;
            if let Some(src) = offset
                .checked_add(len)
                .and_then(|end| bytes.get(offset..end))
            {
                buf.copy_from_slice(src);
                return Ok(());
            }
        }
        Err(TableError::OutOfRange { address, len })
    }
}
