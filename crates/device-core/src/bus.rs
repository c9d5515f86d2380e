//! Memory bus interface with per-access timing.
//!
//! Every access returns the time the bus spent servicing it, so a CPU core
//! can fold bus contention into the duration it reports to the scheduler.

/// A span of emulated time. All device timing is expressed in nanoseconds.
pub type Nanoseconds = f64;

/// Result of a bus read: the data (if any device answered) plus the time the
/// access took on the bus.
///
/// A read nobody claims comes back with `data: None`; the CPU substitutes
/// 0xFF (open bus) and continues. Time is charged either way.
#[derive(Debug, Clone, Copy)]
pub struct ReadResult {
    /// Data returned by the bus, or `None` if the access failed.
    pub data: Option<u8>,
    /// Time the bus spent servicing the access.
    pub elapsed: Nanoseconds,
}

impl ReadResult {
    /// A successful read that consumed no extra bus time.
    #[must_use]
    pub const fn new(data: u8) -> Self {
        Self {
            data: Some(data),
            elapsed: 0.0,
        }
    }

    /// A successful read with a bus delay.
    #[must_use]
    pub const fn with_time(data: u8, elapsed: Nanoseconds) -> Self {
        Self {
            data: Some(data),
            elapsed,
        }
    }

    /// A failed read (no device answered).
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            data: None,
            elapsed: 0.0,
        }
    }

    /// The data byte, with the open-bus convention applied on failure.
    #[must_use]
    pub fn open_bus(&self) -> u8 {
        self.data.unwrap_or(0xFF)
    }
}

/// Memory bus consumed by a processor core.
///
/// The host owns address decoding and device routing; the core only sees a
/// flat address space. `transparent` accesses are debugger peek/poke: they
/// must not trigger side effects on the bus and must charge zero time.
pub trait MemoryBus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16, transparent: bool) -> ReadResult;

    /// Write a byte to the given address. Returns the time the access took.
    fn write(&mut self, address: u16, value: u8, transparent: bool) -> Nanoseconds;
}

/// Flat 64 KiB RAM covering the whole address space.
///
/// Used by tests and by machines simple enough to not need address decoding.
pub struct FlatMemory {
    ram: Box<[u8; 0x10000]>,
}

impl FlatMemory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; 0x10000]),
        }
    }

    /// Copy `data` into memory starting at `address`, wrapping at the top.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            self.ram[usize::from(address.wrapping_add(i as u16))] = byte;
        }
    }

    /// Read a byte without going through the bus interface.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    /// Write a byte without going through the bus interface.
    pub fn poke(&mut self, address: u16, value: u8) {
        self.ram[usize::from(address)] = value;
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&mut self, address: u16, _transparent: bool) -> ReadResult {
        ReadResult::new(self.ram[usize::from(address)])
    }

    fn write(&mut self, address: u16, value: u8, _transparent: bool) -> Nanoseconds {
        self.ram[usize::from(address)] = value;
        0.0
    }
}
