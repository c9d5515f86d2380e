//! Shared contracts for timeslice-scheduled device emulation.
//!
//! The host scheduler runs each device forward for a timeslice, then either
//! commits the work or rolls it back to the last synchronization point.
//! Devices never talk to each other directly; everything crosses a bus that
//! reports how long each access took.

mod bus;
mod clock;
mod device;
mod observable;
mod state;

pub use bus::{FlatMemory, MemoryBus, Nanoseconds, ReadResult};
pub use clock::{ClockSource, Ticks};
pub use device::{OpcodeInfo, Processor};
pub use observable::{Observable, Value};
pub use state::{StateNode, StateValue};
