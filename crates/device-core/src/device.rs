//! Processor execution contract.

use crate::{MemoryBus, Nanoseconds};

/// A disassembled instruction, for debugger views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// Instruction mnemonic, e.g. `"LD"`.
    pub mnemonic: String,
    /// Rendered operands, e.g. `"A, (IX+5)"`. Empty for operand-less opcodes.
    pub arguments: String,
    /// Total encoded length in bytes, prefixes included.
    pub byte_size: u32,
    /// Base duration in T-states (not-taken path for conditional forms).
    pub tstates: u32,
    /// False for byte sequences the core executes as NOP-equivalents
    /// (unmapped prefix space, unsupported opcodes).
    pub valid: bool,
}

/// A processor core driven by the host scheduler.
///
/// The scheduler calls `execute_step` repeatedly within a timeslice, then
/// either `execute_commit` to make the work permanent or `execute_rollback`
/// to discard it. All execute-family methods are called from a single
/// scheduler thread; cross-thread inputs (line state, clock changes) reach
/// the core through its own queueing, not through this trait.
pub trait Processor {
    /// Execute one instruction or one interrupt acceptance.
    ///
    /// Returns the duration of the step. A return of exactly zero means the
    /// core is blocked (bus request) and the scheduler should suspend it
    /// until a line-state change arrives.
    fn execute_step<B: MemoryBus>(&mut self, bus: &mut B) -> Nanoseconds;

    /// Discard all work since the last commit point.
    fn execute_rollback(&mut self);

    /// Make all work since the last commit point permanent.
    fn execute_commit(&mut self);

    /// Announce the length of the upcoming timeslice.
    fn notify_upcoming_timeslice(&mut self, nanoseconds: Nanoseconds);

    /// True if this core wants `notify_upcoming_timeslice` calls.
    fn send_notify_upcoming_timeslice(&self) -> bool {
        false
    }

    /// True if this core can report itself blocked awaiting a line change,
    /// letting the scheduler park it instead of spinning.
    fn uses_execute_suspend(&self) -> bool {
        false
    }

    /// One-time setup after construction, before the first timeslice.
    fn initialize(&mut self);

    /// Assert the hardware reset sequence.
    fn reset(&mut self);

    /// Current program counter.
    fn current_pc(&self) -> u32;

    /// Width of the program counter in bits.
    fn pc_width(&self) -> u32;

    /// Width of the address bus in bits.
    fn address_bus_width(&self) -> u32;

    /// Width of the data bus in bits.
    fn data_bus_width(&self) -> u32;

    /// Smallest encodable opcode, in bytes.
    fn minimum_opcode_byte_size(&self) -> u32;

    /// Disassemble one instruction at `address` without side effects.
    fn opcode_info<B: MemoryBus>(&self, bus: &mut B, address: u32) -> OpcodeInfo;

    /// Read one byte at `address` without side effects.
    fn raw_data<B: MemoryBus>(&self, bus: &mut B, address: u32) -> u8;
}
