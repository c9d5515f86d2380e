//! Z80 CPU device.
//!
//! Each `execute_step` runs one opcode (or one interrupt acceptance) as an
//! indivisible unit and reports its duration, so the host scheduler can run
//! the CPU speculatively and later commit or roll back the whole timeslice.
//! Line-state changes arrive from other device threads through a
//! time-sorted inbox and are applied, in order, at step boundaries.

#![allow(clippy::cast_possible_truncation)] // Intentional truncation for low byte extraction.
#![allow(clippy::struct_excessive_bools)] // Line levels and flip-flops are genuinely boolean.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use device_core::{
    ClockSource, MemoryBus, Nanoseconds, Observable, OpcodeInfo, Processor, Ticks, Value,
};
use log::{debug, trace};

use crate::decode::decode;
use crate::disasm;
use crate::flags::{CF, HF, NF, PF, SF, XF, YF, ZF};
use crate::instr::Instr;
use crate::registers::Registers;

/// Power-on clock rate until the host programs one.
pub const DEFAULT_CLOCK_HZ: f64 = 3_546_895.0;

/// External input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Reset,
    BusReq,
    Int,
    Nmi,
}

impl Line {
    /// Look up a line by its canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "RESET" => Some(Self::Reset),
            "BUSREQ" => Some(Self::BusReq),
            "INT" => Some(Self::Int),
            "NMI" => Some(Self::Nmi),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reset => "RESET",
            Self::BusReq => "BUSREQ",
            Self::Int => "INT",
            Self::Nmi => "NMI",
        }
    }
}

/// Chip-enable output lines the CPU asserts during memory accesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeLine {
    Rd,
    Wr,
}

impl CeLine {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "RD" => Some(Self::Rd),
            "WR" => Some(Self::Wr),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rd => "RD",
            Self::Wr => "WR",
        }
    }
}

/// What a pending access changes when it falls due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineTarget {
    /// Drive an input line to a level.
    Line(Line, bool),
    /// Reprogram the clock input, in Hz.
    ClockRate(f64),
}

/// An externally-driven state change, stamped with the time it takes effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineAccess {
    pub target: LineTarget,
    pub time: Nanoseconds,
}

/// Recover the guard even if another thread panicked while holding the lock;
/// the protected data is plain values that cannot be left half-updated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cross-thread inbox for line and clock changes.
#[derive(Debug, Default)]
struct LineInbox {
    /// Pending accesses, sorted by time ascending; ties keep insertion order.
    pending: Mutex<Vec<LineAccess>>,
    /// Probe flag so the scheduler thread can skip the lock when idle.
    access_pending: AtomicBool,
    /// Set while the CPU is blocked awaiting any line change.
    suspend_until_line_change: AtomicBool,
}

impl LineInbox {
    fn push(&self, access: LineAccess) {
        let mut pending = lock(&self.pending);
        let position = pending
            .iter()
            .position(|entry| entry.time > access.time)
            .unwrap_or(pending.len());
        pending.insert(position, access);
        self.access_pending.store(true, Ordering::Release);
        self.suspend_until_line_change.store(false, Ordering::Release);
    }
}

/// Cloneable handle other devices use to drive the CPU's input lines
/// without holding a reference to the CPU itself.
#[derive(Debug, Clone)]
pub struct LineSender {
    inbox: Arc<LineInbox>,
}

impl LineSender {
    /// Schedule a line-level change at `time` (nanoseconds into the current
    /// timeslice).
    pub fn set_line_state(&self, line: Line, asserted: bool, time: Nanoseconds) {
        trace!("{} <- {} at {time}ns", line.name(), asserted);
        self.inbox.push(LineAccess {
            target: LineTarget::Line(line, asserted),
            time,
        });
    }

    /// Schedule a clock-rate change at `time`.
    pub fn set_clock_source_rate(&self, rate_hz: f64, time: Nanoseconds) {
        trace!("CLK <- {rate_hz}Hz at {time}ns");
        self.inbox.push(LineAccess {
            target: LineTarget::ClockRate(rate_hz),
            time,
        });
    }
}

/// In-flight memory access flags, published for CE-line calculations on
/// foreign threads.
#[derive(Debug, Default)]
struct CeFlags {
    rd: bool,
    wr: bool,
    transparent_rd: bool,
    transparent_wr: bool,
}

/// Cloneable handle for bus-topology calculators that need the CPU's
/// in-flight RD/WR state while the CPU itself is mid-access on another
/// thread. Masks are captured when the probe is created.
#[derive(Debug, Clone)]
pub struct CeLineProbe {
    flags: Arc<Mutex<CeFlags>>,
    mask_rd: u32,
    mask_wr: u32,
}

impl CeLineProbe {
    /// Fold the CPU's in-flight RD/WR state into `current`.
    #[must_use]
    pub fn calculate_memory(&self, current: u32) -> u32 {
        let flags = lock(&self.flags);
        let mut state = current;
        if flags.rd {
            state |= self.mask_rd;
        }
        if flags.wr {
            state |= self.mask_wr;
        }
        state
    }

    /// As [`Self::calculate_memory`], for transparent accesses.
    #[must_use]
    pub fn calculate_memory_transparent(&self, current: u32) -> u32 {
        let flags = lock(&self.flags);
        let mut state = current;
        if flags.transparent_rd {
            state |= self.mask_rd;
        }
        if flags.transparent_wr {
            state |= self.mask_wr;
        }
        state
    }
}

/// Snapshot of all rollback-tracked state.
#[derive(Debug, Clone)]
struct Backup {
    regs: Registers,
    mask_interrupts_next_opcode: bool,
    nmi_pending: bool,
    line_reset: bool,
    line_busreq: bool,
    line_int: bool,
    line_nmi: bool,
    clock: ClockSource,
    timeslice_progress: Nanoseconds,
    last_timeslice_length: Nanoseconds,
    suspend_until_line_change: bool,
}

/// Zilog Z80 CPU.
pub struct Z80 {
    pub(crate) regs: Registers,

    // === Interrupt plumbing ===
    /// True for the one instruction following EI.
    pub(crate) mask_interrupts_next_opcode: bool,
    /// Latched NMI edge awaiting acceptance.
    nmi_pending: bool,

    // === Input line levels ===
    line_reset: bool,
    line_busreq: bool,
    line_int: bool,
    line_nmi: bool,

    // === Timing ===
    clock: ClockSource,
    last_timeslice_length: Nanoseconds,
    /// Time executed so far in the current timeslice; line accesses stamped
    /// at or before this are due.
    timeslice_progress: Nanoseconds,
    /// Bus-reported time accumulated during the current step.
    pub(crate) step_bus_time: Nanoseconds,

    // === Cross-thread state ===
    inbox: Arc<LineInbox>,
    ce_flags: Arc<Mutex<CeFlags>>,

    /// Journal of accesses consumed since the last commit. Rollback re-queues
    /// them, so a re-run of the timeslice sees the same inputs; entries that
    /// arrived mid-timeslice from other devices are never discarded.
    applied_line_accesses: Vec<LineAccess>,

    // === CE line masks ===
    ce_mask_rd: u32,
    ce_mask_wr: u32,

    // === Rollback shadow ===
    backup: Backup,
}

impl Z80 {
    #[must_use]
    pub fn new() -> Self {
        let regs = Registers {
            sp: 0xFFFF,
            ..Registers::default()
        };
        let backup = Backup {
            regs,
            mask_interrupts_next_opcode: false,
            nmi_pending: false,
            line_reset: false,
            line_busreq: false,
            line_int: false,
            line_nmi: false,
            clock: ClockSource::new(DEFAULT_CLOCK_HZ),
            timeslice_progress: 0.0,
            last_timeslice_length: 0.0,
            suspend_until_line_change: false,
        };
        Self {
            regs,
            mask_interrupts_next_opcode: false,
            nmi_pending: false,
            line_reset: false,
            line_busreq: false,
            line_int: false,
            line_nmi: false,
            clock: ClockSource::new(DEFAULT_CLOCK_HZ),
            last_timeslice_length: 0.0,
            timeslice_progress: 0.0,
            step_bus_time: 0.0,
            inbox: Arc::new(LineInbox::default()),
            ce_flags: Arc::new(Mutex::new(CeFlags::default())),
            applied_line_accesses: Vec::new(),
            ce_mask_rd: 0,
            ce_mask_wr: 0,
            backup,
        }
    }

    /// Snapshot of the architectural register set.
    #[must_use]
    pub fn registers(&self) -> Registers {
        self.regs
    }

    /// Mutable access to the register set, for hosts and debuggers.
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    /// Handle other devices use to drive this CPU's lines from any thread.
    #[must_use]
    pub fn line_sender(&self) -> LineSender {
        LineSender {
            inbox: Arc::clone(&self.inbox),
        }
    }

    /// Schedule a line-level change (see [`LineSender::set_line_state`]).
    pub fn set_line_state(&self, line: Line, asserted: bool, time: Nanoseconds) {
        self.line_sender().set_line_state(line, asserted, time);
    }

    /// Schedule a rollback-aware clock-rate change.
    pub fn set_clock_source_rate(&self, rate_hz: f64, time: Nanoseconds) {
        self.line_sender().set_clock_source_rate(rate_hz, time);
    }

    /// Reprogram the clock immediately, bypassing rollback tracking.
    pub fn transparent_set_clock_source_rate(&mut self, rate_hz: f64) {
        self.clock = ClockSource::new(rate_hz);
        self.backup.clock = self.clock;
    }

    /// Current clock rate in Hz.
    #[must_use]
    pub fn clock_rate(&self) -> f64 {
        self.clock.rate_hz
    }

    /// True while the CPU is blocked awaiting a line-state change (bus
    /// request, or halted with maskable interrupts disabled). Cleared by the
    /// next `set_line_state` from any device.
    #[must_use]
    pub fn suspended_until_line_state_change(&self) -> bool {
        self.inbox.suspend_until_line_change.load(Ordering::Acquire)
    }

    /// Current level of an input line.
    #[must_use]
    pub fn line_state(&self, line: Line) -> bool {
        match line {
            Line::Reset => self.line_reset,
            Line::BusReq => self.line_busreq,
            Line::Int => self.line_int,
            Line::Nmi => self.line_nmi,
        }
    }

    // === CE lines ===

    /// Assign the output bit position for a CE line.
    pub fn set_ce_line_output(&mut self, line: CeLine, mapped: bool, start_bit: u32) {
        let mask = if mapped { 1 << start_bit } else { 0 };
        match line {
            CeLine::Rd => self.ce_mask_rd = mask,
            CeLine::Wr => self.ce_mask_wr = mask,
        }
    }

    /// Fold this CPU's in-flight RD/WR state into a bus CE-line calculation.
    #[must_use]
    pub fn calculate_ce_line_state_memory(
        &self,
        _location: u16,
        _data: u8,
        current: u32,
    ) -> u32 {
        let flags = lock(&self.ce_flags);
        let mut state = current;
        if flags.rd {
            state |= self.ce_mask_rd;
        }
        if flags.wr {
            state |= self.ce_mask_wr;
        }
        state
    }

    /// Probe handle for CE-line calculations from other threads. Create it
    /// after the CE line outputs are assigned; it captures the masks.
    #[must_use]
    pub fn ce_line_probe(&self) -> CeLineProbe {
        CeLineProbe {
            flags: Arc::clone(&self.ce_flags),
            mask_rd: self.ce_mask_rd,
            mask_wr: self.ce_mask_wr,
        }
    }

    /// As [`Self::calculate_ce_line_state_memory`], for transparent accesses.
    #[must_use]
    pub fn calculate_ce_line_state_memory_transparent(
        &self,
        _location: u16,
        _data: u8,
        current: u32,
    ) -> u32 {
        let flags = lock(&self.ce_flags);
        let mut state = current;
        if flags.transparent_rd {
            state |= self.ce_mask_rd;
        }
        if flags.transparent_wr {
            state |= self.ce_mask_wr;
        }
        state
    }

    // === Bus port ===

    /// Timed read with the RD chip-enable asserted for its duration.
    pub(crate) fn read_mem<B: MemoryBus>(&mut self, bus: &mut B, address: u16) -> u8 {
        lock(&self.ce_flags).rd = true;
        let result = bus.read(address, false);
        lock(&self.ce_flags).rd = false;
        self.step_bus_time += result.elapsed;
        result.open_bus()
    }

    /// Timed write with the WR chip-enable asserted for its duration.
    pub(crate) fn write_mem<B: MemoryBus>(&mut self, bus: &mut B, address: u16, value: u8) {
        lock(&self.ce_flags).wr = true;
        let elapsed = bus.write(address, value, false);
        lock(&self.ce_flags).wr = false;
        self.step_bus_time += elapsed;
    }

    /// Side-effect-free read for the debugger.
    fn read_transparent<B: MemoryBus>(&self, bus: &mut B, address: u16) -> u8 {
        lock(&self.ce_flags).transparent_rd = true;
        let result = bus.read(address, true);
        lock(&self.ce_flags).transparent_rd = false;
        result.open_bus()
    }

    // === Line access application ===

    fn apply_pending_line_accesses(&mut self) {
        if !self.inbox.access_pending.load(Ordering::Acquire) {
            return;
        }
        let due: Vec<LineAccess> = {
            let mut pending = lock(&self.inbox.pending);
            let split = pending
                .iter()
                .position(|entry| entry.time > self.timeslice_progress)
                .unwrap_or(pending.len());
            if pending.len() == split {
                self.inbox.access_pending.store(false, Ordering::Release);
            }
            pending.drain(..split).collect()
        };
        for access in due {
            self.apply_line_access(access);
            self.applied_line_accesses.push(access);
        }
    }

    fn apply_line_access(&mut self, access: LineAccess) {
        match access.target {
            LineTarget::Line(line, asserted) => self.apply_line_state_change(line, asserted),
            LineTarget::ClockRate(rate_hz) => {
                debug!("clock rate -> {rate_hz}Hz");
                self.clock = ClockSource::new(rate_hz);
            }
        }
    }

    /// Apply a line-level change to the live state.
    pub(crate) fn apply_line_state_change(&mut self, line: Line, asserted: bool) {
        trace!("applying {} -> {}", line.name(), asserted);
        match line {
            Line::Reset => self.line_reset = asserted,
            Line::BusReq => self.line_busreq = asserted,
            Line::Int => self.line_int = asserted,
            Line::Nmi => {
                // Edge-triggered: latch the deasserted -> asserted transition
                if asserted && !self.line_nmi {
                    self.nmi_pending = true;
                }
                self.line_nmi = asserted;
            }
        }
    }

    /// Restore line levels directly (save-state load). No edge detection:
    /// a restored NMI level must not latch a new acceptance.
    pub(crate) fn set_line_levels(&mut self, reset: bool, busreq: bool, int: bool, nmi: bool) {
        self.line_reset = reset;
        self.line_busreq = busreq;
        self.line_int = int;
        self.line_nmi = nmi;
        self.nmi_pending = false;
    }

    // === Interrupt acceptance ===

    /// Leave the halt state, stepping PC past the HALT byte so the pushed
    /// return address resumes after it.
    fn wake_from_halt(&mut self) {
        if self.regs.halted {
            self.regs.pc = self.regs.pc.wrapping_add(1);
            self.regs.halted = false;
        }
    }

    fn accept_nmi<B: MemoryBus>(&mut self, bus: &mut B) -> Nanoseconds {
        trace!("accepting NMI, pc={:#06X}", self.regs.pc);
        self.wake_from_halt();
        self.regs.iff2 = self.regs.iff1;
        self.regs.iff1 = false;
        let pc = self.regs.pc;
        self.push_word(bus, pc);
        self.regs.pc = 0x0066;
        self.step_duration(11)
    }

    fn accept_int<B: MemoryBus>(&mut self, bus: &mut B) -> Nanoseconds {
        trace!("accepting INT, mode={}, pc={:#06X}", self.regs.im, self.regs.pc);
        self.wake_from_halt();
        self.regs.iff1 = false;
        self.regs.iff2 = false;
        // Modes 0 and 2 dispatch through the mode 1 sequence
        let pc = self.regs.pc;
        self.push_word(bus, pc);
        self.regs.pc = 0x0038;
        self.step_duration(13)
    }

    /// Architectural reset: control state cleared, general registers kept.
    fn apply_reset_state(&mut self) {
        debug!("reset");
        self.regs.pc = 0x0000;
        self.regs.i = 0x00;
        self.regs.r = 0x00;
        self.regs.iff1 = false;
        self.regs.iff2 = false;
        self.regs.im = 0;
        self.regs.halted = false;
        self.mask_interrupts_next_opcode = false;
        self.nmi_pending = false;
    }

    // === Timing ===

    /// Duration of a step: T-states at the programmed clock rate, plus any
    /// time the bus charged for this step's accesses.
    fn step_duration(&mut self, tstates: u32) -> Nanoseconds {
        let duration =
            self.clock.to_nanoseconds(Ticks::new(u64::from(tstates))) + self.step_bus_time;
        self.timeslice_progress += duration;
        duration
    }

    fn enter_suspend(&self) {
        self.inbox
            .suspend_until_line_change
            .store(true, Ordering::Release);
    }

    // === Rollback ===

    fn snapshot(&self) -> Backup {
        Backup {
            regs: self.regs,
            mask_interrupts_next_opcode: self.mask_interrupts_next_opcode,
            nmi_pending: self.nmi_pending,
            line_reset: self.line_reset,
            line_busreq: self.line_busreq,
            line_int: self.line_int,
            line_nmi: self.line_nmi,
            clock: self.clock,
            timeslice_progress: self.timeslice_progress,
            last_timeslice_length: self.last_timeslice_length,
            suspend_until_line_change: self.suspended_until_line_state_change(),
        }
    }

    /// Copy live state into the shadow and close the applied-access journal
    /// (used by save-state load as well).
    pub(crate) fn sync_shadow(&mut self) {
        self.backup = self.snapshot();
        self.applied_line_accesses.clear();
    }
}

impl Default for Z80 {
    fn default() -> Self {
        Self::new()
    }
}

// Instruction execution split into separate files for readability
mod execute;
mod state;

impl Processor for Z80 {
    fn execute_step<B: MemoryBus>(&mut self, bus: &mut B) -> Nanoseconds {
        self.step_bus_time = 0.0;

        self.apply_pending_line_accesses();

        // Acceptance priority: RESET, NMI, BUSREQ, INT
        if self.line_reset {
            self.apply_reset_state();
            return self.step_duration(3);
        }
        if self.nmi_pending {
            self.nmi_pending = false;
            return self.accept_nmi(bus);
        }
        if self.line_busreq {
            // Bus granted to another master; nothing executes until release
            self.enter_suspend();
            return 0.0;
        }
        if self.line_int && self.regs.iff1 && !self.mask_interrupts_next_opcode {
            return self.accept_int(bus);
        }

        if self.regs.halted {
            if !self.regs.iff1 {
                // Only a line change can wake us now
                self.enter_suspend();
            }
            return self.step_duration(4);
        }

        // Fetch and decode, charging bus time for each byte read
        let pc = self.regs.pc;
        let ce_flags = Arc::clone(&self.ce_flags);
        let mut fetch_time = 0.0;
        let decoded = decode(
            |address| {
                lock(&ce_flags).rd = true;
                let result = bus.read(address, false);
                lock(&ce_flags).rd = false;
                fetch_time += result.elapsed;
                result.open_bus()
            },
            pc,
        );
        self.step_bus_time += fetch_time;

        self.regs.add_refresh(decoded.m1_fetches);
        self.regs.pc = pc.wrapping_add(decoded.length);

        let extra = self.execute_instr(bus, decoded.instr);

        // EI shields exactly the instruction after it
        self.mask_interrupts_next_opcode = matches!(decoded.instr, Instr::Ei);

        self.step_duration(decoded.tstates + extra)
    }

    fn execute_rollback(&mut self) {
        let backup = self.backup.clone();
        self.regs = backup.regs;
        self.mask_interrupts_next_opcode = backup.mask_interrupts_next_opcode;
        self.nmi_pending = backup.nmi_pending;
        self.line_reset = backup.line_reset;
        self.line_busreq = backup.line_busreq;
        self.line_int = backup.line_int;
        self.line_nmi = backup.line_nmi;
        self.clock = backup.clock;
        self.timeslice_progress = backup.timeslice_progress;
        self.last_timeslice_length = backup.last_timeslice_length;
        {
            // Re-queue every access consumed since the commit point, so a
            // re-run of the timeslice sees the same inputs. Accesses that
            // arrived from other devices while we ran stay queued.
            let mut pending = lock(&self.inbox.pending);
            for access in self.applied_line_accesses.drain(..) {
                let position = pending
                    .iter()
                    .position(|entry| entry.time > access.time)
                    .unwrap_or(pending.len());
                pending.insert(position, access);
            }
            self.inbox
                .access_pending
                .store(!pending.is_empty(), Ordering::Release);
        }
        self.inbox
            .suspend_until_line_change
            .store(backup.suspend_until_line_change, Ordering::Release);
    }

    fn execute_commit(&mut self) {
        self.sync_shadow();
    }

    fn notify_upcoming_timeslice(&mut self, nanoseconds: Nanoseconds) {
        // Access times are relative to the timeslice origin; rebase pending
        // entries and our own progress against the slice that just ended.
        let previous = self.last_timeslice_length;
        if previous > 0.0 {
            let mut pending = lock(&self.inbox.pending);
            for access in pending.iter_mut() {
                access.time = (access.time - previous).max(0.0);
            }
        }
        self.timeslice_progress = (self.timeslice_progress - previous).max(0.0);
        self.last_timeslice_length = nanoseconds;
        // Between timeslices live and shadow state agree; fold the rebase in
        self.sync_shadow();
    }

    fn send_notify_upcoming_timeslice(&self) -> bool {
        true
    }

    fn uses_execute_suspend(&self) -> bool {
        true
    }

    fn initialize(&mut self) {
        self.regs = Registers {
            sp: 0xFFFF,
            ..Registers::default()
        };
        self.mask_interrupts_next_opcode = false;
        self.nmi_pending = false;
        self.line_reset = false;
        self.line_busreq = false;
        self.line_int = false;
        self.line_nmi = false;
        self.clock = ClockSource::new(DEFAULT_CLOCK_HZ);
        self.last_timeslice_length = 0.0;
        self.timeslice_progress = 0.0;
        lock(&self.inbox.pending).clear();
        self.inbox.access_pending.store(false, Ordering::Release);
        self.inbox
            .suspend_until_line_change
            .store(false, Ordering::Release);
        self.sync_shadow();
    }

    fn reset(&mut self) {
        self.apply_reset_state();
    }

    fn current_pc(&self) -> u32 {
        u32::from(self.regs.pc)
    }

    fn pc_width(&self) -> u32 {
        16
    }

    fn address_bus_width(&self) -> u32 {
        16
    }

    fn data_bus_width(&self) -> u32 {
        8
    }

    fn minimum_opcode_byte_size(&self) -> u32 {
        1
    }

    fn opcode_info<B: MemoryBus>(&self, bus: &mut B, address: u32) -> OpcodeInfo {
        let address = address as u16;
        let decoded = decode(|addr| self.read_transparent(bus, addr), address);
        let next_pc = address.wrapping_add(decoded.length);
        OpcodeInfo {
            mnemonic: disasm::mnemonic(&decoded.instr).to_string(),
            arguments: disasm::arguments(&decoded.instr, next_pc),
            byte_size: u32::from(decoded.length),
            tstates: decoded.tstates,
            valid: !matches!(
                decoded.instr,
                Instr::EdNop(_) | Instr::OutImm(_) | Instr::InImm(_)
            ),
        }
    }

    fn raw_data<B: MemoryBus>(&self, bus: &mut B, address: u32) -> u8 {
        self.read_transparent(bus, address as u16)
    }
}

/// All query paths supported by the Z80.
const Z80_QUERY_PATHS: &[&str] = &[
    // Main registers
    "a", "f", "b", "c", "d", "e", "h", "l",
    // Register pairs
    "af", "bc", "de", "hl",
    // Alternate pairs
    "af'", "bc'", "de'", "hl'",
    // Index registers
    "ix", "iy",
    // Other registers
    "sp", "pc", "i", "r",
    // Flags (individual)
    "flags.s", "flags.z", "flags.y", "flags.h",
    "flags.x", "flags.p", "flags.n", "flags.c",
    // Interrupt state
    "iff1", "iff2", "im", "mask_int_next",
    // CPU state
    "halted", "clock.rate",
    // Input line levels
    "lines.reset", "lines.busreq", "lines.int", "lines.nmi",
];

impl Observable for Z80 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            // Main registers
            "a" => Some(self.regs.a.into()),
            "f" => Some(self.regs.f.into()),
            "b" => Some(self.regs.b.into()),
            "c" => Some(self.regs.c.into()),
            "d" => Some(self.regs.d.into()),
            "e" => Some(self.regs.e.into()),
            "h" => Some(self.regs.h.into()),
            "l" => Some(self.regs.l.into()),

            // Register pairs
            "af" => Some(self.regs.af().into()),
            "bc" => Some(self.regs.bc().into()),
            "de" => Some(self.regs.de().into()),
            "hl" => Some(self.regs.hl().into()),

            // Alternate pairs
            "af'" => Some(self.regs.af_alt().into()),
            "bc'" => Some(self.regs.bc_alt().into()),
            "de'" => Some(self.regs.de_alt().into()),
            "hl'" => Some(self.regs.hl_alt().into()),

            // Index registers
            "ix" => Some(self.regs.ix.into()),
            "iy" => Some(self.regs.iy.into()),

            // Other registers
            "sp" => Some(self.regs.sp.into()),
            "pc" => Some(self.regs.pc.into()),
            "i" => Some(self.regs.i.into()),
            "r" => Some(self.regs.r.into()),

            // Individual flags
            "flags.s" => Some((self.regs.f & SF != 0).into()),
            "flags.z" => Some((self.regs.f & ZF != 0).into()),
            "flags.y" => Some((self.regs.f & YF != 0).into()),
            "flags.h" => Some((self.regs.f & HF != 0).into()),
            "flags.x" => Some((self.regs.f & XF != 0).into()),
            "flags.p" => Some((self.regs.f & PF != 0).into()),
            "flags.n" => Some((self.regs.f & NF != 0).into()),
            "flags.c" => Some((self.regs.f & CF != 0).into()),

            // Interrupt state
            "iff1" => Some(self.regs.iff1.into()),
            "iff2" => Some(self.regs.iff2.into()),
            "im" => Some(self.regs.im.into()),
            "mask_int_next" => Some(self.mask_interrupts_next_opcode.into()),

            // CPU state
            "halted" => Some(self.regs.halted.into()),
            "clock.rate" => Some(self.clock.rate_hz.into()),

            // Input line levels
            "lines.reset" => Some(self.line_reset.into()),
            "lines.busreq" => Some(self.line_busreq.into()),
            "lines.int" => Some(self.line_int.into()),
            "lines.nmi" => Some(self.line_nmi.into()),

            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        Z80_QUERY_PATHS
    }
}
