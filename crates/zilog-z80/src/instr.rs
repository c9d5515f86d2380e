//! Decoded Z80 instruction representation.
//!
//! One `Instr` corresponds to one machine instruction with all operand
//! bytes (immediates, displacements, addresses) already consumed from the
//! instruction stream. Index-register substitution has been applied by the
//! decoder, so executors never look at prefix bytes.

/// An 8-bit register operand, including the undocumented index halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    A,
    /// Interrupt vector base.
    I,
    /// Memory refresh counter.
    R,
    IxH,
    IxL,
    IyH,
    IyL,
}

/// A 16-bit register operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg16 {
    Bc,
    De,
    Hl,
    Sp,
    Af,
    Ix,
    Iy,
}

/// A memory operand: where the effective address comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addr {
    Bc,
    De,
    Hl,
    /// IX plus signed displacement.
    Ix(i8),
    /// IY plus signed displacement.
    Iy(i8),
    /// Absolute 16-bit address.
    Abs(u16),
}

/// An 8-bit operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg8),
    Imm(u8),
    Mem(Addr),
}

/// A 16-bit operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand16 {
    Reg(Reg16),
    Imm(u16),
    /// Word in memory at an absolute address.
    Mem(u16),
}

/// Jump/call/return condition codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Nz,
    Z,
    Nc,
    C,
    Po,
    Pe,
    P,
    M,
}

/// 8-bit accumulator arithmetic/logic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

/// Rotate and shift operations (CB space).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    /// Undocumented shift-left-logical (bit 0 set).
    Sll,
    Srl,
}

/// Block transfer/compare operations (ED space).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOp {
    Ldi,
    Ldd,
    Ldir,
    Lddr,
    Cpi,
    Cpd,
    Cpir,
    Cpdr,
}

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    Nop,

    // Loads
    Ld8 { dest: Operand, src: Operand },
    Ld16 { dest: Operand16, src: Operand16 },
    Push(Reg16),
    Pop(Reg16),

    // Exchanges
    ExAfAf,
    Exx,
    ExDeHl,
    /// EX (SP), HL/IX/IY.
    ExSpInd(Reg16),

    // 8-bit arithmetic/logic (destination is always A)
    Alu8 { op: AluOp, src: Operand },
    Inc8(Operand),
    Dec8(Operand),

    // 16-bit arithmetic
    Add16 { dest: Reg16, src: Reg16 },
    Adc16(Reg16),
    Sbc16(Reg16),
    Inc16(Reg16),
    Dec16(Reg16),

    // Accumulator/flag ops
    Daa,
    Cpl,
    Neg,
    Ccf,
    Scf,

    // Control state
    Halt,
    Di,
    Ei,
    Im(u8),

    // Accumulator rotates (flag-preserving forms)
    Rlca,
    Rrca,
    Rla,
    Rra,

    // CB space
    /// Rotate/shift. `copy` carries the register that additionally receives
    /// the result in the undocumented doubly-prefixed forms.
    Rot { op: RotOp, operand: Operand, copy: Option<Reg8> },
    Bit { bit: u8, operand: Operand },
    Res { bit: u8, operand: Operand, copy: Option<Reg8> },
    Set { bit: u8, operand: Operand, copy: Option<Reg8> },

    // Digit rotates
    Rld,
    Rrd,

    // Jumps
    Jp { cond: Option<Cond>, addr: u16 },
    /// JP (HL)/(IX)/(IY).
    JpInd(Reg16),
    Jr { cond: Option<Cond>, offset: i8 },
    Djnz { offset: i8 },

    // Calls and returns
    Call { cond: Option<Cond>, addr: u16 },
    Ret { cond: Option<Cond> },
    Reti,
    Retn,
    Rst(u8),

    // Block transfer/compare
    Block(BlockOp),

    // I/O opcodes: decoded for the disassembler, executed without bus
    // traffic (port-based bus communication is not modeled).
    OutImm(u8),
    InImm(u8),

    /// Unmapped ED-space entry; behaves as NOP with 8 T-states.
    EdNop(u8),
}
