//! Zilog Z80 CPU core.
//!
//! Executes each opcode as one indivisible step and reports its duration, so
//! a host scheduler can run the CPU speculatively within a timeslice and
//! commit or roll back the result. Covers the full base, CB, ED, DD/FD and
//! DDCB/FDCB opcode spaces with documented T-state timing, the dual register
//! bank, the 7-bit refresh counter, and the RESET/BUSREQ/INT/NMI lines.
//!
//! Opcodes execute with all bus traffic at one logical instant; the I/O port
//! opcodes and interrupt modes 0/2 are decoded but dispatch through
//! simplified paths (see `DESIGN.md` at the workspace root).

mod alu;
mod cpu;
mod decode;
mod disasm;
mod flags;
mod instr;
mod registers;

pub use cpu::{CeLine, CeLineProbe, Line, LineAccess, LineSender, LineTarget, Z80, DEFAULT_CLOCK_HZ};
pub use decode::{decode, Decoded};
pub use disasm::{arguments, mnemonic};
pub use flags::{CF, HF, NF, PF, SF, XF, YF, ZF};
pub use instr::{Addr, AluOp, BlockOp, Cond, Instr, Operand, Operand16, Reg16, Reg8, RotOp};
pub use registers::Registers;
