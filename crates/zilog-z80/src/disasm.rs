//! Disassembly rendering for decoded instructions.
//!
//! Produces the mnemonic/argument string pair consumed by debugger views.
//! Relative jumps are rendered as absolute targets, which is why the
//! address after the instruction is passed in.

use crate::instr::{Addr, AluOp, BlockOp, Cond, Instr, Operand, Operand16, Reg16, Reg8, RotOp};

/// Mnemonic for an instruction.
#[must_use]
pub fn mnemonic(instr: &Instr) -> &'static str {
    match instr {
        Instr::Nop | Instr::EdNop(_) => "NOP",
        Instr::Ld8 { .. } | Instr::Ld16 { .. } => "LD",
        Instr::Push(_) => "PUSH",
        Instr::Pop(_) => "POP",
        Instr::ExAfAf | Instr::ExDeHl | Instr::ExSpInd(_) => "EX",
        Instr::Exx => "EXX",
        Instr::Alu8 { op, .. } => match op {
            AluOp::Add => "ADD",
            AluOp::Adc => "ADC",
            AluOp::Sub => "SUB",
            AluOp::Sbc => "SBC",
            AluOp::And => "AND",
            AluOp::Xor => "XOR",
            AluOp::Or => "OR",
            AluOp::Cp => "CP",
        },
        Instr::Inc8(_) | Instr::Inc16(_) => "INC",
        Instr::Dec8(_) | Instr::Dec16(_) => "DEC",
        Instr::Add16 { .. } => "ADD",
        Instr::Adc16(_) => "ADC",
        Instr::Sbc16(_) => "SBC",
        Instr::Daa => "DAA",
        Instr::Cpl => "CPL",
        Instr::Neg => "NEG",
        Instr::Ccf => "CCF",
        Instr::Scf => "SCF",
        Instr::Halt => "HALT",
        Instr::Di => "DI",
        Instr::Ei => "EI",
        Instr::Im(_) => "IM",
        Instr::Rlca => "RLCA",
        Instr::Rrca => "RRCA",
        Instr::Rla => "RLA",
        Instr::Rra => "RRA",
        Instr::Rot { op, .. } => match op {
            RotOp::Rlc => "RLC",
            RotOp::Rrc => "RRC",
            RotOp::Rl => "RL",
            RotOp::Rr => "RR",
            RotOp::Sla => "SLA",
            RotOp::Sra => "SRA",
            RotOp::Sll => "SLL",
            RotOp::Srl => "SRL",
        },
        Instr::Bit { .. } => "BIT",
        Instr::Res { .. } => "RES",
        Instr::Set { .. } => "SET",
        Instr::Rld => "RLD",
        Instr::Rrd => "RRD",
        Instr::Jp { .. } | Instr::JpInd(_) => "JP",
        Instr::Jr { .. } => "JR",
        Instr::Djnz { .. } => "DJNZ",
        Instr::Call { .. } => "CALL",
        Instr::Ret { .. } => "RET",
        Instr::Reti => "RETI",
        Instr::Retn => "RETN",
        Instr::Rst(_) => "RST",
        Instr::Block(op) => match op {
            BlockOp::Ldi => "LDI",
            BlockOp::Ldd => "LDD",
            BlockOp::Ldir => "LDIR",
            BlockOp::Lddr => "LDDR",
            BlockOp::Cpi => "CPI",
            BlockOp::Cpd => "CPD",
            BlockOp::Cpir => "CPIR",
            BlockOp::Cpdr => "CPDR",
        },
        Instr::OutImm(_) => "OUT",
        Instr::InImm(_) => "IN",
    }
}

/// Rendered argument list for an instruction.
///
/// `next_pc` is the address of the following instruction, used to resolve
/// relative jump targets.
#[must_use]
pub fn arguments(instr: &Instr, next_pc: u16) -> String {
    match instr {
        Instr::Nop
        | Instr::EdNop(_)
        | Instr::Exx
        | Instr::Daa
        | Instr::Cpl
        | Instr::Neg
        | Instr::Ccf
        | Instr::Scf
        | Instr::Halt
        | Instr::Di
        | Instr::Ei
        | Instr::Rlca
        | Instr::Rrca
        | Instr::Rla
        | Instr::Rra
        | Instr::Rld
        | Instr::Rrd
        | Instr::Reti
        | Instr::Retn
        | Instr::Block(_)
        | Instr::Ret { cond: None } => String::new(),

        Instr::Ld8 { dest, src } => format!("{}, {}", operand(dest), operand(src)),
        Instr::Ld16 { dest, src } => format!("{}, {}", operand16(dest), operand16(src)),
        Instr::Push(rp) | Instr::Pop(rp) => reg16(*rp).to_string(),

        Instr::ExAfAf => "AF, AF'".to_string(),
        Instr::ExDeHl => "DE, HL".to_string(),
        Instr::ExSpInd(rp) => format!("(SP), {}", reg16(*rp)),

        Instr::Alu8 { op, src } => match op {
            AluOp::Add | AluOp::Adc | AluOp::Sbc => format!("A, {}", operand(src)),
            _ => operand(src),
        },
        Instr::Inc8(op) | Instr::Dec8(op) => operand(op),
        Instr::Inc16(rp) | Instr::Dec16(rp) => reg16(*rp).to_string(),
        Instr::Add16 { dest, src } => format!("{}, {}", reg16(*dest), reg16(*src)),
        Instr::Adc16(rp) | Instr::Sbc16(rp) => format!("HL, {}", reg16(*rp)),

        Instr::Im(mode) => format!("{mode}"),

        Instr::Rot { operand: op, copy, .. } => with_copy(operand(op), *copy),
        Instr::Bit { bit, operand: op } => format!("{bit}, {}", operand(op)),
        Instr::Res { bit, operand: op, copy } | Instr::Set { bit, operand: op, copy } => {
            with_copy(format!("{bit}, {}", operand(op)), *copy)
        }

        Instr::Jp { cond, addr } => branch_target(*cond, format!("${addr:04X}")),
        Instr::JpInd(rp) => format!("({})", reg16(*rp)),
        Instr::Jr { cond, offset } => {
            let target = next_pc.wrapping_add(*offset as u16);
            branch_target(*cond, format!("${target:04X}"))
        }
        Instr::Djnz { offset } => {
            let target = next_pc.wrapping_add(*offset as u16);
            format!("${target:04X}")
        }
        Instr::Call { cond, addr } => branch_target(*cond, format!("${addr:04X}")),
        Instr::Ret { cond: Some(cc) } => cond_name(*cc).to_string(),
        Instr::Rst(vector) => format!("${vector:02X}"),

        Instr::OutImm(port) => format!("(${port:02X}), A"),
        Instr::InImm(port) => format!("A, (${port:02X})"),
    }
}

fn with_copy(args: String, copy: Option<Reg8>) -> String {
    match copy {
        Some(reg) => format!("{args}, {}", reg8(reg)),
        None => args,
    }
}

fn branch_target(cond: Option<Cond>, target: String) -> String {
    match cond {
        Some(cc) => format!("{}, {target}", cond_name(cc)),
        None => target,
    }
}

fn operand(op: &Operand) -> String {
    match op {
        Operand::Reg(reg) => reg8(*reg).to_string(),
        Operand::Imm(value) => format!("${value:02X}"),
        Operand::Mem(addr) => mem(addr),
    }
}

fn operand16(op: &Operand16) -> String {
    match op {
        Operand16::Reg(rp) => reg16(*rp).to_string(),
        Operand16::Imm(value) => format!("${value:04X}"),
        Operand16::Mem(addr) => format!("(${addr:04X})"),
    }
}

fn mem(addr: &Addr) -> String {
    match addr {
        Addr::Bc => "(BC)".to_string(),
        Addr::De => "(DE)".to_string(),
        Addr::Hl => "(HL)".to_string(),
        Addr::Ix(d) => indexed("IX", *d),
        Addr::Iy(d) => indexed("IY", *d),
        Addr::Abs(a) => format!("(${a:04X})"),
    }
}

fn indexed(base: &str, displacement: i8) -> String {
    if displacement < 0 {
        format!("({base}{displacement})")
    } else {
        format!("({base}+{displacement})")
    }
}

fn reg8(reg: Reg8) -> &'static str {
    match reg {
        Reg8::B => "B",
        Reg8::C => "C",
        Reg8::D => "D",
        Reg8::E => "E",
        Reg8::H => "H",
        Reg8::L => "L",
        Reg8::A => "A",
        Reg8::I => "I",
        Reg8::R => "R",
        Reg8::IxH => "IXH",
        Reg8::IxL => "IXL",
        Reg8::IyH => "IYH",
        Reg8::IyL => "IYL",
    }
}

fn reg16(reg: Reg16) -> &'static str {
    match reg {
        Reg16::Bc => "BC",
        Reg16::De => "DE",
        Reg16::Hl => "HL",
        Reg16::Sp => "SP",
        Reg16::Af => "AF",
        Reg16::Ix => "IX",
        Reg16::Iy => "IY",
    }
}

fn cond_name(cond: Cond) -> &'static str {
    match cond {
        Cond::Nz => "NZ",
        Cond::Z => "Z",
        Cond::Nc => "NC",
        Cond::C => "C",
        Cond::Po => "PO",
        Cond::Pe => "PE",
        Cond::P => "P",
        Cond::M => "M",
    }
}
