//! Instruction execution for the Z80.
//!
//! Each instruction runs as one indivisible step against the register file
//! and bus. The decoder supplies base T-state counts; executors return the
//! extra T-states for taken branches and repeating block forms.

#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

use device_core::MemoryBus;
use log::debug;

use crate::alu;
use crate::flags::{CF, HF, NF, PF, SF, XF, YF, ZF};
use crate::instr::{Addr, AluOp, BlockOp, Cond, Instr, Operand, Operand16, Reg16, Reg8, RotOp};

use super::Z80;

impl Z80 {
    /// Execute one decoded instruction. Returns the T-states to add on top
    /// of the decoder's base count (taken branches, block repeats).
    pub(crate) fn execute_instr<B: MemoryBus>(&mut self, bus: &mut B, instr: Instr) -> u32 {
        match instr {
            Instr::Nop | Instr::EdNop(_) => 0,

            Instr::Ld8 { dest, src } => {
                let value = self.read_operand(bus, src);
                self.write_operand(bus, dest, value);
                // LD A, I and LD A, R expose IFF2 through P/V
                if dest == Operand::Reg(Reg8::A)
                    && matches!(src, Operand::Reg(Reg8::I) | Operand::Reg(Reg8::R))
                {
                    self.regs.f = (self.regs.f & CF)
                        | alu::sz53(value)
                        | if self.regs.iff2 { PF } else { 0 };
                }
                0
            }

            Instr::Ld16 { dest, src } => {
                match (dest, src) {
                    (Operand16::Reg(rp), Operand16::Imm(value)) => self.set_reg16(rp, value),
                    (Operand16::Reg(rp), Operand16::Reg(src_rp)) => {
                        let value = self.get_reg16(src_rp);
                        self.set_reg16(rp, value);
                    }
                    (Operand16::Reg(rp), Operand16::Mem(addr)) => {
                        let lo = self.read_mem(bus, addr);
                        let hi = self.read_mem(bus, addr.wrapping_add(1));
                        self.set_reg16(rp, u16::from(lo) | (u16::from(hi) << 8));
                    }
                    (Operand16::Mem(addr), Operand16::Reg(rp)) => {
                        let value = self.get_reg16(rp);
                        self.write_mem(bus, addr, value as u8);
                        self.write_mem(bus, addr.wrapping_add(1), (value >> 8) as u8);
                    }
                    _ => unreachable!("decoder produces no other LD16 shape"),
                }
                0
            }

            Instr::Push(rp) => {
                let value = self.get_reg16(rp);
                self.push_word(bus, value);
                0
            }

            Instr::Pop(rp) => {
                let value = self.pop_word(bus);
                self.set_reg16(rp, value);
                0
            }

            Instr::ExAfAf => {
                let (af, af_alt) = (self.regs.af(), self.regs.af_alt());
                self.regs.set_af(af_alt);
                self.regs.set_af_alt(af);
                0
            }

            Instr::Exx => {
                let (bc, de, hl) = (self.regs.bc(), self.regs.de(), self.regs.hl());
                let (bc2, de2, hl2) = (self.regs.bc_alt(), self.regs.de_alt(), self.regs.hl_alt());
                self.regs.set_bc(bc2);
                self.regs.set_de(de2);
                self.regs.set_hl(hl2);
                self.regs.set_bc_alt(bc);
                self.regs.set_de_alt(de);
                self.regs.set_hl_alt(hl);
                0
            }

            Instr::ExDeHl => {
                let (de, hl) = (self.regs.de(), self.regs.hl());
                self.regs.set_de(hl);
                self.regs.set_hl(de);
                0
            }

            Instr::ExSpInd(rp) => {
                let sp = self.regs.sp;
                let lo = self.read_mem(bus, sp);
                let hi = self.read_mem(bus, sp.wrapping_add(1));
                let old = self.get_reg16(rp);
                self.write_mem(bus, sp, old as u8);
                self.write_mem(bus, sp.wrapping_add(1), (old >> 8) as u8);
                self.set_reg16(rp, u16::from(lo) | (u16::from(hi) << 8));
                0
            }

            Instr::Alu8 { op, src } => {
                let value = self.read_operand(bus, src);
                let carry = self.regs.f & CF != 0;
                let result = match op {
                    AluOp::Add => alu::add8(self.regs.a, value, false),
                    AluOp::Adc => alu::add8(self.regs.a, value, carry),
                    AluOp::Sub => alu::sub8(self.regs.a, value, false),
                    AluOp::Sbc => alu::sub8(self.regs.a, value, carry),
                    AluOp::And => alu::and8(self.regs.a, value),
                    AluOp::Xor => alu::xor8(self.regs.a, value),
                    AluOp::Or => alu::or8(self.regs.a, value),
                    AluOp::Cp => alu::cp8(self.regs.a, value),
                };
                self.regs.a = result.value;
                self.regs.f = result.flags;
                0
            }

            Instr::Inc8(operand) => {
                let value = self.read_operand(bus, operand);
                let result = alu::inc8(value);
                self.write_operand(bus, operand, result.value);
                self.regs.f = (self.regs.f & CF) | result.flags;
                0
            }

            Instr::Dec8(operand) => {
                let value = self.read_operand(bus, operand);
                let result = alu::dec8(value);
                self.write_operand(bus, operand, result.value);
                self.regs.f = (self.regs.f & CF) | result.flags;
                0
            }

            Instr::Add16 { dest, src } => {
                let (result, flags) = alu::add16(self.get_reg16(dest), self.get_reg16(src));
                self.set_reg16(dest, result);
                self.regs.f = (self.regs.f & (SF | ZF | PF)) | flags;
                0
            }

            Instr::Adc16(rp) => {
                let carry = self.regs.f & CF != 0;
                let (result, flags) = alu::adc16(self.regs.hl(), self.get_reg16(rp), carry);
                self.regs.set_hl(result);
                self.regs.f = flags;
                0
            }

            Instr::Sbc16(rp) => {
                let carry = self.regs.f & CF != 0;
                let (result, flags) = alu::sbc16(self.regs.hl(), self.get_reg16(rp), carry);
                self.regs.set_hl(result);
                self.regs.f = flags;
                0
            }

            Instr::Inc16(rp) => {
                let value = self.get_reg16(rp).wrapping_add(1);
                self.set_reg16(rp, value);
                0
            }

            Instr::Dec16(rp) => {
                let value = self.get_reg16(rp).wrapping_sub(1);
                self.set_reg16(rp, value);
                0
            }

            Instr::Daa => {
                let result = alu::daa(self.regs.a, self.regs.f);
                self.regs.a = result.value;
                self.regs.f = result.flags;
                0
            }

            Instr::Cpl => {
                self.regs.a = !self.regs.a;
                self.regs.f = (self.regs.f & (SF | ZF | PF | CF))
                    | HF
                    | NF
                    | (self.regs.a & (YF | XF));
                0
            }

            Instr::Neg => {
                let result = alu::sub8(0, self.regs.a, false);
                self.regs.a = result.value;
                self.regs.f = result.flags;
                0
            }

            Instr::Ccf => {
                let old_carry = self.regs.f & CF != 0;
                self.regs.f = (self.regs.f & (SF | ZF | PF))
                    | (self.regs.a & (YF | XF))
                    | if old_carry { HF } else { CF };
                0
            }

            Instr::Scf => {
                self.regs.f =
                    (self.regs.f & (SF | ZF | PF)) | (self.regs.a & (YF | XF)) | CF;
                0
            }

            Instr::Halt => {
                // PC stays on the HALT byte; interrupt acceptance steps past it
                self.regs.halted = true;
                self.regs.pc = self.regs.pc.wrapping_sub(1);
                0
            }

            Instr::Di => {
                self.regs.iff1 = false;
                self.regs.iff2 = false;
                0
            }

            Instr::Ei => {
                // The one-instruction interrupt shield is armed by the caller
                self.regs.iff1 = true;
                self.regs.iff2 = true;
                0
            }

            Instr::Im(mode) => {
                self.regs.im = mode;
                0
            }

            Instr::Rlca => {
                let carry = self.regs.a >> 7;
                self.regs.a = self.regs.a.rotate_left(1);
                self.accumulator_rotate_flags(carry != 0);
                0
            }

            Instr::Rrca => {
                let carry = self.regs.a & 1;
                self.regs.a = self.regs.a.rotate_right(1);
                self.accumulator_rotate_flags(carry != 0);
                0
            }

            Instr::Rla => {
                let carry = self.regs.a >> 7;
                self.regs.a = (self.regs.a << 1) | (self.regs.f & CF);
                self.accumulator_rotate_flags(carry != 0);
                0
            }

            Instr::Rra => {
                let carry = self.regs.a & 1;
                self.regs.a = (self.regs.a >> 1) | ((self.regs.f & CF) << 7);
                self.accumulator_rotate_flags(carry != 0);
                0
            }

            Instr::Rot { op, operand, copy } => {
                let value = self.read_operand(bus, operand);
                let carry = self.regs.f & CF != 0;
                let result = match op {
                    RotOp::Rlc => alu::rlc8(value),
                    RotOp::Rrc => alu::rrc8(value),
                    RotOp::Rl => alu::rl8(value, carry),
                    RotOp::Rr => alu::rr8(value, carry),
                    RotOp::Sla => alu::sla8(value),
                    RotOp::Sra => alu::sra8(value),
                    RotOp::Sll => alu::sll8(value),
                    RotOp::Srl => alu::srl8(value),
                };
                self.write_operand(bus, operand, result.value);
                if let Some(reg) = copy {
                    self.set_reg8(reg, result.value);
                }
                self.regs.f = result.flags;
                0
            }

            Instr::Bit { bit, operand } => {
                let value = self.read_operand(bus, operand);
                let set = value & (1 << bit) != 0;
                // X/Y: register forms mirror the operand; indexed forms take
                // the high byte of the effective address
                let xy_source = match operand {
                    Operand::Mem(addr @ (Addr::Ix(_) | Addr::Iy(_))) => {
                        (self.effective_addr(addr) >> 8) as u8
                    }
                    _ => value,
                };
                self.regs.f = (self.regs.f & CF)
                    | HF
                    | (xy_source & (YF | XF))
                    | if set { 0 } else { ZF | PF }
                    | if bit == 7 && set { SF } else { 0 };
                0
            }

            Instr::Res { bit, operand, copy } => {
                let value = self.read_operand(bus, operand) & !(1 << bit);
                self.write_operand(bus, operand, value);
                if let Some(reg) = copy {
                    self.set_reg8(reg, value);
                }
                0
            }

            Instr::Set { bit, operand, copy } => {
                let value = self.read_operand(bus, operand) | (1 << bit);
                self.write_operand(bus, operand, value);
                if let Some(reg) = copy {
                    self.set_reg8(reg, value);
                }
                0
            }

            Instr::Rld => {
                let hl = self.regs.hl();
                let mem = self.read_mem(bus, hl);
                let a = self.regs.a;
                self.write_mem(bus, hl, (mem << 4) | (a & 0x0F));
                self.regs.a = (a & 0xF0) | (mem >> 4);
                self.regs.f = (self.regs.f & CF) | alu::sz53p(self.regs.a);
                0
            }

            Instr::Rrd => {
                let hl = self.regs.hl();
                let mem = self.read_mem(bus, hl);
                let a = self.regs.a;
                self.write_mem(bus, hl, (a << 4) | (mem >> 4));
                self.regs.a = (a & 0xF0) | (mem & 0x0F);
                self.regs.f = (self.regs.f & CF) | alu::sz53p(self.regs.a);
                0
            }

            Instr::Jp { cond, addr } => {
                if self.condition(cond) {
                    self.regs.pc = addr;
                }
                0
            }

            Instr::JpInd(rp) => {
                self.regs.pc = self.get_reg16(rp);
                0
            }

            Instr::Jr { cond, offset } => {
                if self.condition(cond) {
                    self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
                    if cond.is_some() {
                        5
                    } else {
                        0
                    }
                } else {
                    0
                }
            }

            Instr::Djnz { offset } => {
                self.regs.b = self.regs.b.wrapping_sub(1);
                if self.regs.b != 0 {
                    self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
                    5
                } else {
                    0
                }
            }

            Instr::Call { cond, addr } => {
                if self.condition(cond) {
                    let pc = self.regs.pc;
                    self.push_word(bus, pc);
                    self.regs.pc = addr;
                    if cond.is_some() {
                        7
                    } else {
                        0
                    }
                } else {
                    0
                }
            }

            Instr::Ret { cond } => {
                if self.condition(cond) {
                    self.regs.pc = self.pop_word(bus);
                    if cond.is_some() {
                        6
                    } else {
                        0
                    }
                } else {
                    0
                }
            }

            Instr::Reti | Instr::Retn => {
                // Every ED-range return restores IFF1 from IFF2
                self.regs.pc = self.pop_word(bus);
                self.regs.iff1 = self.regs.iff2;
                0
            }

            Instr::Rst(vector) => {
                let pc = self.regs.pc;
                self.push_word(bus, pc);
                self.regs.pc = u16::from(vector);
                0
            }

            Instr::Block(op) => self.execute_block(bus, op),

            Instr::OutImm(port) => {
                debug!("OUT (${port:02X}), A executed as no-op; port bus not modeled");
                0
            }

            Instr::InImm(port) => {
                debug!("IN A, (${port:02X}) executed as no-op; port bus not modeled");
                0
            }
        }
    }

    /// Block transfer/compare operations. Returns the repeat penalty when
    /// the repeating forms loop.
    fn execute_block<B: MemoryBus>(&mut self, bus: &mut B, op: BlockOp) -> u32 {
        match op {
            BlockOp::Ldi | BlockOp::Ldd | BlockOp::Ldir | BlockOp::Lddr => {
                let forward = matches!(op, BlockOp::Ldi | BlockOp::Ldir);
                let value = self.read_mem(bus, self.regs.hl());
                let de = self.regs.de();
                self.write_mem(bus, de, value);

                let step = if forward { 1u16 } else { 0xFFFF };
                self.regs.set_hl(self.regs.hl().wrapping_add(step));
                self.regs.set_de(de.wrapping_add(step));
                self.regs.set_bc(self.regs.bc().wrapping_sub(1));

                // Undocumented: X and Y mirror bits 3 and 1 of value + A
                let n = value.wrapping_add(self.regs.a);
                self.regs.f = (self.regs.f & (SF | ZF | CF))
                    | (n & XF)
                    | if n & 0x02 != 0 { YF } else { 0 }
                    | if self.regs.bc() != 0 { PF } else { 0 };

                if matches!(op, BlockOp::Ldir | BlockOp::Lddr) && self.regs.bc() != 0 {
                    self.regs.pc = self.regs.pc.wrapping_sub(2);
                    5
                } else {
                    0
                }
            }

            BlockOp::Cpi | BlockOp::Cpd | BlockOp::Cpir | BlockOp::Cpdr => {
                let forward = matches!(op, BlockOp::Cpi | BlockOp::Cpir);
                let value = self.read_mem(bus, self.regs.hl());

                let result = self.regs.a.wrapping_sub(value);
                let half = (self.regs.a & 0x0F) < (value & 0x0F);
                let n = result.wrapping_sub(u8::from(half));

                let step = if forward { 1u16 } else { 0xFFFF };
                self.regs.set_hl(self.regs.hl().wrapping_add(step));
                self.regs.set_bc(self.regs.bc().wrapping_sub(1));

                self.regs.f = (self.regs.f & CF)
                    | NF
                    | if result == 0 { ZF } else { 0 }
                    | if result & 0x80 != 0 { SF } else { 0 }
                    | if half { HF } else { 0 }
                    | (n & XF)
                    | if n & 0x02 != 0 { YF } else { 0 }
                    | if self.regs.bc() != 0 { PF } else { 0 };

                if matches!(op, BlockOp::Cpir | BlockOp::Cpdr)
                    && self.regs.bc() != 0
                    && result != 0
                {
                    self.regs.pc = self.regs.pc.wrapping_sub(2);
                    5
                } else {
                    0
                }
            }
        }
    }

    /// RLCA/RRCA/RLA/RRA leave S, Z and P/V untouched.
    fn accumulator_rotate_flags(&mut self, carry: bool) {
        self.regs.f = (self.regs.f & (SF | ZF | PF))
            | (self.regs.a & (YF | XF))
            | if carry { CF } else { 0 };
    }

    fn condition(&self, cond: Option<Cond>) -> bool {
        match cond {
            None => true,
            Some(Cond::Nz) => self.regs.f & ZF == 0,
            Some(Cond::Z) => self.regs.f & ZF != 0,
            Some(Cond::Nc) => self.regs.f & CF == 0,
            Some(Cond::C) => self.regs.f & CF != 0,
            Some(Cond::Po) => self.regs.f & PF == 0,
            Some(Cond::Pe) => self.regs.f & PF != 0,
            Some(Cond::P) => self.regs.f & SF == 0,
            Some(Cond::M) => self.regs.f & SF != 0,
        }
    }

    fn get_reg8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::B => self.regs.b,
            Reg8::C => self.regs.c,
            Reg8::D => self.regs.d,
            Reg8::E => self.regs.e,
            Reg8::H => self.regs.h,
            Reg8::L => self.regs.l,
            Reg8::A => self.regs.a,
            Reg8::I => self.regs.i,
            Reg8::R => self.regs.r,
            Reg8::IxH => (self.regs.ix >> 8) as u8,
            Reg8::IxL => self.regs.ix as u8,
            Reg8::IyH => (self.regs.iy >> 8) as u8,
            Reg8::IyL => self.regs.iy as u8,
        }
    }

    fn set_reg8(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::B => self.regs.b = value,
            Reg8::C => self.regs.c = value,
            Reg8::D => self.regs.d = value,
            Reg8::E => self.regs.e = value,
            Reg8::H => self.regs.h = value,
            Reg8::L => self.regs.l = value,
            Reg8::A => self.regs.a = value,
            Reg8::I => self.regs.i = value,
            // LD R, A writes the full byte, including the shadowed bit 7
            Reg8::R => self.regs.r = value,
            Reg8::IxH => self.regs.ix = (self.regs.ix & 0x00FF) | (u16::from(value) << 8),
            Reg8::IxL => self.regs.ix = (self.regs.ix & 0xFF00) | u16::from(value),
            Reg8::IyH => self.regs.iy = (self.regs.iy & 0x00FF) | (u16::from(value) << 8),
            Reg8::IyL => self.regs.iy = (self.regs.iy & 0xFF00) | u16::from(value),
        }
    }

    fn get_reg16(&self, rp: Reg16) -> u16 {
        match rp {
            Reg16::Bc => self.regs.bc(),
            Reg16::De => self.regs.de(),
            Reg16::Hl => self.regs.hl(),
            Reg16::Sp => self.regs.sp,
            Reg16::Af => self.regs.af(),
            Reg16::Ix => self.regs.ix,
            Reg16::Iy => self.regs.iy,
        }
    }

    fn set_reg16(&mut self, rp: Reg16, value: u16) {
        match rp {
            Reg16::Bc => self.regs.set_bc(value),
            Reg16::De => self.regs.set_de(value),
            Reg16::Hl => self.regs.set_hl(value),
            Reg16::Sp => self.regs.sp = value,
            Reg16::Af => self.regs.set_af(value),
            Reg16::Ix => self.regs.ix = value,
            Reg16::Iy => self.regs.iy = value,
        }
    }

    fn effective_addr(&self, addr: Addr) -> u16 {
        match addr {
            Addr::Bc => self.regs.bc(),
            Addr::De => self.regs.de(),
            Addr::Hl => self.regs.hl(),
            Addr::Ix(d) => self.regs.ix.wrapping_add(d as u16),
            Addr::Iy(d) => self.regs.iy.wrapping_add(d as u16),
            Addr::Abs(a) => a,
        }
    }

    fn read_operand<B: MemoryBus>(&mut self, bus: &mut B, operand: Operand) -> u8 {
        match operand {
            Operand::Reg(reg) => self.get_reg8(reg),
            Operand::Imm(value) => value,
            Operand::Mem(addr) => {
                let address = self.effective_addr(addr);
                self.read_mem(bus, address)
            }
        }
    }

    fn write_operand<B: MemoryBus>(&mut self, bus: &mut B, operand: Operand, value: u8) {
        match operand {
            Operand::Reg(reg) => self.set_reg8(reg, value),
            Operand::Mem(addr) => {
                let address = self.effective_addr(addr);
                self.write_mem(bus, address, value);
            }
            Operand::Imm(_) => unreachable!("immediates are never destinations"),
        }
    }

    pub(crate) fn push_word<B: MemoryBus>(&mut self, bus: &mut B, value: u16) {
        let sp = self.regs.sp.wrapping_sub(1);
        self.write_mem(bus, sp, (value >> 8) as u8);
        let sp = sp.wrapping_sub(1);
        self.write_mem(bus, sp, value as u8);
        self.regs.sp = sp;
    }

    pub(crate) fn pop_word<B: MemoryBus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.read_mem(bus, self.regs.sp);
        let hi = self.read_mem(bus, self.regs.sp.wrapping_add(1));
        self.regs.sp = self.regs.sp.wrapping_add(2);
        u16::from(lo) | (u16::from(hi) << 8)
    }
}
