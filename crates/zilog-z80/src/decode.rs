//! Z80 instruction decoder.
//!
//! Decoding consumes bytes through a caller-supplied fetch function, so the
//! same tables serve live execution (timed reads, refresh accounting) and
//! the disassembler (transparent reads). Index-prefix substitution happens
//! here: executors receive operands with IX/IY already resolved.

#![allow(clippy::cast_possible_wrap)] // Displacement bytes are signed by definition.

use crate::instr::{
    Addr, AluOp, BlockOp, Cond, Instr, Operand, Operand16, Reg16, Reg8, RotOp,
};

/// A fully decoded instruction with its encoding metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub instr: Instr,
    /// Encoded length in bytes, prefixes included.
    pub length: u16,
    /// Base duration in T-states: the not-taken path for conditional forms,
    /// the non-repeating path for block forms. Prefix overhead is included.
    pub tstates: u32,
    /// Number of M1 (opcode-position) fetches; each one bumps the refresh
    /// counter. Operand and displacement bytes are not M1 fetches.
    pub m1_fetches: u8,
}

/// Active index-register override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexMode {
    Hl,
    Ix,
    Iy,
}

/// Decode one instruction starting at `address`.
///
/// `fetch` is called for each byte in stream order. It must not have
/// execution side effects of its own; timing and refresh are derived from
/// the returned `Decoded`.
pub fn decode<F: FnMut(u16) -> u8>(fetch: F, address: u16) -> Decoded {
    Decoder {
        fetch,
        start: address,
        pos: address,
        index: IndexMode::Hl,
        extra_prefix_tstates: 0,
        m1_fetches: 0,
    }
    .run()
}

struct Decoder<F> {
    fetch: F,
    start: u16,
    pos: u16,
    index: IndexMode,
    /// Cost of duplicate DD/FD prefixes beyond the effective one.
    extra_prefix_tstates: u32,
    m1_fetches: u8,
}

impl<F: FnMut(u16) -> u8> Decoder<F> {
    fn next_byte(&mut self) -> u8 {
        let byte = (self.fetch)(self.pos);
        self.pos = self.pos.wrapping_add(1);
        byte
    }

    /// Fetch a byte in M1 (opcode) position, counting the refresh increment.
    fn next_m1(&mut self) -> u8 {
        self.m1_fetches += 1;
        self.next_byte()
    }

    fn next_word(&mut self) -> u16 {
        let lo = self.next_byte();
        let hi = self.next_byte();
        u16::from(lo) | (u16::from(hi) << 8)
    }

    fn run(mut self) -> Decoded {
        let mut prefixes: u32 = 0;
        loop {
            let op = self.next_m1();
            match op {
                0xDD | 0xFD => {
                    // An address space holding nothing but prefixes never
                    // forms an instruction; stop after one full wrap
                    prefixes += 1;
                    if prefixes > 0x10000 {
                        return self.finish(Instr::Nop, self.t(4, 0));
                    }
                    self.set_index(if op == 0xDD {
                        IndexMode::Ix
                    } else {
                        IndexMode::Iy
                    });
                }
                0xCB => {
                    return if self.index == IndexMode::Hl {
                        self.decode_cb()
                    } else {
                        self.decode_indexed_cb()
                    };
                }
                0xED => return self.decode_ed(),
                _ => return self.decode_base(op),
            }
        }
    }

    /// Record a DD/FD prefix. Only the last one before a non-prefix byte
    /// takes effect; every one costs 4 T-states.
    fn set_index(&mut self, mode: IndexMode) {
        if self.index != IndexMode::Hl {
            self.extra_prefix_tstates += 4;
        }
        self.index = mode;
    }

    /// Cost of all consumed DD/FD prefixes.
    fn prefix_overhead(&self) -> u32 {
        match self.index {
            IndexMode::Hl => 0,
            _ => 4 + self.extra_prefix_tstates,
        }
    }

    /// Total T-states: `base` for the plain form, plus prefix overhead and
    /// (for displacement forms) the indexed addressing penalty.
    fn t(&self, base: u32, indexed_extra: u32) -> u32 {
        match self.index {
            IndexMode::Hl => base,
            _ => base + 4 + self.extra_prefix_tstates + indexed_extra,
        }
    }

    fn finish(&self, instr: Instr, tstates: u32) -> Decoded {
        Decoded {
            instr,
            length: self.pos.wrapping_sub(self.start),
            tstates,
            m1_fetches: self.m1_fetches,
        }
    }

    /// Register from a 3-bit field, without index substitution.
    fn reg8_plain(code: u8) -> Reg8 {
        match code & 7 {
            0 => Reg8::B,
            1 => Reg8::C,
            2 => Reg8::D,
            3 => Reg8::E,
            4 => Reg8::H,
            5 => Reg8::L,
            7 => Reg8::A,
            _ => unreachable!("(HL) field handled by caller"),
        }
    }

    /// Register from a 3-bit field with H/L -> IXH/IXL/IYH/IYL substitution.
    fn reg8_sub(&self, code: u8) -> Reg8 {
        match (code & 7, self.index) {
            (4, IndexMode::Ix) => Reg8::IxH,
            (5, IndexMode::Ix) => Reg8::IxL,
            (4, IndexMode::Iy) => Reg8::IyH,
            (5, IndexMode::Iy) => Reg8::IyL,
            _ => Self::reg8_plain(code),
        }
    }

    /// The HL register slot, honoring an active index prefix.
    fn hl_reg(&self) -> Reg16 {
        match self.index {
            IndexMode::Hl => Reg16::Hl,
            IndexMode::Ix => Reg16::Ix,
            IndexMode::Iy => Reg16::Iy,
        }
    }

    /// The (HL) memory slot. Fetches the displacement byte when indexed.
    fn hl_mem(&mut self) -> Addr {
        match self.index {
            IndexMode::Hl => Addr::Hl,
            IndexMode::Ix => Addr::Ix(self.next_byte() as i8),
            IndexMode::Iy => Addr::Iy(self.next_byte() as i8),
        }
    }

    /// Register pair from a 2-bit field (SP variant).
    fn rp16(&self, code: u8) -> Reg16 {
        match code & 3 {
            0 => Reg16::Bc,
            1 => Reg16::De,
            2 => self.hl_reg(),
            _ => Reg16::Sp,
        }
    }

    /// Register pair from a 2-bit field (AF variant, for PUSH/POP).
    fn rp16_af(&self, code: u8) -> Reg16 {
        match code & 3 {
            0 => Reg16::Bc,
            1 => Reg16::De,
            2 => self.hl_reg(),
            _ => Reg16::Af,
        }
    }

    fn cond(code: u8) -> Cond {
        match code & 7 {
            0 => Cond::Nz,
            1 => Cond::Z,
            2 => Cond::Nc,
            3 => Cond::C,
            4 => Cond::Po,
            5 => Cond::Pe,
            6 => Cond::P,
            _ => Cond::M,
        }
    }

    fn alu_op(code: u8) -> AluOp {
        match code & 7 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }

    fn rot_op(code: u8) -> RotOp {
        match code & 7 {
            0 => RotOp::Rlc,
            1 => RotOp::Rrc,
            2 => RotOp::Rl,
            3 => RotOp::Rr,
            4 => RotOp::Sla,
            5 => RotOp::Sra,
            6 => RotOp::Sll,
            _ => RotOp::Srl,
        }
    }

    #[allow(clippy::too_many_lines)]
    fn decode_base(&mut self, op: u8) -> Decoded {
        match op {
            // NOP
            0x00 => self.finish(Instr::Nop, self.t(4, 0)),

            // LD rr, nn
            0x01 | 0x11 | 0x21 | 0x31 => {
                let dest = Operand16::Reg(self.rp16(op >> 4));
                let value = self.next_word();
                self.finish(
                    Instr::Ld16 {
                        dest,
                        src: Operand16::Imm(value),
                    },
                    self.t(10, 0),
                )
            }

            // LD (BC), A / LD (DE), A
            0x02 | 0x12 => {
                let dest = if op == 0x02 { Addr::Bc } else { Addr::De };
                self.finish(
                    Instr::Ld8 {
                        dest: Operand::Mem(dest),
                        src: Operand::Reg(Reg8::A),
                    },
                    self.t(7, 0),
                )
            }

            // INC rr
            0x03 | 0x13 | 0x23 | 0x33 => {
                let instr = Instr::Inc16(self.rp16(op >> 4));
                self.finish(instr, self.t(6, 0))
            }

            // DEC rr
            0x0B | 0x1B | 0x2B | 0x3B => {
                let instr = Instr::Dec16(self.rp16(op >> 4));
                self.finish(instr, self.t(6, 0))
            }

            // INC r / INC (HL)
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                let r = (op >> 3) & 7;
                if r == 6 {
                    let mem = self.hl_mem();
                    self.finish(Instr::Inc8(Operand::Mem(mem)), self.t(11, 8))
                } else {
                    let reg = self.reg8_sub(r);
                    self.finish(Instr::Inc8(Operand::Reg(reg)), self.t(4, 0))
                }
            }

            // DEC r / DEC (HL)
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                let r = (op >> 3) & 7;
                if r == 6 {
                    let mem = self.hl_mem();
                    self.finish(Instr::Dec8(Operand::Mem(mem)), self.t(11, 8))
                } else {
                    let reg = self.reg8_sub(r);
                    self.finish(Instr::Dec8(Operand::Reg(reg)), self.t(4, 0))
                }
            }

            // LD r, n / LD (HL), n
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                let r = (op >> 3) & 7;
                if r == 6 {
                    // Displacement precedes the immediate in the stream
                    let mem = self.hl_mem();
                    let value = self.next_byte();
                    self.finish(
                        Instr::Ld8 {
                            dest: Operand::Mem(mem),
                            src: Operand::Imm(value),
                        },
                        self.t(10, 5),
                    )
                } else {
                    let reg = self.reg8_sub(r);
                    let value = self.next_byte();
                    self.finish(
                        Instr::Ld8 {
                            dest: Operand::Reg(reg),
                            src: Operand::Imm(value),
                        },
                        self.t(7, 0),
                    )
                }
            }

            // Accumulator rotates
            0x07 => self.finish(Instr::Rlca, self.t(4, 0)),
            0x0F => self.finish(Instr::Rrca, self.t(4, 0)),
            0x17 => self.finish(Instr::Rla, self.t(4, 0)),
            0x1F => self.finish(Instr::Rra, self.t(4, 0)),

            // EX AF, AF'
            0x08 => self.finish(Instr::ExAfAf, self.t(4, 0)),

            // ADD HL, rr
            0x09 | 0x19 | 0x29 | 0x39 => {
                let instr = Instr::Add16 {
                    dest: self.hl_reg(),
                    src: self.rp16(op >> 4),
                };
                self.finish(instr, self.t(11, 0))
            }

            // LD A, (BC) / LD A, (DE)
            0x0A | 0x1A => {
                let src = if op == 0x0A { Addr::Bc } else { Addr::De };
                self.finish(
                    Instr::Ld8 {
                        dest: Operand::Reg(Reg8::A),
                        src: Operand::Mem(src),
                    },
                    self.t(7, 0),
                )
            }

            // DJNZ e
            0x10 => {
                let offset = self.next_byte() as i8;
                self.finish(Instr::Djnz { offset }, self.t(8, 0))
            }

            // JR e
            0x18 => {
                let offset = self.next_byte() as i8;
                self.finish(Instr::Jr { cond: None, offset }, self.t(12, 0))
            }

            // JR cc, e
            0x20 | 0x28 | 0x30 | 0x38 => {
                let cond = Self::cond(((op >> 3) & 7) - 4);
                let offset = self.next_byte() as i8;
                self.finish(
                    Instr::Jr {
                        cond: Some(cond),
                        offset,
                    },
                    self.t(7, 0),
                )
            }

            // LD (nn), HL
            0x22 => {
                let src = Operand16::Reg(self.hl_reg());
                let addr = self.next_word();
                self.finish(
                    Instr::Ld16 {
                        dest: Operand16::Mem(addr),
                        src,
                    },
                    self.t(16, 0),
                )
            }

            // LD HL, (nn)
            0x2A => {
                let dest = Operand16::Reg(self.hl_reg());
                let addr = self.next_word();
                self.finish(
                    Instr::Ld16 {
                        dest,
                        src: Operand16::Mem(addr),
                    },
                    self.t(16, 0),
                )
            }

            // DAA / CPL / SCF / CCF
            0x27 => self.finish(Instr::Daa, self.t(4, 0)),
            0x2F => self.finish(Instr::Cpl, self.t(4, 0)),
            0x37 => self.finish(Instr::Scf, self.t(4, 0)),
            0x3F => self.finish(Instr::Ccf, self.t(4, 0)),

            // LD (nn), A
            0x32 => {
                let addr = self.next_word();
                self.finish(
                    Instr::Ld8 {
                        dest: Operand::Mem(Addr::Abs(addr)),
                        src: Operand::Reg(Reg8::A),
                    },
                    self.t(13, 0),
                )
            }

            // LD A, (nn)
            0x3A => {
                let addr = self.next_word();
                self.finish(
                    Instr::Ld8 {
                        dest: Operand::Reg(Reg8::A),
                        src: Operand::Mem(Addr::Abs(addr)),
                    },
                    self.t(13, 0),
                )
            }

            // HALT (occupies the LD (HL), (HL) slot)
            0x76 => self.finish(Instr::Halt, self.t(4, 0)),

            // LD r, r'
            0x40..=0x7F => {
                let dest = (op >> 3) & 7;
                let src = op & 7;
                if src == 6 {
                    let mem = self.hl_mem();
                    self.finish(
                        Instr::Ld8 {
                            dest: Operand::Reg(Self::reg8_plain(dest)),
                            src: Operand::Mem(mem),
                        },
                        self.t(7, 8),
                    )
                } else if dest == 6 {
                    let mem = self.hl_mem();
                    self.finish(
                        Instr::Ld8 {
                            dest: Operand::Mem(mem),
                            src: Operand::Reg(Self::reg8_plain(src)),
                        },
                        self.t(7, 8),
                    )
                } else {
                    self.finish(
                        Instr::Ld8 {
                            dest: Operand::Reg(self.reg8_sub(dest)),
                            src: Operand::Reg(self.reg8_sub(src)),
                        },
                        self.t(4, 0),
                    )
                }
            }

            // ALU A, r / ALU A, (HL)
            0x80..=0xBF => {
                let alu = Self::alu_op((op >> 3) & 7);
                let r = op & 7;
                if r == 6 {
                    let mem = self.hl_mem();
                    self.finish(
                        Instr::Alu8 {
                            op: alu,
                            src: Operand::Mem(mem),
                        },
                        self.t(7, 8),
                    )
                } else {
                    self.finish(
                        Instr::Alu8 {
                            op: alu,
                            src: Operand::Reg(self.reg8_sub(r)),
                        },
                        self.t(4, 0),
                    )
                }
            }

            // RET cc
            0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => {
                let cond = Self::cond((op >> 3) & 7);
                self.finish(Instr::Ret { cond: Some(cond) }, self.t(5, 0))
            }

            // POP rr
            0xC1 | 0xD1 | 0xE1 | 0xF1 => {
                let instr = Instr::Pop(self.rp16_af(op >> 4));
                self.finish(instr, self.t(10, 0))
            }

            // JP cc, nn
            0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => {
                let cond = Self::cond((op >> 3) & 7);
                let addr = self.next_word();
                self.finish(
                    Instr::Jp {
                        cond: Some(cond),
                        addr,
                    },
                    self.t(10, 0),
                )
            }

            // JP nn
            0xC3 => {
                let addr = self.next_word();
                self.finish(Instr::Jp { cond: None, addr }, self.t(10, 0))
            }

            // CALL cc, nn
            0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => {
                let cond = Self::cond((op >> 3) & 7);
                let addr = self.next_word();
                self.finish(
                    Instr::Call {
                        cond: Some(cond),
                        addr,
                    },
                    self.t(10, 0),
                )
            }

            // PUSH rr
            0xC5 | 0xD5 | 0xE5 | 0xF5 => {
                let instr = Instr::Push(self.rp16_af(op >> 4));
                self.finish(instr, self.t(11, 0))
            }

            // ALU A, n
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                let alu = Self::alu_op((op >> 3) & 7);
                let value = self.next_byte();
                self.finish(
                    Instr::Alu8 {
                        op: alu,
                        src: Operand::Imm(value),
                    },
                    self.t(7, 0),
                )
            }

            // RST p
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                self.finish(Instr::Rst(op & 0x38), self.t(11, 0))
            }

            // RET
            0xC9 => self.finish(Instr::Ret { cond: None }, self.t(10, 0)),

            // CALL nn
            0xCD => {
                let addr = self.next_word();
                self.finish(Instr::Call { cond: None, addr }, self.t(17, 0))
            }

            // OUT (n), A / IN A, (n) - decoded but not driven onto a bus
            0xD3 => {
                let port = self.next_byte();
                self.finish(Instr::OutImm(port), self.t(11, 0))
            }
            0xDB => {
                let port = self.next_byte();
                self.finish(Instr::InImm(port), self.t(11, 0))
            }

            // EXX
            0xD9 => self.finish(Instr::Exx, self.t(4, 0)),

            // EX (SP), HL
            0xE3 => {
                let instr = Instr::ExSpInd(self.hl_reg());
                self.finish(instr, self.t(19, 0))
            }

            // JP (HL)
            0xE9 => {
                let instr = Instr::JpInd(self.hl_reg());
                self.finish(instr, self.t(4, 0))
            }

            // EX DE, HL (never index-substituted)
            0xEB => self.finish(Instr::ExDeHl, self.t(4, 0)),

            // DI / EI
            0xF3 => self.finish(Instr::Di, self.t(4, 0)),
            0xFB => self.finish(Instr::Ei, self.t(4, 0)),

            // LD SP, HL
            0xF9 => {
                let instr = Instr::Ld16 {
                    dest: Operand16::Reg(Reg16::Sp),
                    src: Operand16::Reg(self.hl_reg()),
                };
                self.finish(instr, self.t(6, 0))
            }

            // Prefix bytes never reach here
            0xCB | 0xDD | 0xED | 0xFD => unreachable!("prefixes handled by run()"),
        }
    }

    /// CB-prefixed opcodes (rotates, shifts, bit operations).
    fn decode_cb(&mut self) -> Decoded {
        let op = self.next_m1();
        let group = op >> 6;
        let bit = (op >> 3) & 7;
        let r = op & 7;

        let operand = if r == 6 {
            Operand::Mem(Addr::Hl)
        } else {
            Operand::Reg(Self::reg8_plain(r))
        };

        let (instr, tstates) = match group {
            0 => (
                Instr::Rot {
                    op: Self::rot_op(bit),
                    operand,
                    copy: None,
                },
                if r == 6 { 15 } else { 8 },
            ),
            1 => (Instr::Bit { bit, operand }, if r == 6 { 12 } else { 8 }),
            2 => (
                Instr::Res {
                    bit,
                    operand,
                    copy: None,
                },
                if r == 6 { 15 } else { 8 },
            ),
            _ => (
                Instr::Set {
                    bit,
                    operand,
                    copy: None,
                },
                if r == 6 { 15 } else { 8 },
            ),
        };
        self.finish(instr, tstates)
    }

    /// DDCB/FDCB-prefixed opcodes. The displacement byte precedes the final
    /// opcode byte; neither is an M1 fetch. Register-field variants copy the
    /// memory result into the register (undocumented).
    fn decode_indexed_cb(&mut self) -> Decoded {
        let mem = self.hl_mem();
        let op = self.next_byte();
        let group = op >> 6;
        let bit = (op >> 3) & 7;
        let r = op & 7;

        let operand = Operand::Mem(mem);
        let copy = if r == 6 || group == 1 {
            None
        } else {
            Some(Self::reg8_plain(r))
        };

        let (instr, base) = match group {
            0 => (
                Instr::Rot {
                    op: Self::rot_op(bit),
                    operand,
                    copy,
                },
                23,
            ),
            1 => (Instr::Bit { bit, operand }, 20),
            2 => (Instr::Res { bit, operand, copy }, 23),
            _ => (Instr::Set { bit, operand, copy }, 23),
        };
        self.finish(instr, base + self.extra_prefix_tstates)
    }

    /// ED-prefixed opcodes. A stale DD/FD prefix is charged but otherwise
    /// ignored; unmapped entries are NOP-equivalents with 8 T-states.
    fn decode_ed(&mut self) -> Decoded {
        let overhead = self.prefix_overhead();
        self.index = IndexMode::Hl;

        let op = self.next_m1();
        match op {
            // SBC HL, rr
            0x42 | 0x52 | 0x62 | 0x72 => {
                let instr = Instr::Sbc16(self.rp16(op >> 4));
                self.finish(instr, 15 + overhead)
            }

            // ADC HL, rr
            0x4A | 0x5A | 0x6A | 0x7A => {
                let instr = Instr::Adc16(self.rp16(op >> 4));
                self.finish(instr, 15 + overhead)
            }

            // LD (nn), rr
            0x43 | 0x53 | 0x63 | 0x73 => {
                let src = Operand16::Reg(self.rp16(op >> 4));
                let addr = self.next_word();
                self.finish(
                    Instr::Ld16 {
                        dest: Operand16::Mem(addr),
                        src,
                    },
                    20 + overhead,
                )
            }

            // LD rr, (nn)
            0x4B | 0x5B | 0x6B | 0x7B => {
                let dest = Operand16::Reg(self.rp16(op >> 4));
                let addr = self.next_word();
                self.finish(
                    Instr::Ld16 {
                        dest,
                        src: Operand16::Mem(addr),
                    },
                    20 + overhead,
                )
            }

            // NEG (documented at 0x44, mirrored across the quadrant)
            0x44 | 0x4C | 0x54 | 0x5C | 0x64 | 0x6C | 0x74 | 0x7C => {
                self.finish(Instr::Neg, 8 + overhead)
            }

            // RETI / RETN (all mirrors of 0x45 behave as RETN)
            0x4D => self.finish(Instr::Reti, 14 + overhead),
            0x45 | 0x55 | 0x5D | 0x65 | 0x6D | 0x75 | 0x7D => {
                self.finish(Instr::Retn, 14 + overhead)
            }

            // IM 0/1/2 with undocumented mirrors
            0x46 | 0x4E | 0x66 | 0x6E => self.finish(Instr::Im(0), 8 + overhead),
            0x56 | 0x76 => self.finish(Instr::Im(1), 8 + overhead),
            0x5E | 0x7E => self.finish(Instr::Im(2), 8 + overhead),

            // LD I, A / LD R, A / LD A, I / LD A, R
            0x47 => self.finish(
                Instr::Ld8 {
                    dest: Operand::Reg(Reg8::I),
                    src: Operand::Reg(Reg8::A),
                },
                9 + overhead,
            ),
            0x4F => self.finish(
                Instr::Ld8 {
                    dest: Operand::Reg(Reg8::R),
                    src: Operand::Reg(Reg8::A),
                },
                9 + overhead,
            ),
            0x57 => self.finish(
                Instr::Ld8 {
                    dest: Operand::Reg(Reg8::A),
                    src: Operand::Reg(Reg8::I),
                },
                9 + overhead,
            ),
            0x5F => self.finish(
                Instr::Ld8 {
                    dest: Operand::Reg(Reg8::A),
                    src: Operand::Reg(Reg8::R),
                },
                9 + overhead,
            ),

            // RRD / RLD
            0x67 => self.finish(Instr::Rrd, 18 + overhead),
            0x6F => self.finish(Instr::Rld, 18 + overhead),

            // Block transfer/compare
            0xA0 => self.finish(Instr::Block(BlockOp::Ldi), 16 + overhead),
            0xA1 => self.finish(Instr::Block(BlockOp::Cpi), 16 + overhead),
            0xA8 => self.finish(Instr::Block(BlockOp::Ldd), 16 + overhead),
            0xA9 => self.finish(Instr::Block(BlockOp::Cpd), 16 + overhead),
            0xB0 => self.finish(Instr::Block(BlockOp::Ldir), 16 + overhead),
            0xB1 => self.finish(Instr::Block(BlockOp::Cpir), 16 + overhead),
            0xB8 => self.finish(Instr::Block(BlockOp::Lddr), 16 + overhead),
            0xB9 => self.finish(Instr::Block(BlockOp::Cpdr), 16 + overhead),

            // Everything else (including the I/O group) is unmapped
            _ => self.finish(Instr::EdNop(op), 8 + overhead),
        }
    }
}
