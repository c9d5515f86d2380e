//! Unit tests for individual Z80 instructions.
//!
//! Each test loads a small machine-code program into a flat 64K bus, runs
//! the CPU until HALT, and checks registers, memory and timing.

use device_core::{FlatMemory, Processor};
use zilog_z80::{CF, HF, NF, PF, SF, YF, ZF, Z80};

fn machine(program: &[u8]) -> (Z80, FlatMemory) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut bus = FlatMemory::new();
    bus.load(0x0000, program);
    let mut cpu = Z80::new();
    cpu.initialize();
    (cpu, bus)
}

/// Execute one step and return its duration in T-states.
fn step_tstates(cpu: &mut Z80, bus: &mut FlatMemory) -> u32 {
    let nanoseconds = cpu.execute_step(bus);
    (nanoseconds * cpu.clock_rate() / 1_000_000_000.0).round() as u32
}

/// Run until the CPU halts, return the number of steps taken.
fn run_until_halt(cpu: &mut Z80, bus: &mut FlatMemory) -> u32 {
    let mut steps = 0;
    while !cpu.registers().halted && steps < 10_000 {
        cpu.execute_step(bus);
        steps += 1;
    }
    assert!(cpu.registers().halted, "program never reached HALT");
    steps
}

#[test]
fn nop_advances_pc_and_refresh() {
    let (mut cpu, mut bus) = machine(&[0x00, 0x76]); // NOP; HALT

    assert_eq!(step_tstates(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.registers().pc, 0x0001);
    assert_eq!(cpu.registers().r, 1);
}

#[test]
fn add_a_b_flag_vector() {
    // LD A, $3A; LD B, $76; ADD A, B; HALT
    let (mut cpu, mut bus) = machine(&[0x3E, 0x3A, 0x06, 0x76, 0x80, 0x76]);
    run_until_halt(&mut cpu, &mut bus);

    let regs = cpu.registers();
    assert_eq!(regs.a, 0xB0);
    // S=1, Z=0, H=1, P/V=1, N=0, C=0, Y=1, X=0
    assert_eq!(regs.f, SF | HF | PF | YF);
}

#[test]
fn daa_after_add() {
    // LD A, $15; LD B, $27; ADD A, B; DAA; HALT
    let (mut cpu, mut bus) = machine(&[0x3E, 0x15, 0x06, 0x27, 0x80, 0x27, 0x76]);
    run_until_halt(&mut cpu, &mut bus);

    let regs = cpu.registers();
    assert_eq!(regs.a, 0x42);
    assert_eq!(regs.f & CF, 0);
    assert_eq!(regs.f & NF, 0);
    assert_eq!(regs.f & HF, 0);
}

#[test]
fn ldir_block_move() {
    // LD HL, $1000; LD DE, $2000; LD BC, $0003; LDIR; HALT
    let (mut cpu, mut bus) = machine(&[
        0x21, 0x00, 0x10, // LD HL, $1000
        0x11, 0x00, 0x20, // LD DE, $2000
        0x01, 0x03, 0x00, // LD BC, $0003
        0xED, 0xB0, //       LDIR
        0x76, //             HALT
    ]);
    bus.load(0x1000, &[0x11, 0x22, 0x33]);

    for _ in 0..3 {
        assert_eq!(step_tstates(&mut cpu, &mut bus), 10); // LD rr, nn
    }
    // Two repeating iterations at 21 T-states, the final one at 16
    assert_eq!(step_tstates(&mut cpu, &mut bus), 21);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 21);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 16);

    assert_eq!(bus.peek(0x2000), 0x11);
    assert_eq!(bus.peek(0x2001), 0x22);
    assert_eq!(bus.peek(0x2002), 0x33);

    let regs = cpu.registers();
    assert_eq!(regs.bc(), 0);
    assert_eq!(regs.hl(), 0x1003);
    assert_eq!(regs.de(), 0x2003);
    assert_eq!(regs.f & PF, 0, "P/V clears when BC reaches zero");
}

#[test]
fn cpir_stops_on_match() {
    // LD HL, $1000; LD BC, $0004; LD A, $22; CPIR; HALT
    let (mut cpu, mut bus) = machine(&[
        0x21, 0x00, 0x10, 0x01, 0x04, 0x00, 0x3E, 0x22, 0xED, 0xB1, 0x76,
    ]);
    bus.load(0x1000, &[0x11, 0x22, 0x33, 0x44]);
    run_until_halt(&mut cpu, &mut bus);

    let regs = cpu.registers();
    assert_eq!(regs.hl(), 0x1002, "HL stops just past the match");
    assert_eq!(regs.bc(), 2);
    assert_ne!(regs.f & ZF, 0, "match sets Z");
    assert_ne!(regs.f & PF, 0, "BC still nonzero");
}

#[test]
fn push_pop_and_call_ret() {
    let (mut cpu, mut bus) = machine(&[
        0x31, 0x00, 0x80, // LD SP, $8000
        0x01, 0x34, 0x12, // LD BC, $1234
        0xC5, //             PUSH BC
        0x01, 0x00, 0x00, // LD BC, $0000
        0xC1, //             POP BC
        0xCD, 0x10, 0x00, // CALL $0010
        0x76, //             HALT
    ]);
    bus.load(0x0010, &[0x3E, 0x42, 0xC9]); // LD A, $42; RET
    run_until_halt(&mut cpu, &mut bus);

    let regs = cpu.registers();
    assert_eq!(regs.bc(), 0x1234, "BC restored by PUSH/POP");
    assert_eq!(regs.a, 0x42, "subroutine ran");
    assert_eq!(regs.sp, 0x8000, "SP balanced");
}

#[test]
fn conditional_ret_timing() {
    let (mut cpu, mut bus) = machine(&[
        0x31, 0x00, 0x80, // LD SP, $8000
        0xCD, 0x10, 0x00, // CALL $0010
        0x76, //             HALT
    ]);
    bus.load(0x0010, &[0xAF, 0xC0, 0xC8]); // XOR A; RET NZ; RET Z

    assert_eq!(step_tstates(&mut cpu, &mut bus), 10); // LD SP
    assert_eq!(step_tstates(&mut cpu, &mut bus), 17); // CALL
    assert_eq!(step_tstates(&mut cpu, &mut bus), 4); //  XOR A (Z set)
    assert_eq!(step_tstates(&mut cpu, &mut bus), 5); //  RET NZ not taken
    assert_eq!(step_tstates(&mut cpu, &mut bus), 11); // RET Z taken
    assert_eq!(cpu.registers().pc, 0x0006);
}

#[test]
fn djnz_loop() {
    // LD B, 5; LD A, 0; loop: INC A; DJNZ loop; HALT
    let (mut cpu, mut bus) = machine(&[0x06, 0x05, 0x3E, 0x00, 0x3C, 0x10, 0xFD, 0x76]);
    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.registers().a, 5);
    assert_eq!(cpu.registers().b, 0);
}

#[test]
fn exchange_group() {
    let (mut cpu, mut bus) = machine(&[
        0x21, 0x34, 0x12, // LD HL, $1234
        0x11, 0x78, 0x56, // LD DE, $5678
        0xEB, //             EX DE, HL
        0xD9, //             EXX
        0x21, 0xCD, 0xAB, // LD HL, $ABCD
        0xD9, //             EXX
        0x76, //             HALT
    ]);
    run_until_halt(&mut cpu, &mut bus);

    let regs = cpu.registers();
    assert_eq!(regs.hl(), 0x5678, "EX DE, HL then banked away and back");
    assert_eq!(regs.de(), 0x1234);
    assert_eq!(regs.hl_alt(), 0xABCD, "alternate bank kept its value");
}

#[test]
fn ex_af_swaps_flags() {
    let (mut cpu, mut bus) = machine(&[
        0x37, //             SCF (C=1)
        0x08, //             EX AF, AF'
        0xAF, //             XOR A (clears C, sets Z)
        0x08, //             EX AF, AF'
        0x76, //             HALT
    ]);
    run_until_halt(&mut cpu, &mut bus);

    let regs = cpu.registers();
    assert_ne!(regs.f & CF, 0, "original carry restored");
    assert_ne!(regs.f_alt & ZF, 0, "alternate F holds the XOR result");
}

#[test]
fn ex_sp_hl() {
    let (mut cpu, mut bus) = machine(&[
        0x31, 0x00, 0x80, // LD SP, $8000
        0x21, 0x34, 0x12, // LD HL, $1234
        0x11, 0x78, 0x56, // LD DE, $5678
        0xD5, //             PUSH DE
        0xE3, //             EX (SP), HL
        0x76, //             HALT
    ]);
    run_until_halt(&mut cpu, &mut bus);

    let regs = cpu.registers();
    assert_eq!(regs.hl(), 0x5678);
    assert_eq!(bus.peek(0x7FFE), 0x34);
    assert_eq!(bus.peek(0x7FFF), 0x12);
}

#[test]
fn indexed_load_and_store() {
    let (mut cpu, mut bus) = machine(&[
        0xDD, 0x21, 0x00, 0x10, // LD IX, $1000
        0xDD, 0x36, 0x05, 0x99, // LD (IX+5), $99
        0xDD, 0x7E, 0x05, //       LD A, (IX+5)
        0xDD, 0x46, 0xFE, //       LD B, (IX-2)
        0x76, //                   HALT
    ]);
    bus.poke(0x0FFE, 0x17);
    run_until_halt(&mut cpu, &mut bus);

    let regs = cpu.registers();
    assert_eq!(bus.peek(0x1005), 0x99);
    assert_eq!(regs.a, 0x99);
    assert_eq!(regs.b, 0x17);
}

#[test]
fn indexed_timing() {
    let (mut cpu, mut bus) = machine(&[
        0xDD, 0x21, 0x00, 0x10, // LD IX, $1000 (14)
        0xDD, 0x34, 0x02, //       INC (IX+2) (23)
        0xDD, 0x24, //             INC IXH (8, undocumented)
        0x76,
    ]);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 14);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 23);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.registers().ix, 0x1100);
}

#[test]
fn cb_rotates_and_bits() {
    let (mut cpu, mut bus) = machine(&[
        0x06, 0x81, // LD B, $81
        0xCB, 0x00, // RLC B -> $03, carry set
        0xCB, 0x40, // BIT 0, B -> Z clear
        0xCB, 0x80, // RES 0, B -> $02
        0xCB, 0xC8, // SET 1, B (already set)
        0x76,
    ]);
    run_until_halt(&mut cpu, &mut bus);

    let regs = cpu.registers();
    assert_eq!(regs.b, 0x02);
    assert_eq!(regs.f & ZF, 0, "BIT 0 saw a set bit");
    assert_ne!(regs.f & HF, 0, "BIT always sets H");
}

#[test]
fn ddcb_copy_form_writes_register_and_memory() {
    let (mut cpu, mut bus) = machine(&[
        0xDD, 0x21, 0x00, 0x10, // LD IX, $1000
        0xDD, 0xCB, 0x03, 0x06, // RLC (IX+3)
        0xDD, 0xCB, 0x03, 0x01, // RLC (IX+3), C (undocumented copy)
        0x76,
    ]);
    bus.poke(0x1003, 0x80);

    assert_eq!(step_tstates(&mut cpu, &mut bus), 14);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 23);
    assert_eq!(bus.peek(0x1003), 0x01);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 23);
    assert_eq!(bus.peek(0x1003), 0x02);
    assert_eq!(cpu.registers().c, 0x02, "copy form also lands in C");
}

#[test]
fn sixteen_bit_arithmetic() {
    let (mut cpu, mut bus) = machine(&[
        0x21, 0xFF, 0x0F, // LD HL, $0FFF
        0x01, 0x01, 0x00, // LD BC, $0001
        0x09, //             ADD HL, BC -> $1000, H set
        0xED, 0x42, //       SBC HL, BC -> $0FFF
        0x76,
    ]);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 10);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 10);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 11);
    let regs = cpu.registers();
    assert_eq!(regs.hl(), 0x1000);
    assert_ne!(regs.f & HF, 0);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 15);
    assert_eq!(cpu.registers().hl(), 0x0FFF);
}

#[test]
fn neg_and_cpl() {
    let (mut cpu, mut bus) = machine(&[
        0x3E, 0x01, // LD A, 1
        0xED, 0x44, // NEG -> $FF, carry set
        0x2F, //       CPL -> $00
        0x76,
    ]);
    run_until_halt(&mut cpu, &mut bus);

    let regs = cpu.registers();
    assert_eq!(regs.a, 0x00);
    assert_ne!(regs.f & NF, 0, "CPL sets N");
    assert_ne!(regs.f & CF, 0, "CPL leaves NEG's carry");
}

#[test]
fn rld_rotates_digits() {
    let (mut cpu, mut bus) = machine(&[
        0x21, 0x00, 0x10, // LD HL, $1000
        0x3E, 0x7A, //       LD A, $7A
        0xED, 0x6F, //       RLD
        0x76,
    ]);
    bus.poke(0x1000, 0x31);
    run_until_halt(&mut cpu, &mut bus);

    assert_eq!(cpu.registers().a, 0x73);
    assert_eq!(bus.peek(0x1000), 0x1A);
}

#[test]
fn ld_a_i_reflects_iff2() {
    let (mut cpu, mut bus) = machine(&[
        0xED, 0x47, // LD I, A
        0xFB, //       EI
        0xED, 0x57, // LD A, I
        0x76,
    ]);
    run_until_halt(&mut cpu, &mut bus);

    assert_ne!(cpu.registers().f & PF, 0, "P/V mirrors IFF2 after EI");
}

#[test]
fn unmapped_ed_is_an_8_tstate_nop() {
    let (mut cpu, mut bus) = machine(&[0xED, 0x00, 0x76]);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.registers().pc, 0x0002);
    assert_eq!(cpu.registers().r, 2, "both ED bytes refresh");
}

#[test]
fn io_opcodes_charge_time_without_bus_traffic() {
    let (mut cpu, mut bus) = machine(&[
        0x3E, 0x5A, // LD A, $5A
        0xD3, 0x10, // OUT ($10), A
        0xDB, 0x10, // IN A, ($10)
        0x76,
    ]);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 7);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 11);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 11);
    assert_eq!(cpu.registers().a, 0x5A, "A unchanged; port bus not modeled");
}

#[test]
fn jr_and_jp_timing() {
    let (mut cpu, mut bus) = machine(&[
        0xAF, //             XOR A (sets Z)
        0x28, 0x01, //       JR Z, +1 (taken, 12)
        0x00, //             (skipped)
        0x20, 0x00, //       JR NZ, +0 (not taken, 7)
        0xC3, 0x0A, 0x00, // JP $000A (10)
        0x00,
        0x76, //             HALT at $000A
    ]);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 4);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 12);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 7);
    assert_eq!(step_tstates(&mut cpu, &mut bus), 10);
    assert_eq!(cpu.registers().pc, 0x000A);
}

#[test]
fn refresh_counts_prefix_fetches() {
    let (mut cpu, mut bus) = machine(&[
        0x00, //                   NOP: R+1
        0xCB, 0x00, //             RLC B: R+2
        0xDD, 0x21, 0x00, 0x00, // LD IX, 0: R+2
        0xDD, 0xCB, 0x00, 0x06, // RLC (IX+0): R+2 (displacement not counted)
        0x76,
    ]);
    cpu.execute_step(&mut bus);
    assert_eq!(cpu.registers().r, 1);
    cpu.execute_step(&mut bus);
    assert_eq!(cpu.registers().r, 3);
    cpu.execute_step(&mut bus);
    assert_eq!(cpu.registers().r, 5);
    cpu.execute_step(&mut bus);
    assert_eq!(cpu.registers().r, 7);
}

#[test]
fn halt_holds_pc_and_reports_four_tstates() {
    let (mut cpu, mut bus) = machine(&[0x00, 0x76]);
    cpu.execute_step(&mut bus); // NOP
    assert_eq!(step_tstates(&mut cpu, &mut bus), 4); // HALT executes
    let halted_pc = cpu.registers().pc;
    assert_eq!(halted_pc, 0x0001, "PC parked on the HALT byte");

    for _ in 0..3 {
        assert_eq!(step_tstates(&mut cpu, &mut bus), 4);
        assert_eq!(cpu.registers().pc, halted_pc);
    }
}
