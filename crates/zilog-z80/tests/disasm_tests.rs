//! Disassembler and debug-introspection tests.
//!
//! `opcode_info` must read the bus transparently: no timing, no refresh,
//! no side effects on execution state.

use device_core::{FlatMemory, Observable, Processor, Value};
use zilog_z80::Z80;

fn machine(program: &[u8]) -> (Z80, FlatMemory) {
    let mut bus = FlatMemory::new();
    bus.load(0x0000, program);
    let mut cpu = Z80::new();
    cpu.initialize();
    (cpu, bus)
}

fn disassemble(bytes: &[u8]) -> (String, u32, u32) {
    let (cpu, mut bus) = machine(bytes);
    let info = cpu.opcode_info(&mut bus, 0);
    let text = if info.arguments.is_empty() {
        info.mnemonic
    } else {
        format!("{} {}", info.mnemonic, info.arguments)
    };
    (text, info.byte_size, info.tstates)
}

#[test]
fn disassembles_base_opcodes() {
    assert_eq!(disassemble(&[0x00]), ("NOP".into(), 1, 4));
    assert_eq!(disassemble(&[0x3E, 0x42]), ("LD A, $42".into(), 2, 7));
    assert_eq!(
        disassemble(&[0x01, 0x34, 0x12]),
        ("LD BC, $1234".into(), 3, 10)
    );
    assert_eq!(disassemble(&[0x76]), ("HALT".into(), 1, 4));
    assert_eq!(disassemble(&[0x86]), ("ADD A, (HL)".into(), 1, 7));
    assert_eq!(disassemble(&[0xBE]), ("CP (HL)".into(), 1, 7));
    assert_eq!(
        disassemble(&[0x32, 0x00, 0x40]),
        ("LD ($4000), A".into(), 3, 13)
    );
    assert_eq!(disassemble(&[0x08]), ("EX AF, AF'".into(), 1, 4));
    assert_eq!(disassemble(&[0xC7]), ("RST $00".into(), 1, 11));
    assert_eq!(disassemble(&[0xFF]), ("RST $38".into(), 1, 11));
}

#[test]
fn disassembles_relative_jumps_as_targets() {
    // JR -2 at address 0 loops to itself
    assert_eq!(disassemble(&[0x18, 0xFE]), ("JR $0000".into(), 2, 12));
    assert_eq!(disassemble(&[0x20, 0x03]), ("JR NZ, $0005".into(), 2, 7));
    assert_eq!(disassemble(&[0x10, 0x00]), ("DJNZ $0002".into(), 2, 8));
}

#[test]
fn disassembles_prefixed_opcodes() {
    assert_eq!(disassemble(&[0xCB, 0x00]), ("RLC B".into(), 2, 8));
    assert_eq!(disassemble(&[0xCB, 0x46]), ("BIT 0, (HL)".into(), 2, 12));
    assert_eq!(disassemble(&[0xED, 0x42]), ("SBC HL, BC".into(), 2, 15));
    assert_eq!(disassemble(&[0xED, 0x45]), ("RETN".into(), 2, 14));
    assert_eq!(disassemble(&[0xED, 0xB0]), ("LDIR".into(), 2, 16));
    assert_eq!(
        disassemble(&[0xDD, 0x36, 0x05, 0x99]),
        ("LD (IX+5), $99".into(), 4, 19)
    );
    assert_eq!(
        disassemble(&[0xFD, 0x7E, 0xFE]),
        ("LD A, (IY-2)".into(), 3, 19)
    );
    assert_eq!(disassemble(&[0xDD, 0x44]), ("LD B, IXH".into(), 2, 8));
    assert_eq!(
        disassemble(&[0xDD, 0xCB, 0x05, 0x01]),
        ("RLC (IX+5), C".into(), 4, 23)
    );
    assert_eq!(
        disassemble(&[0xDD, 0xCB, 0x05, 0x4E]),
        ("BIT 1, (IX+5)".into(), 4, 20)
    );
}

#[test]
fn marks_unsupported_encodings() {
    let (cpu, mut bus) = machine(&[0xED, 0x00]);
    let info = cpu.opcode_info(&mut bus, 0);
    assert!(!info.valid);
    assert_eq!(info.tstates, 8);

    let (cpu, mut bus) = machine(&[0xD3, 0x10]); // OUT ($10), A
    let info = cpu.opcode_info(&mut bus, 0);
    assert!(!info.valid, "port opcodes are decoded but unsupported");
    assert_eq!(info.mnemonic, "OUT");
}

#[test]
fn opcode_info_has_no_side_effects() {
    let (mut cpu, mut bus) = machine(&[0x3E, 0x42, 0x76]);
    cpu.execute_step(&mut bus);
    let before = cpu.registers();

    let info = cpu.opcode_info(&mut bus, 0);
    assert_eq!(info.mnemonic, "LD");
    assert_eq!(cpu.registers(), before, "disassembly must not touch state");
    assert_eq!(before.r, cpu.registers().r, "no refresh from transparent reads");
}

#[test]
fn raw_data_reads_transparently() {
    let (cpu, mut bus) = machine(&[0xAA, 0xBB]);
    assert_eq!(cpu.raw_data(&mut bus, 0), 0xAA);
    assert_eq!(cpu.raw_data(&mut bus, 1), 0xBB);
}

#[test]
fn bus_widths() {
    let (cpu, _bus) = machine(&[]);
    assert_eq!(cpu.pc_width(), 16);
    assert_eq!(cpu.address_bus_width(), 16);
    assert_eq!(cpu.data_bus_width(), 8);
    assert_eq!(cpu.minimum_opcode_byte_size(), 1);
}

#[test]
fn decode_is_deterministic_across_the_whole_space() {
    let (cpu, mut bus) = machine(&[]);
    for first in 0..=0xFFu16 {
        for second in [0x00u8, 0x40, 0x80, 0xC6, 0xFF] {
            bus.load(0, &[first as u8, second, 0x12, 0x34, 0x56]);
            let a = cpu.opcode_info(&mut bus, 0);
            let b = cpu.opcode_info(&mut bus, 0);
            assert_eq!(a, b);
            assert!(a.byte_size >= 1 && a.byte_size <= 4);
            assert!(a.tstates >= 4);
            assert!(!a.mnemonic.is_empty());
        }
    }
}

#[test]
fn observable_exposes_registers_and_flags() {
    let (mut cpu, mut bus) = machine(&[0x3E, 0x80, 0x87, 0x76]); // LD A, $80; ADD A, A
    cpu.execute_step(&mut bus);
    cpu.execute_step(&mut bus);

    assert_eq!(cpu.query("a"), Some(Value::U8(0x00)));
    assert_eq!(cpu.query("flags.z"), Some(Value::Bool(true)));
    assert_eq!(cpu.query("flags.c"), Some(Value::Bool(true)));
    assert_eq!(cpu.query("pc"), Some(Value::U16(0x0003)));
    assert_eq!(cpu.query("lines.int"), Some(Value::Bool(false)));
    assert_eq!(cpu.query("nonsense"), None);

    for path in cpu.query_paths() {
        assert!(cpu.query(path).is_some(), "path {path} is advertised");
    }
}
