//! Save-state support.
//!
//! The node captures the full architectural state plus the input line
//! levels. Loading is all-or-nothing: every entry is validated before any
//! field is assigned, so a bad node leaves the CPU untouched.

use device_core::StateNode;

use crate::cpu::Line;
use crate::registers::Registers;

use super::Z80;

fn require_u8(node: &StateNode, key: &str) -> Result<u8, String> {
    node.get_u8(key)
        .ok_or_else(|| format!("missing or mis-sized entry '{key}'"))
}

fn require_u16(node: &StateNode, key: &str) -> Result<u16, String> {
    node.get_u16(key)
        .ok_or_else(|| format!("missing or mis-sized entry '{key}'"))
}

fn require_bool(node: &StateNode, key: &str) -> Result<bool, String> {
    node.get_bool(key)
        .ok_or_else(|| format!("missing or mis-sized entry '{key}'"))
}

impl Z80 {
    /// Serialize the architectural state into a node tree.
    #[must_use]
    pub fn save_state(&self) -> StateNode {
        let mut node = StateNode::new("Z80");
        let regs = &self.regs;

        for (key, value) in [
            ("A", regs.a),
            ("F", regs.f),
            ("B", regs.b),
            ("C", regs.c),
            ("D", regs.d),
            ("E", regs.e),
            ("H", regs.h),
            ("L", regs.l),
            ("A2", regs.a_alt),
            ("F2", regs.f_alt),
            ("B2", regs.b_alt),
            ("C2", regs.c_alt),
            ("D2", regs.d_alt),
            ("E2", regs.e_alt),
            ("H2", regs.h_alt),
            ("L2", regs.l_alt),
            ("I", regs.i),
            ("R", regs.r),
            ("InterruptMode", regs.im),
        ] {
            node.set_u8(key, value);
        }

        node.set_u16("IX", regs.ix);
        node.set_u16("IY", regs.iy);
        node.set_u16("SP", regs.sp);
        node.set_u16("PC", regs.pc);

        node.set_bool("IFF1", regs.iff1);
        node.set_bool("IFF2", regs.iff2);
        node.set_bool("MaskInterruptsNextOpcode", self.mask_interrupts_next_opcode);
        node.set_bool("ProcessorStopped", regs.halted);

        let lines = node.add_child("Lines");
        for line in [Line::Reset, Line::BusReq, Line::Int, Line::Nmi] {
            lines.set_bool(line.name(), self.line_state(line));
        }

        node
    }

    /// Restore the architectural state from a node tree and synchronize the
    /// rollback shadow.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing or mis-sized entry; the CPU
    /// is left in its pre-load state.
    pub fn load_state(&mut self, node: &StateNode) -> Result<(), String> {
        let regs = Registers {
            a: require_u8(node, "A")?,
            f: require_u8(node, "F")?,
            b: require_u8(node, "B")?,
            c: require_u8(node, "C")?,
            d: require_u8(node, "D")?,
            e: require_u8(node, "E")?,
            h: require_u8(node, "H")?,
            l: require_u8(node, "L")?,
            a_alt: require_u8(node, "A2")?,
            f_alt: require_u8(node, "F2")?,
            b_alt: require_u8(node, "B2")?,
            c_alt: require_u8(node, "C2")?,
            d_alt: require_u8(node, "D2")?,
            e_alt: require_u8(node, "E2")?,
            h_alt: require_u8(node, "H2")?,
            l_alt: require_u8(node, "L2")?,
            ix: require_u16(node, "IX")?,
            iy: require_u16(node, "IY")?,
            sp: require_u16(node, "SP")?,
            pc: require_u16(node, "PC")?,
            i: require_u8(node, "I")?,
            r: require_u8(node, "R")?,
            iff1: require_bool(node, "IFF1")?,
            iff2: require_bool(node, "IFF2")?,
            im: require_u8(node, "InterruptMode")?,
            halted: require_bool(node, "ProcessorStopped")?,
        };
        let mask_interrupts = require_bool(node, "MaskInterruptsNextOpcode")?;

        let lines = node
            .child("Lines")
            .ok_or_else(|| "missing 'Lines' node".to_string())?;
        let mut levels = [false; 4];
        for (slot, line) in levels
            .iter_mut()
            .zip([Line::Reset, Line::BusReq, Line::Int, Line::Nmi])
        {
            *slot = require_bool(lines, line.name())?;
        }

        // Everything validated; commit to the live state
        self.regs = regs;
        self.mask_interrupts_next_opcode = mask_interrupts;
        let [reset, busreq, int, nmi] = levels;
        self.set_line_levels(reset, busreq, int, nmi);
        self.sync_shadow();
        Ok(())
    }
}
