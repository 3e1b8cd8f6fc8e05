//! Facilities for walking a block of 8080 machine code one instruction at a
//! time.

use super::i8080::{Instruction, Operand, Operation, format_with_operand};
use log::warn;

//===========================================================================//

/// One disassembled instruction within a block of code.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Line<'a> {
    /// The address of the instruction's opcode byte.
    pub addr: u16,
    /// The bytes making up the instruction.  For a truncated instruction,
    /// these are the bytes that remained before the end of the code.
    pub bytes: &'a [u8],
    /// The operation encoded by the opcode byte.
    pub operation: Operation,
    /// The instruction's operand value, or `None` if the code ended before
    /// the operand was complete.
    pub operand: Option<Operand>,
}

impl Line<'_> {
    /// Returns true if the code ended partway through this instruction.
    pub fn is_truncated(&self) -> bool {
        self.operand.is_none()
    }

    /// Formats this line as `"addr: mnemonic"`, with the address in hex.  If
    /// `show_operands` is true, the operand value follows the mnemonic.
    pub fn format(&self, show_operands: bool) -> String {
        let text = match self.operand {
            Some(operand) if show_operands => {
                format_with_operand(self.operation.mnemonic(), operand)
            }
            None if show_operands => {
                format!("{} (truncated)", self.operation.mnemonic())
            }
            _ => self.operation.mnemonic().to_string(),
        };
        format!("{:04x}: {}", self.addr, text)
    }
}

//===========================================================================//

/// An iterator over the instructions in a block of 8080 machine code.
pub struct Listing<'a> {
    code: &'a [u8],
    origin: u16,
    offset: usize,
}

impl<'a> Listing<'a> {
    /// Returns a listing of `code`, whose first byte is located at address
    /// `origin`.  Addresses wrap around at the top of the 16-bit address
    /// space.
    pub fn new(code: &'a [u8], origin: u16) -> Listing<'a> {
        Listing { code, origin, offset: 0 }
    }
}

impl<'a> Iterator for Listing<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        let rest = &self.code[self.offset..];
        if rest.is_empty() {
            return None;
        }
        let addr = self.origin.wrapping_add(self.offset as u16);
        match Instruction::decode(rest) {
            Some(instruction) => {
                let size = usize::from(instruction.size());
                self.offset += size;
                Some(Line {
                    addr,
                    bytes: &rest[..size],
                    operation: instruction.operation,
                    operand: Some(instruction.operand),
                })
            }
            None => {
                let operation = Operation::from_opcode(rest[0]);
                warn!(
                    "{} at ${:04x} needs {} bytes, but only {} remain",
                    operation,
                    addr,
                    operation.size(),
                    rest.len()
                );
                self.offset = self.code.len();
                Some(Line { addr, bytes: rest, operation, operand: None })
            }
        }
    }
}

//===========================================================================//


//===========================================================================//
