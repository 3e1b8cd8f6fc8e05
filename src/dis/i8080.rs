//! Facilities for disassembling Intel 8080 machine code.

use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

//===========================================================================//

/// The mnemonic produced for opcodes that don't encode any 8080 instruction.
pub const UNKNOWN_MNEMONIC: &str = "Unknown Operation";

//===========================================================================//

/// An 8-bit register operand, as selected by a 3-bit register field.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Reg {
    /// The B register.
    B,
    /// The C register.
    C,
    /// The D register.
    D,
    /// The E register.
    E,
    /// The H register.
    H,
    /// The L register.
    L,
    /// The memory location pointed to by the combined HL register.
    M,
    /// The A register (accumulator).
    A,
}

const REGISTERS: [Reg; 8] =
    [Reg::B, Reg::C, Reg::D, Reg::E, Reg::H, Reg::L, Reg::M, Reg::A];

impl Reg {
    /// Returns the register selected by the low three bits of `bits`.
    pub fn from_bits(bits: u8) -> Reg {
        REGISTERS[usize::from(bits & 0x7)]
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            Reg::B => "B",
            Reg::C => "C",
            Reg::D => "D",
            Reg::E => "E",
            Reg::H => "H",
            Reg::L => "L",
            Reg::M => "M",
            Reg::A => "A",
        })
    }
}

//===========================================================================//

/// A 16-bit register pair operand, as selected by a 2-bit pair field.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RegPair {
    /// The combined BC register.
    Bc,
    /// The combined DE register.
    De,
    /// The combined HL register.
    Hl,
    /// The stack pointer.
    Sp,
}

const REGISTER_PAIRS: [RegPair; 4] =
    [RegPair::Bc, RegPair::De, RegPair::Hl, RegPair::Sp];

impl RegPair {
    /// Returns the register pair selected by the low two bits of `bits`.
    pub fn from_bits(bits: u8) -> RegPair {
        REGISTER_PAIRS[usize::from(bits & 0x3)]
    }
}

impl fmt::Display for RegPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            RegPair::Bc => "BC",
            RegPair::De => "DE",
            RegPair::Hl => "HL",
            RegPair::Sp => "SP",
        })
    }
}

//===========================================================================//

/// A condition under which a conditional jump, call, or return is taken.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Condition {
    /// The zero flag is not set.
    Nz,
    /// The zero flag is set.
    Z,
    /// The carry flag is not set.
    Nc,
    /// The carry flag is set.
    C,
    /// The parity flag is not set (parity odd).
    Po,
    /// The parity flag is set (parity even).
    Pe,
    /// The sign flag is not set (plus).
    P,
    /// The sign flag is set (minus).
    M,
}

const CONDITIONS: [Condition; 8] = [
    Condition::Nz,
    Condition::Z,
    Condition::Nc,
    Condition::C,
    Condition::Po,
    Condition::Pe,
    Condition::P,
    Condition::M,
];

impl Condition {
    /// Returns the condition selected by the low three bits of `bits`.
    pub fn from_bits(bits: u8) -> Condition {
        CONDITIONS[usize::from(bits & 0x7)]
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            Condition::Nz => "NZ",
            Condition::Z => "Z",
            Condition::Nc => "NC",
            Condition::C => "C",
            Condition::Po => "PO",
            Condition::Pe => "PE",
            Condition::P => "P",
            Condition::M => "M",
        })
    }
}

//===========================================================================//

/// A decoded 8080 opcode: the mnemonic text (including any register,
/// register pair, or condition operand) and the total length of the
/// instruction in bytes, including the opcode itself.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Operation {
    mnemonic: String,
    size: u8,
}

impl Operation {
    fn new(mnemonic: impl Into<String>, size: u8) -> Operation {
        Operation { mnemonic: mnemonic.into(), size }
    }

    fn unknown() -> Operation {
        Operation::new(UNKNOWN_MNEMONIC, 1)
    }

    /// Decodes an 8080 opcode.  Every byte value decodes to some operation;
    /// bytes that don't encode an instruction produce an "Unknown Operation"
    /// one byte long, so that disassembly can continue past them.
    pub fn from_opcode(opcode: u8) -> Operation {
        // HLT (0x76) sits inside the MOV block, so literal opcodes must be
        // resolved before any of the bit patterns are tried.
        if let Some((mnemonic, size)) = fixed_operation(opcode) {
            return Operation::new(mnemonic, size);
        }
        PATTERNS
            .iter()
            .find(|pattern| pattern.matches(opcode))
            .map_or_else(Operation::unknown, |pattern| (pattern.build)(opcode))
    }

    /// The human-readable mnemonic, e.g. `"MOV C, B"` or `"LXI HL,"`.
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// The total length of the instruction in bytes (1, 2, or 3).
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Returns true if the opcode didn't encode any known instruction.
    pub fn is_unknown(&self) -> bool {
        self.mnemonic == UNKNOWN_MNEMONIC
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(&self.mnemonic)
    }
}

/// Decodes an 8080 opcode into its mnemonic and instruction length.
pub fn decode(opcode: u8) -> Operation {
    Operation::from_opcode(opcode)
}

//===========================================================================//

fn fixed_operation(opcode: u8) -> Option<(&'static str, u8)> {
    let entry = match opcode {
        0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => ("NOP", 1),
        0x07 => ("RLC", 1),
        0x0f => ("RRC", 1),
        0x17 => ("RAL", 1),
        0x1f => ("RAR", 1),
        0x22 => ("SHLD", 3),
        0x27 => ("DAA", 1),
        0x2a => ("LHLD", 3),
        0x2f => ("CMA", 1),
        0x32 => ("STA", 3),
        0x37 => ("STC", 1),
        0x3a => ("LDA", 3),
        0x3f => ("CMC", 1),
        0x76 => ("HLT", 1),
        0xc3 => ("JMP", 3),
        0xc6 => ("ADI", 2),
        0xc9 => ("RET", 1),
        0xce => ("ACI", 2),
        0xcd | 0xdd | 0xed | 0xfd => ("CALL", 3),
        0xd3 => ("OUT", 2),
        0xd6 => ("SUI", 2),
        0xdb => ("IN", 2),
        0xde => ("SBI", 2),
        0xe3 => ("XTHL", 1),
        0xe6 => ("ANI", 2),
        0xe9 => ("PCHL", 1),
        0xeb => ("XCHG", 1),
        0xee => ("XRI", 2),
        0xf3 => ("DI", 1),
        0xf6 => ("ORI", 2),
        0xf9 => ("SPHL", 1),
        0xfb => ("EI", 1),
        0xfe => ("CPI", 2),
        _ => return None,
    };
    Some(entry)
}

//===========================================================================//

/// An opcode family whose members differ only in a register, register pair,
/// or condition field.  An opcode belongs to the family if the bits selected
/// by `mask` equal `bits`; the remaining bits are the operand field.
struct Pattern {
    mask: u8,
    bits: u8,
    build: fn(u8) -> Operation,
}

impl Pattern {
    fn matches(&self, opcode: u8) -> bool {
        opcode & self.mask == self.bits
    }
}

/// Opcode families in priority order; the first match wins.
const PATTERNS: &[Pattern] = &[
    Pattern { mask: 0xcf, bits: 0x01, build: lxi },
    Pattern { mask: 0xc7, bits: 0x06, build: mvi },
    Pattern { mask: 0xc7, bits: 0x04, build: inr },
    Pattern { mask: 0xc7, bits: 0x05, build: dcr },
    Pattern { mask: 0xcf, bits: 0x0a, build: ldax },
    Pattern { mask: 0xcf, bits: 0x02, build: stax },
    Pattern { mask: 0xcf, bits: 0x03, build: inx },
    Pattern { mask: 0xcf, bits: 0x0b, build: dcx },
    Pattern { mask: 0xcf, bits: 0x09, build: dad },
    Pattern { mask: 0xc0, bits: 0x40, build: mov },
    Pattern { mask: 0xf8, bits: 0x80, build: add },
    Pattern { mask: 0xf8, bits: 0x88, build: adc },
    Pattern { mask: 0xf8, bits: 0x90, build: sub },
    Pattern { mask: 0xf8, bits: 0x98, build: sbb },
    Pattern { mask: 0xf8, bits: 0xa0, build: ana },
    Pattern { mask: 0xf8, bits: 0xa8, build: xra },
    Pattern { mask: 0xf8, bits: 0xb0, build: ora },
    Pattern { mask: 0xf8, bits: 0xb8, build: cmp },
    Pattern { mask: 0xcf, bits: 0xc5, build: push },
    Pattern { mask: 0xcf, bits: 0xc1, build: pop },
    Pattern { mask: 0xc7, bits: 0xc2, build: jump_if },
    Pattern { mask: 0xc7, bits: 0xc4, build: call_if },
    Pattern { mask: 0xc7, bits: 0xc0, build: return_if },
    Pattern { mask: 0xc7, bits: 0xc7, build: rst },
];

// Bits 3-5 select a register or condition; bits 4-5 select a register pair;
// bits 0-2 select a source register.
fn dest(opcode: u8) -> Reg {
    Reg::from_bits(opcode >> 3)
}

fn source(opcode: u8) -> Reg {
    Reg::from_bits(opcode)
}

fn pair(opcode: u8) -> RegPair {
    RegPair::from_bits(opcode >> 4)
}

fn condition(opcode: u8) -> Condition {
    Condition::from_bits(opcode >> 3)
}

fn lxi(opcode: u8) -> Operation {
    Operation::new(format!("LXI {},", pair(opcode)), 3)
}

fn mvi(opcode: u8) -> Operation {
    Operation::new(format!("MVI {}", dest(opcode)), 2)
}

fn inr(opcode: u8) -> Operation {
    Operation::new(format!("INR {}", dest(opcode)), 1)
}

fn dcr(opcode: u8) -> Operation {
    Operation::new(format!("DCR {}", dest(opcode)), 1)
}

fn ldax(opcode: u8) -> Operation {
    Operation::new(format!("LDAX {}", pair(opcode)), 1)
}

fn stax(opcode: u8) -> Operation {
    Operation::new(format!("STAX {}", pair(opcode)), 1)
}

fn inx(opcode: u8) -> Operation {
    Operation::new(format!("INX {}", pair(opcode)), 1)
}

fn dcx(opcode: u8) -> Operation {
    Operation::new(format!("DCX {}", pair(opcode)), 1)
}

fn dad(opcode: u8) -> Operation {
    Operation::new(format!("DAD {}", pair(opcode)), 1)
}

fn mov(opcode: u8) -> Operation {
    Operation::new(format!("MOV {}, {}", dest(opcode), source(opcode)), 1)
}

fn add(opcode: u8) -> Operation {
    Operation::new(format!("ADD {}", source(opcode)), 1)
}

fn adc(opcode: u8) -> Operation {
    Operation::new(format!("ADC {}", source(opcode)), 1)
}

fn sub(opcode: u8) -> Operation {
    Operation::new(format!("SUB {}", source(opcode)), 1)
}

fn sbb(opcode: u8) -> Operation {
    Operation::new(format!("SBB {}", source(opcode)), 1)
}

fn ana(opcode: u8) -> Operation {
    Operation::new(format!("ANA {}", source(opcode)), 1)
}

fn xra(opcode: u8) -> Operation {
    Operation::new(format!("XRA {}", source(opcode)), 1)
}

fn ora(opcode: u8) -> Operation {
    Operation::new(format!("ORA {}", source(opcode)), 1)
}

fn cmp(opcode: u8) -> Operation {
    Operation::new(format!("CMP {}", source(opcode)), 1)
}

fn push(opcode: u8) -> Operation {
    Operation::new(format!("PUSH {}", pair(opcode)), 1)
}

fn pop(opcode: u8) -> Operation {
    Operation::new(format!("POP {}", pair(opcode)), 1)
}

fn jump_if(opcode: u8) -> Operation {
    Operation::new(format!("J{}", condition(opcode)), 3)
}

fn call_if(opcode: u8) -> Operation {
    Operation::new(format!("C{}", condition(opcode)), 3)
}

fn return_if(opcode: u8) -> Operation {
    Operation::new(format!("R{}", condition(opcode)), 1)
}

fn rst(opcode: u8) -> Operation {
    Operation::new(format!("RST {}", (opcode >> 3) & 0x7), 1)
}

//===========================================================================//

/// The immediate value that follows an opcode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operand {
    /// No operand.
    None,
    /// An 8-bit immediate value or port number.
    U8(u8),
    /// A 16-bit immediate value or address.
    U16(u16),
}

impl Operand {
    /// The size of this operand, in bytes.
    pub fn size(self) -> u8 {
        match self {
            Operand::None => 0,
            Operand::U8(_) => 1,
            Operand::U16(_) => 2,
        }
    }
}

//===========================================================================//

/// A complete 8080 instruction: an operation and its operand value.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Instruction {
    /// The opcode byte.
    pub opcode: u8,
    /// The operation encoded by the opcode.
    pub operation: Operation,
    /// The immediate value following the opcode, if any.
    pub operand: Operand,
}

impl Instruction {
    /// Decodes the instruction at the start of `code`.  Returns `None` if
    /// `code` is empty, or if it ends before the instruction's operand bytes.
    /// Multi-byte operands are little-endian.
    pub fn decode(code: &[u8]) -> Option<Instruction> {
        let (&opcode, rest) = code.split_first()?;
        let operation = Operation::from_opcode(opcode);
        let operand = match operation.size() {
            2 => Operand::U8(*rest.first()?),
            3 => Operand::U16(LittleEndian::read_u16(rest.get(..2)?)),
            _ => Operand::None,
        };
        Some(Instruction { opcode, operation, operand })
    }

    /// The total length of the instruction in bytes.
    pub fn size(&self) -> u8 {
        self.operation.size()
    }

    /// Formats the instruction as a human-readable string, with the operand
    /// value rendered in hex (e.g. `"LXI SP, $2400"`).
    pub fn format(&self) -> String {
        format_with_operand(self.operation.mnemonic(), self.operand)
    }
}

pub(crate) fn format_with_operand(mnemonic: &str, operand: Operand) -> String {
    let value = match operand {
        Operand::None => return mnemonic.to_string(),
        Operand::U8(value) => format!("${value:02x}"),
        Operand::U16(value) => format!("${value:04x}"),
    };
    if mnemonic.ends_with(',') {
        format!("{mnemonic} {value}")
    } else if mnemonic.contains(' ') {
        format!("{mnemonic}, {value}")
    } else {
        format!("{mnemonic} {value}")
    }
}

//===========================================================================//
