//! Disassembler for Intel 8080 machine code.

#![warn(missing_docs)]

pub mod dis;
pub mod image;
