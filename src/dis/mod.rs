//! Facilities for disassembling binary code.

pub mod i8080;
pub mod listing;

//===========================================================================//
