//! Facilities for loading a program image to disassemble.

use crate::dis::listing::Listing;
use log::debug;
use std::io::{self, Read};

//===========================================================================//

macro_rules! invalid_data {
    ($e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         format!($fmt, $($arg)+)))
    };
}

macro_rules! invalid_input {
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidInput,
                                         format!($fmt, $($arg)+)))
    };
}

//===========================================================================//

/// The size of the 8080's address space, in bytes.
pub const ADDRESS_SPACE_SIZE: u32 = 0x10000;

/// A block of 8080 machine code, loaded at a fixed address.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProgramImage {
    origin: u16,
    code: Vec<u8>,
}

impl ProgramImage {
    /// Returns an image of `code` loaded at address `origin`.  Returns an
    /// error if the code is empty or would extend past the end of the
    /// address space.
    pub fn new(origin: u16, code: Vec<u8>) -> io::Result<ProgramImage> {
        if code.is_empty() {
            invalid_data!("program image is empty");
        }
        let room = (ADDRESS_SPACE_SIZE - u32::from(origin)) as usize;
        if code.len() > room {
            invalid_data!(
                "{} bytes loaded at ${:04x} overflow the address space",
                code.len(),
                origin
            );
        }
        Ok(ProgramImage { origin, code })
    }

    /// Returns a human-readable description of this image.
    pub fn description(&self) -> String {
        format!(
            "{}B image at ${:04x}-${:04x}",
            self.code.len(),
            self.origin,
            self.end_addr() - 1
        )
    }

    /// The address of the first byte of the image.
    pub fn origin(&self) -> u16 {
        self.origin
    }

    /// The address just past the last byte of the image.  This may be
    /// 0x10000 if the image runs to the top of the address space.
    pub fn end_addr(&self) -> u32 {
        u32::from(self.origin) + self.code.len() as u32
    }

    /// The raw bytes of the image.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// The size of the image, in bytes.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Returns true if the image has no code.  A successfully constructed
    /// image is never empty.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Returns a listing of the instructions from `start` (inclusive) up to
    /// `end` (exclusive), defaulting to the bounds of the image.  Returns an
    /// error if the window doesn't lie within the image.
    pub fn listing(
        &self,
        start: Option<u32>,
        end: Option<u32>,
    ) -> io::Result<Listing<'_>> {
        let origin = u32::from(self.origin);
        let start = start.unwrap_or(origin);
        let end = end.unwrap_or_else(|| self.end_addr());
        if start < origin || start > self.end_addr() {
            invalid_input!(
                "start address ${:04x} is outside {}",
                start,
                self.description()
            );
        }
        if end < start || end > self.end_addr() {
            invalid_input!(
                "end address ${:04x} is outside ${:04x}-${:04x}",
                end,
                start,
                self.end_addr()
            );
        }
        let window =
            &self.code[(start - origin) as usize..(end - origin) as usize];
        debug!("listing {} bytes from ${:04x}", window.len(), start);
        Ok(Listing::new(window, start as u16))
    }
}

//===========================================================================//

/// Reads a raw binary image, to be loaded at address `origin`.
pub fn load_image<R: Read>(
    mut reader: R,
    origin: u16,
) -> io::Result<ProgramImage> {
    let mut code = Vec::<u8>::new();
    reader.read_to_end(&mut code)?;
    let image = ProgramImage::new(origin, code)?;
    debug!("loaded {}", image.description());
    Ok(image)
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{ProgramImage, load_image};
    use std::io;

    #[test]
    fn description() {
        let image = ProgramImage::new(0x0100, vec![0u8; 0x10]).unwrap();
        assert_eq!(image.description(), "16B image at $0100-$010f");
        assert_eq!(image.end_addr(), 0x0110);
        assert_eq!(image.len(), 16);
        assert!(!image.is_empty());
    }

    #[test]
    fn empty_image() {
        let error = load_image(io::Cursor::new(Vec::new()), 0).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn image_fills_address_space() {
        let image = ProgramImage::new(0xff00, vec![0u8; 0x100]).unwrap();
        assert_eq!(image.end_addr(), 0x10000);
        let error = ProgramImage::new(0xff01, vec![0u8; 0x100]).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn listing_window() {
        let code = vec![0x00, 0x3e, 0x12, 0x76, 0xc9];
        let image = ProgramImage::new(0x1000, code).unwrap();
        let lines: Vec<String> = image
            .listing(Some(0x1001), Some(0x1004))
            .unwrap()
            .map(|line| line.format(false))
            .collect();
        assert_eq!(lines, ["1001: MVI A", "1003: HLT"]);
        assert_eq!(image.listing(None, None).unwrap().count(), 4);
        assert_eq!(image.listing(Some(0x1005), None).unwrap().count(), 0);
    }

    #[test]
    fn listing_window_out_of_range() {
        let image = ProgramImage::new(0x1000, vec![0u8; 4]).unwrap();
        let error = image.listing(Some(0x0fff), None).err().unwrap();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
        let error = image.listing(None, Some(0x1005)).err().unwrap();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
        let error = image.listing(Some(0x1002), Some(0x1001)).err().unwrap();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }
}

//===========================================================================//
