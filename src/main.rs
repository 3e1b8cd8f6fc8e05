use clap::Parser;
use dis8080::image::{ADDRESS_SPACE_SIZE, load_image};
use log::debug;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

//===========================================================================//

#[derive(Parser)]
#[clap(author, about, long_about = None, version)]
struct Cli {
    /// The raw binary image to disassemble.
    binary: PathBuf,
    /// The address at which the first byte of the image is loaded.
    #[clap(long, default_value = "0", value_parser = parse_origin)]
    origin: u16,
    /// The address to start disassembling from (defaults to the origin).
    #[clap(long, value_parser = parse_address)]
    start: Option<u32>,
    /// The address to stop disassembling at, exclusive (defaults to the end
    /// of the image).
    #[clap(long, value_parser = parse_address)]
    end: Option<u32>,
    /// Print operand values after each mnemonic.
    #[clap(long)]
    operands: bool,
}

//===========================================================================//

/// Parses an address written as `0x1234`, `$1234`, or decimal.
fn parse_address(text: &str) -> Result<u32, String> {
    let (digits, radix) = if let Some(hex) =
        text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(hex) = text.strip_prefix('$') {
        (hex, 16)
    } else {
        (text, 10)
    };
    let addr = u32::from_str_radix(digits, radix)
        .map_err(|err| format!("invalid address {text:?}: {err}"))?;
    if addr > ADDRESS_SPACE_SIZE {
        return Err(format!("address {text:?} is beyond $ffff"));
    }
    Ok(addr)
}

fn parse_origin(text: &str) -> Result<u16, String> {
    let addr = parse_address(text)?;
    u16::try_from(addr).map_err(|_| format!("origin {text:?} is beyond $ffff"))
}

//===========================================================================//

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let image = {
        let file = File::open(&cli.binary)?;
        load_image(io::BufReader::new(file), cli.origin)?
    };
    debug!("disassembling {}", cli.binary.display());
    let mut out = io::BufWriter::new(io::stdout().lock());
    for line in image.listing(cli.start, cli.end)? {
        writeln!(out, "{}", line.format(cli.operands))?;
    }
    out.flush()
}

//===========================================================================//


//===========================================================================//
