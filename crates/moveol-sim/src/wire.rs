//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Newline-delimited JSON encoding of readings."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
//! Wire encoding for the serial link.
//!
//! Each reading is one JSON object followed by a single `\n`. Members are
//! separated by `", "` and keys from values by `": "`, which is what existing
//! receivers on the other end of the link were written against:
//!
//! ```text
//! {"voltage": 12.5, "current": 2.3, "power": 28.75, "rpm": 287}
//! ```

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::frames::Reading;

/// Line terminator appended to every payload.
pub const LINE_TERMINATOR: u8 = b'\n';

/// JSON formatter emitting a space after each `:` and `,`, on a single line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn write_payload(reading: &Reading, buffer: &mut Vec<u8>) -> serde_json::Result<()> {
    let mut serializer = Serializer::with_formatter(buffer, SpacedFormatter);
    reading.serialize(&mut serializer)
}

/// Encode a reading as its JSON payload, without the terminator.
pub fn encode_payload(reading: &Reading) -> serde_json::Result<String> {
    let mut buffer = Vec::with_capacity(72);
    write_payload(reading, &mut buffer)?;
    // serde_json only writes UTF-8, so this never substitutes anything.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Encode a reading as the exact bytes written to the port.
pub fn encode_line(reading: &Reading) -> serde_json::Result<Vec<u8>> {
    let mut line = Vec::with_capacity(72);
    write_payload(reading, &mut line)?;
    line.push(LINE_TERMINATOR);
    Ok(line)
}
