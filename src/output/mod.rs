//
//  stash-client
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output
//!
//! The `stash` binary prints every result as JSON so it can be piped into
//! `jq` or read by scripts. Raw file contents are the exception and are
//! written byte for byte.
//!
//! | Function | Output |
//! |----------|--------|
//! | [`write_json_to`] | Pretty-printed JSON followed by a newline |
//! | [`write_raw_to`] | Bytes as received |

use std::io::Write;

use serde::Serialize;

/// Writes `value` as pretty-printed JSON.
pub fn write_json_to<W: Write + ?Sized, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes `bytes` unchanged.
pub fn write_raw_to<W: Write + ?Sized>(writer: &mut W, bytes: &[u8]) -> anyhow::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}
