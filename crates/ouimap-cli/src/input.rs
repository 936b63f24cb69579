//! Interactive query collection
//!
//! One query per line; a blank line ends the batch.

use std::io::{self, BufRead};

pub const PROMPT_HELP: &str = "\
Enter a multi-line list of OUIs, MAC addresses and/or descriptions. \
Separate OUI/MAC address parts with colons, hyphens or periods.
Press ENTER on a blank line to start the search, or CTRL+C to exit.
";

/// Read the next batch of trimmed, non-empty lines.
///
/// Returns `None` once the input is exhausted and no lines were collected.
pub fn read_batch<R: BufRead>(reader: &mut R) -> io::Result<Option<Vec<String>>> {
    let mut batch = Vec::new();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(if batch.is_empty() { None } else { Some(batch) });
        }

        let query = line.trim();
        if query.is_empty() {
            return Ok(Some(batch));
        }
        batch.push(query.to_string());
    }
}
