//! Result rendering

use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;

use ouimap_core::MatchResult;

#[derive(Serialize)]
struct JsonMatch<'a> {
    prefix: &'a str,
    vendor: &'a str,
}

/// One `<prefix>      <vendor>` line per result, then the summary.
pub fn write_text<W: Write>(
    out: &mut W,
    results: &[MatchResult],
    elapsed: Duration,
) -> io::Result<()> {
    for result in results {
        writeln!(out, "{}      {}", result.prefix, result.vendor)?;
    }
    writeln!(out)?;
    writeln!(out, ">> {} record(s) found from your search parameters...", results.len())?;
    writeln!(out, ">> Search completed in {:?}.", elapsed)?;
    writeln!(out)
}

/// A JSON array of `{"prefix", "vendor"}` objects.
pub fn write_json<W: Write>(out: &mut W, results: &[MatchResult]) -> io::Result<()> {
    let rows: Vec<JsonMatch<'_>> = results
        .iter()
        .map(|r| JsonMatch {
            prefix: &r.prefix,
            vendor: &r.vendor,
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &rows)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<MatchResult> {
        vec![
            MatchResult {
                prefix: "00:1A:2B:00:00:00/24".to_string(),
                vendor: "Acme Networks".to_string(),
            },
            MatchResult {
                prefix: "00:1A:2B:30:00:00/28".to_string(),
                vendor: "Acme \"Labs\"".to_string(),
            },
        ]
    }

    #[test]
    fn text_lists_results_and_summary() {
        let mut out = Vec::new();
        write_text(&mut out, &results(), Duration::from_millis(3)).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "00:1A:2B:00:00:00/24      Acme Networks");
        assert_eq!(lines[1], "00:1A:2B:30:00:00/28      Acme \"Labs\"");
        assert_eq!(lines[3], ">> 2 record(s) found from your search parameters...");
        assert_eq!(lines[4], ">> Search completed in 3ms.");
    }

    #[test]
    fn json_escapes_and_keeps_order() {
        let mut out = Vec::new();
        write_json(&mut out, &results()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value[0]["prefix"], "00:1A:2B:00:00:00/24");
        assert_eq!(value[1]["vendor"], "Acme \"Labs\"");
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn json_empty_results() {
        let mut out = Vec::new();
        write_json(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
    }
}
