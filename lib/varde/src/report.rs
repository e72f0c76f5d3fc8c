use crate::decimal::format_tenths;
use crate::summary::{KeySummary, SummaryTable};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::io::Write;

/// Writes the final report: one `KEY=MIN/MEAN/MAX` line per key, keys in
/// ascending byte-wise order, every value rendered with one fractional digit.
pub fn write_report<W: Write>(table: &SummaryTable, mut out: W) -> Result<()> {
    let mut entries: Vec<(&[u8], &KeySummary)> = table.iter().collect();
    entries.par_sort_unstable_by(|a, b| a.0.cmp(b.0));

    for (key, summary) in entries {
        let key = std::str::from_utf8(key)
            .with_context(|| format!("non-UTF-8 key {:?}", String::from_utf8_lossy(key)))?;
        writeln!(
            out,
            "{}={}/{}/{}",
            key,
            format_tenths(i64::from(summary.min)),
            format_tenths(summary.mean_tenths()),
            format_tenths(i64::from(summary.max)),
        )?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(table: &SummaryTable) -> String {
        let mut out = Vec::new();
        write_report(table, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn sorts_keys_and_formats_one_fractional_digit() {
        let mut table = SummaryTable::new();
        table.record(b"Tokyo", 352);
        table.record(b"Tokyo", -10);
        table.record(b"Paris", 105);
        assert_eq!(render(&table), "Paris=10.5/10.5/10.5\nTokyo=-1.0/17.1/35.2\n");
    }

    #[test]
    fn ordering_is_byte_wise() {
        let mut table = SummaryTable::new();
        table.record(b"b", 10);
        table.record(b"A", 10);
        table.record(b"Z", 10);
        let report = render(&table);
        let keys: Vec<&str> = report.lines().map(|l| l.split('=').next().unwrap()).collect();
        assert_eq!(keys, ["A", "Z", "b"]);
    }

    #[test]
    fn empty_table_renders_nothing() {
        assert_eq!(render(&SummaryTable::new()), "");
    }
}
