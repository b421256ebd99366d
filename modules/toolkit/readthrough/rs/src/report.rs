use std::io::Write;

use eyre::Result;
use itertools::Itertools;

use crate::counter::Diagnostics;
use crate::result::Summary;

pub fn write_counts(summary: &Summary, mut writer: impl Write) -> Result<()> {
    writeln!(writer, "name\tcounts_base\tcounts_readthrough")?;
    for row in summary.rows() {
        writeln!(writer, "{}\t{}\t{}", row.name(), row.base(), row.readthrough())?;
    }
    writer.flush()?;
    Ok(())
}

/// One line per feature: the name, a space and the space-separated tail lengths.
pub fn write_tails(summary: &Summary, mut writer: impl Write) -> Result<()> {
    for (name, tails) in summary.tails() {
        writeln!(writer, "{} {}", name, tails.iter().join(" "))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_diagnostics(diagnostics: &Diagnostics, mut writer: impl Write) -> Result<()> {
    for (name, value) in diagnostics.entries() {
        writeln!(writer, "__{name}\t{value}")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Row;

    fn summary() -> Summary {
        Summary::new(
            vec![
                Row::new("A".to_string(), 3.0, 1.5),
                Row::new("B".to_string(), 1.0, 0.0),
            ],
            vec![("A".to_string(), vec![12, 7]), ("B".to_string(), vec![])],
            Diagnostics::default(),
        )
    }

    #[test]
    fn test_counts_table() -> Result<()> {
        let mut buffer = Vec::new();
        write_counts(&summary(), &mut buffer)?;
        assert_eq!(
            String::from_utf8(buffer)?,
            "name\tcounts_base\tcounts_readthrough\nA\t3\t1.5\nB\t1\t0\n"
        );
        Ok(())
    }

    #[test]
    fn test_tails_file() -> Result<()> {
        let mut buffer = Vec::new();
        write_tails(&summary(), &mut buffer)?;
        assert_eq!(String::from_utf8(buffer)?, "A 12 7\nB \n");
        Ok(())
    }

    #[test]
    fn test_diagnostics_table() -> Result<()> {
        let mut buffer = Vec::new();
        write_diagnostics(summary().diagnostics(), &mut buffer)?;
        let text = String::from_utf8(buffer)?;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "__MULTI_MAP\t0");
        assert_eq!(lines[10], "__TOTAL_READTHROUGH_HITS\t0");
        Ok(())
    }
}
