use std::io::BufRead;
use std::path::Path;

use eyre::{bail, OptionExt, Result, WrapErr};

use readthru_core_rs::loc::{Interval, Orientation};

use super::record::Record;
use crate::compression;
use crate::traits::ReadRecord;

pub mod parse {
    use super::*;

    pub fn column<'a>(parts: &mut impl Iterator<Item = &'a str>, name: &str) -> Result<&'a str> {
        parts
            .next()
            .ok_or_else(|| eyre::eyre!("Missing GTF {name} column"))
    }

    /// GTF coordinates are 1-based and closed, the result is 0-based and half-open.
    pub fn interval<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<Interval<u64>> {
        let start = column(parts, "start")?;
        let end = column(parts, "end")?;

        let (start, end) = match (start.parse::<u64>(), end.parse::<u64>()) {
            (Ok(start), Ok(end)) if start > 0 => (start, end),
            _ => bail!("Invalid GTF interval: {start}-{end}"),
        };
        Interval::new(start - 1, end).wrap_err("Invalid GTF interval")
    }

    pub fn orientation<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<Orientation> {
        let orientation = column(parts, "strand")?;
        match orientation {
            "+" => Ok(Orientation::Forward),
            "-" => Ok(Orientation::Reverse),
            "." => Ok(Orientation::Dual),
            _ => bail!("Invalid GTF strand: {orientation}"),
        }
    }

    pub fn record(line: &str) -> Result<Record> {
        let mut parts = line.split('\t');
        let seqid = column(&mut parts, "seqname")?.to_owned();
        let source = column(&mut parts, "source")?.to_owned();
        let kind = column(&mut parts, "feature")?.to_owned();
        let interval = interval(&mut parts)?;
        // Score is not used
        column(&mut parts, "score")?;
        let orientation = orientation(&mut parts)?;
        column(&mut parts, "frame")?;
        let attributes = parts.next().ok_or_eyre("Missing GTF attributes column")?;

        Ok(Record::new(
            seqid,
            source,
            kind,
            interval,
            orientation,
            attributes.to_owned(),
        ))
    }
}

/// Line-oriented GTF reader. Comments and blank lines are skipped.
pub struct Reader<R: BufRead> {
    reader: R,
    buffer: String,
    line: usize,
}

impl Reader<Box<dyn BufRead + Send + Sync>> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = compression::read_file(path)
            .wrap_err_with(|| format!("Failed to open GTF file: {}", path.display()))?
            .box_bufread();
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line: 0,
        }
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Record;

    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(false);
            }
            self.line += 1;

            let line = self.buffer.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            *into = parse::record(line)
                .wrap_err_with(|| format!("Failed to parse GTF line {}: {line}", self.line))?;
            return Ok(true);
        }
    }
}

impl<R: BufRead> Iterator for Reader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = Record::default();
        match self.read_record(&mut record) {
            Ok(true) => Some(Ok(record)),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const GTF: &str = "\
#!genome-build GRCh38
chr1\thavana\tgene\t101\t200\t.\t+\t.\tgene_id \"G1\";
chr1\thavana\texon\t101\t150\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\";

chr2\tensembl\texon\t5\t20\t0\t.\t.\tgene_id \"G2\";
";

    #[test]
    fn test_read_records() -> Result<()> {
        let records: Vec<Record> = Reader::new(Cursor::new(GTF)).collect::<Result<_>>()?;
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].kind(), "gene");
        assert_eq!(records[1].interval(), &Interval::new(100, 150)?);
        assert_eq!(records[1].orientation(), &Orientation::Forward);
        assert_eq!(records[1].attribute("transcript_id"), Some("T1"));

        assert_eq!(records[2].seqid(), "chr2");
        assert_eq!(records[2].interval(), &Interval::new(4, 20)?);
        assert_eq!(records[2].orientation(), &Orientation::Dual);
        Ok(())
    }

    #[test]
    fn test_read_to_end() -> Result<()> {
        let mut records = Vec::new();
        let total = Reader::new(Cursor::new(GTF)).read_to_end(&mut records)?;
        assert_eq!(total, 3);
        assert_eq!(records.len(), 3);
        Ok(())
    }

    #[test]
    fn test_from_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["annotation.gtf", "annotation.gtf.gz"] {
            let path = dir.path().join(name);
            {
                let mut writer = compression::create_file(&path)?;
                writer.write_all(GTF.as_bytes())?;
                writer.flush()?;
            }

            let records: Vec<Record> = Reader::from_path(&path)?.collect::<Result<_>>()?;
            assert_eq!(records.len(), 3, "{name}");
            assert_eq!(records[0].interval(), &Interval::new(100, 200)?);
            assert_eq!(records[2].source(), "ensembl");
        }

        let missing = dir.path().join("missing.gtf");
        assert!(Reader::from_path(missing).is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_lines() {
        for line in [
            "chr1\tsrc\texon\t0\t10\t.\t+\t.\tgene_id \"G\";",
            "chr1\tsrc\texon\t20\t10\t.\t+\t.\tgene_id \"G\";",
            "chr1\tsrc\texon\t1\t10\t.\t*\t.\tgene_id \"G\";",
            "chr1\tsrc\texon\t1\t10\t.\t+\t.",
            "chr1\tsrc\texon\tX\t10\t.\t+\t.\tgene_id \"G\";",
        ] {
            let mut reader = Reader::new(Cursor::new(line));
            assert!(reader.next().is_some_and(|x| x.is_err()), "{line}");
        }
    }
}
