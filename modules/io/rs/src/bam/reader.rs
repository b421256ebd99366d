use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use eyre::{eyre, Result, WrapErr};
use noodles::bam;
use noodles::sam::alignment::record::cigar::op::Kind as BamKind;

use readthru_core_rs::alignment::{Cigar, Flags, Kind, Op, Segment, Template};
use readthru_core_rs::loc::Orientation;

use super::pairing::{pair_mates, Mate};

/// Open a BAM file grouped by query name.
pub fn open(path: impl AsRef<Path>) -> Result<TemplateReader<impl Read>> {
    let path = path.as_ref();
    let file = File::open(path)
        .wrap_err_with(|| format!("Failed to open BAM file: {}", path.display()))?;
    TemplateReader::new(bam::io::Reader::new(file))
        .wrap_err_with(|| format!("Failed to read BAM header: {}", path.display()))
}

fn kind(kind: BamKind) -> Kind {
    match kind {
        BamKind::Match => Kind::Match,
        BamKind::Insertion => Kind::Insertion,
        BamKind::Deletion => Kind::Deletion,
        BamKind::Skip => Kind::Skip,
        BamKind::SoftClip => Kind::SoftClip,
        BamKind::HardClip => Kind::HardClip,
        BamKind::Pad => Kind::Pad,
        BamKind::SequenceMatch => Kind::SequenceMatch,
        BamKind::SequenceMismatch => Kind::SequenceMismatch,
    }
}

/// Streams templates out of a query-name grouped BAM file. All consecutive records sharing a
/// query name form one template. Supplementary records are skipped.
pub struct TemplateReader<R: Read> {
    inner: bam::io::Reader<R>,
    contigs: Vec<String>,
    record: bam::Record,
    // First record of the next template
    pending: Option<(Vec<u8>, Mate)>,
    records: usize,
    supplementary: usize,
}

impl<R: Read> TemplateReader<R> {
    pub fn new(mut inner: bam::io::Reader<R>) -> Result<Self> {
        let header = inner.read_header()?;
        let contigs = header
            .reference_sequences()
            .keys()
            .map(|name| name.to_string())
            .collect();

        Ok(Self {
            inner,
            contigs,
            record: bam::Record::default(),
            pending: None,
            records: 0,
            supplementary: 0,
        })
    }

    /// Reference sequence names from the header, in header order.
    pub fn contigs(&self) -> &[String] {
        &self.contigs
    }

    fn decode(&self) -> Result<(Vec<u8>, Mate)> {
        let record = &self.record;

        let qname: Vec<u8> = match record.name() {
            Some(name) => {
                let bytes: &[u8] = name.as_ref();
                bytes.to_vec()
            }
            None => Vec::new(),
        };
        let flags = Flags::from(u16::from(record.flags()));

        let reference_id = record.reference_sequence_id().transpose()?;
        let start = record
            .alignment_start()
            .transpose()?
            .map(|pos| (pos.get() - 1) as u64);
        let mate_reference_id = record.mate_reference_sequence_id().transpose()?;
        let mate_start = record
            .mate_alignment_start()
            .transpose()?
            .map(|pos| (pos.get() - 1) as u64);

        let contig = match reference_id {
            Some(id) => self.contigs.get(id).cloned().ok_or_else(|| {
                eyre!("Reference sequence {id} is missing from the BAM header")
            })?,
            None => String::new(),
        };

        let cigar = record
            .cigar()
            .iter()
            .map(|op| op.map(|op| Op::new(kind(op.kind()), op.len() as u64)))
            .collect::<io::Result<Cigar>>()?;

        let orientation = match flags.is_reverse() {
            true => Orientation::Reverse,
            false => Orientation::Forward,
        };

        let segment = Segment::new(
            String::from_utf8_lossy(&qname).into_owned(),
            contig,
            start.unwrap_or(0),
            cigar,
            orientation,
            flags,
        );
        let mate = Mate::new(segment, reference_id, start, mate_reference_id, mate_start);
        Ok((qname, mate))
    }

    fn read_mate(&mut self) -> Result<Option<(Vec<u8>, Mate)>> {
        loop {
            if self.inner.read_record(&mut self.record)? == 0 {
                log::debug!(
                    "BAM exhausted after {} records ({} supplementary skipped)",
                    self.records,
                    self.supplementary
                );
                return Ok(None);
            }
            self.records += 1;

            let flags: u16 = self.record.flags().into();
            if flags & Flags::SUPPLEMENTARY != 0 {
                self.supplementary += 1;
                continue;
            }
            return self
                .decode()
                .wrap_err_with(|| format!("Failed to decode BAM record #{}", self.records))
                .map(Some);
        }
    }

    fn read_template(&mut self) -> Result<Option<Template>> {
        let (qname, first) = match self.pending.take() {
            Some(pending) => pending,
            None => match self.read_mate()? {
                Some(mate) => mate,
                None => return Ok(None),
            },
        };

        let mut group = vec![first];
        while let Some((name, mate)) = self.read_mate()? {
            if name != qname {
                self.pending = Some((name, mate));
                break;
            }
            group.push(mate);
        }

        let name = String::from_utf8_lossy(&qname).into_owned();
        Ok(Some(Template::new(name, pair_mates(group))))
    }
}

impl<R: Read> Iterator for TemplateReader<R> {
    type Item = Result<Template>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_template().transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use noodles::core::Position;
    use noodles::sam;
    use noodles::sam::alignment::io::Write as _;
    use noodles::sam::alignment::record::cigar::Op as BamOp;
    use noodles::sam::alignment::record_buf::{Cigar as BamCigar, RecordBuf};
    use noodles::sam::header::record::value::{map::ReferenceSequence, Map};

    use readthru_core_rs::alignment::Placement;

    use super::*;

    fn record(name: &str, flags: u16, start: usize, cigar: &[(BamKind, usize)]) -> RecordBuf {
        let cigar: BamCigar = cigar.iter().map(|&(k, len)| BamOp::new(k, len)).collect();
        RecordBuf::builder()
            .set_name(name)
            .set_flags(sam::alignment::record::Flags::from(flags))
            .set_reference_sequence_id(0)
            .set_alignment_start(Position::new(start).unwrap())
            .set_cigar(cigar)
            .build()
    }

    fn with_mate(mut record: RecordBuf, start: usize) -> RecordBuf {
        *record.mate_reference_sequence_id_mut() = Some(0);
        *record.mate_alignment_start_mut() = Position::new(start);
        record
    }

    fn bam(records: &[RecordBuf]) -> Vec<u8> {
        let header = sam::Header::builder()
            .add_reference_sequence(
                "chr1",
                Map::<ReferenceSequence>::new(NonZeroUsize::new(10_000).unwrap()),
            )
            .build();

        let mut writer = bam::io::Writer::new(Vec::new());
        writer.write_header(&header).unwrap();
        for record in records {
            writer.write_alignment_record(&header, record).unwrap();
        }
        writer.try_finish().unwrap();
        writer.get_ref().get_ref().clone()
    }

    const FIRST: u16 = Flags::PAIRED | Flags::PROPER_PAIR | Flags::FIRST_SEGMENT;
    const LAST: u16 = Flags::PAIRED | Flags::PROPER_PAIR | Flags::LAST_SEGMENT;

    #[test]
    fn test_read_templates() {
        let data = bam(&[
            with_mate(
                record("a", FIRST | Flags::MATE_REVERSE, 101, &[(BamKind::Match, 20)]),
                301,
            ),
            record(
                "a",
                FIRST | Flags::SUPPLEMENTARY,
                2001,
                &[(BamKind::SoftClip, 5), (BamKind::Match, 15)],
            ),
            with_mate(
                record(
                    "a",
                    LAST | Flags::REVERSE,
                    301,
                    &[(BamKind::Match, 10), (BamKind::Skip, 50), (BamKind::Match, 10)],
                ),
                101,
            ),
            record("b", 0, 501, &[(BamKind::Match, 30)]),
        ]);

        let mut reader = TemplateReader::new(bam::io::Reader::new(data.as_slice())).unwrap();
        assert_eq!(reader.contigs(), ["chr1".to_string()]);

        let templates = reader.by_ref().collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(templates.len(), 2);
        assert_eq!(reader.records, 4);
        assert_eq!(reader.supplementary, 1);

        let a = &templates[0];
        assert_eq!(a.name(), "a");
        assert_eq!(a.placements().len(), 1);
        let Placement::Paired(first, second) = &a.placements()[0] else {
            panic!("Expected a paired placement, got {:?}", a.placements()[0]);
        };
        assert_eq!(first.name(), "a");
        assert_eq!(first.contig(), "chr1");
        assert_eq!(*first.start(), 100);
        assert_eq!(*first.orientation(), Orientation::Forward);
        assert_eq!(first.cigar(), &"20M".parse::<Cigar>().unwrap());
        assert_eq!(*second.start(), 300);
        assert_eq!(*second.orientation(), Orientation::Reverse);
        assert_eq!(second.cigar(), &"10M50N10M".parse::<Cigar>().unwrap());

        let b = &templates[1];
        assert_eq!(b.name(), "b");
        assert_eq!(b.placements().len(), 1);
        let Placement::Orphan(lone) = &b.placements()[0] else {
            panic!("Expected an orphan placement, got {:?}", b.placements()[0]);
        };
        assert_eq!(*lone.start(), 500);
        assert_eq!(lone.cigar(), &"30M".parse::<Cigar>().unwrap());
    }

    #[test]
    fn test_read_empty_bam() {
        let data = bam(&[]);
        let mut reader = TemplateReader::new(bam::io::Reader::new(data.as_slice())).unwrap();
        assert_eq!(reader.contigs(), ["chr1".to_string()]);
        assert!(reader.next().is_none());
        assert_eq!(reader.records, 0);
    }
}
