use derive_getters::{Dissolve, Getters};

use readthru_core_rs::loc::{Interval, Locus, Orientation};

/// A single GTF line. Coordinates are stored 0-based half-open.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Dissolve)]
pub struct Record {
    seqid: String,
    source: String,
    kind: String,
    interval: Interval<u64>,
    orientation: Orientation,
    attributes: String,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            seqid: String::new(),
            source: String::new(),
            kind: String::new(),
            interval: Interval::nucleotide(0),
            orientation: Orientation::Dual,
            attributes: String::new(),
        }
    }
}

impl Record {
    pub fn new(
        seqid: String,
        source: String,
        kind: String,
        interval: Interval<u64>,
        orientation: Orientation,
        attributes: String,
    ) -> Self {
        Self {
            seqid,
            source,
            kind,
            interval,
            orientation,
            attributes,
        }
    }

    /// Value of the first attribute with the given key. Quotes around values are stripped.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .split(';')
            .filter_map(|part| part.trim().split_once(char::is_whitespace))
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value.trim().trim_matches('"'))
    }

    pub fn locus(&self) -> Locus<String, u64> {
        Locus::new(self.seqid.clone(), self.interval, self.orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes() {
        let record = Record::new(
            "chr1".into(),
            "havana".into(),
            "exon".into(),
            Interval::new(100, 150).unwrap(),
            Orientation::Forward,
            "gene_id \"G1\"; transcript_id \"T1\";  gene_name \"Alpha 1\"; level 2;".into(),
        );
        assert_eq!(record.attribute("gene_id"), Some("G1"));
        assert_eq!(record.attribute("transcript_id"), Some("T1"));
        assert_eq!(record.attribute("gene_name"), Some("Alpha 1"));
        assert_eq!(record.attribute("level"), Some("2"));
        assert_eq!(record.attribute("exon_id"), None);
        assert_eq!(record.locus().to_string(), "chr1:100-150[+]");
    }
}
