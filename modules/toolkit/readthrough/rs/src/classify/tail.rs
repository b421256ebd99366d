use readthru_core_rs::alignment::Segment;
use readthru_core_rs::loc::{Interval, IntervalOp, Strand};

use crate::annotation::Geometry;

/// The span starts before the feature's 5' end.
pub fn extends_upstream(span: &Interval<u64>, geometry: &Geometry) -> bool {
    match geometry.strand() {
        Strand::Forward => span.start() < geometry.bounding().start(),
        Strand::Reverse => span.end() > geometry.bounding().end(),
    }
}

/// Length of the alignment past the 3' edge, walking outward in the direction of transcription
/// until the first skip. Matches and deletions both count. `None` if the segment doesn't reach
/// past the edge at all.
pub fn tail_length(segment: &Segment, strand: Strand, edge: u64) -> Option<u64> {
    let span = segment.span()?;
    match strand {
        Strand::Forward => {
            if span.end() <= edge {
                return None;
            }
            let mut tail = 0;
            for (op, start, end) in segment.blocks() {
                if end <= edge {
                    continue;
                }
                if op.kind.is_skip() {
                    break;
                }
                tail += end - start.max(edge);
            }
            Some(tail)
        }
        Strand::Reverse => {
            if span.start() >= edge {
                return None;
            }
            // Only blocks after the skip closest to the edge are reachable from it
            let mut tail = 0;
            for (op, start, end) in segment.blocks() {
                if start >= edge {
                    break;
                }
                if op.kind.is_skip() {
                    tail = 0;
                } else {
                    tail += end.min(edge) - start;
                }
            }
            Some(tail)
        }
    }
}
