use proptest::prelude::*;

use readthru_core_rs::alignment::{Cigar, Flags, Kind, Op, Placement, Segment, Template};
use readthru_core_rs::loc::{Interval, IntervalOp, Locus, Orientation};
use readthru_readthrough_rs::annotation::FeatureIndex;
use readthru_readthrough_rs::classify::{Classifier, Outcome, Tier};
use readthru_readthrough_rs::{Config, Counter, Discard, Engine, Multimapping};

fn exon(start: u64, end: u64, orientation: Orientation) -> Locus<String, u64> {
    Locus::new("chr1".to_string(), Interval::new(start, end).unwrap(), orientation)
}

fn index() -> FeatureIndex {
    FeatureIndex::builder()
        .add_records([
            ("A", "exon", exon(100, 150, Orientation::Forward)),
            ("A", "exon", exon(200, 300, Orientation::Forward)),
            ("B", "exon", exon(400, 500, Orientation::Reverse)),
            ("C", "exon", exon(480, 560, Orientation::Forward)),
        ])
        .build()
        .unwrap()
}

fn cigar() -> impl Strategy<Value = Cigar> {
    let op = prop_oneof![
        4 => (1u64..60).prop_map(|len| Op::new(Kind::Match, len)),
        1 => (1u64..80).prop_map(|len| Op::new(Kind::Skip, len)),
        1 => (1u64..5).prop_map(|len| Op::new(Kind::Deletion, len)),
        1 => (1u64..5).prop_map(|len| Op::new(Kind::Insertion, len)),
    ];
    ((1u64..60), prop::collection::vec(op, 0..4)).prop_map(|(first, rest)| {
        std::iter::once(Op::new(Kind::Match, first))
            .chain(rest)
            .collect()
    })
}

fn segment() -> impl Strategy<Value = Segment> {
    let flags = prop_oneof![
        8 => Just(Flags::PAIRED | Flags::PROPER_PAIR),
        1 => Just(Flags::PAIRED | Flags::PROPER_PAIR | Flags::DUPLICATE),
        1 => Just(Flags::PAIRED),
    ];
    ((0u64..600), cigar(), flags).prop_map(|(start, cigar, flags)| {
        Segment::new(
            "read".to_string(),
            "chr1".to_string(),
            start,
            cigar,
            Orientation::Forward,
            Flags::from(flags),
        )
    })
}

fn placement() -> impl Strategy<Value = Placement> {
    prop_oneof![
        9 => (segment(), segment()).prop_map(|(first, second)| Placement::Paired(first, second)),
        1 => segment().prop_map(Placement::Orphan),
    ]
}

fn templates() -> impl Strategy<Value = Vec<Template>> {
    prop::collection::vec(prop::collection::vec(placement(), 1..4), 1..40).prop_map(|x| {
        x.into_iter()
            .enumerate()
            .map(|(ind, placements)| Template::new(format!("t{ind}"), placements))
            .collect()
    })
}

fn multimapping() -> impl Strategy<Value = Multimapping> {
    prop_oneof![
        Just(Multimapping::CountAll),
        Just(Multimapping::CountNone),
        Just(Multimapping::CountFractional),
    ]
}

fn count(index: &FeatureIndex, config: &Config, templates: &[Template]) -> Counter {
    let classifier = Classifier::new(index, config);
    let mut counter = Counter::new();
    for template in templates {
        for call in classifier.classify(template) {
            counter.fold(call.outcome(), *call.weight());
        }
    }
    counter
}

proptest! {
    #[test]
    fn every_template_is_accounted_for(templates in templates(), mode in multimapping()) {
        let index = index();
        let config = Config::builder().with_multimapping(mode).build().unwrap();
        let counter = count(&index, &config, &templates);

        let diagnostics = counter.diagnostics();
        let rejected: f64 = diagnostics.rejected().iter().sum();
        prop_assert!((rejected + diagnostics.base_hits() - diagnostics.templates()).abs() < 1e-6);
        // Every template carries a total weight of one, except under count_all
        if mode != Multimapping::CountAll {
            prop_assert!((diagnostics.templates() - templates.len() as f64).abs() < 1e-6);
        }
    }

    #[test]
    fn readthrough_is_contained_in_base(templates in templates(), mode in multimapping()) {
        let index = index();
        let config = Config::builder().with_multimapping(mode).build().unwrap();
        let counter = count(&index, &config, &templates);

        for ind in 0..index.features().len() {
            if let Some(tally) = counter.tally(ind) {
                prop_assert!(*tally.readthrough() <= *tally.base() + 1e-9);
                prop_assert!(*tally.readthrough() >= 0.0);
            }
        }
        prop_assert!(counter.diagnostics().readthrough_hits() <= counter.diagnostics().base_hits());
    }

    #[test]
    fn tails_stay_within_the_alignment(templates in templates()) {
        let index = index();
        let config = Config::default();
        let classifier = Classifier::new(&index, &config);

        for template in &templates {
            for (placement, call) in template.placements().iter().zip(classifier.classify(template)) {
                let Outcome::Accepted(hit) = call.outcome() else { continue };
                let geometry = index.features()[*hit.feature()].geometry().as_ref().unwrap();
                let edge = geometry.three_prime_edge();
                let reach = placement
                    .segments()
                    .filter_map(|x| x.span())
                    .map(|span| span.end().saturating_sub(edge).max(edge.saturating_sub(span.start())))
                    .max()
                    .unwrap_or(0);

                match hit.tier() {
                    Tier::Base => prop_assert_eq!(*hit.tail_length(), 0),
                    Tier::Readthrough => {
                        prop_assert!(*hit.tail_length() > 0);
                        prop_assert!(*hit.tail_length() <= reach);
                    }
                }
                prop_assert!(*hit.base_match_length() >= *config.anchor());
            }
        }
    }

    #[test]
    fn parallel_runs_are_deterministic(
        templates in templates(),
        mode in multimapping(),
        batch_size in 1usize..16,
    ) {
        let config = Config::builder().with_multimapping(mode).build().unwrap();
        let mut sequential = Engine::builder()
            .set_index(index())
            .set_config(config.clone())
            .build()
            .unwrap();
        let pool = rayon::ThreadPoolBuilder::new().num_threads(3).build().unwrap();
        let mut parallel = Engine::builder()
            .set_index(index())
            .set_config(config)
            .set_thread_pool(pool)
            .set_batch_size(batch_size)
            .build()
            .unwrap();

        let expected = sequential.run(templates.clone().into_iter().map(Ok), Discard).unwrap();
        let summary = parallel.run(templates.into_iter().map(Ok), Discard).unwrap();
        prop_assert_eq!(summary.tails(), expected.tails());
        prop_assert_eq!(summary.rows().len(), expected.rows().len());
        for (left, right) in summary.rows().iter().zip(expected.rows()) {
            prop_assert_eq!(left.name(), right.name());
            prop_assert!((left.base() - right.base()).abs() < 1e-6);
            prop_assert!((left.readthrough() - right.readthrough()).abs() < 1e-6);
        }
    }

    #[test]
    fn merge_is_associative(templates in templates(), split in (0usize..40, 0usize..40)) {
        let index = index();
        let config = Config::builder().with_multimapping(Multimapping::CountAll).build().unwrap();

        let (first, second) = (split.0.min(split.1), split.0.max(split.1));
        let first = first.min(templates.len());
        let second = second.min(templates.len());
        let parts = [
            &templates[..first],
            &templates[first..second],
            &templates[second..],
        ];
        let [a, b, c] = parts.map(|x| count(&index, &config, x));

        let mut left = a.clone();
        left.merge(b.clone());
        left.merge(c.clone());

        let mut right = b;
        right.merge(c);
        let mut right_total = a;
        right_total.merge(right);

        let whole = count(&index, &config, &templates);
        prop_assert_eq!(&left, &right_total);
        prop_assert_eq!(&left, &whole);
    }
}
