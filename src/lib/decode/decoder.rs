//! Per-position decoding of pileup call-strings into mutation rates.

use rustc_hash::FxHashMap;

use super::call_string::strip_indels;
use super::pileup::PileupLine;
use crate::profile::{
    percent, BaseRates, IndelCutoff, IndelRates, PositionRecord, SizeClassRates, SizeClasses,
};

/// Turns pileup lines into [`PositionRecord`]s.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Decoder {
    cutoff: IndelCutoff,
    size_classes: SizeClasses,
}

impl Decoder {
    pub fn new(cutoff: IndelCutoff, size_classes: SizeClasses) -> Self {
        Self {
            cutoff,
            size_classes,
        }
    }

    /// Same size classes, different reporting cutoff.
    pub fn with_cutoff(&self, cutoff: IndelCutoff) -> Self {
        Self { cutoff, ..*self }
    }

    pub fn cutoff(&self) -> IndelCutoff {
        self.cutoff
    }

    /// Decode one pileup line.
    pub fn decode(&self, line: &PileupLine<'_>) -> PositionRecord {
        self.decode_calls(
            line.chromosome,
            line.coordinate,
            line.reference_base,
            line.readcount,
            line.call_string,
        )
    }

    /// Decode a raw call-string.
    ///
    /// Every rate is a percentage of `readcount`, never of the call-string
    /// length. With `readcount == 0` all rates are zero and no indels are reported.
    pub fn decode_calls(
        &self,
        chromosome: &str,
        coordinate: u64,
        reference_base: &str,
        readcount: u32,
        call_string: &str,
    ) -> PositionRecord {
        let mut record = PositionRecord::empty(chromosome, coordinate, reference_base, readcount);
        record.size_classes = Some(SizeClassRates::default());
        if readcount == 0 {
            return record;
        }

        let stripped = strip_indels(call_string);

        let (mut a, mut t, mut g, mut c, mut ins, mut del) = (0u32, 0u32, 0u32, 0u32, 0u32, 0u32);
        for base in &stripped.calls {
            match base.to_ascii_uppercase() {
                b'A' => a += 1,
                b'T' => t += 1,
                b'G' => g += 1,
                b'C' => c += 1,
                b'+' => ins += 1,
                b'-' => del += 1,
                _ => {}
            }
        }

        record.base_rates = BaseRates {
            a: percent(a, readcount),
            t: percent(t, readcount),
            g: percent(g, readcount),
            c: percent(c, readcount),
        };
        record.snv_rate = record.base_rates.total();
        record.insertion_rate = percent(ins, readcount);
        record.deletion_rate = percent(del, readcount);

        // Non-ACGT references leave both at zero; the caller decides how to report them.
        if let Some((transition, transversion)) =
            record.base_rates.transition_split(reference_base)
        {
            record.transition_rate = transition;
            record.transversion_rate = transversion;
        }

        let (mut small, mut mid, mut large) = (0u32, 0u32, 0u32);
        let mut occurrences: FxHashMap<&str, u32> = FxHashMap::default();
        for indel in &stripped.indels {
            if self.size_classes.is_small(indel.length) {
                small += 1;
            }
            if self.size_classes.is_mid(indel.length) {
                mid += 1;
            }
            if self.size_classes.is_large(indel.length) {
                large += 1;
            }
            *occurrences.entry(indel.call.as_str()).or_insert(0) += 1;
        }

        record.size_classes = Some(SizeClassRates {
            small: percent(small, readcount),
            mid: percent(mid, readcount),
            large: percent(large, readcount),
        });
        record.indel_rates = IndelRates::from_counts(occurrences, readcount, self.cutoff);

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn report_all() -> Decoder {
        Decoder::new(IndelCutoff::ReportAll, SizeClasses::default())
    }

    #[test]
    fn substitution_rates_for_reference_g() {
        let record = report_all().decode_calls("chr1", 100, "G", 10, "..,,AAaa..");
        assert_eq!(record.base_rates.a, 40.0);
        assert_eq!(record.transition_rate, 40.0);
        assert_eq!(record.transversion_rate, 0.0);
        assert_eq!(record.snv_rate, 40.0);
        assert_eq!(record.insertion_rate, 0.0);
        assert_eq!(record.deletion_rate, 0.0);
        assert!(record.indel_rates.is_empty());
    }

    #[test]
    fn decodes_pileup_line() {
        let fields =
            csv::StringRecord::from(vec!["chr1", "100", "G", "10", "..,,AAaa..", "IIIIIIIIII"]);
        let line = PileupLine::from_fields(&fields, 1).unwrap();
        let record = Decoder::default().decode(&line);
        assert_eq!(record.chromosome.as_str(), "chr1");
        assert_eq!(record.coordinate, 100);
        assert_eq!(record.base_rates.a, 40.0);
    }

    #[test]
    fn indel_rates_and_size_classes() {
        let record = report_all().decode_calls("chr1", 7, "A", 2, "A+2AGT-1C");
        assert_eq!(record.indel_rates.get("+2AG"), Some(50.0));
        assert_eq!(record.indel_rates.get("-1C"), Some(50.0));
        assert_eq!(record.indel_rates.len(), 2);
        assert_eq!(record.insertion_rate, 50.0);
        assert_eq!(record.deletion_rate, 50.0);
        // indel sequences are not substitutions
        assert_eq!(record.base_rates.a, 50.0);
        assert_eq!(record.base_rates.t, 50.0);
        assert_eq!(record.base_rates.g, 0.0);
        assert_eq!(record.base_rates.c, 0.0);
        assert_eq!(
            record.size_classes,
            Some(SizeClassRates {
                small: 50.0,
                mid: 50.0,
                large: 0.0
            })
        );
    }

    #[test]
    fn reversed_mid_range_and_negative_large_bound() {
        let classes = SizeClasses::from_raw("1", "4,2", "-1");
        let decoder = Decoder::new(IndelCutoff::ReportAll, classes);
        let record = decoder.decode_calls("chr1", 1, "A", 4, ".+3AGT.-2CC.");
        let sizes = record.size_classes.unwrap();
        assert_eq!(sizes.small, 0.0);
        assert_eq!(sizes.mid, 0.0);
        assert_eq!(sizes.large, 50.0);
    }

    #[test]
    fn identical_indels_are_grouped_case_insensitively() {
        let record = report_all().decode_calls("chr1", 7, "C", 4, ".-2AG,-2ag.+7AAAAAAA,");
        assert_eq!(record.indel_rates.get("-2AG"), Some(50.0));
        assert_eq!(record.indel_rates.get("+7AAAAAAA"), Some(25.0));
        assert_eq!(record.size_classes.unwrap().large, 25.0);
        assert_eq!(record.size_classes.unwrap().mid, 50.0);
        assert_eq!(record.base_rates.a, 0.0);
    }

    #[test]
    fn cutoff_is_strict() {
        let decoder = Decoder::new(IndelCutoff::Threshold(25.0), SizeClasses::default());
        let record = decoder.decode_calls("chr1", 7, "C", 4, ".-2AG,-2ag.+1A,");
        assert_eq!(record.indel_rates.get("-2AG"), Some(50.0));
        assert_eq!(record.indel_rates.get("+1A"), None);

        let lower = decoder.with_cutoff(IndelCutoff::Threshold(25.0 - 1e-9));
        let record = lower.decode_calls("chr1", 7, "C", 4, ".-2AG,-2ag.+1A,");
        assert_eq!(record.indel_rates.get("+1A"), Some(25.0));
    }

    #[test]
    fn zero_readcount_yields_zero_rates() {
        let record = report_all().decode_calls("chr1", 1, "T", 0, "AC+1G-2TT*");
        let mut expected = PositionRecord::empty("chr1", 1, "T", 0);
        expected.size_classes = Some(SizeClassRates::default());
        assert_eq!(record, expected);
        assert_eq!(record.base_rates, BaseRates::default());
        assert_eq!(record.transition_rate, 0.0);
        assert_eq!(record.transversion_rate, 0.0);
        assert_eq!(record.deletion_rate, 0.0);
        assert!(record.indel_rates.is_empty());
    }

    #[test]
    fn non_canonical_reference_leaves_transitions_zero() {
        let record = report_all().decode_calls("chr1", 1, "N", 4, "ACGT");
        assert_eq!(record.snv_rate, 100.0);
        assert_eq!(record.transition_rate, 0.0);
        assert_eq!(record.transversion_rate, 0.0);
        assert!(!record.has_canonical_reference());
    }

    #[test]
    fn read_start_quality_is_not_a_call() {
        // quality chars 'A' and '+' would otherwise count as a substitution and an insertion
        let record = report_all().decode_calls("chr1", 1, "C", 2, "^A.^+,$");
        assert_eq!(record.snv_rate, 0.0);
        assert_eq!(record.insertion_rate, 0.0);
    }

    fn call_string() -> impl Strategy<Value = String> {
        let token = prop_oneof![
            "[.,ACGTNacgtn*$]",
            "\\^[!-~]",
            "[+-][1-9][ACGTacgt]{9}".prop_map(|raw| {
                let length = (raw.as_bytes()[1] - b'0') as usize;
                raw[..2 + length].to_string()
            }),
        ];
        prop::collection::vec(token, 0..40).prop_map(|tokens| tokens.concat())
    }

    proptest! {
        #[test]
        fn snv_rate_is_sum_of_base_rates(calls in call_string(), readcount in 0u32..60, reference in "[ACGTN]") {
            let record = report_all().decode_calls("chr1", 1, &reference, readcount, &calls);
            let b = record.base_rates;
            prop_assert_eq!(record.snv_rate, b.a + b.t + b.g + b.c);
            if readcount == 0 {
                prop_assert_eq!(record.snv_rate, 0.0);
                prop_assert!(record.indel_rates.is_empty());
            }
        }

        #[test]
        fn substitution_only_calls_have_no_indels(calls in "[ACGTacgt]{1,50}") {
            let readcount = calls.len() as u32;
            let record = report_all().decode_calls("chr1", 1, "A", readcount, &calls);
            prop_assert_eq!(record.insertion_rate, 0.0);
            prop_assert_eq!(record.deletion_rate, 0.0);
            prop_assert!(record.indel_rates.is_empty());
            prop_assert!((record.snv_rate - 100.0).abs() < 1e-9);
        }

        #[test]
        fn every_rate_is_non_negative(calls in call_string(), readcount in 1u32..60) {
            let record = report_all().decode_calls("chr1", 1, "G", readcount, &calls);
            let sizes = record.size_classes.unwrap();
            for rate in [record.snv_rate, record.insertion_rate, record.deletion_rate,
                         record.transition_rate, record.transversion_rate,
                         sizes.small, sizes.mid, sizes.large] {
                prop_assert!(rate >= 0.0);
            }
            prop_assert!(record.indel_rates.iter().all(|(_, rate)| rate > 0.0));
        }
    }
}
