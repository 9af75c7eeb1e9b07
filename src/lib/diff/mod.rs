//! Differential profiles (treatment − control).
//!
//! Both records must describe the same position; this is the caller's
//! responsibility and is not re-validated. Identity fields are copied from the
//! control record.

use crate::profile::{IndelCutoff, IndelRates, PositionRecord};

/// Difference two profiles of the same position.
///
/// - `readcount` is the smaller of the two depths
/// - every scalar rate is `treatment - control`; size-class rates only when
///   both records carry them
/// - indel rates are reconciled over the union of both key sets (see
///   [`IndelRates::difference`]) and filtered on the signed delta
pub fn difference(
    control: &PositionRecord,
    treatment: &PositionRecord,
    cutoff: IndelCutoff,
) -> PositionRecord {
    let mut delta = PositionRecord::scalar_delta(control, treatment);
    delta.indel_rates =
        IndelRates::difference(&control.indel_rates, &treatment.indel_rates, cutoff);
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Decoder;
    use crate::profile::{SizeClassRates, SizeClasses};
    use proptest::prelude::*;

    fn decoded(reference: &str, readcount: u32, calls: &str) -> PositionRecord {
        Decoder::new(IndelCutoff::ReportAll, SizeClasses::default())
            .decode_calls("chr1", 100, reference, readcount, calls)
    }

    #[test]
    fn identical_records_cancel_out() {
        let record = decoded("G", 8, "..AA+2CC-1Tg,");
        let delta = difference(&record, &record, IndelCutoff::ReportAll);
        assert_eq!(delta.readcount, 8);
        assert_eq!(delta.snv_rate, 0.0);
        assert_eq!(delta.base_rates.a, 0.0);
        assert_eq!(delta.transition_rate, 0.0);
        assert_eq!(delta.insertion_rate, 0.0);
        assert_eq!(delta.size_classes, Some(SizeClassRates::default()));
        assert_eq!(delta.indel_rates.len(), record.indel_rates.len());
        assert!(delta.indel_rates.iter().all(|(_, rate)| rate == 0.0));
    }

    #[test]
    fn one_sided_indels_keep_their_sign() {
        let mut control = PositionRecord::empty("chr1", 100, "A", 20);
        control.indel_rates.insert("-1C", 5.0);
        let mut treatment = PositionRecord::empty("chr1", 100, "A", 40);
        treatment.indel_rates.insert("+2AG", 7.0);

        let delta = difference(&control, &treatment, IndelCutoff::ReportAll);
        assert_eq!(delta.indel_rates.get("-1C"), Some(-5.0));
        assert_eq!(delta.indel_rates.get("+2AG"), Some(7.0));
        assert_eq!(delta.readcount, 20);

        // disappearing indels are dropped by a numeric cutoff
        let filtered = difference(&control, &treatment, IndelCutoff::Threshold(1.0));
        assert_eq!(filtered.indel_rates.get("-1C"), None);
        assert_eq!(filtered.indel_rates.get("+2AG"), Some(7.0));
    }

    #[test]
    fn scalar_rates_are_treatment_minus_control() {
        let control = decoded("T", 10, "..CC..A...");
        let treatment = decoded("T", 10, "CCCCC.GG+1A.");
        let delta = difference(&control, &treatment, IndelCutoff::ReportAll);
        assert!((delta.base_rates.c - 30.0).abs() < 1e-9);
        assert!((delta.base_rates.a - -10.0).abs() < 1e-9);
        assert!((delta.base_rates.g - 20.0).abs() < 1e-9);
        assert!((delta.transition_rate - 30.0).abs() < 1e-9);
        assert!((delta.transversion_rate - 10.0).abs() < 1e-9);
        assert!((delta.insertion_rate - 10.0).abs() < 1e-9);
        assert_eq!(delta.indel_rates.get("+1A"), Some(10.0));
        assert_eq!(delta.chromosome.as_str(), "chr1");
        assert_eq!(delta.reference_base.as_str(), "T");
    }

    #[test]
    fn missing_size_classes_propagate() {
        let control = decoded("A", 4, "....");
        let mut treatment = decoded("A", 4, "..G.");
        treatment.size_classes = None;
        assert_eq!(difference(&control, &treatment, IndelCutoff::ReportAll).size_classes, None);
    }

    proptest! {
        #[test]
        fn self_difference_is_zero(calls in "[.,ACGTacgt]{0,20}(\\+1[ACGT]|-2[ACGT]{2}){0,4}", readcount in 0u32..30) {
            let record = decoded("C", readcount, &calls);
            let delta = difference(&record, &record, IndelCutoff::ReportAll);
            prop_assert_eq!(delta.snv_rate, 0.0);
            prop_assert_eq!(delta.deletion_rate, 0.0);
            prop_assert!(delta.indel_rates.iter().all(|(_, rate)| rate == 0.0));
        }
    }
}
