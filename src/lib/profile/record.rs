//! Per-position mutation profile records.
//!
//! A [`PositionRecord`] is both the decoder's output and, once two records are
//! differenced, the delta record: the shapes are identical, only the sign
//! conventions of the rate fields differ.

use serde::Serialize;
use smartstring::{LazyCompact, SmartString};

use super::indel_rates::IndelRates;
use crate::core::error::{MprofileError, Result};

/// Column names of an extended profile, in order.
pub const PROFILE_COLUMNS: [&str; 17] = [
    "Chromosome",
    "Coordinate",
    "Ref.Base",
    "Readcount",
    "A.Mutations",
    "T.Mutations",
    "G.Mutations",
    "C.Mutations",
    "Transitions",
    "Transversions",
    "Total.SNVs",
    "Insertions",
    "Deletions",
    "Small.Indels",
    "Mid.Indels",
    "Large.Indels",
    "Common.Indels",
];

/// Column count of a profile without the size-class columns.
pub const LEGACY_PROFILE_WIDTH: usize = 14;

/// Header fields for an extended (`true`) or legacy (`false`) profile.
pub fn profile_header(with_size_classes: bool) -> Vec<&'static str> {
    if with_size_classes {
        PROFILE_COLUMNS.to_vec()
    } else {
        PROFILE_COLUMNS[..13]
            .iter()
            .chain(std::iter::once(&PROFILE_COLUMNS[16]))
            .copied()
            .collect()
    }
}

/// Substitution rates per called base.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BaseRates {
    pub a: f64,
    pub t: f64,
    pub g: f64,
    pub c: f64,
}

impl BaseRates {
    /// Total SNV rate.
    #[inline]
    pub fn total(&self) -> f64 {
        self.a + self.t + self.g + self.c
    }

    /// `(transition, transversion)` rates for a reference base.
    ///
    /// Returns `None` when the reference is not one of `A`, `C`, `G`, `T`
    /// (case-insensitive).
    pub fn transition_split(&self, reference_base: &str) -> Option<(f64, f64)> {
        let mut chars = reference_base.chars();
        let base = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() {
            return None;
        }
        match base {
            'G' => Some((self.a, self.t + self.c)),
            'C' => Some((self.t, self.a + self.g)),
            'T' => Some((self.c, self.a + self.g)),
            'A' => Some((self.g, self.t + self.c)),
            _ => None,
        }
    }

    fn delta(control: &BaseRates, treatment: &BaseRates) -> BaseRates {
        BaseRates {
            a: treatment.a - control.a,
            t: treatment.t - control.t,
            g: treatment.g - control.g,
            c: treatment.c - control.c,
        }
    }
}

/// Share of reads whose indel length falls into each size class.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeClassRates {
    pub small: f64,
    pub mid: f64,
    pub large: f64,
}

/// Mutation profile of one genomic position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionRecord {
    pub chromosome: SmartString<LazyCompact>,
    pub coordinate: u64,
    pub reference_base: SmartString<LazyCompact>,
    pub readcount: u32,
    pub base_rates: BaseRates,
    pub transition_rate: f64,
    pub transversion_rate: f64,
    pub snv_rate: f64,
    pub insertion_rate: f64,
    pub deletion_rate: f64,
    /// Absent for profiles written without the size-class columns.
    pub size_classes: Option<SizeClassRates>,
    pub indel_rates: IndelRates,
}

impl PositionRecord {
    /// A record with identity fields set and every rate zero.
    pub fn empty(chromosome: &str, coordinate: u64, reference_base: &str, readcount: u32) -> Self {
        PositionRecord {
            chromosome: SmartString::from(chromosome),
            coordinate,
            reference_base: SmartString::from(reference_base),
            readcount,
            ..Default::default()
        }
    }

    /// Whether transitions/transversions are defined for this position's reference base.
    #[inline]
    pub fn has_canonical_reference(&self) -> bool {
        BaseRates::default()
            .transition_split(&self.reference_base)
            .is_some()
    }

    /// Scalar delta `treatment - control`, identity taken from `control`.
    ///
    /// Indel rates are left empty; see [`IndelRates::difference`].
    pub(crate) fn scalar_delta(control: &PositionRecord, treatment: &PositionRecord) -> Self {
        let size_classes = match (control.size_classes, treatment.size_classes) {
            (Some(c), Some(t)) => Some(SizeClassRates {
                small: t.small - c.small,
                mid: t.mid - c.mid,
                large: t.large - c.large,
            }),
            _ => None,
        };

        PositionRecord {
            chromosome: control.chromosome.clone(),
            coordinate: control.coordinate,
            reference_base: control.reference_base.clone(),
            readcount: control.readcount.min(treatment.readcount),
            base_rates: BaseRates::delta(&control.base_rates, &treatment.base_rates),
            transition_rate: treatment.transition_rate - control.transition_rate,
            transversion_rate: treatment.transversion_rate - control.transversion_rate,
            snv_rate: treatment.snv_rate - control.snv_rate,
            insertion_rate: treatment.insertion_rate - control.insertion_rate,
            deletion_rate: treatment.deletion_rate - control.deletion_rate,
            size_classes,
            indel_rates: IndelRates::new(),
        }
    }

    /// Parse one data line of a profile (17 columns, or 14 without size classes).
    ///
    /// `line` is the 1-based line number used in error messages.
    pub fn from_profile_fields(record: &csv::StringRecord, line: u64) -> Result<Self> {
        let with_size_classes = match record.len() {
            n if n == PROFILE_COLUMNS.len() => true,
            LEGACY_PROFILE_WIDTH => false,
            n => {
                return Err(MprofileError::parse(
                    line,
                    format!(
                        "expected {} or {} profile columns, found {}",
                        PROFILE_COLUMNS.len(),
                        LEGACY_PROFILE_WIDTH,
                        n
                    ),
                ))
            }
        };

        let field = |idx: usize| record.get(idx).unwrap_or("");
        let rate = |idx: usize| -> Result<f64> {
            field(idx).trim().parse::<f64>().map_err(|_| {
                MprofileError::parse(
                    line,
                    format!("{} is not a number: '{}'", PROFILE_COLUMNS[idx], field(idx)),
                )
            })
        };

        let coordinate = field(1).trim().parse::<u64>().map_err(|_| {
            MprofileError::parse(line, format!("invalid coordinate '{}'", field(1)))
        })?;
        let readcount = field(3).trim().parse::<u32>().map_err(|_| {
            MprofileError::parse(line, format!("invalid readcount '{}'", field(3)))
        })?;

        let (size_classes, indel_idx) = if with_size_classes {
            let rates = SizeClassRates {
                small: rate(13)?,
                mid: rate(14)?,
                large: rate(15)?,
            };
            (Some(rates), 16)
        } else {
            (None, LEGACY_PROFILE_WIDTH - 1)
        };

        let indel_rates = field(indel_idx)
            .parse::<IndelRates>()
            .map_err(|msg| MprofileError::parse(line, msg))?;

        Ok(PositionRecord {
            chromosome: SmartString::from(field(0)),
            coordinate,
            reference_base: SmartString::from(field(2)),
            readcount,
            base_rates: BaseRates {
                a: rate(4)?,
                t: rate(5)?,
                g: rate(6)?,
                c: rate(7)?,
            },
            transition_rate: rate(8)?,
            transversion_rate: rate(9)?,
            snv_rate: rate(10)?,
            insertion_rate: rate(11)?,
            deletion_rate: rate(12)?,
            size_classes,
            indel_rates,
        })
    }

    /// Borrowing view used to serialize the record as one profile line.
    pub fn as_row(&self) -> ProfileRow<'_> {
        ProfileRow {
            chromosome: &self.chromosome,
            coordinate: self.coordinate,
            reference_base: &self.reference_base,
            readcount: self.readcount,
            a: self.base_rates.a,
            t: self.base_rates.t,
            g: self.base_rates.g,
            c: self.base_rates.c,
            transitions: self.transition_rate,
            transversions: self.transversion_rate,
            total_snvs: self.snv_rate,
            insertions: self.insertion_rate,
            deletions: self.deletion_rate,
            small_indels: self.size_classes.map(|s| s.small),
            mid_indels: self.size_classes.map(|s| s.mid),
            large_indels: self.size_classes.map(|s| s.large),
            common_indels: self.indel_rates.to_string(),
        }
    }
}

/// One output line of a profile.
#[derive(Debug, Serialize)]
pub struct ProfileRow<'a> {
    #[serde(rename = "Chromosome")]
    pub chromosome: &'a str,
    #[serde(rename = "Coordinate")]
    pub coordinate: u64,
    #[serde(rename = "Ref.Base")]
    pub reference_base: &'a str,
    #[serde(rename = "Readcount")]
    pub readcount: u32,
    #[serde(rename = "A.Mutations")]
    pub a: f64,
    #[serde(rename = "T.Mutations")]
    pub t: f64,
    #[serde(rename = "G.Mutations")]
    pub g: f64,
    #[serde(rename = "C.Mutations")]
    pub c: f64,
    #[serde(rename = "Transitions")]
    pub transitions: f64,
    #[serde(rename = "Transversions")]
    pub transversions: f64,
    #[serde(rename = "Total.SNVs")]
    pub total_snvs: f64,
    #[serde(rename = "Insertions")]
    pub insertions: f64,
    #[serde(rename = "Deletions")]
    pub deletions: f64,
    #[serde(rename = "Small.Indels", skip_serializing_if = "Option::is_none")]
    pub small_indels: Option<f64>,
    #[serde(rename = "Mid.Indels", skip_serializing_if = "Option::is_none")]
    pub mid_indels: Option<f64>,
    #[serde(rename = "Large.Indels", skip_serializing_if = "Option::is_none")]
    pub large_indels: Option<f64>,
    #[serde(rename = "Common.Indels")]
    pub common_indels: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(line: &str) -> csv::StringRecord {
        csv::StringRecord::from(line.split('\t').collect::<Vec<_>>())
    }

    #[test]
    fn transition_split_follows_purine_pyrimidine_pairing() {
        let rates = BaseRates {
            a: 1.0,
            t: 2.0,
            g: 4.0,
            c: 8.0,
        };
        assert_eq!(rates.transition_split("G"), Some((1.0, 10.0)));
        assert_eq!(rates.transition_split("C"), Some((2.0, 5.0)));
        assert_eq!(rates.transition_split("T"), Some((8.0, 5.0)));
        assert_eq!(rates.transition_split("A"), Some((4.0, 10.0)));
        assert_eq!(rates.transition_split("a"), Some((4.0, 10.0)));
        assert_eq!(rates.transition_split("N"), None);
        assert_eq!(rates.transition_split(""), None);
        assert_eq!(rates.transition_split("AC"), None);
    }

    #[test]
    fn parses_extended_profile_line() {
        let line = "chr1\t100\tG\t10\t40.0\t0.0\t0.0\t0.0\t40.0\t0.0\t40.0\t10.0\t0.0\t0.0\t10.0\t0.0\t+2AG:10.0,";
        let record = PositionRecord::from_profile_fields(&fields(line), 2).unwrap();
        assert_eq!(record.chromosome.as_str(), "chr1");
        assert_eq!(record.coordinate, 100);
        assert_eq!(record.readcount, 10);
        assert_eq!(record.base_rates.a, 40.0);
        assert_eq!(record.transition_rate, 40.0);
        assert_eq!(
            record.size_classes,
            Some(SizeClassRates {
                small: 0.0,
                mid: 10.0,
                large: 0.0
            })
        );
        assert_eq!(record.indel_rates.get("+2AG"), Some(10.0));
    }

    #[test]
    fn parses_legacy_profile_line_without_indels() {
        let line = "chr2\t7\tA\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0\t";
        let record = PositionRecord::from_profile_fields(&fields(line), 5).unwrap();
        assert_eq!(record.size_classes, None);
        assert!(record.indel_rates.is_empty());
        assert_eq!(record.reference_base.as_str(), "A");
    }

    #[test]
    fn rejects_malformed_profile_lines() {
        let short = PositionRecord::from_profile_fields(&fields("chr1\t1\tA"), 9).unwrap_err();
        assert!(short.to_string().contains("line 9"));

        let line = "chr1\t100\tG\t10\tx\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0\t0\t";
        let bad = PositionRecord::from_profile_fields(&fields(line), 3).unwrap_err();
        assert!(bad.to_string().contains("A.Mutations"));
    }

    #[test]
    fn legacy_header_drops_size_columns() {
        let header = profile_header(false);
        assert_eq!(header.len(), LEGACY_PROFILE_WIDTH);
        assert_eq!(header[12], "Deletions");
        assert_eq!(header[13], "Common.Indels");
        assert_eq!(profile_header(true).len(), 17);
    }

    #[test]
    fn scalar_delta_takes_shallower_readcount() {
        let mut control = PositionRecord::empty("chr1", 5, "C", 30);
        control.base_rates.t = 10.0;
        control.size_classes = Some(SizeClassRates::default());
        let mut treatment = PositionRecord::empty("chr1", 5, "C", 12);
        treatment.base_rates.t = 25.0;
        let delta = PositionRecord::scalar_delta(&control, &treatment);
        assert_eq!(delta.readcount, 12);
        assert_eq!(delta.base_rates.t, 15.0);
        assert_eq!(delta.size_classes, None);
    }
}
