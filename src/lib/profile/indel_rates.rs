//! Indel-sequence → rate mapping and its key-union merge.

use itertools::{EitherOrBoth, Itertools};
use smartstring::alias::String;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::str::FromStr;

use super::cutoff::IndelCutoff;

/// Walk two key-sorted sequences in lockstep, pairing values that share a key.
///
/// Both inputs must be sorted by key with unique keys (as produced by iterating
/// a `BTreeMap`). Every key of the union is yielded exactly once, in order, as
/// `Both`, `Left` (left-only) or `Right` (right-only).
pub fn merge_union<K, L, R, IL, IR>(
    left: IL,
    right: IR,
) -> impl Iterator<Item = (K, EitherOrBoth<L, R>)>
where
    K: Ord,
    IL: IntoIterator<Item = (K, L)>,
    IR: IntoIterator<Item = (K, R)>,
{
    left.into_iter()
        .merge_join_by(right, |(lk, _), (rk, _)| lk.cmp(rk))
        .map(|pair| match pair {
            EitherOrBoth::Both((key, l), (_, r)) => (key, EitherOrBoth::Both(l, r)),
            EitherOrBoth::Left((key, l)) => (key, EitherOrBoth::Left(l)),
            EitherOrBoth::Right((key, r)) => (key, EitherOrBoth::Right(r)),
        })
}

/// Rates (percent of reads) per indel call, keyed by the uppercase call
/// including marker and length (e.g. `+2AG`, `-1C`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndelRates(BTreeMap<String, f64>);

impl IndelRates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build rates from raw occurrence counts, keeping only entries that pass `cutoff`.
    ///
    /// Empty keys are dropped. A zero `readcount` yields an empty mapping.
    pub fn from_counts<'a, I>(counts: I, readcount: u32, cutoff: IndelCutoff) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut rates = IndelRates::new();
        if readcount == 0 {
            return rates;
        }
        for (sequence, count) in counts {
            if sequence.is_empty() {
                continue;
            }
            let rate = percent(count, readcount);
            if cutoff.passes(rate) {
                rates.insert(sequence, rate);
            }
        }
        rates
    }

    pub fn insert(&mut self, sequence: &str, rate: f64) -> Option<f64> {
        self.0.insert(String::from(sequence), rate)
    }

    pub fn get(&self, sequence: &str) -> Option<f64> {
        self.0.get(sequence).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Signed treatment − control deltas over the union of both key sets.
    ///
    /// A key missing on one side counts as rate `0` there. Deltas are filtered
    /// with `cutoff` as signed values, so a negative delta only survives
    /// [`IndelCutoff::ReportAll`] (or a negative threshold).
    pub fn difference(control: &IndelRates, treatment: &IndelRates, cutoff: IndelCutoff) -> Self {
        let deltas = merge_union(control.0.iter(), treatment.0.iter())
            .map(|(key, rates)| {
                let delta = match rates {
                    EitherOrBoth::Both(c, t) => t - c,
                    EitherOrBoth::Left(c) => 0.0 - c,
                    EitherOrBoth::Right(t) => *t,
                };
                (key.clone(), delta)
            })
            .filter(|(_, delta)| cutoff.passes(*delta))
            .collect();
        IndelRates(deltas)
    }
}

impl<'a> IntoIterator for &'a IndelRates {
    type Item = (&'a String, &'a f64);
    type IntoIter = btree_map::Iter<'a, String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, f64)> for IndelRates {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        IndelRates(iter.into_iter().collect())
    }
}

/// Writes the `Common.Indels` column: `SEQ:rate,` per entry, comma terminated.
impl fmt::Display for IndelRates {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (sequence, rate) in &self.0 {
            write!(f, "{}:{:?},", sequence, rate)?;
        }
        Ok(())
    }
}

impl FromStr for IndelRates {
    type Err = std::string::String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rates = IndelRates::new();
        for item in s.trim().split(',').filter(|item| !item.is_empty()) {
            let (sequence, rate) = item
                .rsplit_once(':')
                .ok_or_else(|| format!("indel entry '{}' is not SEQUENCE:rate", item))?;
            let rate = rate
                .parse::<f64>()
                .map_err(|_| format!("indel entry '{}' has a non-numeric rate", item))?;
            if !sequence.is_empty() {
                rates.insert(sequence, rate);
            }
        }
        Ok(rates)
    }
}

/// `count / total * 100`, the unit of every rate in a profile.
#[inline]
pub fn percent(count: u32, total: u32) -> f64 {
    (count as f64 / total as f64) * 100.0
}
