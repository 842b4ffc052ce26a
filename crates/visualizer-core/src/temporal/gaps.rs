//! Regular date axes and gap filling.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Spacing of a regular date axis.
///
/// Ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Daily,
    /// A fixed number of days other than one.
    Days(u32),
    /// Days 1, 11 and 21 of every month.
    Dekadal,
    Monthly,
    Annual,
}

impl Step {
    /// Infer the step from the most common spacing between consecutive dates.
    ///
    /// Returns `Daily` if there are fewer than 2 dates or the spacing is not positive.
    pub fn detect(dates: &[NaiveDate]) -> Self {
        if dates.len() < 2 {
            return Step::Daily;
        }
        let mut diffs: Vec<i64> = dates
            .windows(2)
            .map(|w| (w[1] - w[0]).num_days())
            .collect();
        diffs.sort_unstable();

        // mode of the sorted differences
        let mut best = (diffs[0], 0usize);
        let mut run = (diffs[0], 0usize);
        for &d in &diffs {
            if d == run.0 {
                run.1 += 1;
            } else {
                run = (d, 1);
            }
            if run.1 > best.1 {
                best = run;
            }
        }

        if dates.iter().all(|d| matches!(d.day(), 1 | 11 | 21)) && (8..=11).contains(&best.0) {
            return Step::Dekadal;
        }
        match best.0 {
            d if d <= 1 => Step::Daily,
            28..=31 => Step::Monthly,
            365 | 366 => Step::Annual,
            d => Step::Days(d as u32),
        }
    }

    /// The `i`-th date of the axis starting at `start`.
    pub fn nth(self, start: NaiveDate, i: u32) -> Option<NaiveDate> {
        match self {
            Step::Daily => start.checked_add_days(Days::new(u64::from(i))),
            Step::Days(n) => start.checked_add_days(Days::new(u64::from(n) * u64::from(i))),
            Step::Dekadal => {
                let k = (start.day0() / 10).min(2) + i;
                let month = start.with_day(1)?.checked_add_months(Months::new(k / 3))?;
                month.with_day(1 + 10 * (k % 3))
            }
            Step::Monthly => start.checked_add_months(Months::new(i)),
            Step::Annual => start.checked_add_months(Months::new(12 * i)),
        }
    }

    /// Regular axis from the first to the last date of `dates`, merged with
    /// `dates` themselves so no input date is lost.
    pub fn axis(self, dates: &[NaiveDate]) -> Vec<NaiveDate> {
        let (Some(&first), Some(&last)) = (dates.first(), dates.last()) else {
            return Vec::new();
        };
        let mut axis = Vec::new();
        let mut i = 0;
        while let Some(d) = self.nth(first, i) {
            if d > last {
                break;
            }
            if d >= first {
                axis.push(d);
            }
            i += 1;
        }
        let regular = axis.len();
        axis.extend_from_slice(dates);
        axis.sort_unstable();
        axis.dedup();
        if axis.len() > regular {
            debug!(
                off_step = axis.len() - regular,
                step = ?self,
                "dates off the regular step kept on the axis"
            );
        }
        axis
    }
}

/// Values of `dates`/`values` placed on `axis`; axis dates absent from the input become `NaN`.
pub fn reindex(dates: &[NaiveDate], values: &[f64], axis: &[NaiveDate]) -> Vec<f64> {
    axis.iter()
        .map(|d| match dates.binary_search(d) {
            Ok(i) => values[i],
            Err(_) => f64::NAN,
        })
        .collect()
}
