//! Resampling to a coarser calendar frequency.
//!
//! Records are grouped by the calendar period containing their date. Each
//! bucket becomes one record labelled with the period's last day at midnight:
//!
//! | field  | aggregate                 |
//! |--------|---------------------------|
//! | open   | earliest defined open     |
//! | high   | max defined high          |
//! | low    | min defined low           |
//! | close  | latest defined close      |
//! | volume | sum of defined volumes    |
//!
//! Earliest and latest are by timestamp, so input order does not matter.
//! Buckets with an undefined aggregate are dropped, as are records whose
//! period ends past the last representable date. Symbol and indicator fields
//! are not carried forward.

pub mod frequency;

pub use frequency::Frequency;

use crate::domain::OhlcvRecord;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Running aggregate for one bucket.
#[derive(Debug, Default)]
struct Bucket {
    open: Option<(NaiveDateTime, f64)>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<(NaiveDateTime, f64)>,
    volume: f64,
}

impl Bucket {
    fn add(&mut self, r: &OhlcvRecord) {
        // Ties keep the first-seen open and the last-seen close.
        if !r.open.is_nan() && self.open.map_or(true, |(ts, _)| r.timestamp < ts) {
            self.open = Some((r.timestamp, r.open));
        }
        if !r.high.is_nan() {
            self.high = Some(self.high.map_or(r.high, |h| h.max(r.high)));
        }
        if !r.low.is_nan() {
            self.low = Some(self.low.map_or(r.low, |l| l.min(r.low)));
        }
        if !r.close.is_nan() && self.close.map_or(true, |(ts, _)| r.timestamp >= ts) {
            self.close = Some((r.timestamp, r.close));
        }
        if !r.volume.is_nan() {
            self.volume += r.volume;
        }
    }

    fn finish(self, label: NaiveDate) -> Option<OhlcvRecord> {
        Some(OhlcvRecord {
            timestamp: label.and_hms_opt(0, 0, 0)?,
            symbol: None,
            open: self.open?.1,
            high: self.high?,
            low: self.low?,
            close: self.close?.1,
            volume: self.volume,
        })
    }
}

/// Resample `records` to `frequency`.
///
/// Accepts plain or enriched records; the output is always plain OHLCV in
/// ascending bucket order. Input need not be sorted.
pub fn resample<R: AsRef<OhlcvRecord>>(records: &[R], frequency: Frequency) -> Vec<OhlcvRecord> {
    tracing::info!(frequency = %frequency, rows = records.len(), "resampling");

    let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
    for record in records {
        let r = record.as_ref();
        match frequency.period_end(r.timestamp.date()) {
            Some(label) => buckets.entry(label).or_default().add(r),
            None => tracing::warn!(
                timestamp = %r.timestamp,
                "period end out of range, record skipped"
            ),
        }
    }

    let bucket_count = buckets.len();
    let resampled: Vec<OhlcvRecord> = buckets
        .into_iter()
        .filter_map(|(label, bucket)| bucket.finish(label))
        .collect();

    let dropped = bucket_count - resampled.len();
    if dropped > 0 {
        tracing::debug!(dropped, "dropped incomplete buckets");
    }
    tracing::info!(rows = resampled.len(), "resampled");
    resampled
}
