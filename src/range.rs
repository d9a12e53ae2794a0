//! Observed data ranges per styling channel.
//!
//! A [`RangeTracker`] keeps one cached [`RangeState`] per [`StyleChannel`],
//! keyed by the dataset, the governing variable and the flow mode. The cache
//! is the only state the feature builder keeps between passes.

use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::DatasetId;
use crate::error::{EncodeError, OptionExt, Result};
use crate::flow::FlowMode;
use crate::record::Record;
use crate::style::Variable;

/// A styling channel with its own range and output mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleChannel {
    Color,
    Width,
    PointSize,
}

impl StyleChannel {
    fn index(self) -> usize {
        match self {
            StyleChannel::Color => 0,
            StyleChannel::Width => 1,
            StyleChannel::PointSize => 2,
        }
    }
}

/// Observed `[min, max]` of a variable. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeState {
    pub min: f64,
    pub max: f64,
}

impl RangeState {
    /// Create a range, rejecting inverted or non-finite bounds.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(EncodeError::InvalidArgument(format!(
                "range bounds must be finite with min <= max, got [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }

    /// A single distinct value was observed.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Range of the finite values produced by `values`.
///
/// Fails with [`EncodeError::EmptyRange`] if nothing usable remains.
pub fn range_from_values<I>(variable: &str, values: I) -> Result<RangeState>
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    (min <= max)
        .then_some(RangeState { min, max })
        .ok_or_empty_range(variable)
}

/// Scan `records` for the numeric values of `variable`.
///
/// Missing and non-numeric cells are ignored.
///
/// # Example
/// ```
/// use geoencode::{compute_range, Record};
///
/// let records = vec![
///     Record::new().with("speed", 4.0),
///     Record::new().with("speed", "n/a"),
///     Record::new().with("speed", 9.0),
/// ];
/// let range = compute_range(&records, "speed").unwrap();
/// assert_eq!((range.min, range.max), (4.0, 9.0));
/// ```
pub fn compute_range(records: &[Record], variable: &str) -> Result<RangeState> {
    compute_range_by(records, variable, |r| r.number(variable))
}

/// Range of `value` over `items`, skipping items that yield `None`.
///
/// With the `parallel` feature the scan runs on rayon.
pub fn compute_range_by<T, F>(items: &[T], variable: &str, value: F) -> Result<RangeState>
where
    T: Sync,
    F: Fn(&T) -> Option<f64> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        let (min, max) = items
            .par_iter()
            .filter_map(&value)
            .filter(|v| v.is_finite())
            .fold(
                || (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), v| (lo.min(v), hi.max(v)),
            )
            .reduce(
                || (f64::INFINITY, f64::NEG_INFINITY),
                |a, b| (a.0.min(b.0), a.1.max(b.1)),
            );
        (min <= max)
            .then_some(RangeState { min, max })
            .ok_or_empty_range(variable)
    }

    #[cfg(not(feature = "parallel"))]
    {
        range_from_values(variable, items.iter().filter_map(value))
    }
}

/// What a cached range was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeKey {
    pub dataset: DatasetId,
    pub variable: Variable,
    /// Flow aggregation changes edge values, so it is part of the key.
    pub flow: Option<FlowMode>,
}

#[derive(Debug, Clone)]
struct TrackedRange {
    key: RangeKey,
    range: RangeState,
}

/// Per-channel range cache.
#[derive(Debug, Clone, Default)]
pub struct RangeTracker {
    slots: [Option<TrackedRange>; 3],
}

impl RangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current range of a channel, if one has been computed.
    pub fn get(&self, channel: StyleChannel) -> Option<RangeState> {
        self.slots[channel.index()].as_ref().map(|t| t.range)
    }

    /// Key the current range of a channel was computed for.
    pub fn key(&self, channel: StyleChannel) -> Option<&RangeKey> {
        self.slots[channel.index()].as_ref().map(|t| &t.key)
    }

    /// Return the cached range for `key`, recomputing when the key changed.
    ///
    /// A failed computation clears the slot so the next pass retries.
    pub fn resolve<F>(&mut self, channel: StyleChannel, key: RangeKey, compute: F) -> Result<RangeState>
    where
        F: FnOnce() -> Result<RangeState>,
    {
        let slot = &mut self.slots[channel.index()];
        if let Some(tracked) = slot {
            if tracked.key == key {
                return Ok(tracked.range);
            }
        }

        match compute() {
            Ok(range) => {
                debug!(
                    "[Range] {:?} <- {} = [{}, {}]",
                    channel, key.variable, range.min, range.max
                );
                *slot = Some(TrackedRange { key, range });
                Ok(range)
            }
            Err(err) => {
                *slot = None;
                Err(err)
            }
        }
    }

    /// Forget the range of one channel.
    pub fn invalidate(&mut self, channel: StyleChannel) {
        self.slots[channel.index()] = None;
    }

    /// Forget every channel's range.
    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}
