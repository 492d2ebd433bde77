//! Streaming encoders turning per-base samples into intervals.
//!
//! An encoder sees the samples of one contig at a time, in increasing
//! position order. Intervals are pushed to an [`IntervalSink`] as soon as
//! they are complete, so memory use does not depend on contig length.
//! The caller must call [`Encoder::finish_contig`] at every contig
//! boundary and at the end of the input.
use std::{fmt, sync::Arc};

use crate::{reader::Sample, score::ScoreClass};

pub mod binned;
pub mod rle;

pub use binned::BinnedEncoder;
pub use rle::RleEncoder;

/// Half open, zero based interval with a single score class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub contig: Arc<str>,
    pub start: u32,
    pub end: u32,
    pub class: ScoreClass,
}

impl Interval {
    pub fn new(contig: Arc<str>, start: u32, end: u32, class: ScoreClass) -> Self {
        debug_assert!(start < end);
        Self {
            contig,
            start,
            end,
            class,
        }
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }
}

/// BED9 representation: chrom, start, end, name, score, strand, thickStart, thickEnd, itemRgb
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t.\t{}\t.\t{}\t{}\t{}",
            self.contig,
            self.start,
            self.end,
            self.class,
            self.start,
            self.start,
            self.class.colour()
        )
    }
}

pub trait IntervalSink {
    fn add_interval(&mut self, iv: &Interval) -> anyhow::Result<()>;
}

impl IntervalSink for Vec<Interval> {
    fn add_interval(&mut self, iv: &Interval) -> anyhow::Result<()> {
        self.push(iv.clone());
        Ok(())
    }
}

impl<S: IntervalSink + ?Sized> IntervalSink for &mut S {
    fn add_interval(&mut self, iv: &Interval) -> anyhow::Result<()> {
        (**self).add_interval(iv)
    }
}

/// Send each interval to both sinks
impl<A: IntervalSink, B: IntervalSink> IntervalSink for (A, B) {
    fn add_interval(&mut self, iv: &Interval) -> anyhow::Result<()> {
        self.0.add_interval(iv)?;
        self.1.add_interval(iv)
    }
}

pub trait Encoder {
    /// Reset state for a new contig. Any pending interval must already
    /// have been flushed with `finish_contig`.
    fn start_contig(&mut self, contig: Arc<str>);

    fn add_sample(&mut self, s: &Sample, sink: &mut dyn IntervalSink) -> anyhow::Result<()>;

    /// Flush pending state for the current contig
    fn finish_contig(&mut self, sink: &mut dyn IntervalSink) -> anyhow::Result<()>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bed9_line() {
        let iv = Interval::new(Arc::from("ctgA"), 2, 5, ScoreClass::clamped(2));
        assert_eq!(iv.to_string(), "ctgA\t2\t5\t.\t2\t.\t2\t2\t55,126,184");
        assert_eq!(iv.len(), 3);
    }

    #[test]
    fn tee() {
        let iv = Interval::new(Arc::from("x"), 0, 1, ScoreClass::MAX);
        let mut a = Vec::new();
        let mut b = Vec::new();
        (&mut a, &mut b).add_interval(&iv).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
    }
}
