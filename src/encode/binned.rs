use std::{num::NonZeroU32, sync::Arc};

use rand::{seq::SliceRandom, Rng};

use super::{Encoder, Interval, IntervalSink};
use crate::{
    reader::Sample,
    score::{ScoreClass, N_CLASSES},
};

pub const DEFAULT_BIN_WIDTH: u32 = 100;

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Votes([u32; N_CLASSES]);

impl Votes {
    #[inline]
    fn add(&mut self, c: ScoreClass) {
        self.0[c.index()] += 1
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.0.iter().all(|x| *x == 0)
    }

    fn clear(&mut self) {
        self.0 = [0; N_CLASSES]
    }

    /// Class with the highest count. Ties are broken uniformly at random.
    pub fn majority<R: Rng>(&self, rng: &mut R) -> ScoreClass {
        let max = self.0.iter().copied().max().unwrap_or(0);
        let mut tied = [0usize; N_CLASSES];
        let mut n = 0;
        for (ix, _) in self.0.iter().enumerate().filter(|(_, x)| **x == max) {
            tied[n] = ix;
            n += 1;
        }
        let ix = if n > 1 {
            *tied[..n].choose(rng).unwrap_or(&tied[0])
        } else {
            tied[0]
        };
        ScoreClass::from_index(ix).unwrap_or(ScoreClass::MAX)
    }
}

impl From<[u32; N_CLASSES]> for Votes {
    fn from(v: [u32; N_CLASSES]) -> Self {
        Self(v)
    }
}

/// Splits each contig into fixed width bins starting from 0 and reports the
/// majority class of each bin.
///
/// A sample past the end of the current bin closes that bin and opens the
/// next one, so the bins advance by exactly one width per such sample.
/// Input is expected to have one sample per base: if a gap in the input
/// spans whole bins they are not reported, and the sample after the gap is
/// counted in the bin following the one it closed. The closed bin is always
/// reported, even when no sample fell in it (e.g. a contig whose first
/// position is past the first bin); such a bin gets a class drawn at random
/// from all six. The final bin of a contig ends at the last observed
/// position rather than at the nominal bin boundary, and is only reported
/// if it holds at least one sample.
pub struct BinnedEncoder<R: Rng> {
    width: u32,
    contig: Arc<str>,
    bin_start: u32,
    bin_end: u32,
    last_pos: u32,
    votes: Votes,
    rng: R,
}

impl<R: Rng> BinnedEncoder<R> {
    pub fn new(width: NonZeroU32, rng: R) -> Self {
        let width = width.get();
        Self {
            width,
            contig: Arc::from(""),
            bin_start: 0,
            bin_end: width,
            last_pos: 0,
            votes: Votes::default(),
            rng,
        }
    }

    fn flush(&mut self, end: u32, sink: &mut dyn IntervalSink) -> anyhow::Result<()> {
        // With no votes all six classes tie, so the class is random
        let class = self.votes.majority(&mut self.rng);
        let iv = Interval::new(self.contig.clone(), self.bin_start, end, class);
        trace!("bin {iv} votes {:?}", self.votes.0);
        self.votes.clear();
        sink.add_interval(&iv)
    }
}

impl<R: Rng> Encoder for BinnedEncoder<R> {
    fn start_contig(&mut self, contig: Arc<str>) {
        self.contig = contig;
        self.bin_start = 0;
        self.bin_end = self.width;
        self.last_pos = 0;
        self.votes.clear();
    }

    fn add_sample(&mut self, s: &Sample, sink: &mut dyn IntervalSink) -> anyhow::Result<()> {
        if s.pos > self.bin_end {
            self.flush(self.bin_end, sink)?;
            self.bin_start = self.bin_end;
            self.bin_end = self.bin_start.saturating_add(self.width);
        }
        self.votes.add(ScoreClass::clamped(s.score));
        self.last_pos = s.pos;
        Ok(())
    }

    fn finish_contig(&mut self, sink: &mut dyn IntervalSink) -> anyhow::Result<()> {
        if self.votes.is_empty() {
            Ok(())
        } else {
            self.flush(self.last_pos, sink)
        }
    }
}
