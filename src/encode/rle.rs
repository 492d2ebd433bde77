use std::sync::Arc;

use super::{Encoder, Interval, IntervalSink};
use crate::{reader::Sample, score::ScoreClass};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum RunState {
    Empty,
    InProgress {
        start: u32,
        end: u32,
        class: ScoreClass,
    },
}

/// Merges consecutive positions with the same score class into one interval
pub struct RleEncoder {
    contig: Arc<str>,
    state: RunState,
}

impl Default for RleEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RleEncoder {
    pub fn new() -> Self {
        Self {
            contig: Arc::from(""),
            state: RunState::Empty,
        }
    }

    fn flush(&mut self, sink: &mut dyn IntervalSink) -> anyhow::Result<()> {
        if let RunState::InProgress { start, end, class } = self.state {
            let iv = Interval::new(self.contig.clone(), start, end, class);
            trace!("run {iv}");
            sink.add_interval(&iv)?;
        }
        self.state = RunState::Empty;
        Ok(())
    }
}

impl Encoder for RleEncoder {
    fn start_contig(&mut self, contig: Arc<str>) {
        debug_assert!(self.state == RunState::Empty);
        self.contig = contig;
        self.state = RunState::Empty;
    }

    fn add_sample(&mut self, s: &Sample, sink: &mut dyn IntervalSink) -> anyhow::Result<()> {
        let c = ScoreClass::clamped(s.score);
        if let RunState::InProgress { end, class, .. } = &mut self.state {
            if *class == c {
                *end += 1;
                return Ok(());
            }
        }
        self.flush(sink)?;
        self.state = RunState::InProgress {
            start: s.pos - 1,
            end: s.pos,
            class: c,
        };
        Ok(())
    }

    fn finish_contig(&mut self, sink: &mut dyn IntervalSink) -> anyhow::Result<()> {
        self.flush(sink)
    }
}
