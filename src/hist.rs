use crate::{
    encode::{Interval, IntervalSink},
    error::HistogramError,
    score::{ScoreClass, N_CLASSES},
};

/// Number of bases in each score class for one contig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigHist {
    contig: String,
    counts: [u64; N_CLASSES],
}

impl ContigHist {
    fn new(contig: &str) -> Self {
        Self {
            contig: contig.to_owned(),
            counts: [0; N_CLASSES],
        }
    }

    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn counts(&self) -> &[u64; N_CLASSES] {
        &self.counts
    }

    pub fn length(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Counts as a proportion of contig length
    pub fn relative(&self) -> Result<[f64; N_CLASSES], HistogramError> {
        let l = self.length();
        if l == 0 {
            return Err(HistogramError::EmptyContig(self.contig.clone()));
        }
        let l = l as f64;
        Ok(self.counts.map(|x| x as f64 / l))
    }
}

/// Per contig histograms, sorted by contig name
#[derive(Debug, Default)]
pub struct Histograms(Vec<ContigHist>);

impl Histograms {
    pub fn contigs(&self) -> &[ContigHist] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds per contig histograms from intervals arriving grouped by contig.
///
/// A new histogram row is started every time the contig changes, so a contig
/// split over non adjacent blocks of input gives one row per block.
#[derive(Default)]
pub struct HistAggregator {
    current: Option<ContigHist>,
    done: Vec<ContigHist>,
}

impl HistAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, contig: &str, len: u32, class: ScoreClass) {
        let h = match self.current.take() {
            Some(h) if h.contig == contig => h,
            prev => {
                if let Some(p) = prev {
                    self.done.push(p)
                }
                info!("found contig {contig}");
                ContigHist::new(contig)
            }
        };
        let h = self.current.insert(h);
        h.counts[class.index()] += len as u64;
    }

    pub fn finish(mut self) -> Histograms {
        if let Some(h) = self.current.take() {
            self.done.push(h)
        }
        // Stable sort keeps repeated blocks of a contig in input order
        self.done.sort_by(|a, b| a.contig.cmp(&b.contig));
        Histograms(self.done)
    }
}

impl IntervalSink for HistAggregator {
    fn add_interval(&mut self, iv: &Interval) -> anyhow::Result<()> {
        self.add(&iv.contig, iv.len(), iv.class);
        Ok(())
    }
}
