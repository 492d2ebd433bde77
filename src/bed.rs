use std::io::{BufRead, Write};

use anyhow::Context;

use crate::{
    encode::{Interval, IntervalSink},
    error::FormatError,
    score::ScoreClass,
};

/// Writes intervals as BED9 lines
pub struct BedWriter<W: Write> {
    w: W,
    n_intervals: u64,
}

impl<W: Write> BedWriter<W> {
    pub fn new(w: W) -> Self {
        Self { w, n_intervals: 0 }
    }

    pub fn n_intervals(&self) -> u64 {
        self.n_intervals
    }

    pub fn finish(mut self) -> anyhow::Result<W> {
        self.w
            .flush()
            .with_context(|| "Error flushing data to bed file")?;
        Ok(self.w)
    }
}

impl<W: Write> IntervalSink for BedWriter<W> {
    fn add_interval(&mut self, iv: &Interval) -> anyhow::Result<()> {
        writeln!(self.w, "{iv}").with_context(|| "Error writing to bed file")?;
        self.n_intervals += 1;
        Ok(())
    }
}

/// The fields of a bed line needed to build a histogram
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BedRecord<'a> {
    pub contig: &'a str,
    pub start: u32,
    pub end: u32,
    pub class: ScoreClass,
}

impl BedRecord<'_> {
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }
}

pub struct BedReader<R: BufRead> {
    r: R,
    buf: String,
    line: usize,
}

impl<R: BufRead> BedReader<R> {
    pub fn new(r: R) -> Self {
        Self {
            r,
            buf: String::new(),
            line: 0,
        }
    }

    /// Returns the next non-blank line. The record borrows the internal line buffer.
    pub fn next_record(&mut self) -> Result<Option<BedRecord<'_>>, FormatError> {
        loop {
            self.buf.clear();
            let n = self
                .r
                .read_line(&mut self.buf)
                .map_err(|source| FormatError::Io {
                    line: self.line + 1,
                    source,
                })?;
            if n == 0 {
                return Ok(None);
            }
            self.line += 1;
            if !self.buf.trim().is_empty() {
                break;
            }
        }
        parse_bed_line(self.buf.trim(), self.line).map(Some)
    }
}

fn parse_bed_line(l: &str, line: usize) -> Result<BedRecord<'_>, FormatError> {
    let bad = |reason: &str| FormatError::BadBedLine {
        line,
        reason: reason.to_owned(),
    };
    let mut itr = l.split_ascii_whitespace();
    let contig = itr.next().ok_or_else(|| bad("missing contig"))?;
    let start = itr
        .next()
        .ok_or_else(|| bad("missing start"))?
        .parse::<u32>()
        .map_err(|_| bad("bad start value"))?;
    let end = itr
        .next()
        .ok_or_else(|| bad("missing end"))?
        .parse::<u32>()
        .map_err(|_| bad("bad end value"))?;
    let _name = itr.next().ok_or_else(|| bad("missing name"))?;
    let class = itr
        .next()
        .ok_or_else(|| bad("missing score"))?
        .parse::<u64>()
        .map(ScoreClass::clamped)
        .map_err(|_| bad("bad score value"))?;
    if end <= start {
        return Err(bad("end should be larger than start"));
    }
    Ok(BedRecord {
        contig,
        start,
        end,
        class,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{io::BufReader, sync::Arc};

    #[test]
    fn write_lines() {
        let mut w = BedWriter::new(Vec::new());
        let ctg: Arc<str> = Arc::from("ctgA");
        w.add_interval(&Interval::new(ctg.clone(), 0, 2, ScoreClass::clamped(0)))
            .unwrap();
        w.add_interval(&Interval::new(ctg, 2, 5, ScoreClass::clamped(2)))
            .unwrap();
        assert_eq!(w.n_intervals(), 2);
        let out = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "ctgA\t0\t2\t.\t0\t.\t0\t0\t0,0,0\nctgA\t2\t5\t.\t2\t.\t2\t2\t55,126,184\n"
        );
    }

    #[test]
    fn read_records() {
        let s = "ctgA\t0\t2\t.\t0\t.\t0\t0\t0,0,0\n\nctgA 2 5 . 7\n";
        let mut rdr = BedReader::new(BufReader::new(s.as_bytes()));
        let r = rdr.next_record().unwrap().unwrap();
        assert_eq!((r.contig, r.start, r.end, r.class.index()), ("ctgA", 0, 2, 0));
        let r = rdr.next_record().unwrap().unwrap();
        assert_eq!((r.len(), r.class), (3, ScoreClass::MAX));
        assert!(rdr.next_record().unwrap().is_none());
    }

    #[test]
    fn bad_records() {
        for s in ["ctgA\t0\t2\t.", "ctgA\tx\t2\t.\t0", "ctgA\t5\t5\t.\t0", "ctgA\t0\t2\t.\t-1"] {
            let mut rdr = BedReader::new(BufReader::new(s.as_bytes()));
            let e = rdr.next_record().unwrap_err();
            assert!(matches!(e, FormatError::BadBedLine { line: 1, .. }), "{s}");
        }
    }
}
