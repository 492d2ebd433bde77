use std::{io::BufRead, sync::Arc};

use crate::error::FormatError;

const HEADER_TAG: &str = "variableStep";
const CONTIG_KEY: &str = "chrom=";

/// One base of a variableStep track. Positions are 1-based.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Sample {
    pub pos: u32,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WigEvent {
    Contig(Arc<str>),
    Sample(Sample),
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum RdrState {
    Start,
    InContig,
}

/// Streaming parser for `meryl-lookup -wig-count` output
pub struct WigReader<R: BufRead> {
    r: R,
    buf: String,
    line: usize,
    state: RdrState,
    last_pos: u32,
}

impl<R: BufRead> WigReader<R> {
    pub fn new(r: R) -> Self {
        Self {
            r,
            buf: String::new(),
            line: 0,
            state: RdrState::Start,
            last_pos: 0,
        }
    }

    /// Number of lines consumed so far
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn next_event(&mut self) -> Result<Option<WigEvent>, FormatError> {
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
            let l = self.buf.trim();
            if l.is_empty() {
                continue;
            }
            if l.split_ascii_whitespace().next() == Some(HEADER_TAG) {
                let ctg: Arc<str> = Arc::from(parse_header(l, self.line)?);
                info!("contig {ctg}");
                self.state = RdrState::InContig;
                self.last_pos = 0;
                return Ok(Some(WigEvent::Contig(ctg)));
            }
            if self.state == RdrState::Start {
                return Err(FormatError::MissingHeader(self.line));
            }
            let s = parse_sample(l, self.line)?;
            if s.pos <= self.last_pos {
                return Err(FormatError::UnorderedPosition {
                    line: self.line,
                    pos: s.pos,
                    prev: self.last_pos,
                });
            }
            self.last_pos = s.pos;
            return Ok(Some(WigEvent::Sample(s)));
        }
    }
}

impl<R: BufRead> Iterator for WigReader<R> {
    type Item = Result<WigEvent, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event().transpose()
    }
}

fn parse_header(l: &str, line: usize) -> Result<&str, FormatError> {
    l.split_ascii_whitespace()
        .skip(1)
        .find_map(|f| f.strip_prefix(CONTIG_KEY))
        .filter(|s| !s.is_empty())
        .ok_or(FormatError::MissingContigName(line))
}

fn parse_sample(l: &str, line: usize) -> Result<Sample, FormatError> {
    let bad = || FormatError::BadDataLine {
        line,
        text: l.to_owned(),
    };
    let mut itr = l.split_ascii_whitespace();
    let pos = itr
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(bad)?;
    let score = itr
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(bad)?;
    if itr.next().is_some() {
        return Err(bad());
    }
    if pos == 0 {
        return Err(FormatError::ZeroPosition(line));
    }
    Ok(Sample { pos, score })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::BufReader;

    fn events(s: &str) -> Result<Vec<WigEvent>, FormatError> {
        WigReader::new(BufReader::new(s.as_bytes())).collect()
    }

    fn sample(pos: u32, score: u64) -> WigEvent {
        WigEvent::Sample(Sample { pos, score })
    }

    #[test]
    fn two_contigs() {
        let s = "variableStep chrom=ctgA\n1\t0\n2\t7\nvariableStep chrom=ctgB span=1\n\n1\t3\n";
        let ev = events(s).unwrap();
        assert_eq!(
            ev,
            vec![
                WigEvent::Contig(Arc::from("ctgA")),
                sample(1, 0),
                sample(2, 7),
                WigEvent::Contig(Arc::from("ctgB")),
                sample(1, 3),
            ]
        );
    }

    #[test]
    fn empty_contig() {
        let ev = events("variableStep chrom=a\nvariableStep chrom=b\n5\t1\n").unwrap();
        assert_eq!(ev.len(), 3);
        assert_eq!(ev[1], WigEvent::Contig(Arc::from("b")));
    }

    #[test]
    fn missing_header() {
        let e = events("\n1\t0\n").unwrap_err();
        assert!(matches!(e, FormatError::MissingHeader(2)));
        let e = events("fixedStep chrom=a start=1 step=1\n").unwrap_err();
        assert!(matches!(e, FormatError::MissingHeader(1)));
    }

    #[test]
    fn missing_contig_name() {
        let e = events("variableStep span=1\n").unwrap_err();
        assert!(matches!(e, FormatError::MissingContigName(1)));
        let e = events("variableStep chrom=\n").unwrap_err();
        assert!(matches!(e, FormatError::MissingContigName(1)));
    }

    #[test]
    fn bad_data_lines() {
        for s in ["1", "1\tx", "a\t1", "1\t-2", "1\t2\t3"] {
            let inp = format!("variableStep chrom=a\n{s}\n");
            let e = events(&inp).unwrap_err();
            assert!(
                matches!(e, FormatError::BadDataLine { line: 2, .. }),
                "{s}"
            );
        }
    }

    #[test]
    fn position_checks() {
        let e = events("variableStep chrom=a\n0\t1\n").unwrap_err();
        assert!(matches!(e, FormatError::ZeroPosition(2)));
        let e = events("variableStep chrom=a\n2\t1\n2\t1\n").unwrap_err();
        assert!(matches!(
            e,
            FormatError::UnorderedPosition {
                line: 3,
                pos: 2,
                prev: 2
            }
        ));
        // Ordering restarts with each contig
        assert!(events("variableStep chrom=a\n2\t1\nvariableStep chrom=b\n1\t1\n").is_ok());
    }

    #[test]
    fn small_buffer() {
        let s = "variableStep chrom=ctgA\n1\t0\n2\t0\n3\t2\n";
        let b = BufReader::with_capacity(4, s.as_bytes());
        let mut rdr = WigReader::new(b);
        let mut n = 0;
        while let Some(_) = rdr.next_event().unwrap() {
            n += 1
        }
        assert_eq!(n, 4);
        assert_eq!(rdr.line(), 4);
    }
}
