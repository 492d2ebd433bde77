use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Missing variableStep header at line {0}. Check your input file")]
    MissingHeader(usize),
    #[error("No chrom= field in variableStep header at line {0}")]
    MissingContigName(usize),
    #[error("Bad data line {line}: expecting <position> <score>, found '{text}'")]
    BadDataLine { line: usize, text: String },
    #[error("Position 0 at line {0}: wig positions start from 1")]
    ZeroPosition(usize),
    #[error("Position {pos} at line {line} is not after previous position {prev}")]
    UnorderedPosition { line: usize, pos: u32, prev: u32 },
    #[error("Bad bed line {line}: {reason}")]
    BadBedLine { line: usize, reason: String },
    #[error("Error reading line {line}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum HistogramError {
    #[error("Contig {0} has zero length; cannot compute relative counts")]
    EmptyContig(String),
}
