use std::io::BufRead;

use anyhow::Context;
use compress_io::compress::CompressIo;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    bed::{BedReader, BedWriter},
    cli::{BedConfig, EncodeMode, HistConfig},
    encode::{BinnedEncoder, Encoder, IntervalSink, RleEncoder},
    hist::{HistAggregator, Histograms},
    output,
    reader::{WigEvent, WigReader},
};

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct EncodeStats {
    pub contigs: u64,
    pub samples: u64,
}

/// Runs the encoder over the whole wig stream, closing each contig when the
/// next one starts and at end of input.
pub fn encode_stream<R: BufRead, E: Encoder + ?Sized>(
    rdr: &mut WigReader<R>,
    enc: &mut E,
    sink: &mut dyn IntervalSink,
) -> anyhow::Result<EncodeStats> {
    let mut stats = EncodeStats::default();
    let mut in_contig = false;
    while let Some(ev) = rdr
        .next_event()
        .with_context(|| "Error reading wig input")?
    {
        match ev {
            WigEvent::Contig(ctg) => {
                if in_contig {
                    enc.finish_contig(sink)?
                }
                enc.start_contig(ctg);
                in_contig = true;
                stats.contigs += 1;
            }
            WigEvent::Sample(s) => {
                enc.add_sample(&s, sink)?;
                stats.samples += 1;
            }
        }
    }
    if in_contig {
        enc.finish_contig(sink)?
    }
    Ok(stats)
}

fn make_encoder(cfg: &BedConfig) -> Box<dyn Encoder> {
    match cfg.mode() {
        EncodeMode::RunLength => Box::new(RleEncoder::new()),
        EncodeMode::Binned(w) => {
            Box::new(BinnedEncoder::new(w, StdRng::seed_from_u64(cfg.seed())))
        }
    }
}

pub fn wig_to_bed(cfg: &BedConfig) -> anyhow::Result<()> {
    debug!(
        "Opening {} for input",
        cfg.input().and_then(|s| s.to_str()).unwrap_or("<stdin>")
    );
    let brdr = CompressIo::new()
        .opt_path(cfg.input())
        .bufreader()
        .with_context(|| "Could not open input file/stream")?;
    let wrt = CompressIo::new()
        .path(cfg.output())
        .bufwriter()
        .with_context(|| "Could not open output bed file")?;

    let mut rdr = WigReader::new(brdr);
    let mut bed = BedWriter::new(wrt);
    let mut enc = make_encoder(cfg);

    info!("Starting to read input");
    let stats = if let Some(name) = cfg.hist() {
        let mut agg = HistAggregator::new();
        let stats = encode_stream(&mut rdr, enc.as_mut(), &mut (&mut bed, &mut agg))?;
        output::output_csv(name, &agg.finish(), cfg.relative())?;
        stats
    } else {
        encode_stream(&mut rdr, enc.as_mut(), &mut bed)?
    };
    info!(
        "Finished reading input: {} lines, {} contigs, {} positions, {} intervals written",
        rdr.line(),
        stats.contigs,
        stats.samples,
        bed.n_intervals()
    );
    bed.finish()?;
    Ok(())
}

pub fn aggregate_bed<R: BufRead>(r: R) -> anyhow::Result<Histograms> {
    let mut rdr = BedReader::new(r);
    let mut agg = HistAggregator::new();
    while let Some(rec) = rdr
        .next_record()
        .with_context(|| "Error reading bed input")?
    {
        agg.add(rec.contig, rec.len(), rec.class)
    }
    Ok(agg.finish())
}

pub fn bed_to_hist(cfg: &HistConfig) -> anyhow::Result<Histograms> {
    debug!(
        "Opening {} for input",
        cfg.input().and_then(|s| s.to_str()).unwrap_or("<stdin>")
    );
    let brdr = CompressIo::new()
        .opt_path(cfg.input())
        .bufreader()
        .with_context(|| "Could not open input file/stream")?;

    info!("Starting to read input");
    let res = aggregate_bed(brdr)?;
    info!("Finished reading input: {} contigs", res.len());
    if res.is_empty() {
        warn!("No intervals found in input")
    }
    Ok(res)
}
