use std::{io::Write, path::Path};

use anyhow::Context;
use compress_io::compress::CompressIo;
use serde::Serialize;

use crate::{
    cli::HistConfig,
    hist::{ContigHist, Histograms},
    score::N_CLASSES,
};

#[derive(Serialize)]
#[serde(untagged)]
enum JsCounts<'a> {
    Raw(&'a [u64; N_CLASSES]),
    Relative([f64; N_CLASSES]),
}

#[derive(Serialize)]
struct JsContig<'a> {
    contig: &'a str,
    length: u64,
    counts: JsCounts<'a>,
}

impl<'a> JsContig<'a> {
    fn make(h: &'a ContigHist, relative: bool) -> anyhow::Result<Self> {
        let counts = if relative {
            JsCounts::Relative(h.relative()?)
        } else {
            JsCounts::Raw(h.counts())
        };
        Ok(Self {
            contig: h.contig(),
            length: h.length(),
            counts,
        })
    }
}

#[derive(Serialize)]
struct JsOutput<'a> {
    program: &'static str,
    version: &'static str,
    date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a Path>,
    relative: bool,
    contigs: Vec<JsContig<'a>>,
}

impl<'a> JsOutput<'a> {
    fn make(cfg: &'a HistConfig, res: &'a Histograms) -> anyhow::Result<Self> {
        let contigs = res
            .contigs()
            .iter()
            .map(|h| JsContig::make(h, cfg.relative()))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self {
            program: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            date: cfg.date().to_rfc2822(),
            input: cfg.input(),
            relative: cfg.relative(),
            contigs,
        })
    }
}

fn output_json<P: AsRef<Path>>(name: P, cfg: &HistConfig, res: &Histograms) -> anyhow::Result<()> {
    debug!("Writing JSON output");
    let out = JsOutput::make(cfg, res)?;

    let mut wrt = CompressIo::new()
        .path(name)
        .bufwriter()
        .with_context(|| "Could not open output JSON file")?;

    serde_json::to_writer_pretty(&mut wrt, &out)
        .with_context(|| "Error writing out JSON file with results")?;
    wrt.flush()
        .with_context(|| "Error flushing data to JSON file")
}

/// Writes one line per contig: contig, length, counts (or proportions) for classes 0-5
pub fn write_csv<W: Write>(wrt: &mut W, res: &Histograms, relative: bool) -> anyhow::Result<()> {
    let mut w = csv::Writer::from_writer(wrt);

    let header: Vec<String> = ["contig".to_owned(), "tigLen".to_owned()]
        .into_iter()
        .chain((0..N_CLASSES).map(|i| i.to_string()))
        .collect();
    w.write_record(&header)?;

    let mut row = Vec::with_capacity(N_CLASSES + 2);
    for h in res.contigs() {
        row.clear();
        row.push(h.contig().to_owned());
        row.push(h.length().to_string());
        if relative {
            row.extend(h.relative()?.iter().map(|x| format!("{x:?}")));
        } else {
            row.extend(h.counts().iter().map(|x| x.to_string()));
        }
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

pub fn output_csv<P: AsRef<Path>>(name: P, res: &Histograms, relative: bool) -> anyhow::Result<()> {
    debug!("Writing CSV output");
    let mut wrt = CompressIo::new()
        .path(name)
        .bufwriter()
        .with_context(|| "Could not open output CSV file")?;

    write_csv(&mut wrt, res, relative).with_context(|| "Error writing CSV file")?;
    wrt.flush()
        .with_context(|| "Error flushing data to CSV file")
}

pub fn output(cfg: &HistConfig, res: &Histograms) -> anyhow::Result<()> {
    output_csv(cfg.output(), res, cfg.relative())?;

    if let Some(name) = cfg.json() {
        output_json(name, cfg, res)?
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{hist::HistAggregator, score::ScoreClass};

    fn hists() -> Histograms {
        let mut agg = HistAggregator::new();
        agg.add("ctgB", 4, ScoreClass::clamped(1));
        agg.add("ctgA", 2, ScoreClass::clamped(0));
        agg.add("ctgA", 3, ScoreClass::clamped(2));
        agg.finish()
    }

    #[test]
    fn raw_csv() {
        let mut v = Vec::new();
        write_csv(&mut v, &hists(), false).unwrap();
        assert_eq!(
            String::from_utf8(v).unwrap(),
            "contig,tigLen,0,1,2,3,4,5\nctgA,5,2,0,3,0,0,0\nctgB,4,0,4,0,0,0,0\n"
        );
    }

    #[test]
    fn relative_csv() {
        let mut v = Vec::new();
        write_csv(&mut v, &hists(), true).unwrap();
        let s = String::from_utf8(v).unwrap();
        let lines: Vec<_> = s.lines().collect();
        assert_eq!(lines[1], "ctgA,5,0.4,0.0,0.6,0.0,0.0,0.0");
        assert_eq!(lines[2], "ctgB,4,0.0,1.0,0.0,0.0,0.0,0.0");
    }

    #[test]
    fn contig_name_with_comma() {
        let mut agg = HistAggregator::new();
        agg.add("scaf,1", 4, ScoreClass::clamped(1));
        agg.add("tig\"2", 1, ScoreClass::clamped(0));
        let mut v = Vec::new();
        write_csv(&mut v, &agg.finish(), false).unwrap();

        let mut rdr = csv::Reader::from_reader(&v[..]);
        assert_eq!(rdr.headers().unwrap().len(), 8);
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == 8));
        assert_eq!(&rows[0][0], "scaf,1");
        assert_eq!(&rows[0][3], "4");
        assert_eq!(&rows[1][0], "tig\"2");
    }

    #[test]
    fn json_counts() {
        let h = hists();
        let c = JsContig::make(&h.contigs()[0], false).unwrap();
        let js = serde_json::to_value(&c).unwrap();
        assert_eq!(js["contig"], "ctgA");
        assert_eq!(js["length"], 5);
        assert_eq!(js["counts"], serde_json::json!([2, 0, 3, 0, 0, 0]));
    }
}
