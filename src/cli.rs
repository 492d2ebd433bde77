use std::{
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use clap::ArgMatches;

use crate::encode::binned::DEFAULT_BIN_WIDTH;

mod cli_model;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EncodeMode {
    RunLength,
    Binned(NonZeroU32),
}

pub struct BedConfig {
    input: Option<PathBuf>,
    output: PathBuf,
    mode: EncodeMode,
    seed: u64,
    hist: Option<PathBuf>,
    relative: bool,
}

impl BedConfig {
    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn mode(&self) -> EncodeMode {
        self.mode
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn hist(&self) -> Option<&Path> {
        self.hist.as_deref()
    }

    pub fn relative(&self) -> bool {
        self.relative
    }
}

pub struct HistConfig {
    input: Option<PathBuf>,
    output: PathBuf,
    json: Option<PathBuf>,
    relative: bool,
    date: DateTime<Local>,
}

impl HistConfig {
    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn json(&self) -> Option<&Path> {
        self.json.as_deref()
    }

    pub fn relative(&self) -> bool {
        self.relative
    }

    pub fn date(&self) -> &DateTime<Local> {
        &self.date
    }
}

#[cfg(test)]
impl BedConfig {
    pub fn for_test(input: PathBuf, output: PathBuf, mode: EncodeMode, hist: Option<PathBuf>) -> Self {
        Self {
            input: Some(input),
            output,
            mode,
            seed: 0,
            hist,
            relative: false,
        }
    }
}

#[cfg(test)]
impl HistConfig {
    pub fn for_test(input: PathBuf, output: PathBuf, json: Option<PathBuf>) -> Self {
        Self {
            input: Some(input),
            output,
            json,
            relative: false,
            date: Local::now(),
        }
    }
}

pub enum Config {
    Bed(BedConfig),
    Hist(HistConfig),
}

fn get_path(m: &ArgMatches, id: &str) -> Option<PathBuf> {
    m.get_one::<PathBuf>(id).map(|p| p.to_owned())
}

fn bed_config(m: &ArgMatches) -> anyhow::Result<BedConfig> {
    let output = get_path(m, "output").ok_or_else(|| anyhow!("Missing output file"))?;

    let mode = if m.get_flag("binned") {
        let w = m
            .get_one::<u32>("bin_width")
            .copied()
            .unwrap_or(DEFAULT_BIN_WIDTH);
        EncodeMode::Binned(
            NonZeroU32::new(w).ok_or_else(|| anyhow!("Illegal bin width: must be > 0"))?,
        )
    } else {
        EncodeMode::RunLength
    };

    let seed = m
        .get_one::<u64>("seed")
        .copied()
        .unwrap_or_else(rand::random);
    if let EncodeMode::Binned(w) = mode {
        debug!("Binned mode with bin width {w}, random seed {seed}");
    }

    Ok(BedConfig {
        input: get_path(m, "input"),
        output,
        mode,
        seed,
        hist: get_path(m, "hist"),
        relative: m.get_flag("relative"),
    })
}

fn hist_config(m: &ArgMatches) -> anyhow::Result<HistConfig> {
    let output = get_path(m, "output").ok_or_else(|| anyhow!("Missing output file"))?;

    Ok(HistConfig {
        input: get_path(m, "input"),
        output,
        json: get_path(m, "json"),
        relative: m.get_flag("relative"),
        date: Local::now(),
    })
}

pub fn handle_cli() -> anyhow::Result<Config> {
    let c = cli_model::cli_model();
    let m = c.get_matches();
    let (name, sm) = m
        .subcommand()
        .ok_or_else(|| anyhow!("Missing subcommand"))?;
    super::utils::init_log(sm)?;

    match name {
        "bed" => bed_config(sm).map(Config::Bed),
        "hist" => hist_config(sm).map(Config::Hist),
        _ => Err(anyhow!("Unknown subcommand {name}")),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sub_matches(args: &[&str]) -> ArgMatches {
        let m = cli_model::cli_model().try_get_matches_from(args).unwrap();
        m.subcommand().unwrap().1.clone()
    }

    #[test]
    fn binned_config() {
        let m = sub_matches(&["kmer_track", "bed", "-b", "-w", "250", "-s", "9", "o.bed"]);
        let cfg = bed_config(&m).unwrap();
        assert_eq!(cfg.mode(), EncodeMode::Binned(NonZeroU32::new(250).unwrap()));
        assert_eq!(cfg.seed(), 9);
        assert!(cfg.input().is_none());
        assert_eq!(cfg.output(), Path::new("o.bed"));
    }

    #[test]
    fn run_length_config() {
        let m = sub_matches(&["kmer_track", "bed", "o.bed", "-H", "h.csv", "-r", "x.wig"]);
        let cfg = bed_config(&m).unwrap();
        assert_eq!(cfg.mode(), EncodeMode::RunLength);
        assert_eq!(cfg.hist(), Some(Path::new("h.csv")));
        assert!(cfg.relative());
        assert_eq!(cfg.input(), Some(Path::new("x.wig")));
    }

    #[test]
    fn hist_cfg() {
        let m = sub_matches(&["kmer_track", "hist", "-q", "o.csv", "-j", "o.json", "in.bed"]);
        let cfg = hist_config(&m).unwrap();
        assert!(!cfg.relative());
        assert_eq!(cfg.json(), Some(Path::new("o.json")));
        assert_eq!(cfg.input(), Some(Path::new("in.bed")));
        assert_eq!(cfg.output(), Path::new("o.csv"));
    }
}
