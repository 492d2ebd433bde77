#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

mod bed;
mod cli;
mod encode;
mod error;
mod hist;
mod output;
mod process;
mod reader;
mod score;
mod utils;

use cli::Config;

fn main() -> anyhow::Result<()> {
    match cli::handle_cli()? {
        Config::Bed(cfg) => process::wig_to_bed(&cfg),
        Config::Hist(cfg) => {
            let res = process::bed_to_hist(&cfg)?;
            output::output(&cfg, &res)
        }
    }
}
