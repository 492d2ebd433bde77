use std::path::PathBuf;

use clap::{command, value_parser, Arg, ArgAction, Command};

use crate::utils::LogLevel;

fn input_arg(help: &'static str) -> Arg {
    Arg::new("input")
        .value_parser(value_parser!(PathBuf))
        .value_name("INPUT")
        .help(help)
}

fn output_arg(help: &'static str) -> Arg {
    Arg::new("output")
        .value_parser(value_parser!(PathBuf))
        .value_name("OUTPUT")
        .required(true)
        .help(help)
}

fn relative_arg() -> Arg {
    Arg::new("relative")
        .short('r')
        .long("relative-counts")
        .action(ArgAction::SetTrue)
        .help("Report the proportion of bases in each class instead of the counts")
}

fn bed_model() -> Command {
    Command::new("bed")
        .about("Summarize a variableStep wig file from meryl-lookup -wig-count as a bed file")
        .long_about(
            "Summarize a variableStep wig file from meryl-lookup -wig-count as a 0-based, \
             half open bed file with fields: chrom start end . multiplicity . start start colour.\n\
             By default adjacent positions with the same multiplicity are merged. In binned mode \
             each bin is given the majority multiplicity of its positions. \
             Multiplicities above 4 are reported as 5.",
        )
        .arg(
            Arg::new("binned")
                .short('b')
                .long("binned")
                .action(ArgAction::SetTrue)
                .help("Report majority multiplicity in fixed width bins"),
        )
        .arg(
            Arg::new("bin_width")
                .short('w')
                .long("bin-width")
                .value_parser(value_parser!(u32).range(1..))
                .value_name("INT")
                .default_value("100")
                .help("Bin width for binned mode"),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .value_parser(value_parser!(u64))
                .value_name("INT")
                .help("Seed for breaking ties in binned mode [default: random]"),
        )
        .arg(
            Arg::new("hist")
                .short('H')
                .long("hist")
                .value_parser(value_parser!(PathBuf))
                .value_name("CSV")
                .help("Also write per contig multiplicity counts to CSV file"),
        )
        .arg(relative_arg().requires("hist"))
        .arg(output_arg("Output bed file"))
        .arg(input_arg("Input wig file [default: <stdin>]"))
}

fn hist_model() -> Command {
    Command::new("hist")
        .about("Count bases in each multiplicity class per contig from a bed file")
        .long_about(
            "Count bases in each multiplicity class per contig from a bed file made by the bed \
             command. Output is a CSV file with columns contig, tigLen, 0, 1, 2, 3, 4, 5 \
             sorted by contig name. Multiplicities above 4 are counted as 5.",
        )
        .arg(relative_arg())
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .value_parser(value_parser!(PathBuf))
                .value_name("FILE")
                .help("Also write counts with run information as JSON"),
        )
        .arg(output_arg("Output CSV file"))
        .arg(input_arg("Input bed file [default: <stdin>]"))
}

pub(super) fn cli_model() -> Command {
    command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("timestamp")
                .short('X')
                .long("timestamp")
                .value_parser(value_parser!(stderrlog::Timestamp))
                .value_name("GRANULARITY")
                .default_value("none")
                .global(true)
                .help("Prepend log entries with a timestamp"),
        )
        .arg(
            Arg::new("loglevel")
                .short('l')
                .long("loglevel")
                .value_name("LOGLEVEL")
                .value_parser(value_parser!(LogLevel))
                .ignore_case(true)
                .default_value("info")
                .global(true)
                .help("Set log level"),
        )
        .arg(
            Arg::new("quiet")
                .action(ArgAction::SetTrue)
                .short('q')
                .long("quiet")
                .conflicts_with("loglevel")
                .global(true)
                .help("Silence all output"),
        )
        .subcommand(bed_model())
        .subcommand(hist_model())
}
