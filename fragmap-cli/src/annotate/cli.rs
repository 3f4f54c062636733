use clap::{Arg, Command, arg, value_parser};

use fragmap_core::consts::{DEFAULT_OFFSET_3P, DEFAULT_OFFSET_5P};

use crate::common::{padding_args, parameters_arg};

pub const ANNOTATE_CMD: &str = "annotate";
pub const DEFAULT_OUT: &str = "-";
pub const DEFAULT_FORMAT: &str = "table";

pub fn create_annotate_cli() -> Command {
    Command::new(ANNOTATE_CMD)
        .about("Call fragments in an alignment file and write them as a table or GTF.")
        .arg(
            Arg::new("alignment")
                .required(true)
                .help("Indexed BAM file, or BED file of read envelopes"),
        )
        .arg(
            arg!(-o --output <OUTPUT> "Output file (default: stdout)")
                .required(false)
                .default_value(DEFAULT_OUT),
        )
        .arg(
            arg!(-f --format <FORMAT> "Output format")
                .required(false)
                .value_parser(["table", "gtf"])
                .default_value(DEFAULT_FORMAT),
        )
        .arg(
            arg!(--fasta <FASTA> "Indexed reference FASTA, fills in fragment sequences")
                .required(false),
        )
        .arg(
            arg!(-r --regions <GTF> "Precursor annotation (GTF/GFF); skips de novo region detection")
                .required(false),
        )
        .arg(parameters_arg())
        .args(padding_args())
        .arg(
            Arg::new("min-count")
                .long("min-count")
                .value_parser(value_parser!(u32))
                .help("Minimum read starts/ends for a peak"),
        )
        .arg(
            Arg::new("suppression-window")
                .long("suppression-window")
                .value_parser(value_parser!(usize))
                .help("Bases around a peak excluded from further peaks"),
        )
        .arg(
            Arg::new("min-length")
                .long("min-length")
                .value_parser(value_parser!(usize))
                .help("Shortest fragment reported"),
        )
        .arg(
            Arg::new("max-length")
                .long("max-length")
                .value_parser(value_parser!(usize))
                .help("Longest fragment reported"),
        )
        .arg(
            Arg::new("length-penalty")
                .long("length-penalty")
                .value_parser(value_parser!(f64))
                .help("Weight of read length disagreement when pairing peaks"),
        )
        .arg(
            Arg::new("offset5p")
                .long("offset5p")
                .value_parser(value_parser!(u32))
                .help(format!("GTF only: bases added upstream of each fragment [default: {}]", DEFAULT_OFFSET_5P)),
        )
        .arg(
            Arg::new("offset3p")
                .long("offset3p")
                .value_parser(value_parser!(u32))
                .help(format!("GTF only: bases added downstream of each fragment [default: {}]", DEFAULT_OFFSET_3P)),
        )
        .arg(
            arg!(-t --threads <THREADS> "Worker threads (default: all cores)")
                .required(false)
                .value_parser(value_parser!(usize)),
        )
}
