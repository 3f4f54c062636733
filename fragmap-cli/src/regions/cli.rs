use clap::{Arg, Command, arg};

use crate::common::{padding_args, parameters_arg};

pub const REGIONS_CMD: &str = "regions";
pub const DEFAULT_OUT: &str = "-";

pub fn create_regions_cli() -> Command {
    Command::new(REGIONS_CMD)
        .about("Write the candidate precursor regions of an alignment file as BED.")
        .arg(
            Arg::new("alignment")
                .required(true)
                .help("Indexed BAM file, or BED file of read envelopes"),
        )
        .arg(
            arg!(-o --output <OUTPUT> "Output BED file (default: stdout)")
                .required(false)
                .default_value(DEFAULT_OUT),
        )
        .arg(parameters_arg())
        .args(padding_args())
}
