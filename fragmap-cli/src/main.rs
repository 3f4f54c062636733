mod annotate;
mod common;
mod regions;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "fragmap";
    pub const BIN_NAME: &str = "fragmap";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Annotate small ncRNA-derived fragments from the start and end positions of aligned small RNA-seq reads.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase logging verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .conflicts_with("verbose")
                .help("Only report errors"),
        )
        .subcommand(annotate::cli::create_annotate_cli())
        .subcommand(regions::cli::create_regions_cli())
}

fn log_level(matches: &ArgMatches) -> LevelFilter {
    if matches.get_flag("quiet") {
        return LevelFilter::Error;
    }
    match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    env_logger::Builder::new()
        .filter_level(log_level(&matches))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    match matches.subcommand() {
        //
        // ANNOTATE
        //
        Some((annotate::cli::ANNOTATE_CMD, matches)) => {
            annotate::handlers::run_annotate(matches)?;
        }

        //
        // REGIONS
        //
        Some((regions::cli::REGIONS_CMD, matches)) => {
            regions::handlers::run_regions(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    #[case(&["fragmap", "regions", "reads.bam"], LevelFilter::Warn)]
    #[case(&["fragmap", "-vv", "regions", "reads.bam"], LevelFilter::Debug)]
    #[case(&["fragmap", "regions", "reads.bam", "--quiet"], LevelFilter::Error)]
    fn test_log_level(#[case] args: &[&str], #[case] expected: LevelFilter) {
        let matches = build_parser().try_get_matches_from(args).unwrap();
        assert_eq!(log_level(&matches), expected);
    }
}
