//! Command-line interface definitions and argument parsing

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::filter::FilterState;

/// House Rocket: purchase and resale recommendations for property listings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Listings file (.csv, .json or .parquet) opened in the dashboard
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the pipeline and write the recommendation table
    Export {
        /// Listings file to read
        #[arg(short, long)]
        input: PathBuf,

        /// Output file; .csv or .parquet
        #[arg(short, long, default_value = "seattle_properties.csv")]
        output: PathBuf,

        /// Keep only properties flagged "buy"
        #[arg(long)]
        buy_only: bool,

        /// Restrict to these zip codes (repeatable)
        #[arg(short, long = "zipcode")]
        zipcodes: Vec<u32>,

        /// Print the first N exported rows as a table
        #[arg(long)]
        preview: Option<usize>,
    },

    /// Print the exploratory hypotheses (H1-H10)
    Insights {
        /// Listings file to read
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// Display filters requested on the command line.
pub fn filter_state(buy_only: bool, zipcodes: &[u32]) -> FilterState {
    FilterState {
        purchasable_only: buy_only,
        zipcodes: zipcodes.iter().copied().collect::<BTreeSet<u32>>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_command() {
        let args = Args::try_parse_from([
            "house-rocket",
            "export",
            "--input",
            "kc_house_data.csv",
            "--buy-only",
            "-z",
            "98001",
            "--zipcode",
            "98002",
            "--preview",
            "5",
        ])
        .unwrap();

        match args.command {
            Some(Command::Export {
                input,
                output,
                buy_only,
                zipcodes,
                preview,
            }) => {
                assert_eq!(input, PathBuf::from("kc_house_data.csv"));
                assert_eq!(output, PathBuf::from("seattle_properties.csv"));
                assert!(buy_only);
                assert_eq!(zipcodes, vec![98001, 98002]);
                assert_eq!(preview, Some(5));

                let filters = filter_state(buy_only, &zipcodes);
                assert!(filters.purchasable_only);
                assert_eq!(filters.zipcodes.len(), 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_no_subcommand_opens_dashboard() {
        let args = Args::try_parse_from(["house-rocket", "-i", "data.parquet", "-v"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.verbose);
        assert_eq!(args.input, Some(PathBuf::from("data.parquet")));
    }

    #[test]
    fn test_invalid_zipcode_rejected() {
        let result = Args::try_parse_from([
            "house-rocket",
            "export",
            "--input",
            "f.csv",
            "--zipcode",
            "north",
        ]);
        assert!(result.is_err());
    }
}
