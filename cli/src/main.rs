//! Country atlas CLI
//!
//! Usage:
//!   atlas lookup india
//!   atlas --json --fields name,capital,currency lookup JP
//!   atlas calling-code +1
//!   atlas filter --continent europe --landlocked true
//!   atlas --data countries.json validate

mod commands;
mod render;

use atlas_utils::FlagSize;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "atlas", version, about = "Look up, search and format country data")]
pub struct Cli {
    /// Print pretty JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Comma-separated record fields to project lookup output onto
    #[arg(long, global = true, value_name = "FIELDS")]
    pub fields: Option<String>,

    /// JSON dataset to load instead of the embedded one
    #[arg(long, global = true, env = "ATLAS_DATA")]
    pub data: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(flatten)]
    Query(Query),
    /// Audit the dataset in use and list its issues
    Validate,
}

/// Commands answered from a loaded atlas
#[derive(Subcommand, Debug)]
pub enum Query {
    /// Show one country by ISO code or name
    Lookup {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Substring search over common and official names
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Countries in a continent
    Region { continent: String },
    /// Land neighbours of a country
    Borders {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Countries using a currency code
    Currency { code: String },
    /// Countries speaking a language
    Language {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Countries holding a calling code
    CallingCode { code: String },
    /// Multi-criteria query; all given criteria must match
    Filter {
        #[arg(long)]
        continent: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        landlocked: Option<bool>,
        #[arg(long)]
        un_member: Option<bool>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Nearest countries by centroid distance
    Nearest {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Great-circle distance between two countries
    Distance { from: String, to: String },
    /// Validate and format a phone number
    Phone {
        number: String,
        /// ISO2 code of the number's country; detected from the prefix otherwise
        #[arg(short, long)]
        country: Option<String>,
    },
    /// Flag emoji, or the SVG with --svg
    Flag {
        iso2: String,
        #[arg(long)]
        svg: bool,
        #[arg(long, requires = "height", conflicts_with = "size")]
        width: Option<u32>,
        #[arg(long, requires = "width")]
        height: Option<u32>,
        /// Size preset: tiny, small, medium, large, xlarge, icon, thumbnail, banner
        #[arg(long)]
        size: Option<FlagSize>,
        /// Emit the SVG as a base64 data URL
        #[arg(long)]
        data_url: bool,
    },
}

fn init_tracing(verbose: bool) {
    let directives = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(directives))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match commands::run(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup_multi_word() {
        let cli = Cli::try_parse_from(["atlas", "lookup", "united", "states"]).unwrap();
        match cli.command {
            Command::Query(Query::Lookup { query }) => {
                assert_eq!(query, vec!["united", "states"])
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_global_options_after_subcommand() {
        let cli =
            Cli::try_parse_from(["atlas", "lookup", "IN", "--json", "--fields", "name,capital"])
                .unwrap();
        assert!(cli.json);
        assert_eq!(cli.fields.as_deref(), Some("name,capital"));
    }

    #[test]
    fn test_parse_lookup_requires_query() {
        assert!(Cli::try_parse_from(["atlas", "lookup"]).is_err());
    }

    #[test]
    fn test_parse_filter() {
        let cli = Cli::try_parse_from([
            "atlas",
            "filter",
            "--continent",
            "europe",
            "--landlocked",
            "true",
            "--un-member",
            "false",
        ])
        .unwrap();
        match cli.command {
            Command::Query(Query::Filter {
                continent,
                landlocked,
                un_member,
                region,
                ..
            }) => {
                assert_eq!(continent.as_deref(), Some("europe"));
                assert_eq!(landlocked, Some(true));
                assert_eq!(un_member, Some(false));
                assert!(region.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_nearest_default_limit() {
        let cli = Cli::try_parse_from(["atlas", "nearest", "france"]).unwrap();
        match cli.command {
            Command::Query(Query::Nearest { limit, .. }) => assert_eq!(limit, 5),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_flag_dimensions() {
        let cli = Cli::try_parse_from(["atlas", "flag", "in", "--svg", "--size", "Small"]).unwrap();
        match cli.command {
            Command::Query(Query::Flag { size, svg, .. }) => {
                assert!(svg);
                assert_eq!(size, Some(FlagSize::Small));
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["atlas", "flag", "in", "--width", "10"]).is_err());
        assert!(Cli::try_parse_from([
            "atlas", "flag", "in", "--width", "10", "--height", "5", "--size", "tiny"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["atlas", "flag", "in", "--size", "huge"]).is_err());
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["atlas", "validate", "--data", "countries.json"]).unwrap();
        assert!(matches!(cli.command, Command::Validate));
        assert_eq!(cli.data, Some(PathBuf::from("countries.json")));
        assert!(Cli::try_parse_from(["atlas", "validate", "extra"]).is_err());
    }

    #[test]
    fn test_parse_calling_code_with_plus() {
        let cli = Cli::try_parse_from(["atlas", "calling-code", "+44"]).unwrap();
        match cli.command {
            Command::Query(Query::CallingCode { code }) => assert_eq!(code, "+44"),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
