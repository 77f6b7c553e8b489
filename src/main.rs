use clap::{Parser, Subcommand};
use decodr::cli::{
    parse_param, run_transform, show_classification, show_crack, show_detect, show_schemes,
    CrackOptions, DetectOptions,
};
use decodr::{Capability, Params, SchemeRegistry, DEFAULT_DETECT_LIMIT};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Version info from build.rs
const VERSION: &str = env!("DECODR_VERSION");
const BUILD: &str = env!("DECODR_BUILD");
const PROFILE: &str = env!("DECODR_PROFILE");
const GIT_HASH: &str = env!("DECODR_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| {
        format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH)
    })
}

#[derive(Parser)]
#[command(name = "decodr")]
#[command(author, about = "Encode, decode, encrypt, crack and identify text", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Debug logging on stderr (DECODR_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode text with a scheme
    #[command(alias = "e")]
    Encode {
        scheme: String,
        text: String,
        /// Scheme parameter, repeatable
        #[arg(short, long = "param", value_name = "NAME=VALUE", value_parser = parse_kv)]
        param: Vec<(String, String)>,
    },

    /// Decode text with a scheme
    #[command(alias = "d")]
    Decode {
        scheme: String,
        text: String,
        #[arg(short, long = "param", value_name = "NAME=VALUE", value_parser = parse_kv)]
        param: Vec<(String, String)>,
    },

    /// Encrypt text with a keyed scheme
    Encrypt {
        scheme: String,
        text: String,
        #[arg(short, long = "param", value_name = "NAME=VALUE", value_parser = parse_kv)]
        param: Vec<(String, String)>,
    },

    /// Decrypt text with a keyed scheme
    Decrypt {
        scheme: String,
        text: String,
        #[arg(short, long = "param", value_name = "NAME=VALUE", value_parser = parse_kv)]
        param: Vec<(String, String)>,
    },

    /// Try every key of a small key space
    #[command(alias = "c")]
    Crack {
        scheme: String,
        text: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
        /// Ranker/brute-force config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Rank likely decodings of opaque text
    Detect {
        text: String,
        /// Maximum number of candidates
        #[arg(long, default_value_t = DEFAULT_DETECT_LIMIT, value_parser = parse_limit)]
        limit: usize,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Guess the wire format of text
    Classify {
        text: String,
        #[arg(long)]
        json: bool,
    },

    /// List available schemes
    #[command(alias = "ls")]
    List,
}

fn parse_kv(s: &str) -> Result<(String, String), String> {
    parse_param(s).map_err(|e| format!("{}", e))
}

fn parse_limit(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("{}", e)),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("DECODR_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn transform(
    capability: Capability,
    scheme: &str,
    text: &str,
    param: Vec<(String, String)>,
) -> decodr::Result<String> {
    let params: Params = param.into_iter().collect();
    run_transform(capability, scheme, text, &params).map(|out| out + "\n")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("decodr {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if Cli::command().print_help().is_err() {
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    init_logging(cli.verbose);

    let result = match command {
        Commands::Encode { scheme, text, param } => {
            transform(Capability::Encode, &scheme, &text, param)
        }
        Commands::Decode { scheme, text, param } => {
            transform(Capability::Decode, &scheme, &text, param)
        }
        Commands::Encrypt { scheme, text, param } => {
            transform(Capability::Encrypt, &scheme, &text, param)
        }
        Commands::Decrypt { scheme, text, param } => {
            transform(Capability::Decrypt, &scheme, &text, param)
        }

        Commands::Crack {
            scheme,
            text,
            json,
            config,
        } => {
            let options = CrackOptions { json, config };
            show_crack(&scheme, &text, &options)
        }

        Commands::Detect {
            text,
            limit,
            json,
            config,
        } => {
            let options = DetectOptions { limit, json, config };
            show_detect(&text, &options)
        }

        Commands::Classify { text, json } => show_classification(&text, json),

        Commands::List => Ok(show_schemes(SchemeRegistry::global())),
    };

    match result {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
