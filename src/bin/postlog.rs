//! postlog CLI
//!
//! Command-line interface for posting to and reading from a comment log.

use clap::{Parser, Subcommand};
use postlog::codec::encode_record;
use postlog::{AppendLog, Config, PostlogError, Record, Result, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// postlog CLI
#[derive(Parser, Debug)]
#[command(name = "postlog")]
#[command(about = "Append-only comment log")]
#[command(version)]
struct Args {
    /// Log file path
    #[arg(short, long, default_value = "./posts/posts.txt")]
    log: String,

    /// fsync after every append
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Post a comment
    Post {
        /// Author of the comment
        #[arg(short, long)]
        user: String,

        /// Comment text
        #[arg(short, long)]
        msg: String,

        /// Extra fields
        #[arg(short, long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// List comments, optionally for one user
    List {
        /// Only show comments by this user
        #[arg(short, long)]
        user: Option<String>,

        /// Print a JSON array instead of one record per line
        #[arg(long)]
        json: bool,
    },

    /// Report record and garbage counts for the log
    Stats,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,postlog=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let sync_strategy = if args.sync {
        SyncStrategy::EveryAppend
    } else {
        SyncStrategy::OsBuffered
    };

    let config = Config::builder()
        .log_path(&args.log)
        .sync_strategy(sync_strategy)
        .build();

    let log = AppendLog::open(&config)?;

    match args.command {
        Commands::Post { user, msg, fields } => {
            let mut record = Record::new().with("user", user).with("msg", msg);
            for field in &fields {
                let (name, value) = parse_field(field)?;
                record.insert(name, value);
            }

            let line = log.append_line(&record)?;
            println!("Message Posted:");
            print!("{}", String::from_utf8_lossy(&line));
        }
        Commands::List { user, json } => {
            let result = match &user {
                Some(user) => log.scan_field_eq("user", user)?,
                None => log.scan(None)?,
            };

            if result.is_empty() {
                if result.is_no_match() && user.is_some() {
                    println!("This user has no comments.");
                } else {
                    println!("No comments.");
                }
                return Ok(());
            }

            if json {
                let rendered = serde_json::to_string_pretty(result.records())
                    .map_err(|e| PostlogError::Serialization(e.to_string()))?;
                println!("{}", rendered);
            } else {
                for record in result.records() {
                    println!("{}", String::from_utf8_lossy(&encode_record(record)?));
                }
            }
        }
        Commands::Stats => {
            let stats = log.stats()?;
            println!("records:       {}", stats.records);
            println!("total bytes:   {}", stats.total_bytes);
            println!("record bytes:  {}", stats.record_bytes);
            println!("garbage bytes: {}", stats.garbage_bytes);
        }
    }

    Ok(())
}

/// Split a `KEY=VALUE` argument
fn parse_field(arg: &str) -> Result<(String, String)> {
    arg.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| PostlogError::Config(format!("expected KEY=VALUE, got {:?}", arg)))
}
