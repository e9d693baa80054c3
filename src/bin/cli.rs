//! memc-cli
//!
//! Runs single driver operations against memcached, through the same
//! registry and property bag a benchmark harness uses.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use memcdriver::config::URI_PROPERTY;
use memcdriver::{registry, Context, Properties, Record, Registry};
use tracing_subscriber::{fmt, EnvFilter};

/// memcached driver CLI
#[derive(Parser, Debug)]
#[command(name = "memc-cli")]
#[command(about = "Run driver operations against a memcached server")]
#[command(version)]
struct Args {
    /// Server address (host:port), overrides memc.uri
    #[arg(short, long)]
    uri: Option<String>,

    /// Property file, may be repeated; later files win
    #[arg(short = 'P', long = "property-file")]
    property_files: Vec<PathBuf>,

    /// Property as key=value, may be repeated; wins over files
    #[arg(short = 'p', long = "prop", value_parser = parse_pair)]
    props: Vec<(String, String)>,

    /// Table name
    #[arg(short, long, default_value = "usertable")]
    table: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a record, optionally only some fields
    Read {
        key: String,
        fields: Vec<String>,
    },

    /// Create a record from field=value pairs
    Insert {
        key: String,
        #[arg(required = true, value_parser = parse_pair)]
        values: Vec<(String, String)>,
    },

    /// Write field=value pairs to a record
    Update {
        key: String,
        #[arg(required = true, value_parser = parse_pair)]
        values: Vec<(String, String)>,
    },

    /// Delete a record
    Delete { key: String },

    /// Scan records (memcached returns none)
    Scan {
        start_key: String,

        #[arg(short, long, default_value = "10")]
        count: usize,

        fields: Vec<String>,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))
}

fn main() {
    // Logs go to stderr so stdout carries only results
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,memcdriver=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> memcdriver::Result<()> {
    let mut props = Properties::new();
    for path in &args.property_files {
        props.merge(Properties::load(path)?);
    }
    for (key, value) in args.props {
        props.set(key, value);
    }
    if let Some(uri) = args.uri {
        props.set(URI_PROPERTY, uri);
    }

    let mut drivers = Registry::new();
    registry::register(&mut drivers)?;
    let db = drivers.create(registry::DRIVER_NAME, &props)?;

    let ctx = db.init_thread(Context::background(), 0, 1);
    let table = args.table.as_str();

    let result = match args.command {
        Commands::Read { key, fields } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            db.read(&ctx, table, &key, &fields).map(|record| print_record(&record))
        }
        Commands::Insert { key, values } => db.insert(&ctx, table, &key, &to_record(values)),
        Commands::Update { key, values } => db.update(&ctx, table, &key, &to_record(values)),
        Commands::Delete { key } => db.delete(&ctx, table, &key),
        Commands::Scan {
            start_key,
            count,
            fields,
        } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            db.scan(&ctx, table, &start_key, count, &fields).map(|records| {
                println!("{} record(s)", records.len());
                records.iter().for_each(print_record);
            })
        }
    };

    db.cleanup_thread(&ctx);
    db.close()?;
    result
}

fn to_record(values: Vec<(String, String)>) -> Record {
    values
        .into_iter()
        .map(|(field, value)| (field, value.into_bytes()))
        .collect()
}

fn print_record(record: &Record) {
    let mut fields: Vec<_> = record.iter().collect();
    fields.sort();
    for (field, value) in fields {
        println!("{}={}", field, String::from_utf8_lossy(value));
    }
}
