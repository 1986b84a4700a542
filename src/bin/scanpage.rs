use clap::{Parser, Subcommand, ValueEnum};
use scanpage::{FilterSpec, Lister, ListingConfig, MemoryStore, PagingRequest, ScanStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "scanpage", version, about = "Paginated listings over a scan-only store", long_about = None)]
struct Cli {
    #[arg(long, help = "Path to a listing config file (TOML). If omitted, defaults are used.")]
    config: Option<PathBuf>,
    #[arg(long, help = "Records to load into the configured table (JSON array or NDJSON)")]
    data: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputMode::Json, help = "Output format")]
    format: OutputMode,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputMode {
    Json,
    Plain,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "List one page of primary records, newest first")]
    List {
        #[arg(long, help = "Page size; non-positive or unparseable values use the default")]
        limit: Option<String>,
        #[arg(long, help = "Cursor returned by a previous page")]
        cursor: Option<String>,
        #[arg(long, help = "Collect every matching record instead of one page")]
        all: bool,
        #[arg(long = "where", value_name = "FIELD=VALUE", help = "Extra equality predicate")]
        where_eq: Option<String>,
    },
    #[command(about = "Fetch one record by partition and sort key")]
    Get {
        pk: String,
        sk: String,
    },
    #[command(name = "decode-cursor", about = "Show the resume point inside a cursor token")]
    DecodeCursor {
        token: String,
    },
}

fn parse_where(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((f, v)) if !f.trim().is_empty() => Ok((f.trim().to_string(), v.to_string())),
        _ => Err(format!("expected FIELD=VALUE, got '{s}'")),
    }
}

fn load_store(cfg: &ListingConfig, data: Option<&PathBuf>) -> Result<MemoryStore, Box<dyn std::error::Error>> {
    let store = MemoryStore::new(&cfg.partition_key, &cfg.sort_key);
    store.create_table(&cfg.table_name);
    if let Some(path) = data {
        let file = std::fs::File::open(path)
            .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
        let records = scanpage::utils::json::read_records(file)?;
        let n = records.len();
        for record in records {
            store.put(&cfg.table_name, record)?;
        }
        log::info!("loaded {n} records into '{}' from {}", cfg.table_name, path.display());
    }
    Ok(store)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = ListingConfig::load(cli.config.as_deref())?;
    let store = Arc::new(load_store(&cfg, cli.data.as_ref())?);
    let table = cfg.table_name.clone();
    let lister = Lister::new(store.clone(), cfg);
    match cli.command {
        Command::List { limit, cursor, all, where_eq } => {
            let mut filter: FilterSpec = lister.base_filter();
            if let Some(w) = where_eq {
                let (field, value) = parse_where(&w)?;
                filter = filter.with_equals(field, value);
            }
            let params = scanpage::PagingParams {
                limit,
                cursor,
                all: all.then(|| "true".to_string()),
            };
            let paging = PagingRequest::from_params(&params, lister.config().default_page_size);
            let result = lister.list(&filter, &paging).await?;
            match cli.format {
                OutputMode::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputMode::Plain => {
                    for item in &result.items {
                        println!("{}", serde_json::Value::Object(item.clone()));
                    }
                    println!(
                        "count={} total={} has_more={} next_cursor={}",
                        result.count,
                        result.total_count,
                        result.has_more,
                        result.next_cursor.as_deref().unwrap_or("-")
                    );
                }
            }
        }
        Command::Get { pk, sk } => {
            let Some(record) = store.get_by_key(&table, &pk, &sk).await? else {
                return Err(format!("no record with key ({pk}, {sk})").into());
            };
            let value = serde_json::Value::Object(record);
            match cli.format {
                OutputMode::Json => println!("{}", serde_json::to_string_pretty(&value)?),
                OutputMode::Plain => println!("{value}"),
            }
        }
        Command::DecodeCursor { token } => {
            let resume = lister.codec().decode(&token)?;
            match cli.format {
                OutputMode::Json => println!("{}", serde_json::to_string_pretty(&resume)?),
                OutputMode::Plain => {
                    for (k, v) in resume.as_map() {
                        println!("{k}={v}");
                    }
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = scanpage::logger::configure_from_env() {
        eprintln!("warning: logging disabled: {e}");
    }
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
