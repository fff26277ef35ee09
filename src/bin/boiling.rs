//! boiling — release-group search from the command line
//!
//! # Usage
//!
//! ```bash
//! # Show the compiled SQL only
//! boiling search "name='Kid A' | type=2" --sort release_date --desc --dry-run
//!
//! # Execute against PostgreSQL
//! BOILING_DATABASE_URL=postgres://localhost/boiling boiling search "type=1" --limit 10
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use boiling::prelude::*;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boiling")]
#[command(version)]
#[command(about = "Compile and run release-group searches", long_about = None)]
#[command(after_help = "EXAMPLES:
    boiling search \"name='Kid A'\" --dry-run
    boiling search \"type=1 & (name=Amnesiac | name='Kid A')\" --sort release_date --desc
    boiling explain \"id>=10 & id<20\"")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search release groups
    Search {
        #[command(flatten)]
        filter: FilterArgs,

        /// Maximum number of rows
        #[arg(short, long, default_value_t = 25)]
        limit: i64,

        /// Rows to skip
        #[arg(short, long, default_value_t = 0)]
        offset: i64,

        /// Don't execute, just show the generated SQL
        #[arg(short, long)]
        dry_run: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Database connection URL
        #[arg(long, env = "BOILING_DATABASE_URL")]
        database_url: Option<String>,

        /// Config file (defaults to <config dir>/boiling/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show tokens, SQL and parameters of a filter
    Explain {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List the searchable columns
    Columns,
}

#[derive(Args)]
struct FilterArgs {
    /// Filter expression, e.g. "name='Kid A' & type!=2"
    filter: String,

    /// Column to sort by
    #[arg(short, long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    desc: bool,
}

impl FilterArgs {
    fn to_query(&self) -> BoilingResult<Query> {
        let mut query = Query::new(parse_release_group_filter(&self.filter)?);
        if let Some(sort) = &self.sort {
            let column: ReleaseGroupColumn = sort.parse()?;
            query.set_sorter(if self.desc {
                sort_descending(column)
            } else {
                sort_ascending(column)
            });
        }
        Ok(query)
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Search {
            filter,
            limit,
            offset,
            dry_run,
            format,
            database_url,
            config,
        } => {
            search(
                filter,
                *limit,
                *offset,
                *dry_run,
                format,
                database_url.clone(),
                config.as_deref(),
            )
            .await
        }
        Commands::Explain { filter } => explain(filter),
        Commands::Columns => {
            show_columns();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "boiling=debug" } else { "boiling=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn search(
    filter: &FilterArgs,
    limit: i64,
    offset: i64,
    dry_run: bool,
    format: &OutputFormat,
    database_url: Option<String>,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let query = filter.to_query()?;
    let (sql, params) = search_release_groups_sql(&query, offset, limit)?;

    let config = Config::load(config_path)?.with_database_url(database_url);

    // Dry run or no database URL - just show SQL
    if dry_run || config.database_url.is_none() {
        println!("{}", "Generated SQL:".green().bold());
        println!("{}", sql.white());
        print_params(&params);

        if config.database_url.is_none() && !dry_run {
            println!();
            println!(
                "{}",
                "⚠ No database URL. Use --database-url or set BOILING_DATABASE_URL".yellow()
            );
        }
        return Ok(());
    }

    let db = Database::connect(&config)
        .await
        .context("failed to open the database pool")?;
    let groups = db.search_release_groups(&query, offset, limit).await?;
    format_output(&groups, format)?;
    Ok(())
}

fn print_params(params: &[Value]) {
    if params.is_empty() {
        return;
    }
    println!();
    println!("{}", "Parameters:".cyan());
    for (i, p) in params.iter().enumerate() {
        println!("  ${} = {}", i + 1, p.to_string().yellow());
    }
}

fn format_output(groups: &[ReleaseGroup], format: &OutputFormat) -> anyhow::Result<()> {
    if groups.is_empty() {
        println!("{}", "(no results)".dimmed());
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(groups)?);
        }
        OutputFormat::Table => {
            let header = ["id", "name", "type", "release_date"];
            let rows: Vec<[String; 4]> = groups
                .iter()
                .map(|g| {
                    [
                        g.id.to_string(),
                        g.name.clone(),
                        g.release_type.to_string(),
                        g.release_date.format("%Y-%m-%d").to_string(),
                    ]
                })
                .collect();

            // Calculate column widths
            let mut widths: HashMap<usize, usize> =
                header.iter().enumerate().map(|(i, h)| (i, h.len())).collect();
            for row in &rows {
                for (i, cell) in row.iter().enumerate() {
                    if let Some(w) = widths.get_mut(&i) {
                        *w = (*w).max(cell.chars().count());
                    }
                }
            }

            let line: Vec<String> = header
                .iter()
                .enumerate()
                .map(|(i, h)| format!("{:width$}", h, width = widths[&i]))
                .collect();
            println!("{}", line.join(" │ ").white().bold());

            let sep: Vec<String> = (0..header.len()).map(|i| "─".repeat(widths[&i])).collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in &rows {
                let cells: Vec<String> = row
                    .iter()
                    .enumerate()
                    .map(|(i, cell)| format!("{:width$}", cell, width = widths[&i]))
                    .collect();
                println!("{}", cells.join(" │ "));
            }

            println!();
            println!("{} row(s) returned", groups.len().to_string().cyan());
        }
    }
    Ok(())
}

fn explain(filter: &FilterArgs) -> anyhow::Result<()> {
    println!("{}", "Filter Explanation".cyan().bold());
    println!();
    println!("{} {}", "Filter:".dimmed(), filter.filter.yellow());
    println!();

    let query = filter.to_query()?;

    println!("{}", "Tokens:".green().bold());
    for token in query.tokens() {
        println!("  {}", token.to_string().white());
    }

    let (sql, params) = query.build();
    println!();
    println!("{}", "Generated SQL:".green().bold());
    println!("  {}", sql.white());
    print_params(&params);
    Ok(())
}

fn show_columns() {
    println!("{}", "release_groups columns".cyan().bold());
    println!();
    println!("{:16} {}", "Column".white().bold(), "Type".white().bold());
    println!("{}", "─".repeat(32).dimmed());
    for column in ReleaseGroupColumn::ALL {
        println!("{:16} {}", column.name().cyan(), column.sql_type().dimmed());
    }
}
