use std::{
    error::Error,
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    process::exit,
    sync::Arc,
};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use fintrack::{
    ChartView, DASHBOARD_OPERATION_LIMIT, Database, FULL_OPERATION_LIMIT, Operation,
    OperationKind, RecordStore, ReportingEngine, format_currency, format_date, parse_amount,
    parse_date,
};

/// Record income and expenses and report on them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "data/finance.db")]
    db_path: PathBuf,

    /// Also write debug logs to this file.
    #[arg(long)]
    log_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage categories.
    Category(CategoryArgs),
    /// Manage operations.
    Operation(OperationArgs),
    /// Import records from a CSV file.
    Import(TransferArgs),
    /// Export records to a CSV file.
    Export(TransferArgs),
    /// Print reports.
    Report(ReportArgs),
    /// Write a chart to an HTML file.
    Chart(ChartArgs),
}

#[derive(Args, Debug)]
struct CategoryArgs {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Create a category.
    Add {
        name: String,
        /// "income" or "expense".
        kind: String,
    },
    /// List categories in the order they were created.
    List {
        /// Only list categories of this type.
        #[arg(long = "type")]
        kind: Option<String>,
    },
    /// Rename a category or change its type.
    Update { id: i64, name: String, kind: String },
    /// Delete a category that no operation uses.
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct OperationArgs {
    #[command(subcommand)]
    command: OperationCommand,
}

#[derive(Subcommand, Debug)]
enum OperationCommand {
    /// Record an income or expense.
    Add {
        #[arg(long)]
        amount: String,
        #[arg(long)]
        category_id: i64,
        /// The date in the format YYYY-MM-DD.
        #[arg(long)]
        date: String,
        /// "income" or "expense".
        #[arg(long = "type")]
        kind: String,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// List operations, newest first.
    List {
        #[arg(long, default_value_t = DASHBOARD_OPERATION_LIMIT, conflicts_with = "all")]
        limit: u32,
        /// List up to the full listing limit.
        #[arg(long)]
        all: bool,
    },
    /// Delete an operation.
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct TransferArgs {
    #[command(subcommand)]
    records: Records,
}

#[derive(Subcommand, Debug)]
enum Records {
    /// Categories, with the header `name,type`.
    Categories { file: PathBuf },
    /// Operations, with the header `amount,category_id,date,operation_type,comment`.
    Operations { file: PathBuf },
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(subcommand)]
    command: ReportCommand,
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Total income minus total expenses.
    Balance,
    /// Totals per category.
    Summary {
        kind: String,
        #[arg(long)]
        json: bool,
    },
    /// The largest operations.
    Top {
        kind: String,
        #[arg(short, default_value_t = 5)]
        n: u32,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct ChartArgs {
    #[command(subcommand)]
    command: ChartCommand,
}

#[derive(Subcommand, Debug)]
enum ChartCommand {
    /// Bar chart of the totals per category.
    Category { kind: String, output: PathBuf },
    /// Bar chart of the largest operations.
    Top {
        kind: String,
        output: PathBuf,
        #[arg(short, default_value_t = 5)]
        n: u32,
    },
    /// Line chart of income and expenses per day.
    Trend { output: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    if let Err(error) = setup_logging(cli.log_path.as_deref()) {
        print_error(format!("could not open the log file: {error}"));
        exit(1);
    }

    if let Err(error) = run(cli) {
        print_error(error);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let database = Database::open(&cli.db_path)?;
    let store = RecordStore::new(database.clone());
    let reports = ReportingEngine::new(database);

    match cli.command {
        Command::Category(args) => run_category_command(args.command, &store),
        Command::Operation(args) => run_operation_command(args.command, &store),
        Command::Import(args) => {
            let count = match args.records {
                Records::Categories { file } => {
                    store.import_categories_csv(BufReader::new(File::open(file)?))?
                }
                Records::Operations { file } => {
                    store.import_operations_csv(BufReader::new(File::open(file)?))?
                }
            };
            println!("Imported {count} records");
            Ok(())
        }
        Command::Export(args) => {
            let count = match args.records {
                Records::Categories { file } => {
                    store.export_categories_csv(BufWriter::new(File::create(file)?))?
                }
                Records::Operations { file } => {
                    store.export_operations_csv(BufWriter::new(File::create(file)?))?
                }
            };
            println!("Exported {count} records");
            Ok(())
        }
        Command::Report(args) => run_report_command(args.command, &reports),
        Command::Chart(args) => run_chart_command(args.command, &reports),
    }
}

fn run_category_command(
    command: CategoryCommand,
    store: &RecordStore,
) -> Result<(), Box<dyn Error>> {
    match command {
        CategoryCommand::Add { name, kind } => {
            let category = store.add_category(&name, kind.parse()?)?;
            println!("Created category {}", category.id);
        }
        CategoryCommand::List { kind } => {
            let kind = kind.map(|kind| kind.parse::<OperationKind>()).transpose()?;
            for category in store.get_categories(kind)? {
                println!("{}\t{}\t{}", category.id, category.kind, category.name);
            }
        }
        CategoryCommand::Update { id, name, kind } => {
            store.update_category(id, &name, kind.parse()?)?;
            println!("Updated category {id}");
        }
        CategoryCommand::Delete { id } => {
            store.delete_category(id)?;
            println!("Deleted category {id}");
        }
    }

    Ok(())
}

fn run_operation_command(
    command: OperationCommand,
    store: &RecordStore,
) -> Result<(), Box<dyn Error>> {
    match command {
        OperationCommand::Add {
            amount,
            category_id,
            date,
            kind,
            comment,
        } => {
            let operation = Operation::build(
                parse_amount(&amount)?,
                category_id,
                parse_date(&date)?,
                kind.parse()?,
            )
            .comment(&comment);
            let operation = store.add_operation(operation)?;
            println!("Created operation {}", operation.id);
        }
        OperationCommand::List { limit, all } => {
            let limit = if all { FULL_OPERATION_LIMIT } else { limit };
            for operation in store.get_operations(limit)? {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    operation.id,
                    format_date(operation.date),
                    operation.kind,
                    format_currency(operation.amount),
                    operation.category_name,
                    operation.comment
                );
            }
        }
        OperationCommand::Delete { id } => {
            store.delete_operation(id)?;
            println!("Deleted operation {id}");
        }
    }

    Ok(())
}

fn run_report_command(
    command: ReportCommand,
    reports: &ReportingEngine,
) -> Result<(), Box<dyn Error>> {
    match command {
        ReportCommand::Balance => println!("{}", format_currency(reports.get_balance()?)),
        ReportCommand::Summary { kind, json } => {
            let summary = reports.get_category_summary(kind.parse()?)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                for entry in summary {
                    println!("{}\t{}", entry.name, format_currency(entry.total));
                }
            }
        }
        ReportCommand::Top { kind, n, json } => {
            let operations = reports.get_top_by_amount(kind.parse()?, n)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&operations)?);
            } else {
                for operation in operations {
                    println!(
                        "{}\t{}\t{}\t{}",
                        format_currency(operation.amount),
                        operation.category_name,
                        format_date(operation.date),
                        operation.comment
                    );
                }
            }
        }
    }

    Ok(())
}

fn run_chart_command(
    command: ChartCommand,
    reports: &ReportingEngine,
) -> Result<(), Box<dyn Error>> {
    let (view, output, title) = match command {
        ChartCommand::Category { kind, output } => {
            let kind: OperationKind = kind.parse()?;
            (
                reports.render_category_bar_chart(kind)?,
                output,
                format!("{kind} by category"),
            )
        }
        ChartCommand::Top { kind, output, n } => {
            let kind: OperationKind = kind.parse()?;
            (
                reports.render_top_n_bar_chart(kind, n)?,
                output,
                format!("Top {n} {kind}"),
            )
        }
        ChartCommand::Trend { output } => (
            reports.render_time_series()?,
            output,
            "Income and expenses".to_owned(),
        ),
    };

    match view {
        ChartView::Chart(chart) => {
            std::fs::write(&output, chart.to_page(&title).into_string())?;
            println!("Wrote chart to {}", output.display());
        }
        ChartView::NoData => println!("No data"),
    }

    Ok(())
}

fn setup_logging(log_path: Option<&Path>) -> Result<(), std::io::Error> {
    let stderr_log = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        );

    let debug_log = match log_path {
        Some(path) => {
            let log_file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
