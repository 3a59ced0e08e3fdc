use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::{Date, Duration, macros::date};

use fintrack::{Database, Operation, OperationKind, RecordStore};

/// A utility for creating a test database for fintrack.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of days of operations to generate.
    #[arg(long, default_value_t = 90)]
    days: i64,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let store = RecordStore::new(Database::open(output_path)?);

    println!("Creating categories...");
    let salary = store.add_category("Salary", OperationKind::Income)?;
    let side_job = store.add_category("Side job", OperationKind::Income)?;
    let rent = store.add_category("Rent", OperationKind::Expense)?;
    let groceries = store.add_category("Groceries", OperationKind::Expense)?;
    let transport = store.add_category("Transport", OperationKind::Expense)?;

    println!("Creating operations...");
    let start: Date = date!(2025 - 01 - 01);
    let mut count = 0;

    for day in 0..args.days {
        let date = start + Duration::days(day);
        let mut operations = Vec::new();

        if day % 14 == 0 {
            operations.push(Operation::build(2400.0, salary.id, date, OperationKind::Income));
            operations.push(Operation::build(900.0, rent.id, date, OperationKind::Expense));
        }

        if day % 30 == 10 {
            operations.push(
                Operation::build(350.0, side_job.id, date, OperationKind::Income)
                    .comment("Freelance invoice"),
            );
        }

        if day % 7 == 5 {
            let amount = 80.0 + (day % 5) as f64 * 12.5;
            operations.push(Operation::build(amount, groceries.id, date, OperationKind::Expense));
        }

        if day % 3 == 0 {
            operations.push(
                Operation::build(4.5, transport.id, date, OperationKind::Expense).comment("Bus"),
            );
        }

        for operation in operations {
            store.add_operation(operation)?;
            count += 1;
        }
    }

    println!("Created {count} operations");
    println!("Success!");

    Ok(())
}
