use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use finance_tracker::{
    Category, MonthKey, NewBudget, NewTransaction, create_budget, create_transaction,
    initialize_db,
};

/// A utility for creating a test database for the REST API server of the finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Descriptions and amounts for the sample transactions of each category.
const SAMPLE_TRANSACTIONS: [(Category, &str, f64); 12] = [
    (Category::Food, "Groceries", 82.40),
    (Category::Food, "Lunch with friends", 24.50),
    (Category::Transport, "Bus pass", 45.00),
    (Category::Transport, "Fuel", 60.25),
    (Category::Shopping, "Running shoes", 129.99),
    (Category::Shopping, "Books", 35.00),
    (Category::Health, "Pharmacy", 18.75),
    (Category::Health, "Dentist", 150.00),
    (Category::Utilities, "Electricity", 96.30),
    (Category::Utilities, "Internet", 59.99),
    (Category::Other, "Birthday gift", 40.00),
    (Category::Other, "Haircut", 30.00),
];

/// Monthly spending limits used for the sample budgets.
const SAMPLE_BUDGETS: [(Category, f64); 4] = [
    (Category::Food, 400.0),
    (Category::Transport, 100.0),
    (Category::Shopping, 150.0),
    (Category::Utilities, 300.0),
];

/// The number of months of sample data to create, ending with the current month.
const SAMPLE_MONTHS: usize = 6;

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let today = OffsetDateTime::now_utc().date();
    let mut month = MonthKey::from_date(today);

    for months_ago in 0..SAMPLE_MONTHS {
        println!("Creating transactions and budgets for {month}...");

        for (index, (category, description, amount)) in SAMPLE_TRANSACTIONS.into_iter().enumerate() {
            let date = sample_date(month, index, today)?;
            // Vary the amounts a little so that each month looks different.
            let amount = amount * (1.0 + 0.1 * months_ago as f64);
            create_transaction(NewTransaction::new(amount, description, category, date)?, &conn)?;
        }

        for (category, amount) in SAMPLE_BUDGETS {
            create_budget(NewBudget::new(category, month, amount)?, &conn)?;
        }

        month = month.previous();
    }

    println!("Success!");

    Ok(())
}

/// Spread the sample transactions over the first days of `month`, never later than `today`.
fn sample_date(month: MonthKey, index: usize, today: Date) -> Result<Date, Box<dyn Error>> {
    let first_day = Date::from_calendar_date(month.year(), month.month().try_into()?, 1)?;
    let date = first_day + Duration::days(2 * index as i64);

    Ok(date.min(today))
}
