use bank_analytics_rs::{
    FileSink, Logged, Reported, TransactionLoader, investment_bank, profitable_cashback_categories,
};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = env::args().collect();
    let file_path = args.get(1).map(String::as_str).unwrap_or("demos/sample.csv");

    let transactions = TransactionLoader::new().filename(file_path).load()?;

    let output_dir = env::temp_dir();
    let ranking = Reported::new(profitable_cashback_categories)
        .with_sink(FileSink::new(&output_dir))
        .call((transactions.as_slice(), 2023, 5));

    println!("Cashback for 2023-05:");
    for (category, cashback) in ranking.iter() {
        println!("  {}: {}", category, cashback);
    }
    println!(
        "\nSaved to {}",
        output_dir.join("profitable_cashback_categories_report.json").display()
    );

    let saved = Logged::new(investment_bank).call(("2023-05", transactions.as_slice(), 50))?;
    println!("Round-up savings with a 50 step: {}", saved);

    Ok(())
}
