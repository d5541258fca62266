use bank_analytics_rs::TransactionLoader;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let file_path = if args.len() > 1 {
        &args[1]
    } else {
        println!("Using sample data from demos/sample.csv\n");
        "demos/sample.csv"
    };

    let transactions = TransactionLoader::new().filename(file_path).load()?;

    println!("Found {} transactions\n", transactions.len());

    for (i, tx) in transactions.iter().take(10).enumerate() {
        println!("Transaction {}:", i + 1);
        match tx.date() {
            Ok(date) => println!("  Date: {}", date),
            Err(e) => println!("  Date: {}", e),
        }
        println!("  Amount: {}", tx.amount.as_deref().unwrap_or("N/A"));
        println!("  Category: {}", tx.category.as_deref().unwrap_or("N/A"));
        println!("  Description: {}", tx.description.as_deref().unwrap_or("N/A"));
        println!();
    }

    if transactions.len() > 10 {
        println!("... and {} more transactions", transactions.len() - 10);
    }

    Ok(())
}
