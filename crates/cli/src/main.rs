use clap::{Parser, Subcommand};
use nlq_core::{
    intent_to_wire, Action, CoreConfig, QueryService, ResultSet, ResultSummary, EXAMPLE_QUERIES,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "nlq")]
#[command(about = "Natural-language FHIR query CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query and print the synthetic patients it produces
    Query {
        /// Free-text query, e.g. "Show me all diabetic patients over 50"
        text: String,
        /// Fixed rng seed, overriding NLQ_SEED
        #[arg(long)]
        seed: Option<u64>,
        /// Print the full JSON response instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print only the intent extracted from a query
    Extract {
        /// Free-text query
        text: String,
    },
    /// List sample queries
    Examples,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Some(Commands::Query { text, seed, json }) => {
            let mut cfg = CoreConfig::from_env()?;
            if seed.is_some() {
                cfg = cfg.with_seed(seed);
            }
            let service = QueryService::new(Arc::new(cfg))?;
            let result = service.process(&text)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result.to_response())?);
            } else {
                print_table(&result);
            }
        }
        Some(Commands::Extract { text }) => {
            let service = QueryService::new(Arc::new(CoreConfig::from_env()?))?;
            let filters = service.extract(&text)?;
            println!("{}", serde_json::to_string_pretty(&intent_to_wire(&filters))?);
        }
        Some(Commands::Examples) => {
            for example in EXAMPLE_QUERIES {
                println!("{}", example);
            }
        }
        None => {
            println!("Use 'nlq --help' for commands");
        }
    }

    Ok(())
}

fn print_table(result: &ResultSet) {
    println!("Query:  {}", result.query);
    println!("Search: {}", result.search.url());
    println!();

    if result.records.is_empty() {
        println!("No patients match.");
        return;
    }

    if result.filters.action == Action::Count {
        println!("Total: {}", result.records.len());
        return;
    }

    println!(
        "{:<8}  {:<24}  {:<6}  {:>3}  {:<10}  {:<32}  {:<10}",
        "ID", "Name", "Gender", "Age", "Born", "Condition", "Last visit"
    );
    for record in &result.records {
        println!(
            "{:<8}  {:<24}  {:<6}  {:>3}  {:<10}  {:<32}  {:<10}",
            &record.id[..8],
            record.name(),
            record.gender,
            record.age,
            record.birth_date,
            record.condition_label(),
            record.last_visit_date
        );
    }

    let summary = ResultSummary::from_records(&result.records);
    println!();
    println!(
        "Total: {}  (male {}, female {})",
        summary.total, summary.male, summary.female
    );
    if let Some(mean) = ResultSummary::mean_age(&result.records) {
        println!("Mean age: {:.1}", mean);
    }
    for (label, count) in summary.labelled_buckets() {
        println!("  {:<7} {}", label, "#".repeat(count));
    }
}
