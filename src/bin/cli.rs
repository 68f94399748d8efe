use clap::{Parser, Subcommand};
use pill_identifier_engine::{EngineConfig, MatchEntry, PillEngine, PillQuery, PillRecord};
use pill_identifier_engine::store::InsertOutcome;

#[derive(Parser)]
#[command(name = "pill-engine-cli")]
#[command(about = "Pill Identifier Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database path (defaults to DATABASE_PATH or data/pills.db)
    #[arg(short, long)]
    db: Option<String>,

    /// Live JSON pill source base URL (defaults to PILL_SOURCE_URL)
    #[arg(short, long)]
    remote: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify a pill by imprint
    Identify {
        /// Imprint code, e.g. "L484"
        imprint: String,

        #[arg(short, long)]
        color: Option<String>,

        #[arg(short, long)]
        shape: Option<String>,
    },

    /// Suggest imprints for a partial input
    Suggest {
        /// Partial imprint
        q: String,
    },

    /// Rank the local store only, with filters applied to scoring
    Search {
        imprint: String,

        #[arg(short, long)]
        color: Option<String>,

        #[arg(short, long)]
        shape: Option<String>,

        /// Maximum results
        #[arg(short, long, default_value = "3")]
        limit: usize,
    },

    /// Import a JSON array of pill records
    Import {
        /// Path to the JSON file
        path: String,
    },

    /// Add a single pill to the local store
    Add {
        imprint: String,

        drug_name: String,

        #[arg(long, default_value = "")]
        color: String,

        #[arg(long, default_value = "")]
        shape: String,

        #[arg(long, default_value = "")]
        strength: String,

        #[arg(long, default_value = "")]
        drug_class: String,

        #[arg(long, default_value = "")]
        uses: String,
    },

    /// Get local store statistics
    Stats,
}

fn print_entry(index: usize, entry: &MatchEntry) {
    let pill = &entry.pill;
    println!("   {}. {} ({}%)", index + 1, pill.display_name(), entry.confidence);
    println!("      Color/Shape: {} / {}", pill.color, pill.shape);
    println!("      Class: {}", pill.drug_class);
    if let Some(difference) = &entry.difference {
        println!("      {}", difference);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if cli.remote.is_some() {
        config.remote_url = cli.remote;
    }

    let engine = PillEngine::from_config(&config).await?;

    match cli.command {
        Commands::Identify { imprint, color, shape } => {
            println!("Identifying: {}", imprint);

            let query = PillQuery { imprint, color, shape };
            let response = engine.identify(query).await?;

            println!("\nSource: {:?} ({:.2}ms)", response.source, response.latency_ms);

            if response.results.is_empty() {
                println!("\nNo exact matches");
            } else {
                println!("\nMatches:");
                for (i, entry) in response.results.iter().enumerate() {
                    print_entry(i, entry);
                }
            }

            if !response.potential_matches.is_empty() {
                println!("\nPotential matches:");
                for (i, entry) in response.potential_matches.iter().enumerate() {
                    print_entry(i, entry);
                }
            }

            println!("\n{}", response.disclaimer);
        }

        Commands::Suggest { q } => {
            for suggestion in engine.suggest(&q).await {
                println!("{}", suggestion);
            }
        }

        Commands::Search { imprint, color, shape, limit } => {
            let query = PillQuery { imprint, color, shape };
            let ranked = engine.search_local(query, limit).await?;

            if ranked.is_empty() {
                println!("No local matches");
            }
            for (i, candidate) in ranked.iter().enumerate() {
                println!(
                    "   {}. {} ({}%)",
                    i + 1,
                    candidate.pill.display_name(),
                    candidate.confidence_percent()
                );
            }
        }

        Commands::Import { path } => {
            let summary = engine.import_json(&path).await?;
            println!("Imported {} pills, skipped {} duplicates", summary.inserted, summary.skipped);
        }

        Commands::Add { imprint, drug_name, color, shape, strength, drug_class, uses } => {
            let pill = PillRecord::new(imprint, drug_name)
                .with_appearance(color, shape)
                .with_strength(strength)
                .with_class(drug_class, uses);

            match engine.add_pill(pill).await? {
                InsertOutcome::Inserted(id) => println!("Added pill #{}", id),
                InsertOutcome::Duplicate(id) => println!("Already stored as pill #{}", id),
            }
        }

        Commands::Stats => {
            let stats = engine.store_stats().await?;

            println!("Store Statistics:");
            println!("   Total pills: {}", stats.total_pills);
            println!("   Distinct imprints: {}", stats.distinct_imprints);

            if let Some(last) = stats.last_added {
                println!("   Last added: {}", last.format("%Y-%m-%d %H:%M:%S"));
            }
        }
    }

    Ok(())
}
