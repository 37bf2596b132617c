use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "menu-cli")]
#[command(about = "Client for the mock menu service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// List the whole menu
    List,
    /// Fetch one menu item
    Get {
        /// Menu item ID
        id: String,
    },
    /// Hit the list endpoint repeatedly and tally status codes
    Probe {
        #[arg(short, long, default_value_t = 100)]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::List => {
            let res = client.get(format!("{}/api/menu", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Get { id } => {
            let res = client.get(format!("{}/api/menu/{}", base, id)).send().await?;
            print_response(res).await?;
        }
        Commands::Probe { count } => {
            let url = format!("{}/api/menu", base);
            let mut tally: BTreeMap<u16, u32> = BTreeMap::new();
            for _ in 0..count {
                let res = client.get(&url).send().await?;
                *tally.entry(res.status().as_u16()).or_default() += 1;
            }

            for (status, hits) in &tally {
                println!("{}: {}", status, hits);
            }
            let failures: u32 = tally
                .iter()
                .filter(|(status, _)| **status >= 500)
                .map(|(_, hits)| *hits)
                .sum();
            if count > 0 {
                println!(
                    "failure rate: {:.1}%",
                    f64::from(failures) * 100.0 / f64::from(count)
                );
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
