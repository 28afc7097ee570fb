use clap::{Parser, Subcommand};
use selfheal_client::{ClientError, SelfhealClient};
use serde_json::json;

#[derive(Parser)]
#[command(name = "selfheal-cli")]
#[command(about = "Drive a running selfheal-api instance", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000", env = "SELFHEAL_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness probe
    Health,
    /// Readiness probe
    Ready,
    /// Flip the readiness flag
    Toggle,
    /// Service name and status
    Status,
    /// Burn CPU on the service for a while
    Work {
        #[arg(long)]
        ms: Option<u64>,
    },
    /// Make the service retain a buffer forever
    Leak {
        #[arg(long)]
        mb: Option<u64>,
    },
    /// Dump the metrics exposition
    Metrics,
    /// Terminate all service instances
    Restart,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = SelfhealClient::new(&cli.url);

    let result = match cli.command {
        Commands::Health => client.healthz().await.map(|body| json!({ "live": true, "body": body })),
        Commands::Ready => client.readyz().await.map(|ready| json!({ "ready": ready })),
        Commands::Toggle => client.toggle_ready().await.map(|ready| json!({ "ready": ready })),
        Commands::Status => client.status().await.and_then(to_json),
        Commands::Work { ms } => client.work(ms).await.and_then(to_json),
        Commands::Leak { mb } => client.leak(mb).await.and_then(to_json),
        Commands::Metrics => {
            let text = client.metrics().await?;
            print!("{text}");
            return Ok(());
        }
        Commands::Restart => client.restart().await.and_then(to_json),
    };

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn to_json<T: serde::Serialize>(value: T) -> Result<serde_json::Value, ClientError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_to_json_reports_serialization_errors() {
        // JSON object keys must be strings.
        let map = BTreeMap::from([((1u8, 2u8), 3u8)]);
        assert!(matches!(to_json(map), Err(ClientError::Json(_))));
    }

    #[test]
    fn test_to_json_value() {
        let value = to_json(selfheal_client::WorkReport { did_work_ms: 5 }).unwrap();
        assert_eq!(value, json!({ "didWorkMs": 5 }));
    }
}
