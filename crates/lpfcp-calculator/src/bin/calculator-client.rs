//! Calculator client - calls a running calculator server.

use anyhow::{Context, Result};
use clap::Parser;
use lpfcp::{HttpTransport, HttpTransportConfig, Proxy};
use lpfcp_calculator::CalculatorClient;
use std::time::Duration;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "calculator-client")]
#[command(about = "Call the calculator over LPFCP")]
struct Args {
    /// Endpoint of the calculator server
    #[arg(short, long, default_value = "http://127.0.0.1:8080/lpfcp")]
    endpoint: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let config = HttpTransportConfig {
        request_timeout: Duration::from_secs(args.timeout),
        ..HttpTransportConfig::default()
    };
    let transport = HttpTransport::with_config(&args.endpoint, config)
        .with_context(|| format!("Cannot call {}", args.endpoint))?;
    let calculator = CalculatorClient::new(Proxy::new(transport));

    println!("{}", calculator.hello().await?);
    println!("add(1, 2) = {}", calculator.add(1, 2).await?);
    println!("subtract(5, 3) = {}", calculator.subtract(5, 3).await?);
    println!(
        "add(\"foo\", \"bar\") = {}",
        calculator
            .add_strings("foo".to_string(), "bar".to_string())
            .await?
    );
    println!(
        "average([1, 2, 3, 4]) = {:?}",
        calculator.average(vec![1.0, 2.0, 3.0, 4.0]).await?
    );

    match calculator.divide(1, 0).await {
        Ok(value) => println!("divide(1, 0) = {}", value),
        Err(e) => println!("divide(1, 0) failed: {}", e),
    }

    match calculator.multiply(2, 3).await {
        Ok(value) => println!("multiply(2, 3) = {}", value),
        Err(e) if e.is_method_not_found() => println!("multiply is not exposed by the server"),
        Err(e) => {
            warn!("multiply failed unexpectedly: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
