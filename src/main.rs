use anyhow::{anyhow, Context, Error};
use clap::{Parser, Subcommand};
use influxdb_http_client::{AsyncClient, ClientConfig, Precision, QueryOptions, Reply, WriteOptions};
use std::io::Read;
use tracing_subscriber::EnvFilter;

// Connection settings come from the influxdb_* environment variables; the
// flags below override them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    // Server host name, overrides influxdb_host
    #[arg(long)]
    host: Option<String>,

    // Server port, overrides influxdb_port
    #[arg(short, long)]
    port: Option<u16>,

    // Database to write to or query, overrides influxdb_database
    #[arg(short, long)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    // Check that the server is reachable
    Ping,

    // Write line protocol given as an argument, or read from stdin
    Write {
        lines: Option<String>,

        // Timestamp precision of the lines: ns, u, ms, s, m or h
        #[arg(long)]
        precision: Option<Precision>,
    },

    // Run an InfluxQL query and print the response body
    Query {
        query: String,

        #[arg(long, default_value = "ns")]
        epoch: Precision,

        #[arg(long)]
        pretty: bool,

        #[arg(long)]
        chunk_size: Option<usize>,
    },
}

fn load_config(args: &Args) -> Result<ClientConfig, Error> {
    let mut config = ClientConfig::from_env_with(args.host.clone(), args.port)
        .context("Failed to load client configuration")?;
    if let Some(database) = &args.database {
        config = config.database(database);
    }
    Ok(config)
}

fn report(reply: Reply) -> Result<(), Error> {
    println!("{} ({})", reply.status, reply.response.status);
    let body = reply.response.text();
    if !body.is_empty() {
        println!("{}", body);
    }
    if reply.is_success() {
        Ok(())
    } else {
        Err(anyhow!("request failed: {}", reply.status))
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let client = AsyncClient::new(&config)?;

    let reply = match args.command {
        Command::Ping => client.ping().await?,
        Command::Write { lines, precision } => {
            let lines = match lines {
                Some(lines) => lines,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("Failed to read line protocol from stdin")?;
                    buffer
                }
            };
            let options = WriteOptions {
                precision,
                ..Default::default()
            };
            client.write(lines.trim_end(), &options).await?
        }
        Command::Query {
            query,
            epoch,
            pretty,
            chunk_size,
        } => {
            let options = QueryOptions {
                epoch,
                pretty,
                chunked: chunk_size.is_some(),
                chunk_size,
                ..Default::default()
            };
            client.query(&query, &options).await?
        }
    };

    client.close();
    report(reply)
}
