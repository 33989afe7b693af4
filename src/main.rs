use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use imagekit::config::ClientOptions;
use imagekit::logging::{init_subscriber_with_format, LogFormat};
use imagekit::{ImageKit, TransformationChain, TransformationPosition, TransformationStep, UrlOptions};

/// ImageKit command line client - build URLs, sign uploads, inspect files
#[derive(Parser, Debug)]
#[command(name = "imagekit")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file; IMAGEKIT_* environment variables otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a delivery URL
    Url {
        /// Asset path under the URL endpoint
        #[arg(long, conflicts_with = "src")]
        path: Option<String>,

        /// Absolute asset URL
        #[arg(long)]
        src: Option<String>,

        /// One transformation step, e.g. "width=300,height=200"; repeat to chain
        #[arg(long = "step")]
        steps: Vec<String>,

        /// Override the configured transformation position (path or query)
        #[arg(long)]
        position: Option<TransformationPosition>,

        /// Extra query parameter as key=value; repeatable
        #[arg(long = "param")]
        params: Vec<String>,

        /// Sign the URL
        #[arg(long)]
        signed: bool,

        /// Seconds until a signed URL expires
        #[arg(long, requires = "signed")]
        expire: Option<i64>,
    },

    /// Generate upload authentication parameters
    Auth {
        #[arg(long)]
        token: Option<String>,

        /// Unix timestamp at which the parameters expire
        #[arg(long)]
        expire: Option<i64>,
    },

    /// Hamming distance between two perceptual hashes
    Phash { first: String, second: String },

    /// Fetch the details of a file
    Details { file_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_subscriber_with_format(format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let options = match &args.config {
        Some(path) => ClientOptions::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ClientOptions::from_env().context("Failed to load configuration from environment")?,
    };

    tracing::debug!(
        url_endpoint = %options.url_endpoint,
        transformation_position = %options.transformation_position,
        "Configuration loaded"
    );

    let client = ImageKit::new(options)?;

    match args.command {
        Command::Url {
            path,
            src,
            steps,
            position,
            params,
            signed,
            expire,
        } => {
            let mut url_options = match (path, src) {
                (Some(path), None) => UrlOptions::for_path(path),
                (None, Some(src)) => UrlOptions::for_src(src),
                _ => bail!("exactly one of --path or --src is required"),
            };

            url_options.transformation = steps
                .iter()
                .map(|s| TransformationStep::parse_assignments(s))
                .collect::<TransformationChain>();
            url_options.transformation_position = position;
            for param in &params {
                let (key, value) = param
                    .split_once('=')
                    .with_context(|| format!("invalid --param '{}', expected key=value", param))?;
                url_options = url_options.with_query_parameter(key, value);
            }
            if signed {
                url_options = url_options.signed(expire);
            }

            println!("{}", client.url(&url_options)?);
        }
        Command::Auth { token, expire } => {
            let params = client.get_authentication_parameters(token.as_deref(), expire)?;
            println!("{}", serde_json::to_string_pretty(&params)?);
        }
        Command::Phash { first, second } => {
            println!("{}", client.phash_distance(&first, &second)?);
        }
        Command::Details { file_id } => {
            let file = client.get_file_details(&file_id).await?;
            println!("{}", serde_json::to_string_pretty(&file)?);
        }
    }

    Ok(())
}
