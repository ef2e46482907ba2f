use std::path::{Path, PathBuf};

use anyhow::Context;
use catalog_core::{CoreProduct, ProductAdapter};
use catalog_prestashop::PrestashopClient;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Sync core product records with a PrestaShop webservice")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one product and print it as JSON
    Get { id: i64 },
    /// Create a product (with images and initial stock) from a JSON record
    Create { file: PathBuf },
    /// Replace an existing product from a JSON record carrying its id
    Update { file: PathBuf },
    /// List the product ids of one page
    Search {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 50)]
        page_size: u32,
    },
    /// Print the id of a tag, creating the tag if needed
    Tag { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Also reads `.env` from the working directory.
    let config = catalog_prestashop::load_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = PrestashopClient::new(&config)?;
    tracing::debug!(base_url = %config.base_url, "webservice client ready");
    run(&client, cli.command).await
}

async fn run<A>(adapter: &A, command: Commands) -> anyhow::Result<()>
where
    A: ProductAdapter,
{
    match command {
        Commands::Get { id } => {
            let product = adapter.get_product(id).await?;
            print_json(&product)?;
        }
        Commands::Create { file } => {
            let product = read_product(&file)?;
            let created = adapter.create_product(&product).await?;
            print_json(&created)?;
        }
        Commands::Update { file } => {
            let product = read_product(&file)?;
            let updated = adapter.update_product(&product).await?;
            print_json(&updated)?;
        }
        Commands::Search { page, page_size } => {
            for id in adapter.search_ids(page, page_size).await? {
                println!("{id}");
            }
        }
        Commands::Tag { name } => {
            let id = adapter.find_or_create_tag(&name).await?;
            println!("{id}");
        }
    }
    Ok(())
}

fn read_product(path: &Path) -> anyhow::Result<CoreProduct> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a product record", path.display()))
}

fn print_json(product: &CoreProduct) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(product)?);
    Ok(())
}
