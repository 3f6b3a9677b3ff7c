mod cli;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use tfstub::{files, output, providers};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let provider = providers::get_provider(&cli.provider)?;

    let resource = match cli.command {
        Command::Schema(args) => {
            let schema = provider.schema(&args.resource_type)?;
            println!("{}", output::schema_table(schema));
            return Ok(());
        }
        Command::Create(args) => {
            let plan = files::load_plan(&args.plan, args.unknown.as_deref()).await?;
            provider.create(&args.resource_type, plan).await?
        }
        Command::Read(args) => {
            let current = files::load_resource(&args.state).await?;
            provider.read(&current).await?
        }
        Command::Update(args) => {
            let prior = files::load_resource(&args.state).await?;
            let plan = files::load_plan(&args.plan, args.unknown.as_deref()).await?;
            provider.update(&prior, plan).await?
        }
        Command::Import(args) => provider.import(&args.resource_type, &args.id).await?,
        Command::Delete(args) => {
            let current = files::load_resource(&args.state).await?;
            provider.delete(&current).await?;
            return Ok(());
        }
    };

    println!("{}", output::render(&resource, cli.format)?);
    Ok(())
}
