use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tfstub::output::OutputFormat;
use tfstub::providers::example::{PROVIDER_NAME, RESOURCE_TYPE};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(long, global = true, env = "TFSTUB_PROVIDER", default_value = PROVIDER_NAME)]
    pub provider: String,

    #[arg(
        long,
        global = true,
        env = "TFSTUB_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the attribute table of a resource type
    Schema(SchemaArgs),
    Create(CreateArgs),
    Read(ReadArgs),
    Update(UpdateArgs),
    /// Import an existing object by its external id
    Import(ImportArgs),
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct SchemaArgs {
    #[arg(long, default_value = RESOURCE_TYPE)]
    pub resource_type: String,
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    #[arg(long, default_value = RESOURCE_TYPE)]
    pub resource_type: String,

    /// Planned values as JSON
    #[arg(long)]
    pub plan: PathBuf,

    /// Terraform-style `after_unknown` mask for the plan
    #[arg(long)]
    pub unknown: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ReadArgs {
    /// Resource document produced by a previous command
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    #[arg(long)]
    pub plan: PathBuf,

    #[arg(long)]
    pub unknown: Option<PathBuf>,

    #[arg(long)]
    pub state: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    pub id: String,

    #[arg(long, default_value = RESOURCE_TYPE)]
    pub resource_type: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    #[arg(long)]
    pub state: PathBuf,
}
