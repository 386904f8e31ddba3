pub mod generate;
pub mod list;
pub mod slug;

use permalink::PathBuilder;

use crate::backend::Backend;
use crate::config::{self, Profile};
use crate::output::OutputFormat;
use crate::serve;

pub enum Command {
    Generate { id: String },
    List,
    Slug { text: Vec<String> },
    Serve { addr: String },
}

/// Run a command against the named profile, with command-line overrides
/// applied on top.
pub async fn run(
    command: Command,
    profile_name: &str,
    overrides: &Profile,
    format: &OutputFormat,
) -> Result<(), String> {
    match command {
        Command::Slug { text } => slug::run(&text, format),
        Command::Generate { id } => {
            let (_, backend, builder) = open(profile_name, overrides).await?;
            generate::run(&backend, &builder, &id, format).await
        }
        Command::List => {
            let (_, backend, builder) = open(profile_name, overrides).await?;
            list::run(&backend, &builder, format).await
        }
        Command::Serve { addr } => {
            let (profile, backend, builder) = open(profile_name, overrides).await?;
            serve::run(&addr, backend, builder, profile.id_field()).await
        }
    }
}

async fn open(
    profile_name: &str,
    overrides: &Profile,
) -> Result<(Profile, Backend, PathBuilder), String> {
    let mut profile = config::load_config(profile_name)?;
    profile.apply_overrides(overrides);
    let options = profile.options();
    let backend = Backend::open(&profile, &options).await?;
    Ok((profile, backend, PathBuilder::new(options)))
}
