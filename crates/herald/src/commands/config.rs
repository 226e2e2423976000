//! Config command

use anyhow::Result;
use camino::Utf8PathBuf;

use crate::cli::{ConfigCommands, ConfigShowArgs};

pub fn run(args: ConfigCommands, config_dir: Option<Utf8PathBuf>) -> Result<()> {
    match args {
        ConfigCommands::Show(args) => show(args, config_dir),
    }
}

fn show(args: ConfigShowArgs, config_dir: Option<Utf8PathBuf>) -> Result<()> {
    let config = super::load_runtime_config(config_dir)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!("{}", serde_yaml_ng::to_string(&config)?);
    }

    Ok(())
}
