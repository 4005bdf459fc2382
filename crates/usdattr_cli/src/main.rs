mod args;

use std::path::Path;

use anyhow::{bail, Result};
use usdattr_core::settings::SETTINGS_FILE;
use usdattr_core::{find_prim_path, Settings};
use usdattr_nodes::{PinValue, StageActor, UsdAttributeLibrary};

use args::{parse_args, Cli, Command};

fn load_settings(cli: &Cli) -> Result<Settings> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::load_or_default(SETTINGS_FILE)?,
    };
    Ok(settings)
}

fn open(file: &Path, settings: &Settings) -> Result<StageActor> {
    let mut actor = StageActor::load(file)?;
    actor.apply_settings(settings);
    Ok(actor)
}

fn run(cli: Cli, settings: &Settings) -> Result<()> {
    match cli.command {
        Command::Tree { file } => {
            let actor = open(&file, settings)?;
            let Some(stage) = actor.stage() else {
                bail!("No stage loaded from {}", file.display());
            };

            if let Some((start, end)) = stage.time_code_range() {
                println!("# time codes {} to {}", start, end);
            }
            for prim in stage.traverse() {
                let depth = prim.path.elements().count().saturating_sub(1);
                let type_name = if prim.type_name.is_empty() { "-" } else { &prim.type_name };
                println!("{}{} [{}]", "  ".repeat(depth), prim.name, type_name);
            }
        }
        Command::Find { file, prim } => {
            let actor = open(&file, settings)?;
            let Some(stage) = actor.stage() else {
                bail!("No stage loaded from {}", file.display());
            };

            let path = find_prim_path(stage.pseudo_root(), &prim);
            if path.is_empty() {
                bail!("No prim named '{}'", prim);
            }
            println!("{}", path);
        }
        Command::Get {
            file,
            prim,
            attr,
            kind,
            time,
        } => {
            let actor = open(&file, settings)?;

            let mut args = vec![PinValue::from(prim.as_str()), PinValue::from(attr.as_str())];
            if let Some(t) = time {
                args.push(PinValue::Double(t));
            }
            let node = kind.node_name(time.is_some());
            let value = UsdAttributeLibrary::call(&node, Some(&actor), &args)?;
            println!("{}", value);
        }
        Command::Nodes => {
            println!("{}", UsdAttributeLibrary::to_json()?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;
    let settings = load_settings(&cli)?;

    // RUST_LOG takes precedence over the configured level
    env_logger::Builder::new()
        .filter_level(settings.level_filter())
        .parse_default_env()
        .init();

    log::debug!("Running {:?}", cli.command);
    run(cli, &settings)
}
