//! Preset management commands.

use clap::{Args, Subcommand};
use overtone_config::{
    Preset, ensure_user_presets_dir, factory_presets, get_factory_preset, list_user_presets,
    preset_name_from_path, resolve_preset, user_config_dir, user_presets_dir, validate_preset,
};

use super::common::ParamArgs;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Show a preset as TOML
    Show {
        /// Preset name or path
        name: String,
    },

    /// Save parameter values as a user preset
    Save {
        /// Name for the new preset
        name: String,

        #[command(flatten)]
        params: ParamArgs,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Overwrite if preset already exists
        #[arg(long)]
        force: bool,
    },

    /// Copy a factory preset to user presets for customization
    Copy {
        /// Factory preset name
        source: String,

        /// New preset name (defaults to the source name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => list_presets(!user, !factory),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Save {
            name,
            params,
            description,
            force,
        } => save_preset(&name, &params, description, force),
        PresetsCommand::Copy { source, name } => copy_preset(&source, name.as_deref()),
        PresetsCommand::Paths => {
            println!("User presets: {}", user_presets_dir().display());
            println!("Config dir:   {}", user_config_dir().display());
            Ok(())
        }
    }
}

fn list_presets(show_factory: bool, show_user: bool) -> anyhow::Result<()> {
    if show_factory {
        println!("Factory Presets:");
        for preset in factory_presets() {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:20} - {}", preset.name, desc);
        }
        println!();
    }

    if show_user {
        println!("User Presets:");
        let paths = list_user_presets();
        if paths.is_empty() {
            println!("  (none)");
        }
        for path in paths {
            let name = preset_name_from_path(&path).unwrap_or_else(|| "unknown".into());
            match Preset::load(&path) {
                Ok(preset) => {
                    println!("  {:20} - {}", name, preset.description.as_deref().unwrap_or(""));
                }
                Err(err) => println!("  {name:20} - (error: {err})"),
            }
        }
        println!();
    }

    Ok(())
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = resolve_preset(name)?;
    print!("{}", preset.to_toml()?);
    Ok(())
}

fn save_preset(
    name: &str,
    params: &ParamArgs,
    description: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let dir = ensure_user_presets_dir()?;
    let path = dir.join(format!("{name}.toml"));
    if path.exists() && !force {
        anyhow::bail!("Preset '{name}' already exists. Use --force to overwrite.");
    }

    let (snapshot, base) = params.resolve()?;
    let mut preset = Preset::new(name).with_params(snapshot);
    if let Some(engine) = base.and_then(|p| p.engine) {
        preset = preset.with_engine(engine);
    }
    if let Some(desc) = description {
        preset = preset.with_description(desc);
    }
    validate_preset(&preset)?;
    preset.save(&path)?;

    println!("Saved preset '{name}' to {}", path.display());
    Ok(())
}

fn copy_preset(source: &str, new_name: Option<&str>) -> anyhow::Result<()> {
    let factory = get_factory_preset(source)
        .ok_or_else(|| anyhow::anyhow!("Factory preset '{source}' not found."))?;
    let target = new_name.unwrap_or(source);

    let path = ensure_user_presets_dir()?.join(format!("{target}.toml"));
    if path.exists() {
        anyhow::bail!("Preset '{target}' already exists. Choose a different name with --name.");
    }

    let copy = Preset {
        name: target.to_string(),
        ..factory
    };
    copy.save(&path)?;

    println!("Copied factory preset '{source}' to {}", path.display());
    Ok(())
}
