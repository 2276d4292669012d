//! CLI for Accessorize - add accessories to photos.

use accessorize::{encode_file, Accessory, EditClient, ImageEditor};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "accessorize")]
#[command(about = "Add accessories to a photo via Gemini image editing")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    edit: EditArgs,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the accessory presets
    Presets,
}

#[derive(Args)]
struct EditArgs {
    /// Photo to edit
    input: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Accessory preset to apply
    #[arg(short, long, value_enum, default_value = "sunglasses")]
    accessory: AccessoryArg,

    /// Custom instruction (overrides the preset's instruction, keeps its label)
    #[arg(short, long)]
    instruction: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AccessoryArg {
    Sunglasses,
    PartyHat,
}

impl From<AccessoryArg> for Accessory {
    fn from(arg: AccessoryArg) -> Self {
        match arg {
            AccessoryArg::Sunglasses => Accessory::Sunglasses,
            AccessoryArg::PartyHat => Accessory::PartyHat,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Presets) => list_presets(cli.json)?,
        None => edit_image(cli.edit, cli.json).await?,
    }

    Ok(())
}

async fn edit_image(args: EditArgs, json_output: bool) -> anyhow::Result<()> {
    // Missing credentials are fatal before anything else happens.
    let client = EditClient::builder().build()?;

    let Some(input) = args.input else {
        anyhow::bail!("an input image is required");
    };
    let Some(output) = args.output else {
        anyhow::bail!("--output is required");
    };

    let accessory = Accessory::from(args.accessory);
    let instruction = args
        .instruction
        .unwrap_or_else(|| accessory.instruction().to_string());

    let image = encode_file(&input).await?;
    let edited = client.transform(&image, &instruction).await?;
    edited.save(&output)?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "input": input.display().to_string(),
            "output": output.display().to_string(),
            "mime_type": edited.mime_type(),
            "accessory": accessory,
            "label": accessory.label(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Edited image: {} ({})", output.display(), edited.mime_type());
        println!("{}", accessory.label());
    }

    Ok(())
}

fn list_presets(json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct PresetInfo {
        name: String,
        label: &'static str,
        instruction: &'static str,
    }

    let presets: Vec<PresetInfo> = Accessory::ALL
        .iter()
        .map(|a| PresetInfo {
            name: a.to_string(),
            label: a.label(),
            instruction: a.instruction(),
        })
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&presets)?);
    } else {
        println!("Accessory presets:\n");
        for p in &presets {
            println!("  {} - {}", p.name, p.label);
            println!("    {}", p.instruction);
        }
    }

    Ok(())
}
