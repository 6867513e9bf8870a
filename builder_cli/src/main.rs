//! vagabond-builder - Build a character against a JSON content library

mod sheet;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use vagabond_core::builder::CharacterBuilder;
use vagabond_core::config::{default_rules, load_rules};
use vagabond_core::host::{ContentLibrary, HostPorts, MemoryHost, RngDice, TomlLocalizer};
use vagabond_core::Character;

const DEFAULT_LIBRARY: &str = include_str!("../content/library.json");
const ACTOR_ID: &str = "cli-hero";

#[derive(Parser)]
#[command(name = "vagabond-builder")]
#[command(about = "Create a Vagabond character", long_about = None)]
struct Cli {
    /// Content library JSON (defaults to the bundled sample)
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// Rules TOML (defaults to the bundled rules)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Print the finished character as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Randomize every step and commit
    Random {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Commit an explicit selection
    Build {
        #[arg(long)]
        ancestry: String,
        #[arg(long)]
        class: String,
        /// Stat array 1-12, dealt onto stats in order
        #[arg(long)]
        array: u8,
        #[arg(long = "skill")]
        skills: Vec<String>,
        #[arg(long = "perk")]
        perks: Vec<String>,
        #[arg(long = "spell")]
        spells: Vec<String>,
        #[arg(long)]
        pack: Option<String>,
        #[arg(long = "gear")]
        gear: Vec<String>,
    },
    /// List the twelve stat arrays
    Arrays,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rules = match &cli.rules {
        Some(path) => load_rules(path).with_context(|| format!("loading {}", path.display()))?,
        None => default_rules(),
    };

    if let Command::Arrays = cli.command {
        for array in &rules.stat_arrays {
            println!("{:>2}: {:?}", array.id, array.values);
        }
        return Ok(());
    }

    let content = match &cli.library {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => DEFAULT_LIBRARY.to_string(),
    };
    let library = ContentLibrary::from_json(&content)?;
    let host = Arc::new(MemoryHost::from_library(library).await);
    host.insert_actor(Character::new(ACTOR_ID, "Wanderer")).await;

    let seed = match &cli.command {
        Command::Random { seed: Some(seed) } => *seed,
        _ => rand::random(),
    };
    tracing::info!(seed, "starting builder");
    let ports = HostPorts::memory(
        host.clone(),
        Arc::new(TomlLocalizer::english()),
        Arc::new(RngDice::seeded(seed)),
    );
    let mut builder = CharacterBuilder::with_rng(ports, rules.clone(), StdRng::seed_from_u64(seed));

    match cli.command {
        Command::Random { .. } => builder.randomize_all().await?,
        Command::Build { ancestry, class, array, skills, perks, spells, pack, gear } => {
            builder.select_ancestry(&ancestry).await?;
            builder.select_class(&class).await?;
            builder.select_array(array)?;
            builder.auto_assign_stats()?;
            for skill in &skills {
                builder.train_skill(skill)?;
            }
            for perk in &perks {
                builder.add_perk(perk).await?;
            }
            for spell in &spells {
                builder.add_spell(spell).await?;
            }
            if let Some(pack) = &pack {
                builder.select_starting_pack(pack).await?;
            }
            for item in &gear {
                builder.add_gear(item).await?;
            }
        }
        Command::Arrays => {}
    }

    let economy = builder.economy();
    let report = builder.finish(ACTOR_ID).await?;
    for notice in host.notices() {
        eprintln!("[{:?}] {}", notice.level, notice.message);
    }

    let Some(mut character) = host.actor(ACTOR_ID).await else {
        bail!("character {} vanished after commit", ACTOR_ID);
    };
    character.prepare_derived_data(&rules);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&sheet::json(&character, &report))?);
    } else {
        print!("{}", sheet::render(&character, &economy));
    }
    Ok(())
}
