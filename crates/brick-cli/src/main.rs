//! brickforge CLI - drive the placement engine from snapshot files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use brick_kernel::brick_mesh::stl::to_stl_bytes;
use brick_kernel::{Catalog, Category, EngineConfig, Scene, SceneSnapshot};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "brickforge")]
#[command(about = "Snap-together brick placement engine", long_about = None)]
struct Cli {
    /// Engine config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List part definitions
    Catalog {
        /// Only list one category (basic, slope, round, technic, special, ...)
        #[arg(short, long)]
        category: Option<Category>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export a scene snapshot to LDraw
    Export {
        /// Input snapshot (.json)
        input: PathBuf,
        /// Output model (.ldr)
        output: PathBuf,
        /// Group parts by build step
        #[arg(long)]
        steps: bool,
        /// Author line (default from config)
        #[arg(short, long)]
        author: Option<String>,
    },
    /// Display information about a scene snapshot
    Info {
        /// Input snapshot (.json)
        file: PathBuf,
    },
    /// Write the generated mesh of a part definition as binary STL
    Mesh {
        /// Part definition id, e.g. brick_2x4
        part: String,
        /// Output file (.stl)
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brick_kernel=info,brickforge=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    tracing::debug!(snap_distance = config.snap_distance, "engine config ready");

    match cli.command {
        Commands::Catalog { category, json } => list_catalog(category, json)?,
        Commands::Export {
            input,
            output,
            steps,
            author,
        } => {
            let mut config = config;
            if let Some(author) = author {
                config.export.author = author;
            }
            export_ldraw(&input, &output, steps, config)?;
        }
        Commands::Info { file } => show_info(&file, config)?,
        Commands::Mesh { part, output } => export_mesh(&part, &output, config)?,
    }

    Ok(())
}

fn load_scene(path: &Path, config: EngineConfig) -> Result<Scene> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let snapshot = SceneSnapshot::from_json(&json)?;
    Ok(Scene::from_snapshot(Arc::new(Catalog::standard()), config, snapshot)?)
}

fn list_catalog(category: Option<Category>, json: bool) -> Result<()> {
    let catalog = Catalog::standard();
    let defs: Vec<_> = match category {
        Some(category) => catalog.by_category(category).collect(),
        None => catalog.all().collect(),
    };

    if json {
        let entries: Vec<_> = defs
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id,
                    "ldraw": d.ldraw_file(),
                    "name": d.name,
                    "category": d.category.as_str(),
                    "shape": d.shape.kind_name(),
                    "size": [d.width, d.depth, d.height],
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for d in defs {
        println!(
            "{:<24} {:<10} {:<9} {}x{}x{:<3} {}",
            d.id,
            d.ldraw_file(),
            d.category.as_str(),
            d.width,
            d.depth,
            d.height,
            d.name
        );
    }
    Ok(())
}

fn export_ldraw(input: &Path, output: &Path, steps: bool, config: EngineConfig) -> Result<()> {
    let scene = load_scene(input, config)?;
    let export = if steps {
        scene.export_ldraw_with_steps()
    } else {
        scene.export_ldraw()
    };
    fs::write(output, &export.text)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if !export.skipped.is_empty() {
        eprintln!(
            "Skipped {} part(s) with unknown definitions: {}",
            export.skipped.len(),
            export.skipped.join(", ")
        );
    }
    println!("Exported LDraw to {}", output.display());
    Ok(())
}

fn show_info(file: &Path, config: EngineConfig) -> Result<()> {
    let scene = load_scene(file, config)?;
    let stats = scene.stats();

    println!("brickforge scene: {}", file.display());
    println!("  Name: {}", scene.name());
    println!("  Parts: {}", stats.part_count);
    println!("  Connections: {}", stats.connection_count);
    println!("  Total mass: {:.1} g", stats.total_mass);
    if let Some(bounds) = stats.bounds {
        let size = bounds.max - bounds.min;
        println!(
            "  Bounds: {:.1} x {:.1} x {:.1} mm",
            size.x, size.y, size.z
        );
    }

    if !scene.is_empty() {
        println!("\nParts:");
        for part in scene.parts() {
            println!(
                "  {}: {} at ({:.1}, {:.1}, {:.1}), {} connection(s)",
                part.id,
                part.definition_id,
                part.position.x,
                part.position.y,
                part.position.z,
                part.connections.len()
            );
        }
    }

    if !stats.floating.is_empty() {
        println!("\nFloating parts: {}", stats.floating.join(", "));
    }
    Ok(())
}

fn export_mesh(part: &str, output: &Path, config: EngineConfig) -> Result<()> {
    let scene = Scene::new(Arc::new(Catalog::standard()), config);
    let mesh = scene
        .geometry(part)
        .ok_or_else(|| anyhow::anyhow!("Unknown part definition: {}", part))?;
    fs::write(output, to_stl_bytes(&mesh))
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Exported {} ({} triangles) to {}",
        part,
        mesh.num_triangles(),
        output.display()
    );
    Ok(())
}
