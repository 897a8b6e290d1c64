// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyscan CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use polyscan::{
    analyze, convex_hull, export, export_sampled_points_ply, import_point_cloud_simple,
    max_distance_brute_force, mean_distance_brute_force, min_distance_brute_force, FileFormat,
    GeometryBuffer, Point, ScanConfig, SpatialReport,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "polyscan")]
#[command(about = "Polyscan - parallel mesh and point-cloud ingestion with spatial analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./polyscan.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Worker thread count for imports
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// Import on a single thread
    #[arg(long, global = true)]
    single_threaded: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import an OBJ mesh or PLY point cloud and report what was read
    Import {
        /// Input .obj or .ply file
        input: PathBuf,

        /// Write the imported geometry (.obj, .vtk or .ply)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stream PLY input line by line instead of mapping it
        #[arg(long)]
        simple: bool,

        /// Print how many vertices each worker parsed
        #[arg(long)]
        provenance: bool,
    },

    /// Compute spatial statistics
    Stats {
        /// Input .obj or .ply file
        input: PathBuf,

        /// Neighbour count for the mean nearest-neighbour distance
        #[arg(short = 'k', long)]
        neighbors: Option<usize>,

        /// Also run the exhaustive pairwise statistics
        #[arg(long)]
        brute_force: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the convex hull of the input vertices
    Hull {
        /// Input .obj or .ply file
        input: PathBuf,

        /// Output file (.obj, .vtk or .ply)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Export a uniform random sample of the input vertices as a PLY point cloud
    Sample {
        /// Input .obj or .ply file
        input: PathBuf,

        /// Output .ply file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of samples, drawn with replacement
        #[arg(short = 'n', long)]
        count: usize,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Convert between formats
    Convert {
        /// Input .obj or .ply file
        input: PathBuf,

        /// Output file (.obj, .vtk or .ply)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = ScanConfig::from_file(path)?;
            config.apply_env(|key| std::env::var(key).ok())?;
            config
        }
        None => ScanConfig::load()?,
    };
    if cli.single_threaded {
        config.parallel = false;
        config.workers = None;
    }
    if let Some(workers) = cli.workers {
        config.workers = Some(workers);
    }

    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Import {
            input,
            output,
            simple,
            provenance,
        } => import_command(&input, output.as_deref(), simple, provenance, &config),
        Commands::Stats {
            input,
            neighbors,
            brute_force,
            json,
        } => {
            if let Some(k) = neighbors {
                config.neighbors = k;
            }
            stats_command(&input, brute_force, json, &config)
        }
        Commands::Hull { input, output } => hull_command(&input, &output, &config),
        Commands::Sample {
            input,
            output,
            count,
            seed,
        } => {
            let seed = seed.or(config.sample_seed);
            let buffer = load(&input, &config)?;
            export_sampled_points_ply(&buffer, count, &output, seed)?;
            println!(
                "{} Sampled {} points -> {}",
                "✓".green(),
                count.to_string().cyan(),
                output.display()
            );
            Ok(())
        }
        Commands::Convert { input, output } => {
            let buffer = load(&input, &config)?;
            export(&buffer, &output)?;
            println!(
                "{} Converted {} -> {}",
                "✓".green(),
                input.display(),
                output.display()
            );
            Ok(())
        }
        Commands::Version => {
            println!("Polyscan v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// `RUST_LOG` wins, then the configured filter; `--verbose` forces debug
fn init_logging(config: &ScanConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"))
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Read an OBJ mesh or PLY point cloud into a buffer
fn load(input: &Path, config: &ScanConfig) -> Result<GeometryBuffer> {
    let coordinator = config.coordinator();
    let buffer = match FileFormat::from_path(input) {
        Some(FileFormat::Obj) => coordinator
            .import_mesh(input)
            .with_context(|| format!("Failed to import mesh {}", input.display()))?,
        Some(FileFormat::Ply) => GeometryBuffer::from_points(
            coordinator
                .import_point_cloud(input)
                .with_context(|| format!("Failed to import point cloud {}", input.display()))?,
        ),
        _ => bail!(
            "Unsupported input {}: expected a .obj or .ply file",
            input.display()
        ),
    };
    Ok(buffer)
}

fn import_command(
    input: &Path,
    output: Option<&Path>,
    simple: bool,
    provenance: bool,
    config: &ScanConfig,
) -> Result<()> {
    let start = Instant::now();
    let coordinator = config.coordinator();

    let (buffer, workers) = match FileFormat::from_path(input) {
        Some(FileFormat::Ply) if simple => {
            let points = import_point_cloud_simple(input)
                .with_context(|| format!("Failed to import point cloud {}", input.display()))?;
            (GeometryBuffer::from_points(points), Vec::new())
        }
        Some(FileFormat::Obj) => {
            let import = coordinator
                .import_mesh_detailed(input)
                .with_context(|| format!("Failed to import mesh {}", input.display()))?;
            if import.skipped_records > 0 || import.dropped_faces > 0 {
                println!(
                    "{} {} malformed records skipped, {} faces dropped",
                    "⚠".yellow(),
                    import.skipped_records,
                    import.dropped_faces
                );
            }
            (import.buffer, import.worker_vertex_counts)
        }
        _ => (load(input, config)?, Vec::new()),
    };
    let elapsed = start.elapsed();

    println!(
        "{} Imported {} in {:.2?}",
        "✓".green(),
        input.display().to_string().cyan(),
        elapsed
    );
    println!("  {} {}", "Workers:".bright_black(), coordinator.workers());
    println!("  {} {}", "Vertices:".bright_black(), buffer.vertex_count());
    println!("  {} {}", "Polygons:".bright_black(), buffer.polygon_count());
    println!("  {} {}", "Normals:".bright_black(), buffer.normals.len());

    if provenance {
        for (worker, count) in &workers {
            println!("  {} {:>3}: {} vertices", "Worker".bright_black(), worker, count);
        }
    }

    if let Some(output) = output {
        export(&buffer, output)?;
        println!("  {} {}", "Output:".bright_black(), output.display());
    }

    Ok(())
}

/// Exhaustive pairwise distances, reported next to the indexed statistics
#[derive(Debug, Serialize)]
struct BruteForceDistances {
    min: f32,
    max: f32,
    mean: f32,
}

impl BruteForceDistances {
    fn compute(points: &[Point]) -> polyscan::Result<Self> {
        Ok(Self {
            min: min_distance_brute_force(points)?,
            max: max_distance_brute_force(points)?,
            mean: mean_distance_brute_force(points)?,
        })
    }
}

/// Single JSON document: the report fields plus `brute_force` when it was requested
fn stats_document(
    report: &SpatialReport,
    brute_force: Option<&BruteForceDistances>,
) -> serde_json::Result<serde_json::Value> {
    let mut document = serde_json::to_value(report)?;
    if let Some(distances) = brute_force {
        document["brute_force"] = serde_json::to_value(distances)?;
    }
    Ok(document)
}

fn stats_command(input: &Path, brute_force: bool, json: bool, config: &ScanConfig) -> Result<()> {
    let buffer = load(input, config)?;

    let start = Instant::now();
    let report = analyze(&buffer, config.neighbors)?;
    let elapsed = start.elapsed();

    let distances = if brute_force {
        Some(BruteForceDistances::compute(&buffer.vertices)?)
    } else {
        None
    };

    if json {
        let document = stats_document(&report, distances.as_ref())?;
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    report.print();
    println!("  {} {:.2?}", "Analysis time:".bright_black(), elapsed);
    if let Some(distances) = distances {
        println!("{}", "Brute-force reference:".bold());
        println!("  {} {:.6}", "Min distance: ".bright_black(), distances.min);
        println!("  {} {:.6}", "Max distance: ".bright_black(), distances.max);
        println!("  {} {:.6}", "Mean distance:".bright_black(), distances.mean);
    }

    Ok(())
}

fn hull_command(input: &Path, output: &Path, config: &ScanConfig) -> Result<()> {
    let buffer = load(input, config)?;
    let hull = convex_hull(&buffer.vertices)
        .with_context(|| format!("Failed to build convex hull of {}", input.display()))?;
    export(&hull, output)?;

    println!(
        "{} Hull with {} vertices and {} faces -> {}",
        "✓".green(),
        hull.vertex_count().to_string().cyan(),
        hull.polygon_count().to_string().cyan(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_document_is_one_json_object() {
        let buffer = GeometryBuffer {
            vertices: vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(0.0, 2.0, 0.0),
            ],
            ..GeometryBuffer::default()
        };
        let report = analyze(&buffer, 1).unwrap();
        let distances = BruteForceDistances::compute(&buffer.vertices).unwrap();

        let text = serde_json::to_string_pretty(&stats_document(&report, Some(&distances)).unwrap())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["vertex_count"], 3);
        assert_eq!(parsed["brute_force"]["min"], 1.0);
        let max = parsed["brute_force"]["max"].as_f64().unwrap();
        assert!((max - 5.0f64.sqrt()).abs() < 1e-5);

        let plain = stats_document(&report, None).unwrap();
        assert!(plain.get("brute_force").is_none());
    }
}
