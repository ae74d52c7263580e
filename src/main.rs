use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use vertexenum::export::export_rendering;
use vertexenum::{Config, CornerDetectorKind, LabelColor, Session, Subset};

#[derive(Parser)]
#[command(name = "vertexenum")]
#[command(about = "Detect, classify and number the vertices of a mesh drawing")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// JSON config file; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Cluster merge radius in pixels (3-30)
    #[arg(long)]
    eps: Option<f64>,

    /// Minimum distance between vertices in pixels (2-20)
    #[arg(long)]
    min_dist: Option<f64>,

    /// Neighbors needed for a junction (2-8)
    #[arg(long)]
    junction_threshold: Option<usize>,

    /// Row band tolerance as a fraction of the point cloud height (0.01-0.15)
    #[arg(long)]
    row_tolerance: Option<f64>,

    /// Which points to number
    #[arg(long, value_enum)]
    subset: Option<Subset>,

    #[arg(long, value_enum)]
    color: Option<LabelColor>,

    /// Label font scale (0.3-2.5)
    #[arg(long)]
    font_scale: Option<f64>,

    /// Label stroke thickness (1-5)
    #[arg(long)]
    thickness: Option<u32>,

    #[arg(long, value_enum)]
    detector: Option<CornerDetectorKind>,

    /// Write the numbered image here
    #[arg(long, value_name = "PNG")]
    out_png: Option<PathBuf>,

    /// Write the ordered coordinates here
    #[arg(long, value_name = "CSV")]
    out_csv: Option<PathBuf>,

    /// Write both outputs into this directory under default names
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let detection = &mut config.detection;
        if let Some(v) = self.eps {
            detection.merge_radius = v;
        }
        if let Some(v) = self.min_dist {
            detection.min_distance = v;
        }
        if let Some(v) = self.junction_threshold {
            detection.junction_threshold = v;
        }
        if let Some(v) = self.detector {
            detection.detector = v;
        }

        let render = &mut config.render;
        if let Some(v) = self.row_tolerance {
            render.row_tolerance = v;
        }
        if let Some(v) = self.subset {
            render.subset = v;
        }
        if let Some(v) = self.color {
            render.color = v;
        }
        if let Some(v) = self.font_scale {
            render.font_scale = v;
        }
        if let Some(v) = self.thickness {
            render.thickness = v;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .init();

    let config = args.resolve_config()?;

    let mut session = Session::open(&args.image_path)?;
    if let Some(debug_dir) = &args.debug_out {
        session = session.with_debug(debug_dir.clone())?;
    }

    session.detect(&config.detection)?;
    if let Some(outcome) = session.merge_outcome() {
        if !outcome.converged {
            println!("Note: clustering stopped after {} rounds without converging", outcome.rounds);
        }
    }

    println!("=== Vertex Classification ===");
    println!("{}", session.summary());

    let subset = config.render.subset;
    let png_path = args.out_png.clone().or_else(|| {
        args.out_dir
            .as_ref()
            .map(|dir| dir.join(session.default_output_name(subset, "png")))
    });
    let csv_path = args.out_csv.clone().or_else(|| {
        args.out_dir
            .as_ref()
            .map(|dir| dir.join(session.default_output_name(subset, "csv")))
    });

    let rendering = session.render(&config.render)?;
    if rendering.is_empty() {
        eprintln!("Warning: no {} found; no image or CSV written.", subset.label());
    } else {
        println!("\nNumbered {} {}", rendering.count(), subset.label());
        if args.verbose {
            for (i, p) in rendering.ordered.iter().enumerate() {
                println!("  {:>4}: ({:.2}, {:.2})", i + 1, p.x, p.y);
            }
        }
    }

    let exported = export_rendering(rendering, png_path.as_deref(), csv_path.as_deref())?;
    if let Some(path) = &exported.png {
        println!("Saved image: {}", path.display());
    }
    if let Some(path) = &exported.csv {
        println!("Saved CSV with {} rows: {}", rendering.count(), path.display());
    }

    Ok(())
}
