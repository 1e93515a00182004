//! Stereoview Terminal - anaglyph line-model viewer
//!
//! Controls:
//!   - Left drag: rotate (keeps spinning after release)
//!   - Mouse wheel: zoom
//!   - Arrow keys: pan
//!   - [ / ]: eye separation, , / .: focus distance
//!   - P: save a snapshot, Q/ESC: quit

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use stereoview_core::{StereoViewer, ViewerConfig};
use stereoview_terminal::{export, model, TerminalApp};

#[derive(Parser)]
#[command(name = "stereoview")]
#[command(about = "Stereoscopic wireframe viewer for the terminal")]
struct Cli {
    /// Model to show: .stl, or a text file of `x1 y1 z1 x2 y2 z2` lines.
    /// Shows a cube when omitted.
    model: Option<PathBuf>,

    /// RON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective config to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    #[arg(long)]
    eye_distance: Option<f64>,

    #[arg(long)]
    eye_target: Option<f64>,

    #[arg(long)]
    zoom: Option<f64>,

    /// Render one frame to this image file instead of starting the viewer
    #[arg(long)]
    export: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Frame the export like the live view instead of the output size
    #[arg(long)]
    window_aspect: bool,

    /// Write logs here; the interactive view owns the terminal
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ViewerConfig> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    if let Some(distance) = cli.eye_distance {
        config.eye_distance = distance;
    }
    if let Some(target) = cli.eye_target {
        config.eye_target = target;
    }
    if let Some(zoom) = cli.zoom {
        config.zoom = zoom;
    }
    if let Some(width) = cli.width {
        config.export.width = width;
    }
    if let Some(height) = cli.height {
        config.export.height = height;
    }
    if cli.window_aspect {
        config.export.window_aspect = true;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = cli.export.is_none() && cli.write_config.is_none();
    if !interactive || cli.log_file.is_some() {
        init_logging(cli.log_file.as_ref())?;
    }

    let config = load_config(&cli)?;

    if let Some(path) = &cli.write_config {
        config.save(path).with_context(|| format!("cannot write config {}", path.display()))?;
        info!("wrote config to {}", path.display());
        return Ok(());
    }

    let sections = match &cli.model {
        Some(path) => model::load_model(path)
            .with_context(|| format!("cannot load model {}", path.display()))?,
        None => model::demo_cube(),
    };

    if let Some(path) = &cli.export {
        let mut viewer = StereoViewer::new(&config);
        viewer.set_data(Arc::from(sections))?;
        let settings = &config.export;
        export::export_view(&viewer, path, settings.width, settings.height, settings.window_aspect)
            .with_context(|| format!("cannot export to {}", path.display()))?;
        return Ok(());
    }

    let mut app = TerminalApp::new(config, sections)?;
    app.run()
}
