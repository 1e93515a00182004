/// Example: Load a model and save one stereo frame as an image
///
/// Usage: cargo run --example snapshot -- [model-file] [output.png]

use std::env;
use std::sync::Arc;
use stereoview_core::{StereoViewer, ViewerConfig};
use stereoview_terminal::{export, model};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let sections = match args.get(1) {
        Some(path) => {
            println!("Loading model: {}", path);
            model::load_model(path)?
        }
        None => {
            eprintln!("Usage: {} [model-file] [output.png]", args[0]);
            eprintln!("\nNo model provided, using default cube...");
            model::demo_cube()
        }
    };
    let output = args.get(2).map(String::as_str).unwrap_or("snapshot.png");

    println!("Loaded {} segments", sections.len());

    let mut viewer = StereoViewer::new(&ViewerConfig::default());
    viewer.set_data(Arc::from(sections))?;
    export::export_view(&viewer, output, 1280, 720, false)?;

    println!("Saved {}", output);
    Ok(())
}
