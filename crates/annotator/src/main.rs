mod app;
mod keymap;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use document::PngFileIo;
use session::{AnnotatorConfig, AnnotatorController, SampleCatalog, SampleSession};
use winit::event_loop::EventLoop;

use crate::app::App;

#[derive(Parser)]
#[command(author, version, about = "Paint label masks over a folder of images")]
struct Arguments {
    /// Working directory holding `images/`; masks are written to `labels/`.
    #[arg(value_parser)]
    workdir: PathBuf,
    /// JSON file overriding palette, brush and view defaults.
    #[arg(long, short = 'c', value_parser)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let arguments = Arguments::parse();

    let config = match arguments.config.as_deref() {
        Some(path) => AnnotatorConfig::load(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => AnnotatorConfig::default(),
    };

    let catalog = SampleCatalog::scan(&arguments.workdir)
        .with_context(|| format!("scan working directory {}", arguments.workdir.display()))?;
    if catalog.is_empty() {
        anyhow::bail!(
            "no images found in {}",
            arguments.workdir.join(session::IMAGES_DIR).display()
        );
    }

    let (width, height) = (config.window_width, config.window_height);
    let session = SampleSession::new(catalog, PngFileIo);
    let mut controller =
        AnnotatorController::new(config, session, width, height).context("create workbench")?;
    controller.start().context("load first sample")?;

    let event_loop = EventLoop::new().context("create event loop")?;
    let mut app = App::new(controller);
    event_loop.run_app(&mut app).context("run event loop")?;
    app.into_result()
}
