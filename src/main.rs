mod app;
mod color;
mod config;
mod data;
mod export;
mod figure;
mod state;
mod title;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use env_logger::{Builder, Env, Target};

use app::MriViewerApp;
use config::Cli;
use data::filter::filtered_names;
use data::loader::load_images;
use state::AppState;

fn main() -> Result<()> {
    // Warnings are part of the console output, so log to stdout.
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let cli = Cli::parse();

    match &cli.export {
        Some(png) => export_headless(&cli, png),
        None => run_viewer(cli),
    }
}

/// Load, compose and write the figure without opening a window.
fn export_headless(cli: &Cli, png: &std::path::Path) -> Result<()> {
    let dir = cli
        .dir
        .as_deref()
        .context("--export needs --dir to know where the images are")?;

    let images = load_images(dir, cli.probe)
        .with_context(|| format!("loading {} images", cli.probe.upper_label()))?;
    let visible = filtered_names(&images, &cli.filters());
    let shown = images.retain_names(&visible);

    match figure::compose(&shown, cli.probe) {
        Some(fig) => {
            let manifest = export::write_export(&fig, &cli.render_options(), png)?;
            log::info!("Layout written to {}", manifest.display());
        }
        None => log::info!("Nothing exported"),
    }
    Ok(())
}

fn run_viewer(cli: Cli) -> Result<()> {
    let state = AppState::new(cli.dir.clone(), cli.probe, cli.filters(), cli.render_options());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "MRI Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(MriViewerApp::new(state)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
