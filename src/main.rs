mod anim;
mod app;
mod canvas;
mod catalog;
mod config;
mod errors;
mod host;
mod input;
mod logging;
mod panel;
mod regen;
mod render;
mod state;
mod telemetry;
mod term;
mod tracker;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = config::Cli::parse();
    app::run(cli)
}
