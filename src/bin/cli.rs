// src/bin/cli.rs
use startlist_tracker::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run()
}
