//! Development tasks for ytloop.
//!
//! `cargo run -p xtask -- man [--out DIR]` writes man pages for `ytloop` and
//! each of its subcommands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_mangen::Man;

use ytloop::cli::Cli;

#[derive(Parser)]
#[command(name = "xtask", about = "ytloop development tasks")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages
    Man {
        /// Output directory
        #[arg(long, default_value = "target/man")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    match Xtask::parse().task {
        Task::Man { out } => generate_man_pages(&out),
    }
}

fn generate_man_pages(out: &Path) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;

    let cmd = Cli::command();
    write_page(&cmd, "ytloop", out)?;

    for sub in cmd.get_subcommands() {
        let name = format!("ytloop-{}", sub.get_name());
        let sub = sub.clone().name(name.clone());
        write_page(&sub, &name, out)?;
    }
    Ok(())
}

fn write_page(cmd: &clap::Command, name: &str, out: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    Man::new(cmd.clone()).render(&mut buffer)?;

    let path = out.join(format!("{}.1", name));
    fs::write(&path, buffer).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}
