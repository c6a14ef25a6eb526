use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use spdlog::{info, warn};

use blogml2hugo::blogml::read_blog_file;
use blogml2hugo::config::{open_config, Config};
use blogml2hugo::driver::convert_blog;
use blogml2hugo::logger::configure_logger;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// BlogML export to convert
    input: Option<PathBuf>,

    /// Directory the Markdown files are written to
    out_dir: Option<PathBuf>,

    /// Config path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,
}

fn run(input: &Path, out_dir: &Path, config: &Config) -> Result<usize> {
    let blog = read_blog_file(input)
        .with_context(|| format!("Unable to read {}", input.display()))?;
    info!("Read {} posts and {} categories from {}", blog.posts.len(), blog.categories.len(), input.display());

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Unable to create {}", out_dir.display()))?;

    let count = convert_blog(&blog, config, out_dir)
        .with_context(|| format!("Unable to convert {}", input.display()))?;
    Ok(count)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (Some(input), Some(out_dir)) = (args.input, args.out_dir) else {
        eprintln!("Usage: blogml2hugo <INPUT> <OUT_DIR>");
        eprintln!("Please run blogml2hugo --help");
        return ExitCode::from(1);
    };

    if !input.is_file() {
        eprintln!("File not found: {}", input.display());
        return ExitCode::from(1);
    }

    let config = match open_config(args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(1);
        }
    };

    if let Err(err) = configure_logger(&config.log, args.verbose) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    match run(&input, &out_dir, &config) {
        Ok(count) => {
            println!("Converted {} posts", count);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:?}", err);
            ExitCode::from(2)
        }
    }
}
