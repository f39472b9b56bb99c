use std::io::{self, BufWriter, Read, Write};

use anyhow::{Context, Result};
use clap::Parser;

use maskedit::cli::CliArgs;
use maskedit::script::{parse_script, Session};
use maskedit::PlaygroundConfig;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    maskedit::tracing::init(args.no_log_file);

    let config = match &args.config {
        Some(path) => PlaygroundConfig::load_from(path),
        None => PlaygroundConfig::load(),
    };
    let options = args.options(&config);
    tracing::debug!(?options, "starting playground");

    let source = match args.script_path() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read script from stdin")?;
            buf
        }
    };
    let lines = parse_script(&source)?;

    let mut session = Session::new(options, config.controller_settings())
        .context("Failed to build the input mask")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for line in &lines {
        let report = session.run_line(line)?;
        if args.json {
            serde_json::to_writer(&mut out, &report)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", report)?;
        }
    }
    out.flush()?;

    Ok(())
}
