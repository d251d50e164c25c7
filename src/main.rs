use anyhow::{bail, Context};
use bladekit::{
    default_config_path, generate_program, generate_program_2d, Config, InputPaths,
};
use std::path::PathBuf;

const USAGE: &str = "Usage: bladekit <paths.json> [-c <config.toml|json>] [-o <output.nc>]";

struct Args {
    input: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut input = None;
    let mut config = None;
    let mut output = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                config = Some(PathBuf::from(
                    args.next().context("missing value after -c")?,
                ));
            }
            "-o" | "--output" => {
                output = Some(PathBuf::from(
                    args.next().context("missing value after -o")?,
                ));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other if input.is_none() => input = Some(PathBuf::from(other)),
            other => bail!("unexpected argument '{}'\n{}", other, USAGE),
        }
    }

    match input {
        Some(input) => Ok(Args {
            input,
            config,
            output,
        }),
        None => bail!("no input file given\n{}", USAGE),
    }
}

fn main() -> anyhow::Result<()> {
    bladekit::init_logging()?;
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default(default_config_path()?)?,
    };

    let paths = InputPaths::load(&args.input)?;
    let program = match paths.path_3d() {
        Some(path3d) => generate_program(&paths.path_2d(), &path3d, &config)?,
        None => generate_program_2d(&paths.path_2d(), &config)?,
    };

    for warning in &program.warnings {
        tracing::warn!("{}", warning);
    }

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("nc"));
    program.write_nc(&output)?;
    tracing::info!(
        lines = program.stats.line_count,
        retracts = program.stats.retract_count,
        "wrote {}",
        output.display()
    );
    Ok(())
}
