use std::fmt::Display;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value as JsonValue};

use crate::accumulate::collect;
use crate::config::{Config, RecordFormat};
use crate::error::FlowError;
use crate::parser::{parse_ranges, RangeDecl};
use crate::range::{Nest, Point};
use crate::scan::{scan, JsonLinesSource, LineSource, Resource, ScanOptions, Source};
use crate::value::Val;

#[derive(Parser)]
#[command(name = "flowkit")]
#[command(about = "Flowkit - range, binding and scan combinators", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every point of a nest of ranges
    Range {
        /// Declarations, e.g. "i = 0 .. 6 by 2, j = 3 ..= 0"
        decls: String,

        /// Print each point as a JSON object
        #[arg(long)]
        json: bool,
    },

    /// Print the records of a file
    Scan {
        /// File to read
        path: PathBuf,

        /// Record format (defaults to scan.format from config)
        #[arg(short = 'f', long = "format", value_enum)]
        format: Option<RecordFormat>,

        /// Treat a missing file as empty instead of failing
        #[arg(long)]
        missing_ok: bool,

        /// Stop after this many records
        #[arg(short = 'l', long = "limit")]
        limit: Option<usize>,
    },

    /// Print the effective configuration
    Config,
}

/// Handle one parsed command with an already-loaded configuration
pub fn run_cli_with_config(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Range { decls, json } => {
            for line in render_points(&decls, json)? {
                println!("{}", line);
            }
        }

        Commands::Scan {
            path,
            format,
            missing_ok,
            limit,
        } => {
            let mut options = config.scan_options();
            if missing_ok {
                options = options.tolerate_missing();
            }
            let limit = limit.or(config.scan.limit);

            let count = match format.unwrap_or(config.scan.format) {
                RecordFormat::Lines => print_records(&LineSource, &path, &options, limit)?,
                RecordFormat::Jsonl => {
                    print_records(&JsonLinesSource::<Val>::new(), &path, &options, limit)?
                }
            };
            tracing::info!(path = %path.display(), count, "scan complete");
        }

        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// One output line per point of the declared nest
pub fn render_points(decls: &str, json: bool) -> Result<Vec<String>> {
    let decls = parse_ranges(decls).context("Invalid range declarations")?;
    let nest = Nest::new(decls.iter().map(RangeDecl::to_range).collect())?;

    let mut outcome = ControlFlow::Continue(());
    let lines = collect(|out| {
        outcome = nest.try_for_each(|point| match render_point(point, json) {
            Ok(line) => {
                out.push(line);
                ControlFlow::Continue(())
            }
            Err(err) => ControlFlow::Break(err),
        });
    });

    match outcome {
        ControlFlow::Break(err) => Err(err),
        ControlFlow::Continue(()) => Ok(lines),
    }
}

fn render_point(point: &Point<'_, f64>, json: bool) -> Result<String> {
    let pairs = point.names().iter().zip(point.values());
    if json {
        let mut obj = Map::new();
        for (name, value) in pairs {
            obj.insert(name.clone(), JsonValue::from(*value));
        }
        Ok(serde_json::to_string(&obj)?)
    } else {
        Ok(pairs
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(" "))
    }
}

fn print_records<S>(
    source: &S,
    path: &Path,
    options: &ScanOptions,
    limit: Option<usize>,
) -> Result<usize>
where
    S: Source,
    <S::Resource as Resource>::Record: Display,
{
    if limit == Some(0) {
        return Ok(0);
    }

    let mut count = 0;
    scan(source, path, options, |record| {
        println!("{}", record);
        count += 1;
        Ok::<_, FlowError>(match limit {
            Some(limit) if count >= limit => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        })
    })
    .with_context(|| format!("Failed to scan {}", path.display()))?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_points_plain() {
        let lines = render_points("i = 0 .. 2, j = 1 ..= 0", false).unwrap();
        assert_eq!(lines, vec!["i=0 j=1", "i=0 j=0", "i=1 j=1", "i=1 j=0"]);
    }

    #[test]
    fn test_render_points_json() {
        let lines = render_points("x = 0 .. 1 by 0.5", true).unwrap();
        assert_eq!(lines, vec![r#"{"x":0.0}"#, r#"{"x":0.5}"#]);
    }

    #[test]
    fn test_render_points_rejects_zero_step() {
        let err = render_points("i = 0 .. 3 by 0", false).unwrap_err();
        assert!(err.to_string().contains("zero step"));
    }

    #[test]
    fn test_cli_parses_scan_flags() {
        let cli = Cli::parse_from([
            "flowkit",
            "scan",
            "data.jsonl",
            "-f",
            "jsonl",
            "--missing-ok",
            "-l",
            "2",
        ]);
        let Commands::Scan {
            path,
            format,
            missing_ok,
            limit,
        } = cli.command
        else {
            unreachable!("Expected scan command");
        };
        assert_eq!(path, PathBuf::from("data.jsonl"));
        assert_eq!(format, Some(RecordFormat::Jsonl));
        assert!(missing_ok);
        assert_eq!(limit, Some(2));
    }
}
