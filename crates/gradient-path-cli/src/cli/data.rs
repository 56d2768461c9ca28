//! Data command implementation - segments, flattened samples or outlines as JSON.

use std::error::Error;
use std::fs;

use log::info;
use serde::Serialize;

use gradient_path::{PolylinePath, SegmentSet, gradient_data, load_path_from_svg};

use super::common::{flag_value, parse_flag, read_input};
use super::config::SamplingArgs;

/// A sample in JSON output format.
#[derive(Serialize)]
struct JsonSample {
    x: f64,
    y: f64,
    progress: f64,
}

/// A flattened sample, tagged with its segment.
#[derive(Serialize)]
struct JsonFlatSample {
    x: f64,
    y: f64,
    progress: f64,
    id: usize,
}

/// An outline vertex.
#[derive(Serialize)]
struct JsonPoint {
    x: f64,
    y: f64,
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonOutput {
    Segments { segments: Vec<Vec<JsonSample>> },
    Flat { samples: Vec<JsonFlatSample> },
    Outlines { outlines: Vec<Vec<JsonPoint>> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DataMode {
    Segments,
    Flat,
    Outline(f64),
}

/// Execute the data command.
pub fn cmd_data(args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut svg_path: Option<&str> = None;
    let mut path_data: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut mode = DataMode::Segments;
    let mut sampling = SamplingArgs::default();

    let mut i = 0;
    while i < args.len() {
        if sampling.take_flag(args, &mut i)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "-d" | "--path-data" => path_data = Some(flag_value(args, &mut i)?),
            "--flat" => mode = DataMode::Flat,
            "--outline" => mode = DataMode::Outline(parse_flag(args, &mut i)?),
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i)?),
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            path if path == "-" || !path.starts_with('-') => {
                if svg_path.is_none() {
                    svg_path = Some(path);
                }
            }
            other => return Err(format!("Unknown option: {}", other).into()),
        }
        i += 1;
    }

    let settings = sampling.resolve()?.validate()?;

    let geometry = match (path_data, svg_path) {
        (Some(d), _) => PolylinePath::from_path_data(d)?,
        (None, Some(path)) => load_path_from_svg(&read_input(path)?, settings.source.as_deref())?,
        (None, None) => return Err("SVG file or --path-data required".into()),
    };

    let set = gradient_data(&geometry, settings.segments, settings.samples, settings.precision)?;
    info!("Sampled {} segments ({} samples)", set.len(), set.samples().len());

    let json = serde_json::to_string(&to_json(&set, mode, settings.precision)?)?;

    match output_path {
        Some(path) => {
            fs::write(path, &json)?;
            info!("Wrote: {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn to_json(
    set: &SegmentSet,
    mode: DataMode,
    precision: Option<u32>,
) -> Result<JsonOutput, gradient_path::GradientError> {
    Ok(match mode {
        DataMode::Segments => JsonOutput::Segments {
            segments: set
                .iter()
                .map(|segment| {
                    segment
                        .samples
                        .iter()
                        .map(|s| JsonSample { x: s.x, y: s.y, progress: s.progress })
                        .collect()
                })
                .collect(),
        },
        DataMode::Flat => JsonOutput::Flat {
            samples: set
                .flatten()
                .into_iter()
                .map(|s| JsonFlatSample { x: s.x, y: s.y, progress: s.progress, id: s.id })
                .collect(),
        },
        DataMode::Outline(width) => JsonOutput::Outlines {
            outlines: set
                .outlines(width, precision)?
                .into_iter()
                .map(|outline| outline.into_iter().map(|p| JsonPoint { x: p.x, y: p.y }).collect())
                .collect(),
        },
    })
}

fn print_usage() {
    eprintln!("gradient-path data - Print sampled segments as JSON");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    gradient-path data <svg|-> [OPTIONS]");
    eprintln!("    gradient-path data --path-data <d> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -c, --config <file>       Gradient YAML file (sampling keys only)");
    eprintln!("    -s, --segments <n>        Number of segments (default: 10)");
    eprintln!("    -n, --samples <n>         Samples per segment (default: 5)");
    eprintln!("    -p, --precision <n>       Fractional digits kept (default: 2)");
    eprintln!("        --no-round            Keep full coordinate precision");
    eprintln!("        --id <id>             Source path id (default: first path)");
    eprintln!("    -d, --path-data <d>       Use a bare path string instead of an SVG");
    eprintln!("        --flat                Flattened samples tagged with segment ids");
    eprintln!("        --outline <w>         Outline polygons of width w");
    eprintln!("    -o, --output <file>       Output file (default: stdout)");
}
