//! Render command implementation.

use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Instant;

use log::info;

use gradient_path::{gradient_data, load_source_from_svg, splice_gradient};

use super::common::{flag_value, parse_flag, read_input};
use super::config::{ElementConfig, GradientConfig, PaintConfig, SamplingArgs};
use super::markup::{rasterize_png, render_group};
use super::style::ElementKind;

/// Element flags given on the command line.
#[derive(Debug, Default)]
struct ElementArgs {
    circles: bool,
    width: Option<f64>,
    fill: Option<String>,
    stroke: Option<String>,
    stroke_width: Option<f64>,
}

impl ElementArgs {
    fn is_set(&self) -> bool {
        self.circles
            || self.width.is_some()
            || self.fill.is_some()
            || self.stroke.is_some()
            || self.stroke_width.is_some()
    }

    /// Build the element these flags describe.
    ///
    /// Without any colour, filled shapes default to black fill and plain
    /// polylines to a black stroke.
    fn to_config(&self) -> ElementConfig {
        let kind = if self.circles { ElementKind::Circle } else { ElementKind::Path };
        let filled = kind == ElementKind::Circle || self.width.is_some();
        let unpainted = self.fill.is_none() && self.stroke.is_none();

        let fill = match &self.fill {
            Some(fill) => Some(PaintConfig::from_arg(fill)),
            None if unpainted && filled => Some(PaintConfig::Solid("#000000".into())),
            None => None,
        };
        let stroke = match &self.stroke {
            Some(stroke) => Some(PaintConfig::from_arg(stroke)),
            None if unpainted && !filled => Some(PaintConfig::Solid("#000000".into())),
            None => None,
        };

        ElementConfig {
            kind,
            width: self.width,
            fill,
            stroke,
            stroke_width: self.stroke_width,
        }
    }
}

/// Execute the render command.
pub fn cmd_render(args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut svg_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut png_path: Option<&str> = None;
    let mut scale = 1.0f32;
    let mut sampling = SamplingArgs::default();
    let mut element = ElementArgs::default();

    let mut i = 0;
    while i < args.len() {
        if sampling.take_flag(args, &mut i)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "-w" | "--width" => element.width = Some(parse_flag(args, &mut i)?),
            "--fill" => element.fill = Some(flag_value(args, &mut i)?.to_string()),
            "--stroke" => element.stroke = Some(flag_value(args, &mut i)?.to_string()),
            "--stroke-width" => element.stroke_width = Some(parse_flag(args, &mut i)?),
            "--circles" => element.circles = true,
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i)?),
            "--png" => png_path = Some(flag_value(args, &mut i)?),
            "--scale" => scale = parse_flag(args, &mut i)?,
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

    let svg_path = svg_path.ok_or("SVG file required (use '-' for stdin)")?;

    let mut config: GradientConfig = sampling.resolve()?;
    if element.is_set() {
        config.elements.push(element.to_config());
    }
    if config.elements.is_empty() {
        config.elements.push(ElementArgs::default().to_config());
    }
    let settings = config.validate()?;

    let svg_content = read_input(svg_path)?;
    // Sampling and splicing must agree on the element being replaced
    let source = load_source_from_svg(&svg_content, settings.source.as_deref())?;
    let element = source.element()?;

    let start = Instant::now();
    let set = gradient_data(&source.geometry, settings.segments, settings.samples, settings.precision)?;
    let group = render_group(&set, &settings.elements, settings.precision)?;
    info!(
        "Rendered {} segments x {} elements in {:?}",
        set.len(),
        settings.elements.len(),
        start.elapsed()
    );

    let output = splice_gradient(&svg_content, element, &group)?;

    match output_path {
        Some(path) => {
            fs::write(path, &output)?;
            info!("Wrote: {}", path);
        }
        None => print!("{}", output),
    }

    if let Some(path) = png_path {
        rasterize_png(&output, Path::new(path), scale)?;
        info!("Wrote: {}", path);
    }

    Ok(())
}

fn print_usage() {
    eprintln!("gradient-path render - Replace a path with a segmented gradient");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    gradient-path render <svg|-> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -c, --config <file>       Gradient YAML file (see `gradient-path example`)");
    eprintln!("    -s, --segments <n>        Number of segments (default: 10)");
    eprintln!("    -n, --samples <n>         Samples per segment (default: 5)");
    eprintln!("    -p, --precision <n>       Fractional digits kept (default: 2)");
    eprintln!("        --no-round            Keep full coordinate precision");
    eprintln!("        --id <id>             Source path id (default: first path)");
    eprintln!("    -w, --width <w>           Outline width, or circle diameter");
    eprintln!("        --fill <c[,c...]>     Fill colour or hex gradient stops");
    eprintln!("        --stroke <c[,c...]>   Stroke colour or hex gradient stops");
    eprintln!("        --stroke-width <w>    Stroke width");
    eprintln!("        --circles             Draw a circle per sample instead of paths");
    eprintln!("    -o, --output <file>       Output SVG (default: stdout)");
    eprintln!("        --png <file>          Also rasterize the result to PNG");
    eprintln!("        --scale <f>           PNG scale factor (default: 1)");
    eprintln!();
    eprintln!("EXAMPLE:");
    eprintln!("    gradient-path render swoop.svg -s 20 -w 8 --fill '#ff0000,#0000ff' -o out.svg");
}
