//! Command-line front end for colorfinder
//!
//! Extracts the dominant colors of an image and prints them as JSON.
//! Set `RUST_LOG=colorfinder=debug` to follow the pipeline stages.

use colorfinder::{
    find_image_colors, ColorError, ExtractionConfig, ExtractionResult, ReferencePalette,
    SourceColorSpace,
};
use std::{env, path::Path, process};
use tracing_subscriber::EnvFilter;

struct Options {
    image: String,
    source: SourceColorSpace,
    palette: Option<String>,
    config: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Use --help for usage information");
            process::exit(1);
        }
    };

    match run(&options) {
        Ok(result) => print_result(&result),
        Err(error) => {
            eprintln!("Extraction failed: {}", error);
            if error.is_recoverable() {
                eprintln!("Suggestion: {}", error.user_message());
            }
            process::exit(1);
        }
    }
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut image = None;
    let mut source = SourceColorSpace::Srgb;
    let mut palette = None;
    let mut config = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            flag @ ("--source" | "--palette" | "--config") => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{} expects a value", flag))?;
                match flag {
                    "--source" => source = value.parse().map_err(|e: ColorError| e.to_string())?,
                    "--palette" => palette = Some(value.clone()),
                    _ => config = Some(value.clone()),
                }
                i += 1;
            }
            arg if !arg.starts_with("--") => {
                if image.is_some() {
                    return Err("Multiple image paths provided".to_string());
                }
                image = Some(arg.to_string());
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let image = image.ok_or_else(|| "No image path provided".to_string())?;
    Ok(Options {
        image,
        source,
        palette,
        config,
    })
}

fn run(options: &Options) -> colorfinder::Result<ExtractionResult> {
    let palette = match options.palette.as_deref() {
        None | Some("named140") => ReferencePalette::named_colors_140()?,
        Some("colorchecker24") => ReferencePalette::color_checker_24()?,
        Some(path) => ReferencePalette::from_json_file(Path::new(path))?,
    };
    let config = match &options.config {
        Some(path) => ExtractionConfig::from_json_file(Path::new(path))?,
        None => ExtractionConfig::default(),
    };

    find_image_colors(Path::new(&options.image), options.source, &palette, &config)
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_path>", program_name);
    eprintln!();
    eprintln!("Find the dominant colors of an image, named by a reference palette.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --source <srgb|adobe>   Color space of the image (default: srgb)");
    eprintln!("  --palette <NAME|FILE>   named140 (default), colorchecker24 or a JSON file");
    eprintln!("  --config <FILE>         JSON extraction config");
    eprintln!("  --help, -h              Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} photo.jpg", program_name);
    eprintln!("  {} --source adobe --palette inks.json scan.tiff", program_name);
}

fn print_result(result: &ExtractionResult) {
    // JSON on stdout for programmatic use
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            process::exit(1);
        }
    }

    // Summary on stderr for human reading
    eprintln!();
    eprintln!("Dominant colors ({} samples):", result.sample_count);
    for color in result.by_frequency() {
        let share = color.count as f64 / result.sample_count.max(1) as f64;
        eprintln!(
            "  {:<20} {}  {:>5.1}%  L*={:.1}, a*={:.1}, b*={:.1}",
            color.label,
            color.hex(),
            share * 100.0,
            color.lab.l,
            color.lab.a,
            color.lab.b
        );
    }
}
