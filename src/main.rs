//! concepts-ink CLI - Extract and render strokes from Concepts drawings.

use std::env;
use std::path::{Path, PathBuf};
use std::process::exit;

use concepts_ink::prelude::*;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "warn";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_tracing(level);

    if filtered_args.is_empty() {
        print_usage(&args[0]);
        exit(1);
    }

    match filtered_args[0] {
        "info" | "i" => {
            if filtered_args.len() != 2 {
                eprintln!("Usage: {} info <drawing.plist>", args[0]);
                exit(1);
            }
            cmd_info(filtered_args[1]);
        }
        "points" | "p" => {
            if filtered_args.len() != 2 {
                eprintln!("Usage: {} points <drawing.plist>", args[0]);
                exit(1);
            }
            cmd_points(filtered_args[1]);
        }
        "svg" | "s" => {
            if filtered_args.len() < 2 || filtered_args.len() > 3 {
                eprintln!("Usage: {} svg <drawing.plist> [out.svg]", args[0]);
                exit(1);
            }
            cmd_svg(filtered_args[1], filtered_args.get(2).copied());
        }
        "help" | "h" | "-h" | "--help" => print_usage(&args[0]),
        // default: treat the first positional as the input file
        path => {
            if filtered_args.len() > 2 {
                print_usage(&args[0]);
                exit(1);
            }
            cmd_svg(path, filtered_args.get(1).copied());
        }
    }
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn print_usage(prog: &str) {
    println!(
        "concepts-ink - Extract strokes from Concepts drawings (built {} {})",
        env!("CONCEPTS_INK_BUILD_DATE"),
        env!("CONCEPTS_INK_BUILD_TIME")
    );
    println!();
    println!("Usage: {} [options] [command] <drawing.plist> [out.svg]", prog);
    println!();
    println!("Commands:");
    println!("  s, svg     Decode and write an SVG rendering (default)");
    println!("  i, info    Show archive and stroke summary");
    println!("  p, points  Dump decoded point sequences as text");
    println!("  h, help    Show this help");
    println!();
    println!("Options:");
    println!("  -v, --verbose  Debug output");
    println!("  -vv, --trace   Trace output (very verbose)");
    println!("  -q, --quiet    Suppress output");
}

fn open_archive(path: &str) -> Archive {
    match Archive::open(path) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Failed to open {}: {}", path, e);
            exit(1);
        }
    }
}

fn extract_or_die<'a>(archive: &'a Archive, path: &str) -> (Vec<Stroke>, StrokeExtractor<'a>) {
    let mut extractor = StrokeExtractor::new(archive);
    match extractor.extract() {
        Ok(strokes) => (strokes, extractor),
        Err(e) => {
            eprintln!("Failed to decode {}: {}", path, e);
            exit(1);
        }
    }
}

fn cmd_info(path: &str) {
    let archive = open_archive(path);
    let (strokes, extractor) = extract_or_die(&archive, path);

    let mut bounds = BBox2f::EMPTY;
    let mut total_points = 0usize;
    for stroke in &strokes {
        total_points += stroke.len();
        bounds.expand_by_box(&stroke.bounds());
    }

    println!("Archive: {}", path);
    println!("Objects: {}", archive.len());
    println!();
    println!("Strokes: {}", strokes.len());
    println!("Points:  {}", total_points);
    println!("Visited: {} drawables ({} skipped)", extractor.visited(), extractor.skipped());
    println!("Bounds:  {:?}", bounds);
}

fn cmd_points(path: &str) {
    let archive = open_archive(path);
    let (strokes, _) = extract_or_die(&archive, path);

    for (i, stroke) in strokes.iter().enumerate() {
        println!("# stroke {} ({} points)", i, stroke.len());
        for p in &stroke.points {
            println!("{} {}", p.x, p.y);
        }
        println!();
    }
}

fn cmd_svg(path: &str, out: Option<&str>) {
    let archive = open_archive(path);
    let (strokes, extractor) = extract_or_die(&archive, path);

    let out_path = out
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(path).with_extension("svg"));
    if let Err(e) = write_svg(&out_path, &strokes) {
        eprintln!("Failed to write {}: {}", out_path.display(), e);
        exit(1);
    }

    println!(
        "{}: {} strokes ({} drawables skipped) -> {}",
        path,
        strokes.len(),
        extractor.skipped(),
        out_path.display()
    );
}
