use seamcarve::{
    codec, seams_for_ratio, AnimationOptions, CarveError, GifRecorder, NoFrames, SeamCarver,
    DEFAULT_KEEP_RATIO,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;
use std::str::FromStr;

extern crate clap;
extern crate env_logger;

use clap::{App, Arg, ArgMatches};
use failure::{bail, format_err, Error, ResultExt};
use log::LevelFilter;

fn main() {
    let matches = App::new("seamcarve")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware image shrinking by seam carving")
        .arg(
            Arg::with_name("input")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .default_value("output.png")
                .help("Where to write the carved image"),
        )
        .arg(
            Arg::with_name("seams")
                .short("n")
                .long("seams")
                .value_name("COUNT")
                .conflicts_with("keep")
                .help("How many columns to remove"),
        )
        .arg(
            Arg::with_name("keep")
                .short("k")
                .long("keep")
                .value_name("RATIO")
                .help("Share of the width to keep, in (0, 1]; defaults to 2/3"),
        )
        .arg(
            Arg::with_name("animation")
                .short("a")
                .long("animation")
                .value_name("GIF")
                .help("Also write an animated GIF of the seams being removed"),
        )
        .arg(
            Arg::with_name("palette-size")
                .long("palette-size")
                .value_name("N")
                .requires("animation")
                .help("Colors in the animation palette"),
        )
        .arg(
            Arg::with_name("kmeans-iterations")
                .long("kmeans-iterations")
                .value_name("N")
                .requires("animation")
                .help("Rounds of k-means used to build the palette"),
        )
        .arg(
            Arg::with_name("frame-delay")
                .long("frame-delay")
                .value_name("CENTISECONDS")
                .requires("animation")
                .help("Delay between animation frames"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more; repeat for more detail"),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    if let Err(err) = run(&matches) {
        eprintln!("ERROR: {}", err);
        for cause in err.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn parse<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Error> {
    matches
        .value_of(name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| format_err!("invalid value for --{}: {}", name, value))
        })
        .transpose()
}

fn animation_options(matches: &ArgMatches) -> Result<AnimationOptions, Error> {
    let mut options = AnimationOptions::new();
    if let Some(size) = parse(matches, "palette-size")? {
        options = options.set_palette_size(size);
    }
    if let Some(iterations) = parse(matches, "kmeans-iterations")? {
        options = options.set_kmeans_iterations(iterations);
    }
    if let Some(delay) = parse(matches, "frame-delay")? {
        options = options.set_frame_delay(delay);
    }
    Ok(options)
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let input = matches
        .value_of("input")
        .ok_or_else(|| format_err!("no input image given"))?;
    let output = matches.value_of("output").unwrap_or("output.png");

    let pixels = codec::load(input).with_context(|_| format!("could not read {}", input))?;
    let (width, height) = (pixels.width(), pixels.height());

    let seams = match (parse::<u32>(matches, "seams")?, parse::<f64>(matches, "keep")?) {
        (Some(seams), _) => seams,
        (None, Some(keep)) => {
            if !(keep > 0.0 && keep <= 1.0) {
                bail!("--keep must be greater than 0 and at most 1, not {}", keep);
            }
            seams_for_ratio(width, keep)
        }
        (None, None) => seams_for_ratio(width, DEFAULT_KEEP_RATIO),
    };
    if seams >= width {
        return Err(CarveError::InvalidDimensions {
            width,
            height,
            seams,
        }
        .into());
    }

    let mut carver = SeamCarver::new(pixels)?;
    match matches.value_of("animation") {
        Some(path) => {
            let options = animation_options(matches)?;
            let file = File::create(path).with_context(|_| format!("could not create {}", path))?;
            let mut recorder = GifRecorder::new(BufWriter::new(file), width, height, options)?;
            carver.carve(seams, &mut recorder)?;
            if let Some(mut writer) = recorder.into_inner()? {
                writer.flush()?;
            }
            println!("OK: generated {}", path);
        }
        None => carver.carve(seams, &mut NoFrames)?,
    }

    codec::save(carver.pixels(), output).with_context(|_| format!("could not write {}", output))?;
    println!("OK: generated {}", output);
    Ok(())
}
