use log::{debug, info};
use slideways::catalog::Catalog;
use slideways::config::{Config, DEFAULT_CONFIG_FILE};
use slideways::game::{GameSession, Pacing};
use slideways::input_terminal::TerminalKeys;
use slideways::render::manager::{create_renderer, DisplayMode};
use slideways::shuffle::SlideRand;
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    // Initialize logging
    env_logger::init();

    // The program reports problems but always leaves with success status;
    // there is no caller that distinguishes failure exits.
    if let Err(e) = run() {
        eprintln!("{}", e);
    }
}

fn usage(program: &str) {
    println!("slideways - sliding-picture puzzle for VDU display coprocessors");
    println!();
    println!("Usage: {} [puzzles_dir] [options]", program);
    println!();
    println!("Options:");
    println!("  --display <auto|vdu|terminal|headless>   renderer selection");
    println!("  --serial <path>    write the VDU stream to a device or file");
    println!("  --seed <n>         fixed shuffle seed (reproducible games)");
    println!("  --config <path>    config file (default {})", DEFAULT_CONFIG_FILE);
    println!("  --help             this text");
    println!();
    println!("Keys: 1-9 pick a level, S swaps puzzle, a-d/1-4 scroll lanes,");
    println!("SHIFT reverses, Q gives up, ESC exits.");
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();

    // gather overrides first so --config is honored before anything loads
    let mut dir_override: Option<String> = None;
    let mut display_override: Option<String> = None;
    let mut serial_override: Option<String> = None;
    let mut seed_override: Option<u64> = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_FILE);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                usage(&args[0]);
                return Ok(());
            }
            "--display" => {
                display_override = Some(next_value(&args, &mut i, "--display")?);
            }
            "--serial" => {
                serial_override = Some(next_value(&args, &mut i, "--serial")?);
            }
            "--seed" => {
                let raw = next_value(&args, &mut i, "--seed")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed: {}", raw))?;
                seed_override = Some(seed);
            }
            "--config" => {
                config_path = PathBuf::from(next_value(&args, &mut i, "--config")?);
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option {} (try --help)", flag));
            }
            positional => {
                dir_override = Some(positional.to_string());
            }
        }
        i += 1;
    }

    let mut config = Config::load_optional(&config_path)?;
    if let Some(dir) = dir_override {
        config.puzzles_dir = dir;
    }
    if let Some(display) = display_override {
        config.display = display;
    }
    if let Some(serial) = serial_override {
        config.serial = Some(serial);
        if config.display == "auto" {
            // a serial target only makes sense for the VDU stream
            config.display = "vdu".to_string();
        }
    }
    if let Some(seed) = seed_override {
        config.seed = Some(seed);
    }

    let puzzles_dir = Path::new(&config.puzzles_dir);
    debug!("scanning puzzle directory {}", puzzles_dir.display());
    let catalog = match Catalog::scan(puzzles_dir) {
        Ok(catalog) => catalog,
        Err(e) => {
            match e.kind() {
                std::io::ErrorKind::NotFound => {
                    eprintln!("Error: puzzle directory not found: {}", puzzles_dir.display());
                    eprintln!();
                    eprintln!("Please check:");
                    eprintln!("• The directory exists and holds raw RGBA2222 image files");
                    eprintln!("• You're running from the right directory");
                    eprintln!("• Or pass a directory: slideways <puzzles_dir>");
                }
                std::io::ErrorKind::PermissionDenied => {
                    eprintln!(
                        "Error: permission denied reading {}",
                        puzzles_dir.display()
                    );
                }
                _ => {
                    eprintln!("Error: cannot scan '{}': {}", puzzles_dir.display(), e);
                }
            }
            return Ok(());
        }
    };

    if catalog.is_empty() {
        println!("No puzzles found in {}", puzzles_dir.display());
        return Ok(());
    }
    println!("{} puzzles found", catalog.len());

    let mode = match config.display_mode()? {
        // the VDU stream and the human share stdout; keep them apart
        DisplayMode::Vdu if atty::is(atty::Stream::Stdout) => {
            info!("stdout is a terminal; VDU bytes would garble it");
            return Err(
                "refusing to write the VDU stream to a terminal; use --serial or redirect stdout"
                    .to_string(),
            );
        }
        mode => mode,
    };

    let renderer = create_renderer(mode).map_err(String::from)?;
    let keys = TerminalKeys::new();
    let rng = match config.seed {
        Some(seed) => SlideRand::new_predictable(seed),
        None => SlideRand::new_uniform(),
    };
    let pacing: Pacing = config.pacing();

    let mut session = GameSession::new(renderer, keys, catalog, rng, pacing);
    let result = session.run();

    // Always restore cursor and terminal state before exit
    session.cleanup();

    result
}

fn next_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{} needs a value (try --help)", flag))
}
