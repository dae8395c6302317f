use std::{path::Path, thread};

use anyhow::{Context, Result};
use lifegrid::{Config, GameOfLife, PositionEncoder, enc};
use log::{info, warn};
use rand::{SeedableRng, rngs::StdRng};

mod console;
mod options;
mod stats;

use console::ConsoleCommand;

fn load_config(args: &options::Args) -> Result<Config> {
    let path = args.config_file();
    let loaded = if args.config_is_explicit() {
        Config::load(&path)
    } else {
        Config::load_or_default(&path)
    };
    let mut config = loaded.with_context(|| format!("loading {}", path.display()))?;

    for file in args.rle_files() {
        let text = std::fs::read_to_string(&file).with_context(|| format!("reading {file}"))?;
        let (name, pattern) =
            enc::read_pattern(&text).with_context(|| format!("decoding {file}"))?;
        let name = name.unwrap_or_else(|| {
            Path::new(&file)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.clone())
        });
        info!("added pattern {name:?} from {file}");
        config.insert_pattern(name, pattern);
    }

    args.apply(&mut config)?;
    config.validate()?;
    Ok(config)
}

fn seed_grid(game: &mut GameOfLife, args: &options::Args) -> Result<()> {
    let placements = args.placements()?;
    if !args.empty() && placements.is_empty() {
        match args.seed()? {
            Some(seed) => game.randomize_grid_with(&mut StdRng::seed_from_u64(seed), None),
            None => game.randomize_grid(None),
        }
    }
    for placement in placements {
        if !game.add_pattern(&placement.name, placement.x, placement.y) {
            warn!("no pattern named {:?}", placement.name);
        }
    }
    Ok(())
}

/// Stops the animation loop, dropping the frame handle it was running under
fn stop(game: &mut GameOfLife) {
    game.set_running(false);
    game.set_animation_id(None);
}

fn run_console(game: &mut GameOfLife, max_gens: Option<usize>) -> Result<()> {
    let mut console = console::ConsoleRender::new(game)?;
    let mut stats = stats::SimpleRecord::new(game.generation(), game.population());
    let delay = game.config().frame_delay();
    let mut frame: u64 = 0;

    'frames: loop {
        while let Some(cmd) = console.poll_events()? {
            match cmd {
                ConsoleCommand::Exit => break 'frames,
                ConsoleCommand::Handled => {}
                ConsoleCommand::ToggleRunning if game.is_running() => stop(game),
                ConsoleCommand::ToggleRunning => game.set_running(true),
                ConsoleCommand::Clear => {
                    stop(game);
                    game.clear_grid();
                }
                ConsoleCommand::Randomize => {
                    stop(game);
                    game.randomize_grid(None);
                }
                // editing is ignored while the animation runs
                _ if game.is_running() => {}
                ConsoleCommand::Step => {
                    game.next_generation();
                }
                ConsoleCommand::ToggleCell { row, col } => {
                    game.grid_mut().toggle(row, col);
                }
                ConsoleCommand::PlacePattern { name, origin } => {
                    game.add_pattern(&name, origin.x, origin.y);
                }
            }
        }

        if game.is_running() {
            game.next_generation();
            frame += 1;
            game.set_animation_id(Some(frame));
        }
        stats.record(game.generation(), game.population());
        if stats.has_report() {
            console.set_report(stats.report());
        }
        console.render(game)?;

        if max_gens.is_some_and(|max| game.generation() >= max as u64) {
            break;
        }
        thread::sleep(delay);
    }
    stop(game);
    Ok(())
}

fn run_headless(game: &mut GameOfLife, gens: usize) {
    let mut stats = stats::SimpleRecord::new(game.generation(), game.population());
    game.set_running(true);
    for frame in 1..=gens as u64 {
        game.next_generation();
        game.set_animation_id(Some(frame));
        stats.record(game.generation(), game.population());

        // report metrics every 500ms
        if stats.has_report() {
            println!("{}", stats.report());
        }
    }
    stop(game);
    println!("{}", stats.report());
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Some(args) = options::Args::from_env()? else {
        return Ok(());
    };

    let config = load_config(&args)?;
    let mut game: GameOfLife = GameOfLife::new(config);
    info!("grid is {}x{}", game.rows(), game.cols());
    seed_grid(&mut game, &args)?;

    if args.console() {
        run_console(&mut game, args.generations()?)?;
    } else {
        let gens = args.generations()?.unwrap_or_default();
        run_headless(&mut game, gens);
    }

    if args.print() {
        print!("{}", game.grid());
    }
    if let Some(file_name) = args.output_file() {
        let encoder = enc::RunLengthEncoded::default()
            .set_name("lifegrid generated pattern")
            .set_description(format!("generation {}", game.generation()));
        let encoded = encoder.encode(&game.grid().alive_positions());
        std::fs::write(&file_name, encoded).with_context(|| format!("writing {file_name}"))?;
    }

    Ok(())
}
