use std::{path::PathBuf, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use lifegrid::Config;
use regex::Regex;

const DEFAULT_CONFIG: &str = "config.json";
const DEFAULT_HEADLESS_GENS: usize = 100;

/// A `NAME@X,Y` pattern placement from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub name: String,
    pub x: i32,
    pub y: i32,
}
impl Placement {
    fn parse(s: &str) -> Option<Self> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^(.+)@(-?\d+),(-?\d+)$").expect("valid placement regex")
        });
        let (_, [name, x, y]) = re.captures(s.trim())?.extract();
        Some(Self {
            name: name.to_owned(),
            x: x.parse().ok()?,
            y: y.parse().ok()?,
        })
    }
}

pub struct Args {
    matches: getopts::Matches,
}

impl Args {
    fn new<T: AsRef<str>>(args: &[T]) -> Result<Option<Self>> {
        let mut opts = getopts::Options::new();
        opts.optflag("", "help", "print this help menu");
        opts.optflag("c", "console", "run in console mode");
        opts.optflag("", "print", "print the final grid to stdout");
        opts.optflag("", "empty", "start from an empty grid instead of a random one");
        opts.optopt("", "config", "config file (default: config.json)", "FILE");
        opts.optopt("o", "output", "write the final grid as RLE", "FILE");
        opts.optmulti("", "rle", "add an RLE file to the pattern table", "FILE");
        opts.optmulti("p", "pattern", "place a named pattern", "NAME@X,Y");
        opts.optopt("w", "width", "set grid width", "WIDTH");
        opts.optopt("h", "height", "set grid height", "HEIGHT");
        opts.optopt("", "cell-size", "set the cell size", "SIZE");
        opts.optopt("d", "density", "initial fill density", "DENSITY");
        opts.optopt(
            "",
            "delay",
            "the amount of time to sleep between generations",
            "MILLIS",
        );
        opts.optopt("g", "gens", "max number of generations", "COUNT");
        opts.optopt("", "seed", "seed for the initial random fill", "SEED");

        let matches = opts.parse(args.iter().map(T::as_ref))?;
        if matches.opt_present("help") {
            println!("{}", opts.usage("usage: lifegrid [options]"));
            Ok(None)
        } else {
            Ok(Some(Self { matches }))
        }
    }
    pub fn from_env() -> Result<Option<Self>> {
        let env = std::env::args().collect::<Vec<_>>();
        Self::new(&env[1..])
    }

    pub fn console(&self) -> bool {
        self.matches.opt_present("console")
    }
    pub fn print(&self) -> bool {
        self.matches.opt_present("print")
    }
    pub fn empty(&self) -> bool {
        self.matches.opt_present("empty")
    }

    pub fn config_file(&self) -> PathBuf {
        self.matches
            .opt_str("config")
            .unwrap_or_else(|| DEFAULT_CONFIG.to_owned())
            .into()
    }
    pub fn config_is_explicit(&self) -> bool {
        self.matches.opt_present("config")
    }
    pub fn output_file(&self) -> Option<String> {
        self.matches.opt_str("output")
    }
    pub fn rle_files(&self) -> Vec<String> {
        self.matches.opt_strs("rle")
    }

    pub fn placements(&self) -> Result<Vec<Placement>> {
        self.matches
            .opt_strs("pattern")
            .iter()
            .map(|s| Placement::parse(s).ok_or_else(|| anyhow!("expected NAME@X,Y, got {s:?}")))
            .collect()
    }

    /// `None` runs until quit in console mode
    pub fn generations(&self) -> Result<Option<usize>> {
        let gens = self.matches.opt_get::<usize>("gens").context("--gens")?;
        Ok(match gens {
            Some(n) => Some(n),
            None if self.console() => None,
            None => Some(DEFAULT_HEADLESS_GENS),
        })
    }
    pub fn seed(&self) -> Result<Option<u64>> {
        self.matches.opt_get::<u64>("seed").context("--seed")
    }

    /// Applies command line overrides on top of a loaded config
    ///
    /// In console mode the grid defaults to the terminal size (less the footer)
    /// with one cell per character.
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        if self.console() {
            if let Ok((cols, rows)) = crossterm::terminal::size() {
                config.width = u32::from(cols);
                config.height = u32::from(rows.saturating_sub(1));
                config.cell_size = 1;
            }
        }
        if let Some(width) = self.matches.opt_get::<u32>("width").context("--width")? {
            config.width = width;
        }
        if let Some(height) = self.matches.opt_get::<u32>("height").context("--height")? {
            config.height = height;
        }
        if let Some(cell_size) = self.matches.opt_get::<u32>("cell-size").context("--cell-size")? {
            config.cell_size = cell_size;
        }
        if let Some(density) = self.matches.opt_get::<f64>("density").context("--density")? {
            config.initial_density = density;
        }
        if let Some(delay) = self.matches.opt_get::<u64>("delay").context("--delay")? {
            config.frame_delay = delay;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        Args::new(list).expect("parse args").expect("not help")
    }

    #[test]
    fn overrides_config_fields() {
        let mut config = Config::default();
        args(&["-w", "120", "--height", "80", "--cell-size", "4", "-d", "0.5", "--delay", "20"])
            .apply(&mut config)
            .expect("apply");

        assert_eq!(config.width, 120);
        assert_eq!(config.height, 80);
        assert_eq!(config.cell_size, 4);
        assert_eq!(config.initial_density, 0.5);
        assert_eq!(config.frame_delay, 20);
    }

    #[test]
    fn rejects_non_numeric_width() {
        let mut config = Config::default();

        assert!(args(&["--width", "wide"]).apply(&mut config).is_err());
    }

    #[test]
    fn parses_placements() {
        let placements = args(&["-p", "glider@3,4", "--pattern", "big gun@-2,0"])
            .placements()
            .expect("placements");

        assert_eq!(
            placements,
            vec![
                Placement { name: "glider".into(), x: 3, y: 4 },
                Placement { name: "big gun".into(), x: -2, y: 0 },
            ]
        );
    }

    #[test]
    fn rejects_bad_placement() {
        assert!(args(&["-p", "glider"]).placements().is_err());
    }

    #[test]
    fn headless_has_a_generation_limit() {
        assert_eq!(args(&[]).generations().expect("gens"), Some(DEFAULT_HEADLESS_GENS));
        assert_eq!(args(&["-g", "7"]).generations().expect("gens"), Some(7));
    }

    #[test]
    fn help_returns_none() {
        assert!(Args::new(&["--help"]).expect("parse").is_none());
    }
}
