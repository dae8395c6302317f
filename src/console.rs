use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use lifegrid::{Config, GameOfLife, Pos2};
use log::error;
use std::io::{self, Write};

pub enum ConsoleCommand {
    Exit,
    Handled,
    ToggleRunning,
    Step,
    Clear,
    Randomize,
    ToggleCell { row: usize, col: usize },
    PlacePattern { name: String, origin: Pos2 },
}

/// Parses a `#rrggbb` color as written in the config
fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

struct Palette {
    live: Color,
    dead: Color,
    grid: Color,
}
impl Palette {
    fn from_config(config: &Config) -> Self {
        Self {
            live: parse_hex_color(&config.live_color).unwrap_or(Color::White),
            dead: parse_hex_color(&config.dead_color).unwrap_or(Color::Black),
            grid: parse_hex_color(&config.grid_color).unwrap_or(Color::Grey),
        }
    }
}

pub struct ConsoleRender {
    palette: Palette,
    rows: usize,
    cols: usize,
    /// Edit cursor, `x` column and `y` row
    cursor: Pos2,
    patterns: Vec<String>,
    selected: usize,
    report: String,
}
impl ConsoleRender {
    pub fn new(game: &GameOfLife) -> io::Result<Self> {
        let config = game.config();
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )?;
        Ok(Self {
            palette: Palette::from_config(&config),
            rows: game.rows(),
            cols: game.cols(),
            cursor: Pos2::new(game.cols() as i32 / 2, game.rows() as i32 / 2),
            patterns: config.patterns.into_keys().collect(),
            selected: 0,
            report: String::new(),
        })
    }

    fn selected_pattern(&self) -> Option<&str> {
        self.patterns.get(self.selected).map(String::as_str)
    }

    pub fn render(&self, game: &GameOfLife) -> io::Result<()> {
        let (term_cols, term_rows) = terminal::size()?;
        let footer_row = term_rows.saturating_sub(1);
        let mut stdout = io::stdout();

        queue!(
            stdout,
            SetForegroundColor(self.palette.live),
            SetBackgroundColor(self.palette.dead)
        )?;
        for (y, row) in game
            .grid()
            .iter_rows()
            .take(usize::from(footer_row))
            .enumerate()
        {
            let line: String = row
                .iter()
                .take(usize::from(term_cols))
                .map(|cell| if cell.is_alive() { '█' } else { ' ' })
                .collect();
            queue!(stdout, cursor::MoveTo(0, y as u16), Print(line))?;
        }

        // write footer
        let state = if game.is_running() { "running" } else { "paused" };
        let footer = format!(
            "{state} generation:{} population:{} pattern:{} {}",
            game.generation(),
            game.population(),
            self.selected_pattern().unwrap_or("-"),
            self.report
        );
        queue!(
            stdout,
            ResetColor,
            cursor::MoveTo(0, footer_row),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(self.palette.grid),
            Print(footer.chars().take(usize::from(term_cols)).collect::<String>()),
            ResetColor
        )?;

        // edits are ignored while running, so only show the cursor when paused
        if game.is_running() {
            queue!(stdout, cursor::Hide)?;
        } else {
            queue!(
                stdout,
                cursor::MoveTo(self.cursor.x as u16, self.cursor.y as u16),
                cursor::Show
            )?;
        }

        stdout.flush()
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let max_x = self.cols.saturating_sub(1) as i32;
        let max_y = self.rows.saturating_sub(1) as i32;
        self.cursor.x = (self.cursor.x + dx).clamp(0, max_x);
        self.cursor.y = (self.cursor.y + dy).clamp(0, max_y);
    }

    pub fn poll_events(&mut self) -> io::Result<Option<ConsoleCommand>> {
        // make sure event is preset for us to take
        if !event::poll(std::time::Duration::from_secs(0))? {
            return Ok(None);
        }

        let event::Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        else {
            return Ok(Some(ConsoleCommand::Handled));
        };

        let command = match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => ConsoleCommand::Exit,
            KeyCode::Char('q') | KeyCode::Esc => ConsoleCommand::Exit,
            KeyCode::Char(' ') => ConsoleCommand::ToggleRunning,
            KeyCode::Char('n') => ConsoleCommand::Step,
            KeyCode::Char('c') => ConsoleCommand::Clear,
            KeyCode::Char('r') => ConsoleCommand::Randomize,
            KeyCode::Enter => match self.cursor.to_cell(self.rows, self.cols) {
                Some((row, col)) => ConsoleCommand::ToggleCell { row, col },
                None => ConsoleCommand::Handled,
            },
            KeyCode::Char('p') => {
                if !self.patterns.is_empty() {
                    self.selected = (self.selected + 1) % self.patterns.len();
                }
                ConsoleCommand::Handled
            }
            KeyCode::Char('a') => match self.selected_pattern() {
                Some(name) => ConsoleCommand::PlacePattern {
                    name: name.to_owned(),
                    origin: self.cursor,
                },
                None => ConsoleCommand::Handled,
            },
            // arrows to move the edit cursor
            KeyCode::Up => {
                self.move_cursor(0, -1);
                ConsoleCommand::Handled
            }
            KeyCode::Down => {
                self.move_cursor(0, 1);
                ConsoleCommand::Handled
            }
            KeyCode::Left => {
                self.move_cursor(-1, 0);
                ConsoleCommand::Handled
            }
            KeyCode::Right => {
                self.move_cursor(1, 0);
                ConsoleCommand::Handled
            }
            _ => ConsoleCommand::Handled,
        };
        Ok(Some(command))
    }

    pub fn set_report(&mut self, report: String) {
        self.report = report;
    }
}
impl Drop for ConsoleRender {
    fn drop(&mut self) {
        // if we can enable it, we should be able to disable it
        if let Err(err) = terminal::disable_raw_mode() {
            error!("failed to disable raw mode: {err}");
        }
        if let Err(err) = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show) {
            error!("failed to restore terminal: {err}");
        }
    }
}
