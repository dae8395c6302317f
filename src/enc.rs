//! Run-length encoded (RLE) pattern files.

use crate::{
    Pos2,
    config::Pattern,
    error::{Error, Result},
};
use regex::Regex;
use std::sync::OnceLock;

pub trait PositionEncoder {
    fn encode(self, positions: &[Pos2]) -> String;
    fn decode(self, value: &str) -> Result<Vec<Pos2>>;
}

/// Upper bound on decoded live cells, whatever the file claims
const MAX_DECODED_CELLS: usize = 1 << 22;

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)").expect("valid RLE header regex")
    })
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d*)([bo$!])").expect("valid RLE token regex"))
}

struct RunEncoder {
    sequence: String,
    line_len: usize,
    max_line_len: usize,
}
impl RunEncoder {
    fn new(max_line_len: usize) -> Self {
        Self {
            sequence: String::new(),
            line_len: 0,
            max_line_len,
        }
    }

    fn push_run(&mut self, run: i32, c: char) {
        let append = match run {
            0 => return,
            1 => c.to_string(),
            n => format!("{}{}", n, c),
        };
        if self.line_len + append.len() > self.max_line_len {
            self.sequence.push('\n');
            self.line_len = 0;
        }
        self.line_len += append.len();
        self.sequence.push_str(&append);
    }

    fn end(mut self) -> String {
        self.sequence.push('!');
        self.sequence
    }
}

#[derive(Debug, Default)]
pub struct RunLengthEncoded {
    name: Option<String>,
    description: Option<String>,
}
impl RunLengthEncoded {
    pub fn set_name<T: AsRef<str>>(mut self, name: T) -> Self {
        self.name = Some(name.as_ref().to_owned());
        self
    }
    pub fn set_description<T: AsRef<str>>(mut self, description: T) -> Self {
        self.description = Some(description.as_ref().to_owned());
        self
    }

    fn encode_header(&self, width: i32, height: i32) -> String {
        let mut header = String::new();
        if let Some(name) = &self.name {
            header.push_str(&format!("#N {}\n", name));
        }
        if let Some(description) = &self.description {
            for line in description.lines() {
                header.push_str(&format!("#C {}\n", line));
            }
        }
        header.push_str(&format!("x = {}, y = {}, rule = B3/S23", width, height));
        header
    }

    /// `alive_cells` must be sorted row-major, as [`crate::Grid::alive_positions`] returns them
    fn encode_cells(&self, alive_cells: &[Pos2], tl: Pos2) -> String {
        let mut last = tl - Pos2 { x: 1, y: 0 };
        let mut alive_run = 0;
        let mut seq = RunEncoder::new(70);
        for pos in alive_cells {
            // if we're one ahead of the last, then only increment the run
            if last.y == pos.y && (last.x + 1) == pos.x {
                alive_run += 1;
                last = *pos;
                continue;
            }

            let lines_run = pos.y - last.y;
            let dead_run = match lines_run {
                0 => pos.x - last.x - 1,
                _ => pos.x - tl.x,
            };
            // NOTE: order matters!
            seq.push_run(alive_run, 'o');
            seq.push_run(lines_run, '$');
            seq.push_run(dead_run, 'b');

            alive_run = 1;
            last = *pos;
        }

        seq.push_run(alive_run, 'o');
        seq.end()
    }
}

impl PositionEncoder for RunLengthEncoded {
    fn encode(self, cells: &[Pos2]) -> String {
        debug_assert!(
            cells.windows(2).all(|w| w[0] < w[1]),
            "cells are not properly sorted"
        );
        let min_x = cells.iter().map(|p| p.x).min().unwrap_or_default();
        let max_x = cells.iter().map(|p| p.x).max().unwrap_or_default();
        // sorted, so the first and last cells bound the rows
        let min_y = cells.first().map(|p| p.y).unwrap_or_default();
        let max_y = cells.last().map(|p| p.y).unwrap_or_default();

        let (width, height) = if cells.is_empty() {
            (0, 0)
        } else {
            (max_x - min_x + 1, max_y - min_y + 1)
        };
        let tl = Pos2 { x: min_x, y: min_y };
        format!(
            "{}\n{}\n",
            self.encode_header(width, height),
            self.encode_cells(cells, tl)
        )
    }

    fn decode(self, value: &str) -> Result<Vec<Pos2>> {
        let mut alive = Vec::new();
        let mut cursor = Pos2 { x: 0, y: 0 };
        let mut bounds = None;
        'lines_loop: for (line_no, line) in value.lines().enumerate() {
            let line = line.trim();
            let line_no = line_no + 1;
            let fail = |message: String| Error::Decode {
                line: line_no,
                message,
            };
            if line.starts_with('#') {
                continue;
            }
            // the `x = W, y = H` header carries no cells, only the pattern size
            if line.starts_with('x') {
                if let Some((_, [w, h])) = header_regex().captures(line).map(|c| c.extract()) {
                    let size = |s: &str| {
                        s.parse::<i32>()
                            .map_err(|err| fail(format!("bad pattern size {s:?}: {err}")))
                    };
                    bounds = Some(Pos2 { x: size(w)?, y: size(h)? });
                }
                continue;
            }

            for (_, [run_str, state]) in token_regex().captures_iter(line).map(|x| x.extract()) {
                let run = match run_str {
                    "" => 1,
                    s => s
                        .parse::<i32>()
                        .map_err(|err| fail(format!("bad run count {s:?}: {err}")))?,
                };
                let overflow = || fail(format!("run of {run} {state:?} overflows the cursor"));
                match state {
                    "!" => break 'lines_loop,
                    "o" => {
                        let end = cursor.x.checked_add(run).ok_or_else(overflow)?;
                        if let Some(size) = bounds {
                            if end > size.x || cursor.y >= size.y {
                                return Err(fail(format!(
                                    "cells past the declared {}x{} size",
                                    size.x, size.y
                                )));
                            }
                        }
                        if alive.len() + run as usize > MAX_DECODED_CELLS {
                            return Err(fail(format!(
                                "more than {MAX_DECODED_CELLS} live cells"
                            )));
                        }
                        alive.extend((cursor.x..end).map(|x| Pos2 { x, y: cursor.y }));
                        cursor.x = end;
                    }
                    "b" => cursor.x = cursor.x.checked_add(run).ok_or_else(overflow)?,
                    "$" => {
                        cursor.x = 0;
                        cursor.y = cursor.y.checked_add(run).ok_or_else(overflow)?;
                    }
                    _ => unreachable!(),
                }
            }
        }

        Ok(alive)
    }
}

/// Decodes a whole RLE file into a pattern, along with its `#N` name if it has one
///
/// `#C`/`#c` comment lines become the pattern's description.
pub fn read_pattern(value: &str) -> Result<(Option<String>, Pattern)> {
    let mut name = None;
    let mut description = Vec::new();
    for line in value.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("#N") {
            name = Some(rest.trim().to_owned());
        } else if let Some(rest) = line.strip_prefix("#C").or_else(|| line.strip_prefix("#c")) {
            description.push(rest.trim());
        }
    }

    let cells = RunLengthEncoded::default().decode(value)?;
    Ok((name.filter(|n| !n.is_empty()), Pattern::new(cells, description.join("\n"))))
}
