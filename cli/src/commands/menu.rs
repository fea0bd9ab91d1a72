//! Line-oriented interactive menu for building a [`Selection`].
//!
//! Main menu entries toggle a flag or open a checklist; a checklist toggles
//! items by number and returns on an empty line. `i` starts the
//! installation, `q` or end of input quits.
use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::config::packages::PackageEntry;
use crate::config::selection::{Selection, toggle};

/// One checklist row: id, label, selected.
type Row<'a> = (&'a str, &'a str, bool);

/// Interactive menu over arbitrary input and output streams.
#[derive(Debug)]
pub struct Menu<'c, R, W> {
    config: &'c Config,
    input: R,
    output: W,
}

impl<'c, R: BufRead, W: Write> Menu<'c, R, W> {
    /// Menu over `config`'s catalogues.
    pub const fn new(config: &'c Config, input: R, output: W) -> Self {
        Self {
            config,
            input,
            output,
        }
    }

    /// Let the user edit `selection`.
    ///
    /// Returns the final selection when the user starts the installation,
    /// or `None` when they quit.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing the menu fails.
    pub fn run(mut self, mut selection: Selection) -> io::Result<Option<Selection>> {
        let config = self.config;
        loop {
            self.print_main(&selection)?;
            let Some(choice) = self.read_line()? else {
                return Ok(None);
            };
            match choice.as_str() {
                "1" => selection.update_system = !selection.update_system,
                "2" => {
                    let catalogue = entries(&config.groups.base);
                    self.checklist("Base packages", &catalogue, &mut selection.base)?;
                }
                "3" => {
                    let catalogue = entries(&config.groups.extra);
                    self.checklist("Extra packages", &catalogue, &mut selection.extra)?;
                }
                "4" => selection.dotfiles = !selection.dotfiles,
                "5" => {
                    let catalogue: Vec<(&str, &str)> = config
                        .models
                        .iter()
                        .map(|m| (m.id.as_str(), m.description.as_deref().unwrap_or(&m.tag)))
                        .collect();
                    self.checklist("Local models", &catalogue, &mut selection.models)?;
                }
                "6" => selection.cloud_ai = !selection.cloud_ai,
                "i" | "I" | "7" => return Ok(Some(selection)),
                "q" | "Q" => return Ok(None),
                other => writeln!(self.output, "unknown option: {other}")?,
            }
        }
    }

    fn print_main(&mut self, sel: &Selection) -> io::Result<()> {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        writeln!(self.output)?;
        writeln!(self.output, "brainbash setup")?;
        writeln!(self.output, "  1) Update system          [{}]", yes_no(sel.update_system))?;
        writeln!(self.output, "  2) Base packages          [{} selected]", sel.base.len())?;
        writeln!(self.output, "  3) Extra packages         [{} selected]", sel.extra.len())?;
        writeln!(self.output, "  4) Dotfiles               [{}]", yes_no(sel.dotfiles))?;
        writeln!(self.output, "  5) Local AI models        [{} selected]", sel.models.len())?;
        writeln!(self.output, "  6) Cloud AI (Gemini)      [{}]", yes_no(sel.cloud_ai))?;
        writeln!(self.output, "  i) Start installation")?;
        writeln!(self.output, "  q) Quit")?;
        write!(self.output, "> ")?;
        self.output.flush()
    }

    /// Toggle entries of `selected` by number until an empty line.
    fn checklist(
        &mut self,
        title: &str,
        catalogue: &[(&str, &str)],
        selected: &mut Vec<String>,
    ) -> io::Result<()> {
        let ids: Vec<&str> = catalogue.iter().map(|(id, _)| *id).collect();
        loop {
            let rows: Vec<Row<'_>> = catalogue
                .iter()
                .map(|(id, label)| (*id, *label, selected.iter().any(|s| s == id)))
                .collect();
            self.print_checklist(title, &rows)?;

            let Some(line) = self.read_line()? else {
                return Ok(());
            };
            if line.is_empty() {
                return Ok(());
            }
            for token in line.split([' ', ',']).filter(|t| !t.is_empty()) {
                match token
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| ids.get(i))
                {
                    Some(id) => toggle(selected, id, &ids),
                    None => writeln!(self.output, "unknown item: {token}")?,
                }
            }
        }
    }

    fn print_checklist(&mut self, title: &str, rows: &[Row<'_>]) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{title} (numbers toggle, empty line returns)")?;
        for (i, (id, label, on)) in rows.iter().enumerate() {
            let mark = if *on { 'x' } else { ' ' };
            writeln!(self.output, "  [{mark}] {}) {id:<10} {label}", i + 1)?;
        }
        write!(self.output, "> ")?;
        self.output.flush()
    }

    /// Next trimmed input line, `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// `(name, label)` rows for a package group.
fn entries(group: &[PackageEntry]) -> Vec<(&str, &str)> {
    group
        .iter()
        .map(|p| (p.name.as_str(), p.description.as_deref().unwrap_or(&p.name)))
        .collect()
}
