//! Line-based terminal front-end for a game session.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use cities_core::{
    models::display_name, CityRecord, EventSink, MoveSource, Player, RejectReason, SessionEvent,
    SessionOutcome, SessionReport,
};
use crossterm::style::Stylize;

/// Reads one move per line.
pub struct LineInput<R> {
    reader: R,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> MoveSource for LineInput<R> {
    fn next_move(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("failed to read move")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Writes the game transcript in Russian.
pub struct Transcript<W> {
    out: W,
}

impl<W: Write> Transcript<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn greet(&mut self, cities: usize) -> Result<()> {
        writeln!(self.out, "{}", "Игра в города".bold())?;
        writeln!(
            self.out,
            "Называйте города по очереди: каждый следующий начинается на последнюю букву предыдущего."
        )?;
        writeln!(self.out, "Городов в справочнике: {cities}")?;
        Ok(())
    }

    /// Warn that the dataset could not be used and the catalog is empty.
    pub fn dataset_unavailable(&mut self, reason: &str) -> Result<()> {
        writeln!(self.out, "{} {reason}. Справочник пуст.", "Внимание:".yellow())?;
        Ok(())
    }

    pub fn summary(&mut self, report: &SessionReport) -> Result<()> {
        writeln!(self.out, "{}", "=".repeat(40))?;
        writeln!(
            self.out,
            "Ходов: {} (вы: {}, компьютер: {})",
            report.moves.len(),
            report.moves_by(Player::Human),
            report.moves_by(Player::Computer)
        )?;
        writeln!(
            self.out,
            "Длительность: {} с",
            report.duration().num_seconds()
        )?;
        self.out.flush().context("failed to flush output")
    }

    fn describe(city: &CityRecord) -> String {
        format!(
            "{} ({}, {}, население {})",
            city.display_name(),
            city.subject,
            city.district,
            city.population
        )
    }

    fn rejection(reason: &RejectReason) -> String {
        match reason {
            RejectReason::UnknownCity { input } => {
                format!("Города «{}» нет в справочнике.", display_name(input))
            }
            RejectReason::WrongLetter { required, found } => format!(
                "Город должен начинаться на букву «{}», а не «{}».",
                required.to_uppercase(),
                found.to_uppercase()
            ),
            RejectReason::AlreadyUsed { city } => {
                format!("Город «{}» уже был назван.", display_name(city))
            }
        }
    }
}

impl<W: Write> EventSink for Transcript<W> {
    fn emit(&mut self, event: &SessionEvent) -> Result<()> {
        match event {
            SessionEvent::Opened { city } => {
                writeln!(self.out, "Компьютер начинает: {}", Self::describe(city))?;
            }
            SessionEvent::AwaitingHuman { required } => match required {
                Some(letter) => {
                    write!(self.out, "Ваш город на букву «{}»: ", letter.to_uppercase())?
                }
                None => write!(self.out, "Ваш город: ")?,
            },
            SessionEvent::HumanMoved { city } => {
                writeln!(self.out, "Принято: {}", Self::describe(city))?;
            }
            SessionEvent::HumanRejected { reason } => {
                writeln!(self.out, "{}", Self::rejection(reason).red())?;
            }
            SessionEvent::ComputerMoved { city } => {
                writeln!(self.out, "Компьютер: {}", Self::describe(city))?;
            }
            SessionEvent::ComputerStuck { required } => match required {
                Some(letter) => writeln!(
                    self.out,
                    "Компьютер не знает города на букву «{}».",
                    letter.to_uppercase()
                )?,
                None => writeln!(self.out, "Компьютеру нечем начать игру.")?,
            },
            SessionEvent::Finished { outcome } => {
                let message = match outcome {
                    SessionOutcome::ComputerLost => "Вы победили!".green().bold(),
                    SessionOutcome::HumanLost(_) => "Вы проиграли.".red().bold(),
                    SessionOutcome::Abandoned => "Игра прервана.".yellow(),
                };
                writeln!(self.out)?;
                writeln!(self.out, "{message}")?;
            }
        }
        // Prompts have no trailing newline, so flush every time.
        self.out.flush().context("failed to flush output")
    }
}
