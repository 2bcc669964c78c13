//! Keyboard stand-in for the rotary encoder and its push button.
//!
//! Each line typed on stdin is a sequence of commands: `d`, `+` or `>` turn
//! one detent forward, `a`, `-` or `<` one detent backward, `s` or a bare
//! Enter presses select. Turns are played as raw line levels through a
//! [`QuadratureSampler`], the same path a GPIO reader takes.

use crate::{
    encoder::{detent_waveform, QuadratureSampler},
    panel::{PanelEvent, PanelSender},
};
use std::{
    io::BufRead,
    thread::{self, JoinHandle},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Forward,
    Backward,
    Select,
}

pub fn parse_line(line: &str) -> Vec<KeyCommand> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return vec![KeyCommand::Select];
    }
    trimmed
        .chars()
        .filter_map(|c| match c.to_ascii_lowercase() {
            'd' | '+' | '>' => Some(KeyCommand::Forward),
            'a' | '-' | '<' => Some(KeyCommand::Backward),
            's' => Some(KeyCommand::Select),
            _ => None,
        })
        .collect()
}

/// Panel events a command produces.
pub fn events_for(command: KeyCommand, sampler: &mut QuadratureSampler) -> Vec<PanelEvent> {
    match command {
        KeyCommand::Select => vec![PanelEvent::SelectPressed],
        KeyCommand::Forward | KeyCommand::Backward => {
            detent_waveform(command == KeyCommand::Forward)
                .iter()
                .filter_map(|(clk, dt)| sampler.sample(*clk, *dt))
                .map(|data_high| PanelEvent::ClockFalling { data_high })
                .collect()
        }
    }
}

/// Forwards commands read from `reader` until it ends or the panel is gone.
pub fn feed_lines<R: BufRead>(reader: R, sender: &PanelSender) {
    let mut sampler = QuadratureSampler::new();
    for line in reader.lines() {
        let Ok(line) = line else {
            break;
        };
        for command in parse_line(&line) {
            for event in events_for(command, &mut sampler) {
                if !sender.send(event) {
                    return;
                }
            }
        }
    }
    log::debug!("keyboard input ended");
}

pub fn spawn_keyboard_reader(sender: PanelSender) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("keyboard-panel".to_owned())
        .spawn(move || feed_lines(std::io::stdin().lock(), &sender))
}
