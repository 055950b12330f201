// Copyright (C) 2025 Marcus L. Hanestad <marlhan@proton.me>
//
// This file is part of CastPlay.
//
// CastPlay is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// CastPlay is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with CastPlay.  If not, see <https://www.gnu.org/licenses/>.

use player_core::state::PlaybackState;
use player_core::store::PlaybackSpeed;
use player_core::ui::{ControlsVisibility, FailureKind, PlayerUi};
use player_core::Command;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a number")]
    InvalidNumber(String),
    #[error("unsupported speed {0}, use 0.5, 1, 1.5 or 2")]
    InvalidSpeed(f64),
}

/// One line typed at the prompt.
#[derive(Debug, PartialEq)]
pub enum Input {
    /// Start the video given on the command line.
    PlayVideo,
    /// Connect to the simulated receiver.
    Cast,
    Command(Command),
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
play            start the video
toggle | p      play/pause
pause | resume
seek <secs>     jump to a position
back            skip backwards
scrub <0..1>    release the slider at a fraction of the duration
speed <rate>    0.5, 1, 1.5 or 2
cast | uncast   connect to or leave the receiver
bg              simulate the app going to the background
stop | quit";

fn number(arg: Option<&str>, command: &'static str) -> Result<f64, ParseError> {
    let arg = arg.ok_or(ParseError::MissingArgument(command))?;
    arg.parse()
        .map_err(|_| ParseError::InvalidNumber(arg.to_owned()))
}

pub fn parse_line(line: &str) -> Result<Input, ParseError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(Input::Empty);
    };
    let arg = words.next();

    let command = match word {
        "play" => return Ok(Input::PlayVideo),
        "cast" => return Ok(Input::Cast),
        "help" | "?" => return Ok(Input::Help),
        "quit" | "q" | "exit" => return Ok(Input::Quit),
        "toggle" | "p" => Command::PlayPause,
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "seek" => Command::Seek(number(arg, "seek")?),
        "back" => Command::SkipBackward,
        "scrub" => Command::ScrubEnded(number(arg, "scrub")?),
        "speed" => {
            let rate = number(arg, "speed")?;
            Command::SetSpeed(PlaybackSpeed::from_rate(rate).ok_or(ParseError::InvalidSpeed(rate))?)
        }
        "uncast" => Command::Disconnect,
        "bg" => Command::AppWillResignActive,
        "stop" => Command::Stop,
        other => return Err(ParseError::Unknown(other.to_owned())),
    };

    Ok(Input::Command(command))
}

/// Prints what a graphical player would render.
#[derive(Debug, Default)]
pub struct ConsoleUi {
    last_second: Option<u64>,
}

impl PlayerUi for ConsoleUi {
    fn on_state_changed(&mut self, state: PlaybackState) {
        println!("[{state:?}]");
    }

    fn on_position_updated(&mut self, elapsed: f64, duration: f64) {
        let second = elapsed as u64;
        if self.last_second == Some(second) {
            return;
        }
        self.last_second = Some(second);
        println!("  {elapsed:>6.1}s / {duration:.1}s");
    }

    fn on_failure(&mut self, kind: FailureKind, message: &str) {
        eprintln!("! {kind:?}: {message}");
    }

    fn on_transcript_visibility_changed(&mut self, visible: bool) {
        println!("  transcripts {}", if visible { "shown" } else { "hidden" });
    }

    fn on_casting_overlay_changed(&mut self, visible: bool) {
        if visible {
            println!("  casting...");
        }
    }

    fn on_controls_visibility_changed(&mut self, visibility: ControlsVisibility) {
        println!("  controls: {visibility:?}");
    }

    fn on_loading_changed(&mut self, loading: bool) {
        if loading {
            println!("  loading...");
        }
    }

    fn on_playback_finished(&mut self) {
        println!("  finished");
    }
}
