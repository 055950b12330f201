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

use std::path::PathBuf;

use cast_session::SessionError;
use thiserror::Error;

use crate::state::PlaybackState;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    #[error("video content is not available at {}", .0.display())]
    ContentUnavailable(PathBuf),
    #[error("invalid media url `{0}`")]
    InvalidUrl(String),
    #[error("no video has been selected")]
    NoVideo,
    #[error("local engine is not ready")]
    EngineNotReady,
    #[error("cannot {0} while {1:?}")]
    InvalidState(&'static str, PlaybackState),
    #[error(transparent)]
    Remote(#[from] SessionError),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
