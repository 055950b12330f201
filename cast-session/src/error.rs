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

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no cast session is connected")]
    NotConnected,
    #[error("cast transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
