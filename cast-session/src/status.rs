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

use serde::{Deserialize, Serialize};

/// Normalized lifecycle of a remote session, including the media sub-states
/// reported by the receiver once something is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Initial,
    Starting,
    Started,
    Resuming,
    Resumed,
    Suspended,
    Ended,
    Failed(String),
    Connected,
    Buffering,
    Idle,
    Loading,
    Playing,
    Paused,
    FinishedPlaying,
}

/// Player state as reported by the receiver, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RemotePlayerState {
    #[default]
    Unknown,
    Idle,
    Buffering,
    Loading,
    Playing,
    Paused,
}

/// Secondary code accompanying [`RemotePlayerState::Idle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdleReason {
    /// Nothing has been loaded yet.
    #[default]
    None,
    Finished,
    Cancelled,
    Interrupted,
    Error,
}

/// Map a receiver media state onto a [`SessionStatus`].
///
/// An idle player with any reason other than [`IdleReason::None`] has stopped
/// playing something, which is reported as [`SessionStatus::FinishedPlaying`].
/// Returns `None` when the state is unknown and no status change should happen.
pub fn normalize_media_state(
    state: RemotePlayerState,
    idle_reason: IdleReason,
) -> Option<SessionStatus> {
    Some(match state {
        RemotePlayerState::Unknown => return None,
        RemotePlayerState::Idle => match idle_reason {
            IdleReason::None => SessionStatus::Idle,
            _ => SessionStatus::FinishedPlaying,
        },
        RemotePlayerState::Buffering => SessionStatus::Buffering,
        RemotePlayerState::Loading => SessionStatus::Loading,
        RemotePlayerState::Playing => SessionStatus::Playing,
        RemotePlayerState::Paused => SessionStatus::Paused,
    })
}

#[cfg(test)]
mod tests {
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    use super::*;

    impl Arbitrary for IdleReason {
        fn arbitrary(g: &mut Gen) -> Self {
            *g.choose(&[
                Self::None,
                Self::Finished,
                Self::Cancelled,
                Self::Interrupted,
                Self::Error,
            ])
            .unwrap()
        }
    }

    #[test]
    fn idle_without_reason_is_idle() {
        assert_eq!(
            normalize_media_state(RemotePlayerState::Idle, IdleReason::None),
            Some(SessionStatus::Idle)
        );
    }

    #[test]
    fn idle_with_reason_is_finished() {
        for reason in [
            IdleReason::Finished,
            IdleReason::Cancelled,
            IdleReason::Interrupted,
            IdleReason::Error,
        ] {
            assert_eq!(
                normalize_media_state(RemotePlayerState::Idle, reason),
                Some(SessionStatus::FinishedPlaying),
                "{reason:?}"
            );
        }
    }

    #[test]
    fn unknown_state_is_ignored() {
        assert_eq!(
            normalize_media_state(RemotePlayerState::Unknown, IdleReason::Error),
            None
        );
    }

    #[quickcheck]
    fn idle_reason_only_matters_when_idle(reason: IdleReason) -> bool {
        normalize_media_state(RemotePlayerState::Playing, reason) == Some(SessionStatus::Playing)
            && normalize_media_state(RemotePlayerState::Paused, reason)
                == Some(SessionStatus::Paused)
            && normalize_media_state(RemotePlayerState::Buffering, reason)
                == Some(SessionStatus::Buffering)
    }
}
