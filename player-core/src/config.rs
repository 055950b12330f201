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

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// How long local playback may take to become ready before it is
    /// abandoned.
    pub readiness_timeout_secs: f64,
    /// Period of the readiness check that resumes a deferred playback.
    pub resume_poll_interval_ms: u64,
    /// Period of elapsed/duration updates to the UI.
    pub progress_interval_ms: u64,
    pub skip_backward_secs: f64,
    /// Base for relative course image URLs.
    pub base_url: Option<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            readiness_timeout_secs: 60.0,
            resume_poll_interval_ms: 333,
            progress_interval_ms: 1000,
            skip_backward_secs: 30.0,
            base_url: None,
        }
    }
}

impl PlayerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        if !config.readiness_timeout_secs.is_finite() || config.readiness_timeout_secs <= 0.0 {
            anyhow::bail!(
                "readiness_timeout_secs must be positive, got {}",
                config.readiness_timeout_secs
            );
        }
        if let Some(base_url) = &config.base_url {
            Url::parse(base_url).context("invalid base_url")?;
        }
        Ok(config)
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.readiness_timeout_secs)
    }

    pub fn resume_poll_interval(&self) -> Duration {
        Duration::from_millis(self.resume_poll_interval_ms)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    pub fn base_url(&self) -> Option<Url> {
        self.base_url.as_deref().and_then(|url| Url::parse(url).ok())
    }
}
