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

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::PlayerError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl From<&str> for VideoId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for VideoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DownloadState {
    #[default]
    NotStarted,
    Partial,
    Complete,
}

/// A course video as handed to [`crate::Coordinator::play`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub remote_url: String,
    /// Download location without the `.mp4` extension.
    pub local_path: Option<PathBuf>,
    #[serde(default)]
    pub download_state: DownloadState,
    pub thumbnail_url: Option<String>,
    /// Possibly relative to the configured base URL.
    pub course_image_url: Option<String>,
}

impl Video {
    pub fn new(id: impl Into<VideoId>, title: impl Into<String>, remote_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            remote_url: remote_url.into(),
            local_path: None,
            download_state: DownloadState::NotStarted,
            thumbnail_url: None,
            course_image_url: None,
        }
    }

    fn downloaded_file(&self) -> Option<PathBuf> {
        self.local_path.as_ref().map(|path| {
            let mut file = path.clone().into_os_string();
            file.push(".mp4");
            PathBuf::from(file)
        })
    }

    /// URL to hand to an endpoint: the downloaded file when it exists,
    /// otherwise the remote URL.
    pub fn content_url(&self) -> Result<String, PlayerError> {
        if let Some(file) = self.downloaded_file() {
            if file.exists() {
                let file = file.canonicalize().unwrap_or(file);
                return Url::from_file_path(&file)
                    .map(String::from)
                    .map_err(|_| PlayerError::InvalidUrl(file.display().to_string()));
            }
        }

        Url::parse(&self.remote_url)
            .map(String::from)
            .map_err(|_| PlayerError::InvalidUrl(self.remote_url.clone()))
    }

    /// Like [`Video::content_url`], but a download that claims completion
    /// must have its file on disk.
    pub fn local_content_url(&self) -> Result<String, PlayerError> {
        if self.download_state == DownloadState::Complete {
            if let Some(file) = self.downloaded_file() {
                if !file.exists() {
                    return Err(PlayerError::ContentUnavailable(file));
                }
            }
        }

        self.content_url()
    }

    /// The video thumbnail, falling back to the course image.
    pub fn thumbnail(&self, base_url: Option<&Url>) -> Option<String> {
        if let Some(thumbnail) = &self.thumbnail_url {
            return Some(thumbnail.clone());
        }

        let image = self.course_image_url.as_deref()?;
        match Url::parse(image) {
            Ok(url) => Some(url.into()),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                base_url.and_then(|base| base.join(image).ok()).map(String::from)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> Video {
        Video::new("v1", "Intro", "https://cdn.example.com/v1.mp4")
    }

    #[test]
    fn remote_url_without_download() {
        assert_eq!(
            video().local_content_url().unwrap(),
            "https://cdn.example.com/v1.mp4"
        );
    }

    #[test]
    fn downloaded_file_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("v1");
        std::fs::write(base.with_extension("mp4"), b"").unwrap();

        let mut video = video();
        video.local_path = Some(base);
        video.download_state = DownloadState::Complete;

        let url = video.local_content_url().unwrap();
        assert!(url.starts_with("file://"), "{url}");
        assert!(url.ends_with("v1.mp4"), "{url}");
    }

    #[test]
    fn completed_download_without_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut video = video();
        video.local_path = Some(dir.path().join("missing"));
        video.download_state = DownloadState::Complete;

        assert!(matches!(
            video.local_content_url(),
            Err(PlayerError::ContentUnavailable(_))
        ));
        // Remote playback streams instead.
        assert_eq!(video.content_url().unwrap(), "https://cdn.example.com/v1.mp4");
    }

    #[test]
    fn invalid_remote_url() {
        let video = Video::new("v1", "Intro", "not a url");
        assert!(matches!(video.content_url(), Err(PlayerError::InvalidUrl(_))));
    }

    #[test]
    fn thumbnail_falls_back_to_course_image() {
        let base = Url::parse("https://courses.example.com/").unwrap();
        let mut video = video();
        video.course_image_url = Some("/asset/course.png".to_owned());
        assert_eq!(
            video.thumbnail(Some(&base)).as_deref(),
            Some("https://courses.example.com/asset/course.png")
        );
        assert_eq!(video.thumbnail(None), None);

        video.thumbnail_url = Some("https://cdn.example.com/v1.png".to_owned());
        assert_eq!(
            video.thumbnail(Some(&base)).as_deref(),
            Some("https://cdn.example.com/v1.png")
        );
    }
}
