//! Download options
//!
//! The request descriptor sent to the backend. Every enumerated field is a
//! closed type, so an out-of-domain value fails at construction (or when a
//! serialized configuration is read back) instead of reaching the wire.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::error::CobaltError;

/// ISO 639-1 code with an optional region/script subtag (`en`, `pt-BR`).
static LANGUAGE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("language code pattern is valid")
});

/// Invalid option value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("invalid value {value:?} for {field}")]
    OutOfDomain { field: &'static str, value: String },

    #[error("invalid dub language code: {0:?}")]
    InvalidLanguage(String),
}

/// Closed set of lowercase string values.
macro_rules! string_option {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = OptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(OptionError::OutOfDomain { field: $field, value: s.to_string() }),
                }
            }
        }
    };
}

/// Closed set of integers, sent to the backend as numeric strings.
macro_rules! numeric_option {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn value(self) -> u32 {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl TryFrom<u32> for $name {
            type Error = OptionError;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(OptionError::OutOfDomain { field: $field, value: value.to_string() }),
                }
            }
        }

        impl FromStr for $name {
            type Err = OptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value: u32 = s.trim().parse().map_err(|_| OptionError::OutOfDomain {
                    field: $field,
                    value: s.to_string(),
                })?;
                Self::try_from(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.value())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.value())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match NumericValue::deserialize(deserializer)? {
                    NumericValue::Number(value) => Self::try_from(value),
                    NumericValue::Text(text) => text.parse(),
                }
                .map_err(serde::de::Error::custom)
            }
        }
    };
}

/// The backend schema stringifies numbers; older echoes send plain integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumericValue {
    Number(u32),
    Text(String),
}

string_option! {
    /// What to keep from the source media
    DownloadMode, "downloadMode" {
        /// Audio track only
        Audio => "audio",
        /// Video with audio when present
        #[default]
        Auto => "auto",
        /// Video without audio
        Mute => "mute",
    }
}

string_option! {
    /// Audio container/codec for audio downloads
    AudioFormat, "audioFormat" {
        /// Keep the source audio without re-encoding
        #[default]
        Best => "best",
        Opus => "opus",
        Ogg => "ogg",
        Wav => "wav",
        Mp3 => "mp3",
    }
}

string_option! {
    /// Naming scheme for the produced file
    FilenameStyle, "filenameStyle" {
        /// `youtube_yPYZpwSpKmA_1920x1080_h264.mp4`
        Classic => "classic",
        /// `Video Title (1080p, h264).mp4`
        #[default]
        Basic => "basic",
        /// `Video Title (1080p, h264, youtube).mp4`
        Pretty => "pretty",
        /// `Video Title (1080p, h264, youtube, yPYZpwSpKmA).mp4`
        Nerdy => "nerdy",
    }
}

string_option! {
    /// Preferred YouTube video codec
    VideoCodec, "youtubeVideoCodec" {
        /// Widest compatibility, tops out at 1080p
        #[default]
        H264 => "h264",
        Av1 => "av1",
        Vp9 => "vp9",
    }
}

numeric_option! {
    /// Audio bitrate in kbps
    AudioBitrate, "audioBitrate" {
        Kbps8 => 8,
        Kbps64 => 64,
        Kbps96 => 96,
        #[default]
        Kbps128 => 128,
        Kbps256 => 256,
        Kbps320 => 320,
    }
}

numeric_option! {
    /// Target video height in pixels
    VideoQuality, "videoQuality" {
        P144 => 144,
        P240 => 240,
        P360 => 360,
        P480 => 480,
        P720 => 720,
        #[default]
        P1080 => 1080,
        P1440 => 1440,
        P2160 => 2160,
    }
}

/// Request body for a backend `POST /`
///
/// Field names on the wire follow the backend schema, not the Rust names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadOptions {
    /// Link to the media page. Must be set before running a request.
    pub url: String,
    #[serde(rename = "downloadMode")]
    pub mode: DownloadMode,
    /// Tunnel the file through the backend instead of redirecting.
    #[serde(rename = "alwaysProxy")]
    pub always_proxy: bool,
    #[serde(rename = "audioBitrate")]
    pub audio_bitrate: AudioBitrate,
    #[serde(rename = "audioFormat")]
    pub audio_format: AudioFormat,
    #[serde(rename = "filenameStyle")]
    pub filename_style: FilenameStyle,
    #[serde(rename = "videoQuality")]
    pub video_quality: VideoQuality,
    #[serde(rename = "youtubeVideoCodec")]
    pub video_codec: VideoCodec,
    #[serde(rename = "disableMetadata")]
    pub disable_metadata: bool,
    /// 1080p TikTok downloads at the cost of compatibility.
    #[serde(rename = "tiktokH265")]
    pub tiktok_h265: bool,
    /// Original sound used in a TikTok video.
    #[serde(rename = "tiktokFullAudio")]
    pub tiktok_full_audio: bool,
    /// Convert Twitter gifs (looping mp4s) to real `.gif` files.
    #[serde(rename = "twitterGif")]
    pub twitter_gif: bool,
    /// Download the dubbed YouTube audio track in `youtube_dub_lang`.
    #[serde(rename = "youtubeDubBrowserLang")]
    pub youtube_dubbed_audio: bool,
    #[serde(rename = "youtubeDubLang")]
    pub youtube_dub_lang: String,
    #[serde(rename = "youtubeHLS")]
    pub youtube_hls: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            url: String::new(),
            mode: DownloadMode::default(),
            always_proxy: false,
            audio_bitrate: AudioBitrate::default(),
            audio_format: AudioFormat::default(),
            filename_style: FilenameStyle::default(),
            video_quality: VideoQuality::default(),
            video_codec: VideoCodec::default(),
            disable_metadata: false,
            tiktok_h265: false,
            tiktok_full_audio: false,
            twitter_gif: true,
            youtube_dubbed_audio: false,
            youtube_dub_lang: "en".to_string(),
            youtube_hls: true,
        }
    }
}

impl DownloadOptions {
    /// Default options for the given media link
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Check the invariants that cannot be expressed in the types.
    pub fn validate(&self) -> Result<(), CobaltError> {
        if self.url.trim().is_empty() {
            return Err(CobaltError::EmptyUrl);
        }
        if !LANGUAGE_CODE.is_match(&self.youtube_dub_lang) {
            return Err(OptionError::InvalidLanguage(self.youtube_dub_lang.clone()).into());
        }
        Ok(())
    }
}
