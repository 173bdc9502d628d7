use clap::{Args, Parser, Subcommand, ValueEnum};
use cobalt_client::{
    AudioBitrate, AudioFormat, DownloadMode, DownloadOptions, FilenameStyle, VideoCodec, VideoQuality,
};

#[derive(Parser, Debug)]
#[command(
    name = "cobalt",
    about = "Save media through a cobalt backend",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file path (toml, yaml or json)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Backend base URL, overrides the configuration
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Backend API key
    #[arg(long, global = true, env = "COBALT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Log level (trace, debug, info, warn, error) or a filter directive
    #[arg(long, global = true, env = "COBALT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show version and capabilities of a backend
    Info {
        /// Backend to query instead of the configured one
        api: Option<String>,
    },

    /// Ask the backend for a download link
    Run(RunArgs),

    /// List community instances running a compatible release
    Instances {
        /// Only show instances whose API is online
        #[arg(long)]
        online: bool,
    },

    /// Describe an error code
    Resolve {
        /// Error code, e.g. error.api.link.invalid
        code: String,
    },

    /// List the videos of a YouTube playlist
    Playlist {
        /// Playlist link
        url: String,
    },

    /// Show size, name and type of a download link
    Probe {
        /// Download link returned by `run`
        url: String,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Link to the media page
    pub url: String,

    /// What to save (auto, audio, mute)
    #[arg(short, long, default_value_t = DownloadMode::default())]
    pub mode: DownloadMode,

    /// Always tunnel the file through the backend
    #[arg(long)]
    pub always_proxy: bool,

    /// Audio bitrate in kbps (8, 64, 96, 128, 256, 320)
    #[arg(long, default_value_t = AudioBitrate::default())]
    pub audio_bitrate: AudioBitrate,

    /// Audio format (best, opus, ogg, wav, mp3)
    #[arg(short, long, default_value_t = AudioFormat::default())]
    pub audio_format: AudioFormat,

    /// File name style (classic, basic, pretty, nerdy)
    #[arg(long, default_value_t = FilenameStyle::default())]
    pub filename_style: FilenameStyle,

    /// Video height (144 to 2160)
    #[arg(short = 'q', long, default_value_t = VideoQuality::default())]
    pub video_quality: VideoQuality,

    /// YouTube video codec (h264, av1, vp9)
    #[arg(long, default_value_t = VideoCodec::default())]
    pub video_codec: VideoCodec,

    /// Strip file metadata
    #[arg(long)]
    pub disable_metadata: bool,

    /// Allow H265 for TikTok videos
    #[arg(long)]
    pub tiktok_h265: bool,

    /// Save the original TikTok sound
    #[arg(long)]
    pub tiktok_full_audio: bool,

    /// Keep Twitter gifs as mp4
    #[arg(long)]
    pub no_twitter_gif: bool,

    /// Use the dubbed YouTube audio track
    #[arg(long)]
    pub youtube_dubbed_audio: bool,

    /// Language of the dubbed audio track
    #[arg(long, default_value = "en")]
    pub youtube_dub_lang: String,

    /// Do not use HLS for YouTube
    #[arg(long)]
    pub no_youtube_hls: bool,
}

impl RunArgs {
    pub fn to_options(&self) -> DownloadOptions {
        DownloadOptions {
            url: self.url.clone(),
            mode: self.mode,
            always_proxy: self.always_proxy,
            audio_bitrate: self.audio_bitrate,
            audio_format: self.audio_format,
            filename_style: self.filename_style,
            video_quality: self.video_quality,
            video_codec: self.video_codec,
            disable_metadata: self.disable_metadata,
            tiktok_h265: self.tiktok_h265,
            tiktok_full_audio: self.tiktok_full_audio,
            twitter_gif: !self.no_twitter_gif,
            youtube_dubbed_audio: self.youtube_dubbed_audio,
            youtube_dub_lang: self.youtube_dub_lang.clone(),
            youtube_hls: !self.no_youtube_hls,
        }
    }
}
