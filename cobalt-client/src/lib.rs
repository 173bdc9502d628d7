// Cobalt API client
//
// Typed client for cobalt (https://cobalt.tools) media extraction backends.
//
// Architecture:
// - options:   request descriptor with closed option domains
// - response:  status-tagged response decoding
// - taxonomy:  error code descriptions
// - client:    request pipeline (liveness probe, POST, classification)
// - instances: community instance directory and version filtering
// - playlist:  YouTube playlist expansion
// - media:     HEAD probe of download links
// - config:    layered configuration (defaults, file, COBALT_* env)
// - transport: HTTP seam (reqwest by default, stubbed in tests)

pub mod client;
pub mod config;
pub mod error;
pub mod instances;
pub mod media;
pub mod options;
pub mod playlist;
pub mod response;
pub mod server;
pub mod taxonomy;
pub mod transport;

pub use client::{normalize_api_url, CobaltClient};
pub use config::ClientConfig;
pub use error::CobaltError;
pub use instances::{filter_compatible, parse_version, InstanceRecord, OnlineStatus};
pub use media::MediaInfo;
pub use options::{
    AudioBitrate, AudioFormat, DownloadMode, DownloadOptions, FilenameStyle, OptionError, VideoCodec,
    VideoQuality,
};
pub use response::{
    decode, ApiError, ApiResponse, DecodeError, Download, DownloadResponse, ErrorContext, Media, Picker,
    PickerItem, PickerItemType,
};
pub use server::{BackendInfo, GitInfo, ServerInfo};
pub use taxonomy::resolve;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
