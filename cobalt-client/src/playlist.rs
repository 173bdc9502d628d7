//! YouTube playlist expansion through the companion playlist service

use reqwest::Method;
use tracing::debug;
use url::Url;

use crate::client::CobaltClient;
use crate::error::CobaltError;

impl CobaltClient {
    /// Expand a YouTube playlist link into the links of its videos.
    pub async fn youtube_playlist(&self, playlist: &str) -> Result<Vec<String>, CobaltError> {
        let playlist = Url::parse(playlist.trim())?;

        let mut endpoint = Url::parse(&self.config().playlist_api_url)
            .map_err(|e| CobaltError::InvalidConfig(format!("invalid playlist api url: {e}")))?;
        endpoint
            .query_pairs_mut()
            .append_pair("url", playlist.as_str());

        let response = self.fetch_ok(self.request(Method::GET, endpoint)?).await?;
        let videos: Vec<String> = serde_json::from_slice(&response.body)
            .map_err(|e| CobaltError::invalid_response(e.to_string()))?;
        debug!(playlist = %playlist, count = videos.len(), "expanded playlist");
        Ok(videos)
    }
}
