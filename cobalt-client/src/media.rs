//! Media metadata probe (`HEAD` on a download link)

use percent_encoding::percent_decode_str;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use crate::client::CobaltClient;
use crate::error::CobaltError;

/// What a `HEAD` request reveals about a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaInfo {
    /// Size in bytes, 0 when the server does not say
    pub size: u64,
    pub name: String,
    pub mime: String,
}

impl CobaltClient {
    /// Fetch size, file name and mime type of a download link.
    #[deprecated(note = "tunnel and redirect responses already carry the file name")]
    pub async fn probe_media(&self, url: &str) -> Result<MediaInfo, CobaltError> {
        let url = Url::parse(url.trim())?;
        let response = self.fetch_ok(self.request(Method::HEAD, url)?).await?;

        let name = response
            .header(CONTENT_DISPOSITION.as_str())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| last_path_segment(&response.url));

        let size = match response.header(CONTENT_LENGTH.as_str()) {
            None => 0,
            Some(raw) => raw.trim().parse().map_err(|_| {
                CobaltError::invalid_response(format!("invalid content length: {raw:?}"))
            })?,
        };

        Ok(MediaInfo {
            size,
            name,
            mime: response.header(CONTENT_TYPE.as_str()).unwrap_or_default().to_string(),
        })
    }
}

/// File name from a `Content-Disposition` value.
///
/// Prefers the RFC 5987 `filename*=` form over the plain `filename=`.
fn filename_from_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    for param in split_params(value).into_iter().skip(1) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let raw = raw.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                // charset'language'percent-encoded-name
                let encoded = raw.splitn(3, '\'').nth(2).unwrap_or(raw);
                if let Ok(decoded) = percent_decode_str(encoded).decode_utf8() {
                    if !decoded.is_empty() {
                        return Some(decoded.into_owned());
                    }
                }
            }
            "filename" => plain = Some(unquote(raw)),
            _ => {}
        }
    }
    plain.filter(|name| !name.is_empty())
}

/// Split a header value on `;` outside quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);
    params
}

/// Strip surrounding quotes and undo `\"` / `\\` escapes.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) else {
        return raw.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn last_path_segment(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|url| {
            url.path_segments()?
                .filter(|segment| !segment.is_empty())
                .next_back()
                .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bytes::Bytes;
    use reqwest::header::{HeaderMap, HeaderValue};
    use reqwest::StatusCode;

    use crate::config::ClientConfig;
    use crate::transport::{HttpResponse, MockTransport};

    fn probe_client(headers: HeaderMap, status: StatusCode) -> CobaltClient {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.method == Method::HEAD)
            .times(1)
            .returning(move |req| {
                Ok(HttpResponse {
                    status,
                    url: req.url,
                    headers: headers.clone(),
                    body: Bytes::new(),
                })
            });
        CobaltClient::with_transport(ClientConfig::default(), Arc::new(transport))
    }

    #[tokio::test]
    async fn test_probe_reads_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1234"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static(r#"attachment; filename="clip.mp4""#),
        );

        let info = probe_client(headers, StatusCode::OK)
            .probe_media("https://cdn.local/tunnel?id=1")
            .await
            .unwrap();
        assert_eq!(
            info,
            MediaInfo {
                size: 1234,
                name: "clip.mp4".to_string(),
                mime: "video/mp4".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_probe_falls_back_to_url_and_zero_size() {
        let info = probe_client(HeaderMap::new(), StatusCode::OK)
            .probe_media("https://cdn.local/files/song.opus")
            .await
            .unwrap();
        assert_eq!(info.size, 0);
        assert_eq!(info.name, "song.opus");
        assert!(info.mime.is_empty());
    }

    #[tokio::test]
    async fn test_probe_rejects_bad_length() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("lots"));

        let err = probe_client(headers, StatusCode::OK)
            .probe_media("https://cdn.local/a.mp4")
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some("error.net.invalid_response"));
    }

    #[tokio::test]
    async fn test_probe_requires_ok_status() {
        let err = probe_client(HeaderMap::new(), StatusCode::NOT_FOUND)
            .probe_media("https://cdn.local/a.mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, CobaltError::Http { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_filename_from_disposition() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="clip (1080p, h264).mp4""#).as_deref(),
            Some("clip (1080p, h264).mp4")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=plain.mp3").as_deref(),
            Some("plain.mp3")
        );
        assert_eq!(
            filename_from_disposition(
                r#"attachment; filename="fallback.mp4"; filename*=UTF-8''%E2%9C%93%20check.mp4"#
            )
            .as_deref(),
            Some("✓ check.mp4")
        );
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="a; b.mp4""#).as_deref(),
            Some("a; b.mp4")
        );
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="say \"hi\"; ok.mp4"; size=10"#).as_deref(),
            Some(r#"say "hi"; ok.mp4"#)
        );
        assert_eq!(filename_from_disposition("inline"), None);
        assert_eq!(filename_from_disposition(r#"attachment; filename="""#), None);
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(last_path_segment("https://cdn.local/a/b/My%20File.mp4?x=1"), "My File.mp4");
        assert_eq!(last_path_segment("https://cdn.local/a/"), "a");
        assert_eq!(last_path_segment("https://cdn.local/"), "");
        assert_eq!(last_path_segment("not a url"), "");
    }
}
