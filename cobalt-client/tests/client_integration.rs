// End-to-end tests of the client against a mock cobalt backend
//
// Run with: cargo test -p cobalt-client --test client_integration

use cobalt_client::{
    AudioFormat, ClientConfig, CobaltClient, CobaltError, DownloadOptions, Media, VideoCodec,
};
use serde_json::json;
use wiremock::matchers::{any, body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server_info() -> serde_json::Value {
    json!({
        "cobalt": {
            "version": "10.9.4",
            "url": "http://127.0.0.1/",
            "startTime": "1730000000000",
            "durationLimit": 10800,
            "services": ["youtube", "soundcloud"]
        },
        "git": { "branch": "main", "commit": "d5f2ab1", "remote": "imputnet/cobalt" }
    })
}

fn client_for(server: &MockServer) -> CobaltClient {
    let config = ClientConfig {
        api_url: server.uri(),
        api_key: "secret".to_string(),
        instances_url: format!("{}/api/instances.json", server.uri()),
        playlist_api_url: format!("{}/api/getvideos", server.uri()),
        ..ClientConfig::default()
    };
    CobaltClient::new(config).expect("client builds")
}

async fn mount_server_info(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_info()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_server_info() {
    let server = MockServer::start().await;
    mount_server_info(&server).await;

    let info = client_for(&server).server_info().await.unwrap();
    assert_eq!(info.version(), "10.9.4");
    assert_eq!(info.git.commit, "d5f2ab1");
    assert!(info.supports_service("soundcloud"));
}

#[tokio::test]
async fn test_run_sends_wire_request() {
    let server = MockServer::start().await;
    mount_server_info(&server).await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("authorization", "Api-Key secret"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "url": "https://www.youtube.com/watch?v=ud4cyuj2Z3A",
            "audioFormat": "ogg",
            "youtubeVideoCodec": "vp9",
            "videoQuality": "1080",
            "audioBitrate": "128",
            "twitterGif": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "tunnel",
            "url": "http://127.0.0.1/tunnel?id=abc",
            "filename": "Sullivan King - Thrones of Blood (1080p, vp9).webm"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut options = DownloadOptions::new("https://www.youtube.com/watch?v=ud4cyuj2Z3A");
    options.audio_format = AudioFormat::Ogg;
    options.video_codec = VideoCodec::Vp9;
    let snapshot = options.clone();

    let result = client_for(&server).run(&options).await.unwrap();
    assert!(matches!(result.media, Media::Tunnel(_)));
    assert!(result.filename().unwrap().contains("Thrones of Blood"));
    assert_eq!(result.server.version(), "10.9.4");
    assert_eq!(options, snapshot);
}

#[tokio::test]
async fn test_run_picker() {
    let server = MockServer::start().await;
    mount_server_info(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "picker",
            "picker": [
                { "type": "photo", "url": "http://127.0.0.1/1.jpg" },
                { "type": "gif", "url": "http://127.0.0.1/2.gif", "thumb": "http://127.0.0.1/2t.jpg" }
            ]
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .run(&DownloadOptions::new("https://x.com/i/status/1"))
        .await
        .unwrap();
    assert_eq!(result.picker().unwrap().len(), 2);
    assert!(result.url().is_none());
}

#[tokio::test]
async fn test_run_propagates_backend_error_code() {
    let server = MockServer::start().await;
    mount_server_info(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "error": { "code": "error.api.auth.key.invalid" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run(&DownloadOptions::new("https://www.youtube.com/watch?v=notreal"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "error.api.auth.key.invalid");
    let described = cobalt_client::resolve(&err.to_string());
    assert!(described.contains("api key"));
    assert!(described.contains("error.api.auth.key.invalid"));
}

#[tokio::test]
async fn test_run_error_context() {
    let server = MockServer::start().await;
    mount_server_info(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "error": { "code": "error.api.fetch.rate", "context": { "service": "youtube" } }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run(&DownloadOptions::new("https://youtu.be/x"))
        .await
        .unwrap_err();
    let api_error = err.api_error().unwrap();
    assert_eq!(api_error.service(), Some("youtube"));
    assert_eq!(api_error.limit(), None);
}

#[tokio::test]
async fn test_empty_url_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run(&DownloadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CobaltError::EmptyUrl));
}

#[tokio::test]
async fn test_unhealthy_backend_is_never_posted_to() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run(&DownloadOptions::new("https://youtu.be/x"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("error.net.generic"));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let config = ClientConfig {
        api_url: "http://127.0.0.1:9".to_string(),
        timeout_seconds: 2,
        ..ClientConfig::default()
    };
    let client = CobaltClient::new(config).unwrap();

    let err = client
        .run(&DownloadOptions::new("https://youtu.be/x"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "error.net.generic");

    let err = client.server_info().await.unwrap_err();
    assert_eq!(err.code(), Some("error.net.failed"));
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = MockServer::start().await;
    mount_server_info(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run(&DownloadOptions::new("https://youtu.be/x"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "error.net.invalid_response");
}

#[tokio::test]
async fn test_list_instances_filters_by_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/instances.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "api": "old.example.org", "version": "9.9.9", "online": { "api": true, "frontend": true } },
            { "api": "ten.example.org", "version": "10.0.0", "trust": 1, "online": { "api": true, "frontend": false } },
            { "api": "new.example.org", "version": "10.2.1", "protocol": "http", "online": { "api": false, "frontend": false } },
            { "api": "odd.example.org", "version": "bad-version" },
            { "api": "null.example.org", "version": null, "trust": null }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let instances = client_for(&server).list_instances().await.unwrap();
    let apis: Vec<_> = instances.iter().map(|i| i.api.as_str()).collect();
    assert_eq!(apis, ["ten.example.org", "new.example.org"]);
    assert!(instances[0].is_api_online());
    assert_eq!(instances[1].api_url(), "http://new.example.org");
}

#[tokio::test]
async fn test_list_instances_directory_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/instances.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).list_instances().await.unwrap_err();
    assert!(matches!(err, CobaltError::Http { status, .. } if status.as_u16() == 503));
}

#[tokio::test]
async fn test_list_instances_rejects_bad_floor() {
    let server = MockServer::start().await;
    let config = ClientConfig {
        instances_url: format!("{}/api/instances.json", server.uri()),
        min_instance_version: "latest".to_string(),
        ..ClientConfig::default()
    };

    let err = CobaltClient::new(config)
        .unwrap()
        .list_instances()
        .await
        .unwrap_err();
    assert!(matches!(err, CobaltError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_youtube_playlist() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/getvideos"))
        .and(query_param(
            "url",
            "https://youtube.com/playlist?list=PLDKxz_KUEUfMDTqDgv4eHuZq1u_SQtRiu",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            "https://youtu.be/gYygotHLyjo",
            "https://youtu.be/ud4cyuj2Z3A"
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let videos = client_for(&server)
        .youtube_playlist("https://youtube.com/playlist?list=PLDKxz_KUEUfMDTqDgv4eHuZq1u_SQtRiu")
        .await
        .unwrap();
    assert_eq!(videos[0], "https://youtu.be/gYygotHLyjo");
    assert_eq!(videos.len(), 2);
}

#[tokio::test]
async fn test_youtube_playlist_rejects_non_url() {
    let server = MockServer::start().await;
    let err = client_for(&server)
        .youtube_playlist("not a playlist")
        .await
        .unwrap_err();
    assert!(matches!(err, CobaltError::InvalidUrl(_)));
}

#[tokio::test]
#[allow(deprecated)]
async fn test_probe_media() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/files/track.mp3"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .insert_header("content-disposition", "attachment; filename=\"Track - Artist.mp3\""),
        )
        .mount(&server)
        .await;

    let info = client_for(&server)
        .probe_media(&format!("{}/files/track.mp3", server.uri()))
        .await
        .unwrap();
    assert_eq!(info.name, "Track - Artist.mp3");
    assert_eq!(info.mime, "audio/mpeg");
}
