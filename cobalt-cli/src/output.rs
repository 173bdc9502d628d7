use cobalt_client::{DownloadResponse, InstanceRecord, Media, MediaInfo, PickerItemType, ServerInfo};
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_server_info(info: &ServerInfo) {
    println!("version:  {}", info.version());
    println!("url:      {}", info.cobalt.url);
    if let Some(started) = info.started_at() {
        println!("started:  {}", started.to_rfc3339());
    }
    println!("duration: {}s max", info.max_duration().as_secs());
    println!("services: {}", info.cobalt.services.join(", "));
    if !info.git.commit.is_empty() {
        println!("git:      {}@{} ({})", info.git.branch, info.git.commit, info.git.remote);
    }
}

pub fn print_download(response: &DownloadResponse) {
    match &response.media {
        Media::Tunnel(download) | Media::Redirect(download) => {
            println!("{}", download.url);
            if !download.filename.is_empty() {
                println!("filename: {}", download.filename);
            }
        }
        Media::Picker(picker) => {
            for item in &picker.picker {
                println!("{:<6} {}", kind_label(item.kind), item.url);
            }
            if let Some(audio) = &picker.audio {
                println!("{:<6} {audio}", "audio");
            }
        }
    }
}

const fn kind_label(kind: PickerItemType) -> &'static str {
    match kind {
        PickerItemType::Photo => "photo",
        PickerItemType::Video => "video",
        PickerItemType::Gif => "gif",
        PickerItemType::Other => "other",
    }
}

pub fn print_instances(instances: &[InstanceRecord]) {
    for instance in instances {
        let status = if instance.is_api_online() { "online" } else { "offline" };
        println!(
            "{:<40} {:<10} {:<8} trust={}",
            instance.api_url(),
            instance.version,
            status,
            instance.trust_score()
        );
    }
}

pub fn print_media_info(info: &MediaInfo) {
    println!("name: {}", info.name);
    println!("size: {} bytes", info.size);
    if !info.mime.is_empty() {
        println!("type: {}", info.mime);
    }
}
