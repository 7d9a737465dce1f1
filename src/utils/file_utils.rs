use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use actix_web::web::Bytes;
use actix_web::HttpResponse;
use uuid::Uuid;

use crate::error::ApiError;

/// Store an uploaded file under the media directory with a fresh uuid name,
/// keeping the original extension. Returns the stored path.
pub fn save_upload(
    media_dir: &str,
    original_name: Option<&str>,
    data: &[u8],
) -> Result<String, ApiError> {
    let ext = original_name
        .and_then(|n| Path::new(n).extension().and_then(|e| e.to_str()))
        .unwrap_or("bin");

    fs::create_dir_all(media_dir)?;
    let path = Path::new(media_dir).join(format!("{}.{}", Uuid::new_v4(), ext));

    let mut file = fs::File::create(&path)?;
    file.write_all(data)?;

    Ok(path.to_string_lossy().into_owned())
}

/// Best-effort removal; a missing file is not an error.
pub fn delete_media(path: &str) {
    let _ = fs::remove_file(path);
}

pub fn media_content_type(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("aac") => "audio/aac",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Chunked streaming of a stored media file.
pub fn stream_media(path: &str) -> HttpResponse {
    let mut file = match fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    let stream = async_stream::stream! {
        let mut buf = [0; 8192];
        loop {
            match file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => yield Ok::<_, std::io::Error>(Bytes::copy_from_slice(&buf[..n])),
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    };

    HttpResponse::Ok()
        .content_type(media_content_type(path))
        .insert_header(("Content-Disposition", "inline"))
        .streaming(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_by_extension() {
        assert_eq!(media_content_type("a/b/song.mp3"), "audio/mpeg");
        assert_eq!(media_content_type("cover.png"), "image/png");
        assert_eq!(media_content_type("track.flac"), "audio/flac");
        assert_eq!(media_content_type("mystery"), "application/octet-stream");
    }

    #[test]
    fn save_upload_keeps_extension() {
        let dir = std::env::temp_dir().join(format!("resona-test-{}", Uuid::new_v4()));
        let stored = save_upload(dir.to_str().unwrap(), Some("track.mp3"), b"abc").unwrap();
        assert!(stored.ends_with(".mp3"));
        assert_eq!(fs::read(&stored).unwrap(), b"abc");
        let _ = fs::remove_dir_all(&dir);
    }
}
