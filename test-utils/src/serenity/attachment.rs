//! Test factory for Serenity `Attachment` objects.

use serenity::all::Attachment;

/// Creates an image attachment hosted on Discord's CDN.
///
/// The URL ends with `/<filename>` like real attachment URLs do.
///
/// # Panics
/// - If the JSON cannot be deserialized into an Attachment
pub fn create_test_attachment(attachment_id: u64, filename: &str) -> Attachment {
    let url = format!(
        "https://cdn.discordapp.com/attachments/1/{}/{}",
        attachment_id, filename
    );

    serde_json::from_value(serde_json::json!({
        "id": attachment_id.to_string(),
        "filename": filename,
        "size": 1024,
        "url": url,
        "proxy_url": url.replace("cdn.discordapp.com", "media.discordapp.net"),
        "height": 512,
        "width": 512,
        "content_type": "image/png",
    }))
    .expect("Failed to create test attachment - invalid JSON structure")
}
