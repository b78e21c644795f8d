use super::types::{MediaItem, MediaLink, MediaQueryResult, Variant};
use tracing::{debug, info};

const MP4: &str = "video/mp4";

/// Collects one link per media item, in response order.
///
/// Photos give their direct `url`. Videos and GIFs give the URL of their
/// highest bit rate variant, but only when that variant is an MP4.
pub fn extract_links(response: &MediaQueryResult) -> Vec<MediaLink> {
    let media = response.media();
    if media.is_empty() {
        info!("No media found in the API response");
        return Vec::new();
    }

    media.iter().filter_map(link_for_item).collect()
}

fn link_for_item(item: &MediaItem) -> Option<MediaLink> {
    match item.kind() {
        "photo" => item.url.clone(),
        "video" | "animated_gif" => {
            let best = best_variant(item.variants())?;
            if best.content_type() == MP4 {
                best.url.clone()
            } else {
                debug!(
                    "Skipping {} item: best variant is {:?}",
                    item.kind(),
                    best.content_type()
                );
                None
            }
        }
        other => {
            debug!("Skipping unsupported media type {:?}", other);
            None
        }
    }
}

/// Highest `bit_rate` wins; the first one seen wins a tie.
fn best_variant(variants: &[Variant]) -> Option<&Variant> {
    let mut best: Option<&Variant> = None;
    for variant in variants {
        match best {
            Some(current) if variant.bit_rate() <= current.bit_rate() => {}
            _ => best = Some(variant),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> MediaQueryResult {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_photo_link() {
        let response = parse(
            r#"{"includes": {"media": [{"type": "photo", "url": "https://img/1.jpg"}]}}"#,
        );
        assert_eq!(extract_links(&response), vec!["https://img/1.jpg"]);
    }

    #[test]
    fn test_video_dropped_when_highest_bit_rate_is_not_mp4() {
        let response = parse(
            r#"{"includes": {"media": [{"type": "video", "variants": [
                {"bit_rate": 128, "content_type": "video/mp4", "url": "A"},
                {"bit_rate": 256, "content_type": "video/mp4", "url": "B"},
                {"bit_rate": 512, "content_type": "application/x-mpegURL", "url": "C"}
            ]}]}}"#,
        );
        // The 512 playlist wins the bit rate comparison and is not an MP4.
        assert!(extract_links(&response).is_empty());
    }

    #[test]
    fn test_video_highest_mp4_when_it_leads() {
        let response = parse(
            r#"{"includes": {"media": [{"type": "video", "variants": [
                {"bit_rate": 128, "content_type": "video/mp4", "url": "A"},
                {"bit_rate": 256, "content_type": "video/mp4", "url": "B"},
                {"content_type": "application/x-mpegURL", "url": "C"}
            ]}]}}"#,
        );
        assert_eq!(extract_links(&response), vec!["B"]);
    }

    #[test]
    fn test_best_variant_keeps_first_on_tie() {
        let response = parse(
            r#"{"includes": {"media": [{"type": "video", "variants": [
                {"bit_rate": 256, "content_type": "video/mp4", "url": "first"},
                {"bit_rate": 256, "content_type": "video/mp4", "url": "second"}
            ]}]}}"#,
        );
        assert_eq!(extract_links(&response), vec!["first"]);
    }

    #[test]
    fn test_missing_bit_rate_counts_as_zero() {
        let response = parse(
            r#"{"includes": {"media": [{"type": "video", "variants": [
                {"content_type": "application/x-mpegURL", "url": "playlist"},
                {"bit_rate": 0, "content_type": "video/mp4", "url": "zero"}
            ]}]}}"#,
        );
        // Both rank 0, so the playlist seen first is chosen and rejected.
        assert!(extract_links(&response).is_empty());
    }

    #[test]
    fn test_gif_without_mp4_variant_is_skipped() {
        let response = parse(
            r#"{"includes": {"media": [
                {"type": "animated_gif", "variants": [
                    {"bit_rate": 0, "content_type": "video/webm", "url": "https://gif/1.webm"}
                ]},
                {"type": "photo", "url": "https://img/2.jpg"}
            ]}}"#,
        );
        assert_eq!(extract_links(&response), vec!["https://img/2.jpg"]);
    }

    #[test]
    fn test_gif_with_mp4_variant() {
        let response = parse(
            r#"{"includes": {"media": [{"type": "animated_gif", "variants": [
                {"bit_rate": 0, "content_type": "video/mp4", "url": "https://gif/1.mp4"}
            ]}]}}"#,
        );
        assert_eq!(extract_links(&response), vec!["https://gif/1.mp4"]);
    }

    #[test]
    fn test_preserves_item_order_and_skips_unknown() {
        let response = parse(
            r#"{"includes": {"media": [
                {"type": "photo", "url": "p1"},
                {"type": "video", "variants": []},
                {"type": "audio", "url": "ignored"},
                {"type": "video", "variants": [{"bit_rate": 1, "content_type": "video/mp4", "url": "v1"}]},
                {"type": "photo", "url": "p2"}
            ]}}"#,
        );
        assert_eq!(extract_links(&response), vec!["p1", "v1", "p2"]);
    }

    #[test]
    fn test_null_fields_are_skipped_not_fatal() {
        let response = parse(
            r#"{"includes": {"media": [
                {"type": "photo", "url": "P", "variants": null},
                {"type": "video", "variants": null},
                {"type": null, "url": "ignored"},
                {"type": "animated_gif", "variants": [{"bit_rate": 1, "content_type": null, "url": "G"}]}
            ]}}"#,
        );
        assert_eq!(extract_links(&response), vec!["P"]);
    }

    #[test]
    fn test_photo_without_url_is_skipped() {
        let response = parse(r#"{"includes": {"media": [{"type": "photo"}]}}"#);
        assert!(extract_links(&response).is_empty());
    }

    #[test]
    fn test_no_media() {
        assert!(extract_links(&parse(r#"{"data": {"id": "1"}}"#)).is_empty());
        assert!(extract_links(&parse(r#"{"includes": {}}"#)).is_empty());
        assert!(extract_links(&parse(r#"{"includes": {"media": []}}"#)).is_empty());
        assert!(extract_links(&parse(r#"{"includes": {"media": null}}"#)).is_empty());
    }
}
