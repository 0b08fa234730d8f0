// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Gallery items shown on the orbit and in the fallback grid.

use orrery_scene_port::{MediaKind, MediaRef, ObjectKey};
use serde::{Deserialize, Serialize};

use crate::seed::object_key;

/// One gallery entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    /// Stable id, also used to derive the scene key.
    pub id: String,
    /// Card title.
    pub title: String,
    /// Card subtitle.
    pub subtitle: String,
    /// Category badge text.
    pub category: String,
    /// Image or video shown on the card.
    pub media: MediaRef,
}

impl GalleryItem {
    /// Scene key for this item's billboard.
    pub fn key(&self) -> ObjectKey {
        object_key("gallery", &self.id)
    }

    /// Whether the card plays video.
    pub fn is_video(&self) -> bool {
        self.media.kind == MediaKind::Video
    }
}

fn item(
    id: &str,
    title: &str,
    subtitle: &str,
    src: &str,
    kind: MediaKind,
    category: &str,
) -> GalleryItem {
    GalleryItem {
        id: id.to_owned(),
        title: title.to_owned(),
        subtitle: subtitle.to_owned(),
        category: category.to_owned(),
        media: MediaRef {
            src: src.to_owned(),
            kind,
        },
    }
}

/// Built-in "in action" gallery.
pub fn default_gallery() -> Vec<GalleryItem> {
    use MediaKind::{Image, Video};
    vec![
        item(
            "1",
            "Rooftop Installation",
            "Network antenna deployment",
            "/assets/action-roof-1.jpeg",
            Image,
            "INSTALLATION",
        ),
        item(
            "2",
            "Field Operations",
            "Expert on-site work",
            "/assets/action-roof-2.jpeg",
            Image,
            "FIELDWORK",
        ),
        item(
            "3",
            "Server Configuration",
            "Enterprise infrastructure",
            "/assets/action-server-1.jpeg",
            Image,
            "DATA CENTER",
        ),
        item(
            "4",
            "Network Infrastructure",
            "High-speed connectivity",
            "/assets/action-network.jpeg",
            Image,
            "NETWORKING",
        ),
        item(
            "5",
            "Watch Us Work",
            "See our team in action",
            "/videos/ibit-action.mp4",
            Video,
            "VIDEO",
        ),
        item(
            "6",
            "Server Operations",
            "Hands-on expertise",
            "/assets/action-server-rack.jpeg",
            Image,
            "INFRASTRUCTURE",
        ),
        item(
            "7",
            "Lab Deployment",
            "Complete computer labs",
            "/assets/action-lab.jpeg",
            Image,
            "LABS",
        ),
        item(
            "8",
            "Professional Team",
            "Technology leaders",
            "/assets/action-professional.jpeg",
            Image,
            "TEAM",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_gallery_has_unique_keys_and_one_video() {
        let items = default_gallery();
        assert_eq!(items.len(), 8);
        let keys: HashSet<_> = items.iter().map(GalleryItem::key).collect();
        assert_eq!(keys.len(), items.len());
        assert_eq!(items.iter().filter(|i| i.is_video()).count(), 1);
    }
}
