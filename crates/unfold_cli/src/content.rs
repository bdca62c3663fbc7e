//! Landing page content
//!
//! Static copy baked in at build time. Only the shape of this data
//! matters to the replay: how many cards each section lays out and what
//! they are called.

/// Brand names in the trust strip
pub const BRANDS: &[&str] = &["Brand1", "Brand2", "Brand3"];

#[derive(Clone, Copy, Debug)]
pub struct Feature {
    pub id: &'static str,
    pub title: &'static str,
}

pub const FEATURES: &[Feature] = &[
    Feature {
        id: "feat-1",
        title: "Intelligent Applications",
    },
    Feature {
        id: "feat-2",
        title: "Intelligent Applications",
    },
    Feature {
        id: "feat-3",
        title: "Intelligent Applications",
    },
];

#[derive(Clone, Copy, Debug)]
pub struct Stat {
    pub value: &'static str,
    pub label: &'static str,
}

pub const STATS: &[Stat] = &[
    Stat {
        value: "500+",
        label: "Projects Delivered",
    },
    Stat {
        value: "98%",
        label: "Client Satisfaction",
    },
    Stat {
        value: "50+",
        label: "Expert Team",
    },
    Stat {
        value: "24/7",
        label: "Support Available",
    },
];

/// Human-readable caption for a block label, when the content has one
pub fn caption(label: &str) -> Option<&'static str> {
    if let Some(id) = label.strip_prefix("features.") {
        return FEATURES.iter().find(|f| f.id == id).map(|f| f.title);
    }
    if let Some(value) = label.strip_prefix("stats.") {
        return STATS.iter().find(|s| s.value == value).map(|s| s.label);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_lookup() {
        assert_eq!(caption("stats.98%"), Some("Client Satisfaction"));
        assert_eq!(caption("features.feat-2"), Some("Intelligent Applications"));
        assert_eq!(caption("stats.story"), None);
        assert_eq!(caption("hero.badge"), None);
    }
}
