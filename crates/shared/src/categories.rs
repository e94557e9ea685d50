#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Science,
    Art,
    Sports,
    Politics,
    Music,
    Exploration,
    Peace,
}

impl EventCategory {
    pub const ALL: [Self; 7] = [
        Self::Science,
        Self::Art,
        Self::Sports,
        Self::Politics,
        Self::Music,
        Self::Exploration,
        Self::Peace,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Self::Science => "science",
            Self::Art => "art",
            Self::Sports => "sports",
            Self::Politics => "politics",
            Self::Music => "music",
            Self::Exploration => "exploration",
            Self::Peace => "peace",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Science => "Bilim ve Teknoloji",
            Self::Art => "Sanat ve Kültür",
            Self::Sports => "Spor",
            Self::Politics => "Siyaset ve Tarih",
            Self::Music => "Müzik ve Eğlence",
            Self::Exploration => "Keşif ve Macera",
            Self::Peace => "Barış ve İnsanlık",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Science => "🔬",
            Self::Art => "🎨",
            Self::Sports => "⚽",
            Self::Politics => "🏛️",
            Self::Music => "🎵",
            Self::Exploration => "🚀",
            Self::Peace => "🕊️",
        }
    }

    /// Matches either the short id or the full label, ignoring case.
    pub fn lookup(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL.into_iter().find(|category| {
            category.id().eq_ignore_ascii_case(trimmed)
                || category.label().to_lowercase() == trimmed.to_lowercase()
        })
    }
}

/// Category labels the user allows, in the order they were enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    labels: Vec<String>,
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::all()
    }
}

impl CategorySet {
    pub fn all() -> Self {
        Self {
            labels: EventCategory::ALL
                .iter()
                .map(|category| category.label().to_string())
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self { labels: Vec::new() }
    }

    /// Returns true when the label is enabled after the call.
    pub fn toggle(&mut self, label: &str) -> bool {
        if let Some(position) = self.labels.iter().position(|existing| existing == label) {
            self.labels.remove(position);
            false
        } else {
            self.labels.push(label.to_string());
            true
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|existing| existing == label)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl<S: Into<String>> FromIterator<S> for CategorySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::empty();
        for label in iter {
            let label = label.into();
            if !set.contains(&label) {
                set.labels.push(label);
            }
        }
        set
    }
}
