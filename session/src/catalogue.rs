//! The fixed set of playable items bundled with the host application.

use crate::CatalogueError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Kind of media behind a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Music track.
    #[default]
    Audio,
    /// Video clip.
    Video,
}

/// Opaque locator of a bundled media resource.
///
/// The session never interprets it; backends resolve it (for example
/// relative to an assets directory).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    /// Wrap a resource locator.
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// The raw locator string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque locator of a bundled artwork image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtworkRef(String);

impl ArtworkRef {
    /// Wrap an image locator.
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// The raw locator string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One playable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    #[serde(rename = "name")]
    display_name: String,
    media: MediaRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artwork: Option<ArtworkRef>,
    #[serde(default)]
    kind: MediaKind,
}

impl CatalogueEntry {
    /// Create an audio entry without artwork.
    pub fn audio(display_name: impl Into<String>, media: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            media: MediaRef::new(media),
            artwork: None,
            kind: MediaKind::Audio,
        }
    }

    /// Create a video clip entry.
    pub fn video(display_name: impl Into<String>, media: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            media: MediaRef::new(media),
            artwork: None,
            kind: MediaKind::Video,
        }
    }

    /// Attach artwork to the entry.
    #[must_use]
    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(ArtworkRef::new(artwork));
        self
    }

    /// Unique display name, used as the catalogue key.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Locator of the media resource.
    #[must_use]
    pub const fn media(&self) -> &MediaRef {
        &self.media
    }

    /// Locator of the artwork image, if any.
    #[must_use]
    pub const fn artwork(&self) -> Option<&ArtworkRef> {
        self.artwork.as_ref()
    }

    /// Whether this is a track or a video clip.
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        self.kind
    }
}

/// Ordered list of entries with unique display names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
}

impl Catalogue {
    /// Start building a catalogue.
    #[must_use]
    pub fn builder() -> CatalogueBuilder {
        CatalogueBuilder::default()
    }

    /// Build a catalogue from a list of entries.
    ///
    /// # Errors
    /// Returns [`CatalogueError::DuplicateName`] if two entries share a name,
    /// or [`CatalogueError::EmptyName`] if a name is blank.
    pub fn new(entries: Vec<CatalogueEntry>) -> Result<Self, CatalogueError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.display_name.trim().is_empty() {
                return Err(CatalogueError::EmptyName);
            }
            if !seen.insert(entry.display_name.as_str()) {
                return Err(CatalogueError::DuplicateName(entry.display_name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a catalogue from a JSON array of entries.
    ///
    /// ```
    /// use playkit_session::{Catalogue, MediaKind};
    ///
    /// let catalogue = Catalogue::from_json_str(
    ///     r#"[{ "name": "Ride Slow", "media": "raw/ride_slow.mp4", "kind": "video" }]"#,
    /// )?;
    /// assert_eq!(catalogue.get("Ride Slow").map(|e| e.kind()), Some(MediaKind::Video));
    /// # Ok::<(), playkit_session::CatalogueError>(())
    /// ```
    ///
    /// # Errors
    /// Returns [`CatalogueError::Json`] for malformed documents, plus the
    /// validation errors of [`Catalogue::new`].
    pub fn from_json_str(json: &str) -> Result<Self, CatalogueError> {
        let entries: Vec<CatalogueEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Read and parse a JSON catalogue file.
    ///
    /// # Errors
    /// Returns [`CatalogueError::Io`] if the file cannot be read, plus the
    /// errors of [`Catalogue::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The list bundled with the player: five tracks with artwork and five
    /// video clips.
    #[must_use]
    pub fn bundled() -> Self {
        let tracks = [
            ("Bohemian Rhapsody", "bohemian_rhapsody"),
            ("Can't Take My Eyes Off You", "cant_take_my_eyes_off_you"),
            ("Dancing in the Moonlight", "dancing_in_the_moonlight"),
            ("Eye of the Tiger", "eye_of_the_tiger"),
            ("Karma Chameleon", "karma_chameleon"),
        ];
        let clips = [
            ("Electric Love", "electric_love"),
            ("Hometown", "hometown"),
            ("House in LA", "house_in_la"),
            ("I was Wrong", "i_was_wrong"),
            ("Ride Slow", "ride_slow"),
        ];

        let entries = tracks
            .iter()
            .map(|(name, res)| {
                CatalogueEntry::audio(*name, format!("raw/{res}.mp3"))
                    .with_artwork(format!("drawable/{res}.png"))
            })
            .chain(
                clips
                    .iter()
                    .map(|(name, res)| CatalogueEntry::video(*name, format!("raw/{res}.mp4"))),
            )
            .collect();

        Self { entries }
    }

    /// Look an entry up by its exact display name.
    #[must_use]
    pub fn get(&self, display_name: &str) -> Option<&CatalogueEntry> {
        self.entries
            .iter()
            .find(|entry| entry.display_name == display_name)
    }

    /// Entry at `index` in catalogue order.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&CatalogueEntry> {
        self.entries.get(index)
    }

    /// Whether `entry` is exactly one of this catalogue's entries.
    #[must_use]
    pub fn contains(&self, entry: &CatalogueEntry) -> bool {
        self.get(&entry.display_name) == Some(entry)
    }

    /// Iterate over entries in catalogue order.
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogueEntry> {
        self.entries.iter()
    }

    /// Iterate over entries of one kind, as the host lists them per tab.
    pub fn of_kind(&self, kind: MediaKind) -> impl Iterator<Item = &CatalogueEntry> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalogue {
    type Item = &'a CatalogueEntry;
    type IntoIter = std::slice::Iter<'a, CatalogueEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builder for a [`Catalogue`].
#[derive(Debug, Default)]
pub struct CatalogueBuilder {
    entries: Vec<CatalogueEntry>,
}

impl CatalogueBuilder {
    /// Append an entry.
    #[must_use]
    pub fn entry(mut self, entry: CatalogueEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Append an audio track.
    #[must_use]
    pub fn track(self, display_name: impl Into<String>, media: impl Into<String>) -> Self {
        self.entry(CatalogueEntry::audio(display_name, media))
    }

    /// Append a video clip.
    #[must_use]
    pub fn clip(self, display_name: impl Into<String>, media: impl Into<String>) -> Self {
        self.entry(CatalogueEntry::video(display_name, media))
    }

    /// Validate and build the catalogue.
    ///
    /// # Errors
    /// See [`Catalogue::new`].
    pub fn build(self) -> Result<Catalogue, CatalogueError> {
        Catalogue::new(self.entries)
    }
}
