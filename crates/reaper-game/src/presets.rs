//! Built-in `BaseDeviceProfiles.ini` presets.
//!
//! Preset contents are opaque text written verbatim to the game's config
//! file. Nothing here parses or validates the INI.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::PresetError;

const IMAGE_DIR: &str = "/images/presets";
const DEFAULT_IMAGE: &str = "/images/presets/default.jpg";

/// Name, description and embedded file of every built-in preset, in display order.
const BUILTIN: [(&str, &str, &str); 10] = [
    (
        "Default",
        "Standard Config",
        include_str!("../data/presets/default.ini"),
    ),
    (
        "Farming",
        "Gen2 Optimized",
        include_str!("../data/presets/farming.ini"),
    ),
    (
        "Snow North",
        "Clear Water, 180 FPS",
        include_str!("../data/presets/snow-north.ini"),
    ),
    (
        "Black Super Hard",
        "Black & Hard Config",
        include_str!("../data/presets/black-super-hard.ini"),
    ),
    (
        "Bloodstalker",
        "Awesome Spyglass On",
        include_str!("../data/presets/bloodstalker.ini"),
    ),
    (
        "Super Hard",
        "No Visuals, No Water",
        include_str!("../data/presets/super-hard.ini"),
    ),
    (
        "PVP Water",
        "No Water Surface",
        include_str!("../data/presets/pvp-water.ini"),
    ),
    (
        "PVP Soft",
        "Standard Pvp Config",
        include_str!("../data/presets/pvp-soft.ini"),
    ),
    (
        "PVP Hard",
        "Minimal Visuals, Fogless",
        include_str!("../data/presets/pvp-hard.ini"),
    ),
    (
        "Creator Config",
        "Best For Content",
        include_str!("../data/presets/creator-config.ini"),
    ),
];

/// A named block of INI text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPreset {
    pub name: String,
    pub description: String,
    pub raw_text: String,
}

impl ConfigPreset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// Immutable set of presets with unique (case-insensitive) names.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: Vec<ConfigPreset>,
}

impl PresetCatalog {
    /// Fails if two names are equal ignoring case.
    pub fn new(presets: Vec<ConfigPreset>) -> Result<Self, PresetError> {
        let mut seen = HashSet::with_capacity(presets.len());
        for preset in &presets {
            if !seen.insert(fold_case(&preset.name)) {
                return Err(PresetError::Duplicate(preset.name.clone()));
            }
        }
        Ok(Self { presets })
    }

    /// The presets shipped with the app.
    pub fn builtin() -> Self {
        let presets = BUILTIN
            .iter()
            .map(|(name, description, raw_text)| ConfigPreset::new(*name, *description, *raw_text))
            .collect();
        Self { presets }
    }

    pub fn all(&self) -> &[ConfigPreset] {
        tracing::debug!("Getting all INI presets");
        &self.presets
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&ConfigPreset> {
        tracing::debug!("Getting preset by name: {}", name);
        let name = fold_case(name.trim());
        self.presets.iter().find(|p| fold_case(&p.name) == name)
    }

    pub fn require(&self, name: &str) -> Result<&ConfigPreset, PresetError> {
        self.get(name)
            .ok_or_else(|| PresetError::NotFound(name.to_string()))
    }

    /// Image shown next to a preset: lowercase name with spaces as dashes.
    pub fn image_path(name: &str) -> String {
        let slug = name.trim().to_lowercase().replace(' ', "-");
        if slug.is_empty() {
            return DEFAULT_IMAGE.to_string();
        }
        format!("{IMAGE_DIR}/{slug}.jpg")
    }
}

/// Unicode-aware key for case-insensitive name comparison.
fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_ten_in_order() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(
            catalog.names(),
            vec![
                "Default",
                "Farming",
                "Snow North",
                "Black Super Hard",
                "Bloodstalker",
                "Super Hard",
                "PVP Water",
                "PVP Soft",
                "PVP Hard",
                "Creator Config",
            ]
        );
    }

    #[test]
    fn builtin_names_are_unique() {
        let catalog = PresetCatalog::builtin();
        assert!(PresetCatalog::new(catalog.all().to_vec()).is_ok());
    }

    #[test]
    fn builtin_contents_are_device_profiles() {
        for preset in PresetCatalog::builtin().all() {
            assert!(
                preset.raw_text.starts_with("[DeviceProfiles]"),
                "{} does not start with the section header",
                preset.name
            );
            assert!(!preset.description.is_empty());
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let catalog = PresetCatalog::builtin();
        let preset = catalog.get("pvp hard").unwrap();
        assert_eq!(preset.name, "PVP Hard");
        assert_eq!(preset.description, "Minimal Visuals, Fogless");
        assert!(catalog.get("SNOW NORTH").is_some());
    }

    #[test]
    fn unknown_preset() {
        let catalog = PresetCatalog::builtin();
        assert!(catalog.get("Ultra").is_none());
        assert!(matches!(
            catalog.require("Ultra"),
            Err(PresetError::NotFound(name)) if name == "Ultra"
        ));
    }

    #[test]
    fn duplicate_names_rejected() {
        let result = PresetCatalog::new(vec![
            ConfigPreset::new("Farming", "a", "[DeviceProfiles]"),
            ConfigPreset::new("FARMING", "b", "[DeviceProfiles]"),
        ]);
        assert!(matches!(result, Err(PresetError::Duplicate(name)) if name == "FARMING"));
    }

    #[test]
    fn non_ascii_names_compare_case_insensitively() {
        let result = PresetCatalog::new(vec![
            ConfigPreset::new("Été", "a", "[DeviceProfiles]"),
            ConfigPreset::new("ÉTÉ", "b", "[DeviceProfiles]"),
        ]);
        assert!(matches!(result, Err(PresetError::Duplicate(name)) if name == "ÉTÉ"));

        let catalog =
            PresetCatalog::new(vec![ConfigPreset::new("Été", "a", "[DeviceProfiles]")]).unwrap();
        assert_eq!(catalog.get("ÉTÉ").unwrap().name, "Été");
    }

    #[test]
    fn image_paths() {
        assert_eq!(
            PresetCatalog::image_path("Snow North"),
            "/images/presets/snow-north.jpg"
        );
        assert_eq!(
            PresetCatalog::image_path("PVP Water"),
            "/images/presets/pvp-water.jpg"
        );
        assert_eq!(PresetCatalog::image_path(""), "/images/presets/default.jpg");
        assert_eq!(PresetCatalog::image_path("   "), "/images/presets/default.jpg");
    }
}
