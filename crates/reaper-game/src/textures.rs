//! Catalog of weapon, armor and saddle texture assets grouped for the
//! texture browser.
//!
//! The table is embedded from `data/textures.toml`. Each category holds
//! groups of asset file names that share a directory under the game's
//! content root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TextureError;
use crate::fs::FileSystem;

const BUILTIN_TABLE: &str = include_str!("../data/textures.toml");

#[derive(Debug, Deserialize)]
struct TextureTable {
    #[serde(default)]
    category: Vec<TextureCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureCategory {
    pub name: String,
    #[serde(default, rename = "group")]
    pub groups: Vec<TextureGroup>,
}

impl TextureCategory {
    /// Name without the leading icon, e.g. "Armor - Tek Suit".
    pub fn label(&self) -> &str {
        match self.name.split_once(' ') {
            Some((icon, rest)) if !icon.chars().any(char::is_alphanumeric) => rest.trim(),
            _ => &self.name,
        }
    }

    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }

    fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.label().eq_ignore_ascii_case(name)
    }
}

/// Asset files sharing one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureGroup {
    /// Directory components relative to the content root
    pub dir: Vec<String>,
    pub files: Vec<String>,
}

impl TextureGroup {
    pub fn relative_dir(&self) -> PathBuf {
        self.dir.iter().collect()
    }
}

/// One asset resolved against an install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextureEntry {
    pub category: String,
    pub path: PathBuf,
    pub present: bool,
}

#[derive(Debug, Clone)]
pub struct TextureCatalog {
    categories: Vec<TextureCategory>,
}

impl TextureCatalog {
    pub fn builtin() -> Result<Self, TextureError> {
        Self::parse(BUILTIN_TABLE)
    }

    /// Parse a table in the `[[category]]` / `[[category.group]]` layout.
    pub fn parse(text: &str) -> Result<Self, TextureError> {
        let table: TextureTable = toml::from_str(text)?;

        for (i, category) in table.category.iter().enumerate() {
            if table.category[..i]
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&category.name))
            {
                return Err(TextureError::DuplicateCategory(category.name.clone()));
            }
        }

        Ok(Self {
            categories: table.category,
        })
    }

    pub fn categories(&self) -> &[TextureCategory] {
        &self.categories
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Match by full name or by label, ignoring case.
    pub fn category(&self, name: &str) -> Option<&TextureCategory> {
        let name = name.trim();
        self.categories.iter().find(|c| c.matches(name))
    }

    /// First category listing `file_name`, ignoring case.
    pub fn category_of(&self, file_name: &str) -> Option<&TextureCategory> {
        self.categories.iter().find(|c| {
            c.groups
                .iter()
                .flat_map(|g| &g.files)
                .any(|f| f.eq_ignore_ascii_case(file_name))
        })
    }

    /// Total number of assets.
    pub fn len(&self) -> usize {
        self.categories.iter().map(TextureCategory::file_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every asset resolved under `content_root`, with whether it exists.
    pub fn entries(&self, content_root: &Path, fs: &dyn FileSystem) -> Vec<TextureEntry> {
        self.categories
            .iter()
            .flat_map(|c| Self::category_entries(c, content_root, fs))
            .collect()
    }

    /// Assets of one category resolved under `content_root`.
    pub fn category_entries(
        category: &TextureCategory,
        content_root: &Path,
        fs: &dyn FileSystem,
    ) -> Vec<TextureEntry> {
        category
            .groups
            .iter()
            .flat_map(|group| {
                let dir = content_root.join(group.relative_dir());
                group.files.iter().map(move |file| dir.join(file))
            })
            .map(|path| TextureEntry {
                category: category.name.clone(),
                present: fs.is_file(&path),
                path,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::StdFileSystem;

    #[test]
    fn builtin_table_parses() {
        let catalog = TextureCatalog::builtin().unwrap();
        assert_eq!(catalog.categories().len(), 17);
        assert_eq!(catalog.len(), 383);
        assert_eq!(catalog.category_names()[0], "🏹 Weapons - Harpoon");
    }

    #[test]
    fn category_by_label() {
        let catalog = TextureCatalog::builtin().unwrap();
        let tek = catalog.category("armor - tek suit").unwrap();
        assert_eq!(tek.name, "🤖 Armor - Tek Suit");
        assert!(catalog.category("🤖 Armor - Tek Suit").is_some());
        assert!(catalog.category("Armor - Plastic").is_none());
    }

    #[test]
    fn label_strips_multi_codepoint_icons() {
        let catalog = TextureCatalog::builtin().unwrap();
        let shields = catalog.category("Weapons - Shields").unwrap();
        assert_eq!(shields.label(), "Weapons - Shields");
    }

    #[test]
    fn asset_lookup_ignores_case() {
        let catalog = TextureCatalog::builtin().unwrap();
        let category = catalog.category_of("t_harpoon_n.uasset").unwrap();
        assert_eq!(category.label(), "Weapons - Harpoon");
        assert!(catalog.category_of("T_Missing.uasset").is_none());
    }

    #[test]
    fn duplicate_category_rejected() {
        let text = r#"
[[category]]
name = "A"

[[category]]
name = "a"
"#;
        assert!(matches!(
            TextureCatalog::parse(text),
            Err(TextureError::DuplicateCategory(_))
        ));
    }

    #[test]
    fn malformed_table_rejected() {
        assert!(matches!(
            TextureCatalog::parse("[[category]]\nname = 5\n"),
            Err(TextureError::Parse(_))
        ));
    }

    #[test]
    fn entries_report_presence() {
        let text = r#"
[[category]]
name = "🔪 Melee"

[[category.group]]
dir = ["WeaponSword", "Textures"]
files = ["T_Sword_D.uasset", "T_Sword_N.uasset"]
"#;
        let catalog = TextureCatalog::parse(text).unwrap();

        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("WeaponSword").join("Textures");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("T_Sword_D.uasset"), b"").unwrap();

        let entries = catalog.entries(root.path(), &StdFileSystem);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, dir.join("T_Sword_D.uasset"));
        assert!(entries[0].present);
        assert!(!entries[1].present);
        assert_eq!(entries[1].category, "🔪 Melee");
    }
}
