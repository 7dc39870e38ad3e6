//! Steam library manifest (`steamapps/libraryfolders.vdf`) scanning.
//!
//! Only the `"path" "<dir>"` pairs matter here, so the manifest is matched
//! with a regex instead of a full VDF parse.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static PATH_ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""path"\s*"([^"]+)""#).expect("valid library path regex"));

/// Library roots listed in a manifest, in file order, duplicates kept.
pub fn library_roots(manifest: &str) -> Vec<PathBuf> {
    PATH_ENTRY_RE
        .captures_iter(manifest)
        .filter_map(|caps| caps.get(1))
        .map(|m| PathBuf::from(m.as_str().replace(r"\\", r"\")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
"libraryfolders"
{
	"0"
	{
		"path"		"C:\\Program Files (x86)\\Steam"
		"label"		""
		"apps"
		{
			"228980"		"429744089"
		}
	}
	"1"
	{
		"path"		"D:\\SteamLibrary"
		"label"		"Games"
	}
}
"#;

    #[test]
    fn extracts_paths_in_order() {
        let roots = library_roots(MANIFEST);
        assert_eq!(
            roots,
            vec![
                PathBuf::from(r"C:\Program Files (x86)\Steam"),
                PathBuf::from(r"D:\SteamLibrary"),
            ]
        );
    }

    #[test]
    fn keeps_duplicates() {
        let manifest = r#""path" "/games" "path" "/games""#;
        assert_eq!(library_roots(manifest).len(), 2);
    }

    #[test]
    fn ignores_other_keys() {
        assert!(library_roots(r#""label" "x" "contentid" "123""#).is_empty());
        assert!(library_roots("").is_empty());
    }

    #[test]
    fn shared_pattern_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| library_roots(MANIFEST)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().len(), 2);
        }
    }

    #[test]
    fn unix_paths_pass_through() {
        let manifest = r#""path"	"/home/deck/.local/share/Steam""#;
        assert_eq!(
            library_roots(manifest),
            vec![PathBuf::from("/home/deck/.local/share/Steam")]
        );
    }
}
