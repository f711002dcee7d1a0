//! # Store Layout
//!
//! ```text
//! <root>/channels/<channel>-index.json
//! <root>/releases/<channel>/<safe-version>.json
//! <root>/promotions/<safe-version>.json
//! <root>/configs/<channel>.json
//! ```

use std::path::{Path, PathBuf};

use crate::channels::Channel;

pub const CHANNELS_DIR: &str = "channels";
pub const RELEASES_DIR: &str = "releases";
pub const PROMOTIONS_DIR: &str = "promotions";
pub const CONFIGS_DIR: &str = "configs";

/// Characters that are replaced with `-` in version file names
const UNSAFE_FILENAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Map a version string to a file-name-safe form.
///
/// Only used for file names; stored documents keep the original version.
pub fn sanitize_version(version: &str) -> String {
    version
        .chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '-' } else { c })
        .collect()
}

pub(crate) fn release_dir(root: &Path, channel: Channel) -> PathBuf {
    root.join(RELEASES_DIR).join(channel.as_str())
}

pub(crate) fn release_path(root: &Path, channel: Channel, version: &str) -> PathBuf {
    release_dir(root, channel).join(format!("{}.json", sanitize_version(version)))
}

pub(crate) fn index_path(root: &Path, channel: Channel) -> PathBuf {
    root.join(CHANNELS_DIR)
        .join(format!("{}-index.json", channel.as_str()))
}

pub(crate) fn config_path(root: &Path, channel: Channel) -> PathBuf {
    root.join(CONFIGS_DIR).join(format!("{}.json", channel.as_str()))
}

pub(crate) fn promotions_path(root: &Path, version: &str) -> PathBuf {
    root.join(PROMOTIONS_DIR)
        .join(format!("{}.json", sanitize_version(version)))
}

pub(crate) fn has_json_extension(path: &Path) -> bool {
    path.extension().map(|ext| ext == "json").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_version() {
        let cases = [
            ("1.0.0", "1.0.0"),
            ("1.0.0/beta:test", "1.0.0-beta-test"),
            ("v1.0.0\\rc*1?", "v1.0.0-rc-1-"),
            ("a\"b<c>d|e", "a-b-c-d-e"),
            ("1.0.0+build.5_x", "1.0.0+build.5_x"),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(sanitize_version(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_paths() {
        let root = Path::new("/data");
        assert_eq!(
            release_path(root, Channel::Beta, "1.0.0/rc"),
            PathBuf::from("/data/releases/beta/1.0.0-rc.json")
        );
        assert_eq!(
            index_path(root, Channel::Lts),
            PathBuf::from("/data/channels/lts-index.json")
        );
        assert_eq!(
            config_path(root, Channel::Edge),
            PathBuf::from("/data/configs/edge.json")
        );
        assert_eq!(
            promotions_path(root, "2.0:1"),
            PathBuf::from("/data/promotions/2.0-1.json")
        );
    }

    #[test]
    fn test_has_json_extension() {
        assert!(has_json_extension(Path::new("1.0.0.json")));
        assert!(!has_json_extension(Path::new("README.md")));
        assert!(!has_json_extension(Path::new("1.0.0")));
        assert!(!has_json_extension(Path::new("archive.json.bak")));
    }
}
