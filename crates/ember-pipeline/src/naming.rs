//! Unique attachment naming
//!
//! Pure string functions: generate a collision-resistant name for a
//! file, and detect whether a name already carries one. Detection is a
//! structural check on the file-name component, not a registry lookup:
//! a name that happens to contain a UUID is treated as already
//! processed and left alone.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use uuid::Uuid;

/// Extensions that classify a target as an image attachment.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "avif", "ico",
];

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("identifier regex")
});

fn file_name(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name)
}

/// Whether the file-name component already embeds a generated
/// identifier. A UUID in a parent directory does not count.
pub fn contains_identifier(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(file_name(name))
}

/// Extension-based image classification, case-insensitive.
pub fn is_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|c| ext.eq_ignore_ascii_case(c)))
}

/// Produce a new name embedding a fresh UUID v4 in the file-name stem,
/// preserving any relative directory prefix and the extension:
/// `img/photo.jpg` becomes `img/photo-<uuid>.jpg`.
///
/// `uniquify` then [`contains_identifier`] is a fixed point: the
/// generated name always satisfies the detection check, so a second
/// pipeline run leaves it untouched.
pub fn uniquify(name: &str) -> String {
    let path = Path::new(name);
    let id = Uuid::new_v4();
    let file = file_name(name);

    let new_file = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{id}.{ext}"),
        _ => format!("{file}-{id}"),
    };

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(new_file).to_string_lossy().into_owned()
        }
        _ => new_file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniquify_preserves_extension_and_prefix() {
        let name = uniquify("img/photo.jpg");
        assert!(name.starts_with("img/photo-"));
        assert!(name.ends_with(".jpg"));
        assert_ne!(name, "img/photo.jpg");

        let relative = uniquify("./photo.png");
        assert!(relative.starts_with("./photo-"));
        assert!(relative.ends_with(".png"));
    }

    #[test]
    fn test_uniquify_without_extension() {
        let name = uniquify("photo");
        assert!(name.starts_with("photo-"));
        assert!(!name.contains('.'));
    }

    #[test]
    fn test_uniquify_then_detect_is_a_fixed_point() {
        for original in ["photo.jpg", "./a/b/photo.svg", "no-extension"] {
            let unique = uniquify(original);
            assert!(
                contains_identifier(&unique),
                "{unique} should be detected as already unique"
            );
        }
    }

    #[test]
    fn test_plain_names_contain_no_identifier() {
        assert!(!contains_identifier("photo.jpg"));
        assert!(!contains_identifier("2024-01-15-notes.org"));
    }

    #[test]
    fn test_identifier_in_directory_does_not_count() {
        let id = Uuid::new_v4();
        assert!(!contains_identifier(&format!("{id}/photo.jpg")));
        assert!(contains_identifier(&format!("attachments/{id}.jpg")));
    }

    #[test]
    fn test_is_image_by_extension() {
        assert!(is_image("photo.jpg"));
        assert!(is_image("PHOTO.PNG"));
        assert!(is_image("./nested/pic.webp"));
        assert!(!is_image("notes.org"));
        assert!(!is_image("archive.tar.gz"));
        assert!(!is_image("no_extension"));
    }
}
