use std::fs;
use std::path::{Path, PathBuf};

/// Prefix the reference manager puts on paths of files it manages in
/// its own storage tree.
const STORAGE_PREFIX: &str = "storage:";
const PDF_EXT: &str = "pdf";

/// Locate the on-disk file for an attachment.
///
/// Tried in order, first existing regular file wins:
/// 1. `storage:`-prefixed stored paths joined under the attachment's
///    own folder
/// 2. absolute stored paths taken verbatim
/// 3. any `.pdf` in the attachment folder, lexicographically first
/// 4. any regular file in the attachment folder, lexicographically first
///
/// Stale `storage:` prefixes from old imports are common; the folder
/// fallbacks keep those attachments analyzable.
pub fn resolve_attachment_file(
    storage_dir: &Path,
    att_key: &str,
    stored_path: &str,
) -> Option<PathBuf> {
    let folder = storage_dir.join(att_key);

    if let Some(suffix) = stored_path.strip_prefix(STORAGE_PREFIX) {
        let preferred = folder.join(suffix);
        if preferred.is_file() {
            return Some(preferred);
        }
    }

    let raw = Path::new(stored_path);
    if raw.is_absolute() && raw.is_file() {
        return Some(raw.to_path_buf());
    }

    if !folder.is_dir() {
        return None;
    }

    let mut files: Vec<PathBuf> = match fs::read_dir(&folder) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect(),
        Err(_) => return None,
    };
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if let Some(pdf) = files.iter().find(|path| {
        path.extension()
            .map(|ext| ext.eq_ignore_ascii_case(PDF_EXT))
            .unwrap_or(false)
    }) {
        return Some(pdf.clone());
    }
    files.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_folder(storage: &Path, key: &str, files: &[&str]) {
        let folder = storage.join(key);
        fs::create_dir_all(&folder).unwrap();
        for name in files {
            fs::write(folder.join(name), b"content").unwrap();
        }
    }

    #[test]
    fn test_storage_prefix_hit() {
        let tmp = tempdir().unwrap();
        make_folder(tmp.path(), "KEY1", &["paper.pdf", "other.pdf"]);

        let found = resolve_attachment_file(tmp.path(), "KEY1", "storage:paper.pdf").unwrap();
        assert_eq!(found, tmp.path().join("KEY1").join("paper.pdf"));
    }

    #[test]
    fn test_stale_storage_prefix_falls_back_to_folder_pdf() {
        let tmp = tempdir().unwrap();
        make_folder(tmp.path(), "KEY1", &["b.pdf", "a.pdf"]);

        // The stored name no longer exists; lexicographically first PDF wins.
        let found = resolve_attachment_file(tmp.path(), "KEY1", "storage:gone.pdf").unwrap();
        assert_eq!(found, tmp.path().join("KEY1").join("a.pdf"));
    }

    #[test]
    fn test_absolute_path_accepted() {
        let tmp = tempdir().unwrap();
        let external = tmp.path().join("elsewhere.pdf");
        fs::write(&external, b"content").unwrap();

        let found = resolve_attachment_file(
            tmp.path(),
            "NOFOLDER",
            external.to_str().unwrap(),
        )
        .unwrap();
        assert_eq!(found, external);
    }

    #[test]
    fn test_pdf_preferred_over_other_files() {
        let tmp = tempdir().unwrap();
        make_folder(tmp.path(), "KEY1", &["aaa.txt", "zzz.pdf"]);

        let found = resolve_attachment_file(tmp.path(), "KEY1", "").unwrap();
        assert_eq!(found, tmp.path().join("KEY1").join("zzz.pdf"));
    }

    #[test]
    fn test_any_file_fallback() {
        let tmp = tempdir().unwrap();
        make_folder(tmp.path(), "KEY1", &["notes.txt", "data.bin"]);

        let found = resolve_attachment_file(tmp.path(), "KEY1", "").unwrap();
        assert_eq!(found, tmp.path().join("KEY1").join("data.bin"));
    }

    #[test]
    fn test_missing_folder_resolves_to_none() {
        let tmp = tempdir().unwrap();
        assert!(resolve_attachment_file(tmp.path(), "ABSENT", "storage:x.pdf").is_none());
    }

    #[test]
    fn test_empty_folder_resolves_to_none() {
        let tmp = tempdir().unwrap();
        make_folder(tmp.path(), "KEY1", &[]);
        assert!(resolve_attachment_file(tmp.path(), "KEY1", "").is_none());
    }
}
