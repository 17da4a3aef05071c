use super::text::get_value;
use std::path::Path;

const DEFAULT_OS_TYPE: &str = "busybox";

/// Distribution family from the `ID_LIKE=` line of an os-release file.
///
/// Falls back to `busybox` when the file is unreadable or has no such line.
pub fn os_type(os_release: &Path) -> String {
    let Ok(content) = std::fs::read_to_string(os_release) else {
        return DEFAULT_OS_TYPE.to_string();
    };
    let lines: Vec<String> = content.lines().map(str::to_string).collect();

    match get_value(&lines, "ID_LIKE") {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_OS_TYPE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_id_like() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("os-release");
        std::fs::write(&path, "NAME=\"Cairn\"\nID=cairn\nID_LIKE=debian\n").unwrap();
        assert_eq!(os_type(&path), "debian");
    }

    #[test]
    fn test_defaults_to_busybox() {
        let dir = TempDir::new().unwrap();
        assert_eq!(os_type(&dir.path().join("missing")), "busybox");

        let path = dir.path().join("os-release");
        std::fs::write(&path, "ID=cairn\n").unwrap();
        assert_eq!(os_type(&path), "busybox");
    }
}
