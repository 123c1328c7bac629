#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `content` to a fresh temporary file ending in `.{ext}`.
    /// The file is removed when the handle is dropped.
    pub fn descriptor_file(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("resmodel_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}

pub fn demo_path() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/colours.yaml")
}
