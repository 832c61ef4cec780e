use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::util::collect_files;

/// Zips every file under `source_dir` into `archive_path`. Entry names are
/// relative to `source_dir`, use forward slashes, and are sorted so the
/// archive layout is stable between builds. Returns the number of files.
pub fn zip_directory(source_dir: &Path, archive_path: &Path) -> Result<usize> {
    if let Some(parent) = archive_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(archive_path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let files = collect_files(source_dir);
    for rel in &files {
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        zip.start_file(name, options)?;
        let mut source = File::open(source_dir.join(rel))?;
        std::io::copy(&mut source, &mut zip)?;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::write_file;
    use std::io::Read;

    #[test]
    fn archive_contains_nested_files_with_forward_slashes() {
        let src = tempfile::tempdir().expect("src");
        let out = tempfile::tempdir().expect("out");
        write_file(&src.path().join("index.html"), "<html></html>").expect("write");
        write_file(&src.path().join("css/styles.css"), "body{}").expect("write");

        let archive_path = out.path().join("es.zip");
        let count = zip_directory(src.path(), &archive_path).expect("zip");
        assert_eq!(count, 2);

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).expect("open")).expect("archive");
        let names: Vec<String> = archive.file_names().map(String::from).collect();
        assert!(names.contains(&"css/styles.css".to_string()));
        assert!(names.contains(&"index.html".to_string()));

        let mut contents = String::new();
        archive
            .by_name("css/styles.css")
            .expect("entry")
            .read_to_string(&mut contents)
            .expect("read");
        assert_eq!(contents, "body{}");
    }
}
