// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deploy archive.
//!
//! Zips every visible top-level entry of the project directory into a single
//! archive file inside that directory. The archive is single-use: created
//! before the upload and removed after a successful deploy.
//!
//! The zip is assembled in memory and only written out once complete, so a
//! failed walk never leaves a partial archive behind. Symlinked directories
//! are skipped; symlinked files are stored with their target's contents.

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::PackagingError;
use crate::settings::SETTINGS_FILE;

type MemoryZip = ZipWriter<Cursor<Vec<u8>>>;

/// A zip file written to disk for one deploy.
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
    files: usize,
    bytes: u64,
}

impl Archive {
    /// Package `project_dir` into `project_dir/archive_name`.
    ///
    /// Hidden entries, the archive itself, the settings file and any name in
    /// `exclude` are left out. Directories are added recursively.
    pub fn create(
        project_dir: &Path,
        archive_name: &str,
        exclude: &[String],
    ) -> Result<Self, PackagingError> {
        let entries = sorted_entries(project_dir)?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut archive = Self {
            path: project_dir.join(archive_name),
            files: 0,
            bytes: 0,
        };

        let walked = entries
            .iter()
            .filter(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                let skip = name.starts_with('.')
                    || name == archive_name
                    || name == SETTINGS_FILE
                    || exclude.iter().any(|e| e == &name);
                if skip {
                    tracing::trace!(entry = %name, "Skipping entry");
                }
                !skip
            })
            .try_for_each(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                archive.add_path(&mut zip, &entry.path(), &name)
            });

        // Finishing consumes the writer; it must not be dropped mid-file.
        let finished = zip.finish().map_err(zip_error);
        walked?;
        let content = finished?.into_inner();

        if archive.files == 0 {
            return Err(PackagingError::Empty {
                path: project_dir.to_path_buf(),
            });
        }

        if let Err(e) = fs::write(&archive.path, &content) {
            let _ = fs::remove_file(&archive.path);
            return Err(io_error(format!("writing {}", archive.path.display()), e));
        }

        tracing::info!(
            archive = %archive.path.display(),
            files = archive.files,
            bytes = archive.bytes,
            compressed = content.len(),
            "Archive created"
        );
        Ok(archive)
    }

    fn add_path(
        &mut self,
        zip: &mut MemoryZip,
        path: &Path,
        name: &str,
    ) -> Result<(), PackagingError> {
        let metadata = fs::symlink_metadata(path)
            .map_err(|e| io_error(format!("inspecting {}", path.display()), e))?;
        let file_type = metadata.file_type();

        if file_type.is_symlink() {
            match fs::metadata(path) {
                Ok(target) if target.is_file() => {}
                Ok(_) => {
                    tracing::warn!(entry = %name, "Skipping symlink that does not point to a file");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(entry = %name, error = %e, "Skipping broken symlink");
                    return Ok(());
                }
            }
        } else if file_type.is_dir() {
            zip.add_directory(format!("{}/", name), SimpleFileOptions::default())
                .map_err(zip_error)?;
            for child in sorted_entries(path)? {
                let child_name = format!("{}/{}", name, child.file_name().to_string_lossy());
                self.add_path(zip, &child.path(), &child_name)?;
            }
            return Ok(());
        } else if !file_type.is_file() {
            tracing::warn!(entry = %name, "Skipping special file");
            return Ok(());
        }

        let mut source =
            File::open(path).map_err(|e| io_error(format!("opening {}", path.display()), e))?;
        zip.start_file(name, file_options(path)).map_err(zip_error)?;
        let copied = io::copy(&mut source, zip)
            .map_err(|e| io_error(format!("compressing {}", path.display()), e))?;

        self.files += 1;
        self.bytes += copied;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of files packaged.
    pub fn files(&self) -> usize {
        self.files
    }

    /// Uncompressed bytes packaged.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Read the finished archive for upload.
    pub fn read(&self) -> Result<Vec<u8>, PackagingError> {
        fs::read(&self.path).map_err(|e| io_error(format!("reading {}", self.path.display()), e))
    }

    /// Delete the archive file.
    pub fn remove(self) -> Result<(), PackagingError> {
        fs::remove_file(&self.path)
            .map_err(|e| io_error(format!("removing {}", self.path.display()), e))
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<fs::DirEntry>, PackagingError> {
    let listing_error = |e| io_error(format!("listing {}", dir.display()), e);
    let mut entries = fs::read_dir(dir)
        .map_err(listing_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(listing_error)?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// Keep the executable bit so handlers that shell out still work remotely.
#[cfg(unix)]
fn file_options(path: &Path) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;

    let options = SimpleFileOptions::default();
    match fs::metadata(path) {
        Ok(metadata) => options.unix_permissions(metadata.permissions().mode()),
        Err(_) => options,
    }
}

#[cfg(not(unix))]
fn file_options(_path: &Path) -> SimpleFileOptions {
    SimpleFileOptions::default()
}

fn io_error(context: String, source: io::Error) -> PackagingError {
    PackagingError::Io { context, source }
}

fn zip_error(e: zip::result::ZipError) -> PackagingError {
    PackagingError::Zip {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.js"), "exports.handler = async () => 'ok';").unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib").join("util.js"), "module.exports = {};").unwrap();
        fs::write(dir.path().join(".env"), "SECRET=1").unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "{}").unwrap();
        dir
    }

    fn names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_packages_visible_entries_recursively() {
        let dir = project();
        let archive = Archive::create(dir.path(), "deploy.zip", &[]).unwrap();

        assert_eq!(archive.files(), 2);
        assert_eq!(
            names(archive.path()),
            vec!["index.js", "lib/", "lib/util.js"]
        );
    }

    #[test]
    fn test_excludes_configured_entries() {
        let dir = project();
        let archive = Archive::create(dir.path(), "deploy.zip", &["lib".to_string()]).unwrap();

        assert_eq!(names(archive.path()), vec!["index.js"]);
    }

    #[test]
    fn test_previous_archive_not_nested() {
        let dir = project();
        fs::write(dir.path().join("deploy.zip"), b"stale").unwrap();

        let archive = Archive::create(dir.path(), "deploy.zip", &[]).unwrap();
        assert!(!names(archive.path()).contains(&"deploy.zip".to_string()));
    }

    #[test]
    fn test_empty_project_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "node_modules").unwrap();

        let err = Archive::create(dir.path(), "deploy.zip", &[]).unwrap_err();
        assert!(matches!(err, PackagingError::Empty { .. }));
        assert!(!dir.path().join("deploy.zip").exists());
    }

    #[test]
    fn test_remove_deletes_file() {
        let dir = project();
        let archive = Archive::create(dir.path(), "deploy.zip", &[]).unwrap();
        let path = archive.path().to_path_buf();

        assert!(!archive.read().unwrap().is_empty());
        archive.remove().unwrap();
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_not_followed() {
        let dir = project();
        std::os::unix::fs::symlink("..", dir.path().join("lib").join("up")).unwrap();
        std::os::unix::fs::symlink("index.js", dir.path().join("main.js")).unwrap();
        std::os::unix::fs::symlink("missing.js", dir.path().join("broken.js")).unwrap();

        let archive = Archive::create(dir.path(), "deploy.zip", &[]).unwrap();

        assert_eq!(
            names(archive.path()),
            vec!["index.js", "lib/", "lib/util.js", "main.js"]
        );
        assert_eq!(archive.files(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_special_files_are_skipped() {
        let dir = project();
        let _listener =
            std::os::unix::net::UnixListener::bind(dir.path().join("debug.sock")).unwrap();

        let archive = Archive::create(dir.path(), "deploy.zip", &[]).unwrap();
        assert!(!names(archive.path()).contains(&"debug.sock".to_string()));
    }

    #[test]
    fn test_write_failure_reports_error() {
        let dir = project();
        // Occupy the archive path with a directory so the final write fails.
        fs::create_dir(dir.path().join("deploy.zip")).unwrap();

        let err = Archive::create(dir.path(), "deploy.zip", &[]).unwrap_err();

        assert!(matches!(err, PackagingError::Io { .. }));
        assert!(dir.path().join("deploy.zip").is_dir());
        assert_eq!(
            fs::read_dir(dir.path().join("deploy.zip")).unwrap().count(),
            0
        );
    }

    #[test]
    fn test_missing_project_dir_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");

        let err = Archive::create(&missing, "deploy.zip", &[]).unwrap_err();

        assert!(matches!(err, PackagingError::Io { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_bytes_counts_uncompressed_content() {
        let dir = project();
        let archive = Archive::create(dir.path(), "deploy.zip", &[]).unwrap();

        let expected = "exports.handler = async () => 'ok';".len() + "module.exports = {};".len();
        assert_eq!(archive.bytes(), expected as u64);
    }
}
