//! Zip archive packager for full exports.

use std::fs;
use std::io::{self, Seek, Write as _};
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::application::ports::Clock;
use crate::domain::environment::{ArtifactKind, EnvironmentDescriptor};
use crate::domain::error::PackagingError;
use crate::output::OutputContext;

/// Production clock: local wall time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn export_stamp(&self) -> String {
        chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
    }
}

/// Packages a staging directory into `<app>_<stamp>_full_export.zip`.
pub struct ZipPackager<'a, C: Clock> {
    out: &'a OutputContext,
    clock: &'a C,
}

impl<'a, C: Clock> ZipPackager<'a, C> {
    #[must_use]
    pub fn new(out: &'a OutputContext, clock: &'a C) -> Self {
        Self { out, clock }
    }

    /// Zip the immediate children of the environment's staging directory.
    ///
    /// The timestamp is captured once so the logged name and the written
    /// file never diverge. The final path is recorded under
    /// [`ArtifactKind::FullExport`] in the descriptor's registry before
    /// returning.
    ///
    /// # Errors
    ///
    /// Returns a [`PackagingError`] when the staging directory cannot be
    /// enumerated or the archive cannot be written.
    pub fn full_export(
        &self,
        environment: &mut EnvironmentDescriptor,
    ) -> Result<PathBuf, PackagingError> {
        let staging = environment.temp_dir.clone();
        let stamp = self.clock.export_stamp();
        let archive_name = format!("{}_{stamp}_full_export.zip", environment.app.name);
        let archive_path = staging.join(&archive_name);

        self.out.info(&format!(
            "Zipping contents of {} into {archive_name}",
            staging.display()
        ));

        // Children are enumerated before the archive file is created, so
        // the archive never nests into itself.
        let children = read_children(&staging)?;

        let file = fs::File::create(&archive_path).map_err(|source| {
            PackagingError::ArchiveWrite {
                path: archive_path.clone(),
                source,
            }
        })?;
        let mut writer = ZipWriter::new(io::BufWriter::new(file));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for child in &children {
            let Some(entry_name) = child.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            self.out.info(&format!("Adding {entry_name} to {archive_name}"));
            add_entry(&mut writer, child, entry_name, options).map_err(|source| {
                PackagingError::ArchiveWrite {
                    path: archive_path.clone(),
                    source,
                }
            })?;
        }

        let archive_write = |source| PackagingError::ArchiveWrite {
            path: archive_path.clone(),
            source,
        };
        let mut inner = writer
            .finish()
            .map_err(|e| archive_write(io::Error::other(e)))?;
        inner.flush().map_err(archive_write)?;

        environment
            .artifacts
            .record(ArtifactKind::FullExport, archive_path.clone());
        Ok(archive_path)
    }
}

/// Immediate children of the staging directory, sorted for a deterministic
/// archive layout.
fn read_children(staging: &Path) -> Result<Vec<PathBuf>, PackagingError> {
    let unreadable = |source| PackagingError::StagingUnreadable {
        path: staging.to_path_buf(),
        source,
    };
    let mut children = Vec::new();
    for entry in fs::read_dir(staging).map_err(unreadable)? {
        children.push(entry.map_err(unreadable)?.path());
    }
    children.sort();
    Ok(children)
}

/// Add one filesystem entry to the archive: files as entries, directories
/// recursively under their own prefix.
fn add_entry<W: io::Write + Seek>(
    writer: &mut ZipWriter<W>,
    path: &Path,
    entry_name: &str,
    options: SimpleFileOptions,
) -> io::Result<()> {
    if fs::metadata(path)?.is_dir() {
        writer
            .add_directory(entry_name, options)
            .map_err(io::Error::other)?;
        let mut children: Vec<PathBuf> = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<_>>()?;
        children.sort();
        for child in children {
            let Some(child_name) = child.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            add_entry(writer, &child, &format!("{entry_name}/{child_name}"), options)?;
        }
    } else {
        writer
            .start_file(entry_name, options)
            .map_err(io::Error::other)?;
        let mut input = fs::File::open(path)?;
        io::copy(&mut input, writer)?;
    }
    Ok(())
}
