//! archive
//!
//! Where downloadable archives of a repository live on disk.
//!
//! Archives are stored as `<storage>/<name>/<name>.<extension>`. Only the
//! path is computed here; producing the archive is somebody else's job.

use std::path::{Path, PathBuf};

/// Archive container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveFormat {
    #[default]
    TarGz,
    TarBz2,
    Tar,
    Zip,
}

impl ArchiveFormat {
    /// Normalize a user-supplied format name.
    ///
    /// Unknown or empty names fall back to `tar.gz`.
    ///
    /// # Example
    ///
    /// ```
    /// use repolens::archive::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::from_name("tbz2"), ArchiveFormat::TarBz2);
    /// assert_eq!(ArchiveFormat::from_name(""), ArchiveFormat::TarGz);
    /// assert_eq!(ArchiveFormat::from_name("rar"), ArchiveFormat::TarGz);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name {
            "tar.bz2" | "tbz" | "tbz2" | "tb2" | "bz2" => ArchiveFormat::TarBz2,
            "tar" => ArchiveFormat::Tar,
            "zip" => ArchiveFormat::Zip,
            _ => ArchiveFormat::TarGz,
        }
    }

    /// File extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::TarBz2 => "tar.bz2",
            ArchiveFormat::Tar => "tar",
            ArchiveFormat::Zip => "zip",
        }
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Path of the archive called `name` under `storage`.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use repolens::archive::{archive_file_path, ArchiveFormat};
///
/// let path = archive_file_path("project-v1", Path::new("/var/archives"), ArchiveFormat::Zip);
/// assert_eq!(path, Path::new("/var/archives/project-v1/project-v1.zip"));
/// ```
pub fn archive_file_path(name: &str, storage: &Path, format: ArchiveFormat) -> PathBuf {
    storage
        .join(name)
        .join(format!("{}.{}", name, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bzip_aliases() {
        for alias in ["tar.bz2", "tbz", "tbz2", "tb2", "bz2"] {
            assert_eq!(ArchiveFormat::from_name(alias), ArchiveFormat::TarBz2);
        }
    }

    #[test]
    fn plain_formats() {
        assert_eq!(ArchiveFormat::from_name("tar"), ArchiveFormat::Tar);
        assert_eq!(ArchiveFormat::from_name("zip"), ArchiveFormat::Zip);
        assert_eq!(ArchiveFormat::from_name("tar.gz"), ArchiveFormat::TarGz);
    }

    #[test]
    fn default_is_tar_gz() {
        assert_eq!(ArchiveFormat::default(), ArchiveFormat::TarGz);
        assert_eq!(ArchiveFormat::from_name("TAR"), ArchiveFormat::TarGz);
    }

    #[test]
    fn path_layout() {
        let path = archive_file_path("repo", Path::new("/data"), ArchiveFormat::TarBz2);
        assert_eq!(path, PathBuf::from("/data/repo/repo.tar.bz2"));
    }
}
