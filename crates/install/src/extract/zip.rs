use async_trait::async_trait;
use nwkit_errors::{Error, StorageError};
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tokio::task;

use super::ExtractStrategy;

/// Zip extraction on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipStrategy;

#[async_trait]
impl ExtractStrategy for ZipStrategy {
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<usize, Error> {
        let archive = archive.to_path_buf();
        let dest = dest.to_path_buf();

        task::spawn_blocking(move || extract_zip(&archive, &dest))
            .await
            .map_err(|e| Error::internal(format!("zip extraction task failed: {e}")))?
    }
}

fn corrupt(archive: &Path, e: &zip::result::ZipError) -> Error {
    StorageError::CorruptedData {
        message: format!("{}: {e}", archive.display()),
    }
    .into()
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<usize, Error> {
    let file = File::open(archive_path).map_err(|e| Error::io_with_path(&e, archive_path))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| corrupt(archive_path, &e))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| corrupt(archive_path, &e))?;

        // Entries escaping the destination are skipped
        let outpath: PathBuf = match entry.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => continue,
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath).map_err(|e| Error::io_with_path(&e, &outpath))?;
        } else if entry.is_symlink() {
            let mut target = String::new();
            entry
                .read_to_string(&mut target)
                .map_err(|e| Error::io_with_path(&e, &outpath))?;
            // Links resolving outside the destination are skipped like escaping entries
            if !link_stays_within(dest_dir, &outpath, Path::new(&target)) {
                continue;
            }
            write_symlink(&target, &outpath)?;
            written += 1;
        } else {
            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(&e, parent))?;
            }
            let mut outfile =
                File::create(&outpath).map_err(|e| Error::io_with_path(&e, &outpath))?;
            std::io::copy(&mut entry, &mut outfile)
                .map_err(|e| Error::io_with_path(&e, &outpath))?;
            written += 1;
        }

        // Mode bits on a link would apply to its target
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let (false, Some(mode)) = (entry.is_symlink(), entry.unix_mode()) {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode)).ok();
            }
        }
    }

    Ok(written)
}

/// Whether `target`, read relative to the link at `link`, resolves inside `root`
fn link_stays_within(root: &Path, link: &Path, target: &Path) -> bool {
    let Some(parent) = link.parent() else {
        return false;
    };
    let Ok(relative) = parent.strip_prefix(root) else {
        return false;
    };

    let mut depth = relative.components().count();
    for component in target.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

fn write_symlink(target: &str, link: &Path) -> Result<(), Error> {
    if let Some(parent) = link.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(&e, parent))?;
    }
    // Extracting over a previous run replaces whatever sits at the link path
    if link.symlink_metadata().is_ok() {
        std::fs::remove_file(link).map_err(|e| Error::io_with_path(&e, link))?;
    }

    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(target, link);
    #[cfg(not(unix))]
    let result = std::fs::write(link, target);

    result.map_err(|e| Error::io_with_path(&e, link))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[tokio::test]
    async fn test_extracts_nested_entries() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("a.zip");
        build_zip(
            &archive,
            &[
                ("nw.exe", b"MZ"),
                ("locales/en-US.pak", b"pak"),
            ],
        );

        let dest = temp.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        let written = ZipStrategy.extract(&archive, &dest).await.unwrap();

        assert_eq!(written, 2);
        assert_eq!(std::fs::read(dest.join("nw.exe")).unwrap(), b"MZ");
        assert_eq!(std::fs::read(dest.join("locales/en-US.pak")).unwrap(), b"pak");
    }

    #[tokio::test]
    async fn test_escaping_entry_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("evil.zip");
        build_zip(&archive, &[("../escape.txt", b"x"), ("ok.txt", b"y")]);

        let dest = temp.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        let written = ZipStrategy.extract(&archive, &dest).await.unwrap();

        assert_eq!(written, 1);
        assert!(!temp.path().join("escape.txt").exists());
        assert!(dest.join("ok.txt").exists());
    }

    #[tokio::test]
    async fn test_garbage_is_corrupt() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("bad.zip");
        std::fs::write(&archive, b"<html>not a zip</html>").unwrap();

        let err = ZipStrategy
            .extract(&archive, temp.path())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::CorruptedData { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_entries_restored() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("mac.zip");
        {
            let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
            let options = SimpleFileOptions::default();
            writer
                .start_file("node-webkit.app/F.framework/Versions/A/F", options)
                .unwrap();
            writer.write_all(b"mach-o").unwrap();
            writer
                .add_symlink("node-webkit.app/F.framework/Versions/Current", "A", options)
                .unwrap();
            writer
                .add_symlink("node-webkit.app/leak", "../../../etc/passwd", options)
                .unwrap();
            writer.finish().unwrap();
        }

        let dest = temp.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        let written = ZipStrategy.extract(&archive, &dest).await.unwrap();
        assert_eq!(written, 2);

        let current = dest.join("node-webkit.app/F.framework/Versions/Current");
        assert!(current.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_link(&current).unwrap(), Path::new("A"));
        assert_eq!(std::fs::read(current.join("F")).unwrap(), b"mach-o");
        assert!(dest.join("node-webkit.app/leak").symlink_metadata().is_err());

        // Extracting again over the same tree replaces the link
        ZipStrategy.extract(&archive, &dest).await.unwrap();
        assert_eq!(std::fs::read_link(&current).unwrap(), Path::new("A"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unix_mode_restored() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("linux.zip");
        {
            let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
            writer
                .start_file(
                    "nw",
                    SimpleFileOptions::default().unix_permissions(0o755),
                )
                .unwrap();
            writer.write_all(b"elf").unwrap();
            writer.finish().unwrap();
        }

        let dest = temp.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();
        ZipStrategy.extract(&archive, &dest).await.unwrap();

        let mode = std::fs::metadata(dest.join("nw")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_link_containment() {
        let root = Path::new("/dest");
        let link = Path::new("/dest/app/F.framework/Versions/Current");
        assert!(link_stays_within(root, link, Path::new("A")));
        assert!(link_stays_within(root, link, Path::new("../../Resources")));
        assert!(!link_stays_within(root, link, Path::new("../../../../x")));
        assert!(!link_stays_within(root, link, Path::new("/etc/passwd")));
    }
}
