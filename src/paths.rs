use crate::error::Error;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Collect the raster images of a directory, sorted by file name so
/// processing order is stable regardless of how the filesystem lists them.
pub fn raster_files(directory: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = std::fs::read_dir(directory)
        .map_err(|e| Error::Resource(format!("{}: {e}", directory.display())))?;
    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        if let Some("png" | "jpg" | "jpeg" | "bmp" | "gif" | "tga") = ext.as_deref() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Derive an output path from `path` by inserting a UTC timestamp between the
/// file stem and its extension, so repeated runs never clobber earlier output.
pub fn timestamped(path: &Path) -> PathBuf {
    timestamped_at(path, Utc::now())
}

fn timestamped_at(path: &Path, when: DateTime<Utc>) -> PathBuf {
    let stamp = when.format("-%Y-%m-%dT%H-%M-%S");
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{stem}{stamp}.{ext}"),
        None => format!("{stem}{stamp}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn raster_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let pixel = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        pixel.save(dir.path().join("b.png")).unwrap();
        pixel.save(dir.path().join("a.PNG")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let names: Vec<_> = raster_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.png"]);
    }

    #[test]
    fn scanning_a_missing_directory_is_a_resource_error() {
        let err = raster_files(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }

    #[test]
    fn stamp_lands_between_stem_and_extension() {
        let when = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 2).unwrap();
        assert_eq!(
            timestamped_at(Path::new("/tmp/deck.png"), when),
            PathBuf::from("/tmp/deck-2024-03-09T17-05-02.png")
        );
    }

    #[test]
    fn extensionless_paths_get_a_trailing_stamp() {
        let when = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 2).unwrap();
        assert_eq!(
            timestamped_at(Path::new("notes"), when),
            PathBuf::from("notes-2024-03-09T17-05-02")
        );
    }

    #[test]
    fn repeated_calls_keep_the_parent_directory() {
        let out = timestamped(Path::new("/var/data/map.jpg"));
        assert_eq!(out.parent(), Some(Path::new("/var/data")));
        assert!(out.to_string_lossy().ends_with(".jpg"));
    }
}
