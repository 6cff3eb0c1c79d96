//! ROM image loading: a loose `.gb`/`.gbc` file, or the first cartridge
//! image found inside a ZIP archive.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Load raw cartridge bytes from `path`.
///
/// Resolution order:
/// 1. If `path` ends with `.zip` → the first `.gb`/`.gbc` entry inside.
/// 2. Otherwise → the file itself.
pub fn load_rom_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    {
        return load_from_zip(path);
    }
    std::fs::read(path)
}

fn load_from_zip(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, format!("invalid ZIP: {e}"))
    })?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("ZIP entry error: {e}"),
            )
        })?;

        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_ascii_lowercase();
        if name.ends_with(".gb") || name.ends_with(".gbc") {
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            return Ok(data);
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "no .gb/.gbc entry in archive",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_test_zip(dir: &Path, name: &str, files: &[(&str, &[u8])]) -> std::path::PathBuf {
        let zip_path = dir.join(name);
        let file = File::create(&zip_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (fname, data) in files {
            zip.start_file(*fname, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
        zip_path
    }

    #[test]
    fn loads_loose_file() {
        let dir = std::env::temp_dir().join("olivine_rompath_loose");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let rom = dir.join("game.gb");
        std::fs::write(&rom, [0xCC; 4]).unwrap();

        assert_eq!(load_rom_bytes(&rom).unwrap(), vec![0xCC; 4]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn picks_cartridge_entry_from_zip() {
        let dir = std::env::temp_dir().join("olivine_rompath_zip");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let zip_path = create_test_zip(
            &dir,
            "game.zip",
            &[("readme.txt", &[0x00; 8]), ("game.gb", &[0xAB; 16])],
        );

        assert_eq!(load_rom_bytes(&zip_path).unwrap(), vec![0xAB; 16]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn zip_without_cartridge_errors() {
        let dir = std::env::temp_dir().join("olivine_rompath_empty");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let zip_path = create_test_zip(&dir, "other.zip", &[("notes.txt", &[0x01; 4])]);

        assert!(load_rom_bytes(&zip_path).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
