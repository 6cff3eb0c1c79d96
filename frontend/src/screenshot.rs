//! PNG screenshots of the native-resolution framebuffer.

use std::path::PathBuf;

/// Write `framebuffer` (RGBA8888, `width`×`height`) to a timestamp-free
/// numbered file in the current directory: `olivine-000.png`, ...
pub fn save(framebuffer: &[u8], width: u32, height: u32) -> std::io::Result<PathBuf> {
    let path = next_free_path()?;
    let file = std::fs::File::create(&path)?;
    let writer = std::io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| std::io::Error::other(format!("PNG header: {e}")))?;
    png_writer
        .write_image_data(framebuffer)
        .map_err(|e| std::io::Error::other(format!("PNG data: {e}")))?;

    Ok(path)
}

fn next_free_path() -> std::io::Result<PathBuf> {
    for n in 0..1000 {
        let path = PathBuf::from(format!("olivine-{n:03}.png"));
        if !path.exists() {
            return Ok(path);
        }
    }
    Err(std::io::Error::other("no free screenshot slot"))
}
