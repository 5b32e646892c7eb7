use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIFから拾えるカメラ情報
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraInfo {
    pub camera_model: Option<String>,
    pub iso: Option<u32>,
}

pub fn extract_camera_info(path: &Path) -> Result<CameraInfo, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(file);
    let exif_reader = exif::Reader::new();
    let exif = exif_reader.read_from_container(&mut bufreader)?;

    let camera_model = exif
        .get_field(exif::Tag::Model, exif::In::PRIMARY)
        .map(|field| field.display_value().to_string().trim_matches('"').trim().to_string())
        .filter(|model| !model.is_empty());

    let iso = exif
        .get_field(exif::Tag::PhotographicSensitivity, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0));

    Ok(CameraInfo { camera_model, iso })
}
