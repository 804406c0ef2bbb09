//! 写真の埋め込み形式（data URL）と縮小処理
//!
//! 写真は `data:<mime>;base64,<payload>` の文字列として項目に埋め込む。
//! 縮小は最大幅/高さを超える場合のみ行い、JPEGで再エンコードする。

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// 縮小設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG品質 (1-100)
    pub quality: u8,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_width: 1280,
            max_height: 1280,
            quality: 90,
        }
    }
}

/// 縦横比を保って最大サイズに収める
///
/// どちらかが上限を超える場合のみ、両辺に同じ縮小率
/// （幅・高さそれぞれの上限比の小さい方）を掛ける。拡大はしない。
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let scaled_width = ((width as f64 * scale).round() as u32).clamp(1, max_width.max(1));
    let scaled_height = ((height as f64 * scale).round() as u32).clamp(1, max_height.max(1));
    (scaled_width, scaled_height)
}

/// data URL を組み立て
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// data URL を (MIMEタイプ, Base64部分) に分解
pub fn split_data_url(data_url: &str) -> Option<(&str, &str)> {
    let rest = data_url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime, payload))
}

/// data URL をバイト列に戻す
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let (_, payload) = split_data_url(data_url)
        .ok_or_else(|| Error::Image("not a base64 data URL".into()))?;
    STANDARD
        .decode(payload)
        .map_err(|e| Error::Image(format!("base64: {}", e)))
}

/// 画像を縮小してJPEGのdata URLにする
#[cfg(feature = "normalize")]
pub fn normalize_image(bytes: &[u8], options: &NormalizeOptions) -> Result<String> {
    use image::codecs::jpeg::JpegEncoder;
    use image::imageops::FilterType;

    let image = image::load_from_memory(bytes).map_err(|e| Error::Image(e.to_string()))?;
    let (width, height) = fit_within(
        image.width(),
        image.height(),
        options.max_width,
        options.max_height,
    );
    let image = if (width, height) != (image.width(), image.height()) {
        image.resize_exact(width, height, FilterType::Lanczos3)
    } else {
        image
    };

    // JPEGはアルファ非対応
    let rgb = image.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, options.quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| Error::Image(e.to_string()))?;

    Ok(encode_data_url("image/jpeg", &buffer))
}

/// 画像形式を判定してそのまま埋め込む
#[cfg(feature = "normalize")]
pub fn embed_image(bytes: &[u8]) -> Result<String> {
    let format = image::guess_format(bytes).map_err(|e| Error::Image(e.to_string()))?;
    Ok(encode_data_url(format.to_mime_type(), bytes))
}

/// 写真ファイルを読み込んで data URL にする
///
/// `options` が `None` なら縮小せずに埋め込む。
#[cfg(feature = "normalize")]
pub fn load_photo(path: &std::path::Path, options: Option<&NormalizeOptions>) -> Result<String> {
    let bytes = std::fs::read(path)?;
    match options {
        Some(options) => normalize_image(&bytes, options),
        None => embed_image(&bytes),
    }
}
