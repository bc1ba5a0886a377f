use crate::model::EmbeddedImage;
use crate::output::{ImageBlock, PlacedImage};

/// Bounds for a single inline image, in points.
const MAX_SINGLE_WIDTH: f32 = 400.0;
const MAX_SINGLE_HEIGHT: f32 = 300.0;

/// Bounds for one cell of a multi-image grid, in points.
const MAX_GRID_WIDTH: f32 = 150.0;
const MAX_GRID_HEIGHT: f32 = 120.0;

/// Intrinsic pixel size maps to points at 96 dpi.
const PX_TO_PT: f32 = 72.0 / 96.0;

/// Scale an image's natural size down to fit the bounds, preserving aspect
/// ratio. Images are never scaled up.
fn fit(img: &EmbeddedImage, max_w: f32, max_h: f32) -> (f32, f32) {
    let natural_w = img.pixel_width as f32 * PX_TO_PT;
    let natural_h = img.pixel_height as f32 * PX_TO_PT;
    let scale = (max_w / natural_w).min(max_h / natural_h).min(1.0);
    (natural_w * scale, natural_h * scale)
}

fn place_one(img: &EmbeddedImage, max_w: f32, max_h: f32, caption: bool) -> Option<PlacedImage> {
    if img.data.is_empty() || img.pixel_width == 0 || img.pixel_height == 0 {
        log::warn!(
            "skipping unusable embedded image {:?} ({} bytes, {}x{} px)",
            img.file_name,
            img.data.len(),
            img.pixel_width,
            img.pixel_height
        );
        return None;
    }
    let (width, height) = fit(img, max_w, max_h);
    Some(PlacedImage {
        data: img.data.clone(),
        format: img.format,
        width,
        height,
        caption: if caption { img.file_name.clone() } else { None },
    })
}

/// Arrange a paragraph's embedded images. A single image is centered and
/// scaled to the large bound; several images co-located in one paragraph
/// become a borderless grid with one column per image, each cell scaled to
/// the smaller bound and captioned with the image's file name. One bad
/// image never aborts placement of its neighbors: the failing slot stays
/// empty (grid) or the block ends up with no slots at all (single).
pub fn place(images: &[&EmbeddedImage], available_width: f32) -> ImageBlock {
    if images.len() <= 1 {
        let slots = images
            .iter()
            .filter_map(|img| place_one(img, MAX_SINGLE_WIDTH.min(available_width), MAX_SINGLE_HEIGHT, false))
            .map(Some)
            .collect();
        return ImageBlock { slots, grid: false };
    }

    let col_width = (available_width / images.len() as f32).min(MAX_GRID_WIDTH);
    let slots = images
        .iter()
        .map(|img| place_one(img, col_width, MAX_GRID_HEIGHT, true))
        .collect();
    ImageBlock { slots, grid: true }
}
