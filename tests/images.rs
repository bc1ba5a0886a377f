mod common;

use docflow_pdf::model::{EmbeddedImage, ImageFormat};
use docflow_pdf::transcode::image::place;

fn image(name: &str, px_w: u32, px_h: u32) -> EmbeddedImage {
    EmbeddedImage {
        data: vec![0u8; 64],
        format: ImageFormat::Png,
        file_name: Some(name.to_string()),
        pixel_width: px_w,
        pixel_height: px_h,
    }
}

fn broken(name: &str) -> EmbeddedImage {
    EmbeddedImage {
        data: Vec::new(),
        format: ImageFormat::Png,
        file_name: Some(name.to_string()),
        pixel_width: 100,
        pixel_height: 100,
    }
}

const CONTENT_WIDTH: f32 = 523.0;

#[test]
fn single_image_scales_down_preserving_ratio() {
    // 1600x1200 px is 1200x900 pt at 96 dpi; bounds are 400x300.
    let img = image("big.png", 1600, 1200);
    let block = place(&[&img], CONTENT_WIDTH);
    assert!(!block.grid);
    assert_eq!(block.slots.len(), 1);
    let placed = block.slots[0].as_ref().unwrap();
    assert!((placed.width - 400.0).abs() < 0.5);
    assert!((placed.height - 300.0).abs() < 0.5);
}

#[test]
fn small_image_is_never_scaled_up() {
    // 96x64 px is exactly 72x48 pt.
    let img = image("small.png", 96, 64);
    let block = place(&[&img], CONTENT_WIDTH);
    let placed = block.slots[0].as_ref().unwrap();
    assert!((placed.width - 72.0).abs() < 0.01);
    assert!((placed.height - 48.0).abs() < 0.01);
}

#[test]
fn single_image_has_no_caption() {
    let img = image("solo.png", 96, 96);
    let block = place(&[&img], CONTENT_WIDTH);
    assert!(block.slots[0].as_ref().unwrap().caption.is_none());
}

#[test]
fn multiple_images_become_captioned_grid() {
    let a = image("a.png", 800, 600);
    let b = image("b.png", 800, 600);
    let c = image("c.png", 800, 600);
    let block = place(&[&a, &b, &c], CONTENT_WIDTH);
    assert!(block.grid);
    assert_eq!(block.slots.len(), 3);
    for (slot, name) in block.slots.iter().zip(["a.png", "b.png", "c.png"]) {
        let placed = slot.as_ref().unwrap();
        assert_eq!(placed.caption.as_deref(), Some(name));
        // Grid cells cap at 150x120 pt.
        assert!(placed.width <= 150.0 + 0.01);
        assert!(placed.height <= 120.0 + 0.01);
    }
}

#[test]
fn one_bad_image_leaves_its_slot_empty() {
    let a = image("a.png", 400, 300);
    let bad = broken("bad.png");
    let c = image("c.png", 400, 300);
    let block = place(&[&a, &bad, &c], CONTENT_WIDTH);
    assert_eq!(block.slots.len(), 3);
    assert!(block.slots[0].is_some());
    assert!(block.slots[1].is_none());
    assert!(block.slots[2].is_some());
}

#[test]
fn single_bad_image_yields_empty_block() {
    let bad = broken("bad.png");
    let block = place(&[&bad], CONTENT_WIDTH);
    assert!(block.slots.is_empty());
}

#[test]
fn zero_dimension_image_is_rejected() {
    let mut img = image("flat.png", 0, 100);
    img.data = vec![0u8; 64];
    let block = place(&[&img], CONTENT_WIDTH);
    assert!(block.slots.is_empty());
}

#[test]
fn narrow_width_shrinks_grid_columns() {
    let a = image("a.png", 800, 200);
    let b = image("b.png", 800, 200);
    // 100 pt available for two columns leaves 50 pt each.
    let block = place(&[&a, &b], 100.0);
    for slot in &block.slots {
        assert!(slot.as_ref().unwrap().width <= 50.0 + 0.01);
    }
}
