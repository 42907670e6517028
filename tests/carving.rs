use image::{Rgba, RgbaImage};
use seamcarve::energy::compute_energy;
use seamcarve::{carve, codec, CarveError, EnergyField, PixelBuffer, SeamCarver, Score};

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

// A black image with one white column.
fn line_image(width: u32, height: u32, line: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| if x == line { WHITE } else { BLACK })
}

fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 17 % 256) as u8, (y * 29 % 256) as u8, ((x * y) % 256) as u8, 255])
    })
}

#[test]
fn flat_regions_go_first() {
    let carved = carve(&line_image(10, 6, 5), 3).unwrap();
    assert_eq!(carved.dimensions(), (7, 6));
    for y in 0..6 {
        let whites = (0..7).filter(|&x| *carved.get_pixel(x, y) == WHITE).count();
        assert_eq!(whites, 1, "row {} lost its edge", y);
    }
    // The zero-energy columns on the left go first, leftmost first.
    assert_eq!(*carved.get_pixel(2, 0), WHITE);
}

#[test]
fn width_shrinks_by_exactly_the_seam_count() {
    let image = gradient_image(24, 11);
    for seams in &[0, 1, 7, 23] {
        let carved = carve(&image, *seams).unwrap();
        assert_eq!(carved.dimensions(), (24 - seams, 11));
    }
}

#[test]
fn energy_stays_in_step_with_the_pixels() {
    let mut carver = SeamCarver::new(codec::from_view(&gradient_image(16, 9)).unwrap()).unwrap();
    for _ in 0..12 {
        let seam = carver.next_seam();
        carver.remove_seam(&seam);

        let mut fresh = EnergyField::shaped_like(carver.luminance(), Score::Dirty).unwrap();
        compute_energy(carver.luminance(), &mut fresh);
        assert_eq!(fresh.to_compact_vec(), carver.energy().to_compact_vec());
    }
    assert_eq!(carver.width(), 4);
}

#[test]
fn carving_never_reallocates() {
    let mut carver = SeamCarver::new(codec::from_view(&gradient_image(8, 4)).unwrap()).unwrap();
    for _ in 0..5 {
        let seam = carver.next_seam();
        carver.remove_seam(&seam);
    }
    let pixels: &PixelBuffer = carver.pixels();
    assert_eq!((pixels.width(), pixels.stride()), (3, 8));
    assert_eq!(carver.energy().stride(), 8);
    assert_eq!(carver.luminance().stride(), 8);
    assert_eq!(carver.cost().stride(), 8);
}

#[test]
fn rejected_requests_leave_no_trace() {
    let image = gradient_image(5, 5);
    match carve(&image, 5) {
        Err(CarveError::InvalidDimensions {
            width: 5,
            height: 5,
            seams: 5,
        }) => {}
        other => panic!("expected InvalidDimensions, got {:?}", other.map(|i| i.dimensions())),
    }
    assert_eq!(image, gradient_image(5, 5));
}
