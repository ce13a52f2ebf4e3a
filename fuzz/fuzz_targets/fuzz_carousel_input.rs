#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vista_core::{PointerEvent, Size};
use vista_widgets::{Carousel3d, CarouselConfig, SwipeThreshold};

#[derive(Debug, Arbitrary)]
enum Op {
    Down(i16, i16),
    Move(i16, i16),
    Up(i16, i16),
    Cancel,
    Next,
    Prev,
    GoTo(u16),
    Resize(u16),
    SetCount(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    slides: u8,
    continuous: bool,
    pixel_threshold: Option<u8>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut config = CarouselConfig::default().continuous_drag(input.continuous);
    if let Some(px) = input.pixel_threshold {
        config = config.swipe_threshold(SwipeThreshold::Pixels(f64::from(px)));
    }
    let mut c = Carousel3d::new(config, usize::from(input.slides));

    for op in input.ops.into_iter().take(512) {
        match op {
            Op::Down(x, y) => {
                c.handle_pointer(PointerEvent::Down { x: x.into(), y: y.into() });
            }
            Op::Move(x, y) => {
                c.handle_pointer(PointerEvent::Move { x: x.into(), y: y.into() });
            }
            Op::Up(x, y) => {
                c.handle_pointer(PointerEvent::Up { x: x.into(), y: y.into() });
            }
            Op::Cancel => {
                c.handle_pointer(PointerEvent::Cancel);
            }
            Op::Next => c.next(),
            Op::Prev => c.prev(),
            Op::GoTo(i) => c.go_to(usize::from(i)),
            Op::Resize(w) => c.set_container(Size::new(f64::from(w), 300.0)),
            Op::SetCount(n) => c.set_slide_count(usize::from(n)),
        }

        let n = c.slide_count();
        if n > 0 {
            assert!(c.active_index() < n);
        } else {
            assert_eq!(c.active_index(), 0);
        }
        for g in c.geometries() {
            assert!(g.angle_diff.is_finite());
            assert!(g.opacity >= 0.2 - 1e-9);
        }
    }
});
