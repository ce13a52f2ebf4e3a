#![no_main]

use libfuzzer_sys::fuzz_target;
use vista_layout::{Breakpoint, StaticStyleSource, breakpoint_var, load_breakpoints, parse_px};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    // parse_px never panics and never yields zero.
    if let Some(v) = parse_px(text) {
        assert!(v > 0);
    }

    // Split the input into one value per tier; whatever the theme says, the
    // loaded set is valid and buckets every width.
    let src = StaticStyleSource::new();
    for (bp, raw) in Breakpoint::ALL[1..].iter().zip(text.split(';')) {
        src.set(breakpoint_var(*bp), raw);
    }
    let bps = load_breakpoints(&src);
    assert!(bps.validate().is_ok());
    for w in [0, 1, 374, 375, 767, 768, 1439, 1440, u32::MAX] {
        let bucket = bps.bucket_for(w);
        assert!(bps.threshold(bucket) <= w);
    }
});
