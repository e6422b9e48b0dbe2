mod common;

use common::synthetic_image::{noise_bytes, step_edge_u8};
use hough_filters::{BilateralParams, BilateralSmoothing, ImageView, PixelBuffer, PixelFormat};

fn filter(params: BilateralParams) -> BilateralSmoothing {
    BilateralSmoothing::new(params).expect("valid bilateral parameters")
}

#[test]
fn constant_images_pass_unchanged() {
    let _ = env_logger::builder().is_test(true).try_init();
    for format in [PixelFormat::Gray8, PixelFormat::Rgb24, PixelFormat::Rgba32] {
        let img = PixelBuffer::filled(40, 30, format, 177);
        for kernel_size in [3, 9, 25] {
            let out = filter(BilateralParams {
                kernel_size,
                ..BilateralParams::default()
            })
            .apply(&img.as_view())
            .expect("supported format");
            assert_eq!(out, img, "format={format} kernel={kernel_size}");
        }
    }
}

/// Runs `op` on a four-thread pool so the parallel interior pass is taken
/// even on single-core hosts.
#[cfg(feature = "parallel")]
fn run_on_pool<R: Send>(op: impl FnOnce() -> R + Send) -> R {
    rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("thread pool")
        .install(op)
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_and_sequential_paths_agree() {
    use common::synthetic_image::checkerboard_u8;
    use hough_filters::PixelView;

    let _ = env_logger::builder().is_test(true).try_init();
    let (w, h) = (57usize, 41usize);
    let data = noise_bytes(w * h * 3, 0x5eed);
    let view = PixelView::from_slice(w, h, w * 3, PixelFormat::Rgb24, &data).expect("view");

    let params = BilateralParams {
        kernel_size: 7,
        ..BilateralParams::default()
    };
    let parallel = run_on_pool(|| {
        assert!(rayon::current_num_threads() > 1, "pool must have several workers");
        filter(params).apply(&view).expect("rgb")
    });
    let sequential = filter(BilateralParams {
        disable_parallel: true,
        ..params
    })
    .apply(&view)
    .expect("rgb");
    assert_eq!(parallel, sequential);

    let board = checkerboard_u8(w, h, 8);
    let gray = PixelView::gray(w, h, &board).expect("view");
    let mut f = filter(BilateralParams::default());
    let a = run_on_pool(|| f.apply(&gray).expect("gray"));
    f.set_disable_parallel(true);
    let b = f.apply(&gray).expect("gray");
    assert_eq!(a, b);
}

/// Weighted average with spatial weights only, clipped at the borders.
fn spatial_average(f: &BilateralSmoothing, img: &PixelBuffer, x: usize, y: usize) -> f64 {
    let ks = f.params().kernel_size as usize;
    let kh = ks / 2;
    let spatial = f.spatial_weights();
    let (mut sum_w, mut sum_wv) = (0.0, 0.0);
    for ky in 0..ks {
        for kx in 0..ks {
            let (sx, sy) = (x + kx, y + ky);
            if sx < kh || sy < kh || sx - kh >= img.width() || sy - kh >= img.height() {
                continue;
            }
            let w = spatial.get(kx, ky);
            sum_w += w;
            sum_wv += w * img.get(sx - kh, sy - kh) as f64;
        }
    }
    sum_wv / sum_w
}

#[test]
fn huge_color_factor_converges_to_spatial_blur() {
    let (w, h) = (24usize, 20usize);
    let data = noise_bytes(w * h, 42);
    let img = PixelBuffer::from_vec(w, h, PixelFormat::Gray8, data).expect("buffer");
    let f = filter(BilateralParams {
        kernel_size: 5,
        color_factor: 1e12,
        ..BilateralParams::default()
    });
    let out = f.apply(&img.as_view()).expect("gray");
    for y in 0..h {
        for x in 0..w {
            let expected = spatial_average(&f, &img, x, y);
            let got = out.get(x, y) as f64;
            assert!(
                (got - expected).abs() <= 1.0,
                "({x}, {y}): got {got}, expected {expected:.3}"
            );
        }
    }
}

#[test]
fn default_range_weights_preserve_step_edges() {
    let img = step_edge_u8(32, 32, 16, 0, 200);
    let sharp = filter(BilateralParams::default())
        .apply(&img.as_view())
        .expect("gray");
    let blurred = filter(BilateralParams {
        color_factor: 1e9,
        ..BilateralParams::default()
    })
    .apply(&img.as_view())
    .expect("gray");

    for y in 0..32 {
        assert!(sharp.get(15, y) <= 2, "row {y}: {}", sharp.get(15, y));
        assert!(sharp.get(16, y) >= 198, "row {y}: {}", sharp.get(16, y));
        assert!(blurred.get(15, y) > 20, "row {y}: {}", blurred.get(15, y));
        assert!(blurred.get(16, y) < 180, "row {y}: {}", blurred.get(16, y));
    }
}

#[test]
fn images_smaller_than_the_kernel_are_filtered_with_edge_checks() {
    let data = noise_bytes(5 * 4 * 4, 7);
    let img = PixelBuffer::from_vec(5, 4, PixelFormat::Rgba32, data).expect("buffer");
    let out = filter(BilateralParams::default())
        .apply(&img.as_view())
        .expect("rgba");
    assert_eq!((out.width(), out.height(), out.format()), (5, 4, PixelFormat::Rgba32));
    for y in 0..4 {
        for x in 0..5 {
            assert_eq!(out.pixel(x, y)[3], img.pixel(x, y)[3]);
        }
    }
}
