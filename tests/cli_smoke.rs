use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use printmock::PrintArea;

fn bin_path() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_printmock")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "printmock.exe"
            } else {
                "printmock"
            });
            p
        })
}

fn write_template(path: &std::path::Path) {
    let img = RgbaImage::from_fn(100, 100, |x, y| {
        if (25..75).contains(&x) && (25..75).contains(&y) {
            Rgba([255, 0, 255, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

#[test]
fn cli_detect_prints_print_area_json() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let template = dir.join("template.png");
    write_template(&template);

    let out = std::process::Command::new(bin_path())
        .args(["detect", "--in"])
        .arg(&template)
        .output()
        .unwrap();

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let area: PrintArea = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(area, PrintArea::new(0.25, 0.25, 0.5, 0.5).unwrap());
}

#[test]
fn cli_composite_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let template = dir.join("template2.png");
    let design = dir.join("design.png");
    let out_path = dir.join("mockup.png");
    let _ = std::fs::remove_file(&out_path);

    write_template(&template);
    RgbaImage::from_pixel(10, 10, Rgba([0, 128, 255, 255]))
        .save_with_format(&design, image::ImageFormat::Png)
        .unwrap();

    let status = std::process::Command::new(bin_path())
        .args(["composite", "--template"])
        .arg(&template)
        .arg("--design")
        .arg(&design)
        .arg("--out")
        .arg(&out_path)
        .status()
        .unwrap();

    assert!(status.success());
    let out = image::open(&out_path).unwrap();
    assert_eq!((out.width(), out.height()), (100, 100));
}
