//! Integration tests: full pipeline runs against a local HTTP server.
//!
//! Each test serves generated images from an in-process server, runs the
//! pipeline over a URL list or manifest directory, and inspects the output
//! directory and the returned report.

mod common;

use common::image_server::{self, Routes};
use common::{encoded, file_names};
use image::{GenericImageView, ImageFormat, ImageReader};
use pixfetch_core::config::PixfetchConfig;
use pixfetch_core::pipeline::{self, PipelineOptions, PoolSizes};
use pixfetch_core::source::UrlSource;
use std::path::Path;
use tempfile::tempdir;

fn options() -> PipelineOptions {
    PipelineOptions {
        sizes: PoolSizes::from_config(&PixfetchConfig::default(), 1).with_overrides(Some(4), Some(4)),
        ..PipelineOptions::default()
    }
}

fn write_list(dir: &Path, urls: &[String]) -> UrlSource {
    let path = dir.join("urls.txt");
    std::fs::write(&path, urls.join("\n")).unwrap();
    UrlSource::LineFile(path)
}

fn format_of(path: &Path) -> Option<ImageFormat> {
    ImageReader::open(path).unwrap().with_guessed_format().unwrap().format()
}

#[test]
fn every_url_succeeds() {
    let mut routes = Routes::new();
    for i in 0..6 {
        routes = routes.ok(&format!("/img/{}.jpg", i), encoded(40, 30, ImageFormat::Jpeg));
    }
    let base = image_server::start(routes);
    let work = tempdir().unwrap();
    let out = work.path().join("out");
    let urls: Vec<String> = (0..6).map(|i| format!("{}/img/{}.jpg", base, i)).collect();

    let report = pipeline::run(&write_list(work.path(), &urls), &out, &options()).unwrap();

    assert_eq!(report.submitted, 6);
    assert_eq!(report.fetched, 6);
    assert_eq!(report.transformed, 6);
    assert!(report.is_clean());
    assert_eq!(file_names(&out).len(), 6);
    assert_eq!(
        report.summary_line().split(" in ").next().unwrap(),
        "Successfully downloaded and processed 6 images"
    );
}

#[test]
fn not_found_url_is_skipped() {
    let base = image_server::start(
        Routes::new()
            .ok("/one.jpg", encoded(32, 32, ImageFormat::Jpeg))
            .status("/two.jpg", 404, b"gone".to_vec())
            .ok("/three.jpg", encoded(32, 32, ImageFormat::Jpeg)),
    );
    let work = tempdir().unwrap();
    let out = work.path().join("out");
    let urls = vec![
        format!("{}/one.jpg", base),
        format!("{}/two.jpg", base),
        format!("{}/three.jpg", base),
    ];

    let report = pipeline::run(&write_list(work.path(), &urls), &out, &options()).unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.fetch_failed, 1);
    assert_eq!(report.transformed, 2);
    assert_eq!(file_names(&out), vec!["one.jpg", "three.jpg"]);
}

#[test]
fn colliding_names_get_suffixes() {
    let base = image_server::start(
        Routes::new()
            .ok("/a/pic.png", encoded(20, 20, ImageFormat::Png))
            .ok("/b/pic.png", encoded(30, 30, ImageFormat::Png)),
    );
    let work = tempdir().unwrap();
    let out = work.path().join("out");
    let urls = vec![format!("{}/a/pic.png", base), format!("{}/b/pic.png", base)];

    let report = pipeline::run(&write_list(work.path(), &urls), &out, &options()).unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(file_names(&out), vec!["pic.png", "pic_1.png"]);
    let mut dims: Vec<(u32, u32)> = ["pic.png", "pic_1.png"]
        .iter()
        .map(|n| image::open(out.join(n)).unwrap().dimensions())
        .collect();
    dims.sort();
    assert_eq!(dims, vec![(10, 10), (15, 15)]);
}

#[test]
fn webp_is_converted_to_jpeg() {
    let base = image_server::start(Routes::new().ok("/banner.webp", encoded(64, 48, ImageFormat::WebP)));
    let work = tempdir().unwrap();
    let out = work.path().join("out");

    let report =
        pipeline::run(&write_list(work.path(), &[format!("{}/banner.webp", base)]), &out, &options()).unwrap();

    assert_eq!(report.transformed, 1);
    assert_eq!(file_names(&out), vec!["banner.jpg"]);
    let jpg = out.join("banner.jpg");
    assert_eq!(format_of(&jpg), Some(ImageFormat::Jpeg));
    assert_eq!(image::open(&jpg).unwrap().dimensions(), (32, 24));
}

#[test]
fn dimensions_are_halved_with_truncation() {
    let base = image_server::start(
        Routes::new()
            .ok("/odd.png", encoded(101, 67, ImageFormat::Png))
            .ok("/odd.jpg", encoded(33, 99, ImageFormat::Jpeg)),
    );
    let work = tempdir().unwrap();
    let out = work.path().join("out");
    let urls = vec![format!("{}/odd.png", base), format!("{}/odd.jpg", base)];

    pipeline::run(&write_list(work.path(), &urls), &out, &options()).unwrap();

    assert_eq!(image::open(out.join("odd.png")).unwrap().dimensions(), (50, 33));
    assert_eq!(image::open(out.join("odd.jpg")).unwrap().dimensions(), (16, 49));
    assert_eq!(format_of(&out.join("odd.png")), Some(ImageFormat::Png));
    assert_eq!(format_of(&out.join("odd.jpg")), Some(ImageFormat::Jpeg));
}

#[test]
fn normalized_output_is_centered() {
    let base = image_server::start(Routes::new().ok("/grad.png", encoded(120, 80, ImageFormat::Png)));
    let work = tempdir().unwrap();
    let out = work.path().join("out");

    pipeline::run(&write_list(work.path(), &[format!("{}/grad.png", base)]), &out, &options()).unwrap();

    let img = image::open(out.join("grad.png")).unwrap().to_rgb8();
    let samples: Vec<f64> = img.pixels().flat_map(|p| p.0).map(f64::from).collect();
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    assert!((mean - 127.5).abs() < 4.0, "pooled mean {}", mean);
}

#[test]
fn second_run_does_not_overwrite() {
    let base = image_server::start(Routes::new().ok("/photo.jpg", encoded(16, 16, ImageFormat::Jpeg)));
    let work = tempdir().unwrap();
    let out = work.path().join("out");
    let source = write_list(work.path(), &[format!("{}/photo.jpg", base)]);

    pipeline::run(&source, &out, &options()).unwrap();
    let first = std::fs::read(out.join("photo.jpg")).unwrap();
    let report = pipeline::run(&source, &out, &options()).unwrap();

    assert_eq!(report.fetched, 1);
    assert_eq!(file_names(&out), vec!["photo.jpg", "photo_1.jpg"]);
    assert_eq!(std::fs::read(out.join("photo.jpg")).unwrap(), first);
}

#[test]
fn query_string_and_bare_host_names() {
    let base = image_server::start(
        Routes::new()
            .ok("/p/shot.jpg", encoded(10, 10, ImageFormat::Jpeg))
            .ok("/", encoded(10, 10, ImageFormat::Png)),
    );
    let work = tempdir().unwrap();
    let out = work.path().join("out");
    let urls = vec![format!("{}/p/shot.jpg?size=large", base), format!("{}/", base)];

    let report = pipeline::run(&write_list(work.path(), &urls), &out, &options()).unwrap();

    assert_eq!(report.transformed, 2);
    let names = file_names(&out);
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"shot.jpg".to_string()));
    let synthesized = names.iter().find(|n| n.starts_with("image_")).unwrap();
    assert_eq!(format_of(&out.join(synthesized)), Some(ImageFormat::Png));
}

#[test]
fn undecodable_body_counts_as_transform_failure() {
    let base = image_server::start(
        Routes::new()
            .ok("/fake.jpg", b"<html>not an image</html>".to_vec())
            .ok("/real.jpg", encoded(12, 12, ImageFormat::Jpeg)),
    );
    let work = tempdir().unwrap();
    let out = work.path().join("out");
    let urls = vec![format!("{}/fake.jpg", base), format!("{}/real.jpg", base)];

    let report = pipeline::run(&write_list(work.path(), &urls), &out, &options()).unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.transformed, 1);
    assert_eq!(report.transform_failed, 1);
    assert!(!report.is_clean());
}

#[test]
fn manifest_directory_source() {
    let base = image_server::start(
        Routes::new()
            .ok("/shoe.jpg", encoded(24, 24, ImageFormat::Jpeg))
            .ok("/hat.png", encoded(24, 24, ImageFormat::Png))
            .ok("/bag.webp", encoded(24, 24, ImageFormat::WebP)),
    );
    let work = tempdir().unwrap();
    let manifests = work.path().join("manifests");
    std::fs::create_dir(&manifests).unwrap();
    std::fs::write(
        manifests.join("a.yaml"),
        format!(
            "data:\n  - id: 1\n    external_id: SKU-1\n    name: Shoe\n    thumbnail_url: {base}/shoe.jpg\n  - id: 2\n    name: No picture\n  - id: 3\n    thumbnail_url: \"\"\n",
            base = base
        ),
    )
    .unwrap();
    std::fs::write(
        manifests.join("b.json"),
        format!(
            r#"{{"data": [{{"id": 4, "thumbnail_url": "{base}/hat.png"}}, {{"id": 5, "thumbnail_url": "{base}/bag.webp"}}]}}"#,
            base = base
        ),
    )
    .unwrap();
    std::fs::write(manifests.join("broken.yml"), "data: [unterminated").unwrap();
    std::fs::write(manifests.join("README.md"), "ignored").unwrap();
    let out = work.path().join("out");

    let report = pipeline::run(&UrlSource::ManifestDir(manifests), &out, &options()).unwrap();

    assert_eq!(report.submitted, 3);
    assert_eq!(report.fetched, 3);
    assert_eq!(report.transformed, 3);
    assert_eq!(file_names(&out), vec!["bag.jpg", "hat.png", "shoe.jpg"]);
}

#[test]
fn single_worker_pools_still_finish() {
    let mut routes = Routes::new();
    for i in 0..10 {
        routes = routes.ok(&format!("/{}.png", i), encoded(8, 8, ImageFormat::Png));
    }
    let base = image_server::start(routes);
    let work = tempdir().unwrap();
    let out = work.path().join("out");
    let urls: Vec<String> = (0..10).map(|i| format!("{}/{}.png", base, i)).collect();
    let opts = PipelineOptions {
        sizes: PoolSizes {
            fetch_workers: 1,
            transform_workers: 1,
            queue_capacity_per_worker: 1,
        },
        ..PipelineOptions::default()
    };

    let report = pipeline::run(&write_list(work.path(), &urls), &out, &opts).unwrap();

    assert_eq!(report.fetched, 10);
    assert_eq!(report.transformed, 10);
    assert_eq!(file_names(&out).len(), 10);
}

#[test]
fn cut_off_transfer_leaves_no_file() {
    let body = encoded(40, 40, ImageFormat::Png);
    let sent = body[..body.len() / 2].to_vec();
    let base = image_server::start(
        Routes::new()
            .truncated("/cut.png", body.len(), sent)
            .ok("/whole.png", body),
    );
    let work = tempdir().unwrap();
    let out = work.path().join("out");
    let urls = vec![format!("{}/cut.png", base), format!("{}/whole.png", base)];

    let report = pipeline::run(&write_list(work.path(), &urls), &out, &options()).unwrap();

    assert_eq!(report.fetch_failed, 1);
    assert_eq!(report.fetched, 1);
    assert_eq!(file_names(&out), vec!["whole.png"]);
}

#[test]
fn empty_body_is_stored_then_rejected() {
    let base = image_server::start(Routes::new().ok("/blank.jpg", Vec::new()));
    let work = tempdir().unwrap();
    let out = work.path().join("out");

    let report =
        pipeline::run(&write_list(work.path(), &[format!("{}/blank.jpg", base)]), &out, &options()).unwrap();

    assert_eq!(report.fetched, 1);
    assert_eq!(report.fetch_failed, 0);
    assert_eq!(report.transformed, 0);
    assert_eq!(report.transform_failed, 1);
    assert_eq!(file_names(&out), vec!["blank.jpg"]);
    assert_eq!(std::fs::metadata(out.join("blank.jpg")).unwrap().len(), 0);
}
