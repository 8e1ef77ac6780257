mod common;

use common::{list_files, write_file, write_png, Workspace};
use indicatif::ProgressBar;
use squeezr::{minify, ConversionConfig, FormatOverride, OutputFormat, SqueezeError};
use std::fs;

fn run(config: &ConversionConfig) -> squeezr::Result<squeezr::RunSummary> {
    minify(config, &ProgressBar::hidden())
}

#[test]
fn test_mirrors_tree_keeping_formats() {
    let ws = Workspace::with_basic_tree();
    let config = ConversionConfig::new(&ws.input, &ws.output).with_max_concurrency(2);

    let summary = run(&config).unwrap();

    assert!(summary.is_clean());
    assert_eq!(summary.queue.submitted, 2);
    assert_eq!(list_files(&ws.output), vec![".gitignore", "a.png", "sub/b.jpg"]);
    assert_eq!(
        fs::read_to_string(ws.output.join(".gitignore")).unwrap(),
        "*\n!.gitignore"
    );

    let png = image::open(ws.output.join("a.png")).unwrap();
    assert_eq!((png.width(), png.height()), (64, 48));
    assert!(image::open(ws.output.join("sub/b.jpg")).is_ok());
}

#[test]
fn test_format_override_renames_outputs() {
    let ws = Workspace::with_basic_tree();
    let config = ConversionConfig::new(&ws.input, &ws.output)
        .with_format(Some(FormatOverride::from(OutputFormat::WebP)));

    let summary = run(&config).unwrap();

    assert!(summary.is_clean());
    assert_eq!(list_files(&ws.output), vec![".gitignore", "a.webp", "sub/b.webp"]);
    let bytes = fs::read(ws.output.join("a.webp")).unwrap();
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WEBP");
}

#[test]
fn test_jpeg_spelling_is_kept() {
    let ws = Workspace::with_basic_tree();
    let config = ConversionConfig::new(&ws.input, &ws.output)
        .with_format(Some("jpeg".parse().unwrap()));

    run(&config).unwrap();

    assert_eq!(list_files(&ws.output), vec![".gitignore", "a.jpeg", "sub/b.jpeg"]);
}

#[test]
fn test_active_path_limits_scan_and_reset() {
    let ws = Workspace::with_basic_tree();
    write_file(&ws.output.join("a.png"), b"previous run");
    write_file(&ws.output.join("sub/stale.png"), b"stale");

    let config = ConversionConfig::new(&ws.input, &ws.output).with_active_path("sub");
    let summary = run(&config).unwrap();

    assert_eq!(summary.queue.submitted, 1);
    assert_eq!(fs::read(ws.output.join("a.png")).unwrap(), b"previous run");
    assert!(!ws.output.join("sub/stale.png").exists());
    assert!(ws.output.join("sub/b.jpg").exists());
    assert!(ws.output.join(".gitignore").exists());
}

#[test]
fn test_corrupt_file_does_not_stop_siblings() {
    let ws = Workspace::with_basic_tree();
    write_file(&ws.input.join("broken.png"), b"\x89PNG definitely not a png");

    let config = ConversionConfig::new(&ws.input, &ws.output);
    let summary = run(&config).unwrap();

    assert!(!summary.is_clean());
    assert_eq!(summary.failures().len(), 1);
    assert!(summary.failures()[0].source.ends_with("broken.png"));
    assert_eq!(summary.queue.completed, 3);
    assert!(!ws.output.join("broken.png").exists());
    assert!(image::open(ws.output.join("a.png")).is_ok());
    assert!(image::open(ws.output.join("sub/b.jpg")).is_ok());
    assert!(summary.report.source.bytes > 0);
}

#[test]
fn test_second_run_is_identical() {
    let ws = Workspace::with_basic_tree();
    let config = ConversionConfig::new(&ws.input, &ws.output);

    run(&config).unwrap();
    let first_files = list_files(&ws.output);
    let first_png = fs::read(ws.output.join("a.png")).unwrap();
    let first_jpg = fs::read(ws.output.join("sub/b.jpg")).unwrap();

    run(&config).unwrap();

    assert_eq!(list_files(&ws.output), first_files);
    assert_eq!(fs::read(ws.output.join("a.png")).unwrap(), first_png);
    assert_eq!(fs::read(ws.output.join("sub/b.jpg")).unwrap(), first_jpg);
}

#[test]
fn test_empty_source_reports_nothing_to_compare() {
    let ws = Workspace::new();
    let config = ConversionConfig::new(&ws.input, &ws.output);

    let summary = run(&config).unwrap();

    assert_eq!(summary.queue.submitted, 0);
    assert_eq!(summary.report.saved_percent(), None);
    assert_eq!(list_files(&ws.output), vec![".gitignore"]);
}

#[test]
fn test_missing_source_is_filesystem_error() {
    let ws = Workspace::new();
    let config = ConversionConfig::new(ws.dir.path().join("absent"), &ws.output);

    let err = run(&config).unwrap_err();

    assert!(matches!(err, SqueezeError::Filesystem { .. }));
    assert!(!ws.output.exists());
}

#[test]
fn test_target_inside_source_is_accepted_and_not_rescanned() {
    let ws = Workspace::new();
    write_png(&ws.input.join("a.png"));
    let nested_output = ws.input.join("out");

    let config = ConversionConfig::new(&ws.input, &nested_output);
    run(&config).unwrap();
    let summary = run(&config).unwrap();

    assert_eq!(summary.queue.submitted, 1);
    assert_eq!(list_files(&nested_output), vec![".gitignore", "a.png"]);

    let source_bytes = fs::metadata(ws.input.join("a.png")).unwrap().len();
    assert_eq!(summary.report.source.files, 1);
    assert_eq!(summary.report.source.bytes, source_bytes);
}

#[test]
fn test_nested_target_outside_active_path_is_not_rescanned() {
    let ws = Workspace::new();
    write_png(&ws.input.join("sub/a.png"));
    let nested_output = ws.input.join("sub/out");
    write_file(&nested_output.join("old.png"), b"earlier output");

    let config = ConversionConfig::new(&ws.input, &nested_output).with_active_path("sub");
    let summary = run(&config).unwrap();

    assert_eq!(summary.queue.submitted, 1);
    assert!(summary.is_clean());
    assert_eq!(summary.report.source.files, 1);
}

#[test]
fn test_target_equal_to_source_is_rejected() {
    let ws = Workspace::with_basic_tree();
    let config = ConversionConfig::new(&ws.input, &ws.input);

    let err = run(&config).unwrap_err();

    assert!(matches!(err, SqueezeError::InvalidConfig(_)));
    assert!(ws.input.join("a.png").exists());
}

#[test]
fn test_target_resolving_to_source_keeps_sources() {
    let ws = Workspace::with_basic_tree();
    write_file(&ws.input.join("keep.png"), b"keep");
    let config = ConversionConfig::new(&ws.input, ws.input.join("sub").join(".."));

    let err = run(&config).unwrap_err();

    assert!(matches!(err, SqueezeError::InvalidConfig(_)));
    assert_eq!(fs::read(ws.input.join("keep.png")).unwrap(), b"keep");
    assert!(ws.input.join("sub/b.jpg").exists());
}

#[cfg(unix)]
#[test]
fn test_symlinked_target_into_source_is_rejected() {
    let ws = Workspace::with_basic_tree();
    let link = ws.dir.path().join("output-link");
    std::os::unix::fs::symlink(&ws.input, &link).unwrap();

    let err = run(&ConversionConfig::new(&ws.input, &link)).unwrap_err();

    assert!(matches!(err, SqueezeError::InvalidConfig(_)));
    assert!(ws.input.join("a.png").exists());
}
