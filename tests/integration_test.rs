//! Integration tests for ssss-pdsp
//!
//! These tests write small `.npz` fixtures, then run the summaries and the
//! command line tool on them.

use ndarray::{array, Array2};
use ssss_pdsp::depo::load_depos;
use ssss_pdsp::frame::{load_frame, summarize_files, FrameError};
use ssss_pdsp::logscan::scan_log_file;
use ssss_pdsp::npz::NpzWriter;
use ssss_pdsp::plot::{
    load_frames, make_plots, plane_projections, render_pages, ColorMap, ColorScale, PlotConfig,
    PlotInputs, PlotOptions, WaveformPage, ZoomWindow,
};
use ssss_pdsp::summary::{depo_table, frame_table, sensvol_table};
use ssss_pdsp::table::TableFormat;
use ssss_pdsp::units;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Depos in ns and mm, the third one a secondary
fn write_depos(path: &Path, t_offset: f64, x_offset: f64) {
    let data = array![
        [1000.0 + t_offset, -4000.0, 10.0 + x_offset, 0.0, 0.0, 0.0, 0.0],
        [5000.0 + t_offset, -3500.0, 30.0 + x_offset, 0.0, 0.0, 0.0, 0.0],
        [9e9, -1.0, 9e9, 0.0, 0.0, 0.0, 0.0],
        [2500.0 + t_offset, -3000.0, -20.0 + x_offset, 0.0, 0.0, 0.0, 0.0],
    ];
    let info = array![[0i32, 11, 0, 0], [1, 11, 0, 0], [2, 11, 1, 0], [3, 11, 0, 0]];

    let mut writer = NpzWriter::create(path).unwrap();
    writer.add_array("depo_data_0", &data).unwrap();
    writer.add_array("depo_info_0", &info).unwrap();
    writer.finish().unwrap();
}

/// Frame over `channels` with a unit pulse in every row at tick `pulse`
fn write_frame(path: &Path, channels: &[i32], nticks: usize, pulse: usize, height: f32) {
    let mut samples = Array2::<f32>::zeros((channels.len(), nticks));
    for mut row in samples.rows_mut() {
        row[pulse] = height;
    }
    let channels = ndarray::Array1::from(channels.to_vec());

    let mut writer = NpzWriter::create(path).unwrap();
    writer.add_array("frame_*_0", &samples).unwrap();
    writer.add_array("channels_*_0", &channels).unwrap();
    writer
        .add_array("tickinfo_*_0", &array![-250_000.0f64, 500.0, 0.0])
        .unwrap();
    writer.finish().unwrap();
}

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ssss-pdsp"))
}

fn stdout_of(command: &mut Command) -> String {
    let output = command.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

/// Test depo loading through to the ranges table
#[test]
fn test_depo_summary_pipeline() {
    let dir = tempdir().unwrap();
    let depos = dir.path().join("depos.npz");
    let drift = dir.path().join("drift.npz");
    write_depos(&depos, 0.0, 0.0);
    write_depos(&drift, 1500.0, -5.0);

    let before = load_depos(&depos).unwrap();
    assert_eq!(before.len(), 3);
    let before = before.ranges().unwrap();
    let after = load_depos(&drift).unwrap().ranges().unwrap();
    assert_eq!(before.tmin, 1.0);
    assert_eq!(before.tmax, 5.0);
    assert_eq!(after.tmin, 2.5);
    assert_eq!(after.xmin, -25.0);

    let table = depo_table(&before, &after).unwrap();
    let csv = table.render(TableFormat::Csv).unwrap();
    assert_eq!(
        csv,
        "quantity,min,max,units\n\
         depos t,1.00,5.000,us\n\
         drift t,2.50,6.500,us\n\
         depos x,-20.00,30.00,mm\n\
         drift x,-25.00,25.00,mm"
    );
}

/// Test frame remapping and the frame table
#[test]
fn test_frame_summary_pipeline() {
    let dir = tempdir().unwrap();
    let signal = dir.path().join("signal.npz");
    let splat = dir.path().join("splat.npz");
    write_frame(&signal, &[100, 101, 105], 20, 3, 7.5);
    write_frame(&splat, &[100, 102], 20, 4, -2.0);

    let frame = load_frame(&signal).unwrap();
    assert_eq!(frame.nchannels(), 6);
    assert_eq!(frame.channel_of_row(0), 105);
    assert_eq!(frame.waveform(105).unwrap()[3], 7.5);
    assert_eq!(frame.waveform(103).unwrap().sum(), 0.0);

    let summaries = summarize_files(&[&signal, &splat], units::US).unwrap();
    assert_eq!(summaries[0].name, "signal");
    assert_eq!(summaries[0].start, -250.0);
    assert_eq!(summaries[0].positive, 3);
    assert_eq!(summaries[1].name, "splat");
    assert_eq!(summaries[1].min, -2.0);

    let table = frame_table(&summaries).unwrap();
    for row in table.rows() {
        assert_eq!(row.len(), table.header().len());
    }
    let org = table.to_string();
    assert!(org.contains("| signal | -250.0 | 10       | 3   | 0.0  | 7.5 |"));
}

/// Test that unsorted channel identifiers are rejected on load
#[test]
fn test_unsorted_channels_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.npz");
    write_frame(&path, &[5, 3, 4], 10, 0, 1.0);

    assert!(matches!(
        load_frame(&path),
        Err(FrameError::UnsortedChannels { prev: 5, next: 3 })
    ));
}

/// Test sensitive volume extraction from a log on disk
#[test]
fn test_log_summary_from_file() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("wct.log");
    std::fs::write(
        &log,
        "[12:00:00.000] I [ main ] starting\n\
         [12:00:01.000] D [ anode ] <AnodePlane:0> face:0 with 3 planes and sensvol: \
         [(-3594.1 6.0 0.0) --> (-0.1 6066.0 2302.0)]\n",
    )
    .unwrap();

    let volume = scan_log_file(&log).unwrap().unwrap();
    let table = sensvol_table(&volume).unwrap();
    assert_eq!(table.rows().len(), 2);
    assert_eq!(table.rows()[0].len(), 3);
    assert_eq!(volume.p2, [-0.1, 6066.0, 2302.0]);
}

/// Test the frame-summary subcommand output
#[test]
fn test_cli_frame_summary() {
    let dir = tempdir().unwrap();
    let signal = dir.path().join("signal.npz");
    let adc = dir.path().join("adc.npz");
    write_frame(&signal, &[0, 1], 8, 1, 3.0);
    write_frame(&adc, &[0, 1], 8, 1, 9.0);

    let out = stdout_of(bin().args(["frame-summary", "--format", "csv"]).arg(&signal).arg(&adc));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "frame,start,duration,n>0,min,max");
    assert_eq!(lines[1], "adc,-250.0,4,2,0.0,9.0");
    assert_eq!(lines[2], "signal,-250.0,4,2,0.0,3.0");

    let org = stdout_of(bin().arg("frame-summary").arg(&signal));
    assert!(org.starts_with("#+caption: Frame times in microsecond.\n"));
}

/// Test the log-summary subcommand with and without the marker
#[test]
fn test_cli_log_summary() {
    let dir = tempdir().unwrap();
    let with_marker = dir.path().join("with.log");
    let without_marker = dir.path().join("without.log");
    std::fs::write(
        &with_marker,
        "<AnodePlane:0> face:0 with 3 planes and sensvol: [(1 2 3) --> (4 5 6)]\n",
    )
    .unwrap();
    std::fs::write(&without_marker, "nothing here\n").unwrap();

    let out = stdout_of(bin().arg("log-summary").arg(&with_marker));
    assert!(out.contains("#+name: tab:diagonal-endpoints"));
    assert!(out.contains("| 1.0    | 2.0    | 3.0    |"));

    let out = stdout_of(bin().arg("log-summary").arg(&without_marker));
    assert!(out.is_empty());
}

/// Test that loader errors surface as a failing exit status
#[test]
fn test_cli_errors_exit_nonzero() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("bad.npz");
    write_frame(&bad, &[2, 1], 4, 0, 1.0);

    let output = bin().arg("frame-summary").arg(&bad).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not sorted"));

    let output = bin()
        .args(["plots", "-o", "out.svg", "a.npz", "b.npz", "c.npz", "d.npz"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

fn plot_fixture(dir: &Path) -> PlotInputs {
    let inputs = PlotInputs {
        depos: dir.join("depos.npz"),
        drift: dir.join("drift.npz"),
        splat: dir.join("splat.npz"),
        signal: dir.join("signal.npz"),
    };
    write_depos(&inputs.depos, 0.0, 0.0);
    write_depos(&inputs.drift, 1500.0, -5.0);
    let channels: Vec<i32> = (0..40).collect();
    write_frame(&inputs.splat, &channels, 300, 120, 800.0);
    write_frame(&inputs.signal, &channels, 300, 122, 700.0);
    inputs
}

fn small_config() -> PlotConfig {
    PlotConfig {
        width: 400,
        height: 300,
        zooms: vec![ZoomWindow {
            ticks: [100, 150],
            channels: [10, 30],
            title: "pulse".to_string(),
        }],
        waveforms: vec![WaveformPage {
            label: "pulse".to_string(),
            channels: vec![12, 20],
            ticks: [100, 150],
        }],
        ..PlotConfig::default()
    }
}

/// Axis labels need a system font; without one the drawing tests return early
fn fonts_available() -> bool {
    use plotters::prelude::*;
    let mut buffer = vec![0u8; 32 * 32 * 3];
    let root = BitMapBackend::with_buffer(&mut buffer, (32, 32)).into_drawing_area();
    let drawn = root.draw(&Text::new("0", (0, 0), ("sans-serif", 12)));
    if let Err(err) = &drawn {
        eprintln!("no usable font, skipping plot rendering: {}", err);
    }
    drawn.is_ok()
}

/// Test the loaded, smeared and scaled frames and their plane sums
#[test]
fn test_plot_frames_and_plane_sums() {
    let dir = tempdir().unwrap();
    let inputs = plot_fixture(dir.path());
    let options = PlotOptions {
        channel_ranges: Some(vec![0, 15, 30, 40]),
        smear: 2.0,
        scale: 0.5,
    };
    let (splat, signal) = load_frames(&inputs, &options, &small_config()).unwrap();

    // 800 * 0.5 spread forward from tick 120 only
    let wave = splat.waveform(12).unwrap();
    assert!(wave[119].abs() < 1e-9);
    assert!(wave[120] > wave[121] && wave[121] > wave[122]);
    assert!(wave[120] < 400.0);
    assert!(wave.sum() > 200.0 && wave.sum() < 400.0);

    let planes = plane_projections(&signal, &[0, 15, 30, 40]);
    let sums: Vec<(&str, f64)> = planes.iter().map(|(n, _, v)| (*n, v.sum())).collect();
    assert_eq!(
        sums,
        vec![("U", 15.0 * 700.0), ("V", 15.0 * 700.0), ("W", 10.0 * 700.0)]
    );
    for frame in [&splat, &signal] {
        for (_, channels, values) in plane_projections(frame, &[0, 15, 30, 40]) {
            let expected = frame.channel_range_projection(channels);
            assert_eq!(values, expected);
        }
    }
}

/// Test page rendering and both document formats
#[test]
fn test_plots_pdf_and_png() {
    if !fonts_available() {
        return;
    }
    let dir = tempdir().unwrap();
    let inputs = plot_fixture(dir.path());
    let config = small_config();
    let options = PlotOptions {
        channel_ranges: Some(vec![0, 15, 30, 40]),
        smear: 2.0,
        scale: 0.5,
    };

    let (splat, signal) = load_frames(&inputs, &options, &config).unwrap();
    let pages = render_pages(&splat, &signal, &options, &config).unwrap();
    assert_eq!(pages.len(), 3);
    for page in &pages {
        assert_eq!(page.len(), 400 * 300 * 3);
        assert!(page.iter().any(|&b| b != 255));
    }
    assert_ne!(pages[0], pages[1]);
    assert_ne!(pages[1], pages[2]);

    // the signal pulse shows in the zoom page colour scale
    let scale = ColorScale::new(ColorMap::Spectral, -config.zoom_limit, config.zoom_limit);
    let pulse = scale.color(700.0);
    let has_color = |page: &[u8], c: plotters::style::RGBColor| {
        page.chunks_exact(3).any(|p| p == [c.0, c.1, c.2])
    };
    assert!(has_color(pages[1].as_slice(), pulse));

    // identical inputs leave a zero difference, so the zoom page changes
    let same = render_pages(&signal, &signal, &options, &config).unwrap();
    assert_eq!(same[2].len(), pages[2].len());
    assert_ne!(same[1], pages[1]);

    let pdf: PathBuf = dir.path().join("plots.pdf");
    assert_eq!(make_plots(&inputs, &options, &config, &pdf).unwrap(), 3);
    let bytes = std::fs::read(&pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(bytes.ends_with(b"%%EOF\n"));

    let png = dir.path().join("plots.png");
    assert_eq!(make_plots(&inputs, &options, &config, &png).unwrap(), 3);
    for (n, page) in pages.iter().enumerate() {
        let path = dir.path().join(format!("plots-{}.png", n + 1));
        let image = image::open(&path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (400, 300));
        assert_eq!(&image.into_raw(), page);
    }
}

/// Test the plots subcommand with a layout config file
#[test]
fn test_cli_plots_with_config() {
    if !fonts_available() {
        return;
    }
    let dir = tempdir().unwrap();
    let inputs = plot_fixture(dir.path());
    let config = dir.path().join("plots.toml");
    std::fs::write(
        &config,
        "[plots]\n\
         width = 320\n\
         height = 240\n\
         zooms = []\n\
         [[plots.waveforms]]\n\
         label = \"start\"\n\
         channels = [12]\n\
         ticks = [110, 140]\n",
    )
    .unwrap();
    let output = dir.path().join("cli.png");

    stdout_of(
        bin()
            .args(["plots", "--channel-ranges", "0,15,30,40", "--smear", "2"])
            .arg("--config")
            .arg(&config)
            .arg("-o")
            .arg(&output)
            .args([&inputs.depos, &inputs.drift, &inputs.splat, &inputs.signal]),
    );

    for n in 1..=2 {
        let path = dir.path().join(format!("cli-{}.png", n));
        assert_eq!(image::image_dimensions(&path).unwrap(), (320, 240));
    }
    assert!(!dir.path().join("cli-3.png").exists());
}
