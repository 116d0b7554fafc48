//! Drawing of the individual comparison pages into RGB buffers.

use std::ops::Range;

use ndarray::{Array1, Array2, ArrayView2};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::colormap::{ColorMap, ColorScale};
use super::config::{WaveformPage, ZoomWindow};
use super::PlotError;
use crate::frame::Frame;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const PLANE_NAMES: [&str; 3] = ["U", "V", "W"];

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const FONT: &str = "sans-serif";

/// Render one page into a fresh RGB8 buffer
pub fn render_page<F>(width: u32, height: u32, draw: F) -> Result<Vec<u8>, PlotError>
where
    F: FnOnce(&Area<'_>) -> Result<(), PlotError>,
{
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(buffer)
}

/// Labelled channel ranges from consecutive boundaries, at most three planes
pub fn plane_ranges(boundaries: &[i64]) -> Vec<(&'static str, Range<i64>)> {
    PLANE_NAMES
        .iter()
        .zip(boundaries.windows(2))
        .map(|(&name, pair)| (name, pair[0]..pair[1]))
        .collect()
}

/// Time projection of each plane between consecutive channel boundaries
pub fn plane_projections(
    frame: &Frame,
    boundaries: &[i64],
) -> Vec<(&'static str, Range<i64>, Array1<f64>)> {
    plane_ranges(boundaries)
        .into_iter()
        .map(|(name, channels)| {
            let values = frame.channel_range_projection(channels.clone());
            log::info!(
                "plane {}: channels {}..{} sum {}",
                name,
                channels.start,
                channels.end,
                values.sum()
            );
            (name, channels, values)
        })
        .collect()
}

/// Padded span of the finite values, `0..1` when there are none
pub fn value_range<I>(values: I) -> Range<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    let pad = if hi > lo { 0.05 * (hi - lo) } else { 1.0 };
    (lo - pad)..(hi + pad)
}

/// Stretch `values` over the whole area, row 0 at the top
fn draw_heatmap(
    area: &Area<'_>,
    values: ArrayView2<'_, f64>,
    scale: &ColorScale,
) -> Result<(), PlotError> {
    let (width, height) = area.dim_in_pixel();
    let (rows, cols) = values.dim();
    if rows == 0 || cols == 0 {
        return Ok(());
    }
    for py in 0..height {
        let row = py as usize * rows / height as usize;
        for px in 0..width {
            let col = px as usize * cols / width as usize;
            area.draw_pixel((px as i32, py as i32), &scale.color(values[[row, col]]))?;
        }
    }
    Ok(())
}

fn draw_colorbar(area: &Area<'_>, scale: &ColorScale) -> Result<(), PlotError> {
    const STEPS: usize = 256;
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .right_y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, scale.vmin..scale.vmax)?;

    let span = scale.vmax - scale.vmin;
    let ramp = Array2::from_shape_fn((STEPS, 1), |(r, _)| {
        scale.vmax - (r as f64 + 0.5) / STEPS as f64 * span
    });
    draw_heatmap(&chart.plotting_area().strip_coord_spec(), ramp.view(), scale)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .label_style((FONT, 14))
        .draw()?;
    Ok(())
}

/// Full frame image with its projections; returns the image colour scale
fn draw_frame_panel(
    area: &Area<'_>,
    frame: &Frame,
    boundaries: Option<&[i64]>,
    vmax: f64,
) -> Result<ColorScale, PlotError> {
    let extent = frame.extent();
    let tf = extent.t0 + frame.nticks() as f64 * frame.tick();

    let vmin = frame.samples().iter().copied().fold(f64::INFINITY, f64::min);
    let vmax = if vmax > vmin { vmax } else { vmin + 1.0 };
    let scale = ColorScale::new(ColorMap::Viridis, vmin, vmax);

    let (width, height) = area.dim_in_pixel();
    let (top, bottom) = area.split_vertically(height * 5 / 6);
    let (image_area, channel_area) = top.split_horizontally(width * 6 / 7);
    let (time_area, _) = bottom.split_horizontally(width * 6 / 7);

    let planes = boundaries.map(plane_ranges).unwrap_or_default();

    // image
    let mut frame_chart = ChartBuilder::on(&image_area)
        .margin(5)
        .y_label_area_size(60)
        .build_cartesian_2d(extent.t0..extent.t1, extent.c0..extent.c1)?;
    draw_heatmap(
        &frame_chart.plotting_area().strip_coord_spec(),
        frame.samples().view(),
        &scale,
    )?;
    frame_chart
        .configure_mesh()
        .disable_mesh()
        .y_desc("channel")
        .label_style((FONT, 14))
        .draw()?;

    for (i, (name, channels)) in planes.iter().enumerate() {
        let color = PALETTE[(i + 1) % PALETTE.len()];
        let c1 = channels.start as f64;
        let c2 = channels.end as f64;
        frame_chart.draw_series(std::iter::once(PathElement::new(
            vec![(extent.t0, c1), (tf, c1)],
            color,
        )))?;
        frame_chart.draw_series(std::iter::once(Text::new(
            name.to_string(),
            (extent.t0 + 0.1 * (tf - extent.t0), c1 + 0.5 * (c2 - c1)),
            (FONT, 20).into_font().color(&WHITE),
        )))?;
    }
    if let Some((_, last)) = planes.last() {
        let c = (last.end - 1) as f64;
        frame_chart.draw_series(std::iter::once(PathElement::new(
            vec![(extent.t0, c), (tf, c)],
            PALETTE[planes.len() % PALETTE.len()],
        )))?;
    }

    // time projection, total and per plane
    let times = extent.time_edges(frame.nticks());
    let total = frame.time_projection();
    let per_plane = boundaries
        .map(|b| plane_projections(frame, b))
        .unwrap_or_default();

    let yrange = value_range(
        total
            .iter()
            .chain(per_plane.iter().flat_map(|(_, _, v)| v.iter()))
            .copied(),
    );
    let mut tchart = ChartBuilder::on(&time_area)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(extent.t0..extent.t1, yrange)?;
    tchart
        .configure_mesh()
        .disable_mesh()
        .x_desc("time [us]")
        .label_style((FONT, 12))
        .draw()?;
    tchart.draw_series(LineSeries::new(
        times.iter().copied().zip(total.iter().copied()),
        &PALETTE[0],
    ))?;
    for (i, (name, _, values)) in per_plane.iter().enumerate() {
        let color = PALETTE[(i + 1) % PALETTE.len()];
        tchart
            .draw_series(LineSeries::new(
                times.iter().copied().zip(values.iter().copied()),
                &color,
            ))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }
    if !per_plane.is_empty() {
        tchart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 12))
            .draw()?;
    }

    // channel projection
    let sums = frame.channel_projection();
    let xrange = value_range(sums.iter().copied());
    let mut cchart = ChartBuilder::on(&channel_area)
        .margin(5)
        .build_cartesian_2d(xrange, extent.c0..extent.c1)?;
    cchart.configure_mesh().disable_mesh().draw()?;
    cchart.draw_series(LineSeries::new(
        sums.iter()
            .enumerate()
            .map(|(row, &v)| (v, frame.channel_of_row(row) as f64)),
        &PALETTE[0],
    ))?;

    Ok(scale)
}

/// Splat above signal, each with projections, and a shared colour bar
pub fn overview_page(
    root: &Area<'_>,
    splat: &Frame,
    signal: &Frame,
    boundaries: Option<&[i64]>,
    vmax: f64,
) -> Result<(), PlotError> {
    let (width, _) = root.dim_in_pixel();
    let (left, bar) = root.split_horizontally(width * 7 / 8);
    let halves = left.split_evenly((2, 1));

    draw_frame_panel(&halves[0], splat, boundaries, vmax)?;
    let scale = draw_frame_panel(&halves[1], signal, boundaries, vmax)?;
    draw_colorbar(&bar, &scale)
}

/// Splat, signal and their difference over one window
pub fn zoom_page(
    root: &Area<'_>,
    splat: &Frame,
    signal: &Frame,
    zoom: &ZoomWindow,
    limit: f64,
) -> Result<(), PlotError> {
    let area = root.titled(&zoom.title, (FONT, 24))?;
    let (width, _) = area.dim_in_pixel();
    let (left, bar) = area.split_horizontally(width * 85 / 100);
    let panels = left.split_evenly((3, 1));

    let channels = zoom.channels[0]..zoom.channels[1];
    let ticks = zoom.ticks[0]..zoom.ticks[1];
    let a = splat.window(channels.clone(), ticks.clone());
    let b = signal.window(channels.clone(), ticks.clone());
    let diff = &a - &b;

    let tick = splat.tick();
    let xrange = (ticks.start as f64 * tick)..(ticks.end as f64 * tick);
    let yrange = (channels.start as f64)..(channels.end as f64);
    let scale = ColorScale::new(ColorMap::Spectral, -limit, limit);

    for (i, (panel, values)) in panels.iter().zip([&a, &b, &diff]).enumerate() {
        let last = i == 2;
        let mut chart = ChartBuilder::on(panel)
            .margin(5)
            .x_label_area_size(if last { 35 } else { 0 })
            .y_label_area_size(60)
            .build_cartesian_2d(xrange.clone(), yrange.clone())?;
        draw_heatmap(
            &chart.plotting_area().strip_coord_spec(),
            values.view(),
            &scale,
        )?;
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh().label_style((FONT, 14));
        if last {
            mesh.x_desc("time [us]");
        }
        mesh.draw()?;
    }

    draw_colorbar(&bar, &scale)
}

/// Overlaid splat and signal waveforms of a few channels
pub fn waveform_page(
    root: &Area<'_>,
    splat: &Frame,
    signal: &Frame,
    page: &WaveformPage,
    title: &str,
) -> Result<(), PlotError> {
    let ticks = page.ticks[0]..page.ticks[1];
    let cut = |frame: &Frame, channel: i64| -> Vec<(f64, f64)> {
        let wave = frame.waveform(channel);
        if wave.is_none() {
            log::warn!("channel {} is outside the frame, drawing zeros", channel);
        }
        ticks
            .clone()
            .map(|t| {
                let v = wave.as_ref().and_then(|w| w.get(t).copied()).unwrap_or(0.0);
                (t as f64, v)
            })
            .collect()
    };

    let lines: Vec<(i64, Vec<(f64, f64)>, Vec<(f64, f64)>)> = page
        .channels
        .iter()
        .map(|&c| (c, cut(splat, c), cut(signal, c)))
        .collect();

    let yrange = value_range(
        lines
            .iter()
            .flat_map(|(_, a, b)| a.iter().chain(b.iter()).map(|&(_, v)| v)),
    );
    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(ticks.start as f64..ticks.end as f64, yrange)?;
    chart
        .configure_mesh()
        .x_desc("ticks")
        .label_style((FONT, 14))
        .draw()?;

    for (i, (channel, a, b)) in lines.into_iter().enumerate() {
        let splat_color = PALETTE[(2 * i) % PALETTE.len()];
        let signal_color = PALETTE[(2 * i + 1) % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(a, &splat_color))?
            .label(format!("ch{}", channel))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], splat_color));
        chart.draw_series(LineSeries::new(b, &signal_color))?;
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, 14))
        .draw()?;
    Ok(())
}
