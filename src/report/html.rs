use crate::core::model::ProcessingResult;
use crate::core::view::{Detail, Histogram, Plots, ViewModel, fmt_int};
use anyhow::{Context, Result};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Rows rendered into the HTML table; the CSV export always has all of them.
pub const TABLE_ROW_LIMIT: usize = 10_000;

const CHART_W: f64 = 560.0;
const CHART_H: f64 = 320.0;

pub struct ReportContext {
    pub input_bytes: u64,
}

pub struct Chart {
    pub name: &'static str,
    pub title: &'static str,
    pub svg: String,
}

pub fn write(path: &Path, result: &ProcessingResult, ctx: &ReportContext) -> Result<()> {
    let html = render(result, ctx)?;
    let mut w = BufWriter::new(File::create(path).with_context(|| "create report.html failed")?);
    w.write_all(html.as_bytes())?;
    w.flush()?;
    Ok(())
}

pub fn render(result: &ProcessingResult, ctx: &ReportContext) -> Result<String> {
    let view = ViewModel::build(result);
    let mut html = String::with_capacity(64 * 1024);
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\"/>")?;
    writeln!(
        html,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>"
    )?;
    writeln!(
        html,
        "<title>GenesisQC report: {}</title>",
        escape_html(&view.title)
    )?;
    write_style(&mut html)?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;

    writeln!(html, "<h1>GenesisQC</h1>")?;
    writeln!(
        html,
        "<div class=\"meta\">File: <b>{}</b><br/>File size: {:.2} KB<br/>Filtered by ID: {}<br/>Generated: {}</div>",
        escape_html(&view.title),
        ctx.input_bytes as f64 / 1024.0,
        if result.filtered { "yes" } else { "no" },
        fmt_timestamp(ts)
    )?;

    writeln!(html, "<div class=\"cards\">")?;
    for metric in &view.metrics {
        writeln!(
            html,
            "<div class=\"card\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            metric.label,
            escape_html(&metric.value)
        )?;
    }
    writeln!(html, "</div>")?;

    let charts = charts(&view)?;
    for chart in &charts {
        writeln!(html, "<h2>{}</h2>", chart.title)?;
        writeln!(html, "<div class=\"plot\">{}</div>", chart.svg)?;
    }

    if let Some(detail) = &view.detail {
        if let Plots::Skipped { rows, notice } = &detail.plots {
            writeln!(
                html,
                "<div class=\"notice\">{} ({} rows)</div>",
                notice,
                fmt_int(*rows as u64)
            )?;
        }
        write_table(&mut html, detail)?;
    }

    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

/// Every chart the view calls for, in display order.
pub fn charts(view: &ViewModel<'_>) -> Result<Vec<Chart>> {
    let mut out = vec![Chart {
        name: "summary",
        title: "File Summary",
        svg: svg_bars(&view.summary_bars, CHART_W, CHART_H, "Metric", "Value")?,
    }];
    if let Some(Detail {
        plots:
            Plots::Drawn {
                gc_histogram,
                length_vs_gc,
            },
        ..
    }) = &view.detail
    {
        out.push(Chart {
            name: "gc_distribution",
            title: "GC Distribution",
            svg: svg_histogram(gc_histogram, CHART_W, CHART_H, "GC_content", "count")?,
        });
        out.push(Chart {
            name: "length_vs_gc",
            title: "Length vs GC",
            svg: svg_scatter(length_vs_gc, CHART_W, CHART_H, "Length", "GC_content")?,
        });
    }
    Ok(out)
}

fn write_style(html: &mut String) -> Result<()> {
    writeln!(html, "<style>")?;
    writeln!(
        html,
        "body{{font-family:Arial,Helvetica,sans-serif;margin:20px;color:#222;background:#fff;}}"
    )?;
    writeln!(html, "h1{{margin:0 0 8px 0;font-size:24px;}}")?;
    writeln!(html, "h2{{margin:24px 0 8px 0;font-size:20px;}}")?;
    writeln!(
        html,
        ".meta{{color:#555;font-size:13px;margin-bottom:16px;}}"
    )?;
    writeln!(html, ".cards{{display:flex;gap:12px;flex-wrap:wrap;}}")?;
    writeln!(
        html,
        ".card{{border:1px solid #ddd;padding:8px 14px;min-width:140px;}}"
    )?;
    writeln!(html, ".card .label{{color:#666;font-size:12px;}}")?;
    writeln!(html, ".card .value{{font-size:22px;font-weight:bold;}}")?;
    writeln!(html, ".plot{{margin:8px 0 6px 0;}}")?;
    writeln!(
        html,
        ".notice{{color:#d98200;font-weight:bold;margin:12px 0;}}"
    )?;
    writeln!(
        html,
        ".desc{{color:#444;font-size:13px;max-width:1000px;margin:4px 0 10px 0;}}"
    )?;
    writeln!(
        html,
        ".table{{border-collapse:collapse;width:100%;max-width:1000px;font-size:12px;}}"
    )?;
    writeln!(
        html,
        ".table th,.table td{{border:1px solid #ddd;padding:4px 6px;text-align:right;}}"
    )?;
    writeln!(
        html,
        ".table th:first-child,.table td:first-child{{text-align:left;}}"
    )?;
    writeln!(html, "svg{{background:#fafafa;border:1px solid #e5e5e5;}}")?;
    writeln!(html, "</style>")?;
    Ok(())
}

fn write_table(out: &mut String, detail: &Detail<'_>) -> Result<()> {
    writeln!(out, "<h2>Data Table</h2>")?;
    if detail.rows.len() > TABLE_ROW_LIMIT {
        writeln!(
            out,
            "<div class=\"desc\">Showing the first {} of {} rows; the CSV export holds all of them.</div>",
            fmt_int(TABLE_ROW_LIMIT as u64),
            fmt_int(detail.rows.len() as u64)
        )?;
    }
    writeln!(out, "<table class=\"table\">")?;
    write!(out, "<tr><th>ID</th><th>Length</th><th>GC_content</th>")?;
    if detail.has_quality {
        write!(out, "<th>Avg_quality</th>")?;
    }
    writeln!(out, "</tr>")?;
    for row in detail.rows.iter().take(TABLE_ROW_LIMIT) {
        write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{:.4}</td>",
            escape_html(&row.id),
            row.length,
            row.gc_content
        )?;
        if detail.has_quality {
            write!(out, "<td>{:.2}</td>", row.avg_quality.unwrap_or(0.0))?;
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "</table>")?;
    Ok(())
}

struct Frame {
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
}

fn open_svg(out: &mut String, w: f64, h: f64) -> Result<Frame> {
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
        w, h, w, h
    )?;
    let frame = Frame {
        left: 56.0,
        top: 12.0,
        plot_w: w - 56.0 - 20.0,
        plot_h: h - 12.0 - 38.0,
    };
    writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#fff\" stroke=\"#ddd\"/>",
        frame.left, frame.top, frame.plot_w, frame.plot_h
    )?;
    Ok(frame)
}

fn svg_bars(bars: &[(&str, f64)], w: f64, h: f64, x_label: &str, y_label: &str) -> Result<String> {
    let mut out = String::new();
    let f = open_svg(&mut out, w, h)?;
    let max_y = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let max_y = if max_y > 0.0 { max_y * 1.1 } else { 1.0 };
    draw_y_axis_ticks(&mut out, &f, 0.0, max_y, 5)?;
    draw_axis_labels(&mut out, &f, x_label, y_label)?;
    let slot = f.plot_w / bars.len().max(1) as f64;
    for (i, (label, v)) in bars.iter().enumerate() {
        let bar_h = (v / max_y).max(0.0) * f.plot_h;
        let x = f.left + slot * i as f64 + slot * 0.2;
        let y = f.top + f.plot_h - bar_h;
        writeln!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#7db8da\"/>",
            x,
            y,
            slot * 0.6,
            bar_h
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#333\" text-anchor=\"middle\">{}</text>",
            x + slot * 0.3,
            y - 4.0,
            fmt_tick(*v)
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#666\" text-anchor=\"middle\" dominant-baseline=\"hanging\">{}</text>",
            x + slot * 0.3,
            f.top + f.plot_h + 4.0,
            label
        )?;
    }
    writeln!(out, "</svg>")?;
    Ok(out)
}

fn svg_histogram(
    hist: &Histogram,
    w: f64,
    h: f64,
    x_label: &str,
    y_label: &str,
) -> Result<String> {
    let mut out = String::new();
    let f = open_svg(&mut out, w, h)?;
    let max_y = hist.counts.iter().copied().max().unwrap_or(0) as f64;
    let bar_w = f.plot_w / hist.counts.len().max(1) as f64;
    draw_y_axis_ticks(&mut out, &f, 0.0, max_y, 4)?;
    draw_x_axis_ticks(&mut out, &f, hist.min, hist.max(), 5)?;
    draw_axis_labels(&mut out, &f, x_label, y_label)?;
    for (i, &count) in hist.counts.iter().enumerate() {
        let x = f.left + i as f64 * bar_w;
        let y = if max_y == 0.0 {
            0.0
        } else {
            count as f64 / max_y * f.plot_h
        };
        writeln!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#7db8da\" stroke=\"#fff\"><title>{:.3}: {}</title></rect>",
            x,
            f.top + f.plot_h - y,
            bar_w.max(1.0),
            y,
            hist.bin_center(i),
            count
        )?;
    }
    writeln!(out, "</svg>")?;
    Ok(out)
}

fn svg_scatter(points: &[(f64, f64)], w: f64, h: f64, x_label: &str, y_label: &str) -> Result<String> {
    let mut out = String::new();
    let f = open_svg(&mut out, w, h)?;
    let (x_min, x_max) = auto_range(points.iter().map(|p| p.0), 0.0, f64::MAX);
    let (y_min, y_max) = auto_range(points.iter().map(|p| p.1), 0.0, 1.0);
    draw_y_axis_ticks(&mut out, &f, y_min, y_max, 5)?;
    draw_x_axis_ticks(&mut out, &f, x_min, x_max, 5)?;
    draw_axis_labels(&mut out, &f, x_label, y_label)?;
    let x_span = (x_max - x_min).max(1e-9);
    let y_span = (y_max - y_min).max(1e-9);
    for &(xv, yv) in points {
        let x = f.left + (xv - x_min) / x_span * f.plot_w;
        let y = f.top + f.plot_h - (yv - y_min) / y_span * f.plot_h;
        writeln!(
            out,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"2.5\" fill=\"#1f77b4\" fill-opacity=\"0.6\"/>",
            x, y
        )?;
    }
    writeln!(out, "</svg>")?;
    Ok(out)
}

fn draw_y_axis_ticks(out: &mut String, f: &Frame, min_y: f64, max_y: f64, ticks: usize) -> Result<()> {
    if ticks < 2 || (max_y - min_y).abs() < 1e-9 {
        return Ok(());
    }
    let (start, step, count) = nice_ticks(min_y, max_y, ticks);
    for i in 0..count {
        let v = start + step * i as f64;
        if v < min_y - 1e-9 || v > max_y + 1e-9 {
            continue;
        }
        let y = f.top + f.plot_h - ((v - min_y) / (max_y - min_y)) * f.plot_h;
        writeln!(
            out,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#eee\"/>",
            f.left,
            y,
            f.left + f.plot_w,
            y
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#666\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>",
            f.left - 4.0,
            y,
            fmt_tick(v)
        )?;
    }
    Ok(())
}

fn draw_x_axis_ticks(out: &mut String, f: &Frame, min_x: f64, max_x: f64, ticks: usize) -> Result<()> {
    if ticks < 2 || (max_x - min_x).abs() < 1e-9 {
        return Ok(());
    }
    let (start, step, count) = nice_ticks(min_x, max_x, ticks);
    for i in 0..count {
        let v = start + step * i as f64;
        if v < min_x - 1e-9 || v > max_x + 1e-9 {
            continue;
        }
        let x = f.left + ((v - min_x) / (max_x - min_x)) * f.plot_w;
        writeln!(
            out,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#eee\"/>",
            x,
            f.top,
            x,
            f.top + f.plot_h
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#666\" text-anchor=\"middle\" dominant-baseline=\"hanging\">{}</text>",
            x,
            f.top + f.plot_h + 4.0,
            fmt_tick(v)
        )?;
    }
    Ok(())
}

fn draw_axis_labels(out: &mut String, f: &Frame, x_label: &str, y_label: &str) -> Result<()> {
    let x = f.left + f.plot_w / 2.0;
    let y = f.top + f.plot_h + 26.0;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"#444\" text-anchor=\"middle\">{}</text>",
        x, y, x_label
    )?;
    let yx = f.left - 40.0;
    let yy = f.top + f.plot_h / 2.0;
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"#444\" text-anchor=\"middle\" transform=\"rotate(-90 {} {})\">{}</text>",
        yx, yy, yx, yy, y_label
    )?;
    Ok(())
}

fn fmt_tick(v: f64) -> String {
    if (v - v.round()).abs() < 0.001 {
        format!("{}", v.round() as i64)
    } else if v.abs() < 10.0 {
        format!("{:.2}", v)
    } else {
        format!("{:.1}", v)
    }
}

fn fmt_timestamp(ts: u64) -> String {
    let days = (ts / 86_400) as i64;
    let secs = (ts % 86_400) as u32;
    let hour = secs / 3_600;
    let min = (secs % 3_600) / 60;
    let sec = secs % 60;

    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = mp + if mp < 10 { 3 } else { -9 };
    let year = y + if m <= 2 { 1 } else { 0 };

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
        year, m, d, hour, min, sec
    )
}

fn nice_ticks(min: f64, max: f64, ticks: usize) -> (f64, f64, usize) {
    let range = (max - min).abs().max(1e-9);
    let rough = range / (ticks as f64 - 1.0);
    let mag = 10f64.powf(rough.abs().log10().floor());
    let norm = rough / mag;
    let step = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    } * mag;
    let start = (min / step).floor() * step;
    let end = (max / step).ceil() * step;
    let count = ((end - start) / step).round() as usize + 1;
    (start, step, count)
}

fn auto_range<I: Iterator<Item = f64>>(values: I, min_bound: f64, max_bound: f64) -> (f64, f64) {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for v in values {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if !min_v.is_finite() || !max_v.is_finite() {
        return (min_bound, max_bound.min(1.0));
    }
    let span = (max_v - min_v).max(1e-6);
    let pad = span * 0.05;
    let lo = (min_v - pad).max(min_bound);
    let hi = (max_v + pad).min(max_bound);
    if (hi - lo) < 1e-6 {
        (lo, lo + 1.0)
    } else {
        (lo, hi)
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
