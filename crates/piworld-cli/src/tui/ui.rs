//! TUI rendering.
//!
//! ┌──────────────────────────────────────────────┐
//! │  🍓 Pi World   simulated   sensors #12      │
//! ├──────────────────┬───────────────────────────┤
//! │  LED             │  Sensors                  │
//! │  ┌────────────┐  │  CPU Temperature  52.1°C  │
//! │  │   swatch   │  │  ▓▓▓▓▓▓▓▓▓▓               │
//! │  └────────────┘  │  ...                      │
//! │  Power ON        ├───────────────────────────┤
//! │  Color #ff0000   │  System                   │
//! │  Brightness ▓▓▓  │  Uptime 4h 12m            │
//! │  1 red 2 green…  │  Load 0.52, 0.61, 0.70    │
//! ├──────────────────┴───────────────────────────┤
//! │  status                                      │
//! │  o/f power  +/- brightness  1-9 preset  q    │
//! └──────────────────────────────────────────────┘

use super::app::{App, Status};
use piworld_core::{LedColor, Metric};
use ratatui::{prelude::*, widgets::*};

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(14),   // main
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_main(f, rows[1], app);
    draw_status(f, rows[2], app);
    draw_keys(f, rows[3]);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let dashboard = app.dashboard();
    let snap = dashboard.snapshot();
    let paused = if app.is_paused() { "  PAUSED" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(Line::from(vec![
            Span::styled(" 🍓 Pi World ", Style::default().bold().fg(Color::Magenta)),
            Span::raw("  telemetry: "),
            Span::styled(
                dashboard.source_name().to_string(),
                Style::default().bold().fg(Color::Yellow),
            ),
            Span::styled(
                format!(
                    "  sensors #{}  system #{}",
                    snap.sensor_refreshes, snap.system_refreshes
                ),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(paused, Style::default().bold().fg(Color::Red)),
            Span::raw(" "),
        ]));

    f.render_widget(block, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    draw_led(f, cols[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(5)])
        .split(cols[1]);

    draw_sensors(f, right[0], app);
    draw_system(f, right[1], app);
}

fn rgb(color: LedColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

fn draw_led(f: &mut Frame, area: Rect, app: &App) {
    let dashboard = app.dashboard();
    let led = dashboard.led();
    let preview = dashboard.preview();

    let block = Block::default().borders(Borders::ALL).title(" LED ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // swatch
            Constraint::Length(2), // power + color
            Constraint::Length(1), // brightness
            Constraint::Min(1),    // presets
        ])
        .split(inner);

    // Glowing LEDs get a border in their own color.
    let (r, g, b) = preview.dimmed_rgb();
    let border = if preview.glow {
        Style::default().fg(rgb(led.color))
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let swatch = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(Style::default().bg(Color::Rgb(r, g, b)));
    f.render_widget(swatch, rows[0]);

    let (power, power_style) = if led.on {
        ("ON", Style::default().bold().fg(Color::Green))
    } else {
        ("OFF", Style::default().bold().fg(Color::DarkGray))
    };
    let info = Paragraph::new(vec![
        Line::from(vec![Span::raw(" Power  "), Span::styled(power, power_style)]),
        Line::from(vec![
            Span::raw(" Color  "),
            Span::styled(
                dashboard.picker_color().to_string(),
                Style::default().fg(rgb(dashboard.picker_color())),
            ),
        ]),
    ]);
    f.render_widget(info, rows[1]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Yellow).bg(Color::Black))
        .percent(u16::from(led.brightness.percent()))
        .label(format!("brightness {}", dashboard.brightness_label()));
    f.render_widget(gauge, rows[2]);

    let presets: Vec<Line> = dashboard
        .presets()
        .iter()
        .take(9)
        .enumerate()
        .map(|(i, p)| {
            let marker = if p.color == led.color { "●" } else { " " };
            Line::from(vec![
                Span::styled(format!(" {} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled("■ ", Style::default().fg(rgb(p.color))),
                Span::raw(format!("{:<8}", p.name)),
                Span::styled(marker, Style::default().fg(Color::Yellow)),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(presets).block(Block::default().borders(Borders::TOP).title(" Presets ")),
        rows[3],
    );
}

fn draw_sensors(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Sensors ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(sensors) = app.dashboard().sensors() else {
        f.render_widget(Paragraph::new(" waiting for first reading…"), inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2); 4])
        .split(inner);

    for (metric, row) in Metric::ALL.iter().zip(rows.iter()) {
        let Some(reading) = sensors.get(*metric) else {
            continue;
        };
        let color = match reading.bar_percent {
            p if p >= 80.0 => Color::Red,
            p if p >= 50.0 => Color::Yellow,
            _ => Color::Green,
        };
        let gauge = Gauge::default()
            .block(Block::default().title(format!(" {}", metric.label())))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio((reading.bar_percent / 100.0).clamp(0.0, 1.0))
            .label(reading.text.clone());
        f.render_widget(gauge, *row);
    }
}

fn draw_system(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" System ");
    let lines = match app.dashboard().system_info() {
        Some(info) => vec![
            Line::from(vec![
                Span::raw(" Uptime       "),
                Span::styled(info.uptime.clone(), Style::default().bold()),
            ]),
            Line::from(vec![
                Span::raw(" Load average "),
                Span::styled(info.load_text.clone(), Style::default().bold()),
            ]),
            Line::from(vec![
                Span::raw(" Last updated "),
                Span::styled(info.last_updated.clone(), Style::default().fg(Color::DarkGray)),
            ]),
        ],
        None => vec![Line::from(" —")],
    };
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.status() {
        Some(Status::Info(msg)) => {
            Line::styled(format!(" {msg}"), Style::default().fg(Color::Cyan))
        }
        Some(Status::Error(msg)) => {
            Line::styled(format!(" ✗ {msg}"), Style::default().fg(Color::Red))
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let bar = Paragraph::new(" o/f: on/off   +/-: brightness   1-9: preset   p: pause   q: quit")
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
