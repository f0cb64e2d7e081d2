use chrono::DateTime;
use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{
    GridInput, GridMark, Line, LineStyle, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Text,
    VLine,
};

use crate::data::model::{Series, timestamp_secs};
use crate::state::AppState;
use crate::ui::hover;

// Fixed axis configuration.
const Y_AXIS_MIN: f64 = 17.0;
const Y_AXIS_MAX: f64 = 33.0;
const Y_TICK_MIN: f64 = 18.0;
const Y_TICK_MAX: f64 = 32.0;
const Y_TICK_STEP: f64 = 0.5;
const X_TICK_STEP_SECS: f64 = 30.0 * 60.0;
const DATE_LABEL_Y: f64 = 18.2;
const MAX_GRID_MARKS: usize = 512;

/// matplotlib's "tab:blue".
const LINE_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

// ---------------------------------------------------------------------------
// Temperature plot (central panel)
// ---------------------------------------------------------------------------

/// Render the temperature chart and run hover inspection against it.
pub fn temperature_plot(ui: &mut Ui, state: &mut AppState) {
    let series = &state.series;
    let Some((tmin, tmax)) = series.time_bounds() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data to display");
        });
        return;
    };
    let (xmin, xmax) = (timestamp_secs(tmin), timestamp_secs(tmax));

    let points: Vec<[f64; 2]> = series
        .samples()
        .iter()
        .map(|s| [timestamp_secs(s.timestamp), s.temperature])
        .collect();

    let response = Plot::new("temperature_plot")
        .y_axis_label("Temperature (°C)")
        .x_grid_spacer(half_hour_grid)
        .y_grid_spacer(half_degree_grid)
        .x_axis_formatter(|mark, _range| format_hhmm(mark.value))
        .label_formatter(|_name, _value| String::new())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            // Both domains are pinned; re-assert them every frame.
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [xmin, Y_AXIS_MIN],
                [xmax, Y_AXIS_MAX],
            ));

            for mark in midnight_marks(series) {
                plot_ui.vline(
                    VLine::new(mark)
                        .color(Color32::RED)
                        .width(2.0)
                        .style(LineStyle::dashed_loose()),
                );
            }

            for (x, label) in day_labels(series) {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(x, DATE_LABEL_Y),
                        RichText::new(label)
                            .size(10.0)
                            .color(Color32::DARK_GRAY)
                            .background_color(Color32::WHITE),
                    )
                    .anchor(Align2::CENTER_BOTTOM),
                );
            }

            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .color(LINE_COLOR)
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points.clone()))
                    .color(LINE_COLOR)
                    .radius(3.0),
            );
        });

    // Hover inspection: nearest marker within the pick tolerance, in screen
    // space. hover_pos() is None once the pointer leaves the plot area.
    let transform = response.transform;
    let hit = response.response.hover_pos().and_then(|pointer| {
        let screen_points: Vec<_> = points
            .iter()
            .map(|p| transform.position_from_point(&PlotPoint::new(p[0], p[1])))
            .collect();
        hover::hit_test(&screen_points, pointer, hover::PICK_TOLERANCE)
    });

    if state.hover.set_hit(hit) {
        ui.ctx().request_repaint();
    }

    if let Some(index) = state.hover.anchor_index {
        let sample = &state.series.samples()[index];
        let text = hover::format_annotation(sample, state.series.slope_at(index));
        let anchor = transform.position_from_point(&PlotPoint::new(
            timestamp_secs(sample.timestamp),
            sample.temperature,
        ));
        hover::draw_annotation(ui, response.response.rect, anchor, &text);
    }
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Epoch seconds → "HH:MM" (24-hour).
fn format_hhmm(secs: f64) -> String {
    DateTime::from_timestamp(secs as i64, 0)
        .map(|t| t.naive_utc().format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Y grid: a tick every half degree from 18 to 32 inclusive.
fn half_degree_grid(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    let mut marks = Vec::new();
    let mut value = Y_TICK_MIN;
    while value <= Y_TICK_MAX + 1e-9 {
        if value >= min && value <= max {
            marks.push(GridMark {
                value,
                step_size: Y_TICK_STEP,
            });
        }
        value += Y_TICK_STEP;
    }
    marks
}

/// X grid: a tick every 30 minutes, aligned to the wall clock.
fn half_hour_grid(input: GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    let mut marks = Vec::new();
    let mut value = (min / X_TICK_STEP_SECS).ceil() * X_TICK_STEP_SECS;
    while value <= max && marks.len() < MAX_GRID_MARKS {
        marks.push(GridMark {
            value,
            step_size: X_TICK_STEP_SECS,
        });
        value += X_TICK_STEP_SECS;
    }
    marks
}

// ---------------------------------------------------------------------------
// Day decorations
// ---------------------------------------------------------------------------

/// X positions of the midnight instants of every day present in the series
/// that fall within the x-domain.
fn midnight_marks(series: &Series) -> Vec<f64> {
    let Some((tmin, tmax)) = series.time_bounds() else {
        return Vec::new();
    };
    let (xmin, xmax) = (timestamp_secs(tmin), timestamp_secs(tmax));

    series
        .days()
        .iter()
        .filter_map(|day| {
            let midnight = timestamp_secs(day.and_hms_opt(0, 0, 0)?);
            (xmin <= midnight && midnight <= xmax).then_some(midnight)
        })
        .collect()
}

/// One centered date label per day, at the midpoint of that day's first and
/// last sample.
fn day_labels(series: &Series) -> Vec<(f64, String)> {
    series
        .days()
        .iter()
        .filter_map(|day| {
            let mut group = series
                .samples()
                .iter()
                .filter(|s| s.timestamp.date() == *day)
                .map(|s| timestamp_secs(s.timestamp));
            let start = group.next()?;
            let end = group.last().unwrap_or(start);
            Some((start + (end - start) / 2.0, day.format("%Y-%m-%d").to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Sample;
    use chrono::{NaiveDate, NaiveDateTime};

    fn sample(s: &str, temp: f64) -> Sample {
        Sample {
            timestamp: NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap(),
            temperature: temp,
        }
    }

    #[test]
    fn one_midnight_mark_for_an_overnight_span() {
        let series = Series::new(vec![
            sample("2024-01-01 23:00", 21.0),
            sample("2024-01-02 00:30", 20.5),
            sample("2024-01-02 02:00", 20.0),
        ]);
        let marks = midnight_marks(&series);
        let expected = timestamp_secs(
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        assert_eq!(marks, vec![expected]);
    }

    #[test]
    fn no_midnight_mark_within_a_single_day() {
        let series = Series::new(vec![
            sample("2024-01-01 10:00", 21.0),
            sample("2024-01-01 12:00", 22.0),
        ]);
        assert!(midnight_marks(&series).is_empty());
    }

    #[test]
    fn day_labels_are_centered_per_day() {
        let series = Series::new(vec![
            sample("2024-01-01 10:00", 21.0),
            sample("2024-01-01 12:00", 22.0),
            sample("2024-01-02 09:00", 20.0),
        ]);
        let labels = day_labels(&series);
        assert_eq!(labels.len(), 2);

        let start = timestamp_secs(sample("2024-01-01 10:00", 0.0).timestamp);
        let end = timestamp_secs(sample("2024-01-01 12:00", 0.0).timestamp);
        assert_eq!(labels[0], (start + (end - start) / 2.0, "2024-01-01".into()));

        let lone = timestamp_secs(sample("2024-01-02 09:00", 0.0).timestamp);
        assert_eq!(labels[1], (lone, "2024-01-02".into()));
    }

    #[test]
    fn half_degree_grid_covers_18_to_32() {
        let marks = half_degree_grid(GridInput {
            bounds: (Y_AXIS_MIN, Y_AXIS_MAX),
            base_step_size: 1.0,
        });
        assert_eq!(marks.len(), 29);
        assert_eq!(marks.first().unwrap().value, 18.0);
        assert_eq!(marks.last().unwrap().value, 32.0);
    }

    #[test]
    fn half_hour_grid_aligns_to_the_clock() {
        let start = timestamp_secs(sample("2024-01-01 10:05", 0.0).timestamp);
        let end = timestamp_secs(sample("2024-01-01 11:35", 0.0).timestamp);
        let marks = half_hour_grid(GridInput {
            bounds: (start, end),
            base_step_size: 1.0,
        });
        let expected: Vec<f64> = ["10:30", "11:00", "11:30"]
            .iter()
            .map(|t| timestamp_secs(sample(&format!("2024-01-01 {t}"), 0.0).timestamp))
            .collect();
        assert_eq!(marks.iter().map(|m| m.value).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn hhmm_formatting_is_24_hour() {
        let t = timestamp_secs(sample("2024-01-01 16:30", 0.0).timestamp);
        assert_eq!(format_hhmm(t), "16:30");
    }
}
