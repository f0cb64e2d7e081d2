use eframe::egui::{
    Color32, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind, Ui, vec2,
};

use crate::data::model::Sample;

/// Pixel radius within which a pointer position counts as hovering a marker.
pub const PICK_TOLERANCE: f32 = 5.0;

/// Pixel offset of the annotation box from the hovered marker.
const ANNOTATION_OFFSET: f32 = 10.0;

// ---------------------------------------------------------------------------
// Hit testing
// ---------------------------------------------------------------------------

/// Find the plotted point nearest to `pointer`, in screen space, if it lies
/// within `tolerance` pixels. Nearest-by-Euclidean-distance, first index
/// winning exact ties, so the result is deterministic.
pub fn hit_test(screen_points: &[Pos2], pointer: Pos2, tolerance: f32) -> Option<usize> {
    let tolerance_sq = tolerance * tolerance;
    let mut best: Option<(usize, f32)> = None;
    for (i, &p) in screen_points.iter().enumerate() {
        let dist_sq = (p - pointer).length_sq();
        if dist_sq <= tolerance_sq && best.map_or(true, |(_, b)| dist_sq < b) {
            best = Some((i, dist_sq));
        }
    }
    best.map(|(i, _)| i)
}

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

/// Three lines: full timestamp, temperature, signed slope.
pub fn format_annotation(sample: &Sample, slope: f64) -> String {
    format!(
        "{}\nTemp: {:.1}°C\nSlope: {:+.2} °C/h",
        sample.timestamp.format("%Y-%m-%d %H:%M:%S"),
        sample.temperature,
        slope
    )
}

/// Paint the annotation box near `anchor`, clipped to the plot area.
pub fn draw_annotation(ui: &Ui, plot_rect: Rect, anchor: Pos2, text: &str) {
    let painter = ui.painter().with_clip_rect(plot_rect);
    let galley = painter.layout_no_wrap(
        text.to_owned(),
        FontId::proportional(12.0),
        Color32::BLACK,
    );

    let text_pos = anchor + vec2(ANNOTATION_OFFSET, -ANNOTATION_OFFSET - galley.size().y);
    let frame = Rect::from_min_size(text_pos, galley.size()).expand(5.0);

    painter.rect_filled(
        frame,
        CornerRadius::same(4),
        Color32::from_rgba_unmultiplied(255, 255, 255, 230),
    );
    painter.rect_stroke(
        frame,
        CornerRadius::same(4),
        Stroke::new(1.0, Color32::GRAY),
        StrokeKind::Inside,
    );
    painter.galley(text_pos, galley, Color32::BLACK);
}
