use std::hash::Hash;

use eframe::egui::{RichText, Stroke, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Plot};

use crate::color::CategoryColors;
use crate::data::lookup::GeneView;
use crate::data::summary::box_stats;

// ---------------------------------------------------------------------------
// Protein expression vs CNA boxplot
// ---------------------------------------------------------------------------

/// Draw one box per CNA category for `view`, outliers hidden.
pub fn cna_boxplot(
    ui: &mut Ui,
    id: impl Hash,
    view: &GeneView<'_>,
    colors: &CategoryColors,
    title: &str,
    height: f32,
) {
    ui.label(RichText::new(title).strong());

    if !view.has_measurements() {
        ui.label(format!("No measurements for {}", view.gene));
        return;
    }
    let boxes = box_stats(&view.measurements);
    if boxes.is_empty() {
        ui.label(format!("No protein values for {}", view.gene));
        return;
    }

    let labels: Vec<String> = boxes.iter().map(|b| b.category.to_string()).collect();
    let elems: Vec<BoxElem> = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let color = colors.color_for(&b.category);
            BoxElem::new(
                i as f64,
                BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
            )
            .name(format!("CNA {} (n={})", b.category, b.n))
            .fill(color.gamma_multiply(0.6))
            .stroke(Stroke::new(1.5, color))
            .box_width(0.6)
            .whisker_width(0.3)
        })
        .collect();

    Plot::new(id)
        .height(height)
        .x_axis_label("CNA GISTIC Score")
        .y_axis_label("Protein Expression")
        .x_axis_formatter(move |mark, _range| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
                return String::new();
            }
            labels.get(pos as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(elems));
        });
}
