use std::io::Write;

use crossterm::style::{ResetColor, SetForegroundColor};

use crate::error::Result;
use crate::layout::{Elevation, SlotRow};

/// Compute the display width of a string after stripping ANSI escapes.
///
/// Hostnames are free-form, so padding has to account for wide glyphs.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Renderer runtime parameters.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Emit ANSI color codes for asset rows.
    pub color: bool,
    /// Truncation budget for asset labels, in display columns.
    pub max_label_width: usize,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            color: true,
            max_label_width: 40,
        }
    }
}

/// Text renderer writing a composed elevation as one line per U-slot,
/// top-down, with a padded unit-label gutter.
///
/// Asset rows carry the label on the asset's top line and a continuation
/// mark on the lines below it; empty slots render as a blank cell.
pub struct ElevationRenderer {
    settings: RendererSettings,
}

impl ElevationRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn render(&self, writer: &mut impl Write, elevation: &Elevation) -> Result<()> {
        let gutter = elevation
            .labels
            .iter()
            .map(|label| display_width(label))
            .max()
            .unwrap_or(0);

        let mut labels = elevation.labels.iter();
        for row in &elevation.rows {
            match row {
                SlotRow::Empty => {
                    let unit = labels.next().map(String::as_str).unwrap_or("");
                    writeln!(writer, "{:>gutter$} │", unit)?;
                }
                SlotRow::Asset {
                    label, color, span, ..
                } => {
                    for line in 0..*span {
                        let unit = labels.next().map(String::as_str).unwrap_or("");
                        let content = if line == 0 {
                            truncate_to_width(label, self.settings.max_label_width)
                        } else {
                            "▏".to_string()
                        };
                        if self.settings.color {
                            writeln!(
                                writer,
                                "{:>gutter$} │ {}{}{}",
                                unit,
                                SetForegroundColor(color.to_crossterm()),
                                content,
                                ResetColor,
                            )?;
                        } else {
                            writeln!(writer, "{:>gutter$} │ {}", unit, content)?;
                        }
                    }
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Render into a string, mostly for tests and snapshot-style callers.
    pub fn render_to_string(&self, elevation: &Elevation) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(&mut buffer, elevation)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn truncate_to_width(label: &str, max: usize) -> String {
    if display_width(label) <= max {
        return label.to_string();
    }

    let mut out = String::new();
    for ch in label.chars() {
        out.push(ch);
        if display_width(&out) > max.saturating_sub(1) {
            out.pop();
            break;
        }
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Compositor;
    use crate::model::{DisplayColor, EquipmentModel, MountedAsset, Rack, RackId};

    fn sample_elevation() -> Elevation {
        let rack = Rack::new(RackId::new('A', 1), 4);
        let model = EquipmentModel::new("Acme", "X1", 2, DisplayColor::rgb(0x20, 0x60, 0xa0));
        let asset = MountedAsset::new(1, 1, model).with_hostname("db01");
        Compositor::new().compose(&rack, &[asset])
    }

    #[test]
    fn plain_rendering_lays_out_gutter_and_rows() {
        let renderer = ElevationRenderer::new(RendererSettings {
            color: false,
            ..RendererSettings::default()
        });
        let text = renderer.render_to_string(&sample_elevation()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["4U │", "3U │", "2U │ db01", "1U │ ▏"],
        );
    }

    #[test]
    fn colored_rendering_emits_rgb_sequences() {
        let renderer = ElevationRenderer::with_default();
        let text = renderer.render_to_string(&sample_elevation()).unwrap();
        assert!(text.contains("\u{1b}[38;2;32;96;160m"));
        assert!(text.contains("db01"));
    }

    #[test]
    fn line_count_matches_rack_height() {
        let renderer = ElevationRenderer::with_default();
        let text = renderer.render_to_string(&sample_elevation()).unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn long_labels_are_truncated_ansi_aware() {
        assert_eq!(truncate_to_width("rack-controller", 8), "rack-co…");
        assert_eq!(truncate_to_width("db01", 8), "db01");
    }

    #[test]
    fn gutter_width_follows_tallest_unit() {
        let rack = Rack::new(RackId::new('B', 2), 12);
        let elevation = Compositor::new().compose(&rack, &[]);
        let renderer = ElevationRenderer::new(RendererSettings {
            color: false,
            ..RendererSettings::default()
        });
        let text = renderer.render_to_string(&elevation).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "12U │");
        assert_eq!(lines[11], " 1U │");
    }
}
