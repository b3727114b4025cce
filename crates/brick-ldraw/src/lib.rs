#![warn(missing_docs)]

//! LDraw (`.ldr`) export.
//!
//! Converts placed parts from the engine's Y-up millimeter space into
//! LDraw's Y-down LDU space. One type-1 line is written per part:
//!
//! ```text
//! 1 <colour> <x> <y> <z> <a d g b e h c f i> <part>.dat
//! ```
//!
//! Parts whose definition is unknown are skipped and reported rather than
//! failing the export.

mod format;

pub use format::{format_number, ldraw_matrix, ldraw_position, LDU_PER_MM};

use std::collections::BTreeMap;

use brick_catalog::{Catalog, PartDefinition, Palette};
use brick_placement::PlacedPart;

/// Author written when none is configured.
pub const DEFAULT_AUTHOR: &str = "brickforge";

/// Exported text plus the parts that could not be written.
#[derive(Debug, Clone, PartialEq)]
pub struct LdrawExport {
    /// The `.ldr` document.
    pub text: String,
    /// Ids of parts skipped because their definition is unknown.
    pub skipped: Vec<String>,
}

/// LDraw writer bound to a catalog and palette.
#[derive(Debug, Clone)]
pub struct LdrawExporter<'a> {
    catalog: &'a Catalog,
    palette: Palette,
    author: String,
}

impl<'a> LdrawExporter<'a> {
    /// Exporter with the standard palette and default author.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            palette: Palette::standard(),
            author: DEFAULT_AUTHOR.to_string(),
        }
    }

    /// Use a custom palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the author line.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Export parts in list order.
    pub fn export<'p>(&self, parts: impl IntoIterator<Item = &'p PlacedPart>, model_name: &str) -> String {
        self.export_report(parts, model_name).text
    }

    /// Export parts grouped by build step.
    pub fn export_with_steps<'p>(
        &self,
        parts: impl IntoIterator<Item = &'p PlacedPart>,
        model_name: &str,
    ) -> String {
        self.export_with_steps_report(parts, model_name).text
    }

    /// Export parts in list order, reporting skipped parts.
    pub fn export_report<'p>(
        &self,
        parts: impl IntoIterator<Item = &'p PlacedPart>,
        model_name: &str,
    ) -> LdrawExport {
        let (lines, skipped) = self.part_lines(parts);
        let body = lines.into_iter().map(|(_, line)| line).collect();
        LdrawExport {
            text: self.document(model_name, body),
            skipped,
        }
    }

    /// Export parts grouped by ascending step index (missing step = 0),
    /// reporting skipped parts.
    ///
    /// Groups are separated by a `0 STEP` line with a blank line on each
    /// side; nothing precedes the first group.
    pub fn export_with_steps_report<'p>(
        &self,
        parts: impl IntoIterator<Item = &'p PlacedPart>,
        model_name: &str,
    ) -> LdrawExport {
        let (lines, skipped) = self.part_lines(parts);

        let mut steps: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for (step, line) in lines {
            steps.entry(step).or_default().push(line);
        }

        let mut body = Vec::new();
        for (i, group) in steps.into_values().enumerate() {
            if i > 0 {
                body.extend([String::new(), "0 STEP".to_string(), String::new()]);
            }
            body.extend(group);
        }

        LdrawExport {
            text: self.document(model_name, body),
            skipped,
        }
    }

    /// `(step, line)` for every known part, plus ids of unknown ones.
    fn part_lines<'p>(
        &self,
        parts: impl IntoIterator<Item = &'p PlacedPart>,
    ) -> (Vec<(u32, String)>, Vec<String>) {
        let mut lines = Vec::new();
        let mut skipped = Vec::new();
        for part in parts {
            match self.catalog.get(&part.definition_id) {
                Some(def) => lines.push((part.step.unwrap_or(0), self.part_line(def, part))),
                None => {
                    tracing::warn!(
                        part = %part.id,
                        definition = %part.definition_id,
                        "skipping part with unknown definition in LDraw export"
                    );
                    skipped.push(part.id.clone());
                }
            }
        }
        (lines, skipped)
    }

    /// Type-1 line for one part.
    pub fn part_line(&self, def: &PartDefinition, part: &PlacedPart) -> String {
        let position = ldraw_position(&part.position);
        let matrix = ldraw_matrix(&part.rotation);
        let mut fields = Vec::with_capacity(15);
        fields.push("1".to_string());
        fields.push(self.palette.ldraw_code(part.color).to_string());
        fields.extend(position.iter().map(|&v| format_number(v)));
        fields.extend(matrix.iter().map(|&v| format_number(v)));
        fields.push(def.ldraw_file());
        fields.join(" ")
    }

    fn document(&self, model_name: &str, body: Vec<String>) -> String {
        let mut lines = vec![
            format!("0 {model_name}"),
            format!("0 Name: {model_name}.ldr"),
            format!("0 Author: {}", self.author),
            "0 !LDRAW_ORG Unofficial_Model".to_string(),
            String::new(),
        ];
        lines.extend(body);
        lines.push(String::new());
        lines.push("0 NOFILE".to_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brick_math::{Point3, Vec3};
    use std::f64::consts::FRAC_PI_2;

    fn part(id: &str, def: &str, x: f64, y: f64, z: f64) -> PlacedPart {
        PlacedPart::new(id, def, Point3::new(x, y, z))
    }

    fn body(text: &str) -> Vec<&str> {
        text.lines().filter(|l| l.starts_with("1 ")).collect()
    }

    #[test]
    fn test_identity_part_line() {
        let catalog = Catalog::standard();
        let exporter = LdrawExporter::new(&catalog);
        let text = exporter.export([&part("p", "brick_2x4", 0.0, 0.0, 0.0)], "house");
        assert_eq!(body(&text), vec!["1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat"]);
    }

    #[test]
    fn test_y_axis_is_inverted() {
        let catalog = Catalog::standard();
        let exporter = LdrawExporter::new(&catalog);
        let text = exporter.export([&part("p", "brick_2x4", 8.0, 9.6, -4.0)], "house");
        assert_eq!(body(&text), vec!["1 4 20 -24 -10 1 0 0 0 1 0 0 0 1 3001.dat"]);
    }

    #[test]
    fn test_document_layout() {
        let catalog = Catalog::standard();
        let exporter = LdrawExporter::new(&catalog).with_author("Ada");
        let text = exporter.export([&part("p", "plate_1x1", 0.0, 0.0, 0.0)], "tower");
        let expected = [
            "0 tower",
            "0 Name: tower.ldr",
            "0 Author: Ada",
            "0 !LDRAW_ORG Unofficial_Model",
            "",
            "1 4 0 0 0 1 0 0 0 1 0 0 0 1 3024.dat",
            "",
            "0 NOFILE",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_colour_uses_palette_code() {
        let catalog = Catalog::standard();
        let exporter = LdrawExporter::new(&catalog);
        let blue = part("p", "brick_1x1", 0.0, 0.0, 0.0).with_color(1);
        let unknown = part("q", "brick_1x1", 8.0, 0.0, 0.0).with_color(999);
        let text = exporter.export([&blue, &unknown], "m");
        let lines = body(&text);
        assert!(lines[0].starts_with("1 1 "));
        assert!(lines[1].starts_with("1 16 "));
    }

    #[test]
    fn test_custom_palette() {
        let catalog = Catalog::standard();
        let palette = Palette::from_colors(vec![brick_catalog::PaletteColor {
            name: "Sand Green",
            rgb: 0xA0BCAC,
            ldraw_code: 378,
        }]);
        let exporter = LdrawExporter::new(&catalog).with_palette(palette);
        let sand = part("p", "brick_1x1", 0.0, 0.0, 0.0);
        let red = part("q", "brick_1x1", 8.0, 0.0, 0.0).with_color(1);
        let text = exporter.export([&sand, &red], "m");
        let lines = body(&text);
        assert!(lines[0].starts_with("1 378 "));
        assert!(lines[1].starts_with("1 16 "));
    }

    #[test]
    fn test_quarter_turn_matrix() {
        let catalog = Catalog::standard();
        let exporter = LdrawExporter::new(&catalog);
        let turned = part("p", "brick_1x2", 0.0, 0.0, 0.0).with_yaw(FRAC_PI_2);
        let tilted = part("q", "brick_1x2", 0.0, 0.0, 0.0).with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0));
        let text = exporter.export([&turned, &tilted], "m");
        let lines = body(&text);
        assert_eq!(lines[0], "1 4 0 0 0 0 0 -1 0 1 0 1 0 0 3004.dat");
        assert_eq!(lines[1], "1 4 0 0 0 1 0 0 0 0 -1 0 1 0 3004.dat");
    }

    #[test]
    fn test_unknown_parts_are_skipped() {
        let catalog = Catalog::standard();
        let exporter = LdrawExporter::new(&catalog);
        let good = part("a", "brick_1x1", 0.0, 0.0, 0.0);
        let bad = part("b", "brick_9x9", 0.0, 0.0, 0.0);
        let report = exporter.export_report([&good, &bad], "m");
        assert_eq!(report.skipped, vec!["b"]);
        assert_eq!(body(&report.text).len(), 1);
    }

    #[test]
    fn test_steps_are_grouped_in_order() {
        let catalog = Catalog::standard();
        let exporter = LdrawExporter::new(&catalog);
        let mut a = part("a", "brick_1x1", 0.0, 0.0, 0.0);
        a.step = Some(2);
        let b = part("b", "plate_1x1", 8.0, 0.0, 0.0);
        let mut c = part("c", "brick_1x2", 16.0, 0.0, 0.0);
        c.step = Some(1);
        let mut d = part("d", "brick_1x1", 24.0, 0.0, 0.0);
        d.step = Some(2);

        let text = exporter.export_with_steps([&a, &b, &c, &d], "m");
        let after_header: Vec<&str> = text.lines().skip(5).collect();
        assert_eq!(
            after_header,
            vec![
                "1 4 20 0 0 1 0 0 0 1 0 0 0 1 3024.dat",
                "",
                "0 STEP",
                "",
                "1 4 40 0 0 1 0 0 0 1 0 0 0 1 3004.dat",
                "",
                "0 STEP",
                "",
                "1 4 0 0 0 1 0 0 0 1 0 0 0 1 3005.dat",
                "1 4 60 0 0 1 0 0 0 1 0 0 0 1 3005.dat",
                "",
                "0 NOFILE",
            ]
        );
    }

    #[test]
    fn test_single_step_has_no_separator() {
        let catalog = Catalog::standard();
        let exporter = LdrawExporter::new(&catalog);
        let text = exporter.export_with_steps([&part("a", "brick_1x1", 0.0, 0.0, 0.0)], "m");
        assert!(!text.contains("0 STEP"));
        assert_eq!(text, exporter.export([&part("a", "brick_1x1", 0.0, 0.0, 0.0)], "m"));
    }
}
