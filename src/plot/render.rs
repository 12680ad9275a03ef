//! Drawing a [`DecisionPlot`] with `plotters`.
//!
//! Layers, back to front: decision mesh, cluster centers, samples, center
//! indices. A colorbar with one swatch per cluster index sits to the right of
//! the chart.

use super::DecisionPlot;
use crate::error::{Error, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const COLORBAR_WIDTH: u32 = 140;

fn render_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

impl DecisionPlot {
    /// Draw onto `area`, filling it.
    pub fn draw_on<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()> {
        area.fill(&WHITE).map_err(render_err)?;

        let (w, _) = area.dim_in_pixel();
        let split = (w.saturating_sub(COLORBAR_WIDTH)).max(1) as i32;
        let (main, bar) = area.split_horizontally(split);

        self.draw_chart(&main)?;
        self.draw_colorbar(&bar)
    }

    /// Render to an SVG file at the configured size.
    pub fn render_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        let root = SVGBackend::new(path.as_ref(), (self.config.width, self.config.height))
            .into_drawing_area();
        self.draw_on(&root)?;
        root.present().map_err(render_err)
    }

    /// Render to an in-memory SVG document.
    pub fn render_svg_string(&self) -> Result<String> {
        let mut buf = String::new();
        {
            let root = SVGBackend::with_string(&mut buf, (self.config.width, self.config.height))
                .into_drawing_area();
            self.draw_on(&root)?;
            root.present().map_err(render_err)?;
        }
        Ok(buf)
    }

    fn draw_chart<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()> {
        let view = self.view;
        let cfg = &self.config;

        let mut builder = ChartBuilder::on(area);
        builder
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70);
        if let Some(title) = &cfg.title {
            builder.caption(title, ("sans-serif", 36));
        }
        let mut chart = builder
            .build_cartesian_2d(view.x.0..view.x.1, view.y.0..view.y.1)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(self.axis_labels[0].as_str())
            .y_desc(self.axis_labels[1].as_str())
            .draw()
            .map_err(render_err)?;

        let palette = &self.palette;

        chart
            .draw_series(self.grid.cells().map(|(x0, y0, x1, y1, id)| {
                Rectangle::new(
                    [(x0, y0), (x1, y1)],
                    palette.color(id).mix(cfg.background_alpha).filled(),
                )
            }))
            .map_err(render_err)?;

        let centers: Vec<(f64, f64)> = self
            .reduced_centers
            .outer_iter()
            .map(|c| (c[0], c[1]))
            .collect();

        chart
            .draw_series(centers.iter().enumerate().map(|(k, &xy)| {
                Circle::new(xy, cfg.center_marker_size, palette.color(k).filled())
            }))
            .map_err(render_err)?;
        chart
            .draw_series(
                centers
                    .iter()
                    .map(|&xy| Circle::new(xy, cfg.center_marker_size, BLACK.stroke_width(2))),
            )
            .map_err(render_err)?;

        chart
            .draw_series(
                self.reduced_samples
                    .outer_iter()
                    .zip(self.sample_colors.iter())
                    .map(|(p, &ci)| {
                        Circle::new(
                            (p[0], p[1]),
                            cfg.sample_marker_size,
                            palette.color(ci).mix(cfg.sample_alpha).filled(),
                        )
                    }),
            )
            .map_err(render_err)?;

        let font = ("sans-serif", cfg.annotation_font_size)
            .into_font()
            .style(FontStyle::Bold)
            .color(&BLACK);
        chart
            .draw_series(
                self.annotations
                    .iter()
                    .map(|a| Text::new(a.text.clone(), a.at, font.clone())),
            )
            .map_err(render_err)?;

        Ok(())
    }

    /// Vertical strip, index 0 at the bottom.
    fn draw_colorbar<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()> {
        let n = self.palette.len();
        if n == 0 {
            return Ok(());
        }

        let (_, h) = area.dim_in_pixel();
        let top = 40i32;
        let bottom = h as i32 - 60;
        let span = (bottom - top).max(n as i32);
        let cell = span / n as i32;
        let (x0, x1) = (20i32, 50i32);

        area.draw(&Text::new(
            "cluster",
            (x0 - 5, top - 30),
            ("sans-serif", 18).into_font(),
        ))
        .map_err(render_err)?;

        for (i, color) in self.palette.colors().iter().enumerate() {
            let y1 = bottom - cell * i as i32;
            let y0 = y1 - cell;
            area.draw(&Rectangle::new([(x0, y0), (x1, y1)], color.filled()))
                .map_err(render_err)?;
            area.draw(&Text::new(
                i.to_string(),
                (x1 + 10, (y0 + y1) / 2 - 9),
                ("sans-serif", 18).into_font(),
            ))
            .map_err(render_err)?;
        }
        area.draw(&Rectangle::new([(x0, bottom - cell * n as i32), (x1, bottom)], BLACK.stroke_width(1)))
            .map_err(render_err)?;

        Ok(())
    }
}
