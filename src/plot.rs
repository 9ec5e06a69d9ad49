//! Character-grid scatter plot.
//!
//! Each series is a run of samples plotted as `(index, value)` points, drawn as
//! a text marker per point (no connecting lines). The y-axis takes explicit
//! bounds and points outside them are clipped; the x-axis spans the longest
//! series.

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

/// One series of samples and how to draw its points.
#[derive(Debug, Clone)]
pub struct Series<'a> {
    pub samples: &'a [f64],
    pub marker: String,
    pub style: Style,
}

impl<'a> Series<'a> {
    pub fn new(samples: &'a [f64], marker: impl Into<String>) -> Self {
        Self {
            samples,
            marker: marker.into(),
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Plot<'a> {
    series: Vec<Series<'a>>,
    y_bounds: (f64, f64),
    axis_style: Style,
}

impl<'a> Plot<'a> {
    pub fn new(series: Vec<Series<'a>>) -> Self {
        let y_bounds = bounds(&series, None).unwrap_or((0.0, 1.0));
        Self {
            series,
            y_bounds,
            axis_style: Style::default(),
        }
    }

    pub fn y_bounds(mut self, lo: f64, hi: f64) -> Self {
        self.y_bounds = (lo.min(hi), lo.max(hi));
        self
    }

    pub fn axis_style(mut self, style: Style) -> Self {
        self.axis_style = style;
        self
    }

    /// Largest sample index across all series.
    fn x_max(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.samples.len().saturating_sub(1))
            .max()
            .unwrap_or(0)
    }
}

/// Min/max over every sample, widened to include `seed` when given.
pub fn bounds(series: &[Series<'_>], seed: Option<(f64, f64)>) -> Option<(f64, f64)> {
    series
        .iter()
        .flat_map(|s| s.samples.iter().copied())
        .fold(seed, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn axis_label(value: f64) -> String {
    format!("{value:.4}")
}

impl Widget for Plot<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (lo, hi) = self.y_bounds;
        let labels = [axis_label(hi), axis_label((lo + hi) / 2.0), axis_label(lo)];
        let label_w = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;

        // y labels + axis column on the left, x axis + x labels at the bottom
        if area.width < label_w + 3 || area.height < 4 {
            return;
        }
        let plot = Rect {
            x: area.x + label_w + 1,
            y: area.y,
            width: area.width - label_w - 1,
            height: area.height - 2,
        };
        let axis_x = plot.x - 1;
        let axis_y = plot.bottom();

        for y in plot.top()..plot.bottom() {
            buf.get_mut(axis_x, y).set_symbol("|").set_style(self.axis_style);
        }
        buf.get_mut(axis_x, axis_y).set_symbol("+").set_style(self.axis_style);
        for x in plot.left()..plot.right() {
            buf.get_mut(x, axis_y).set_symbol("-").set_style(self.axis_style);
        }

        let label_rows = [plot.top(), plot.top() + (plot.height - 1) / 2, plot.bottom() - 1];
        for (label, y) in labels.iter().zip(label_rows) {
            let x = area.x + label_w - label.chars().count() as u16;
            buf.set_string(x, y, label, self.axis_style);
        }

        let x_max = self.x_max();
        let x_label_y = axis_y + 1;
        buf.set_string(plot.x, x_label_y, "0", self.axis_style);
        if x_max > 0 {
            let label = x_max.to_string();
            let w = label.len() as u16;
            if w < plot.width {
                buf.set_string(plot.right() - w, x_label_y, &label, self.axis_style);
            }
        }

        let span = hi - lo;
        let col = |i: usize| -> u16 {
            if x_max == 0 {
                return plot.x;
            }
            let ratio = i as f64 / x_max as f64;
            plot.x + (ratio * f64::from(plot.width - 1)).round() as u16
        };
        let row = |v: f64| -> Option<u16> {
            if !(lo..=hi).contains(&v) {
                return None;
            }
            let ratio = if span > 0.0 { (v - lo) / span } else { 0.5 };
            let from_bottom = (ratio * f64::from(plot.height - 1)).round() as u16;
            Some(plot.bottom() - 1 - from_bottom)
        };

        for series in &self.series {
            for (i, &v) in series.samples.iter().enumerate() {
                let Some(y) = row(v) else { continue };
                let x = col(i);
                let room = (plot.right() - x) as usize;
                buf.set_stringn(x, y, &series.marker, room, series.style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(buf: &Buffer, x: u16, y: u16) -> &str {
        buf.get(x, y).symbol()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| symbol(buf, x, y)).collect()
    }

    #[test]
    fn corners_of_the_range_land_on_plot_corners() {
        let area = Rect::new(0, 0, 20, 7);
        let mut buf = Buffer::empty(area);
        let data = [0.0, 1.0];
        Plot::new(vec![Series::new(&data, "*")])
            .y_bounds(0.0, 1.0)
            .render(area, &mut buf);

        // labels are "1.0000" wide, so the plot starts at column 7
        assert_eq!(symbol(&buf, 7, 4), "*");
        assert_eq!(symbol(&buf, 19, 0), "*");
        assert_eq!(symbol(&buf, 6, 0), "|");
        assert_eq!(symbol(&buf, 6, 5), "+");
        assert_eq!(symbol(&buf, 10, 5), "-");
        assert!(row_text(&buf, 0).starts_with("1.0000|"));
        assert!(row_text(&buf, 4).starts_with("0.0000|"));
        assert!(row_text(&buf, 6).contains('0'));
        assert!(row_text(&buf, 6).ends_with('1'));
    }

    #[test]
    fn out_of_range_points_are_clipped() {
        let area = Rect::new(0, 0, 20, 7);
        let mut buf = Buffer::empty(area);
        let data = [5.0, -5.0];
        Plot::new(vec![Series::new(&data, "#")])
            .y_bounds(0.0, 1.0)
            .render(area, &mut buf);

        for y in 0..area.height {
            assert!(!row_text(&buf, y).contains('#'));
        }
    }

    #[test]
    fn later_series_draw_over_earlier_ones() {
        let area = Rect::new(0, 0, 20, 7);
        let mut buf = Buffer::empty(area);
        let old = [0.5];
        let live = [0.5];
        Plot::new(vec![Series::new(&old, "3"), Series::new(&live, "*")])
            .y_bounds(0.0, 1.0)
            .render(area, &mut buf);

        assert_eq!(symbol(&buf, 7, 2), "*");
    }

    #[test]
    fn wide_markers_are_cut_at_the_right_edge() {
        let area = Rect::new(0, 0, 20, 7);
        let mut buf = Buffer::empty(area);
        let data = [0.0, 0.0];
        Plot::new(vec![Series::new(&data, "12")])
            .y_bounds(0.0, 1.0)
            .render(area, &mut buf);

        assert_eq!(symbol(&buf, 7, 4), "1");
        assert_eq!(symbol(&buf, 8, 4), "2");
        assert_eq!(symbol(&buf, 19, 4), "1");
    }

    #[test]
    fn tiny_area_draws_nothing() {
        let area = Rect::new(0, 0, 5, 2);
        let mut buf = Buffer::empty(area);
        let data = [0.0];
        Plot::new(vec![Series::new(&data, "*")]).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn bounds_include_the_seed() {
        let a = [-1.65, -1.62];
        let b = [-1.9];
        let series = vec![Series::new(&a, "*"), Series::new(&b, ".")];
        assert_eq!(bounds(&series, Some((-1.7, -1.6))), Some((-1.9, -1.6)));
        assert_eq!(bounds(&series, None), Some((-1.9, -1.62)));
        assert_eq!(bounds(&[], None), None);
    }
}
