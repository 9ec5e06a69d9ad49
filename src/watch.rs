//! Live convergence dashboard: chart, stats and usage panels.

use crate::constants::{
    CHART_TITLE, CHART_TITLE_OFFSET, DEFAULT_Y_RANGE, FINISHED_MARKER, LIVE_MARKER, NO_DATA,
    REFRESH_INTERVAL, Y_AXIS_LABEL,
};
use crate::liveness::Liveness;
use crate::plot::{bounds, Plot, Series};
use crate::runs::{RunList, RunStore};
use crate::stats::Summary;
use crate::style::Palette;
use crate::terminal::{self, Tui};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{path::PathBuf, sync::Arc, thread, time::Duration};
use tracing::{info, warn};

/// Panel rectangles, computed once from the terminal size at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    /// Top two thirds, full width.
    pub chart: Rect,
    /// Bottom band, left two thirds.
    pub stats: Rect,
    /// Bottom band, right third.
    pub help: Rect,
}

impl DashboardLayout {
    pub fn compute(area: Rect) -> Self {
        let chart_h = (u32::from(area.height) * 2).div_ceil(3) as u16;
        let band_h = area.height / 3;
        let stats_w = (u32::from(area.width) * 2).div_ceil(3) as u16;
        let help_w = area.width / 3;
        let band_y = area.y + chart_h;

        Self {
            chart: Rect::new(area.x, area.y, area.width, chart_h),
            stats: Rect::new(area.x, band_y, stats_w, band_h),
            help: Rect::new(area.x + stats_w, band_y, help_w, band_h),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Label finished runs with their index instead of a plain dot.
    pub numerical_markers: bool,
    /// Give every series its own palette style.
    pub color: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            numerical_markers: true,
            color: false,
        }
    }
}

/// The renderer. Reads run list snapshots, never writes them.
pub struct Dashboard {
    store: Arc<RunStore>,
    source: PathBuf,
    options: DisplayOptions,
    palette: Palette,
    alive: Liveness,
    interval: Duration,
}

impl Dashboard {
    pub fn new(store: Arc<RunStore>, source: impl Into<PathBuf>, options: DisplayOptions) -> Self {
        Self {
            store,
            source: source.into(),
            options,
            palette: Palette::new(),
            alive: Liveness::new(),
            interval: REFRESH_INTERVAL,
        }
    }

    pub fn liveness(&self) -> Liveness {
        self.alive.clone()
    }

    pub fn options(&self) -> DisplayOptions {
        self.options
    }

    /// `q` or Ctrl-C quits, `n` toggles numerical markers. Raw mode delivers
    /// Ctrl-C as a key rather than a signal.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.alive.stop();
            }
            KeyCode::Char('q') => self.alive.stop(),
            KeyCode::Char('n') => {
                self.options.numerical_markers = !self.options.numerical_markers;
            }
            _ => {}
        }
    }

    /// Marker for run `index` out of `run_count`; the last run is live.
    pub fn marker_for(&self, index: usize, run_count: usize) -> String {
        if index + 1 == run_count {
            LIVE_MARKER.to_string()
        } else if self.options.numerical_markers {
            index.to_string()
        } else {
            FINISHED_MARKER.to_string()
        }
    }

    pub fn draw(&self, frame: &mut Frame, layout: &DashboardLayout) {
        // layout is fixed at startup; never draw outside the current frame
        let screen = frame.size();
        let chart = layout.chart.intersection(screen);
        let stats = layout.stats.intersection(screen);
        let help = layout.help.intersection(screen);

        let runs = self.store.snapshot();
        self.draw_chart(frame, chart, runs.as_deref());
        self.draw_stats(frame, stats, runs.as_deref());
        self.draw_help(frame, help);
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect, runs: Option<&RunList>) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let buf = frame.buffer_mut();
        let title_x = area.x + CHART_TITLE_OFFSET.min(area.width.saturating_sub(1));
        let room = area.right().saturating_sub(title_x + 1) as usize;
        buf.set_stringn(title_x, area.y, CHART_TITLE, room, Style::default());

        let label_len = Y_AXIS_LABEL.chars().count() as u16;
        let label_y = area.y + area.height.saturating_sub(label_len) / 2;
        for (i, c) in Y_AXIS_LABEL.chars().enumerate() {
            let y = label_y + i as u16;
            if y + 1 < area.bottom() && y > area.y {
                buf.get_mut(area.x, y).set_char(c);
            }
        }

        let Some(runs) = runs else { return };
        let count = runs.len();
        let series: Vec<Series<'_>> = runs
            .runs()
            .enumerate()
            .filter(|(_, run)| !run.is_empty())
            .map(|(i, run)| {
                let series = Series::new(run.samples(), self.marker_for(i, count));
                if self.options.color {
                    series.style(self.palette.style_for(i))
                } else {
                    series
                }
            })
            .collect();

        let (lo, hi) = bounds(&series, Some(DEFAULT_Y_RANGE)).unwrap_or(DEFAULT_Y_RANGE);
        let plot = Plot::new(series)
            .y_bounds(lo, hi)
            .axis_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(plot, inner);
    }

    fn draw_stats(&self, frame: &mut Frame, area: Rect, runs: Option<&RunList>) {
        let lines: Vec<Line> = match runs.and_then(Summary::from_runs) {
            Some(summary) => summary.lines().into_iter().map(Line::from).collect(),
            None => vec![Line::from(NO_DATA)],
        };
        let block = Block::default().borders(Borders::ALL).title("stats");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let markers = if self.options.numerical_markers {
            "on"
        } else {
            "off"
        };
        let lines = vec![
            Line::from(format!("Toggle numerical markers: n ({markers})")),
            Line::from("Quit: q"),
            Line::from(""),
            Line::from("Watching:"),
            Line::from(self.source.display().to_string()),
        ];
        let block = Block::default().borders(Borders::ALL).title("usage");
        let help = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(help, area);
    }

    /// Own the terminal until stopped, then hand it back.
    pub fn run(mut self) -> Result<()> {
        terminal::install_panic_hook();
        let mut tui = terminal::init().context("initialize terminal")?;
        info!("dashboard started");

        let result = self.event_loop(&mut tui);

        terminal::restore().context("restore terminal")?;
        info!("dashboard stopped");
        result
    }

    fn event_loop(&mut self, tui: &mut Tui) -> Result<()> {
        self.drive(tui, poll_key)
    }

    /// Read keys from `next_key` and redraw until stopped.
    pub fn drive<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut next_key: impl FnMut() -> Option<KeyEvent>,
    ) -> Result<()> {
        let layout = DashboardLayout::compute(terminal.size().context("query terminal size")?);
        terminal.clear()?;

        while self.alive.is_alive() {
            self.tick(terminal, &layout, next_key());
            if !self.alive.is_alive() {
                break;
            }
            thread::sleep(self.interval);
        }
        Ok(())
    }

    /// One iteration: apply at most one key, then redraw.
    pub fn tick<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        layout: &DashboardLayout,
        key: Option<KeyEvent>,
    ) {
        if let Some(key) = key {
            self.handle_key(key);
        }
        if let Err(e) = terminal.draw(|f| self.draw(f, layout)) {
            warn!(error = %e, "redraw failed");
        }
    }
}

/// Non-blocking read of a single key from the terminal.
fn poll_key() -> Option<KeyEvent> {
    match event::poll(Duration::ZERO) {
        Ok(true) => match event::read() {
            Ok(Event::Key(key)) => Some(key),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "reading terminal input failed");
                None
            }
        },
        Ok(false) => None,
        Err(e) => {
            warn!(error = %e, "polling terminal input failed");
            None
        }
    }
}
