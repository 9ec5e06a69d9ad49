//! Per-series styling for the chart.
//!
//! The palette is the matrix of the eight SGR text attributes with the eight
//! basic foreground and background colours, walked in that order. Pairs whose
//! foreground equals the background are left out so every series is legible.

use ratatui::style::{Color, Modifier, Style};

const ATTRIBUTES: [Modifier; 8] = [
    Modifier::empty(),
    Modifier::BOLD,
    Modifier::DIM,
    Modifier::ITALIC,
    Modifier::UNDERLINED,
    Modifier::SLOW_BLINK,
    Modifier::RAPID_BLINK,
    Modifier::REVERSED,
];

const COLORS: [Color; 8] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::Gray,
];

#[derive(Debug, Clone)]
pub struct Palette {
    styles: Vec<Style>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    pub fn new() -> Self {
        let mut styles =
            Vec::with_capacity(ATTRIBUTES.len() * COLORS.len() * (COLORS.len() - 1));
        for attr in ATTRIBUTES {
            for fg in COLORS {
                for bg in COLORS.into_iter().filter(|&bg| bg != fg) {
                    styles.push(Style::default().fg(fg).bg(bg).add_modifier(attr));
                }
            }
        }
        Self { styles }
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Style for series `index`, wrapping around the palette.
    pub fn style_for(&self, index: usize) -> Style {
        self.styles[index % self.styles.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_skips_invisible_pairs() {
        let p = Palette::new();
        assert_eq!(p.len(), 448);
        assert_eq!(
            p.style_for(0),
            Style::default().fg(Color::Black).bg(Color::Red)
        );
        // fg Red: Black, Green, Yellow, ...
        assert_eq!(
            p.style_for(9),
            Style::default().fg(Color::Red).bg(Color::Yellow)
        );
        assert_eq!(
            p.style_for(56),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        );
        assert!((0..p.len()).all(|i| {
            let s = p.style_for(i);
            s.fg != s.bg
        }));
    }

    #[test]
    fn indices_wrap() {
        let p = Palette::new();
        assert_eq!(p.style_for(3), p.style_for(3 + p.len()));
    }
}
