use ratatui::style::Color;
use term_color_support::ColorSupport;

/// How many colors the terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    TrueColor,
    Indexed256,
    Basic,
}

/// Maps the 16 ANSI colors onto the Windows Terminal (Campbell) look,
/// so the board reads the same on every platform.
/// Color support is probed once and reused for every lookup.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    depth: Depth,
}

impl Palette {
    /// Probe stdout for color capabilities
    pub fn detect() -> Self {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Palette { depth: Depth::TrueColor }
        } else if support.has_256 {
            Palette { depth: Depth::Indexed256 }
        } else {
            Palette::basic()
        }
    }

    /// Plain ANSI colors, no remapping
    pub fn basic() -> Self {
        Palette { depth: Depth::Basic }
    }

    pub fn resolve(&self, color: Color) -> Color {
        let Some(((r, g, b), idx)) = campbell(color) else {
            // Custom RGB or Indexed colors pass through
            return color;
        };
        match self.depth {
            Depth::TrueColor => Color::Rgb(r, g, b),
            Depth::Indexed256 => Color::Indexed(idx),
            Depth::Basic => color,
        }
    }
}

/// Campbell RGB value and the closest stable 256-color index
fn campbell(color: Color) -> Option<((u8, u8, u8), u8)> {
    let m = match color {
        Color::Black =>         ((12, 12, 12),    232),
        Color::Red =>           ((197, 15, 31),   160),
        Color::Green =>         ((19, 161, 14),   28),
        Color::Yellow =>        ((193, 156, 0),   178),
        Color::Blue =>          ((0, 55, 218),    20),
        Color::Magenta =>       ((136, 23, 152),  90),
        Color::Cyan =>          ((58, 150, 221),  38),
        Color::Gray =>          ((204, 204, 204), 250),
        Color::DarkGray =>      ((118, 118, 118), 243),
        Color::LightRed =>      ((231, 72, 86),   203),
        Color::LightGreen =>    ((22, 198, 12),   46),
        Color::LightYellow =>   ((249, 241, 165), 229),
        Color::LightBlue =>     ((59, 120, 255),  63),
        Color::LightMagenta =>  ((180, 0, 158),   163),
        Color::LightCyan =>     ((97, 214, 214),  116),
        Color::White =>         ((242, 242, 242), 255),
        _ => return None,
    };
    Some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_mapping() {
        let tc = Palette { depth: Depth::TrueColor };
        let ix = Palette { depth: Depth::Indexed256 };
        let basic = Palette::basic();
        assert_eq!(tc.resolve(Color::Red), Color::Rgb(197, 15, 31));
        assert_eq!(ix.resolve(Color::Red), Color::Indexed(160));
        assert_eq!(basic.resolve(Color::Red), Color::Red);
    }

    #[test]
    fn custom_colors_pass_through() {
        let tc = Palette { depth: Depth::TrueColor };
        assert_eq!(tc.resolve(Color::Rgb(1, 2, 3)), Color::Rgb(1, 2, 3));
        assert_eq!(tc.resolve(Color::Reset), Color::Reset);
    }
}
