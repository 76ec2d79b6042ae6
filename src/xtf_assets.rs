// Board glyphs: the terminal stand-ins for the board and marker images
// Built once at startup; an unusable glyph aborts the program

use derive_more::{Display, Error};
use ratatui::style::Color;
use unicode_width::UnicodeWidthStr;

use crate::xtf_color::Palette;
use crate::xtf_config::Config;
use crate::xtf_game::Player;

/// A glyph from the config could not be used
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("unusable glyph for {}: {:?} ({})", slot, glyph, reason)]
pub struct AssetError {
    pub slot: &'static str,
    pub glyph: String,
    pub reason: &'static str,
}

/// A printable symbol with its foreground color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub symbol: String,
    pub fg: Color,
}

/// Everything needed to paint the board
#[derive(Debug, Clone)]
pub struct Glyphs {
    pub board: Glyph,    // Empty cell
    pub marker_x: Glyph,
    pub marker_o: Glyph,
    pub board_bg: Color,
    pub win_bg: Color,   // Background of the winning line
    pub cursor_bg: Color,
}

impl Glyphs {
    /// Build the glyph set from config, validating any user overrides
    pub fn load(cfg: &Config, palette: &Palette) -> Result<Glyphs, AssetError> {
        let (board, x, o) = if cfg.ascii_icons {
            (".", "X", "O")
        } else {
            ("⋅", "✕", "◦")
        };
        let x = cfg.glyph_x.as_deref().unwrap_or(x);
        let o = cfg.glyph_o.as_deref().unwrap_or(o);
        Ok(Glyphs {
            board: Glyph { symbol: board.to_string(), fg: palette.resolve(Color::Gray) },
            marker_x: Glyph { symbol: check_glyph("X", x)?, fg: palette.resolve(Color::LightRed) },
            marker_o: Glyph { symbol: check_glyph("O", o)?, fg: palette.resolve(Color::LightCyan) },
            board_bg: palette.resolve(Color::Black),
            win_bg: palette.resolve(Color::Red),
            cursor_bg: palette.resolve(Color::Blue),
        })
    }

    pub fn marker(&self, p: Player) -> &Glyph {
        match p {
            Player::X => &self.marker_x,
            Player::O => &self.marker_o,
        }
    }
}

/// A cell is two columns wide, so a glyph may take one or two columns.
/// Ambiguous-width symbols are refused: CJK terminals draw them wider.
fn check_glyph(slot: &'static str, glyph: &str) -> Result<String, AssetError> {
    let fail = |reason| AssetError { slot, glyph: glyph.to_string(), reason };
    if glyph.is_empty() {
        return Err(fail("empty"));
    }
    if glyph.chars().any(char::is_control) {
        return Err(fail("contains control characters"));
    }
    let w = glyph.width();
    if w == 0 || w > 2 {
        return Err(fail("must be 1 or 2 columns wide"));
    }
    if w != glyph.width_cjk() {
        return Err(fail("ambiguous width"));
    }
    Ok(glyph.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> Config {
        Config { language: "en".to_string(), ..Config::default() }
    }

    #[test]
    fn defaults_load() {
        let g = Glyphs::load(&cfg(), &Palette::basic()).unwrap();
        assert_eq!(g.marker(Player::X).symbol, "✕");
        assert_eq!(g.marker(Player::O).symbol, "◦");
    }

    #[test]
    fn defaults_have_fixed_width() {
        for ascii in [false, true] {
            let c = Config { ascii_icons: ascii, ..cfg() };
            let g = Glyphs::load(&c, &Palette::basic()).unwrap();
            for glyph in [&g.board, &g.marker_x, &g.marker_o] {
                assert_eq!(glyph.symbol.width(), 1);
                assert_eq!(glyph.symbol.width_cjk(), 1);
            }
        }
    }

    #[test]
    fn ambiguous_width_refused() {
        let mut c = cfg();
        c.glyph_o = Some("◯".to_string());
        let err = Glyphs::load(&c, &Palette::basic()).unwrap_err();
        assert_eq!(err.reason, "ambiguous width");
    }

    #[test]
    fn ascii_icons() {
        let mut c = cfg();
        c.ascii_icons = true;
        let g = Glyphs::load(&c, &Palette::basic()).unwrap();
        assert_eq!(g.marker_x.symbol, "X");
        assert_eq!(g.board.symbol, ".");
    }

    #[test]
    fn override_accepted() {
        let mut c = cfg();
        c.glyph_o = Some("@".to_string());
        c.glyph_x = Some("黑".to_string());
        let g = Glyphs::load(&c, &Palette::basic()).unwrap();
        assert_eq!(g.marker_o.symbol, "@");
        assert_eq!(g.marker_x.symbol, "黑");
    }

    #[test]
    fn bad_overrides_fail() {
        let mut c = cfg();
        c.glyph_x = Some(String::new());
        let err = Glyphs::load(&c, &Palette::basic()).unwrap_err();
        assert_eq!(err.slot, "X");

        c.glyph_x = None;
        c.glyph_o = Some("ooo".to_string());
        let err = Glyphs::load(&c, &Palette::basic()).unwrap_err();
        assert_eq!(err.slot, "O");
        assert!(err.to_string().contains("columns wide"));

        c.glyph_o = Some("\t".to_string());
        assert!(Glyphs::load(&c, &Palette::basic()).is_err());
    }
}
