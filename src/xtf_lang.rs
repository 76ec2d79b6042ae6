// Multi-language support module
// Provides localized UI strings for English and Chinese with an extensible design

#[derive(Clone, Debug)]
pub struct Texts {
    // Menu items
    pub menu_help: &'static str,
    pub menu_new: &'static str,
    pub menu_language: &'static str,
    pub menu_icons: &'static str,
    pub menu_indicator: &'static str,
    pub menu_exit: &'static str,

    // Board title
    pub board_title: &'static str,

    // Caption / status line
    pub status_turn_fmt: &'static str, // "Player \"{}\" turn!"
    pub status_win_fmt: &'static str,  // "Player \"{}\" wins! ..."
    pub status_tie: &'static str,
    pub status_moves_fmt: &'static str, // " Moves: {} "

    // Help modal
    pub help_title: &'static str,
    pub help_controls: &'static str,
    pub help_place: &'static str,
    pub help_move: &'static str,
    pub help_new: &'static str,
    pub help_rule: &'static str,

    // Buttons
    pub btn_close: &'static str,

    // Terminal size messages
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str, // "Minimum size required: {} x {}"
    pub tsmsg_title: &'static str,
}

/// Returns English strings
pub fn english_texts() -> Texts {
    Texts {
        menu_help: "Help",
        menu_new: "New",
        menu_language: "Language",
        menu_icons: "Icons",
        menu_indicator: "Indicator",
        menu_exit: "Exit",

        board_title: "Five in a Row",

        status_turn_fmt: "Player \"{}\" turn!",
        status_win_fmt: "Player \"{}\" wins! Press SPACE to restart",
        status_tie: "Tie! Press SPACE to restart",
        status_moves_fmt: " Moves: {} ",

        help_title: "Help",
        help_controls: " Controls:",
        help_place: "  L-Click | Enter   - place marker",
        help_move: "  Mouse | Arrows    - move cursor",
        help_new: "  Space             - new game",
        help_rule: " Five in a row (any direction) wins.",

        btn_close: " CLOSE ",

        tsmsg_line1: "Terminal layout too small",
        tsmsg_line2: "Minimum size required: {} x {}",
        tsmsg_title: "Resize needed",
    }
}

/// Returns Chinese strings
pub fn chinese_texts() -> Texts {
    Texts {
        menu_help: "帮助",
        menu_new: "新游戏",
        menu_language: "语言",
        menu_icons: "图标",
        menu_indicator: "游标",
        menu_exit: "退出",

        board_title: "五子棋",

        status_turn_fmt: "轮到玩家“{}”！",
        status_win_fmt: "玩家“{}”获胜！按空格键重新开始",
        status_tie: "平局！按空格键重新开始",
        status_moves_fmt: " 步数：{} ",

        help_title: "帮助",
        help_controls: " 操作说明：",
        help_place: "  左键 | 回车       - 落子",
        help_move: "  鼠标 | 方向键     - 移动光标",
        help_new: "  空格             - 新游戏",
        help_rule: " 任意方向连成五子即获胜。",

        btn_close: " 关闭 ",

        tsmsg_line1: "终端屏幕布局过小",
        tsmsg_line2: "最小需要尺寸：{} x {}",
        tsmsg_title: "需要调整大小",
    }
}

/// Main language manager struct
/// Holds the current language code and active strings
#[derive(Debug)]
pub struct Lang {
    pub current_lang: String,
    pub texts: Texts,
}

/// Normalize a language code ("zh-CN" -> "zh"); anything unknown is English
fn normalize(lang_code: &str) -> &'static str {
    if lang_code.to_lowercase().starts_with("zh") {
        "zh"
    } else {
        "en"
    }
}

impl Lang {
    pub fn new(lang_code: &str) -> Self {
        let code = normalize(lang_code);
        Lang {
            current_lang: code.to_string(),
            texts: if code == "zh" { chinese_texts() } else { english_texts() },
        }
    }

    /// Switch to the other supported language, returning its code
    pub fn toggle(&mut self) -> &str {
        let next = if self.current_lang == "zh" { "en" } else { "zh" };
        *self = Lang::new(next);
        &self.current_lang
    }

    /// Substitute `{}` placeholders in order
    pub fn fill(fmt: &str, args: &[&str]) -> String {
        let mut out = fmt.to_string();
        for a in args {
            out = out.replacen("{}", a, 1);
        }
        out
    }
}
