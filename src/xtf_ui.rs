use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, SetTitle};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

use crate::xtf_assets::Glyphs;
use crate::xtf_color::Palette;
use crate::xtf_config::{save_config, Config};
use crate::xtf_game::{Cell, Coord, Game, WinLines};
use crate::xtf_lang::{Lang, Texts};
use crate::xtf_session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Help,
    New,
    Language,
    Icons,
    Indicator,
    Exit,
}

/// Menu row entries as (key label, text, action)
fn menu_items(t: &Texts) -> [(&'static str, &'static str, MenuAction); 5] {
    [
        ("F1", t.menu_help, MenuAction::Help),
        ("Space", t.menu_new, MenuAction::New),
        ("L", t.menu_language, MenuAction::Language),
        ("A", t.menu_icons, MenuAction::Icons),
        ("I", t.menu_indicator, MenuAction::Indicator),
    ]
}

const MENU_GAP: &str = "   ";

/// Display width of the menu row content, padding included
fn menu_width(t: &Texts) -> usize {
    let items = menu_items(t);
    let labels: usize = items.iter().map(|(k, r, _)| k.width() + 2 + r.width()).sum();
    labels + MENU_GAP.len() * (items.len() - 1) + 2
}

/// Map a terminal position to the board cell under it.
/// Cells are two columns wide and one row tall inside the board border.
fn cell_at(board: Rect, size: usize, column: u16, row: u16) -> Option<Coord> {
    let inner_x = board.x + 1;
    let inner_y = board.y + 1;
    if column < inner_x || row < inner_y {
        return None;
    }
    let c = ((column - inner_x) / 2) as usize;
    let r = (row - inner_y) as usize;
    (r < size && c < size).then_some((r, c))
}

fn contains(r: Rect, column: u16, row: u16) -> bool {
    column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
}

// Runtime UI variables grouped in one place
#[derive(Debug)]
struct UiState {
    pointer: Option<(u16, u16)>, // last mouse position (column, row)
    pointer_down: bool,          // left button currently held
    cursor: Coord,               // keyboard cursor (row, col)
    showing_help: bool,
    modal_close_rect: Option<Rect>,
    modal_close_hovered: bool,
    board_rect: Option<Rect>,
    menu_rects: Vec<(Rect, MenuAction)>,
    hover_action: Option<MenuAction>,
    clicked: Option<(MenuAction, Instant)>, // brief pressed highlight
    caption: String,                        // last title sent to the terminal
    quit: bool,
}

impl UiState {
    fn new() -> Self {
        UiState {
            pointer: None,
            pointer_down: false,
            cursor: (0, 0),
            showing_help: false,
            modal_close_rect: None,
            modal_close_hovered: false,
            board_rect: None,
            menu_rects: Vec::new(),
            hover_action: None,
            clicked: None,
            caption: String::new(),
            quit: false,
        }
    }

    /// Board cell currently under the mouse, if any
    fn pointer_cell(&self, size: usize) -> Option<Coord> {
        let (col, row) = self.pointer?;
        cell_at(self.board_rect?, size, col, row)
    }

    fn step_cursor(&mut self, dr: isize, dc: isize, size: usize) {
        let max = size.saturating_sub(1) as isize;
        let r = (self.cursor.0 as isize + dr).clamp(0, max) as usize;
        let c = (self.cursor.1 as isize + dc).clamp(0, max) as usize;
        self.cursor = (r, c);
    }
}

/// Everything the loop mutates besides the terminal
struct App<'a> {
    cfg: &'a mut Config,
    lang: &'a mut Lang,
    palette: Palette,
    glyphs: Glyphs,
    session: Session,
    ui: UiState,
}

/// Set up the terminal, run the game until quit, and always restore the terminal
pub fn run(cfg: &mut Config, lang: &mut Lang, palette: Palette, glyphs: Glyphs) -> Result<(), Box<dyn Error>> {
    // build the terminal first so a failure leaves the screen untouched
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    enable_raw_mode()?;
    if let Err(e) = execute!(io::stdout(), EnableMouseCapture, terminal::EnterAlternateScreen) {
        let _ = restore_terminal(&mut terminal);
        return Err(e.into());
    }

    let mut app = App {
        cfg,
        lang,
        palette,
        glyphs,
        session: Session::new(WinLines::standard()),
        ui: UiState::new(),
    };
    let result = game_loop(&mut terminal, &mut app);

    // Save preferences before exiting
    save_config(app.cfg);

    restore_terminal(&mut terminal)?;
    result
}

/// Leave raw mode, mouse capture and the alternate screen
fn restore_terminal<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Feed the sampled pointer state into the session once per frame
fn tick(app: &mut App) {
    if app.ui.showing_help {
        return;
    }
    let cell = app.ui.pointer_cell(app.session.game().size());
    app.session.handle_pointer_input(cell, app.ui.pointer_down);
}

/// One tick per frame: sample input into the session, render, then
/// process terminal events until the next tick is due
fn game_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let tick_rate = app.cfg.frame_interval();
    let mut last_tick = Instant::now();

    loop {
        tick(app);

        // window caption, derived every frame
        let caption = app.session.status_text(app.lang);
        if caption != app.ui.caption {
            execute!(io::stdout(), SetTitle(&caption))?;
            app.ui.caption = caption;
        }

        terminal.draw(|f| draw(f, app))?;

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or(Duration::ZERO);
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => handle_key(app, key)?,
                Event::Mouse(me) => handle_mouse(app, me)?,
                _ => {}
            }
            if app.ui.quit {
                info!("quit requested");
                return Ok(());
            }
        }

        // clear click feedback after a short duration
        if let Some((_, t0)) = app.ui.clicked {
            if t0.elapsed() > Duration::from_millis(200) {
                app.ui.clicked = None;
            }
        }
        last_tick = Instant::now();
    }
}

fn apply_action(app: &mut App, action: MenuAction) -> Result<(), Box<dyn Error>> {
    debug!(?action, "menu action");
    match action {
        MenuAction::Help => {
            app.ui.showing_help = !app.ui.showing_help;
            app.ui.pointer_down = false;
        }
        MenuAction::New => {
            app.session.handle_restart_signal();
            app.ui.pointer_down = false;
        }
        MenuAction::Language => {
            app.cfg.language = app.lang.toggle().to_string();
        }
        MenuAction::Icons => {
            app.cfg.ascii_icons = !app.cfg.ascii_icons;
            app.glyphs = Glyphs::load(app.cfg, &app.palette)?;
        }
        MenuAction::Indicator => app.cfg.show_indicator = !app.cfg.show_indicator,
        MenuAction::Exit => app.ui.quit = true,
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> Result<(), Box<dyn Error>> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.ui.quit = true;
        return Ok(());
    }
    if app.ui.showing_help {
        // any key closes the help modal
        app.ui.showing_help = false;
        app.ui.modal_close_rect = None;
        return Ok(());
    }
    let size = app.session.game().size();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => apply_action(app, MenuAction::Exit)?,
        KeyCode::F(1) => apply_action(app, MenuAction::Help)?,
        KeyCode::Char(' ') => apply_action(app, MenuAction::New)?,
        KeyCode::Char('l') | KeyCode::Char('L') => apply_action(app, MenuAction::Language)?,
        KeyCode::Char('a') | KeyCode::Char('A') => apply_action(app, MenuAction::Icons)?,
        KeyCode::Char('i') | KeyCode::Char('I') => apply_action(app, MenuAction::Indicator)?,
        KeyCode::Left => app.ui.step_cursor(0, -1, size),
        KeyCode::Right => app.ui.step_cursor(0, 1, size),
        KeyCode::Up => app.ui.step_cursor(-1, 0, size),
        KeyCode::Down => app.ui.step_cursor(1, 0, size),
        KeyCode::Enter => {
            app.session.handle_pointer_input(Some(app.ui.cursor), true);
        }
        _ => {}
    }
    Ok(())
}

fn handle_mouse(app: &mut App, me: MouseEvent) -> Result<(), Box<dyn Error>> {
    let (col, row) = (me.column, me.row);
    let size = app.session.game().size();

    // a release always counts, even when the help modal eats everything else
    if me.kind == MouseEventKind::Up(MouseButton::Left) {
        app.ui.pointer_down = false;
        return Ok(());
    }

    // help modal swallows the mouse; only its CLOSE button reacts
    if app.ui.showing_help {
        let in_btn = app.ui.modal_close_rect.map_or(false, |b| contains(b, col, row));
        match me.kind {
            MouseEventKind::Moved => app.ui.modal_close_hovered = in_btn,
            MouseEventKind::Down(MouseButton::Left) if in_btn => {
                app.ui.showing_help = false;
                app.ui.modal_close_rect = None;
                app.ui.modal_close_hovered = false;
            }
            _ => {}
        }
        return Ok(());
    }

    let hit = app.ui.menu_rects.iter().find(|(r, _)| contains(*r, col, row)).map(|(_, a)| *a);
    match me.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
            // Moved is only reported with no button held
            if me.kind == MouseEventKind::Moved {
                app.ui.pointer_down = false;
            }
            app.ui.pointer = Some((col, row));
            app.ui.hover_action = hit;
            if let Some(cell) = app.ui.pointer_cell(size) {
                app.ui.cursor = cell;
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            app.ui.pointer = Some((col, row));
            if let Some(action) = hit {
                app.ui.clicked = Some((action, Instant::now()));
                apply_action(app, action)?;
            } else {
                app.ui.pointer_down = true;
                if let Some(cell) = app.ui.pointer_cell(size) {
                    app.ui.cursor = cell;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn draw<B: Backend>(f: &mut Frame<B>, app: &mut App) {
    let t = &app.lang.texts;
    let game = app.session.game();
    let size = f.size();
    let board_w = (game.size() * 2) as u16 + 3;
    let board_h = game.size() as u16 + 2;
    let min_twidth = (menu_width(t) as u16 + 2).max(board_w).max(60);
    let min_theight = board_h + 6;

    // If terminal too small, render a centered warning and skip normal UI
    if size.width < min_twidth || size.height < min_theight {
        let dims = [min_twidth.to_string(), min_theight.to_string()];
        let warn_lines = vec![
            Spans::from(Span::raw(t.tsmsg_line1)),
            Spans::from(Span::raw(Lang::fill(t.tsmsg_line2, &[dims[0].as_str(), dims[1].as_str()]))),
        ];
        let warn = Paragraph::new(Text::from(warn_lines))
            .block(Block::default().borders(Borders::ALL).title(t.tsmsg_title))
            .alignment(Alignment::Center);
        f.render_widget(Clear, size);
        let w = 40u16.min(size.width.saturating_sub(2));
        let h = 4u16.min(size.height.saturating_sub(2));
        f.render_widget(warn, center_rect(w, h, size));
        app.ui.board_rect = None;
        app.ui.menu_rects.clear();
        return;
    }

    // layout: top menu row, center board, bottom status
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(3)].as_ref())
        .split(size);

    let key_fg = app.palette.resolve(Color::Yellow);
    let hover_bg = app.palette.resolve(Color::LightBlue);
    let pressed_bg = app.palette.resolve(Color::Green);
    let pressed_fg = app.palette.resolve(Color::Black);

    // menu row; item rects are kept for mouse hit-testing
    app.ui.menu_rects.clear();
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    let mut x = chunks[0].x + 2;
    for (i, (key, rest, action)) in menu_items(t).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(MENU_GAP));
            x += MENU_GAP.len() as u16;
        }
        let pressed = app.ui.clicked.map(|(a, _)| a) == Some(action);
        let hovered = app.ui.hover_action == Some(action);
        let (key_style, rest_style) = if pressed {
            (Style::default().bg(pressed_bg).fg(pressed_fg).add_modifier(Modifier::BOLD), Style::default().bg(pressed_bg).fg(pressed_fg))
        } else if hovered {
            (Style::default().bg(hover_bg).fg(pressed_fg).add_modifier(Modifier::BOLD), Style::default().bg(hover_bg).fg(pressed_fg))
        } else {
            (Style::default().fg(key_fg).add_modifier(Modifier::BOLD), Style::default())
        };
        let rest = format!(": {}", rest);
        let w = (key.width() + rest.width()) as u16;
        app.ui.menu_rects.push((Rect::new(x, chunks[0].y + 1, w, 1), action));
        x += w;
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(rest, rest_style));
    }
    let menu = Paragraph::new(Spans::from(spans)).block(Block::default().borders(Borders::ALL)).alignment(Alignment::Left);
    f.render_widget(menu, chunks[0]);

    // status row: moves + caption on the left, Esc: Exit on the right
    let moves = game.moves().to_string();
    let left_text = format!("{}  {} ", Lang::fill(t.status_moves_fmt, &[moves.as_str()]), app.ui.caption);
    let right_rest = format!(": {}", t.menu_exit);
    let inner_w = chunks[2].width.saturating_sub(2) as usize;
    let left_w = left_text.as_str().width();
    let right_w = "Esc".width() + right_rest.width() + 1;
    let mid_spaces = if inner_w > left_w + right_w { inner_w - left_w - right_w } else { 1 };
    let exit_x = chunks[2].x + 1 + (left_w + mid_spaces) as u16;
    let exit_rect = Rect::new(exit_x, chunks[2].y + 1, ("Esc".width() + right_rest.width()) as u16, 1);
    app.ui.menu_rects.push((exit_rect, MenuAction::Exit));
    let (exit_key_style, exit_rest_style) = if app.ui.hover_action == Some(MenuAction::Exit) {
        (Style::default().bg(hover_bg).fg(pressed_fg).add_modifier(Modifier::BOLD), Style::default().bg(hover_bg).fg(pressed_fg))
    } else {
        (Style::default().fg(key_fg).add_modifier(Modifier::BOLD), Style::default())
    };
    let status = Paragraph::new(Spans::from(vec![
        Span::raw(left_text),
        Span::raw(" ".repeat(mid_spaces)),
        Span::styled("Esc", exit_key_style),
        Span::styled(right_rest, exit_rest_style),
        Span::raw(" "),
    ]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Left);
    f.render_widget(status, chunks[2]);

    // board
    let board_area = center_rect(board_w, board_h, chunks[1]);
    app.ui.board_rect = Some(board_area);
    let lines = board_lines(game, &app.glyphs, app.ui.cursor, app.cfg.show_indicator, app.palette.resolve(Color::Yellow));
    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(t.board_title).title_alignment(Alignment::Center))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, board_area);

    app.ui.modal_close_rect = None;
    if app.ui.showing_help {
        draw_help(f, t, &mut app.ui, hover_bg, pressed_fg);
    }
}

/// One styled line per grid row; each cell takes two columns
fn board_lines<'a>(game: &Game, glyphs: &Glyphs, cursor: Coord, show_indicator: bool, indicator_fg: Color) -> Vec<Spans<'a>> {
    let mut lines = Vec::with_capacity(game.size());
    for r in 0..game.size() {
        let mut spans = Vec::with_capacity(game.size() + 1);
        for c in 0..game.size() {
            let glyph = match game.cell(r, c) {
                Cell::Empty => &glyphs.board,
                Cell::Occupied(p) => glyphs.marker(p),
            };
            let mut style = Style::default().fg(glyph.fg).bg(glyphs.board_bg);
            if cursor == (r, c) && !game.is_over() {
                style = style.bg(glyphs.cursor_bg);
            }
            // the winning line is drawn as a red stroke across its cells
            if game.winning_cell(r, c) {
                style = style.bg(glyphs.win_bg).add_modifier(Modifier::BOLD);
            }
            if glyph.symbol.width() >= 2 {
                spans.push(Span::styled(glyph.symbol.clone(), style));
            } else if show_indicator && cursor == (r, c) {
                spans.push(Span::styled("▸", style.fg(indicator_fg).add_modifier(Modifier::BOLD)));
                spans.push(Span::styled(glyph.symbol.clone(), style));
            } else {
                spans.push(Span::styled(format!(" {}", glyph.symbol), style));
            }
        }
        // right padding column in the board background
        spans.push(Span::styled(" ", Style::default().bg(glyphs.board_bg)));
        lines.push(Spans::from(spans));
    }
    lines
}

fn draw_help<B: Backend>(f: &mut Frame<B>, t: &Texts, ui: &mut UiState, hover_bg: Color, hover_fg: Color) {
    let body = [t.help_controls, t.help_place, t.help_move, t.help_new, "", t.help_rule];
    let w = body.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 4;
    let h = body.len() as u16 + 4;
    let mrect = center_rect(w, h, f.size());
    f.render_widget(Clear, mrect);
    let mut lines: Vec<Spans> = body.iter().map(|l| Spans::from(Span::raw(*l))).collect();
    lines.insert(0, Spans::from(Span::raw("")));
    let para = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL).title(t.help_title));
    f.render_widget(para, mrect);

    let btn_w = t.btn_close.width() as u16;
    let btn = bottom_centered_block(btn_w, 1, Rect::new(mrect.x, mrect.y, mrect.width, mrect.height.saturating_sub(1)));
    let style = if ui.modal_close_hovered {
        Style::default().bg(hover_bg).fg(hover_fg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };
    f.render_widget(Paragraph::new(Span::styled(t.btn_close, style)), btn);
    ui.modal_close_rect = Some(btn);
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn bottom_centered_block(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + r.height.saturating_sub(height);
    Rect::new(x, y, width, height)
}
