/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The board is drawn straight from pixel geometry: 10 px per terminal
/// column, 30 px per terminal row, so a 60 px lane is two rows tall and
/// the whole 560×600 board fits in 56×20 cells.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::board::{self, Terrain};
use crate::domain::constants::{CELL_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::domain::entity::ObstacleKind;
use crate::domain::geometry::Rect;
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so gaps
    /// between rows match the cells on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = if bg == Color::Reset { Self::BASE_BG } else { bg };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }

    fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, cell: Cell) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x, y, cell);
            }
        }
    }
}

// ── Layout ──

const PX_PER_COL: i32 = 10;
const PX_PER_ROW: i32 = 30;
const BOARD_COLS: usize = (SCREEN_WIDTH / PX_PER_COL) as usize;
const BOARD_ROWS: usize = (SCREEN_HEIGHT / PX_PER_ROW) as usize;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
const MAP_COL: usize = 1;
const MSG_ROW: usize = MAP_ROW + BOARD_ROWS + 1;
const HELP_ROW: usize = MSG_ROW + 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const OVERLAY_BG: Color = Color::Rgb { r: 40, g: 40, b: 40 };
const HILITE: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const GOLD: Color = Color::Rgb { r: 255, g: 220, b: 50 };

/// Terminal cell span `(col0, col1, row0, row1)` (half-open) covered by a
/// pixel rect, clipped to the board. `None` when entirely off-board.
fn cell_span(r: &Rect) -> Option<(usize, usize, usize, usize)> {
    let c0 = r.x.max(0) / PX_PER_COL;
    let c1 = ((r.right().min(SCREEN_WIDTH) + PX_PER_COL - 1) / PX_PER_COL).min(BOARD_COLS as i32);
    let r0 = r.y.max(0) / PX_PER_ROW;
    let r1 = ((r.bottom().min(SCREEN_HEIGHT) + PX_PER_ROW - 1) / PX_PER_ROW).min(BOARD_ROWS as i32);
    if c0 >= c1 || r0 >= r1 {
        return None;
    }
    Some((c0 as usize, c1 as usize, r0 as usize, r1 as usize))
}

fn terrain_bg(t: Terrain) -> Color {
    match t {
        Terrain::Goal  => Color::Rgb { r: 10, g: 70, b: 30 },
        Terrain::Water => Color::Rgb { r: 20, g: 50, b: 140 },
        Terrain::Road  => Color::Rgb { r: 45, g: 45, b: 50 },
        Terrain::Safe  => Color::Rgb { r: 60, g: 110, b: 50 },
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        if self.term_w < MAP_COL + BOARD_COLS || self.term_h < HELP_ROW + 1 {
            log::warn!(
                "terminal {}x{} is smaller than the {}x{} board area",
                self.term_w, self.term_h, MAP_COL + BOARD_COLS, HELP_ROW + 1,
            );
        }
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Draw one frame. `name_buf` is the name being typed on the start screen.
    pub fn render(&mut self, world: &WorldState, name_buf: &str) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        compose(&mut self.front, world, name_buf);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

// ═══════════════════════════════════════════════════════════════
// Compose: build front buffer content
// ═══════════════════════════════════════════════════════════════

fn compose(buf: &mut FrameBuffer, w: &WorldState, name_buf: &str) {
    match w.phase {
        Phase::Start => compose_start(buf, w, name_buf),
        Phase::Playing => {
            compose_game(buf, w);
            if w.paused {
                compose_pause_overlay(buf);
            }
        }
        Phase::LevelComplete => {
            compose_game(buf, w);
            compose_level_complete(buf, w);
        }
        Phase::GameOver => {
            compose_game(buf, w);
            compose_game_over(buf, w);
        }
    }
}

fn compose_game(buf: &mut FrameBuffer, w: &WorldState) {
    // ── HUD row ──
    let hud = w.hud();
    let hearts = "♥".repeat(hud.lives as usize);
    let line = format!(
        " {:<15}  Level {}  Score {:<6}  {} ",
        hud.player_name, hud.level, hud.score, hearts,
    );
    buf.fill_row(HUD_ROW, HUD_BG);
    buf.put_str(0, HUD_ROW, &line, Color::White, HUD_BG);

    compose_board(buf, w);

    // ── Message bar ──
    if !w.message.is_empty() {
        buf.fill_row(MSG_ROW, MSG_BG);
        buf.put_str(0, MSG_ROW, &format!(" ◈ {} ", w.message), Color::Black, MSG_BG);
    }

    // ── Help bar ──
    let help = " ←→↑↓/WASD: Hop   P: Pause   ESC: Quit";
    buf.put_str(0, HELP_ROW, help, Color::DarkGrey, Color::Reset);
}

fn compose_board(buf: &mut FrameBuffer, w: &WorldState) {
    // Terrain: each lane spans CELL_SIZE / PX_PER_ROW terminal rows.
    let rows_per_lane = (CELL_SIZE / PX_PER_ROW) as usize;
    for (lane, terrain) in board::lanes() {
        let bg = terrain_bg(terrain);
        let y0 = MAP_ROW + lane * rows_per_lane;
        buf.fill_rect(MAP_COL, y0, MAP_COL + BOARD_COLS, y0 + rows_per_lane, Cell::new(' ', Color::White, bg));
        if terrain == Terrain::Water {
            for x in (MAP_COL + lane % 3..MAP_COL + BOARD_COLS).step_by(6) {
                buf.set(x, y0, Cell::new('~', Color::Rgb { r: 90, g: 130, b: 220 }, bg));
            }
        }
    }

    // Goal slots
    for g in &w.goals {
        let (fg, bg, ch) = if g.filled {
            (GOLD, Color::Rgb { r: 30, g: 120, b: 40 }, '♥')
        } else {
            (Color::Rgb { r: 120, g: 160, b: 120 }, Color::Rgb { r: 20, g: 90, b: 35 }, '·')
        };
        draw_rect(buf, &g.rect, Cell::new(' ', fg, bg));
        if let Some((c0, c1, r0, _)) = cell_span(&g.rect) {
            buf.set(MAP_COL + (c0 + c1) / 2, MAP_ROW + r0, Cell::new(ch, fg, bg));
        }
    }

    // Platforms under the player, hazards over the terrain
    for ob in w.obstacles() {
        let cell = match ob.kind {
            ObstacleKind::Platform => Cell::new('═', Color::Rgb { r: 230, g: 190, b: 120 }, Color::Rgb { r: 120, g: 80, b: 40 }),
            ObstacleKind::Hazard => Cell::new('▓', Color::Rgb { r: 255, g: 90, b: 70 }, Color::Rgb { r: 150, g: 30, b: 30 }),
        };
        draw_rect(buf, &ob.rect(), cell);
    }

    // Player
    let p = &w.player.rect;
    let body = Color::Rgb { r: 60, g: 220, b: 60 };
    draw_rect(buf, p, Cell::new(' ', Color::Black, body));
    if let Some((c0, c1, r0, _)) = cell_span(p) {
        buf.set(MAP_COL + c0, MAP_ROW + r0, Cell::new('o', Color::Black, body));
        buf.set(MAP_COL + c1 - 1, MAP_ROW + r0, Cell::new('o', Color::Black, body));
    }
}

fn draw_rect(buf: &mut FrameBuffer, r: &Rect, cell: Cell) {
    if let Some((c0, c1, r0, r1)) = cell_span(r) {
        buf.fill_rect(MAP_COL + c0, MAP_ROW + r0, MAP_COL + c1, MAP_ROW + r1, cell);
    }
}

/// Centered box on the board with one line per entry.
fn compose_box(buf: &mut FrameBuffer, lines: &[(&str, Color)]) {
    let box_w = 36;
    let box_h = lines.len() + 2;
    let x0 = MAP_COL + (BOARD_COLS - box_w) / 2;
    let y0 = MAP_ROW + (BOARD_ROWS.saturating_sub(box_h)) / 2;
    buf.fill_rect(x0, y0, x0 + box_w, y0 + box_h, Cell::new(' ', Color::White, OVERLAY_BG));
    for (i, (text, fg)) in lines.iter().enumerate() {
        let tx = x0 + (box_w.saturating_sub(text.chars().count())) / 2;
        buf.put_str(tx, y0 + 1 + i, text, *fg, OVERLAY_BG);
    }
}

fn compose_pause_overlay(buf: &mut FrameBuffer) {
    compose_box(buf, &[
        ("╔══════════════╗", GOLD),
        ("║    PAUSED    ║", GOLD),
        ("╚══════════════╝", GOLD),
        ("", Color::White),
        ("P: Resume   ESC: Quit", Color::Rgb { r: 100, g: 200, b: 255 }),
    ]);
}

fn compose_level_complete(buf: &mut FrameBuffer, w: &WorldState) {
    let title = format!("★ LEVEL {} CLEAR ★", w.level);
    let score = format!("Score: {}", w.score);
    compose_box(buf, &[
        (title.as_str(), GOLD),
        ("", Color::White),
        (score.as_str(), Color::White),
        ("", Color::White),
        ("ENTER: Next level", HILITE),
    ]);
}

fn compose_game_over(buf: &mut FrameBuffer, w: &WorldState) {
    let (title, color) = if w.is_victory() {
        ("★ ALL LEVELS CLEARED! ★", GOLD)
    } else {
        ("✕ GAME OVER ✕", Color::Rgb { r: 255, g: 60, b: 60 })
    };
    let score = format!("Final Score: {}", w.score);
    compose_box(buf, &[
        (title, color),
        ("", Color::White),
        (score.as_str(), Color::White),
        ("", Color::White),
        ("R: Restart   M: Menu", HILITE),
        ("ESC: Quit", Color::DarkGrey),
    ]);
}

fn compose_start(buf: &mut FrameBuffer, w: &WorldState, name_buf: &str) {
    let title = [
        r" _                    _  _                        ",
        r"| |   __ _ _ _  ___  | || |___ _ __ _ __  ___ _ _ ",
        r"| |__/ _` | ' \/ -_) | __ / _ \ '_ \ '_ \/ -_) '_|",
        r"|____\__,_|_||_\___| |_||_\___/ .__/ .__/\___|_|  ",
        r"                              |_|  |_|            ",
    ];
    for (i, line) in title.iter().enumerate() {
        buf.put_str(2, 1 + i, line, GOLD, Color::Reset);
    }

    let y = 8;
    buf.put_str(4, y, "Enter your name:", Color::White, Color::Reset);
    let field = format!("{name_buf}_");
    buf.put_str(4, y + 1, &format!("{field:<16}"), HILITE, OVERLAY_BG);
    let hint = if name_buf.trim().is_empty() { "(type a name)" } else { "ENTER: Start" };
    buf.put_str(22, y + 1, hint, Color::DarkGrey, Color::Reset);

    let help = [
        "Controls",
        "  ←→↑↓ / WASD   Hop one lane or column",
        "  P             Pause",
        "  ENTER         Next level",
        "  R / M         Restart / Menu after game over",
        "  ESC           Quit",
        "",
        "Cross the road, ride the logs, fill all 5 homes.",
    ];
    for (i, line) in help.iter().enumerate() {
        let fg = if i == 0 { GOLD } else { Color::White };
        buf.put_str(4, y + 3 + i, line, fg, Color::Reset);
    }

    if !w.message.is_empty() {
        buf.fill_row(HELP_ROW, MSG_BG);
        buf.put_str(0, HELP_ROW, &format!(" ◈ {} ", w.message), Color::Black, MSG_BG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::step;

    fn frame(w: &WorldState, name: &str) -> FrameBuffer {
        let mut buf = FrameBuffer::new(80, 30);
        compose(&mut buf, w, name);
        buf
    }

    fn row_text(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect()
    }

    fn screen_text(buf: &FrameBuffer) -> String {
        (0..buf.height).map(|y| row_text(buf, y)).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn board_fits_56_by_20() {
        assert_eq!((BOARD_COLS, BOARD_ROWS), (56, 20));
    }

    #[test]
    fn cell_span_scales_and_clips() {
        // Player at (5, 9): 310..350 × 550..590
        assert_eq!(cell_span(&Rect::new(310, 550, 40, 40)), Some((31, 35, 18, 20)));
        // Hazard half off the left edge
        assert_eq!(cell_span(&Rect::new(-40, 250, 80, 40)), Some((0, 4, 8, 10)));
        // Fully off-board at either wrap extreme
        assert_eq!(cell_span(&Rect::new(-80, 250, 80, 40)), None);
        assert_eq!(cell_span(&Rect::new(560, 250, 80, 40)), None);
    }

    #[test]
    fn playing_frame_shows_hud_and_player() {
        let mut w = WorldState::new();
        step::start_game(&mut w, "Ann");
        let buf = frame(&w, "");
        let hud = row_text(&buf, HUD_ROW);
        assert!(hud.contains("Ann"));
        assert!(hud.contains("Level 1"));
        assert!(hud.contains("♥♥♥"));
        // Player eyes on the top row of its span
        assert_eq!(buf.get(MAP_COL + 31, MAP_ROW + 18).ch, 'o');
        assert_eq!(buf.get(MAP_COL + 34, MAP_ROW + 18).ch, 'o');
    }

    #[test]
    fn start_screen_echoes_name() {
        let w = WorldState::new();
        let text = screen_text(&frame(&w, "Zed"));
        assert!(text.contains("Zed_"));
        assert!(text.contains("ENTER: Start"));
    }

    #[test]
    fn overlays_follow_phase() {
        let mut w = WorldState::new();
        step::start_game(&mut w, "A");
        step::toggle_pause(&mut w);
        assert!(screen_text(&frame(&w, "")).contains("PAUSED"));

        step::toggle_pause(&mut w);
        w.lives = 1;
        w.hazards.clear();
        w.platforms.clear();
        w.player.place(4, 4);
        step::move_player(&mut w, crate::domain::entity::MoveDir::Up);
        let text = screen_text(&frame(&w, ""));
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("R: Restart"));
    }

    #[test]
    fn filled_goal_is_marked() {
        let mut w = WorldState::new();
        step::start_game(&mut w, "A");
        w.goals[0].filled = true;
        let buf = frame(&w, "");
        // Slot 0: x 40..120 → columns 4..12, centre 8; top row of lane 0
        assert_eq!(buf.get(MAP_COL + 8, MAP_ROW).ch, '♥');
    }
}
