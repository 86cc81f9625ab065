use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use pacwoman::config::{Settings, LOG_FILE_NAME};
use pacwoman::game::MAX_LEVEL;
use pacwoman::{Dir, Game, GameEvent, GhostKind, Intent, Map, Phase, Pos};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player(Dir),
    Ghost,
    GhostActive,
    Wall,
    Empty,
    Point,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

/// Remembers what is on screen so each frame only redraws changed cells.
/// The board is a lattice of `2 * size + 1` cells per side: odd/odd cells are
/// tiles, the rest are wall edges and corner posts.
struct Renderer {
    last: Vec<Cell>,
    side: usize,
    last_hud: String,
    last_footer: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new() -> Self {
        Self {
            last: Vec::new(),
            side: 0,
            last_hud: String::new(),
            last_footer: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    fn fit(&mut self, side: usize) {
        if side != self.side {
            self.side = side;
            self.last = vec![BLANK; side * side];
            self.needs_full = true;
        }
    }
}

fn main() -> io::Result<()> {
    let settings = Settings::from_env();
    let _log_guard = setup_logging(&settings)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    if let Err(err) = &result {
        tracing::error!(%err, "game loop aborted");
    }
    result
}

/// Logs go to a file: the terminal is in raw mode on the alternate screen.
fn setup_logging(settings: &Settings) -> io::Result<WorkerGuard> {
    std::fs::create_dir_all(&settings.log_dir)?;
    let file_appender = tracing_appender::rolling::never(&settings.log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    tracing::info!(
        log = %settings.log_dir.join(LOG_FILE_NAME).display(),
        seed = ?settings.seed,
        tick_ms = settings.tick_ms,
        "logging initialized"
    );
    Ok(guard)
}

fn run(stdout: &mut Stdout, settings: &Settings) -> io::Result<()> {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let clock = Instant::now();
    let mut game = Game::new(&mut rng, 0.0).map_err(io::Error::other)?;
    let mut renderer = Renderer::new();
    let mut pending: Vec<Intent> = Vec::new();
    let tick_len = Duration::from_millis(settings.tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    if let Some(intent) = intent_for(key.code) {
                        pending.push(intent);
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_len {
            last_tick = Instant::now();
            let now = clock.elapsed().as_secs_f64();
            let events = game
                .tick(&pending, now, &mut rng)
                .map_err(io::Error::other)?;
            pending.clear();
            if !game.is_running() {
                return Ok(());
            }
            if events.iter().any(rings_bell) {
                stdout.queue(Print('\x07'))?;
            }
        }
        render(stdout, &game, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn intent_for(code: KeyCode) -> Option<Intent> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Intent::Quit),
        KeyCode::Char('r') => Some(Intent::Restart),
        KeyCode::Char(' ') => Some(Intent::SkipLevel),
        KeyCode::Up | KeyCode::Char('k') => Some(Intent::Move(Dir::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Intent::Move(Dir::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Intent::Move(Dir::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Intent::Move(Dir::Right)),
        _ => None,
    }
}

/// The terminal bell stands in for the sound effects.
fn rings_bell(event: &GameEvent) -> bool {
    matches!(
        event,
        GameEvent::LifeLost { .. } | GameEvent::Defeat | GameEvent::Victory
    )
}

fn render(stdout: &mut Stdout, game: &Game, renderer: &mut Renderer) -> io::Result<()> {
    let side = 2 * game.map().size() + 1;
    renderer.fit(side);
    let needed_h = (side + 2) as u16;
    let needed_w = (side * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let player = game.player();
    let hud = format!(
        "Score: {}  Lives: {}  Level: {}/{}  Points: {}  (space skips, q quits)",
        player.score,
        player.lives,
        game.level(),
        MAX_LEVEL,
        game.map().points_left()
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for ly in 0..side {
        for lx in 0..side {
            let cell = cell_for(game, lx, ly);
            let idx = ly * side + lx;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, lx, ly, cell)?;
            }
        }
    }

    let footer = match game.phase() {
        Phase::Playing => String::new(),
        Phase::Victory => format!(
            "VICTORY! Final Score: {} (r to restart, q to quit)",
            player.score
        ),
        Phase::Defeat => format!(
            "GAME OVER - Final Score: {} (r to restart, q to quit)",
            player.score
        ),
    };
    if renderer.needs_full || footer != renderer.last_footer {
        let color = match game.phase() {
            Phase::Victory => Color::Green,
            _ => Color::Red,
        };
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y + side as u16))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(SetForegroundColor(color))?;
        stdout.queue(Print(&footer))?;
        stdout.queue(ResetColor)?;
        renderer.last_footer = footer;
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn cell_for(game: &Game, lx: usize, ly: usize) -> Cell {
    let map = game.map();
    let (x, y) = (lx / 2, ly / 2);
    let wall = match (lx % 2, ly % 2) {
        (1, 1) => return tile_cell(game, Pos::new(x, y)),
        (0, 0) => true,
        (0, _) if x == 0 => edge_wall(map, Pos::new(0, y), Dir::Left),
        (0, _) => edge_wall(map, Pos::new(x - 1, y), Dir::Right),
        (_, _) if y == 0 => edge_wall(map, Pos::new(x, 0), Dir::Up),
        (_, _) => edge_wall(map, Pos::new(x, y - 1), Dir::Down),
    };
    if wall {
        Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        }
    } else {
        BLANK
    }
}

fn edge_wall(map: &Map, pos: Pos, dir: Dir) -> bool {
    match pos.step(dir, map.size()) {
        Some(_) => !map.is_open(pos, dir),
        None => map.tile(pos).wall(dir),
    }
}

fn tile_cell(game: &Game, pos: Pos) -> Cell {
    let player = game.player();
    if pos == player.pos() {
        return Cell {
            glyph: Glyph::Player(player.facing()),
            color: Color::Yellow,
        };
    }
    let size = game.map().size();
    if let Some(ghost) = game.ghosts().iter().find(|g| g.touches(pos, size)) {
        let color = match ghost.kind() {
            GhostKind::Basic => Color::Red,
            GhostKind::WallPhaser => Color::Cyan,
            GhostKind::AreaEffect => Color::Green,
        };
        let glyph = if ghost.special_active() {
            Glyph::GhostActive
        } else {
            Glyph::Ghost
        };
        return Cell { glyph, color };
    }
    if game.map().tile(pos).has_point {
        return Cell {
            glyph: Glyph::Point,
            color: Color::White,
        };
    }
    BLANK
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player(Dir::Up) => "▲",
        Glyph::Player(Dir::Down) => "▼",
        Glyph::Player(Dir::Left) => "◀",
        Glyph::Player(Dir::Right) => "▶",
        Glyph::Ghost => "👻",
        Glyph::GhostActive => "😈",
        Glyph::Wall => "██",
        Glyph::Empty => "  ",
        Glyph::Point => "·",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}
