use std::{
    fs::File,
    io::{self, stdout, Stdout},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use blockfall::{Cell, Game, GameConfig, GameState, Intent, LockColors};

// ============================================================================
// Command Line
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "blockfall", about = "Falling-block puzzle in the terminal")]
struct Args {
    /// TOML file with board size, lock colour mode and seed
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the piece randomiser
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Keep each piece's colour when it locks
    #[arg(long)]
    preserve_colors: bool,

    /// Write logs to this file (RUST_LOG still selects the level)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = GameConfig::load(self.config.as_deref()).context("load configuration")?;
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.preserve_colors {
            config.lock_colors = LockColors::Preserve;
        }
        config.validate().context("validate configuration")?;
        Ok(config)
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    // Logging to stderr would draw over the alternate screen, so it stays off
    // unless RUST_LOG asks for it or a log file is given.
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"));
    builder.format_timestamp_secs();
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
        if std::env::var_os("RUST_LOG").is_none() {
            builder.filter_level(log::LevelFilter::Debug);
        }
    }
    let _ = builder.try_init();
    Ok(())
}

// ============================================================================
// Visual Constants
// ============================================================================

const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";
const CELL_WIDTH: u16 = 2;
const INFO_WIDTH: u16 = 16;

/// Colour for a cell value; `None` leaves the background showing.
fn cell_color(value: Cell) -> Option<Color> {
    match value {
        0 => None,
        1 => Some(Color::Rgb(255, 165, 0)),
        2 => Some(Color::Cyan),
        3 => Some(Color::Blue),
        4 => Some(Color::Green),
        5 => Some(Color::Yellow),
        6 => Some(Color::Red),
        7 => Some(Color::Magenta),
        8 => Some(Color::Gray),
        _ => Some(Color::White),
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game: &Game) {
    let area = frame.size();
    render_game(frame, game, area);
    if game.state == GameState::GameOver {
        render_game_over(frame, game, area);
    }
}

fn render_game(frame: &mut Frame, game: &Game, area: Rect) {
    let grid_display_width = game.board.width() as u16 * CELL_WIDTH + 2;
    let grid_display_height = game.board.height() as u16 + 2;
    let total_width = grid_display_width + INFO_WIDTH + 2;
    let total_height = grid_display_height + 2;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);
    let game_row = vertical[0];

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(INFO_WIDTH),
    ])
    .split(game_row);

    render_grid(frame, game, horizontal[0]);
    render_info(frame, game, horizontal[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 1,
    };
    if controls_area.y < area.y + area.height {
        let controls = Paragraph::new(Line::from("←→: Move | ↓: Drop | R: Restart | Q/ESC: Quit"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = game
        .render_grid()
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|value| match cell_color(value) {
                    Some(color) => Span::styled(BLOCK_CHAR, Style::default().fg(color)),
                    None => Span::raw(EMPTY_CHAR),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(game.lines_cleared.to_string()),
        Line::from(""),
        Line::from(Span::styled("Pieces", Style::default().fg(Color::Green))),
        Line::from(game.pieces_locked.to_string()),
        Line::from(""),
        Line::from(Span::styled("State", Style::default().fg(Color::Yellow))),
        Line::from(match game.state {
            GameState::Playing => "Playing",
            GameState::GameOver => "Over",
        }),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_game_over(frame: &mut Frame, game: &Game, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Lines: {}", game.lines_cleared)),
        Line::from(format!("Pieces: {}", game.pieces_locked)),
        Line::from(""),
        Line::from(Span::styled(
            "R to restart, ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(paragraph, centered_rect(28, 10, area));
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn intent_for(code: KeyCode) -> Option<Intent> {
    match code {
        KeyCode::Left => Some(Intent::MoveLeft),
        KeyCode::Right => Some(Intent::MoveRight),
        KeyCode::Down => Some(Intent::SoftDrop),
        _ => None,
    }
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, game: &mut Game) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(frame, game))?;

        // No gravity: block until the next key
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
            KeyCode::Char('r') | KeyCode::Char('R') => game.restart(),
            code => {
                if let Some(intent) = intent_for(code) {
                    game.apply(intent);
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let config = args.game_config()?;
    log::info!("starting with {:?}", config);
    let mut game = Game::from_config(&config)?;

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run(&mut terminal, &mut game);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result.context("terminal session failed")
}
