use crate::entity::{Direction, Enemy, Position};
use crate::game::{Cell, Game, GameState};
use crate::renderer::{Input, Renderer};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            last_render: Instant::now(),
            // Target 30 FPS for smooth rendering
            target_frame_time: Duration::from_millis(33),
        }
    }

    fn draw_cell(&self, cell: Cell, stdout: &mut io::Stdout) -> io::Result<()> {
        let color = match cell {
            Cell::Open => Color::Black,
            Cell::Claimed => Color::DarkBlue,
            Cell::Edge => Color::Blue,
            Cell::Trail => Color::Yellow,
            Cell::Outside => Color::Reset,
        };
        queue!(stdout, SetBackgroundColor(color), Print("  "))?;
        Ok(())
    }

    fn draw_sprite(
        &self,
        stdout: &mut io::Stdout,
        background: Color,
        foreground: Color,
        glyph: &str,
    ) -> io::Result<()> {
        queue!(
            stdout,
            SetBackgroundColor(background),
            SetForegroundColor(foreground),
            Print(glyph),
            ResetColor
        )
    }

    fn draw_info(&self, game: &Game, stdout: &mut io::Stdout) -> io::Result<()> {
        let row = game.height() as u16;
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            ResetColor,
            Print(format!(
                "Level: {}  Claimed: {}%  Target: >{}%  Lives: {}",
                game.level,
                game.score(),
                game.config.level_up_score,
                game.player.lives
            ))
        )?;

        queue!(
            stdout,
            cursor::MoveTo(0, row + 1),
            Print("Controls: Arrow Keys to move | SPACE to stop | T to teleport | Q to quit | R to restart")
        )?;

        queue!(stdout, cursor::MoveTo(0, row + 2), terminal::Clear(ClearType::CurrentLine))?;
        match game.state {
            GameState::Won => {
                queue!(
                    stdout,
                    SetForegroundColor(Color::Green),
                    Print("YOU WIN! Press R to play again"),
                    ResetColor
                )?;
            }
            GameState::Lost => {
                queue!(
                    stdout,
                    SetForegroundColor(Color::Red),
                    Print("GAME OVER! Press R to restart"),
                    ResetColor
                )?;
            }
            GameState::Playing => {}
        }

        Ok(())
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }

        self.last_render = Instant::now();

        let mut stdout = io::stdout();

        queue!(stdout, cursor::MoveTo(0, 0))?;

        let sparx = game.sparx_active().then(|| game.sparx.position());
        let live_trail = game.player.live_trail();

        for y in 0..game.height() {
            for x in 0..game.width() {
                let here = Position::new(x, y);
                if game.player.position == here {
                    self.draw_sprite(&mut stdout, Color::Green, Color::Black, "@@")?;
                } else if game.qix.position() == here {
                    self.draw_sprite(&mut stdout, Color::Black, Color::Red, "()")?;
                } else if sparx == Some(here) {
                    self.draw_sprite(&mut stdout, Color::Blue, Color::Magenta, "**")?;
                } else {
                    self.draw_cell(game.cell_with_trail(x, y, &live_trail), &mut stdout)?;
                }
            }
            queue!(stdout, ResetColor, Print("\r\n"))?;
        }

        self.draw_info(game, &mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                if kind == KeyEventKind::Release {
                    return Ok(None);
                }
                let input = match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => Input::Quit,
                    KeyCode::Char('r') | KeyCode::Char('R') => Input::Restart,
                    KeyCode::Char('t') | KeyCode::Char('T') => Input::Teleport,
                    KeyCode::Char(' ') => Input::Stop,
                    KeyCode::Up => Input::Direction(Direction::Up),
                    KeyCode::Down => Input::Direction(Direction::Down),
                    KeyCode::Left => Input::Direction(Direction::Left),
                    KeyCode::Right => Input::Direction(Direction::Right),
                    _ => return Ok(None),
                };
                return Ok(Some(input));
            }
        }
        Ok(None)
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
