use std::{
    env, fs,
    io::{self, Read},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
};
use tracing_subscriber::EnvFilter;

use pure_richtext::{Alignment, CellMeasure, LayoutConfig, RichText, terminal};

const USAGE: &str =
    "Usage: pure-richtext <file|-> [--width N] [--align left|center|right] [--print]";

struct Options {
    source: String,
    width: Option<f32>,
    alignment: Alignment,
    print: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    run()
}

fn parse_options() -> Result<Option<Options>> {
    let mut args = env::args().skip(1);
    let mut source = None;
    let mut width = None;
    let mut alignment = Alignment::Left;
    let mut print = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--width" | "-w" => {
                let value = args.next().context("--width needs a value")?;
                let parsed: f32 = value
                    .parse()
                    .with_context(|| format!("invalid width {value}"))?;
                width = Some(parsed);
            }
            "--align" | "-a" => {
                let value = args.next().context("--align needs a value")?;
                alignment = value.parse()?;
            }
            "--print" | "-p" => print = true,
            "--help" | "-h" => return Ok(None),
            _ if source.is_none() => source = Some(arg),
            _ => bail!("unexpected argument {arg}"),
        }
    }

    let Some(source) = source else {
        return Ok(None);
    };
    Ok(Some(Options {
        source,
        width,
        alignment,
        print,
    }))
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("failed to read stdin")?;
        return Ok(content);
    }
    fs::read_to_string(source).with_context(|| format!("failed to read {source}"))
}

fn run() -> Result<()> {
    let Some(options) = parse_options()? else {
        eprintln!("{USAGE}");
        return Ok(());
    };

    let content = read_source(&options.source)?;
    let config = LayoutConfig::new()
        .with_max_width(options.width)?
        .with_alignment(options.alignment);
    let text = RichText::new(content, config, Box::new(CellMeasure))?;

    if options.print {
        for line in terminal::to_plain_text(text.layout()) {
            println!("{line}");
        }
        return Ok(());
    }

    let mut viewer = Viewer::new(text, options.width.is_none());

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_viewer(&mut terminal, &mut viewer).context("application error");

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

fn run_viewer<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    viewer: &mut Viewer,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);

    while !viewer.should_quit {
        let mut draw_result = Ok(());
        terminal
            .draw(|frame| draw_result = viewer.draw(frame))
            .context("failed to draw frame")?;
        draw_result?;

        if event::poll(tick_rate).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            viewer.handle_event(evt);
        }
    }

    Ok(())
}

struct Viewer {
    text: RichText,
    follow_terminal_width: bool,
    scroll_top: usize,
    viewport_height: usize,
    should_quit: bool,
}

impl Viewer {
    fn new(text: RichText, follow_terminal_width: bool) -> Self {
        Self {
            text,
            follow_terminal_width,
            scroll_top: 0,
            viewport_height: 0,
            should_quit: false,
        }
    }

    fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return Ok(());
        }

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let text_area = vertical[0];
        let status_area = vertical[1];

        if self.follow_terminal_width {
            // A width change lays the whole text out again.
            self.text.set_max_width(Some(text_area.width as f32))?;
        }

        self.viewport_height = text_area.height as usize;
        let total_lines = self.text.lines().len();
        self.scroll_top = self
            .scroll_top
            .min(total_lines.saturating_sub(self.viewport_height));

        let lines = terminal::to_lines(self.text.layout());
        let paragraph = Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::NONE))
            .scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, text_area);

        self.draw_status(frame, status_area, total_lines);
        Ok(())
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect, total_lines: usize) {
        let status = format!(
            " {} lines, {} links, {}x{} | q: quit",
            total_lines,
            self.text.links().len(),
            self.text.width(),
            self.text.height(),
        );
        let status_widget = Paragraph::new(Line::from(status))
            .block(Block::default().borders(Borders::NONE))
            .style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(status_widget, area);
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return;
        };

        match (code, modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => self.should_quit = true,
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => self.scroll_by(1),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => self.scroll_by(-1),
            (KeyCode::PageDown, _) | (KeyCode::Char(' '), _) => {
                self.scroll_by(self.viewport_height.max(1) as isize);
            }
            (KeyCode::PageUp, _) => self.scroll_by(-(self.viewport_height.max(1) as isize)),
            (KeyCode::Home, _) => self.scroll_top = 0,
            _ => {}
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let max_top = self
            .text
            .lines()
            .len()
            .saturating_sub(self.viewport_height);
        self.scroll_top = self.scroll_top.saturating_add_signed(delta).min(max_top);
    }
}
