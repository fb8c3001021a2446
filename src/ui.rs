use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState,
    },
    Frame, Terminal,
};
use std::io;
use survey_inequality::{Analysis, RunSummary, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    CategoryShares,
    Inequality,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::CategoryShares => Page::Inequality,
            Page::Inequality => Page::CategoryShares,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::CategoryShares => "Category Shares",
            Page::Inequality => "Inequality",
        }
    }
}

pub struct App {
    pub analysis: Analysis,
    pub summary: RunSummary,
    pub state: TableState,
    pub current_page: Page,
}

impl App {
    pub fn new(analysis: Analysis, summary: RunSummary) -> Self {
        let mut state = TableState::default();
        if !analysis.shares.is_empty() {
            state.select(Some(0));
        }

        Self {
            analysis,
            summary,
            state,
            current_page: Page::CategoryShares,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn next(&mut self) {
        let len = self.analysis.shares.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.analysis.shares.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Tab | KeyCode::BackTab => app.next_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::CategoryShares => render_shares(f, chunks[1], app),
        Page::Inequality => render_inequality(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];
    for (i, page) in [Page::CategoryShares, Page::Inequality].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(page.title(), style));
    }

    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Households: {}", app.summary.households_analyzed),
        Style::default().fg(Color::White),
    ));
    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Gini: {:.4}", app.summary.gini),
        Style::default().fg(Color::Magenta),
    ));

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_shares(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Code", "Category", "Weighted Total", "Share (%)"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.analysis.shares.iter().map(|share| {
        Row::new(vec![
            Cell::from(share.category_code.clone()),
            Cell::from(truncate(&share.label, 60)),
            Cell::from(format!("{:.2}", share.weighted_total)),
            Cell::from(format!("{:.2}", share.rounded_share(2)))
                .style(Style::default().fg(Color::Green)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(62),
            Constraint::Length(18),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" National Share of Spending by COICOP Level 1 "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_inequality(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let summary = &app.summary;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Gini coefficient: ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{:.4}", summary.gini)),
        ]),
        Line::from(vec![
            Span::styled("Convention: ", Style::default().fg(Color::Yellow)),
            Span::raw(summary.convention.to_string()),
        ]),
        Line::from(vec![
            Span::styled(
                format!("Bottom {:.0}% share: ", summary.bottom_share_fraction * 100.0),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(format!("{:.2}%", summary.bottom_share_pct)),
        ]),
        Line::from(vec![
            Span::styled("Curve points: ", Style::default().fg(Color::Yellow)),
            Span::raw(app.analysis.inequality.points.len().to_string()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Data quality",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(summary.quality.summary()),
    ];

    for issue in &summary.quality.issues {
        let color = match issue.severity {
            Severity::Critical => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Cyan,
        };
        lines.push(Line::from(Span::styled(
            format!("• {} ({})", issue.issue, issue.count),
            Style::default().fg(color),
        )));
    }

    let details = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Summary "),
    );
    f.render_widget(details, chunks[0]);

    let curve: Vec<(f64, f64)> = app
        .analysis
        .inequality
        .points
        .iter()
        .map(|p| p.as_tuple())
        .collect();
    let diagonal = [(0.0, 0.0), (1.0, 1.0)];

    let datasets = vec![
        Dataset::default()
            .name("Equality")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&diagonal),
        Dataset::default()
            .name("Lorenz")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&curve),
    ];

    let axis_labels = || {
        vec![
            Span::raw("0%"),
            Span::raw("50%"),
            Span::raw("100%"),
        ]
    };

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(" Lorenz Curve "))
        .x_axis(
            Axis::default()
                .title("Population")
                .bounds([0.0, 1.0])
                .labels(axis_labels()),
        )
        .y_axis(
            Axis::default()
                .title("Expenditure")
                .bounds([0.0, 1.0])
                .labels(axis_labels()),
        );

    f.render_widget(chart, chunks[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let status_spans = vec![
        Span::styled(" Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
