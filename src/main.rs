use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use serde::Serialize;

use glint::tree::scan::TextLeaves;
use glint::{
    search_once, ContentExtractor, CursorPosition, Direction, Document, FailingOracle, MatchKind,
    OracleError, OracleReply, Outcome, SearchConfig, SearchOrchestrator, StaticOracle, StatusKind, UiEvent,
};

mod cli;
use cli::display::{self, dim, ellipsize, kind_badge, marked, pad_right, row, score_value};
use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Extract { doc, config } => run_extract(&doc, config.as_deref()),
        Commands::Leaves { doc } => run_leaves(&doc),
        Commands::Find {
            doc,
            query,
            snippets,
            fail_oracle,
            next,
            json,
            config,
        } => run_find(FindArgs {
            doc,
            query,
            snippets,
            fail_oracle,
            next,
            json,
            config,
        }),
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    match path {
        Some(path) => SearchConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SearchConfig::default()),
    }
}

fn load_document(path: &Path) -> Result<Document> {
    Document::from_path(path).with_context(|| format!("loading document {}", path.display()))
}

// ═══════════════════════════════════════════════════════════════════════════
// EXTRACT / LEAVES
// ═══════════════════════════════════════════════════════════════════════════

fn run_extract(doc: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let doc = load_document(doc)?;
    let extraction = ContentExtractor::new(&config).build(&doc);
    let stats = extraction.stats;

    display::section_top("CORPUS");
    for paragraph in extraction.text.split("\n\n") {
        for line in wrap(paragraph, display::BOX_WIDTH - 2) {
            row(&format!(" {line}"));
        }
        row("");
    }
    display::section_bot();
    println!(
        "{}",
        dim(&format!(
            "{} blocks, {} chars{}{}",
            stats.blocks,
            stats.chars,
            if stats.truncated { ", truncated" } else { "" },
            if stats.fell_back { ", whole-tree fallback" } else { "" },
        ))
    );
    Ok(())
}

fn run_leaves(doc: &Path) -> Result<()> {
    let doc = load_document(doc)?;
    let mut count = 0;
    display::section_top("LEAVES");
    for leaf in TextLeaves::new(&doc, doc.root()) {
        let text = doc.text(leaf).unwrap_or_default();
        let id = pad_right(&dim(&leaf.to_string()), 8);
        row(&format!(" {id}{}", ellipsize(text.trim(), display::BOX_WIDTH - 10)));
        count += 1;
    }
    display::section_bot();
    println!("{}", dim(&format!("{count} leaves")));
    Ok(())
}

/// Greedy word wrap at `width` chars.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

// ═══════════════════════════════════════════════════════════════════════════
// FIND
// ═══════════════════════════════════════════════════════════════════════════

struct FindArgs {
    doc: PathBuf,
    query: String,
    snippets: Option<String>,
    fail_oracle: bool,
    next: usize,
    json: bool,
    config: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindReport {
    query: String,
    outcome: Outcome,
    position: CursorPosition,
    status: Option<String>,
    matches: Vec<ReportedMatch>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportedMatch {
    kind: MatchKind,
    score: f64,
    text: String,
    markers: usize,
}

/// `--snippets` is inline JSON unless it names an existing file.
///
/// Only reading the file can fail here. A payload that parses to an oracle
/// error is handed to the session like any other reply.
fn read_reply(arg: &str) -> Result<std::result::Result<OracleReply, OracleError>> {
    let path = Path::new(arg);
    let raw = if path.is_file() {
        fs::read_to_string(path).with_context(|| format!("reading snippets {}", path.display()))?
    } else {
        arg.to_string()
    };
    Ok(OracleReply::from_json_str(&raw))
}

fn run_find(args: FindArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let doc = load_document(&args.doc)?;
    let mut session = SearchOrchestrator::new(doc, &config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("starting runtime")?;

    let outcome = if args.fail_oracle {
        runtime.block_on(search_once(&mut session, &FailingOracle::default(), &args.query, config.oracle_timeout()))
    } else {
        let oracle = match args.snippets.as_deref() {
            Some(arg) => StaticOracle::new(read_reply(arg)?),
            None => StaticOracle::no_match(),
        };
        runtime.block_on(search_once(&mut session, &oracle, &args.query, config.oracle_timeout()))
    };
    debug!("find: {outcome:?}");

    for _ in 0..args.next {
        session.navigate(Direction::Next);
    }

    let status = session
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            UiEvent::Status { text, kind } => Some((text, kind)),
            _ => None,
        })
        .last();

    let highlights = session.highlights();
    let matches: Vec<ReportedMatch> = highlights
        .matches()
        .zip(highlights.markers())
        .map(|(m, markers)| ReportedMatch {
            kind: m.kind(),
            score: m.score(),
            text: m.text().to_string(),
            markers: markers.len(),
        })
        .collect();
    let position = session.position();

    if args.json {
        let report = FindReport {
            query: args.query,
            outcome,
            position,
            status: status.map(|(text, _)| text),
            matches,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    display::section_top(&format!("FIND {}", args.query));
    for (i, m) in matches.iter().enumerate() {
        let cursor = if position.current == Some(i) { "▶" } else { " " };
        let text = ellipsize(&m.text, display::BOX_WIDTH - 32);
        row(&format!(
            " {cursor} {} {} {} {}",
            pad_right(&(i + 1).to_string(), 3),
            pad_right(&kind_badge(m.kind), 13),
            score_value(m.score),
            marked(&text),
        ));
    }
    if matches.is_empty() {
        row(&dim(" (nothing highlighted)"));
    }
    display::section_bot();

    let (text, kind) = status.unwrap_or_else(|| ("Idle".to_string(), StatusKind::Info));
    println!("{}  {}", display::status_line(&text, kind), dim(&position.to_string()));
    if matches!(outcome, Outcome::Failed { .. }) {
        std::process::exit(2);
    }
    Ok(())
}
