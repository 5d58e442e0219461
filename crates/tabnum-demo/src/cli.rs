use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde_json::json;
use tabnum_core::{
    EngineConfig, HostEvent, KeyEvent, MemoryStore, Modifiers, ReconcileReport, SettingsEdit,
    SettingsStore, TabNumbersPlugin,
};
use tabnum_harness::{GroupRef, MemoryWorkspace, PaneRef};
use web_time::Instant;

use crate::error::{DemoError, Result};

const VIEW_TYPES: [&str; 4] = ["markdown", "canvas", "pdf", "empty"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "tabnum-demo",
    about = "Simulate a split-pane workspace and print the tab-number badges",
    version
)]
pub struct Cli {
    /// Settings file; edits are persisted here. In-memory when omitted.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Tab groups to create.
    #[arg(long, default_value_t = 2)]
    pub groups: usize,

    /// Tabs per group.
    #[arg(long, default_value_t = 5)]
    pub tabs: usize,

    /// Group (0-based) whose first tab gets focus.
    #[arg(long, default_value_t = 0)]
    pub focus_group: usize,

    /// Close this tab (0-based) of the focused group after the first refresh.
    #[arg(long)]
    pub close: Option<usize>,

    /// Enable or disable badges.
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Badge text color (`#RRGGBB`, empty resets).
    #[arg(long)]
    pub text_color: Option<String>,

    /// Badge background color (`#RRGGBB`, empty resets).
    #[arg(long)]
    pub background_color: Option<String>,

    /// Hold the jump modifier at the end.
    #[arg(long)]
    pub hold: bool,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    fn edits(&self) -> Vec<SettingsEdit> {
        let mut edits = Vec::new();
        if let Some(enabled) = self.enabled {
            edits.push(SettingsEdit::SetEnabled(enabled));
        }
        if let Some(color) = &self.text_color {
            edits.push(SettingsEdit::SetTextColor(color.clone()));
        }
        if let Some(color) = &self.background_color {
            edits.push(SettingsEdit::SetBackgroundColor(color.clone()));
        }
        edits
    }

    fn validate(&self) -> Result<()> {
        if self.groups == 0 {
            return Err(DemoError::Args("--groups must be at least 1".into()));
        }
        if self.focus_group >= self.groups {
            return Err(DemoError::Args(format!(
                "--focus-group {} out of range (groups: {})",
                self.focus_group, self.groups
            )));
        }
        if let Some(close) = self.close
            && close >= self.tabs
        {
            return Err(DemoError::Args(format!(
                "--close {close} out of range (tabs: {})",
                self.tabs
            )));
        }
        Ok(())
    }
}

/// Badge state of one group after the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub labels: Vec<Option<String>>,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub groups: Vec<GroupSummary>,
    pub refreshes: Vec<ReconcileReport>,
}

impl Summary {
    fn to_json(&self) -> serde_json::Value {
        json!({
            "groups": self.groups.iter().map(|group| json!({
                "labels": group.labels,
                "visible": group.visible,
            })).collect::<Vec<_>>(),
            "refreshes": self.refreshes.iter().map(|report| json!({
                "created": report.created,
                "renumbered": report.renumbered,
                "removed": report.removed,
                "kept": report.kept,
            })).collect::<Vec<_>>(),
        })
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for (index, group) in self.groups.iter().enumerate() {
            let cells: Vec<String> = group
                .labels
                .iter()
                .map(|label| format!("[{}]", label.as_deref().unwrap_or(" ")))
                .collect();
            let state = if group.visible { "shown" } else { "hidden" };
            out.push_str(&format!("group {index}: {} ({state})\n", cells.join(" ")));
        }
        for report in &self.refreshes {
            out.push_str(&format!("refresh: {report}\n"));
        }
        out
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    crate::init_logging(cli.log_format);
    run(&cli)
}

pub fn run(cli: &Cli) -> Result<()> {
    cli.validate()?;
    let summary = match &cli.settings {
        Some(path) => simulate(cli, tabnum_core::JsonFileStore::new(path))?,
        None => simulate(cli, MemoryStore::new())?,
    };
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary.to_json())?);
    } else {
        print!("{}", summary.render());
    }
    Ok(())
}

/// Drive the plugin through load, edits, a layout change, and the modifier.
pub fn simulate<S: SettingsStore>(cli: &Cli, store: S) -> Result<Summary> {
    let (mut ws, groups, focused) = build_workspace(cli);
    let config = EngineConfig::from_env();
    let delay = config.refresh_delay;
    let mut now = Instant::now();
    let mut refreshes = Vec::new();

    let mut plugin = TabNumbersPlugin::load(store, config, now);
    for edit in cli.edits() {
        plugin.edit_settings(edit, now)?;
    }
    now += delay;
    refreshes.extend(plugin.poll(&mut ws, now));

    if let Some(index) = cli.close
        && let Some(&pane) = focused.get(index)
    {
        ws.close(pane);
        if let Some(&next) = focused.iter().find(|&&p| p != pane) {
            ws.focus(next);
        }
        plugin.on_event(&mut ws, &HostEvent::LayoutChanged, now);
        plugin.on_event(&mut ws, &HostEvent::ActivePaneChanged, now);
        now += delay;
        refreshes.extend(plugin.poll(&mut ws, now));
    }

    if cli.hold {
        plugin.on_event(&mut ws, &HostEvent::Key(KeyEvent::down(Modifiers::CTRL)), now);
    }

    let summary = Summary {
        groups: groups
            .iter()
            .map(|&group| summarize(&ws, group))
            .collect(),
        refreshes,
    };
    tracing::info!(badges = ws.attached_badges().len(), "simulation finished");
    plugin.unload(&mut ws);
    Ok(summary)
}

fn build_workspace(cli: &Cli) -> (MemoryWorkspace, Vec<GroupRef>, Vec<PaneRef>) {
    let mut ws = MemoryWorkspace::new();
    let groups: Vec<GroupRef> = (0..cli.groups).map(|_| ws.add_group()).collect();
    let mut focused = Vec::new();
    for (index, &group) in groups.iter().enumerate() {
        let panes: Vec<PaneRef> = (0..cli.tabs)
            .map(|tab| ws.open(group, VIEW_TYPES[tab % VIEW_TYPES.len()]))
            .collect();
        if index == cli.focus_group {
            focused = panes;
        }
    }
    if let Some(&first) = focused.first() {
        ws.focus(first);
    }
    (ws, groups, focused)
}

fn summarize(ws: &MemoryWorkspace, group: GroupRef) -> GroupSummary {
    let order = ws.display_order(group);
    GroupSummary {
        labels: ws.labels(group),
        visible: order
            .iter()
            .any(|&pane| ws.badge_visible(pane) == Some(true)),
    }
}
