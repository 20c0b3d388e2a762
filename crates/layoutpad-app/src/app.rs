//! Command-line options, application configuration and the headless command
//! runner.

use crate::file_sink::{FileSink, FileSinkError, HTML_MIME, JSON_MIME};
use crate::panel::{layer_rows, PanelError, PropertyField};
use clap::{Parser, Subcommand, ValueEnum};
use layoutpad_core::{Editor, EditorConfig, ElementId, ElementKind, KeyValueStore, LayoutError};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No element labelled {0:?}")]
    NoSuchElement(String),
    #[error("Failed to read config {path:?}: {message}")]
    Config { path: PathBuf, message: String },
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error(transparent)]
    Export(#[from] FileSinkError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Parser, Debug)]
#[command(name = "layoutpad", about = "Edit a LayoutPad layout from the command line")]
pub struct Cli {
    /// Editor settings as a JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where the layout is stored. Platform data dir if unset
    #[arg(long, value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Write exports here instead of asking with a dialog
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Resolve the options into a configuration. No subcommand means `layers`.
    pub fn into_parts(self) -> AppResult<(AppConfig, Command)> {
        let config = AppConfig::from_cli(&self)?;
        Ok((config, self.command.unwrap_or(Command::Layers)))
    }
}

/// One headless editor command.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List elements, top of stack first
    Layers,
    /// Add an element and select it
    Add {
        #[arg(value_enum)]
        kind: KindArg,
    },
    /// Edit width, height, bg, text or rotate
    Set {
        label: String,
        #[arg(value_parser = PropertyField::from_input_id)]
        field: PropertyField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Move an element one step up the stack
    Raise { label: String },
    /// Move an element one step down the stack
    Lower { label: String },
    /// Export the layout as JSON
    ExportJson,
    /// Export the layout as static HTML
    ExportHtml,
}

/// Element kinds as typed on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Rect,
    Text,
}

impl From<KindArg> for ElementKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Rect => ElementKind::Rectangle,
            KindArg::Text => ElementKind::Text,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub editor: EditorConfig,
    /// Where the layout is stored. Platform data dir if unset.
    pub data_dir: Option<PathBuf>,
    /// Write exports here instead of asking with a dialog.
    pub out_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "LayoutPad".to_string(),
            editor: EditorConfig::default(),
            data_dir: None,
            out_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> AppResult<Self> {
        let mut config = Self {
            data_dir: cli.data.clone(),
            out_dir: cli.out.clone(),
            ..Self::default()
        };
        if let Some(path) = &cli.config {
            config.load_editor_config(path)?;
        }
        Ok(config)
    }

    /// Replace the editor settings with those in a JSON file.
    pub fn load_editor_config(&mut self, path: &Path) -> AppResult<()> {
        let config_error = |message: String| AppError::Config {
            path: path.to_path_buf(),
            message,
        };
        let json = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        self.editor = EditorConfig::from_json(&json).map_err(|e| config_error(e.to_string()))?;
        log::info!("Loaded editor config from {:?}", path);
        Ok(())
    }
}

fn find_by_label<S: KeyValueStore>(editor: &Editor<S>, label: &str) -> AppResult<ElementId> {
    editor
        .document()
        .elements()
        .iter()
        .find(|e| e.label == label)
        .map(|e| e.id())
        .ok_or_else(|| AppError::NoSuchElement(label.to_string()))
}

/// Run one command against the editor, printing results to `out`.
pub fn run_command<S: KeyValueStore>(
    editor: &mut Editor<S>,
    command: Command,
    sink: &mut dyn FileSink,
    out: &mut dyn Write,
) -> AppResult<()> {
    match command {
        Command::Layers => {
            if editor.document().is_empty() {
                writeln!(out, "(empty layout)")?;
            }
            for element in editor.layer_list() {
                writeln!(
                    out,
                    "{:<10} z={:<3} x={} y={} {}x{} rot={} fill={}",
                    element.label,
                    element.z_order,
                    element.position.x,
                    element.position.y,
                    element.width,
                    element.height,
                    element.rotation,
                    element.fill,
                )?;
            }
        }
        Command::Add { kind } => {
            editor.add_element(kind.into());
            if let Some(element) = editor.selected_element() {
                writeln!(out, "Added {}", element.label)?;
            }
        }
        Command::Set { label, field, value } => {
            let edit = field.parse(&value)?;
            let id = find_by_label(editor, &label)?;
            editor.select(id);
            editor.update_property(edit);
            writeln!(out, "Updated {}", label)?;
        }
        Command::Raise { label } => {
            let id = find_by_label(editor, &label)?;
            editor.select(id);
            editor.raise();
            print_stack(editor, out)?;
        }
        Command::Lower { label } => {
            let id = find_by_label(editor, &label)?;
            editor.select(id);
            editor.lower();
            print_stack(editor, out)?;
        }
        Command::ExportJson => {
            let json = editor.export_json()?;
            let name = editor.config().json_export_name.clone();
            sink.save(&name, &json, JSON_MIME)?;
            writeln!(out, "Exported {}", name)?;
        }
        Command::ExportHtml => {
            let html = editor.export_markup();
            let name = editor.config().markup_export_name.clone();
            sink.save(&name, &html, HTML_MIME)?;
            writeln!(out, "Exported {}", name)?;
        }
    }
    Ok(())
}

fn print_stack<S: KeyValueStore>(editor: &Editor<S>, out: &mut dyn Write) -> AppResult<()> {
    let labels: Vec<String> = layer_rows(editor)
        .into_iter()
        .map(|row| if row.selected { format!("[{}]", row.label) } else { row.label })
        .collect();
    writeln!(out, "{}", labels.join(" > "))?;
    Ok(())
}
