use std::sync::Arc;

use dbgenie_client::GenerationService;
use dbgenie_core::{ColumnKind, ColumnSpec, OutputFormat, TableSpec};

use crate::CliError;
use crate::run::fetch_artifact;
use crate::tui::state::{App, AppEvent, PaletteEntry};
use crate::tui::utils::{parse_flag, parse_position};
use crate::workspace::{load_draft_into, save_draft};

pub fn execute_command(app: &mut App, input: &str) -> Result<(), CliError> {
    if !input.starts_with('/') {
        return set_context(app, input);
    }

    let mut parts = input.split_whitespace();
    let command = match parts.next() {
        Some(cmd) => cmd,
        None => return Ok(()),
    };
    let args: Vec<&str> = parts.collect();

    match command {
        "/help" => cmd_help(app),
        "/exit" => {
            app.should_quit = true;
            Ok(())
        }
        "/tables" => {
            push_schema_summary(app);
            Ok(())
        }
        "/table" => cmd_table(app, args),
        "/col" => cmd_col(app, args),
        "/rows" => cmd_rows(app, args),
        "/context" => cmd_context(app, input),
        "/format" => cmd_format(app, args),
        "/suggest" => cmd_suggest(app),
        "/generate" => cmd_generate(app),
        "/downloads" => {
            push_downloads(app);
            Ok(())
        }
        "/download" => cmd_download(app, args),
        "/save" => cmd_save(app, args),
        "/load" => cmd_load(app, args),
        _ => {
            app.push_message(format!("unknown command: {command}"));
            Ok(())
        }
    }
}

pub fn cmd_help(app: &mut App) -> Result<(), CliError> {
    app.push_message("COMMANDS");
    app.push_message("schema:");
    app.push_message("  /tables");
    app.push_message("  /table add [name]");
    app.push_message("  /table rm <table>");
    app.push_message("  /table rename <table> <name>");
    app.push_message("  /col add <table> [name] [type]");
    app.push_message("  /col rm <table> <column>");
    app.push_message("  /col set <table> <column> <field> <value>");
    app.push_message("      fields: name, type, options, unique, nullable, chance");
    app.push_message(format!(
        "      types: {}",
        ColumnKind::KNOWN
            .iter()
            .map(ColumnKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    ));
    app.push_message("");
    app.push_message("generation:");
    app.push_message("  /context <text>   (plain text without a slash does the same)");
    app.push_message("  /rows <n>");
    app.push_message("  /format <csv|excel>");
    app.push_message("  /suggest");
    app.push_message("  /generate");
    app.push_message("  /downloads");
    app.push_message("  /download <n|all>");
    app.push_message("");
    app.push_message("drafts:");
    app.push_message("  /save <name>");
    app.push_message("  /load <name>");
    app.push_message("");
    app.push_message("/help");
    app.push_message("/exit");
    app.push_message("tables and columns are numbered from 1, as shown by /tables.");
    Ok(())
}

pub fn push_schema_summary(app: &mut App) {
    let state = app.session.state();
    let mut lines = Vec::new();
    for (table_idx, table) in state.tables().iter().enumerate() {
        lines.push(format!("[{}] {}", table_idx + 1, display_name(&table.name)));
        if table.is_empty() {
            lines.push("    (no columns; skipped on generate)".to_string());
        }
        for (column_idx, column) in table.columns.iter().enumerate() {
            lines.push(format!("    {}. {}", column_idx + 1, column_summary(column)));
        }
    }
    lines.push(format!(
        "rows: {}  format: {}  context: {}",
        state.num_rows,
        state.requested_format,
        state.effective_context()
    ));
    for line in lines {
        app.push_message(line);
    }
}

pub fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        "(unnamed)"
    } else {
        name
    }
}

pub fn column_summary(column: &ColumnSpec) -> String {
    let mut summary = format!("{} [{}]", display_name(&column.name), column.kind);
    if column.unique {
        summary.push_str(" unique");
    }
    if column.nullable {
        summary.push_str(&format!(" nullable {}%", column.nullable_chance));
    }
    let hint = column.options_hint();
    if !column.options.trim().is_empty() {
        summary.push_str(&format!(" options: {}", column.options.trim()));
    } else if hint.visible {
        summary.push_str(&format!(" (options e.g. {})", hint.placeholder));
    }
    summary
}

fn table_position(app: &App, value: Option<&&str>) -> Result<usize, CliError> {
    let index = parse_position(value.copied(), "table")?;
    if app.session.state().table(index).is_none() {
        return Err(CliError::InvalidConfig(format!(
            "no table {}; see /tables",
            index + 1
        )));
    }
    Ok(index)
}

fn column_position(app: &App, table: usize, value: Option<&&str>) -> Result<usize, CliError> {
    let index = parse_position(value.copied(), "column")?;
    let exists = app
        .session
        .state()
        .table(table)
        .and_then(|t| t.column(index))
        .is_some();
    if !exists {
        return Err(CliError::InvalidConfig(format!(
            "no column {} in table {}; see /tables",
            index + 1,
            table + 1
        )));
    }
    Ok(index)
}

fn rest(args: &[&str], from: usize) -> String {
    args.get(from..).map(|words| words.join(" ")).unwrap_or_default()
}

fn cmd_table(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    match args.first().copied() {
        Some("add") => {
            let name = Some(rest(&args, 1)).filter(|name| !name.is_empty());
            let index = app.session.state_mut().add_table(name, Vec::new());
            let name = table_name(app, index);
            app.push_message(format!("added table {}: {name}", index + 1));
        }
        Some("rm") => {
            let index = table_position(app, args.get(1))?;
            let was_last = app.session.state().tables().len() == 1;
            let removed = app.session.state_mut().remove_table(index)?;
            app.push_message(format!("removed table {}", display_name(&removed.name)));
            if was_last {
                let name = table_name(app, 0);
                app.push_message(format!("schema cannot be empty; added {name}"));
            }
        }
        Some("rename") => {
            let index = table_position(app, args.get(1))?;
            let name = rest(&args, 2);
            app.session.state_mut().table_mut(index)?.name = name;
            let name = table_name(app, index);
            app.push_message(format!("table {} renamed to {name}", index + 1));
        }
        _ => app.push_message("usage: /table add [name] | rm <table> | rename <table> <name>"),
    }
    Ok(())
}

fn table_name(app: &App, index: usize) -> String {
    app.session
        .state()
        .table(index)
        .map(|table: &TableSpec| display_name(&table.name).to_string())
        .unwrap_or_default()
}

fn cmd_col(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    match args.first().copied() {
        Some("add") => {
            let table = table_position(app, args.get(1))?;
            let data = args.get(2).map(|name| {
                let kind = args.get(3).map(|kind| ColumnKind::parse(kind));
                ColumnSpec::new(*name).with_kind(kind.unwrap_or_default())
            });
            let index = app.session.state_mut().add_column(table, data)?;
            let summary = app
                .session
                .state()
                .table(table)
                .and_then(|t| t.column(index))
                .map(column_summary)
                .unwrap_or_default();
            app.push_message(format!("added column {}: {summary}", index + 1));
        }
        Some("rm") => {
            let table = table_position(app, args.get(1))?;
            let column = column_position(app, table, args.get(2))?;
            let removed = app.session.state_mut().remove_column(table, column)?;
            app.push_message(format!("removed column {}", display_name(&removed.name)));
            if app
                .session
                .state()
                .table(table)
                .is_some_and(TableSpec::is_empty)
            {
                app.push_message("table has no columns left and will be skipped on generate");
            }
        }
        Some("set") => {
            let table = table_position(app, args.get(1))?;
            let column = column_position(app, table, args.get(2))?;
            let field = args.get(3).copied().unwrap_or_default();
            let value = rest(&args, 4);
            let message = set_column_field(app, table, column, field, &value)?;
            app.push_message(message);
        }
        _ => app.push_message(
            "usage: /col add <table> [name] [type] | rm <table> <column> | set <table> <column> <field> <value>",
        ),
    }
    Ok(())
}

fn set_column_field(
    app: &mut App,
    table: usize,
    column: usize,
    field: &str,
    value: &str,
) -> Result<String, CliError> {
    let target = app.session.state_mut().column_mut(table, column)?;
    let message = match field {
        "name" => {
            target.name = value.to_string();
            format!("column renamed to {}", display_name(&target.name))
        }
        "type" => {
            let hint = target.set_kind(ColumnKind::parse(value));
            if hint.visible {
                format!("type set to {}; options e.g. {}", target.kind, hint.placeholder)
            } else {
                format!("type set to {}; {}", target.kind, hint.placeholder.to_lowercase())
            }
        }
        "options" => {
            target.options = value.to_string();
            if value.is_empty() {
                "options cleared".to_string()
            } else {
                format!("options set to {value}")
            }
        }
        "unique" | "nullable" => {
            let flag = parse_flag(value).ok_or_else(|| {
                CliError::InvalidConfig(format!("{field} expects yes or no, got {value:?}"))
            })?;
            if field == "unique" {
                target.unique = flag;
            } else {
                target.nullable = flag;
            }
            format!("{field} set to {flag}")
        }
        "chance" => {
            let chance = value.parse::<i64>().map_err(|_| {
                CliError::InvalidConfig(format!("chance expects a number, got {value:?}"))
            })?;
            target.set_nullable_chance(chance);
            if target.nullable {
                format!("nullable chance set to {}%", target.nullable_chance)
            } else {
                format!(
                    "nullable chance set to {}% (sent once nullable is on)",
                    target.nullable_chance
                )
            }
        }
        other => {
            return Err(CliError::InvalidConfig(format!(
                "unknown column field {other:?}; use name, type, options, unique, nullable or chance"
            )));
        }
    };
    Ok(message)
}

fn cmd_rows(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let state = app.session.state_mut();
    let message = match args.first() {
        Some(value) => {
            let rows = state.set_num_rows_input(value);
            if value.parse::<u32>().ok() == Some(rows) {
                format!("rows per table: {rows}")
            } else {
                format!("{value:?} is not a positive number; rows per table: {rows}")
            }
        }
        None => format!("rows per table: {}", state.num_rows),
    };
    app.push_message(message);
    Ok(())
}

fn cmd_context(app: &mut App, input: &str) -> Result<(), CliError> {
    let text = input
        .trim_start()
        .strip_prefix("/context")
        .unwrap_or_default()
        .trim();
    if text.is_empty() {
        let context = app.session.state().effective_context().to_string();
        app.push_message(format!("context: {context}"));
        return Ok(());
    }
    set_context(app, text)
}

fn set_context(app: &mut App, text: &str) -> Result<(), CliError> {
    app.session.state_mut().set_database_context(text.trim());
    app.push_message(format!("context: {}", text.trim()));
    app.push_message("use /suggest for table ideas or /generate to submit.");
    Ok(())
}

fn cmd_format(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    if let Some(value) = args.first() {
        app.session.state_mut().requested_format = value.parse::<OutputFormat>()?;
    }
    let current = app.session.state().requested_format;
    let choices = OutputFormat::ALL
        .iter()
        .map(|format| format.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    app.push_message(format!("format: {current} (available: {choices})"));
    Ok(())
}

fn cmd_suggest(app: &mut App) -> Result<(), CliError> {
    let request = app.session.begin_suggestion()?;
    app.push_status();

    let service = Arc::clone(&app.service);
    let tx = app.tx.clone();
    app.runtime.spawn(async move {
        let result = service.suggest_schema(&request).await;
        tx.send(AppEvent::SuggestionDone(result)).ok();
    });
    Ok(())
}

fn cmd_generate(app: &mut App) -> Result<(), CliError> {
    let request = app.session.begin_generation()?;
    app.push_status();

    let service = Arc::clone(&app.service);
    let tx = app.tx.clone();
    app.runtime.spawn(async move {
        let result = service.generate_data(&request).await;
        tx.send(AppEvent::GenerationDone(result)).ok();
    });
    Ok(())
}

/// List the last generation's descriptors with their resolved URLs.
pub fn push_downloads(app: &mut App) {
    let Some(outcome) = app.session.downloads() else {
        app.push_message("nothing generated yet. use /generate.");
        return;
    };
    let mut lines = vec![outcome.message()];
    for (idx, descriptor) in outcome.descriptors().iter().enumerate() {
        let url = app
            .service
            .resolve(&descriptor.url)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| descriptor.url.clone());
        lines.push(format!("  {}. {}  {}", idx + 1, descriptor.label, url));
    }
    if !outcome.descriptors().is_empty() {
        lines.push("use /download <n|all> to save into the workspace.".to_string());
    }
    for line in lines {
        app.push_message(line);
    }
}

fn cmd_download(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let descriptors = app
        .session
        .downloads()
        .map(|outcome| outcome.descriptors().to_vec())
        .unwrap_or_default();
    if descriptors.is_empty() {
        app.push_message("no files to download. use /generate first.");
        return Ok(());
    }

    let selected = match args.first().copied() {
        Some("all") => descriptors,
        value => {
            let index = parse_position(value, "download")?;
            let descriptor = descriptors.get(index).cloned().ok_or_else(|| {
                CliError::InvalidConfig(format!("no download {}; see /downloads", index + 1))
            })?;
            vec![descriptor]
        }
    };

    for descriptor in selected {
        app.downloads_pending += 1;
        app.push_message(format!("downloading {}...", descriptor.filename));
        let service = Arc::clone(&app.service);
        let tx = app.tx.clone();
        let dir = app.paths.downloads_dir.clone();
        app.runtime.spawn(async move {
            let result = fetch_artifact(service.as_ref(), &dir, &descriptor)
                .await
                .map_err(|err| format!("{}: {err}", descriptor.filename));
            tx.send(AppEvent::DownloadDone(result)).ok();
        });
    }
    Ok(())
}

fn cmd_save(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let Some(name) = args.first() else {
        app.push_message("usage: /save <name>");
        return Ok(());
    };
    let path = app.paths.draft_path(name);
    let count = save_draft(&path, app.session.state())?;
    tracing::info!(event = "draft_saved", path = %path.display(), tables = count);
    app.push_message(format!("saved {count} table(s) to {}", path.display()));
    Ok(())
}

fn cmd_load(app: &mut App, args: Vec<&str>) -> Result<(), CliError> {
    let Some(name) = args.first() else {
        app.push_message("usage: /load <name>");
        return Ok(());
    };
    let path = app.paths.draft_path(name);
    let count = load_draft_into(&path, app.session.state_mut())?;
    tracing::info!(event = "draft_loaded", path = %path.display(), tables = count);
    app.push_message(format!("loaded {count} table(s) from {}", path.display()));
    push_schema_summary(app);
    Ok(())
}

pub fn command_palette_matches(app: &App, input: &str) -> Vec<PaletteEntry> {
    if !input.starts_with('/') {
        return Vec::new();
    }
    let query = input.trim_start();

    let sub_entries: Option<Vec<PaletteEntry>> = if query.starts_with("/table ") {
        Some(vec![
            PaletteEntry {
                command: "/table add",
                description: "append a table",
            },
            PaletteEntry {
                command: "/table rm",
                description: "remove a table",
            },
            PaletteEntry {
                command: "/table rename",
                description: "rename a table",
            },
        ])
    } else if query.starts_with("/col ") {
        Some(vec![
            PaletteEntry {
                command: "/col add",
                description: "append a column",
            },
            PaletteEntry {
                command: "/col rm",
                description: "remove a column",
            },
            PaletteEntry {
                command: "/col set",
                description: "edit name, type, options, unique, nullable, chance",
            },
        ])
    } else if query.starts_with("/format ") {
        Some(vec![
            PaletteEntry {
                command: "/format csv",
                description: "comma separated files",
            },
            PaletteEntry {
                command: "/format excel",
                description: "xlsx workbook",
            },
        ])
    } else {
        None
    };

    if let Some(entries) = sub_entries {
        // Once arguments follow the subcommand the palette has nothing to add.
        return entries
            .into_iter()
            .filter(|entry| entry.command.starts_with(query.trim_end()))
            .filter(|entry| entry.command != query.trim_end() || !query.ends_with(' '))
            .collect();
    }

    let query = query.trim();
    let entries = command_palette_entries(app);
    if query == "/" {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| entry.command.starts_with(query))
        .collect()
}

pub fn command_palette_entries(app: &App) -> Vec<PaletteEntry> {
    let mut entries = vec![
        PaletteEntry {
            command: "/tables",
            description: "show the schema",
        },
        PaletteEntry {
            command: "/table",
            description: "add, remove or rename tables",
        },
        PaletteEntry {
            command: "/col",
            description: "add, remove or edit columns",
        },
        PaletteEntry {
            command: "/context",
            description: "describe the database",
        },
        PaletteEntry {
            command: "/rows",
            description: "rows per table",
        },
        PaletteEntry {
            command: "/format",
            description: "csv or excel",
        },
        PaletteEntry {
            command: "/suggest",
            description: "ask AI for tables",
        },
        PaletteEntry {
            command: "/generate",
            description: "submit schema for data",
        },
    ];

    if app.session.downloads().is_some() {
        entries.push(PaletteEntry {
            command: "/downloads",
            description: "list generated files",
        });
        entries.push(PaletteEntry {
            command: "/download",
            description: "save generated files",
        });
    }
    entries.push(PaletteEntry {
        command: "/save",
        description: "save schema draft",
    });
    entries.push(PaletteEntry {
        command: "/load",
        description: "load schema draft",
    });
    entries.push(PaletteEntry {
        command: "/help",
        description: "show command list",
    });
    entries.push(PaletteEntry {
        command: "/exit",
        description: "quit",
    });

    entries
}
