//! # CLI Layer
//!
//! This module is **one possible UI client** for medrec. It is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Initializes the logger
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Initialize `AppContext` with the API and configuration
//! 3. **API Dispatch**: Call the appropriate `MedrecApi` method
//! 4. **Output Formatting**: Convert `CmdResult` into terminal text or JSON
//! 5. **Error Handling**: Errors bubble up to `main`, which prints them and exits 1
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` from the data directory
//! - `handle_*()`: Per-command handlers that call the API and print output

use super::render::{
    render_list, render_messages, render_record, render_stats, render_user, result_value,
};
use super::setup::{
    AccountCommands, AddArgs, Cli, Commands, ConfigCommands, DataCommands, FilterArgs, FormatArg,
    ListArgs, MiscCommands, RecordCommands,
};
use anyhow::{bail, Result};
use chrono::Local;
use clap::Parser;
use medrec::auth::{Credentials, UserPatch};
use medrec::codec::ImportFormat;
use medrec::commands::export::default_path;
use medrec::commands::CmdResult;
use medrec::config::MedrecConfig;
use medrec::init::{initialize, MedrecContext};
use medrec::model::{NewRecord, RecordField};
use medrec::stats::TimeRange;
use medrec::table::{FilterSet, SortConfig, TableConfig, TableState};
use std::path::PathBuf;

struct AppContext {
    ctx: MedrecContext,
    json: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // The template needs no data directory.
    if let Some(Commands::Misc(MiscCommands::Config {
        action: Some(ConfigCommands::Template),
    })) = &cli.command
    {
        print!("{}", MedrecConfig::template());
        return Ok(());
    }

    let mut app = init_context(&cli)?;

    match cli.command {
        Some(Commands::Account(cmd)) => match cmd {
            AccountCommands::Login { username, password } => {
                handle_login(&mut app, username, password)
            }
            AccountCommands::Logout => handle_logout(&mut app),
            AccountCommands::Whoami => handle_whoami(&app),
            AccountCommands::Profile {
                name,
                email,
                avatar,
            } => handle_profile(&mut app, UserPatch { name, email, avatar }),
        },
        Some(Commands::Record(cmd)) => match cmd {
            RecordCommands::Add(args) => handle_add(&mut app, args),
            RecordCommands::List(args) => handle_list(&app, args),
            RecordCommands::Show { selector } => handle_show(&app, &selector),
            RecordCommands::Edit {
                selector,
                field,
                value,
            } => handle_edit(&mut app, &selector, field, &value),
            RecordCommands::Delete { selector } => handle_delete(&mut app, &selector),
            RecordCommands::Undo => handle_undo(&mut app),
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Export {
                format,
                output,
                stdout,
                filters,
            } => handle_export(&app, format, output, stdout, filters),
            DataCommands::Import { path } => handle_import(&mut app, path),
            DataCommands::Stats { range } => handle_stats(&app, range),
        },
        Some(Commands::Misc(MiscCommands::Config { .. })) => handle_config(&app),
        None => handle_list(&app, ListArgs::default()),
    }
}

/// `warn` by default, `debug` with `--verbose`; `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    // A logger already installed (e.g. by a test harness) is not an error.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let ctx = initialize(cli.data_dir.clone())?;
    Ok(AppContext {
        ctx,
        json: cli.json,
    })
}

/// Prints `result` as JSON or through `render`.
fn emit(
    app: &AppContext,
    action: &str,
    result: &CmdResult,
    render: impl FnOnce(&CmdResult) -> String,
) -> Result<()> {
    if app.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result_value(action, result))?
        );
    } else {
        print!("{}", render(result));
    }
    Ok(())
}

fn messages_only(result: &CmdResult) -> String {
    render_messages(&result.messages)
}

fn handle_login(app: &mut AppContext, username: String, password: String) -> Result<()> {
    let result = app
        .ctx
        .api
        .login(&Credentials::new(username, password))?;
    emit(app, "login", &result, messages_only)
}

fn handle_logout(app: &mut AppContext) -> Result<()> {
    let result = app.ctx.api.logout()?;
    emit(app, "logout", &result, messages_only)
}

fn handle_whoami(app: &AppContext) -> Result<()> {
    let result = app.ctx.api.whoami()?;
    emit(app, "whoami", &result, |r| {
        r.user.as_ref().map(render_user).unwrap_or_default()
    })
}

fn handle_profile(app: &mut AppContext, patch: UserPatch) -> Result<()> {
    if patch.name.is_none() && patch.email.is_none() && patch.avatar.is_none() {
        bail!("Nothing to update: pass --name, --email or --avatar");
    }
    let result = app.ctx.api.update_profile(patch)?;
    emit(app, "profile", &result, |r| {
        let mut out = messages_only(r);
        if let Some(user) = &r.user {
            out.push_str(&render_user(user));
        }
        out
    })
}

fn handle_add(app: &mut AppContext, args: AddArgs) -> Result<()> {
    let new = NewRecord {
        name: args.name,
        uid: args.uid,
        phone: args.phone,
        address: args.address,
        height: args.height,
        weight: args.weight,
        picture_url: args.picture_url,
        blood_group: args.blood_group,
        emergency_contact: args.emergency_contact,
        medical_history: args.medical_history,
        notes: args.notes,
        date_of_birth: args.date_of_birth.filter(|d| !d.is_empty()),
    };
    let result = app.ctx.api.create_record(new)?;
    emit(app, "add", &result, messages_only)
}

fn filter_set(args: FilterArgs) -> FilterSet {
    let mut filters = FilterSet::new();
    for (field, value) in args.filters {
        filters.set(field, value);
    }
    if let Some(search) = args.search {
        filters.set_search(search);
    }
    filters
}

fn table_state(args: ListArgs, config: &MedrecConfig) -> TableState {
    let page_size = args.page_size.unwrap_or_else(|| config.page_size());
    let mut state = TableState::new(TableConfig::with_page_size(page_size));
    state.filters = filter_set(args.filters);
    state.config.sort = args.sort.map(|key| {
        if args.desc {
            SortConfig::desc(key)
        } else {
            SortConfig::asc(key)
        }
    });
    state.config.go_to_page(args.page);
    state
}

fn handle_list(app: &AppContext, args: ListArgs) -> Result<()> {
    let state = table_state(args, &app.ctx.config);
    let result = app.ctx.api.list_records(&state)?;
    emit(app, "list", &result, render_list)
}

fn handle_show(app: &AppContext, selector: &str) -> Result<()> {
    let result = app.ctx.api.view_record(selector)?;
    emit(app, "show", &result, |r| {
        r.listed_records.iter().map(render_record).collect()
    })
}

fn handle_edit(app: &mut AppContext, selector: &str, field: RecordField, value: &str) -> Result<()> {
    let result = app.ctx.api.update_record(selector, field, value)?;
    emit(app, "edit", &result, messages_only)
}

fn handle_delete(app: &mut AppContext, selector: &str) -> Result<()> {
    let result = app.ctx.api.delete_record(selector)?;
    emit(app, "delete", &result, messages_only)
}

fn handle_undo(app: &mut AppContext) -> Result<()> {
    let result = app.ctx.api.undo_delete()?;
    emit(app, "undo", &result, messages_only)
}

fn handle_export(
    app: &AppContext,
    format: FormatArg,
    output: Option<PathBuf>,
    stdout: bool,
    filters: FilterArgs,
) -> Result<()> {
    let format = ImportFormat::from(format);
    let filters = filter_set(filters);
    if stdout {
        print!("{}", app.ctx.api.render_export(format, &filters)?);
        return Ok(());
    }
    let path = output.unwrap_or_else(|| {
        default_path(
            &app.ctx.config.export_dir(),
            format,
            Local::now().date_naive(),
        )
    });
    let result = app.ctx.api.export_records(format, &filters, &path)?;
    emit(app, "export", &result, messages_only)
}

fn handle_import(app: &mut AppContext, path: PathBuf) -> Result<()> {
    let result = app.ctx.api.import_records(&path)?;
    emit(app, "import", &result, messages_only)
}

fn handle_stats(app: &AppContext, range: TimeRange) -> Result<()> {
    let result = app.ctx.api.stats(range, Local::now().date_naive())?;
    emit(app, "stats", &result, |r| {
        r.stats.as_ref().map(render_stats).unwrap_or_default()
    })
}

fn handle_config(app: &AppContext) -> Result<()> {
    let config = &app.ctx.config;
    if app.json {
        let value = serde_json::json!({
            "page_size": config.page_size(),
            "data_dir": app.ctx.data_dir,
            "export_dir": config.export_dir(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("page_size = {}", config.page_size());
        println!("data_dir = {}", app.ctx.data_dir.display());
        println!("export_dir = {}", config.export_dir().display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use medrec::table::SortDirection;

    #[test]
    fn test_table_state_keeps_requested_page_after_filters() {
        let args = ListArgs {
            filters: FilterArgs {
                search: Some("ada".into()),
                filters: vec![(RecordField::BloodGroup, "O+".into())],
            },
            sort: Some(RecordField::Name),
            desc: true,
            page: 3,
            page_size: Some(5),
        };
        let state = table_state(args, &MedrecConfig::default());
        assert_eq!(state.config.page, 3);
        assert_eq!(state.config.page_size, 5);
        assert_eq!(state.filters.search(), "ada");
        assert_eq!(state.filters.get(RecordField::BloodGroup), Some("O+"));
        let sort = state.config.sort.unwrap();
        assert_eq!(sort.key, RecordField::Name);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_table_state_uses_config_page_size() {
        let config = MedrecConfig {
            page_size: 25,
            ..Default::default()
        };
        let state = table_state(ListArgs::default(), &config);
        assert_eq!(state.config.page_size, 25);
        assert_eq!(state.config.page, 1);
        assert!(state.config.sort.is_none());
    }
}
