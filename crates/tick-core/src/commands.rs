use anyhow::anyhow;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::cli::Invocation;
use crate::config::Config;
use crate::error::Error;
use crate::filter::FilterMode;
use crate::render::{Renderer, short_id};
use crate::session::Session;
use crate::task::Task;

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add", "toggle", "done", "remove", "delete", "clear", "list", "theme", "config",
        "version", "help",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Add(String),
    Toggle(Uuid),
    Remove(Uuid),
    ClearCompleted,
    SetFilter(FilterMode),
    ToggleTheme,
    List,
    ShowConfig,
    Version,
    Help,
}

impl Command {
    // None means an id argument resolved to no live task; the dispatcher
    // reports that as a no-op rather than an error.
    pub fn from_invocation(inv: &Invocation, tasks: &[Task]) -> anyhow::Result<Option<Self>> {
        let args = &inv.command_args;
        let command = match inv.command.as_str() {
            "add" => Self::Add(args.join(" ")),
            "toggle" | "done" => match resolve_task_id(tasks, args)? {
                Some(id) => Self::Toggle(id),
                None => return Ok(None),
            },
            "remove" | "delete" => match resolve_task_id(tasks, args)? {
                Some(id) => Self::Remove(id),
                None => return Ok(None),
            },
            "clear" => Self::ClearCompleted,
            "list" => match args.first() {
                Some(raw) => Self::SetFilter(raw.parse()?),
                None => Self::List,
            },
            "theme" => Self::ToggleTheme,
            "config" => Self::ShowConfig,
            "version" => Self::Version,
            "help" => Self::Help,
            other => return Err(anyhow!("unknown command: {other}")),
        };

        Ok(Some(command))
    }
}

#[instrument(skip(session, cfg, renderer, inv))]
pub fn dispatch(
    session: &mut Session,
    cfg: &Config,
    renderer: &mut Renderer,
    inv: Invocation,
) -> anyhow::Result<()> {
    debug!(command = %inv.command, args = ?inv.command_args, "dispatching command");

    let Some(command) = Command::from_invocation(&inv, session.tasks())? else {
        println!("No matching task.");
        return Ok(());
    };

    match command {
        Command::Add(text) => cmd_add(session, &text),
        Command::Toggle(id) => cmd_toggle(session, id),
        Command::Remove(id) => cmd_remove(session, id),
        Command::ClearCompleted => cmd_clear(session),
        Command::SetFilter(mode) => {
            session.set_filter(mode);
            renderer.print_snapshot(&session.snapshot())
        }
        Command::List => renderer.print_snapshot(&session.snapshot()),
        Command::ToggleTheme => {
            let mode = session.toggle_theme();
            println!("Theme set to {mode}.");
            Ok(())
        }
        Command::ShowConfig => cmd_config(cfg),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Help => cmd_help(),
    }
}

#[instrument(skip(session, text))]
fn cmd_add(session: &mut Session, text: &str) -> anyhow::Result<()> {
    info!("command add");

    let task = session.add(text)?;
    println!("Created task {}.", short_id(task.id));
    Ok(())
}

#[instrument(skip(session), fields(id = %id))]
fn cmd_toggle(session: &mut Session, id: Uuid) -> anyhow::Result<()> {
    info!("command toggle");

    match session.toggle(id) {
        Ok(task) if task.completed => println!("Completed task {}.", short_id(task.id)),
        Ok(task) => println!("Reopened task {}.", short_id(task.id)),
        // A stale id is a no-op, not a failure.
        Err(Error::TaskNotFound(_)) => println!("No matching task."),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

#[instrument(skip(session), fields(id = %id))]
fn cmd_remove(session: &mut Session, id: Uuid) -> anyhow::Result<()> {
    info!("command remove");

    match session.remove(id) {
        Ok(task) => println!("Removed task {}.", short_id(task.id)),
        Err(Error::TaskNotFound(_)) => println!("No matching task."),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

#[instrument(skip(session))]
fn cmd_clear(session: &mut Session) -> anyhow::Result<()> {
    info!("command clear");

    let removed = session.clear_completed();
    println!("Cleared {removed} completed task(s).");
    Ok(())
}

fn cmd_config(cfg: &Config) -> anyhow::Result<()> {
    for (k, v) in cfg.iter() {
        println!("{k}={v}");
    }
    Ok(())
}

fn cmd_help() -> anyhow::Result<()> {
    println!(
        "Implemented commands: add, toggle/done, remove/delete, clear, list [all|active|completed], theme, config, version, help"
    );
    Ok(())
}

fn resolve_task_id(tasks: &[Task], args: &[String]) -> anyhow::Result<Option<Uuid>> {
    let Some(token) = args.first() else {
        return Err(anyhow!("a task id (or unambiguous prefix) is required"));
    };

    if let Ok(id) = Uuid::parse_str(token) {
        return Ok(Some(id));
    }

    let needle = token.to_ascii_lowercase();
    let mut matches = tasks
        .iter()
        .filter(|task| task.id.to_string().starts_with(&needle));

    let Some(first) = matches.next() else {
        debug!(token = %token, "no task id matches");
        return Ok(None);
    };
    if matches.next().is_some() {
        return Err(anyhow!("task id prefix is ambiguous: {token}"));
    }

    Ok(Some(first.id))
}

#[cfg(test)]
mod tests {
    use super::{expand_command_abbrev, known_command_names, resolve_task_id};
    use crate::task::Task;

    #[test]
    fn abbreviations_expand_only_when_unambiguous() {
        let known = known_command_names();

        assert_eq!(expand_command_abbrev("add", &known), Some("add"));
        assert_eq!(expand_command_abbrev("to", &known), Some("toggle"));
        assert_eq!(expand_command_abbrev("cl", &known), Some("clear"));
        assert_eq!(expand_command_abbrev("l", &known), Some("list"));

        // "t" could start toggle or theme, "d" done or delete.
        assert_eq!(expand_command_abbrev("t", &known), None);
        assert_eq!(expand_command_abbrev("d", &known), None);
        assert_eq!(expand_command_abbrev("frobnicate", &known), None);
    }

    #[test]
    fn task_ids_resolve_by_unambiguous_prefix() {
        let tasks = vec![Task::new("a".to_string()), Task::new("b".to_string())];

        let full = tasks[0].id.to_string();
        let resolved = resolve_task_id(&tasks, &[full[..8].to_string()])
            .expect("resolve prefix");
        assert_eq!(resolved, Some(tasks[0].id));

        // An empty prefix matches every task.
        assert!(resolve_task_id(&tasks, &["".to_string()]).is_err());

        let resolved = resolve_task_id(&tasks, &["zzzz".to_string()]).expect("resolve miss");
        assert_eq!(resolved, None);
    }
}
