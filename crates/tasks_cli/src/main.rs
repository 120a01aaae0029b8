use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cute_tasks_cli::cli::{Cli, Command, collect_overrides};
use cute_tasks_cli::render;
use cute_tasks_core::celebrate::{Celebrator, celebration_message, celebrator_from_env};
use cute_tasks_core::config::{Config, load_config_with_fallback, merge_overrides};
use cute_tasks_core::controller::CommitOutcome;
use cute_tasks_core::{AppError, Controller, Task, TaskId};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

struct Session {
    controller: Controller,
    config: Config,
    celebrator: Box<dyn Celebrator>,
}

fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}

fn open_session(raw_overrides: &[String]) -> Result<Session, AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        log::warn!("ignoring configuration file: {err}");
    }

    let overrides = collect_overrides(raw_overrides).map_err(AppError::invalid_input)?;
    let config = merge_overrides(&loaded.config, &overrides);
    let controller = Controller::open(&config)?;

    Ok(Session {
        controller,
        config,
        celebrator: celebrator_from_env(),
    })
}

/// Finds the task whose id renders as `raw`, falling back to parsing it.
fn resolve_id(controller: &Controller, raw: &str) -> TaskId {
    let trimmed = raw.trim();
    controller
        .tasks()
        .iter()
        .find(|task| task.id.to_string() == trimmed)
        .map(|task| task.id.clone())
        .unwrap_or_else(|| TaskId::parse(trimmed))
}

fn ask_confirmation(input: &mut dyn BufRead, task: &Task) -> Result<bool, AppError> {
    print!("Delete this task? \"{}\" [y/N] ", task.text);
    io::stdout()
        .flush()
        .map_err(|err| AppError::io(err.to_string()))?;

    let mut answer = String::new();
    let bytes = input
        .read_line(&mut answer)
        .map_err(|err| AppError::io(err.to_string()))?;
    if bytes == 0 {
        println!();
        return Ok(false);
    }

    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Answers a pending delete confirmation. Returns the removed task, if the
/// user agreed.
fn settle_delete(
    session: &mut Session,
    id: &TaskId,
    assume_yes: bool,
    input: &mut dyn BufRead,
) -> Result<Option<Task>, AppError> {
    let Some(task) = session.controller.tasks().iter().find(|task| &task.id == id).cloned()
    else {
        session.controller.cancel_delete(id);
        return Ok(None);
    };

    let answer = if assume_yes {
        Ok(true)
    } else {
        ask_confirmation(input, &task)
    };

    match answer {
        Ok(true) => Ok(session.controller.confirm_delete(id)),
        Ok(false) => {
            session.controller.cancel_delete(id);
            Ok(None)
        }
        Err(err) => {
            session.controller.cancel_delete(id);
            Err(err)
        }
    }
}

fn print_task_json(key: &str, task: Option<&Task>, session: &Session) {
    let json = serde_json::json!({
        key: task,
        "counts": render::counts_json(&session.controller.counts()),
    });
    println!("{json}");
}

fn print_counters(session: &Session) {
    println!(
        "{}",
        render::counters_line(&session.controller.counts())
    );
}

fn print_list(session: &Session, json: bool) {
    let controller = &session.controller;
    let visible = controller.visible_tasks();
    let counts = controller.counts();
    if json {
        println!(
            "{}",
            render::list_json(controller.filter(), &visible, &counts)
        );
    } else {
        println!("Filter: {}", controller.filter());
        println!("{}", render::task_table(&visible));
        println!("{}", render::counters_line(&counts));
    }
}

fn print_delete_result(session: &Session, removed: Option<&Task>, json: bool) {
    if json {
        print_task_json("deleted", removed, session);
        return;
    }
    if let Some(task) = removed {
        println!("Deleted task: {} ({})", task.text, task.id);
    }
    print_counters(session);
}

fn celebrate(session: &Session) {
    let counts = session.controller.counts();
    println!("{}", celebration_message(&counts));
    if let Err(err) = session.celebrator.celebrate(&counts) {
        log::warn!("celebration notification failed: {err}");
    }
}

fn export_path(session: &Session, path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from(session.config.export_file()))
}

fn run_command(session: &mut Session, cli: Cli, input: &mut dyn BufRead) -> Result<(), AppError> {
    let json = cli.json;

    match cli.command {
        Command::Add { text } => {
            let task = session.controller.add(text.as_deref().unwrap_or_default())?;
            if json {
                print_task_json("task", Some(&task), session);
            } else {
                println!("Added task: {} ({})", task.text, task.id);
                print_counters(session);
            }
        }
        Command::Toggle { id } => {
            let id = resolve_id(&session.controller, &id);
            let toggled = session.controller.toggle_completed(&id)?;
            let celebrating = toggled.as_ref().is_some_and(|task| task.completed)
                && session.controller.should_celebrate();
            if json {
                let json = serde_json::json!({
                    "task": toggled,
                    "counts": render::counts_json(&session.controller.counts()),
                    "celebrate": celebrating,
                });
                println!("{json}");
            } else {
                if let Some(task) = toggled.as_ref() {
                    let verb = if task.completed { "Completed" } else { "Reopened" };
                    println!("{verb} task: {} ({})", task.text, task.id);
                }
                print_counters(session);
            }
            if celebrating {
                if json {
                    if let Err(err) = session.celebrator.celebrate(&session.controller.counts()) {
                        log::warn!("celebration notification failed: {err}");
                    }
                } else {
                    celebrate(session);
                }
            }
        }
        Command::Edit { id, text } => {
            let id = resolve_id(&session.controller, &id);
            session.controller.begin_edit(&id);
            match session.controller.commit_edit(&id, &text)? {
                CommitOutcome::Updated(task) => {
                    if json {
                        print_task_json("task", Some(&task), session);
                    } else {
                        println!("Updated task: {} ({})", task.text, task.id);
                        print_counters(session);
                    }
                }
                CommitOutcome::DeleteRequested(id) => {
                    let removed = settle_delete(session, &id, cli.yes, input)?;
                    print_delete_result(session, removed.as_ref(), json);
                }
                CommitOutcome::NotFound => {
                    if json {
                        print_task_json("task", None, session);
                    } else {
                        print_counters(session);
                    }
                }
            }
        }
        Command::Delete { id } => {
            let id = resolve_id(&session.controller, &id);
            let removed = if session.controller.request_delete(&id)? {
                settle_delete(session, &id, cli.yes, input)?
            } else {
                None
            };
            print_delete_result(session, removed.as_ref(), json);
        }
        Command::ClearCompleted => {
            let cleared = session.controller.clear_completed()?;
            if json {
                let json = serde_json::json!({
                    "cleared": cleared,
                    "counts": render::counts_json(&session.controller.counts()),
                });
                println!("{json}");
            } else {
                println!("Cleared {cleared} completed task(s)");
                print_counters(session);
            }
        }
        Command::List { filter } => {
            if let Some(name) = filter {
                session.controller.set_filter(&name)?;
            }
            print_list(session, json);
        }
        Command::Filter { name } => {
            session.controller.set_filter(&name)?;
            print_list(session, json);
        }
        Command::Stats => {
            let counts = session.controller.counts();
            if json {
                let json = serde_json::json!({
                    "counts": render::counts_json(&counts),
                    "celebrate": session.controller.should_celebrate(),
                });
                println!("{json}");
            } else {
                println!("{}", render::counters_line(&counts));
            }
        }
        Command::Export { path } => {
            let document = session.controller.export_tasks()?;
            let path = export_path(session, path);
            if path.as_os_str() == "-" {
                println!("{document}");
                return Ok(());
            }

            std::fs::write(&path, document)
                .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
            let exported = session.controller.tasks().len();
            if json {
                let json = serde_json::json!({
                    "exported": exported,
                    "path": path.display().to_string(),
                });
                println!("{json}");
            } else {
                println!("Exported {exported} task(s) to {}", path.display());
            }
        }
        Command::Import { path } => {
            let document = std::fs::read_to_string(&path)
                .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
            let imported = session.controller.import_tasks(&document)?;
            if json {
                let json = serde_json::json!({
                    "imported": imported,
                    "counts": render::counts_json(&session.controller.counts()),
                });
                println!("{json}");
            } else {
                println!("Imported {imported} task(s)");
                print_counters(session);
            }
        }
    }

    Ok(())
}

/// First line of clap's report, without its `error:` prefix.
fn parse_failure(err: &clap::Error) -> AppError {
    let rendered = err.render().to_string();
    let detail = rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error:").trim())
        .unwrap_or("could not read that command");
    AppError::invalid_input(detail)
}

/// Splits a REPL line into arguments. Double quotes group words and may
/// hold `\"` and `\\`; `""` is an empty argument.
fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let unterminated = || AppError::invalid_input("unterminated quote in command");
    let mut args = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|ch| ch.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            return Ok(args);
        }

        let mut word = String::new();
        while let Some(ch) = chars.next_if(|ch| !ch.is_whitespace()) {
            if ch != '"' {
                word.push(ch);
                continue;
            }
            loop {
                match chars.next().ok_or_else(unterminated)? {
                    '"' => break,
                    '\\' => match chars.next().ok_or_else(unterminated)? {
                        escaped @ ('"' | '\\') => word.push(escaped),
                        other => {
                            word.push('\\');
                            word.push(other);
                        }
                    },
                    other => word.push(other),
                }
            }
        }
        args.push(word);
    }
}

fn print_repl_help() {
    println!("{}", Cli::command().render_long_help());
    println!("Type `exit` or `quit` to leave. Quote text with spaces: add \"buy oat milk\"");
}

fn run_interactive(session: &mut Session) -> Result<(), AppError> {
    let mut line = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        line.clear();
        let bytes = stdin_lock
            .read_line(&mut line)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        if command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit") {
            break;
        }

        if command == "help" || command == "?" {
            print_repl_help();
            continue;
        }

        let args = match split_command_line(command) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("cute_tasks".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                println!("{err}");
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", parse_failure(&err));
                continue;
            }
        };

        if !cli.config_override.is_empty() {
            eprintln!(
                "ERROR: {}",
                AppError::invalid_input("configuration overrides only apply when starting a session")
            );
            continue;
        }

        if let Err(err) = run_command(session, cli, &mut stdin_lock) {
            eprintln!("ERROR: {err}");
        }
    }

    Ok(())
}

fn main() {
    setup_logging();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        let result = open_session(&[]).and_then(|mut session| run_interactive(&mut session));
        if let Err(err) = result {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", parse_failure(&err));
            std::process::exit(1);
        }
    };

    let result = open_session(&cli.config_override).and_then(|mut session| {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        run_command(&mut session, cli, &mut input)
    });

    if let Err(err) = result {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
