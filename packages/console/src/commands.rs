//! Console command parsing and execution.
//!
//! Commands:
//! - `list` - Reload and show the collection (alias: `ls`)
//! - `show <n|id>` - Show a listed object
//! - `get <id>` - Fetch one object from the server
//! - `add <name> [| fields]` - Create an object
//! - `edit <n|id>` - Start editing a listed object
//! - `save [name] [| fields]` - Send the edit; omitted fields stay as they are
//! - `cancel` - Drop the edit
//! - `delete <n|id>` - Delete an object (alias: `rm`)
//! - `status` - Show connection and operation state
//! - `help`, `exit`
//!
//! Fields are free `key:value` text, e.g. `add Widget | color:blue, price:9`.

use nu_ansi_term::{Color, Style};

use restcrud_core::{OperationKind, Resource, ResourceCollection, Slot, NO_DATA};
use restcrud_http::HttpExecutor;

use crate::context::ConsoleContext;

/// One entry of the command table.
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub args: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "list",
        aliases: &["ls"],
        args: "",
        description: "Reload and show all objects",
    },
    CommandSpec {
        name: "show",
        aliases: &[],
        args: "<n|id>",
        description: "Show a listed object",
    },
    CommandSpec {
        name: "get",
        aliases: &[],
        args: "<id>",
        description: "Fetch one object from the server",
    },
    CommandSpec {
        name: "add",
        aliases: &[],
        args: "<name> [| fields]",
        description: "Create an object",
    },
    CommandSpec {
        name: "edit",
        aliases: &[],
        args: "<n|id>",
        description: "Start editing a listed object",
    },
    CommandSpec {
        name: "save",
        aliases: &[],
        args: "[name] [| fields]",
        description: "Send the pending edit",
    },
    CommandSpec {
        name: "cancel",
        aliases: &[],
        args: "",
        description: "Drop the pending edit",
    },
    CommandSpec {
        name: "delete",
        aliases: &["rm"],
        args: "<n|id>",
        description: "Delete an object",
    },
    CommandSpec {
        name: "status",
        aliases: &[],
        args: "",
        description: "Show connection and operation state",
    },
    CommandSpec {
        name: "help",
        aliases: &[],
        args: "",
        description: "Show this help message",
    },
    CommandSpec {
        name: "exit",
        aliases: &["quit"],
        args: "",
        description: "Leave the console",
    },
];

/// Every accepted command word, aliases included.
pub fn command_words() -> impl Iterator<Item = &'static str> {
    COMMANDS
        .iter()
        .flat_map(|spec| std::iter::once(spec.name).chain(spec.aliases.iter().copied()))
}

/// Table entry for a command word or alias.
pub fn find_command(word: &str) -> Option<&'static CommandSpec> {
    let word = word.to_lowercase();
    COMMANDS
        .iter()
        .find(|spec| spec.name == word || spec.aliases.contains(&word.as_str()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show(String),
    Get(String),
    Add {
        name: String,
        fields: String,
    },
    Edit(String),
    /// Missing parts are taken from the pending edit.
    Save {
        name: Option<String>,
        fields: Option<String>,
    },
    Cancel,
    Delete(String),
    Status,
    Help,
    Exit,
}

/// Result of executing a command.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Succeeded, optionally with output to display.
    Ok { display: Option<String> },
    /// Rejected before reaching the manager.
    Error(String),
    /// The manager operation failed and has reported why.
    Failed,
    Help,
    Exit,
}

impl CommandResult {
    fn ok_display(display: impl Into<String>) -> Self {
        CommandResult::Ok {
            display: Some(display.into()),
        }
    }

    fn ok_none() -> Self {
        CommandResult::Ok { display: None }
    }
}

/// Parse one input line. Empty lines parse to `None`.
pub fn parse(input: &str) -> Result<Option<Command>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let (word, args) = match input.split_once(char::is_whitespace) {
        Some((word, args)) => (word, args.trim()),
        None => (input, ""),
    };

    let spec = find_command(word).ok_or_else(|| {
        format!(
            "Unknown command: '{}'. Type 'help' for available commands.",
            word
        )
    })?;

    let command = match spec.name {
        "list" => Command::List,
        "show" => Command::Show(required(spec, args)?),
        "get" => Command::Get(required(spec, args)?),
        "add" => {
            let (name, fields) = split_fields(args);
            Command::Add {
                name,
                fields: fields.unwrap_or_default(),
            }
        }
        "edit" => Command::Edit(required(spec, args)?),
        "save" => {
            let (name, fields) = split_fields(args);
            Command::Save {
                name: Some(name).filter(|name| !name.is_empty()),
                fields,
            }
        }
        "cancel" => Command::Cancel,
        "delete" => Command::Delete(required(spec, args)?),
        "status" => Command::Status,
        "help" => Command::Help,
        _ => Command::Exit,
    };
    Ok(Some(command))
}

/// Parse and execute a line.
pub fn execute<E: HttpExecutor>(input: &str, ctx: &ConsoleContext<E>) -> CommandResult {
    match parse(input) {
        Ok(Some(command)) => run(command, ctx),
        Ok(None) => CommandResult::ok_none(),
        Err(message) => CommandResult::Error(message),
    }
}

pub fn run<E: HttpExecutor>(command: Command, ctx: &ConsoleContext<E>) -> CommandResult {
    let manager = ctx.manager();

    match command {
        Command::List => match ctx.block_on(manager.list()) {
            Ok(collection) => CommandResult::ok_display(format_table(&collection)),
            Err(_) => CommandResult::Failed,
        },
        Command::Show(target) => match ctx.lookup(&target) {
            Some(resource) => CommandResult::ok_display(format_resource(&resource)),
            None => CommandResult::Error(format!(
                "No listed object matches '{}'. Run 'list' first.",
                target
            )),
        },
        Command::Get(id) => match ctx.block_on(manager.fetch(&id)) {
            Ok(resource) => CommandResult::ok_display(format_resource(&resource)),
            Err(_) => CommandResult::Failed,
        },
        Command::Add { name, fields } => match ctx.block_on(manager.create(&name, &fields)) {
            Ok(_) => CommandResult::ok_none(),
            Err(_) => CommandResult::Failed,
        },
        Command::Edit(target) => {
            let id = ctx.resolve_target(&target);
            match manager.begin_edit(&id) {
                Ok(resource) => CommandResult::ok_display(format!(
                    "{}\n\n{}",
                    format_resource(&resource),
                    Style::new().dimmed().paint(format!(
                        "save {} | {}",
                        resource.name(),
                        resource.data().format()
                    ))
                )),
                Err(_) => CommandResult::Failed,
            }
        }
        Command::Save { name, fields } => {
            let pending = manager.pending_edit();
            let name = name
                .or_else(|| pending.as_ref().map(|r| r.name().to_string()))
                .unwrap_or_default();
            // Without `| fields` the edited object's data is sent as it is.
            let saved = match fields {
                Some(fields) => ctx.block_on(manager.save_edit(&name, &fields)),
                None => ctx.block_on(manager.save_edit_keeping_fields(&name)),
            };
            match saved {
                Ok(_) => CommandResult::ok_none(),
                Err(_) => CommandResult::Failed,
            }
        }
        Command::Cancel => match manager.cancel_edit() {
            Some(_) => CommandResult::ok_none(),
            None => CommandResult::Error("Nothing is being edited".to_string()),
        },
        Command::Delete(target) => {
            let id = ctx.resolve_target(&target);
            match ctx.block_on(manager.delete(&id)) {
                Ok(()) => CommandResult::ok_none(),
                Err(_) => CommandResult::Failed,
            }
        }
        Command::Status => CommandResult::ok_display(format_status(ctx)),
        Command::Help => CommandResult::Help,
        Command::Exit => CommandResult::Exit,
    }
}

fn required(spec: &CommandSpec, args: &str) -> Result<String, String> {
    if args.is_empty() {
        Err(format!("Usage: {} {}", spec.name, spec.args))
    } else {
        Ok(args.to_string())
    }
}

/// Split `name | fields`. The fields part is `None` when there is no `|`.
fn split_fields(args: &str) -> (String, Option<String>) {
    match args.split_once('|') {
        Some((name, fields)) => (name.trim().to_string(), Some(fields.trim().to_string())),
        None => (args.trim().to_string(), None),
    }
}

pub fn format_help() -> String {
    let cmd_style = Style::new().bold().fg(Color::Cyan);
    let arg_style = Style::new().fg(Color::Yellow);

    let mut help = String::new();
    help.push_str(&format!(
        "{}\n\n",
        Style::new().bold().paint("restcrud commands")
    ));

    for spec in COMMANDS {
        let description = if spec.aliases.is_empty() {
            spec.description.to_string()
        } else {
            format!("{} (alias: {})", spec.description, spec.aliases.join(", "))
        };
        help.push_str(&format!(
            "  {:<8} {:<20} {}\n",
            cmd_style.paint(spec.name),
            arg_style.paint(spec.args),
            description
        ));
    }

    help.push_str(&format!("\n{}\n", Style::new().bold().paint("Arguments")));
    help.push_str("  <n|id>   row number from the last list, or an object id\n");
    help.push_str(&format!(
        "  fields   {}\n",
        arg_style.paint("color:blue, capacity:64 GB, generation:2nd, price:9")
    ));
    help.push_str(
        "           values fill color, capacity, generation, price in the order given\n",
    );
    help
}

pub fn format_table(collection: &ResourceCollection) -> String {
    if collection.is_empty() {
        return Style::new().dimmed().paint("(no objects)").to_string();
    }

    let id_width = collection
        .iter()
        .map(|r| r.id().chars().count())
        .max()
        .unwrap_or(0)
        .max(2);
    let name_width = collection
        .iter()
        .map(|r| r.name().chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let header = Style::new().bold();
    let mut lines = vec![format!(
        "{:>3}  {}  {}  {}",
        header.paint("#"),
        header.paint(format!("{:<id_width$}", "id")),
        header.paint(format!("{:<name_width$}", "name")),
        header.paint("data")
    )];

    for (index, resource) in collection.iter().enumerate() {
        lines.push(format!(
            "{:>3}  {}  {:<name_width$}  {}",
            index + 1,
            Color::Yellow.paint(format!("{:<id_width$}", resource.id())),
            resource.name(),
            format_data(resource)
        ));
    }
    lines.join("\n")
}

pub fn format_resource(resource: &Resource) -> String {
    let key = Style::new().fg(Color::Blue);
    let mut lines = vec![
        format!("{} {}", key.paint("id:  "), Color::Yellow.paint(resource.id())),
        format!("{} {}", key.paint("name:"), resource.name()),
    ];

    if resource.data().is_empty() {
        lines.push(Style::new().dimmed().paint(NO_DATA).to_string());
    } else {
        for slot in Slot::ALL {
            if let Some(value) = resource.data().get(slot) {
                lines.push(format!("  {} {}", key.paint(format!("{}:", slot)), value));
            }
        }
    }
    lines.join("\n")
}

fn format_data(resource: &Resource) -> String {
    let text = resource.data().format();
    if resource.data().is_empty() {
        Style::new().dimmed().paint(text).to_string()
    } else {
        text
    }
}

fn format_status<E: HttpExecutor>(ctx: &ConsoleContext<E>) -> String {
    let manager = ctx.manager();
    let config = manager.config();
    let key = Style::new().fg(Color::Blue);

    let editing = match manager.pending_edit() {
        Some(resource) => format!("'{}' (id {})", resource.name(), resource.id()),
        None => "nothing".to_string(),
    };

    let mut lines = vec![
        format!("{} {}", key.paint("endpoint:"), config.collection_url()),
        format!("{} {:?}", key.paint("timeout: "), config.timeout()),
        format!("{} {}", key.paint("objects: "), manager.collection().len()),
        format!("{} {}", key.paint("editing: "), editing),
        String::new(),
    ];
    for kind in OperationKind::ALL {
        lines.push(format!("  {}", manager.operation_status(kind)));
    }
    lines.join("\n")
}
