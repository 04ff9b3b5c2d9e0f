//! Host-independent console loop.

use restcrud_http::HttpExecutor;

use crate::commands::{self, CommandResult};
use crate::context::ConsoleContext;
use crate::io::{ExitReason, IoError, IoHost, Output, PromptConfig, Signal};

pub struct ReplCore<E> {
    ctx: ConsoleContext<E>,
    load_on_start: bool,
}

impl<E: HttpExecutor> ReplCore<E> {
    /// Console over `ctx`. The collection is loaded when the loop starts.
    pub fn new(ctx: ConsoleContext<E>) -> Self {
        Self {
            ctx,
            load_on_start: true,
        }
    }

    /// Start with an empty list instead of loading it.
    pub fn without_initial_load(mut self) -> Self {
        self.load_on_start = false;
        self
    }

    pub fn context(&self) -> &ConsoleContext<E> {
        &self.ctx
    }

    /// Run until `exit` or Ctrl+D.
    pub fn run(&mut self, io: &mut impl IoHost) -> Result<ExitReason, IoError> {
        io.write_output(Output::banner(BANNER))?;

        if self.load_on_start {
            self.execute_line("list", io)?;
        }

        loop {
            self.update_prompt(io)?;
            io.wait_for_input()?;

            if let Some(signal) = io.read_signal()? {
                match signal {
                    Signal::Eof => {
                        io.write_output(Output::info("Goodbye!"))?;
                        io.flush()?;
                        return Ok(ExitReason::Eof);
                    }
                    Signal::Interrupt => {
                        io.write_output(Output::info("^C (use 'exit' to quit)"))?;
                        continue;
                    }
                }
            }

            let input = match io.read_input()? {
                Some(input) => input,
                None => continue,
            };

            if let Some(reason) = self.execute_line(&input.line, io)? {
                return Ok(reason);
            }
        }
    }

    /// Execute one line and write its output. Returns the exit reason when
    /// the line ends the session.
    fn execute_line(
        &mut self,
        line: &str,
        io: &mut impl IoHost,
    ) -> Result<Option<ExitReason>, IoError> {
        let result = commands::execute(line, &self.ctx);

        // A failed operation always reports its failure last.
        let messages = self.ctx.drain_messages();
        let failure_at = match result {
            CommandResult::Failed => messages.len().checked_sub(1),
            _ => None,
        };
        for (index, message) in messages.into_iter().enumerate() {
            if Some(index) == failure_at {
                io.write_output(Output::error(message))?;
            } else {
                io.write_output(Output::info(message))?;
            }
        }

        match result {
            CommandResult::Ok { display: None } | CommandResult::Failed => {}
            CommandResult::Ok {
                display: Some(output),
            } => {
                io.write_output(Output::normal(output))?;
            }
            CommandResult::Error(msg) => {
                io.write_output(Output::error(msg))?;
            }
            CommandResult::Help => {
                io.write_output(Output::normal(commands::format_help()))?;
            }
            CommandResult::Exit => {
                io.write_output(Output::info("Goodbye!"))?;
                io.flush()?;
                return Ok(Some(ExitReason::UserExit));
            }
        }

        io.flush()?;
        Ok(None)
    }

    fn update_prompt(&self, io: &mut impl IoHost) -> Result<(), IoError> {
        let manager = self.ctx.manager();
        io.write_prompt(PromptConfig {
            object_count: manager.collection().len(),
            editing: manager.pending_edit().map(|r| r.name().to_string()),
        })
    }
}

const BANNER: &str = r#"
                 _                     _
 _ __ ___  ___| |_ ___ _ __ _   _  __| |
| '__/ _ \/ __| __/ __| '__| | | |/ _` |
| | |  __/\__ \ || (__| |  | |_| | (_| |
|_|  \___||___/\__\___|_|   \__,_|\__,_|

Type 'help' for available commands, 'exit' to quit.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{OutputStyle, TestHost};
    use restcrud_core::{ManagerConfig, OperationKind};
    use restcrud_http::{Method, MockExecutor};

    const OBJECTS: &str = "http://api.test/objects";

    fn core(executor: MockExecutor) -> ReplCore<MockExecutor> {
        let config = ManagerConfig::new("http://api.test").unwrap();
        ReplCore::new(ConsoleContext::with_executor(config, executor).unwrap())
    }

    fn two_items() -> &'static str {
        r#"[{"id":"1","name":"Google Pixel 6 Pro","data":{"color":"Cloudy White","capacity":"128 GB"}},
            {"id":"2","name":"Apple AirPods","data":null}]"#
    }

    #[test]
    fn test_exit_command() {
        let mut core = core(MockExecutor::new()).without_initial_load();
        let mut host = TestHost::with_inputs(["exit"]);

        let result = core.run(&mut host);

        assert_eq!(result.unwrap(), ExitReason::UserExit);
        assert!(host.infos().contains(&"Goodbye!"));
        assert_eq!(core.context().manager().executor().request_count(), 0);
    }

    #[test]
    fn test_eof_and_interrupt() {
        let mut core = core(MockExecutor::new()).without_initial_load();
        let mut host = TestHost::new();
        host.queue_signal(Signal::Interrupt);

        let result = core.run(&mut host);

        assert_eq!(result.unwrap(), ExitReason::Eof);
        assert!(host.infos().iter().any(|m| m.contains("^C")));
    }

    #[test]
    fn test_initial_load_renders_table() {
        let executor = MockExecutor::new().with_json(Method::GET, OBJECTS, 200, two_items());
        let mut core = core(executor);
        let mut host = TestHost::with_inputs(["exit"]);

        core.run(&mut host).unwrap();

        assert_eq!(
            host.infos()[..2],
            ["Loading objects...", "Loaded 2 objects"]
        );
        let text = host.output_text();
        assert!(text.contains("Google Pixel 6 Pro"));
        assert!(text.contains("color:Cloudy White, capacity:128 GB"));
        assert!(text.contains("No data"));
        assert_eq!(host.prompts()[0].object_count, 2);
    }

    #[test]
    fn test_add_with_empty_name_reports_validation() {
        let mut core = core(MockExecutor::new()).without_initial_load();
        let mut host = TestHost::with_inputs(["add   | color:blue", "exit"]);

        core.run(&mut host).unwrap();

        assert_eq!(
            host.errors(),
            vec!["Failed to create object: name is required"]
        );
        assert_eq!(core.context().manager().executor().request_count(), 0);
    }

    #[test]
    fn test_add_then_list_shows_widget() {
        let executor = MockExecutor::new()
            .with_json(
                Method::POST,
                OBJECTS,
                200,
                r#"{"id":"42","name":"Widget","data":{"color":"blue","capacity":"9"}}"#,
            )
            .with_json(
                Method::GET,
                OBJECTS,
                200,
                r#"[{"id":"42","name":"Widget","data":{"color":"blue","capacity":"9"}}]"#,
            );
        let mut core = core(executor).without_initial_load();
        let mut host = TestHost::with_inputs(["add Widget | color:blue, price:9", "show 1", "exit"]);

        core.run(&mut host).unwrap();

        assert!(host.errors().is_empty());
        assert!(host.infos().contains(&"Created 'Widget' (id 42)"));
        let shown = host.output_text();
        assert!(shown.contains("blue"));
        assert!(shown.contains("9"));
        assert_eq!(host.last_prompt().unwrap().object_count, 1);
    }

    #[test]
    fn test_delete_not_found_is_red_and_keeps_rows() {
        let executor = MockExecutor::new()
            .with_json(Method::GET, OBJECTS, 200, two_items())
            .with_outcome(
                Method::DELETE,
                format!("{}/2", OBJECTS),
                MockExecutor::not_found(),
            );
        let mut core = core(executor);
        let mut host = TestHost::with_inputs(["rm 2", "exit"]);

        core.run(&mut host).unwrap();

        let errors = host.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Failed to delete object: server returned HTTP 404"));
        assert!(host.infos().contains(&"Deleting object..."));
        assert_eq!(core.context().manager().collection().len(), 2);
    }

    #[test]
    fn test_edit_save_cycle() {
        let executor = MockExecutor::new()
            .with_json(Method::GET, OBJECTS, 200, two_items())
            .with_json(
                Method::PUT,
                format!("{}/2", OBJECTS),
                200,
                r#"{"id":"2","name":"AirPods Pro","data":{"color":"white"}}"#,
            );
        let mut core = core(executor);
        let mut host =
            TestHost::with_inputs(["edit 2", "save AirPods Pro | color:white", "exit"]);

        core.run(&mut host).unwrap();

        assert!(host.errors().is_empty());
        assert!(host
            .prompts()
            .iter()
            .any(|p| p.editing.as_deref() == Some("Apple AirPods")));
        assert!(host.last_prompt().unwrap().editing.is_none());

        let requests = core.context().manager().executor().recorded_requests();
        let put = requests.iter().find(|r| r.method == Method::PUT).unwrap();
        assert_eq!(
            put.body.as_deref(),
            Some(r#"{"id":"2","name":"AirPods Pro","data":{"color":"white"}}"#)
        );
    }

    #[test]
    fn test_rename_only_save_keeps_fields() {
        let executor = MockExecutor::new()
            .with_json(
                Method::GET,
                OBJECTS,
                200,
                r#"[{"id":"2","name":"Apple AirPods","data":{"generation":"3rd","price":"120"}}]"#,
            )
            .with_json(Method::PUT, format!("{}/2", OBJECTS), 200, "");
        let mut core = core(executor);
        let mut host = TestHost::with_inputs(["edit 1", "save AirPods Pro", "exit"]);

        core.run(&mut host).unwrap();

        assert!(host.errors().is_empty());
        let requests = core.context().manager().executor().recorded_requests();
        let put = requests.iter().find(|r| r.method == Method::PUT).unwrap();
        assert_eq!(
            put.body.as_deref(),
            Some(r#"{"id":"2","name":"AirPods Pro","data":{"generation":"3rd","price":"120"}}"#)
        );
    }

    #[test]
    fn test_save_without_edit_fails() {
        let mut core = core(MockExecutor::new()).without_initial_load();
        let mut host = TestHost::with_inputs(["save Thing", "cancel", "exit"]);

        core.run(&mut host).unwrap();

        assert_eq!(
            host.errors(),
            vec!["no object is being edited", "Nothing is being edited"]
        );
    }

    #[test]
    fn test_unknown_command_and_usage() {
        let mut core = core(MockExecutor::new()).without_initial_load();
        let mut host = TestHost::with_inputs(["frobnicate", "get", "exit"]);

        core.run(&mut host).unwrap();

        let errors = host.errors();
        assert!(errors[0].contains("Unknown command"));
        assert_eq!(errors[1], "Usage: get <id>");
    }

    #[test]
    fn test_status_and_help() {
        let mut core = core(MockExecutor::new()).without_initial_load();
        let mut host = TestHost::with_inputs(["status", "help", "exit"]);

        core.run(&mut host).unwrap();

        let normal = host.output_with_style(OutputStyle::Normal);
        assert!(normal[0].contains("http://api.test/objects"));
        assert!(normal[0].contains(&OperationKind::List.to_string()));
        assert!(normal[0].contains("idle"));
        assert!(normal[1].contains("restcrud commands"));
    }

    #[test]
    fn test_connection_failure_on_start() {
        let executor = MockExecutor::new().fail_with("connection refused");
        let mut core = core(executor);
        let mut host = TestHost::with_inputs(["exit"]);

        let result = core.run(&mut host);

        assert_eq!(result.unwrap(), ExitReason::UserExit);
        assert_eq!(
            host.errors(),
            vec!["Failed to load objects: connection failed: connection refused"]
        );
    }
}
