//! In-memory host for driving the console loop in tests.

use std::collections::VecDeque;

use super::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

/// Host that replays queued lines and records everything written.
///
/// Once both queues are empty the host reports [`Signal::Eof`], so a loop
/// under test always terminates.
#[derive(Debug, Default)]
pub struct TestHost {
    input_queue: VecDeque<String>,
    signal_queue: VecDeque<Signal>,
    output_buffer: Vec<Output>,
    prompts: Vec<PromptConfig>,
    flush_count: usize,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host preloaded with `lines`.
    pub fn with_inputs(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut host = Self::new();
        host.queue_inputs(lines);
        host
    }

    pub fn queue_input(&mut self, line: impl Into<String>) {
        self.input_queue.push_back(line.into());
    }

    pub fn queue_inputs(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
        for line in lines {
            self.queue_input(line);
        }
    }

    pub fn queue_signal(&mut self, signal: Signal) {
        self.signal_queue.push_back(signal);
    }

    pub fn output(&self) -> &[Output] {
        &self.output_buffer
    }

    /// All output text, one entry per line.
    pub fn output_text(&self) -> String {
        self.output_buffer
            .iter()
            .map(|o| o.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn output_with_style(&self, style: OutputStyle) -> Vec<&str> {
        self.output_buffer
            .iter()
            .filter(|o| o.style == style)
            .map(|o| o.text.as_str())
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.output_with_style(OutputStyle::Error)
    }

    pub fn infos(&self) -> Vec<&str> {
        self.output_with_style(OutputStyle::Info)
    }

    pub fn last_prompt(&self) -> Option<&PromptConfig> {
        self.prompts.last()
    }

    pub fn prompts(&self) -> &[PromptConfig] {
        &self.prompts
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    pub fn clear_output(&mut self) {
        self.output_buffer.clear();
    }

    pub fn has_pending_input(&self) -> bool {
        !self.input_queue.is_empty()
    }
}

impl IoHost for TestHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.input_queue.pop_front().map(|line| InputLine { line }))
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        if let Some(signal) = self.signal_queue.pop_front() {
            return Ok(Some(signal));
        }
        if self.input_queue.is_empty() {
            return Ok(Some(Signal::Eof));
        }
        Ok(None)
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        self.output_buffer.push(output);
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.prompts.push(config);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.flush_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_input_returns_queued_in_order() {
        let mut host = TestHost::with_inputs(["first", "second"]);

        assert_eq!(host.read_input().unwrap().unwrap().line, "first");
        assert_eq!(host.read_input().unwrap().unwrap().line, "second");
        assert!(host.read_input().unwrap().is_none());
    }

    #[test]
    fn queued_signals_come_before_input() {
        let mut host = TestHost::with_inputs(["list"]);
        host.queue_signal(Signal::Interrupt);

        assert_eq!(host.read_signal().unwrap(), Some(Signal::Interrupt));
        assert_eq!(host.read_signal().unwrap(), None);
        assert!(host.has_pending_input());
    }

    #[test]
    fn exhausted_host_reports_eof() {
        let mut host = TestHost::new();

        assert_eq!(host.read_signal().unwrap(), Some(Signal::Eof));
    }

    #[test]
    fn output_is_recorded_with_style() {
        let mut host = TestHost::new();
        host.write_output(Output::normal("table")).unwrap();
        host.write_output(Output::error("oops")).unwrap();
        host.write_output(Output::info("Loading objects...")).unwrap();

        assert_eq!(host.output().len(), 3);
        assert_eq!(host.errors(), vec!["oops"]);
        assert_eq!(host.infos(), vec!["Loading objects..."]);
        assert_eq!(host.output_text(), "table\noops\nLoading objects...");

        host.clear_output();
        assert!(host.output().is_empty());
    }

    #[test]
    fn prompts_and_flushes_are_tracked() {
        let mut host = TestHost::new();
        assert!(host.last_prompt().is_none());

        host.write_prompt(PromptConfig {
            object_count: 3,
            editing: Some("Widget".to_string()),
        })
        .unwrap();
        host.flush().unwrap();
        host.flush().unwrap();

        assert_eq!(host.last_prompt().unwrap().object_count, 3);
        assert_eq!(host.prompts().len(), 1);
        assert_eq!(host.flush_count(), 2);
    }
}
