//! Test doubles for the orchestrator's collaborators
//!
//! Every fake appends to a shared [`EventLog`] so tests can assert ordering
//! across collaborators.

#![allow(dead_code)]

use appget::cli::{ClapOptionParser, OptionParser, ParsedOptions};
use appget::commands::CommandExecutor;
use appget::console::Console;
use appget::debug::DebugContext;
use appget::logging::DiagnosticsSink;
use appget::orchestrator::{Collaborators, Orchestrator};
use appget_common::{AppDataGuard, CommandError, Severity, UpdateService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| e.as_str() == event).count()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

// ============================================================================
// Option parser
// ============================================================================

/// Real grammar, recorded calls, nothing printed on failure
pub struct RecordingParser {
    log: EventLog,
    pub seen: Mutex<Vec<Vec<String>>>,
}

impl RecordingParser {
    pub fn seen(&self) -> Vec<Vec<String>> {
        self.seen.lock().unwrap().clone()
    }
}

impl OptionParser for RecordingParser {
    fn parse(&self, args: &[String]) -> Option<ParsedOptions> {
        self.log.push("parse");
        self.seen.lock().unwrap().push(args.to_vec());
        ClapOptionParser::try_parse(args).ok()
    }
}

// ============================================================================
// App data guard
// ============================================================================

pub struct FakeAppData {
    fail: bool,
    log: EventLog,
}

impl AppDataGuard for FakeAppData {
    fn ensure_app_data_directory_exists(&self) -> io::Result<()> {
        self.log.push("app_data");
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        Ok(())
    }
}

// ============================================================================
// Command executor
// ============================================================================

#[derive(Clone, Copy)]
pub enum ExecutorBehavior {
    Succeed,
    Fail(fn() -> CommandError),
    Panic,
}

pub struct FakeExecutor {
    behavior: ExecutorBehavior,
    log: EventLog,
}

#[async_trait]
impl CommandExecutor for FakeExecutor {
    async fn execute(&self, _options: &ParsedOptions) -> Result<(), CommandError> {
        self.log.push("execute");
        match &self.behavior {
            ExecutorBehavior::Succeed => Ok(()),
            ExecutorBehavior::Fail(make) => Err(make()),
            ExecutorBehavior::Panic => panic!("executor blew up"),
        }
    }
}

// ============================================================================
// Update service
// ============================================================================

pub struct RecordingUpdater {
    log: EventLog,
}

impl RecordingUpdater {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl UpdateService for RecordingUpdater {
    fn start(&self) {
        self.log.push("update_start");
    }

    fn commit(&self) {
        self.log.push("update_commit");
    }
}

// ============================================================================
// Diagnostics, console, debug context
// ============================================================================

pub struct RecordingSink {
    log: EventLog,
    pub records: Mutex<Vec<(Severity, String)>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.lock().unwrap().clone()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn record(&self, severity: Severity, message: &str) {
        self.log.push(format!("record:{}", severity.as_str()));
        self.records
            .lock()
            .unwrap()
            .push((severity, message.to_string()));
    }

    fn enable_verbose(&self) {
        self.log.push("verbose");
    }
}

#[derive(Default)]
pub struct ScriptedConsole {
    input: Mutex<VecDeque<String>>,
    output: Mutex<Vec<String>>,
}

impl ScriptedConsole {
    pub fn with_input(lines: &[&str]) -> Self {
        Self {
            input: Mutex::new(lines.iter().map(|l| l.to_string()).collect()),
            output: Mutex::new(Vec::new()),
        }
    }

    pub fn output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }
}

impl Console for ScriptedConsole {
    fn write_line(&self, line: &str) {
        self.output.lock().unwrap().push(line.to_string());
    }

    fn read_line(&self) -> io::Result<String> {
        self.input
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"))
    }
}

/// Reports the scripted answers in order, then detached forever
#[derive(Default)]
pub struct ScriptedDebug {
    answers: Mutex<VecDeque<bool>>,
}

impl ScriptedDebug {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
        }
    }
}

impl DebugContext for ScriptedDebug {
    fn is_attached(&self) -> bool {
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub log: EventLog,
    pub parser: Arc<RecordingParser>,
    pub sink: Arc<RecordingSink>,
    pub console: Arc<ScriptedConsole>,
    pub updater: Arc<dyn UpdateService>,
    app_data_fails: bool,
    behavior: ExecutorBehavior,
    debug: Arc<dyn DebugContext>,
}

impl Harness {
    pub fn new() -> Self {
        let log = EventLog::default();
        Self {
            parser: Arc::new(RecordingParser {
                log: log.clone(),
                seen: Mutex::new(Vec::new()),
            }),
            sink: Arc::new(RecordingSink {
                log: log.clone(),
                records: Mutex::new(Vec::new()),
            }),
            console: Arc::new(ScriptedConsole::default()),
            updater: Arc::new(RecordingUpdater::new(log.clone())),
            app_data_fails: false,
            behavior: ExecutorBehavior::Succeed,
            debug: Arc::new(ScriptedDebug::default()),
            log,
        }
    }

    pub fn executor(mut self, behavior: ExecutorBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn failing_app_data(mut self) -> Self {
        self.app_data_fails = true;
        self
    }

    pub fn updater(mut self, updater: Arc<dyn UpdateService>) -> Self {
        self.updater = updater;
        self
    }

    pub fn console(mut self, console: ScriptedConsole) -> Self {
        self.console = Arc::new(console);
        self
    }

    pub fn debug(mut self, debug: Arc<dyn DebugContext>) -> Self {
        self.debug = debug;
        self
    }

    pub fn build(self) -> (Orchestrator, Self) {
        let orchestrator = Orchestrator::new(Collaborators {
            parser: self.parser.clone(),
            app_data: Arc::new(FakeAppData {
                fail: self.app_data_fails,
                log: self.log.clone(),
            }),
            executor: Arc::new(FakeExecutor {
                behavior: self.behavior,
                log: self.log.clone(),
            }),
            updater: self.updater.clone(),
            diagnostics: self.sink.clone(),
            console: self.console.clone(),
            debug: self.debug.clone(),
        });
        (orchestrator, self)
    }
}

pub fn args(line: &str) -> Vec<String> {
    line.split(' ').map(String::from).collect()
}
