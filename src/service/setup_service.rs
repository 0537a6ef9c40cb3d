//! Setup sequencing service.

use std::path::PathBuf;

use tracing::debug;

use crate::config::{schema_reference, ConfigService, Configuration};
use crate::domain::{EventSink, Phase, PhaseError};

/// Files touched by a setup run.
#[derive(Debug, Clone)]
pub struct SetupPaths {
    /// Configuration file to write and validate
    pub config: PathBuf,
    /// Schema file to export
    pub schema: PathBuf,
}

/// Which phases a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Export schema, write default config, validate it
    Full,
    /// A single phase on its own
    Only(Phase),
}

impl Plan {
    fn first(self) -> Phase {
        match self {
            Plan::Full => Phase::ExportSchema,
            Plan::Only(phase) => phase,
        }
    }

    fn after(self, phase: Phase) -> Option<Phase> {
        match self {
            Plan::Full => phase.next(),
            Plan::Only(_) => None,
        }
    }
}

/// Sequencer state.
enum State {
    Running(Phase),
    Done(Option<Configuration>),
    Failed(PhaseError),
}

/// Service that drives the export, write and validate phases in order.
pub struct SetupService<'a> {
    paths: SetupPaths,
    config: ConfigService<'a>,
    sink: &'a dyn EventSink,
}

impl<'a> SetupService<'a> {
    /// Create a new SetupService reporting to `sink`.
    pub fn new(paths: SetupPaths, sink: &'a dyn EventSink) -> Self {
        Self {
            paths,
            config: ConfigService::new(sink),
            sink,
        }
    }

    /// Run the phases of `plan`.
    ///
    /// Stops at the first failure; files written by earlier phases stay on
    /// disk. Returns the validated configuration when the plan ends with
    /// validation.
    pub fn run(&self, plan: Plan) -> Result<Option<Configuration>, PhaseError> {
        let mut state = State::Running(plan.first());

        loop {
            state = match state {
                State::Running(phase) => self.step(plan, phase),
                State::Done(validated) => {
                    if let Some(config) = &validated {
                        self.report_valid(config);
                    }
                    return Ok(validated);
                }
                State::Failed(err) => {
                    self.sink.error(&err.to_string(), &err.source);
                    return Err(err);
                }
            };
        }
    }

    /// Execute one phase and return the next state.
    fn step(&self, plan: Plan, phase: Phase) -> State {
        debug!("Entering phase: {}", phase);

        let result = match phase {
            Phase::ExportSchema => self.config.export_schema(&self.paths.schema).map(|_| None),
            Phase::WriteDefault => {
                let schema_ref = schema_reference(&self.paths.config, &self.paths.schema);
                self.config
                    .write_default(&self.paths.config, &schema_ref)
                    .map(|()| None)
            }
            Phase::Validate => self.config.load(&self.paths.config).map(Some),
        };

        match result {
            Ok(validated) => match plan.after(phase) {
                Some(next) => State::Running(next),
                None => State::Done(validated),
            },
            Err(e) => {
                for violation in e.violations() {
                    debug!("Violation: {}", violation);
                }
                State::Failed(PhaseError::new(phase, e))
            }
        }
    }

    fn report_valid(&self, config: &Configuration) {
        let payload = serde_json::to_value(config).ok();
        self.sink.info(
            &format!("Configuration {} is valid", self.paths.config.display()),
            payload.as_ref(),
        );
    }
}
