//! Meteor Commands Use Case
//!
//! Each command:
//! 1. Resolves the deployment section (failing before any task list exists)
//! 2. Works out the sessions it runs on
//! 3. Builds its task list
//! 4. Dispatches it through the execution engine
//!
//! `deploy` chains push, envconfig and start through a `StagePipeline`.

use std::sync::Arc;

use serde_json::Value;

use crate::application::build_cache::{BuildCache, BuildRequest};
use crate::application::pipeline::{PipelineReport, StagePipeline};
use crate::domain::entities::{Session, TaskList};
use crate::domain::ports::{
    AppBuilder, DeployEventSink, ExecutionEngine, NoopEventSink, PipelineEvent, RunOptions,
    RunReport,
};
use crate::domain::services::{
    ConfigResolver, HostRegistration, ResolvedConfig, SessionFanout, TaskListBuilder,
    REGISTRATION_TITLE,
};
use crate::domain::value_objects::Stage;
use crate::error::{ShipError, ShipResult};
use crate::fs::resolve_path;

use super::options::CommandContext;

/// The meteor commands, parameterized by the engine and the bundler
pub struct MeteorCommands<E, B>
where
    E: ExecutionEngine,
    B: AppBuilder,
{
    engine: E,
    builder: B,
    events: Arc<dyn DeployEventSink>,
}

impl<E, B> MeteorCommands<E, B>
where
    E: ExecutionEngine,
    B: AppBuilder,
{
    pub fn new(engine: E, builder: B) -> Self {
        Self {
            engine,
            builder,
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn DeployEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Run a single command
    pub fn run_command(&self, stage: Stage, ctx: &CommandContext) -> ShipResult<RunReport> {
        let result = match stage {
            Stage::Setup => self.setup(ctx),
            Stage::Push => self.push(ctx),
            Stage::EnvConfig => self.envconfig(ctx),
            Stage::Start => self.start(ctx),
            Stage::Stop => self.stop(ctx),
            Stage::Logs => self.logs(ctx),
        };
        if let Err(err) = &result {
            self.events.on_event(PipelineEvent::StageFailed {
                stage,
                error: err.to_string(),
            });
        }
        result
    }

    pub fn setup(&self, ctx: &CommandContext) -> ShipResult<RunReport> {
        tracing::debug!("exec => meteor setup");
        let (config, sessions) = self.prepare(ctx)?;
        let list = self.tasks(&config, ctx).setup()?;
        self.dispatch(Stage::Setup, &list, &sessions, ctx.verbose)
    }

    pub fn push(&self, ctx: &CommandContext) -> ShipResult<RunReport> {
        tracing::debug!("exec => meteor push");
        let (config, sessions) = self.prepare(ctx)?;

        let app_path = resolve_path(&ctx.base_path, &config.path);
        let location = BuildCache::location_for(&app_path, &config.build_options, &ctx.base_path);
        let request = BuildRequest {
            app_path,
            location,
            options: config.build_options.clone(),
            cached_build: ctx.cached_build,
            verbose: ctx.verbose,
        };
        let artifact = BuildCache::prepare(&self.builder, &request, self.events.as_ref())?;

        let list = self.tasks(&config, ctx).push(&artifact.bundle_path);
        self.dispatch(Stage::Push, &list, &sessions, ctx.verbose)
    }

    pub fn envconfig(&self, ctx: &CommandContext) -> ShipResult<RunReport> {
        tracing::debug!("exec => meteor envconfig");
        let (config, sessions) = self.prepare(ctx)?;
        let settings = ctx.settings.load()?;
        self.envconfig_with(&config, &sessions, &settings, ctx)
    }

    fn envconfig_with(
        &self,
        config: &ResolvedConfig,
        sessions: &[Session],
        settings: &Value,
        ctx: &CommandContext,
    ) -> ShipResult<RunReport> {
        let list = self.tasks(config, ctx).envconfig(settings)?;
        let registrations = SessionFanout::plan(config, sessions)?;

        let mut report = self.dispatch(Stage::EnvConfig, &list, sessions, ctx.verbose)?;
        report.merge(self.register_hosts(&registrations, ctx.verbose)?);
        Ok(report)
    }

    /// Dispatch every registration on its own session, each on its own
    /// thread. All of them run; failures are reported together afterwards.
    fn register_hosts(
        &self,
        registrations: &[HostRegistration],
        verbose: bool,
    ) -> ShipResult<RunReport> {
        let engine = &self.engine;
        let results: Vec<ShipResult<RunReport>> = std::thread::scope(|scope| {
            let handles: Vec<_> = registrations
                .iter()
                .map(|registration| {
                    scope.spawn(move || {
                        engine.run(
                            &registration.tasks,
                            std::slice::from_ref(&registration.session),
                            RunOptions::parallel(verbose),
                        )
                    })
                })
                .collect();
            handles
                .into_iter()
                .zip(registrations)
                .map(|(handle, registration)| {
                    handle.join().unwrap_or_else(|_| {
                        Err(ShipError::ExecutionFailure {
                            host: registration.server.clone(),
                            task: REGISTRATION_TITLE.to_string(),
                            message: "worker thread panicked".to_string(),
                        })
                    })
                })
                .collect()
        });

        let mut report = RunReport::default();
        let mut failures = Vec::new();
        for (registration, result) in registrations.iter().zip(results) {
            match result {
                Ok(run) => {
                    self.events.on_event(PipelineEvent::HostRegistered {
                        server: registration.server.clone(),
                        server_host: registration.server_host.clone(),
                    });
                    report.merge(run);
                }
                Err(err) => {
                    tracing::warn!("registering {} failed: {}", registration.server, err);
                    failures.push((registration.server.clone(), err.to_string()));
                }
            }
        }

        if failures.is_empty() {
            return Ok(report);
        }

        let hosts: Vec<&str> = failures.iter().map(|(s, _)| s.as_str()).collect();
        let messages: Vec<String> = failures
            .iter()
            .map(|(s, m)| format!("{}: {}", s, m))
            .collect();
        Err(ShipError::ExecutionFailure {
            host: hosts.join(", "),
            task: REGISTRATION_TITLE.to_string(),
            message: messages.join("; "),
        })
    }

    pub fn start(&self, ctx: &CommandContext) -> ShipResult<RunReport> {
        tracing::debug!("exec => meteor start");
        let (config, sessions) = self.prepare(ctx)?;
        let list = self.tasks(&config, ctx).start();
        self.dispatch(Stage::Start, &list, &sessions, ctx.verbose)
    }

    pub fn stop(&self, ctx: &CommandContext) -> ShipResult<RunReport> {
        tracing::debug!("exec => meteor stop");
        let (config, sessions) = self.prepare(ctx)?;
        let list = self.tasks(&config, ctx).stop();
        self.dispatch(Stage::Stop, &list, &sessions, ctx.verbose)
    }

    pub fn logs(&self, ctx: &CommandContext) -> ShipResult<RunReport> {
        tracing::debug!("exec => meteor logs");
        let (config, sessions) = self.prepare(ctx)?;
        let list = self.tasks(&config, ctx).logs(&ctx.logs);
        self.dispatch(Stage::Logs, &list, &sessions, ctx.verbose)
    }

    /// push → envconfig → start.
    ///
    /// Configuration and settings are validated before anything runs; a
    /// failing stage stops the pipeline.
    pub fn deploy(&self, ctx: &CommandContext) -> ShipResult<PipelineReport> {
        tracing::debug!("exec => meteor deploy");
        ctx.settings.load()?;
        self.prepare(ctx)?;

        StagePipeline::deploy().run(|stage| self.run_command(stage, ctx))
    }

    fn prepare(&self, ctx: &CommandContext) -> ShipResult<(ResolvedConfig, Vec<Session>)> {
        let config = ConfigResolver::resolve(&ctx.config)?;
        let sessions = match &ctx.sessions {
            Some(sessions) => sessions.clone(),
            None => Session::for_meteor(&ctx.config, &ctx.base_path)?,
        };
        Ok((config, sessions))
    }

    fn tasks<'a>(&self, config: &'a ResolvedConfig, ctx: &CommandContext) -> TaskListBuilder<'a> {
        TaskListBuilder::new(config, &ctx.assets_dir, &ctx.base_path)
    }

    fn dispatch(
        &self,
        stage: Stage,
        list: &TaskList,
        sessions: &[Session],
        verbose: bool,
    ) -> ShipResult<RunReport> {
        self.events.on_event(PipelineEvent::StageStarted {
            stage,
            hosts: sessions.len(),
        });

        let options = RunOptions {
            series: stage.runs_in_series(),
            verbose,
        };
        let report = self.engine.run(list, sessions, options)?;

        for output in &report.outputs {
            self.events.on_event(PipelineEvent::CommandOutput {
                server: output.server.clone(),
                stdout: output.stdout.clone(),
                stderr: output.stderr.clone(),
            });
        }
        self.events.on_event(PipelineEvent::StageCompleted { stage });
        Ok(report)
    }
}
