//! Tree-walking pipeline executor
//!
//! Walks the AST in source order, binding each pipeline to a container
//! through the `ContainerAdapter`. Every container the run starts is
//! stopped before `execute` returns, whether the run completed, hit EXIT
//! or failed.

use crate::adapter::{ContainerAdapter, ContainerHandle, CreateRequest, MountSpec};
use crate::context::ExecutionContext;
use crate::error::{Result, RuntimeError};
use crate::interpolate::interpolate;
use crate::result::{RunOutcome, RunReport};
use std::sync::Arc;
use wrci_core::ast::{IfBlock, Node, Pipeline};
use wrci_core::Program;

/// Directory inside containers where pipeline scripts are mounted
pub const DEFAULT_MOUNT_ROOT: &str = "/pipeline";

/// Executor settings
#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    /// Prefix of every STEP command path
    pub mount_root: String,

    /// Bind mounts passed to every created container
    pub mounts: Vec<MountSpec>,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            mount_root: DEFAULT_MOUNT_ROOT.to_string(),
            mounts: Vec::new(),
        }
    }
}

impl ExecutorOptions {
    pub fn with_mount_root(mut self, root: impl Into<String>) -> Self {
        self.mount_root = root.into();
        self
    }

    pub fn with_mounts(mut self, mounts: Vec<MountSpec>) -> Self {
        self.mounts = mounts;
        self
    }
}

/// Control flow signal propagated out of nested blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Pipeline executor
pub struct Executor {
    adapter: Arc<dyn ContainerAdapter>,
    options: ExecutorOptions,
}

impl Executor {
    /// Create an executor with default options
    pub fn new(adapter: Arc<dyn ContainerAdapter>) -> Self {
        Self {
            adapter,
            options: ExecutorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExecutorOptions) -> Self {
        self.options = options;
        self
    }

    /// Execute a parsed program
    ///
    /// Containers started during the run are destroyed on every exit path.
    /// A failing destroy is logged and does not change the result.
    pub fn execute(&self, program: &Program) -> Result<RunReport> {
        tracing::info!(
            "Executing pipeline {} with adapter {}",
            display_name(&program.root),
            self.adapter.name()
        );

        let mut ctx = ExecutionContext::new(program.variables.clone());
        let result = self.run_pipeline(&program.root, None, &mut ctx);
        self.teardown(&mut ctx);

        let outcome = match result? {
            Flow::Continue => RunOutcome::Completed,
            Flow::Exit => {
                tracing::info!("Execution exited early due to EXIT command.");
                RunOutcome::Exited
            }
        };
        Ok(ctx.into_report(outcome))
    }

    fn run_pipeline(
        &self,
        pipeline: &Pipeline,
        parent: Option<&ContainerHandle>,
        ctx: &mut ExecutionContext,
    ) -> Result<Flow> {
        let handle = self.resolve_container(pipeline, parent, ctx)?;
        self.run_block(&pipeline.body, pipeline, &handle, ctx)
    }

    /// Decide which container a pipeline runs in
    ///
    /// In order: a container already registered under the pipeline's name,
    /// a new container when the pipeline declares `helper_image`, the
    /// parent's container. Anything else cannot run.
    fn resolve_container(
        &self,
        pipeline: &Pipeline,
        parent: Option<&ContainerHandle>,
        ctx: &mut ExecutionContext,
    ) -> Result<ContainerHandle> {
        if let Some(handle) = pipeline
            .name
            .as_deref()
            .and_then(|name| ctx.registry.get(name))
        {
            tracing::info!(
                "Using existing container for pipeline '{}'",
                display_name(pipeline)
            );
            return Ok(handle.clone());
        }

        if let Some(image) = &pipeline.helper_image {
            let Some(name) = &pipeline.name else {
                return Err(RuntimeError::Configuration(format!(
                    "pipeline with helper_image '{}' has no name to register its container under",
                    image
                )));
            };

            tracing::info!("Starting container '{}' with image: {}", name, image);
            let request = CreateRequest::new(name, image)
                .with_start_command(pipeline.start_command.clone())
                .with_mounts(self.options.mounts.clone());
            let handle = self.adapter.create(&request)?;
            tracing::info!("Container '{}' started with ID: {}", name, handle);

            ctx.track_container(name, handle.clone());
            return Ok(handle);
        }

        match parent {
            Some(handle) => {
                tracing::info!(
                    "Pipeline '{}' has no helper_image. Reusing parent container.",
                    display_name(pipeline)
                );
                Ok(handle.clone())
            }
            None => Err(RuntimeError::Configuration(format!(
                "pipeline '{}' has no helper_image and no parent container to reuse",
                display_name(pipeline)
            ))),
        }
    }

    fn run_block(
        &self,
        nodes: &[Node],
        pipeline: &Pipeline,
        handle: &ContainerHandle,
        ctx: &mut ExecutionContext,
    ) -> Result<Flow> {
        for node in nodes {
            if self.run_node(node, pipeline, handle, ctx)? == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn run_node(
        &self,
        node: &Node,
        pipeline: &Pipeline,
        handle: &ContainerHandle,
        ctx: &mut ExecutionContext,
    ) -> Result<Flow> {
        match node {
            Node::Pipeline(child) => self.run_pipeline(child, Some(handle), ctx),
            Node::Step(step) => {
                self.run_step(&step.script, pipeline, handle, ctx)?;
                Ok(Flow::Continue)
            }
            Node::If(block) => self.run_if(block, pipeline, handle, ctx),
            Node::Msg(message) => {
                let text = interpolate(&message.template, &ctx.variables);
                tracing::info!("Message: {}", text);
                ctx.messages.push(text);
                Ok(Flow::Continue)
            }
            Node::Assign(assignment) => {
                tracing::info!("Assigned ${} = \"{}\"", assignment.name, assignment.value);
                ctx.variables
                    .set(assignment.name.clone(), assignment.value.clone());
                Ok(Flow::Continue)
            }
            Node::Exit => Ok(Flow::Exit),
        }
    }

    fn run_if(
        &self,
        block: &IfBlock,
        pipeline: &Pipeline,
        handle: &ContainerHandle,
        ctx: &mut ExecutionContext,
    ) -> Result<Flow> {
        let condition = &block.condition;
        let taken = condition.matches(ctx.variables.get(&condition.variable));
        tracing::debug!(
            "IF ${} {} \"{}\" -> {}",
            condition.variable,
            condition.operator,
            condition.literal,
            taken
        );

        if taken {
            self.run_block(&block.body, pipeline, handle, ctx)
        } else if let Some(else_branch) = &block.else_branch {
            self.run_block(&else_branch.body, pipeline, handle, ctx)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn run_step(
        &self,
        script: &str,
        pipeline: &Pipeline,
        handle: &ContainerHandle,
        ctx: &mut ExecutionContext,
    ) -> Result<()> {
        let command = self.command_path(pipeline.name.as_deref(), script);
        tracing::info!("Executing step: {} in container {}", command, handle);

        let output = self
            .adapter
            .exec(handle, &command, &ctx.variables.bindings())?;

        for line in output.stdout.lines() {
            tracing::info!("[{}] {}", script, line);
        }
        for line in output.stderr.lines() {
            tracing::warn!("[{}] {}", script, line);
        }
        if !output.success() {
            tracing::warn!("Step {} exited with code {}", command, output.exit_code);
        }

        ctx.record_step(pipeline.name.as_deref(), &command, handle, output);
        Ok(())
    }

    /// `<mount_root>/<pipeline>/<script>`, or `<mount_root>/<script>` for a
    /// nameless pipeline
    pub fn command_path(&self, pipeline_name: Option<&str>, script: &str) -> String {
        let root = self.options.mount_root.trim_end_matches('/');
        match pipeline_name {
            Some(name) => format!("{}/{}/{}", root, name, script),
            None => format!("{}/{}", root, script),
        }
    }

    fn teardown(&self, ctx: &mut ExecutionContext) {
        for handle in ctx.registry.drain() {
            tracing::info!("Stopping container {} for pipeline {}", handle, handle.name);
            if let Err(e) = self.adapter.destroy(&handle) {
                tracing::warn!("Failed to stop container {}: {}", handle, e);
            }
        }
    }
}

fn display_name(pipeline: &Pipeline) -> &str {
    pipeline.name.as_deref().unwrap_or("<anonymous>")
}
