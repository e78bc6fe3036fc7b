//! Explicit task graph and scheduler
//!
//! Ordering and parallelism are declared as data: a graph is a sequence of
//! steps, each either a single task or a group of build tasks started
//! concurrently and joined before the next step.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;

use forge_common::ForgeConfig;
use forge_dev_server::ReloadChannel;

use crate::tasks::{self, WatchGuard};

/// The named tasks of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Styles,
    Css,
    Scripts,
    Images,
    Vendors,
    Clean,
    Serve,
    Watch,
}

/// One scheduler step
#[derive(Debug, Clone)]
pub enum Step {
    /// Run one task to completion
    Task(Task),
    /// Start the tasks concurrently, wait for all of them
    Group(Vec<Task>),
}

/// A declared sequence of steps
#[derive(Debug, Clone)]
pub struct TaskGraph {
    pub steps: Vec<Step>,
}

impl TaskGraph {
    /// Graph running a single task
    pub fn single(task: Task) -> Self {
        Self {
            steps: vec![Step::Task(task)],
        }
    }

    /// The dev composite: clean, then the four build tasks in parallel,
    /// then serve, then watch
    pub fn dev() -> Self {
        Self {
            steps: vec![
                Step::Task(Task::Clean),
                Step::Group(vec![Task::Styles, Task::Scripts, Task::Images, Task::Vendors]),
                Step::Task(Task::Serve),
                Step::Task(Task::Watch),
            ],
        }
    }
}

/// Evaluates task graphs and owns the long-lived resources the serve and
/// watch tasks create
pub struct Runner {
    config: Arc<ForgeConfig>,
    channel: ReloadChannel,
    server_addr: Option<SocketAddr>,
    watch_guard: Option<WatchGuard>,
}

impl Runner {
    /// Create a runner for one configuration
    pub fn new(config: ForgeConfig) -> Self {
        Self {
            config: Arc::new(config),
            channel: ReloadChannel::new(),
            server_addr: None,
            watch_guard: None,
        }
    }

    /// The reload channel tasks publish to
    pub fn channel(&self) -> &ReloadChannel {
        &self.channel
    }

    /// Address of the dev server, once the serve task has run
    pub fn server_addr(&self) -> Option<SocketAddr> {
        self.server_addr
    }

    /// Whether the watch task has registered its watches
    pub fn watching(&self) -> bool {
        self.watch_guard.is_some()
    }

    /// Run a graph to completion, step by step
    pub async fn run(&mut self, graph: &TaskGraph) -> Result<()> {
        for step in &graph.steps {
            match step {
                Step::Task(task) => self.run_task(*task).await?,
                Step::Group(group) => self.run_group(group).await?,
            }
        }
        Ok(())
    }

    async fn run_task(&mut self, task: Task) -> Result<()> {
        match task {
            Task::Serve => {
                let addr = tasks::serve(&self.config, &self.channel).await?;
                self.server_addr = Some(addr);
                Ok(())
            }
            Task::Watch => {
                let guard = tasks::watch(self.config.clone(), self.channel.clone()).await?;
                self.watch_guard = Some(guard);
                Ok(())
            }
            _ => run_build_task(task, &self.config, &self.channel).await,
        }
    }

    async fn run_group(&mut self, group: &[Task]) -> Result<()> {
        let handles: Vec<_> = group
            .iter()
            .map(|task| {
                let task = *task;
                let config = self.config.clone();
                let channel = self.channel.clone();
                tokio::spawn(async move { run_build_task(task, &config, &channel).await })
            })
            .collect();

        for result in futures_util::future::join_all(handles).await {
            result??;
        }
        Ok(())
    }
}

/// Run one of the build tasks. Serve and watch hold process-lifetime
/// resources and go through the runner instead.
async fn run_build_task(task: Task, config: &ForgeConfig, channel: &ReloadChannel) -> Result<()> {
    match task {
        Task::Styles => tasks::styles(config, channel).await,
        Task::Css => tasks::css(config).await,
        Task::Scripts => tasks::scripts(config, channel).await,
        Task::Images => tasks::images(config).await,
        Task::Vendors => tasks::vendors(config).await,
        Task::Clean => tasks::clean(config).await,
        Task::Serve | Task::Watch => {
            anyhow::bail!("{:?} cannot run inside a parallel group", task)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_graph_shape() {
        let graph = TaskGraph::dev();
        assert_eq!(graph.steps.len(), 4);

        assert!(matches!(graph.steps[0], Step::Task(Task::Clean)));
        match &graph.steps[1] {
            Step::Group(group) => {
                assert_eq!(
                    group,
                    &vec![Task::Styles, Task::Scripts, Task::Images, Task::Vendors]
                );
            }
            other => panic!("expected group, got {:?}", other),
        }
        assert!(matches!(graph.steps[2], Step::Task(Task::Serve)));
        assert!(matches!(graph.steps[3], Step::Task(Task::Watch)));
    }

    #[test]
    fn test_single_graph() {
        let graph = TaskGraph::single(Task::Clean);
        assert_eq!(graph.steps.len(), 1);
    }
}
