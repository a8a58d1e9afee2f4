//! Concurrent execution of the compilation phase.
//!
//! Every compile pass and every declaration mapping write is an independent
//! job writing to disjoint paths. Jobs run on one `JoinSet`; the first failure
//! aborts the remaining jobs and is returned.

use crate::dts_mapper::DeclarationMapping;
use crate::engine::{CompileOutput, Engine};
use crate::task::CompileTask;
use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;

/// One unit of work of the compilation phase.
#[derive(Debug, Clone)]
pub enum Job {
    Compile(CompileTask),
    Mapping(DeclarationMapping),
}

impl Job {
    fn describe(&self) -> String {
        match self {
            Job::Compile(task) => format!("{} compilation", task.format),
            Job::Mapping(mapping) => format!("declaration mapping {}", mapping.target.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutput {
    Compiled(CompileOutput),
    Mapped(PathBuf),
}

/// Run all jobs concurrently and wait for them.
///
/// Outputs are returned in job order regardless of completion order.
///
/// # Errors
///
/// Returns the first job error observed. Remaining jobs are aborted; files
/// already written by finished jobs stay in place.
pub async fn execute(engine: Arc<dyn Engine>, jobs: Vec<Job>) -> Result<Vec<JobOutput>> {
    let mut join_set = JoinSet::new();
    let total = jobs.len();

    for (index, job) in jobs.into_iter().enumerate() {
        let engine = Arc::clone(&engine);
        join_set.spawn(async move {
            let description = job.describe();
            let result = match job {
                Job::Compile(task) => engine.compile(&task).await.map(JobOutput::Compiled),
                Job::Mapping(mapping) => mapping.write().await.map(JobOutput::Mapped),
            };
            (index, description, result)
        });
    }

    let mut outputs: Vec<Option<JobOutput>> = vec![None; total];

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, _, Ok(output))) => outputs[index] = Some(output),
            Ok((_, description, Err(err))) => {
                tracing::error!(job = %description, "{err}");
                join_set.abort_all();
                return Err(err);
            }
            Err(join_err) if join_err.is_cancelled() => {}
            Err(join_err) => {
                join_set.abort_all();
                return Err(Error::TaskFailed(join_err.to_string()));
            }
        }
    }

    Ok(outputs.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kiln_config::Format;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Debug)]
    struct FixedEngine {
        fail: Option<Format>,
    }

    #[async_trait]
    impl Engine for FixedEngine {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn compile(&self, task: &CompileTask) -> Result<CompileOutput> {
            if self.fail == Some(task.format) {
                return Err(Error::Compile {
                    format: task.format,
                    detail: "boom".to_string(),
                });
            }
            Ok(CompileOutput {
                format: task.format,
                duration: Duration::ZERO,
                declarations: false,
            })
        }
    }

    fn jobs(root: &std::path::Path) -> Vec<Job> {
        vec![
            Job::Compile(CompileTask::new(Format::Esm, ["a.ts"])),
            Job::Compile(CompileTask::new(Format::Cjs, ["a.ts"])),
            Job::Mapping(DeclarationMapping::for_entry(
                &root.join("src/a.ts"),
                &root.join("src"),
                &root.join("dist"),
            )),
        ]
    }

    #[tokio::test]
    async fn outputs_follow_job_order() {
        let dir = TempDir::new().unwrap();
        let outputs = execute(Arc::new(FixedEngine { fail: None }), jobs(dir.path()))
            .await
            .unwrap();

        assert_eq!(outputs.len(), 3);
        assert!(matches!(&outputs[0], JobOutput::Compiled(o) if o.format == Format::Esm));
        assert!(matches!(&outputs[1], JobOutput::Compiled(o) if o.format == Format::Cjs));
        assert_eq!(outputs[2], JobOutput::Mapped(dir.path().join("dist/a.d.ts")));
    }

    #[tokio::test]
    async fn failure_is_returned() {
        let dir = TempDir::new().unwrap();
        let err = execute(
            Arc::new(FixedEngine {
                fail: Some(Format::Cjs),
            }),
            jobs(dir.path()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Compile { format: Format::Cjs, .. }));
    }

    #[tokio::test]
    async fn empty_job_list() {
        let outputs = execute(Arc::new(FixedEngine { fail: None }), Vec::new())
            .await
            .unwrap();
        assert!(outputs.is_empty());
    }
}
