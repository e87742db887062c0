use crate::io::{FileChunkLoader, JsonArtifactWriter};
use anyhow::Context;
use candcore::interface::artifact::ArtifactWriter;
use candcore::interface::descriptor::CandidateDescriptor;
use candcore::interface::loader::ChunkLoader;
use candcore::prelude::{PrepConfig, PrepResult};
use candcore::processing::{assemble, Dispatcher, IncoherentEngine};
use candcore::telemetry::{BatchMetrics, BatchSummary, TaskContext};
use std::path::PathBuf;
use std::sync::Arc;

/// Parallel batch driver.
///
/// Applies the full per-candidate pipeline (load, dispatch, assemble,
/// write) to every descriptor on a fixed-size worker pool. Tasks are
/// spawned with one-candidate granularity and are independently fallible: a
/// failed or panicked task is counted and logged, and its siblings run to
/// completion.
pub struct Runner {
    config: Arc<PrepConfig>,
    loader: Arc<dyn ChunkLoader>,
    writer: Arc<dyn ArtifactWriter>,
    dispatcher: Arc<Dispatcher>,
}

impl Runner {
    pub fn new(config: PrepConfig) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(FileChunkLoader),
            Arc::new(JsonArtifactWriter),
            Arc::new(Dispatcher::new(Arc::new(IncoherentEngine::new()))),
        )
    }

    pub fn with_collaborators(
        config: PrepConfig,
        loader: Arc<dyn ChunkLoader>,
        writer: Arc<dyn ArtifactWriter>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            loader,
            writer,
            dispatcher,
        }
    }

    pub fn run(&self, descriptors: Vec<CandidateDescriptor>) -> anyhow::Result<BatchSummary> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.nproc.max(1))
            .thread_name("cand-worker")
            .build()
            .context("creating the worker pool runtime")?;
        let metrics = Arc::new(BatchMetrics::new());

        runtime.block_on(async {
            let mut tasks = tokio::task::JoinSet::new();
            for descriptor in descriptors {
                let config = Arc::clone(&self.config);
                let loader = Arc::clone(&self.loader);
                let writer = Arc::clone(&self.writer);
                let dispatcher = Arc::clone(&self.dispatcher);
                let metrics = Arc::clone(&metrics);
                tasks.spawn(async move {
                    let ctx = TaskContext::for_candidate(descriptor.tag());
                    let outcome = process_candidate(
                        &descriptor,
                        &config,
                        loader.as_ref(),
                        writer.as_ref(),
                        &dispatcher,
                        &metrics,
                        &ctx,
                    );
                    match outcome {
                        Ok(path) => {
                            metrics.record_completed();
                            ctx.info(&format!("wrote {}", path.display()));
                        }
                        Err(err) => {
                            metrics.record_failed();
                            log::error!(
                                "[{}] candidate from {} failed: {err}",
                                ctx.tag(),
                                descriptor.source_path.display()
                            );
                        }
                    }
                });
            }
            while let Some(joined) = tasks.join_next().await {
                if joined.is_err() {
                    metrics.record_failed();
                    log::error!("a worker task aborted");
                }
            }
        });

        Ok(metrics.snapshot())
    }
}

/// One unit of work; the candidate either completes or fails atomically.
fn process_candidate(
    descriptor: &CandidateDescriptor,
    config: &PrepConfig,
    loader: &dyn ChunkLoader,
    writer: &dyn ArtifactWriter,
    dispatcher: &Dispatcher,
    metrics: &BatchMetrics,
    ctx: &TaskContext,
) -> PrepResult<PathBuf> {
    let mut cand = loader.load(descriptor)?;
    ctx.info("got chunk");
    let report = dispatcher.dispatch(&mut cand, config, ctx)?;
    if report.gpu_fallback {
        metrics.record_gpu_fallback();
    }
    let bundle = assemble(cand, config, ctx)?;
    writer.write(&bundle, &config.output_dir)
}
