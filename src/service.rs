//! A fixed pool of blocking report workers behind an async front.
//!
//! ```text
//! execute() -> bounded queue -> Workers (N, spawn_blocking) -> oneshot reply
//! ```
//!
//! Each request runs on one worker from start to finish. Closing the queue
//! lets the workers drain what is queued and exit.

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::request::{ExecuteRequest, RenderedOutput};
use log::{debug, info, warn};
use quire_core::{ReportError, ReportExecutor, route_for};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::{self, JoinHandle};

struct Job {
    request: ExecuteRequest,
    reply: oneshot::Sender<Result<usize, ReportError>>,
}

pub struct ReportService {
    sender: async_channel::Sender<Job>,
    workers: Vec<JoinHandle<()>>,
    unlink: bool,
}

impl ReportService {
    /// Starts the workers. Must be called from within a Tokio runtime.
    pub fn start(executor: ReportExecutor, config: &ServiceConfig) -> Self {
        let executor = Arc::new(executor);
        let worker_count = config.worker_count();
        let (sender, receiver) = async_channel::bounded::<Job>(config.queue_capacity());
        info!("Starting report service with {} workers.", worker_count);

        let workers = (0..worker_count)
            .map(|worker_id| {
                let receiver = receiver.clone();
                let executor = Arc::clone(&executor);
                let unlink = config.unlink;
                task::spawn_blocking(move || {
                    debug!("[WORKER-{}] Started.", worker_id);
                    while let Ok(job) = receiver.recv_blocking() {
                        let Job { request, reply } = job;
                        let result = executor.execute(
                            &request.connection,
                            &request.template,
                            &request.output,
                            request.parameters,
                        );
                        if let Err(e) = &result {
                            warn!("[WORKER-{}] '{}' failed in {}: {}", worker_id, request.template.display(), e.stage(), e);
                        }
                        if unlink {
                            remove_files(&request.temporary_files);
                        }
                        if reply.send(result).is_err() {
                            debug!("[WORKER-{}] Caller stopped waiting.", worker_id);
                        }
                    }
                    debug!("[WORKER-{}] Shutting down.", worker_id);
                })
            })
            .collect();

        Self {
            sender,
            workers,
            unlink: config.unlink,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Runs one request and returns its page count.
    pub async fn execute(&self, request: ExecuteRequest) -> Result<usize, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Job { request, reply })
            .await
            .map_err(|_| ServiceError::Closed)?;
        let pages = response.await.map_err(|_| ServiceError::Closed)??;
        Ok(pages)
    }

    /// Renders into a temporary file and returns its contents.
    ///
    /// The request's own output path is ignored. The temporary file is
    /// removed afterwards unless the service was configured with
    /// `unlink = false`, in which case it is kept and its path logged.
    pub async fn render_to_bytes(&self, mut request: ExecuteRequest) -> Result<RenderedOutput, ServiceError> {
        let format = route_for(request.connection.output_token()).format;
        let output = tempfile::Builder::new()
            .prefix("quire-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile()?
            .into_temp_path();
        request.output = output.to_path_buf();

        let pages = self.execute(request).await?;
        let path: PathBuf = output.to_path_buf();
        let bytes = task::spawn_blocking(move || fs::read(path))
            .await
            .map_err(|e| ServiceError::Worker(e.to_string()))??;

        if self.unlink {
            output.close()?;
        } else {
            match output.keep() {
                Ok(kept) => info!("Kept rendered output at '{}'.", kept.display()),
                Err(e) => warn!("Could not keep rendered output: {}", e),
            }
        }
        Ok(RenderedOutput { format, bytes, pages })
    }

    /// Stops accepting requests, lets queued ones finish and joins the workers.
    pub async fn shutdown(self) -> Result<(), ServiceError> {
        self.sender.close();
        for worker in self.workers {
            worker.await.map_err(|e| ServiceError::Worker(e.to_string()))?;
        }
        info!("Report service stopped.");
        Ok(())
    }
}

fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove file '{}': {}", path.display(), e);
        }
    }
}
