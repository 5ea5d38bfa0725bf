//! Brings the local copy of a source up to date.
//!
//! Every sub-stream is planned against the local download directory, then the
//! streams are fetched concurrently, each one strictly in date order.

use std::{
    collections::{BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Error, Result};
use chrono::NaiveDate;
use futures::future::join_all;
use indicatif::ProgressBar;

use crate::{
    dateindex::generate,
    interval::IntervalKind,
    plan::{plan, plan_listed, resolve_start, FetchTask, LocalState, SubStream},
    source::SourceDescriptor,
    transport::{FetchOutcome, Transport},
};

/// Pending fetches of one sub-stream.
#[derive(Debug, Clone)]
pub struct StreamPlan {
    pub stream: SubStream,
    pub tasks: Vec<FetchTask>,
}

/// Outcome of synchronising one source.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub source: String,
    pub downloaded: Vec<FetchTask>,
    /// Files on the reference grid the archive has not published.
    pub missing: Vec<FetchTask>,
}

#[derive(Debug)]
struct StreamOutcome {
    state: LocalState,
    downloaded: Vec<FetchTask>,
    missing: Vec<FetchTask>,
}

/// Plans every sub-stream of `source` up to `end`.
///
/// A local file is only ever claimed by the first stream that plans it, so
/// streams rendering the same remote path do not download it twice.
pub async fn plan_source(
    source: &SourceDescriptor,
    transport: &dyn Transport,
    download_dir: &Path,
    end: NaiveDate,
    state: &LocalState,
) -> Result<Vec<StreamPlan>> {
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut plans = Vec::new();

    for stream in source.streams() {
        let latest = state.latest(&stream);
        let exists = |task: &FetchTask| {
            Ok::<_, Error>(source.local_target(download_dir, &task.remote_path).exists())
        };

        let mut tasks = if source.listing {
            let Some(start) = resolve_start(source.interval, latest, source.begin_date) else {
                continue;
            };
            if start > end {
                Vec::new()
            } else {
                let listing = list_candidates(source, transport, &stream, start, end).await?;
                plan_listed(
                    listing,
                    start,
                    end,
                    |path| source.template.parse_date(path, &stream).ok(),
                    exists,
                )?
            }
        } else {
            plan(
                source.interval,
                latest,
                source.begin_date,
                end,
                |date| Ok::<_, Error>(source.path_for(date, &stream)),
                exists,
            )?
        };

        tasks.retain(|task| {
            source.accepts(file_name(&task.remote_path))
                && claimed.insert(source.local_target(download_dir, &task.remote_path))
        });

        plans.push(StreamPlan { stream, tasks });
    }

    Ok(plans)
}

/// Downloads everything `plan_source` finds missing and folds the new reference
/// dates into `state`.
///
/// `progress` advances by one per finished task. If a stream fails, the other
/// streams still complete and their state is kept before the first error is
/// returned.
pub async fn sync_source(
    source: &SourceDescriptor,
    transport: Arc<dyn Transport>,
    download_dir: &Path,
    end: NaiveDate,
    state: &mut LocalState,
    progress: &ProgressBar,
) -> Result<SyncReport> {
    let plans = plan_source(source, transport.as_ref(), download_dir, end, state).await?;
    let total: usize = plans.iter().map(|p| p.tasks.len()).sum();

    let mut report = SyncReport {
        source: source.name.clone(),
        ..SyncReport::default()
    };
    if total == 0 {
        return Ok(report);
    }

    progress.set_length(total as u64);

    let handles: Vec<_> = plans
        .into_iter()
        .filter(|p| !p.tasks.is_empty())
        .map(|p| {
            let transport = Arc::clone(&transport);
            let progress = progress.clone();
            let targets: Vec<(FetchTask, PathBuf)> = p
                .tasks
                .into_iter()
                .map(|task| {
                    let target = source.local_target(download_dir, &task.remote_path);
                    (task, target)
                })
                .collect();
            tokio::spawn(async move { fetch_stream(p.stream, targets, transport, progress).await })
        })
        .collect();

    let mut first_error = None;
    for result in join_all(handles).await {
        match result.map_err(Error::from).and_then(|outcome| outcome) {
            Ok(outcome) => {
                state.merge(outcome.state);
                report.downloaded.extend(outcome.downloaded);
                report.missing.extend(outcome.missing);
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(report),
    }
}

async fn fetch_stream(
    stream: SubStream,
    targets: Vec<(FetchTask, PathBuf)>,
    transport: Arc<dyn Transport>,
    progress: ProgressBar,
) -> Result<StreamOutcome> {
    let mut outcome = StreamOutcome {
        state: LocalState::new(),
        downloaded: Vec::new(),
        missing: Vec::new(),
    };

    for (task, target) in targets {
        progress.set_message(format!("{} {}", stream, task.reference_date));
        if let Some(directory) = target.parent() {
            tokio::fs::create_dir_all(directory).await?;
        }

        match transport.fetch(&task.remote_path, &target).await? {
            FetchOutcome::Downloaded { .. } => {
                outcome.state.record(&stream, task.reference_date);
                outcome.downloaded.push(task);
            }
            FetchOutcome::NotFound => outcome.missing.push(task),
        }
        progress.inc(1);
    }

    Ok(outcome)
}

/// Lists every remote directory the template can produce for `stream` between
/// `start` and `end`, returning full remote paths.
async fn list_candidates(
    source: &SourceDescriptor,
    transport: &dyn Transport,
    stream: &SubStream,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<String>> {
    let (directory_template, _) = source.template.split();

    let directories: BTreeSet<String> = generate(IntervalKind::Day, start, end)?
        .into_iter()
        .map(|date| directory_template.render(date, stream))
        .collect();

    let mut paths = Vec::new();
    for directory in directories {
        for name in transport.list_remote(&directory).await? {
            if directory.is_empty() {
                paths.push(name);
            } else {
                paths.push(format!("{}/{}", directory, name));
            }
        }
    }

    Ok(paths)
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// -- Tests -------------------------------------------------------------------
