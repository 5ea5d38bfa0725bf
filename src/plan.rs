//! Reconciles the reference sequence of a source with what is already on disk.
//!
//! Planning never touches the network. The caller supplies the path mapping
//! and the existence check, and receives the ordered list of files still to
//! fetch for one sub-stream.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use chrono::NaiveDate;

use crate::{dateindex::generate, error::IndexError, interval::IntervalKind};

/// One independently published (region, variable) series of a source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubStream {
    pub region: String,
    pub variable: String,
}

impl SubStream {
    pub fn new(region: impl Into<String>, variable: impl Into<String>) -> Self {
        SubStream {
            region: region.into(),
            variable: variable.into(),
        }
    }
}

impl fmt::Display for SubStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region, self.variable)
    }
}

/// Latest reference date already satisfied, per sub-stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalState {
    latest: HashMap<SubStream, NaiveDate>,
}

impl LocalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self, stream: &SubStream) -> Option<NaiveDate> {
        self.latest.get(stream).copied()
    }

    /// Records `date` for `stream`, keeping the later of the stored and new date.
    pub fn record(&mut self, stream: &SubStream, date: NaiveDate) {
        self.latest
            .entry(stream.clone())
            .and_modify(|latest| *latest = (*latest).max(date))
            .or_insert(date);
    }

    pub fn merge(&mut self, other: LocalState) {
        for (stream, date) in other.latest {
            self.record(&stream, date);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

/// A single file to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    pub reference_date: NaiveDate,
    pub remote_path: String,
}

/// Returns the first date to plan from, or `None` when nothing can follow.
///
/// Daily sources resume the day after the latest local file. Every other
/// interval re-includes the latest reference date so the index can rebuild the
/// partial period around it.
pub fn resolve_start(
    kind: IntervalKind,
    latest: Option<NaiveDate>,
    default_begin: NaiveDate,
) -> Option<NaiveDate> {
    match (kind, latest) {
        (_, None) => Some(default_begin),
        (IntervalKind::Day, Some(latest)) => latest.succ_opt(),
        (_, Some(latest)) => Some(latest),
    }
}

/// Plans the fetches needed to bring one sub-stream up to `end`.
///
/// Tasks come out in ascending reference order. Dates whose file already
/// exists are skipped. A stream that is already up to date yields an empty
/// plan. Errors from `path_for` and `exists` are returned unchanged.
pub fn plan<E, P, X>(
    kind: IntervalKind,
    latest: Option<NaiveDate>,
    default_begin: NaiveDate,
    end: NaiveDate,
    mut path_for: P,
    mut exists: X,
) -> Result<Vec<FetchTask>, E>
where
    E: From<IndexError>,
    P: FnMut(NaiveDate) -> Result<String, E>,
    X: FnMut(&FetchTask) -> Result<bool, E>,
{
    let kind = kind.validate()?;
    let start = match resolve_start(kind, latest, default_begin) {
        Some(start) if start <= end => start,
        _ => return Ok(Vec::new()),
    };

    let mut tasks = Vec::new();
    for reference_date in generate(kind, start, end)? {
        let task = FetchTask {
            reference_date,
            remote_path: path_for(reference_date)?,
        };
        if !exists(&task)? {
            tasks.push(task);
        }
    }

    Ok(tasks)
}

/// Plans fetches from a remote listing instead of a rendered path.
///
/// Paths whose date cannot be read, or falls outside `[start, end]`, are
/// ignored. When several paths share a reference date the lexicographically
/// first one is kept.
pub fn plan_listed<E, I, D, X>(
    listing: I,
    start: NaiveDate,
    end: NaiveDate,
    mut date_of: D,
    mut exists: X,
) -> Result<Vec<FetchTask>, E>
where
    I: IntoIterator<Item = String>,
    D: FnMut(&str) -> Option<NaiveDate>,
    X: FnMut(&FetchTask) -> Result<bool, E>,
{
    let mut by_date: BTreeMap<NaiveDate, String> = BTreeMap::new();

    for path in listing {
        let Some(date) = date_of(&path) else {
            continue;
        };
        if date < start || date > end {
            continue;
        }
        match by_date.get_mut(&date) {
            Some(kept) if path < *kept => *kept = path,
            Some(_) => {}
            None => {
                by_date.insert(date, path);
            }
        }
    }

    let mut tasks = Vec::new();
    for (reference_date, remote_path) in by_date {
        let task = FetchTask {
            reference_date,
            remote_path,
        };
        if !exists(&task)? {
            tasks.push(task);
        }
    }

    Ok(tasks)
}

// -- Tests -------------------------------------------------------------------
