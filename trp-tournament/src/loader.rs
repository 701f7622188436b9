//! Loading results from disk
//!
//! Accepted layouts, mirroring how MicroRTS runs are usually archived:
//! - a single `tournament.csv` (or any tournament file)
//! - a `.json` array of match records
//! - a map folder holding one sub-folder per run, each with `tournament.csv`
//! - a results folder holding one map folder per map
//!
//! Files are parsed in parallel; results are ordered by path.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use trp_core::{MapList, MatchRecord, RawRecord};

use crate::error::{Result, TournamentError};
use crate::tournament::TournamentFile;

const TOURNAMENT_FILE: &str = "tournament.csv";

/// A file to read and the map label to fall back on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultSource {
    pub path: PathBuf,
    pub fallback_map: String,
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Load every match record found at `path`
pub fn load_results(path: &Path) -> Result<Vec<MatchRecord>> {
    let sources = discover_sources(path)?;
    tracing::debug!("Found {} result files under {}", sources.len(), path.display());

    let per_file = sources
        .par_iter()
        .map(load_source)
        .collect::<Result<Vec<Vec<MatchRecord>>>>()?;

    let records: Vec<MatchRecord> = per_file.into_iter().flatten().collect();
    tracing::info!(
        "Loaded {} games from {} files under {}",
        records.len(),
        sources.len(),
        path.display()
    );
    Ok(records)
}

/// Load a map list: one map per line, blank lines and `#` comments skipped
pub fn load_map_list(path: &Path) -> Result<MapList> {
    let text = read(path)?;
    let maps: MapList = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();
    tracing::debug!("Loaded {} maps from {}", maps.len(), path.display());
    Ok(maps)
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Work out which files `path` refers to, sorted by path
pub fn discover_sources(path: &Path) -> Result<Vec<ResultSource>> {
    let metadata = std::fs::metadata(path).map_err(|source| TournamentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut sources = if metadata.is_file() {
        vec![ResultSource {
            path: path.to_path_buf(),
            fallback_map: parent_name(path),
        }]
    } else {
        let direct = map_folder_sources(path)?;
        if direct.is_empty() {
            let mut nested = Vec::new();
            for dir in sub_dirs(path)? {
                nested.extend(map_folder_sources(&dir)?);
            }
            nested
        } else {
            direct
        }
    };

    if sources.is_empty() {
        return Err(TournamentError::NotFound(path.to_path_buf()));
    }
    sources.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(sources)
}

/// Read one file into records
fn load_source(source: &ResultSource) -> Result<Vec<MatchRecord>> {
    let is_json = source
        .path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        return load_json_records(&source.path);
    }

    let file = TournamentFile::load(&source.path)?;
    tracing::debug!(
        "{}: {} AIs, {} maps, iterations={}",
        source.path.display(),
        file.ai_names.len(),
        file.maps.len(),
        file.config.iterations
    );
    file.match_records(&source.fallback_map)
        .map_err(|e| TournamentError::from(e).in_file(&source.path))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Records from a JSON array of raw records
pub fn load_json_records(path: &Path) -> Result<Vec<MatchRecord>> {
    let text = read(path)?;
    parse_json_records(&text).map_err(|e| e.in_file(path))
}

pub fn parse_json_records(text: &str) -> Result<Vec<MatchRecord>> {
    let raw: Vec<RawRecord> = serde_json::from_str(text)?;
    let records = raw
        .into_iter()
        .map(MatchRecord::parse)
        .collect::<trp_core::Result<Vec<_>>>()?;
    Ok(records)
}

/// Files of one map folder: its own `tournament.csv` and those of its runs
fn map_folder_sources(dir: &Path) -> Result<Vec<ResultSource>> {
    let label = dir_name(dir);
    let mut files = Vec::new();

    let own = dir.join(TOURNAMENT_FILE);
    if own.is_file() {
        files.push(own);
    }
    for run in sub_dirs(dir)? {
        let candidate = run.join(TOURNAMENT_FILE);
        if candidate.is_file() {
            files.push(candidate);
        }
    }

    Ok(files
        .into_iter()
        .map(|path| ResultSource {
            path,
            fallback_map: label.clone(),
        })
        .collect())
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| TournamentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn sub_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| TournamentError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| TournamentError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn dir_name(dir: &Path) -> String {
    // canonicalize so that "." still yields a real folder name
    let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

fn parent_name(file: &Path) -> String {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => dir_name(parent),
        _ => dir_name(Path::new(".")),
    }
}
