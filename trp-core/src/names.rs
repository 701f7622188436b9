//! Bot name shortening
//!
//! MicroRTS identifies bots by their fully qualified class name plus the
//! constructor arguments, e.g.
//! `ai.mcts.naivemcts.NaiveMCTS(100, -1, 100, 10, 0.3, 0.0, 0.4, 0)`.
//! Each name gets a ladder of display forms, shortest first, ending with the
//! full name. Every name starts on the bottom rung; names that collide climb
//! together until all forms are distinct.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Rules for the display forms
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenConfig {
    /// Longest argument-bearing form before it is cut and marked with `...`
    pub max_length: usize,
}

impl Default for ShortenConfig {
    fn default() -> Self {
        Self { max_length: 35 }
    }
}

impl ShortenConfig {
    pub fn with_max_length(max_length: usize) -> Self {
        Self { max_length }
    }
}

/// Full name to short name mapping for one report
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ShortNames {
    short: BTreeMap<String, String>,
}

impl ShortNames {
    pub fn get(&self, full: &str) -> Option<&str> {
        self.short.get(full).map(String::as_str)
    }

    /// Short form if known, otherwise the name unchanged
    pub fn display<'a>(&'a self, full: &'a str) -> &'a str {
        self.get(full).unwrap_or(full)
    }

    /// Resolve a user-supplied name, full or short, to the full name
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if let Some((full, _)) = self.short.get_key_value(name) {
            return Some(full.as_str());
        }
        self.short
            .iter()
            .find(|(_, short)| short.as_str() == name)
            .map(|(full, _)| full.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.short.iter().map(|(f, s)| (f.as_str(), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.short.is_empty()
    }
}

/// Shorten with the default rules
pub fn shorten<S: AsRef<str>>(full_names: &[S]) -> Result<ShortNames> {
    shorten_with(full_names, &ShortenConfig::default())
}

/// Pick a distinct short name for every full name.
///
/// Fails with [`ReportError::DuplicateBotIdentity`] if the same full name is
/// given twice.
pub fn shorten_with<S: AsRef<str>>(full_names: &[S], config: &ShortenConfig) -> Result<ShortNames> {
    let mut seen = FxHashSet::default();
    for name in full_names {
        if !seen.insert(name.as_ref()) {
            return Err(ReportError::DuplicateBotIdentity(name.as_ref().to_string()));
        }
    }

    let ladders: Vec<Vec<String>> = full_names
        .iter()
        .map(|n| ladder(n.as_ref(), config))
        .collect();
    let mut rungs = vec![0usize; ladders.len()];

    loop {
        let mut groups: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
        for (i, ladder) in ladders.iter().enumerate() {
            groups.entry(ladder[rungs[i]].as_str()).or_default().push(i);
        }

        let mut collided = false;
        let mut climbed = false;
        for members in groups.values().filter(|m| m.len() > 1) {
            collided = true;
            for &i in members {
                if rungs[i] + 1 < ladders[i].len() {
                    rungs[i] += 1;
                    climbed = true;
                }
            }
        }

        if !collided {
            break;
        }
        if !climbed {
            // Only reachable if two ladders end on the same full name
            let stuck = groups
                .into_iter()
                .find(|(_, m)| m.len() > 1)
                .map(|(form, _)| form.to_string())
                .unwrap_or_default();
            return Err(ReportError::DuplicateBotIdentity(stuck));
        }
    }

    let short = full_names
        .iter()
        .zip(ladders.iter().zip(&rungs))
        .map(|(full, (ladder, &rung))| (full.as_ref().to_string(), ladder[rung].clone()))
        .collect();

    Ok(ShortNames { short })
}

/// Display forms for one name, shortest first, ending with the full name
fn ladder(full: &str, config: &ShortenConfig) -> Vec<String> {
    let (path, args) = match full.find('(') {
        Some(i) => (full[..i].trim_end(), &full[i..]),
        None => (full, ""),
    };
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();

    let mut forms = Vec::new();
    if let Some(class) = segments.last() {
        forms.push(class.to_string());
        if !args.is_empty() {
            let with_args = format!("{}{}", class, args);
            forms.push(truncate(&with_args, config.max_length));
            forms.push(with_args);
        }
        for k in 2..=segments.len() {
            let qualified = segments[segments.len() - k..].join(".");
            forms.push(format!("{}{}", qualified, args));
        }
    }
    forms.push(full.to_string());
    forms.dedup();
    forms
}

fn truncate(name: &str, max_length: usize) -> String {
    if name.chars().count() > max_length {
        let mut cut: String = name.chars().take(max_length).collect();
        cut.push_str("...");
        cut
    } else {
        name.to_string()
    }
}
