//! Match records - one completed game between two bots on one map

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Result of a match from one participant's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// A raw record as handed over by a decoding layer.
///
/// Every field is optional so that missing columns surface as
/// [`ReportError::MalformedRecord`] instead of a decoder error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub map: Option<String>,
    #[serde(default)]
    pub bot_a: Option<String>,
    #[serde(default)]
    pub bot_b: Option<String>,
    #[serde(default)]
    pub winner: Option<String>,
}

/// One completed match. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MatchRecord {
    map: String,
    bot_a: String,
    bot_b: String,
    winner: Option<String>,
}

impl MatchRecord {
    /// Build a validated record.
    ///
    /// The winner, when present, must be one of the two participants, and the
    /// participants must be distinct bots.
    pub fn new(
        map: impl Into<String>,
        bot_a: impl Into<String>,
        bot_b: impl Into<String>,
        winner: Option<&str>,
    ) -> Result<Self> {
        let map = map.into();
        let bot_a = bot_a.into();
        let bot_b = bot_b.into();
        let describe = || format!("{}: {} vs {}", map, bot_a, bot_b);

        if map.trim().is_empty() {
            return Err(ReportError::malformed(describe(), "missing map"));
        }
        if bot_a.trim().is_empty() || bot_b.trim().is_empty() {
            return Err(ReportError::malformed(describe(), "missing participant"));
        }
        if bot_a == bot_b {
            return Err(ReportError::DuplicateBotIdentity(bot_a));
        }

        let winner = match winner {
            None => None,
            Some(w) if w == bot_a || w == bot_b => Some(w.to_string()),
            Some(w) => {
                return Err(ReportError::malformed(
                    describe(),
                    format!("winner '{}' is not a participant", w),
                ))
            }
        };

        Ok(Self {
            map,
            bot_a,
            bot_b,
            winner,
        })
    }

    /// Validate a raw decoded record.
    ///
    /// An empty winner string counts as a draw.
    pub fn parse(raw: RawRecord) -> Result<Self> {
        let describe = |raw: &RawRecord| {
            format!(
                "{}: {} vs {}",
                raw.map.as_deref().unwrap_or("?"),
                raw.bot_a.as_deref().unwrap_or("?"),
                raw.bot_b.as_deref().unwrap_or("?"),
            )
        };

        let map = raw
            .map
            .clone()
            .ok_or_else(|| ReportError::malformed(describe(&raw), "missing field 'map'"))?;
        let bot_a = raw
            .bot_a
            .clone()
            .ok_or_else(|| ReportError::malformed(describe(&raw), "missing field 'bot_a'"))?;
        let bot_b = raw
            .bot_b
            .clone()
            .ok_or_else(|| ReportError::malformed(describe(&raw), "missing field 'bot_b'"))?;
        let winner = raw.winner.as_deref().filter(|w| !w.trim().is_empty());

        Self::new(map, bot_a, bot_b, winner)
    }

    pub fn map(&self) -> &str {
        &self.map
    }

    pub fn bot_a(&self) -> &str {
        &self.bot_a
    }

    pub fn bot_b(&self) -> &str {
        &self.bot_b
    }

    /// The winner, or `None` for a draw
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    pub fn involves(&self, bot: &str) -> bool {
        self.bot_a == bot || self.bot_b == bot
    }

    /// The other participant, if `bot` took part
    pub fn opponent_of(&self, bot: &str) -> Option<&str> {
        if self.bot_a == bot {
            Some(&self.bot_b)
        } else if self.bot_b == bot {
            Some(&self.bot_a)
        } else {
            None
        }
    }

    /// Outcome for `bot`, or `None` if it did not play this match
    pub fn outcome_for(&self, bot: &str) -> Option<Outcome> {
        if !self.involves(bot) {
            return None;
        }
        Some(match self.winner.as_deref() {
            None => Outcome::Draw,
            Some(w) if w == bot => Outcome::Win,
            Some(_) => Outcome::Loss,
        })
    }
}
