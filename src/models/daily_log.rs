use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// The four practice modules the analyzer knows about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Module {
    Writing,
    Speaking,
    Reading,
    Listening,
}

impl Module {
    /// Every module, in tie-break priority order.
    pub const PRIORITY: [Module; 4] = [
        Module::Writing,
        Module::Speaking,
        Module::Reading,
        Module::Listening,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Writing => "Writing",
            Module::Speaking => "Speaking",
            Module::Reading => "Reading",
            Module::Listening => "Listening",
        }
    }

    /// Match stored free text against the four modules, ignoring case and
    /// padding. The desktop app compares exactly, so there "reading" counts
    /// as an unknown module while here it counts as Reading. Anything else is
    /// not a module.
    pub fn recognize(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::PRIORITY
            .into_iter()
            .find(|module| module.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::recognize(value).ok_or_else(|| {
            anyhow!("unknown module '{value}' (expected Reading, Writing, Listening or Speaking)")
        })
    }
}

/// One completed study session.
///
/// `module` and `date` stay as stored text so that documents written by older
/// builds (or edited by hand) always load; see [`DailyLog::module`] and
/// [`DailyLog::day`] for the typed views.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DailyLog {
    pub id: String,
    pub date: String,
    pub module: String,
    /// Minutes.
    pub duration: u32,
    pub score: f64,
    pub reflection: String,
    pub homework: String,
    pub learnings: String,
    pub content: String,
    pub source_url: String,
    pub screenshot: String,
    pub time: String,
}

impl DailyLog {
    pub fn module(&self) -> Option<Module> {
        Module::recognize(&self.module)
    }

    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.day() == Some(day)
    }
}
