//! Free-text intent parsing.
//!
//! Users type short Japanese phrases such as 「行く」 or 「9時に会社に着きたい」.
//! This module turns them into an [`Intent`] the bot can act on. Matching
//! is keyword based; anything unrecognised becomes [`Intent::Unknown`] and
//! the bot answers with its main menu.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{ClockTime, Direction};

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Next buses towards the company.
    SearchOutbound,
    /// Next buses home.
    SearchInbound,
    /// Buses arriving no later than `time` today.
    ArriveBy { time: ClockTime, direction: Direction },
    /// Buses leaving at or after `time` today.
    DepartAt { time: ClockTime, direction: Direction },
    /// Open the settings menu.
    Settings,
    /// Set a one-shot reminder at `time`.
    Notification { time: ClockTime },
    Help,
    Unknown,
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

// Time patterns, tried in order. The first capture is the hour.
static HOUR_MINUTE: LazyLock<Regex> = LazyLock::new(|| regex(r"([0-9]{1,2})時([0-9]{1,2})分"));
static COLON: LazyLock<Regex> = LazyLock::new(|| regex(r"([0-9]{1,2}):([0-9]{1,2})"));
static HALF_PAST: LazyLock<Regex> = LazyLock::new(|| regex(r"([0-9]{1,2})時半"));
static HOUR_ONLY: LazyLock<Regex> = LazyLock::new(|| regex(r"([0-9]{1,2})時"));

// Whole-message keywords, matched against trimmed lowercase text.
static GO_WORDS: LazyLock<Regex> = LazyLock::new(|| regex(r"^(行く|いく|出発|しゅっぱつ)$"));
static RETURN_WORDS: LazyLock<Regex> = LazyLock::new(|| regex(r"^(帰る|かえる|帰り|かえり)$"));
static SETTINGS_WORDS: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^(設定|せってい|変更|へんこう)$"));
static HELP_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"^(ヘルプ|へるぷ|help|使い方|つかいかた|操作|そうさ|\?)$")
});

// Phrase cues, matched anywhere in the untrimmed text.
static ARRIVE_PHRASE: LazyLock<Regex> = LazyLock::new(|| regex(r"(会社|着|つ).*たい"));
static IN_TIME_PHRASE: LazyLock<Regex> = LazyLock::new(|| regex(r"に(間に合|まにあ)"));
static DEPART_PHRASE: LazyLock<Regex> = LazyLock::new(|| regex(r"(出|で).*たい"));
static EXPLICIT_DEPART: LazyLock<Regex> = LazyLock::new(|| regex(r"(出|で)たい|出発したい"));
static HOME_WORDS: LazyLock<Regex> = LazyLock::new(|| regex(r"(家|いえ|自宅|帰|かえ)"));
static NOTIFY_WORDS: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(通知|つうち|リマインド|教えて|おしえて)"));

const COMPANY: &str = "会社";

/// Pull a clock time out of free text.
///
/// Recognises 「9時30分」, 「9:30」, 「9時半」 and 「9時」, in that order of
/// preference. Hours of 24 or more are rejected, as are minutes of 60 or
/// more.
///
/// # Examples
///
/// ```
/// use bus_server::intent::extract_time;
///
/// assert_eq!(extract_time("9時に着きたい").unwrap().to_string(), "09:00");
/// assert_eq!(extract_time("18時30分に会社を出たい").unwrap().to_string(), "18:30");
/// assert_eq!(extract_time("7時半").unwrap().to_string(), "07:30");
/// assert!(extract_time("こんにちは").is_none());
/// ```
pub fn extract_time(text: &str) -> Option<ClockTime> {
    let patterns: [(&Regex, Option<u32>); 4] = [
        (&HOUR_MINUTE, None),
        (&COLON, None),
        (&HALF_PAST, Some(30)),
        (&HOUR_ONLY, Some(0)),
    ];

    patterns.into_iter().find_map(|(pattern, fixed_minute)| {
        let caps = pattern.captures(text)?;
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute = match fixed_minute {
            Some(m) => m,
            None => caps.get(2)?.as_str().parse().ok()?,
        };
        ClockTime::from_hm(hour, minute)
    })
}

/// Classify a text message.
pub fn parse_intent(text: &str) -> Intent {
    let normalized = text.trim().to_lowercase();

    if GO_WORDS.is_match(&normalized) {
        return Intent::SearchOutbound;
    }
    if RETURN_WORDS.is_match(&normalized) {
        return Intent::SearchInbound;
    }
    if SETTINGS_WORDS.is_match(&normalized) {
        return Intent::Settings;
    }
    if HELP_WORDS.is_match(&normalized) {
        return Intent::Help;
    }

    // 「会社を出たい」 also matches the arrive cue, so an explicit "want to
    // leave" is checked first
    if EXPLICIT_DEPART.is_match(text) {
        if let Some(intent) = depart_intent(text) {
            return intent;
        }
    }

    if ARRIVE_PHRASE.is_match(text) || IN_TIME_PHRASE.is_match(text) {
        if let Some(time) = extract_time(text) {
            let direction = if text.contains(COMPANY) {
                Direction::Outbound
            } else if HOME_WORDS.is_match(text) {
                Direction::Inbound
            } else {
                Direction::Outbound
            };
            return Intent::ArriveBy { time, direction };
        }
    }

    if DEPART_PHRASE.is_match(text) {
        if let Some(intent) = depart_intent(text) {
            return intent;
        }
    }

    if NOTIFY_WORDS.is_match(text) {
        if let Some(time) = extract_time(text) {
            return Intent::Notification { time };
        }
    }

    Intent::Unknown
}

fn depart_intent(text: &str) -> Option<Intent> {
    let time = extract_time(text)?;
    // Leaving the company means heading home
    let direction = if text.contains(COMPANY) {
        Direction::Inbound
    } else {
        Direction::Outbound
    };
    Some(Intent::DepartAt { time, direction })
}
