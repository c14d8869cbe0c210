use crate::host::Environment;
use crate::models::{Category, Entry, SliceView};
use crate::store::day_key;
use chrono::Utc;
use rand::{Rng, seq::SliceRandom};

pub const WINDOW_SIZE: usize = 8;

pub const NO_SELECTION: &str = "No slice chosen yet.";

pub const ENCOURAGEMENTS: [&str; 32] = [
    "Silence the noisy tab. Keep only what you need for this hour.",
    "Pick one task that scares you a little and give it a clean 25 minutes.",
    "Reply only to the messages that truly move something forward.",
    "Tiny breaks beat big crashes. Stand, stretch, sip water.",
    "Name this hour out loud. Deep work? Rest? Own it.",
    "Write the first ugly draft. Pretty can come later.",
    "Mute one more notification than feels comfortable.",
    "Ask someone one non-boring question and listen all the way.",
    "Close your eyes for 30 seconds and notice 4 sounds.",
    "Move your body just enough to feel slightly silly.",
    "Pick the smallest version of the thing you’re avoiding.",
    "You don’t have to clear the list; you just choose the next slice.",
    "Set a tiny rule: no scrolling until this hour ends.",
    "Turn one errand into a future gift for yourself.",
    "If it takes under 2 minutes, ship it now.",
    "Write one sentence describing what ‘done’ looks like for this hour.",
    "Half-finished is fine. Showing up is the real streak.",
    "Let one ball drop on purpose. Protect the important one.",
    "Send a message you meant to send weeks ago.",
    "Lower the bar: aim for ‘slightly better’ not ‘perfect’.",
    "Listen to one song with no other tabs open.",
    "Make your desk 5% kinder to Future You.",
    "Say no to one micro-distraction. Notice how it feels.",
    "You can always pick a softer slice next hour.",
    "If you’re tired, rest is not a failure slice.",
    "Tidy one square foot of your space.",
    "Rename your task with friendlier words.",
    "Ask: what would make this hour easy mode?",
    "Turn your phone face down for 10 minutes.",
    "This hour doesn’t have to prove anything.",
    "Make a tiny checklist, then enjoy crossing one thing off.",
    "Let this slice be narrow so you can actually cut through.",
];

/// The last `window_size` categories, oldest first, left-padded with `None`
/// so the strip is always exactly `window_size` long.
pub fn recent_tiles(entries: &[Entry], window_size: usize) -> Vec<Option<Category>> {
    let start = entries.len().saturating_sub(window_size);
    let recent = &entries[start..];

    let mut tiles = Vec::with_capacity(window_size);
    tiles.resize(window_size - recent.len(), None);
    tiles.extend(recent.iter().map(|entry| Some(entry.category.clone())));
    tiles
}

pub fn todays_entries<'a>(entries: &'a [Entry], today: &str) -> Vec<&'a Entry> {
    entries.iter().filter(|entry| entry.date == today).collect()
}

pub fn status_line(entries: &[Entry], today: &str) -> String {
    match todays_entries(entries, today).last() {
        Some(latest) => format!("Current slice: {}", latest.category.label()),
        None => NO_SELECTION.to_string(),
    }
}

pub fn count_label(entries: &[Entry], today: &str) -> String {
    let count = todays_entries(entries, today).len();
    let unit = if count == 1 { "slice" } else { "slices" };
    format!("{count} {unit} today")
}

pub fn pick_encouragement<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or("")
}

pub fn build_view(entries: &[Entry], environment: Environment) -> SliceView {
    let today = day_key(Utc::now());
    build_view_at(entries, &today, environment, &mut rand::thread_rng())
}

pub fn build_view_at<R: Rng + ?Sized>(
    entries: &[Entry],
    today: &str,
    environment: Environment,
    rng: &mut R,
) -> SliceView {
    let hint = if entries.is_empty() {
        String::new()
    } else {
        pick_encouragement(&ENCOURAGEMENTS, rng).to_string()
    };

    SliceView {
        tiles: recent_tiles(entries, WINDOW_SIZE),
        status: status_line(entries, today),
        count_label: count_label(entries, today),
        today_count: todays_entries(entries, today).len(),
        hint,
        environment: environment.label().to_string(),
    }
}
