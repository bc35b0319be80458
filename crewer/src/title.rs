//! Production names inferred from legacy show titles.
//!
//! Legacy shows were created one per broadcast slot, so related shows share a
//! title that only differs by a trailing episode number or air date:
//!
//! - `Morning News - Episode 12`, `Morning News - Ep. 12`
//! - `Morning News - 3/1/2024`
//! - `Morning News (2024-03-01)`
//!
//! All of the above normalize to `Morning News`.

use once_cell::sync::Lazy;
use regex::Regex;

static EPISODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*-\s*(?:episode|ep\.?)\s*\d+$").expect("episode marker pattern")
});

static SLASH_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*-\s*\d{1,2}/\d{1,2}/\d{4}$").expect("slash date pattern")
});

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(\d{4}-\d{2}-\d{2}\)$").expect("iso date pattern"));

fn strip<'a>(marker: &Regex, title: &'a str) -> &'a str {
    marker
        .find(title)
        .map(|m| title[..m.start()].trim_end())
        .unwrap_or(title)
}

/// Strips trailing episode and date markers until none is left.
///
/// A title made only of markers normalizes to an empty name, so such shows
/// still share one production.
pub fn normalize_title(title: &str) -> String {
    let mut name = title.trim();

    loop {
        let stripped = [&*EPISODE, &*SLASH_DATE, &*ISO_DATE]
            .into_iter()
            .fold(name, |name, marker| strip(marker, name));

        if stripped == name {
            break;
        }

        name = stripped;
    }

    name.to_owned()
}
