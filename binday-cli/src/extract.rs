//! Helper that pulls the ReCollect identifiers out of a pasted cURL command.

use std::io::{self, BufRead};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use binday_core::config::{Configuration, RecollectSettings};
use regex::Regex;

static PLACE_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"places/([0-9A-Fa-f-]+)").expect("valid place regex"));
static SERVICE_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"services/([0-9]+)").expect("valid service regex"));
static PLACE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)X-Recollect-Place:\s*([0-9A-F-]+):([0-9]+)").expect("valid header regex")
});

/// Place and service identifiers found in `command`.
///
/// URL segments win; the `X-Recollect-Place` header fills whatever they miss.
pub(crate) fn extract_ids(command: &str) -> Option<RecollectSettings> {
    let capture = |regex: &Regex, group: usize| {
        regex
            .captures(command)
            .and_then(|captures| captures.get(group))
            .map(|found| found.as_str().to_owned())
    };

    let place_id = capture(&PLACE_IN_URL, 1).or_else(|| capture(&PLACE_HEADER, 1))?;
    let service_id = capture(&SERVICE_IN_URL, 1).or_else(|| capture(&PLACE_HEADER, 2))?;

    Some(RecollectSettings {
        place_id,
        service_id,
    })
}

/// Store extracted identifiers, keeping the notification settings already on disk.
pub(crate) fn save_ids(config_path: &Path, ids: RecollectSettings) -> Result<()> {
    let mut config = Configuration::load(config_path)?;
    config.recollect = ids;
    config.save(config_path)?;
    Ok(())
}

/// Interactive flow: read a cURL command from stdin until an empty line.
///
/// Returns whether identifiers were found and written.
#[expect(
    clippy::print_stdout,
    reason = "interactive helper talks to the terminal"
)]
pub(crate) fn run(config_path: &Path) -> Result<bool> {
    println!("Please paste a curl command from your waste collection website's network requests.");
    println!("(Right-click a request in browser dev tools Network tab -> Copy as cURL)");
    println!("Press Enter twice when done pasting:");

    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }

    let Some(ids) = extract_ids(&lines.join(" ")) else {
        println!();
        println!("Could not extract the IDs from the provided curl command.");
        println!("Please make sure you copied a valid curl command from the ReCollect API.");
        return Ok(false);
    };

    println!();
    println!("Extracted IDs:");
    println!("place_id: {}", ids.place_id);
    println!("service_id: {}", ids.service_id);

    save_ids(config_path, ids)?;
    println!();
    println!("Updated config file with these IDs: {}", config_path.display());
    Ok(true)
}

/// Explain where the identifiers can be found.
#[expect(clippy::print_stdout, reason = "help text is the command's output")]
pub(crate) fn print_config_help() {
    println!(
        "
=== HOW TO FIND YOUR RECOLLECT IDs ===
To find your place_id and service_id:
1. Visit your local waste management website that uses ReCollect
2. Open the collection calendar page
3. Open browser developer tools (F12 or right-click -> Inspect)
4. Go to the Network tab
5. Refresh the page and look for requests to api.recollect.net
6. Find a request URL like:
   https://api.recollect.net/api/places/[PLACE_ID]/services/[SERVICE_ID]/events

Another method:
1. Copy a cURL command from the Network tab in developer tools
2. Run `binday --extract-ids` and paste it
   The IDs may also appear in the X-Recollect-Place header as: [PLACE_ID]:[SERVICE_ID]

Example values:
place_id: XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX (a UUID format)
service_id: XXX (a numeric ID)
======================================="
    );
}

#[cfg(test)]
mod tests {
    use binday_core::config::CONFIG_FILE_NAME;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    const PLACE: &str = "0BDBC0BE-1E3C-11E6-8FA5-C1E3BD5A2D9E";

    #[test]
    fn ids_come_from_the_url() {
        let command = format!(
            "curl 'https://api.recollect.net/api/places/{PLACE}/services/208/events?nomerge=1' \
             -H 'Accept: application/json'"
        );

        let ids = extract_ids(&command).expect("ids");

        assert_eq!(ids.place_id, PLACE);
        assert_eq!(ids.service_id, "208");
    }

    #[test]
    fn header_fills_missing_url_parts() {
        let command = format!(
            "curl 'https://api.recollect.net/api/areas/Town/services/waste/pages' \
             -H 'X-Recollect-Place: {PLACE}:317'"
        );

        let ids = extract_ids(&command).expect("ids");

        assert_eq!(ids.place_id, PLACE);
        assert_eq!(ids.service_id, "317");
    }

    #[test]
    fn unrelated_command_yields_nothing() {
        assert!(extract_ids("curl https://example.com/calendar").is_none());
        assert!(extract_ids(&format!("curl https://x/api/places/{PLACE}/events")).is_none());
    }

    #[test]
    fn saving_keeps_notification_settings() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut existing = Configuration::default();
        existing.notifications.ntfy.enabled = true;
        existing.notifications.ntfy.topic = "bins".to_owned();
        existing.save(&path).expect("save");

        save_ids(
            &path,
            RecollectSettings {
                place_id: PLACE.to_owned(),
                service_id: "208".to_owned(),
            },
        )
        .expect("update");

        let updated = Configuration::load(&path).expect("load");
        assert_eq!(updated.recollect.place_id, PLACE);
        assert_eq!(updated.notifications, existing.notifications);
    }
}
