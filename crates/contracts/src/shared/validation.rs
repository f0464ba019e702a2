//! Field validators shared by forms and the bulk importer

use std::ops::RangeInclusive;

/// Allowed range for every performance-assessment rating
pub const RATING_RANGE: RangeInclusive<i32> = 1..=10;

/// Allowed range for years of experience (NUMERIC(4,1) column)
pub const EXPERIENCE_RANGE: RangeInclusive<f64> = 0.0..=999.9;

/// Fractional digits kept for years of experience
pub const EXPERIENCE_PLACES: usize = 1;

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_LOCAL_PART_LENGTH: usize = 64;
const MAX_DOMAIN_LABEL_LENGTH: usize = 63;

/// Syntactic e-mail check (no deliverability lookup)
///
/// Malformed input is reported as invalid, never as an error.
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.len() > MAX_EMAIL_LENGTH {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > MAX_LOCAL_PART_LENGTH {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~.".contains(c))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    // A bare host ("localhost") is not accepted
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_DOMAIN_LABEL_LENGTH
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld_ok = labels
        .last()
        .map(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false);

    labels_ok && tld_ok
}

/// Inclusive range check
pub fn in_range<T: PartialOrd>(value: T, range: &RangeInclusive<T>) -> bool {
    range.contains(&value)
}

/// True when `value` needs no more than `places` fractional digits
pub fn fits_places(value: f64, places: usize) -> bool {
    let scaled = value * 10f64.powi(places as i32);
    (scaled - scaled.round()).abs() < 1e-6
}

/// Rating check for the assessment flow: fails below 1 or above 10
pub fn is_valid_rating(value: i32) -> bool {
    in_range(value, &RATING_RANGE)
}
