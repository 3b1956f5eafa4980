// src/ingest/select.rs
//! Entry selection and projection: `RawEntry` in, `NormalizedEntry` out,
//! feed order preserved.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::ingest::parse::RawEntry;

/// Which entries a run keeps. Matches are exact string comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Keep entries announced as "new" or "cross"; anything else, including
    /// a missing announce type, is excluded.
    AnnounceType,
    /// Keep entries whose category list contains `category`.
    Category { category: String },
    /// Category match plus published-day equality: the entry's published
    /// timestamp, truncated to a UTC calendar day, must equal
    /// `now - days_back` days.
    CategoryOnDay { category: String, days_back: i64 },
}

/// Immutable projection of a kept entry; lives for one pipeline run only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub title: String,
    pub page_url: String,
    /// Source date literal, not re-validated.
    pub published: String,
    pub summary: String,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    pub pdf_url: String,
}

/// Filter then project. Pure given `now`; applying the predicate twice
/// yields the same subset in the same order.
///
/// A kept entry missing a required field fails the whole run. One malformed
/// record therefore drops the entire digest, matching the upstream job's
/// all-or-nothing behavior.
pub fn select_entries(
    entries: Vec<RawEntry>,
    policy: &SelectionPolicy,
    now: DateTime<Utc>,
) -> Result<Vec<NormalizedEntry>> {
    let target_day = target_day(policy, now);
    entries
        .into_iter()
        .filter(|e| matches_policy(e, policy, target_day))
        .map(project)
        .collect()
}

/// The calendar day a `CategoryOnDay` policy compares against, if any.
pub fn target_day(policy: &SelectionPolicy, now: DateTime<Utc>) -> Option<NaiveDate> {
    match policy {
        SelectionPolicy::CategoryOnDay { days_back, .. } => {
            let day = now.date_naive();
            if *days_back >= 0 {
                day.checked_sub_days(Days::new(*days_back as u64))
            } else {
                day.checked_add_days(Days::new(days_back.unsigned_abs()))
            }
        }
        _ => None,
    }
}

/// Predicate over a raw entry. Pure; safe to apply repeatedly.
pub fn matches_policy(
    entry: &RawEntry,
    policy: &SelectionPolicy,
    target_day: Option<NaiveDate>,
) -> bool {
    match policy {
        SelectionPolicy::AnnounceType => matches!(
            entry.announce_type.as_deref(),
            Some("new") | Some("cross")
        ),
        SelectionPolicy::Category { category } => has_category(entry, category),
        SelectionPolicy::CategoryOnDay { category, .. } => {
            has_category(entry, category)
                && match (published_day(entry), target_day) {
                    (Some(day), Some(target)) => day == target,
                    _ => false,
                }
        }
    }
}

fn has_category(entry: &RawEntry, category: &str) -> bool {
    entry.categories.iter().any(|c| c == category)
}

/// Published timestamp truncated to a UTC calendar day. Feeds carry either
/// RFC 3339 (Atom) or RFC 2822 (RSS); anything else excludes the entry from
/// day-equality selection.
fn published_day(entry: &RawEntry) -> Option<NaiveDate> {
    let raw = entry.published.as_deref()?;
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

fn project(entry: RawEntry) -> Result<NormalizedEntry> {
    let title = required(entry.title, "title")?;
    let page_url = required(entry.page_url, "link")?;
    let summary = required(entry.summary, "summary")?;
    let pdf_url = entry
        .pdf_url
        .unwrap_or_else(|| derive_pdf_url(&page_url));

    Ok(NormalizedEntry {
        title,
        page_url,
        published: entry.published.unwrap_or_default(),
        summary,
        authors: entry.authors,
        categories: entry.categories,
        pdf_url,
    })
}

fn required(field: Option<String>, name: &str) -> Result<String> {
    field.ok_or_else(|| anyhow!("selected entry is missing required field `{name}`"))
}

/// arXiv serves the PDF at the abstract URL with one path segment swapped.
pub fn derive_pdf_url(page_url: &str) -> String {
    page_url.replace("/abs/", "/pdf/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(published: &str, categories: &[&str]) -> RawEntry {
        RawEntry {
            title: Some("t".into()),
            page_url: Some("https://arxiv.org/abs/2403.00001".into()),
            published: Some(published.into()),
            summary: Some("s".into()),
            categories: categories.iter().map(|s| s.to_string()).collect(),
            ..RawEntry::default()
        }
    }

    fn policy_cl_minus(days_back: i64) -> SelectionPolicy {
        SelectionPolicy::CategoryOnDay {
            category: "cs.CL".into(),
            days_back,
        }
    }

    #[test]
    fn announce_type_keeps_new_and_cross_only() {
        let policy = SelectionPolicy::AnnounceType;
        for (ty, expected) in [
            (Some("new"), true),
            (Some("cross"), true),
            (Some("replace"), false),
            (None, false),
        ] {
            let e = RawEntry {
                announce_type: ty.map(str::to_string),
                ..RawEntry::default()
            };
            assert_eq!(matches_policy(&e, &policy, None), expected, "{ty:?}");
        }
    }

    #[test]
    fn day_equality_ignores_time_of_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap();
        let policy = policy_cl_minus(0);
        let target = target_day(&policy, now);
        let morning = entry("2024-03-05T10:00:00Z", &["cs.CL"]);
        assert!(matches_policy(&morning, &policy, target));
    }

    #[test]
    fn previous_day_just_before_midnight_is_excluded() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap();
        let policy = policy_cl_minus(0);
        let target = target_day(&policy, now);
        let late = entry("2024-03-04T23:59:59Z", &["cs.CL"]);
        assert!(!matches_policy(&late, &policy, target));
    }

    #[test]
    fn days_back_offsets_the_target_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        let policy = policy_cl_minus(1);
        let target = target_day(&policy, now);
        assert!(matches_policy(
            &entry("2024-03-04T12:00:00Z", &["cs.CL"]),
            &policy,
            target
        ));
        assert!(!matches_policy(
            &entry("2024-03-05T12:00:00Z", &["cs.CL"]),
            &policy,
            target
        ));
    }

    #[test]
    fn rfc2822_published_dates_parse_too() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        let policy = policy_cl_minus(0);
        let target = target_day(&policy, now);
        let e = entry("Tue, 05 Mar 2024 01:00:00 +0000", &["cs.CL"]);
        assert!(matches_policy(&e, &policy, target));
    }

    #[test]
    fn filtering_is_idempotent_and_order_preserving() {
        let policy = SelectionPolicy::Category {
            category: "cs.CL".into(),
        };
        let entries = vec![
            entry("2024-03-05T10:00:00Z", &["cs.CL"]),
            entry("2024-03-05T11:00:00Z", &["cs.LG"]),
            entry("2024-03-05T12:00:00Z", &["cs.CL", "cs.LG"]),
        ];
        let once: Vec<&RawEntry> = entries
            .iter()
            .filter(|e| matches_policy(e, &policy, None))
            .collect();
        let twice: Vec<&&RawEntry> = once
            .iter()
            .filter(|e| matches_policy(e, &policy, None))
            .collect();
        assert_eq!(once.len(), 2);
        assert_eq!(twice.len(), once.len());
        assert_eq!(once[0].published.as_deref(), Some("2024-03-05T10:00:00Z"));
        assert_eq!(once[1].published.as_deref(), Some("2024-03-05T12:00:00Z"));
    }

    #[test]
    fn pdf_url_is_derived_by_path_substitution() {
        assert_eq!(
            derive_pdf_url("https://arxiv.org/abs/2403.00001"),
            "https://arxiv.org/pdf/2403.00001"
        );
    }

    #[test]
    fn feed_provided_pdf_link_wins_over_derivation() {
        let mut e = entry("2024-03-05T10:00:00Z", &["cs.CL"]);
        e.pdf_url = Some("https://arxiv.org/pdf/2403.00001v1".into());
        let out = select_entries(
            vec![e],
            &SelectionPolicy::Category {
                category: "cs.CL".into(),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(out[0].pdf_url, "https://arxiv.org/pdf/2403.00001v1");
    }

    #[test]
    fn missing_summary_on_a_kept_entry_fails_the_run() {
        let mut e = entry("2024-03-05T10:00:00Z", &["cs.CL"]);
        e.summary = None;
        let err = select_entries(
            vec![e],
            &SelectionPolicy::Category {
                category: "cs.CL".into(),
            },
            Utc::now(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("summary"));
    }
}
