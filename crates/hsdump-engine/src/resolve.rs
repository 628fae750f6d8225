use chrono::{DateTime, Utc};
use hsdump_types::ObjectVersion;

/// Select the version to restore from a newest-first history.
///
/// Without a cutoff the newest version wins. With a cutoff, the first
/// version whose modification time is at or before the cutoff wins (the
/// boundary is inclusive). If every version is newer than the cutoff, the
/// oldest version is returned, so a non-empty history always resolves.
///
/// # Panics
///
/// Panics on an empty history. A well-formed domain has at least one
/// version per object, so an empty slice here is a contract violation by
/// the version-history source, not a recoverable condition.
pub fn select_version(versions: &[ObjectVersion], cutoff: Option<DateTime<Utc>>) -> &str {
    assert!(
        !versions.is_empty(),
        "select_version: no versions available"
    );
    let Some(cutoff) = cutoff else {
        return &versions[0].id;
    };
    for version in versions {
        if version.last_modified <= cutoff {
            return &version.id;
        }
    }
    &versions[versions.len() - 1].id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn history() -> Vec<ObjectVersion> {
        // Newest first, as the source contract requires.
        vec![
            ObjectVersion::new("v3", Utc.timestamp_opt(300, 0).unwrap(), 30),
            ObjectVersion::new("v2", Utc.timestamp_opt(200, 0).unwrap(), 20),
            ObjectVersion::new("v1", Utc.timestamp_opt(100, 0).unwrap(), 10),
        ]
    }

    #[test]
    fn no_cutoff_selects_newest() {
        assert_eq!(select_version(&history(), None), "v3");
    }

    #[test]
    fn cutoff_boundary_is_inclusive() {
        let cutoff = Utc.timestamp_opt(200, 0).unwrap();
        assert_eq!(select_version(&history(), Some(cutoff)), "v2");
    }

    #[test]
    fn cutoff_between_versions_selects_older() {
        let cutoff = Utc.timestamp_opt(250, 0).unwrap();
        assert_eq!(select_version(&history(), Some(cutoff)), "v2");
    }

    #[test]
    fn cutoff_before_all_falls_back_to_oldest() {
        let cutoff = Utc.timestamp_opt(50, 0).unwrap();
        assert_eq!(select_version(&history(), Some(cutoff)), "v1");
    }

    #[test]
    #[should_panic(expected = "no versions available")]
    fn empty_history_is_a_contract_violation() {
        select_version(&[], None);
    }
}
