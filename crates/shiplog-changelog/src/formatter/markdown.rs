//! Markdown changelog formatter

use tracing::{debug, instrument};

use super::ChangelogFormatter;
use crate::types::{ChangeTaxonomy, PlatformBuckets};

/// Markdown changelog formatter.
///
/// Emits one section per change type in a fixed order, each with its general
/// entries followed by Android- and iOS-specific subsections. Empty sections
/// stay in the document rather than being removed, so releases always share
/// the same skeleton.
#[derive(Debug, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Create a new markdown formatter
    pub fn new() -> Self {
        Self
    }

    fn push_entries(output: &mut String, entries: &[String]) {
        for entry in entries {
            output.push_str("- ");
            output.push_str(entry);
            output.push('\n');
        }
        if !entries.is_empty() {
            output.push('\n');
        }
    }

    fn push_section(output: &mut String, title: &str, buckets: &PlatformBuckets) {
        output.push_str(&format!("### {}\n\n", title));
        Self::push_entries(output, &buckets.general);

        output.push_str("#### Android specific\n\n");
        Self::push_entries(output, &buckets.android);

        output.push_str("#### iOS specific\n\n");
        Self::push_entries(output, &buckets.ios);
    }
}

impl ChangelogFormatter for MarkdownFormatter {
    #[instrument(skip(self, taxonomy), fields(entry_count = taxonomy.len()))]
    fn format(&self, taxonomy: &ChangeTaxonomy, version: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("## {}\n\n", version));

        for (change_type, buckets) in taxonomy.iter() {
            Self::push_section(&mut output, change_type.section_title(), buckets);
        }

        debug!(output_len = output.len(), "markdown changelog formatted");
        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChangeCategory, ChangeType};

    #[test]
    fn test_format_empty_taxonomy_keeps_all_sections() {
        let formatter = MarkdownFormatter::new();
        let output = formatter.format(&ChangeTaxonomy::new(), "v1.2.3");

        assert!(output.starts_with("## v1.2.3\n"));
        for change_type in ChangeType::ALL {
            assert!(output.contains(&format!("### {}", change_type.section_title())));
        }
        assert_eq!(output.matches("#### Android specific").count(), 8);
        assert_eq!(output.matches("#### iOS specific").count(), 8);
    }

    #[test]
    fn test_format_places_entries_under_platform_subsections() {
        let mut taxonomy = ChangeTaxonomy::new();
        taxonomy.append(ChangeType::Added, ChangeCategory::General, "New prop");
        taxonomy.append(ChangeType::Fixed, ChangeCategory::Android, "Fix crash");

        let formatter = MarkdownFormatter::new();
        let output = formatter.format(&taxonomy, "v1.0.0");

        let added_at = output.find("### Added").unwrap();
        let new_prop_at = output.find("- New prop").unwrap();
        let added_android_at = output[added_at..].find("#### Android specific").unwrap() + added_at;
        assert!(added_at < new_prop_at && new_prop_at < added_android_at);

        let fixed_at = output.find("### Fixed").unwrap();
        let fix_crash_at = output.find("- Fix crash").unwrap();
        assert!(fixed_at < fix_crash_at);
        let fixed_android_at = output[fixed_at..].find("#### Android specific").unwrap() + fixed_at;
        assert!(fixed_android_at < fix_crash_at);
    }

    #[test]
    fn test_extension() {
        assert_eq!(MarkdownFormatter::new().extension(), "md");
    }
}
