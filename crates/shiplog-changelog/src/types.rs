//! Taxonomy types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of change a commit describes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Breaking change
    Breaking,
    /// New functionality
    Added,
    /// Changed behavior
    Changed,
    /// Deprecated functionality
    Deprecated,
    /// Removed functionality
    Removed,
    /// Bug fix
    Fixed,
    /// Security fix
    Security,
    /// No recognizable change keyword
    Unknown,
}

impl ChangeType {
    /// All change types, in rendering order
    pub const ALL: [ChangeType; 8] = [
        Self::Breaking,
        Self::Added,
        Self::Changed,
        Self::Deprecated,
        Self::Removed,
        Self::Fixed,
        Self::Security,
        Self::Unknown,
    ];

    /// Section title for the rendered document
    pub fn section_title(&self) -> &'static str {
        match self {
            Self::Breaking => "Breaking",
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Deprecated => "Deprecated",
            Self::Removed => "Removed",
            Self::Fixed => "Fixed",
            Self::Security => "Security",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::str::FromStr for ChangeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breaking" => Ok(Self::Breaking),
            "added" => Ok(Self::Added),
            "changed" => Ok(Self::Changed),
            "deprecated" => Ok(Self::Deprecated),
            "removed" => Ok(Self::Removed),
            "fixed" => Ok(Self::Fixed),
            "security" => Ok(Self::Security),
            "unknown" => Ok(Self::Unknown),
            _ => Err(()),
        }
    }
}

/// Platform axis of the taxonomy.
///
/// `Internal` is a filtering tag only; classified commits always land in one
/// of the other three.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChangeCategory {
    /// Android-specific change
    Android,
    /// iOS-specific change
    Ios,
    /// Cross-platform change
    General,
    /// Internal-only marker, never an output bucket
    Internal,
}

impl ChangeCategory {
    /// The categories that appear in rendered output
    pub const OUTPUT: [ChangeCategory; 3] = [Self::General, Self::Android, Self::Ios];
}

impl std::str::FromStr for ChangeCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "general" => Ok(Self::General),
            "internal" => Ok(Self::Internal),
            _ => Err(()),
        }
    }
}

/// Rendered entries for one change type, split by platform
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformBuckets {
    /// Cross-platform entries
    pub general: Vec<String>,
    /// Android-specific entries
    pub android: Vec<String>,
    /// iOS-specific entries
    pub ios: Vec<String>,
}

impl PlatformBuckets {
    /// Whether any bucket holds an entry
    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.android.is_empty() && self.ios.is_empty()
    }

    fn bucket_mut(&mut self, category: ChangeCategory) -> Option<&mut Vec<String>> {
        match category {
            ChangeCategory::General => Some(&mut self.general),
            ChangeCategory::Android => Some(&mut self.android),
            ChangeCategory::Ios => Some(&mut self.ios),
            ChangeCategory::Internal => None,
        }
    }
}

/// Fixed-shape accumulator for classified entries.
///
/// Every change type key is present from construction; buckets grow by
/// append only, so entry order within a bucket is original commit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeTaxonomy {
    buckets: BTreeMap<ChangeType, PlatformBuckets>,
}

impl ChangeTaxonomy {
    /// Create an empty taxonomy with all change types present
    pub fn new() -> Self {
        let buckets = ChangeType::ALL
            .iter()
            .map(|t| (*t, PlatformBuckets::default()))
            .collect();
        Self { buckets }
    }

    /// Append a rendered entry. Internal is a filtering tag, not a bucket;
    /// appending under it is ignored.
    pub fn append(
        &mut self,
        change_type: ChangeType,
        category: ChangeCategory,
        message: impl Into<String>,
    ) {
        if let Some(bucket) = self
            .buckets
            .entry(change_type)
            .or_default()
            .bucket_mut(category)
        {
            bucket.push(message.into());
        }
    }

    /// Buckets for one change type
    pub fn get(&self, change_type: ChangeType) -> &PlatformBuckets {
        // All keys are inserted at construction.
        static EMPTY: PlatformBuckets = PlatformBuckets {
            general: Vec::new(),
            android: Vec::new(),
            ios: Vec::new(),
        };
        self.buckets.get(&change_type).unwrap_or(&EMPTY)
    }

    /// Iterate buckets in rendering order
    pub fn iter(&self) -> impl Iterator<Item = (ChangeType, &PlatformBuckets)> {
        ChangeType::ALL.iter().map(move |t| (*t, self.get(*t)))
    }

    /// Total number of classified entries
    pub fn len(&self) -> usize {
        self.buckets
            .values()
            .map(|b| b.general.len() + b.android.len() + b.ios.len())
            .sum()
    }

    /// Whether no entries were classified
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ChangeTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}
