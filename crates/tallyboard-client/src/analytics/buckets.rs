use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Spend buckets shown by category-comparison widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpendBucket {
    Grocery,
    Restaurant,
}

impl SpendBucket {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grocery => "grocery",
            Self::Restaurant => "restaurant",
        }
    }
}

const STANDARD_TAGS: [(&str, SpendBucket); 10] = [
    ("groceries", SpendBucket::Grocery),
    ("grocery", SpendBucket::Grocery),
    ("supermarket", SpendBucket::Grocery),
    ("produce", SpendBucket::Grocery),
    ("restaurants", SpendBucket::Restaurant),
    ("restaurant", SpendBucket::Restaurant),
    ("dining", SpendBucket::Restaurant),
    ("fast_food", SpendBucket::Restaurant),
    ("coffee", SpendBucket::Restaurant),
    ("takeout", SpendBucket::Restaurant),
];

/// Category tag to bucket mapping. Tags outside the map belong to no bucket.
#[derive(Debug, Clone)]
pub struct BucketMap {
    by_tag: BTreeMap<String, SpendBucket>,
}

impl BucketMap {
    pub fn new<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, SpendBucket)>,
    {
        Self {
            by_tag: entries
                .into_iter()
                .map(|(tag, bucket)| (normalize_tag(tag), bucket))
                .collect(),
        }
    }

    /// The shared mapping, built on first use.
    pub fn standard() -> &'static BucketMap {
        static STANDARD: OnceLock<BucketMap> = OnceLock::new();
        STANDARD.get_or_init(|| Self::new(STANDARD_TAGS))
    }

    pub fn bucket_for(&self, category: &str) -> Option<SpendBucket> {
        self.by_tag.get(&normalize_tag(category)).copied()
    }

    pub fn tags_for(&self, bucket: SpendBucket) -> Vec<&str> {
        self.by_tag
            .iter()
            .filter(|(_, value)| **value == bucket)
            .map(|(tag, _)| tag.as_str())
            .collect()
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::{BucketMap, SpendBucket};

    #[test]
    fn lookup_ignores_case_and_separators() {
        let map = BucketMap::standard();
        assert_eq!(map.bucket_for("Groceries"), Some(SpendBucket::Grocery));
        assert_eq!(map.bucket_for(" fast-food "), Some(SpendBucket::Restaurant));
        assert_eq!(map.bucket_for("Fast Food"), Some(SpendBucket::Restaurant));
    }

    #[test]
    fn unknown_tags_have_no_bucket() {
        let map = BucketMap::standard();
        assert_eq!(map.bucket_for("utilities"), None);
        assert_eq!(map.bucket_for(""), None);
    }

    #[test]
    fn custom_maps_override_the_standard_tags() {
        let map = BucketMap::new([("bodega", SpendBucket::Grocery)]);
        assert_eq!(map.bucket_for("bodega"), Some(SpendBucket::Grocery));
        assert_eq!(map.bucket_for("groceries"), None);
        assert_eq!(map.tags_for(SpendBucket::Grocery), vec!["bodega"]);
    }
}
