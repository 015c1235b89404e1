use std::sync::{Arc, Mutex};

use crate::util::sync::lock;

/// Holds the downloaded bytes of the most recently loaded URL so a restart or
/// repeat-one does not download the file again.
#[derive(Clone, Default)]
pub struct SourceCache {
    entry: Arc<Mutex<Option<(String, Arc<[u8]>)>>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Arc<[u8]>> {
        lock(&self.entry)
            .as_ref()
            .filter(|(cached, _)| cached == url)
            .map(|(_, data)| data.clone())
    }

    pub fn insert(&self, url: String, data: Arc<[u8]>) {
        *lock(&self.entry) = Some((url, data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_latest_url() {
        let cache = SourceCache::new();
        cache.insert("a".into(), Arc::from(vec![1u8, 2]));
        cache.insert("b".into(), Arc::from(vec![3u8]));
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("b").as_deref(), Some(&[3u8][..]));
    }
}
