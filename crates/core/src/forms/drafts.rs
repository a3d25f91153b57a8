//! Transient storage for sections that could not be saved

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;
use visadesk_domain::{Ds160Section, SectionData};

/// Draft sections keyed by client-link token
pub trait DraftStore: Send + Sync {
    fn put(&self, token: &str, section: Ds160Section, data: SectionData);

    /// All drafted sections for `token`
    fn get(&self, token: &str) -> BTreeMap<Ds160Section, SectionData>;

    fn remove(&self, token: &str, section: Ds160Section);

    fn clear(&self, token: &str);
}

/// Process-lifetime draft store
#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    drafts: Mutex<HashMap<String, BTreeMap<Ds160Section, SectionData>>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for InMemoryDraftStore {
    fn put(&self, token: &str, section: Ds160Section, data: SectionData) {
        self.drafts.lock().entry(token.to_string()).or_default().insert(section, data);
    }

    fn get(&self, token: &str) -> BTreeMap<Ds160Section, SectionData> {
        self.drafts.lock().get(token).cloned().unwrap_or_default()
    }

    fn remove(&self, token: &str, section: Ds160Section) {
        let mut drafts = self.drafts.lock();
        if let Some(sections) = drafts.get_mut(token) {
            sections.remove(&section);
            if sections.is_empty() {
                drafts.remove(token);
            }
        }
    }

    fn clear(&self, token: &str) {
        self.drafts.lock().remove(token);
    }
}
