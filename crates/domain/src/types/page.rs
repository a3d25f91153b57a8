//! Paged list results
//!
//! List endpoints answer either with a bare JSON array or with an envelope
//! `{data, total, page, limit}`. Both reshape into [`Page`].

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn single(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            total: len as u64,
            page: 1,
            limit: u32::try_from(len).unwrap_or(u32::MAX),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether more items exist past this page
    pub fn has_more(&self) -> bool {
        u64::from(self.page) * u64::from(self.limit) < self.total
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageWire<T> {
    Bare(Vec<T>),
    Envelope {
        #[serde(alias = "items", alias = "results")]
        data: Vec<T>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        page: Option<u32>,
        #[serde(default)]
        limit: Option<u32>,
    },
}

impl<'de, T> Deserialize<'de> for Page<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match PageWire::deserialize(deserializer)? {
            PageWire::Bare(items) => Self::single(items),
            PageWire::Envelope { data, total, page, limit } => {
                let len = data.len();
                Self {
                    total: total.unwrap_or(len as u64),
                    page: page.unwrap_or(1),
                    limit: limit.unwrap_or_else(|| u32::try_from(len).unwrap_or(u32::MAX)),
                    items: data,
                }
            }
        })
    }
}
