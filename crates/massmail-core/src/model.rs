use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque cluster identifier. The JSON feeds use integers, floats and strings interchangeably.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ClusterId {
    /// A new identifier that no existing dataset can contain.
    pub fn fresh() -> Self {
        Self::Text(uuid::Uuid::new_v4().to_string())
    }

    // `3` and `3.0` name the same cluster.
    fn integral(&self) -> Option<i64> {
        const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if v.fract() == 0.0 && v.abs() <= MAX_SAFE => Some(*v as i64),
            _ => None,
        }
    }
}

impl PartialEq for ClusterId {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.integral(), other.integral()) {
            return a == b;
        }
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ClusterId {}

impl Hash for ClusterId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Some(v) = self.integral() {
            state.write_u8(0);
            v.hash(state);
            return;
        }
        match self {
            Self::Float(v) => {
                state.write_u8(1);
                v.to_bits().hash(state);
            }
            Self::Text(s) => {
                state.write_u8(2);
                s.hash(state);
            }
            Self::Int(_) => {}
        }
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ClusterId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ClusterId {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for ClusterId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Identity of an email: its position in the dataset's email collection.
///
/// Emails are never removed or reordered, so the position is stable across mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailId(usize);

impl EmailId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for EmailId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub x: f64,
    pub y: f64,
}

impl Embedding {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    #[serde(default)]
    pub content: String,
    pub cluster_id: ClusterId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Embedding>,
}

impl Email {
    pub fn new(content: impl Into<String>, cluster_id: ClusterId, embedding: Embedding) -> Self {
        Self {
            content: content.into(),
            cluster_id,
            time_stamp: None,
            embedding: Some(embedding),
        }
    }

    /// Text shown when hovering an email.
    pub fn tooltip(&self) -> &str {
        if self.content.is_empty() {
            "(no content)"
        } else {
            &self.content
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    #[serde(default)]
    pub label: String,
}

impl Cluster {
    pub fn new(id: impl Into<ClusterId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    #[serde(default)]
    pub priority: f64,
}

/// Which position function variant is active for a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    #[default]
    Original,
    Exploded,
}

impl FromStr for LayoutMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" | "overlap" => Ok(Self::Original),
            "exploded" => Ok(Self::Exploded),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Original => f.write_str("ORIGINAL"),
            Self::Exploded => f.write_str("EXPLODED"),
        }
    }
}

/// The dataset as it appears on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetData {
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub emails: Vec<Email>,
}

/// Stamp identifying one dataset value. Every construction and every mutation draws a new one,
/// so geometry derived from an older value can be recognized as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Revision(u64);

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

impl Revision {
    pub(crate) fn next() -> Self {
        Self(NEXT_REVISION.fetch_add(1, Ordering::Relaxed))
    }
}

/// Top-level aggregate: ordered clusters, emails and the auxiliary keyword list.
///
/// Cluster order defines the EXPLODED packing sequence. Cluster membership is always derived
/// from `Email::cluster_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "DatasetData", into = "DatasetData")]
pub struct Dataset {
    pub(crate) keywords: Vec<Keyword>,
    pub(crate) clusters: IndexMap<ClusterId, Cluster>,
    pub(crate) emails: Vec<Email>,
    pub(crate) revision: Revision,
}

impl From<DatasetData> for Dataset {
    fn from(data: DatasetData) -> Self {
        let mut clusters: IndexMap<ClusterId, Cluster> = IndexMap::new();
        for cluster in data.clusters {
            if clusters.contains_key(&cluster.id) {
                tracing::warn!(id = %cluster.id, "duplicate cluster id; keeping the first");
                continue;
            }
            clusters.insert(cluster.id.clone(), cluster);
        }
        Self {
            keywords: data.keywords,
            clusters,
            emails: data.emails,
            revision: Revision::next(),
        }
    }
}

impl From<Dataset> for DatasetData {
    fn from(dataset: Dataset) -> Self {
        Self {
            keywords: dataset.keywords,
            clusters: dataset.clusters.into_values().collect(),
            emails: dataset.emails,
        }
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::from(DatasetData::default())
    }
}

impl Dataset {
    pub fn new(keywords: Vec<Keyword>, clusters: Vec<Cluster>, emails: Vec<Email>) -> Self {
        Self::from(DatasetData {
            keywords,
            clusters,
            emails,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let out = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(out)
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// Keywords ordered for display: highest priority first, ties in input order.
    pub fn keywords_by_priority(&self) -> Vec<&Keyword> {
        let mut out: Vec<&Keyword> = self.keywords.iter().collect();
        out.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        out
    }

    pub fn clusters(&self) -> impl ExactSizeIterator<Item = &Cluster> {
        self.clusters.values()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn cluster(&self, id: &ClusterId) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    pub fn cluster_at(&self, position: usize) -> Option<&Cluster> {
        self.clusters.get_index(position).map(|(_, c)| c)
    }

    /// Position of the cluster in the packing sequence.
    pub fn cluster_position(&self, id: &ClusterId) -> Option<usize> {
        self.clusters.get_index_of(id)
    }

    /// Looks a cluster up by the textual form of its id (command line input).
    pub fn cluster_by_key(&self, key: &str) -> Option<&Cluster> {
        self.clusters.values().find(|c| c.id.to_string() == key)
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn email(&self, id: EmailId) -> Result<&Email> {
        self.emails
            .get(id.index())
            .ok_or_else(|| Error::unknown_email(id))
    }

    pub fn email_ids(&self) -> impl Iterator<Item = EmailId> + '_ {
        (0..self.emails.len()).map(EmailId::new)
    }

    /// Emails whose `cluster_id` names `cluster`, in dataset order.
    pub fn members<'a>(
        &'a self,
        cluster: &'a ClusterId,
    ) -> impl Iterator<Item = (EmailId, &'a Email)> + 'a {
        self.emails
            .iter()
            .enumerate()
            .filter(move |(_, e)| &e.cluster_id == cluster)
            .map(|(i, e)| (EmailId::new(i), e))
    }

    pub fn member_count(&self, cluster: &ClusterId) -> usize {
        self.members(cluster).count()
    }
}
