use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Asset shown when the backend has no photo for the subject.
pub const DEFAULT_PHOTO: &str = "imgs/default_photo.svg";

/// The user whose profile the dynamic page shows.
pub const SUBJECT_ID: u32 = 4;

/// The four backend resources merged into one profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Personal,
    Photo,
    JobInfo,
    Details,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [Self::Personal, Self::Photo, Self::JobInfo, Self::Details];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Photo => "photo",
            Self::JobInfo => "job_info",
            Self::Details => "details",
        }
    }

    pub fn url(&self, backend_base: &str, subject_id: u32) -> String {
        format!(
            "{}/users/get/{subject_id}/{}",
            backend_base.trim_end_matches('/'),
            self.as_str()
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `GET .../personal`: an open set of personal fields.
pub type PersonalInfo = Map<String, Value>;

/// `GET .../photo`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PhotoInfo {
    #[serde(default)]
    pub photo: Option<String>,
}

/// `GET .../job_info`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct JobInfo {
    #[serde(default)]
    pub job_titles: Vec<JobTitle>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct JobTitle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// `GET .../details`. Values are kept untyped; the backend mixes numbers and strings.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DetailsInfo {
    #[serde(default)]
    pub interests: Value,
    #[serde(default)]
    pub ncoins: Value,
    #[serde(default)]
    pub thanks_count: Value,
    #[serde(default)]
    pub rating: Value,
}

/// Flat field map consumed by the template renderer.
/// Built fresh for every load and never cached.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregateProfile {
    fields: BTreeMap<String, Value>,
}

impl AggregateProfile {
    /// Merge the four sub-records. Personal fields go in first, so the
    /// derived and detail fields win on key collisions.
    pub fn assemble(
        personal: PersonalInfo,
        photo: PhotoInfo,
        job_info: JobInfo,
        details: DetailsInfo,
    ) -> Self {
        let mut fields: BTreeMap<String, Value> = personal.into_iter().collect();

        let first = job_info.job_titles.into_iter().next().unwrap_or_default();

        fields.insert("photo".into(), Value::String(normalize_photo(photo.photo)));
        fields.insert("job_title".into(), Value::String(first.title.unwrap_or_default()));
        fields.insert("department".into(), Value::String(first.department.unwrap_or_default()));
        fields.insert("role".into(), Value::String(first.role.unwrap_or_default()));
        fields.insert("interests".into(), details.interests);
        fields.insert("ncoins".into(), details.ncoins);
        fields.insert("thanks_count".into(), details.thanks_count);
        fields.insert("rating".into(), details.rating);

        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for AggregateProfile {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn normalize_photo(photo: Option<String>) -> String {
    match photo {
        Some(src) if !src.is_empty() => src,
        _ => DEFAULT_PHOTO.to_string(),
    }
}
