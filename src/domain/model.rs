use chrono::{DateTime, NaiveDate, Utc};
use geo::{MultiPolygon, Polygon};
use serde::{Deserialize, Deserializer, Serialize};

/// 資料庫主鍵
pub type RecordId = i64;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Election {
    pub id: RecordId,
    pub election_id: String,
    #[serde(default)]
    pub tmp_election_id: Option<String>,
    pub election_title: String,
    pub poll_open_date: NaiveDate,
    #[serde(default)]
    pub election_type_id: Option<RecordId>,
    #[serde(default)]
    pub election_subtype_id: Option<RecordId>,
    #[serde(default)]
    pub organisation_id: Option<RecordId>,
    #[serde(default)]
    pub division_id: Option<RecordId>,
    /// 上層 group election，children 由反查得出
    #[serde(default)]
    pub group_id: Option<RecordId>,
    #[serde(default)]
    pub group_type: Option<String>,
    #[serde(default)]
    pub elected_role_id: Option<RecordId>,
    #[serde(default)]
    pub explanation_id: Option<RecordId>,
    #[serde(default)]
    pub voting_system_id: Option<RecordId>,
    /// 手動覆寫 current 判斷，None 時依投票日計算
    #[serde(default)]
    pub current: Option<bool>,
    #[serde(default)]
    pub seats_contested: Option<u32>,
    #[serde(default)]
    pub seats_total: Option<u32>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElectionType {
    pub id: RecordId,
    pub name: String,
    pub election_type: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElectionSubType {
    pub id: RecordId,
    pub name: String,
    pub election_subtype: String,
    #[serde(default)]
    pub election_type_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VotingSystem {
    pub id: RecordId,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub uses_party_lists: bool,
    #[serde(default)]
    pub wikipedia_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Organisation {
    pub id: RecordId,
    pub official_identifier: String,
    pub organisation_type: String,
    #[serde(default)]
    pub organisation_subtype: String,
    pub official_name: String,
    pub common_name: String,
    #[serde(default)]
    pub gss: String,
    pub slug: String,
    #[serde(default)]
    pub territory_code: String,
    #[serde(default)]
    pub election_name: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub legislation_url: Option<String>,
}

/// Organisation 的邊界資料，fixture 內以 GeoJSON geometry 表示
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrganisationGeography {
    pub id: RecordId,
    pub organisation_id: RecordId,
    #[serde(default)]
    pub gss: Option<String>,
    #[serde(default, deserialize_with = "deserialize_boundary")]
    pub geography: Option<MultiPolygon<f64>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrganisationDivisionSet {
    pub id: RecordId,
    #[serde(default)]
    pub organisation_id: Option<RecordId>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub legislation_url: String,
    #[serde(default)]
    pub consultation_url: String,
    #[serde(default)]
    pub short_title: String,
    #[serde(default)]
    pub mapit_generation_id: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrganisationDivision {
    pub id: RecordId,
    pub divisionset_id: RecordId,
    pub name: String,
    pub official_identifier: String,
    #[serde(default)]
    pub geography_curie: String,
    pub slug: String,
    pub division_type: String,
    #[serde(default)]
    pub division_subtype: String,
    #[serde(default)]
    pub division_election_sub_type: String,
    #[serde(default)]
    pub seats_total: Option<u32>,
    #[serde(default)]
    pub mapit_generation_low: Option<u32>,
    #[serde(default)]
    pub mapit_generation_high: Option<u32>,
    #[serde(default)]
    pub territory_code: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElectedRole {
    pub id: RecordId,
    pub elected_title: String,
    #[serde(default)]
    pub elected_role_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Explanation {
    pub id: RecordId,
    #[serde(default)]
    pub description: String,
    pub explanation: String,
}

/// Snooper 解析出的一筆資料 (upsert 時的 defaults)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnoopedEntry {
    pub snooper_name: String,
    pub detail_url: String,
    pub title: String,
    pub source: String,
    pub date: NaiveDate,
    pub cause: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnoopedElection {
    pub id: u64,
    pub snooper_name: String,
    pub detail_url: String,
    pub title: String,
    pub source: String,
    pub date: NaiveDate,
    pub cause: String,
    pub detail: String,
    pub date_seen: DateTime<Utc>,
}

impl SnoopedElection {
    pub fn from_entry(id: u64, entry: SnoopedEntry, date_seen: DateTime<Utc>) -> Self {
        Self {
            id,
            snooper_name: entry.snooper_name,
            detail_url: entry.detail_url,
            title: entry.title,
            source: entry.source,
            date: entry.date,
            cause: entry.cause,
            detail: entry.detail,
            date_seen,
        }
    }

    pub fn matches(&self, snooper_name: &str, detail_url: &str) -> bool {
        self.snooper_name == snooper_name && self.detail_url == detail_url
    }

    /// 以新內容覆寫，date_seen 保留第一次看到的時間
    pub fn apply(&mut self, entry: SnoopedEntry) {
        self.title = entry.title;
        self.source = entry.source;
        self.date = entry.date;
        self.cause = entry.cause;
        self.detail = entry.detail;
    }
}

/// 依 (snooper_name, detail_url) 做 update_or_create，回傳 (紀錄, 是否新建)
pub fn upsert_snooped(
    records: &mut Vec<SnoopedElection>,
    entry: SnoopedEntry,
    now: DateTime<Utc>,
) -> (SnoopedElection, bool) {
    if let Some(existing) = records
        .iter_mut()
        .find(|r| r.matches(&entry.snooper_name, &entry.detail_url))
    {
        existing.apply(entry);
        return (existing.clone(), false);
    }

    let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
    let created = SnoopedElection::from_entry(next_id, entry, now);
    records.push(created.clone());
    (created, true)
}

fn deserialize_boundary<'de, D>(deserializer: D) -> Result<Option<MultiPolygon<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let Some(geometry) = Option::<geojson::Geometry>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let boundary = match geometry.value {
        value @ geojson::Value::Polygon(_) => {
            Polygon::<f64>::try_from(value).map(|polygon| MultiPolygon::new(vec![polygon]))
        }
        value => MultiPolygon::<f64>::try_from(value),
    };

    boundary.map(Some).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(detail_url: &str, cause: &str) -> SnoopedEntry {
        SnoopedEntry {
            snooper_name: "LibDemNewbies".to_string(),
            detail_url: detail_url.to_string(),
            title: "Ward A".to_string(),
            source: "http://example.com/".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            cause: cause.to_string(),
            detail: "Ward A".to_string(),
        }
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let mut records = Vec::new();
        let first_seen = Utc::now();

        let (item, created) = upsert_snooped(&mut records, entry("u#a", "unknown"), first_seen);
        assert!(created);
        assert_eq!(item.id, 1);

        let later = first_seen + chrono::Duration::hours(1);
        let (item, created) = upsert_snooped(&mut records, entry("u#a", "resignation"), later);
        assert!(!created);
        assert_eq!(item.cause, "resignation");
        assert_eq!(item.date_seen, first_seen);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_upsert_distinguishes_detail_urls() {
        let mut records = Vec::new();
        upsert_snooped(&mut records, entry("u#a", "unknown"), Utc::now());
        let (item, created) = upsert_snooped(&mut records, entry("u#b", "unknown"), Utc::now());
        assert!(created);
        assert_eq!(item.id, 2);
    }

    #[test]
    fn test_boundary_accepts_polygon_and_multipolygon() {
        let geography: OrganisationGeography = serde_json::from_value(serde_json::json!({
            "id": 1,
            "organisation_id": 7,
            "geography": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
            }
        }))
        .unwrap();
        assert_eq!(geography.geography.unwrap().0.len(), 1);

        let geography: OrganisationGeography = serde_json::from_value(serde_json::json!({
            "id": 2,
            "organisation_id": 7,
            "geography": null
        }))
        .unwrap();
        assert!(geography.geography.is_none());
    }
}
