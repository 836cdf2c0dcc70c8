use crate::domain::model::{
    ElectedRole, Election, ElectionSubType, ElectionType, Explanation, Organisation,
    OrganisationDivision, OrganisationDivisionSet, OrganisationGeography, RecordId,
    SnoopedElection, SnoopedEntry, VotingSystem,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use geo::MultiPolygon;

/// 讀取端的資料來源 (ORM 的角色)，關聯一律以 id 查找
pub trait RecordSource {
    fn election(&self, id: RecordId) -> Option<&Election>;
    fn election_by_identifier(&self, election_id: &str) -> Option<&Election>;
    /// 依加入順序回傳 group_id 指向 `id` 的 elections
    fn election_children(&self, id: RecordId) -> Vec<&Election>;
    fn election_type(&self, id: RecordId) -> Option<&ElectionType>;
    fn election_subtype(&self, id: RecordId) -> Option<&ElectionSubType>;
    fn voting_system(&self, id: RecordId) -> Option<&VotingSystem>;
    fn organisation(&self, id: RecordId) -> Option<&Organisation>;
    fn organisation_by_identifier(&self, official_identifier: &str) -> Option<&Organisation>;
    fn organisation_geography(&self, organisation_id: RecordId) -> Option<&OrganisationGeography>;
    fn division(&self, id: RecordId) -> Option<&OrganisationDivision>;
    fn divisionset(&self, id: RecordId) -> Option<&OrganisationDivisionSet>;
    fn elected_role(&self, id: RecordId) -> Option<&ElectedRole>;
    fn explanation(&self, id: RecordId) -> Option<&Explanation>;
}

/// 「目前是否為進行中選舉」的判斷，由領域模型提供
pub trait CurrentElectionPolicy {
    fn is_current(&self, election: &Election) -> bool;
}

pub trait GeometrySimplifier {
    fn simplify(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn store_path(&self) -> &str;
    fn store_file_name(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
    fn user_agent(&self) -> &str;
    fn slack_webhook_url(&self) -> Option<&str>;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get_page(&self, url: &str) -> Result<String>;
}

#[async_trait]
pub trait SnoopedElectionStore: Send + Sync {
    /// 以 (snooper_name, detail_url) 為唯一鍵；回傳 (紀錄, 是否新建)
    async fn update_or_create(&self, entry: SnoopedEntry) -> Result<(SnoopedElection, bool)>;
    async fn all(&self) -> Result<Vec<SnoopedElection>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post(&self, item: &SnoopedElection) -> Result<()>;
}

/// 每個來源網站各自實作一個 Snooper
pub trait Snooper: Send + Sync {
    fn snooper_name(&self) -> &str;
    fn listing_url(&self) -> String;
    /// 外層錯誤代表整頁無法解析；內層每筆各自的解析結果，依頁面順序排列
    fn parse_listing(&self, html: &str) -> Result<Vec<Result<SnoopedEntry>>>;
}
