use crate::domain::model::{
    ElectedRole, Election, ElectionSubType, ElectionType, Explanation, Organisation,
    OrganisationDivision, OrganisationDivisionSet, OrganisationGeography, RecordId, VotingSystem,
};
use crate::domain::ports::RecordSource;
use crate::utils::error::Result;
use serde::Deserialize;
use std::path::Path;

/// 從 JSON 檔載入的記憶體資料來源，各表保持加入順序
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureRecords {
    #[serde(default)]
    pub elections: Vec<Election>,
    #[serde(default)]
    pub election_types: Vec<ElectionType>,
    #[serde(default)]
    pub election_subtypes: Vec<ElectionSubType>,
    #[serde(default)]
    pub voting_systems: Vec<VotingSystem>,
    #[serde(default)]
    pub organisations: Vec<Organisation>,
    #[serde(default)]
    pub organisation_geographies: Vec<OrganisationGeography>,
    #[serde(default)]
    pub divisionsets: Vec<OrganisationDivisionSet>,
    #[serde(default)]
    pub divisions: Vec<OrganisationDivision>,
    #[serde(default)]
    pub elected_roles: Vec<ElectedRole>,
    #[serde(default)]
    pub explanations: Vec<Explanation>,
}

impl FixtureRecords {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let records: Self = serde_json::from_str(content)?;
        tracing::debug!(
            "Loaded {} elections, {} organisations, {} divisions",
            records.elections.len(),
            records.organisations.len(),
            records.divisions.len()
        );
        Ok(records)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

impl RecordSource for FixtureRecords {
    fn election(&self, id: RecordId) -> Option<&Election> {
        self.elections.iter().find(|e| e.id == id)
    }

    fn election_by_identifier(&self, election_id: &str) -> Option<&Election> {
        self.elections.iter().find(|e| e.election_id == election_id)
    }

    fn election_children(&self, id: RecordId) -> Vec<&Election> {
        self.elections
            .iter()
            .filter(|e| e.group_id == Some(id))
            .collect()
    }

    fn election_type(&self, id: RecordId) -> Option<&ElectionType> {
        self.election_types.iter().find(|t| t.id == id)
    }

    fn election_subtype(&self, id: RecordId) -> Option<&ElectionSubType> {
        self.election_subtypes.iter().find(|t| t.id == id)
    }

    fn voting_system(&self, id: RecordId) -> Option<&VotingSystem> {
        self.voting_systems.iter().find(|v| v.id == id)
    }

    fn organisation(&self, id: RecordId) -> Option<&Organisation> {
        self.organisations.iter().find(|o| o.id == id)
    }

    fn organisation_by_identifier(&self, official_identifier: &str) -> Option<&Organisation> {
        self.organisations
            .iter()
            .find(|o| o.official_identifier == official_identifier)
    }

    fn organisation_geography(&self, organisation_id: RecordId) -> Option<&OrganisationGeography> {
        self.organisation_geographies
            .iter()
            .find(|g| g.organisation_id == organisation_id)
    }

    fn division(&self, id: RecordId) -> Option<&OrganisationDivision> {
        self.divisions.iter().find(|d| d.id == id)
    }

    fn divisionset(&self, id: RecordId) -> Option<&OrganisationDivisionSet> {
        self.divisionsets.iter().find(|s| s.id == id)
    }

    fn elected_role(&self, id: RecordId) -> Option<&ElectedRole> {
        self.elected_roles.iter().find(|r| r.id == id)
    }

    fn explanation(&self, id: RecordId) -> Option<&Explanation> {
        self.explanations.iter().find(|e| e.id == id)
    }
}
