//! API 輸出用的 serializers。
//!
//! 每個 document struct 就是白名單：只有列出的欄位會輸出，順序即宣告順序
//! (serde_json 開啟 `preserve_order`，轉成 `Value` 時也保持不變)。

use crate::domain::model::{
    Election, ElectionSubType, ElectionType, Organisation, OrganisationDivision,
    OrganisationDivisionSet, VotingSystem,
};
use crate::domain::ports::{CurrentElectionPolicy, RecordSource};
use crate::utils::error::{ElectionError, Result};
use chrono::NaiveDate;
use serde::Serialize;

pub trait Serializer {
    type Record;
    type Output: Serialize;

    const ENTITY: &'static str;

    fn to_representation(&self, record: &Self::Record) -> Result<Self::Output>;

    /// 必填的巢狀欄位：沒有紀錄就整個失敗，不回傳部分結果
    fn serialize(&self, record: Option<&Self::Record>) -> Result<Self::Output> {
        match record {
            Some(record) => self.to_representation(record),
            None => Err(ElectionError::missing_record(
                Self::ENTITY,
                "no record supplied",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganisationDocument {
    pub official_identifier: String,
    pub organisation_type: String,
    pub organisation_subtype: String,
    pub official_name: String,
    pub common_name: String,
    pub gss: String,
    pub slug: String,
    pub territory_code: String,
    pub election_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganisationDivisionSetDocument {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub legislation_url: String,
    pub consultation_url: String,
    pub short_title: String,
    pub mapit_generation_id: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganisationDivisionDocument {
    pub divisionset: OrganisationDivisionSetDocument,
    pub name: String,
    pub official_identifier: String,
    pub geography_curie: String,
    pub slug: String,
    pub division_type: String,
    pub division_subtype: String,
    pub division_election_sub_type: String,
    pub seats_total: Option<u32>,
    pub mapit_generation_low: Option<u32>,
    pub mapit_generation_high: Option<u32>,
    pub territory_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectionTypeDocument {
    pub name: String,
    pub election_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectionSubTypeDocument {
    pub name: String,
    pub election_subtype: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VotingSystemDocument {
    pub slug: String,
    pub name: String,
    pub uses_party_lists: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectionDocument {
    pub election_id: String,
    pub tmp_election_id: Option<String>,
    pub election_title: String,
    pub poll_open_date: NaiveDate,
    pub election_type: ElectionTypeDocument,
    pub election_subtype: Option<ElectionSubTypeDocument>,
    pub organisation: OrganisationDocument,
    pub group: Option<String>,
    pub group_type: Option<String>,
    pub children: Vec<String>,
    pub elected_role: Option<String>,
    pub division: OrganisationDivisionDocument,
    pub voting_system: Option<VotingSystemDocument>,
    pub current: bool,
    pub explanation: Option<String>,
}

pub struct OrganisationSerializer;

impl Serializer for OrganisationSerializer {
    type Record = Organisation;
    type Output = OrganisationDocument;

    const ENTITY: &'static str = "Organisation";

    fn to_representation(&self, org: &Organisation) -> Result<OrganisationDocument> {
        Ok(OrganisationDocument {
            official_identifier: org.official_identifier.clone(),
            organisation_type: org.organisation_type.clone(),
            organisation_subtype: org.organisation_subtype.clone(),
            official_name: org.official_name.clone(),
            common_name: org.common_name.clone(),
            gss: org.gss.clone(),
            slug: org.slug.clone(),
            territory_code: org.territory_code.clone(),
            election_name: org.election_name.clone(),
        })
    }
}

pub struct OrganisationDivisionSetSerializer;

impl Serializer for OrganisationDivisionSetSerializer {
    type Record = OrganisationDivisionSet;
    type Output = OrganisationDivisionSetDocument;

    const ENTITY: &'static str = "OrganisationDivisionSet";

    fn to_representation(
        &self,
        set: &OrganisationDivisionSet,
    ) -> Result<OrganisationDivisionSetDocument> {
        Ok(OrganisationDivisionSetDocument {
            start_date: set.start_date,
            end_date: set.end_date,
            legislation_url: set.legislation_url.clone(),
            consultation_url: set.consultation_url.clone(),
            short_title: set.short_title.clone(),
            mapit_generation_id: set.mapit_generation_id.clone(),
            notes: set.notes.clone(),
        })
    }
}

pub struct ElectionTypeSerializer;

impl Serializer for ElectionTypeSerializer {
    type Record = ElectionType;
    type Output = ElectionTypeDocument;

    const ENTITY: &'static str = "ElectionType";

    fn to_representation(&self, record: &ElectionType) -> Result<ElectionTypeDocument> {
        Ok(ElectionTypeDocument {
            name: record.name.clone(),
            election_type: record.election_type.clone(),
        })
    }
}

pub struct ElectionSubTypeSerializer;

impl Serializer for ElectionSubTypeSerializer {
    type Record = ElectionSubType;
    type Output = ElectionSubTypeDocument;

    const ENTITY: &'static str = "ElectionSubType";

    fn to_representation(&self, record: &ElectionSubType) -> Result<ElectionSubTypeDocument> {
        Ok(ElectionSubTypeDocument {
            name: record.name.clone(),
            election_subtype: record.election_subtype.clone(),
        })
    }
}

pub struct VotingSystemSerializer;

impl Serializer for VotingSystemSerializer {
    type Record = VotingSystem;
    type Output = VotingSystemDocument;

    const ENTITY: &'static str = "VotingSystem";

    fn to_representation(&self, record: &VotingSystem) -> Result<VotingSystemDocument> {
        Ok(VotingSystemDocument {
            slug: record.slug.clone(),
            name: record.name.clone(),
            uses_party_lists: record.uses_party_lists,
        })
    }
}

pub struct OrganisationDivisionSerializer<'a, R: RecordSource> {
    source: &'a R,
}

impl<'a, R: RecordSource> OrganisationDivisionSerializer<'a, R> {
    pub fn new(source: &'a R) -> Self {
        Self { source }
    }
}

impl<R: RecordSource> Serializer for OrganisationDivisionSerializer<'_, R> {
    type Record = OrganisationDivision;
    type Output = OrganisationDivisionDocument;

    const ENTITY: &'static str = "OrganisationDivision";

    fn to_representation(
        &self,
        division: &OrganisationDivision,
    ) -> Result<OrganisationDivisionDocument> {
        let divisionset = self
            .source
            .divisionset(division.divisionset_id)
            .ok_or_else(|| {
                ElectionError::missing_record(
                    OrganisationDivisionSetSerializer::ENTITY,
                    format!(
                        "divisionset {} of division {}",
                        division.divisionset_id, division.official_identifier
                    ),
                )
            })?;

        Ok(OrganisationDivisionDocument {
            divisionset: OrganisationDivisionSetSerializer.to_representation(divisionset)?,
            name: division.name.clone(),
            official_identifier: division.official_identifier.clone(),
            geography_curie: division.geography_curie.clone(),
            slug: division.slug.clone(),
            division_type: division.division_type.clone(),
            division_subtype: division.division_subtype.clone(),
            division_election_sub_type: division.division_election_sub_type.clone(),
            seats_total: division.seats_total,
            mapit_generation_low: division.mapit_generation_low,
            mapit_generation_high: division.mapit_generation_high,
            territory_code: division.territory_code.clone(),
        })
    }
}

/// voting_system 只在 organisation 層級 (或未分組的 ballot) 才有意義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotingSystemScope {
    Organisation,
    Subordinate,
}

impl VotingSystemScope {
    pub fn from_group_type(group_type: Option<&str>) -> Self {
        match group_type {
            None | Some("") | Some("organisation") => VotingSystemScope::Organisation,
            Some(_) => VotingSystemScope::Subordinate,
        }
    }
}

pub struct ElectionSerializer<'a, R: RecordSource, P: CurrentElectionPolicy> {
    source: &'a R,
    policy: &'a P,
}

impl<'a, R: RecordSource, P: CurrentElectionPolicy> ElectionSerializer<'a, R, P> {
    pub fn new(source: &'a R, policy: &'a P) -> Self {
        Self { source, policy }
    }

    fn required<'r, T>(
        election: &Election,
        field: &str,
        entity: &str,
        record: Option<&'r T>,
    ) -> Result<&'r T> {
        record.ok_or_else(|| {
            ElectionError::missing_record(
                entity,
                format!("field '{}' of election {}", field, election.election_id),
            )
        })
    }

    fn group(&self, election: &Election) -> Option<String> {
        election
            .group_id
            .and_then(|id| self.source.election(id))
            .map(|parent| parent.election_id.clone())
    }

    fn children(&self, election: &Election) -> Vec<String> {
        self.source
            .election_children(election.id)
            .into_iter()
            .filter(|child| {
                if child.id == election.id {
                    tracing::warn!(
                        "⚠️ Election {} lists itself as a child, skipping",
                        election.election_id
                    );
                    return false;
                }
                true
            })
            .map(|child| child.election_id.clone())
            .collect()
    }

    fn voting_system(&self, election: &Election) -> Result<Option<VotingSystemDocument>> {
        match VotingSystemScope::from_group_type(election.group_type.as_deref()) {
            VotingSystemScope::Organisation => {
                let record = election
                    .voting_system_id
                    .and_then(|id| self.source.voting_system(id));
                let record = Self::required(
                    election,
                    "voting_system",
                    VotingSystemSerializer::ENTITY,
                    record,
                )?;
                VotingSystemSerializer.to_representation(record).map(Some)
            }
            VotingSystemScope::Subordinate => Ok(None),
        }
    }
}

impl<R: RecordSource, P: CurrentElectionPolicy> Serializer for ElectionSerializer<'_, R, P> {
    type Record = Election;
    type Output = ElectionDocument;

    const ENTITY: &'static str = "Election";

    fn to_representation(&self, election: &Election) -> Result<ElectionDocument> {
        tracing::debug!("Serializing election {}", election.election_id);

        let election_type = Self::required(
            election,
            "election_type",
            ElectionTypeSerializer::ENTITY,
            election
                .election_type_id
                .and_then(|id| self.source.election_type(id)),
        )?;
        let organisation = Self::required(
            election,
            "organisation",
            OrganisationSerializer::ENTITY,
            election
                .organisation_id
                .and_then(|id| self.source.organisation(id)),
        )?;
        let division = Self::required(
            election,
            "division",
            OrganisationDivisionSerializer::<R>::ENTITY,
            election.division_id.and_then(|id| self.source.division(id)),
        )?;

        let election_subtype = election
            .election_subtype_id
            .and_then(|id| self.source.election_subtype(id))
            .map(|subtype| ElectionSubTypeSerializer.to_representation(subtype))
            .transpose()?;

        Ok(ElectionDocument {
            election_id: election.election_id.clone(),
            tmp_election_id: election.tmp_election_id.clone(),
            election_title: election.election_title.clone(),
            poll_open_date: election.poll_open_date,
            election_type: ElectionTypeSerializer.to_representation(election_type)?,
            election_subtype,
            organisation: OrganisationSerializer.to_representation(organisation)?,
            group: self.group(election),
            group_type: election.group_type.clone(),
            children: self.children(election),
            elected_role: election
                .elected_role_id
                .and_then(|id| self.source.elected_role(id))
                .map(|role| role.elected_title.clone()),
            division: OrganisationDivisionSerializer::new(self.source)
                .to_representation(division)?,
            voting_system: self.voting_system(election)?,
            current: self.policy.is_current(election),
            explanation: election
                .explanation_id
                .and_then(|id| self.source.explanation(id))
                .map(|explanation| explanation.explanation.clone()),
        })
    }
}
