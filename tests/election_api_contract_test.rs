use anyhow::Result;
use chrono::NaiveDate;
use every_election::core::serializers::{
    OrganisationDivisionSerializer, OrganisationDivisionSetSerializer, OrganisationSerializer,
};
use every_election::core::RecordSource;
use every_election::{
    DouglasPeucker, ElectionError, ElectionSerializer, FixtureRecords,
    OrganisationGeoSerializer, PollDateWindow, Serializer,
};
use geo::CoordsIter;

fn records() -> FixtureRecords {
    FixtureRecords::from_file(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/records.json"
    ))
    .unwrap()
}

fn policy() -> PollDateWindow {
    PollDateWindow::new(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), 20)
}

/// 整份輸出逐字比對，包含欄位順序
#[test]
fn test_ballot_election_snapshot() -> Result<()> {
    let records = records();
    let policy = policy();
    let serializer = ElectionSerializer::new(&records, &policy);

    let document =
        serializer.serialize(records.election_by_identifier("local.sheffield.walkley.2024-05-02"))?;

    let expected = serde_json::json!({
        "election_id": "local.sheffield.walkley.2024-05-02",
        "tmp_election_id": null,
        "election_title": "Walkley",
        "poll_open_date": "2024-05-02",
        "election_type": {"name": "Local elections", "election_type": "local"},
        "election_subtype": null,
        "organisation": {
            "official_identifier": "SHF",
            "organisation_type": "local-authority",
            "organisation_subtype": "MTD",
            "official_name": "Sheffield City Council",
            "common_name": "Sheffield",
            "gss": "E08000019",
            "slug": "sheffield",
            "territory_code": "ENG",
            "election_name": "Sheffield local election"
        },
        "group": "local.sheffield.2024-05-02",
        "group_type": "ballot",
        "children": [],
        "elected_role": "Local councillor",
        "division": {
            "divisionset": {
                "start_date": "2016-05-05",
                "end_date": null,
                "legislation_url": "https://www.legislation.gov.uk/uksi/2015/1",
                "consultation_url": "https://www.lgbce.org.uk/sheffield",
                "short_title": "The Sheffield (Electoral Changes) Order 2015",
                "mapit_generation_id": "27",
                "notes": ""
            },
            "name": "Walkley",
            "official_identifier": "gss:E05010863",
            "geography_curie": "gss:E05010863",
            "slug": "walkley",
            "division_type": "MTW",
            "division_subtype": "",
            "division_election_sub_type": "",
            "seats_total": 3,
            "mapit_generation_low": 27,
            "mapit_generation_high": 31,
            "territory_code": "ENG"
        },
        "voting_system": null,
        "current": false,
        "explanation": null
    });

    assert_eq!(serde_json::to_string(&document)?, serde_json::to_string(&expected)?);
    Ok(())
}

#[test]
fn test_voting_system_follows_group_type() -> Result<()> {
    let records = records();
    let policy = policy();
    let serializer = ElectionSerializer::new(&records, &policy);

    let project = |election_id: &str| {
        serializer
            .serialize(records.election_by_identifier(election_id))
            .map(|doc| serde_json::to_value(doc).unwrap())
    };

    let organisation = project("local.sheffield.2024-05-02")?;
    assert_eq!(
        organisation["voting_system"],
        serde_json::json!({"slug": "FPTP", "name": "First-past-the-post", "uses_party_lists": false})
    );

    // group_type 為空字串也視為 organisation 層級
    let empty_group_type = project("local.sheffield.beighton.2024-05-02")?;
    assert_eq!(empty_group_type["voting_system"]["slug"], "FPTP");

    let ballot = project("local.sheffield.walkley.2024-05-02")?;
    assert!(ballot["voting_system"].is_null());

    let subtype = project("sp.c.2026-05-07")?;
    assert!(subtype["voting_system"].is_null());
    assert_eq!(subtype["election_subtype"]["election_subtype"], "c");
    Ok(())
}

#[test]
fn test_children_are_identifiers_in_insertion_order() -> Result<()> {
    let records = records();
    let policy = policy();
    let serializer = ElectionSerializer::new(&records, &policy);

    for election in &records.elections {
        let document = serializer.to_representation(election)?;
        assert!(!document.children.contains(&election.election_id));
    }

    let group = serializer.serialize(records.election_by_identifier("local.sheffield.2024-05-02"))?;
    assert_eq!(
        group.children,
        vec![
            "local.sheffield.walkley.2024-05-02",
            "local.sheffield.beighton.2024-05-02"
        ]
    );
    assert_eq!(group.group, None);
    assert!(group.current);
    Ok(())
}

#[test]
fn test_current_uses_injected_policy() -> Result<()> {
    let records = records();
    let policy = PollDateWindow::new(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(), 20);
    let serializer = ElectionSerializer::new(&records, &policy);

    let sp = serializer.serialize(records.election_by_identifier("sp.c.2026-05-07"))?;
    assert!(sp.current);

    let late = PollDateWindow::new(NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(), 20);
    let sp = ElectionSerializer::new(&records, &late)
        .serialize(records.election_by_identifier("sp.c.2026-05-07"))?;
    assert!(!sp.current);
    Ok(())
}

#[test]
fn test_optional_lookups_degrade_to_null() -> Result<()> {
    let records = records();
    let policy = policy();
    let document = ElectionSerializer::new(&records, &policy)
        .serialize(records.election_by_identifier("local.sheffield.beighton.2024-05-02"))?;

    assert_eq!(document.tmp_election_id.as_deref(), Some("tmp-beighton"));
    assert_eq!(document.elected_role, None);
    assert_eq!(
        document.explanation.as_deref(),
        Some("This election was cancelled because it was uncontested.")
    );
    assert_eq!(document.division.mapit_generation_low, None);
    Ok(())
}

#[test]
fn test_unknown_election_is_missing_record() {
    let records = records();
    let policy = policy();
    let err = ElectionSerializer::new(&records, &policy)
        .serialize(records.election_by_identifier("local.nowhere.2024-05-02"))
        .unwrap_err();
    assert!(matches!(err, ElectionError::MissingRecordError { .. }));
}

#[test]
fn test_division_nested_divisionset_matches_standalone() -> Result<()> {
    let records = records();
    for division in &records.divisions {
        let nested = OrganisationDivisionSerializer::new(&records).to_representation(division)?;
        let standalone =
            OrganisationDivisionSetSerializer.serialize(records.divisionset(division.divisionset_id))?;
        assert_eq!(
            serde_json::to_value(&nested)?["divisionset"],
            serde_json::to_value(&standalone)?
        );
    }
    Ok(())
}

#[test]
fn test_organisation_geo_feature() -> Result<()> {
    let records = records();
    let simplifier = DouglasPeucker::default();
    let serializer = OrganisationGeoSerializer::new(&records, &simplifier);

    let organisation = records.organisation_by_identifier("SHF");
    let feature = serializer.serialize(organisation)?;
    let value = serde_json::to_value(&feature)?;

    assert_eq!(value["type"], "Feature");
    assert_eq!(value["geometry"]["type"], "MultiPolygon");
    assert_eq!(
        value["properties"],
        serde_json::to_value(OrganisationSerializer.serialize(organisation)?)?
    );

    let source = records.organisation_geography(10).unwrap().geography.as_ref().unwrap();
    let emitted = value["geometry"]["coordinates"][0][0].as_array().unwrap().len();
    assert!(emitted <= source.coords_count());
    assert_eq!(emitted, 5);
    Ok(())
}

#[test]
fn test_organisation_without_geometry() {
    let records = records();
    let simplifier = DouglasPeucker::default();
    let err = OrganisationGeoSerializer::new(&records, &simplifier)
        .serialize(records.organisation_by_identifier("sp"))
        .unwrap_err();
    assert!(matches!(err, ElectionError::MissingGeometryError { .. }));
}
