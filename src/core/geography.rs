use crate::core::serializers::{OrganisationSerializer, Serializer};
use crate::domain::model::Organisation;
use crate::domain::ports::{GeometrySimplifier, RecordSource};
use crate::utils::error::{ElectionError, Result};
use geo::{MultiPolygon, Polygon, Simplify};
use geojson::{feature::Id, Feature, FeatureCollection, JsonObject};

/// 邊界簡化容差，單位為幾何本身的座標單位 (經緯度)
pub const BOUNDARY_SIMPLIFY_TOLERANCE: f64 = 0.0009;

/// Ramer-Douglas-Peucker 簡化，交給 `geo` 處理
#[derive(Debug, Clone, Copy)]
pub struct DouglasPeucker {
    tolerance: f64,
}

impl DouglasPeucker {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for DouglasPeucker {
    fn default() -> Self {
        Self::new(BOUNDARY_SIMPLIFY_TOLERANCE)
    }
}

impl GeometrySimplifier for DouglasPeucker {
    /// 逐個 polygon 簡化；簡化後任何 ring 少於 4 點就保留原本的 polygon
    fn simplify(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        MultiPolygon::new(
            geometry
                .0
                .iter()
                .map(|polygon| {
                    let simplified = polygon.simplify(&self.tolerance);
                    if has_valid_rings(&simplified) {
                        simplified
                    } else {
                        tracing::debug!("Polygon collapses at tolerance {}, kept as is", self.tolerance);
                        polygon.clone()
                    }
                })
                .collect(),
        )
    }
}

fn has_valid_rings(polygon: &Polygon<f64>) -> bool {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .all(|ring| ring.0.len() >= 4 && ring.is_closed())
}

pub struct OrganisationGeoSerializer<'a, R: RecordSource, G: GeometrySimplifier> {
    source: &'a R,
    simplifier: &'a G,
}

impl<'a, R: RecordSource, G: GeometrySimplifier> OrganisationGeoSerializer<'a, R, G> {
    pub fn new(source: &'a R, simplifier: &'a G) -> Self {
        Self { source, simplifier }
    }

    pub fn serialize(&self, organisation: Option<&Organisation>) -> Result<Feature> {
        let organisation = organisation.ok_or_else(|| {
            ElectionError::missing_record(OrganisationSerializer::ENTITY, "no record supplied")
        })?;
        self.to_feature(organisation)
    }

    pub fn to_feature(&self, organisation: &Organisation) -> Result<Feature> {
        let boundary = self
            .source
            .organisation_geography(organisation.id)
            .and_then(|geography| geography.geography.as_ref())
            .ok_or_else(|| ElectionError::MissingGeometryError {
                organisation: organisation.official_identifier.clone(),
            })?;

        let simplified = self.simplifier.simplify(boundary);
        tracing::debug!(
            "Simplified boundary of {} to {} polygon(s)",
            organisation.official_identifier,
            simplified.0.len()
        );

        let properties = properties_of(organisation)?;

        Ok(Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&simplified))),
            id: Some(Id::Number(organisation.id.into())),
            properties: Some(properties),
            foreign_members: None,
        })
    }

    /// 列表用：任何一個缺少邊界就整批失敗
    pub fn serialize_collection(&self, organisations: &[&Organisation]) -> Result<FeatureCollection> {
        let features = organisations
            .iter()
            .map(|organisation| self.to_feature(organisation))
            .collect::<Result<Vec<_>>>()?;

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }
}

fn properties_of(organisation: &Organisation) -> Result<JsonObject> {
    let document = OrganisationSerializer.to_representation(organisation)?;
    Ok(serde_json::from_value(serde_json::to_value(document)?)?)
}
