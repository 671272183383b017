use super::entities::CourseMaterial;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "material.ts")]
pub struct MaterialListResponse {
    pub items: Vec<CourseMaterial>,
}
