use super::entities::MaterialType;
use serde::Deserialize;
use ts_rs::TS;

// 创建资料请求；position 缺省时追加到末尾
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "material.ts")]
pub struct CreateMaterialRequest {
    pub title: String,
    pub description: Option<String>,
    pub material_type: MaterialType,
    pub url: Option<String>,
    pub content: Option<String>,
    pub position: Option<i32>,
}

// 更新资料请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "material.ts")]
pub struct UpdateMaterialRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub material_type: Option<MaterialType>,
    pub url: Option<String>,
    pub content: Option<String>,
    pub position: Option<i32>,
}
