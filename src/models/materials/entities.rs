use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 资料类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "material.ts")]
pub enum MaterialType {
    File,
    Video,
    Link,
    #[default]
    Text,
}

impl MaterialType {
    pub const FILE: &'static str = "file";
    pub const VIDEO: &'static str = "video";
    pub const LINK: &'static str = "link";
    pub const TEXT: &'static str = "text";

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::File => Self::FILE,
            MaterialType::Video => Self::VIDEO,
            MaterialType::Link => Self::LINK,
            MaterialType::Text => Self::TEXT,
        }
    }

    /// 除文本外都需要 url
    pub fn requires_url(&self) -> bool {
        !matches!(self, MaterialType::Text)
    }
}

impl<'de> Deserialize<'de> for MaterialType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<MaterialType>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的资料类型: '{s}'. 支持的类型: file, video, link, text"
            ))
        })
    }
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::FILE => Ok(MaterialType::File),
            Self::VIDEO => Ok(MaterialType::Video),
            Self::LINK => Ok(MaterialType::Link),
            Self::TEXT => Ok(MaterialType::Text),
            _ => Err(format!("Invalid material type: {s}")),
        }
    }
}

// 课程资料
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "material.ts")]
pub struct CourseMaterial {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub material_type: MaterialType,
    pub url: Option<String>,
    pub content: Option<String>,
    pub position: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 检查资料类型与 url / content 是否匹配
pub fn validate_material(
    material_type: MaterialType,
    url: Option<&str>,
    content: Option<&str>,
) -> Result<(), String> {
    let present = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());

    if material_type.requires_url() && !present(url) {
        return Err(format!("{material_type} 类型的资料必须提供 url"));
    }
    if material_type == MaterialType::Text && !present(content) {
        return Err("text 类型的资料必须提供 content".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_type_parse() {
        assert_eq!("video".parse::<MaterialType>().unwrap(), MaterialType::Video);
        assert!("pdf".parse::<MaterialType>().is_err());
        assert_eq!(MaterialType::default(), MaterialType::Text);
    }

    #[test]
    fn test_validate_material() {
        assert!(validate_material(MaterialType::Link, Some("https://a.b"), None).is_ok());
        assert!(validate_material(MaterialType::Link, None, Some("x")).is_err());
        assert!(validate_material(MaterialType::File, Some("  "), None).is_err());
        assert!(validate_material(MaterialType::Text, None, Some("notes")).is_ok());
        assert!(validate_material(MaterialType::Text, Some("https://a.b"), None).is_err());
    }
}
