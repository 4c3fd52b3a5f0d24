use serde::{Deserialize, Serialize};

use crate::models::tag::DEFAULT_TAG_COLOR;
use crate::models::validation::{self, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CreateTagRequest {
    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_TAG_COLOR)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::tag_name(&self.name)?;
        validation::hex_color(self.color_or_default())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskTagRequest {
    pub task_id: i64,
    pub tag_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_defaults_to_neutral_gray() {
        let req: CreateTagRequest = serde_json::from_str(r#"{"name":"home"}"#).unwrap();
        assert_eq!(req.color_or_default(), "#e2e8f0");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_bad_color() {
        let req: CreateTagRequest =
            serde_json::from_str(r##"{"name":"home","color":"red"}"##).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn task_tag_request_uses_camel_case() {
        let req: CreateTaskTagRequest =
            serde_json::from_str(r#"{"taskId":3,"tagId":9}"#).unwrap();
        assert_eq!((req.task_id, req.tag_id), (3, 9));
    }
}
