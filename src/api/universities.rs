//! University lookup endpoints (sign-up support)

use super::{decode, ApiClient};
use crate::error::Result;
use serde::Deserialize;

/// Home university option offered during sign-up
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityHome {
    pub university_id: i64,
    #[serde(default)]
    pub name: String,
}

/// University service
pub struct UniversitiesService;

impl UniversitiesService {
    /// List the home universities selectable on the sign-up form.
    pub async fn home_universities(api: &ApiClient) -> Result<Vec<UniversityHome>> {
        decode(api.get("/universities/home", None).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn home_university_decodes() {
        let list: Vec<UniversityHome> = serde_json::from_value(json!([
            {"universityId": 3, "name": "한양대학교"},
            {"universityId": 7, "name": "연세대학교"},
        ]))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].university_id, 3);
        assert_eq!(list[1].name, "연세대학교");
    }
}
