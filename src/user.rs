use reqwest::Method;
use serde_derive::{Deserialize, Serialize};

use super::{FitbitClient, Result};

pub trait UserService {
    /// Fetches the profile of the user the token was issued for.
    fn user_profile(&self) -> Result<UserProfile>;
}

impl UserService for FitbitClient {
    fn user_profile(&self) -> Result<UserProfile> {
        let req = self.new_request::<()>(Method::GET, "user/-/profile.json", None)?;
        self.execute_json(req)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct UserProfile {
    pub user: User,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub stride_length_running_type: String,
    pub weight: f64,
    pub age: i64,
    pub full_name: String,
    pub gender: String,
    pub glucose_unit: String,
    pub country: String,
    pub stride_length_walking: f64,
    pub avatar: String,
    pub encoded_id: String,
    pub start_day_of_week: String,
    #[serde(rename = "avatar150")]
    pub avatar150: String,
    pub corporate: bool,
    /// yyyy-MM-dd
    pub date_of_birth: String,
    pub height_unit: String,
    pub locale: String,
    /// yyyy-MM-dd
    pub member_since: String,
    #[serde(rename = "offsetFromUTCMillis")]
    pub offset_from_utc_millis: i64,
    pub average_daily_steps: i64,
    pub timezone: String,
    pub stride_length_running: f64,
    pub weight_unit: String,
    pub distance_unit: String,
    pub height: f64,
    pub stride_length_walking_type: String,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_full_name() {
        let p: UserProfile = serde_json::from_str(r#"{"user":{"fullName":"Jane Doe"}}"#).unwrap();
        assert_eq!(p.user.full_name, "Jane Doe");
        assert_eq!(p.user.age, 0);
        assert!(!p.user.corporate);
    }

    #[test]
    fn profile_fields() {
        let json = r#"{"user":{
            "age": 42,
            "avatar150": "https://static0.fitbit.com/images/profile/defaultProfile_150.png",
            "corporate": true,
            "dateOfBirth": "1970-01-01",
            "displayName": "Jane",
            "encodedId": "257V3V",
            "memberSince": "2013-06-27",
            "offsetFromUTCMillis": -25200000,
            "strideLengthWalking": 68.5,
            "strideLengthRunningType": "default",
            "timezone": "America/Los_Angeles",
            "topBadges": [],
            "features": {"exerciseGoal": true}
        }}"#;
        let u = serde_json::from_str::<UserProfile>(json).unwrap().user;
        assert_eq!(u.age, 42);
        assert!(u.avatar150.ends_with("_150.png"));
        assert!(u.corporate);
        assert_eq!(u.date_of_birth, "1970-01-01");
        assert_eq!(u.encoded_id, "257V3V");
        assert_eq!(u.member_since, "2013-06-27");
        assert_eq!(u.offset_from_utc_millis, -25200000);
        assert_eq!(u.stride_length_walking, 68.5);
        assert_eq!(u.stride_length_running_type, "default");
        assert_eq!(u.timezone, "America/Los_Angeles");
    }
}
