//! Profile entity model.

use serde::{Deserialize, Serialize};

use nearby_core::types::ProfileId;

use crate::geo::GeoPoint;

/// A user's profile with its proximity notification preferences.
///
/// Owned by the user settings screens; read-only to this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unique profile identifier.
    pub id: ProfileId,
    /// Display name.
    pub name: Option<String>,
    /// Home location; `None` excludes the profile from matching.
    pub location: Option<GeoPoint>,
    /// Opt-in flag for proximity notifications.
    #[serde(default)]
    pub notification_radius_enabled: bool,
    /// Preferred notification radius in kilometers, as stored.
    pub notification_radius: Option<f64>,
}

impl Profile {
    /// The radius to match against, given the fallback for unusable values.
    ///
    /// A missing, zero, negative, or non-finite stored radius all count as
    /// "not configured".
    pub fn effective_radius_km(&self, default_km: f64) -> f64 {
        match self.notification_radius {
            Some(r) if r.is_finite() && r > 0.0 => r,
            _ => default_km,
        }
    }

    /// Display name for logs.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(radius: Option<f64>) -> Profile {
        Profile {
            id: ProfileId::new(),
            name: Some("Ana".to_string()),
            location: GeoPoint::new(-23.56, -46.64),
            notification_radius_enabled: true,
            notification_radius: radius,
        }
    }

    #[test]
    fn test_configured_radius_wins() {
        assert_eq!(profile(Some(5.0)).effective_radius_km(20.0), 5.0);
    }

    #[test]
    fn test_unset_radius_uses_default() {
        assert_eq!(profile(None).effective_radius_km(20.0), 20.0);
    }

    #[test]
    fn test_zero_and_negative_radius_use_default() {
        assert_eq!(profile(Some(0.0)).effective_radius_km(20.0), 20.0);
        assert_eq!(profile(Some(-3.0)).effective_radius_km(20.0), 20.0);
        assert_eq!(profile(Some(f64::NAN)).effective_radius_km(20.0), 20.0);
    }

    #[test]
    fn test_display_name_falls_back_for_anonymous_profiles() {
        let mut p = profile(None);
        assert_eq!(p.display_name(), "Ana");
        p.name = None;
        assert_eq!(p.display_name(), "?");
    }

    #[test]
    fn test_missing_opt_in_deserializes_as_false() {
        let p: Profile = serde_json::from_value(serde_json::json!({
            "id": ProfileId::new(),
            "name": "Bia",
            "location": null,
            "notificationRadius": 10.0
        }))
        .expect("deserialize");
        assert!(!p.notification_radius_enabled);
    }
}
