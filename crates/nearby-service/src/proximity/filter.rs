//! Proximity candidate filter.

use tracing::debug;

use nearby_entity::{GeoPoint, Post, Profile};

use crate::geo::distance_between;

/// A profile accepted for notification, with the distance it matched at.
///
/// The same `distance_km` value is used for the radius test and for the
/// notification payload.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The accepted profile.
    pub profile: Profile,
    /// Distance between the post and the profile.
    pub distance_km: f64,
    /// The radius the profile was tested against.
    pub radius_km: f64,
}

/// Selects the opt-in profiles within range of a post.
///
/// Pure over the snapshot it is given; it never queries the store.
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter {
    default_radius_km: f64,
    near_miss_factor: f64,
}

impl CandidateFilter {
    /// Create a filter with the fallback radius and the near-miss factor.
    pub fn new(default_radius_km: f64, near_miss_factor: f64) -> Self {
        Self {
            default_radius_km,
            near_miss_factor,
        }
    }

    /// Profiles from `profiles` that should be notified about `post`.
    ///
    /// `origin` is the post's validated coordinate. Profiles without a
    /// location, without opt-in, or authored the post are rejected; the rest
    /// are accepted when `distance <= radius`.
    pub fn select(&self, post: &Post, origin: GeoPoint, profiles: Vec<Profile>) -> Vec<Candidate> {
        profiles
            .into_iter()
            .filter_map(|profile| self.evaluate(post, origin, profile))
            .collect()
    }

    fn evaluate(&self, post: &Post, origin: GeoPoint, profile: Profile) -> Option<Candidate> {
        if !profile.notification_radius_enabled {
            return None;
        }
        let location = profile.location?;
        if post.is_authored_by(profile.id) {
            return None;
        }

        let distance_km = distance_between(origin, location);
        let radius_km = profile.effective_radius_km(self.default_radius_km);

        if distance_km <= radius_km {
            debug!(
                post_id = %post.id,
                profile_id = %profile.id,
                profile = profile.display_name(),
                distance_km,
                radius_km,
                "Profile within radius"
            );
            Some(Candidate {
                profile,
                distance_km,
                radius_km,
            })
        } else {
            if distance_km <= radius_km * self.near_miss_factor {
                debug!(
                    post_id = %post.id,
                    profile_id = %profile.id,
                    profile = profile.display_name(),
                    distance_km,
                    radius_km,
                    "Profile just outside radius"
                );
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use nearby_core::types::{PostId, ProfileId};

    use super::*;
    use crate::geo::distance_km;

    const POST_AT: (f64, f64) = (-23.5505, -46.6333);

    fn post(author: Option<ProfileId>) -> Post {
        Post {
            id: PostId::new(),
            location: GeoPoint::new(POST_AT.0, POST_AT.1),
            city: Some("São Paulo".to_string()),
            post_type: Some("band".to_string()),
            author_name: Some("Caio".to_string()),
            author_profile_id: author,
            created_at: None,
        }
    }

    fn profile(lat: f64, lon: f64, radius: Option<f64>) -> Profile {
        Profile {
            id: ProfileId::new(),
            name: None,
            location: GeoPoint::new(lat, lon),
            notification_radius_enabled: true,
            notification_radius: radius,
        }
    }

    fn run(post: &Post, profiles: Vec<Profile>) -> Vec<Candidate> {
        let origin = post.location.expect("post has a location");
        CandidateFilter::new(20.0, 1.5).select(post, origin, profiles)
    }

    #[test]
    fn test_rio_excluded_and_nearby_included() {
        let post = post(None);
        let rio = profile(-22.9068, -43.1729, Some(20.0));
        let near = profile(-23.5600, -46.6400, Some(20.0));
        let near_id = near.id;

        let accepted = run(&post, vec![rio, near]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].profile.id, near_id);
        assert!((accepted[0].distance_km - 1.3).abs() < 0.06);
    }

    #[test]
    fn test_exact_radius_is_inclusive() {
        let post = post(None);
        let (lat, lon) = (-23.60, -46.70);
        let d = distance_km(POST_AT.0, POST_AT.1, lat, lon);
        let accepted = run(&post, vec![profile(lat, lon, Some(d))]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].distance_km, accepted[0].radius_km);
    }

    #[test]
    fn test_marginally_outside_radius_is_excluded() {
        let post = post(None);
        let (lat, lon) = (-23.60, -46.70);
        let d = distance_km(POST_AT.0, POST_AT.1, lat, lon);
        let accepted = run(&post, vec![profile(lat, lon, Some(d - 1e-9))]);
        assert!(accepted.is_empty());
    }

    #[test]
    fn test_unset_radius_defaults_to_twenty_km() {
        let post = post(None);
        // About 15 km north and about 25 km north of the post.
        let inside = profile(POST_AT.0 + 0.135, POST_AT.1, None);
        let outside = profile(POST_AT.0 + 0.225, POST_AT.1, None);
        let inside_id = inside.id;

        let accepted = run(&post, vec![inside, outside]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].profile.id, inside_id);
        assert_eq!(accepted[0].radius_km, 20.0);
    }

    #[test]
    fn test_zero_radius_uses_default() {
        let post = post(None);
        let accepted = run(&post, vec![profile(-23.5600, -46.6400, Some(0.0))]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].radius_km, 20.0);
    }

    #[test]
    fn test_author_never_selected_even_at_zero_distance() {
        let author = profile(POST_AT.0, POST_AT.1, Some(50.0));
        let post = post(Some(author.id));
        assert!(run(&post, vec![author]).is_empty());
    }

    #[test]
    fn test_profile_without_opt_in_is_rejected() {
        let post = post(None);
        let mut p = profile(POST_AT.0, POST_AT.1, Some(50.0));
        p.notification_radius_enabled = false;
        assert!(run(&post, vec![p]).is_empty());
    }

    #[test]
    fn test_profile_without_location_is_rejected() {
        let post = post(None);
        let mut p = profile(POST_AT.0, POST_AT.1, None);
        p.location = None;
        assert!(run(&post, vec![p]).is_empty());
    }
}
