//! Channel-name derivation from a member's presence.

/// The subset of Discord activity kinds that influence channel naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// Playing a game
    Playing,
    /// Listening to something
    Listening,
    /// Watching something
    Watching,
    /// Anything else (custom status, streaming, competing)
    Other,
}

/// One activity from a member's presence.
#[derive(Debug, Clone)]
pub struct Activity {
    /// Activity kind
    pub kind: ActivityKind,
    /// Activity name as reported by the platform
    pub name: String,
}

/// What the lifecycle engine knows about the provisioning member.
#[derive(Debug, Clone)]
pub struct MemberProfile {
    /// Guild display name
    pub display_name: String,
    /// Current presence activities, in platform order
    pub activities: Vec<Activity>,
}

impl MemberProfile {
    /// Profile with no activities.
    #[must_use]
    pub fn named(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            activities: Vec::new(),
        }
    }
}

/// Derives the display name for a fresh temp channel: the first Playing
/// activity wins, then Listening, then Watching, each with its emoji prefix;
/// without a match the member's display name is used.
#[must_use]
pub fn derive_channel_name(profile: &MemberProfile) -> String {
    for (kind, prefix) in [
        (ActivityKind::Playing, "🎮 "),
        (ActivityKind::Listening, "🎵 "),
        (ActivityKind::Watching, "📺 "),
    ] {
        if let Some(activity) = profile.activities.iter().find(|a| a.kind == kind) {
            return format!("{prefix}{}", activity.name);
        }
    }
    profile.display_name.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(activities: Vec<Activity>) -> MemberProfile {
        MemberProfile {
            display_name: "Sam".to_string(),
            activities,
        }
    }

    #[test]
    fn no_activities_uses_display_name() {
        assert_eq!(derive_channel_name(&MemberProfile::named("Sam")), "Sam");
    }

    #[test]
    fn playing_beats_listening_and_watching() {
        let p = profile(vec![
            Activity {
                kind: ActivityKind::Watching,
                name: "a show".to_string(),
            },
            Activity {
                kind: ActivityKind::Listening,
                name: "a song".to_string(),
            },
            Activity {
                kind: ActivityKind::Playing,
                name: "a game".to_string(),
            },
        ]);
        assert_eq!(derive_channel_name(&p), "🎮 a game");
    }

    #[test]
    fn listening_beats_watching() {
        let p = profile(vec![
            Activity {
                kind: ActivityKind::Watching,
                name: "a show".to_string(),
            },
            Activity {
                kind: ActivityKind::Listening,
                name: "a song".to_string(),
            },
        ]);
        assert_eq!(derive_channel_name(&p), "🎵 a song");
    }

    #[test]
    fn other_activities_are_ignored() {
        let p = profile(vec![Activity {
            kind: ActivityKind::Other,
            name: "custom status".to_string(),
        }]);
        assert_eq!(derive_channel_name(&p), "Sam");
    }
}
