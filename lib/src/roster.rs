use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
    pub display_name: String,
}

impl UserRecord {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// A team within a league. Matchups reference rosters, never users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRecord {
    pub roster_id: u32,
    pub owner_user_id: String,
}

impl RosterRecord {
    pub fn new(roster_id: u32, owner_user_id: impl Into<String>) -> Self {
        Self {
            roster_id,
            owner_user_id: owner_user_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarterPoints {
    pub player_id: String,
    pub points: f64,
}

/// One roster's result for a week.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupRecord {
    pub week: u32,
    pub roster_id: u32,
    /// `None` until the provider has scored the matchup.
    pub points: Option<f64>,
    pub starters: Vec<StarterPoints>,
}

impl MatchupRecord {
    pub fn new(week: u32, roster_id: u32, points: f64) -> Self {
        Self {
            week,
            roster_id,
            points: Some(points),
            starters: Vec::new(),
        }
    }

    pub fn unscored(week: u32, roster_id: u32) -> Self {
        Self {
            week,
            roster_id,
            points: None,
            starters: Vec::new(),
        }
    }

    pub fn with_starters(mut self, starters: Vec<StarterPoints>) -> Self {
        self.starters = starters;
        self
    }
}

/// Lookups used to join matchups back to the users who own them.
pub struct RosterIndex<'a> {
    owners: HashMap<u32, &'a str>,
    users: HashMap<&'a str, &'a UserRecord>,
}

impl<'a> RosterIndex<'a> {
    pub fn new(users: &'a [UserRecord], rosters: &'a [RosterRecord]) -> Self {
        let owners = rosters
            .iter()
            .map(|roster| (roster.roster_id, roster.owner_user_id.as_str()))
            .collect();
        let users = users
            .iter()
            .map(|user| (user.user_id.as_str(), user))
            .collect();
        Self { owners, users }
    }

    /// The user id owning `roster_id`, if the roster is known.
    pub fn owner(&self, roster_id: u32) -> Option<&'a str> {
        self.owners.get(&roster_id).copied()
    }

    pub fn user(&self, user_id: &str) -> Option<&'a UserRecord> {
        self.users.get(user_id).copied()
    }

    /// Resolves a roster all the way to its owning user.
    pub fn resolve(&self, roster_id: u32) -> Option<&'a UserRecord> {
        self.owner(roster_id).and_then(|owner| self.user(owner))
    }

    pub fn display_name(&self, user_id: &str) -> Option<&'a str> {
        self.user(user_id).map(|user| user.display_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_rosters_to_users() {
        let users = vec![UserRecord::new("a", "Alice"), UserRecord::new("b", "Bob")];
        let rosters = vec![
            RosterRecord::new(100, "a"),
            RosterRecord::new(101, "b"),
            RosterRecord::new(102, "ghost"),
        ];
        let index = RosterIndex::new(&users, &rosters);

        assert_eq!(index.resolve(100).map(|u| u.user_id.as_str()), Some("a"));
        assert_eq!(index.display_name("b"), Some("Bob"));
        assert_eq!(index.owner(102), Some("ghost"));
        assert!(index.resolve(102).is_none());
        assert!(index.resolve(999).is_none());
    }
}
