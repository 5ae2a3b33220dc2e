//! User and project factories.
//!
//! Both are index-keyed: `user_at(i)` and `project_at(i)` realize an entity
//! on demand and memoize it. Project keys are reversible without search
//! thanks to the prefix-rotation scheme, so key lookups never enumerate.

use crate::error::{Error, Result};
use crate::gen::catalog::{
    BUZZ_ADJECTIVES, BUZZ_NOUNS, BUZZ_VERBS, FIRST_NAMES, LAST_NAMES, PROJECT_PREFIXES,
};
use crate::gen::Generator;
use crate::models::jira::{Project, User};

impl Generator {
    /// Realize the user at a global index, wrapping past the directory size.
    pub fn user_at(&self, index: u64) -> User {
        let index = index % self.config().num_users;
        if let Some(user) = self.users.read().expect("user cache poisoned").get(&index) {
            return user.clone();
        }

        let mut s = self.stream(&format!("user-{index}"));
        let first = *s.pick(&FIRST_NAMES);
        let last = *s.pick(&LAST_NAMES);
        let account_id = format!("user-{index:06}");

        let user = User {
            self_url: format!("/rest/api/3/user?accountId={account_id}"),
            account_id,
            account_type: "atlassian".to_string(),
            email_address: format!(
                "{}.{}@company.com",
                first.to_lowercase(),
                last.to_lowercase()
            ),
            display_name: format!("{first} {last}"),
            active: true,
            time_zone: "America/New_York".to_string(),
            locale: "en_US".to_string(),
        };

        self.users
            .write()
            .expect("user cache poisoned")
            .insert(index, user.clone());
        user
    }

    /// Resolve an `accountId` of the form `user-000123` back to the user.
    pub fn user_by_account_id(&self, account_id: &str) -> Result<User> {
        let index: u64 = account_id
            .strip_prefix("user-")
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| Error::UnknownUser(account_id.to_string()))?;
        if index >= self.config().num_users {
            return Err(Error::UnknownUser(account_id.to_string()));
        }
        Ok(self.user_at(index))
    }

    /// Case-insensitive substring search over the user directory.
    pub fn search_users(&self, query: &str, max_results: u64) -> Vec<User> {
        let needle = query.to_lowercase();
        let mut hits = Vec::new();
        for index in 0..self.config().num_users {
            let user = self.user_at(index);
            if needle.is_empty()
                || user.display_name.to_lowercase().contains(&needle)
                || user.email_address.to_lowercase().contains(&needle)
            {
                hits.push(user);
                if hits.len() as u64 >= max_results {
                    break;
                }
            }
        }
        hits
    }

    /// Key for the project at a global index: prefixes rotate, and every
    /// full rotation bumps a numeric suffix (`ITPM`, `PROD`, ... `ITPM1`).
    pub fn project_key_for(&self, index: u64) -> String {
        let prefix = PROJECT_PREFIXES[(index % PROJECT_PREFIXES.len() as u64) as usize];
        let suffix = index / PROJECT_PREFIXES.len() as u64;
        if suffix == 0 {
            prefix.to_string()
        } else {
            format!("{prefix}{suffix}")
        }
    }

    /// Invert [`Self::project_key_for`] analytically. Unknown prefixes and
    /// indices past the planned total are reported, not clamped.
    pub fn project_index_for_key(&self, key: &str) -> Result<u64> {
        let split = key.len() - key.chars().rev().take_while(|c| c.is_ascii_digit()).count();
        let (prefix, digits) = key.split_at(split);

        let position = PROJECT_PREFIXES
            .iter()
            .position(|p| *p == prefix)
            .ok_or_else(|| Error::UnknownProject(key.to_string()))? as u64;
        let suffix: u64 = if digits.is_empty() {
            0
        } else {
            digits
                .parse()
                .map_err(|_| Error::UnknownProject(key.to_string()))?
        };

        let index = position + suffix * PROJECT_PREFIXES.len() as u64;
        if index >= self.years().total_projects() {
            return Err(Error::UnknownProject(key.to_string()));
        }
        Ok(index)
    }

    /// Realize the project at a global index.
    pub fn project_at(&self, index: u64) -> Project {
        if let Some(project) = self
            .projects
            .read()
            .expect("project cache poisoned")
            .get(&index)
        {
            return project.clone();
        }

        let mut s = self.stream(&format!("project-{index}"));
        let adjective = *s.pick(&BUZZ_ADJECTIVES);
        let noun = *s.pick(&BUZZ_NOUNS);
        let verb = *s.pick(&BUZZ_VERBS);
        let key = self.project_key_for(index);
        let lead = self.user_at(s.below(self.config().num_users));

        let project = Project {
            id: (10_000 + index).to_string(),
            self_url: format!("/rest/api/3/project/{key}"),
            key,
            name: format!("{adjective} {noun}"),
            description: format!("{verb} the {} {noun}.", adjective.to_lowercase()),
            lead,
            project_type_key: "software".to_string(),
            simplified: false,
            style: "classic".to_string(),
            is_private: false,
        };

        self.projects
            .write()
            .expect("project cache poisoned")
            .insert(index, project.clone());
        project
    }

    pub fn project_by_key(&self, key: &str) -> Result<Project> {
        Ok(self.project_at(self.project_index_for_key(key)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenConfig;

    fn generator() -> Generator {
        Generator::new(GenConfig::default())
    }

    #[test]
    fn users_are_stable_and_shaped() {
        let g = generator();
        let a = g.user_at(7);
        let b = generator().user_at(7);
        assert_eq!(a, b);
        assert_eq!(a.account_id, "user-000007");
        assert!(a.email_address.ends_with("@company.com"));
        assert_eq!(
            a.email_address,
            a.email_address.to_lowercase(),
            "emails are lowercased"
        );
    }

    #[test]
    fn user_index_wraps_past_directory_size() {
        let g = generator();
        assert_eq!(g.user_at(3), g.user_at(503));
    }

    #[test]
    fn account_id_round_trips() {
        let g = generator();
        let user = g.user_at(42);
        assert_eq!(g.user_by_account_id(&user.account_id).unwrap(), user);
        assert!(g.user_by_account_id("user-999999").is_err());
        assert!(g.user_by_account_id("bogus").is_err());
    }

    #[test]
    fn project_keys_rotate_with_suffix() {
        let g = generator();
        assert_eq!(g.project_key_for(0), "ITPM");
        assert_eq!(g.project_key_for(14), "ERP");
        assert_eq!(g.project_key_for(15), "ITPM1");
        assert_eq!(g.project_key_for(31), "PROD2");
    }

    #[test]
    fn key_reverse_lookup_is_exact() {
        let g = generator();
        for index in [0, 1, 14, 15, 449, 6000] {
            let key = g.project_key_for(index);
            assert_eq!(g.project_index_for_key(&key).unwrap(), index);
        }
        assert!(g.project_index_for_key("NOPE").is_err());
        assert!(g.project_index_for_key("ITPM999999").is_err());
    }

    #[test]
    fn projects_are_stable() {
        let a = generator().project_at(100);
        let b = generator().project_at(100);
        assert_eq!(a, b);
        assert_eq!(a.id, "10100");
    }

    #[test]
    fn user_search_matches_names_and_emails() {
        let g = generator();
        let user = g.user_at(0);
        let fragment = user.display_name.split(' ').next().unwrap().to_lowercase();
        let hits = g.search_users(&fragment, 50);
        assert!(hits.iter().any(|u| u.account_id == user.account_id));
        assert!(g.search_users("", 10).len() == 10);
    }
}
