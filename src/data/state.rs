use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, NaiveDateTime, Utc};
use serenity::all::{MessageId, ReactionType, RoleId};

/// The fixed literal format accepted for schedule dates and times, in UTC.
pub const SCHEDULE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The operator facing description of [`SCHEDULE_FORMAT`].
pub const SCHEDULE_FORMAT_HINT: &str = "YYYY-MM-DD HH:MM";

/// Display and entry parameters for the next giveaway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveawayConfig {
    pub title: String,
    pub description: String,
    pub emoji: String,
    pub eligible_roles: EligibleRoles,
}

impl GiveawayConfig {
    pub fn new(emoji: impl Into<String>) -> Self {
        Self {
            title: "Giveaway!".to_string(),
            description: "React to enter!".to_string(),
            emoji: emoji.into(),
            eligible_roles: EligibleRoles::default(),
        }
    }
}

/// The roles gating entry, keyed by role ID. The name is only kept for
/// display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibleRoles(BTreeMap<RoleId, String>);

impl EligibleRoles {
    /// No restriction means every non-bot reactor is eligible
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, role_id: RoleId) -> bool {
        self.0.contains_key(&role_id)
    }

    /// Whether a member holding `roles` may enter
    pub fn admits(&self, roles: &[RoleId]) -> bool {
        self.is_unrestricted() || self.intersects(roles)
    }

    pub fn intersects(&self, roles: &[RoleId]) -> bool {
        roles.iter().any(|role| self.contains(*role))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// Find an eligible role by mention, ID or name, even if the role no
    /// longer exists in the guild
    pub fn find(&self, query: &str) -> Option<RoleId> {
        let query = query.trim();
        let id = query
            .strip_prefix("<@&")
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(query);

        if let Some(role_id) = id.parse::<u64>().ok().filter(|id| *id != 0).map(RoleId::new) {
            if self.contains(role_id) {
                return Some(role_id);
            }
        }

        self.0
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(query))
            .map(|(role_id, _)| *role_id)
    }
}

impl fmt::Display for EligibleRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unrestricted() {
            return f.write_str("No role restrictions (everyone eligible)");
        }

        f.write_str(&self.names().collect::<Vec<_>>().join(", "))
    }
}

/// Auto-open and auto-close only engage once both ends are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GiveawaySchedule {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl GiveawaySchedule {
    pub fn is_armed(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// The currently open giveaway, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GiveawayRun {
    pub announcement: Option<MessageId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleFormatError {
    input: String,
}

impl fmt::Display for ScheduleFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid date/time {:?}, use {}",
            self.input, SCHEDULE_FORMAT_HINT
        )
    }
}

impl std::error::Error for ScheduleFormatError {}

/// Whether `emoji` can be used as a reaction: either a custom emoji
/// (`<:name:id>`) or a unicode emoji, which never contains ASCII letters.
pub fn is_usable_emoji(emoji: &str) -> bool {
    if emoji.is_empty() || emoji.chars().any(char::is_whitespace) {
        return false;
    }

    if emoji.starts_with('<') {
        return matches!(ReactionType::try_from(emoji), Ok(ReactionType::Custom { .. }));
    }

    !emoji.chars().any(|c| c.is_ascii_alphabetic()) && !emoji.is_ascii()
}

/// Parse a schedule literal such as `2025-01-01` + `12:00` as a UTC timestamp.
pub fn parse_schedule_time(date: &str, time: &str) -> Result<DateTime<Utc>, ScheduleFormatError> {
    let input = format!("{} {}", date.trim(), time.trim());

    NaiveDateTime::parse_from_str(&input, SCHEDULE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ScheduleFormatError { input })
}

/// All giveaway state of the process. Nothing here survives a restart.
///
/// A draw or a cancellation resets the whole thing, so each configuration is
/// used for exactly one giveaway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveawayState {
    default_emoji: String,
    config: GiveawayConfig,
    schedule: GiveawaySchedule,
    run: GiveawayRun,
}

impl GiveawayState {
    pub fn new(default_emoji: impl Into<String>) -> Self {
        let default_emoji = default_emoji.into();

        Self {
            config: GiveawayConfig::new(default_emoji.clone()),
            default_emoji,
            schedule: GiveawaySchedule::default(),
            run: GiveawayRun::default(),
        }
    }

    pub fn config(&self) -> &GiveawayConfig {
        &self.config
    }

    pub fn schedule(&self) -> &GiveawaySchedule {
        &self.schedule
    }

    pub fn announcement(&self) -> Option<MessageId> {
        self.run.announcement
    }

    pub fn is_open(&self) -> bool {
        self.run.announcement.is_some()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.config.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.config.description = description.into();
    }

    /// Returns false, leaving the emoji untouched, if it can't be reacted with
    pub fn set_emoji(&mut self, emoji: &str) -> bool {
        let emoji = emoji.trim();
        if !is_usable_emoji(emoji) {
            return false;
        }

        self.config.emoji = emoji.to_string();

        true
    }

    /// Returns false if the role was already eligible
    pub fn add_eligible_role(&mut self, role_id: RoleId, name: impl Into<String>) -> bool {
        if self.config.eligible_roles.contains(role_id) {
            return false;
        }

        self.config.eligible_roles.0.insert(role_id, name.into());

        true
    }

    /// Returns false if the role was not eligible in the first place
    pub fn remove_eligible_role(&mut self, role_id: RoleId) -> bool {
        self.config.eligible_roles.0.remove(&role_id).is_some()
    }

    pub fn set_start(&mut self, start: DateTime<Utc>) {
        self.schedule.start = Some(start);
    }

    pub fn set_end(&mut self, end: DateTime<Utc>) {
        self.schedule.end = Some(end);
    }

    /// Set the start from a schedule literal. A malformed literal leaves the
    /// schedule as it was.
    pub fn set_start_literal(
        &mut self,
        date: &str,
        time: &str,
    ) -> Result<DateTime<Utc>, ScheduleFormatError> {
        let start = parse_schedule_time(date, time)?;
        self.set_start(start);

        Ok(start)
    }

    /// Set the end from a schedule literal. A malformed literal leaves the
    /// schedule as it was.
    pub fn set_end_literal(
        &mut self,
        date: &str,
        time: &str,
    ) -> Result<DateTime<Utc>, ScheduleFormatError> {
        let end = parse_schedule_time(date, time)?;
        self.set_end(end);

        Ok(end)
    }

    pub fn clear_schedule(&mut self) {
        self.schedule = GiveawaySchedule::default();
    }

    pub fn record_run(&mut self, announcement: MessageId) {
        self.run.announcement = Some(announcement);
    }

    /// Back to defaults, with no open run and no schedule
    pub fn reset(&mut self) {
        self.config = GiveawayConfig::new(self.default_emoji.clone());
        self.schedule = GiveawaySchedule::default();
        self.run = GiveawayRun::default();
    }

    pub fn should_auto_open(&self, now: DateTime<Utc>) -> bool {
        self.schedule.is_armed()
            && !self.is_open()
            && self.schedule.start.is_some_and(|start| now >= start)
    }

    pub fn should_auto_close(&self, now: DateTime<Utc>) -> bool {
        self.schedule.is_armed()
            && self.is_open()
            && self.schedule.end.is_some_and(|end| now >= end)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn starts_with_defaults() {
        let state = GiveawayState::new("🎉");

        assert_eq!(state.config().title, "Giveaway!");
        assert_eq!(state.config().description, "React to enter!");
        assert_eq!(state.config().emoji, "🎉");
        assert!(state.config().eligible_roles.is_unrestricted());
        assert!(!state.is_open());
        assert!(!state.schedule().is_armed());
    }

    #[test]
    fn adding_a_role_twice_keeps_one() {
        let mut state = GiveawayState::new("🎉");

        assert!(state.add_eligible_role(RoleId::new(1), "Members"));
        assert!(!state.add_eligible_role(RoleId::new(1), "Members"));

        assert_eq!(state.config().eligible_roles.len(), 1);
    }

    #[test]
    fn removing_an_absent_role_changes_nothing() {
        let mut state = GiveawayState::new("🎉");
        state.add_eligible_role(RoleId::new(1), "Members");
        let before = state.clone();

        assert!(!state.remove_eligible_role(RoleId::new(2)));
        assert_eq!(state, before);

        assert!(state.remove_eligible_role(RoleId::new(1)));
        assert!(state.config().eligible_roles.is_unrestricted());
    }

    #[test]
    fn eligibility_checks_role_intersection() {
        let mut state = GiveawayState::new("🎉");
        let roles = &state.config().eligible_roles;
        assert!(roles.admits(&[]));

        state.add_eligible_role(RoleId::new(1), "Members");
        state.add_eligible_role(RoleId::new(2), "Boosters");
        let roles = &state.config().eligible_roles;

        assert!(roles.admits(&[RoleId::new(3), RoleId::new(2)]));
        assert!(!roles.admits(&[RoleId::new(3)]));
        assert!(!roles.admits(&[]));
        assert_eq!(roles.to_string(), "Members, Boosters");
    }

    #[test]
    fn parses_schedule_literal_as_utc() {
        let parsed = parse_schedule_time("2025-01-01", "12:00").unwrap();

        assert_eq!(parsed, at(12));
        assert_eq!(parsed.to_rfc3339(), "2025-01-01T12:00:00+00:00");
    }

    #[test]
    fn rejects_malformed_schedule_literals() {
        assert!(parse_schedule_time("2025-13-01", "12:00").is_err());
        assert!(parse_schedule_time("bad", "12:00").is_err());
        assert!(parse_schedule_time("2025-01-01", "25:00").is_err());
        assert!(parse_schedule_time("2025-01-01", "").is_err());

        let err = parse_schedule_time("bad", "time").unwrap_err();
        assert!(err.to_string().contains(SCHEDULE_FORMAT_HINT));
    }

    #[test]
    fn reset_restores_defaults_and_clears_run_and_schedule() {
        let mut state = GiveawayState::new("🎉");
        state.set_title("Nitro");
        state.set_description("One month");
        assert!(state.set_emoji("🎁"));
        state.add_eligible_role(RoleId::new(1), "Members");
        state.set_start(at(10));
        state.set_end(at(11));
        state.record_run(MessageId::new(42));

        state.reset();

        assert_eq!(state, GiveawayState::new("🎉"));
    }

    #[test]
    fn auto_transitions_need_both_ends_of_the_schedule() {
        let mut state = GiveawayState::new("🎉");
        state.set_start(at(10));

        assert!(!state.should_auto_open(at(12)));

        state.set_end(at(11));
        assert!(!state.should_auto_open(at(9)));
        assert!(state.should_auto_open(at(10)));
        assert!(!state.should_auto_close(at(12)));

        state.record_run(MessageId::new(42));
        assert!(!state.should_auto_open(at(12)));
        assert!(!state.should_auto_close(at(11) - Duration::seconds(1)));
        assert!(state.should_auto_close(at(11)));
    }

    #[test]
    fn malformed_literals_keep_the_previous_schedule() {
        let mut state = GiveawayState::new("🎉");

        assert!(state.set_start_literal("2025-13-01", "12:00").is_err());
        assert_eq!(state.schedule().start, None);

        assert_eq!(state.set_start_literal("2025-01-01", "12:00"), Ok(at(12)));
        assert_eq!(state.set_end_literal("2025-01-01", "13:00"), Ok(at(13)));
        let before = state.clone();

        assert!(state.set_start_literal("2025-13-01", "12:00").is_err());
        assert!(state.set_start_literal("bad", "12:00").is_err());
        assert!(state.set_end_literal("bad", "bad").is_err());
        assert_eq!(state, before);
        assert_eq!(state.schedule().start, Some(at(12)));
    }

    #[test]
    fn only_usable_emojis_are_accepted() {
        let mut state = GiveawayState::new("🎉");

        assert!(!state.set_emoji("abc"));
        assert!(!state.set_emoji(""));
        assert!(!state.set_emoji("🎉 🎁"));
        assert!(!state.set_emoji("<not an emoji>"));
        assert_eq!(state.config().emoji, "🎉");

        assert!(state.set_emoji("1️⃣"));
        assert!(state.set_emoji(" <:party:123456789012345678> "));
        assert_eq!(state.config().emoji, "<:party:123456789012345678>");
        assert!(state.set_emoji("🎁"));
        assert_eq!(state.config().emoji, "🎁");
    }

    #[test]
    fn finds_eligible_roles_without_the_guild() {
        let mut state = GiveawayState::new("🎉");
        state.add_eligible_role(RoleId::new(5), "Members");
        let roles = &state.config().eligible_roles;

        assert_eq!(roles.find("<@&5>"), Some(RoleId::new(5)));
        assert_eq!(roles.find("5"), Some(RoleId::new(5)));
        assert_eq!(roles.find("members"), Some(RoleId::new(5)));
        assert_eq!(roles.find("6"), None);
        assert_eq!(roles.find("0"), None);
        assert_eq!(roles.find("Boosters"), None);
    }
}
