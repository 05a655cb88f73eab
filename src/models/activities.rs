use serde::Serialize;

// One activity with its roster folded into a JSON array (see activities_repo).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivitiesRow {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: i64,
    pub participants_json: Option<String>,
}

/// An activity and its roster, in signup order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    #[serde(skip)]
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: i64,
    pub participants: Vec<String>,
}

impl Activity {
    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() as i64 >= self.max_participants
    }
}

impl TryFrom<ActivitiesRow> for Activity {
    type Error = serde_json::Error;

    fn try_from(row: ActivitiesRow) -> Result<Self, Self::Error> {
        let participants = match row.participants_json.as_deref() {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str::<Vec<String>>(raw)?,
            _ => vec![],
        };

        Ok(Activity {
            name: row.name,
            description: row.description,
            schedule: row.schedule,
            max_participants: row.max_participants,
            participants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(participants_json: Option<&str>) -> ActivitiesRow {
        ActivitiesRow {
            name: "Chess Club".to_string(),
            description: "Learn strategies".to_string(),
            schedule: "Fridays, 3:30 PM".to_string(),
            max_participants: 2,
            participants_json: participants_json.map(str::to_string),
        }
    }

    #[test]
    fn decodes_roster_in_order() {
        let activity = Activity::try_from(row(Some(r#"["b@x.com","a@x.com"]"#))).unwrap();
        assert_eq!(activity.participants, vec!["b@x.com", "a@x.com"]);
        assert!(activity.has_participant("a@x.com"));
        assert!(!activity.has_participant("c@x.com"));
        assert!(activity.is_full());
    }

    #[test]
    fn missing_roster_is_empty() {
        let activity = Activity::try_from(row(None)).unwrap();
        assert!(activity.participants.is_empty());
        assert!(!activity.is_full());
    }

    #[test]
    fn malformed_roster_is_an_error() {
        assert!(Activity::try_from(row(Some("not json"))).is_err());
    }

    #[test]
    fn name_is_not_serialized() {
        let activity = Activity::try_from(row(Some("[]"))).unwrap();
        let value = serde_json::to_value(&activity).unwrap();
        assert!(value.get("name").is_none());
        assert_eq!(value["max_participants"], 2);
        assert_eq!(value["participants"], serde_json::json!([]));
    }
}
