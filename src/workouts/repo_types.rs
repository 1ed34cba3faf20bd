use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Which creation path produced a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum EntryKind {
    Full,
    Template,
}

#[derive(Debug, Clone, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_date: OffsetDateTime,
    pub workout_type: String,
    pub duration_minutes: Option<i64>,
    pub notes: Option<String>,
    pub image: Option<String>, // object key in the upload store
    pub entry_kind: EntryKind,
    pub created_at: OffsetDateTime,
}

/// A workout about to be stored. Both variants land in the same table;
/// the template variant leaves duration, notes and image empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewWorkout {
    Full {
        date: Date,
        workout_type: String,
        duration_minutes: Option<i64>,
        notes: Option<String>,
        image: Option<String>,
    },
    Template {
        workout_type: String,
    },
}

impl NewWorkout {
    pub fn kind(&self) -> EntryKind {
        match self {
            NewWorkout::Full { .. } => EntryKind::Full,
            NewWorkout::Template { .. } => EntryKind::Template,
        }
    }

    pub fn workout_type(&self) -> &str {
        match self {
            NewWorkout::Full { workout_type, .. } | NewWorkout::Template { workout_type } => {
                workout_type
            }
        }
    }
}

/// Result of an owner-filtered delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { image: Option<String> },
    /// No row had both that id and that owner.
    NothingDeleted,
}
